//! Accumulator of module outputs
//!
//! The accumulator is append-only: entries can be added but never edited or
//! removed. Each collection keeps the order in which modules contributed.

use crate::error::{Result, RuleError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Free-form metadata attached to an entry. Ordered so serialization is stable.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Cost category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Labor,
    Access,
    Distance,
    Temporal,
    Handling,
    Storage,
    Insurance,
    Other,
}

/// Severity shared by requirements and legal impacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Kind of follow-up a requirement asks for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    LiftRecommended,
    SpecialistHandling,
    ParkingPermit,
    BuildingManagerBooking,
    ValueDeclaration,
    Custom(String),
}

impl RequirementType {
    pub fn as_str(&self) -> &str {
        match self {
            RequirementType::LiftRecommended => "lift_recommended",
            RequirementType::SpecialistHandling => "specialist_handling",
            RequirementType::ParkingPermit => "parking_permit",
            RequirementType::BuildingManagerBooking => "building_manager_booking",
            RequirementType::ValueDeclaration => "value_declaration",
            RequirementType::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for RequirementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of legal notice
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalImpactType {
    LiabilityLimitation,
    InsuranceCap,
    ValueDeclaration,
    AccessRestriction,
    Custom(String),
}

/// A cost line contributed by a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    pub module_id: String,
    pub category: CostCategory,
    pub label: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl CostEntry {
    pub fn new(
        module_id: impl Into<String>,
        category: CostCategory,
        label: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            module_id: module_id.into(),
            category,
            label: label.into(),
            amount,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A recommended or mandatory follow-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(rename = "type")]
    pub requirement_type: RequirementType,
    pub severity: Severity,
    pub reason: String,
    pub module_id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl Requirement {
    pub fn new(
        requirement_type: RequirementType,
        severity: Severity,
        reason: impl Into<String>,
        module_id: impl Into<String>,
    ) -> Self {
        Self {
            requirement_type,
            severity,
            reason: reason.into(),
            module_id: module_id.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Risk points contributed by a module (0 to 100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskContribution {
    pub module_id: String,
    pub amount: f64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl RiskContribution {
    pub fn new(module_id: impl Into<String>, amount: f64, reason: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            amount,
            reason: reason.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Legal or regulatory notice attached to a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalImpact {
    pub module_id: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub impact_type: LegalImpactType,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl LegalImpact {
    pub fn new(
        module_id: impl Into<String>,
        severity: Severity,
        impact_type: LegalImpactType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            module_id: module_id.into(),
            severity,
            impact_type,
            message: message.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Optional paid service suggested to the customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSellProposal {
    pub id: String,
    pub label: String,
    pub reason: String,
    pub benefit: String,
    pub price_impact: f64,
    pub optional: bool,
    pub module_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on_requirement: Option<RequirementType>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl CrossSellProposal {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        module_id: impl Into<String>,
        price_impact: f64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            reason: String::new(),
            benefit: String::new(),
            price_impact,
            optional: true,
            module_id: module_id.into(),
            based_on_requirement: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_benefit(mut self, benefit: impl Into<String>) -> Self {
        self.benefit = benefit.into();
        self
    }

    pub fn based_on(mut self, requirement: RequirementType) -> Self {
        self.based_on_requirement = Some(requirement);
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.optional = false;
        self
    }
}

/// Typed signals modules pass forward to later modules
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    /// Volume after bulky-furniture adjustment, in cubic meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_volume: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_long_distance: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers_count: Option<u32>,

    /// Number of access constraints found on both ends of the move
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_difficulty: Option<u32>,
}

/// Append-only record of everything modules produced during one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accumulator {
    costs: Vec<CostEntry>,
    requirements: Vec<Requirement>,
    risks: Vec<RiskContribution>,
    legal_impacts: Vec<LegalImpact>,
    cross_sell: Vec<CrossSellProposal>,
    insurance_notes: Vec<String>,
    flags: BTreeSet<String>,
    activated_modules: Vec<String>,
    signals: Signals,

    /// Bumped on every effective change; not part of the serialized form
    #[serde(skip)]
    revision: u64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Append operations ==========

    /// Append a cost entry. Amounts must be finite and non-negative.
    pub fn add_cost(&mut self, entry: CostEntry) -> Result<()> {
        if !entry.amount.is_finite() || entry.amount < 0.0 {
            return Err(RuleError::invalid_value(
                format!("cost '{}'", entry.label),
                format!(
                    "amount {} from module '{}' must be finite and non-negative",
                    entry.amount, entry.module_id
                ),
            ));
        }
        self.costs.push(entry);
        self.bump();
        Ok(())
    }

    /// Append a requirement unless the same module already emitted the same type.
    ///
    /// Returns whether the requirement was added.
    pub fn add_requirement(&mut self, requirement: Requirement) -> bool {
        let exists = self.requirements.iter().any(|r| {
            r.requirement_type == requirement.requirement_type
                && r.module_id == requirement.module_id
        });
        if exists {
            return false;
        }
        self.requirements.push(requirement);
        self.bump();
        true
    }

    /// Append a risk contribution. Amounts must lie in `0..=100`.
    pub fn add_risk(&mut self, risk: RiskContribution) -> Result<()> {
        if !risk.amount.is_finite() || !(0.0..=100.0).contains(&risk.amount) {
            return Err(RuleError::RiskOutOfRange {
                module_id: risk.module_id,
                amount: risk.amount,
            });
        }
        self.risks.push(risk);
        self.bump();
        Ok(())
    }

    pub fn add_legal_impact(&mut self, impact: LegalImpact) {
        self.legal_impacts.push(impact);
        self.bump();
    }

    /// Append a cross-sell proposal. Only the exact `(id, module_id)` pair is deduplicated;
    /// two modules proposing the same id are both kept.
    pub fn add_cross_sell(&mut self, proposal: CrossSellProposal) -> bool {
        let exists = self
            .cross_sell
            .iter()
            .any(|p| p.id == proposal.id && p.module_id == proposal.module_id);
        if exists {
            return false;
        }
        self.cross_sell.push(proposal);
        self.bump();
        true
    }

    pub fn add_insurance_note(&mut self, note: impl Into<String>) {
        self.insurance_notes.push(note.into());
        self.bump();
    }

    /// Set an operational flag. Returns false if it was already set.
    pub fn set_flag(&mut self, flag: impl Into<String>) -> bool {
        let inserted = self.flags.insert(flag.into());
        if inserted {
            self.bump();
        }
        inserted
    }

    /// Update the forward signals; counts as a change only if a value differs
    pub fn update_signals(&mut self, update: impl FnOnce(&mut Signals)) {
        let before = self.signals;
        update(&mut self.signals);
        if self.signals != before {
            self.bump();
        }
    }

    /// Record that a module produced an effect. Used by the executor.
    pub fn record_activation(&mut self, module_id: impl Into<String>) {
        self.activated_modules.push(module_id.into());
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    // ========== Read access ==========

    pub fn costs(&self) -> &[CostEntry] {
        &self.costs
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn risks(&self) -> &[RiskContribution] {
        &self.risks
    }

    pub fn legal_impacts(&self) -> &[LegalImpact] {
        &self.legal_impacts
    }

    pub fn cross_sell_proposals(&self) -> &[CrossSellProposal] {
        &self.cross_sell
    }

    pub fn insurance_notes(&self) -> &[String] {
        &self.insurance_notes
    }

    pub fn flags(&self) -> &BTreeSet<String> {
        &self.flags
    }

    pub fn activated_modules(&self) -> &[String] {
        &self.activated_modules
    }

    pub fn signals(&self) -> Signals {
        self.signals
    }

    /// Monotonic counter of effective changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ========== Derived views ==========

    pub fn cost_total(&self) -> f64 {
        self.costs.iter().map(|c| c.amount).sum()
    }

    pub fn cost_total_for(&self, category: CostCategory) -> f64 {
        self.costs
            .iter()
            .filter(|c| c.category == category)
            .map(|c| c.amount)
            .sum()
    }

    /// Raw sum of risk contributions; clamping is left to the consumer
    pub fn risk_total(&self) -> f64 {
        self.risks.iter().map(|r| r.amount).sum()
    }

    pub fn has_requirement(&self, requirement_type: &RequirementType) -> bool {
        self.requirements
            .iter()
            .any(|r| &r.requirement_type == requirement_type)
    }

    pub fn requirements_of<'a>(
        &'a self,
        requirement_type: &'a RequirementType,
    ) -> impl Iterator<Item = &'a Requirement> + 'a {
        self.requirements
            .iter()
            .filter(move |r| &r.requirement_type == requirement_type)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn entries_from(&self, module_id: &str) -> ModuleEntries {
        ModuleEntries {
            costs: self.costs.iter().filter(|c| c.module_id == module_id).count(),
            requirements: self
                .requirements
                .iter()
                .filter(|r| r.module_id == module_id)
                .count(),
            risks: self.risks.iter().filter(|r| r.module_id == module_id).count(),
            legal_impacts: self
                .legal_impacts
                .iter()
                .filter(|l| l.module_id == module_id)
                .count(),
            cross_sell: self
                .cross_sell
                .iter()
                .filter(|p| p.module_id == module_id)
                .count(),
        }
    }
}

/// Number of typed entries a single module contributed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModuleEntries {
    pub costs: usize,
    pub requirements: usize,
    pub risks: usize,
    pub legal_impacts: usize,
    pub cross_sell: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_cost_keeps_order() {
        let mut acc = Accumulator::new();
        acc.add_cost(CostEntry::new("a", CostCategory::Labor, "first", 10.0))
            .unwrap();
        acc.add_cost(CostEntry::new("b", CostCategory::Access, "second", 5.5))
            .unwrap();

        assert_eq!(acc.costs().len(), 2);
        assert_eq!(acc.costs()[0].label, "first");
        assert_eq!(acc.costs()[1].label, "second");
        assert_eq!(acc.cost_total(), 15.5);
        assert_eq!(acc.cost_total_for(CostCategory::Access), 5.5);
        assert_eq!(acc.revision(), 2);
    }

    #[test]
    fn test_add_cost_rejects_negative_amount() {
        let mut acc = Accumulator::new();
        let result = acc.add_cost(CostEntry::new("a", CostCategory::Labor, "refund", -1.0));
        assert!(result.is_err());
        assert!(acc.costs().is_empty());
        assert_eq!(acc.revision(), 0);
    }

    #[test]
    fn test_requirement_unique_per_type_and_module() {
        let mut acc = Accumulator::new();
        let lift = |module: &str| {
            Requirement::new(
                RequirementType::LiftRecommended,
                Severity::High,
                "fourth floor",
                module,
            )
        };

        assert!(acc.add_requirement(lift("elevator")));
        assert!(!acc.add_requirement(lift("elevator")));
        assert!(acc.add_requirement(lift("narrow_stairs")));

        assert_eq!(acc.requirements().len(), 2);
        assert_eq!(
            acc.requirements_of(&RequirementType::LiftRecommended).count(),
            2
        );
    }

    #[test]
    fn test_risk_range_is_enforced() {
        let mut acc = Accumulator::new();
        assert!(acc.add_risk(RiskContribution::new("a", 0.0, "none")).is_ok());
        assert!(acc.add_risk(RiskContribution::new("a", 100.0, "max")).is_ok());

        let err = acc
            .add_risk(RiskContribution::new("b", 101.0, "too much"))
            .unwrap_err();
        assert!(matches!(err, RuleError::RiskOutOfRange { ref module_id, .. } if module_id == "b"));
        assert_eq!(acc.risks().len(), 2);
        assert_eq!(acc.risk_total(), 100.0);
    }

    #[test]
    fn test_cross_sell_dedup_on_id_and_module() {
        let mut acc = Accumulator::new();
        assert!(acc.add_cross_sell(CrossSellProposal::new("lift", "Lift", "m1", 200.0)));
        assert!(!acc.add_cross_sell(CrossSellProposal::new("lift", "Lift", "m1", 250.0)));
        assert!(acc.add_cross_sell(CrossSellProposal::new("lift", "Lift", "m2", 200.0)));
        assert_eq!(acc.cross_sell_proposals().len(), 2);
    }

    #[test]
    fn test_flags_have_set_semantics() {
        let mut acc = Accumulator::new();
        assert!(acc.set_flag("long_distance"));
        let revision = acc.revision();
        assert!(!acc.set_flag("long_distance"));
        assert_eq!(acc.revision(), revision);
        assert!(acc.has_flag("long_distance"));
    }

    #[test]
    fn test_signals_change_detection() {
        let mut acc = Accumulator::new();
        acc.update_signals(|s| s.is_long_distance = Some(false));
        assert_eq!(acc.revision(), 1);

        acc.update_signals(|s| s.is_long_distance = Some(false));
        assert_eq!(acc.revision(), 1);

        acc.update_signals(|s| s.workers_count = Some(3));
        assert_eq!(acc.revision(), 2);
        assert_eq!(acc.signals().workers_count, Some(3));
    }

    #[test]
    fn test_record_activation_is_not_an_effect() {
        let mut acc = Accumulator::new();
        acc.record_activation("a");
        assert_eq!(acc.activated_modules(), ["a".to_string()]);
        assert_eq!(acc.revision(), 0);
    }

    #[test]
    fn test_entries_from_module() {
        let mut acc = Accumulator::new();
        acc.add_cost(CostEntry::new("a", CostCategory::Labor, "x", 1.0))
            .unwrap();
        acc.add_risk(RiskContribution::new("a", 5.0, "x")).unwrap();
        acc.add_risk(RiskContribution::new("b", 5.0, "y")).unwrap();

        let entries = acc.entries_from("a");
        assert_eq!(entries.costs, 1);
        assert_eq!(entries.risks, 1);
        assert_eq!(entries.requirements, 0);
    }

    #[test]
    fn test_serialization_is_stable() {
        let mut acc = Accumulator::new();
        acc.set_flag("zeta");
        acc.set_flag("alpha");
        acc.add_cost(
            CostEntry::new("a", CostCategory::Temporal, "weekend", 50.0)
                .with_metadata("rate", 0.05)
                .with_metadata("base", 1000.0),
        )
        .unwrap();

        let first = serde_json::to_string(&acc).unwrap();
        let second = serde_json::to_string(&acc.clone()).unwrap();
        assert_eq!(first, second);
        assert!(first.find("alpha").unwrap() < first.find("zeta").unwrap());
        assert!(!first.contains("revision"));
    }
}
