//! Unit tests for relo-runtime
//!
//! Exercise the executor fold through the public API: skip semantics, abort
//! semantics, determinism and category additivity.

use proptest::prelude::*;
use relo_compiler::{ExecutionPlan, ModuleRegistry, RegistryCompiler};
use relo_core::{
    CostCategory, CostEntry, FnRule, QuoteContext, QuoteRequest, RuleError, ServiceType,
};
use relo_runtime::{ExecutorOptions, Metrics, ModuleStatus, PipelineExecutor, RuntimeError};

fn plan(registry: ModuleRegistry) -> ExecutionPlan {
    RegistryCompiler::new().compile(&registry).unwrap()
}

fn request(service: ServiceType) -> QuoteContext {
    QuoteContext::new(QuoteRequest::new(service).with_volume(30.0))
}

fn add_cost(id: &'static str, priority: i32, category: CostCategory, amount: f64) -> FnRule {
    FnRule::new(id, priority, move |ctx: &QuoteContext| {
        ctx.with_accumulator(|acc| acc.add_cost(CostEntry::new(id, category, id, amount)))
    })
}

fn traced() -> PipelineExecutor {
    PipelineExecutor::with_options(ExecutorOptions {
        collect_trace: true,
        record_metrics: true,
    })
}

// ========== Skip semantics ==========

#[test]
fn test_false_predicate_leaves_context_unchanged() {
    let registry = ModuleRegistry::new()
        .with_module(add_cost("base", 1, CostCategory::Labor, 100.0))
        .with_module(
            add_cost("cleaning_only", 2, CostCategory::Other, 80.0)
                .when(|ctx| ctx.request().service_type.includes_cleaning()),
        );
    let base_registry =
        ModuleRegistry::new().with_module(add_cost("base", 1, CostCategory::Labor, 100.0));

    let without = PipelineExecutor::new()
        .execute(&plan(registry), request(ServiceType::Moving))
        .unwrap()
        .context;
    let base_only = PipelineExecutor::new()
        .execute(&plan(base_registry), request(ServiceType::Moving))
        .unwrap()
        .context;

    assert_eq!(without, base_only);
    assert!(!without.activated_modules().contains(&"cleaning_only".to_string()));
}

#[test]
fn test_skipped_module_is_never_called() {
    let registry = ModuleRegistry::new().with_module(
        FnRule::new("explodes", 1, |_: &QuoteContext| {
            Err(RuleError::InvalidState("must not run".to_string()))
        })
        .when(|_| false),
    );

    let result = traced()
        .execute(&plan(registry), request(ServiceType::Moving))
        .unwrap();
    let trace = result.trace.unwrap();
    assert_eq!(trace.find("explodes").unwrap().status, ModuleStatus::Skipped);
    assert!(result.context.computed().is_none());
}

// ========== Abort semantics ==========

#[test]
fn test_failure_aborts_with_entry_snapshot() {
    let registry = ModuleRegistry::new()
        .with_module(add_cost("first", 1, CostCategory::Labor, 100.0))
        .with_module(FnRule::new("broken", 2, |ctx: &QuoteContext| {
            ctx.with_accumulator(|acc| {
                acc.add_cost(CostEntry::new("broken", CostCategory::Other, "half", 1.0))?;
                Err(RuleError::InvalidState("contradictory input".to_string()))
            })
        }))
        .with_module(add_cost("after", 3, CostCategory::Labor, 10.0));

    let executor = PipelineExecutor::new();
    let err = executor
        .execute(&plan(registry), request(ServiceType::Moving))
        .unwrap_err();

    let RuntimeError::ModuleFailed {
        module_id,
        position,
        source,
        snapshot,
    } = &err;
    assert_eq!(module_id, "broken");
    assert_eq!(*position, 1);
    assert_eq!(
        source,
        &RuleError::InvalidState("contradictory input".to_string())
    );
    // Snapshot is the context at entry: the half-written cost is not there
    assert_eq!(snapshot.cost_total(), 100.0);
    assert_eq!(snapshot.activated_modules(), ["first".to_string()]);
    assert_eq!(executor.metrics().counter("quotes_failed").get(), 1);
}

#[test]
fn test_failure_report_serializes() -> anyhow::Result<()> {
    let registry = ModuleRegistry::new().with_module(FnRule::new(
        "broken",
        1,
        |_: &QuoteContext| Err(RuleError::invalid_value("volume_m3", "negative")),
    ));

    let err = PipelineExecutor::new()
        .execute(&plan(registry), request(ServiceType::Moving))
        .unwrap_err();
    let json = serde_json::to_value(err.failure_report())?;

    assert_eq!(json["module_id"], "broken");
    assert_eq!(json["position"], 0);
    assert!(json["error"].as_str().unwrap().contains("volume_m3"));
    assert_eq!(json["snapshot"]["request"]["service_type"], "moving");
    Ok(())
}

// ========== Determinism ==========

#[test]
fn test_runs_are_byte_identical() -> anyhow::Result<()> {
    let registry = ModuleRegistry::new()
        .with_module(add_cost("a", 3, CostCategory::Labor, 12.5))
        .with_module(add_cost("b", 1, CostCategory::Access, 40.0))
        .with_module(add_cost("c", 2, CostCategory::Access, 7.25).depends_on("a"));
    let plan = plan(registry);
    let executor = traced();

    let first = executor.execute(&plan, request(ServiceType::Moving))?.context;
    let second = executor.execute(&plan, request(ServiceType::Moving))?.context;

    assert_eq!(serde_json::to_string(&first)?, serde_json::to_string(&second)?);
    assert_eq!(
        first.activated_modules(),
        ["b".to_string(), "a".to_string(), "c".to_string()]
    );
    Ok(())
}

#[test]
fn test_each_run_gets_its_own_id() {
    let plan = plan(ModuleRegistry::new().with_module(add_cost("a", 1, CostCategory::Labor, 1.0)));
    let executor = traced();

    let first = executor.execute(&plan, request(ServiceType::Moving)).unwrap();
    let second = executor.execute(&plan, request(ServiceType::Moving)).unwrap();
    assert_ne!(first.trace.unwrap().run_id, second.trace.unwrap().run_id);
}

// ========== Additivity ==========

fn category() -> impl Strategy<Value = CostCategory> {
    prop_oneof![
        Just(CostCategory::Labor),
        Just(CostCategory::Access),
        Just(CostCategory::Temporal),
        Just(CostCategory::Handling),
    ]
}

proptest! {
    #[test]
    fn prop_category_totals_are_additive(
        entries in prop::collection::vec((category(), 0u32..100_000), 0..20)
    ) {
        let registry: ModuleRegistry = entries
            .iter()
            .enumerate()
            .map(|(i, (cat, cents))| {
                let id = format!("m{}", i);
                let amount = *cents as f64 / 100.0;
                let cat = *cat;
                let module_id = id.clone();
                let rule = FnRule::new(id, i as i32, move |ctx: &QuoteContext| {
                    ctx.with_accumulator(|acc| {
                        acc.add_cost(CostEntry::new(module_id.clone(), cat, "line", amount))
                    })
                });
                std::sync::Arc::new(rule) as std::sync::Arc<dyn relo_core::RuleModule>
            })
            .collect();

        let ctx = PipelineExecutor::new()
            .execute(&plan(registry), request(ServiceType::Moving))
            .unwrap()
            .context;

        for cat in [CostCategory::Labor, CostCategory::Access, CostCategory::Temporal, CostCategory::Handling] {
            let expected: f64 = entries
                .iter()
                .filter(|(c, _)| *c == cat)
                .map(|(_, cents)| *cents as f64 / 100.0)
                .sum();
            prop_assert!((ctx.cost_total_for(cat) - expected).abs() < 1e-6);
        }
        prop_assert_eq!(ctx.computed().map_or(0, |acc| acc.costs().len()), entries.len());
        prop_assert_eq!(ctx.activated_modules().len(), entries.len());
    }
}
