//! Standard catalog run end to end through the compiler and executor

use chrono::NaiveDate;
use relo_compiler::{ExecutionPlan, ModuleRegistry, RegistryCompiler};
use relo_core::{
    Address, CostCategory, CostEntry, FnRule, LegalImpactType, QuoteContext, QuoteRequest,
    RequestFlags, RequirementType, RuleError, ServiceType, Severity,
};
use relo_rules::{ids, standard_modules, standard_registry, RuleCatalogConfig, ALWAYS_ON};
use relo_runtime::{ExecutorOptions, PipelineExecutor, RuntimeError};

fn standard_plan() -> ExecutionPlan {
    RegistryCompiler::new()
        .compile(&standard_registry(&RuleCatalogConfig::default()))
        .unwrap()
}

fn run(plan: &ExecutionPlan, request: QuoteRequest) -> QuoteContext {
    PipelineExecutor::new()
        .execute(plan, QuoteContext::new(request))
        .unwrap()
        .context
}

fn ground_floor_move() -> QuoteRequest {
    QuoteRequest::new(ServiceType::Moving)
        .with_pickup(Address::new("3 rue Neuve", "69001", "Lyon"), 0, false)
        .with_delivery(Address::new("8 avenue Foch", "69006", "Lyon"), 0, false)
        .with_volume(15.0)
        .with_distance(8.0)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn position(plan: &ExecutionPlan, id: &str) -> usize {
    plan.position(id).unwrap()
}

#[test]
fn test_standard_plan_order() {
    let plan = standard_plan();
    assert_eq!(plan.len(), 16);
    assert!(plan.warnings().is_empty());
    assert_eq!(&plan.module_ids()[..3], &ALWAYS_ON[..]);
    assert!(position(&plan, ids::ELEVATOR_FLOOR_CONSTRAINT) < position(&plan, ids::LIFT_REFUSAL));
    assert!(position(&plan, ids::LIFT_REFUSAL) < position(&plan, ids::LIFT_CROSS_SELL));
    assert!(position(&plan, ids::DISTANCE_CLASSIFICATION) < position(&plan, ids::LONG_DISTANCE));
}

#[test]
fn test_no_op_law() {
    let ctx = run(&standard_plan(), ground_floor_move());
    let acc = ctx.computed().unwrap();

    assert!(acc.costs().is_empty());
    assert!(acc.requirements().is_empty());
    assert!(acc.risks().is_empty());
    assert!(acc.legal_impacts().is_empty());
    assert!(acc.cross_sell_proposals().is_empty());
    assert_eq!(ctx.activated_modules(), ALWAYS_ON.map(String::from));
}

#[test]
fn test_scenario_a_fourth_floor_without_elevator() {
    let request = ground_floor_move().with_delivery(Address::default(), 4, false);
    let ctx = run(&standard_plan(), request);
    let acc = ctx.computed().unwrap();

    let lifts: Vec<_> = acc.requirements_of(&RequirementType::LiftRecommended).collect();
    assert_eq!(lifts.len(), 1);
    assert_eq!(lifts[0].severity, Severity::High);

    let entries = acc.entries_from(ids::ELEVATOR_FLOOR_CONSTRAINT);
    assert_eq!(entries.risks, 1);
    assert_eq!(acc.risks()[0].amount, 15.0);

    let trail = ctx.activated_modules();
    assert_eq!(
        trail.iter().filter(|id| *id == ids::ELEVATOR_FLOOR_CONSTRAINT).count(),
        1
    );
    // The lift is also proposed since it was not refused
    assert!(trail.contains(&ids::LIFT_CROSS_SELL.to_string()));
}

#[test]
fn test_scenario_b_weekend_surcharge() {
    let base = FnRule::new("base_rate", 50, |ctx: &QuoteContext| {
        ctx.with_accumulator(|acc| {
            acc.add_cost(CostEntry::new("base_rate", CostCategory::Labor, "Crew", 1000.0))
        })
    });
    let registry: ModuleRegistry = standard_registry(&RuleCatalogConfig::default()).with_module(base);
    let plan = RegistryCompiler::new().compile(&registry).unwrap();

    // Saturday
    let saturday = run(&plan, ground_floor_move().with_move_date(date(2024, 6, 15)));
    assert_eq!(saturday.cost_total_for(CostCategory::Temporal), 50.0);
    let acc = saturday.computed().unwrap();
    assert_eq!(acc.entries_from(ids::WEEKEND_SURCHARGE).costs, 1);
    assert_eq!(acc.entries_from(ids::WEEKEND_SURCHARGE).risks, 1);

    // Tuesday
    let tuesday = run(&plan, ground_floor_move().with_move_date(date(2024, 6, 18)));
    assert_eq!(tuesday.cost_total_for(CostCategory::Temporal), 0.0);
    assert!(!tuesday
        .activated_modules()
        .contains(&ids::WEEKEND_SURCHARGE.to_string()));
}

#[test]
fn test_scenario_c_lift_refused() {
    let refused = RequestFlags {
        lift_refused: true,
        ..Default::default()
    };
    let request = ground_floor_move()
        .with_delivery(Address::default(), 6, false)
        .with_flags(refused);
    let ctx = run(&standard_plan(), request);
    let acc = ctx.computed().unwrap();

    let types: Vec<&LegalImpactType> = acc.legal_impacts().iter().map(|l| &l.impact_type).collect();
    assert_eq!(
        types,
        vec![&LegalImpactType::LiabilityLimitation, &LegalImpactType::InsuranceCap]
    );
    assert_eq!(acc.insurance_notes().len(), 1);
    assert!(acc.has_flag("lift_refused"));
    let refusal_risk: f64 = acc
        .risks()
        .iter()
        .filter(|r| r.module_id == ids::LIFT_REFUSAL)
        .map(|r| r.amount)
        .sum();
    assert_eq!(refusal_risk, 25.0);
    // No lift is proposed once refused
    assert!(acc.cross_sell_proposals().is_empty());
}

#[test]
fn test_scenario_c_not_refused() {
    let request = ground_floor_move().with_delivery(Address::default(), 6, false);
    let ctx = run(&standard_plan(), request);
    let acc = ctx.computed().unwrap();

    assert!(acc.legal_impacts().is_empty());
    assert!(acc.insurance_notes().is_empty());
    assert!(!acc.has_flag("lift_refused"));
}

#[test]
fn test_cleaning_only_runs_always_on_modules() {
    let request = QuoteRequest::new(ServiceType::Cleaning)
        .with_delivery(Address::default(), 7, false)
        .with_volume(60.0)
        .with_declared_value(50_000.0);
    let ctx = run(&standard_plan(), request);

    assert_eq!(ctx.cost_total(), 0.0);
    assert_eq!(ctx.activated_modules(), ALWAYS_ON.map(String::from));
}

#[test]
fn test_storage_without_duration_aborts_run() {
    let flags = RequestFlags {
        temporary_storage: true,
        piano: true,
        ..Default::default()
    };
    let request = ground_floor_move().with_flags(flags);

    let err = PipelineExecutor::new()
        .execute(&standard_plan(), QuoteContext::new(request))
        .unwrap_err();
    let RuntimeError::ModuleFailed {
        module_id,
        source,
        snapshot,
        ..
    } = &err;

    assert_eq!(module_id, ids::TEMPORARY_STORAGE);
    assert!(matches!(source, RuleError::InvalidState(_)));
    // Heavy items ran before storage and is part of the snapshot
    assert_eq!(snapshot.cost_total_for(CostCategory::Handling), 250.0);
    assert!(!snapshot
        .activated_modules()
        .contains(&ids::TEMPORARY_STORAGE.to_string()));
}

#[test]
fn test_full_quote_trace() {
    let flags = RequestFlags {
        piano: true,
        delivery_narrow_street: true,
        temporary_storage: true,
        storage_duration_days: Some(14),
        ..Default::default()
    };
    let request = ground_floor_move()
        .with_pickup(Address::default(), 2, false)
        .with_distance(320.0)
        .with_volume(32.0)
        .with_declared_value(18_000.0)
        .with_flags(flags);

    let executor = PipelineExecutor::with_options(ExecutorOptions {
        collect_trace: true,
        record_metrics: false,
    });
    let result = executor
        .execute(&standard_plan(), QuoteContext::new(request))
        .unwrap();
    let trace = result.trace.unwrap();

    assert_eq!(trace.modules.len(), 16);
    let applied = trace.applied_ids();
    for id in [
        ids::STAIRS_CARRYING,
        ids::NARROW_STREET,
        ids::HEAVY_ITEMS,
        ids::LONG_DISTANCE,
        ids::TEMPORARY_STORAGE,
        ids::DECLARED_VALUE,
        ids::PACKING_CROSS_SELL,
    ] {
        assert!(applied.contains(&id), "{} should have applied", id);
    }
    assert_eq!(
        applied,
        result
            .context
            .activated_modules()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
    );

    let ctx = result.context;
    assert_eq!(ctx.cost_total_for(CostCategory::Access), 80.0 + 60.0);
    assert_eq!(ctx.cost_total_for(CostCategory::Distance), 324.0);
    assert_eq!(ctx.cost_total_for(CostCategory::Storage), 224.0);
}

#[test]
fn test_catalog_config_changes_behavior() {
    let config = RuleCatalogConfig {
        lift_floor_threshold: 2,
        ..Default::default()
    };
    let plan = RegistryCompiler::new()
        .compile(&standard_registry(&config))
        .unwrap();

    let request = ground_floor_move().with_delivery(Address::default(), 2, false);
    let ctx = run(&plan, request);
    assert!(ctx.has_requirement(&RequirementType::LiftRecommended));
    assert_eq!(ctx.cost_total_for(CostCategory::Access), 0.0);
}

#[test]
fn test_inapplicable_modules_return_an_equal_context() {
    let config = RuleCatalogConfig::default();
    let modules = standard_modules(&config);
    let plan = standard_plan();

    let requests = vec![
        ground_floor_move(),
        QuoteRequest::new(ServiceType::Cleaning).with_flags(RequestFlags {
            piano: true,
            temporary_storage: true,
            lift_refused: true,
            ..RequestFlags::default()
        }),
        ground_floor_move().with_declared_value(config.insurance_threshold),
        ground_floor_move().with_move_date(date(2024, 6, 4)),
        ground_floor_move()
            .with_delivery(Address::new("1 quai Est", "69002", "Lyon"), 3, false)
            .with_flags(RequestFlags {
                lift_refused: true,
                ..RequestFlags::default()
            }),
        ground_floor_move().with_distance(config.long_distance_threshold_km),
    ];

    for request in requests {
        let mut ctx = QuoteContext::new(request);

        // Check every module against each intermediate context of the run
        for planned in plan.iter() {
            for module in &modules {
                if !module.is_applicable(&ctx) {
                    let applied = module.apply(&ctx).unwrap();
                    assert_eq!(applied, ctx, "module '{}' changed a context it skips", module.id());
                }
            }

            let module = planned.module();
            if module.is_applicable(&ctx) {
                ctx = module.apply(&ctx).unwrap();
            }
        }
    }
}
