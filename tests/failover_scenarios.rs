//! ---
//! drc_section: "15-testing-qa-runbook"
//! drc_subsection: "integration-tests"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "End-to-end control-step scenarios against the simulation doubles."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
use std::sync::Arc;

use r_drc_common::config::DrcConfig;
use r_drc_core::{
    new_registry, FailoverStep, LifecycleState, PoolMember, Severity, StepError, StepMetrics,
    StepOutcome,
};
use r_drc_sim::{InMemoryPoolControl, RecordingNotifier, StaticPoolQuery};

const CONFIG: &str = r#"
    mode = "simulation"

    [primary]
    name = "app-primary"
    region = "eu-north-1"

    [standby]
    name = "app-standby"
    region = "eu-west-1"

    [notification]
    channel = "ops-failover"
"#;

fn config() -> DrcConfig {
    CONFIG.parse().expect("scenario config must parse")
}

fn step_with(
    query: StaticPoolQuery,
    control: Arc<InMemoryPoolControl>,
    notifier: Arc<RecordingNotifier>,
) -> FailoverStep {
    FailoverStep::new(&config(), Arc::new(query), control, notifier, None)
}

#[tokio::test]
async fn scenario_a_healthy_primary_takes_no_action() {
    let query = StaticPoolQuery::new().with_members(
        "app-primary",
        vec![PoolMember::new("m-1", LifecycleState::InService)],
    );
    let control = Arc::new(InMemoryPoolControl::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let outcome = step_with(query, control.clone(), notifier.clone())
        .run()
        .await
        .expect("healthy step succeeds");

    assert_eq!(outcome, StepOutcome::PrimaryHealthy);
    assert!(control.applied().is_empty());
    assert_eq!(notifier.publish_count(), 0);
}

#[tokio::test]
async fn scenario_b_empty_primary_activates_standby() {
    let query = StaticPoolQuery::new().with_members("app-primary", vec![]);
    let control = Arc::new(InMemoryPoolControl::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let outcome = step_with(query, control.clone(), notifier.clone())
        .run()
        .await
        .expect("failover step succeeds");

    assert!(matches!(outcome, StepOutcome::FailoverActivated { .. }));
    let capacity = control.capacity("app-standby").expect("standby updated");
    assert_eq!(capacity.min_size, 1);
    assert_eq!(capacity.desired_capacity, 1);

    let published = notifier.published();
    assert_eq!(published.len(), 1);
    let (channel, event) = &published[0];
    assert_eq!(channel, "ops-failover");
    assert_eq!(event.severity, Severity::Info);
    assert!(event.message.contains("app-standby"));
}

#[tokio::test]
async fn scenario_c_all_terminated_behaves_like_empty() {
    let query = StaticPoolQuery::new().with_members(
        "app-primary",
        vec![
            PoolMember::new("m-1", LifecycleState::Terminated),
            PoolMember::new("m-2", LifecycleState::Terminated),
        ],
    );
    let control = Arc::new(InMemoryPoolControl::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let outcome = step_with(query, control.clone(), notifier.clone())
        .run()
        .await
        .expect("failover step succeeds");

    assert!(matches!(outcome, StepOutcome::FailoverActivated { .. }));
    assert_eq!(control.capacity("app-standby").unwrap().desired_capacity, 1);
    assert_eq!(notifier.publish_count(), 1);
}

#[tokio::test]
async fn scenario_d_query_failure_escalates_and_reraises() {
    let query = StaticPoolQuery::failing("connection refused");
    let control = Arc::new(InMemoryPoolControl::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let err = step_with(query, control.clone(), notifier.clone())
        .run()
        .await
        .expect_err("step must fail");

    assert!(matches!(err, StepError::Query(_)));
    assert!(control.applied().is_empty(), "actuator must never run");

    let published = notifier.published();
    assert_eq!(published.len(), 1);
    let (_, event) = &published[0];
    assert_eq!(event.severity, Severity::Error);
    assert!(event.message.contains("connection refused"));
}

#[tokio::test]
async fn overlapping_invocations_converge_without_error() {
    let query_a = StaticPoolQuery::new().with_members("app-primary", vec![]);
    let query_b = StaticPoolQuery::new().with_members("app-primary", vec![]);
    let control = Arc::new(InMemoryPoolControl::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let step_a = step_with(query_a, control.clone(), notifier.clone());
    let step_b = step_with(query_b, control.clone(), notifier.clone());
    let (first, second) = tokio::join!(step_a.run(), step_b.run());

    first.expect("first overlapping step succeeds");
    second.expect("second overlapping step succeeds");
    let capacity = control.capacity("app-standby").unwrap();
    assert_eq!(capacity.min_size, 1);
    assert_eq!(capacity.desired_capacity, 1);
    assert_eq!(control.applied().len(), 2);
}

#[tokio::test]
async fn metrics_label_each_outcome_class() {
    let registry = new_registry();
    let metrics = StepMetrics::new(registry.clone()).unwrap();

    let query = StaticPoolQuery::new().with_members("app-primary", vec![]);
    let control = Arc::new(InMemoryPoolControl::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let step = FailoverStep::new(
        &config(),
        Arc::new(query),
        control,
        notifier,
        Some(metrics),
    );
    step.run().await.expect("failover step succeeds");

    let families = registry.gather();
    let steps = families
        .iter()
        .find(|fam| fam.get_name() == "r_drc_steps_total")
        .expect("steps counter registered");
    let metric = &steps.get_metric()[0];
    assert_eq!(metric.get_label()[0].get_value(), "failover");
    assert_eq!(metric.get_counter().get_value(), 1.0);

    let failovers = families
        .iter()
        .find(|fam| fam.get_name() == "r_drc_failovers_total")
        .expect("failover counter registered");
    assert_eq!(failovers.get_metric()[0].get_counter().get_value(), 1.0);
}
