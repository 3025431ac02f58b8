//! Integration tests for the sprint tick loop
//!
//! These tests run whole simulations and check:
//! - The end-to-end external reviewer scenario
//! - Termination bounds on recorded ticks
//! - Greedy, order-dependent assignment
//! - Removal of completed features from later snapshots
//! - The opt-in review rework loop

use sprint_sim::core::calendar::Tick;
use sprint_sim::core::config::SimulationConfig;
use sprint_sim::core::types::WorkerId;
use sprint_sim::sprint::{
    Feature, FirstMatchStrategy, LeastRemainingStrategy, RandomRejection, RunOutcome, Simulator,
    Stage, Worker,
};

fn feature(name: &str, stages: &[(Stage, f64)], initial: Stage) -> Feature {
    Feature::new(name, stages.iter().copied(), initial, 0.2).unwrap()
}

fn simulator(workers: Vec<Worker>, features: Vec<Feature>) -> Simulator {
    Simulator::new(
        workers,
        features,
        Box::new(FirstMatchStrategy),
        SimulationConfig::default(),
    )
}

// ============================================================================
// External Reviewer Scenario
// ============================================================================

/// Development 10.0 with one assigned developer and one unassigned reviewer,
/// both at 1.0 effort per tick:
/// 1. Review is derived at 2.0
/// 2. Development finishes after 10 ticks
/// 3. The reviewer finishes Review in 2 more ticks
/// 4. The feature completes at tick 12, long before the 5 day bound
#[test]
fn test_external_reviewer_completes_feature() {
    let dev = Worker::developer("Dev", 8.0);
    let reviewer = Worker::developer("Reviewer", 8.0);
    let mut login = feature("Login", &[(Stage::Development, 10.0)], Stage::Development);
    login.assign(&dev);
    assert_eq!(login.remaining(Stage::Review), 2.0);

    let mut sim = simulator(vec![dev, reviewer], vec![login]);
    let outcome = sim.run(5).unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Completed {
            ticks: 12,
            finished_at: Tick { day: 2, slot: 4 },
        }
    );

    let timeline = sim.history().feature_timeline("Login");
    assert_eq!(timeline.len(), 12);
    assert_eq!(timeline[9].current_stage, Stage::Development);
    assert_eq!(timeline[9].remaining[&Stage::Development], 0.0);
    assert_eq!(timeline[10].current_stage, Stage::Review);
    assert!(timeline[11].is_done);

    let reviewer_ticks = sim.history().worker_timeline("Reviewer");
    assert!(reviewer_ticks[..10].iter().all(|w| !w.has_worked));
    assert!(reviewer_ticks[10..].iter().all(|w| w.has_worked));

    let dev_ticks = sim.history().worker_timeline("Dev");
    assert!(dev_ticks[..10].iter().all(|w| w.has_worked));
    assert!(dev_ticks[10..]
        .iter()
        .all(|w| w.current_task.as_deref() == Some("Idle")));
}

#[test]
fn test_full_pipeline_with_all_roles() {
    let analyst = Worker::analyst("Analyst", 8.0);
    let dev = Worker::developer("Dev", 8.0);
    let qa = Worker::qa("QA", 8.0);
    let reviewer = Worker::developer("Reviewer", 8.0);

    let mut checkout = feature(
        "Checkout",
        &[
            (Stage::Analytics, 2.0),
            (Stage::Development, 4.0),
            (Stage::Testing, 2.0),
        ],
        Stage::Analytics,
    );
    checkout.assign(&analyst);
    checkout.assign(&dev);
    checkout.assign(&qa);

    let mut sim = simulator(vec![analyst, dev, qa, reviewer], vec![checkout]);
    let outcome = sim.run(5).unwrap();

    // 2 analytics + 4 development + 1 review (0.8) + 2 testing
    assert!(outcome.is_completed());
    assert_eq!(outcome.ticks(), 9);
    assert_eq!(sim.completed_features().len(), 1);

    let first = sim.history().first().unwrap();
    assert_eq!(first.tick, Tick { day: 1, slot: 1 });
    assert_eq!(first.workers[0].current_task.as_deref(), Some("Checkout"));
}

// ============================================================================
// Termination
// ============================================================================

#[test]
fn test_max_days_bounds_recorded_ticks() {
    let qa = Worker::qa("QA", 8.0);
    let mut slow = feature("Slow", &[(Stage::Testing, 100.0)], Stage::Testing);
    slow.assign(&qa);

    let mut sim = simulator(vec![qa], vec![slow]);
    let outcome = sim.run(2).unwrap();

    assert_eq!(
        outcome,
        RunOutcome::MaxDaysReached {
            ticks: 16,
            incomplete: vec!["Slow".to_string()],
        }
    );
    assert_eq!(sim.history().len(), 16);
    assert_eq!(sim.features()[0].remaining(Stage::Testing), 84.0);
}

#[test]
fn test_early_completion_stops_clock() {
    let qa = Worker::qa("QA", 8.0);
    let mut quick = feature("Quick", &[(Stage::Testing, 3.0)], Stage::Testing);
    quick.assign(&qa);

    let mut sim = simulator(vec![qa], vec![quick]);
    let outcome = sim.run(10).unwrap();

    assert_eq!(outcome.ticks(), 3);
    assert!(sim.history().len() < 10 * 8);
}

#[test]
fn test_custom_ticks_per_day() {
    let qa = Worker::qa("QA", 8.0);
    let mut slow = feature("Slow", &[(Stage::Testing, 100.0)], Stage::Testing);
    slow.assign(&qa);

    let config = SimulationConfig::default().with_ticks_per_day(4);
    let mut sim = Simulator::new(vec![qa], vec![slow], Box::new(FirstMatchStrategy), config);
    sim.run(3).unwrap();

    assert_eq!(sim.history().len(), 12);
    // 8.0 per day over 4 ticks is 2.0 per tick
    assert_eq!(sim.features()[0].remaining(Stage::Testing), 76.0);
    assert_eq!(sim.history().last().unwrap().tick, Tick { day: 3, slot: 4 });
}

// ============================================================================
// Greedy Assignment Order
// ============================================================================

/// Two testers, one shared feature that a single tick finishes, and a second
/// feature only the second tester may work. Worker order decides who idles.
#[test]
fn test_worker_order_changes_outcome() {
    let build = |order: &[&str]| {
        let qa1 = Worker::qa("QA1", 8.0);
        let qa2 = Worker::qa("QA2", 8.0);

        let mut shared = feature("Shared", &[(Stage::Testing, 0.5)], Stage::Testing);
        shared.assign(&qa1);
        shared.assign(&qa2);
        let mut own = feature("Own", &[(Stage::Testing, 1.0)], Stage::Testing);
        own.assign(&qa2);

        let workers = order
            .iter()
            .map(|name| if *name == "QA1" { qa1.clone() } else { qa2.clone() })
            .collect();

        let mut sim = simulator(workers, vec![shared, own]);
        sim.process_tick(Tick { day: 1, slot: 1 });
        sim
    };

    let sim = build(&["QA1", "QA2"][..]);
    let snap = sim.history().first().unwrap();
    assert_eq!(snap.workers[0].current_task.as_deref(), Some("Shared"));
    assert_eq!(snap.workers[1].current_task.as_deref(), Some("Own"));
    assert!(sim.features().is_empty());

    let sim = build(&["QA2", "QA1"][..]);
    let snap = sim.history().first().unwrap();
    assert_eq!(snap.workers[0].current_task.as_deref(), Some("Shared"));
    assert_eq!(snap.workers[1].current_task.as_deref(), Some("Idle"));
    assert_eq!(sim.features().len(), 1);
}

/// Every eligible assignee works the same feature in one tick, so two
/// developers halve the Development time.
#[test]
fn test_assignees_share_feature_within_tick() {
    let a = Worker::developer("A", 8.0);
    let b = Worker::developer("B", 8.0);
    let reviewer = Worker::developer("Reviewer", 8.0);
    let mut f = feature("Pair", &[(Stage::Development, 4.0)], Stage::Development);
    f.assign(&a);
    f.assign(&b);

    let mut sim = simulator(vec![a, b, reviewer], vec![f]);
    let outcome = sim.run(1).unwrap();

    // 2 ticks of paired development + 1 tick of review (0.8)
    assert_eq!(outcome.ticks(), 3);
    let first = sim.history().first().unwrap();
    assert!(first.workers[0].has_worked);
    assert!(first.workers[1].has_worked);
    assert_eq!(first.features[0].remaining[&Stage::Development], 2.0);
    assert_eq!(sim.completed_features()[0].contributors().len(), 2);
}

#[test]
fn test_least_remaining_strategy_prefers_nearly_done_feature() {
    let qa = Worker::qa("QA", 8.0);
    let mut big = feature("Big", &[(Stage::Testing, 5.0)], Stage::Testing);
    let mut small = feature("Small", &[(Stage::Testing, 1.0)], Stage::Testing);
    big.assign(&qa);
    small.assign(&qa);

    let mut sim = Simulator::new(
        vec![qa],
        vec![big, small],
        Box::new(LeastRemainingStrategy),
        SimulationConfig::default(),
    );
    sim.process_tick(Tick { day: 1, slot: 1 });

    assert_eq!(sim.completed_features()[0].name(), "Small");
    assert_eq!(sim.features()[0].name(), "Big");
}

// ============================================================================
// Snapshots
// ============================================================================

#[test]
fn test_completed_features_leave_later_snapshots() {
    let qa = Worker::qa("QA", 16.0);
    let mut a = feature("A", &[(Stage::Testing, 2.0)], Stage::Testing);
    let mut b = feature("B", &[(Stage::Testing, 2.0)], Stage::Testing);
    a.assign(&qa);
    b.assign(&qa);

    let mut sim = simulator(vec![qa], vec![a, b]);
    sim.run(1).unwrap();

    let snaps = sim.history().snapshots();
    assert_eq!(snaps.len(), 2);
    assert_eq!(snaps[0].features.len(), 2);
    assert!(snaps[0].features[0].is_done);
    assert_eq!(snaps[1].features.len(), 1);
    assert_eq!(snaps[1].features[0].name, "B");
}

#[test]
fn test_snapshot_records_contributors() {
    let dev = Worker::developer("Dev", 8.0);
    let reviewer = Worker::developer("Reviewer", 8.0);
    let mut api = feature("API", &[(Stage::Development, 1.0)], Stage::Development);
    api.assign(&dev);

    let mut sim = simulator(vec![dev, reviewer], vec![api]);
    sim.run(1).unwrap();

    let last = sim.history().last().unwrap();
    let contributors: Vec<&WorkerId> = last.features[0].contributors.iter().collect();
    assert_eq!(contributors, vec![&WorkerId::from("Dev")]);
}

#[test]
fn test_stage_order_monotonic_over_run() {
    let analyst = Worker::analyst("Analyst", 3.0);
    let dev = Worker::developer("Dev", 5.0);
    let qa = Worker::qa("QA", 7.0);
    let reviewer = Worker::developer("Reviewer", 2.0);

    let mut f = feature(
        "F",
        &[
            (Stage::Analytics, 1.5),
            (Stage::Development, 3.3),
            (Stage::Testing, 1.1),
        ],
        Stage::Analytics,
    );
    f.assign(&analyst);
    f.assign(&dev);
    f.assign(&qa);

    let mut sim = simulator(vec![analyst, dev, qa, reviewer], vec![f]);
    assert!(sim.run(10).unwrap().is_completed());

    let stages: Vec<usize> = sim
        .history()
        .feature_timeline("F")
        .iter()
        .map(|s| s.current_stage.index())
        .collect();
    assert!(stages.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(stages.first(), Some(&0));
    assert_eq!(stages.last(), Some(&3));
}

// ============================================================================
// Review Rework Loop
// ============================================================================

#[test]
fn test_certain_rejection_sends_feature_back() {
    let dev = Worker::developer("Dev", 8.0);
    let reviewer = Worker::developer("Reviewer", 8.0);
    let mut f = feature("F", &[(Stage::Development, 2.0)], Stage::Development);
    f.assign(&dev);

    let mut sim = simulator(vec![dev, reviewer], vec![f])
        .with_review_policy(Box::new(RandomRejection::new(1.0, 0.5, 3)));
    let outcome = sim.run(1).unwrap();

    assert!(!outcome.is_completed());
    let stages: Vec<Stage> = sim
        .history()
        .feature_timeline("F")
        .iter()
        .map(|s| s.current_stage)
        .collect();
    let review_at = stages.iter().position(|s| *s == Stage::Review).unwrap();
    assert!(stages[review_at..].contains(&Stage::Development));
}

#[test]
fn test_reworked_feature_still_reviewed_by_non_contributor() {
    let dev = Worker::developer("Dev", 8.0);
    let reviewer = Worker::developer("Reviewer", 8.0);
    let mut f = feature("F", &[(Stage::Development, 2.0)], Stage::Development);
    f.assign(&dev);

    let mut sim = simulator(vec![dev, reviewer], vec![f])
        .with_review_policy(Box::new(RandomRejection::new(1.0, 0.5, 3)));
    sim.run(2).unwrap();

    for snap in sim.history().snapshots() {
        let f = &snap.features[0];
        let reviewer = snap.workers.iter().find(|w| w.name == "Reviewer").unwrap();
        if reviewer.has_worked {
            assert!(!f.contributors.contains(&WorkerId::from("Reviewer")));
        }
        let dev = snap.workers.iter().find(|w| w.name == "Dev").unwrap();
        if f.current_stage == Stage::Review && f.remaining[&Stage::Review] > 0.0 {
            assert!(!dev.has_worked);
        }
    }
}

#[test]
fn test_zero_rejection_matches_default_policy() {
    let run = |with_policy: bool| {
        let dev = Worker::developer("Dev", 8.0);
        let reviewer = Worker::developer("Reviewer", 8.0);
        let mut f = feature("F", &[(Stage::Development, 3.0)], Stage::Development);
        f.assign(&dev);
        let mut sim = simulator(vec![dev, reviewer], vec![f]);
        if with_policy {
            sim = sim.with_review_policy(Box::new(RandomRejection::new(0.0, 0.5, 1)));
        }
        sim.run(2).unwrap()
    };

    assert_eq!(run(true), run(false));
}
