//! End-to-end behaviour of the shape-test harness against small targets.

use appseed::shape::{
    shape_test, Arg, ArgKindSpec, ProbeValue, ShapeConfig, ShapeOutcome, TypeTag,
    WRONG_ARGUMENT_ACCEPTED,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn kinds(names: &[&str]) -> ArgKindSpec {
    ArgKindSpec::parse(names).unwrap()
}

/// Calls the success callback for strings and the error callback otherwise.
fn register_custom_data(_: &(), args: Vec<Arg>) {
    if args[0].type_tag() == TypeTag::String {
        args[1].invoke();
    } else {
        args[2].invoke();
    }
}

#[tokio::test(start_paused = true)]
async fn correct_target_passes_after_nine_wrong_argument_calls() {
    let start = Instant::now();
    let report = shape_test(
        register_custom_data,
        &(),
        &kinds(&["string", "callback", "errorCallback"]),
        &ShapeConfig::default(),
    )
    .await;

    assert_eq!(report.outcome, ShapeOutcome::Passed);
    assert_eq!(report.counters.scheduled, 9);
    assert_eq!(report.counters.executed, 9);
    assert!(start.elapsed() < Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn always_succeeding_target_fails() {
    let report = shape_test(
        |_: &(), args: Vec<Arg>| {
            args[1].invoke();
        },
        &(),
        &kinds(&["string", "callback", "errorCallback"]),
        &ShapeConfig::default(),
    )
    .await;

    assert_eq!(
        report.outcome.into_parts(),
        (false, Some(WRONG_ARGUMENT_ACCEPTED.to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn callback_free_spec_passes_after_grace_period() {
    let calls = AtomicUsize::new(0);
    let start = Instant::now();
    let report = shape_test(
        |calls: &AtomicUsize, args: Vec<Arg>| {
            assert_eq!(args.len(), 2);
            calls.fetch_add(1, Ordering::SeqCst);
        },
        &calls,
        &kinds(&["number", "object"]),
        &ShapeConfig::default(),
    )
    .await;

    assert!(report.is_success());
    assert_eq!(calls.load(Ordering::SeqCst), 10);
    assert_eq!(report.counters.scheduled, 0);
    assert!(start.elapsed() >= Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn custom_grace_period_is_honoured() {
    let start = Instant::now();
    let config = ShapeConfig {
        grace_period: Duration::from_millis(250),
        probe_timeout: None,
    };
    let report = shape_test(|_: &(), _args: Vec<Arg>| {}, &(), &kinds(&[]), &config).await;

    assert!(report.is_success());
    assert_eq!(report.counters.invocations, 10);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(250) && elapsed < Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn various_never_marks_a_probe_bad() {
    let report = shape_test(
        |_: &(), args: Vec<Arg>| {
            // Would fail the run if a wrong-argument call were ever made.
            args[1].invoke();
        },
        &(),
        &kinds(&["various", "callback", "errorCallback"]),
        &ShapeConfig::default(),
    )
    .await;

    assert!(report.is_success());
    assert_eq!(report.counters.scheduled, 0);
    assert_eq!(report.counters.invocations, 10);
}

#[tokio::test(start_paused = true)]
async fn error_callbacks_from_other_tasks_complete_the_run() {
    let report = shape_test(
        |_: &(), args: Vec<Arg>| {
            if args[0].type_tag() != TypeTag::Boolean {
                let error_cb = args[1].clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    error_cb.invoke();
                });
            }
        },
        &(),
        &kinds(&["boolean", "errorCallback"]),
        &ShapeConfig::default(),
    )
    .await;

    assert!(report.is_success());
    assert_eq!(report.counters.scheduled, 8);
    assert_eq!(report.counters.executed, 8);
}

#[tokio::test(start_paused = true)]
async fn repeated_error_callback_counts_once_per_call() {
    let report = shape_test(
        |_: &(), args: Vec<Arg>| {
            if args[0].type_tag() != TypeTag::Number {
                args[1].invoke();
                args[1].invoke();
            }
        },
        &(),
        &kinds(&["number", "errorCallback"]),
        &ShapeConfig::default(),
    )
    .await;

    assert!(report.is_success());
    assert_eq!(report.counters.scheduled, 8);
    assert_eq!(report.counters.executed, 8);
}

#[tokio::test(start_paused = true)]
async fn silent_target_fails_when_probe_timeout_is_set() {
    let config = ShapeConfig {
        probe_timeout: Some(Duration::from_secs(5)),
        ..ShapeConfig::default()
    };
    let report = shape_test(
        |_: &(), _args: Vec<Arg>| {},
        &(),
        &kinds(&["string", "errorCallback"]),
        &config,
    )
    .await;

    assert_eq!(
        report.outcome,
        ShapeOutcome::Failed("target never answered 9 of 9 wrong-argument calls".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn correct_target_passes_with_probe_timeout_set() {
    let config = ShapeConfig {
        probe_timeout: Some(Duration::from_secs(5)),
        ..ShapeConfig::default()
    };
    let report = shape_test(
        register_custom_data,
        &(),
        &kinds(&["string", "callback", "errorCallback"]),
        &config,
    )
    .await;

    assert_eq!(report.outcome, ShapeOutcome::Passed);
    assert_eq!(report.counters.executed, 9);
}

#[tokio::test(start_paused = true)]
async fn accepted_wrong_argument_fails_with_probe_timeout_set() {
    let config = ShapeConfig {
        probe_timeout: Some(Duration::from_secs(5)),
        ..ShapeConfig::default()
    };
    let report = shape_test(
        |_: &(), args: Vec<Arg>| {
            args[1].invoke();
        },
        &(),
        &kinds(&["string", "callback", "errorCallback"]),
        &config,
    )
    .await;

    assert_eq!(
        report.outcome.into_parts(),
        (false, Some(WRONG_ARGUMENT_ACCEPTED.to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn partially_answering_target_reports_missing_calls() {
    let config = ShapeConfig {
        probe_timeout: Some(Duration::from_secs(1)),
        ..ShapeConfig::default()
    };
    let report = shape_test(
        |_: &(), args: Vec<Arg>| {
            // Forgets to answer for null.
            if args[0].probe() != Some(ProbeValue::Null) {
                args[1].invoke();
            }
        },
        &(),
        &kinds(&["string", "errorCallback"]),
        &config,
    )
    .await;

    assert_eq!(
        report.outcome.detail(),
        Some("target never answered 1 of 9 wrong-argument calls")
    );
}

#[tokio::test(start_paused = true)]
async fn panic_on_repeated_argument_is_tolerated() {
    let report = shape_test(
        |_: &(), args: Vec<Arg>| {
            if args[1].probe().is_some() {
                panic!("crashed on repeated argument");
            }
            args[1].invoke();
        },
        &(),
        &kinds(&["string", "errorCallback"]),
        &ShapeConfig::default(),
    )
    .await;

    assert!(report.is_success());
    assert_eq!(report.counters.panics, 10);
    assert_eq!(report.counters.invocations, 19);
}

#[tokio::test(start_paused = true)]
async fn panic_on_wrong_argument_fails_the_run() {
    let report = shape_test(
        |_: &(), args: Vec<Arg>| {
            if matches!(args[1], Arg::Callback(_)) {
                panic!("boom");
            }
        },
        &(),
        &kinds(&["number", "errorCallback"]),
        &ShapeConfig::default(),
    )
    .await;

    assert_eq!(
        report.outcome,
        ShapeOutcome::Failed("target panicked on wrong argument undefined: boom".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn late_success_callback_after_pass_is_ignored() {
    let stash: Arc<parking_lot::Mutex<Vec<Arg>>> = Arc::default();
    let report = shape_test(
        |stash: &parking_lot::Mutex<Vec<Arg>>, args: Vec<Arg>| {
            if args[0].type_tag() != TypeTag::String {
                args[2].invoke();
                stash.lock().push(args[1].clone());
            }
        },
        &*stash,
        &kinds(&["string", "callback", "errorCallback"]),
        &ShapeConfig::default(),
    )
    .await;
    assert!(report.is_success());

    // Firing success callbacks after settlement must not panic or change
    // the delivered report.
    for cb in stash.lock().iter() {
        cb.invoke();
    }
    assert!(report.is_success());
}

#[test]
fn unknown_kind_is_rejected() {
    let err = ArgKindSpec::parse(["string", "symbol"]).unwrap_err();
    assert!(err.to_string().contains("symbol"));
}
