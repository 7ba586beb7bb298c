//! Argument shape-testing harness.
//!
//! Calls a target with every value of the probe universe, first with the value
//! repeated in every position and then, for values that break at least one
//! declared type, with instrumented callbacks in the callback positions. The
//! run settles exactly once:
//!
//! - `Failed` as soon as a success callback fires after a wrong argument, or
//!   a wrong-argument call panics
//! - `Passed` once every wrong-argument call has reported through its error
//!   callback
//! - `Passed` after the grace period when nothing was scheduled
//!
//! A target that never answers keeps the run pending unless
//! [`ShapeConfig::probe_timeout`] is set.

use super::kind::{ArgKind, ArgKindSpec};
use super::probe::{Arg, Callback, ProbeValue};
use crate::observability::{set_phase, RunPhase};
use parking_lot::Mutex;
use serde::Serialize;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

/// Failure detail reported when a target accepts a wrong argument.
pub const WRONG_ARGUMENT_ACCEPTED: &str = "success callback was fired after receiving wrong argument";

/// Wait applied when no wrong-argument call was scheduled, giving synchronous
/// targets time to misbehave on a later tick.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeConfig {
    pub grace_period: Duration,
    /// Upper bound on waiting for error callbacks. `None` waits forever.
    pub probe_timeout: Option<Duration>,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            probe_timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum ShapeOutcome {
    Passed,
    Failed(String),
}

impl ShapeOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Passed)
    }

    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failed(detail) => Some(detail),
        }
    }

    /// The `(success, detail)` pair a completion callback would receive.
    #[must_use]
    pub fn into_parts(self) -> (bool, Option<String>) {
        match self {
            Self::Passed => (true, None),
            Self::Failed(detail) => (false, Some(detail)),
        }
    }
}

/// Counters of one run, snapshotted when the outcome is settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProbeCounters {
    /// Total target invocations.
    pub invocations: usize,
    /// Wrong-argument calls dispatched with instrumented callbacks.
    pub scheduled: usize,
    /// Distinct wrong-argument calls whose error callback fired.
    pub executed: usize,
    /// Invocations that panicked.
    pub panics: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeReport {
    pub outcome: ShapeOutcome,
    pub counters: ProbeCounters,
}

impl ShapeReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

struct RunState {
    counters: ProbeCounters,
    dispatch_finished: bool,
    settle: Option<oneshot::Sender<ShapeReport>>,
}

impl RunState {
    fn settle(&mut self, outcome: ShapeOutcome) -> bool {
        let Some(tx) = self.settle.take() else {
            trace!(?outcome, "run already settled, ignoring outcome");
            return false;
        };
        debug!(?outcome, counters = ?self.counters, "shape test settled");
        let _ = tx.send(ShapeReport {
            outcome,
            counters: self.counters,
        });
        true
    }

    fn all_answered(&self) -> bool {
        self.dispatch_finished && self.counters.executed >= self.counters.scheduled
    }
}

/// Shared by every synthetic callback of one run.
struct RunContext {
    state: Mutex<RunState>,
}

impl RunContext {
    fn new(settle: oneshot::Sender<ShapeReport>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(RunState {
                counters: ProbeCounters::default(),
                dispatch_finished: false,
                settle: Some(settle),
            }),
        })
    }

    fn settle(&self, outcome: ShapeOutcome) -> bool {
        self.state.lock().settle(outcome)
    }

    fn success_fired(&self) {
        warn!("{}", WRONG_ARGUMENT_ACCEPTED);
        self.settle(ShapeOutcome::Failed(WRONG_ARGUMENT_ACCEPTED.to_string()));
    }

    fn error_fired(&self) {
        let mut state = self.state.lock();
        state.counters.executed += 1;
        if state.all_answered() {
            state.settle(ShapeOutcome::Passed);
        }
    }

    fn record_invocation(&self, panicked: bool) {
        let mut state = self.state.lock();
        state.counters.invocations += 1;
        if panicked {
            state.counters.panics += 1;
        }
    }

    fn schedule(&self) {
        self.state.lock().counters.scheduled += 1;
    }

    /// Marks dispatch finished and returns the scheduled count.
    fn finish_dispatch(&self) -> usize {
        let mut state = self.state.lock();
        state.dispatch_finished = true;
        if state.counters.scheduled > 0 && state.all_answered() {
            state.settle(ShapeOutcome::Passed);
        }
        state.counters.scheduled
    }

    fn unanswered(&self) -> (usize, usize) {
        let state = self.state.lock();
        let counters = state.counters;
        (
            counters.scheduled.saturating_sub(counters.executed),
            counters.scheduled,
        )
    }
}

/// Argument lists for one probe value.
pub struct ProbeRound {
    pub value: ProbeValue,
    /// The probe value repeated in every position.
    pub all_same: Vec<Arg>,
    /// The probe value in typed positions, instrumented callbacks elsewhere.
    pub targeted_bad: Vec<Arg>,
    /// Whether some typed position rejects the probe value.
    pub bad: bool,
}

impl ProbeRound {
    fn build(value: ProbeValue, kinds: &ArgKindSpec, ctx: &Arc<RunContext>) -> Self {
        let all_same = vec![Arg::Probe(value); kinds.arity()];
        // One error callback per call so repeated firing counts once.
        let answered = Arc::new(AtomicBool::new(false));
        let targeted_bad = kinds
            .kinds()
            .iter()
            .map(|kind| match kind {
                ArgKind::Callback => {
                    let ctx = Arc::clone(ctx);
                    Arg::Callback(Callback::new(move || ctx.success_fired()))
                }
                ArgKind::ErrorCallback => {
                    let ctx = Arc::clone(ctx);
                    let answered = Arc::clone(&answered);
                    Arg::Callback(Callback::new(move || {
                        if answered.swap(true, Ordering::SeqCst) {
                            trace!(probe = %value, "error callback fired again, ignored");
                        } else {
                            ctx.error_fired();
                        }
                    }))
                }
                _ => Arg::Probe(value),
            })
            .collect();

        Self {
            value,
            all_same,
            targeted_bad,
            bad: kinds.is_bad(value),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Shape-test `target`, invoked against `context`, with arguments shaped by
/// `kinds`.
///
/// # Example
///
/// ```rust
/// use appseed::shape::{shape_test, Arg, ArgKindSpec, ShapeConfig, TypeTag};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let kinds = ArgKindSpec::parse(["string", "callback", "errorCallback"]).unwrap();
/// let report = shape_test(
///     |_: &(), args: Vec<Arg>| {
///         if args[0].type_tag() == TypeTag::String {
///             args[1].invoke();
///         } else {
///             args[2].invoke();
///         }
///     },
///     &(),
///     &kinds,
///     &ShapeConfig::default(),
/// )
/// .await;
/// assert!(report.is_success());
/// # });
/// ```
pub async fn shape_test<C, F>(
    target: F,
    context: &C,
    kinds: &ArgKindSpec,
    config: &ShapeConfig,
) -> ShapeReport
where
    C: ?Sized,
    F: Fn(&C, Vec<Arg>),
{
    let (tx, mut rx) = oneshot::channel();
    let ctx = RunContext::new(tx);
    let has_callback = kinds.has_callback();

    {
        let _phase = set_phase(RunPhase::ShapeTesting);
        for value in ProbeValue::UNIVERSE {
            let round = ProbeRound::build(value, kinds, &ctx);

            let all_same = catch_unwind(AssertUnwindSafe(|| target(context, round.all_same)));
            if let Err(payload) = &all_same {
                warn!(
                    probe = %value,
                    "target panicked on repeated argument: {}",
                    panic_message(&**payload)
                );
            }
            ctx.record_invocation(all_same.is_err());

            if !(round.bad && has_callback) {
                trace!(probe = %value, bad = round.bad, "skipping wrong-argument call");
                continue;
            }

            ctx.schedule();
            debug!(probe = %value, "dispatching wrong-argument call");
            let targeted = catch_unwind(AssertUnwindSafe(|| target(context, round.targeted_bad)));
            ctx.record_invocation(targeted.is_err());
            if let Err(payload) = targeted {
                let message = panic_message(&*payload);
                warn!(probe = %value, "target panicked on wrong argument: {}", message);
                ctx.settle(ShapeOutcome::Failed(format!(
                    "target panicked on wrong argument {}: {}",
                    value, message
                )));
            }
        }
    }

    let scheduled = ctx.finish_dispatch();
    if scheduled == 0 {
        debug!(
            grace_ms = config.grace_period.as_millis() as u64,
            "no wrong-argument calls scheduled, waiting grace period"
        );
        tokio::time::sleep(config.grace_period).await;
        ctx.settle(ShapeOutcome::Passed);
    } else if let Some(limit) = config.probe_timeout {
        match tokio::time::timeout(limit, &mut rx).await {
            Ok(received) => return received_report(received),
            Err(_) => {
                let (missing, scheduled) = ctx.unanswered();
                ctx.settle(ShapeOutcome::Failed(format!(
                    "target never answered {} of {} wrong-argument calls",
                    missing, scheduled
                )));
            }
        }
    }

    received_report(rx.await)
}

fn received_report(received: Result<ShapeReport, oneshot::error::RecvError>) -> ShapeReport {
    match received {
        Ok(report) => report,
        // The sender lives in `ctx`, which outlives every await on `rx`.
        Err(_) => ShapeReport {
            outcome: ShapeOutcome::Failed("shape test ended without an outcome".to_string()),
            counters: ProbeCounters::default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::TypeTag;
    use std::sync::atomic::AtomicUsize;

    fn kinds(names: &[&str]) -> ArgKindSpec {
        ArgKindSpec::parse(names).unwrap()
    }

    #[test]
    fn test_probe_round_all_same_repeats_value() {
        let (tx, _rx) = oneshot::channel();
        let ctx = RunContext::new(tx);
        let round = ProbeRound::build(
            ProbeValue::IntZero,
            &kinds(&["string", "callback", "errorCallback"]),
            &ctx,
        );

        assert_eq!(round.all_same.len(), 3);
        assert!(round
            .all_same
            .iter()
            .all(|arg| arg.probe() == Some(ProbeValue::IntZero)));
        assert!(round.bad);
    }

    #[test]
    fn test_probe_round_targeted_bad_places_callbacks() {
        let (tx, _rx) = oneshot::channel();
        let ctx = RunContext::new(tx);
        let round = ProbeRound::build(
            ProbeValue::Null,
            &kinds(&["callback", "string", "errorCallback"]),
            &ctx,
        );

        assert!(matches!(round.targeted_bad[0], Arg::Callback(_)));
        assert_eq!(round.targeted_bad[1].probe(), Some(ProbeValue::Null));
        assert!(matches!(round.targeted_bad[2], Arg::Callback(_)));
    }

    #[test]
    fn test_settle_only_once() {
        let (tx, mut rx) = oneshot::channel();
        let ctx = RunContext::new(tx);

        assert!(ctx.settle(ShapeOutcome::Failed("first".into())));
        assert!(!ctx.settle(ShapeOutcome::Passed));

        let report = rx.try_recv().unwrap();
        assert_eq!(report.outcome, ShapeOutcome::Failed("first".into()));
    }

    #[test]
    fn test_error_callback_before_dispatch_finishes_does_not_settle() {
        let (tx, mut rx) = oneshot::channel();
        let ctx = RunContext::new(tx);
        ctx.schedule();
        ctx.error_fired();
        assert!(rx.try_recv().is_err());

        assert_eq!(ctx.finish_dispatch(), 1);
        assert!(rx.try_recv().unwrap().is_success());
    }

    #[test]
    fn test_outcome_into_parts() {
        assert_eq!(ShapeOutcome::Passed.into_parts(), (true, None));
        assert_eq!(
            ShapeOutcome::Failed("x".into()).into_parts(),
            (false, Some("x".to_string()))
        );
    }

    #[test]
    fn test_panic_message_variants() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*boxed), "static");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*boxed), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(&*boxed), "Unknown panic");
    }

    #[tokio::test(start_paused = true)]
    async fn test_synchronous_error_callbacks_pass_without_grace() {
        let spec = kinds(&["string", "callback", "errorCallback"]);
        let report = shape_test(
            |_: &(), args: Vec<Arg>| {
                if args[0].type_tag() == TypeTag::String {
                    args[1].invoke();
                } else {
                    args[2].invoke();
                }
            },
            &(),
            &spec,
            &ShapeConfig::default(),
        )
        .await;

        assert!(report.is_success());
        assert_eq!(report.counters.scheduled, 9);
        assert_eq!(report.counters.executed, 9);
        assert_eq!(report.counters.invocations, 19);
    }

    #[tokio::test(start_paused = true)]
    async fn test_context_is_passed_to_target() {
        let calls = AtomicUsize::new(0);
        let spec = kinds(&["number"]);
        let report = shape_test(
            |counter: &AtomicUsize, _args| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            &calls,
            &spec,
            &ShapeConfig::default(),
        )
        .await;

        assert!(report.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 10);
    }
}
