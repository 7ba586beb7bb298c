//! Shape testing: call an API with deliberately mismatched argument types and
//! confirm it fails safely instead of crashing or silently succeeding.
//!
//! ```rust,ignore
//! use appseed::shape::{shape_test, ArgKindSpec, ShapeConfig};
//!
//! let kinds = ArgKindSpec::parse(["string", "callback", "errorCallback"])?;
//! let report = shape_test(register_custom_data, &app, &kinds, &ShapeConfig::default()).await;
//! assert!(report.is_success(), "{:?}", report.outcome);
//! ```

pub mod harness;
pub mod kind;
pub mod probe;

pub use harness::{
    shape_test, ProbeCounters, ProbeRound, ShapeConfig, ShapeOutcome, ShapeReport,
    DEFAULT_GRACE_PERIOD, WRONG_ARGUMENT_ACCEPTED,
};
pub use kind::{ArgKind, ArgKindSpec, KindParseError};
pub use probe::{Arg, Callback, ProbeValue, TypeTag};
