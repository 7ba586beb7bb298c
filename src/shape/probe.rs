//! The fixed universe of probe values and the runtime type tags they report.
//!
//! Probe values are deliberately heterogeneous: one representative for every
//! runtime type a loosely-typed API might receive, plus the "falsy" edge
//! cases (`0`, `""`, `false`, null) that validation code tends to mishandle.
//! Type tags follow `typeof` semantics, so `Null`, `EmptyStruct` and
//! `EmptySequence` all report [`TypeTag::Object`].

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Runtime type of an argument as seen by the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Undefined,
    Object,
    Boolean,
    Number,
    String,
    Function,
}

impl TypeTag {
    pub const ALL: [TypeTag; 6] = [
        TypeTag::Undefined,
        TypeTag::Object,
        TypeTag::Boolean,
        TypeTag::Number,
        TypeTag::String,
        TypeTag::Function,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Object => "object",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or(())
    }
}

/// One member of the probe universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProbeValue {
    Absent,
    Null,
    BoolTrue,
    BoolFalse,
    IntZero,
    Fraction,
    EmptyText,
    EmptyStruct,
    EmptySequence,
    NoOpCallable,
}

impl ProbeValue {
    /// Every probe value, in dispatch order. The order never changes between
    /// runs so that a failing probe can be reproduced.
    pub const UNIVERSE: [ProbeValue; 10] = [
        ProbeValue::Absent,
        ProbeValue::Null,
        ProbeValue::BoolTrue,
        ProbeValue::BoolFalse,
        ProbeValue::IntZero,
        ProbeValue::Fraction,
        ProbeValue::EmptyText,
        ProbeValue::EmptyStruct,
        ProbeValue::EmptySequence,
        ProbeValue::NoOpCallable,
    ];

    /// The non-integer number carried by [`ProbeValue::Fraction`].
    pub const FRACTION: f64 = 0.01;

    #[must_use]
    pub const fn type_tag(self) -> TypeTag {
        match self {
            Self::Absent => TypeTag::Undefined,
            Self::Null | Self::EmptyStruct | Self::EmptySequence => TypeTag::Object,
            Self::BoolTrue | Self::BoolFalse => TypeTag::Boolean,
            Self::IntZero | Self::Fraction => TypeTag::Number,
            Self::EmptyText => TypeTag::String,
            Self::NoOpCallable => TypeTag::Function,
        }
    }

    /// Literal form, used in log lines and failure details.
    #[must_use]
    pub const fn literal(self) -> &'static str {
        match self {
            Self::Absent => "undefined",
            Self::Null => "null",
            Self::BoolTrue => "true",
            Self::BoolFalse => "false",
            Self::IntZero => "0",
            Self::Fraction => "0.01",
            Self::EmptyText => "\"\"",
            Self::EmptyStruct => "{}",
            Self::EmptySequence => "[]",
            Self::NoOpCallable => "function() {}",
        }
    }

    #[must_use]
    pub fn as_number(self) -> Option<f64> {
        match self {
            Self::IntZero => Some(0.0),
            Self::Fraction => Some(Self::FRACTION),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::BoolTrue => Some(true),
            Self::BoolFalse => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for ProbeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// A callable handed to the target in place of a probe value.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn() + Send + Sync>);

impl Callback {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self) {
        (self.0)();
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// One positional argument passed to a target under test.
#[derive(Debug, Clone)]
pub enum Arg {
    Probe(ProbeValue),
    Callback(Callback),
}

impl Arg {
    #[must_use]
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Probe(value) => value.type_tag(),
            Self::Callback(_) => TypeTag::Function,
        }
    }

    #[must_use]
    pub fn is_callable(&self) -> bool {
        self.type_tag() == TypeTag::Function
    }

    #[must_use]
    pub fn probe(&self) -> Option<ProbeValue> {
        match self {
            Self::Probe(value) => Some(*value),
            Self::Callback(_) => None,
        }
    }

    /// Invoke the argument if it is callable. Returns whether anything was
    /// called; the no-op probe callable counts as called.
    pub fn invoke(&self) -> bool {
        match self {
            Self::Callback(cb) => {
                cb.call();
                true
            }
            Self::Probe(ProbeValue::NoOpCallable) => true,
            Self::Probe(_) => false,
        }
    }
}
