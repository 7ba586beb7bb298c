//! Declared argument kinds for a target under test.

use super::probe::{ProbeValue, TypeTag};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown argument kind '{0}' (expected callback, errorCallback, various or a type name)")]
pub struct KindParseError(pub String);

/// The kind declared for one positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArgKind {
    /// Success callback; must never fire after a wrong argument.
    Callback,
    /// Error callback; expected to fire once per wrong-argument call.
    ErrorCallback,
    /// Accepts anything, so its type is never checked.
    Various,
    /// Must have the given runtime type.
    Typed(TypeTag),
}

impl ArgKind {
    #[must_use]
    pub const fn is_callback(self) -> bool {
        matches!(self, Self::Callback | Self::ErrorCallback)
    }

    /// Whether `value` in this position is a wrong argument.
    #[must_use]
    pub fn rejects(self, value: ProbeValue) -> bool {
        match self {
            Self::Typed(tag) => value.type_tag() != tag,
            Self::Callback | Self::ErrorCallback | Self::Various => false,
        }
    }
}

impl FromStr for ArgKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "callback" => Ok(Self::Callback),
            "errorCallback" => Ok(Self::ErrorCallback),
            "various" => Ok(Self::Various),
            other => other
                .parse::<TypeTag>()
                .map(Self::Typed)
                .map_err(|()| KindParseError(other.to_string())),
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback => f.write_str("callback"),
            Self::ErrorCallback => f.write_str("errorCallback"),
            Self::Various => f.write_str("various"),
            Self::Typed(tag) => write!(f, "{}", tag),
        }
    }
}

/// Ordered kinds, one per positional argument. Its length is the arity the
/// harness probes with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArgKindSpec(Vec<ArgKind>);

impl ArgKindSpec {
    #[must_use]
    pub fn new(kinds: Vec<ArgKind>) -> Self {
        Self(kinds)
    }

    /// Parse kind names such as `["string", "callback", "errorCallback"]`.
    pub fn parse<I, S>(names: I) -> Result<Self, KindParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    #[must_use]
    pub fn kinds(&self) -> &[ArgKind] {
        &self.0
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// True when the target reports through callbacks and can therefore be
    /// checked for silent acceptance.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.0.iter().any(|kind| kind.is_callback())
    }

    /// True when at least one typed position rejects `value`.
    #[must_use]
    pub fn is_bad(&self, value: ProbeValue) -> bool {
        self.0.iter().any(|kind| kind.rejects(value))
    }
}

impl FromStr for ArgKindSpec {
    type Err = KindParseError;

    /// Comma-separated kind names, whitespace tolerant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::parse(s.split(',').map(str::trim))
    }
}
