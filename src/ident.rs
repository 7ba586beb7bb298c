//! Identifier and filler-string helpers.

/// Fill character used by [`generate_string`] when none is given.
pub const DEFAULT_FILL: char = 'x';

/// Random version 4 UUID in hyphenated lowercase form.
#[must_use]
pub fn uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// `fill` (or `x`) repeated `len` times.
///
/// ```rust
/// use appseed::ident::generate_string;
///
/// assert_eq!(generate_string(3, None), "xxx");
/// assert_eq!(generate_string(2, Some('*')), "**");
/// ```
#[must_use]
pub fn generate_string(len: usize, fill: Option<char>) -> String {
    std::iter::repeat_n(fill.unwrap_or(DEFAULT_FILL), len).collect()
}
