//! Runtime shape checks for loosely-typed inputs.
//!
//! Used to gate tuples of [`Value`]s before they are turned into structured
//! statement input.

use crate::core::value::{OneOrMany, Value, ValueKind};

/// Compares an input against its expected type descriptor(s).
///
/// A single value matches a single kind. A sequence is zipped with a
/// sequence of kinds and matches when every pair does; surplus entries on
/// either side are ignored, so an empty input always matches. Mixing a single
/// value with a sequence of kinds (or the reverse) never matches.
///
/// ```
/// use dbcontrol::core::value::{OneOrMany, Value, ValueKind};
/// use dbcontrol::type_check::type_check;
///
/// let mixed = OneOrMany::Many(vec![Value::from(12), Value::from("Hello World!")]);
/// let expected = OneOrMany::Many(vec![ValueKind::Integer, ValueKind::Text]);
/// assert!(type_check(&mixed, &expected));
/// ```
pub fn type_check(input: &OneOrMany<Value>, expected: &OneOrMany<ValueKind>) -> bool {
    match (input, expected) {
        (OneOrMany::One(value), OneOrMany::One(kind)) => value.kind() == *kind,
        (OneOrMany::Many(values), OneOrMany::Many(kinds)) => kinds_match(values, kinds),
        _ => false,
    }
}

/// Slice form of the sequence comparison in [`type_check`].
pub fn kinds_match(values: &[Value], kinds: &[ValueKind]) -> bool {
    values
        .iter()
        .zip(kinds)
        .all(|(value, kind)| value.kind() == *kind)
}
