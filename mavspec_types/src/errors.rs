//! # Type-system errors

use std::num::ParseIntError;

use thiserror::Error;

/// Errors produced while parsing a declared field type string (e.g. `uint16_t`, `float[4]`).
///
/// See: [`crate::MavType`].
#[derive(Debug, Clone, Error)]
pub enum TypeParseError {
    /// Type string does not match any known primitive or array form.
    #[error("invalid type specification: {0}")]
    Unrecognized(String),
    /// Array length in `type[N]` is not a positive decimal integer.
    #[error("invalid array length in type specification {0:?}: {1}")]
    ArrayLength(String, ParseIntError),
    /// Arrays of arrays (`type[N][M]`) are not part of the MAVLink wire format.
    #[error("nested arrays are not supported: {0}")]
    NestedArrays(String),
}
