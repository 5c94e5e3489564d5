//! # Decoded/encoded field values
//!
//! [`Value`] is the schema-agnostic representation of a single message field's content: one
//! variant per scalar primitive, one variant per homogeneous numeric array, and a dedicated
//! variant for `char[N]` (which is ASCII text, not a numeric array). This is the "tagged-variant"
//! value the dialect spec calls for so that schema-agnostic consumers (a generic frame inspector,
//! a REPL, a bridge) can read and write fields without per-message generated accessors.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mav_type::MavType;

/// A single field's value, tagged with which [`MavType`] it came from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// `int8_t`.
    Int8(i8),
    /// `int16_t`.
    Int16(i16),
    /// `int32_t`.
    Int32(i32),
    /// `int64_t`.
    Int64(i64),
    /// `uint8_t`.
    UInt8(u8),
    /// `uint16_t`.
    UInt16(u16),
    /// `uint32_t`.
    UInt32(u32),
    /// `uint64_t`.
    UInt64(u64),
    /// `float`.
    Float(f32),
    /// `double`.
    Double(f64),
    /// `int8_t[N]`.
    Int8Array(Vec<i8>),
    /// `int16_t[N]`.
    Int16Array(Vec<i16>),
    /// `int32_t[N]`.
    Int32Array(Vec<i32>),
    /// `int64_t[N]`.
    Int64Array(Vec<i64>),
    /// `uint8_t[N]`.
    UInt8Array(Vec<u8>),
    /// `uint16_t[N]`.
    UInt16Array(Vec<u16>),
    /// `uint32_t[N]`.
    UInt32Array(Vec<u32>),
    /// `uint64_t[N]`.
    UInt64Array(Vec<u64>),
    /// `float[N]`.
    FloatArray(Vec<f32>),
    /// `double[N]`.
    DoubleArray(Vec<f64>),
    /// `char[N]`, exactly `N` bytes, not null-trimmed.
    CharArray(Vec<u8>),
}

impl Value {
    /// The [`MavType`] this value was decoded as, or would be encoded as.
    pub fn mav_type(&self) -> MavType {
        match self {
            Value::Int8(_) => MavType::Int8,
            Value::Int16(_) => MavType::Int16,
            Value::Int32(_) => MavType::Int32,
            Value::Int64(_) => MavType::Int64,
            Value::UInt8(_) => MavType::UInt8,
            Value::UInt16(_) => MavType::UInt16,
            Value::UInt32(_) => MavType::UInt32,
            Value::UInt64(_) => MavType::UInt64,
            Value::Float(_) => MavType::Float,
            Value::Double(_) => MavType::Double,
            Value::Int8Array(v) => MavType::Array(Box::new(MavType::Int8), v.len()),
            Value::Int16Array(v) => MavType::Array(Box::new(MavType::Int16), v.len()),
            Value::Int32Array(v) => MavType::Array(Box::new(MavType::Int32), v.len()),
            Value::Int64Array(v) => MavType::Array(Box::new(MavType::Int64), v.len()),
            Value::UInt8Array(v) => MavType::Array(Box::new(MavType::UInt8), v.len()),
            Value::UInt16Array(v) => MavType::Array(Box::new(MavType::UInt16), v.len()),
            Value::UInt32Array(v) => MavType::Array(Box::new(MavType::UInt32), v.len()),
            Value::UInt64Array(v) => MavType::Array(Box::new(MavType::UInt64), v.len()),
            Value::FloatArray(v) => MavType::Array(Box::new(MavType::Float), v.len()),
            Value::DoubleArray(v) => MavType::Array(Box::new(MavType::Double), v.len()),
            Value::CharArray(v) => MavType::Array(Box::new(MavType::Char), v.len()),
        }
    }
}
