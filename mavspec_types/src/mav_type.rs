//! # Wire field types
//!
//! [`MavType`] maps a declared XML type string (`uint16_t`, `float[4]`, `char[50]`, ...) onto a
//! primitive or array descriptor with a known wire size. This is the type system consulted by the
//! schema compiler when it lays out message fields, and by the payload codec when it reads or
//! writes them.

use std::ops::Deref;
use std::str::FromStr;

use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::TypeParseError;

const RE_ARRAY_FIELD_TYPE: &str = r"^(.+)\[(\d+)\]$";

/// Declared MAVLink field type.
///
/// Scalars carry no payload beyond their variant; [`MavType::Array`] wraps a scalar base type
/// with its declared length. Nested arrays (`type[N][M]`) are rejected at parse time — MAVLink's
/// XML schema does not define them.
///
/// # Examples
///
/// ```rust
/// use mavspec_types::MavType;
///
/// assert!(matches!("int8_t".parse::<MavType>().unwrap(), MavType::Int8));
/// assert_eq!(MavType::parse("float[3]").unwrap().size(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MavType {
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    #[default]
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// Single precision IEEE-754 float.
    Float,
    /// Double precision IEEE-754 float.
    Double,
    /// ASCII character, one byte on the wire.
    Char,
    /// Array of `N` elements of a scalar base type.
    Array(Box<MavType>, usize),
}

impl FromStr for MavType {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MavType::parse(s)
    }
}

impl MavType {
    /// Parses a declared type string.
    ///
    /// Accepts `<primitive>` or `<primitive>[<N>]`, where `<primitive>` is one of `char`,
    /// `int8_t`, `uint8_t`, `int16_t`, `uint16_t`, `int32_t`, `uint32_t`, `int64_t`, `uint64_t`,
    /// `float`, `double`. Any trailing `_mavlink_version` suffix on a primitive name (used by a
    /// handful of versioned dialect fields) is treated as the same primitive — it only affects
    /// [`MavType::c_type`] curation for CRC_EXTRA, never the wire layout.
    ///
    /// # Errors
    ///
    /// Returns [`TypeParseError`] if the string does not match a known primitive, the array
    /// length is not a positive decimal integer, or arrays are nested.
    pub fn parse(s: &str) -> Result<MavType, TypeParseError> {
        let s = s.trim();
        let re_array = Regex::new(RE_ARRAY_FIELD_TYPE).unwrap();

        if let Some(captures) = re_array.captures(s) {
            let base_type_name = &captures[1];
            let length_str = &captures[2];

            if re_array.is_match(base_type_name) {
                return Err(TypeParseError::NestedArrays(s.to_string()));
            }

            let length = length_str
                .parse::<usize>()
                .map_err(|err| TypeParseError::ArrayLength(s.to_string(), err))?;

            return Ok(MavType::Array(Box::new(Self::parse_scalar(base_type_name)?), length));
        }

        Self::parse_scalar(s)
    }

    fn parse_scalar(s: &str) -> Result<MavType, TypeParseError> {
        let base = s.strip_suffix("_mavlink_version").unwrap_or(s);

        Ok(match base {
            "int8_t" => MavType::Int8,
            "int16_t" => MavType::Int16,
            "int32_t" => MavType::Int32,
            "int64_t" => MavType::Int64,
            "uint8_t" => MavType::UInt8,
            "uint16_t" => MavType::UInt16,
            "uint32_t" => MavType::UInt32,
            "uint64_t" => MavType::UInt64,
            "float" => MavType::Float,
            "double" => MavType::Double,
            "char" => MavType::Char,
            _ => return Err(TypeParseError::Unrecognized(s.to_string())),
        })
    }

    /// Type name as it would appear in an XML definition.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mavspec_types::MavType;
    ///
    /// for expected in ["int8_t", "float", "double[4]"] {
    ///     assert_eq!(MavType::parse(expected).unwrap().definition_name(), expected);
    /// }
    /// ```
    pub fn definition_name(&self) -> String {
        match self {
            MavType::Int8 => "int8_t".to_string(),
            MavType::Int16 => "int16_t".to_string(),
            MavType::Int32 => "int32_t".to_string(),
            MavType::Int64 => "int64_t".to_string(),
            MavType::UInt8 => "uint8_t".to_string(),
            MavType::UInt16 => "uint16_t".to_string(),
            MavType::UInt32 => "uint32_t".to_string(),
            MavType::UInt64 => "uint64_t".to_string(),
            MavType::Float => "float".to_string(),
            MavType::Double => "double".to_string(),
            MavType::Char => "char".to_string(),
            MavType::Array(base, length) => format!("{}[{length}]", base.definition_name()),
        }
    }

    /// Curated type name used as CRC_EXTRA input (§4.4.1 of the dialect spec).
    ///
    /// This is [`MavType::definition_name`] with any `[N]` suffix stripped and any
    /// `_mavlink_version` primitive rewritten to its bare form — the curation MAVLink's reference
    /// implementations apply before hashing a message's field list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mavspec_types::MavType;
    ///
    /// assert_eq!(MavType::parse("float[4]").unwrap().c_type(), "float");
    /// ```
    pub fn c_type(&self) -> String {
        self.base_type().definition_name()
    }

    /// Corresponding Rust type, for callers that bridge into generated or hand-written structs.
    pub fn rust_type(&self) -> String {
        match self {
            MavType::Int8 => "i8".to_string(),
            MavType::Int16 => "i16".to_string(),
            MavType::Int32 => "i32".to_string(),
            MavType::Int64 => "i64".to_string(),
            MavType::UInt8 => "u8".to_string(),
            MavType::UInt16 => "u16".to_string(),
            MavType::UInt32 => "u32".to_string(),
            MavType::UInt64 => "u64".to_string(),
            MavType::Float => "f32".to_string(),
            MavType::Double => "f64".to_string(),
            MavType::Char => "u8".to_string(),
            MavType::Array(base, length) => format!("[{}; {length}]", base.rust_type()),
        }
    }

    /// Size in bytes on the wire.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mavspec_types::MavType;
    ///
    /// assert_eq!(MavType::UInt32.size(), 4);
    /// assert_eq!(MavType::parse("char[50]").unwrap().size(), 50);
    /// ```
    pub fn size(&self) -> usize {
        self.element_size() * self.array_length().max(1)
    }

    /// Size in bytes of a single element (1 for scalars and for arrays' base type).
    pub fn element_size(&self) -> usize {
        match self {
            MavType::Int8 | MavType::UInt8 | MavType::Char => 1,
            MavType::Int16 | MavType::UInt16 => 2,
            MavType::Int32 | MavType::UInt32 | MavType::Float => 4,
            MavType::Int64 | MavType::UInt64 | MavType::Double => 8,
            MavType::Array(base, _) => base.element_size(),
        }
    }

    /// Declared array length, or `0` for scalars.
    pub fn array_length(&self) -> usize {
        match self {
            MavType::Array(_, length) => *length,
            _ => 0,
        }
    }

    /// `true` if this type is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, MavType::Array(..))
    }

    /// Base (element) type: itself for scalars, the wrapped type for arrays.
    pub fn base_type(&self) -> &Self {
        match self {
            MavType::Array(base, _) => base.deref(),
            _ => self,
        }
    }
}
