//! # MAVSpec types
//!
//! Shared wire-level types for the MAVLink dialect codec: the field [`MavType`] system, the
//! schema-agnostic [`Value`] representation of a decoded field, the protocol [`MavLinkVersion`],
//! and a handful of `MAVLink`-wide constants and parse errors.
//!
//! This crate has no knowledge of dialects, schemas, or frames — those live in `mavspec` (the
//! dialect loader/compiler/catalog) and `mavlib_core` (the frame codec), both of which depend on
//! the types defined here.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod consts;

mod mav_type;
pub use mav_type::MavType;

mod value;
pub use value::Value;

mod version;
pub use version::MavLinkVersion;

pub mod types;
pub use types::{ExtraCrc, MessageId};

pub mod errors;
pub use errors::TypeParseError;
