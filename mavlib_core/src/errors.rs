//! # Frame codec errors
//!
//! Decode errors are carried as data — the scanner never panics on malformed input, it reports a
//! reason and lets the caller decide whether to keep reading. Encode errors are programmer errors
//! (unknown field name, value/type mismatch) and may fail loudly.

use mavspec::MessageId;
use thiserror::Error;

pub use mavspec::errors::NotInitialized;

/// Errors surfaced while scanning or decoding a frame.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No codec call is valid before [`mavspec::Catalog::initialize`].
    #[error(transparent)]
    NotInitialized(#[from] NotInitialized),
    /// No `0xFE`/`0xFD` start marker found anywhere in the input.
    #[error("no start marker found")]
    StartMarkerNotFound,
    /// Fewer bytes remain than the smallest possible frame for either version.
    #[error("frame is shorter than the minimum packet size")]
    FrameTooShort,
    /// Declared `len` implies a frame longer than the largest possible packet.
    #[error("frame is longer than the maximum packet size")]
    FrameTooLong,
    /// `messageId` is not present in the catalog.
    #[error("message id {0} is not present in the catalog")]
    MessageNotFound(MessageId),
    /// `messageId` is known but currently excluded.
    #[error("message id {0} is excluded")]
    MessageExcluded(MessageId),
    /// On-wire `len` exceeds the schema's `maxPayloadLength`.
    #[error("payload length {len} exceeds schema maximum {max}")]
    PayloadLengthInvalid {
        /// On-wire declared payload length.
        len: usize,
        /// Schema's maximum payload length.
        max: usize,
    },
    /// Remaining bytes are too few to hold a checksum.
    ///
    /// Part of the documented error taxonomy, but never actually constructed: the scanner's
    /// length check tests `header + len + checksum` as one quantity against the remaining bytes,
    /// so a frame too short for its checksum is already caught by [`Self::FrameTooShort`] before
    /// this distinction could be drawn. Kept for API completeness (see [`Self::FrameTooLong`] for
    /// the same situation).
    #[error("frame has no checksum")]
    FrameHasNoChecksum,
    /// On-wire checksum does not match the computed one.
    #[error("checksum mismatch")]
    BadChecksum,
    /// Trailing bytes after the checksum exist but are fewer than a full signature.
    #[error("trailing bytes are too few to hold a signature")]
    SignatureLengthInvalid,
}

/// Errors surfaced while encoding a frame.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// No codec call is valid before [`mavspec::Catalog::initialize`].
    #[error(transparent)]
    NotInitialized(#[from] NotInitialized),
    /// The field map names a field the schema does not declare.
    #[error("message {message:?} has no field named {field:?}")]
    UnknownField {
        /// Message name being encoded.
        message: String,
        /// Field name that was not found.
        field: String,
    },
    /// The supplied [`mavspec::Value`] does not match the field's declared type.
    #[error("field {field:?} expects {expected}, got {actual}")]
    TypeMismatch {
        /// Field name.
        field: String,
        /// Declared type, as text.
        expected: String,
        /// Provided value's type, as text.
        actual: String,
    },
}
