//! Error taxonomy shared across the codec. Each enum models one failure
//! domain (bit-level codec, CAN identifier construction, decoding, encoding,
//! text-format parsing) so callers can match exhaustively instead of
//! inspecting an opaque error string.
use thiserror::Error;

use crate::catalog::FieldType;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised during bitwise buffer reads.
pub enum BitReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more bits than the target type can hold.
    #[error("cannot read more than {max} bits. requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Cursor is not aligned on a byte boundary when required.
    #[error("non aligned bit. cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised during bitwise writes into a buffer.
pub enum BitWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Field is too large for the provided type.
    #[error("cannot write more than {max} bits. requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Cursor is not aligned on a byte boundary when the operation requires it.
    #[error("non aligned bit. cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur while building or decomposing a 29-bit CAN identifier.
pub enum CanIdError {
    /// Attempt to build a broadcast message (PDU2) with PF < 240.
    #[error("invalid for broadcast message: PF is too low")]
    InvalidForBroadcast,
    /// Attempt to send an addressed message (PDU1) with PF >= 240.
    #[error("invalid for addressed message: PF is too high: {pf}")]
    InvalidForAddressedMessage { pf: u8 },
    /// In PDU1 the lower 8 bits of the PGN must remain zero.
    #[error("PDU1 PGNs require PS = 0")]
    PsMustBeZero,
}

#[derive(Error, Debug)]
/// Failures raised while turning a raw PGN payload into a `Message`.
pub enum DecodeError {
    /// No catalog entry is defined for this PGN.
    #[error("no PGN {pgn} definition matches this payload")]
    UnknownPgn { pgn: u32 },
    /// More than one catalog entry's matcher accepted the payload.
    #[error("payload for PGN {pgn} matches more than one catalog entry")]
    AmbiguousPgn { pgn: u32 },
    /// Field type carries no decode handler (e.g. `KeyValue`).
    #[error("field type {0:?} has no decode handler")]
    UnsupportedField(FieldType),
    /// Bit reader ran past the end of the payload.
    #[error("bit read past the end of the payload")]
    InsufficientData(#[from] BitReaderError),
    /// A raw frame or text line could not be parsed at all.
    #[error("malformed line: {0}")]
    BadFrame(String),
    /// A code read from the payload has no entry in its lookup table.
    #[error("no lookup mapping for code {code} in field \"{field}\"")]
    LookupMiss { field: &'static str, code: i64 },
    /// Invariant the decoder relies on was violated.
    #[error("invariant violation: {0}")]
    Fatal(String),
}

#[derive(Error, Debug)]
/// Failures raised while turning a `Message` into a raw PGN payload.
pub enum EncodeError {
    /// No catalog entry is defined for this PGN.
    #[error("no PGN {pgn} definition matches these fields")]
    UnknownPgn { pgn: u32 },
    /// More than one catalog entry matches the supplied field set.
    #[error("fields match more than one catalog entry for PGN {pgn}")]
    AmbiguousPgn { pgn: u32 },
    /// Field type carries no encode handler (e.g. `KeyValue`).
    #[error("field type {0:?} has no encode handler")]
    UnsupportedField(FieldType),
    /// Caller-supplied value has the wrong `Value` variant for the field.
    #[error("field \"{field}\" expected a {expected} value")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    /// A mandatory field was absent from the message.
    #[error("field \"{field}\" is missing from the message")]
    MissingField { field: &'static str },
    /// Caller-supplied name has no entry in the field's lookup table.
    #[error("no reverse lookup mapping for \"{value}\" in field \"{field}\"")]
    LookupMiss { field: &'static str, value: String },
    /// Bit writer ran past the end of the output buffer.
    #[error("bit write past the end of the buffer")]
    BitWrite(#[from] BitWriterError),
    /// Encoded payload would exceed the 255-byte Fast Packet ceiling.
    #[error("encoded payload exceeds 255 bytes ({len})")]
    Oversize { len: usize },
    /// Invariant the encoder relies on was violated.
    #[error("invariant violation: {0}")]
    Fatal(String),
}

#[derive(Error, Debug)]
/// Failures raised by a text-format parser or marshaller.
pub enum TextFormatError {
    /// No registered parser recognized the line.
    #[error("line does not match any known text format")]
    NoParserMatched,
    /// A parser recognized the line's shape but its content was invalid.
    #[error("malformed {format} line: {reason}")]
    BadFrame { format: &'static str, reason: String },
    /// The detected format has no marshaller (read-only capture format).
    #[error("{format} does not support marshalling back to text")]
    UnsupportedEncoding { format: &'static str },
}
