//! Data contract between `build.rs` (the scribe) and the decode/encode
//! engine (the interpreter): the closed set of field types, the PGN/field
//! descriptors the engine walks, the lookup-table representation, and the
//! dynamic value/message types callers see.
//!
//! `build.rs` emits a `PGN_TABLE: &[PgnInfo]` constant matching this shape
//! from the PGN database under `build_core/var/`; `catalog::lookup_pgn` and
//! `catalog::matching_pgns` are the only supported ways to query it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Maximum payload a Fast Packet message can transport once reassembled
/// (6 bytes in frame 0, plus 7 bytes in each of up to 31 following frames).
pub const FAST_PACKET_MAX: usize = 6 + 7 * 31;

/// Semantic type of a field, mirroring the closed set canboat-derived PGN
/// databases use. Not every PGN in the bundled catalog exercises every
/// variant; a few (`KeyValue`) are intentionally left without handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Signed or unsigned integer; `has_sign` on the field carries the distinction.
    Number,
    /// IEEE-754 floating point, read/written byte-aligned.
    Float,
    /// BCD-encoded decimal digits.
    Decimal,
    /// Index into a `Lookup::Pair` or `Lookup::Triplet` enumeration.
    Lookup,
    /// Index resolved through another field's decoded value (`Lookup::Triplet`).
    IndirectLookup,
    /// Bitfield where each individual bit names a flag (`Lookup::Bit`).
    BitLookup,
    /// Raw binary block; length may be fixed or fill the remaining payload.
    Binary,
    /// Reserved bits, ignored on read and set to all-ones on write.
    Reserved,
    /// Spare bits, ignored on read and set to all-zeros on write.
    Spare,
    /// Maritime Mobile Service Identity, a 32-bit unique identifier.
    Mmsi,
    /// Untyped key/value pair whose shape depends on a preceding field. Unimplemented.
    KeyValue,
    /// Latitude in degrees, resolution-scaled like a signed number.
    Latitude,
    /// Longitude in degrees, resolution-scaled like a signed number.
    Longitude,
    /// Days since 1970-01-01, UTC.
    Date,
    /// Time since midnight UTC, resolution 0.0001 s.
    Time,
    /// Duration in seconds, resolution carried by the field descriptor.
    Duration,
    /// Fixed-length ASCII string, space- or NUL-padded.
    StringFix,
    /// Variable-length string prefixed by a length byte, NUL-terminated.
    StringLz,
    /// Variable-length string prefixed by length and encoding control bytes.
    StringLau,
    /// Field whose size and type are supplied by another field's value
    /// (the canboat "Group Function" pattern; two-pass resolved).
    Variable,
    /// Encodes a Parameter Group Number controlling a nested interaction.
    Pgn,
    /// 64-bit ISO NAME, as transported by PGN 60928 (ISO Address Claim).
    IsoName,
}

/// One of the four lookup-table shapes a field can reference.
#[derive(Debug, Clone, Copy)]
pub enum Lookup {
    /// Field carries no lookup table.
    None,
    /// Direct code -> name table.
    Pair(&'static [(i64, &'static str)]),
    /// Code resolved in the context of another field's value:
    /// `(context_value, code, name)` triples.
    Triplet(&'static [(i64, i64, &'static str)]),
    /// Bit position -> flag name table.
    Bit(&'static [(u8, &'static str)]),
    /// Code -> the name of the field type it selects, for fields whose
    /// runtime shape (not just its display label) is picked dynamically by
    /// a preceding code, e.g. a "Function Code" choosing how subsequent
    /// bytes are interpreted. Resolution is code -> name only, same shape
    /// as `Pair`; kept as its own variant to preserve the four-way lookup
    /// kind distinction the catalog database carries.
    FieldType(&'static [(i64, &'static str)]),
}

impl Lookup {
    /// Resolve a decoded numeric code to its name. `context` is the decoded
    /// value of the field's `context_field`, required for `Triplet`.
    pub fn forward(&self, code: i64, context: Option<i64>) -> Option<&'static str> {
        match self {
            Lookup::None => None,
            Lookup::Pair(entries) | Lookup::FieldType(entries) => {
                entries.iter().find(|(c, _)| *c == code).map(|(_, n)| *n)
            }
            Lookup::Triplet(entries) => {
                let ctx = context?;
                entries
                    .iter()
                    .find(|(c, v, _)| *c == ctx && *v == code)
                    .map(|(_, _, n)| *n)
            }
            Lookup::Bit(_) => None,
        }
    }

    /// Resolve a name back to its numeric code, the inverse of `forward`.
    pub fn reverse(&self, name: &str, context: Option<i64>) -> Option<i64> {
        match self {
            Lookup::None => None,
            Lookup::Pair(entries) | Lookup::FieldType(entries) => {
                entries.iter().find(|(_, n)| *n == name).map(|(c, _)| *c)
            }
            Lookup::Triplet(entries) => {
                let ctx = context?;
                entries
                    .iter()
                    .find(|(c, _, n)| *c == ctx && *n == name)
                    .map(|(_, v, _)| *v)
            }
            Lookup::Bit(entries) => entries.iter().find(|(_, n)| *n == name).map(|(b, _)| *b as i64),
        }
    }

    /// All flag names whose bit is set in `bitmask` (only meaningful for `Bit`).
    pub fn bits_set(&self, bitmask: u64) -> Vec<&'static str> {
        match self {
            Lookup::Bit(entries) => entries
                .iter()
                .filter(|(bit, _)| bitmask & (1u64 << bit) != 0)
                .map(|(_, name)| *name)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Descriptor for a single field within a PGN.
#[derive(Debug, Clone, Copy)]
pub struct PgnField {
    /// snake_case key this field is stored under in `Message::fields`.
    pub name: &'static str,
    /// Human-readable description, used by logging and text marshalling.
    pub description: &'static str,
    /// 1-based position of the field within the PGN, matching the source database.
    pub order: u16,
    /// Field width in bits. `0` means "derive from remaining payload" (a
    /// trailing `Binary`/`StringFix` field that fills out the message).
    pub size: u16,
    /// Excess-K bias subtracted after decode / added before encode.
    pub offset: i64,
    /// Scale factor applied after decode / before encode. `0.0` means "no scaling".
    pub resolution: f64,
    /// Whether the raw bit pattern is two's-complement signed.
    pub has_sign: bool,
    /// Manufacturer-proprietary fields are only decoded within a
    /// proprietary PGN's reserved manufacturer-code range.
    pub proprietary: bool,
    /// Whether the all-ones bit pattern marks "value not available".
    pub missing_value_is_one: bool,
    /// Physical unit label, if any (e.g. `"m/s"`, `"deg"`).
    pub unit: Option<&'static str>,
    /// Lookup table backing `Lookup`/`BitLookup`/`IndirectLookup` fields.
    pub lookup: Lookup,
    /// For `IndirectLookup`/`Triplet` fields, the field this one's context
    /// value is read from (by field name).
    pub context_field: Option<&'static str>,
    /// Semantic type controlling which decode/encode handler runs.
    pub field_type: FieldType,
}

/// How a PGN's payload maps onto CAN frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    /// Always fits in a single 8-byte frame.
    Single,
    /// Always requires Fast Packet reassembly.
    Fast,
    /// Length-dependent: fits a single frame for short payloads, Fast
    /// Packet otherwise.
    Mixed,
    /// ISO transport protocol (unsupported, no PGN in the bundled catalog uses it).
    IsoTp,
}

/// A repeating group of fields, read/written once per element.
#[derive(Debug, Clone, Copy)]
pub struct RepeatingGroup {
    /// 1-based `order` of the first field in one repetition.
    pub start: u16,
    /// Number of consecutive fields forming one repetition.
    pub count: u16,
    /// `order` of the field holding the repetition count; `None` means the
    /// repetitions continue until the payload is exhausted.
    pub count_field: Option<u16>,
}

/// Descriptor for an entire PGN layout, as stored in the generated catalog table.
#[derive(Debug, Clone, Copy)]
pub struct PgnInfo {
    pub pgn: u32,
    pub description: &'static str,
    pub packet_type: PacketType,
    pub field_count: u16,
    /// Fields whose decoded value must equal a fixed constant for this
    /// entry to match a payload (used to disambiguate PGNs multiple
    /// catalog entries share), as `(order, expected_value)` pairs.
    pub matcher: &'static [(u16, i64)],
    pub repeating1: Option<RepeatingGroup>,
    pub repeating2: Option<RepeatingGroup>,
    pub fields: &'static [PgnField],
}

/// A decoded field value. Variants are tagged rather than a single untyped
/// cell so callers pattern-match instead of guessing a field's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Floating(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    /// Seconds.
    Duration(f64),
    /// Resolved lookup/bit-lookup name.
    EnumString(String),
    /// Resolved bit-lookup flag names, one per set bit.
    BitSet(Vec<String>),
    /// A `Variable`-typed field's decoded value, tagged with the PGN and
    /// 1-based field order it was resolved against.
    Reference {
        pgn: u32,
        field_order: u16,
        value: Box<Value>,
    },
    /// One element map per repetition of a repeating group.
    Repeating(Vec<IndexMap<String, Value>>),
    /// Sentinel bit pattern decoded ("value not available").
    Missing,
}

/// A payload as read off (or about to be written to) the wire, before PGN
/// lookup and field decoding.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub timestamp: DateTime<Utc>,
    pub priority: u8,
    pub pgn: u32,
    pub src: u8,
    pub dst: u8,
    pub data: Vec<u8>,
}

/// A fully decoded PGN message.
#[derive(Debug, Clone)]
pub struct Message {
    pub timestamp: DateTime<Utc>,
    pub priority: u8,
    pub src: u8,
    pub dst: u8,
    pub pgn: u32,
    pub description: String,
    pub fields: IndexMap<String, Value>,
}

include!(concat!(env!("OUT_DIR"), "/generated_catalog.rs"));

/// All catalog entries sharing this PGN number. Most PGNs have exactly one;
/// a few (proprietary ranges, matcher-disambiguated PGNs) have several.
pub fn entries_for_pgn(pgn: u32) -> Vec<&'static PgnInfo> {
    PGN_TABLE.iter().filter(|info| info.pgn == pgn).collect()
}

/// Does `payload`'s decoded matcher fields agree with `info`'s constraints?
fn matches_payload(info: &PgnInfo, decoded_matcher_values: &HashMap<u16, i64>) -> bool {
    info.matcher
        .iter()
        .all(|(order, expected)| decoded_matcher_values.get(order) == Some(expected))
}

/// Select the catalog entries for `pgn` whose matcher fields (if any) agree
/// with the already-decoded values supplied in `decoded_matcher_values`
/// (field order -> integer value, for fields referenced by some entry's
/// `matcher`). Returns every entry when none defines a matcher.
pub fn matching_pgns(
    pgn: u32,
    decoded_matcher_values: &HashMap<u16, i64>,
) -> Vec<&'static PgnInfo> {
    entries_for_pgn(pgn)
        .into_iter()
        .filter(|info| info.matcher.is_empty() || matches_payload(info, decoded_matcher_values))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FUNCTION_CODE: Lookup = Lookup::FieldType(&[(0, "Request"), (1, "Command"), (2, "Acknowledge")]);

    #[test]
    fn field_type_lookup_resolves_like_a_pair() {
        assert_eq!(FUNCTION_CODE.forward(1, None), Some("Command"));
        assert_eq!(FUNCTION_CODE.forward(9, None), None);
    }

    #[test]
    fn field_type_lookup_reverses_by_name() {
        assert_eq!(FUNCTION_CODE.reverse("Acknowledge", None), Some(2));
        assert_eq!(FUNCTION_CODE.reverse("Unknown", None), None);
    }

    #[test]
    fn field_type_lookup_has_no_bits() {
        assert!(FUNCTION_CODE.bits_set(0b11).is_empty());
    }
}
