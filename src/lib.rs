//! `n2k-codec`: a bidirectional NMEA 2000 PGN codec. The crate exposes the
//! PGN catalog generated at build time, the infrastructure modules
//! (bit-level codec, decode/encode engine), and the protocol layer (CAN
//! identifier packing, Fast Packet reassembly/splitting, text-format
//! parsing).
//==================================================================================
/// PGN/lookup catalog generated at build time from the offline database.
pub mod catalog;
/// Top-level decoder tying text-format parsing, Fast Packet reassembly and
/// the decode engine together.
pub mod decoder;
/// Top-level encode/marshal entry points, the mirror of `decoder`.
pub mod encode;
/// Domain and low-level errors (CAN identifier construction, serialization,
/// deserialization, and related issues).
pub mod error;
/// Bit-level codec and the decode/encode engine built on top of it.
pub mod infra;
/// NMEA 2000 protocol implementation: CAN transport and Fast Packet framing.
pub mod protocol;
/// Text-format capture-line parsing (L3): NavLink2, YDWG02, PLAIN/FAST CSV,
/// Garmin CSV v1/v2, Chetco, Airmar and Actisense N2K ASCII.
pub mod text;
//==================================================================================
