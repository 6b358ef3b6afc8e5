//! L3 text-format layer: turns one line of captured NMEA 2000 traffic into a
//! `Frame`, or a `Frame` back into a line, across the fixed set of formats
//! real-world loggers and gateways emit. Sequence/frame-index extraction for
//! multi-frame payloads stays inside `protocol::transport::fast_packet` — a
//! `Frame` here just carries whatever bytes the wire format declared for
//! this one line, coalesced or not.
use chrono::{DateTime, Utc};

use crate::error::TextFormatError;

pub mod actisense;
pub mod airmar;
pub mod chetco;
pub mod dispatcher;
pub mod garmin_csv1;
pub mod garmin_csv2;
pub mod navlink2;
pub mod plain_csv;
pub mod ydwg02;

pub use dispatcher::{DispatchedFrame, Dispatcher};

/// One line's worth of NMEA 2000 traffic, pre-PGN-lookup. Distinct from
/// `catalog::RawMessage`: a capture line has no notion yet of whether its
/// payload is a complete PGN message or one Fast Packet fragment among many
/// — that distinction is resolved by the caller using
/// `DispatchedFrame::multi_packets_coalesced` and the PGN's own
/// `PacketType`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub timestamp: DateTime<Utc>,
    pub priority: u8,
    pub pgn: u32,
    pub src: u8,
    pub dst: u8,
    pub data: Vec<u8>,
}

/// One of the eight wire formats the dispatcher recognizes, named in its
/// mandated detection priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    NavLink2,
    Ydwg02,
    PlainOrFast,
    GarminCsv1,
    GarminCsv2,
    Chetco,
    Airmar,
    ActisenseN2kAscii,
}

/// A single capture-line parser/marshaller. `parse` takes `&mut self`
/// because a handful of formats (Actisense) carry parser-local state across
/// lines, e.g. an inferred epoch; stateless formats simply ignore `self`.
pub trait TextParser {
    /// Cheap lexical shape check that does not commit any parser state.
    fn detect(&self, line: &str) -> bool;
    /// Parses a line `detect` already accepted into a `Frame`.
    fn parse(&mut self, line: &str) -> Result<Frame, TextFormatError>;
    /// Renders `frame` back to this format's wire text. Formats with no
    /// documented encoder (Airmar, Garmin CSV) inherit this default.
    fn marshal(&self, frame: &Frame, is_fast: bool) -> Result<String, TextFormatError> {
        let _ = (frame, is_fast);
        Err(TextFormatError::UnsupportedEncoding { format: self.name() })
    }
    /// True when this format always delivers a PGN's full payload on one
    /// line, so the caller bypasses Fast Packet reassembly entirely.
    fn multi_packets_coalesced(&self) -> bool {
        false
    }
    /// True for header-bearing formats (Garmin CSV) whose first captured
    /// line must be discarded rather than parsed.
    fn skip_first_line(&self) -> bool {
        false
    }
    /// Format name, used in error messages and logging.
    fn name(&self) -> &'static str;
    /// The `TextFormat` variant this parser implements.
    fn text_format(&self) -> TextFormat;
}
