//! Top-level encode/marshal entry points, the mirror of `decoder`:
//! `encode_message` turns a `Message` into a raw payload (`decoder`'s
//! `decode_raw` in reverse), and `marshal` renders a `RawMessage` back into
//! one capture-format line (`decoder`'s `decode_line` in reverse).
use crate::catalog::{Message, RawMessage};
use crate::error::{EncodeError, TextFormatError};
use crate::infra::codec::engine::encode_message as engine_encode_message;
use crate::text::{self, Frame, TextFormat, TextParser};

/// Encodes `message` into a raw payload. `pgn_hint`, when given, overrides
/// the PGN used to pick the catalog entry (useful for proprietary PGNs a
/// caller already knows the exact variant of) without altering the PGN
/// carried on the wire.
pub fn encode_message(message: &Message, pgn_hint: Option<u32>) -> Result<RawMessage, EncodeError> {
    let pgn = pgn_hint.unwrap_or(message.pgn);
    let owned;
    let target = match pgn_hint {
        Some(hint) if hint != message.pgn => {
            owned = Message {
                pgn: hint,
                ..message.clone()
            };
            &owned
        }
        _ => message,
    };

    let data = engine_encode_message(target)?;
    Ok(RawMessage {
        timestamp: message.timestamp,
        priority: message.priority,
        pgn,
        src: message.src,
        dst: message.dst,
        data,
    })
}

/// Renders `raw` as one line of `format`'s wire text. `is_fast` is forwarded
/// to the parser unchanged; it only affects formats (PLAIN/FAST CSV) whose
/// rendering depends on whether the PGN is single-frame or Fast Packet.
pub fn marshal(raw: &RawMessage, format: TextFormat, is_fast: bool) -> Result<String, TextFormatError> {
    let frame = Frame {
        timestamp: raw.timestamp,
        priority: raw.priority,
        pgn: raw.pgn,
        src: raw.src,
        dst: raw.dst,
        data: raw.data.clone(),
    };
    parser_for(format).marshal(&frame, is_fast)
}

fn parser_for(format: TextFormat) -> Box<dyn TextParser> {
    match format {
        TextFormat::NavLink2 => Box::new(text::navlink2::NavLink2Parser),
        TextFormat::Ydwg02 => Box::new(text::ydwg02::Ydwg02Parser),
        TextFormat::PlainOrFast => Box::new(text::plain_csv::PlainOrFastParser),
        TextFormat::GarminCsv1 => Box::new(text::garmin_csv1::GarminCsv1Parser),
        TextFormat::GarminCsv2 => Box::new(text::garmin_csv2::GarminCsv2Parser),
        TextFormat::Chetco => Box::new(text::chetco::ChetcoParser),
        TextFormat::Airmar => Box::new(text::airmar::AirmarParser),
        TextFormat::ActisenseN2kAscii => Box::new(text::actisense::ActisenseParser::default()),
    }
}

#[cfg(test)]
#[path = "encode_tests.rs"]
mod tests;
