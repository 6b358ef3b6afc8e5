//! Airmar: `$MXPGN,<pgn-hex>,<attr-hex>,<data-hex>`, an NMEA-0183-shaped
//! sentence with no checksum. `<attr-hex>` is a 4-hex-digit field packing
//! priority in its top nibble and destination address in its low byte —
//! this layout is a best-effort reading (no authoritative grammar was
//! available) and is recorded as a judgment call. Decode-only: no marshal
//! format is documented, so this parser inherits the trait default.
use chrono::Utc;

use super::{Frame, TextFormat, TextParser};
use crate::error::TextFormatError;

const FORMAT: &str = "AIRMAR";
const PREFIX: &str = "$MXPGN,";

fn bad(reason: impl Into<String>) -> TextFormatError {
    TextFormatError::BadFrame {
        format: FORMAT,
        reason: reason.into(),
    }
}

#[derive(Debug, Default)]
pub struct AirmarParser;

impl AirmarParser {
    fn try_parse(line: &str) -> Result<Frame, TextFormatError> {
        let rest = line.strip_prefix(PREFIX).ok_or_else(|| bad("missing $MXPGN, prefix"))?;
        let fields: Vec<&str> = rest.trim_end_matches(['\r', '\n']).split(',').collect();
        if fields.len() != 3 {
            return Err(bad("expected pgn, attr and data fields"));
        }
        let pgn = u32::from_str_radix(fields[0], 16).map_err(|_| bad("bad pgn"))?;
        let attr = u16::from_str_radix(fields[1], 16).map_err(|_| bad("bad attr"))?;
        let data = hex::decode(fields[2]).map_err(|e| bad(format!("bad data hex: {e}")))?;

        let priority = ((attr >> 12) & 0x7) as u8;
        let dst = (attr & 0xFF) as u8;

        Ok(Frame {
            timestamp: Utc::now(),
            priority,
            pgn,
            src: 0,
            dst,
            data,
        })
    }
}

impl TextParser for AirmarParser {
    fn detect(&self, line: &str) -> bool {
        Self::try_parse(line).is_ok()
    }

    fn parse(&mut self, line: &str) -> Result<Frame, TextFormatError> {
        Self::try_parse(line)
    }

    fn name(&self) -> &'static str {
        FORMAT
    }

    fn text_format(&self) -> TextFormat {
        TextFormat::Airmar
    }
}
