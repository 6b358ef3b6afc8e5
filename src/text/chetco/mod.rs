//! Chetco: `$PCDIN,<pgn-hex>,<timestamp-hex>,<src-hex>,<payload-hex>*<checksum-hex>`,
//! an NMEA-0183-shaped sentence carrying a raw PGN payload. No priority or
//! destination is on the wire; broadcast dst (0xFF) and priority 6 (NMEA
//! 2000's default for unsolicited PGNs) are assumed — recorded as a
//! judgment call since nothing else on the line decides it.
use chrono::{DateTime, Utc};

use super::{Frame, TextFormat, TextParser};
use crate::error::TextFormatError;

const FORMAT: &str = "CHETCO";
const PREFIX: &str = "$PCDIN,";
const DEFAULT_PRIORITY: u8 = 6;
const BROADCAST_DST: u8 = 0xFF;

fn bad(reason: impl Into<String>) -> TextFormatError {
    TextFormatError::BadFrame {
        format: FORMAT,
        reason: reason.into(),
    }
}

fn checksum(sentence: &str) -> u8 {
    sentence.bytes().fold(0u8, |acc, byte| acc ^ byte)
}

#[derive(Debug, Default)]
pub struct ChetcoParser;

impl ChetcoParser {
    fn try_parse(line: &str) -> Result<Frame, TextFormatError> {
        let rest = line.strip_prefix(PREFIX).ok_or_else(|| bad("missing $PCDIN, prefix"))?;
        let (body, checksum_hex) = rest.split_once('*').ok_or_else(|| bad("missing '*' checksum delimiter"))?;
        let expected = u8::from_str_radix(checksum_hex.trim(), 16).map_err(|_| bad("bad checksum field"))?;
        let actual = checksum(&format!("PCDIN,{body}"));
        if actual != expected {
            return Err(bad(format!("checksum mismatch: expected {expected:02X}, computed {actual:02X}")));
        }

        let fields: Vec<&str> = body.split(',').collect();
        if fields.len() != 4 {
            return Err(bad("expected pgn, timestamp, src and payload fields"));
        }
        let pgn = u32::from_str_radix(fields[0], 16).map_err(|_| bad("bad pgn"))?;
        let timestamp_secs =
            i64::from_str_radix(fields[1], 16).map_err(|_| bad("bad timestamp"))?;
        let src = u8::from_str_radix(fields[2], 16).map_err(|_| bad("bad src"))?;
        let data = hex::decode(fields[3]).map_err(|e| bad(format!("bad payload hex: {e}")))?;

        let timestamp = DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::seconds(timestamp_secs);

        Ok(Frame {
            timestamp,
            priority: DEFAULT_PRIORITY,
            pgn,
            src,
            dst: BROADCAST_DST,
            data,
        })
    }
}

impl TextParser for ChetcoParser {
    fn detect(&self, line: &str) -> bool {
        Self::try_parse(line).is_ok()
    }

    fn parse(&mut self, line: &str) -> Result<Frame, TextFormatError> {
        Self::try_parse(line)
    }

    fn marshal(&self, frame: &Frame, _is_fast: bool) -> Result<String, TextFormatError> {
        let timestamp_secs = frame.timestamp.timestamp();
        let body = format!("{:06X},{timestamp_secs:08X},{:02X},{}", frame.pgn, frame.src, hex::encode_upper(&frame.data));
        let checksum = checksum(&format!("PCDIN,{body}"));
        Ok(format!("{PREFIX}{body}*{checksum:02X}"))
    }

    fn name(&self) -> &'static str {
        FORMAT
    }

    fn text_format(&self) -> TextFormat {
        TextFormat::Chetco
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
