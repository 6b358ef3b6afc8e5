//! NavLink2: `!PDGY,<pgn>,<prio>,<src>,<dst>,<timer_ms>,<payload>`. Always
//! delivers a complete PGN payload on one line (`multi_packets_coalesced`),
//! so the Fast Packet reassembler never sees NavLink2 traffic.
use base64::Engine;
use chrono::{DateTime, Utc};

use super::{Frame, TextFormat, TextParser};
use crate::error::TextFormatError;

const FORMAT: &str = "NAVLINK2";
const PREFIX: &str = "!PDGY,";

fn bad(reason: impl Into<String>) -> TextFormatError {
    TextFormatError::BadFrame {
        format: FORMAT,
        reason: reason.into(),
    }
}

/// NavLink2's payload is base64 without padding, except when every
/// character is an uppercase hex digit and the string is longer than 40
/// characters — then it's plain hex.
fn decode_payload(raw: &str) -> Result<Vec<u8>, TextFormatError> {
    let looks_like_hex = raw.len() > 40 && raw.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c));
    if looks_like_hex {
        hex::decode(raw).map_err(|e| bad(format!("bad hex payload: {e}")))
    } else {
        base64::engine::general_purpose::STANDARD_NO_PAD
            .decode(raw)
            .map_err(|e| bad(format!("bad base64 payload: {e}")))
    }
}

#[derive(Debug, Default)]
pub struct NavLink2Parser;

impl NavLink2Parser {
    fn try_parse(line: &str) -> Result<Frame, TextFormatError> {
        let rest = line.strip_prefix(PREFIX).ok_or_else(|| bad("missing !PDGY, prefix"))?;
        let fields: Vec<&str> = rest.split(',').collect();
        if fields.len() != 6 {
            return Err(bad("expected 6 fields after the prefix"));
        }
        let pgn: u32 = fields[0].trim().parse().map_err(|_| bad("bad pgn"))?;
        let priority: u8 = fields[1].trim().parse().map_err(|_| bad("bad priority"))?;
        let src: u8 = fields[2].trim().parse().map_err(|_| bad("bad src"))?;
        let dst: u8 = fields[3].trim().parse().map_err(|_| bad("bad dst"))?;
        let timer_ms: i64 = fields[4].trim().parse().map_err(|_| bad("bad timer_ms"))?;
        let data = decode_payload(fields[5].trim())?;

        let timestamp = DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::microseconds(timer_ms * 1000);

        Ok(Frame {
            timestamp,
            priority,
            pgn,
            src,
            dst,
            data,
        })
    }
}

impl TextParser for NavLink2Parser {
    fn detect(&self, line: &str) -> bool {
        line.starts_with(PREFIX)
    }

    fn parse(&mut self, line: &str) -> Result<Frame, TextFormatError> {
        Self::try_parse(line)
    }

    fn marshal(&self, frame: &Frame, _is_fast: bool) -> Result<String, TextFormatError> {
        let timer_ms = frame.timestamp.timestamp_millis();
        let payload = base64::engine::general_purpose::STANDARD_NO_PAD.encode(&frame.data);
        Ok(format!(
            "{PREFIX}{},{},{},{},{timer_ms},{payload}",
            frame.pgn, frame.priority, frame.src, frame.dst
        ))
    }

    fn multi_packets_coalesced(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        FORMAT
    }

    fn text_format(&self) -> TextFormat {
        TextFormat::NavLink2
    }
}
