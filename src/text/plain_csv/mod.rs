//! PLAIN/FAST CSV: `<TS>,<prio>,<pgn>,<src>,<dst>,<len>,<b0>,<b1>,...`. The
//! `<len>` field is what later decides PLAIN (<= 8, this line is the whole
//! payload) from FAST (> 8, this line is one raw CAN frame carrying a Fast
//! Packet header byte) — this parser just hands back the declared bytes
//! either way; the caller makes that call using the PGN's own `PacketType`.
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use super::{Frame, TextFormat, TextParser};
use crate::error::TextFormatError;

const FORMAT: &str = "PLAIN_OR_FAST";

/// Timestamp layouts accepted on the first CSV column, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d-%H:%M:%S%.3f",
    "%Y-%m-%dT%H:%M:%S%.3fZ",
    "%Y-%m-%dT%H:%M:%SZ",
];

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    // "02 Jan 06 15:04 +0700": the only layout carrying its own UTC offset.
    DateTime::parse_from_str(raw, "%d %b %y %H:%M %z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn bad(reason: impl Into<String>) -> TextFormatError {
    TextFormatError::BadFrame {
        format: FORMAT,
        reason: reason.into(),
    }
}

#[derive(Debug, Default)]
pub struct PlainOrFastParser;

impl PlainOrFastParser {
    fn try_parse(line: &str) -> Result<Frame, TextFormatError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 6 {
            return Err(bad("fewer than 6 comma-separated fields"));
        }
        let timestamp = parse_timestamp(fields[0].trim())
            .ok_or_else(|| bad(format!("unrecognized timestamp {:?}", fields[0])))?;
        let priority: u8 = fields[1].trim().parse().map_err(|_| bad("bad priority"))?;
        let pgn: u32 = fields[2].trim().parse().map_err(|_| bad("bad pgn"))?;
        let src: u8 = fields[3].trim().parse().map_err(|_| bad("bad src"))?;
        let dst: u8 = fields[4].trim().parse().map_err(|_| bad("bad dst"))?;
        let len: usize = fields[5].trim().parse().map_err(|_| bad("bad len"))?;

        let byte_fields = &fields[6..];
        if byte_fields.len() != len {
            return Err(bad(format!(
                "declared length {len} does not match {} byte fields",
                byte_fields.len()
            )));
        }
        let mut data = Vec::with_capacity(len);
        for raw in byte_fields {
            let byte = u8::from_str_radix(raw.trim(), 16).map_err(|_| bad(format!("bad hex byte {raw:?}")))?;
            data.push(byte);
        }

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

impl TextParser for PlainOrFastParser {
    fn detect(&self, line: &str) -> bool {
        Self::try_parse(line).is_ok()
    }

    fn parse(&mut self, line: &str) -> Result<Frame, TextFormatError> {
        Self::try_parse(line)
    }

    fn marshal(&self, frame: &Frame, _is_fast: bool) -> Result<String, TextFormatError> {
        let mut out = format!(
            "{},{},{},{},{},{}",
            frame.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            frame.priority,
            frame.pgn,
            frame.src,
            frame.dst,
            frame.data.len(),
        );
        for byte in &frame.data {
            out.push(',');
            out.push_str(&hex::encode([*byte]));
        }
        Ok(out)
    }

    fn name(&self) -> &'static str {
        FORMAT
    }

    fn text_format(&self) -> TextFormat {
        TextFormat::PlainOrFast
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
