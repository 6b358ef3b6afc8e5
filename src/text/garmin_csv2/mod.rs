//! Garmin CSV v2: like v1 but with a leading timestamp column —
//! `<timestamp>,<pgn>,<priority>,<src>,<dst>,<len>,<b0>,<b1>,...`.
//! Decode-only, best-effort grammar — same judgment call as v1 and Airmar.
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use super::{Frame, TextFormat, TextParser};
use crate::error::TextFormatError;

const FORMAT: &str = "GARMIN_CSV2";
const MIN_FIELDS: usize = 7;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn bad(reason: impl Into<String>) -> TextFormatError {
    TextFormatError::BadFrame {
        format: FORMAT,
        reason: reason.into(),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(millis) = raw.parse::<i64>() {
        return Some(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::milliseconds(millis));
    }
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[derive(Debug, Default)]
pub struct GarminCsv2Parser;

impl GarminCsv2Parser {
    fn try_parse(line: &str) -> Result<Frame, TextFormatError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < MIN_FIELDS {
            return Err(bad("fewer than 7 comma-separated fields"));
        }
        let timestamp = parse_timestamp(fields[0].trim())
            .ok_or_else(|| bad(format!("unrecognized timestamp {:?}", fields[0])))?;
        let pgn: u32 = fields[1].trim().parse().map_err(|_| bad("bad pgn"))?;
        let priority: u8 = fields[2].trim().parse().map_err(|_| bad("bad priority"))?;
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

impl TextParser for GarminCsv2Parser {
    fn detect(&self, line: &str) -> bool {
        line.split(',').count() >= MIN_FIELDS
    }

    fn parse(&mut self, line: &str) -> Result<Frame, TextFormatError> {
        Self::try_parse(line)
    }

    fn skip_first_line(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        FORMAT
    }

    fn text_format(&self) -> TextFormat {
        TextFormat::GarminCsv2
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
