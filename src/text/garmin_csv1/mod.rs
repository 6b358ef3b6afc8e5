//! Garmin CSV v1: a header line followed by
//! `<pgn>,<priority>,<src>,<dst>,<len>,<b0>,<b1>,...` rows. Decode-only,
//! best-effort grammar (no authoritative reference was available) — flagged
//! alongside Airmar as a judgment call.
use chrono::Utc;

use super::{Frame, TextFormat, TextParser};
use crate::error::TextFormatError;

const FORMAT: &str = "GARMIN_CSV1";
const MIN_FIELDS: usize = 6;

fn bad(reason: impl Into<String>) -> TextFormatError {
    TextFormatError::BadFrame {
        format: FORMAT,
        reason: reason.into(),
    }
}

#[derive(Debug, Default)]
pub struct GarminCsv1Parser;

impl GarminCsv1Parser {
    fn try_parse(line: &str) -> Result<Frame, TextFormatError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < MIN_FIELDS {
            return Err(bad("fewer than 6 comma-separated fields"));
        }
        let pgn: u32 = fields[0].trim().parse().map_err(|_| bad("bad pgn"))?;
        let priority: u8 = fields[1].trim().parse().map_err(|_| bad("bad priority"))?;
        let src: u8 = fields[2].trim().parse().map_err(|_| bad("bad src"))?;
        let dst: u8 = fields[3].trim().parse().map_err(|_| bad("bad dst"))?;
        let len: usize = fields[4].trim().parse().map_err(|_| bad("bad len"))?;

        let byte_fields = &fields[5..];
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
            timestamp: Utc::now(),
            priority,
            pgn,
            src,
            dst,
            data,
        })
    }
}

impl TextParser for GarminCsv1Parser {
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
        TextFormat::GarminCsv1
    }
}
