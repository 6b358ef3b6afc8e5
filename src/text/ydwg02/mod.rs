//! YDWG02 (Yacht Devices gateway log format):
//! `HH:MM:SS.mmm (R|T) <CANID-hex> <b0> <b1> ...`. The line only carries a
//! time of day; the date is the wall clock at parse time.
use chrono::{NaiveTime, TimeZone, Utc};

use super::{Frame, TextFormat, TextParser};
use crate::error::TextFormatError;
use crate::protocol::transport::can_id::{pack_can_id, unpack_can_id};

const FORMAT: &str = "YDWG02";

fn bad(reason: impl Into<String>) -> TextFormatError {
    TextFormatError::BadFrame {
        format: FORMAT,
        reason: reason.into(),
    }
}

#[derive(Debug, Default)]
pub struct Ydwg02Parser;

impl Ydwg02Parser {
    fn try_parse(line: &str) -> Result<Frame, TextFormatError> {
        let mut fields = line.split_whitespace();
        let time_of_day = fields.next().ok_or_else(|| bad("missing time-of-day field"))?;
        let direction = fields.next().ok_or_else(|| bad("missing direction marker"))?;
        if direction != "R" && direction != "T" {
            return Err(bad(format!("direction marker must be R or T, got {direction:?}")));
        }
        let can_id_hex = fields.next().ok_or_else(|| bad("missing CAN ID field"))?;
        if can_id_hex.len() != 8 {
            return Err(bad("CAN ID must be 8 hex digits"));
        }
        let can_id = u32::from_str_radix(can_id_hex, 16).map_err(|_| bad("CAN ID is not hex"))?;

        let mut data = Vec::new();
        for byte_hex in fields {
            let byte = u8::from_str_radix(byte_hex, 16).map_err(|_| bad(format!("bad hex byte {byte_hex:?}")))?;
            data.push(byte);
        }

        let time = NaiveTime::parse_from_str(time_of_day, "%H:%M:%S%.3f")
            .map_err(|_| bad(format!("unrecognized time-of-day {time_of_day:?}")))?;
        let today = Utc::now().date_naive();
        let timestamp = Utc.from_utc_datetime(&today.and_time(time));

        let (priority, pgn, src, dst) = unpack_can_id(can_id);
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

impl TextParser for Ydwg02Parser {
    fn detect(&self, line: &str) -> bool {
        Self::try_parse(line).is_ok()
    }

    fn parse(&mut self, line: &str) -> Result<Frame, TextFormatError> {
        Self::try_parse(line)
    }

    fn marshal(&self, frame: &Frame, _is_fast: bool) -> Result<String, TextFormatError> {
        let can_id = pack_can_id(frame.priority, frame.pgn, frame.src, frame.dst)
            .map_err(|e| bad(format!("cannot pack CAN ID: {e}")))?;
        let mut out = format!("{} T {can_id:08X}", frame.timestamp.format("%H:%M:%S%.3f"));
        for byte in &frame.data {
            out.push(' ');
            out.push_str(&format!("{byte:02X}"));
        }
        Ok(out)
    }

    fn name(&self) -> &'static str {
        FORMAT
    }

    fn text_format(&self) -> TextFormat {
        TextFormat::Ydwg02
    }
}
