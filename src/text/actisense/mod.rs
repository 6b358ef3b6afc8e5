//! Actisense N2K ASCII: `A<secs>.<millis> <SRC><DST><PRIO-hex> <PGN-hex>
//! <bytes...>`. The wire format carries no absolute date, only a
//! free-running seconds counter, so the parser infers an epoch from the
//! wall clock the first time it sees a message and holds onto it —
//! `parse` therefore needs `&mut self`, unlike every other format here.
use chrono::{DateTime, Utc};

use super::{Frame, TextFormat, TextParser};
use crate::error::TextFormatError;

const FORMAT: &str = "ACTISENSE_N2K_ASCII";

fn bad(reason: impl Into<String>) -> TextFormatError {
    TextFormatError::BadFrame {
        format: FORMAT,
        reason: reason.into(),
    }
}

struct ParsedLine {
    secs: i64,
    millis: i64,
    priority: u8,
    src: u8,
    dst: u8,
    pgn: u32,
    data: Vec<u8>,
}

fn parse_line(line: &str) -> Result<ParsedLine, TextFormatError> {
    let rest = line.strip_prefix('A').ok_or_else(|| bad("missing leading 'A'"))?;
    let mut fields = rest.split_whitespace();
    let clock = fields.next().ok_or_else(|| bad("missing <secs>.<millis> field"))?;
    let (secs_str, millis_str) = clock.split_once('.').ok_or_else(|| bad("clock field has no '.'"))?;
    let secs: i64 = secs_str.parse().map_err(|_| bad("bad secs"))?;
    let millis: i64 = millis_str.parse().map_err(|_| bad("bad millis"))?;

    let addr_token = fields.next().ok_or_else(|| bad("missing SRC/DST/PRIO field"))?;
    if addr_token.len() != 6 {
        return Err(bad("SRC/DST/PRIO field must be 6 hex digits"));
    }
    let src = u8::from_str_radix(&addr_token[0..2], 16).map_err(|_| bad("bad src"))?;
    let dst = u8::from_str_radix(&addr_token[2..4], 16).map_err(|_| bad("bad dst"))?;
    let priority = u8::from_str_radix(&addr_token[4..6], 16).map_err(|_| bad("bad priority"))?;

    let pgn_token = fields.next().ok_or_else(|| bad("missing PGN field"))?;
    let pgn = u32::from_str_radix(pgn_token, 16).map_err(|_| bad("bad pgn"))?;

    let mut data = Vec::new();
    for byte_hex in fields {
        let byte = u8::from_str_radix(byte_hex, 16).map_err(|_| bad(format!("bad hex byte {byte_hex:?}")))?;
        data.push(byte);
    }

    Ok(ParsedLine {
        secs,
        millis,
        priority,
        src,
        dst,
        pgn,
        data,
    })
}

#[derive(Debug, Default)]
pub struct ActisenseParser {
    epoch0: Option<DateTime<Utc>>,
}

impl ActisenseParser {
    fn timestamp_for(&mut self, secs: i64, millis: i64) -> DateTime<Utc> {
        let offset = chrono::Duration::seconds(secs) + chrono::Duration::milliseconds(millis);
        let epoch0 = *self.epoch0.get_or_insert_with(|| Utc::now() - offset);
        epoch0 + offset
    }
}

impl TextParser for ActisenseParser {
    fn detect(&self, line: &str) -> bool {
        parse_line(line).is_ok()
    }

    fn parse(&mut self, line: &str) -> Result<Frame, TextFormatError> {
        let parsed = parse_line(line)?;
        let timestamp = self.timestamp_for(parsed.secs, parsed.millis);
        Ok(Frame {
            timestamp,
            priority: parsed.priority,
            pgn: parsed.pgn,
            src: parsed.src,
            dst: parsed.dst,
            data: parsed.data,
        })
    }

    fn marshal(&self, frame: &Frame, _is_fast: bool) -> Result<String, TextFormatError> {
        let epoch0 = self.epoch0.unwrap_or(frame.timestamp);
        let elapsed = frame.timestamp - epoch0;
        let secs = elapsed.num_seconds();
        let millis = (elapsed - chrono::Duration::seconds(secs)).num_milliseconds();
        let mut out = format!(
            "A{secs}.{millis:03} {:02X}{:02X}{:02X} {:X}",
            frame.src, frame.dst, frame.priority, frame.pgn
        );
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
        TextFormat::ActisenseN2kAscii
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
