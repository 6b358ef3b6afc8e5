//! Applies the fixed-priority parser registry to each captured line and
//! tracks the sticky-mode lock a long capture settles into once one format
//! keeps winning.
use super::{Frame, TextFormat, TextParser};
use crate::error::TextFormatError;

/// Consecutive wins by the same parser before the dispatcher stops probing
/// the full priority list and locks onto it.
const STICKY_THRESHOLD: u32 = 3;

/// A parsed `Frame` tagged with whether its source format already delivered
/// the complete PGN payload on this one line (bypassing Fast Packet
/// reassembly) rather than one fragment of a multi-frame message.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedFrame {
    pub frame: Frame,
    pub multi_packets_coalesced: bool,
}

/// Tries each registered parser in a fixed priority order —
/// NavLink2, YDWG02, PLAIN_OR_FAST, GARMIN_CSV1, GARMIN_CSV2, CHETCO,
/// AIRMAR, ACTISENSE_N2K_ASCII — until one claims the line via `detect`.
pub struct Dispatcher {
    parsers: Vec<Box<dyn TextParser>>,
    skipped_header: Vec<bool>,
    locked: Option<usize>,
    last_winner: Option<usize>,
    streak: u32,
}

impl Dispatcher {
    /// Builds the dispatcher with every known format registered in its
    /// mandated detection order.
    pub fn new() -> Self {
        let parsers: Vec<Box<dyn TextParser>> = vec![
            Box::new(super::navlink2::NavLink2Parser::default()),
            Box::new(super::ydwg02::Ydwg02Parser::default()),
            Box::new(super::plain_csv::PlainOrFastParser::default()),
            Box::new(super::garmin_csv1::GarminCsv1Parser::default()),
            Box::new(super::garmin_csv2::GarminCsv2Parser::default()),
            Box::new(super::chetco::ChetcoParser::default()),
            Box::new(super::airmar::AirmarParser::default()),
            Box::new(super::actisense::ActisenseParser::default()),
        ];
        let skipped_header = vec![false; parsers.len()];
        Self {
            parsers,
            skipped_header,
            locked: None,
            last_winner: None,
            streak: 0,
        }
    }

    /// Feeds one captured line (trailing `\r`/`\n` tolerated) through the
    /// registry. Returns `NoParserMatched` for blank lines or lines no
    /// parser recognizes; other errors are the winning parser's own.
    pub fn process_line(&mut self, line: &str) -> Result<DispatchedFrame, TextFormatError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(TextFormatError::NoParserMatched);
        }

        let locked_hit = self.locked.filter(|&index| self.parsers[index].detect(line));
        let index = match locked_hit.or_else(|| (0..self.parsers.len()).find(|&i| self.parsers[i].detect(line))) {
            Some(index) => index,
            None => return Err(TextFormatError::NoParserMatched),
        };

        if self.parsers[index].skip_first_line() && !self.skipped_header[index] {
            self.skipped_header[index] = true;
            log::debug!("skipping header line for {}", self.parsers[index].name());
            return Err(TextFormatError::NoParserMatched);
        }

        let frame = self.parsers[index].parse(line)?;
        self.track_streak(index);
        Ok(DispatchedFrame {
            multi_packets_coalesced: self.parsers[index].multi_packets_coalesced(),
            frame,
        })
    }

    /// The format currently locked onto, once the sticky threshold has been
    /// reached; `None` while still probing every line.
    pub fn locked_format(&self) -> Option<TextFormat> {
        self.locked.map(|index| self.parsers[index].text_format())
    }

    fn track_streak(&mut self, index: usize) {
        if self.locked == Some(index) {
            return;
        }
        if self.last_winner == Some(index) {
            self.streak += 1;
        } else {
            self.last_winner = Some(index);
            self.streak = 1;
        }
        self.locked = if self.streak >= STICKY_THRESHOLD {
            log::debug!("dispatcher locking onto {}", self.parsers[index].name());
            Some(index)
        } else {
            None
        };
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
