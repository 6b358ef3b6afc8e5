//! Decode/encode context threaded explicitly through the engine, rather
//! than kept in module-level statics. `DecodeContext` accumulates the
//! integer value of every field the engine has read so far (keyed by
//! 1-based field order) so `IndirectLookup`/`Variable` fields can look back
//! at an earlier field without a second parsing pass over the payload;
//! `EncodeContext` is its mirror for writing.
use std::collections::HashMap;

/// State available to a field handler while decoding one PGN instance.
#[derive(Debug)]
pub struct DecodeContext {
    /// Integer value decoded so far for each field, by 1-based `order`.
    /// Populated for every field type that produces an integer-like value
    /// (`Number`, `Lookup`, `BitLookup`, `Mmsi`, `Pgn`…), consulted by
    /// fields whose `context_field`/`Variable` resolution depends on it.
    decoded_integers: HashMap<u16, i64>,
    /// The last-seen value of a field typed `Pgn`, seeded with the PGN being
    /// decoded itself. Fields marked `proprietary` gate on this, not on
    /// `manufacturer_code`.
    ref_pgn: i64,
}

impl DecodeContext {
    pub fn new(pgn: u32) -> Self {
        Self {
            decoded_integers: HashMap::new(),
            ref_pgn: pgn as i64,
        }
    }

    pub fn record(&mut self, order: u16, value: i64) {
        self.decoded_integers.insert(order, value);
    }

    pub fn get(&self, order: u16) -> Option<i64> {
        self.decoded_integers.get(&order).copied()
    }

    pub fn set_ref_pgn(&mut self, value: i64) {
        self.ref_pgn = value;
    }

    pub fn ref_pgn(&self) -> i64 {
        self.ref_pgn
    }
}

/// State available to a field handler while encoding one PGN instance.
#[derive(Debug)]
pub struct EncodeContext {
    /// Integer value written so far for each field, by 1-based `order`,
    /// mirroring `DecodeContext::decoded_integers`.
    encoded_integers: HashMap<u16, i64>,
    /// Mirrors `DecodeContext::ref_pgn`.
    ref_pgn: i64,
}

impl EncodeContext {
    pub fn new(pgn: u32) -> Self {
        Self {
            encoded_integers: HashMap::new(),
            ref_pgn: pgn as i64,
        }
    }

    pub fn record(&mut self, order: u16, value: i64) {
        self.encoded_integers.insert(order, value);
    }

    pub fn get(&self, order: u16) -> Option<i64> {
        self.encoded_integers.get(&order).copied()
    }

    pub fn set_ref_pgn(&mut self, value: i64) {
        self.ref_pgn = value;
    }

    pub fn ref_pgn(&self) -> i64 {
        self.ref_pgn
    }
}
