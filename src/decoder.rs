//! Top-level decoder: wires the text-format dispatcher (capture-line
//! parsing) to Fast Packet reassembly and the decode engine. A `Decoder`
//! owns both pieces of per-capture state — the dispatcher's sticky-format
//! lock and the assembler's in-flight sessions — across a stream of lines,
//! so callers just feed it lines one at a time.
use crate::catalog::{entries_for_pgn, Message, PacketType, RawMessage};
use crate::error::DecodeError;
use crate::infra::codec::engine::decode_message;
use crate::protocol::transport::fast_packet::assembler::{FastPacketAssembler, ProcessResult};
use crate::text::{DispatchedFrame, Dispatcher};

/// Decodes one capture line at a time. Most lines produce zero messages
/// (a Fast Packet fragment still missing the rest of its session) or one
/// (a complete single-frame message, a coalesced multi-packet line, or the
/// final fragment of a session).
#[derive(Default)]
pub struct Decoder {
    dispatcher: Dispatcher,
    assembler: FastPacketAssembler,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `line` with the text-format dispatcher and decodes the
    /// resulting payload, reassembling Fast Packet fragments as needed.
    pub fn decode_line(&mut self, line: &str) -> Result<Vec<Message>, DecodeError> {
        let dispatched = self
            .dispatcher
            .process_line(line)
            .map_err(|e| DecodeError::BadFrame(e.to_string()))?;
        self.decode_dispatched(dispatched)
    }

    /// Decodes a raw, already fully-assembled payload directly, bypassing
    /// both the text dispatcher and Fast Packet reassembly.
    pub fn decode_raw(&self, raw: &RawMessage) -> Result<Message, DecodeError> {
        decode_message(raw)
    }

    fn decode_dispatched(&mut self, dispatched: DispatchedFrame) -> Result<Vec<Message>, DecodeError> {
        let DispatchedFrame {
            frame,
            multi_packets_coalesced,
        } = dispatched;

        let bypasses_reassembly = multi_packets_coalesced || is_single_frame_pgn(frame.pgn, frame.data.len());

        if bypasses_reassembly {
            let raw = RawMessage {
                timestamp: frame.timestamp,
                priority: frame.priority,
                pgn: frame.pgn,
                src: frame.src,
                dst: frame.dst,
                data: frame.data,
            };
            return Ok(vec![decode_message(&raw)?]);
        }

        match self.assembler.process_frame(frame.src, frame.pgn, &frame.data) {
            ProcessResult::Ignored | ProcessResult::FragmentConsumed => Ok(Vec::new()),
            ProcessResult::MessageComplete(completed) => {
                let raw = RawMessage {
                    timestamp: frame.timestamp,
                    priority: frame.priority,
                    pgn: frame.pgn,
                    src: frame.src,
                    dst: frame.dst,
                    data: completed.payload,
                };
                Ok(vec![decode_message(&raw)?])
            }
        }
    }
}

/// True when the PGN's catalog entry says it always fits one frame and this
/// line's declared payload is short enough to actually be one. PGNs absent
/// from the catalog fall through to Fast Packet reassembly, since nothing
/// here can tell a single-frame unknown PGN apart from the start of a
/// multi-frame one.
fn is_single_frame_pgn(pgn: u32, len: usize) -> bool {
    entries_for_pgn(pgn)
        .first()
        .is_some_and(|info| info.packet_type == PacketType::Single && len <= 8)
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;
