//! NMEA 2000 Fast Packet assembler: rebuilds application payloads by
//! aggregating the CAN frames of a multi-packet session, keyed by
//! `(source address, PGN, sequence id)`. Fragments may arrive in any order
//! within a session; the session completes once every expected frame index
//! has been seen. The session pool is a bounded LRU (see `MAX_SESSIONS`) so a
//! long-running decoder has a hard memory ceiling even though fast packet
//! sessions never time out on their own.
use indexmap::IndexMap;

use super::MAX_FAST_PACKET_PAYLOAD;

/// Bound on concurrently in-flight sessions; the least-recently-touched
/// session is evicted once this is exceeded.
const MAX_SESSIONS: usize = 256;

#[derive(Debug)]
pub enum ProcessResult {
    /// Frame not recognized as Fast Packet or discarded (bad length, unknown session).
    Ignored,
    /// Frame integrated but fragments are still missing.
    FragmentConsumed,
    /// Every expected fragment has arrived; the payload is complete.
    MessageComplete(CompletedMessage),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CompletedMessage {
    pub payload: Vec<u8>,
}

type SessionKey = (u8, u32, u8); // (source_address, pgn, sequence_id)

#[derive(Debug, Clone)]
struct Session {
    buffer: [u8; MAX_FAST_PACKET_PAYLOAD],
    expected_size: usize,
    /// Bit `k` set means frame `k` has been received.
    received: u32,
}

impl Session {
    fn frames_needed(&self) -> u32 {
        1 + (self.expected_size.saturating_sub(6)).div_ceil(7) as u32
    }

    fn is_complete(&self) -> bool {
        let needed = self.frames_needed();
        let mask = if needed >= 32 { u32::MAX } else { (1u32 << needed) - 1 };
        self.received & mask == mask
    }
}

/// Main assembler: owns a bounded pool of in-flight reassembly sessions.
#[derive(Debug, Default)]
pub struct FastPacketAssembler {
    sessions: IndexMap<SessionKey, Session>,
}

impl FastPacketAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one CAN frame's raw payload (`data`, 1-8 bytes) for `source_address`/`pgn`.
    pub fn process_frame(&mut self, source_address: u8, pgn: u32, data: &[u8]) -> ProcessResult {
        if data.is_empty() {
            return ProcessResult::Ignored;
        }
        let frame_index = data[0] & 0x1F;
        let sequence_id = (data[0] >> 5) & 0x07;
        let key: SessionKey = (source_address, pgn, sequence_id);

        if frame_index == 0 {
            if data.len() < 2 {
                return ProcessResult::Ignored;
            }
            let expected_size = data[1] as usize;
            if !(8..=MAX_FAST_PACKET_PAYLOAD).contains(&expected_size) {
                return ProcessResult::Ignored;
            }

            // Frame 0 resets any prior in-flight entry for the same (src, pgn),
            // regardless of sequence id.
            self.sessions.retain(|k, _| !(k.0 == source_address && k.1 == pgn));

            let mut session = Session {
                buffer: [0u8; MAX_FAST_PACKET_PAYLOAD],
                expected_size,
                received: 0,
            };
            let n = 6.min(expected_size).min(data.len().saturating_sub(2));
            session.buffer[..n].copy_from_slice(&data[2..2 + n]);
            session.received |= 1;
            self.insert(key, session);
        } else {
            let Some(session) = self.sessions.get_mut(&key) else {
                return ProcessResult::Ignored;
            };
            if session.received & (1 << frame_index) != 0 {
                log::debug!(
                    "dropping duplicate fast-packet frame {frame_index} for src={source_address} pgn={pgn} seq={sequence_id}"
                );
                return ProcessResult::Ignored;
            }
            let offset = 6 + 7 * (frame_index as usize - 1);
            if offset >= session.expected_size {
                return ProcessResult::Ignored;
            }
            let n = (session.expected_size - offset).min(7).min(data.len().saturating_sub(1));
            session.buffer[offset..offset + n].copy_from_slice(&data[1..1 + n]);
            session.received |= 1 << frame_index;
            self.touch(&key);
        }

        let session = self.sessions.get(&key).expect("session was just inserted or updated");
        if session.is_complete() {
            let payload = session.buffer[..session.expected_size].to_vec();
            self.sessions.shift_remove(&key);
            ProcessResult::MessageComplete(CompletedMessage { payload })
        } else {
            ProcessResult::FragmentConsumed
        }
    }

    fn insert(&mut self, key: SessionKey, session: Session) {
        self.sessions.shift_remove(&key);
        self.sessions.insert(key, session);
        while self.sessions.len() > MAX_SESSIONS {
            self.sessions.shift_remove_index(0);
        }
    }

    fn touch(&mut self, key: &SessionKey) {
        if let Some(index) = self.sessions.get_index_of(key) {
            let last = self.sessions.len() - 1;
            self.sessions.move_index(index, last);
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
