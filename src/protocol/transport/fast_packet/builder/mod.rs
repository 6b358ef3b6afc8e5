//! Splits an application payload into the CAN frame byte sequence a Fast
//! Packet message travels as. Frames are returned as plain byte vectors —
//! this crate never drives a live bus, so there is no `CanFrame`/send-path
//! concept here, only the framing math.
use super::MAX_FAST_PACKET_PAYLOAD;
use crate::error::EncodeError;

/// Splits `payload` into the Fast Packet frame sequence for `sequence_id`,
/// one 8-byte frame per `Vec<u8>`, tail-padded with `0xFF`. Payloads of 8
/// bytes or fewer still go through the Fast Packet header (byte 0 = frame
/// index, byte 1 = total length on frame 0) rather than the single-frame
/// bypass some text formats use — callers needing that bypass write the
/// payload directly instead of calling this function.
pub fn split_into_frames(payload: &[u8], sequence_id: u8) -> Result<Vec<Vec<u8>>, EncodeError> {
    if payload.len() > MAX_FAST_PACKET_PAYLOAD {
        return Err(EncodeError::Oversize { len: payload.len() });
    }

    let sequence_id = sequence_id & 0x07;
    let mut frames = Vec::new();
    let mut sent = 0usize;
    let mut frame_index: u8 = 0;

    loop {
        let mut data = vec![0xFFu8; 8];
        data[0] = (sequence_id << 5) | (frame_index & 0x1F);

        if frame_index == 0 {
            data[1] = payload.len() as u8;
            let n = 6.min(payload.len() - sent);
            data[2..2 + n].copy_from_slice(&payload[sent..sent + n]);
            sent += n;
        } else {
            let n = 7.min(payload.len() - sent);
            data[1..1 + n].copy_from_slice(&payload[sent..sent + n]);
            sent += n;
        }

        frames.push(data);
        frame_index = frame_index.wrapping_add(1);

        if sent >= payload.len() {
            break;
        }
    }

    Ok(frames)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
