use super::*;
use crate::protocol::transport::fast_packet::builder::split_into_frames;
use crate::text::Frame as TextFrame;
use chrono::Utc;

const RUDDER_PGN: u32 = 127245;
const GNSS_PGN: u32 = 129029;

fn zero_frame(pgn: u32, data: Vec<u8>) -> TextFrame {
    TextFrame {
        timestamp: Utc::now(),
        priority: 2,
        pgn,
        src: 1,
        dst: 255,
        data,
    }
}

#[test]
fn decode_raw_decodes_a_known_single_frame_pgn() {
    let decoder = Decoder::new();
    let raw = RawMessage {
        timestamp: Utc::now(),
        priority: 2,
        pgn: RUDDER_PGN,
        src: 1,
        dst: 255,
        data: vec![0u8; 8],
    };
    let message = decoder.decode_raw(&raw).unwrap();
    assert_eq!(message.pgn, RUDDER_PGN);
    assert!(message.fields.contains_key("instance"));
}

#[test]
fn single_frame_pgn_bypasses_reassembly() {
    let mut decoder = Decoder::new();
    let dispatched = DispatchedFrame {
        frame: zero_frame(RUDDER_PGN, vec![0u8; 8]),
        multi_packets_coalesced: false,
    };
    let messages = decoder.decode_dispatched(dispatched).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].pgn, RUDDER_PGN);
}

#[test]
fn coalesced_format_bypasses_reassembly_even_for_a_fast_pgn() {
    let mut decoder = Decoder::new();
    let dispatched = DispatchedFrame {
        frame: zero_frame(GNSS_PGN, vec![0u8; 43]),
        multi_packets_coalesced: true,
    };
    let messages = decoder.decode_dispatched(dispatched).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].pgn, GNSS_PGN);
}

#[test]
fn fast_pgn_reassembles_across_frames_before_decoding() {
    let mut decoder = Decoder::new();
    let frames = split_into_frames(&vec![0u8; 43], 0).unwrap();
    assert!(frames.len() > 1, "a 43-byte payload must span multiple frames");

    let mut results = Vec::new();
    for frame_bytes in &frames {
        let dispatched = DispatchedFrame {
            frame: zero_frame(GNSS_PGN, frame_bytes.clone()),
            multi_packets_coalesced: false,
        };
        results.push(decoder.decode_dispatched(dispatched).unwrap());
    }

    let (last, earlier) = results.split_last().unwrap();
    assert!(earlier.iter().all(Vec::is_empty), "only the final frame should complete the message");
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].pgn, GNSS_PGN);
}

#[test]
fn unknown_pgn_is_treated_as_an_in_flight_fast_packet_fragment() {
    let mut decoder = Decoder::new();
    let mut data = vec![0u8; 8];
    data[1] = 10; // declares a 10-byte payload, needing a second frame
    let dispatched = DispatchedFrame {
        frame: zero_frame(999_999, data),
        multi_packets_coalesced: false,
    };
    let messages = decoder.decode_dispatched(dispatched).unwrap();
    assert!(messages.is_empty());
}
