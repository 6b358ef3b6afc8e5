//! Tests for the Fast Packet frame splitter.
use super::*;

#[test]
fn short_payload_still_uses_the_fast_packet_header() {
    let payload = [1, 2, 3, 4, 5];
    let frames = split_into_frames(&payload, 0).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0][0], 0); // seq 0, frame 0
    assert_eq!(frames[0][1], 5); // total length
    assert_eq!(&frames[0][2..7], &payload);
    assert_eq!(frames[0][7], 0xFF); // unused tail byte
}

#[test]
fn ten_byte_payload_splits_into_two_frames() {
    let payload = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    let frames = split_into_frames(&payload, 0).unwrap();
    assert_eq!(frames.len(), 2);

    assert_eq!(frames[0][0], 0);
    assert_eq!(frames[0][1], 10);
    assert_eq!(&frames[0][2..8], &[1, 2, 3, 4, 5, 6]);

    assert_eq!(frames[1][0], 1); // frame index 1, seq 0
    assert_eq!(&frames[1][1..5], &[7, 8, 9, 10]);
    assert_eq!(&frames[1][5..8], &[0xFF, 0xFF, 0xFF]);
}

#[test]
fn max_payload_splits_into_32_frames() {
    let payload = [0xAAu8; super::MAX_FAST_PACKET_PAYLOAD];
    let frames = split_into_frames(&payload, 3).unwrap();
    assert_eq!(frames.len(), 32);
    assert_eq!(frames[0][1], super::MAX_FAST_PACKET_PAYLOAD as u8);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame[0] & 0x1F, i as u8);
        assert_eq!(frame[0] >> 5, 3);
    }
}

#[test]
fn oversized_payload_is_rejected() {
    let payload = vec![0x11u8; super::MAX_FAST_PACKET_PAYLOAD + 1];
    let err = split_into_frames(&payload, 0).unwrap_err();
    assert!(matches!(err, EncodeError::Oversize { .. }));
}

#[test]
fn sequence_id_is_masked_to_three_bits() {
    let payload = [1u8; 3];
    let frames = split_into_frames(&payload, 0xFF).unwrap();
    assert_eq!(frames[0][0] >> 5, 0x07);
}

#[test]
fn forty_three_byte_payload_produces_seven_frames_with_sequential_headers() {
    let payload = [0x42u8; 43];
    let frames = split_into_frames(&payload, 0).unwrap();
    assert_eq!(frames.len(), 7);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame[0], i as u8);
    }
    assert_eq!(frames[0][1], 43);
}
