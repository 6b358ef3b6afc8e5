//! Fast Packet reassembly tests covering sequencing, sessions, and any-order delivery.
use super::*;

impl PartialEq for ProcessResult {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ProcessResult::Ignored, ProcessResult::Ignored) => true,
            (ProcessResult::FragmentConsumed, ProcessResult::FragmentConsumed) => true,
            (ProcessResult::MessageComplete(a), ProcessResult::MessageComplete(b)) => a == b,
            _ => false,
        }
    }
}
impl Eq for ProcessResult {}

const PGN: u32 = 129029;

#[test]
fn full_fast_packet_reassembly() {
    let mut assembler = FastPacketAssembler::new();
    let source_address = 42;

    let frame0: [u8; 8] = [0b000_00000, 15, 1, 2, 3, 4, 5, 6];
    assert_eq!(
        assembler.process_frame(source_address, PGN, &frame0),
        ProcessResult::FragmentConsumed
    );

    let frame1: [u8; 8] = [0b000_00001, 7, 8, 9, 10, 11, 12, 13];
    assert_eq!(
        assembler.process_frame(source_address, PGN, &frame1),
        ProcessResult::FragmentConsumed
    );

    let frame2: [u8; 8] = [0b000_00010, 14, 15, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
    let result = assembler.process_frame(source_address, PGN, &frame2);

    let expected = CompletedMessage {
        payload: (1..=15).collect(),
    };
    assert_eq!(result, ProcessResult::MessageComplete(expected));
}

#[test]
fn frames_arriving_out_of_order_still_reassemble() {
    let mut assembler = FastPacketAssembler::new();
    let source_address = 42;

    let frame0: [u8; 8] = [0b000_00000, 15, 1, 2, 3, 4, 5, 6];
    let frame1: [u8; 8] = [0b000_00001, 7, 8, 9, 10, 11, 12, 13];
    let frame2: [u8; 8] = [0b000_00010, 14, 15, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

    assert_eq!(
        assembler.process_frame(source_address, PGN, &frame0),
        ProcessResult::FragmentConsumed
    );
    assert_eq!(
        assembler.process_frame(source_address, PGN, &frame2),
        ProcessResult::FragmentConsumed
    );
    let result = assembler.process_frame(source_address, PGN, &frame1);

    let expected = CompletedMessage {
        payload: (1..=15).collect(),
    };
    assert_eq!(result, ProcessResult::MessageComplete(expected));
}

#[test]
fn frame_zero_resets_an_abandoned_session_for_the_same_src_pgn() {
    let mut assembler = FastPacketAssembler::new();
    let source_address = 10;

    let abandoned: [u8; 8] = [0b011_00000, 15, 1, 2, 3, 4, 5, 6];
    assembler.process_frame(source_address, PGN, &abandoned);

    // A fresh frame 0 (different sequence) for the same (src, pgn) restarts reassembly.
    let fresh0: [u8; 8] = [0b001_00000, 9, 21, 22, 23, 24, 25, 26];
    assert_eq!(
        assembler.process_frame(source_address, PGN, &fresh0),
        ProcessResult::FragmentConsumed
    );
    let fresh1: [u8; 8] = [0b001_00001, 27, 28, 29, 0xFF, 0xFF, 0xFF, 0xFF];
    let result = assembler.process_frame(source_address, PGN, &fresh1);
    let expected = CompletedMessage {
        payload: vec![21, 22, 23, 24, 25, 26, 27, 28, 29],
    };
    assert_eq!(result, ProcessResult::MessageComplete(expected));
}

#[test]
fn multiple_concurrent_sessions_by_source() {
    let mut assembler = FastPacketAssembler::new();
    let source_a = 10;
    let source_b = 20;

    let frame_a0: [u8; 8] = [0, 10, 1, 2, 3, 4, 5, 6];
    assert_eq!(
        assembler.process_frame(source_a, PGN, &frame_a0),
        ProcessResult::FragmentConsumed
    );
    let frame_b0: [u8; 8] = [0, 9, 100, 101, 102, 103, 104, 105];
    assert_eq!(
        assembler.process_frame(source_b, PGN, &frame_b0),
        ProcessResult::FragmentConsumed
    );

    let frame_a1: [u8; 8] = [1, 7, 8, 9, 10, 0xFF, 0xFF, 0xFF];
    let expected_a = CompletedMessage {
        payload: vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
    };
    assert_eq!(
        assembler.process_frame(source_a, PGN, &frame_a1),
        ProcessResult::MessageComplete(expected_a)
    );

    let frame_b1: [u8; 8] = [1, 106, 107, 108, 0xFF, 0xFF, 0xFF, 0xFF];
    let expected_b = CompletedMessage {
        payload: vec![100, 101, 102, 103, 104, 105, 106, 107, 108],
    };
    assert_eq!(
        assembler.process_frame(source_b, PGN, &frame_b1),
        ProcessResult::MessageComplete(expected_b)
    );
}

#[test]
fn interleaved_sequences_same_source_do_not_interfere() {
    let mut assembler = FastPacketAssembler::new();
    let source = 7;

    let frame_a0: [u8; 8] = [0b001_00000, 10, 1, 2, 3, 4, 5, 6];
    assert_eq!(
        assembler.process_frame(source, PGN, &frame_a0),
        ProcessResult::FragmentConsumed
    );

    let frame_b0: [u8; 8] = [0b010_00000, 9, 21, 22, 23, 24, 25, 26];
    assert_eq!(
        assembler.process_frame(source, PGN, &frame_b0),
        ProcessResult::FragmentConsumed
    );

    let frame_b1: [u8; 8] = [0b010_00001, 27, 28, 29, 0xFF, 0xFF, 0xFF, 0xFF];
    let expected_b = CompletedMessage {
        payload: vec![21, 22, 23, 24, 25, 26, 27, 28, 29],
    };
    assert_eq!(
        assembler.process_frame(source, PGN, &frame_b1),
        ProcessResult::MessageComplete(expected_b)
    );

    let frame_a1: [u8; 8] = [0b001_00001, 7, 8, 9, 10, 0xFF, 0xFF, 0xFF];
    let expected_a = CompletedMessage {
        payload: vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
    };
    assert_eq!(
        assembler.process_frame(source, PGN, &frame_a1),
        ProcessResult::MessageComplete(expected_a)
    );
}

#[test]
fn unknown_continuation_frame_is_ignored() {
    let mut assembler = FastPacketAssembler::new();
    let frame1: [u8; 8] = [0b000_00001, 7, 8, 9, 10, 11, 12, 13];
    assert_eq!(
        assembler.process_frame(1, PGN, &frame1),
        ProcessResult::Ignored
    );
}

#[test]
fn duplicate_continuation_frame_is_dropped_without_overwriting() {
    let mut assembler = FastPacketAssembler::new();
    let source_address = 5;

    let frame0: [u8; 8] = [0b000_00000, 15, 1, 2, 3, 4, 5, 6];
    assembler.process_frame(source_address, PGN, &frame0);

    let frame1: [u8; 8] = [0b000_00001, 7, 8, 9, 10, 11, 12, 13];
    assembler.process_frame(source_address, PGN, &frame1);

    // A retransmitted copy of frame 1 with different (corrupt) bytes must be
    // dropped, not allowed to overwrite the bytes already stored.
    let frame1_retransmit: [u8; 8] = [0b000_00001, 0, 0, 0, 0, 0, 0, 0];
    assert_eq!(
        assembler.process_frame(source_address, PGN, &frame1_retransmit),
        ProcessResult::Ignored
    );

    let frame2: [u8; 8] = [0b000_00010, 14, 15, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
    let result = assembler.process_frame(source_address, PGN, &frame2);
    let expected = CompletedMessage {
        payload: (1..=15).collect(),
    };
    assert_eq!(result, ProcessResult::MessageComplete(expected));
}

#[test]
fn session_pool_evicts_least_recently_touched_past_the_bound() {
    let mut assembler = FastPacketAssembler::new();
    for pgn in 0..(MAX_SESSIONS as u32 + 10) {
        let frame0: [u8; 8] = [0, 15, 1, 2, 3, 4, 5, 6];
        assembler.process_frame(1, pgn, &frame0);
    }
    assert!(assembler.sessions.len() <= MAX_SESSIONS);
}
