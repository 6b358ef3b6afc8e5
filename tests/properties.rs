//! Representative samples of the universal properties the codec is built
//! to satisfy; not exhaustive (some properties quantify over all 2^29 CAN
//! identifiers or all 2^64 bit-widths/values), but covering a range broad
//! enough to catch a regression in the underlying algorithm.
use n2k_codec::catalog::{entries_for_pgn, FieldType, Lookup, PacketType, PgnField, PgnInfo, Value};
use n2k_codec::infra::codec::bits::{BitReader, BitWriter};
use n2k_codec::infra::codec::engine::{decode_fields, encode_fields};
use n2k_codec::protocol::transport::can_id::{pack_can_id, unpack_can_id};
use n2k_codec::protocol::transport::fast_packet::assembler::{FastPacketAssembler, ProcessResult};
use n2k_codec::protocol::transport::fast_packet::builder::split_into_frames;
use indexmap::IndexMap;

// Property 3: decode -> encode -> decode is idempotent. All-zero payloads,
// since lookup code 0 is valid for every lookup table either of these two
// PGNs references (checked against the bundled PGN database), so the
// result is well-defined regardless of bit-order/signedness assumptions.
#[test]
fn decode_encode_decode_is_idempotent_for_known_pgns() {
    // Byte lengths are the PGNs' documented fixed message lengths (Rudder:
    // single 8-byte frame; GNSS Position Data: 43-byte Fast Packet message).
    for &(pgn, byte_len) in &[(127245u32, 8usize), (129029u32, 43usize)] {
        let info = entries_for_pgn(pgn).into_iter().next().unwrap();
        let payload = vec![0u8; byte_len];
        let first = decode_fields(info, &payload).unwrap();
        let re_encoded = encode_fields(info, &first).unwrap();
        let second = decode_fields(info, &re_encoded).unwrap();
        assert_eq!(first, second, "pgn {pgn} did not round-trip");
    }
}

// Property 1: CAN-ID round-trip. Sampled across PDU1 (addressed) and PDU2
// (broadcast) PGN shapes, since the pack/unpack asymmetry (destination only
// exists for PDU1) is the one place a round-trip could silently drop data.
#[test]
fn can_id_round_trips_across_a_sample_of_priorities_pgns_and_addresses() {
    let pdu1_pgns = [0x1_2300u32, 0x0_EF00, 0x1_0000];
    let pdu2_pgns = [126720u32, 130816, 0x1F513];

    for &pgn in &pdu1_pgns {
        for priority in 0..=7u8 {
            for src in [0u8, 1, 128, 255] {
                for dst in [0u8, 42, 255] {
                    let id = pack_can_id(priority, pgn, src, dst).unwrap();
                    let (p2, pgn2, src2, dst2) = unpack_can_id(id);
                    let id2 = pack_can_id(p2, pgn2, src2, dst2).unwrap();
                    assert_eq!(id, id2, "round trip failed for pgn={pgn:#x} src={src} dst={dst}");
                }
            }
        }
    }

    for &pgn in &pdu2_pgns {
        for priority in 0..=7u8 {
            for src in [0u8, 1, 128, 255] {
                let id = pack_can_id(priority, pgn, src, 0xFF).unwrap();
                let (p2, pgn2, src2, dst2) = unpack_can_id(id);
                let id2 = pack_can_id(p2, pgn2, src2, dst2).unwrap();
                assert_eq!(id, id2, "round trip failed for pgn={pgn:#x} src={src}");
            }
        }
    }
}

// Property 2: bit codec round-trip across a spread of widths and values,
// both signed and unsigned.
#[test]
fn bit_codec_round_trips_a_spread_of_widths_and_values() {
    let cases: &[(u8, i64)] = &[
        (1, 0),
        (1, -1),
        (3, 3),
        (3, -4),
        (8, 127),
        (8, -128),
        (16, 12345),
        (16, -12345),
        (32, 1_000_000),
        (32, -1_000_000),
        (63, i64::MAX >> 1),
        (63, -(i64::MAX >> 1)),
    ];
    for &(width, value) in cases {
        let mut buffer = vec![0u8; 8];
        {
            let mut writer = BitWriter::new(&mut buffer);
            writer.write_signed(value, width).unwrap();
        }
        let mut reader = BitReader::new(&buffer);
        assert_eq!(reader.read_signed(width).unwrap(), value, "width={width} value={value}");
    }
}

// Property 4: Fast Packet fragments arriving in a shuffled order (frame 0
// always first, since it's what opens the reassembly session) still
// reconstruct the original payload.
#[test]
fn fast_packet_reassembles_shuffled_fragment_order() {
    let payload: Vec<u8> = (0..223u8).map(|b| b.wrapping_mul(7)).collect();
    let mut frames = split_into_frames(&payload, 3).unwrap();
    assert_eq!(frames.len(), 32);

    let frame0 = frames.remove(0);
    // Reverse the remaining fragments: the opposite of arrival order, still
    // all after frame 0.
    frames.reverse();

    let mut assembler = FastPacketAssembler::new();
    let mut completed = None;
    assert!(matches!(
        assembler.process_frame(7, 129540, &frame0),
        ProcessResult::FragmentConsumed
    ));
    for frame in &frames {
        if let ProcessResult::MessageComplete(message) = assembler.process_frame(7, 129540, frame) {
            completed = Some(message.payload);
        }
    }
    assert_eq!(completed.unwrap(), payload);
}

const MISSING_FIELD: PgnField = PgnField {
    name: "value",
    description: "missing-value sentinel test field",
    order: 1,
    size: 16,
    offset: 0,
    resolution: 0.0,
    has_sign: false,
    proprietary: false,
    missing_value_is_one: true,
    unit: None,
    lookup: Lookup::None,
    context_field: None,
    field_type: FieldType::Number,
};

const MISSING_PGN: PgnInfo = PgnInfo {
    pgn: 2,
    description: "missing-value sentinel test PGN",
    packet_type: PacketType::Single,
    field_count: 1,
    matcher: &[],
    repeating1: None,
    repeating2: None,
    fields: &[MISSING_FIELD],
};

// Property 6: an all-ones NUMBER field decodes to `Missing`, and a `Missing`
// value re-encodes to the all-ones sentinel.
#[test]
fn missing_value_round_trips_through_the_all_ones_sentinel() {
    let decoded = decode_fields(&MISSING_PGN, &[0xFF, 0xFF]).unwrap();
    assert_eq!(decoded.get("value"), Some(&Value::Missing));

    let mut fields = IndexMap::new();
    fields.insert("value".to_string(), Value::Missing);
    let encoded = encode_fields(&MISSING_PGN, &fields).unwrap();
    assert_eq!(encoded, vec![0xFF, 0xFF]);
}
