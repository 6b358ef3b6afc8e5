use super::*;

#[test]
fn detects_iso8601_line() {
    let parser = PlainOrFastParser;
    assert!(parser.detect("2024-09-04T15:14:01.234Z,2,127245,1,255,3,01,02,03"));
    assert!(!parser.detect("not,a,valid,line"));
}

#[test]
fn parses_declared_bytes_regardless_of_length() {
    let mut parser = PlainOrFastParser;
    let line = "2024-09-04T15:14:01.234Z,2,127245,1,255,3,01,02,03";
    let frame = parser.parse(line).unwrap();
    assert_eq!(frame.pgn, 127245);
    assert_eq!(frame.priority, 2);
    assert_eq!(frame.src, 1);
    assert_eq!(frame.dst, 255);
    assert_eq!(frame.data, vec![1, 2, 3]);
}

#[test]
fn rejects_length_mismatch() {
    let mut parser = PlainOrFastParser;
    let line = "2024-09-04T15:14:01.234Z,2,127245,1,255,5,01,02,03";
    assert!(parser.parse(line).is_err());
}

#[test]
fn parses_dashed_timestamp_variant() {
    let mut parser = PlainOrFastParser;
    let line = "2024-09-04-15:14:01.234,2,127245,1,255,1,01";
    let frame = parser.parse(line).unwrap();
    assert_eq!(frame.data, vec![1]);
}

#[test]
fn marshal_round_trips_through_parse() {
    let mut parser = PlainOrFastParser;
    let line = "2024-09-04T15:14:01.234Z,2,127245,1,255,3,01,02,03";
    let frame = parser.parse(line).unwrap();
    let rendered = parser.marshal(&frame, false).unwrap();
    let reparsed = parser.parse(&rendered).unwrap();
    assert_eq!(reparsed.pgn, frame.pgn);
    assert_eq!(reparsed.data, frame.data);
}
