use super::*;

#[test]
fn detects_leading_a_and_clock_field() {
    let parser = ActisenseParser::default();
    assert!(parser.detect("A173321.107 010203 1F513 00 01 02"));
    assert!(!parser.detect("not an actisense line"));
}

#[test]
fn parses_address_and_pgn_fields() {
    let mut parser = ActisenseParser::default();
    let frame = parser.parse("A173321.107 0102FF 1F513 00 01 02").unwrap();
    assert_eq!(frame.src, 0x01);
    assert_eq!(frame.dst, 0x02);
    assert_eq!(frame.priority, 0xFF);
    assert_eq!(frame.pgn, 0x1F513);
    assert_eq!(frame.data, vec![0, 1, 2]);
}

#[test]
fn infers_epoch_on_first_message_and_advances_on_next() {
    let mut parser = ActisenseParser::default();
    let first = parser.parse("A100.000 0102FF 1F513 00").unwrap();
    let second = parser.parse("A101.500 0102FF 1F513 00").unwrap();
    let delta = second.timestamp - first.timestamp;
    assert_eq!(delta.num_milliseconds(), 1500);
}

#[test]
fn rejects_missing_clock_field() {
    let mut parser = ActisenseParser::default();
    assert!(parser.parse("A 0102FF 1F513 00").is_err());
}
