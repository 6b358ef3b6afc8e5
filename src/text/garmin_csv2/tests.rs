use super::*;

#[test]
fn detect_only_checks_field_count() {
    let parser = GarminCsv2Parser;
    assert!(parser.detect("Timestamp,PGN,Priority,Source,Destination,Length,Data"));
    assert!(parser.detect("1000,127245,2,1,255,3,01,02,03"));
    assert!(!parser.detect("too,few,fields"));
}

#[test]
fn parses_epoch_millis_timestamp() {
    let mut parser = GarminCsv2Parser;
    let frame = parser.parse("1000,127245,2,1,255,3,01,02,03").unwrap();
    assert_eq!(frame.pgn, 127245);
    assert_eq!(frame.timestamp, DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::milliseconds(1000));
    assert_eq!(frame.data, vec![1, 2, 3]);
}

#[test]
fn parses_textual_timestamp() {
    let mut parser = GarminCsv2Parser;
    let frame = parser.parse("2024-09-04 15:14:01.234,127245,2,1,255,1,01").unwrap();
    assert_eq!(frame.pgn, 127245);
}

#[test]
fn rejects_header_row_as_data() {
    let mut parser = GarminCsv2Parser;
    assert!(parser.parse("Timestamp,PGN,Priority,Source,Destination,Length,Data").is_err());
}
