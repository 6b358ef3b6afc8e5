use super::*;
use crate::protocol::transport::can_id::pack_can_id;

fn ydwg02_line() -> String {
    let can_id = pack_can_id(2, 127245, 1, 255).unwrap();
    format!("12:34:56.789 R {can_id:08X} 01 02 03")
}

#[test]
fn dispatches_to_the_matching_parser() {
    let mut dispatcher = Dispatcher::new();
    let dispatched = dispatcher.process_line(&ydwg02_line()).unwrap();
    assert_eq!(dispatched.frame.pgn, 127245);
    assert!(!dispatched.multi_packets_coalesced);
}

#[test]
fn prefers_earlier_entries_in_priority_order() {
    // NavLink2 is checked before YDWG02; a NavLink2 line must never be
    // misrouted to a later parser even if one happened to also match.
    let mut dispatcher = Dispatcher::new();
    let dispatched = dispatcher
        .process_line("!PDGY,130306,2,1,255,12345,AAECAwQFBgc")
        .unwrap();
    assert_eq!(dispatched.frame.pgn, 130306);
    assert!(dispatched.multi_packets_coalesced);
}

#[test]
fn locks_onto_a_format_after_sticky_threshold_wins() {
    let mut dispatcher = Dispatcher::new();
    assert_eq!(dispatcher.locked_format(), None);
    for _ in 0..STICKY_THRESHOLD {
        dispatcher.process_line(&ydwg02_line()).unwrap();
    }
    assert_eq!(dispatcher.locked_format(), Some(TextFormat::Ydwg02));
}

#[test]
fn unrecognized_line_is_an_error() {
    let mut dispatcher = Dispatcher::new();
    assert!(matches!(
        dispatcher.process_line("garbage line nobody understands"),
        Err(TextFormatError::NoParserMatched)
    ));
}

#[test]
fn blank_line_is_an_error_without_touching_any_parser() {
    let mut dispatcher = Dispatcher::new();
    assert!(matches!(dispatcher.process_line("\r\n"), Err(TextFormatError::NoParserMatched)));
}
