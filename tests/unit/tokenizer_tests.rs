//! Unit tests for the MDP line tokenizer.

use std::io::Cursor;

use otopi_mdp::mdp::LineReader;
use otopi_mdp::AppError;

fn reader(data: &str) -> LineReader<Cursor<Vec<u8>>> {
    LineReader::new(Cursor::new(data.as_bytes().to_vec()))
}

#[test]
fn terminated_lines_are_returned_without_newline() {
    let mut lines = reader("first\nsecond\n");
    assert_eq!(lines.next_line().unwrap(), "first");
    assert_eq!(lines.next_line().unwrap(), "second");
}

#[test]
fn carriage_returns_are_dropped_everywhere() {
    let mut lines = reader("#NOTE\r\nmid\rdle\r\n");
    assert_eq!(lines.next_line().unwrap(), "#NOTE");
    assert_eq!(lines.next_line().unwrap(), "middle");
}

#[test]
fn unterminated_final_line_is_returned() {
    let mut lines = reader("a\nXXX");
    assert_eq!(lines.next_line().unwrap(), "a");
    assert_eq!(lines.next_line().unwrap(), "XXX");
    assert!(matches!(
        lines.next_line(),
        Err(AppError::UnexpectedEndOfStream)
    ));
}

#[test]
fn empty_line_is_not_end_of_stream() {
    let mut lines = reader("\n\n");
    assert_eq!(lines.next_line().unwrap(), "");
    assert_eq!(lines.next_line().unwrap(), "");
}

#[test]
fn empty_input_fails_with_unexpected_end() {
    let mut lines = reader("");
    assert!(matches!(
        lines.next_line(),
        Err(AppError::UnexpectedEndOfStream)
    ));
}

#[test]
fn lone_carriage_return_at_end_counts_as_nothing() {
    let mut lines = reader("line\n\r");
    assert_eq!(lines.next_line().unwrap(), "line");
    assert!(matches!(
        lines.next_line(),
        Err(AppError::UnexpectedEndOfStream)
    ));
}

#[test]
fn invalid_utf8_is_an_io_error() {
    let mut lines = LineReader::new(Cursor::new(vec![0xff, 0xfe, b'\n']));
    match lines.next_line() {
        Err(AppError::Io(msg)) => assert!(msg.contains("UTF-8"), "got: {msg}"),
        other => panic!("expected Err(AppError::Io), got: {other:?}"),
    }
}
