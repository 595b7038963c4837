//! Unit tests for the NDJSON rendering of decoded events.

use std::io::Cursor;

use otopi_mdp::decode::write_events;
use otopi_mdp::mdp::{Event, ReplyValue};
use otopi_mdp::AppError;

fn json(event: &Event) -> String {
    serde_json::to_string(event).expect("event serialises")
}

fn decode(data: &str) -> (usize, String) {
    let mut out = Vec::new();
    let count = write_events(Cursor::new(data.as_bytes().to_vec()), &mut out).expect("decodes");
    (count, String::from_utf8(out).expect("utf8 output"))
}

#[test]
fn each_event_kind_has_a_stable_json_shape() {
    let cases = [
        (
            Event::Note {
                note: "hello".into(),
            },
            r#"{"type":"note","note":"hello"}"#,
        ),
        (
            Event::Log {
                severity: "INFO".into(),
                record: "starting".into(),
            },
            r#"{"type":"log","severity":"INFO","record":"starting"}"#,
        ),
        (Event::Terminate, r#"{"type":"terminate"}"#),
        (
            Event::QueryString {
                name: "password".into(),
            },
            r#"{"type":"query_string","name":"password"}"#,
        ),
        (
            Event::QueryMultiString {
                name: "hosts".into(),
                boundary: "END".into(),
                abort_boundary: "ABORT".into(),
            },
            r#"{"type":"query_multi_string","name":"hosts","boundary":"END","abort_boundary":"ABORT"}"#,
        ),
        (
            Event::QueryValue {
                name: "port".into(),
            },
            r#"{"type":"query_value","name":"port"}"#,
        ),
        (
            Event::Confirm {
                what: "gpg".into(),
                description: "Verify key?".into(),
            },
            r#"{"type":"confirm","what":"gpg","description":"Verify key?"}"#,
        ),
        (
            Event::DisplayValue {
                name: "port".into(),
                value: ReplyValue::Int(443),
            },
            r#"{"type":"display_value","name":"port","value":443}"#,
        ),
        (
            Event::DisplayMultiString {
                name: "summary".into(),
                boundary: "EOF".into(),
                value: vec!["a".into(), "b".into()],
            },
            r#"{"type":"display_multi_string","name":"summary","boundary":"EOF","value":["a","b"]}"#,
        ),
    ];
    for (event, expected) in cases {
        assert_eq!(json(&event), expected, "{:?}", event.kind());
    }
}

#[test]
fn display_values_keep_their_json_type() {
    let cases = [
        (ReplyValue::Absent, "null"),
        (ReplyValue::Str("4.5".into()), r#""4.5""#),
        (ReplyValue::Bool(true), "true"),
        (ReplyValue::Int(-7), "-7"),
    ];
    for (value, expected) in cases {
        assert_eq!(serde_json::to_string(&value).unwrap(), expected);
        let event = Event::DisplayValue {
            name: "a".into(),
            value,
        };
        assert_eq!(
            json(&event),
            format!(r#"{{"type":"display_value","name":"a","value":{expected}}}"#)
        );
    }
}

#[test]
fn writes_one_line_per_event_and_skips_unmatched_lines() {
    let (count, out) = decode(concat!(
        "### welcome\n",
        "garbage\n",
        "***D:VALUE v=none:None\n",
        "***D:MULTI-STRING log EOL\n",
        "line one\n",
        "EOL\n",
        "***TERMINATE\n",
    ));

    assert_eq!(count, 4);
    assert_eq!(
        out,
        concat!(
            "{\"type\":\"note\",\"note\":\"welcome\"}\n",
            "{\"type\":\"display_value\",\"name\":\"v\",\"value\":null}\n",
            "{\"type\":\"display_multi_string\",\"name\":\"log\",\"boundary\":\"EOL\",\"value\":[\"line one\"]}\n",
            "{\"type\":\"terminate\"}\n",
        )
    );
}

#[test]
fn stops_at_terminate() {
    let (count, out) = decode("***TERMINATE\n***Q:VALUE late\n");
    assert_eq!(count, 1);
    assert_eq!(out, "{\"type\":\"terminate\"}\n");
}

#[test]
fn end_of_input_without_terminate_is_not_an_error() {
    let (count, out) = decode("***Q:VALUE port\n");
    assert_eq!(count, 1);
    assert_eq!(out, "{\"type\":\"query_value\",\"name\":\"port\"}\n");

    assert_eq!(decode(""), (0, String::new()));
}

#[test]
fn classification_errors_propagate() {
    let mut out = Vec::new();
    let err = write_events(Cursor::new(b"***D:VALUE x=weird:1\n".to_vec()), &mut out)
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidValueType(tag) if tag == "weird"));
    assert!(out.is_empty());
}
