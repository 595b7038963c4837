//! Unit tests for `MachineDialog` over in-memory streams.

use std::io::Cursor;

use otopi_mdp::mdp::{Event, MachineDialog, ReplyRequest, ReplyValue};
use otopi_mdp::AppError;

type MemoryDialog = MachineDialog<Cursor<Vec<u8>>, Vec<u8>>;

fn dialog(data: &str) -> MemoryDialog {
    MachineDialog::new(Cursor::new(data.as_bytes().to_vec()), Vec::new())
}

fn written(dialog: &MemoryDialog) -> String {
    String::from_utf8(dialog.output().clone()).expect("utf8 output")
}

fn next(dialog: &mut MemoryDialog) -> Event {
    dialog
        .next_event()
        .expect("next_event must succeed")
        .expect("line must match an event")
}

#[test]
fn terminate_produces_no_output() {
    let mut d = dialog("***TERMINATE\n");
    assert_eq!(next(&mut d), Event::Terminate);
    assert_eq!(written(&d), "");
}

#[test]
fn unrecognized_line_yields_none_and_is_consumed() {
    let mut d = dialog("XXX\n***TERMINATE\n");
    assert!(d.next_event().unwrap().is_none());
    assert_eq!(next(&mut d), Event::Terminate);
}

#[test]
fn unrecognized_unterminated_line_yields_none() {
    let mut d = dialog("XXX");
    assert!(d.next_event().unwrap().is_none());
}

#[test]
fn empty_stream_fails_with_unexpected_end() {
    let mut d = dialog("");
    assert!(matches!(
        d.next_event(),
        Err(AppError::UnexpectedEndOfStream)
    ));
}

#[test]
fn crlf_input_is_tolerated() {
    let mut d = dialog("#NOTE\r\n#### NOTE\r\n");
    assert_eq!(next(&mut d), Event::Note { note: "NOTE".into() });
    assert_eq!(next(&mut d), Event::Note { note: "NOTE".into() });
}

#[test]
fn display_multi_string_collects_block_until_boundary() {
    let mut d = dialog("***D:MULTI-STRING mstr3 boundary2\nline 1\nline 2\nboundary2\n***TERMINATE\n");
    assert_eq!(
        next(&mut d),
        Event::DisplayMultiString {
            name: "mstr3".into(),
            boundary: "boundary2".into(),
            value: vec!["line 1".into(), "line 2".into()],
        }
    );
    assert_eq!(next(&mut d), Event::Terminate);
}

#[test]
fn display_multi_string_boundary_is_exact_match() {
    let mut d = dialog("***D:MULTI-STRING m END\n END\nEND \n***TERMINATE\nEND\n");
    match next(&mut d) {
        Event::DisplayMultiString { value, .. } => {
            assert_eq!(value, vec![" END", "END ", "***TERMINATE"]);
        }
        other => panic!("expected DisplayMultiString, got {other:?}"),
    }
}

#[test]
fn display_multi_string_without_boundary_fails() {
    let mut d = dialog("***D:MULTI-STRING m END\nline 1\n");
    assert!(matches!(
        d.next_event(),
        Err(AppError::UnexpectedEndOfStream)
    ));
}

#[test]
fn failed_encode_writes_nothing() {
    let mut d = dialog("***Q:STRING str1\n#### NOTE\n");
    let event = next(&mut d);

    let err = d
        .send_response(&event, &ReplyRequest::Text("multiline\nreply".into()))
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidReplyShape(_)));

    let err = d
        .send_response(&event, &ReplyRequest::Value(ReplyValue::Int(1)))
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidReplyShape(_)));

    let note = next(&mut d);
    let err = d.send_response(&note, &ReplyRequest::Omitted).unwrap_err();
    assert!(matches!(err, AppError::NotReplyable(_)));

    assert_eq!(written(&d), "");
}

#[test]
fn full_dialog_transcript() {
    let data = concat!(
        "#NOTE\n",
        "#### NOTE\n",
        "***L:DEBUG log record\n",
        "***L:INFO log record\n",
        "***L:WARNING log record\n",
        "***L:ERROR log record\n",
        "***L:CRITICAL log record\n",
        "***L:FATAL log record\n",
        "#INFO\n",
        "***Q:STRING str1\n",
        "***Q:MULTI-STRING mstr0 boundary1 boundary2\n",
        "***Q:MULTI-STRING mstr1 boundary1 boundary2\n",
        "***Q:MULTI-STRING mstr2 boundary1 boundary2\n",
        "***Q:VALUE value0\n",
        "***Q:VALUE value1\n",
        "***Q:VALUE value2\n",
        "***Q:VALUE value3\n",
        "***Q:VALUE value4\n",
        "***Q:VALUE value5\n",
        "***D:VALUE value10=none:NoneType\n",
        "***D:VALUE value11=bool:True\n",
        "***D:VALUE value12=bool:False\n",
        "***D:VALUE value13=int:52\n",
        "***D:VALUE value14=str:value 2\n",
        "***D:MULTI-STRING mstr3 boundary2\n",
        "line 1\n",
        "line 2\n",
        "boundary2\n",
        "***CONFIRM confirm0 description 0\n",
        "***CONFIRM confirm1 description 1\n",
        "***CONFIRM confirm2 description 1\n",
        "***TERMINATE\n",
    );
    let expected_output = concat!(
        "value 1\n",
        "boundary2\n",
        "line 1\n",
        "line 2\n",
        "boundary1\n",
        "boundary1\n",
        "ABORT value0\n",
        "VALUE value1=none:None\n",
        "VALUE value2=bool:True\n",
        "VALUE value3=bool:False\n",
        "VALUE value4=int:47\n",
        "VALUE value5=str:string 1\n",
        "ABORT confirm0\n",
        "CONFIRM confirm1=no\n",
        "CONFIRM confirm2=yes\n",
    );

    let mut d = dialog(data);

    assert_eq!(next(&mut d), Event::Note { note: "NOTE".into() });
    assert_eq!(next(&mut d), Event::Note { note: "NOTE".into() });
    for severity in ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL", "FATAL"] {
        assert_eq!(
            next(&mut d),
            Event::Log {
                severity: severity.into(),
                record: "log record".into(),
            }
        );
    }
    assert_eq!(next(&mut d), Event::Note { note: "INFO".into() });

    let event = next(&mut d);
    assert_eq!(event.name(), Some("str1"));
    d.send_response(&event, &"value 1".into()).unwrap();

    let event = next(&mut d);
    assert_eq!(event.name(), Some("mstr0"));
    d.send_response(&event, &ReplyRequest::Abort).unwrap();

    let event = next(&mut d);
    assert_eq!(event.name(), Some("mstr1"));
    d.send_response(&event, &vec!["line 1".to_owned(), "line 2".to_owned()].into())
        .unwrap();

    let event = next(&mut d);
    assert_eq!(event.name(), Some("mstr2"));
    d.send_response(&event, &ReplyRequest::Lines(Vec::new()))
        .unwrap();

    let event = next(&mut d);
    assert_eq!(event, Event::QueryValue { name: "value0".into() });
    d.send_response(&event, &ReplyRequest::Abort).unwrap();

    for value in [
        ReplyValue::Absent,
        ReplyValue::Bool(true),
        ReplyValue::Bool(false),
        ReplyValue::Int(47),
        ReplyValue::from("string 1"),
    ] {
        let event = next(&mut d);
        d.send_response(&event, &value.into()).unwrap();
    }

    let displayed = [
        ("value10", ReplyValue::Absent),
        ("value11", ReplyValue::Bool(true)),
        ("value12", ReplyValue::Bool(false)),
        ("value13", ReplyValue::Int(52)),
        ("value14", ReplyValue::from("value 2")),
    ];
    for (name, value) in displayed {
        assert_eq!(
            next(&mut d),
            Event::DisplayValue {
                name: name.into(),
                value,
            }
        );
    }

    match next(&mut d) {
        Event::DisplayMultiString { name, value, .. } => {
            assert_eq!(name, "mstr3");
            assert_eq!(value, vec!["line 1", "line 2"]);
        }
        other => panic!("expected DisplayMultiString, got {other:?}"),
    }

    let event = next(&mut d);
    assert_eq!(
        event,
        Event::Confirm {
            what: "confirm0".into(),
            description: "description 0".into(),
        }
    );
    d.send_response(&event, &ReplyRequest::Abort).unwrap();

    let event = next(&mut d);
    d.send_response(&event, &ReplyRequest::Omitted).unwrap();

    let event = next(&mut d);
    d.send_response(&event, &true.into()).unwrap();

    assert_eq!(next(&mut d), Event::Terminate);
    assert_eq!(written(&d), expected_output);
}

#[test]
fn set_streams_swaps_both_streams() {
    let mut d = dialog("***TERMINATE\n");
    d.write_line("noop").unwrap();

    let (_old_in, old_out) = d.set_streams(Cursor::new(b"#fresh\n".to_vec()), Vec::new());
    assert_eq!(old_out, b"noop\n");
    assert_eq!(next(&mut d), Event::Note { note: "fresh".into() });
    assert_eq!(written(&d), "");
}

#[test]
fn into_inner_returns_streams() {
    let mut d = dialog("");
    d.write_line("install").unwrap();
    let (_input, output) = d.into_inner();
    assert_eq!(output, b"install\n");
}
