//! Turns one matched line into a typed [`Event`].
//!
//! Only the header line is handled here. The block that follows a
//! `***D:MULTI-STRING` header is read by
//! [`MachineDialog::next_event`](crate::mdp::MachineDialog::next_event),
//! which owns the stream.

use regex::Captures;

use crate::mdp::event::{Event, EventKind, ReplyValue, ValueType};
use crate::mdp::patterns::match_line;
use crate::Result;

/// Classify a single line.
///
/// Returns `Ok(None)` when no table entry matches. A
/// [`Event::DisplayMultiString`] is returned with an empty `value`.
///
/// # Errors
///
/// - [`AppError::InvalidValueType`](crate::AppError::InvalidValueType) for a
///   `***D:VALUE` line with an unknown type tag.
/// - [`AppError::InvalidValue`](crate::AppError::InvalidValue) for an `int`
///   value that does not parse.
pub fn classify(line: &str) -> Result<Option<Event>> {
    let Some((kind, caps)) = match_line(line) else {
        return Ok(None);
    };

    let event = match kind {
        EventKind::Note => Event::Note {
            note: group(&caps, "note"),
        },
        EventKind::Log => Event::Log {
            severity: group(&caps, "severity"),
            record: group(&caps, "record"),
        },
        EventKind::Terminate => Event::Terminate,
        EventKind::QueryString => Event::QueryString {
            name: group(&caps, "name"),
        },
        EventKind::QueryMultiString => Event::QueryMultiString {
            name: group(&caps, "name"),
            boundary: group(&caps, "boundary"),
            abort_boundary: group(&caps, "abort_boundary"),
        },
        EventKind::QueryValue => Event::QueryValue {
            name: group(&caps, "name"),
        },
        EventKind::Confirm => Event::Confirm {
            what: group(&caps, "what"),
            description: group(&caps, "description"),
        },
        EventKind::DisplayValue => {
            let value_type: ValueType = caps["type"].parse()?;
            Event::DisplayValue {
                name: group(&caps, "name"),
                value: ReplyValue::decode(value_type, &caps["value"])?,
            }
        }
        EventKind::DisplayMultiString => Event::DisplayMultiString {
            name: group(&caps, "name"),
            boundary: group(&caps, "boundary"),
            value: Vec::new(),
        },
    };

    Ok(Some(event))
}

fn group(caps: &Captures<'_>, name: &str) -> String {
    caps.name(name)
        .map_or_else(String::new, |m| m.as_str().to_owned())
}
