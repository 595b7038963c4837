//! Reply encoding for query events.
//!
//! | Event              | Reply                       | Wire                          |
//! |--------------------|-----------------------------|-------------------------------|
//! | `query_string`     | `Text(s)`                   | `s`                           |
//! | `query_multi_string` | `Lines(ls)` / `Omitted`   | `ls...` then `<boundary>`     |
//! | `query_multi_string` | `Abort`                   | `<abort_boundary>`            |
//! | `query_value`      | `Value(v)`                  | `VALUE <name>=<tag>:<v>`      |
//! | `query_value`      | `Abort`                     | `ABORT <name>`                |
//! | `confirm`          | `Confirm(b)` / `Omitted`    | `CONFIRM <what>=yes` / `=no`  |
//! | `confirm`          | `Abort`                     | `ABORT <what>`                |
//!
//! The encoder returns the reply without its final `\n`; the dialog appends
//! it when writing.

use crate::mdp::event::{Event, ReplyValue};
use crate::{AppError, Result};

/// The caller's decision for a replyable [`Event`].
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum ReplyRequest {
    /// Decline the query using the protocol's abort form.
    Abort,
    /// Answer a string query.
    Text(String),
    /// Answer a multi-line string query.
    Lines(Vec<String>),
    /// Answer a value query.
    Value(ReplyValue),
    /// Answer a confirmation.
    Confirm(bool),
    /// No reply attached.
    #[default]
    Omitted,
}

impl From<&str> for ReplyRequest {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for ReplyRequest {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for ReplyRequest {
    fn from(lines: Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

impl From<ReplyValue> for ReplyRequest {
    fn from(value: ReplyValue) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for ReplyRequest {
    fn from(flag: bool) -> Self {
        Self::Confirm(flag)
    }
}

impl ReplyRequest {
    fn shape(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Text(_) => "text",
            Self::Lines(_) => "lines",
            Self::Value(_) => "value",
            Self::Confirm(_) => "confirm",
            Self::Omitted => "omitted",
        }
    }
}

/// Render the wire reply for `event`.
///
/// # Errors
///
/// - [`AppError::NotReplyable`] if `event` is not a query or confirmation.
/// - [`AppError::InvalidReplyShape`] if `request` does not fit the event kind
///   or a single-line payload contains `\n`.
pub fn encode_response(event: &Event, request: &ReplyRequest) -> Result<String> {
    match event {
        Event::QueryString { name } => match request {
            ReplyRequest::Text(text) => {
                single_line(name, text)?;
                Ok(text.clone())
            }
            other => Err(mismatch(name, "text", other)),
        },

        Event::QueryMultiString {
            name,
            boundary,
            abort_boundary,
        } => match request {
            ReplyRequest::Abort => Ok(abort_boundary.clone()),
            ReplyRequest::Lines(lines) => {
                let mut out = String::new();
                for line in lines {
                    single_line(name, line)?;
                    out.push_str(line);
                    out.push('\n');
                }
                out.push_str(boundary);
                Ok(out)
            }
            ReplyRequest::Omitted => Ok(boundary.clone()),
            other => Err(mismatch(name, "lines", other)),
        },

        Event::QueryValue { name } => match request {
            ReplyRequest::Abort => Ok(format!("ABORT {name}")),
            ReplyRequest::Value(value) => {
                if let ReplyValue::Str(text) = value {
                    single_line(name, text)?;
                }
                Ok(format!("VALUE {name}={}:{value}", value.value_type()))
            }
            other => Err(mismatch(name, "value", other)),
        },

        Event::Confirm { what, .. } => match request {
            ReplyRequest::Abort => Ok(format!("ABORT {what}")),
            ReplyRequest::Confirm(true) => Ok(format!("CONFIRM {what}=yes")),
            ReplyRequest::Confirm(false) | ReplyRequest::Omitted => {
                Ok(format!("CONFIRM {what}=no"))
            }
            other => Err(mismatch(what, "confirm", other)),
        },

        other => Err(AppError::NotReplyable(other.kind().to_string())),
    }
}

fn single_line(name: &str, text: &str) -> Result<()> {
    if text.contains('\n') {
        return Err(AppError::InvalidReplyShape(format!(
            "reply for {name} must not contain a new line"
        )));
    }
    Ok(())
}

fn mismatch(name: &str, expected: &str, got: &ReplyRequest) -> AppError {
    AppError::InvalidReplyShape(format!(
        "reply for {name} must be {expected}, got {}",
        got.shape()
    ))
}
