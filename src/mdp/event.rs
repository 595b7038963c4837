//! Typed dialog events and the values they carry.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::AppError;

/// Discriminant of an [`Event`], without its attributes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Free-form comment line (`# ...`).
    Note,
    /// Log record forwarded by the installer.
    Log,
    /// The installer is done; no more events follow.
    Terminate,
    /// Single-line string query.
    QueryString,
    /// Multi-line string query terminated by a boundary line.
    QueryMultiString,
    /// Typed value query.
    QueryValue,
    /// Yes/no confirmation.
    Confirm,
    /// Typed value shown to the client.
    DisplayValue,
    /// Multi-line block shown to the client.
    DisplayMultiString,
}

impl EventKind {
    /// Stable lower-case label used in logs and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Log => "log",
            Self::Terminate => "terminate",
            Self::QueryString => "query_string",
            Self::QueryMultiString => "query_multi_string",
            Self::QueryValue => "query_value",
            Self::Confirm => "confirm",
            Self::DisplayValue => "display_value",
            Self::DisplayMultiString => "display_multi_string",
        }
    }

    /// Whether the installer waits for a reply after emitting this kind.
    #[must_use]
    pub fn is_replyable(self) -> bool {
        matches!(
            self,
            Self::QueryString | Self::QueryMultiString | Self::QueryValue | Self::Confirm
        )
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire type tag of a [`ReplyValue`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ValueType {
    /// `none`
    None,
    /// `str`
    Str,
    /// `bool`
    Bool,
    /// `int`
    Int,
}

impl ValueType {
    /// Lower-case wire tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Str => "str",
            Self::Bool => "bool",
            Self::Int => "int",
        }
    }
}

impl FromStr for ValueType {
    type Err = AppError;

    /// Parse a wire tag, ignoring ASCII case.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "str" => Ok(Self::Str),
            "bool" => Ok(Self::Bool),
            "int" => Ok(Self::Int),
            _ => Err(AppError::InvalidValueType(tag.to_owned())),
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar value exchanged through `VALUE` lines.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReplyValue {
    /// The absent value (`none`).
    Absent,
    /// Single-line text.
    Str(String),
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
}

impl ReplyValue {
    /// Wire tag selected by this variant.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Absent => ValueType::None,
            Self::Str(_) => ValueType::Str,
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
        }
    }

    /// Decode the text after `<type>:` according to `value_type`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidValue`] when an `int` payload is not a
    /// base-10 integer.
    pub fn decode(value_type: ValueType, raw: &str) -> crate::Result<Self> {
        match value_type {
            ValueType::None => Ok(Self::Absent),
            ValueType::Str => Ok(Self::Str(raw.to_owned())),
            ValueType::Int => raw.trim().parse::<i64>().map(Self::Int).map_err(|err| {
                AppError::InvalidValue(format!("{raw:?} is not a base-10 integer: {err}"))
            }),
            ValueType::Bool => Ok(Self::Bool(raw.eq_ignore_ascii_case("true"))),
        }
    }
}

impl Display for ReplyValue {
    /// Text rendered after `<type>:` on the wire.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => f.write_str("None"),
            Self::Str(text) => f.write_str(text),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ReplyValue {
    fn from(text: &str) -> Self {
        Self::Str(text.to_owned())
    }
}

impl From<String> for ReplyValue {
    fn from(text: String) -> Self {
        Self::Str(text)
    }
}

impl From<bool> for ReplyValue {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i64> for ReplyValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// One classified protocol line (plus its continuation block, if any).
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// `# text`
    Note {
        /// Comment text without the leading `#` run.
        note: String,
    },
    /// `***L:<SEVERITY> <record>`
    Log {
        /// Severity label as sent (`DEBUG`, `INFO`, ...).
        severity: String,
        /// Log message.
        record: String,
    },
    /// `***TERMINATE`
    Terminate,
    /// `***Q:STRING <name>`
    QueryString {
        /// Query name.
        name: String,
    },
    /// `***Q:MULTI-STRING <name> <boundary> <abort_boundary>`
    QueryMultiString {
        /// Query name.
        name: String,
        /// Line that ends the reply block.
        boundary: String,
        /// Line that abandons the query.
        abort_boundary: String,
    },
    /// `***Q:VALUE <name>`
    QueryValue {
        /// Query name.
        name: String,
    },
    /// `***CONFIRM <what> <description>`
    Confirm {
        /// Confirmation identifier.
        what: String,
        /// Human-readable prompt.
        description: String,
    },
    /// `***D:VALUE <name>=<type>:<value>`
    DisplayValue {
        /// Value name.
        name: String,
        /// Decoded value; its wire tag is [`ReplyValue::value_type`].
        value: ReplyValue,
    },
    /// `***D:MULTI-STRING <name> <boundary>` and the block that follows it.
    DisplayMultiString {
        /// Block name.
        name: String,
        /// Line that ended the block.
        boundary: String,
        /// Block lines, boundary excluded.
        value: Vec<String>,
    },
}

impl Event {
    /// The discriminant of this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Note { .. } => EventKind::Note,
            Self::Log { .. } => EventKind::Log,
            Self::Terminate => EventKind::Terminate,
            Self::QueryString { .. } => EventKind::QueryString,
            Self::QueryMultiString { .. } => EventKind::QueryMultiString,
            Self::QueryValue { .. } => EventKind::QueryValue,
            Self::Confirm { .. } => EventKind::Confirm,
            Self::DisplayValue { .. } => EventKind::DisplayValue,
            Self::DisplayMultiString { .. } => EventKind::DisplayMultiString,
        }
    }

    /// The name a reply or answer is keyed by: `name` for queries and
    /// displays, `what` for confirmations.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::QueryString { name }
            | Self::QueryMultiString { name, .. }
            | Self::QueryValue { name }
            | Self::DisplayValue { name, .. }
            | Self::DisplayMultiString { name, .. } => Some(name),
            Self::Confirm { what, .. } => Some(what),
            Self::Note { .. } | Self::Log { .. } | Self::Terminate => None,
        }
    }
}
