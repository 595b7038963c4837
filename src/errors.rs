//! Error types shared across the crate.

use std::fmt::{Display, Formatter};

/// Shared crate result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error enumeration covering every dialog failure mode.
///
/// "No event matched" is deliberately absent: an unrecognized line is
/// reported as `Ok(None)` by [`MachineDialog::next_event`](crate::mdp::MachineDialog::next_event).
#[derive(Debug)]
pub enum AppError {
    /// Input ended before any character of a new line was read.
    UnexpectedEndOfStream,
    /// A displayed value declared a type tag outside `none|str|bool|int`.
    InvalidValueType(String),
    /// A displayed value does not parse as its declared type.
    InvalidValue(String),
    /// A reply does not have the shape the event kind requires.
    InvalidReplyShape(String),
    /// An escaped option list contains an unknown escape sequence.
    InvalidEscape(String),
    /// A reply was attempted for an event kind that takes none.
    NotReplyable(String),
    /// The remote side answered a command with the wrong event.
    UnexpectedEvent(String),
    /// A query has no answer and the session policy forbids aborting it.
    Unanswered(String),
    /// Configuration parsing or validation failure.
    Config(String),
    /// The installer process could not be started or reaped.
    Spawn(String),
    /// Stream read, write, or flush failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEndOfStream => write!(f, "unexpected end of stream"),
            Self::InvalidValueType(tag) => write!(f, "invalid value type: {tag}"),
            Self::InvalidValue(msg) => write!(f, "invalid value: {msg}"),
            Self::InvalidReplyShape(msg) => write!(f, "invalid reply shape: {msg}"),
            Self::InvalidEscape(input) => write!(f, "invalid escape: {input}"),
            Self::NotReplyable(kind) => write!(f, "not replyable: {kind}"),
            Self::UnexpectedEvent(msg) => write!(f, "unexpected event: {msg}"),
            Self::Unanswered(name) => write!(f, "unanswered: {name}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Spawn(msg) => write!(f, "spawn: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}
