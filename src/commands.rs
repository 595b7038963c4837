//! Installer commands built on the dialog primitives.
//!
//! Each helper writes one command line and, where the installer answers,
//! reads exactly one event back.
//!
//! | Helper           | Command                       | Expected event                 |
//! |------------------|-------------------------------|--------------------------------|
//! | `env_get`        | `env-get -k <key>`            | `D:VALUE` / `D:MULTI-STRING`   |
//! | `env_set`        | `env-query[-multi] -k <key>`  | `Q:STRING` / `Q:MULTI-STRING` / `Q:VALUE` |
//! | `download_log`   | `log`                         | `D:MULTI-STRING`               |
//! | `install` etc.   | `install` / `quit` / `abort` / `noop` | none                   |

use std::io::{BufRead, Write};

use crate::mdp::{Event, MachineDialog, ReplyRequest, ReplyValue};
use crate::{AppError, Result};

/// Content of an installer environment variable.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum EnvValue {
    /// Scalar value.
    Value(ReplyValue),
    /// Multi-line value.
    Lines(Vec<String>),
}

impl<R: BufRead, W: Write> MachineDialog<R, W> {
    /// Fetch the value of environment variable `key`.
    ///
    /// # Errors
    ///
    /// - [`AppError::UnexpectedEvent`] if the installer does not answer with a
    ///   displayed value.
    /// - Any error of [`MachineDialog::next_event`] or
    ///   [`MachineDialog::write_line`].
    pub fn env_get(&mut self, key: &str) -> Result<EnvValue> {
        self.write_line(&format!("env-get -k {key}"))?;

        match self.next_event()? {
            Some(Event::DisplayValue { value, .. }) => Ok(EnvValue::Value(value)),
            Some(Event::DisplayMultiString { value, .. }) => Ok(EnvValue::Lines(value)),
            other => Err(unexpected("env-get", other.as_ref())),
        }
    }

    /// Set environment variable `key` to `value`.
    ///
    /// Multi-line values are sent with `env-query-multi`.
    ///
    /// # Errors
    ///
    /// - [`AppError::UnexpectedEvent`] if the installer does not answer with a
    ///   query.
    /// - [`AppError::InvalidReplyShape`] if `value` does not fit the query the
    ///   installer asked.
    /// - Any error of [`MachineDialog::next_event`] or
    ///   [`MachineDialog::send_response`].
    pub fn env_set(&mut self, key: &str, value: EnvValue) -> Result<()> {
        let command = match value {
            EnvValue::Lines(_) => "env-query-multi",
            EnvValue::Value(_) => "env-query",
        };
        self.write_line(&format!("{command} -k {key}"))?;

        let event = match self.next_event()? {
            Some(
                event @ (Event::QueryString { .. }
                | Event::QueryMultiString { .. }
                | Event::QueryValue { .. }),
            ) => event,
            other => return Err(unexpected(command, other.as_ref())),
        };

        let request = match (&event, value) {
            (Event::QueryString { .. }, EnvValue::Value(ReplyValue::Str(text))) => {
                ReplyRequest::Text(text)
            }
            (Event::QueryValue { .. }, EnvValue::Value(value)) => ReplyRequest::Value(value),
            (Event::QueryMultiString { .. }, EnvValue::Lines(lines)) => ReplyRequest::Lines(lines),
            (event, value) => {
                return Err(AppError::InvalidReplyShape(format!(
                    "cannot answer {} with {value:?}",
                    event.kind()
                )))
            }
        };
        self.send_response(&event, &request)
    }

    /// Download the installer log.
    ///
    /// Returns the log lines joined with `\n`, with a trailing `\n`.
    ///
    /// # Errors
    ///
    /// - [`AppError::UnexpectedEvent`] if the installer does not answer with a
    ///   multi-line block.
    /// - Any error of [`MachineDialog::next_event`] or
    ///   [`MachineDialog::write_line`].
    pub fn download_log(&mut self) -> Result<String> {
        self.write_line("log")?;

        match self.next_event()? {
            Some(Event::DisplayMultiString { value, .. }) => {
                let mut log = value.join("\n");
                log.push('\n');
                Ok(log)
            }
            other => Err(unexpected("log", other.as_ref())),
        }
    }

    /// Send `install`.
    ///
    /// # Errors
    ///
    /// See [`MachineDialog::write_line`].
    pub fn install(&mut self) -> Result<()> {
        self.write_line("install")
    }

    /// Send `quit`.
    ///
    /// # Errors
    ///
    /// See [`MachineDialog::write_line`].
    pub fn quit(&mut self) -> Result<()> {
        self.write_line("quit")
    }

    /// Send `abort`.
    ///
    /// # Errors
    ///
    /// See [`MachineDialog::write_line`].
    pub fn abort(&mut self) -> Result<()> {
        self.write_line("abort")
    }

    /// Send `noop`.
    ///
    /// # Errors
    ///
    /// See [`MachineDialog::write_line`].
    pub fn noop(&mut self) -> Result<()> {
        self.write_line("noop")
    }
}

fn unexpected(command: &str, event: Option<&Event>) -> AppError {
    match event {
        Some(event) => AppError::UnexpectedEvent(format!("{command} answered with {}", event.kind())),
        None => AppError::UnexpectedEvent(format!("{command} answered with an unrecognized line")),
    }
}
