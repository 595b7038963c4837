//! Answer-file driven dialog session.
//!
//! [`run_session`] reads events until `***TERMINATE`, answering each query
//! from a [`DriverConfig`]:
//!
//! | Event                         | Action                                      |
//! |-------------------------------|---------------------------------------------|
//! | `note`                        | logged at `INFO`                            |
//! | `log`                         | mirrored at the level matching its severity |
//! | `display_value` / `display_multi_string` | recorded in [`SessionOutcome::displayed`] |
//! | `query_*` / `confirm`         | answered, or handled per [`UnansweredPolicy`] |
//! | *(unrecognized line)*         | handled per [`UnmatchedPolicy`]             |

use std::collections::HashMap;
use std::io::{BufRead, Write};

use tracing::{debug, error, info, warn};

use crate::commands::EnvValue;
use crate::config::{Answer, DriverConfig, UnansweredPolicy, UnmatchedPolicy};
use crate::mdp::{Event, MachineDialog, ReplyRequest, ReplyValue};
use crate::{AppError, Result};

/// What happened during a completed session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Values the installer displayed, by name; later displays win.
    pub displayed: HashMap<String, EnvValue>,
    /// Names of queries answered from the configuration, in order.
    pub answered: Vec<String>,
    /// Names of queries aborted for lack of an answer, in order.
    pub aborted: Vec<String>,
}

/// Drive `dialog` until the installer terminates.
///
/// # Errors
///
/// - [`AppError::Unanswered`] when a query has no answer and the policy is
///   `fail`, or the query is a string query (which has no abort form).
/// - [`AppError::UnexpectedEvent`] for an unrecognized line under the `fail`
///   policy.
/// - Any error of [`MachineDialog::next_event`] or
///   [`MachineDialog::send_response`], including
///   [`AppError::UnexpectedEndOfStream`] if the installer exits without
///   terminating the dialog.
pub fn run_session<R: BufRead, W: Write>(
    dialog: &mut MachineDialog<R, W>,
    config: &DriverConfig,
) -> Result<SessionOutcome> {
    let _span = tracing::info_span!("dialog_session").entered();
    let mut outcome = SessionOutcome::default();

    loop {
        let Some(event) = dialog.next_event()? else {
            match config.policy.unmatched {
                UnmatchedPolicy::Skip => continue,
                UnmatchedPolicy::Fail => {
                    return Err(AppError::UnexpectedEvent(
                        "installer sent an unrecognized line".into(),
                    ))
                }
            }
        };

        match event {
            Event::Terminate => {
                info!(
                    answered = outcome.answered.len(),
                    aborted = outcome.aborted.len(),
                    "installer terminated dialog"
                );
                return Ok(outcome);
            }
            Event::Note { note } => info!(note = %note, "installer note"),
            Event::Log { severity, record } => mirror_log(&severity, &record),
            Event::DisplayValue { name, value } => {
                debug!(name = %name, value = %value, "installer displayed value");
                outcome.displayed.insert(name, EnvValue::Value(value));
            }
            Event::DisplayMultiString { name, value, .. } => {
                debug!(name = %name, lines = value.len(), "installer displayed block");
                outcome.displayed.insert(name, EnvValue::Lines(value));
            }
            query => answer_query(dialog, config, &query, &mut outcome)?,
        }
    }
}

fn answer_query<R: BufRead, W: Write>(
    dialog: &mut MachineDialog<R, W>,
    config: &DriverConfig,
    query: &Event,
    outcome: &mut SessionOutcome,
) -> Result<()> {
    let name = query.name().unwrap_or_default().to_owned();

    if let Some(request) = configured_reply(config, query, &name) {
        info!(name = %name, kind = %query.kind(), "answering query");
        dialog.send_response(query, &request)?;
        outcome.answered.push(name);
        return Ok(());
    }

    match (config.policy.unanswered, query) {
        (UnansweredPolicy::Abort, Event::QueryString { .. }) | (UnansweredPolicy::Fail, _) => {
            error!(name = %name, kind = %query.kind(), "no answer configured");
            Err(AppError::Unanswered(name))
        }
        (UnansweredPolicy::Abort, _) => {
            warn!(name = %name, kind = %query.kind(), "no answer configured, aborting query");
            dialog.send_response(query, &ReplyRequest::Abort)?;
            outcome.aborted.push(name);
            Ok(())
        }
    }
}

/// Map the configured answer for `name` onto the reply shape `query` needs.
fn configured_reply(config: &DriverConfig, query: &Event, name: &str) -> Option<ReplyRequest> {
    if matches!(query, Event::QueryValue { .. }) && config.is_absent(name) {
        return Some(ReplyRequest::Value(ReplyValue::Absent));
    }
    let answer = config.answers.get(name)?;

    let request = match (query, answer) {
        (Event::QueryString { .. }, Answer::Text(text)) => ReplyRequest::Text(text.clone()),
        (Event::QueryString { .. }, Answer::Int(n)) => ReplyRequest::Text(n.to_string()),
        (Event::QueryString { .. }, Answer::Flag(flag)) => ReplyRequest::Text(flag.to_string()),
        (Event::QueryMultiString { .. }, Answer::Lines(lines)) => {
            ReplyRequest::Lines(lines.clone())
        }
        (Event::QueryMultiString { .. }, Answer::Text(text)) => {
            ReplyRequest::Lines(vec![text.clone()])
        }
        (Event::QueryValue { .. }, Answer::Text(text)) => {
            ReplyRequest::Value(ReplyValue::Str(text.clone()))
        }
        (Event::QueryValue { .. }, Answer::Int(n)) => ReplyRequest::Value(ReplyValue::Int(*n)),
        (Event::QueryValue { .. }, Answer::Flag(flag)) => {
            ReplyRequest::Value(ReplyValue::Bool(*flag))
        }
        (Event::Confirm { .. }, Answer::Flag(flag)) => ReplyRequest::Confirm(*flag),
        // Left to the encoder to reject with a precise shape error.
        (_, Answer::Lines(lines)) => ReplyRequest::Lines(lines.clone()),
        (_, Answer::Text(text)) => ReplyRequest::Text(text.clone()),
        (_, Answer::Int(n)) => ReplyRequest::Value(ReplyValue::Int(*n)),
        (_, Answer::Flag(flag)) => ReplyRequest::Confirm(*flag),
    };
    Some(request)
}

fn mirror_log(severity: &str, record: &str) {
    match severity {
        "DEBUG" => debug!(severity, record, "installer log"),
        "WARNING" => warn!(severity, record, "installer log"),
        "ERROR" | "CRITICAL" | "FATAL" => error!(severity, record, "installer log"),
        _ => info!(severity, record, "installer log"),
    }
}
