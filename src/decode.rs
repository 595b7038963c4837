//! Recorded dialog → NDJSON.
//!
//! Each event becomes one JSON object on its own line, tagged by `type`:
//!
//! ```text
//! {"type":"query_value","name":"port"}
//! {"type":"display_value","name":"port","value":443}
//! {"type":"terminate"}
//! ```
//!
//! Display values keep their JSON type: absent is `null`, strings, booleans
//! and integers map directly.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::mdp::{Event, MachineDialog};
use crate::{AppError, Result};

/// Decode `input` and write one JSON line per event to `out`.
///
/// Stops after `***TERMINATE`. Input that ends before it is logged and
/// treated as the end of the recording. Unrecognized lines are skipped.
/// Returns the number of events written.
///
/// # Errors
///
/// - Any classification error of [`MachineDialog::next_event`] other than
///   end of stream.
/// - [`AppError::Io`] when writing to `out` fails.
pub fn write_events<R: BufRead, W: Write>(input: R, out: &mut W) -> Result<usize> {
    let mut dialog = MachineDialog::new(input, io::sink());
    let mut written = 0;

    loop {
        let event = match dialog.next_event() {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(AppError::UnexpectedEndOfStream) => {
                warn!("dialog ended without terminate");
                return Ok(written);
            }
            Err(err) => return Err(err),
        };

        let line = serde_json::to_string(&event)
            .map_err(|err| AppError::Io(format!("failed to serialise event: {err}")))?;
        writeln!(out, "{line}")?;
        written += 1;

        if event == Event::Terminate {
            return Ok(written);
        }
    }
}
