//! Machine dialog driver.
//!
//! [`MachineDialog`] owns the pair of streams connected to the installer and
//! exposes the two protocol primitives:
//!
//! - [`next_event`](MachineDialog::next_event) reads and classifies the next
//!   line, pulling in the block of a `***D:MULTI-STRING` header.
//! - [`send_response`](MachineDialog::send_response) encodes a reply to a
//!   query and flushes it.
//!
//! The protocol is strictly alternating: the installer blocks on its query
//! until the reply is flushed, so every write is followed by a flush.

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::mdp::classifier::classify;
use crate::mdp::encoder::{encode_response, ReplyRequest};
use crate::mdp::event::Event;
use crate::mdp::tokenizer::LineReader;
use crate::Result;

/// Synchronous MDP session over an input and an output stream.
#[derive(Debug)]
pub struct MachineDialog<R, W> {
    input: LineReader<R>,
    output: W,
}

impl<R: BufRead, W: Write> MachineDialog<R, W> {
    /// Bind a dialog to `input` (installer → client) and `output`
    /// (client → installer).
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: LineReader::new(input),
            output,
        }
    }

    /// Replace both streams, returning the previous pair.
    pub fn set_streams(&mut self, input: R, output: W) -> (R, W) {
        let input = std::mem::replace(&mut self.input, LineReader::new(input));
        let output = std::mem::replace(&mut self.output, output);
        (input.into_inner(), output)
    }

    /// Read one raw line from the input stream.
    ///
    /// # Errors
    ///
    /// See [`LineReader::next_line`].
    pub fn next_line(&mut self) -> Result<String> {
        self.input.next_line()
    }

    /// Read and classify the next event.
    ///
    /// Returns `Ok(None)` for a line that matches no known directive; the
    /// line is consumed and logged at `WARN`.
    ///
    /// # Errors
    ///
    /// - [`AppError::UnexpectedEndOfStream`](crate::AppError::UnexpectedEndOfStream)
    ///   when input ends before a line, or inside a multi-line block.
    /// - [`AppError::InvalidValueType`](crate::AppError::InvalidValueType) /
    ///   [`AppError::InvalidValue`](crate::AppError::InvalidValue) for a
    ///   malformed `***D:VALUE` line.
    /// - [`AppError::Io`](crate::AppError::Io) on read failure.
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        let line = self.input.next_line()?;

        let Some(mut event) = classify(&line)? else {
            warn!(line = %line, "line does not match any event");
            return Ok(None);
        };

        if let Event::DisplayMultiString {
            boundary, value, ..
        } = &mut event
        {
            loop {
                let block_line = self.input.next_line()?;
                if block_line == *boundary {
                    break;
                }
                value.push(block_line);
            }
        }

        debug!(kind = %event.kind(), ?event, "next event");
        Ok(Some(event))
    }

    /// Encode and send the reply to `event`.
    ///
    /// Nothing is written when encoding fails.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotReplyable`](crate::AppError::NotReplyable) /
    ///   [`AppError::InvalidReplyShape`](crate::AppError::InvalidReplyShape)
    ///   from [`encode_response`].
    /// - [`AppError::Io`](crate::AppError::Io) on write or flush failure.
    pub fn send_response(&mut self, event: &Event, request: &ReplyRequest) -> Result<()> {
        debug!(kind = %event.kind(), ?request, "response for event");
        let data = encode_response(event, request)?;
        self.write_line(&data)
    }

    /// Write `data` followed by `\n` and flush.
    ///
    /// Used directly for fire-and-forget commands such as `install`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`](crate::AppError::Io) on write or flush failure.
    pub fn write_line(&mut self, data: &str) -> Result<()> {
        debug!(data = %data, "writing data");
        self.output.write_all(data.as_bytes())?;
        self.output.write_all(b"\n")?;
        self.output.flush()?;
        Ok(())
    }

    /// Shared access to the input stream.
    #[must_use]
    pub fn input(&self) -> &R {
        self.input.get_ref()
    }

    /// Shared access to the output stream.
    #[must_use]
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Exclusive access to the input stream.
    pub fn input_mut(&mut self) -> &mut R {
        self.input.get_mut()
    }

    /// Exclusive access to the output stream.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    /// Unwrap the streams.
    #[must_use]
    pub fn into_inner(self) -> (R, W) {
        (self.input.into_inner(), self.output)
    }
}
