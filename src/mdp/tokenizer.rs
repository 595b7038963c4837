//! Line tokenizer for the inbound MDP stream.
//!
//! Splits the installer's output into logical lines:
//!
//! - `\n` ends a line and is not part of it.
//! - `\r` is dropped wherever it appears, so CRLF input reads like LF input.
//! - An unterminated final line is returned as-is; end-of-input with nothing
//!   pending fails with [`AppError::UnexpectedEndOfStream`].

use std::io::BufRead;

use crate::{AppError, Result};

/// Blocking line reader over any [`BufRead`] source.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
        }
    }

    /// Read the next logical line.
    ///
    /// Blocks until a `\n` arrives or the source reports end-of-input.
    ///
    /// # Errors
    ///
    /// - [`AppError::UnexpectedEndOfStream`] when input ends before any
    ///   character of a new line was read.
    /// - [`AppError::Io`] on read failure or non-UTF-8 input.
    pub fn next_line(&mut self) -> Result<String> {
        self.buf.clear();
        self.inner.read_until(b'\n', &mut self.buf)?;

        let terminated = self.buf.last() == Some(&b'\n');
        if terminated {
            self.buf.pop();
        }
        self.buf.retain(|&b| b != b'\r');

        if !terminated && self.buf.is_empty() {
            return Err(AppError::UnexpectedEndOfStream);
        }

        String::from_utf8(std::mem::take(&mut self.buf))
            .map_err(|_| AppError::Io("input is not valid UTF-8".into()))
    }

    /// Shared access to the wrapped source.
    #[must_use]
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Exclusive access to the wrapped source.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the source.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.inner
    }
}
