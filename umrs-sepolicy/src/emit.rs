//! Emitter: the indented prefix-form writer.
//!
//! Holds no buffered state between calls beyond the underlying sink — no
//! line is held back waiting for a later one, so a write failure always
//! fails exactly the operation in progress.

use std::io::Write;

use crate::error::TranslateError;

const INDENT_WIDTH: usize = 4;

pub struct Emitter<W: Write> {
    sink: W,
}

impl<W: Write> Emitter<W> {
    pub const fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Writes `text` verbatim, no indent or trailing newline.
    pub fn write(&mut self, text: &str) -> Result<(), TranslateError> {
        self.sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Writes `n` indent levels (four spaces each), then `text`, then a
    /// newline. Any underlying write failure is fatal.
    pub fn line(&mut self, n: usize, text: &str) -> Result<(), TranslateError> {
        self.indent(n)?;
        self.sink.write_all(text.as_bytes())?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    /// Writes `n` indent levels with no trailing content.
    pub fn indent(&mut self, n: usize) -> Result<(), TranslateError> {
        for _ in 0..n {
            self.sink.write_all(b"    ")?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
