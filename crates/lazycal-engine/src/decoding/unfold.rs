use std::io::{BufRead, ErrorKind};

use crate::error::DecodeError;

/// A single logical line, after unfolding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    /// 1-based physical line number the logical line starts on.
    pub number: usize,
    /// The unfolded text, without line terminators or carriage returns.
    pub text: String,
}

/// Turns a byte stream into logical lines.
///
/// A line feed followed by a single space is a fold: both bytes are dropped
/// and the logical line continues. Carriage returns are dropped wherever they
/// appear. Bytes are pulled from the reader only as far as needed to decide
/// whether a line feed ends the current line, so everything after the last
/// returned line is still unread in the underlying reader.
#[derive(Debug)]
pub struct LineUnfolder<R> {
    reader: R,
    next_number: usize,
    exhausted: bool,
}

impl<R: BufRead> LineUnfolder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            next_number: 1,
            exhausted: false,
        }
    }

    /// Returns the next logical line, or `None` once the reader has no more bytes.
    ///
    /// A final line without a trailing newline is still returned.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Io`] if the reader fails. A reader that reports a
    /// closed connection or pipe is treated as exhausted instead.
    pub fn next_line(&mut self) -> Result<Option<LineRef>, DecodeError> {
        if self.exhausted {
            return Ok(None);
        }

        let number = self.next_number;
        let mut bytes = Vec::new();
        let mut started = false;
        // Set once a '\n' is consumed; the following byte decides fold vs. end of line.
        let mut after_newline = false;

        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if is_closed(e.kind()) => {
                    log::debug!("source closed ({e}), treating as end of stream");
                    &[]
                }
                Err(e) => return Err(DecodeError::Io(e)),
            };

            if buf.is_empty() {
                self.exhausted = true;
                return Ok(started.then(|| to_line(number, &bytes)));
            }
            started = true;

            let mut used = 0;
            let mut complete = false;
            for &b in buf {
                if after_newline {
                    if b == b' ' {
                        used += 1;
                        after_newline = false;
                        continue;
                    }
                    complete = true;
                    break;
                }
                used += 1;
                match b {
                    b'\n' => {
                        after_newline = true;
                        self.next_number += 1;
                    }
                    b'\r' => {}
                    _ => bytes.push(b),
                }
            }
            self.reader.consume(used);

            if complete {
                return Ok(Some(to_line(number, &bytes)));
            }
        }
    }

    /// Gives back the reader, positioned just after the last returned line.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Iterator for LineUnfolder<R> {
    type Item = Result<LineRef, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

fn is_closed(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::BrokenPipe
            | ErrorKind::ConnectionAborted
            | ErrorKind::ConnectionReset
    )
}

fn to_line(number: usize, bytes: &[u8]) -> LineRef {
    LineRef {
        number,
        text: String::from_utf8_lossy(bytes).into_owned(),
    }
}
