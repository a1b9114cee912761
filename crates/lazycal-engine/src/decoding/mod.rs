//! # Decoding
//!
//! Pull-based decoding of `BEGIN`/`END` nested records.
//!
//! ## Phases
//!
//! 1. **Unfolding** (`unfold`): `LineUnfolder` pulls bytes from the source and
//!    produces logical lines, joining folded continuations and dropping `\r`.
//!
//! 2. **Classification** (`classify`): each logical line is classified on its
//!    own into a `LineClass` (blank, `BEGIN`, `END` or attribute with parameters).
//!
//! 3. **Tree construction** (`stack`): a `BlockStack` keeps the blocks that are
//!    still open and hands back the requested block as soon as it closes.
//!
//! `Decoder` drives the three phases for one request at a time and stops
//! reading as soon as the request is satisfied.
//!
//! ## Key Invariants
//!
//! - Nesting depth is unbounded; the open blocks live in a `Vec`, not on the call stack
//! - Nothing past the closing line of the returned block is read from the source
//!   beyond the single byte needed to rule out a fold
//! - Running out of input is reported as `Decoded::EndOfStream`, never as an error

pub mod classify;
pub mod stack;
pub mod token;
pub mod unfold;


use std::io::{BufRead, BufReader, Read};
use std::iter::FusedIterator;

use crate::error::DecodeError;

use classify::ContentLineClassifier;
use stack::BlockStack;
use token::Token;
use unfold::LineUnfolder;

/// Block kind of a whole calendar.
pub const CALENDAR: &str = "VCALENDAR";

/// Outcome of a single [`Decoder::decode`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The requested block was read up to its `END` line.
    Complete(Token),
    /// Input ran out first. Carries the outermost block that was open at that
    /// point, holding only the children that were closed, or `None` if no
    /// block had been opened.
    EndOfStream(Option<Token>),
}

impl Decoded {
    /// The token, complete or partial.
    #[must_use]
    pub fn into_token(self) -> Option<Token> {
        match self {
            Decoded::Complete(token) => Some(token),
            Decoded::EndOfStream(partial) => partial,
        }
    }

    /// True when the input ran out before the requested block closed.
    #[must_use]
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Decoded::EndOfStream(_))
    }
}

/// Reads nested records out of a byte source one request at a time.
///
/// Every call starts with no open blocks and returns once a block of the
/// requested kind closes, leaving the rest of the source unread.
#[derive(Debug)]
pub struct Decoder<R> {
    lines: LineUnfolder<R>,
    classifier: ContentLineClassifier,
    poisoned: bool,
}

impl<R: Read> Decoder<BufReader<R>> {
    pub fn new(reader: R) -> Self {
        Self::from_buf_read(BufReader::new(reader))
    }
}

impl<R: BufRead> Decoder<R> {
    /// Decodes straight from a buffered reader without adding another buffer,
    /// so [`Decoder::into_inner`] returns it positioned right after the last
    /// decoded record.
    pub fn from_buf_read(reader: R) -> Self {
        Self {
            lines: LineUnfolder::new(reader),
            classifier: ContentLineClassifier,
            poisoned: false,
        }
    }

    /// Pulls the next complete block of the given kind.
    ///
    /// # Errors
    ///
    /// Returns the first malformed line or read failure met. The decoder must
    /// not be used afterwards; later calls return [`DecodeError::Poisoned`].
    pub fn decode(&mut self, kind: &str) -> Result<Decoded, DecodeError> {
        if self.poisoned {
            return Err(DecodeError::Poisoned);
        }
        let result = self.pull(kind);
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    /// Pulls the next `VCALENDAR`, accepting a partial one at end of input.
    ///
    /// # Errors
    ///
    /// Same as [`Decoder::decode`].
    pub fn decode_calendar(&mut self) -> Result<Option<Token>, DecodeError> {
        Ok(self.decode(CALENDAR)?.into_token())
    }

    /// Iterates over every complete block of the given kind.
    pub fn records<'a>(&'a mut self, kind: &'a str) -> Records<'a, R> {
        Records {
            decoder: self,
            kind,
            done: false,
        }
    }

    /// Gives back the source. Anything after the last decoded record is still unread.
    pub fn into_inner(self) -> R {
        self.lines.into_inner()
    }

    fn pull(&mut self, kind: &str) -> Result<Decoded, DecodeError> {
        let mut stack = BlockStack::new(kind);
        while let Some(lr) = self.lines.next_line()? {
            log::trace!("line {}: {}", lr.number, lr.text);
            let class = self.classifier.classify(&lr)?;
            if let Some(token) = stack.push(&lr, class)? {
                log::debug!("decoded {kind} closed on line {}", lr.number);
                return Ok(Decoded::Complete(token));
            }
        }
        log::debug!(
            "end of stream while seeking {kind} with {} open block(s)",
            stack.depth()
        );
        Ok(Decoded::EndOfStream(stack.finish()))
    }
}

/// Iterator returned by [`Decoder::records`].
///
/// Ends at end of input, dropping a trailing unterminated record, or right
/// after yielding an error.
#[derive(Debug)]
pub struct Records<'a, R> {
    decoder: &'a mut Decoder<R>,
    kind: &'a str,
    done: bool,
}

impl<R: BufRead> Iterator for Records<'_, R> {
    type Item = Result<Token, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decoder.decode(self.kind) {
            Ok(Decoded::Complete(token)) => Some(Ok(token)),
            Ok(Decoded::EndOfStream(partial)) => {
                self.done = true;
                if let Some(partial) = partial {
                    log::warn!("dropping unterminated {} record", partial.kind);
                }
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for Records<'_, R> {}
