//! # lazycal-engine
//!
//! A lazy decoder for iCalendar-style text: `BEGIN:`/`END:` blocks holding
//! attributes and further blocks, with folded lines and `;`-separated
//! parameters.
//!
//! The decoder is schema-agnostic. It recognises only the structural
//! delimiters and hands back every value exactly as written.
//!
//! ```text
//! let mut decoder = Decoder::new(file);
//! for event in decoder.records("VEVENT") {
//!     let event = event?;
//!     println!("{event}");
//! }
//! ```

pub mod decoding;
pub mod error;

// Re-export key types for easier usage
pub use decoding::{
    CALENDAR, Decoded, Decoder, Records,
    token::Token,
    unfold::{LineRef, LineUnfolder},
};
pub use error::DecodeError;
