/// Errors produced while decoding a stream.
///
/// Running out of input is not an error: see [`crate::Decoded::EndOfStream`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("line {line_number}: missing ':' separator in {line:?}")]
    MalformedLine { line_number: usize, line: String },
    #[error("line {line_number}: parameter {segment:?} has no '='")]
    MalformedParameter { line_number: usize, segment: String },
    #[error("line {line_number}: attribute outside of any block: {line:?}")]
    UnexpectedAttribute { line_number: usize, line: String },
    #[error("line {line_number}: END without a matching BEGIN: {line:?}")]
    UnbalancedEnd { line_number: usize, line: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decoder cannot be reused after a previous error")]
    Poisoned,
}
