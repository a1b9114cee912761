use std::collections::BTreeMap;

use crate::error::DecodeError;

use super::unfold::LineRef;

/// What a single logical line means, decided without any surrounding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Empty line, skipped by the parser.
    Blank,
    /// `BEGIN:<kind>`
    Begin { kind: &'a str },
    /// `END:<kind>`
    End { kind: &'a str },
    /// `<name>[;<param>=<value>]*:<value>`
    Attribute {
        name: &'a str,
        parameters: BTreeMap<String, String>,
        value: &'a str,
    },
}

/// Classifies logical lines for the structural parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentLineClassifier;

impl ContentLineClassifier {
    pub const BEGIN: &'static str = "BEGIN";
    pub const END: &'static str = "END";

    /// Splits a line into its structural pieces.
    ///
    /// Only the first `:` separates the head from the value, and only the first
    /// `=` of each parameter separates its name from its value. The value is
    /// passed through untouched.
    ///
    /// # Errors
    ///
    /// [`DecodeError::MalformedLine`] when the line has no `:` and
    /// [`DecodeError::MalformedParameter`] when a parameter has no `=`.
    pub fn classify<'a>(&self, lr: &'a LineRef) -> Result<LineClass<'a>, DecodeError> {
        if lr.text.is_empty() {
            return Ok(LineClass::Blank);
        }

        let Some((head, rest)) = lr.text.split_once(':') else {
            return Err(DecodeError::MalformedLine {
                line_number: lr.number,
                line: lr.text.clone(),
            });
        };

        match head {
            Self::BEGIN => Ok(LineClass::Begin { kind: rest }),
            Self::END => Ok(LineClass::End { kind: rest }),
            _ => {
                let mut segments = head.split(';');
                let name = segments.next().unwrap_or_default();
                let parameters = segments
                    .map(|segment| {
                        segment
                            .split_once('=')
                            .map(|(k, v)| (k.to_string(), v.to_string()))
                            .ok_or_else(|| DecodeError::MalformedParameter {
                                line_number: lr.number,
                                segment: segment.to_string(),
                            })
                    })
                    .collect::<Result<BTreeMap<_, _>, _>>()?;
                Ok(LineClass::Attribute {
                    name,
                    parameters,
                    value: rest,
                })
            }
        }
    }
}
