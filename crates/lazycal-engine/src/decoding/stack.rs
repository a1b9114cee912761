use crate::error::DecodeError;

use super::{classify::LineClass, token::Token, unfold::LineRef};

/// The blocks opened but not yet closed, innermost last.
///
/// Closed blocks are appended to the block below them. The block whose kind
/// matches the requested target is handed back as soon as it closes.
#[derive(Debug)]
pub struct BlockStack<'t> {
    target: &'t str,
    open: Vec<Token>,
}

impl<'t> BlockStack<'t> {
    pub fn new(target: &'t str) -> Self {
        Self {
            target,
            open: vec![],
        }
    }

    /// Applies one classified line. Returns the finished target block once its
    /// `END` line is seen.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnbalancedEnd`] for an `END` with nothing open and
    /// [`DecodeError::UnexpectedAttribute`] for an attribute with nothing open.
    pub fn push(
        &mut self,
        lr: &LineRef,
        class: LineClass<'_>,
    ) -> Result<Option<Token>, DecodeError> {
        match class {
            LineClass::Blank => Ok(None),
            LineClass::Begin { kind } => {
                self.open.push(Token::block(kind));
                Ok(None)
            }
            LineClass::End { kind } => self.close(lr, kind),
            LineClass::Attribute {
                name,
                parameters,
                value,
            } => {
                let Some(parent) = self.open.last_mut() else {
                    return Err(DecodeError::UnexpectedAttribute {
                        line_number: lr.number,
                        line: lr.text.clone(),
                    });
                };
                let mut attr = Token::attribute(name, value);
                attr.parameters = parameters;
                parent.children.push(attr);
                Ok(None)
            }
        }
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// The outermost open block, if any.
    ///
    /// Used when the input ends before the target closes. Blocks still open
    /// inside it are left out, so every child it holds was closed by its `END`.
    pub fn finish(self) -> Option<Token> {
        self.open.into_iter().next()
    }

    fn close(&mut self, lr: &LineRef, kind: &str) -> Result<Option<Token>, DecodeError> {
        let Some(closed) = self.open.pop() else {
            return Err(DecodeError::UnbalancedEnd {
                line_number: lr.number,
                line: lr.text.clone(),
            });
        };

        if closed.kind != kind {
            log::warn!(
                "line {}: END:{kind} closes block {:?}",
                lr.number,
                closed.kind
            );
        }

        if closed.kind == self.target {
            return Ok(Some(closed));
        }

        if let Some(parent) = self.open.last_mut() {
            parent.children.push(closed);
        }
        Ok(None)
    }
}
