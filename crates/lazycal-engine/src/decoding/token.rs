use std::collections::BTreeMap;
use std::fmt;

/// A node in the decoded tree: either a block (`BEGIN:<kind>` .. `END:<kind>`)
/// or an attribute line (`<kind>[;<param>=<value>]*:<value>`).
///
/// Tokens own their children outright; there are no links back to the parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    /// Block name or attribute name.
    pub kind: String,
    /// Raw attribute payload. Always empty for blocks.
    pub value: String,
    /// Nested blocks and attributes in document order.
    pub children: Vec<Token>,
    /// Attribute parameters. Always empty for blocks.
    pub parameters: BTreeMap<String, String>,
    block: bool,
}

impl Token {
    /// An empty block, as opened by `BEGIN:<kind>`.
    pub fn block(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            block: true,
            ..Self::default()
        }
    }

    /// An attribute without parameters.
    pub fn attribute(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper for adding a parameter to an attribute.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Builder-style helper for appending a child to a block.
    #[must_use]
    pub fn with_child(mut self, child: Token) -> Self {
        self.children.push(child);
        self
    }

    /// True for tokens opened by a `BEGIN` line.
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.block
    }

    /// The first direct child of the given kind.
    #[must_use]
    pub fn subtoken(&self, kind: &str) -> Option<&Token> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Every direct child of the given kind, in document order.
    pub fn subtokens<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Token> + 'a {
        self.children.iter().filter(move |c| c.kind == kind)
    }
}

/// Debug-oriented one-line summary of the token and its direct children,
/// e.g. `<VEVENT: DTEND(TZID=America/New_York)=20160919T123000, SUMMARY=Hi>`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: ", self.kind)?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&child.kind)?;
            if !child.parameters.is_empty() {
                let params = child
                    .parameters
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "({params})")?;
            }
            write!(f, "={}", child.value)?;
        }
        f.write_str(">")
    }
}
