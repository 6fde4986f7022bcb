//! Source locations, carried through every AST node so that resolution and type errors can
//! report a file/line/column per §7 of the governing specification.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl Span {
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Span {
        Span {
            file: file.into(),
            line,
            column,
        }
    }

    /// A span for synthetic nodes the compiler itself introduces (e.g. a desugared `$VALUES`
    /// initializer) that have no corresponding source location.
    #[must_use]
    pub fn synthetic() -> Span {
        Span {
            file: String::from("<synthetic>"),
            line: 0,
            column: 0,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
