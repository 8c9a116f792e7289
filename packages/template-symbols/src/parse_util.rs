//! Parse Utilities
//!
//! Source spans of template nodes.

use serde::{Deserialize, Serialize};
use ts::TextRange;

/// Offsets `[start, end)` of a template node in the template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParseSourceSpan {
    pub start: usize,
    pub end: usize,
}

impl ParseSourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        ParseSourceSpan { start, end }
    }

    /// The span as attributed on type-check block nodes.
    pub fn to_text_range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }
}

impl std::fmt::Display for ParseSourceSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
