//! Source file spans and locations
//!
//! Offsets only feed diagnostics. Synthetic declarations that have no source
//! text carry [`Span::UNDEFINED`].

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A unique identifier for a source file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileId(pub u32);

/// Offset used by both ends of an undefined span
pub const UNDEFINED_OFFSET: u32 = u32::MAX;

/// A byte offset span in a source file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Start offset, inclusive
    pub start: u32,
    /// End offset, exclusive
    pub end: u32,
}

impl Span {
    /// Span of a node with no source position
    pub const UNDEFINED: Self = Self {
        start: UNDEFINED_OFFSET,
        end: UNDEFINED_OFFSET,
    };

    /// New value from its parts
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Whether either end is [`UNDEFINED_OFFSET`]
    pub fn is_undefined(&self) -> bool {
        self.start == UNDEFINED_OFFSET || self.end == UNDEFINED_OFFSET
    }

    /// Byte range, or `None` for an undefined span
    pub fn range(&self) -> Option<Range<usize>> {
        if self.is_undefined() {
            return None;
        }
        Some(self.start as usize..self.end as usize)
    }

    /// Length in bytes; zero for an undefined span
    pub fn len(&self) -> u32 {
        if self.is_undefined() {
            return 0;
        }
        self.end.saturating_sub(self.start)
    }

    /// Whether there is nothing in it
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

/// A span with associated file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileSpan {
    /// Source file
    pub file: FileId,
    /// Range within the file
    pub span: Span,
}

impl FileSpan {
    /// New value from its parts
    pub fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }

    /// Byte range, or `None` for an undefined span
    pub fn range(&self) -> Option<Range<usize>> {
        self.span.range()
    }
}
