//! Source line ranges.
//!
//! Every positioned entity carries a [`LineRange`]: a 1-based, inclusive
//! `start..end` line extent. The `1 <= start <= end` invariant is enforced
//! at every construction and mutation; a violated bound is a
//! [`ModelError::Range`], never a silent clamp.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// An inclusive, 1-based line extent within a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    start: u32,
    end: u32,
}

impl LineRange {
    /// Create a range, rejecting `start < 1` and `end < start`.
    pub fn new(start: u32, end: u32) -> Result<Self, ModelError> {
        if start < 1 || end < start {
            return Err(ModelError::Range { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Move the start line, re-validating both bounds.
    pub fn set_start(&mut self, start: u32) -> Result<(), ModelError> {
        if start < 1 || self.end < start {
            return Err(ModelError::Range {
                start,
                end: self.end,
            });
        }
        self.start = start;
        Ok(())
    }

    /// Move the end line, re-validating both bounds.
    pub fn set_end(&mut self, end: u32) -> Result<(), ModelError> {
        if end < self.start {
            return Err(ModelError::Range {
                start: self.start,
                end,
            });
        }
        self.end = end;
        Ok(())
    }

    /// Line containment, boundary-exact at both ends.
    pub fn contains_line(&self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }

    /// Whether `other` lies entirely within this range.
    pub fn encloses(&self, other: &LineRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Number of lines covered (inclusive extent).
    pub fn line_count(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Invariant check used by decode-time validation, where serde has
    /// already populated the fields without going through `new`.
    pub(crate) fn is_valid(&self) -> bool {
        self.start >= 1 && self.start <= self.end
    }
}
