//! Source location tracking for the analysis core
//!
//! Tokens carry a (file index, line, column) triple instead of byte spans:
//! the stream is built from already-preprocessed translation units, so the
//! original byte offsets are gone by the time tokens exist.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in a translation unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct SourceLocation {
    /// Index into the file table of the translation unit (0 = the main file)
    pub file_index: u32,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl SourceLocation {
    /// Create a new location
    pub fn new(file_index: u32, line: u32, column: u32) -> Self {
        Self {
            file_index,
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file_index == 0 {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "file{}:{}:{}", self.file_index, self.line, self.column)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(SourceLocation::new(0, 4, 7).to_string(), "4:7");
        assert_eq!(SourceLocation::new(2, 4, 7).to_string(), "file2:4:7");
    }
}
