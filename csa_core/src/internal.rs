//! The recoverable internal error of the analysis core
//!
//! Raised when the core is driven into a state only garbage code or a buggy
//! caller can produce: an attempted AST cycle, `%varid%` matching without a
//! varid, `link_at` outside the stream, an unknown `%cmd%` in a pattern.
//! The surrounding pass catches it, records a diagnostic and moves on to the
//! next translation unit.

use crate::logging::codes::{self, Code};
use crate::utils::SourceLocation;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    #[error("internal error at {location}: {message}")]
    At {
        location: SourceLocation,
        message: String,
    },

    #[error("internal error: {message}")]
    General { message: String },
}

impl InternalError {
    pub fn new(message: impl Into<String>) -> Self {
        InternalError::General {
            message: message.into(),
        }
    }

    pub fn at(location: SourceLocation, message: impl Into<String>) -> Self {
        InternalError::At {
            location,
            message: message.into(),
        }
    }

    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            InternalError::At { location, .. } => Some(*location),
            InternalError::General { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            InternalError::At { message, .. } => message,
            InternalError::General { message } => message,
        }
    }

    pub fn error_code(&self) -> Code {
        codes::system::INTERNAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error_display() {
        let plain = InternalError::new("cyclic AST dependency");
        assert_eq!(plain.to_string(), "internal error: cyclic AST dependency");
        assert_eq!(plain.location(), None);

        let located = InternalError::at(SourceLocation::new(0, 12, 3), "garbage code");
        assert_eq!(located.to_string(), "internal error at 12:3: garbage code");
        assert_eq!(located.message(), "garbage code");
        assert_eq!(located.error_code().as_str(), "CSA001");
    }
}
