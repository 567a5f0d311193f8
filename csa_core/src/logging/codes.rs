//! Consolidated diagnostic codes and classification system
//!
//! Single source of truth for all diagnostic codes, their metadata, and
//! classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a diagnostic code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("CSA001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("CSA002");
}

/// Token stream error codes
pub mod tokens {
    use super::Code;

    pub const LINK_MISMATCH: Code = Code::new("E020");
    pub const UNMATCHED_BRACKET: Code = Code::new("E021");
    pub const TOKEN_INDEX_OUT_OF_RANGE: Code = Code::new("E022");
}

/// Pattern engine error codes
pub mod pattern {
    use super::Code;

    pub const INVALID_VARID: Code = Code::new("E040");
    pub const UNKNOWN_COMMAND: Code = Code::new("E041");
}

/// Expression tree error codes
pub mod ast {
    use super::Code;

    pub const CYCLIC_DEPENDENCY: Code = Code::new("E060");
    pub const BRACKET_SCAN_FAILED: Code = Code::new("E061");
}

/// Value-flow error codes
pub mod valueflow {
    use super::Code;

    pub const VALUE_CAPACITY_REACHED: Code = Code::new("E080");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const CORE_INITIALIZED: Code = Code::new("I001");
    pub const STREAM_CONSTRUCTED: Code = Code::new("I020");
    pub const LINKS_CREATED: Code = Code::new("I021");
    pub const DUMP_COMPLETE: Code = Code::new("I040");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();

        registry.insert(
            "CSA001",
            ErrorMetadata::new(
                "CSA001",
                "System",
                Severity::High,
                true,
                false,
                "Internal error in the analysis core",
            ),
        );
        registry.insert(
            "CSA002",
            ErrorMetadata::new(
                "CSA002",
                "System",
                Severity::Critical,
                false,
                true,
                "Core initialization failure",
            ),
        );
        registry.insert(
            "E020",
            ErrorMetadata::new(
                "E020",
                "Tokens",
                Severity::Medium,
                true,
                false,
                "Closing bracket does not match the innermost open bracket",
            ),
        );
        registry.insert(
            "E021",
            ErrorMetadata::new(
                "E021",
                "Tokens",
                Severity::Medium,
                true,
                false,
                "Bracket left open at end of token stream",
            ),
        );
        registry.insert(
            "E022",
            ErrorMetadata::new(
                "E022",
                "Tokens",
                Severity::Medium,
                true,
                false,
                "Token offset outside the stream",
            ),
        );
        registry.insert(
            "E040",
            ErrorMetadata::new(
                "E040",
                "Pattern",
                Severity::High,
                true,
                false,
                "Pattern with %varid% was matched with varid 0",
            ),
        );
        registry.insert(
            "E041",
            ErrorMetadata::new(
                "E041",
                "Pattern",
                Severity::High,
                true,
                false,
                "Unknown %cmd% in match pattern",
            ),
        );
        registry.insert(
            "E060",
            ErrorMetadata::new(
                "E060",
                "Ast",
                Severity::High,
                true,
                false,
                "Operand attachment would create a cyclic expression tree",
            ),
        );
        registry.insert(
            "E061",
            ErrorMetadata::new(
                "E061",
                "Ast",
                Severity::Medium,
                true,
                false,
                "Bracket scan ran off the stream on garbage code",
            ),
        );
        registry.insert(
            "E080",
            ErrorMetadata::new(
                "E080",
                "ValueFlow",
                Severity::Low,
                true,
                false,
                "Per-token value list is full, value dropped",
            ),
        );
        registry.insert(
            "I001",
            ErrorMetadata::new(
                "I001",
                "System",
                Severity::Low,
                true,
                false,
                "Analysis core initialized",
            ),
        );
        registry.insert(
            "I020",
            ErrorMetadata::new(
                "I020",
                "Tokens",
                Severity::Low,
                true,
                false,
                "Token stream constructed",
            ),
        );

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific diagnostic code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from a diagnostic code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if the error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if the error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for a diagnostic code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get category for a diagnostic code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_classification() {
        assert_eq!(get_severity("CSA002"), Severity::Critical);
        assert!(requires_halt("CSA002"));
        assert!(is_recoverable("E040"));
        assert_eq!(get_category("E060"), "Ast");
        assert_eq!(get_description("E999"), "Unknown error");
    }

    #[test]
    fn test_code_display() {
        assert_eq!(pattern::INVALID_VARID.to_string(), "E040");
        assert_eq!(system::INTERNAL_ERROR.as_str(), "CSA001");
    }
}
