//! CSA analysis core
//!
//! The token-stream engine of a static analysis tool for C and C++: a
//! doubly-linked token stream with bracket links and an expression tree
//! overlaid on it, the textual pattern-match language every checker is
//! written against, and the value-flow annotations that record what the
//! analysis knows about run-time values.
//!
//! The preprocessor, tokenizer front-end, symbol database construction and
//! the individual checkers live in sibling crates; they drive this core
//! through the builder interface of [`tokens::TokenList`] and read it back
//! through the pattern, AST and value queries.

// ============================================================================
// PUBLIC API - Core Surfaces
// ============================================================================

/// The token stream: nodes, classification, mutation, literals
pub mod tokens;

/// The textual pattern-match language
pub mod pattern;

/// Expression trees: construction, queries, renderings
pub mod ast;

/// Value-flow values and accessors
pub mod values;

/// Symbol-database records referenced from tokens
pub mod symbols;

/// Configuration system (compile-time constants + runtime settings)
pub mod config;

// ============================================================================
// PUBLIC API - Core Types (Re-exports)
// ============================================================================

pub use config::{EnabledGroup, Library, Settings};
pub use internal::InternalError;
pub use symbols::{SymbolDatabase, TypeInfo, TypeSign};
pub use tokens::{AttributeKind, Token, TokenFlags, TokenId, TokenKind, TokenList};
pub use utils::SourceLocation;
pub use values::{LifetimeKind, LifetimeScope, MoveKind, Value, ValueKind, ValueType};

// ============================================================================
// INTERNAL MODULES (Not part of public API)
// ============================================================================

mod internal;
#[macro_use]
pub mod logging;
pub mod utils;

// ============================================================================
// LIBRARY INFORMATION
// ============================================================================

/// Core implementation version
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core capability information
#[derive(Debug, Clone)]
pub struct CoreInfo {
    pub core_version: &'static str,
    pub value_aspects: u8,
    pub supports_parallel_streams: bool,
}

/// Get core information
pub fn get_core_info() -> CoreInfo {
    CoreInfo {
        core_version: CORE_VERSION,
        value_aspects: 8,
        supports_parallel_streams: true,
    }
}

impl CoreInfo {
    pub fn summary(&self) -> String {
        format!(
            "CSA analysis core v{}\n\
             Value aspects: {}, parallel streams: {}",
            self.core_version, self.value_aspects, self.supports_parallel_streams
        )
    }
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize the analysis core
///
/// Call this once at application startup to initialize logging and validate
/// the diagnostic code registry.
pub fn init() -> Result<(), String> {
    logging::init_global_logging()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_info() {
        let info = get_core_info();
        assert_eq!(info.value_aspects, 8);
        assert!(info.summary().contains("CSA analysis core"));
    }
}
