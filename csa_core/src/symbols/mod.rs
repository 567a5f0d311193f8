//! Symbol database records referenced from tokens
//!
//! The stream core does not build the symbol database; it only carries weak
//! references into it. The records here are the id-addressed arenas those
//! references resolve through. Back-references never own: destroying a
//! stream leaves the database intact, and vice versa.

mod table;

pub use table::{
    Enumerator, EnumeratorId, Function, FunctionId, Scope, ScopeId, ScopeKind, SymbolDatabase,
    TypeId, TypeRec, Variable, VariableId,
};

use serde::{Deserialize, Serialize};

/// Signedness of a resolved expression type, used when formatting values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeSign {
    #[default]
    Unknown,
    Signed,
    Unsigned,
}

/// Resolved semantic type of the expression a token heads.
///
/// Owned by the token; replaced wholesale when type resolution reruns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeInfo {
    pub sign: TypeSign,
    pub base: String,
    pub pointer: u8,
}

impl TypeInfo {
    pub fn new(sign: TypeSign, base: impl Into<String>, pointer: u8) -> Self {
        Self {
            sign,
            base: base.into(),
            pointer,
        }
    }

    /// Human-readable rendering, e.g. `"unsigned int *"`
    pub fn type_str(&self) -> String {
        let mut out = String::new();
        match self.sign {
            TypeSign::Signed => out.push_str("signed "),
            TypeSign::Unsigned => out.push_str("unsigned "),
            TypeSign::Unknown => {}
        }
        out.push_str(&self.base);
        for _ in 0..self.pointer {
            out.push_str(" *");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_str() {
        assert_eq!(TypeInfo::new(TypeSign::Unknown, "int", 0).type_str(), "int");
        assert_eq!(
            TypeInfo::new(TypeSign::Unsigned, "int", 0).type_str(),
            "unsigned int"
        );
        assert_eq!(
            TypeInfo::new(TypeSign::Signed, "char", 2).type_str(),
            "signed char * *"
        );
    }
}
