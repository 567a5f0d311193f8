//! Id-addressed arenas for variables, functions, types, scopes, enumerators

use crate::tokens::TokenId;

macro_rules! symbol_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            pub fn index(&self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

symbol_id!(
    /// Handle of a [`Variable`] record
    VariableId
);
symbol_id!(
    /// Handle of a [`Function`] record
    FunctionId
);
symbol_id!(
    /// Handle of a [`TypeRec`] record
    TypeId
);
symbol_id!(
    /// Handle of a [`Scope`] record
    ScopeId
);
symbol_id!(
    /// Handle of an [`Enumerator`] record
    EnumeratorId
);

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub type_ref: Option<TypeId>,
    pub scope: Option<ScopeId>,
    pub is_static: bool,
    pub is_reference: bool,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub is_lambda: bool,
    pub ret_type: Option<TypeId>,
}

#[derive(Debug, Clone)]
pub struct TypeRec {
    pub name: String,
    pub is_enum_type: bool,
    /// Token of the class/struct/enum definition, when the stream has one
    pub class_def: Option<TokenId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Namespace,
    Class,
    Struct,
    Union,
    Enum,
    Function,
    Block,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub nested_in: Option<ScopeId>,
    pub function: Option<FunctionId>,
}

/// All symbol records of one translation unit.
///
/// Outlives any token stream that references into it.
#[derive(Debug, Clone, Default)]
pub struct SymbolDatabase {
    variables: Vec<Variable>,
    functions: Vec<Function>,
    types: Vec<TypeRec>,
    scopes: Vec<Scope>,
    enumerators: Vec<Enumerator>,
}

#[derive(Debug, Clone)]
pub struct Enumerator {
    pub name: String,
    pub value: i64,
    pub value_known: bool,
}

impl SymbolDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, variable: Variable) -> VariableId {
        self.variables.push(variable);
        VariableId(self.variables.len() as u32 - 1)
    }

    pub fn add_function(&mut self, function: Function) -> FunctionId {
        self.functions.push(function);
        FunctionId(self.functions.len() as u32 - 1)
    }

    pub fn add_type(&mut self, type_rec: TypeRec) -> TypeId {
        self.types.push(type_rec);
        TypeId(self.types.len() as u32 - 1)
    }

    pub fn add_scope(&mut self, scope: Scope) -> ScopeId {
        self.scopes.push(scope);
        ScopeId(self.scopes.len() as u32 - 1)
    }

    pub fn add_enumerator(&mut self, enumerator: Enumerator) -> EnumeratorId {
        self.enumerators.push(enumerator);
        EnumeratorId(self.enumerators.len() as u32 - 1)
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.0 as usize]
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.0 as usize]
    }

    pub fn type_rec(&self, id: TypeId) -> &TypeRec {
        &self.types[id.0 as usize]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn enumerator(&self, id: EnumeratorId) -> &Enumerator {
        &self.enumerators[id.0 as usize]
    }

    /// Walk outward from a scope to its enclosing function scope, if any
    pub fn function_scope(&self, mut scope: Option<ScopeId>) -> Option<ScopeId> {
        while let Some(id) = scope {
            if self.scope(id).kind == ScopeKind::Function {
                return Some(id);
            }
            scope = self.scope(id).nested_in;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_scope_walk() {
        let mut db = SymbolDatabase::new();
        let global = db.add_scope(Scope {
            kind: ScopeKind::Global,
            nested_in: None,
            function: None,
        });
        let f = db.add_function(Function {
            name: "f".to_string(),
            is_lambda: false,
            ret_type: None,
        });
        let fscope = db.add_scope(Scope {
            kind: ScopeKind::Function,
            nested_in: Some(global),
            function: Some(f),
        });
        let block = db.add_scope(Scope {
            kind: ScopeKind::Block,
            nested_in: Some(fscope),
            function: None,
        });

        assert_eq!(db.function_scope(Some(block)), Some(fscope));
        assert_eq!(db.function_scope(Some(fscope)), Some(fscope));
        assert_eq!(db.function_scope(Some(global)), None);
        assert_eq!(db.function_scope(None), None);
    }

    #[test]
    fn test_record_accessors() {
        let mut db = SymbolDatabase::new();
        let t = db.add_type(TypeRec {
            name: "Color".to_string(),
            is_enum_type: true,
            class_def: None,
        });
        let v = db.add_variable(Variable {
            name: "c".to_string(),
            type_ref: Some(t),
            scope: None,
            is_static: false,
            is_reference: false,
        });

        assert_eq!(db.type_rec(t).name, "Color");
        assert!(db.type_rec(t).is_enum_type);
        assert_eq!(db.variable(v).type_ref, Some(t));
    }
}
