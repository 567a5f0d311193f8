//! One node of the token stream
//!
//! A `Token` keeps the light, hot state inline (lexeme, kind, flags,
//! neighbour and bracket links) and owns its heavy state behind one
//! allocation (`TokenData`): value list, AST edges, source position,
//! symbol-database back-references.

use crate::symbols::{EnumeratorId, FunctionId, ScopeId, TypeId, TypeInfo, VariableId};
use crate::tokens::kind::{TokenFlags, TokenKind};
use crate::tokens::{TemplateRefId, TokenId};
use crate::utils::SourceLocation;
use crate::values::Value;

/// Keywords that transfer control flow
const CONTROL_FLOW_KEYWORDS: &[&str] = &[
    "goto", "do", "if", "else", "for", "while", "switch", "case", "break", "continue", "return",
];

/// Fundamental type names recognized without a symbol database
const STANDARD_TYPES: &[&str] = &[
    "bool", "_Bool", "char", "double", "float", "int", "long", "short", "size_t", "void",
    "wchar_t",
];

/// Encoding prefixes a string or character literal may carry
const LITERAL_PREFIXES: &[&str] = &["u8", "u", "U", "L"];

/// Extra semantic attributes attached by annotation macros in the analyzed
/// source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Low,
    High,
}

/// Heavy per-token state, owned 1:1 by its token
#[derive(Debug, Default)]
pub struct TokenData {
    pub(crate) var_id: u32,
    pub(crate) index: u32,
    pub(crate) file_index: u32,
    pub(crate) line_number: u32,
    pub(crate) column: u32,
    pub(crate) progress_value: u32,
    pub(crate) ast_operand1: Option<TokenId>,
    pub(crate) ast_operand2: Option<TokenId>,
    pub(crate) ast_parent: Option<TokenId>,
    pub(crate) values: Option<Vec<Value>>,
    pub(crate) value_type: Option<Box<TypeInfo>>,
    pub(crate) original_name: Option<Box<String>>,
    pub(crate) variable: Option<VariableId>,
    pub(crate) function: Option<FunctionId>,
    pub(crate) type_ref: Option<TypeId>,
    pub(crate) scope: Option<ScopeId>,
    pub(crate) enumerator: Option<EnumeratorId>,
    pub(crate) template_refs: Vec<TemplateRefId>,
    pub(crate) attributes: Vec<(AttributeKind, i64)>,
}

#[derive(Debug, Default)]
pub struct Token {
    text: String,
    kind: TokenKind,
    flags: TokenFlags,
    link: Option<TokenId>,
    pub(crate) next: Option<TokenId>,
    pub(crate) prev: Option<TokenId>,
    pub(crate) data: Box<TokenData>,
}

fn is_string_char_literal(text: &str, quote: char) -> bool {
    if !text.ends_with(quote) {
        return false;
    }
    if text.starts_with(quote) && text.len() > 1 {
        return true;
    }
    LITERAL_PREFIXES.iter().any(|prefix| {
        text.strip_prefix(prefix)
            .map_or(false, |rest| rest.starts_with(quote))
    })
}

impl Token {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Lexeme and classification
    // ========================================================================

    pub fn str(&self) -> &str {
        &self.text
    }

    /// Replace the lexeme and re-derive kind and derived flags
    pub fn set_str(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.update_properties();
    }

    /// Raw lexeme replacement without reclassification; only the stream's
    /// own state-transfer operations may use this
    pub(crate) fn set_str_raw(&mut self, text: String) {
        self.text = text;
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: TokenKind) {
        self.kind = kind;
    }

    pub(crate) fn flags(&self) -> TokenFlags {
        self.flags
    }

    pub(crate) fn set_flags(&mut self, flags: TokenFlags) {
        self.flags = flags;
    }

    pub fn link(&self) -> Option<TokenId> {
        self.link
    }

    /// One-sided link assignment; symmetric pairing goes through
    /// `TokenList::create_mutual_links`. Angle brackets classify by link
    /// presence, so they are re-derived here.
    pub fn set_link(&mut self, link: Option<TokenId>) {
        self.link = link;
        if self.text == "<" || self.text == ">" {
            self.update_properties();
        }
    }

    pub fn var_id(&self) -> u32 {
        self.data.var_id
    }

    pub fn set_var_id(&mut self, var_id: u32) {
        self.data.var_id = var_id;
        if var_id != 0 {
            self.kind = TokenKind::Variable;
            self.flags.remove(TokenFlags::STANDARD_TYPE);
        } else {
            self.update_properties();
        }
    }

    /// Re-derive the kind and the derived flags from the current lexeme.
    /// Deterministic: running it twice on an unchanged lexeme is a no-op.
    pub fn update_properties(&mut self) {
        self.flags.set(
            TokenFlags::CONTROL_FLOW_KEYWORD,
            CONTROL_FLOW_KEYWORDS.contains(&self.text.as_str()),
        );

        if !self.text.is_empty() {
            let bytes = self.text.as_bytes();
            let len = self.text.len();
            if self.text == "true" || self.text == "false" {
                self.kind = TokenKind::Boolean;
            } else if is_string_char_literal(&self.text, '"') {
                self.kind = TokenKind::String;
            } else if is_string_char_literal(&self.text, '\'') {
                self.kind = TokenKind::Char;
            } else if bytes[0].is_ascii_alphabetic() || bytes[0] == b'_' || bytes[0] == b'$' {
                if self.data.var_id != 0 {
                    self.kind = TokenKind::Variable;
                } else if !matches!(
                    self.kind,
                    TokenKind::Variable | TokenKind::Function | TokenKind::Type | TokenKind::Keyword
                ) {
                    self.kind = TokenKind::Name;
                }
            } else if bytes[0].is_ascii_digit()
                || (len > 1 && bytes[0] == b'-' && bytes[1].is_ascii_digit())
            {
                self.kind = TokenKind::Number;
            } else if self.text == "="
                || self.text == "<<="
                || self.text == ">>="
                || (len == 2 && bytes[1] == b'=' && b"+-*/%&^|".contains(&bytes[0]))
            {
                self.kind = TokenKind::Assignment;
            } else if len == 1 && b",[]()?:".contains(&bytes[0]) {
                self.kind = TokenKind::ExtendedOp;
            } else if self.text == "<<"
                || self.text == ">>"
                || (len == 1 && b"+-*/%".contains(&bytes[0]))
            {
                self.kind = TokenKind::Arithmetic;
            } else if len == 1 && b"&|^~".contains(&bytes[0]) {
                self.kind = TokenKind::Bit;
            } else if self.text == "&&" || self.text == "||" || self.text == "!" {
                self.kind = TokenKind::Logical;
            } else if self.link.is_none()
                && matches!(self.text.as_str(), "==" | "!=" | "<" | "<=" | ">" | ">=")
            {
                self.kind = TokenKind::Comparison;
            } else if self.text == "++" || self.text == "--" {
                self.kind = TokenKind::IncDec;
            } else if len == 1
                && (b"{}".contains(&bytes[0]) || (self.link.is_some() && b"<>".contains(&bytes[0])))
            {
                self.kind = TokenKind::Bracket;
            } else {
                self.kind = TokenKind::Other;
            }
        } else {
            self.kind = TokenKind::None;
        }

        self.update_literal_prefix();
        self.update_standard_type();
        self.flags.set(
            TokenFlags::LITERAL,
            matches!(
                self.kind,
                TokenKind::Number | TokenKind::String | TokenKind::Char | TokenKind::Boolean
            ),
        );
    }

    /// Strip the encoding prefix off a string/char literal; every prefix
    /// except `u8` marks the literal wide
    fn update_literal_prefix(&mut self) {
        if !matches!(self.kind, TokenKind::String | TokenKind::Char) {
            return;
        }
        let quote = if self.kind == TokenKind::String { '"' } else { '\'' };
        for prefix in LITERAL_PREFIXES {
            let prefixed = self
                .text
                .strip_prefix(prefix)
                .map_or(false, |rest| rest.starts_with(quote));
            if prefixed {
                self.text = self.text[prefix.len()..].to_string();
                self.flags.set(TokenFlags::LONG, *prefix != "u8");
                break;
            }
        }
    }

    fn update_standard_type(&mut self) {
        self.flags.remove(TokenFlags::STANDARD_TYPE);
        if self.text.len() < 3 {
            return;
        }
        if STANDARD_TYPES.contains(&self.text.as_str()) {
            self.flags.insert(TokenFlags::STANDARD_TYPE);
            self.kind = TokenKind::Type;
        }
    }

    // ========================================================================
    // Kind predicates
    // ========================================================================

    pub fn is_name(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Name
                | TokenKind::Type
                | TokenKind::Variable
                | TokenKind::Function
                | TokenKind::Keyword
                | TokenKind::Boolean
        )
    }

    pub fn is_number(&self) -> bool {
        self.kind == TokenKind::Number
    }

    pub fn is_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword
    }

    pub fn is_boolean(&self) -> bool {
        self.kind == TokenKind::Boolean
    }

    pub fn is_arithmetical_op(&self) -> bool {
        self.kind == TokenKind::Arithmetic
    }

    pub fn is_comparison_op(&self) -> bool {
        self.kind == TokenKind::Comparison
    }

    pub fn is_assignment_op(&self) -> bool {
        self.kind == TokenKind::Assignment
    }

    /// Operators without side effects
    pub fn is_const_op(&self) -> bool {
        self.is_arithmetical_op()
            || matches!(
                self.kind,
                TokenKind::Logical | TokenKind::Comparison | TokenKind::Bit
            )
    }

    /// Any operator
    pub fn is_op(&self) -> bool {
        self.is_const_op() || self.is_assignment_op() || self.kind == TokenKind::IncDec
    }

    pub fn is_extended_op(&self) -> bool {
        self.is_const_op() || self.kind == TokenKind::ExtendedOp
    }

    /// Name token whose lexeme contains no lowercase letter
    pub fn is_upper_case_name(&self) -> bool {
        if !self.is_name() {
            return false;
        }
        !self.text.bytes().any(|b| b.is_ascii_lowercase())
    }

    // ========================================================================
    // Flag accessors
    // ========================================================================

    pub fn is_long(&self) -> bool {
        self.flags.contains(TokenFlags::LONG)
    }

    pub fn set_long(&mut self, value: bool) {
        self.flags.set(TokenFlags::LONG, value);
    }

    pub fn is_unsigned(&self) -> bool {
        self.flags.contains(TokenFlags::UNSIGNED)
    }

    pub fn set_unsigned(&mut self, value: bool) {
        self.flags.set(TokenFlags::UNSIGNED, value);
    }

    pub fn is_signed(&self) -> bool {
        self.flags.contains(TokenFlags::SIGNED)
    }

    pub fn set_signed(&mut self, value: bool) {
        self.flags.set(TokenFlags::SIGNED, value);
    }

    pub fn is_complex(&self) -> bool {
        self.flags.contains(TokenFlags::COMPLEX)
    }

    pub fn set_complex(&mut self, value: bool) {
        self.flags.set(TokenFlags::COMPLEX, value);
    }

    pub fn is_standard_type(&self) -> bool {
        self.flags.contains(TokenFlags::STANDARD_TYPE)
    }

    pub fn is_expanded_macro(&self) -> bool {
        self.flags.contains(TokenFlags::EXPANDED_MACRO)
    }

    pub fn set_expanded_macro(&mut self, value: bool) {
        self.flags.set(TokenFlags::EXPANDED_MACRO, value);
    }

    pub fn is_enum_type(&self) -> bool {
        self.flags.contains(TokenFlags::ENUM_TYPE)
    }

    pub fn set_enum_type(&mut self, value: bool) {
        self.flags.set(TokenFlags::ENUM_TYPE, value);
    }

    pub fn is_control_flow_keyword(&self) -> bool {
        self.flags.contains(TokenFlags::CONTROL_FLOW_KEYWORD)
    }

    pub fn is_literal(&self) -> bool {
        self.flags.contains(TokenFlags::LITERAL)
    }

    // ========================================================================
    // Position and heavy state
    // ========================================================================

    pub fn file_index(&self) -> u32 {
        self.data.file_index
    }

    pub fn line(&self) -> u32 {
        self.data.line_number
    }

    pub fn column(&self) -> u32 {
        self.data.column
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.data.file_index, self.data.line_number, self.data.column)
    }

    pub fn index(&self) -> u32 {
        self.data.index
    }

    pub fn progress_value(&self) -> u32 {
        self.data.progress_value
    }

    pub fn original_name(&self) -> &str {
        self.data
            .original_name
            .as_deref()
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_original_name(&mut self, name: impl Into<String>) {
        self.data.original_name = Some(Box::new(name.into()));
    }

    pub fn ast_operand1(&self) -> Option<TokenId> {
        self.data.ast_operand1
    }

    pub fn ast_operand2(&self) -> Option<TokenId> {
        self.data.ast_operand2
    }

    pub fn ast_parent(&self) -> Option<TokenId> {
        self.data.ast_parent
    }

    pub fn values(&self) -> &[Value] {
        self.data.values.as_deref().unwrap_or(&[])
    }

    pub fn has_values(&self) -> bool {
        self.data.values.as_ref().map_or(false, |v| !v.is_empty())
    }

    pub fn value_type(&self) -> Option<&TypeInfo> {
        self.data.value_type.as_deref()
    }

    pub fn set_value_type(&mut self, value_type: Option<TypeInfo>) {
        self.data.value_type = value_type.map(Box::new);
    }

    pub fn variable(&self) -> Option<VariableId> {
        self.data.variable
    }

    pub fn set_variable(&mut self, variable: Option<VariableId>) {
        self.data.variable = variable;
    }

    pub fn function_ref(&self) -> Option<FunctionId> {
        self.data.function
    }

    pub fn type_ref(&self) -> Option<TypeId> {
        self.data.type_ref
    }

    pub fn scope(&self) -> Option<ScopeId> {
        self.data.scope
    }

    pub fn set_scope(&mut self, scope: Option<ScopeId>) {
        self.data.scope = scope;
    }

    pub fn enumerator(&self) -> Option<EnumeratorId> {
        self.data.enumerator
    }

    pub fn set_enumerator(&mut self, enumerator: Option<EnumeratorId>) {
        self.data.enumerator = enumerator;
    }

    /// Record an annotation attribute; one value per kind, last write wins
    pub fn set_attribute(&mut self, kind: AttributeKind, value: i64) {
        if let Some(entry) = self.data.attributes.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 = value;
        } else {
            self.data.attributes.push((kind, value));
        }
    }

    pub fn get_attribute(&self, kind: AttributeKind) -> Option<i64> {
        self.data
            .attributes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|&(_, v)| v)
    }

    // ========================================================================
    // Stringification of one token
    // ========================================================================

    pub fn stringify(&self, out: &mut String, varid: bool, attributes: bool, macros: bool) {
        if attributes {
            if self.is_unsigned() {
                out.push_str("unsigned ");
            } else if self.is_signed() {
                out.push_str("signed ");
            }
            if self.is_complex() {
                out.push_str("_Complex ");
            }
            if self.is_long() {
                if matches!(self.kind, TokenKind::String | TokenKind::Char) {
                    out.push('L');
                } else {
                    out.push_str("long ");
                }
            }
        }
        if macros && self.is_expanded_macro() {
            out.push('$');
        }
        if self.is_name() && self.text.contains(' ') {
            for c in self.text.chars().filter(|c| *c != ' ') {
                out.push(c);
            }
        } else if !self.text.starts_with('"') || !self.text.contains('\0') {
            out.push_str(&self.text);
        } else {
            for c in self.text.chars() {
                if c == '\0' {
                    out.push_str("\\0");
                } else {
                    out.push(c);
                }
            }
        }
        if varid && self.data.var_id != 0 {
            out.push('@');
            out.push_str(&self.data.var_id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(text: &str) -> Token {
        let mut tok = Token::new();
        tok.set_str(text);
        tok
    }

    #[test]
    fn test_classify_names_and_numbers() {
        assert_eq!(classified("abc").kind(), TokenKind::Name);
        assert_eq!(classified("_x").kind(), TokenKind::Name);
        assert_eq!(classified("$gcc_ext").kind(), TokenKind::Name);
        assert_eq!(classified("123").kind(), TokenKind::Number);
        assert_eq!(classified("-3").kind(), TokenKind::Number);
        assert_eq!(classified("0x1f").kind(), TokenKind::Number);
        assert_eq!(classified("true").kind(), TokenKind::Boolean);
        assert_eq!(classified("false").kind(), TokenKind::Boolean);
    }

    #[test]
    fn test_classify_operators() {
        assert_eq!(classified("=").kind(), TokenKind::Assignment);
        assert_eq!(classified("+=").kind(), TokenKind::Assignment);
        assert_eq!(classified("<<=").kind(), TokenKind::Assignment);
        assert_eq!(classified(">>=").kind(), TokenKind::Assignment);
        assert_eq!(classified("+").kind(), TokenKind::Arithmetic);
        assert_eq!(classified("<<").kind(), TokenKind::Arithmetic);
        assert_eq!(classified("&").kind(), TokenKind::Bit);
        assert_eq!(classified("~").kind(), TokenKind::Bit);
        assert_eq!(classified("&&").kind(), TokenKind::Logical);
        assert_eq!(classified("!").kind(), TokenKind::Logical);
        assert_eq!(classified("==").kind(), TokenKind::Comparison);
        assert_eq!(classified("<=").kind(), TokenKind::Comparison);
        assert_eq!(classified("++").kind(), TokenKind::IncDec);
        assert_eq!(classified(",").kind(), TokenKind::ExtendedOp);
        assert_eq!(classified("?").kind(), TokenKind::ExtendedOp);
        assert_eq!(classified("(").kind(), TokenKind::ExtendedOp);
        assert_eq!(classified("{").kind(), TokenKind::Bracket);
        assert_eq!(classified("::").kind(), TokenKind::Other);
    }

    #[test]
    fn test_angle_bracket_depends_on_link() {
        // without a link "<" is a comparison...
        assert_eq!(classified("<").kind(), TokenKind::Comparison);

        // ...with a link it is a template bracket
        let mut tok = Token::new();
        tok.set_link(Some(TokenId::for_tests(1, 0)));
        tok.set_str("<");
        assert_eq!(tok.kind(), TokenKind::Bracket);
    }

    #[test]
    fn test_string_and_char_literals() {
        let tok = classified("\"hello\"");
        assert_eq!(tok.kind(), TokenKind::String);
        assert!(tok.is_literal());

        let tok = classified("'a'");
        assert_eq!(tok.kind(), TokenKind::Char);
    }

    #[test]
    fn test_literal_prefix_stripping() {
        let tok = classified("L\"wide\"");
        assert_eq!(tok.kind(), TokenKind::String);
        assert_eq!(tok.str(), "\"wide\"");
        assert!(tok.is_long());

        let tok = classified("u8\"utf8\"");
        assert_eq!(tok.str(), "\"utf8\"");
        assert!(!tok.is_long());

        let tok = classified("U'c'");
        assert_eq!(tok.str(), "'c'");
        assert!(tok.is_long());
    }

    #[test]
    fn test_standard_types() {
        let tok = classified("int");
        assert_eq!(tok.kind(), TokenKind::Type);
        assert!(tok.is_standard_type());

        let tok = classified("wchar_t");
        assert_eq!(tok.kind(), TokenKind::Type);

        // too short to be checked against the set
        let tok = classified("u8");
        assert!(!tok.is_standard_type());
    }

    #[test]
    fn test_control_flow_keywords() {
        assert!(classified("while").is_control_flow_keyword());
        assert!(classified("return").is_control_flow_keyword());
        assert!(!classified("whilenot").is_control_flow_keyword());
    }

    #[test]
    fn test_classification_determinism() {
        let mut tok = classified("==");
        let kind = tok.kind();
        let flags = tok.flags();
        tok.update_properties();
        assert_eq!(tok.kind(), kind);
        assert_eq!(tok.flags(), flags);
    }

    #[test]
    fn test_var_id_coerces_kind() {
        let mut tok = classified("x");
        assert_eq!(tok.kind(), TokenKind::Name);

        tok.set_var_id(7);
        assert_eq!(tok.kind(), TokenKind::Variable);

        // clearing the id reclassifies, and an established Variable stays one
        tok.set_var_id(0);
        assert_eq!(tok.kind(), TokenKind::Variable);
    }

    #[test]
    fn test_kind_survives_reclassification_for_marked_names() {
        let mut tok = classified("f");
        tok.set_kind(TokenKind::Function);
        tok.set_str("f");
        assert_eq!(tok.kind(), TokenKind::Function);
    }

    #[test]
    fn test_operator_predicates() {
        assert!(classified("+").is_const_op());
        assert!(classified("==").is_const_op());
        assert!(!classified("=").is_const_op());
        assert!(classified("=").is_op());
        assert!(classified("++").is_op());
        assert!(classified(",").is_extended_op());
        assert!(!classified(",").is_op());
    }

    #[test]
    fn test_upper_case_name() {
        assert!(classified("MACRO_NAME").is_upper_case_name());
        assert!(!classified("MacroName").is_upper_case_name());
        assert!(!classified("123").is_upper_case_name());
    }

    #[test]
    fn test_attributes_last_write_wins() {
        let mut tok = classified("x");
        assert_eq!(tok.get_attribute(AttributeKind::Low), None);

        tok.set_attribute(AttributeKind::Low, 3);
        tok.set_attribute(AttributeKind::High, 100);
        tok.set_attribute(AttributeKind::Low, -3);

        assert_eq!(tok.get_attribute(AttributeKind::Low), Some(-3));
        assert_eq!(tok.get_attribute(AttributeKind::High), Some(100));
    }

    #[test]
    fn test_stringify_attributes_and_varid() {
        let mut tok = classified("x");
        tok.set_var_id(3);

        let mut out = String::new();
        tok.stringify(&mut out, true, false, false);
        assert_eq!(out, "x@3");

        let mut tok = classified("int");
        tok.set_unsigned(true);
        let mut out = String::new();
        tok.stringify(&mut out, false, true, false);
        assert_eq!(out, "unsigned int");

        let mut tok = classified("\"s\"");
        tok.set_long(true);
        let mut out = String::new();
        tok.stringify(&mut out, false, true, false);
        assert_eq!(out, "L\"s\"");
    }

    #[test]
    fn test_stringify_escapes_embedded_nul() {
        let mut tok = Token::new();
        tok.set_str("\"a\0b\"".to_string());
        let mut out = String::new();
        tok.stringify(&mut out, false, false, false);
        assert_eq!(out, "\"a\\0b\"");
    }
}
