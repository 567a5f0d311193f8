//! Token classification: kinds and flag bits

use bitflags::bitflags;

/// Classification of a token, derived from its lexeme (and re-derived on
/// every lexeme change)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenKind {
    #[default]
    None,
    Name,
    Number,
    String,
    Char,
    Boolean,
    Type,
    Variable,
    Function,
    Keyword,
    Lambda,
    Assignment,
    Arithmetic,
    Comparison,
    Logical,
    Bit,
    IncDec,
    ExtendedOp,
    Bracket,
    Other,
}

bitflags! {
    /// Orthogonal token properties that survive reclassification only where
    /// the classifier re-derives them
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TokenFlags: u16 {
        const LONG = 1 << 0;
        const UNSIGNED = 1 << 1;
        const SIGNED = 1 << 2;
        const COMPLEX = 1 << 3;
        const STANDARD_TYPE = 1 << 4;
        const EXPANDED_MACRO = 1 << 5;
        const ENUM_TYPE = 1 << 6;
        const CONTROL_FLOW_KEYWORD = 1 << 7;
        const LITERAL = 1 << 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_independence() {
        let mut flags = TokenFlags::default();
        flags.insert(TokenFlags::LONG);
        flags.insert(TokenFlags::UNSIGNED);
        assert!(flags.contains(TokenFlags::LONG));
        assert!(flags.contains(TokenFlags::UNSIGNED));

        flags.remove(TokenFlags::LONG);
        assert!(!flags.contains(TokenFlags::LONG));
        assert!(flags.contains(TokenFlags::UNSIGNED));
    }
}
