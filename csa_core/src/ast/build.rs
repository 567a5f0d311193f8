//! Installing expression-tree edges over the stream
//!
//! Operand setters hang an existing sub-tree under a new parent. A malformed
//! stream can present a sub-tree whose parent chain already loops; the
//! visited-set guard below turns that into a recoverable error instead of a
//! hang.

use crate::internal::InternalError;
use crate::tokens::{TokenId, TokenList};
use std::collections::HashSet;

impl TokenList {
    fn ast_root_of(&self, parent: TokenId, tok: TokenId) -> Result<TokenId, InternalError> {
        let mut visited: HashSet<TokenId> = HashSet::new();
        let mut cur = tok;
        while let Some(up) = self.tok(cur).ast_parent() {
            if !visited.insert(up) {
                return Err(InternalError::at(
                    self.tok(parent).location(),
                    "cyclic dependency while attaching an AST operand",
                ));
            }
            cur = up;
        }
        Ok(cur)
    }

    /// Attach `operand` (or rather the root of the tree it belongs to) as
    /// the first operand of `parent`
    pub fn set_ast_operand1(
        &mut self,
        parent: TokenId,
        operand: Option<TokenId>,
    ) -> Result<(), InternalError> {
        if let Some(old) = self.tok(parent).ast_operand1() {
            self.tok_mut(old).data.ast_parent = None;
        }
        let mut stored = operand;
        if let Some(tok) = operand {
            let root = self.ast_root_of(parent, tok)?;
            self.tok_mut(root).data.ast_parent = Some(parent);
            stored = Some(root);
        }
        self.tok_mut(parent).data.ast_operand1 = stored;
        Ok(())
    }

    /// Attach `operand` (or rather the root of the tree it belongs to) as
    /// the second operand of `parent`
    pub fn set_ast_operand2(
        &mut self,
        parent: TokenId,
        operand: Option<TokenId>,
    ) -> Result<(), InternalError> {
        if let Some(old) = self.tok(parent).ast_operand2() {
            self.tok_mut(old).data.ast_parent = None;
        }
        let mut stored = operand;
        if let Some(tok) = operand {
            let root = self.ast_root_of(parent, tok)?;
            self.tok_mut(root).data.ast_parent = Some(parent);
            stored = Some(root);
        }
        self.tok_mut(parent).data.ast_operand2 = stored;
        Ok(())
    }

    /// Top of the expression tree `id` belongs to
    pub fn ast_top(&self, id: TokenId) -> TokenId {
        let mut cur = id;
        while let Some(up) = self.tok(cur).ast_parent() {
            cur = up;
        }
        cur
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_attachment() {
        let mut list = TokenList::from_text("a + b").unwrap();
        let a = list.front().unwrap();
        let plus = list.next(a).unwrap();
        let b = list.next(plus).unwrap();

        list.set_ast_operand1(plus, Some(a)).unwrap();
        list.set_ast_operand2(plus, Some(b)).unwrap();

        assert_eq!(list.tok(plus).ast_operand1(), Some(a));
        assert_eq!(list.tok(plus).ast_operand2(), Some(b));
        assert_eq!(list.tok(a).ast_parent(), Some(plus));
        assert_eq!(list.tok(b).ast_parent(), Some(plus));
        assert_eq!(list.ast_top(a), plus);
    }

    #[test]
    fn test_attachment_hoists_to_subtree_root() {
        let mut list = TokenList::from_text("a + b * c").unwrap();
        let a = list.front().unwrap();
        let plus = list.next(a).unwrap();
        let b = list.next(plus).unwrap();
        let star = list.next(b).unwrap();
        let c = list.next(star).unwrap();

        list.set_ast_operand1(star, Some(b)).unwrap();
        list.set_ast_operand2(star, Some(c)).unwrap();
        list.set_ast_operand1(plus, Some(a)).unwrap();
        // attaching through a leaf of the "*" tree hangs the whole tree
        list.set_ast_operand2(plus, Some(b)).unwrap();

        assert_eq!(list.tok(plus).ast_operand2(), Some(star));
        assert_eq!(list.tok(star).ast_parent(), Some(plus));
    }

    #[test]
    fn test_reattachment_clears_old_parent() {
        let mut list = TokenList::from_text("x ; y").unwrap();
        let x = list.front().unwrap();
        let semi = list.next(x).unwrap();
        let y = list.next(semi).unwrap();

        list.set_ast_operand1(semi, Some(x)).unwrap();
        list.set_ast_operand1(semi, Some(y)).unwrap();

        assert_eq!(list.tok(x).ast_parent(), None);
        assert_eq!(list.tok(semi).ast_operand1(), Some(y));
    }

    #[test]
    fn test_cycle_is_refused() {
        let mut list = TokenList::from_text("a + b").unwrap();
        let a = list.front().unwrap();
        let plus = list.next(a).unwrap();
        let b = list.next(plus).unwrap();

        // garbage code can produce a looping parent chain: a -> + -> a
        list.set_ast_operand1(plus, Some(a)).unwrap();
        list.set_ast_operand1(a, Some(plus)).unwrap();

        // any attachment that walks the loop is refused instead of hanging
        assert!(list.set_ast_operand1(b, Some(a)).is_err());
    }

    #[test]
    fn test_ast_parent_walk_terminates() {
        let mut list = TokenList::from_text("( a + b )").unwrap();
        let open = list.front().unwrap();
        let a = list.next(open).unwrap();
        let plus = list.next(a).unwrap();
        let b = list.next(plus).unwrap();

        list.set_ast_operand1(plus, Some(a)).unwrap();
        list.set_ast_operand2(plus, Some(b)).unwrap();

        for id in list.tokens() {
            // following ast_parent from any token must terminate
            let mut steps = 0;
            let mut cur = id;
            while let Some(up) = list.tok(cur).ast_parent() {
                cur = up;
                steps += 1;
                assert!(steps < 100, "ast_parent chain does not terminate");
            }
        }
    }
}
