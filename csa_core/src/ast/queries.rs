//! Read-only queries over the stream and its expression trees

use crate::config::constants::compile_time::ast::MAX_UNARY_SCAN_DISTANCE;
use crate::pattern;
use crate::tokens::{TokenId, TokenList};

impl TokenList {
    /// From a `<` token, scan forward for the matching `>`; `>>` closes two
    /// levels at once. Other bracket kinds are skipped through their links;
    /// statement ends and closing brackets of an outer construct stop the
    /// scan.
    pub fn find_closing_bracket(&self, id: TokenId) -> Option<TokenId> {
        if self.tok(id).str() != "<" {
            return None;
        }
        let mut depth: i64 = 0;
        let mut cur = Some(id);
        while let Some(c) = cur {
            let tok = self.tok(c);
            match tok.str() {
                "{" | "[" | "(" => {
                    // garbage code may leave the bracket unlinked
                    let link = tok.link()?;
                    cur = self.tok(link).next;
                    continue;
                }
                "}" | "]" | ")" | ";" => return None,
                "<" => depth += 1,
                ">" => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(c);
                    }
                }
                ">>" => {
                    if depth <= 2 {
                        return Some(c);
                    }
                    depth -= 2;
                }
                _ => {}
            }
            cur = tok.next;
        }
        None
    }

    /// From a `>` token, scan backwards for the matching `<`
    pub fn find_opening_bracket(&self, id: TokenId) -> Option<TokenId> {
        if self.tok(id).str() != ">" {
            return None;
        }
        let mut depth: i64 = 0;
        let mut cur = Some(id);
        while let Some(c) = cur {
            let tok = self.tok(c);
            match tok.str() {
                "}" | "]" | ")" => {
                    let link = tok.link()?;
                    cur = self.tok(link).prev;
                    continue;
                }
                "{" | "(" | ";" => return None,
                ">" => depth += 1,
                "<" => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(c);
                    }
                }
                _ => {}
            }
            cur = tok.prev;
        }
        None
    }

    /// Token after the next top-level `,`; `None` at `)` or `;`
    pub fn next_argument(&self, id: TokenId) -> Option<TokenId> {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let tok = self.tok(c);
            if tok.str() == "," {
                return tok.next;
            }
            if let Some(link) = tok.link() {
                if matches!(tok.str(), "(" | "{" | "[" | "<") {
                    cur = self.tok(link).next;
                    continue;
                }
            }
            if matches!(tok.str(), ")" | ";") {
                return None;
            }
            cur = tok.next;
        }
        None
    }

    /// Token after the next top-level `,` of a template argument list;
    /// `None` at `>` or `;`
    pub fn next_template_argument(&self, id: TokenId) -> Option<TokenId> {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let tok = self.tok(c);
            if tok.str() == "," {
                return tok.next;
            }
            if let Some(link) = tok.link() {
                if matches!(tok.str(), "(" | "{" | "[" | "<") {
                    cur = self.tok(link).next;
                    continue;
                }
            }
            if matches!(tok.str(), ">" | ";") {
                return None;
            }
            cur = tok.next;
        }
        None
    }

    /// [`next_argument`] for streams whose `<>` pairs are not linked yet
    pub fn next_argument_before_create_links2(&self, id: TokenId) -> Option<TokenId> {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let tok = self.tok(c);
            if tok.str() == "," {
                return tok.next;
            }
            if let Some(link) = tok.link() {
                if matches!(tok.str(), "(" | "{" | "[") {
                    cur = self.tok(link).next;
                    continue;
                }
            }
            if tok.str() == "<" {
                if let Some(close) = self.find_closing_bracket(c) {
                    cur = self.tok(close).next;
                    continue;
                }
            } else if matches!(tok.str(), ")" | ";") {
                return None;
            }
            cur = tok.next;
        }
        None
    }

    /// Closing `}` of a lambda whose capture list starts at `first`
    pub fn find_lambda_end_token(&self, first: TokenId) -> Option<TokenId> {
        if self.tok(first).str() != "[" {
            return None;
        }
        let link = self.tok(first).link()?;
        let after = self.tok(link).next?;
        if !matches!(self.tok(after).str(), "(" | "{") {
            return None;
        }
        if self.tok(first).ast_operand1() != Some(after) {
            return None;
        }
        let mut tok = first;
        if let Some(op1) = self.tok(tok).ast_operand1() {
            if self.tok(op1).str() == "(" {
                tok = op1;
            }
        }
        if let Some(op1) = self.tok(tok).ast_operand1() {
            if self.tok(op1).str() == "{" {
                return self.tok(op1).link();
            }
        }
        None
    }

    /// A unary operator written before its operand (as opposed to
    /// post-increment/decrement)
    pub fn is_unary_pre_op(&self, id: TokenId) -> bool {
        let tok = self.tok(id);
        if tok.ast_operand1().is_none() || tok.ast_operand2().is_some() {
            return false;
        }
        if !matches!(tok.str(), "++" | "--") {
            return true;
        }
        let op1 = tok.ast_operand1();
        let mut tokbefore = tok.prev;
        let mut tokafter = tok.next;
        let mut distance = 1;
        while distance < MAX_UNARY_SCAN_DISTANCE {
            let Some(b) = tokbefore else { break };
            if Some(b) == op1 {
                return false;
            }
            if tokafter == op1 {
                return true;
            }
            tokbefore = self.tok(b).prev;
            tokafter = tokafter.and_then(|a| self.tok(a).prev);
            distance += 1;
        }
        // no operand in reach on either side, guess postfix
        false
    }

    /// An operator that computes a value. For `*` and `&` the operands
    /// decide between arithmetic and dereference/address-of/type
    /// specification.
    pub fn is_calculation(&self, id: TokenId) -> bool {
        let tok = self.tok(id);
        if !(tok.is_const_op() || matches!(tok.str(), "++" | "--")) {
            return false;
        }

        if matches!(tok.str(), "*" | "&") {
            let Some(op2) = tok.ast_operand2() else {
                return false;
            };
            if self.tok(op2).str() == "[" {
                return false;
            }

            let mut operands = vec![id];
            while let Some(op) = operands.pop() {
                let t = self.tok(op);
                if t.is_number() || t.var_id() > 0 {
                    return true;
                }
                if let Some(o1) = t.ast_operand1() {
                    operands.push(o1);
                }
                if let Some(o2) = t.ast_operand2() {
                    operands.push(o2);
                } else if matches!(t.str(), "*" | "&") {
                    return false;
                }
            }
            return false;
        }

        true
    }

    fn go_to_left_parenthesis(&self, mut start: TokenId, end: TokenId) -> TokenId {
        // move start to the lpar in an expression like '(*it).x'
        let mut par = 0i64;
        let mut cur = Some(start);
        while let Some(c) = cur {
            if c == end {
                break;
            }
            let tok = self.tok(c);
            if tok.str() == "(" {
                par += 1;
            } else if tok.str() == ")" {
                if par == 0 {
                    if let Some(link) = tok.link() {
                        start = link;
                    }
                } else {
                    par -= 1;
                }
            }
            cur = tok.next;
        }
        start
    }

    fn go_to_right_parenthesis(&self, start: TokenId, mut end: TokenId) -> TokenId {
        // move end to the rpar in an expression like '2>(x+1)'
        let mut par = 0i64;
        let mut cur = Some(end);
        while let Some(c) = cur {
            if c == start {
                break;
            }
            let tok = self.tok(c);
            if tok.str() == ")" {
                par += 1;
            } else if tok.str() == "(" {
                if par == 0 {
                    if let Some(link) = tok.link() {
                        end = link;
                    }
                } else {
                    par -= 1;
                }
            }
            cur = tok.prev;
        }
        end
    }

    /// The token range an expression tree covers: leftmost leaf to
    /// rightmost, adjusted through balanced parentheses
    pub fn find_expression_start_end(&self, id: TokenId) -> (TokenId, TokenId) {
        let top = id;

        // find the start node of the tree
        let mut start = top;
        loop {
            let tok = self.tok(start);
            let Some(op1) = tok.ast_operand1() else { break };
            if tok.ast_operand2().is_some()
                || !self.is_unary_pre_op(start)
                || pattern::simple_match(self, Some(start), "( )")
                || tok.str() == "{"
            {
                start = op1;
            } else {
                break;
            }
        }

        // find the end node of the tree
        let mut end = top;
        loop {
            let tok = self.tok(end);
            let Some(op1) = tok.ast_operand1() else { break };
            if tok.ast_operand2().is_none() && !self.is_unary_pre_op(end) {
                break;
            }
            if tok.str() == "[" {
                if let Some(lambda_end) = self.find_lambda_end_token(end) {
                    end = lambda_end;
                    break;
                }
            }
            let cast_like = tok.str() == "("
                && tok.ast_operand2().is_none()
                && tok.next.map_or(false, |n| {
                    let next = self.tok(n);
                    next.is_name() && next.var_id() == 0 && !next.is_keyword()
                });
            if matches!(tok.str(), "(" | "[") && !cast_like {
                if let Some(link) = tok.link() {
                    end = link;
                }
                break;
            }
            end = tok.ast_operand2().unwrap_or(op1);
        }

        // skip parentheses
        start = self.go_to_left_parenthesis(start, end);
        end = self.go_to_right_parenthesis(start, end);
        if pattern::simple_match(self, Some(end), "{") {
            if let Some(link) = self.tok(end).link() {
                end = link;
            }
        }

        // a parenthesis pair wrapping exactly this range belongs to it
        loop {
            let before = self.tok(start).prev;
            let after = self.tok(end).next;
            match (before, after) {
                (Some(b), Some(a))
                    if self.tok(b).str() == "(" && self.tok(b).link() == Some(a) =>
                {
                    start = b;
                    end = a;
                }
                _ => break,
            }
        }

        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenList;

    fn nth(list: &TokenList, n: i32) -> TokenId {
        list.tok_at(list.front().unwrap(), n).unwrap()
    }

    #[test]
    fn test_find_closing_bracket_simple() {
        let list = TokenList::from_text("A < B > C").unwrap();
        let lt = nth(&list, 1);
        let close = list.find_closing_bracket(lt).unwrap();
        assert_eq!(list.tok(close).str(), ">");

        // only "<" tokens start a scan
        assert_eq!(list.find_closing_bracket(nth(&list, 0)), None);
    }

    #[test]
    fn test_find_closing_bracket_collapses_shift() {
        let list = TokenList::from_text("A < B < C >> D").unwrap();
        let lt = nth(&list, 1);
        let close = list.find_closing_bracket(lt).unwrap();
        assert_eq!(list.tok(close).str(), ">>");
    }

    #[test]
    fn test_find_closing_bracket_skips_linked_brackets() {
        let list = TokenList::from_text("A < ( B > C ) >").unwrap();
        let lt = nth(&list, 1);
        let close = list.find_closing_bracket(lt).unwrap();
        assert_eq!(close, list.back().unwrap());
    }

    #[test]
    fn test_find_closing_bracket_stops_at_statement_end() {
        let list = TokenList::from_text("A < B ; C >").unwrap();
        let lt = nth(&list, 1);
        assert_eq!(list.find_closing_bracket(lt), None);
    }

    #[test]
    fn test_find_opening_bracket() {
        let list = TokenList::from_text("A < B < C > >").unwrap();
        let outer_gt = list.back().unwrap();
        let open = list.find_opening_bracket(outer_gt).unwrap();
        assert_eq!(open, nth(&list, 1));
    }

    #[test]
    fn test_next_argument() {
        let list = TokenList::from_text("f ( a , g ( b , c ) , d ) ;").unwrap();
        let a = nth(&list, 2);

        let second = list.next_argument(a).unwrap();
        assert_eq!(list.tok(second).str(), "g");

        // the nested call is skipped as one unit
        let third = list.next_argument(second).unwrap();
        assert_eq!(list.tok(third).str(), "d");

        assert_eq!(list.next_argument(third), None);
    }

    #[test]
    fn test_next_template_argument() {
        let mut list = TokenList::from_text("< A , B > ;").unwrap();
        let lt = nth(&list, 0);
        let gt = nth(&list, 4);
        list.create_mutual_links(lt, gt);

        let first = nth(&list, 1);
        let second = list.next_template_argument(first).unwrap();
        assert_eq!(list.tok(second).str(), "B");
        assert_eq!(list.next_template_argument(second), None);
    }

    #[test]
    fn test_next_argument_before_create_links2() {
        let list = TokenList::from_text("a < b > :: c , d )").unwrap();
        let a = nth(&list, 0);
        let next = list.next_argument_before_create_links2(a).unwrap();
        assert_eq!(list.tok(next).str(), "d");
    }

    #[test]
    fn test_is_unary_pre_op() {
        let mut list = TokenList::from_text("; ++ x ; y -- ;").unwrap();
        let pre = nth(&list, 1);
        let x = nth(&list, 2);
        let y = nth(&list, 4);
        let post = nth(&list, 5);

        list.set_ast_operand1(pre, Some(x)).unwrap();
        list.set_ast_operand1(post, Some(y)).unwrap();

        assert!(list.is_unary_pre_op(pre));
        assert!(!list.is_unary_pre_op(post));

        // a unary operator that is not ++/-- counts as prefix
        let mut neg = TokenList::from_text("; ! a ;").unwrap();
        let bang = neg.tok_at(neg.front().unwrap(), 1).unwrap();
        let a = neg.tok_at(neg.front().unwrap(), 2).unwrap();
        neg.set_ast_operand1(bang, Some(a)).unwrap();
        assert!(neg.is_unary_pre_op(bang));
    }

    #[test]
    fn test_is_calculation() {
        // binary multiplication of a variable is a calculation
        let mut list = TokenList::from_text("a * 2").unwrap();
        let a = nth(&list, 0);
        let star = nth(&list, 1);
        let two = nth(&list, 2);
        list.tok_mut(a).set_var_id(1);
        list.set_ast_operand1(star, Some(a)).unwrap();
        list.set_ast_operand2(star, Some(two)).unwrap();
        assert!(list.is_calculation(star));

        // dereference has one operand only
        let mut deref = TokenList::from_text("* p").unwrap();
        let star = deref.front().unwrap();
        let p = deref.next(star).unwrap();
        deref.tok_mut(p).set_var_id(2);
        deref.set_ast_operand1(star, Some(p)).unwrap();
        assert!(!deref.is_calculation(star));

        // a comparison is always a calculation
        let mut cmp = TokenList::from_text("a < b").unwrap();
        let lt = cmp.tok_at(cmp.front().unwrap(), 1).unwrap();
        assert!(cmp.is_calculation(lt));
        let a = cmp.front().unwrap();
        cmp.tok_mut(a).set_var_id(1);
        assert!(cmp.is_calculation(lt));

        // a name is not
        assert!(!cmp.is_calculation(a));
    }

    #[test]
    fn test_is_calculation_type_specification() {
        // "char * *" style type tokens have no number or variable operand
        let mut list = TokenList::from_text("char * p2").unwrap();
        let star = nth(&list, 1);
        let c = nth(&list, 0);
        let p2 = nth(&list, 2);
        list.set_ast_operand1(star, Some(c)).unwrap();
        list.set_ast_operand2(star, Some(p2)).unwrap();
        assert!(!list.is_calculation(star));
    }

    #[test]
    fn test_expression_range_takes_wrapping_parens() {
        let mut list = TokenList::from_text("( a + b )").unwrap();
        let open = nth(&list, 0);
        let a = nth(&list, 1);
        let plus = nth(&list, 2);
        let b = nth(&list, 3);
        let close = nth(&list, 4);

        list.set_ast_operand1(plus, Some(a)).unwrap();
        list.set_ast_operand2(plus, Some(b)).unwrap();

        let (start, end) = list.find_expression_start_end(plus);
        assert_eq!(start, open);
        assert_eq!(end, close);
    }

    #[test]
    fn test_expression_range_of_call() {
        let mut list = TokenList::from_text("f ( x ) ;").unwrap();
        let f = nth(&list, 0);
        let open = nth(&list, 1);
        let x = nth(&list, 2);
        let close = nth(&list, 3);

        list.set_ast_operand1(open, Some(f)).unwrap();
        list.set_ast_operand2(open, Some(x)).unwrap();

        let (start, end) = list.find_expression_start_end(open);
        assert_eq!(start, f);
        assert_eq!(end, close);
    }

    #[test]
    fn test_find_lambda_end_token() {
        let mut list = TokenList::from_text("[ x ] ( y ) { return ; } ;").unwrap();
        let capture = nth(&list, 0);
        let paren = nth(&list, 3);
        let body = nth(&list, 6);

        list.set_ast_operand1(paren, Some(body)).unwrap();
        list.set_ast_operand1(capture, Some(paren)).unwrap();

        let end = list.find_lambda_end_token(capture).unwrap();
        assert_eq!(list.tok(end).str(), "}");
        assert_eq!(end, nth(&list, 9));

        // a plain array subscript is not a lambda
        let plain = TokenList::from_text("a [ 0 ]").unwrap();
        let bracket = plain.tok_at(plain.front().unwrap(), 1).unwrap();
        assert_eq!(plain.find_lambda_end_token(bracket), None);
    }
}
