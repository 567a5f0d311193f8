//! Deterministic textual renderings of expression trees and value flow
//!
//! The XML dump shapes are part of the interface contract; the test suites
//! of the surrounding product diff them byte for byte.

use crate::symbols::TypeSign;
use crate::tokens::{TokenId, TokenList};
use crate::values::ValueType;
use std::collections::HashSet;
use std::fmt::Write;

impl TokenList {
    /// In-order rendering of a tree: operands first, then the operator,
    /// `sep` between every element
    pub fn ast_string(&self, id: TokenId, sep: &str) -> String {
        let mut ret = String::new();
        let tok = self.tok(id);
        if let Some(op1) = tok.ast_operand1() {
            ret += &self.ast_string(op1, sep);
        }
        if let Some(op2) = tok.ast_operand2() {
            ret += &self.ast_string(op2, sep);
        }
        ret + sep + tok.str()
    }

    fn string_from_token_range(&self, start: TokenId, end: TokenId) -> String {
        let stop = self.tok(end).next;
        let mut ret = String::new();
        let mut cur = Some(start);
        while cur != stop {
            let Some(c) = cur else { break };
            let tok = self.tok(c);
            if tok.is_unsigned() {
                ret.push_str("unsigned ");
            }
            if tok.is_long() {
                ret.push_str(if tok.is_literal() { "L" } else { "long " });
            }
            if tok.original_name().is_empty() || tok.is_unsigned() || tok.is_long() {
                ret.push_str(tok.str());
            } else {
                ret.push_str(tok.original_name());
            }
            let wordlike = tok.is_name() || tok.is_number();
            if wordlike {
                if let Some(n) = tok.next {
                    let next = self.tok(n);
                    if next.is_name() || next.is_number() {
                        ret.push(' ');
                    }
                }
            }
            cur = tok.next;
        }
        ret
    }

    /// Source-shaped rendering of the expression `id` heads
    pub fn expression_string(&self, id: TokenId) -> String {
        let (start, end) = self.find_expression_start_end(id);
        self.string_from_token_range(start, end)
    }

    fn indent_rails(out: &mut String, indent1: usize, indent2: usize) {
        for _ in 0..indent1 {
            out.push(' ');
        }
        let mut i = indent1;
        while i < indent2 {
            out.push_str("| ");
            i += 2;
        }
    }

    fn ast_string_verbose_recursive(
        &self,
        id: TokenId,
        ret: &mut String,
        indent1: usize,
        indent2: usize,
    ) {
        let tok = self.tok(id);
        if tok.is_expanded_macro() {
            ret.push('$');
        }
        ret.push_str(tok.str());
        if let Some(vt) = tok.value_type() {
            let _ = write!(ret, " '{}'", vt.type_str());
        }
        ret.push('\n');

        if let Some(op1) = tok.ast_operand1() {
            let mut i1 = indent1;
            let i2 = indent2 + 2;
            if indent1 == indent2 && tok.ast_operand2().is_none() {
                i1 += 2;
            }
            Self::indent_rails(ret, indent1, indent2);
            ret.push_str(if tok.ast_operand2().is_some() {
                "|-"
            } else {
                "`-"
            });
            self.ast_string_verbose_recursive(op1, ret, i1, i2);
        }
        if let Some(op2) = tok.ast_operand2() {
            let mut i1 = indent1;
            let i2 = indent2 + 2;
            if indent1 == indent2 {
                i1 += 2;
            }
            Self::indent_rails(ret, indent1, indent2);
            ret.push_str("`-");
            self.ast_string_verbose_recursive(op2, ret, i1, i2);
        }
    }

    /// Tree drawing with `|-` and `` `- `` rails, one node per line
    pub fn ast_string_verbose(&self, id: TokenId) -> String {
        let mut ret = String::new();
        self.ast_string_verbose_recursive(id, &mut ret, 0, 0);
        ret
    }

    fn ast_string_xml(&self, id: TokenId, indent: usize, out: &mut String) {
        let strindent = " ".repeat(indent);
        let tok = self.tok(id);
        let _ = write!(out, "{}<token str=\"{}\"", strindent, tok.str());
        if tok.var_id() > 0 {
            let _ = write!(out, " varId=\"{}\"", tok.var_id());
        }
        if let Some(variable) = tok.variable() {
            let _ = write!(out, " variable=\"{}\"", variable);
        }
        if let Some(function) = tok.function_ref() {
            let _ = write!(out, " function=\"{}\"", function);
        }
        if !tok.values().is_empty() {
            let _ = write!(out, " values=\"{}\"", id.index());
        }

        if tok.ast_operand1().is_none() && tok.ast_operand2().is_none() {
            out.push_str("/>\n");
        } else {
            out.push_str(">\n");
            if let Some(op1) = tok.ast_operand1() {
                self.ast_string_xml(op1, indent + 2, out);
            }
            if let Some(op2) = tok.ast_operand2() {
                self.ast_string_xml(op2, indent + 2, out);
            }
            let _ = writeln!(out, "{}</token>", strindent);
        }
    }

    /// Render every expression tree rooted in the stream from `start`
    pub fn print_ast(&self, start: TokenId, verbose: bool, xml: bool) -> String {
        let mut out = String::new();
        let mut printed: HashSet<TokenId> = HashSet::new();
        let mut cur = Some(start);
        while let Some(id) = cur {
            let tok = self.tok(id);
            let mut next = tok.next;
            if tok.ast_parent().is_none() && tok.ast_operand1().is_some() {
                if printed.is_empty() && !xml {
                    out.push_str("\n\n##AST\n");
                } else if printed.contains(&id) {
                    cur = next;
                    continue;
                }
                printed.insert(id);

                if xml {
                    let _ = writeln!(
                        out,
                        "<ast scope=\"{}\" fileIndex=\"{}\" linenr=\"{}\" col=\"{}\">",
                        tok.scope().map(|s| s.to_string()).unwrap_or_default(),
                        tok.file_index(),
                        tok.line(),
                        tok.column()
                    );
                    self.ast_string_xml(id, 2, &mut out);
                    out.push_str("</ast>\n");
                } else if verbose {
                    out += &self.ast_string_verbose(id);
                } else {
                    out += &self.ast_string(id, " ");
                    out.push('\n');
                }
                if tok.str() == "(" {
                    if let Some(link) = tok.link() {
                        next = self.tok(link).next;
                    }
                }
            }
            cur = next;
        }
        out
    }

    fn is_unsigned_expr(&self, id: TokenId) -> bool {
        self.tok(id)
            .value_type()
            .map_or(false, |vt| vt.sign == TypeSign::Unsigned)
    }

    /// Render the value lists of the stream from `start`, as XML or as the
    /// line-oriented text report
    pub fn print_value_flow(&self, start: TokenId, xml: bool) -> String {
        let mut out = String::new();
        let mut line = 0u32;
        if xml {
            out.push_str("  <valueflow>\n");
        } else {
            out.push_str("\n\n##Value flow\n");
        }
        let mut cur = Some(start);
        while let Some(id) = cur {
            let tok = self.tok(id);
            cur = tok.next;
            let values = tok.values();
            if values.is_empty() {
                continue;
            }
            if xml {
                let _ = writeln!(out, "    <values id=\"{}\">", id.index());
            } else if line != tok.line() {
                let _ = writeln!(out, "Line {}", tok.line());
            }
            line = tok.line();
            if !xml {
                let _ = write!(
                    out,
                    "  {}{}",
                    tok.str(),
                    if values[0].is_known() {
                        " always "
                    } else {
                        " possible "
                    }
                );
                if values.len() > 1 {
                    out.push('{');
                }
            }
            for (i, value) in values.iter().enumerate() {
                if xml {
                    out.push_str("      <value ");
                    match value.value_type {
                        ValueType::Int => {
                            if self.is_unsigned_expr(id) {
                                let _ = write!(out, "intvalue=\"{}\"", value.int_value as u64);
                            } else {
                                let _ = write!(out, "intvalue=\"{}\"", value.int_value);
                            }
                        }
                        ValueType::Tok => {
                            let _ = write!(
                                out,
                                "tokvalue=\"{}\"",
                                value.tok_value.map(|t| t.index()).unwrap_or(0)
                            );
                        }
                        ValueType::Float => {
                            let _ = write!(out, "floatvalue=\"{}\"", value.float_value);
                        }
                        ValueType::Moved => {
                            let _ = write!(out, "movedvalue=\"{}\"", value.move_kind.as_str());
                        }
                        ValueType::Uninit => out.push_str("uninit=\"1\""),
                        ValueType::BufferSize => {
                            let _ = write!(out, "buffer-size=\"{}\"", value.int_value);
                        }
                        ValueType::ContainerSize => {
                            let _ = write!(out, "container-size=\"{}\"", value.int_value);
                        }
                        ValueType::Lifetime => {
                            let _ = write!(
                                out,
                                "lifetime=\"{}\"",
                                value.tok_value.map(|t| t.index()).unwrap_or(0)
                            );
                        }
                    }
                    if let Some(condition) = value.condition {
                        let _ = write!(out, " condition-line=\"{}\"", self.tok(condition).line());
                    }
                    if value.is_known() {
                        out.push_str(" known=\"true\"");
                    } else if value.is_possible() {
                        out.push_str(" possible=\"true\"");
                    } else if value.is_inconclusive() {
                        out.push_str(" inconclusive=\"true\"");
                    }
                    out.push_str("/>\n");
                } else {
                    if i > 0 {
                        out.push(',');
                    }
                    match value.value_type {
                        ValueType::Int => {
                            if self.is_unsigned_expr(id) {
                                let _ = write!(out, "{}", value.int_value as u64);
                            } else {
                                let _ = write!(out, "{}", value.int_value);
                            }
                        }
                        ValueType::Tok => {
                            let text = value
                                .tok_value
                                .and_then(|t| self.get(t))
                                .map(|t| t.str())
                                .unwrap_or("");
                            out.push_str(text);
                        }
                        ValueType::Float => {
                            let _ = write!(out, "{}", value.float_value);
                        }
                        ValueType::Moved => out.push_str(value.move_kind.as_str()),
                        ValueType::Uninit => out.push_str("Uninit"),
                        ValueType::BufferSize | ValueType::ContainerSize => {
                            let _ = write!(out, "size={}", value.int_value);
                        }
                        ValueType::Lifetime => {
                            let text = value
                                .tok_value
                                .and_then(|t| self.get(t))
                                .map(|t| t.str())
                                .unwrap_or("");
                            let _ = write!(out, "lifetime={}", text);
                        }
                    }
                }
            }
            if xml {
                out.push_str("    </values>\n");
            } else if values.len() > 1 {
                out.push_str("}\n");
            } else {
                out.push('\n');
            }
        }
        if xml {
            out.push_str("  </valueflow>\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Value;

    fn nth(list: &TokenList, n: i32) -> TokenId {
        list.tok_at(list.front().unwrap(), n).unwrap()
    }

    fn plus_tree() -> (TokenList, TokenId) {
        let mut list = TokenList::from_text("( a + b )").unwrap();
        let a = nth(&list, 1);
        let plus = nth(&list, 2);
        let b = nth(&list, 3);
        list.set_ast_operand1(plus, Some(a)).unwrap();
        list.set_ast_operand2(plus, Some(b)).unwrap();
        (list, plus)
    }

    #[test]
    fn test_ast_string() {
        let (list, plus) = plus_tree();
        assert_eq!(list.ast_string(plus, " "), " a b +");
    }

    #[test]
    fn test_expression_string() {
        let (list, plus) = plus_tree();
        assert_eq!(list.expression_string(plus), "(a+b)");
    }

    #[test]
    fn test_expression_string_uses_original_names() {
        let mut list = TokenList::from_text("x + 4").unwrap();
        let x = nth(&list, 0);
        let plus = nth(&list, 1);
        let four = nth(&list, 2);
        list.set_ast_operand1(plus, Some(x)).unwrap();
        list.set_ast_operand2(plus, Some(four)).unwrap();
        list.tok_mut(four).set_original_name("FOUR");

        assert_eq!(list.expression_string(plus), "x+FOUR");
    }

    #[test]
    fn test_expression_string_separates_words() {
        let mut list = TokenList::from_text("; a b ;").unwrap();
        let a = nth(&list, 1);
        let b = nth(&list, 2);
        let semi = nth(&list, 3);
        list.set_ast_operand1(semi, Some(a)).unwrap();
        list.set_ast_operand2(semi, Some(b)).unwrap();
        let rendered = list.string_from_token_range(a, b);
        assert_eq!(rendered, "a b");
    }

    #[test]
    fn test_ast_string_verbose() {
        let (list, plus) = plus_tree();
        assert_eq!(list.ast_string_verbose(plus), "+\n|-a\n`-b\n");
    }

    #[test]
    fn test_ast_string_verbose_nested() {
        let mut list = TokenList::from_text("a + b * c").unwrap();
        let a = nth(&list, 0);
        let plus = nth(&list, 1);
        let b = nth(&list, 2);
        let star = nth(&list, 3);
        let c = nth(&list, 4);
        list.set_ast_operand1(star, Some(b)).unwrap();
        list.set_ast_operand2(star, Some(c)).unwrap();
        list.set_ast_operand1(plus, Some(a)).unwrap();
        list.set_ast_operand2(plus, Some(star)).unwrap();

        assert_eq!(
            list.ast_string_verbose(plus),
            "+\n|-a\n`-*\n  |-b\n  `-c\n"
        );
    }

    #[test]
    fn test_print_ast_xml() {
        let (mut list, plus) = plus_tree();
        let a = nth(&list, 1);
        list.tok_mut(a).set_var_id(3);

        let xml = list.print_ast(list.front().unwrap(), false, true);
        assert!(xml.starts_with("<ast scope=\"\" fileIndex=\"0\" linenr=\"1\""));
        assert!(xml.contains("  <token str=\"+\">\n"));
        assert!(xml.contains("    <token str=\"a\" varId=\"3\"/>\n"));
        assert!(xml.contains("    <token str=\"b\"/>\n"));
        assert!(xml.contains("  </token>\n"));
        assert!(xml.ends_with("</ast>\n"));
        let _ = plus;
    }

    #[test]
    fn test_print_ast_text() {
        let (list, _plus) = plus_tree();
        let text = list.print_ast(list.front().unwrap(), false, false);
        assert!(text.starts_with("\n\n##AST\n"));
        assert!(text.contains(" a b +"));
    }

    #[test]
    fn test_print_value_flow_xml() {
        let mut list = TokenList::from_text("x < 3").unwrap();
        let x = nth(&list, 0);
        let lt = nth(&list, 1);

        let known = Value::int(7).known();
        assert!(list.add_value(x, known));
        let conditional = Value::conditional_int(lt, 2);
        assert!(list.add_value(x, conditional));

        let xml = list.print_value_flow(list.front().unwrap(), true);
        assert!(xml.starts_with("  <valueflow>\n"));
        assert!(xml.contains(&format!("    <values id=\"{}\">\n", x.index())));
        assert!(xml.contains("      <value intvalue=\"7\" known=\"true\"/>\n"));
        assert!(xml.contains("      <value intvalue=\"2\" condition-line=\"1\" possible=\"true\"/>\n"));
        assert!(xml.ends_with("  </valueflow>\n"));
    }

    #[test]
    fn test_print_value_flow_xml_unsigned_formatting() {
        use crate::symbols::{TypeInfo, TypeSign};

        let mut list = TokenList::from_text("x").unwrap();
        let x = list.front().unwrap();
        list.tok_mut(x)
            .set_value_type(Some(TypeInfo::new(TypeSign::Unsigned, "int", 0)));
        assert!(list.add_value(x, Value::int(-1)));

        let xml = list.print_value_flow(x, true);
        assert!(xml.contains("intvalue=\"18446744073709551615\""));
    }

    #[test]
    fn test_print_value_flow_text() {
        let mut list = TokenList::from_text("x + y").unwrap();
        let x = nth(&list, 0);
        assert!(list.add_value(x, Value::int(1)));
        assert!(list.add_value(x, Value::int(2)));

        let text = list.print_value_flow(list.front().unwrap(), false);
        assert!(text.starts_with("\n\n##Value flow\n"));
        assert!(text.contains("Line 1"));
        assert!(text.contains("  x possible {1,2}"));
    }

    #[test]
    fn test_print_value_flow_uninit_and_moved() {
        use crate::values::MoveKind;

        let mut list = TokenList::from_text("a b").unwrap();
        let a = nth(&list, 0);
        let b = nth(&list, 1);
        assert!(list.add_value(a, Value::uninit()));
        assert!(list.add_value(b, Value::moved(MoveKind::MovedVariable)));

        let xml = list.print_value_flow(list.front().unwrap(), true);
        assert!(xml.contains("uninit=\"1\""));
        assert!(xml.contains("movedvalue=\"MovedVariable\""));
    }
}
