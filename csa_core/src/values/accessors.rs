//! Attaching values to tokens and querying them
//!
//! The value list of a token is created lazily, deduplicated on insertion,
//! and capped: a token carrying ten values tells the analysis nothing a
//! token with ten values and one more would.

use crate::config::constants::compile_time::values::MAX_VALUES_PER_TOKEN;
use crate::config::{EnabledGroup, Settings};
use crate::log_debug;
use crate::symbols::{ScopeKind, SymbolDatabase};
use crate::tokens::{TokenId, TokenKind, TokenList};
use crate::values::Value;

enum AddDecision {
    Append,
    Replace(usize),
    Duplicate,
}

impl TokenList {
    /// Attach `value` to the token's value list.
    ///
    /// A Known value first purges every recorded value of the same aspect.
    /// A value equal to a recorded one is dropped, unless the recorded one
    /// is inconclusive and the new one is not, in which case it is replaced
    /// in place. Known int values go to the front of the list, everything
    /// else to the back. Returns false when the value was not recorded.
    pub fn add_value(&mut self, id: TokenId, value: Value) -> bool {
        if value.is_known() && self.tok(id).data.values.is_some() {
            let aspect = value.value_type;
            self.tok_mut(id)
                .data
                .values
                .as_mut()
                .expect("checked above")
                .retain(|x| x.value_type != aspect);
        }

        let token_var_id = self.tok(id).var_id();

        if self.tok(id).data.values.is_some() {
            if self.tok(id).values().len() >= MAX_VALUES_PER_TOKEN {
                log_debug!("value list is full, value dropped",
                    "token" => self.tok(id).str(),
                    "capacity" => MAX_VALUES_PER_TOKEN
                );
                return false;
            }

            let mut decision = AddDecision::Append;
            for (i, existing) in self.tok(id).values().iter().enumerate() {
                if existing.int_value != value.int_value {
                    continue;
                }
                if existing.value_type != value.value_type {
                    continue;
                }
                if (value.is_tok_value() || value.is_lifetime_value())
                    && existing.tok_value != value.tok_value
                {
                    let same_text = match (existing.tok_value, value.tok_value) {
                        (Some(a), Some(b)) => match (self.get(a), self.get(b)) {
                            (Some(ta), Some(tb)) => ta.str() == tb.str(),
                            _ => false,
                        },
                        _ => false,
                    };
                    if !same_text {
                        continue;
                    }
                }
                decision = if existing.is_inconclusive() && !value.is_inconclusive() {
                    AddDecision::Replace(i)
                } else {
                    AddDecision::Duplicate
                };
                break;
            }

            let mut v = value;
            if v.var_id == 0 {
                v.var_id = token_var_id;
            }
            match decision {
                AddDecision::Duplicate => return false,
                AddDecision::Replace(i) => {
                    self.tok_mut(id).data.values.as_mut().expect("checked above")[i] = v;
                }
                AddDecision::Append => {
                    let to_front = v.is_known() && v.is_int_value();
                    let values = self.tok_mut(id).data.values.as_mut().expect("checked above");
                    if to_front {
                        values.insert(0, v);
                    } else {
                        values.push(v);
                    }
                }
            }
        } else {
            let mut v = value;
            if v.var_id == 0 {
                v.var_id = token_var_id;
            }
            self.tok_mut(id).data.values = Some(vec![v]);
        }

        true
    }

    /// The token's value list; empty when no pass recorded anything
    pub fn values(&self, id: TokenId) -> &[Value] {
        self.tok(id).values()
    }

    fn get_int_value_where(
        &self,
        id: TokenId,
        predicate: impl Fn(i64) -> bool,
        settings: Option<&Settings>,
    ) -> Option<&Value> {
        let mut ret: Option<&Value> = None;
        for value in self.tok(id).values() {
            if value.is_int_value() && predicate(value.int_value) {
                let replace = match ret {
                    None => true,
                    Some(r) => {
                        r.is_inconclusive() || (r.condition.is_some() && !value.is_inconclusive())
                    }
                };
                if replace {
                    ret = Some(value);
                }
                if let Some(r) = ret {
                    if !r.is_inconclusive() && r.condition.is_none() {
                        break;
                    }
                }
            }
        }
        if let (Some(settings), Some(r)) = (settings, ret) {
            if r.is_inconclusive() && !settings.inconclusive {
                return None;
            }
            if r.condition.is_some() && !settings.is_enabled(EnabledGroup::Warning) {
                return None;
            }
        }
        ret
    }

    /// First int value at most `val`, preferring values that are neither
    /// inconclusive nor conditional; settings gate what may be reported
    pub fn get_value_le(
        &self,
        id: TokenId,
        val: i64,
        settings: Option<&Settings>,
    ) -> Option<&Value> {
        self.get_int_value_where(id, |x| x <= val, settings)
    }

    /// First int value at least `val`, under the same preference and gating
    /// as [`get_value_le`]
    pub fn get_value_ge(
        &self,
        id: TokenId,
        val: i64,
        settings: Option<&Settings>,
    ) -> Option<&Value> {
        self.get_int_value_where(id, |x| x >= val, settings)
    }

    /// First value that is invalid at argument slot `argnr` of the function
    /// called through `call_tok`, per the settings' library oracle
    pub fn get_invalid_value(
        &self,
        id: TokenId,
        call_tok: TokenId,
        argnr: u32,
        settings: &Settings,
    ) -> Option<&Value> {
        let function = self.tok(call_tok).str();
        let mut ret: Option<&Value> = None;
        for value in self.tok(id).values() {
            let invalid = (value.is_int_value()
                && !settings
                    .library
                    .is_int_arg_valid(function, argnr, value.int_value))
                || (value.is_float_value()
                    && !settings
                        .library
                        .is_float_arg_valid(function, argnr, value.float_value));
            if invalid {
                let replace = match ret {
                    None => true,
                    Some(r) => {
                        r.is_inconclusive() || (r.condition.is_some() && !value.is_inconclusive())
                    }
                };
                if replace {
                    ret = Some(value);
                }
                if let Some(r) = ret {
                    if !r.is_inconclusive() && r.condition.is_none() {
                        break;
                    }
                }
            }
        }
        if let Some(r) = ret {
            if r.is_inconclusive() && !settings.inconclusive {
                return None;
            }
            if r.condition.is_some() && !settings.is_enabled(EnabledGroup::Warning) {
                return None;
            }
        }
        ret
    }

    /// Among the token's string-token values, the one with the smallest
    /// object size
    pub fn get_value_token_min_str_size(&self, id: TokenId) -> Option<TokenId> {
        let mut ret: Option<TokenId> = None;
        let mut min_size = usize::MAX;
        for value in self.tok(id).values() {
            if !value.is_tok_value() {
                continue;
            }
            let Some(tv) = value.tok_value else { continue };
            let Some(tok) = self.get(tv) else { continue };
            if tok.kind() != TokenKind::String {
                continue;
            }
            let size = tok.str_size();
            if ret.is_none() || size < min_size {
                min_size = size;
                ret = Some(tv);
            }
        }
        ret
    }

    /// Among the token's string-token values, the one with the longest
    /// rendered length
    pub fn get_value_token_max_str_length(&self, id: TokenId) -> Option<TokenId> {
        let mut ret: Option<TokenId> = None;
        let mut max_length = 0usize;
        for value in self.tok(id).values() {
            if !value.is_tok_value() {
                continue;
            }
            let Some(tv) = value.tok_value else { continue };
            let Some(tok) = self.get(tv) else { continue };
            if tok.kind() != TokenKind::String {
                continue;
            }
            let length = tok.str_length();
            if ret.is_none() || length > max_length {
                max_length = length;
                ret = Some(tv);
            }
        }
        ret
    }

    /// First token value that aliases the address of a local variable whose
    /// scope has already closed relative to this token's position
    pub fn get_value_token_dead_pointer(
        &self,
        id: TokenId,
        db: &SymbolDatabase,
    ) -> Option<TokenId> {
        let function_scope = db.function_scope(self.tok(id).scope());

        for value in self.tok(id).values() {
            // only pointer aliases are of interest
            if !value.is_tok_value() {
                continue;
            }
            let Some(tv) = value.tok_value else { continue };
            if self.tok(tv).str() != "&" {
                continue;
            }
            let Some(vartok) = self.tok(tv).ast_operand1() else {
                continue;
            };
            if !self.tok(vartok).is_name() {
                continue;
            }
            let Some(var_ref) = self.tok(vartok).variable() else {
                continue;
            };
            let var = db.variable(var_ref);
            if var.is_static || var.is_reference {
                continue;
            }
            let Some(var_scope) = var.scope else {
                return None;
            };
            if db.scope(var_scope).kind == ScopeKind::Union
                && db.scope(var_scope).nested_in == self.tok(id).scope()
            {
                continue;
            }
            // the variable must live in the same function, not a callee
            if function_scope != db.function_scope(Some(var_scope)) {
                continue;
            }
            // still in scope here?
            let mut s = self.tok(id).scope();
            while let Some(scope_id) = s {
                if scope_id == var_scope {
                    break;
                }
                s = db.scope(scope_id).nested_in;
            }
            if s.is_none() {
                return Some(tv);
            }
        }
        None
    }
}
