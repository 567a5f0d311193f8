//! The token stream: a doubly-linked list over a generational arena
//!
//! The stream owns every token. All neighbour, bracket, AST and value
//! cross-references are `TokenId`s: an index plus a generation, so a
//! reference that survives the deletion of its target is detectably stale
//! instead of silently aliasing whatever reuses the slot.
//!
//! The tokenizer drives construction through `push_back`/`create_links`;
//! after hand-off the simplification passes mutate the stream in place and
//! checkers only read it.

use crate::internal::InternalError;
use crate::log_debug;
use crate::logging::codes;
use crate::symbols::{FunctionId, SymbolDatabase, TypeId};
use crate::tokens::kind::TokenKind;
use crate::tokens::token::Token;
use crate::tokens::{TemplateRefId, TokenId};
use crate::{log_error, log_success};
use std::collections::HashMap;

struct Slot {
    generation: u32,
    token: Option<Token>,
}

#[derive(Default)]
pub struct TokenList {
    slots: Vec<Slot>,
    free: Vec<u32>,
    front: Option<TokenId>,
    back: Option<TokenId>,
    /// Registry of template-simplifier back-references; entries go stale
    /// (None) when their token dies
    template_refs: Vec<Option<TokenId>>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stream from a whitespace-separated token text and pair the
    /// round/square/curly brackets. The test suites and the rule engine both
    /// construct streams this way.
    pub fn from_text(text: &str) -> Result<Self, InternalError> {
        let mut list = TokenList::new();
        for (line_index, line) in text.lines().enumerate() {
            let mut column = 1u32;
            for word in line.split_whitespace() {
                list.push_back(word, 0, line_index as u32 + 1, column);
                column += word.len() as u32 + 1;
            }
        }
        list.create_links()?;
        log_debug!("token stream constructed", "tokens" => list.len());
        Ok(list)
    }

    // ========================================================================
    // Arena plumbing
    // ========================================================================

    fn alloc(&mut self, token: Token) -> TokenId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.token = Some(token);
            TokenId::new(index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                token: Some(token),
            });
            TokenId::new(self.slots.len() as u32 - 1, 0)
        }
    }

    /// Checked lookup; `None` for stale or foreign ids
    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.token.as_ref())
    }

    /// Contract-checked lookup; a stale id here is a caller bug
    pub fn tok(&self, id: TokenId) -> &Token {
        self.get(id).expect("stale or invalid token id")
    }

    pub fn tok_mut(&mut self, id: TokenId) -> &mut Token {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.token.as_mut())
            .expect("stale or invalid token id")
    }

    fn two_muts(&mut self, a: TokenId, b: TokenId) -> (&mut Token, &mut Token) {
        let (ai, bi) = (a.index() as usize, b.index() as usize);
        assert_ne!(ai, bi, "two_muts needs two distinct tokens");
        debug_assert!(self.slots[ai].generation == a.generation());
        debug_assert!(self.slots[bi].generation == b.generation());
        if ai < bi {
            let (left, right) = self.slots.split_at_mut(bi);
            (
                left[ai].token.as_mut().expect("stale token id"),
                right[0].token.as_mut().expect("stale token id"),
            )
        } else {
            let (left, right) = self.slots.split_at_mut(ai);
            (
                right[0].token.as_mut().expect("stale token id"),
                left[bi].token.as_mut().expect("stale token id"),
            )
        }
    }

    /// Destroy one token. Its bracket peer is severed first and every
    /// template back-reference to it goes stale.
    fn destroy(&mut self, id: TokenId) {
        if let Some(peer) = self.tok(id).link() {
            if self.get(peer).map_or(false, |p| p.link() == Some(id)) {
                self.tok_mut(peer).set_link(None);
            }
        }
        let refs = std::mem::take(&mut self.tok_mut(id).data.template_refs);
        for r in refs {
            self.template_refs[r.index() as usize] = None;
        }
        let slot = &mut self.slots[id.index() as usize];
        debug_assert_eq!(slot.generation, id.generation());
        slot.token = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
    }

    /// Number of live tokens
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Builder interface (tokenizer-facing)
    // ========================================================================

    /// Append a token to the stream
    pub fn push_back(&mut self, text: &str, file_index: u32, line: u32, column: u32) -> TokenId {
        let mut token = Token::new();
        token.set_str(text);
        token.data.file_index = file_index;
        token.data.line_number = line;
        token.data.column = column;
        let id = self.alloc(token);
        match self.back {
            Some(back) => {
                self.tok_mut(back).next = Some(id);
                self.tok_mut(id).prev = Some(back);
            }
            None => self.front = Some(id),
        }
        self.back = Some(id);
        id
    }

    /// Pair `()`, `[]` and `{}` brackets over the whole stream
    pub fn create_links(&mut self) -> Result<(), InternalError> {
        let mut stack: Vec<TokenId> = Vec::new();
        let mut t = self.front;
        while let Some(id) = t {
            let c = {
                let s = self.tok(id).str();
                if s.len() == 1 {
                    s.chars().next()
                } else {
                    None
                }
            };
            match c {
                Some('(') | Some('[') | Some('{') => stack.push(id),
                Some(close @ (')' | ']' | '}')) => {
                    let location = self.tok(id).location();
                    let Some(open) = stack.pop() else {
                        log_error!(
                            codes::tokens::UNMATCHED_BRACKET,
                            "closing bracket without an open bracket",
                            location = location,
                            "bracket" => close
                        );
                        return Err(InternalError::at(
                            location,
                            format!("unmatched '{}'", close),
                        ));
                    };
                    let expected = match self.tok(open).str() {
                        "(" => ')',
                        "[" => ']',
                        _ => '}',
                    };
                    if close != expected {
                        log_error!(
                            codes::tokens::LINK_MISMATCH,
                            "mismatched bracket pair",
                            location = location,
                            "expected" => expected,
                            "found" => close
                        );
                        return Err(InternalError::at(
                            location,
                            format!("expected '{}' before '{}'", expected, close),
                        ));
                    }
                    self.create_mutual_links(open, id);
                }
                _ => {}
            }
            t = self.tok(id).next;
        }
        if let Some(open) = stack.pop() {
            let location = self.tok(open).location();
            let bracket = self.tok(open).str().to_string();
            log_error!(
                codes::tokens::UNMATCHED_BRACKET,
                "bracket left open at end of stream",
                location = location,
                "bracket" => bracket
            );
            return Err(InternalError::at(location, format!("unmatched '{}'", bracket)));
        }
        log_success!(codes::success::LINKS_CREATED, "bracket links created");
        Ok(())
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn front(&self) -> Option<TokenId> {
        self.front
    }

    pub fn back(&self) -> Option<TokenId> {
        self.back
    }

    pub fn next(&self, id: TokenId) -> Option<TokenId> {
        self.tok(id).next
    }

    pub fn prev(&self, id: TokenId) -> Option<TokenId> {
        self.tok(id).prev
    }

    /// Token `offset` positions away; negative offsets walk backwards
    pub fn tok_at(&self, id: TokenId, offset: i32) -> Option<TokenId> {
        let mut cur = Some(id);
        let mut remaining = offset;
        while remaining > 0 {
            cur = cur.and_then(|c| self.tok(c).next);
            remaining -= 1;
        }
        while remaining < 0 {
            cur = cur.and_then(|c| self.tok(c).prev);
            remaining += 1;
        }
        cur
    }

    /// Lexeme `offset` positions away, or `""` past either end
    pub fn str_at(&self, id: TokenId, offset: i32) -> &str {
        self.tok_at(id, offset)
            .map(|t| self.tok(t).str())
            .unwrap_or("")
    }

    /// Bracket link `offset` positions away; walking off the stream is a
    /// recoverable internal error
    pub fn link_at(&self, id: TokenId, offset: i32) -> Result<Option<TokenId>, InternalError> {
        match self.tok_at(id, offset) {
            Some(t) => Ok(self.tok(t).link()),
            None => Err(InternalError::at(
                self.tok(id).location(),
                "link_at called with an index outside the token range",
            )),
        }
    }

    /// Iterate token ids from `start` to the end of the stream
    pub fn iter_from(&self, start: Option<TokenId>) -> TokenIter<'_> {
        TokenIter {
            list: self,
            cur: start,
        }
    }

    /// Iterate the whole stream
    pub fn tokens(&self) -> TokenIter<'_> {
        self.iter_from(self.front)
    }

    // ========================================================================
    // Stream mutation
    // ========================================================================

    /// Insert a token next to `at` (after by default, before with
    /// `prepend`). The new token inherits file index, line and progress from
    /// `at`. A blank placeholder token is reused in place instead of
    /// allocating.
    pub fn insert_token(
        &mut self,
        at: TokenId,
        text: &str,
        original_name: Option<&str>,
        prepend: bool,
    ) -> TokenId {
        if self.tok(at).str().is_empty() {
            self.tok_mut(at).set_str(text);
            if let Some(name) = original_name {
                self.tok_mut(at).set_original_name(name);
            }
            return at;
        }

        let mut token = Token::new();
        token.set_str(text);
        if let Some(name) = original_name {
            token.set_original_name(name);
        }
        {
            let at_tok = self.tok(at);
            token.data.line_number = at_tok.line();
            token.data.file_index = at_tok.file_index();
            token.data.progress_value = at_tok.progress_value();
        }
        let id = self.alloc(token);

        if prepend {
            match self.tok(at).prev {
                Some(p) => {
                    self.tok_mut(id).prev = Some(p);
                    self.tok_mut(p).next = Some(id);
                }
                None => self.front = Some(id),
            }
            self.tok_mut(at).prev = Some(id);
            self.tok_mut(id).next = Some(at);
        } else {
            match self.tok(at).next {
                Some(n) => {
                    self.tok_mut(id).next = Some(n);
                    self.tok_mut(n).prev = Some(id);
                }
                None => self.back = Some(id),
            }
            self.tok_mut(at).next = Some(id);
            self.tok_mut(id).prev = Some(at);
        }
        id
    }

    /// Unlink and destroy up to `count` successors of `id`
    pub fn delete_next(&mut self, id: TokenId, mut count: usize) {
        while count > 0 {
            let Some(n) = self.tok(id).next else { break };
            let after = self.tok(n).next;
            self.destroy(n);
            self.tok_mut(id).next = after;
            count -= 1;
        }
        match self.tok(id).next {
            Some(n) => self.tok_mut(n).prev = Some(id),
            None => self.back = Some(id),
        }
    }

    /// Unlink and destroy up to `count` predecessors of `id`
    pub fn delete_previous(&mut self, id: TokenId, mut count: usize) {
        while count > 0 {
            let Some(p) = self.tok(id).prev else { break };
            let before = self.tok(p).prev;
            self.destroy(p);
            self.tok_mut(id).prev = before;
            count -= 1;
        }
        match self.tok(id).prev {
            Some(p) => self.tok_mut(p).next = Some(id),
            None => self.front = Some(id),
        }
    }

    /// Copy `from`'s lexeme, kind and flags into `to`, transfer the heavy
    /// state, and rewire the bracket peer and template back-references so
    /// they follow the content to its new holder.
    fn take_data(&mut self, to: TokenId, from: TokenId) {
        {
            let (to_tok, from_tok) = self.two_muts(to, from);
            let text = from_tok.str().to_string();
            to_tok.set_str_raw(text);
            to_tok.set_kind(from_tok.kind());
            to_tok.set_flags(from_tok.flags());
            let from_data = std::mem::take(&mut from_tok.data);
            let old_data = std::mem::replace(&mut to_tok.data, from_data);
            from_tok.data = old_data;
        }
        // the old heavy state of `to` is about to die with `from`; its
        // template back-references go stale now
        let dying_refs = std::mem::take(&mut self.tok_mut(from).data.template_refs);
        for r in dying_refs {
            self.template_refs[r.index() as usize] = None;
        }
        let moved_refs = self.tok(to).data.template_refs.clone();
        for r in moved_refs {
            self.template_refs[r.index() as usize] = Some(to);
        }
        let link = self.tok(from).link();
        self.tok_mut(to).set_link(link);
        if let Some(peer) = link {
            self.tok_mut(peer).set_link(Some(to));
        }
    }

    /// Remove `id` from the stream while keeping the stream consistent: a
    /// neighbour's content is pulled into `id` and the neighbour dies in its
    /// place. The last remaining token cannot be removed; it is blanked into
    /// a reusable placeholder instead.
    pub fn delete_this(&mut self, id: TokenId) {
        if let Some(next) = self.tok(id).next {
            self.take_data(id, next);
            self.tok_mut(next).set_link(None);
            self.delete_next(id, 1);
        } else if self
            .tok(id)
            .prev
            .map_or(false, |p| self.tok(p).prev.is_some())
        {
            let prev = self.tok(id).prev.expect("checked above");
            self.take_data(id, prev);

            let before = self.tok(prev).prev.expect("checked above");
            self.tok_mut(id).prev = Some(before);
            self.tok_mut(before).next = Some(id);
            if self.front == Some(prev) {
                self.front = Some(id);
            }
            self.destroy(prev);
        } else {
            self.tok_mut(id).set_str("");
        }
    }

    /// Exchange content (lexeme, kind, flags, heavy state) with the
    /// successor; bracket peers and template back-references keep pointing
    /// at the token that now holds their content.
    pub fn swap_with_next(&mut self, id: TokenId) {
        let Some(next) = self.tok(id).next else { return };
        {
            let (a, b) = self.two_muts(id, next);
            let a_text = a.str().to_string();
            let b_text = b.str().to_string();
            a.set_str_raw(b_text);
            b.set_str_raw(a_text);
            let a_kind = a.kind();
            a.set_kind(b.kind());
            b.set_kind(a_kind);
            let a_flags = a.flags();
            a.set_flags(b.flags());
            b.set_flags(a_flags);
            std::mem::swap(&mut a.data, &mut b.data);
        }
        let refs_here = self.tok(id).data.template_refs.clone();
        for r in refs_here {
            self.template_refs[r.index() as usize] = Some(id);
        }
        let refs_next = self.tok(next).data.template_refs.clone();
        for r in refs_next {
            self.template_refs[r.index() as usize] = Some(next);
        }
        if let Some(peer) = self.tok(next).link() {
            self.tok_mut(peer).set_link(Some(id));
        }
        if let Some(peer) = self.tok(id).link() {
            self.tok_mut(peer).set_link(Some(next));
        }
        let link_here = self.tok(id).link();
        let link_next = self.tok(next).link();
        self.tok_mut(id).set_link(link_next);
        self.tok_mut(next).set_link(link_here);
    }

    /// Excise the inclusive range `[src_start, src_end]` and reinsert it
    /// after `new_location`; every moved token takes over the destination's
    /// progress value.
    pub fn move_range(&mut self, src_start: TokenId, src_end: TokenId, new_location: TokenId) {
        // close the gap the range leaves behind
        let before = self.tok(src_start).prev;
        let after = self.tok(src_end).next;
        match before {
            Some(b) => self.tok_mut(b).next = after,
            None => self.front = after,
        }
        match after {
            Some(a) => self.tok_mut(a).prev = before,
            None => self.back = before,
        }

        // splice the range in after the destination
        let dest_next = self.tok(new_location).next;
        self.tok_mut(src_end).next = dest_next;
        self.tok_mut(src_start).prev = Some(new_location);
        match dest_next {
            Some(n) => self.tok_mut(n).prev = Some(src_end),
            None => self.back = Some(src_end),
        }
        self.tok_mut(new_location).next = Some(src_start);

        let progress = self.tok(new_location).progress_value();
        let stop = self.tok(src_end).next;
        let mut t = Some(src_start);
        while t != stop {
            let id = t.expect("range is linked");
            self.tok_mut(id).data.progress_value = progress;
            t = self.tok(id).next;
        }
    }

    /// Splice the range `[start, end]` into `old`'s position and destroy
    /// `old`. The anchor's back pointer follows the actual last token when
    /// `end` was the back of the stream.
    pub fn replace(&mut self, old: TokenId, start: TokenId, end: TokenId) {
        // close the hole at the old location of start and end
        let start_prev = self.tok(start).prev;
        let end_next = self.tok(end).next;
        if let Some(p) = start_prev {
            self.tok_mut(p).next = end_next;
        }
        if let Some(n) = end_next {
            self.tok_mut(n).prev = start_prev;
        }

        // move start and end to their new location
        let old_prev = self.tok(old).prev;
        let old_next = self.tok(old).next;
        if let Some(p) = old_prev {
            self.tok_mut(p).next = Some(start);
        }
        if let Some(n) = old_next {
            self.tok_mut(n).prev = Some(end);
        }
        self.tok_mut(start).prev = old_prev;
        self.tok_mut(end).next = old_next;

        if self.front == Some(old) {
            self.front = Some(start);
        }
        if self.back == Some(old) {
            self.back = Some(end);
        }
        if self.back == Some(end) {
            let mut last = end;
            while let Some(n) = self.tok(last).next {
                last = n;
            }
            self.back = Some(last);
        }

        let progress = self.tok(old).progress_value();
        let stop = self.tok(end).next;
        let mut t = Some(start);
        while t != stop {
            let id = t.expect("range is linked");
            self.tok_mut(id).data.progress_value = progress;
            t = self.tok(id).next;
        }

        self.destroy(old);
    }

    /// Delete every token strictly between `begin` and `end`
    pub fn erase_tokens(&mut self, begin: TokenId, end: Option<TokenId>) {
        if Some(begin) == end {
            return;
        }
        while let Some(n) = self.tok(begin).next {
            if Some(n) == end {
                break;
            }
            self.delete_next(begin, 1);
        }
    }

    /// Pair two distinct bracket tokens
    pub fn create_mutual_links(&mut self, begin: TokenId, end: TokenId) {
        assert_ne!(begin, end, "create_mutual_links needs two distinct tokens");
        self.tok_mut(begin).set_link(Some(end));
        self.tok_mut(end).set_link(Some(begin));
    }

    // ========================================================================
    // Stream-wide bookkeeping
    // ========================================================================

    /// Distribute progress values 0..=100 over the stream from `start`
    pub fn assign_progress_values(&mut self, start: TokenId) {
        let total = self.iter_from(Some(start)).count();
        if total == 0 {
            return;
        }
        let mut count = 0usize;
        let mut t = Some(start);
        while let Some(id) = t {
            self.tok_mut(id).data.progress_value =
                (count * crate::config::constants::compile_time::tokens::PROGRESS_MAX / total)
                    as u32;
            count += 1;
            t = self.tok(id).next;
        }
    }

    /// Assign sequential indexes from `start`, continuing the predecessor's
    /// numbering
    pub fn assign_indexes(&mut self, start: TokenId) {
        let mut index = self
            .tok(start)
            .prev
            .map(|p| self.tok(p).index())
            .unwrap_or(0)
            + 1;
        let mut t = Some(start);
        while let Some(id) = t {
            self.tok_mut(id).data.index = index;
            index += 1;
            t = self.tok(id).next;
        }
    }

    // ========================================================================
    // Template-simplifier back-references
    // ========================================================================

    /// Register a back-reference to `token`; the registry entry follows the
    /// token's content through swaps and data transfers and goes stale when
    /// the content dies
    pub fn create_template_ref(&mut self, token: TokenId) -> TemplateRefId {
        self.template_refs.push(Some(token));
        let id = TemplateRefId::new(self.template_refs.len() as u32 - 1);
        self.tok_mut(token).data.template_refs.push(id);
        id
    }

    pub fn template_ref_token(&self, r: TemplateRefId) -> Option<TokenId> {
        self.template_refs
            .get(r.index() as usize)
            .copied()
            .flatten()
    }

    // ========================================================================
    // Symbol-database coercions
    // ========================================================================

    /// Attach or clear a function back-reference; the kind follows:
    /// Function or Lambda while attached, back to Name when cleared
    pub fn set_function(
        &mut self,
        id: TokenId,
        function: Option<FunctionId>,
        db: &SymbolDatabase,
    ) {
        self.tok_mut(id).data.function = function;
        match function {
            Some(f) => {
                let kind = if db.function(f).is_lambda {
                    TokenKind::Lambda
                } else {
                    TokenKind::Function
                };
                self.tok_mut(id).set_kind(kind);
            }
            None => {
                if self.tok(id).kind() == TokenKind::Function {
                    self.tok_mut(id).set_kind(TokenKind::Name);
                }
            }
        }
    }

    /// Attach or clear a type back-reference; coerces kind Type and copies
    /// the enum-ness of the referenced type
    pub fn set_type_ref(&mut self, id: TokenId, type_ref: Option<TypeId>, db: &SymbolDatabase) {
        self.tok_mut(id).data.type_ref = type_ref;
        match type_ref {
            Some(t) => {
                let is_enum = db.type_rec(t).is_enum_type;
                self.tok_mut(id).set_kind(TokenKind::Type);
                self.tok_mut(id).set_enum_type(is_enum);
            }
            None => {
                if self.tok(id).kind() == TokenKind::Type {
                    self.tok_mut(id).set_kind(TokenKind::Name);
                }
            }
        }
    }

    /// Best-effort type rendering for a token: the resolved value type when
    /// present, otherwise the declared type of the referenced symbol
    pub fn type_str(&self, id: TokenId, db: &SymbolDatabase) -> String {
        let tok = self.tok(id);
        if let Some(vt) = tok.value_type() {
            let s = vt.type_str();
            if !s.is_empty() {
                return s;
            }
        }
        if let Some(v) = tok.variable() {
            if let Some(t) = db.variable(v).type_ref {
                return db.type_rec(t).name.clone();
            }
        }
        if let Some(f) = tok.function_ref() {
            if let Some(t) = db.function(f).ret_type {
                return db.type_rec(t).name.clone();
            }
        }
        String::new()
    }

    // ========================================================================
    // Stringification
    // ========================================================================

    /// Render the stream from `start` with full control over the output
    /// shape. `attributes` also turns on macro markers, matching the dump
    /// format.
    #[allow(clippy::too_many_arguments)]
    pub fn stringify_list_full(
        &self,
        start: TokenId,
        varid: bool,
        attributes: bool,
        linenumbers: bool,
        linebreaks: bool,
        files: bool,
        file_names: Option<&[String]>,
        end: Option<TokenId>,
    ) -> String {
        if Some(start) == end {
            return String::new();
        }

        let mut ret = String::new();
        let mut line_number = self
            .tok(start)
            .line()
            .saturating_sub(if linenumbers { 1 } else { 0 });
        let mut file_index = if files {
            u32::MAX
        } else {
            self.tok(start).file_index()
        };
        let mut line_numbers: HashMap<u32, u32> = HashMap::new();

        let mut t = Some(start);
        while let Some(id) = t {
            if Some(id) == end {
                break;
            }
            let tok = self.tok(id);
            let mut file_change = false;
            if tok.file_index() != file_index {
                if file_index != u32::MAX {
                    line_numbers.insert(file_index, tok.file_index());
                }
                file_index = tok.file_index();
                if files {
                    ret.push_str("\n\n##file ");
                    match file_names {
                        Some(names) if (file_index as usize) < names.len() => {
                            ret.push_str(&names[file_index as usize]);
                        }
                        _ => ret.push_str(&file_index.to_string()),
                    }
                    ret.push('\n');
                }
                line_number = line_numbers.get(&file_index).copied().unwrap_or(0);
                file_change = true;
            }

            if linebreaks && (line_number != tok.line() || file_change) {
                if line_number + 4 < tok.line() && file_index == tok.file_index() {
                    ret.push('\n');
                    ret.push_str(&(line_number + 1).to_string());
                    ret.push_str(":\n|\n");
                    ret.push_str(&(tok.line() - 1).to_string());
                    ret.push_str(":\n");
                    ret.push_str(&tok.line().to_string());
                    ret.push_str(": ");
                } else if id == start && linenumbers {
                    ret.push_str(&tok.line().to_string());
                    ret.push_str(": ");
                } else {
                    while line_number < tok.line() {
                        line_number += 1;
                        ret.push('\n');
                        if linenumbers {
                            ret.push_str(&line_number.to_string());
                            ret.push(':');
                            if line_number == tok.line() {
                                ret.push(' ');
                            }
                        }
                    }
                }
                line_number = tok.line();
            }

            tok.stringify(&mut ret, varid, attributes, attributes);
            let next = tok.next;
            if next != end {
                if let Some(n) = next {
                    let next_tok = self.tok(n);
                    if !linebreaks
                        || (next_tok.line() <= tok.line()
                            && next_tok.file_index() == tok.file_index())
                    {
                        ret.push(' ');
                    }
                }
            }
            t = next;
        }
        if linebreaks && (files || linenumbers) {
            ret.push('\n');
        }
        ret
    }

    /// Flat single-line rendering of `[start, end)`
    pub fn stringify_range(&self, start: TokenId, end: Option<TokenId>, attributes: bool) -> String {
        self.stringify_list_full(start, false, attributes, false, false, false, None, end)
    }

    /// Full dump rendering with line numbers, line breaks and file markers
    pub fn stringify_list(&self, start: TokenId, varid: bool) -> String {
        self.stringify_list_full(start, varid, false, true, true, true, None, None)
    }
}

pub struct TokenIter<'a> {
    list: &'a TokenList,
    cur: Option<TokenId>,
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = TokenId;

    fn next(&mut self) -> Option<TokenId> {
        let id = self.cur?;
        self.cur = self.list.tok(id).next;
        Some(id)
    }
}
