//! The textual pattern-match language
//!
//! Every checker in the engine tests token sequences with these functions.
//! A pattern is a space-separated list of words; each word matches one
//! token and the cursor advances. The vocabulary:
//!
//! | form | matches |
//! |---|---|
//! | `word` | a token whose lexeme equals the word |
//! | `a\|b\|c` | any of the alternatives; `%…%` meta-tokens allowed |
//! | `[abc]` | a one-character token out of the listed characters |
//! | `!!x` | any token except `x`; also matches past the end of the stream |
//! | `%var%` | a token with a nonzero varid |
//! | `%varid%` | a token with the varid passed to the call |
//! | `%type%` | a name that is neither a variable nor a keyword |
//! | `%any%` | any token |
//! | `%name%` | an identifier-class token |
//! | `%num%` | a number |
//! | `%char%` | a character literal |
//! | `%str%` | a string literal |
//! | `%bool%` | `true` or `false` |
//! | `%op%` | any operator |
//! | `%cop%` | a side-effect-free operator |
//! | `%comp%` | a comparison operator |
//! | `%assign%` | an assignment operator |
//! | `%or%` | the bit-or `\|` |
//! | `%oror%` | the logical-or `\|\|` |
//!
//! An empty alternative passes without consuming the token. Matching never
//! mutates the stream.

use crate::config::constants::compile_time::pattern::TERMINATE_POLL_INTERVAL;
use crate::config::Settings;
use crate::internal::InternalError;
use crate::tokens::{TokenId, TokenKind, TokenList};

/// Match a literal space-separated sequence starting at `tok`.
///
/// The literal subset has no failure mode, so unlike [`matches`] this never
/// errors; a `None` start never matches.
pub fn simple_match(list: &TokenList, tok: Option<TokenId>, pattern: &str) -> bool {
    if tok.is_none() {
        return false;
    }
    if pattern.is_empty() {
        return true;
    }
    let mut cur = tok;
    for word in pattern.split(' ') {
        let Some(id) = cur else { return false };
        if list.tok(id).str() != word {
            return false;
        }
        cur = list.tok(id).next;
    }
    true
}

/// Outcome of matching one multi-alternative pattern word
enum MultiMatch {
    Matched,
    NoMatch,
    /// An empty alternative matched; the cursor must not advance
    KeepPosition,
}

fn multi_compare(
    list: &TokenList,
    id: TokenId,
    word: &str,
    varid: u32,
) -> Result<MultiMatch, InternalError> {
    let tok = list.tok(id);
    for alt in word.split('|') {
        if alt.is_empty() {
            return Ok(MultiMatch::KeepPosition);
        }
        if alt.len() >= 2 && alt.starts_with('%') {
            if alt.len() < 3 || !alt.ends_with('%') {
                return Err(InternalError::at(
                    tok.location(),
                    format!("unknown pattern command {}", alt),
                ));
            }
            let matched = match &alt[1..alt.len() - 1] {
                "var" => tok.var_id() != 0,
                "varid" => {
                    if varid == 0 {
                        return Err(InternalError::at(
                            tok.location(),
                            "pattern with %varid% was matched with varid 0",
                        ));
                    }
                    tok.var_id() == varid
                }
                "type" => tok.is_name() && tok.var_id() == 0 && !tok.is_keyword(),
                "any" => true,
                "name" => tok.is_name(),
                "num" => tok.is_number(),
                "char" => tok.kind() == TokenKind::Char,
                "cop" => tok.is_const_op(),
                "comp" => tok.is_comparison_op(),
                "str" => tok.kind() == TokenKind::String,
                "bool" => tok.is_boolean(),
                "op" => tok.is_op(),
                "or" => tok.kind() == TokenKind::Bit && tok.str() == "|",
                "oror" => tok.kind() == TokenKind::Logical && tok.str() == "||",
                "assign" => tok.is_assignment_op(),
                command => {
                    return Err(InternalError::at(
                        tok.location(),
                        format!("unknown pattern command %{}%", command),
                    ))
                }
            };
            if matched {
                return Ok(MultiMatch::Matched);
            }
        } else if alt == tok.str() {
            return Ok(MultiMatch::Matched);
        }
    }
    Ok(MultiMatch::NoMatch)
}

/// Match the character-class word `[abc]` against one token
fn char_class_match(list: &TokenList, id: TokenId, word: &str) -> bool {
    let text = list.tok(id).str();
    if text.len() != 1 {
        return false;
    }
    let c = text.chars().next().expect("one-byte lexeme");
    let mut close_count = 0;
    let mut found = false;
    for pc in word[1..].chars() {
        if pc == ']' {
            close_count += 1;
        } else if pc == c {
            found = true;
            break;
        }
    }
    // "[]]" style classes list the close bracket itself
    if close_count > 1 && c == ']' {
        found = true;
    }
    found
}

/// Match the full pattern language starting at `tok`.
///
/// `varid` is substituted for `%varid%`; matching a `%varid%` pattern with
/// varid 0 is a recoverable internal error, as is an unknown `%cmd%`.
pub fn matches(
    list: &TokenList,
    tok: Option<TokenId>,
    pattern: &str,
    varid: u32,
) -> Result<bool, InternalError> {
    let mut cur = tok;
    for word in pattern.split_ascii_whitespace() {
        let Some(id) = cur else {
            // past the end only a negation can still hold
            if word.len() > 2 && word.starts_with("!!") {
                continue;
            }
            return Ok(false);
        };

        if word.starts_with('[') && word[1..].contains(']') {
            if !char_class_match(list, id, word) {
                return Ok(false);
            }
        } else if word.len() > 2 && word.starts_with("!!") {
            if word[2..] == *list.tok(id).str() {
                return Ok(false);
            }
        } else {
            match multi_compare(list, id, word, varid)? {
                MultiMatch::Matched => {}
                MultiMatch::NoMatch => return Ok(false),
                MultiMatch::KeepPosition => continue,
            }
        }

        cur = list.tok(id).next;
    }
    Ok(true)
}

/// Scan forward from `start` for the first literal-pattern match
pub fn find_simple_match(
    list: &TokenList,
    start: Option<TokenId>,
    pattern: &str,
) -> Option<TokenId> {
    find_simple_match_until(list, start, pattern, None)
}

/// Scan `[start, end)` for the first literal-pattern match
pub fn find_simple_match_until(
    list: &TokenList,
    start: Option<TokenId>,
    pattern: &str,
    end: Option<TokenId>,
) -> Option<TokenId> {
    let mut scanned = 0usize;
    let mut cur = start;
    while let Some(id) = cur {
        if Some(id) == end {
            return None;
        }
        if simple_match(list, Some(id), pattern) {
            return Some(id);
        }
        scanned += 1;
        if scanned % TERMINATE_POLL_INTERVAL == 0 && Settings::terminated() {
            return None;
        }
        cur = list.tok(id).next;
    }
    None
}

/// Scan forward from `start` for the first full-pattern match
pub fn find_match(
    list: &TokenList,
    start: Option<TokenId>,
    pattern: &str,
    varid: u32,
) -> Result<Option<TokenId>, InternalError> {
    find_match_until(list, start, pattern, None, varid)
}

/// Scan `[start, end)` for the first full-pattern match
pub fn find_match_until(
    list: &TokenList,
    start: Option<TokenId>,
    pattern: &str,
    end: Option<TokenId>,
    varid: u32,
) -> Result<Option<TokenId>, InternalError> {
    let mut scanned = 0usize;
    let mut cur = start;
    while let Some(id) = cur {
        if Some(id) == end {
            return Ok(None);
        }
        if matches(list, Some(id), pattern, varid)? {
            return Ok(Some(id));
        }
        scanned += 1;
        if scanned % TERMINATE_POLL_INTERVAL == 0 && Settings::terminated() {
            return Ok(None);
        }
        cur = list.tok(id).next;
    }
    Ok(None)
}
