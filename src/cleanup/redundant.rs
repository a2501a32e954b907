//! Cleanup pass 4: redundant-tag removal. A run of immediately-adjacent
//! identical opening tags collapses to its first occurrence; a run of
//! immediately-adjacent identical closing tags collapses to its last.
//! Tags separated by text (e.g. two wrappings of the same pair produced by
//! the complete strategy around different target tokens) are untouched —
//! those are legitimate duplicates, not redundancy.

use crate::token::Token;

pub fn remove_redundant(tokens: &[Token]) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for tok in tokens {
        if let Token::Tag(t) = tok {
            if t.kind.is_opening() {
                if matches!(out.last(), Some(Token::Tag(prev)) if prev == t) {
                    continue;
                }
            } else if t.kind.is_closing() && matches!(out.last(), Some(Token::Tag(prev)) if prev == t)
            {
                out.pop();
            }
        }
        out.push(tok.clone());
    }
    out
}
