//! Cleanup pass 5: nesting balance. Walks the stream with a stack of
//! currently-open tag ids; a closing tag that doesn't match the stack top
//! but whose opener is still further down the stack triggers a
//! split-at-overlap rewrite — close everything above it, emit the real
//! closer, then reopen what was closed, turning `<A><B>…</A>…</B>` into
//! `<A><B>…</B></A><B>…</B>`. The leading/trailing extraneous-tag cases are
//! just this same rewrite applied at the sentence edges, not a separate
//! rule. A closing tag whose opener isn't on the stack at all is dropped —
//! by this pass, invert-repair (pass 3) has already removed globally
//! unmatched stragglers, so this only guards against pathological input.

use crate::tag::Tag;
use crate::token::Token;

pub fn balance_nesting(tokens: &[Token]) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Tag> = Vec::new();

    for tok in tokens {
        match tok {
            Token::Text(_) => out.push(tok.clone()),
            Token::Tag(t) if t.kind.is_isolated() => out.push(tok.clone()),
            Token::Tag(t) if t.kind.is_opening() => {
                stack.push(*t);
                out.push(tok.clone());
            }
            Token::Tag(t) => {
                if stack.last().map(|o| o.id) == Some(t.id) {
                    stack.pop();
                    out.push(tok.clone());
                } else if let Some(pos) = stack.iter().rposition(|o| o.id == t.id) {
                    let above = stack.split_off(pos + 1);
                    for opener in above.iter().rev() {
                        out.push(Token::Tag(Tag::closing(opener.id)));
                    }
                    stack.pop();
                    out.push(tok.clone());
                    for opener in &above {
                        stack.push(*opener);
                        out.push(Token::Tag(*opener));
                    }
                }
                // else: no opener anywhere on the stack; drop the stray closer.
            }
        }
    }

    while let Some(opener) = stack.pop() {
        out.push(Token::Tag(Tag::closing(opener.id)));
    }
    out
}
