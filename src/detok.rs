//! Detokenize-around-tags: joining a tagged token stream back into a string
//! while keeping tags bound to their adjacent word (`spec.md` §4.10).

use std::borrow::Cow;

use cow_utils::CowUtils;

use crate::tag::Tag;
use crate::token::Token;

/// `true` if a space belongs between `prev` and `next` when detokenizing.
/// Suppressed immediately before a closing tag, and immediately after an
/// opening or isolated tag — the three adjacency rules `spec.md` §4.10
/// names. Every other adjacency (text–text, tag–opening, closing–text,
/// closing–closing) gets a space.
fn needs_space(prev: &Token, next: &Token) -> bool {
    if prev.as_tag().is_some_and(|t| !t.kind.is_closing()) {
        return false;
    }
    if next.as_tag().is_some_and(|t| t.kind.is_closing()) {
        return false;
    }
    true
}

fn render_tag(tag: Tag, out: &mut String) {
    let [kind_marker, id_char] = tag.encode();
    out.push(kind_marker);
    out.push(id_char);
}

/// Strips the reserved tag-marker control characters (`spec.md` §6's
/// `CHARBASE` encoding) out of ordinary text, so a model that happens to
/// emit one of those code points literally can never be mistaken for a tag
/// boundary downstream. A no-op for the overwhelming majority of tokens, so
/// this stays a borrow rather than an allocation.
fn sanitize(text: &str) -> Cow<'_, str> {
    text.cow_replace(&['\u{0}', '\u{1}', '\u{2}'][..], "")
}

/// Joins `tokens` into the final detokenized string. Returns a borrow of the
/// original text with no allocation when `tokens` is a single clean text
/// token — the common case for a sentence with no markup at all.
pub fn detokenize(tokens: &[Token]) -> Cow<'_, str> {
    if let [Token::Text(only)] = tokens {
        return sanitize(only);
    }

    let mut out = String::new();
    for (i, tok) in tokens.iter().enumerate() {
        if i > 0 && needs_space(&tokens[i - 1], tok) {
            out.push(' ');
        }
        match tok {
            Token::Text(t) => out.push_str(&sanitize(t)),
            Token::Tag(tag) => render_tag(*tag, &mut out),
        }
    }
    Cow::Owned(out)
}
