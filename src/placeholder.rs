//! Empty-pair ↔ isolated substitution (`spec.md` §4.8): a tag pair with no
//! text between its endpoints carries no alignment anchor, so it is
//! replaced by a fresh isolated placeholder before translation and restored
//! afterward. "No text between" is checked at any nesting depth, not just
//! literal adjacency — a pair wrapping only other already-empty pairs is
//! itself empty, and collapses the same way.

use std::collections::HashMap;

use crate::tag::Tag;
use crate::token::Token;

/// Maps each placeholder id back to the original token span it replaced.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderMap {
    originals: HashMap<u32, Vec<Token>>,
}

impl PlaceholderMap {
    #[inline]
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}

struct Frame {
    start: usize,
    has_text: bool,
}

/// Replaces every empty tag pair in `tokens` with a fresh isolated
/// placeholder, innermost first, using a single stack-based scan (the same
/// shape `TagMap::build` uses to pair tags by nesting depth — a second,
/// already-built `TagMap` wouldn't save this pass anything, since it still
/// needs the scan for span boundaries, not just which id pairs with which).
/// Placeholder ids start above the highest id already used in `tokens`, per
/// `spec.md` §6 ("fresh id outside the range used by original isolated
/// tags").
#[tracing::instrument(level = "trace", skip(tokens))]
pub fn substitute_empty_pairs(tokens: &[Token]) -> (Vec<Token>, PlaceholderMap) {
    let mut next_id = tokens
        .iter()
        .filter_map(Token::as_tag)
        .map(|t| t.id)
        .max()
        .map_or(0, |m| m + 1);
    let mut originals: HashMap<u32, Vec<Token>> = HashMap::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut out: Vec<Token> = Vec::new();

    for tok in tokens {
        match tok {
            Token::Text(_) => {
                if let Some(top) = stack.last_mut() {
                    top.has_text = true;
                }
                out.push(tok.clone());
            }
            Token::Tag(t) if t.kind.is_isolated() => out.push(tok.clone()),
            Token::Tag(t) if t.kind.is_opening() => {
                stack.push(Frame {
                    start: out.len(),
                    has_text: false,
                });
                out.push(tok.clone());
            }
            Token::Tag(_) => {
                out.push(tok.clone());
                if let Some(frame) = stack.pop() {
                    if frame.has_text {
                        if let Some(parent) = stack.last_mut() {
                            parent.has_text = true;
                        }
                    } else {
                        let span = out[frame.start..].to_vec();
                        let id = next_id;
                        next_id += 1;
                        originals.insert(id, span);
                        out.truncate(frame.start);
                        out.push(Token::Tag(Tag::isolated(id)));
                    }
                }
            }
        }
    }

    (out, PlaceholderMap { originals })
}

/// Expands every placeholder in `tokens` back to its original span,
/// recursively, so a placeholder that itself contained nested placeholders
/// (from a doubly-empty nesting) restores correctly in one call.
pub fn restore_empty_pairs(tokens: &[Token], map: &PlaceholderMap) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    for tok in tokens {
        expand_one(tok, map, &mut out);
    }
    out
}

fn expand_one(tok: &Token, map: &PlaceholderMap, out: &mut Vec<Token>) {
    if let Some(tag) = tok.as_tag() {
        if tag.kind.is_isolated() {
            if let Some(original) = map.originals.get(&tag.id) {
                for t in original {
                    expand_one(t, map, out);
                }
                return;
            }
        }
    }
    out.push(tok.clone());
}
