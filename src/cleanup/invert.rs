//! Cleanup pass 3: invert-tag repair — a closing tag that textually precedes
//! its own opening tag is rewritten so the opener wraps to the front of the
//! affected region and the closer to its back. The affected region is
//! bounded by the nearest foreign tag (a different id) on either side, or
//! the ends of the slice when no such tag exists — never the whole buffer
//! regardless of what else surrounds the inversion. Multiple inversions are
//! resolved left-to-right, one at a time, since fixing one shifts indices
//! for the next. A stray closer with no opener anywhere, or a stray opener
//! with no closer anywhere, is dropped rather than repaired (there is
//! nothing to pair it with).

use std::collections::HashMap;

use crate::tag::TagKind;
use crate::token::Token;

fn drop_strays(tokens: &[Token]) -> Vec<Token> {
    let mut has_open: HashMap<u32, bool> = HashMap::new();
    let mut has_close: HashMap<u32, bool> = HashMap::new();
    for tok in tokens {
        if let Some(t) = tok.as_tag() {
            match t.kind {
                TagKind::Opening => {
                    has_open.insert(t.id, true);
                }
                TagKind::Closing => {
                    has_close.insert(t.id, true);
                }
                TagKind::Isolated => {}
            }
        }
    }
    tokens
        .iter()
        .filter(|tok| match tok.as_tag() {
            Some(t) if t.kind.is_opening() => has_close.get(&t.id).copied().unwrap_or(false),
            Some(t) if t.kind.is_closing() => has_open.get(&t.id).copied().unwrap_or(false),
            _ => true,
        })
        .cloned()
        .collect()
}

/// The leftmost pair whose first closer appears before its first opener,
/// picked by the closer's position so repairs apply left to right.
fn find_inversion(tokens: &[Token]) -> Option<(usize, usize, u32)> {
    let mut first_open: HashMap<u32, usize> = HashMap::new();
    let mut first_close: HashMap<u32, usize> = HashMap::new();
    for (i, tok) in tokens.iter().enumerate() {
        if let Some(t) = tok.as_tag() {
            match t.kind {
                TagKind::Opening => {
                    first_open.entry(t.id).or_insert(i);
                }
                TagKind::Closing => {
                    first_close.entry(t.id).or_insert(i);
                }
                TagKind::Isolated => {}
            }
        }
    }
    first_close
        .iter()
        .filter_map(|(&id, &ci)| {
            first_open
                .get(&id)
                .filter(|&&oi| ci < oi)
                .map(|&oi| (ci, oi, id))
        })
        .min_by_key(|&(ci, _, _)| ci)
}

/// The smallest region enclosing `ci` and `oi` that doesn't cross a tag
/// belonging to some other id — i.e. the nearest already-valid bracket
/// boundary on either side, or the ends of the slice if there is none.
fn local_bounds(tokens: &[Token], ci: usize, oi: usize, id: u32) -> (usize, usize) {
    let left = (0..ci)
        .rev()
        .find(|&p| matches!(tokens[p].as_tag(), Some(t) if t.id != id))
        .map_or(0, |p| p + 1);
    let right = (oi + 1..tokens.len())
        .find(|&p| matches!(tokens[p].as_tag(), Some(t) if t.id != id))
        .map_or(tokens.len() - 1, |p| p - 1);
    (left, right)
}

pub fn repair_inversions(tokens: &[Token]) -> Vec<Token> {
    let mut current = drop_strays(tokens);
    while let Some((ci, oi, id)) = find_inversion(&current) {
        let (left, right) = local_bounds(&current, ci, oi, id);
        let open_tag = current[oi].clone();
        let close_tag = current[ci].clone();

        let mut rebuilt = Vec::with_capacity(right - left + 1);
        rebuilt.push(open_tag);
        rebuilt.extend(
            current[left..=right]
                .iter()
                .enumerate()
                .filter(|&(i, _)| left + i != ci && left + i != oi)
                .map(|(_, t)| t.clone()),
        );
        rebuilt.push(close_tag);

        let mut next = Vec::with_capacity(current.len());
        next.extend_from_slice(&current[..left]);
        next.extend(rebuilt);
        next.extend_from_slice(&current[right + 1..]);
        current = next;
    }
    current
}
