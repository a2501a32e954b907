//! Token-index → tags-at-this-token maps (`spec.md` §4.4).
//!
//! Both variants are built over a [`crate::split::SplitTagsSentence`]'s
//! `inner` slice: by the time `inner` exists, sentence-spanning wrapper tags
//! have already been peeled into `prefixTags`/`suffixTags` (`spec.md` §4.3),
//! so every text token in `inner` is exactly one source text-token index,
//! and `inner` (when non-empty) always starts and ends on a text token —
//! the peel loops in `split.rs` stop exactly at the first/last text token.

use std::collections::{HashMap, HashSet};

use crate::tag::Tag;
use crate::tagmap::TagMap;
use crate::token::Token;

/// `map[i]` = the ordered list of tags owned by source text-token index `i`.
pub type IndexTagMap = HashMap<usize, Vec<Tag>>;

/// Forward anchor (index of the next text token at or after each position)
/// and backward anchor (index of the previous text token at or before each
/// position), both in text-only coordinates.
struct Anchors {
    forward: Vec<usize>,
    backward: Vec<usize>,
}

fn compute_anchors(inner: &[Token]) -> Anchors {
    let n = inner.len();
    let mut forward = vec![0usize; n];
    let mut backward = vec![0usize; n];

    let mut text_idx = 0usize;
    let mut last_seen = 0usize;
    for (p, tok) in inner.iter().enumerate() {
        if tok.is_text() {
            last_seen = text_idx;
            text_idx += 1;
        }
        backward[p] = last_seen;
    }

    let mut text_idx = text_idx; // now equals total text count
    text_idx = text_idx.saturating_sub(1);
    let mut next_seen = text_idx;
    for p in (0..n).rev() {
        if inner[p].is_text() {
            next_seen = text_idx;
            text_idx = text_idx.saturating_sub(1);
        }
        forward[p] = next_seen;
    }

    Anchors { forward, backward }
}

/// Builds the neighbor map (`spec.md` §4.4): each run of tags between text
/// tokens is assigned to the *following* text token, or the previous one if
/// the run is at the end of the sentence. Every tag occurs exactly once.
///
/// The second element names the tags assigned by the trailing fallback.
/// Unlike an ordinary run, which sits textually *before* the text token it's
/// keyed on, a trailing run sits *after* the last text token in the source —
/// there is nothing following it to attach to instead. Projection needs that
/// distinction to place the run on the correct side of its anchor.
#[tracing::instrument(level = "trace", skip(inner))]
pub fn neighbor_map(inner: &[Token]) -> (IndexTagMap, HashSet<Tag>) {
    let mut map = IndexTagMap::new();
    let mut text_idx = 0usize;
    let mut pending: Vec<Tag> = Vec::new();

    for tok in inner {
        match tok {
            Token::Tag(t) => pending.push(*t),
            Token::Text(_) => {
                if !pending.is_empty() {
                    map.entry(text_idx).or_default().extend(pending.drain(..));
                }
                text_idx += 1;
            }
        }
    }
    let mut trailing = HashSet::new();
    if !pending.is_empty() && text_idx > 0 {
        trailing.extend(pending.iter().copied());
        map.entry(text_idx - 1).or_default().extend(pending.drain(..));
    }
    (map, trailing)
}

/// Builds the complete map (`spec.md` §4.4): every text token strictly
/// inside the span of an opening/closing pair gets both the opening and the
/// closing tag appended to its entry; isolated tags are assigned to their
/// neighbor exactly as in [`neighbor_map`].
#[tracing::instrument(level = "trace", skip(inner, tag_map))]
pub fn complete_map(inner: &[Token], tag_map: &TagMap) -> IndexTagMap {
    let mut map = IndexTagMap::new();
    let anchors = compute_anchors(inner);

    // Isolated tags: same placement rule as the neighbor map.
    let mut text_idx = 0usize;
    let mut pending_isolated: Vec<Tag> = Vec::new();
    for tok in inner {
        match tok {
            Token::Tag(t) if t.kind.is_isolated() => pending_isolated.push(*t),
            Token::Tag(_) => {}
            Token::Text(_) => {
                if !pending_isolated.is_empty() {
                    map.entry(text_idx)
                        .or_default()
                        .extend(pending_isolated.drain(..));
                }
                text_idx += 1;
            }
        }
    }
    if !pending_isolated.is_empty() && text_idx > 0 {
        map.entry(text_idx - 1)
            .or_default()
            .extend(pending_isolated.drain(..));
    }

    // Pair tags: find each occurrence's position, then fill the covered range.
    let mut position_of: HashMap<Tag, usize> = HashMap::new();
    for (p, tok) in inner.iter().enumerate() {
        if let Token::Tag(t) = tok {
            if t.kind.is_pair_half() {
                position_of.insert(*t, p);
            }
        }
    }

    for (open, close) in tag_map.iter() {
        let (Some(&open_pos), Some(&close_pos)) =
            (position_of.get(&open), position_of.get(&close))
        else {
            continue; // pair not present in this region (wrapper peeled into prefix/suffix)
        };
        let start = anchors.forward[open_pos];
        let end = anchors.backward[close_pos];
        if start > end {
            continue; // empty pair with nothing between (should be a placeholder upstream)
        }
        for i in start..=end {
            let entry = map.entry(i).or_default();
            entry.push(open);
            entry.push(close);
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Tag;

    fn open(id: u32) -> Token {
        Token::tag(Tag::opening(id))
    }
    fn close(id: u32) -> Token {
        Token::tag(Tag::closing(id))
    }
    fn iso(id: u32) -> Token {
        Token::tag(Tag::isolated(id))
    }
    fn text(s: &'static str) -> Token {
        Token::text(s)
    }

    #[test]
    fn neighbor_map_attaches_run_to_following_token() {
        let inner = vec![open(1), text("a"), text("b")];
        let (map, trailing) = neighbor_map(&inner);
        assert_eq!(map.get(&0), Some(&vec![Tag::opening(1)]));
        assert_eq!(map.get(&1), None);
        assert!(trailing.is_empty());
    }

    #[test]
    fn neighbor_map_attaches_trailing_run_to_previous_token() {
        let inner = vec![text("a"), text("b"), close(1)];
        let (map, trailing) = neighbor_map(&inner);
        assert_eq!(map.get(&1), Some(&vec![Tag::closing(1)]));
        assert_eq!(trailing, HashSet::from([Tag::closing(1)]));
    }

    #[test]
    fn neighbor_map_each_tag_once() {
        let inner = vec![open(1), open(2), text("a"), close(2), close(1), text("b")];
        let (map, _trailing) = neighbor_map(&inner);
        let total: usize = map.values().map(Vec::len).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn complete_map_wraps_every_token_in_range() {
        // <1> a b c </1> : every text token 0,1,2 is inside pair 1
        let inner = vec![open(1), text("a"), text("b"), text("c"), close(1)];
        let map = complete_map(&inner, &TagMap::build(&inner).unwrap());
        for i in 0..3 {
            let entry = map.get(&i).unwrap();
            assert!(entry.contains(&Tag::opening(1)));
            assert!(entry.contains(&Tag::closing(1)));
        }
    }

    #[test]
    fn complete_map_respects_nesting_scope() {
        // a <1> b </1> c : only index 1 ("b") is covered by pair 1
        let inner = vec![
            text("a"),
            open(1),
            text("b"),
            close(1),
            text("c"),
        ];
        let map = complete_map(&inner, &TagMap::build(&inner).unwrap());
        assert!(map.get(&0).is_none());
        assert!(map.get(&1).unwrap().contains(&Tag::opening(1)));
        assert!(map.get(&2).is_none());
    }

    #[test]
    fn complete_map_still_attaches_isolated_to_neighbor() {
        let inner = vec![text("a"), iso(9), text("b")];
        let map = complete_map(&inner, &TagMap::build(&inner).unwrap());
        assert_eq!(map.get(&1), Some(&vec![Tag::isolated(9)]));
    }
}
