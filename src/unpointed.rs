//! Movement of tags attached to unaligned ("unpointed") source tokens,
//! ahead of projection (`spec.md` §4.5).
//!
//! This operates on a neighbor-style index map (`spec.md` §4.4), where every
//! tag is attached to exactly one source index: a tag sitting on a source
//! token that no target token aligns to would otherwise be silently dropped
//! by projection, since projection only ever visits `bestSource(j)` for
//! some target `j`. Relocating (or dropping, with a report) guarantees every
//! surviving tag is attached to a token projection will actually visit.

use std::collections::{HashMap, HashSet};

use crate::index_map::IndexTagMap;
use crate::tag::Tag;
use crate::tagmap::TagMap;

fn remove_tag(map: &mut IndexTagMap, idx: usize, t: Tag) {
    if let Some(v) = map.get_mut(&idx) {
        if let Some(pos) = v.iter().position(|&x| x == t) {
            v.remove(pos);
        }
        if v.is_empty() {
            map.remove(&idx);
        }
    }
}

fn add_tag(map: &mut IndexTagMap, idx: usize, t: Tag) {
    map.entry(idx).or_default().push(t);
}

/// First pointed index in `[from, to]` (inclusive), scanning forward.
fn nearest_pointed_forward(pointed: &HashSet<usize>, from: usize, to: usize) -> Option<usize> {
    (from..=to).find(|i| pointed.contains(i))
}

/// First pointed index in `[to, from]` (inclusive), scanning backward from
/// `from` down to `to`.
fn nearest_pointed_backward(pointed: &HashSet<usize>, from: usize, to: usize) -> Option<usize> {
    (to..=from).rev().find(|i| pointed.contains(i))
}

/// Relocates or drops tags attached to unpointed source indices, mutating
/// `map` in place and returning the set of tags that had to be dropped
/// entirely (no pointed token to migrate to).
#[tracing::instrument(level = "trace", skip(map, tag_map, pointed))]
pub fn relocate_unpointed(
    map: &mut IndexTagMap,
    tag_map: &TagMap,
    pointed: &HashSet<usize>,
    source_text_len: usize,
) -> HashSet<Tag> {
    let mut unused = HashSet::new();
    if source_text_len == 0 {
        return unused;
    }

    let mut tag_index: HashMap<Tag, usize> = HashMap::new();
    for (&i, tags) in map.iter() {
        for &t in tags {
            tag_index.insert(t, i);
        }
    }

    let mut pairs: Vec<(Tag, Tag)> = tag_map.iter().collect();
    pairs.sort_by_key(|(open, _)| open.id);

    for (open, close) in pairs {
        let (Some(&oi), Some(&ci)) = (tag_index.get(&open), tag_index.get(&close)) else {
            continue; // pair lives outside this map (e.g. a sentence-level wrapper)
        };
        let open_pointed = pointed.contains(&oi);
        let close_pointed = pointed.contains(&ci);

        match (open_pointed, close_pointed) {
            (true, true) => {}
            (false, false) => {
                remove_tag(map, oi, open);
                remove_tag(map, ci, close);
                unused.insert(open);
                unused.insert(close);
            }
            (false, true) => {
                // opening migrates right, never past its own closer
                match nearest_pointed_forward(pointed, oi, ci) {
                    Some(target) => {
                        remove_tag(map, oi, open);
                        add_tag(map, target, open);
                        tag_index.insert(open, target);
                    }
                    None => {
                        remove_tag(map, oi, open);
                        remove_tag(map, ci, close);
                        unused.insert(open);
                        unused.insert(close);
                    }
                }
            }
            (true, false) => {
                // closing migrates left, never before its own opener
                match nearest_pointed_backward(pointed, ci, oi) {
                    Some(target) => {
                        remove_tag(map, ci, close);
                        add_tag(map, target, close);
                        tag_index.insert(close, target);
                    }
                    None => {
                        remove_tag(map, oi, open);
                        remove_tag(map, ci, close);
                        unused.insert(open);
                        unused.insert(close);
                    }
                }
            }
        }
    }

    let mut isolated: Vec<Tag> = tag_index
        .keys()
        .filter(|t| t.kind.is_isolated())
        .copied()
        .collect();
    isolated.sort_by_key(|t| t.id);

    for iso in isolated {
        let idx = *tag_index.get(&iso).unwrap();
        if pointed.contains(&idx) {
            continue;
        }
        match nearest_pointed_forward(pointed, idx, source_text_len - 1) {
            Some(target) => {
                remove_tag(map, idx, iso);
                add_tag(map, target, iso);
                tag_index.insert(iso, target);
            }
            None => {
                remove_tag(map, idx, iso);
                unused.insert(iso);
            }
        }
    }

    unused
}
