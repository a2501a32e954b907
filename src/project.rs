//! Core reinsertion: projecting source tags through an alignment onto the
//! target text, producing the pre-cleanup tagged target sequence (component
//! 6 — the neighbor and complete strategies).

use std::collections::HashSet;

use crate::alignment::AlignmentQuery;
use crate::index_map::{complete_map, neighbor_map, IndexTagMap};
use crate::split::SplitTagsSentence;
use crate::tag::Tag;
use crate::tagmap::TagMap;
use crate::token::Token;
use crate::unpointed::relocate_unpointed;

/// Which reinsertion rule to apply. Neighbor places each source tag exactly
/// once, on its single aligned target token; complete re-emits every
/// enclosing pair around every target token aligned to any token inside that
/// pair's span (duplicates are later folded by the merge cleanup pass).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Neighbor,
    Complete,
}

/// The final result of a full `reinsert()` call: the tagged target sequence
/// plus any tag pairs that had no aligned anchor and so could not be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReinsertionOutput {
    pub target_tokens: Vec<Token>,
    pub unused_tags: HashSet<Tag>,
}

/// Walks the target text left to right, consuming `map[bestSource(j)]`
/// wholesale at each step so every tag is placed exactly once.
///
/// A run that trails the last source text token (e.g. a closer with nothing
/// after it to attach to) is folded onto that last index by `neighbor_map`
/// like any other run, but it belongs on the opposite side of its anchor:
/// an ordinary run sits *before* the text token it's keyed on, a trailing
/// one sits *after* it. `trailing` names exactly the tags `neighbor_map`
/// placed via that fallback, so they can be re-emitted on the correct side
/// regardless of which index they end up attached to.
fn project_neighbor(
    target_text: &[Token],
    alignment: &impl AlignmentQuery,
    mut map: IndexTagMap,
    trailing: &HashSet<Tag>,
) -> Vec<Token> {
    let mut out = Vec::with_capacity(target_text.len() * 2);
    for (j, tok) in target_text.iter().enumerate() {
        if let Some(i) = alignment.best_source(j) {
            if let Some(tags) = map.remove(&i) {
                let (after, before): (Vec<_>, Vec<_>) =
                    tags.into_iter().partition(|t| trailing.contains(t));
                out.extend(before.into_iter().map(Token::Tag));
                out.push(tok.clone());
                out.extend(after.into_iter().map(Token::Tag));
                continue;
            }
        }
        out.push(tok.clone());
    }
    // Sentence-end pseudo-token: an EOS alignment row may still point at a
    // source index carrying trailing tags (e.g. a closer on the last word).
    if let Some(i) = alignment.best_source(target_text.len()) {
        if let Some(tags) = map.remove(&i) {
            out.extend(tags.into_iter().map(Token::Tag));
        }
    }
    out
}

/// Wraps every target token aligned into a pair's span with that pair, on
/// both sides; `map` is read, never consumed, so the same pair can surface
/// at many target positions.
fn project_complete(
    target_text: &[Token],
    alignment: &impl AlignmentQuery,
    map: &IndexTagMap,
) -> Vec<Token> {
    let mut out = Vec::with_capacity(target_text.len() * 2);
    let before = |i: usize, out: &mut Vec<Token>| {
        if let Some(tags) = map.get(&i) {
            out.extend(
                tags.iter()
                    .filter(|t| !t.kind.is_closing())
                    .map(|&t| Token::Tag(t)),
            );
        }
    };
    let after = |i: usize, out: &mut Vec<Token>| {
        if let Some(tags) = map.get(&i) {
            out.extend(
                tags.iter()
                    .filter(|t| t.kind.is_closing())
                    .map(|&t| Token::Tag(t)),
            );
        }
    };

    for (j, tok) in target_text.iter().enumerate() {
        if let Some(i) = alignment.best_source(j) {
            before(i, &mut out);
            out.push(tok.clone());
            after(i, &mut out);
        } else {
            out.push(tok.clone());
        }
    }
    if let Some(i) = alignment.best_source(target_text.len()) {
        if let Some(tags) = map.get(&i) {
            out.extend(tags.iter().map(|&t| Token::Tag(t)));
        }
    }
    out
}

/// Runs source decomposition, index-map construction, unpointed-tag
/// relocation (neighbor strategy only — complete's duplication already
/// self-heals a fully-unpointed span by simply never placing it) and
/// projection, returning the pre-cleanup target token stream with
/// `prefixTags`/`suffixTags` restored around it.
#[tracing::instrument(level = "trace", skip(source, target_text, alignment, tag_map))]
pub fn project(
    source: &[Token],
    target_text: &[Token],
    alignment: &impl AlignmentQuery,
    tag_map: &TagMap,
    strategy: Strategy,
) -> (Vec<Token>, HashSet<Tag>) {
    let split = SplitTagsSentence::split(source, tag_map);
    let source_text_len = split.inner.iter().filter(|t| t.is_text()).count();
    let pointed = alignment.pointed_source_tokens();

    let (projected, unused) = match strategy {
        Strategy::Neighbor => {
            let (mut map, trailing) = neighbor_map(&split.inner);
            let unused = relocate_unpointed(&mut map, tag_map, &pointed, source_text_len);
            (project_neighbor(target_text, alignment, map, &trailing), unused)
        }
        Strategy::Complete => {
            let map = complete_map(&split.inner, tag_map);
            (project_complete(target_text, alignment, &map), HashSet::new())
        }
    };

    let mut out = Vec::with_capacity(split.prefix_tags.len() + projected.len() + split.suffix_tags.len());
    out.extend(split.prefix_tags);
    out.extend(projected);
    out.extend(split.suffix_tags);
    (out, unused)
}
