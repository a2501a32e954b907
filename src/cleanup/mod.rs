//! The fixed seven-pass cleanup pipeline that turns a raw projection into a
//! well-formed target sentence: BPE-fragment tag eviction, BPE undo,
//! inversion repair, redundant-tag removal, nesting-balance, neighbor-pair
//! merge, then a final unused-tag diff against the source. The order is
//! load-bearing — each pass assumes the invariants the previous one
//! establishes (e.g. balance relies on invert-repair having already removed
//! globally-stray tags; merge relies on redundant-removal having already
//! collapsed immediately-duplicated runs).

mod balance;
mod bpe;
mod invert;
mod merge;
mod redundant;
mod unused;

use std::collections::HashSet;

use crate::tag::Tag;
use crate::tagmap::TagMap;
use crate::token::Token;

pub use unused::collect_unused;

/// Runs all seven passes over a freshly-projected target and reports tags
/// from `source` that never made it into the final output.
#[tracing::instrument(level = "trace", skip(source, projected, tag_map))]
pub fn run(source: &[Token], projected: &[Token], tag_map: &TagMap) -> (Vec<Token>, HashSet<Tag>) {
    let out = bpe::move_tags_out_of_fragments(projected);
    let out = bpe::undo_bpe(&out);
    let out = invert::repair_inversions(&out);
    let out = redundant::remove_redundant(&out);
    let out = balance::balance_nesting(&out);
    let out = merge::merge_neighbor_pairs(&out);
    let unused = collect_unused(source, &out, tag_map);
    (out, unused)
}
