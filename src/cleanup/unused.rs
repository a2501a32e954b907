//! Cleanup pass 7: unused-tag collection. Diffs the tag ids present in the
//! cleaned output against the full id set of the source sentence and reports
//! whatever never made it across — on top of whatever the neighbor
//! strategy's unpointed-tag relocation (`unpointed.rs`) already reported
//! before cleanup even started.

use std::collections::HashSet;

use crate::tag::Tag;
use crate::tagmap::TagMap;
use crate::token::Token;

fn tag_ids(tokens: &[Token]) -> HashSet<u32> {
    tokens.iter().filter_map(Token::as_tag).map(|t| t.id).collect()
}

/// Every tag in `source` (paired or isolated) represented as one canonical
/// instance, keyed by id — the opening half for pairs, the tag itself for
/// isolated markers.
fn source_tags(source: &[Token], tag_map: &TagMap) -> Vec<Tag> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for tok in source {
        let Some(t) = tok.as_tag() else { continue };
        if !seen.insert(t.id) {
            continue;
        }
        if t.kind.is_closing() {
            if let Some(open) = tag_map.opening_for(t) {
                tags.push(open);
                continue;
            }
        }
        tags.push(t);
    }
    tags
}

pub fn collect_unused(source: &[Token], output: &[Token], tag_map: &TagMap) -> HashSet<Tag> {
    let present = tag_ids(output);
    source_tags(source, tag_map)
        .into_iter()
        .filter(|t| !present.contains(&t.id))
        .collect()
}
