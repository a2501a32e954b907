//! # markup-reinsert
//!
//! Reinserts inline markup tags — stripped before handing a sentence to a
//! neural machine-translation engine — back into the translated target
//! sentence, guided by a source→target word alignment.
//!
//! The NMT engine itself only ever sees plain token sequences; this crate is
//! the piece that makes that round-trip preserve formatting (span tags,
//! isolated placeholders like line breaks) as faithfully as the alignment
//! allows, while guaranteeing the result is well-nested.
//!
//! ## Quick start
//!
//! ```rust
//! use markup_reinsert::{reinsert, Alignments, HardAlignment, Strategy, Tag, TagMap, Token};
//!
//! let source = vec![
//!     Token::tag(Tag::opening(1)),
//!     Token::text("This"),
//!     Token::tag(Tag::closing(1)),
//!     Token::text("is"),
//!     Token::text("fine"),
//! ];
//! let target = vec![Token::text("Das"), Token::text("ist"), Token::text("gut")];
//! let tag_map = TagMap::build(&source).unwrap();
//! let alignment = Alignments::Hard(HardAlignment::parse("0-0 1-1 2-2", 3, 3).unwrap());
//!
//! let output = reinsert(&source, &target, &alignment, &tag_map, Strategy::Neighbor).unwrap();
//! assert!(output.unused_tags.is_empty());
//! ```
//!
//! ## Module map
//!
//! - [`tag`] / [`tagmap`] — tag identity and the opening↔closing pairing.
//! - [`alignment`] — the hard/soft alignment abstraction.
//! - [`split`] — peeling sentence-spanning wrapper tags off the source.
//! - [`index_map`] — token-index → tags-at-this-token maps (neighbor and
//!   complete variants).
//! - [`unpointed`] — relocating tags anchored to unaligned source tokens.
//! - [`project`] — the core reinsertion strategies.
//! - [`cleanup`] — the fixed seven-pass repair pipeline.
//! - [`detok`] — joining tagged tokens back into a string.
//! - [`mask`] / [`placeholder`] — the two reversible pre/post transforms
//!   that keep tag tokens safe around other document-pipeline stages.

pub mod alignment;
pub mod cleanup;
pub mod config;
pub mod detok;
pub mod error;
pub mod index_map;
pub mod mask;
pub mod placeholder;
pub mod project;
pub mod split;
pub mod tag;
pub mod tagmap;
pub mod token;
pub mod unpointed;

pub use alignment::{AlignmentQuery, Alignments, HardAlignment, SoftAlignment};
pub use config::ReinsertConfig;
pub use detok::detokenize;
pub use error::{AlignmentSide, ReinsertError, ReinsertResult};
pub use mask::{mask, unmask, MaskConfig};
pub use placeholder::{restore_empty_pairs, substitute_empty_pairs, PlaceholderMap};
pub use project::{ReinsertionOutput, Strategy};
pub use split::SplitTagsSentence;
pub use tag::{Tag, TagKind};
pub use tagmap::TagMap;
pub use token::Token;

/// Reinserts `source`'s markup into `target_text` using `alignment`,
/// producing a well-nested target token sequence plus any tag pairs that
/// had no aligned anchor (`spec.md` §6).
///
/// This is the convenience entry point that chains the core reinsertion
/// step ([`project::project`]) with the cleanup pipeline
/// ([`cleanup::run`]), mirroring the teacher's `parse()` wrapping
/// `Parser`/`Renderer` in one call. Callers who need the two stages
/// separately (e.g. to inspect the pre-cleanup projection) can call
/// [`project::project`] and [`cleanup::run`] directly.
#[tracing::instrument(level = "debug", skip(source, target_text, alignment, tag_map))]
pub fn reinsert(
    source: &[Token],
    target_text: &[Token],
    alignment: &Alignments,
    tag_map: &TagMap,
    strategy: Strategy,
) -> ReinsertResult<ReinsertionOutput> {
    reinsert_with_config(
        source,
        target_text,
        alignment,
        tag_map,
        &ReinsertConfig {
            strategy,
            ..ReinsertConfig::default()
        },
    )
}

/// As [`reinsert`], but reading the strategy (and, for a [`Alignments::Soft`]
/// alignment, the threshold used to decide which rows of the score matrix
/// count as aligned at all) from a [`ReinsertConfig`] instead of a bare
/// `Strategy` — mirrors the teacher's `parse_with_config`.
#[tracing::instrument(level = "debug", skip(source, target_text, alignment, tag_map, config))]
pub fn reinsert_with_config(
    source: &[Token],
    target_text: &[Token],
    alignment: &Alignments,
    tag_map: &TagMap,
    config: &ReinsertConfig,
) -> ReinsertResult<ReinsertionOutput> {
    let alignment = match (alignment, config.soft_alignment_threshold) {
        (Alignments::Soft(soft), Some(threshold)) => {
            Alignments::Hard(soft.to_hard(Some(threshold)))
        }
        (other, _) => other.clone(),
    };

    let (projected, mut unused) =
        project::project(source, target_text, &alignment, tag_map, config.strategy);
    let (target_tokens, cleanup_unused) = cleanup::run(source, &projected, tag_map);
    unused.extend(cleanup_unused);

    Ok(ReinsertionOutput {
        target_tokens,
        unused_tags: unused,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

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

    // Table row #1 from `spec.md` §8.
    #[test]
    fn end_to_end_identity_alignment() {
        let source = vec![
            iso(9),
            open(1),
            text("This"),
            close(1),
            text("is"),
            text("a"),
            open(2),
            text("test"),
            text("."),
            close(2),
            iso(10),
        ];
        let target = vec![
            text("Das"),
            text("ist"),
            text("ein"),
            text("Test"),
            text("."),
        ];
        let tag_map = TagMap::build(&source).unwrap();
        let alignment = Alignments::Hard(HardAlignment::parse("0-0 1-1 2-2 3-3 4-4", 5, 5).unwrap());

        let output = reinsert(&source, &target, &alignment, &tag_map, Strategy::Neighbor).unwrap();
        assert!(output.unused_tags.is_empty());
        assert_eq!(
            output.target_tokens,
            vec![
                iso(9),
                open(1),
                text("Das"),
                close(1),
                text("ist"),
                text("ein"),
                open(2),
                text("Test"),
                text("."),
                close(2),
                iso(10),
            ]
        );
    }

    // Table row #2 from `spec.md` §8: a scrambled word order. The reorder
    // inverts pair 1 once projected; invert-repair rewraps it within the
    // nearest enclosing boundary visible from the token stream (pair 2's own
    // brackets), rather than the single token it originally wrapped, since
    // this cleanup pass sees only tokens, not the alignment.
    #[test]
    fn end_to_end_reordered_alignment() {
        let source = vec![
            iso(9),
            open(1),
            text("This"),
            close(1),
            text("is"),
            text("a"),
            open(2),
            text("test"),
            text("."),
            close(2),
            iso(10),
        ];
        let target = vec![
            text("Test"),
            text("ein"),
            text("ist"),
            text("das"),
            text("."),
        ];
        let tag_map = TagMap::build(&source).unwrap();
        let alignment = Alignments::Hard(HardAlignment::parse("0-3 1-2 2-1 3-0 4-4", 5, 5).unwrap());

        let output = reinsert(&source, &target, &alignment, &tag_map, Strategy::Neighbor).unwrap();
        assert!(output.unused_tags.is_empty());
        assert_eq!(
            output.target_tokens,
            vec![
                iso(9),
                open(2),
                open(1),
                text("Test"),
                text("ein"),
                text("ist"),
                text("das"),
                text("."),
                close(1),
                close(2),
                iso(10),
            ]
        );
    }

    #[test]
    fn fully_unaligned_target_keeps_only_prefix_and_suffix_tags() {
        let source = vec![
            open(1),
            text("hello"),
            close(1),
        ];
        let target = vec![text("bonjour")];
        let tag_map = TagMap::build(&source).unwrap();
        let alignment = Alignments::Hard(HardAlignment::parse("", 1, 1).unwrap());

        let output = reinsert(&source, &target, &alignment, &tag_map, Strategy::Neighbor).unwrap();
        assert_eq!(output.target_tokens, vec![open(1), text("bonjour"), close(1)]);
    }

    #[test]
    fn malformed_source_is_rejected_before_reinsertion_runs() {
        let source = vec![text("x"), close(1)];
        assert!(TagMap::build(&source).is_err());
    }

    #[test]
    fn soft_alignment_threshold_from_config_drops_weak_rows() {
        let source = vec![open(1), text("x"), close(1), text("y")];
        let target = vec![text("X"), text("Y")];
        let tag_map = TagMap::build(&source).unwrap();
        // row 0 ("X") barely prefers source 0; row 1 ("Y") clearly prefers source 1.
        let soft = SoftAlignment::new(vec![vec![0.2, 0.1], vec![0.0, 0.9]]).unwrap();
        let alignment = Alignments::Soft(soft);
        let config = ReinsertConfig {
            strategy: Strategy::Neighbor,
            soft_alignment_threshold: Some(0.5),
            ..ReinsertConfig::default()
        };

        let output =
            reinsert_with_config(&source, &target, &alignment, &tag_map, &config).unwrap();
        // source 0's score (0.2) is below threshold, so row 0 is unaligned and
        // the pair anchored there is reported unused instead of being placed.
        assert!(output.unused_tags.contains(&Tag::opening(1)));
    }
}
