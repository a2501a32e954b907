//! [`SplitTagsSentence`]: peeling sentence-spanning wrapper tags off the
//! source before per-token projection touches it (`spec.md` §4.3).

use std::collections::HashSet;

use crate::tag::{Tag, TagKind};
use crate::tagmap::TagMap;
use crate::token::Token;

/// A source sentence decomposed into a tag prefix, an inner region, and a
/// tag suffix.
///
/// `prefixTags` are tags that enclose the *whole* inner region; `suffixTags`
/// are their closers, plus any trailing isolated tags; `inner` is
/// everything else. This lets the projection step (`spec.md` §4.6) treat
/// sentence-level wrappers as fixed scaffolding that per-token alignment
/// can never disturb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitTagsSentence {
    pub prefix_tags: Vec<Token>,
    pub inner: Vec<Token>,
    pub suffix_tags: Vec<Token>,
}

impl SplitTagsSentence {
    /// Splits `tokens` per `spec.md` §4.3:
    ///
    /// 1. Peel every leading tag into a prefix candidate run.
    /// 2. Peel every trailing tag into a suffix candidate run.
    /// 3. A tag only really belongs to the sentence-spanning wrapper if
    ///    *both* halves of its pair landed in a candidate run: an opening
    ///    tag in the prefix candidate belongs iff its closer is in the
    ///    suffix candidate, and symmetrically for a closing tag in the
    ///    suffix candidate. Otherwise it is demoted back into `inner`, right
    ///    where it originally sat. Isolated tags have no partner to fail
    ///    this check against, so they always belong — they're exactly the
    ///    "trailing isolated tags" the final shape keeps.
    ///
    /// Checking both directions matters: a leading tag whose pair closes
    /// mid-sentence (not at the very end) is not a sentence wrapper at all,
    /// just an ordinary inner pair that happens to start at position zero,
    /// and per-token projection must be free to move it.
    #[tracing::instrument(level = "trace", skip(tokens, tag_map))]
    pub fn split(tokens: &[Token], tag_map: &TagMap) -> Self {
        let mut prefix_end = 0;
        while prefix_end < tokens.len() && tokens[prefix_end].is_tag() {
            prefix_end += 1;
        }
        let prefix_candidate: Vec<Token> = tokens[..prefix_end].to_vec();

        let mut suffix_start = tokens.len();
        while suffix_start > prefix_end && tokens[suffix_start - 1].is_tag() {
            suffix_start -= 1;
        }
        let suffix_candidate: Vec<Token> = tokens[suffix_start..].to_vec();
        let inner_middle: Vec<Token> = tokens[prefix_end..suffix_start].to_vec();

        let prefix_set: HashSet<Tag> = prefix_candidate.iter().filter_map(Token::as_tag).collect();
        let suffix_set: HashSet<Tag> = suffix_candidate.iter().filter_map(Token::as_tag).collect();

        let mut prefix_tags = Vec::with_capacity(prefix_candidate.len());
        let mut demoted_prefix = Vec::new();
        for tok in prefix_candidate {
            let Some(tag) = tok.as_tag() else {
                prefix_tags.push(tok);
                continue;
            };
            let belongs = match tag.kind {
                TagKind::Isolated => true,
                TagKind::Opening => tag_map
                    .closing_for(tag)
                    .is_some_and(|close| suffix_set.contains(&close)),
                TagKind::Closing => tag_map
                    .opening_for(tag)
                    .is_some_and(|open| prefix_set.contains(&open)),
            };
            if belongs {
                prefix_tags.push(tok);
            } else {
                demoted_prefix.push(tok);
            }
        }

        let mut suffix_tags = Vec::with_capacity(suffix_candidate.len());
        let mut demoted_suffix = Vec::new();
        for tok in suffix_candidate {
            let Some(tag) = tok.as_tag() else {
                suffix_tags.push(tok);
                continue;
            };
            let belongs = match tag.kind {
                TagKind::Isolated => true,
                TagKind::Closing => tag_map
                    .opening_for(tag)
                    .is_some_and(|open| prefix_set.contains(&open)),
                TagKind::Opening => tag_map
                    .closing_for(tag)
                    .is_some_and(|close| suffix_set.contains(&close)),
            };
            if belongs {
                suffix_tags.push(tok);
            } else {
                demoted_suffix.push(tok);
            }
        }

        let mut inner = Vec::with_capacity(demoted_prefix.len() + inner_middle.len() + demoted_suffix.len());
        inner.extend(demoted_prefix);
        inner.extend(inner_middle);
        inner.extend(demoted_suffix);

        Self {
            prefix_tags,
            inner,
            suffix_tags,
        }
    }

    /// Reassembles the original token order (prefix ++ inner ++ suffix).
    /// Used by tests to assert the split is a lossless repartition.
    pub fn reassemble(&self) -> Vec<Token> {
        let mut out = Vec::with_capacity(self.prefix_tags.len() + self.inner.len() + self.suffix_tags.len());
        out.extend(self.prefix_tags.iter().cloned());
        out.extend(self.inner.iter().cloned());
        out.extend(self.suffix_tags.iter().cloned());
        out
    }
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

    #[test]
    fn whole_sentence_wrapper_splits_cleanly() {
        let tokens = vec![open(1), text("hello"), text("world"), close(1)];
        let map = TagMap::build(&tokens).unwrap();
        let split = SplitTagsSentence::split(&tokens, &map);
        assert_eq!(split.prefix_tags, vec![open(1)]);
        assert_eq!(split.inner, vec![text("hello"), text("world")]);
        assert_eq!(split.suffix_tags, vec![close(1)]);
    }

    #[test]
    fn trailing_isolated_tag_is_kept_in_suffix() {
        let tokens = vec![text("hello"), iso(9)];
        let map = TagMap::build(&tokens).unwrap();
        let split = SplitTagsSentence::split(&tokens, &map);
        assert!(split.prefix_tags.is_empty());
        assert_eq!(split.inner, vec![text("hello")]);
        assert_eq!(split.suffix_tags, vec![iso(9)]);
    }

    #[test]
    fn closing_tag_whose_opener_is_inside_inner_is_demoted() {
        // <1> text <2> more </2> </1>  but only <1>/</1> span whole sentence;
        // <2></2> is fully interior so it must never be peeled into prefix/suffix.
        let tokens = vec![
            open(1),
            text("text"),
            open(2),
            text("more"),
            close(2),
            close(1),
        ];
        let map = TagMap::build(&tokens).unwrap();
        let split = SplitTagsSentence::split(&tokens, &map);
        assert_eq!(split.prefix_tags, vec![open(1)]);
        assert_eq!(split.suffix_tags, vec![close(1)]);
        assert_eq!(
            split.inner,
            vec![text("text"), open(2), text("more"), close(2)]
        );
    }

    #[test]
    fn multiple_nested_wrappers_split_outermost_to_innermost() {
        let tokens = vec![open(1), open(2), text("x"), close(2), close(1)];
        let map = TagMap::build(&tokens).unwrap();
        let split = SplitTagsSentence::split(&tokens, &map);
        assert_eq!(split.prefix_tags, vec![open(1), open(2)]);
        assert_eq!(split.suffix_tags, vec![close(2), close(1)]);
        assert_eq!(split.inner, vec![text("x")]);
    }

    #[test]
    fn no_edge_tags_leaves_everything_inner() {
        let tokens = vec![text("a"), open(1), text("b"), close(1), text("c")];
        let map = TagMap::build(&tokens).unwrap();
        let split = SplitTagsSentence::split(&tokens, &map);
        assert!(split.prefix_tags.is_empty());
        assert!(split.suffix_tags.is_empty());
        assert_eq!(split.inner, tokens);
    }

    #[test]
    fn leading_pair_that_closes_mid_sentence_is_not_a_wrapper() {
        // <1> closes right after the first word, not at the sentence end,
        // so it must not be frozen into prefixTags even though it starts
        // there; <2></2> is the real (if accidental) trailing pair here.
        let tokens = vec![
            open(1),
            text("This"),
            close(1),
            text("is"),
            open(2),
            text("test"),
            close(2),
        ];
        let map = TagMap::build(&tokens).unwrap();
        let split = SplitTagsSentence::split(&tokens, &map);
        assert!(split.prefix_tags.is_empty());
        assert!(split.suffix_tags.is_empty());
        assert_eq!(split.inner, tokens);
    }

    #[test]
    fn reassemble_is_lossless() {
        let tokens = vec![open(1), text("x"), open(2), text("y"), close(2), close(1)];
        let map = TagMap::build(&tokens).unwrap();
        let split = SplitTagsSentence::split(&tokens, &map);
        assert_eq!(split.reassemble(), tokens);
    }
}
