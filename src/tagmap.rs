//! [`TagMap`]: the bidirectional opening↔closing tag pairing built once per
//! source sentence (`spec.md` §4.1).

use std::collections::HashMap;

use crate::error::{ReinsertError, ReinsertResult};
use crate::tag::{Tag, TagKind};
use crate::token::Token;

/// A bijection between the opening and closing tags of a balanced source
/// sentence.
///
/// Built by a single stack-based scan: every [`TagKind::Opening`] is pushed,
/// every [`TagKind::Closing`] must match the tag on top of the stack by id
/// or the source is rejected as malformed. This is the standard bracket
/// matcher, and doubles as the well-formedness check `spec.md` §4.1
/// requires ("if the source is not balanced, construction fails").
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    open_to_close: HashMap<Tag, Tag>,
    close_to_open: HashMap<Tag, Tag>,
}

impl TagMap {
    /// Builds a [`TagMap`] from a source token sequence.
    #[tracing::instrument(level = "trace", skip(tokens))]
    pub fn build(tokens: &[Token]) -> ReinsertResult<Self> {
        let mut map = TagMap::default();
        let mut stack: Vec<Tag> = Vec::new();

        for tok in tokens {
            let Token::Tag(tag) = tok else { continue };
            match tag.kind {
                TagKind::Opening => stack.push(*tag),
                TagKind::Isolated => {}
                TagKind::Closing => {
                    let open = stack.pop().ok_or_else(|| {
                        ReinsertError::MalformedSourceMarkup {
                            reason: format!("closing tag id {} has no open tag on the stack", tag.id),
                        }
                    })?;
                    if open.id != tag.id {
                        return Err(ReinsertError::MalformedSourceMarkup {
                            reason: format!(
                                "closing tag id {} does not match innermost open tag id {}",
                                tag.id, open.id
                            ),
                        });
                    }
                    map.open_to_close.insert(open, *tag);
                    map.close_to_open.insert(*tag, open);
                }
            }
        }

        if let Some(unclosed) = stack.pop() {
            return Err(ReinsertError::MalformedSourceMarkup {
                reason: format!("opening tag id {} is never closed", unclosed.id),
            });
        }

        Ok(map)
    }

    /// The closing tag paired with `open`, if `open` is a known opening tag.
    #[inline]
    pub fn closing_for(&self, open: Tag) -> Option<Tag> {
        self.open_to_close.get(&open).copied()
    }

    /// The opening tag paired with `close`, if `close` is a known closing tag.
    #[inline]
    pub fn opening_for(&self, close: Tag) -> Option<Tag> {
        self.close_to_open.get(&close).copied()
    }

    /// `true` if `tag` (opening or closing) is known to this map.
    #[inline]
    pub fn contains(&self, tag: Tag) -> bool {
        match tag.kind {
            TagKind::Opening => self.open_to_close.contains_key(&tag),
            TagKind::Closing => self.close_to_open.contains_key(&tag),
            TagKind::Isolated => false,
        }
    }

    /// Number of pairs in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.open_to_close.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.open_to_close.is_empty()
    }

    /// Iterates over `(opening, closing)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, Tag)> + '_ {
        self.open_to_close.iter().map(|(o, c)| (*o, *c))
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
    fn builds_simple_pair() {
        let tokens = vec![open(1), text("x"), close(1)];
        let map = TagMap::build(&tokens).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.closing_for(Tag::opening(1)), Some(Tag::closing(1)));
        assert_eq!(map.opening_for(Tag::closing(1)), Some(Tag::opening(1)));
    }

    #[test]
    fn builds_nested_pairs() {
        let tokens = vec![open(1), open(2), text("x"), close(2), close(1)];
        let map = TagMap::build(&tokens).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.closing_for(Tag::opening(1)), Some(Tag::closing(1)));
        assert_eq!(map.closing_for(Tag::opening(2)), Some(Tag::closing(2)));
    }

    #[test]
    fn isolated_tags_are_not_in_map() {
        let tokens = vec![iso(9), text("x")];
        let map = TagMap::build(&tokens).unwrap();
        assert!(map.is_empty());
        assert!(!map.contains(Tag::isolated(9)));
    }

    #[test]
    fn rejects_crossing_tags() {
        // <1> <2> text </1> </2>  -- crosses, not nested
        let tokens = vec![open(1), open(2), text("x"), close(1), close(2)];
        let err = TagMap::build(&tokens).unwrap_err();
        assert!(matches!(err, ReinsertError::MalformedSourceMarkup { .. }));
    }

    #[test]
    fn rejects_stray_closing_tag() {
        let tokens = vec![text("x"), close(1)];
        let err = TagMap::build(&tokens).unwrap_err();
        assert!(matches!(err, ReinsertError::MalformedSourceMarkup { .. }));
    }

    #[test]
    fn rejects_unclosed_opening_tag() {
        let tokens = vec![open(1), text("x")];
        let err = TagMap::build(&tokens).unwrap_err();
        assert!(matches!(err, ReinsertError::MalformedSourceMarkup { .. }));
    }

    #[test]
    fn iter_yields_all_pairs() {
        let tokens = vec![open(1), open(2), text("x"), close(2), close(1)];
        let map = TagMap::build(&tokens).unwrap();
        let mut pairs: Vec<_> = map.iter().collect();
        pairs.sort_by_key(|(o, _)| o.id);
        assert_eq!(
            pairs,
            vec![
                (Tag::opening(1), Tag::closing(1)),
                (Tag::opening(2), Tag::closing(2)),
            ]
        );
    }
}
