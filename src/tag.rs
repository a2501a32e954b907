//! Tag identity: the kind/id vocabulary shared by every pass in the pipeline.
//!
//! A [`Tag`] is the unit the rest of the crate reasons about. It carries no
//! payload beyond its kind and numeric id — the kind/id pair is the whole
//! identity, per `spec.md` §3 ("Two tags are equal iff kind and id match").

use std::fmt;

/// The role a markup token plays in the source sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Opens a span; has exactly one matching [`TagKind::Closing`] with the
    /// same id.
    Opening,

    /// Closes a span opened by a [`TagKind::Opening`] of the same id.
    Closing,

    /// A stand-alone marker with no partner (line break, placeholder, …).
    Isolated,
}

impl TagKind {
    /// Returns `true` for [`TagKind::Opening`] or [`TagKind::Closing`] —
    /// i.e. this kind is one half of a pair.
    #[inline]
    pub fn is_pair_half(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }

    /// Returns `true` for [`TagKind::Opening`].
    #[inline]
    pub fn is_opening(self) -> bool {
        matches!(self, Self::Opening)
    }

    /// Returns `true` for [`TagKind::Closing`].
    #[inline]
    pub fn is_closing(self) -> bool {
        matches!(self, Self::Closing)
    }

    /// Returns `true` for [`TagKind::Isolated`].
    #[inline]
    pub fn is_isolated(self) -> bool {
        matches!(self, Self::Isolated)
    }

    /// The one-character marker used by the native wire encoding (`spec.md`
    /// §6): a fixed character per kind, chosen disjoint from any `id` byte
    /// range the caller could produce.
    #[inline]
    pub fn marker(self) -> char {
        match self {
            Self::Opening => '\u{0}',
            Self::Closing => '\u{1}',
            Self::Isolated => '\u{2}',
        }
    }
}

/// An inline markup token, distinguishable from ordinary text tokens.
///
/// `id` identifies the tag *instance* within a sentence: two [`Tag`]s with
/// the same `kind` and `id` are the same markup element seen at two
/// positions (an opening tag is typically seen once; a tag can also be
/// legitimately duplicated by the nesting-balance pass, per `spec.md` §4.7
/// step 5, which clones a pair across an overlap split).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    pub kind: TagKind,
    pub id: u32,
}

impl Tag {
    #[inline]
    pub fn opening(id: u32) -> Self {
        Self {
            kind: TagKind::Opening,
            id,
        }
    }

    #[inline]
    pub fn closing(id: u32) -> Self {
        Self {
            kind: TagKind::Closing,
            id,
        }
    }

    #[inline]
    pub fn isolated(id: u32) -> Self {
        Self {
            kind: TagKind::Isolated,
            id,
        }
    }

    /// Returns the partner kind this tag would pair with (`Opening` ↔
    /// `Closing`); `None` for isolated tags, which never pair.
    #[inline]
    pub fn partner_kind(self) -> Option<TagKind> {
        match self.kind {
            TagKind::Opening => Some(TagKind::Closing),
            TagKind::Closing => Some(TagKind::Opening),
            TagKind::Isolated => None,
        }
    }

    /// Encodes the tag in the native two-character wire format (`spec.md`
    /// §6): `(kindMarker, CHARBASE + id)`.
    pub fn encode(self) -> [char; 2] {
        const CHARBASE: u32 = 0x2100; // outside any text-bearing code point the NMT layer emits
        let id_char = char::from_u32(CHARBASE + self.id).unwrap_or('\u{FFFD}');
        [self.kind.marker(), id_char]
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TagKind::Opening => write!(f, "<{}>", self.id),
            TagKind::Closing => write!(f, "</{}>", self.id),
            TagKind::Isolated => write!(f, "<{}/>", self.id),
        }
    }
}
