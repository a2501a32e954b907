//! Word alignments between source and target text tokens (`spec.md` §4.2).
//!
//! Two wire formats are supported behind one query surface: hard 1-to-many
//! pairs (`HardAlignment`) and a soft score matrix (`SoftAlignment`). All
//! indices are in *text-only* coordinates — tag tokens are never counted,
//! matching `spec.md` §4.2's "Queries return indices in the text-only
//! coordinate space".

use std::collections::HashMap;
use std::collections::HashSet;

use crate::error::{AlignmentSide, ReinsertError, ReinsertResult};

/// Unified read interface shared by [`HardAlignment`] and [`SoftAlignment`],
/// used by the core reinsertion step (`spec.md` §4.6). Threshold-aware
/// queries are Soft-only extensions and live as inherent methods on
/// [`SoftAlignment`] instead, per `spec.md` §4.2 ("not required by core
/// reinsertion but part of its contract").
pub trait AlignmentQuery {
    /// The best (first, for hard; argmax, for soft) source text index
    /// aligned to target text index `j`, or `None` if none is aligned.
    fn best_source(&self, j: usize) -> Option<usize>;

    /// All source text indices aligned to target text index `j`.
    fn sources_for(&self, j: usize) -> Vec<usize>;

    /// The set of source text indices that are the alignment target of at
    /// least one target text-token row ("pointed source tokens",
    /// `spec.md` glossary).
    fn pointed_source_tokens(&self) -> HashSet<usize>;

    /// Number of target text tokens this alignment was built over.
    fn target_len(&self) -> usize;

    /// Number of source text tokens this alignment was built over.
    fn source_len(&self) -> usize;
}

/// A hard alignment: a set of `i-j` source→target index pairs.
#[derive(Debug, Clone, Default)]
pub struct HardAlignment {
    source_len: usize,
    target_len: usize,
    /// target index -> source indices aligned to it, in the order the pairs
    /// were parsed (so "first" is well defined for `best_source`).
    by_target: HashMap<usize, Vec<usize>>,
}

impl HardAlignment {
    /// Parses a hard alignment from a space-separated list of `i-j` pairs
    /// (fairseq/Moses alignment format), e.g. `"0-0 1-1 2-2"`.
    pub fn parse(spec: &str, source_len: usize, target_len: usize) -> ReinsertResult<Self> {
        let mut by_target: HashMap<usize, Vec<usize>> = HashMap::new();
        for pair in spec.split_whitespace() {
            let (i_str, j_str) = pair.split_once('-').ok_or_else(|| {
                ReinsertError::MalformedSourceMarkup {
                    reason: format!("malformed alignment pair: {pair:?}"),
                }
            })?;
            let i: usize = i_str.parse().map_err(|_| ReinsertError::MalformedSourceMarkup {
                reason: format!("non-numeric source index in pair: {pair:?}"),
            })?;
            let j: usize = j_str.parse().map_err(|_| ReinsertError::MalformedSourceMarkup {
                reason: format!("non-numeric target index in pair: {pair:?}"),
            })?;
            if i >= source_len {
                return Err(ReinsertError::AlignmentShapeMismatch {
                    side: AlignmentSide::Source,
                    index: i,
                    len: source_len,
                });
            }
            if j >= target_len {
                return Err(ReinsertError::AlignmentShapeMismatch {
                    side: AlignmentSide::Target,
                    index: j,
                    len: target_len,
                });
            }
            by_target.entry(j).or_default().push(i);
        }
        Ok(Self {
            source_len,
            target_len,
            by_target,
        })
    }
}

impl AlignmentQuery for HardAlignment {
    fn best_source(&self, j: usize) -> Option<usize> {
        self.by_target.get(&j).and_then(|v| v.first().copied())
    }

    fn sources_for(&self, j: usize) -> Vec<usize> {
        self.by_target.get(&j).cloned().unwrap_or_default()
    }

    fn pointed_source_tokens(&self) -> HashSet<usize> {
        self.by_target.values().flatten().copied().collect()
    }

    fn target_len(&self) -> usize {
        self.target_len
    }

    fn source_len(&self) -> usize {
        self.source_len
    }
}

/// A soft alignment: a matrix of scores, rows = target tokens (including the
/// sentence-end pseudo-token), cols = source tokens (including sentence-end).
#[derive(Debug, Clone)]
pub struct SoftAlignment {
    /// `scores[j][i]` = score of aligning target row `j` to source column `i`.
    scores: Vec<Vec<f32>>,
}

impl SoftAlignment {
    /// Builds a soft alignment from a row-major score matrix. Every row must
    /// have the same number of columns.
    pub fn new(scores: Vec<Vec<f32>>) -> ReinsertResult<Self> {
        if let Some(first) = scores.first() {
            let width = first.len();
            if scores.iter().any(|row| row.len() != width) {
                return Err(ReinsertError::MalformedSourceMarkup {
                    reason: "soft alignment matrix rows have inconsistent width".to_string(),
                });
            }
        }
        Ok(Self { scores })
    }

    fn row(&self, j: usize) -> Option<&[f32]> {
        self.scores.get(j).map(|r| r.as_slice())
    }

    fn argmax(row: &[f32]) -> Option<usize> {
        row.iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }

    /// Argmax source column for target row `j`, or `None` if `j` is out of
    /// range, or if `threshold` is given and the max score falls below it
    /// (`spec.md` §4.2: "optional threshold returns -1 when max is below it").
    pub fn best_source_thresholded(&self, j: usize, threshold: Option<f32>) -> Option<usize> {
        let row = self.row(j)?;
        let idx = Self::argmax(row)?;
        if let Some(t) = threshold {
            if row[idx] < t {
                return None;
            }
        }
        Some(idx)
    }

    /// All source columns for target row `j` whose score is `>= threshold`.
    pub fn sources_for_thresholded(&self, j: usize, threshold: f32) -> Vec<usize> {
        match self.row(j) {
            Some(row) => row
                .iter()
                .enumerate()
                .filter(|(_, &score)| score >= threshold)
                .map(|(i, _)| i)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Converts this soft alignment to a [`HardAlignment`] using either a
    /// fixed threshold (`Some`) or plain argmax (`None`) per row.
    pub fn to_hard(&self, threshold: Option<f32>) -> HardAlignment {
        let mut by_target = HashMap::new();
        for (j, row) in self.scores.iter().enumerate() {
            let sources: Vec<usize> = match threshold {
                Some(t) => row
                    .iter()
                    .enumerate()
                    .filter(|(_, &s)| s >= t)
                    .map(|(i, _)| i)
                    .collect(),
                None => Self::argmax(row).into_iter().collect(),
            };
            if !sources.is_empty() {
                by_target.insert(j, sources);
            }
        }
        HardAlignment {
            source_len: self.source_len(),
            target_len: self.target_len(),
            by_target,
        }
    }

    /// Shifts every row/column index by `delta` (can be negative), dropping
    /// entries that would fall out of range. Used when a caller re-bases
    /// indices after trimming leading tokens from one side.
    pub fn shift(&self, source_delta: i64, target_delta: i64) -> Self {
        let shift_rows = |scores: &[Vec<f32>]| -> Vec<Vec<f32>> {
            let target_len = (scores.len() as i64 + target_delta).max(0) as usize;
            let source_len = scores.first().map_or(0, |r| r.len());
            let shifted_source_len = (source_len as i64 + source_delta).max(0) as usize;
            let mut out = vec![vec![0.0_f32; shifted_source_len]; target_len];
            for (j, row) in scores.iter().enumerate() {
                let new_j = j as i64 + target_delta;
                if new_j < 0 || new_j as usize >= target_len {
                    continue;
                }
                for (i, &score) in row.iter().enumerate() {
                    let new_i = i as i64 + source_delta;
                    if new_i < 0 || new_i as usize >= shifted_source_len {
                        continue;
                    }
                    out[new_j as usize][new_i as usize] = score;
                }
            }
            out
        };
        Self {
            scores: shift_rows(&self.scores),
        }
    }
}

impl AlignmentQuery for SoftAlignment {
    fn best_source(&self, j: usize) -> Option<usize> {
        self.best_source_thresholded(j, None)
    }

    fn sources_for(&self, j: usize) -> Vec<usize> {
        self.best_source(j).into_iter().collect()
    }

    fn pointed_source_tokens(&self) -> HashSet<usize> {
        self.scores
            .iter()
            .filter_map(|row| Self::argmax(row))
            .collect()
    }

    fn target_len(&self) -> usize {
        self.scores.len()
    }

    fn source_len(&self) -> usize {
        self.scores.first().map_or(0, |r| r.len())
    }
}

/// Either alignment representation, dispatched by the reinsertion core
/// through [`AlignmentQuery`].
#[derive(Debug, Clone)]
pub enum Alignments {
    Hard(HardAlignment),
    Soft(SoftAlignment),
}

impl AlignmentQuery for Alignments {
    fn best_source(&self, j: usize) -> Option<usize> {
        match self {
            Self::Hard(h) => h.best_source(j),
            Self::Soft(s) => s.best_source(j),
        }
    }

    fn sources_for(&self, j: usize) -> Vec<usize> {
        match self {
            Self::Hard(h) => h.sources_for(j),
            Self::Soft(s) => s.sources_for(j),
        }
    }

    fn pointed_source_tokens(&self) -> HashSet<usize> {
        match self {
            Self::Hard(h) => h.pointed_source_tokens(),
            Self::Soft(s) => s.pointed_source_tokens(),
        }
    }

    fn target_len(&self) -> usize {
        match self {
            Self::Hard(h) => h.target_len(),
            Self::Soft(s) => s.target_len(),
        }
    }

    fn source_len(&self) -> usize {
        match self {
            Self::Hard(h) => h.source_len(),
            Self::Soft(s) => s.source_len(),
        }
    }
}
