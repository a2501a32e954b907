//! Tunable knobs for the reinsertion pipeline, mirroring the teacher's
//! `ParserConfig`/`RenderConfig` pair: a plain `Default`-able struct rather
//! than a file-backed loader, since the core itself does no I/O.

use crate::mask::MaskConfig;
use crate::project::Strategy;

/// Configuration for a [`crate::reinsert`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct ReinsertConfig {
    /// Which reinsertion rule to apply (`spec.md` §4.6).
    pub strategy: Strategy,

    /// Score cutoff a [`crate::alignment::SoftAlignment`] row's argmax must
    /// clear to count as an alignment at all (`spec.md` §4.2: "the caller
    /// must supply one", so there is deliberately no crate-wide default
    /// value — `None` here means plain argmax, never thresholded).
    pub soft_alignment_threshold: Option<f32>,

    /// Sentinel text used by [`crate::mask::mask`] at sentence edges.
    pub mask: MaskConfig,
}

impl Default for ReinsertConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Neighbor,
            soft_alignment_threshold: None,
            mask: MaskConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_neighbor_strategy_and_plain_argmax() {
        let config = ReinsertConfig::default();
        assert_eq!(config.strategy, Strategy::Neighbor);
        assert_eq!(config.soft_alignment_threshold, None);
    }
}
