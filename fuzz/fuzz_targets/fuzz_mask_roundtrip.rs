#![no_main]

mod common;

use libfuzzer_sys::fuzz_target;
use markup_reinsert::{mask, unmask, MaskConfig};

/// Fuzz masking: mask-then-unmask must be the identity on any token
/// sequence (`spec.md` §8 invariant 6).
fuzz_target!(|data: &[u8]| {
    let tokens = common::balanced_tokens_from_bytes(data);
    let config = MaskConfig::default();
    let masked = mask(&tokens, &config);
    assert_eq!(unmask(&masked), tokens, "mask/unmask round trip is not the identity");
});
