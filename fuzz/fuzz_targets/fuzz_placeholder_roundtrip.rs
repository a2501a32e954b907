#![no_main]

mod common;

use libfuzzer_sys::fuzz_target;
use markup_reinsert::{restore_empty_pairs, substitute_empty_pairs, TagMap};

/// Fuzz empty-pair substitution: replacing empty pairs with isolated
/// placeholders, then restoring them, must be the identity (`spec.md` §8
/// invariant 7).
fuzz_target!(|data: &[u8]| {
    let tokens = common::balanced_tokens_from_bytes(data);
    if TagMap::build(&tokens).is_err() {
        return;
    }
    let (substituted, map) = substitute_empty_pairs(&tokens);
    assert_eq!(
        restore_empty_pairs(&substituted, &map),
        tokens,
        "empty-pair substitution round trip is not the identity"
    );
});
