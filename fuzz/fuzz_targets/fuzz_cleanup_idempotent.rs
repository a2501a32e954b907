#![no_main]

mod common;

use libfuzzer_sys::fuzz_target;
use markup_reinsert::{cleanup, TagMap};

/// Fuzz the cleanup pipeline directly: it must be idempotent on its own
/// output (`spec.md` §8 invariant 5), even when handed an already-messy,
/// non-projected token stream.
fuzz_target!(|data: &[u8]| {
    let source = common::balanced_tokens_from_bytes(data);
    let Ok(tag_map) = TagMap::build(&source) else {
        return;
    };
    // Run the messy input (not necessarily a real projection) through
    // cleanup twice; the second pass must be a no-op.
    let (once, _) = cleanup::run(&source, &source, &tag_map);
    let (twice, _) = cleanup::run(&source, &once, &tag_map);
    assert_eq!(once, twice, "cleanup pipeline is not idempotent");
});
