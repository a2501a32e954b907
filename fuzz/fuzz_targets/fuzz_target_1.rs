#![no_main]

mod common;

use libfuzzer_sys::fuzz_target;
use markup_reinsert::{reinsert, Strategy, TagKind, TagMap, Token};

fn is_well_nested(tokens: &[Token]) -> bool {
    let mut stack: Vec<u32> = Vec::new();
    for tok in tokens {
        if let Token::Tag(tag) = tok {
            match tag.kind {
                TagKind::Opening => stack.push(tag.id),
                TagKind::Closing => {
                    if stack.pop() != Some(tag.id) {
                        return false;
                    }
                }
                TagKind::Isolated => {}
            }
        }
    }
    stack.is_empty()
}

/// Fuzz the full `reinsert()` pipeline: every byte string decodes to a
/// balanced source sentence and a derived alignment, and reinsertion must
/// never panic, must preserve the target's text tokens verbatim, and must
/// always emit well-nested markup.
fuzz_target!(|data: &[u8]| {
    let source = common::balanced_tokens_from_bytes(data);
    let Ok(tag_map) = TagMap::build(&source) else {
        return; // construction guarantees balance, but bail out defensively
    };
    let source_text_len = source.iter().filter(|t| t.is_text()).count();
    let (target, alignment) = common::target_and_alignment(data, source_text_len);

    for strategy in [Strategy::Neighbor, Strategy::Complete] {
        if let Ok(output) = reinsert(&source, &target, &alignment, &tag_map, strategy) {
            let out_text: Vec<&Token> = output.target_tokens.iter().filter(|t| t.is_text()).collect();
            let expected_text: Vec<&Token> = target.iter().collect();
            assert_eq!(out_text, expected_text, "reinsertion altered target text");
            assert!(is_well_nested(&output.target_tokens), "reinsertion produced unbalanced markup");
        }
    }
});
