//! Shared byte-to-token decoding used by every fuzz target: turns an
//! arbitrary byte string into a guaranteed-balanced [`Token`] stream the
//! same way `tests/proptest.rs`'s generator does, just driven by raw bytes
//! instead of a `proptest` strategy.

use markup_reinsert::{Alignments, HardAlignment, Tag, Token};

pub fn balanced_tokens_from_bytes(data: &[u8]) -> Vec<Token> {
    let mut out = Vec::new();
    let mut stack: Vec<u32> = Vec::new();
    let mut next_pair_id = 1u32;
    let mut next_iso_id = 1000u32;
    let mut text_counter = 0u32;

    for &b in data {
        match b % 4 {
            0 => {
                out.push(Token::text(format!("w{text_counter}")));
                text_counter += 1;
            }
            1 => {
                let id = next_pair_id;
                next_pair_id += 1;
                stack.push(id);
                out.push(Token::tag(Tag::opening(id)));
            }
            2 => {
                if let Some(id) = stack.pop() {
                    out.push(Token::tag(Tag::closing(id)));
                } else {
                    out.push(Token::text(format!("w{text_counter}")));
                    text_counter += 1;
                }
            }
            _ => {
                let id = next_iso_id;
                next_iso_id += 1;
                out.push(Token::tag(Tag::isolated(id)));
            }
        }
    }
    while let Some(id) = stack.pop() {
        out.push(Token::tag(Tag::closing(id)));
    }
    out
}

/// Builds a plain target text sequence and a hard alignment from the tail of
/// `data`, each target index pointing at `byte % source_text_len` (or
/// nothing, if `data` runs out first).
pub fn target_and_alignment(data: &[u8], source_text_len: usize) -> (Vec<Token>, Alignments) {
    let target_len = data.len().min(16);
    let target: Vec<Token> = (0..target_len).map(|i| Token::text(format!("t{i}"))).collect();

    let mut pairs = Vec::new();
    for (j, &b) in data.iter().take(target_len).enumerate() {
        if source_text_len == 0 {
            break;
        }
        pairs.push(format!("{}-{j}", b as usize % source_text_len));
    }
    let spec = pairs.join(" ");
    let alignment = Alignments::Hard(
        HardAlignment::parse(&spec, source_text_len.max(1), target_len.max(1))
            .expect("constructed in range by build"),
    );
    (target, alignment)
}
