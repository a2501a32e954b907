//! Cleanup passes 1–2: evacuate tags from inside BPE fragments, then merge
//! the fragments into whole words.

use std::collections::HashMap;
use std::ops::Range;

use crate::tag::Tag;
use crate::token::{bpe_words, Token, BPE_MARKER};

/// Pass 1. Moves any tag sitting strictly between two fragments of the same
/// word to that word's boundary: openers and isolated tags move to just
/// before the word, closers to just after. A closer and an opener stranded
/// together between fragments never end up interleaved — openers always
/// land before the word, closers always after.
pub fn move_tags_out_of_fragments(tokens: &[Token]) -> Vec<Token> {
    let words = bpe_words(tokens);
    let mut skip = vec![false; tokens.len()];
    let mut pending_before: HashMap<usize, Vec<Tag>> = HashMap::new();
    let mut pending_after: HashMap<usize, Vec<Tag>> = HashMap::new();

    for word in &words {
        if word.len() <= 1 {
            continue;
        }
        let first = word.clone().find(|&i| tokens[i].is_text());
        let last = word.clone().rev().find(|&i| tokens[i].is_text());
        let (Some(first), Some(last)) = (first, last) else {
            continue;
        };
        for i in word.clone() {
            if i <= first || i >= last {
                continue;
            }
            if let Token::Tag(t) = &tokens[i] {
                let t = *t;
                skip[i] = true;
                if t.kind.is_closing() {
                    pending_after.entry(last).or_default().push(t);
                } else {
                    pending_before.entry(first).or_default().push(t);
                }
            }
        }
    }

    let mut out = Vec::with_capacity(tokens.len());
    for (i, tok) in tokens.iter().enumerate() {
        if skip[i] {
            continue;
        }
        if let Some(tags) = pending_before.get(&i) {
            out.extend(tags.iter().map(|&t| Token::Tag(t)));
        }
        out.push(tok.clone());
        if let Some(tags) = pending_after.get(&i) {
            out.extend(tags.iter().map(|&t| Token::Tag(t)));
        }
    }
    out
}

/// Pass 2. Concatenates each maximal run of BPE fragments into one text
/// token, dropping the `@@` markers. Assumes pass 1 has already run, so a
/// multi-fragment word's range contains only text tokens.
pub fn undo_bpe(tokens: &[Token]) -> Vec<Token> {
    let words = bpe_words(tokens);
    let starts: HashMap<usize, Range<usize>> = words
        .into_iter()
        .filter(|w| w.len() > 1)
        .map(|w| (w.start, w))
        .collect();

    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if let Some(word) = starts.get(&i) {
            let mut merged = String::new();
            for j in word.clone() {
                if let Token::Text(t) = &tokens[j] {
                    merged.push_str(t.strip_suffix(BPE_MARKER).unwrap_or(t));
                }
            }
            out.push(Token::text(merged));
            i = word.end;
        } else {
            out.push(tokens[i].clone());
            i += 1;
        }
    }
    out
}
