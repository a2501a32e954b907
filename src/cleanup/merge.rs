//! Cleanup pass 6: neighbor-pair merge. A run of closing tags immediately
//! followed by a run of opening tags — with nothing else between them —
//! collapses away entirely when the opening run exactly mirrors the closing
//! run (same ids, reverse order): `</X><X>` or the nested form
//! `</X></Y><Y><X>`. Either is a no-op reopening of exactly what was just
//! closed, so removing both runs merges the two pair instances into one
//! continuous span. Repeats until no further merge applies, since merging
//! one run can expose a new adjacency.

use crate::token::Token;

pub fn merge_neighbor_pairs(tokens: &[Token]) -> Vec<Token> {
    let mut current = tokens.to_vec();
    loop {
        let mut out = Vec::with_capacity(current.len());
        let mut changed = false;
        let mut i = 0;
        while i < current.len() {
            let mut j = i;
            while j < current.len() && current[j].as_tag().is_some_and(|t| t.kind.is_closing()) {
                j += 1;
            }
            if j > i {
                let mut k = j;
                while k < current.len() && current[k].as_tag().is_some_and(|t| t.kind.is_opening()) {
                    k += 1;
                }
                let closing_ids: Vec<u32> = current[i..j]
                    .iter()
                    .map(|t| t.as_tag().unwrap().id)
                    .collect();
                let opening_ids: Vec<u32> = current[j..k]
                    .iter()
                    .map(|t| t.as_tag().unwrap().id)
                    .collect();
                if closing_ids.len() == opening_ids.len() {
                    let mirrors = closing_ids.iter().rev().eq(opening_ids.iter());
                    if mirrors && !closing_ids.is_empty() {
                        changed = true;
                        i = k;
                        continue;
                    }
                }
            }
            out.push(current[i].clone());
            i += 1;
        }
        current = out;
        if !changed {
            return current;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Tag;

    fn open(id: u32) -> Token {
        Token::tag(Tag::opening(id))
    }
    fn close(id: u32) -> Token {
        Token::tag(Tag::closing(id))
    }
    fn text(s: &'static str) -> Token {
        Token::text(s)
    }

    #[test]
    fn merges_single_id_neighbor_pair() {
        let tokens = vec![
            open(1),
            text("a"),
            close(1),
            open(1),
            text("b"),
            close(1),
        ];
        assert_eq!(
            merge_neighbor_pairs(&tokens),
            vec![open(1), text("a"), text("b"), close(1)]
        );
    }

    #[test]
    fn merges_nested_mirrored_pair() {
        let tokens = vec![
            open(1),
            open(2),
            text("a"),
            close(1),
            close(2),
            open(2),
            open(1),
            text("b"),
            close(1),
            close(2),
        ];
        assert_eq!(
            merge_neighbor_pairs(&tokens),
            vec![open(1), open(2), text("a"), text("b"), close(1), close(2)]
        );
    }

    #[test]
    fn leaves_non_mirrored_adjacency_alone() {
        let tokens = vec![close(1), open(2), text("a")];
        assert_eq!(merge_neighbor_pairs(&tokens), tokens);
    }

    #[test]
    fn leaves_pairs_separated_by_text_alone() {
        let tokens = vec![
            open(1),
            text("a"),
            close(1),
            text("gap"),
            open(1),
            text("b"),
            close(1),
        ];
        assert_eq!(merge_neighbor_pairs(&tokens), tokens);
    }
}
