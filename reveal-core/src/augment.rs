//! Tree augmentation.
//!
//!     One depth-first, left-to-right pass over the lexer tree. A character cursor starts
//!     at the caller's offset and moves forward by one for every character of every text
//!     run, across sibling and nested nodes alike, so a range that straddles two leaves
//!     is still classified correctly.
//!
//!     Each text run is rewritten independently:
//!
//!         - a character inside a range becomes a [`RevealNode::Char`] with its mark;
//!         - consecutive characters outside every range are merged into one text run;
//!         - a run with no tracked character is passed through as-is.
//!
//!     Every tagged node gets a freshly built child list; nothing is spliced in place.
//!     Runs from different leaves are never merged with each other, so untracked text
//!     keeps the leaf boundaries the lexer produced.
//!
//!     The returned cursor is the offset after the last character. Feeding it back as the
//!     start of another pass puts separately tokenized fragments in one offset space.

use crate::ranges::RangeIndex;
use crate::token::{RevealNode, TokenNode, TokenTree};
use log::{debug, trace};

/// An augmented tree and the cursor position after its last character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Augmented<T, M> {
    pub tree: Vec<RevealNode<T, M>>,
    pub cursor: usize,
}

/// Augments `tree` with offsets starting at zero.
pub fn augment<T, M: Clone>(tree: TokenTree<T>, ranges: &RangeIndex<M>) -> Augmented<T, M> {
    augment_from(tree, ranges, 0)
}

/// Augments `tree` with offsets starting at `start`.
pub fn augment_from<T, M: Clone>(
    tree: TokenTree<T>,
    ranges: &RangeIndex<M>,
    start: usize,
) -> Augmented<T, M> {
    let (tree, cursor) = augment_nodes(tree, ranges, start);
    debug!(
        "augmented offsets {}..{} against {} ranges",
        start,
        cursor,
        ranges.len()
    );
    Augmented { tree, cursor }
}

fn augment_nodes<T, M: Clone>(
    nodes: Vec<TokenNode<T>>,
    ranges: &RangeIndex<M>,
    mut cursor: usize,
) -> (Vec<RevealNode<T, M>>, usize) {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            TokenNode::Tagged { tag, children } => {
                let (children, next) = augment_nodes(children, ranges, cursor);
                cursor = next;
                out.push(RevealNode::Tagged { tag, children });
            }
            TokenNode::Text(text) => {
                cursor = split_run(text, ranges, cursor, &mut out);
            }
        }
    }
    (out, cursor)
}

/// Rewrites one text run starting at `cursor` into `out`, returning the next cursor.
fn split_run<T, M: Clone>(
    text: String,
    ranges: &RangeIndex<M>,
    cursor: usize,
    out: &mut Vec<RevealNode<T, M>>,
) -> usize {
    let mut pieces: Vec<RevealNode<T, M>> = Vec::new();
    let mut marked = 0;
    let mut offset = cursor;

    for ch in text.chars() {
        match ranges.classify(offset) {
            Some(hit) => {
                marked += 1;
                pieces.push(RevealNode::Char {
                    ch,
                    mark: hit.to_mark(),
                });
            }
            None => match pieces.last_mut() {
                Some(RevealNode::Text(run)) => run.push(ch),
                _ => pieces.push(RevealNode::Text(ch.to_string())),
            },
        }
        offset += 1;
    }

    if marked == 0 {
        out.push(RevealNode::Text(text));
    } else {
        trace!(
            "split run at {}..{}: {} marked, {} pieces",
            cursor,
            offset,
            marked,
            pieces.len()
        );
        out.extend(pieces);
    }
    offset
}
