//! Testing helpers for token trees.
//!
//! Builders keep test trees short (`tagged("keyword", vec![text("const")])`), and the
//! inspection helpers look at an augmented tree the way the renderer does: as a flat
//! sequence of leaves, one position per character.

use crate::token::{MarkLabel, RevealNode, TokenNode};

/// A text leaf with a `String` tag type.
pub fn text(text: &str) -> TokenNode<String> {
    TokenNode::Text(text.to_string())
}

/// A tagged node with a `String` tag type.
pub fn tagged(tag: &str, children: Vec<TokenNode<String>>) -> TokenNode<String> {
    TokenNode::Tagged {
        tag: tag.to_string(),
        children,
    }
}

/// Every leaf in document order.
pub fn leaves<T, M>(tree: &[RevealNode<T, M>]) -> Vec<&RevealNode<T, M>> {
    let mut out = Vec::new();
    for node in tree {
        node.for_each_leaf(&mut |leaf| out.push(leaf));
    }
    out
}

/// One entry per leaf: text runs as their text, marked characters as `<ch>@<label>`.
pub fn labels<T, M>(tree: &[RevealNode<T, M>]) -> Vec<String> {
    leaves(tree)
        .into_iter()
        .filter_map(|leaf| match leaf {
            RevealNode::Text(text) => Some(text.clone()),
            RevealNode::Char { ch, mark } => Some(format!("{}@{}", ch, mark.label())),
            RevealNode::Tagged { .. } => None,
        })
        .collect()
}

/// The label of every character position; `None` where the character is untracked.
pub fn marks_by_offset<T, M>(tree: &[RevealNode<T, M>]) -> Vec<Option<MarkLabel>> {
    let mut out = Vec::new();
    for leaf in leaves(tree) {
        match leaf {
            RevealNode::Text(text) => out.extend(text.chars().map(|_| None)),
            RevealNode::Char { mark, .. } => out.push(Some(mark.label())),
            RevealNode::Tagged { .. } => {}
        }
    }
    out
}

/// The label at character position `offset`, rendered as a string.
pub fn label_at<T, M>(tree: &[RevealNode<T, M>], offset: usize) -> Option<String> {
    marks_by_offset(tree)
        .get(offset)
        .copied()
        .flatten()
        .map(|label| label.to_string())
}

/// Whether any child list in `tree` holds two text runs side by side.
pub fn has_adjacent_text<T, M>(tree: &[RevealNode<T, M>]) -> bool {
    tree.windows(2)
        .any(|pair| matches!(pair, [RevealNode::Text(_), RevealNode::Text(_)]))
        || tree.iter().any(|node| match node {
            RevealNode::Tagged { children, .. } => has_adjacent_text(children),
            _ => false,
        })
}

/// Merges neighbouring text runs and drops empty ones, recursively.
///
/// Useful for generating lexer trees whose leaf boundaries all sit next to a tag.
pub fn normalize<T>(tree: Vec<TokenNode<T>>) -> Vec<TokenNode<T>> {
    let mut out: Vec<TokenNode<T>> = Vec::with_capacity(tree.len());
    for node in tree {
        match node {
            TokenNode::Text(text) if text.is_empty() => {}
            TokenNode::Text(text) => match out.last_mut() {
                Some(TokenNode::Text(run)) => run.push_str(&text),
                _ => out.push(TokenNode::Text(text)),
            },
            TokenNode::Tagged { tag, children } => out.push(TokenNode::Tagged {
                tag,
                children: normalize(children),
            }),
        }
    }
    out
}
