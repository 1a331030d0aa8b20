//! Renderer-side token trees.

use super::label::MarkLabel;
use super::tree::TokenNode;

/// Where a marked character sits: which range, how far into it, and whether it closes it.
///
/// `meta` is the range's caller-supplied metadata, copied onto every character of the
/// range so the renderer can read it without a second lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharMark<M> {
    pub range: usize,
    pub offset: usize,
    pub is_last: bool,
    pub meta: M,
}

impl<M> CharMark<M> {
    /// The metadata-free part of the mark, as addressed by renderers.
    pub fn label(&self) -> MarkLabel {
        MarkLabel {
            range: self.range,
            offset: self.offset,
            is_last: self.is_last,
        }
    }
}

/// A node of an augmented token tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RevealNode<T, M> {
    /// A merged run of characters outside every range.
    Text(String),

    /// A single character inside a range.
    Char { ch: char, mark: CharMark<M> },

    /// A tagged span, same tag as in the lexer tree.
    Tagged {
        tag: T,
        children: Vec<RevealNode<T, M>>,
    },
}

impl<T, M> RevealNode<T, M> {
    pub fn is_marked(&self) -> bool {
        matches!(self, RevealNode::Char { .. })
    }

    pub fn char_len(&self) -> usize {
        match self {
            RevealNode::Text(text) => text.chars().count(),
            RevealNode::Char { .. } => 1,
            RevealNode::Tagged { children, .. } => {
                children.iter().map(RevealNode::char_len).sum()
            }
        }
    }

    pub fn write_text(&self, out: &mut String) {
        match self {
            RevealNode::Text(text) => out.push_str(text),
            RevealNode::Char { ch, .. } => out.push(*ch),
            RevealNode::Tagged { children, .. } => {
                for child in children {
                    child.write_text(out);
                }
            }
        }
    }

    /// Visits every leaf in document order.
    pub fn for_each_leaf<'a>(&'a self, f: &mut impl FnMut(&'a RevealNode<T, M>)) {
        match self {
            RevealNode::Tagged { children, .. } => {
                for child in children {
                    child.for_each_leaf(f);
                }
            }
            leaf => f(leaf),
        }
    }
}

/// Lifts a lexer tree unchanged; the augmented form of a tree with no ranges.
impl<T, M> From<TokenNode<T>> for RevealNode<T, M> {
    fn from(node: TokenNode<T>) -> Self {
        match node {
            TokenNode::Text(text) => RevealNode::Text(text),
            TokenNode::Tagged { tag, children } => RevealNode::Tagged {
                tag,
                children: children.into_iter().map(RevealNode::from).collect(),
            },
        }
    }
}
