//! Lexer-side token trees.

/// A node of a token tree as produced by the lexer.
///
/// `T` is the lexer's tag vocabulary (a lexical category such as `"keyword"`, or a
/// structured value). It is carried through augmentation untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenNode<T> {
    /// A run of plain text.
    Text(String),

    /// A tagged span owning an ordered list of children.
    Tagged { tag: T, children: Vec<TokenNode<T>> },
}

/// An ordered forest of token nodes; the top level of a tokenized snippet.
pub type TokenTree<T> = Vec<TokenNode<T>>;

impl<T> TokenNode<T> {
    pub fn text(text: impl Into<String>) -> Self {
        TokenNode::Text(text.into())
    }

    pub fn tagged(tag: T, children: Vec<TokenNode<T>>) -> Self {
        TokenNode::Tagged { tag, children }
    }

    /// Number of characters this node contributes to the flattened text.
    pub fn char_len(&self) -> usize {
        match self {
            TokenNode::Text(text) => text.chars().count(),
            TokenNode::Tagged { children, .. } => children.iter().map(TokenNode::char_len).sum(),
        }
    }

    /// Appends this node's text, in document order, to `out`.
    pub fn write_text(&self, out: &mut String) {
        match self {
            TokenNode::Text(text) => out.push_str(text),
            TokenNode::Tagged { children, .. } => {
                for child in children {
                    child.write_text(out);
                }
            }
        }
    }
}

/// Concatenates every text run of `tree` in document order.
///
/// This is the snippet text that ranges are located in.
pub fn flatten<T>(tree: &[TokenNode<T>]) -> String {
    let mut out = String::new();
    for node in tree {
        node.write_text(&mut out);
    }
    out
}
