//! The lexer's JSON shape.
//!
//! Token trees travel as JSON produced by the lexer:
//!
//!     tree     := [node, ...]  |  { "tokens": [node, ...], ... }
//!     node     := "text"  |  [tag, children]
//!     children := "text"  |  [node, ...]
//!
//! Tags are arbitrary JSON, deserialized into the caller's tag type. `[tag, "text"]` is
//! the lexer's shorthand for a tagged node with a single text child; it is read as
//! such, and written back the same way.
//!
//! On the way out, a marked character is written as `[label, "c"]` where `label` is its
//! [`MarkLabel`](crate::MarkLabel), e.g. `["char:0:3:last", "x"]`. A renderer that only
//! knows the lexer shape sees marked characters as ordinary tagged spans.
//!
//! Parsing fails on the first node that fits neither form; the error names the node by
//! its path of child indices from the root, e.g. `$[2][1][0]`.

use crate::token::{RevealNode, TokenNode, TokenTree};
use serde::de::DeserializeOwned;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Position of a node in a JSON token tree, as child indices from the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    fn child(&self, index: usize) -> NodePath {
        let mut path = self.0.clone();
        path.push(index);
        NodePath(path)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for index in &self.0 {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}

/// Errors raised while reading a JSON token tree
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// The input is not JSON at all.
    Json(String),
    /// A node is neither text nor a `[tag, children]` pair.
    Malformed { path: NodePath, reason: String },
    /// A tag could not be deserialized into the tag type.
    Tag { path: NodePath, message: String },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Json(msg) => write!(f, "Invalid JSON: {}", msg),
            TreeError::Malformed { path, reason } => {
                write!(f, "Malformed token at {}: {}", path, reason)
            }
            TreeError::Tag { path, message } => write!(f, "Invalid tag at {}: {}", path, message),
        }
    }
}

impl std::error::Error for TreeError {}

/// Parses a JSON token tree.
pub fn parse_token_tree<T: DeserializeOwned>(source: &str) -> Result<TokenTree<T>, TreeError> {
    let value: Value =
        serde_json::from_str(source).map_err(|e| TreeError::Json(e.to_string()))?;
    tree_from_value(value)
}

/// Converts an already-parsed JSON value into a token tree.
pub fn tree_from_value<T: DeserializeOwned>(value: Value) -> Result<TokenTree<T>, TreeError> {
    let root = NodePath::default();
    match value {
        Value::Array(items) => nodes_from_values(items, &root),
        Value::Object(mut fields) => match fields.remove("tokens") {
            Some(Value::Array(items)) => nodes_from_values(items, &root),
            _ => Err(TreeError::Malformed {
                path: root,
                reason: "expected a \"tokens\" list".to_string(),
            }),
        },
        other => Err(TreeError::Malformed {
            path: root,
            reason: format!("expected a list of tokens, found {}", kind(&other)),
        }),
    }
}

fn nodes_from_values<T: DeserializeOwned>(
    items: Vec<Value>,
    path: &NodePath,
) -> Result<Vec<TokenNode<T>>, TreeError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| node_from_value(item, path.child(index)))
        .collect()
}

fn node_from_value<T: DeserializeOwned>(
    value: Value,
    path: NodePath,
) -> Result<TokenNode<T>, TreeError> {
    match value {
        Value::String(text) => Ok(TokenNode::Text(text)),
        Value::Array(items) => match <[Value; 2]>::try_from(items) {
            Ok([tag, children]) => {
                let tag = serde_json::from_value(tag).map_err(|e| TreeError::Tag {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                let children = match children {
                    Value::String(text) => vec![TokenNode::Text(text)],
                    Value::Array(items) => nodes_from_values(items, &path)?,
                    other => {
                        return Err(TreeError::Malformed {
                            reason: format!(
                                "children must be text or a list, found {}",
                                kind(&other)
                            ),
                            path,
                        })
                    }
                };
                Ok(TokenNode::Tagged { tag, children })
            }
            Err(items) => Err(TreeError::Malformed {
                reason: format!(
                    "expected text or a [tag, children] pair, found {}",
                    kind(&Value::Array(items))
                ),
                path,
            }),
        },
        other => Err(TreeError::Malformed {
            reason: format!(
                "expected text or a [tag, children] pair, found {}",
                kind(&other)
            ),
            path,
        }),
    }
}

fn kind(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::String(_) => "text".to_string(),
        Value::Array(items) => format!("a list of {}", items.len()),
        Value::Object(_) => "an object".to_string(),
    }
}

fn serialize_children<S, N>(
    serializer: S,
    tag: &impl Serialize,
    children: &[N],
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    N: Serialize + AsText,
{
    let mut seq = serializer.serialize_seq(Some(2))?;
    seq.serialize_element(tag)?;
    match children {
        [only] => match only.as_text() {
            Some(text) => seq.serialize_element(text)?,
            None => seq.serialize_element(children)?,
        },
        _ => seq.serialize_element(children)?,
    }
    seq.end()
}

/// Lets single-text children be written in the lexer's `[tag, "text"]` shorthand.
trait AsText {
    fn as_text(&self) -> Option<&str>;
}

impl<T> AsText for TokenNode<T> {
    fn as_text(&self) -> Option<&str> {
        match self {
            TokenNode::Text(text) => Some(text),
            TokenNode::Tagged { .. } => None,
        }
    }
}

impl<T, M> AsText for RevealNode<T, M> {
    fn as_text(&self) -> Option<&str> {
        match self {
            RevealNode::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl<T: Serialize> Serialize for TokenNode<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TokenNode::Text(text) => serializer.serialize_str(text),
            TokenNode::Tagged { tag, children } => {
                serialize_children(serializer, tag, children.as_slice())
            }
        }
    }
}

impl<T: Serialize, M> Serialize for RevealNode<T, M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RevealNode::Text(text) => serializer.serialize_str(text),
            RevealNode::Char { ch, mark } => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(&mark.label().to_string())?;
                seq.serialize_element(&ch.to_string())?;
                seq.end()
            }
            RevealNode::Tagged { tag, children } => {
                serialize_children(serializer, tag, children.as_slice())
            }
        }
    }
}
