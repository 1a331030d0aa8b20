//! Indented tree view of an augmented tree.
//!
//! One node per line, two spaces of indentation per level:
//!
//!     <keyword>
//!       "const"
//!     " "
//!     <class-name>
//!       char:0:0 'p'
//!       char:0:1:last '8'
//!
//! Tags that serialize to a JSON string are printed bare; any other tag is printed as
//! compact JSON.

use super::registry::{FormatError, Formatter};
use crate::augment::Augmented;
use crate::ranges::RangeIndex;
use crate::token::RevealNode;
use serde::Serialize;
use serde_json::Value;

/// Formatter for the indented tree view
pub struct TagFormatter;

impl<T: Serialize, M> Formatter<T, M> for TagFormatter {
    fn name(&self) -> &str {
        "tag"
    }

    fn serialize(
        &self,
        doc: &Augmented<T, M>,
        _ranges: &RangeIndex<M>,
    ) -> Result<String, FormatError> {
        to_tag_str(&doc.tree)
    }

    fn description(&self) -> &str {
        "Indented tree, one leaf per line"
    }
}

/// Renders `tree` as an indented tree view.
pub fn to_tag_str<T: Serialize, M>(tree: &[RevealNode<T, M>]) -> Result<String, FormatError> {
    let mut out = String::new();
    for node in tree {
        write_node(node, 0, &mut out)?;
    }
    Ok(out)
}

fn write_node<T: Serialize, M>(
    node: &RevealNode<T, M>,
    depth: usize,
    out: &mut String,
) -> Result<(), FormatError> {
    let indent = "  ".repeat(depth);
    match node {
        RevealNode::Text(text) => out.push_str(&format!("{}{:?}\n", indent, text)),
        RevealNode::Char { ch, mark } => {
            out.push_str(&format!("{}{} {:?}\n", indent, mark.label(), ch))
        }
        RevealNode::Tagged { tag, children } => {
            out.push_str(&format!("{}<{}>\n", indent, tag_name(tag)?));
            for child in children {
                write_node(child, depth + 1, out)?;
            }
        }
    }
    Ok(())
}

fn tag_name<T: Serialize>(tag: &T) -> Result<String, FormatError> {
    match serde_json::to_value(tag) {
        Ok(Value::String(name)) => Ok(name),
        Ok(other) => Ok(other.to_string()),
        Err(e) => Err(FormatError::SerializationError(e.to_string())),
    }
}
