//! Token output: the lexer's JSON shape, and plain text.

use super::registry::{FormatError, Formatter};
use crate::augment::Augmented;
use crate::ranges::RangeIndex;
use crate::token::RevealNode;
use serde::Serialize;

/// What the `json` format writes.
///
/// `length` is the final cursor, which is where a following fragment's offsets start.
#[derive(Serialize)]
struct Envelope<'a, T, M> {
    tokens: &'a [RevealNode<T, M>],
    length: usize,
    ranges: &'a RangeIndex<M>,
}

/// Formatter for the lexer's JSON shape
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn pretty() -> Self {
        JsonFormatter { pretty: true }
    }

    pub fn compact() -> Self {
        JsonFormatter { pretty: false }
    }
}

impl<T: Serialize, M: Serialize> Formatter<T, M> for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(
        &self,
        doc: &Augmented<T, M>,
        ranges: &RangeIndex<M>,
    ) -> Result<String, FormatError> {
        let envelope = Envelope {
            tokens: &doc.tree,
            length: doc.cursor,
            ranges,
        };
        let result = if self.pretty {
            serde_json::to_string_pretty(&envelope)
        } else {
            serde_json::to_string(&envelope)
        };
        result.map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Token JSON with marked characters, final length and ranges"
    }
}

/// Formatter for the flattened text
pub struct TextFormatter;

impl<T, M> Formatter<T, M> for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn serialize(
        &self,
        doc: &Augmented<T, M>,
        _ranges: &RangeIndex<M>,
    ) -> Result<String, FormatError> {
        let mut out = String::new();
        for node in &doc.tree {
            node.write_text(&mut out);
        }
        Ok(out)
    }

    fn description(&self) -> &str {
        "Flattened snippet text"
    }
}
