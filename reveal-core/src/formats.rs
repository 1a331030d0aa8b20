//! Output formats for augmented trees
//!
//! Each format implements [`Formatter`] and is looked up by name through a
//! [`FormatRegistry`]:
//!
//!     json    The lexer's JSON shape with marked characters as `["char:...", "c"]`, inside
//!             an envelope carrying the final cursor and the range index.
//!     tag     An indented tree, one leaf per line. Meant for reading and snapshots.
//!     text    The flattened text, for round-trip checks.

pub mod registry;
pub mod tag;
pub mod tokens;

pub use registry::{FormatError, FormatRegistry, Formatter};
pub use tag::{to_tag_str, TagFormatter};
pub use tokens::{JsonFormatter, TextFormatter};
