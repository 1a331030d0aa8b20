//! Token trees on both sides of augmentation.
//!
//!     Input Trees:
//!         [`TokenNode`] is the shape the lexer hands over: text runs, and tagged nodes that
//!         own an ordered list of children. The tag is opaque and never inspected here.
//!         Concatenating every text run in document order gives back the snippet text; the
//!         position of a character in that concatenation is its offset.
//!
//!     Augmented Trees:
//!         [`RevealNode`] has the same shape plus one extra leaf kind, a single character
//!         with its [`CharMark`]. Marked characters are the only leaves the renderer animates
//!         individually.
//!
//!     Labels:
//!         The renderer addresses marked characters through a compact textual label,
//!         `char:<range>:<offset>[:last]`. See [`MarkLabel`].

pub mod label;
pub mod reveal;
pub mod tree;

pub use label::{LabelError, MarkLabel};
pub use reveal::{CharMark, RevealNode};
pub use tree::{flatten, TokenNode, TokenTree};
