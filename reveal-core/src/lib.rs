//! # reveal-core
//!
//! Token-range augmentation for animated code windows.
//!
//! A code window reveals a snippet one character at a time. The snippet arrives already
//! tokenized by an external lexer as a tree of tagged spans; the page also names a few
//! substrings of the snippet (class names, attribute values) that must fade in character
//! by character. This crate rewrites the token tree so every character inside one of
//! those ranges becomes its own leaf carrying a [`CharMark`], while everything else stays
//! merged into plain text runs.
//!
//! Layout
//!
//!     token      The token tree as received from the lexer ([`TokenNode`]) and the
//!                augmented tree handed to the renderer ([`RevealNode`]).
//!     ranges     The range index: ordered character intervals located from literals.
//!     augment    The single-pass tree augmenter.
//!     json       The lexer's JSON shape: parsing token trees and serializing results.
//!     formats    Named output formats behind a registry.
//!     testing    Tree builders and inspection helpers for tests.
//!
//! The flow is always the same: flatten the tree to get the snippet text, build a
//! [`RangeIndex`] from literals over that text, then [`augment`] the tree.

pub mod augment;
pub mod formats;
pub mod json;
pub mod ranges;
pub mod testing;
pub mod token;

pub use augment::{augment, augment_from, Augmented};
pub use ranges::{CharRange, Classification, RangeEntry, RangeError, RangeIndex};
pub use token::{flatten, CharMark, MarkLabel, RevealNode, TokenNode, TokenTree};
