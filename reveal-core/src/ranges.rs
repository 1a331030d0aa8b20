//! The range index: which characters of a snippet are tracked.
//!
//!     Ranges are half-open intervals of character offsets over the flattened snippet
//!     text. They are usually located from literal substrings: the first occurrence of
//!     the literal, case-sensitive, gives `[first, first + len)`. Offsets count `char`s,
//!     not bytes, so a range over non-ASCII text still lines up with the augmenter's
//!     cursor.
//!
//!     Entries are ordered, and the order is the range number written into every
//!     [`CharMark`](crate::CharMark). An entry is either a single range or a group of
//!     alternatives that share one range number; within a group the first alternative
//!     containing an offset wins.
//!
//!     Overlap is allowed. Classification always answers with the first entry that
//!     contains the offset.
//!
//!     A literal that does not occur in the snippet is an error at construction time.
//!     There is no "not found" range.

use log::debug;
use serde::Serialize;
use std::fmt;

/// Errors raised while building a range index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The literal does not occur in the snippet text.
    UnmatchedLiteral { literal: String },
    /// Explicit bounds with `start > end`.
    InvertedBounds { start: usize, end: usize },
    /// A group entry with no alternatives.
    EmptyGroup,
    /// An error attributed to the entry at `index`.
    Entry {
        index: usize,
        source: Box<RangeError>,
    },
}

impl RangeError {
    fn at(self, index: usize) -> Self {
        RangeError::Entry {
            index,
            source: Box::new(self),
        }
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::UnmatchedLiteral { literal } => {
                write!(f, "literal {:?} does not occur in the snippet", literal)
            }
            RangeError::InvertedBounds { start, end } => {
                write!(f, "range start {} is past its end {}", start, end)
            }
            RangeError::EmptyGroup => write!(f, "range group has no alternatives"),
            RangeError::Entry { index, source } => write!(f, "range {}: {}", index, source),
        }
    }
}

impl std::error::Error for RangeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RangeError::Entry { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// A half-open interval `[start, end)` of character offsets with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CharRange<M = ()> {
    pub start: usize,
    pub end: usize,
    pub meta: M,
}

impl<M> CharRange<M> {
    /// Builds a range from explicit bounds. `start == end` is a legal, empty range.
    pub fn new(start: usize, end: usize, meta: M) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvertedBounds { start, end });
        }
        Ok(CharRange { start, end, meta })
    }

    /// Locates the first occurrence of `literal` in `text`.
    pub fn locate(text: &str, literal: &str, meta: M) -> Result<Self, RangeError> {
        let byte_start = text
            .find(literal)
            .ok_or_else(|| RangeError::UnmatchedLiteral {
                literal: literal.to_string(),
            })?;
        let start = text[..byte_start].chars().count();
        let end = start + literal.chars().count();
        Ok(CharRange { start, end, meta })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// One logical range: a single interval, or alternatives sharing one range number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RangeEntry<M = ()> {
    Single(CharRange<M>),
    Group(Vec<CharRange<M>>),
}

impl<M> RangeEntry<M> {
    /// The first interval of this entry containing `offset`.
    pub fn find(&self, offset: usize) -> Option<&CharRange<M>> {
        match self {
            RangeEntry::Single(range) => Some(range).filter(|r| r.contains(offset)),
            RangeEntry::Group(alternatives) => alternatives.iter().find(|r| r.contains(offset)),
        }
    }

    pub fn alternatives(&self) -> &[CharRange<M>] {
        match self {
            RangeEntry::Single(range) => std::slice::from_ref(range),
            RangeEntry::Group(alternatives) => alternatives,
        }
    }
}

impl<M> From<CharRange<M>> for RangeEntry<M> {
    fn from(range: CharRange<M>) -> Self {
        RangeEntry::Single(range)
    }
}

/// The result of classifying an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a, M> {
    /// Index of the entry in the range index.
    pub range: usize,
    /// Offset relative to the start of the matching interval.
    pub offset: usize,
    /// Whether this is the interval's final character.
    pub is_last: bool,
    pub meta: &'a M,
}

impl<M: Clone> Classification<'_, M> {
    pub fn to_mark(&self) -> crate::CharMark<M> {
        crate::CharMark {
            range: self.range,
            offset: self.offset,
            is_last: self.is_last,
            meta: self.meta.clone(),
        }
    }
}

/// An ordered, immutable set of tracked ranges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RangeIndex<M = ()> {
    entries: Vec<RangeEntry<M>>,
}

impl<M> RangeIndex<M> {
    /// An index tracking nothing.
    pub fn empty() -> Self {
        RangeIndex {
            entries: Vec::new(),
        }
    }

    /// Builds an index from ready-made entries. Groups must not be empty.
    pub fn from_entries(entries: Vec<RangeEntry<M>>) -> Result<Self, RangeError> {
        for (index, entry) in entries.iter().enumerate() {
            if entry.alternatives().is_empty() {
                return Err(RangeError::EmptyGroup.at(index));
            }
        }
        Ok(RangeIndex { entries })
    }

    /// Starts building an index over `text`. See [`RangeIndexBuilder`].
    pub fn builder(text: &str) -> RangeIndexBuilder<'_, M> {
        RangeIndexBuilder {
            text,
            entries: Ok(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RangeEntry<M>] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&RangeEntry<M>> {
        self.entries.get(index)
    }

    /// Finds which range, if any, tracks the character at `offset`.
    ///
    /// Entries are scanned in order and the first one containing the offset wins.
    pub fn classify(&self, offset: usize) -> Option<Classification<'_, M>> {
        self.entries
            .iter()
            .enumerate()
            .find_map(|(index, entry)| {
                entry.find(offset).map(|range| Classification {
                    range: index,
                    offset: offset - range.start,
                    is_last: offset + 1 == range.end,
                    meta: &range.meta,
                })
            })
    }
}

impl RangeIndex<()> {
    /// Locates each literal in `text`, in order, with no metadata.
    pub fn from_literals<S: AsRef<str>>(text: &str, literals: &[S]) -> Result<Self, RangeError> {
        literals
            .iter()
            .fold(Self::builder(text), |builder, literal| {
                builder.literal(literal.as_ref())
            })
            .build()
    }
}

impl<M> Default for RangeIndex<M> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Accumulates entries over one snippet text.
///
/// Entries are numbered in the order they are added. The first failing entry is
/// remembered and reported by [`build`](Self::build); later entries are ignored.
pub struct RangeIndexBuilder<'t, M> {
    text: &'t str,
    entries: Result<Vec<RangeEntry<M>>, RangeError>,
}

impl<'t, M> RangeIndexBuilder<'t, M> {
    fn push(mut self, entry: impl FnOnce(&'t str) -> Result<RangeEntry<M>, RangeError>) -> Self {
        if let Ok(entries) = &mut self.entries {
            let index = entries.len();
            match entry(self.text) {
                Ok(entry) => entries.push(entry),
                Err(err) => self.entries = Err(err.at(index)),
            }
        }
        self
    }

    /// Adds the first occurrence of `literal`, with default metadata.
    pub fn literal(self, literal: &str) -> Self
    where
        M: Default,
    {
        self.literal_with(literal, M::default())
    }

    /// Adds the first occurrence of `literal`.
    pub fn literal_with(self, literal: &str, meta: M) -> Self {
        self.push(|text| CharRange::locate(text, literal, meta).map(RangeEntry::Single))
    }

    /// Adds a group of alternatives sharing one range number. Every alternative must occur.
    pub fn alternatives<I, S>(self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = (S, M)>,
        S: AsRef<str>,
    {
        self.push(|text| {
            let group = alternatives
                .into_iter()
                .map(|(literal, meta)| CharRange::locate(text, literal.as_ref(), meta))
                .collect::<Result<Vec<_>, _>>()?;
            if group.is_empty() {
                return Err(RangeError::EmptyGroup);
            }
            Ok(RangeEntry::Group(group))
        })
    }

    /// Adds explicit bounds.
    pub fn bounds(self, start: usize, end: usize, meta: M) -> Self {
        self.push(|_| CharRange::new(start, end, meta).map(RangeEntry::Single))
    }

    pub fn build(self) -> Result<RangeIndex<M>, RangeError> {
        let entries = self.entries?;
        debug!(
            "built range index: {} entries over {} chars",
            entries.len(),
            self.text.chars().count()
        );
        Ok(RangeIndex { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_first_occurrence() {
        let range = CharRange::locate("md:p-0 md:p-8 md:p-0", "md:p-0", ()).unwrap();
        assert_eq!((range.start, range.end), (0, 6));
    }

    #[test]
    fn test_locate_is_case_sensitive() {
        let err = CharRange::locate("Const x", "const", ()).unwrap_err();
        assert_eq!(
            err,
            RangeError::UnmatchedLiteral {
                literal: "const".to_string()
            }
        );
    }

    #[test]
    fn test_locate_counts_chars() {
        let range = CharRange::locate("é → p-8", "p-8", ()).unwrap();
        assert_eq!((range.start, range.end), (4, 7));
    }

    #[test]
    fn test_locate_empty_literal_is_empty_range() {
        let range = CharRange::locate("abc", "", ()).unwrap();
        assert!(range.is_empty());
        assert!(!range.contains(0));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert_eq!(
            CharRange::new(5, 2, ()),
            Err(RangeError::InvertedBounds { start: 5, end: 2 })
        );
        assert!(CharRange::new(3, 3, ()).unwrap().is_empty());
    }

    #[test]
    fn test_builder_reports_failing_entry() {
        let err = RangeIndex::<()>::builder("md:p-0 md:p-8")
            .literal("md:p-0")
            .literal("xyz")
            .literal("md:p-8")
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            RangeError::Entry {
                index: 1,
                source: Box::new(RangeError::UnmatchedLiteral {
                    literal: "xyz".to_string()
                }),
            }
        );
        assert_eq!(
            err.to_string(),
            "range 1: literal \"xyz\" does not occur in the snippet"
        );
    }

    #[test]
    fn test_builder_rejects_empty_group() {
        let err = RangeIndex::<()>::builder("abc")
            .alternatives(Vec::<(&str, ())>::new())
            .build()
            .unwrap_err();
        assert_eq!(err, RangeError::EmptyGroup.at(0));
    }

    #[test]
    fn test_from_entries_rejects_empty_group() {
        let entries = vec![
            RangeEntry::Single(CharRange::new(0, 1, ()).unwrap()),
            RangeEntry::Group(vec![]),
        ];
        assert_eq!(
            RangeIndex::from_entries(entries),
            Err(RangeError::EmptyGroup.at(1))
        );
    }

    #[test]
    fn test_classify_first_listed_wins() {
        let index = RangeIndex::from_entries(vec![
            CharRange::new(0, 5, ()).unwrap().into(),
            CharRange::new(3, 8, ()).unwrap().into(),
        ])
        .unwrap();

        let hit = index.classify(4).unwrap();
        assert_eq!((hit.range, hit.offset, hit.is_last), (0, 4, true));

        let hit = index.classify(5).unwrap();
        assert_eq!((hit.range, hit.offset, hit.is_last), (1, 2, false));

        assert!(index.classify(8).is_none());
    }

    #[test]
    fn test_classify_group_uses_matching_alternative() {
        let index = RangeIndex::builder("p-4 md:p-8 lg:p-8")
            .alternatives([("md:p-8", 'a'), ("lg:p-8", 'b')])
            .build()
            .unwrap();

        let hit = index.classify(12).unwrap();
        assert_eq!(hit.range, 0);
        assert_eq!(hit.offset, 1);
        assert_eq!(*hit.meta, 'b');
        assert!(index.classify(3).is_none());
    }

    #[test]
    fn test_classify_empty_index() {
        assert!(RangeIndex::<()>::empty().classify(0).is_none());
    }
}
