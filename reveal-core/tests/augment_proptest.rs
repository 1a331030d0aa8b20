//! Property-based tests for tree augmentation
//!
//! Trees are generated with random nesting and text, ranges with random bounds over the
//! flattened text. Expected marks are computed by brute force from the bounds alone, so
//! the augmenter's single-pass cursor is checked against an independent model.

use proptest::prelude::*;
use reveal_core::testing::{has_adjacent_text, marks_by_offset, normalize};
use reveal_core::{
    augment, augment_from, flatten, CharRange, MarkLabel, RangeIndex, RevealNode, TokenNode,
};

type Tree = Vec<TokenNode<String>>;

fn tag_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("keyword".to_string()),
        Just("string".to_string()),
        Just("punctuation".to_string()),
        Just("attr-value".to_string()),
    ]
}

fn tree_strategy() -> impl Strategy<Value = Tree> {
    let leaf = "[a-z :=\"-]{0,6}".prop_map(TokenNode::Text);
    let node = leaf.prop_recursive(3, 32, 4, |inner| {
        (tag_strategy(), prop::collection::vec(inner, 0..4))
            .prop_map(|(tag, children)| TokenNode::Tagged { tag, children })
    });
    prop::collection::vec(node, 0..6)
}

/// Arbitrary, possibly overlapping or empty, bounds within `0..=len`.
fn bounds_strategy(len: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..=len, 0..=len), 0..5).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect()
    })
}

/// Non-empty, pairwise disjoint bounds within `0..=len`.
fn disjoint_bounds_strategy(len: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec(0..=len, 0..8).prop_map(|mut cuts| {
        cuts.sort_unstable();
        cuts.dedup();
        cuts.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
    })
}

fn with_bounds(
    bounds: fn(usize) -> BoxedStrategy<Vec<(usize, usize)>>,
) -> impl Strategy<Value = (Tree, Vec<(usize, usize)>)> {
    tree_strategy().prop_flat_map(move |tree| {
        let len = flatten(&tree).chars().count();
        (Just(tree), bounds(len))
    })
}

fn any_bounds(len: usize) -> BoxedStrategy<Vec<(usize, usize)>> {
    bounds_strategy(len).boxed()
}

fn disjoint_bounds(len: usize) -> BoxedStrategy<Vec<(usize, usize)>> {
    disjoint_bounds_strategy(len).boxed()
}

fn index(bounds: &[(usize, usize)]) -> RangeIndex<()> {
    RangeIndex::from_entries(
        bounds
            .iter()
            .map(|&(start, end)| CharRange::new(start, end, ()).unwrap().into())
            .collect(),
    )
    .unwrap()
}

/// First-listed-wins classification straight from the bounds.
fn expected_label(bounds: &[(usize, usize)], offset: usize) -> Option<MarkLabel> {
    bounds
        .iter()
        .enumerate()
        .find(|(_, &(start, end))| start <= offset && offset < end)
        .map(|(range, &(start, end))| MarkLabel {
            range,
            offset: offset - start,
            is_last: offset == end - 1,
        })
}

fn text_of(tree: &[RevealNode<String, ()>]) -> String {
    let mut out = String::new();
    for node in tree {
        node.write_text(&mut out);
    }
    out
}

proptest! {
    #[test]
    fn round_trip_preserves_text((tree, bounds) in with_bounds(any_bounds)) {
        let source = flatten(&tree);
        let result = augment(tree, &index(&bounds));

        prop_assert_eq!(text_of(&result.tree), source.clone());
        prop_assert_eq!(result.cursor, source.chars().count());
    }

    #[test]
    fn empty_index_is_identity(tree in tree_strategy()) {
        let expected: Vec<RevealNode<String, ()>> =
            tree.clone().into_iter().map(RevealNode::from).collect();
        let result = augment(tree, &RangeIndex::empty());
        prop_assert_eq!(result.tree, expected);
    }

    #[test]
    fn every_offset_classified_like_the_bounds((tree, bounds) in with_bounds(any_bounds)) {
        let len = flatten(&tree).chars().count();
        let result = augment(tree, &index(&bounds));
        let marks = marks_by_offset(&result.tree);

        prop_assert_eq!(marks.len(), len);
        for (offset, mark) in marks.into_iter().enumerate() {
            prop_assert_eq!(mark, expected_label(&bounds, offset), "offset {}", offset);
        }
    }

    #[test]
    fn one_last_mark_per_range((tree, bounds) in with_bounds(disjoint_bounds)) {
        let result = augment(tree, &index(&bounds));
        let marks = marks_by_offset(&result.tree);

        for (range, &(_, end)) in bounds.iter().enumerate() {
            let lasts: Vec<usize> = marks
                .iter()
                .enumerate()
                .filter(|(_, mark)| matches!(mark, Some(m) if m.range == range && m.is_last))
                .map(|(offset, _)| offset)
                .collect();
            prop_assert_eq!(lasts, vec![end - 1]);
        }
    }

    #[test]
    fn untracked_runs_are_maximal((tree, bounds) in with_bounds(any_bounds)) {
        let tree = normalize(tree);
        let result = augment(tree, &index(&bounds));

        prop_assert!(!has_adjacent_text(&result.tree));
        let empty_runs = reveal_core::testing::leaves(&result.tree)
            .into_iter()
            .filter(|leaf| matches!(leaf, RevealNode::Text(text) if text.is_empty()))
            .count();
        prop_assert_eq!(empty_runs, 0);
    }

    #[test]
    fn chained_fragments_match_single_pass(
        (tree, bounds) in with_bounds(any_bounds),
        split in 0usize..6,
    ) {
        let ranges = index(&bounds);
        let whole = augment(tree.clone(), &ranges);

        let split = split.min(tree.len());
        let mut head = tree;
        let tail = head.split_off(split);
        let first = augment(head, &ranges);
        let second = augment_from(tail, &ranges, first.cursor);

        let mut chained = first.tree;
        chained.extend(second.tree);
        prop_assert_eq!(chained, whole.tree);
        prop_assert_eq!(second.cursor, whole.cursor);
    }

    #[test]
    fn augmentation_is_deterministic((tree, bounds) in with_bounds(any_bounds)) {
        let ranges = index(&bounds);
        prop_assert_eq!(augment(tree.clone(), &ranges), augment(tree, &ranges));
    }
}
