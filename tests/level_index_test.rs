//! Tests for LevelIndex depth and level assignment over arena hierarchies

use std::collections::HashSet;

use topictree::domain::{parse_hierarchy, HierarchyArena, LevelIndex, NodeRecord};
use topictree::util::testing::{chain_records, uniform_records, SAMPLE_NODES};

fn indexed(records: &[NodeRecord]) -> (HierarchyArena, LevelIndex) {
    let mut arena = HierarchyArena::from_records(records).unwrap();
    let index = LevelIndex::build(&mut arena);
    (arena, index)
}

fn ids<'a>(arena: &'a HierarchyArena, bucket: &[generational_arena::Index]) -> Vec<&'a str> {
    bucket
        .iter()
        .map(|&idx| arena.get_node(idx).unwrap().data.id.as_str())
        .collect()
}

/// Every node's depth is 1 at a root and parent depth + 1 elsewhere.
fn assert_depths_consistent(arena: &HierarchyArena) {
    for (_, node) in arena.iter() {
        match node.parent.and_then(|p| arena.get_node(p)) {
            None => assert_eq!(node.depth, 1, "root {}", node.data.id),
            Some(parent) => assert_eq!(node.depth, parent.depth + 1, "node {}", node.data.id),
        }
    }
}

#[test]
fn given_sample_hierarchy_when_indexing_then_depths_follow_parents() {
    let records = parse_hierarchy(SAMPLE_NODES).unwrap();
    let (arena, index) = indexed(&records);

    assert_depths_consistent(&arena);
    assert_eq!(index.max_depth(), 3);
    assert_eq!(index.at_depth(1).len(), 2);
    assert_eq!(index.at_depth(2).len(), 6);
    assert_eq!(index.at_depth(3).len(), 2);
}

#[test]
fn given_sample_with_declared_levels_when_indexing_then_roots_on_top_level() {
    let records = parse_hierarchy(SAMPLE_NODES).unwrap();
    let (arena, index) = indexed(&records);

    assert_eq!(index.max_level(), 3);
    assert_eq!(ids(&arena, index.at_level(3)), vec!["Z21", "Z22"]);
    assert_eq!(ids(&arena, index.at_level(1)), vec!["Z01", "Z02"]);
    assert_eq!(arena.get_node(arena.find("Z11").unwrap()).unwrap().level, 2);
}

#[test]
fn given_uniform_hierarchy_without_levels_when_indexing_then_levels_count_up_from_leaves() {
    let (arena, index) = indexed(&uniform_records(2, 3));

    assert_eq!(index.max_level(), 2);
    assert_eq!(ids(&arena, index.at_level(2)), vec!["r1", "r2"]);
    assert_eq!(index.at_level(1).len(), 6);
    for (_, node) in arena.iter() {
        assert_eq!(node.level, index.max_depth() - node.depth + 1);
    }
}

#[test]
fn given_mixed_declared_levels_when_indexing_then_every_level_is_derived() {
    let records = vec![NodeRecord::new("a", "a").with_level(5).with_children(vec![
        NodeRecord::new("b", "b").with_level(4),
        NodeRecord::new("c", "c"),
    ])];

    let (arena, index) = indexed(&records);

    assert_eq!(index.max_level(), 2);
    assert_eq!(ids(&arena, index.at_level(2)), vec!["a"]);
    assert_eq!(ids(&arena, index.at_level(1)), vec!["b", "c"]);
}

#[test]
fn given_any_hierarchy_when_indexing_then_each_node_in_exactly_one_bucket() {
    for records in [uniform_records(3, 4), chain_records(6), parse_hierarchy(SAMPLE_NODES).unwrap()] {
        let (arena, index) = indexed(&records);

        let mut by_depth = HashSet::new();
        for (depth, bucket) in index.iter() {
            for &idx in bucket {
                assert!(by_depth.insert(idx), "node indexed twice by depth");
                assert_eq!(arena.get_node(idx).unwrap().depth, depth);
            }
        }
        let mut by_level = HashSet::new();
        for (level, bucket) in index.iter_levels() {
            for &idx in bucket {
                assert!(by_level.insert(idx), "node indexed twice by level");
                assert_eq!(arena.get_node(idx).unwrap().level, level);
            }
        }

        assert_eq!(by_depth.len(), arena.len());
        assert_eq!(by_level.len(), arena.len());
        let deepest = arena.iter().map(|(_, n)| n.depth).max().unwrap_or(0);
        assert_eq!(index.max_depth(), deepest);
    }
}

#[test]
fn given_indexed_arena_when_indexing_again_then_identical_result() {
    let mut arena = HierarchyArena::from_records(&uniform_records(2, 3)).unwrap();
    let first = LevelIndex::build(&mut arena);
    let marks: Vec<_> = arena.iter().map(|(_, n)| (n.depth, n.level)).collect();

    let second = LevelIndex::build(&mut arena);

    assert_eq!(first, second);
    assert_eq!(marks, arena.iter().map(|(_, n)| (n.depth, n.level)).collect::<Vec<_>>());
}

#[test]
fn given_sibling_order_when_indexing_then_bucket_keeps_document_order() {
    let records = parse_hierarchy(SAMPLE_NODES).unwrap();
    let (arena, index) = indexed(&records);

    assert_eq!(
        ids(&arena, index.at_depth(2)),
        vec!["Z11", "Z12", "Z13", "Z14", "Z15", "Z16"]
    );
}

#[test]
fn given_empty_input_when_indexing_then_max_depth_zero() {
    let (_, index) = indexed(&[]);
    assert_eq!(index.max_depth(), 0);
    assert_eq!(index.max_level(), 0);
    assert!(index.is_empty());
    assert!(index.at_depth(1).is_empty());
    assert!(index.at_level(1).is_empty());
}
