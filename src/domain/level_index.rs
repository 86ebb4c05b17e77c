//! Depth index over an arena-owned hierarchy.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::HierarchyArena;

/// Nodes grouped by 1-based depth and by window level.
///
/// Depth counts down from the roots (roots are 1). Window levels count up
/// from the bottom: roots sit on the highest level and a window `top..bottom`
/// is expressed in levels. When every node carries a level supplied by the
/// source those numbers are used as-is; otherwise a node's level is
/// `max_depth - depth + 1`.
///
/// Holds arena handles only; the arena stays the sole owner of the nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelIndex {
    depths: Vec<Vec<Index>>,
    levels: Vec<Vec<Index>>,
}

impl LevelIndex {
    /// Walk the hierarchy depth-first and bucket every node by depth, then
    /// by window level.
    ///
    /// Roots get depth 1 and each child its parent's depth + 1; depth and
    /// level are written back onto the node. Rebuilding over the same arena
    /// yields the same buckets and annotations.
    #[instrument(level = "debug", skip(arena), fields(nodes = arena.len()))]
    pub fn build(arena: &mut HierarchyArena) -> Self {
        let mut depths: Vec<Vec<Index>> = Vec::new();
        let mut stack: Vec<(Index, usize)> = arena.roots().iter().rev().map(|&r| (r, 1)).collect();
        let mut declared = true;

        while let Some((idx, depth)) = stack.pop() {
            let Some(node) = arena.get_node_mut(idx) else {
                continue;
            };
            node.depth = depth;
            declared &= node.data.declared_level.is_some_and(|l| l >= 1);
            if depths.len() < depth {
                depths.resize_with(depth, Vec::new);
            }
            depths[depth - 1].push(idx);
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        }

        let max_depth = depths.len();
        let mut levels: Vec<Vec<Index>> = Vec::new();
        for &idx in depths.iter().flatten() {
            let Some(node) = arena.get_node_mut(idx) else {
                continue;
            };
            let level = match node.data.declared_level {
                Some(level) if declared => level,
                _ => max_depth - node.depth + 1,
            };
            node.level = level;
            if levels.len() < level {
                levels.resize_with(level, Vec::new);
            }
            levels[level - 1].push(idx);
        }

        debug!(
            "indexed {} depths, {} levels ({})",
            depths.len(),
            levels.len(),
            if declared && max_depth > 0 { "declared" } else { "derived" }
        );
        Self { depths, levels }
    }

    /// Greatest observed depth; 0 for an empty hierarchy.
    pub fn max_depth(&self) -> usize {
        self.depths.len()
    }

    /// Nodes at `depth`, in traversal order. Empty outside `1..=max_depth`.
    pub fn at_depth(&self, depth: usize) -> &[Index] {
        bucket(&self.depths, depth)
    }

    /// `(depth, nodes)` for every depth, shallowest first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Index])> {
        self.depths
            .iter()
            .enumerate()
            .map(|(i, nodes)| (i + 1, nodes.as_slice()))
    }

    /// Highest window level; the level of the roots in a derived numbering.
    pub fn max_level(&self) -> usize {
        self.levels.len()
    }

    /// Nodes on window level `level`, shallowest first. Empty outside
    /// `1..=max_level`.
    pub fn at_level(&self, level: usize) -> &[Index] {
        bucket(&self.levels, level)
    }

    /// `(level, nodes)` for every window level, lowest first.
    pub fn iter_levels(&self) -> impl DoubleEndedIterator<Item = (usize, &[Index])> {
        self.levels
            .iter()
            .enumerate()
            .map(|(i, nodes)| (i + 1, nodes.as_slice()))
    }

    /// Total number of indexed nodes.
    pub fn node_count(&self) -> usize {
        self.depths.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

fn bucket(buckets: &[Vec<Index>], n: usize) -> &[Index] {
    n.checked_sub(1)
        .and_then(|i| buckets.get(i))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
