use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::NodeRecord;
use crate::domain::error::{DomainError, DomainResult};

/// Data payload for hierarchy nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Identifier, unique within the hierarchy
    pub id: String,
    /// Display label
    pub label: String,
    /// Level number supplied by the source, if it numbers levels itself
    pub declared_level: Option<usize>,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.id)
    }
}

/// Node in the arena-based hierarchy.
#[derive(Debug)]
pub struct HierarchyNode {
    pub data: NodeData,
    /// 1-based depth, assigned by `LevelIndex::build`; 0 until indexed
    pub depth: usize,
    /// Window level, highest at the roots; assigned with `depth`
    pub level: usize,
    /// Display flag, the single source of truth for open/closed state
    pub expanded: bool,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in document order
    pub children: Vec<Index>,
}

/// Arena that owns every node of a hierarchy.
///
/// A node is inserted under at most one parent, so the arena is the only
/// ownership path; everything else holds `Index` handles.
#[derive(Debug, Default)]
pub struct HierarchyArena {
    arena: Arena<HierarchyNode>,
    roots: Vec<Index>,
    by_id: HashMap<String, Index>,
}

impl HierarchyArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the arena from raw records, preserving sibling order.
    #[instrument(level = "debug", skip(records), fields(roots = records.len()))]
    pub fn from_records(records: &[NodeRecord]) -> DomainResult<Self> {
        let mut tree = Self::new();
        for root in records {
            let mut stack = vec![(root, None)];
            while let Some((record, parent_idx)) = stack.pop() {
                let data = NodeData {
                    id: record.id.clone(),
                    label: record.label.clone(),
                    declared_level: record.level(),
                };
                let current_idx = tree.insert_node(data, parent_idx)?;
                // Reverse so siblings are inserted in document order
                for child in record.children.iter().rev() {
                    stack.push((child, Some(current_idx)));
                }
            }
        }
        Ok(tree)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> DomainResult<Index> {
        if self.by_id.contains_key(&data.id) {
            return Err(DomainError::DuplicateNode(data.id));
        }
        if let Some(parent_idx) = parent {
            if !self.arena.contains(parent_idx) {
                return Err(DomainError::UnknownNode(format!("{:?}", parent_idx)));
            }
        }

        let id = data.id.clone();
        let node = HierarchyNode {
            data,
            depth: 0,
            level: 0,
            expanded: false,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);
        self.by_id.insert(id, node_idx);

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        Ok(node_idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&HierarchyNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut HierarchyNode> {
        self.arena.get_mut(idx)
    }

    /// Look up a node by its identifier.
    pub fn find(&self, id: &str) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal over all roots, left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a HierarchyArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a HierarchyArena) -> Self {
        let stack = arena.roots().iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a HierarchyNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<NodeRecord> {
        vec![
            NodeRecord::new("a", "alpha").with_children(vec![
                NodeRecord::new("a1", "alpha one")
                    .with_children(vec![NodeRecord::new("a1x", "deep")]),
                NodeRecord::new("a2", "alpha two"),
            ]),
            NodeRecord::new("b", "beta"),
        ]
    }

    #[test]
    fn given_records_when_building_arena_then_preserves_document_order() {
        let tree = HierarchyArena::from_records(&sample()).unwrap();
        let ids: Vec<_> = tree.iter().map(|(_, n)| n.data.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a1", "a1x", "a2", "b"]);
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn given_records_when_building_arena_then_links_parents() {
        let tree = HierarchyArena::from_records(&sample()).unwrap();
        let a1 = tree.find("a1").unwrap();
        let a = tree.find("a").unwrap();
        assert_eq!(tree.get_node(a1).unwrap().parent, Some(a));
        assert_eq!(tree.get_node(a).unwrap().parent, None);
    }

    #[test]
    fn given_duplicate_ids_when_building_arena_then_errors() {
        let records = vec![NodeRecord::new("a", "x"), NodeRecord::new("a", "y")];
        let err = HierarchyArena::from_records(&records).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateNode(id) if id == "a"));
    }
}
