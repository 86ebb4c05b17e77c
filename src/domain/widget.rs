//! Read-only tree projection built for one level window.
//!
//! A `TreeWidget` copies labels and open/closed flags out of the arena when it
//! is constructed and is discarded on the next render. Search is an overlay on
//! the projection and never touches the arena.
//!
//! Nodes are stored flat in pre-order and linked by position, so every walk
//! below uses an explicit stack and hierarchy depth never reaches the call
//! stack.

use std::collections::HashSet;

use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::HierarchyArena;
use crate::domain::window::DisplayWindow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetNode {
    pub id: String,
    pub label: String,
    pub opened: bool,
    /// Position of the parent inside the widget, None for widget roots
    pub parent: Option<usize>,
    /// Positions of the children, in document order
    pub children: Vec<usize>,
}

/// A displayed row, in top-to-bottom order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: String,
    pub label: String,
    /// 1 for the widget's roots
    pub level: usize,
    pub opened: bool,
    pub has_children: bool,
    pub matched: bool,
}

#[derive(Debug, Clone, Default)]
struct SearchOverlay {
    text: String,
    matched: HashSet<usize>,
    /// Nodes with a match somewhere below them
    ancestors: HashSet<usize>,
    visible: HashSet<usize>,
}

#[derive(Debug, Clone)]
pub struct TreeWidget {
    generation: u64,
    window: DisplayWindow,
    nodes: Vec<WidgetNode>,
    roots: Vec<usize>,
    search: Option<SearchOverlay>,
}

impl TreeWidget {
    /// Project `roots` and their full subtrees out of the arena.
    pub fn build(
        generation: u64,
        window: DisplayWindow,
        arena: &HierarchyArena,
        roots: &[Index],
    ) -> Self {
        let mut nodes: Vec<WidgetNode> = Vec::new();
        let mut root_positions = Vec::with_capacity(roots.len());
        let mut stack: Vec<(Index, Option<usize>)> = roots.iter().rev().map(|&r| (r, None)).collect();

        while let Some((idx, parent)) = stack.pop() {
            let Some(node) = arena.get_node(idx) else {
                continue;
            };
            let pos = nodes.len();
            nodes.push(WidgetNode {
                id: node.data.id.clone(),
                label: node.data.label.clone(),
                opened: node.expanded,
                parent,
                children: Vec::with_capacity(node.children.len()),
            });
            match parent {
                Some(p) => nodes[p].children.push(pos),
                None => root_positions.push(pos),
            }
            stack.extend(node.children.iter().rev().map(|&c| (c, Some(pos))));
        }

        Self {
            generation,
            window,
            nodes,
            roots: root_positions,
            search: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn window(&self) -> DisplayWindow {
        self.window
    }

    /// Root nodes of the widget, in document order.
    pub fn roots(&self) -> Vec<&WidgetNode> {
        self.roots.iter().map(|&p| &self.nodes[p]).collect()
    }

    /// Number of projected nodes, shown or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Active filter text, if any.
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_ref().map(|s| s.text.as_str())
    }

    /// Restrict visible rows to case-insensitive label matches and their
    /// ancestors. Returns the number of matching nodes.
    ///
    /// A blank filter clears the search.
    pub fn search(&mut self, text: &str) -> usize {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            self.clear_search();
            return 0;
        }
        let mut overlay = SearchOverlay {
            text: text.trim().to_string(),
            ..SearchOverlay::default()
        };

        // Pre-order puts children after their parent, so a reverse sweep
        // settles every subtree before its ancestors.
        let mut below = vec![false; self.nodes.len()];
        for (pos, node) in self.nodes.iter().enumerate().rev() {
            let is_match = node.label.to_lowercase().contains(&needle);
            if is_match {
                overlay.matched.insert(pos);
                overlay.visible.insert(pos);
                // children of a match stay visible
                overlay.visible.extend(node.children.iter().copied());
            }
            if below[pos] {
                overlay.ancestors.insert(pos);
                overlay.visible.insert(pos);
            }
            if is_match || below[pos] {
                if let Some(parent) = node.parent {
                    below[parent] = true;
                }
            }
        }

        let matches = overlay.matched.len();
        self.search = Some(overlay);
        matches
    }

    pub fn clear_search(&mut self) {
        self.search = None;
    }

    /// (shown, descend) for a node under the current overlay.
    fn display_state(&self, pos: usize) -> (bool, bool) {
        match &self.search {
            None => (true, self.nodes[pos].opened),
            Some(overlay) => (
                overlay.visible.contains(&pos),
                overlay.ancestors.contains(&pos) || overlay.matched.contains(&pos),
            ),
        }
    }

    fn is_match(&self, pos: usize) -> bool {
        self.search
            .as_ref()
            .is_some_and(|o| o.matched.contains(&pos))
    }

    /// Shown nodes in pre-order with their depth inside the widget and
    /// whether they are descended into.
    fn walk_shown(&self) -> Vec<(usize, usize, bool)> {
        let mut shown = Vec::new();
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&r| (r, 1)).collect();
        while let Some((pos, level)) = stack.pop() {
            let (visible, descend) = self.display_state(pos);
            if !visible {
                continue;
            }
            shown.push((pos, level, descend));
            if descend {
                stack.extend(self.nodes[pos].children.iter().rev().map(|&c| (c, level + 1)));
            }
        }
        shown
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        self.walk_shown()
            .into_iter()
            .map(|(pos, level, descend)| {
                let node = &self.nodes[pos];
                VisibleRow {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    level,
                    opened: descend && !node.children.is_empty(),
                    has_children: !node.children.is_empty(),
                    matched: self.is_match(pos),
                }
            })
            .collect()
    }

    fn node_line(&self, pos: usize, descend: bool) -> String {
        let node = &self.nodes[pos];
        let marker = match (node.children.is_empty(), descend) {
            (true, _) => "   ",
            (false, true) => "[-]",
            (false, false) => "[+]",
        };
        let hit = if self.is_match(pos) { "* " } else { "" };
        format!("{} {}{}", marker, hit, node.label)
    }
}

/// Conversion into a printable `termtree` structure.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TreeWidget {
    fn to_tree_string(&self) -> Tree<String> {
        let caption = match self.search_text() {
            Some(text) => format!("levels {} (filter: {})", self.window, text),
            None => format!("levels {}", self.window),
        };

        // Assemble bottom-up: a reverse pre-order visits children first.
        let shown = self.walk_shown();
        let mut built: Vec<Option<Tree<String>>> = (0..self.nodes.len()).map(|_| None).collect();
        for &(pos, _, descend) in shown.iter().rev() {
            let leaves: Vec<_> = if descend {
                self.nodes[pos]
                    .children
                    .iter()
                    .filter_map(|&c| built[c].take())
                    .collect()
            } else {
                Vec::new()
            };
            built[pos] = Some(Tree::new(self.node_line(pos, descend)).with_leaves(leaves));
        }

        let leaves: Vec<_> = self.roots.iter().filter_map(|&r| built[r].take()).collect();
        Tree::new(caption).with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NodeRecord;
    use crate::domain::level_index::LevelIndex;
    use crate::domain::window::validate;

    fn widget(open: &[&str]) -> TreeWidget {
        let records = vec![
            NodeRecord::new("net", "Neural Networks").with_children(vec![
                NodeRecord::new("cnn", "Convolution").with_children(vec![NodeRecord::new(
                    "pool",
                    "Pooling layers",
                )]),
                NodeRecord::new("rnn", "Recurrent"),
            ]),
            NodeRecord::new("bayes", "Bayesian methods")
                .with_children(vec![NodeRecord::new("mcmc", "Sampling")]),
        ];
        let mut arena = HierarchyArena::from_records(&records).unwrap();
        let index = LevelIndex::build(&mut arena);
        for id in open {
            let idx = arena.find(id).unwrap();
            arena.get_node_mut(idx).unwrap().expanded = true;
        }
        let top = index.max_level();
        let window = validate(top as i64, top as i64, top).unwrap();
        TreeWidget::build(1, window, &arena, index.at_level(top))
    }

    fn ids(rows: &[VisibleRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn given_arena_subtrees_when_building_then_links_positions_in_pre_order() {
        let w = widget(&[]);
        assert_eq!(w.len(), 6);
        let roots = w.roots();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].id, "net");
        assert_eq!(roots[0].children, vec![1, 3]);
        assert_eq!(roots[1].id, "bayes");
        assert_eq!(roots[1].parent, None);
    }

    #[test]
    fn given_collapsed_roots_when_listing_rows_then_only_roots_visible() {
        let w = widget(&[]);
        assert_eq!(ids(&w.visible_rows()), vec!["net", "bayes"]);
    }

    #[test]
    fn given_opened_node_when_listing_rows_then_children_follow_it() {
        let w = widget(&["net"]);
        let rows = w.visible_rows();
        assert_eq!(ids(&rows), vec!["net", "cnn", "rnn", "bayes"]);
        assert!(rows[0].opened);
        assert_eq!(rows[1].level, 2);
        assert!(!rows[1].opened && rows[1].has_children);
    }

    #[test]
    fn given_filter_when_searching_then_shows_matches_with_ancestors_case_insensitively() {
        let mut w = widget(&[]);
        let matches = w.search("POOL");
        assert_eq!(matches, 1);
        let rows = w.visible_rows();
        assert_eq!(ids(&rows), vec!["net", "cnn", "pool"]);
        assert!(rows[2].matched);
        assert!(!rows[0].matched);
    }

    #[test]
    fn given_match_with_children_when_searching_then_children_visible() {
        let mut w = widget(&[]);
        w.search("bayes");
        assert_eq!(ids(&w.visible_rows()), vec!["bayes", "mcmc"]);
    }

    #[test]
    fn given_search_when_cleared_then_restores_window_state() {
        let mut w = widget(&["net"]);
        let before = w.visible_rows();
        w.search("sampling");
        assert_ne!(w.visible_rows(), before);
        w.clear_search();
        assert_eq!(w.visible_rows(), before);
        assert!(w.search_text().is_none());
    }

    #[test]
    fn given_blank_filter_when_searching_then_acts_as_clear() {
        let mut w = widget(&["net"]);
        w.search("conv");
        assert_eq!(w.search("   "), 0);
        assert!(w.search_text().is_none());
    }

    #[test]
    fn given_widget_when_converting_to_tree_then_marks_open_state() {
        let w = widget(&["net"]);
        let text = w.to_tree_string().to_string();
        assert!(text.starts_with("levels 3..3"));
        assert!(text.contains("[-] Neural Networks"));
        assert!(text.contains("[+] Convolution"));
        assert!(text.contains("    Recurrent"));
        assert!(!text.contains("Pooling"));
    }

    #[test]
    fn given_filter_when_converting_to_tree_then_caption_and_hits_marked() {
        let mut w = widget(&[]);
        w.search("pool");
        let text = w.to_tree_string().to_string();
        assert!(text.starts_with("levels 3..3 (filter: pool)"));
        assert!(text.contains("* Pooling layers"));
        assert!(!text.contains("Recurrent"));
    }
}
