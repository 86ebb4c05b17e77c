//! Visibility controller
//!
//! Turns a validated level window into open/closed flags on the hierarchy and
//! owns the single live tree widget.

use tracing::{debug, instrument, trace};

use crate::application::services::loader::LoadedHierarchy;
use crate::domain::{
    validate, DisplayWindow, HierarchyArena, HierarchyNode, LevelIndex, RangeError, TreeWidget,
};

/// How many widgets were built and torn down so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetLifecycle {
    pub created: u64,
    pub destroyed: u64,
}

impl WidgetLifecycle {
    /// Number of widgets currently alive (0 or 1).
    pub fn live(&self) -> u64 {
        self.created - self.destroyed
    }
}

pub struct VisibilityController {
    arena: HierarchyArena,
    index: LevelIndex,
    live: Option<TreeWidget>,
    lifecycle: WidgetLifecycle,
}

impl VisibilityController {
    pub fn new(arena: HierarchyArena, index: LevelIndex) -> Self {
        Self {
            arena,
            index,
            live: None,
            lifecycle: WidgetLifecycle::default(),
        }
    }

    pub fn from_loaded(loaded: LoadedHierarchy) -> Self {
        Self::new(loaded.arena, loaded.index)
    }

    /// Level of the roots; the upper bound for any window.
    pub fn max_level(&self) -> usize {
        self.index.max_level()
    }

    pub fn arena(&self) -> &HierarchyArena {
        &self.arena
    }

    pub fn index(&self) -> &LevelIndex {
        &self.index
    }

    /// Validate a window against this hierarchy's level bounds.
    pub fn validate(&self, top: i64, bottom: i64) -> Result<DisplayWindow, RangeError> {
        validate(top, bottom, self.index.max_level())
    }

    /// The live widget, if one has been rendered.
    pub fn widget(&self) -> Option<&TreeWidget> {
        self.live.as_ref()
    }

    pub fn lifecycle(&self) -> WidgetLifecycle {
        self.lifecycle
    }

    /// Node by identifier.
    pub fn node(&self, id: &str) -> Option<&HierarchyNode> {
        self.arena.find(id).and_then(|idx| self.arena.get_node(idx))
    }

    /// Apply `window` and rebuild the widget.
    ///
    /// Levels in `(bottom, top]` are opened and every other level is closed,
    /// so the result depends on `window` alone. Level `top` becomes the root
    /// set. Any previous widget is destroyed first.
    #[instrument(level = "debug", skip(self, window), fields(window = %window))]
    pub fn render(&mut self, window: DisplayWindow) -> &TreeWidget {
        self.destroy();

        for level in 1..=self.index.max_level() {
            let opened = window.bottom() < level && level <= window.top();
            self.set_level_expanded(level, opened);
        }

        self.lifecycle.created += 1;
        let widget = TreeWidget::build(
            self.lifecycle.created,
            window,
            &self.arena,
            self.index.at_level(window.top()),
        );
        debug!(
            "widget {} built with {} roots",
            widget.generation(),
            widget.roots().len()
        );
        self.live.insert(widget)
    }

    /// Filter the live widget. Returns the number of matches; 0 without a widget.
    pub fn search(&mut self, text: &str) -> usize {
        match self.live.as_mut() {
            Some(widget) => widget.search(text),
            None => 0,
        }
    }

    pub fn clear_search(&mut self) {
        if let Some(widget) = self.live.as_mut() {
            widget.clear_search();
        }
    }

    fn destroy(&mut self) {
        if let Some(widget) = self.live.take() {
            self.lifecycle.destroyed += 1;
            trace!("widget {} destroyed", widget.generation());
        }
    }

    fn set_level_expanded(&mut self, level: usize, expanded: bool) {
        for &idx in self.index.at_level(level) {
            if let Some(node) = self.arena.get_node_mut(idx) {
                node.expanded = expanded;
            }
        }
    }
}
