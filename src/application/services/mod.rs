//! Application services

pub mod controls;
pub mod loader;
pub mod lookup;
pub mod visibility;

pub use controls::{parse_level_input, LevelControls, BOTTOM_INPUT_DEFAULT, TOP_INPUT_DEFAULT};
pub use loader::{HierarchyLoader, LoadedHierarchy};
pub use lookup::{DocumentLookup, DocumentReport};
pub use visibility::{VisibilityController, WidgetLifecycle};
