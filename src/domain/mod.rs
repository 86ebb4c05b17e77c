//! Domain layer: hierarchy model, level index, window validation, projection
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod level_index;
pub mod widget;
pub mod window;

pub use arena::{HierarchyArena, HierarchyNode, NodeData};
pub use entities::*;
pub use error::{DomainError, DomainResult, InputField, RangeError};
pub use level_index::LevelIndex;
pub use widget::{TreeNodeConvert, TreeWidget, VisibleRow, WidgetNode};
pub use window::{validate, DisplayWindow};
