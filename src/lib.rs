//! Level-bounded browser for hierarchical topic trees.
//!
//! A hierarchy is loaded from a topic source and every node is indexed by
//! depth and by level, with the roots on the highest level. A validated level
//! window decides which nodes are roots, which are open and which are
//! collapsed.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
