//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::fmt;
use std::io;
use std::path::Path;

use async_trait::async_trait;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// A document a topic source can deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// The raw hierarchy
    Hierarchy,
    /// Summary metadata (year bounds)
    Metadata,
    /// Documents attached to one node
    Documents { node_id: String },
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Hierarchy => write!(f, "hierarchy"),
            Resource::Metadata => write!(f, "metadata"),
            Resource::Documents { node_id } => write!(f, "documents for {}", node_id),
        }
    }
}

/// Where hierarchy, metadata and document lookups come from.
///
/// A fetch resolves once with the raw document text or a transport error.
/// Callers never issue two fetches concurrently.
#[async_trait]
pub trait TopicSource: Send + Sync {
    async fn fetch(&self, resource: &Resource) -> io::Result<String>;

    /// Human-readable origin for messages.
    fn describe(&self) -> String;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
