//! Error conversion helpers for source fetches
//!
//! Provides extension traits that attach loader or lookup context.

use crate::application::{ApplicationError, ApplicationResult, LoadStage};

/// Extension trait for converting fetch and parse results into `ApplicationResult`.
pub trait SourceResultExt<T> {
    /// Mark a failure as fatal to the given loader stage.
    ///
    /// # Example
    /// ```ignore
    /// source.fetch(&Resource::Metadata).await
    ///     .in_stage(LoadStage::Metadata)?;
    /// ```
    fn in_stage(self, stage: LoadStage) -> ApplicationResult<T>;

    /// Scope a failure to the detail view of one node.
    fn for_node(self, node_id: &str) -> ApplicationResult<T>;
}

impl<T, E> SourceResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn in_stage(self, stage: LoadStage) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::LoadFailure {
            stage,
            source: Box::new(e),
        })
    }

    fn for_node(self, node_id: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::LookupFailure {
            node_id: node_id.to_string(),
            source: Box::new(e),
        })
    }
}
