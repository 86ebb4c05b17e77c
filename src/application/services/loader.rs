//! Hierarchy loading pipeline
//!
//! Two strictly ordered stages: hierarchy (fetch, parse, index), then summary
//! metadata. The second stage starts only after the first has succeeded.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, LoadStage, SourceResultExt};
use crate::domain::{parse_hierarchy, HierarchyArena, LevelIndex, SummaryMetadata};
use crate::infrastructure::traits::{Resource, TopicSource};

/// Everything the tree needs, available only once both stages succeeded.
#[derive(Debug)]
pub struct LoadedHierarchy {
    pub arena: HierarchyArena,
    pub index: LevelIndex,
    pub metadata: SummaryMetadata,
}

/// Service that fetches and indexes a hierarchy.
pub struct HierarchyLoader {
    source: Arc<dyn TopicSource>,
}

impl HierarchyLoader {
    pub fn new(source: Arc<dyn TopicSource>) -> Self {
        Self { source }
    }

    /// Run both stages. No retry; the first failure ends the pipeline.
    #[instrument(level = "debug", skip(self))]
    pub async fn load(&self) -> ApplicationResult<LoadedHierarchy> {
        let (arena, index) = self.load_hierarchy().await?;
        let metadata = self.load_metadata().await?;
        info!(
            "loaded {} nodes over {} levels from {}",
            arena.len(),
            index.max_level(),
            self.source.describe()
        );
        Ok(LoadedHierarchy {
            arena,
            index,
            metadata,
        })
    }

    /// Run the pipeline and hand the result to `on_ready`.
    ///
    /// `on_ready` is called exactly once if both stages succeed and never
    /// otherwise.
    pub async fn load_then<F, R>(&self, on_ready: F) -> ApplicationResult<R>
    where
        F: FnOnce(LoadedHierarchy) -> R,
    {
        let loaded = self.load().await?;
        Ok(on_ready(loaded))
    }

    async fn load_hierarchy(&self) -> ApplicationResult<(HierarchyArena, LevelIndex)> {
        let raw = self
            .source
            .fetch(&Resource::Hierarchy)
            .await
            .in_stage(LoadStage::Hierarchy)?;
        let records = parse_hierarchy(&raw).in_stage(LoadStage::Hierarchy)?;
        let mut arena = HierarchyArena::from_records(&records).in_stage(LoadStage::Hierarchy)?;
        let index = LevelIndex::build(&mut arena);
        debug!(
            "hierarchy stage done: {} roots, max depth {}, max level {}",
            arena.roots().len(),
            index.max_depth(),
            index.max_level()
        );
        Ok((arena, index))
    }

    async fn load_metadata(&self) -> ApplicationResult<SummaryMetadata> {
        let raw = self
            .source
            .fetch(&Resource::Metadata)
            .await
            .in_stage(LoadStage::Metadata)?;
        let metadata = SummaryMetadata::parse(&raw).in_stage(LoadStage::Metadata)?;
        debug!(
            "metadata stage done: years {}..={}",
            metadata.min_year, metadata.max_year
        );
        Ok(metadata)
    }
}
