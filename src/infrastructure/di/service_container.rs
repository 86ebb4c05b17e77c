//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::{DocumentLookup, HierarchyLoader};
use crate::config::Settings;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::sources::{is_http_source, FileSource, HttpSource, SourceLayout};
use crate::infrastructure::traits::{FileSystem, RealFileSystem, TopicSource};

/// Container holding the settings and the I/O boundaries services run against.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Where hierarchy, metadata and documents are fetched from
    pub source: Arc<dyn TopicSource>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    ///
    /// `settings.source` selects an HTTP endpoint or a local directory.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let layout = SourceLayout::from_settings(&settings);

        let source: Arc<dyn TopicSource> = if is_http_source(&settings.source) {
            let base_url = reqwest::Url::parse(&settings.source).map_err(|e| {
                InfraError::InvalidSource(format!("{}: {}", settings.source, e))
            })?;
            debug!("using http source {}", base_url);
            Arc::new(HttpSource::new(base_url, layout))
        } else {
            let root = PathBuf::from(&settings.source);
            if !fs.is_dir(&root) {
                return Err(InfraError::InvalidSource(format!(
                    "not a directory: {}",
                    root.display()
                )));
            }
            debug!("using directory source {}", root.display());
            Arc::new(FileSource::new(fs.clone(), root, layout))
        };

        Ok(Self::with_deps(settings, fs, source))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        source: Arc<dyn TopicSource>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            source,
        }
    }

    pub fn loader(&self) -> HierarchyLoader {
        HierarchyLoader::new(self.source.clone())
    }

    pub fn lookup(&self) -> DocumentLookup {
        DocumentLookup::new(self.source.clone(), self.settings.max_documents)
    }
}
