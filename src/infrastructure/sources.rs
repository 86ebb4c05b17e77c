//! Topic sources: a local directory or an HTTP endpoint.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, instrument};

use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, Resource, TopicSource};

/// File names of the three documents relative to a source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    pub nodes_file: String,
    pub meta_file: String,
    pub search_path: String,
}

impl SourceLayout {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            nodes_file: settings.nodes_file.clone(),
            meta_file: settings.meta_file.clone(),
            search_path: settings.search_path.clone(),
        }
    }

    /// Relative location of a resource, `/`-separated.
    pub fn relative(&self, resource: &Resource) -> String {
        match resource {
            Resource::Hierarchy => self.nodes_file.clone(),
            Resource::Metadata => self.meta_file.clone(),
            Resource::Documents { node_id } => {
                format!("{}/{}", self.search_path.trim_end_matches('/'), node_id)
            }
        }
    }

    /// Path segments of a resource. A document id is always one segment,
    /// whatever characters it contains.
    pub fn segments<'a>(&'a self, resource: &'a Resource) -> Vec<&'a str> {
        let (dir, name) = match resource {
            Resource::Hierarchy => (self.nodes_file.as_str(), None),
            Resource::Metadata => (self.meta_file.as_str(), None),
            Resource::Documents { node_id } => (self.search_path.as_str(), Some(node_id.as_str())),
        };
        dir.split('/').filter(|s| !s.is_empty()).chain(name).collect()
    }
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Reads documents from a directory.
///
/// Document lookups resolve to `<search_path>/<id>` or, if that does not
/// exist, `<search_path>/<id>.json`.
pub struct FileSource {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    layout: SourceLayout,
}

impl FileSource {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>, layout: SourceLayout) -> Self {
        Self {
            fs,
            root: root.into(),
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, resource: &Resource) -> PathBuf {
        let path = self.root.join(self.layout.relative(resource));
        if matches!(resource, Resource::Documents { .. }) && !self.fs.exists(&path) {
            let mut with_ext = path.into_os_string();
            with_ext.push(".json");
            return PathBuf::from(with_ext);
        }
        path
    }
}

#[async_trait]
impl TopicSource for FileSource {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, resource: &Resource) -> io::Result<String> {
        let path = self.path_for(resource);
        debug!("reading {}", path.display());
        self.fs.read_to_string(&path).map_err(|e| {
            io::Error::new(e.kind(), format!("{}: {}", path.display(), e))
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Fetches documents over HTTP relative to a base URL.
///
/// No request timeout is configured: a stalled request stays pending until
/// the transport reports an outcome.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
    layout: SourceLayout,
}

impl HttpSource {
    pub fn new(base_url: Url, layout: SourceLayout) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            layout,
        }
    }

    /// Resource location below the base URL; segments are percent-encoded.
    pub fn url_for(&self, resource: &Resource) -> io::Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} cannot carry a path", self.base_url),
                )
            })?
            .pop_if_empty()
            .extend(self.layout.segments(resource));
        Ok(url)
    }
}

#[async_trait]
impl TopicSource for HttpSource {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, resource: &Resource) -> io::Result<String> {
        let url = self.url_for(resource)?;
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| io::Error::other(format!("{}: {}", url, e)))?;
        response
            .text()
            .await
            .map_err(|e| io::Error::other(format!("{}: {}", url, e)))
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}

/// Whether a configured source names an HTTP endpoint.
pub fn is_http_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
