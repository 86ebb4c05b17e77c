//! Document lookup for a selected node.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, SourceResultExt};
use crate::domain::{DocumentRecord, NodeData, SummaryMetadata, TopicDocuments};
use crate::infrastructure::traits::{Resource, TopicSource};

/// Detail view contents for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentReport {
    /// `label (id)`
    pub title: String,
    /// Document count per year over the corpus range
    pub year_counts: BTreeMap<i32, usize>,
    /// Documents in source order, truncated to the configured limit
    pub documents: Vec<DocumentRecord>,
    /// Number of documents before truncation
    pub total: usize,
    pub limit: usize,
}

impl DocumentReport {
    pub fn new(
        node: &NodeData,
        docs: TopicDocuments,
        metadata: &SummaryMetadata,
        limit: usize,
    ) -> Self {
        let year_counts = docs.year_counts(metadata);
        let total = docs.documents.len();
        let mut documents = docs.documents;
        documents.truncate(limit);
        Self {
            title: node.to_string(),
            year_counts,
            documents,
            total,
            limit,
        }
    }
}

/// Service resolving node identifiers to their documents.
pub struct DocumentLookup {
    source: Arc<dyn TopicSource>,
    max_documents: usize,
}

impl DocumentLookup {
    pub fn new(source: Arc<dyn TopicSource>, max_documents: usize) -> Self {
        Self {
            source,
            max_documents,
        }
    }

    /// Fetch and parse the documents of `node_id`.
    ///
    /// Failures are `LookupFailure`s scoped to this node.
    #[instrument(level = "debug", skip(self))]
    pub async fn lookup(&self, node_id: &str) -> ApplicationResult<TopicDocuments> {
        let resource = Resource::Documents {
            node_id: node_id.to_string(),
        };
        let raw = self.source.fetch(&resource).await.for_node(node_id)?;
        let docs = TopicDocuments::parse(&raw).for_node(node_id)?;
        debug!("{} documents for {}", docs.documents.len(), node_id);
        Ok(docs)
    }

    /// Fetch documents and assemble the detail view for `node`.
    pub async fn report(
        &self,
        node: &NodeData,
        metadata: &SummaryMetadata,
    ) -> ApplicationResult<DocumentReport> {
        let docs = self.lookup(&node.id).await?;
        Ok(DocumentReport::new(node, docs, metadata, self.max_documents))
    }
}
