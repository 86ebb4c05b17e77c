//! Domain entities: the documents consumed from a topic source

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// One node of the raw hierarchy as delivered by the source.
///
/// Depth is not part of the record; it is derived when the hierarchy is indexed.
/// `data.level` is kept when present and numbers levels from the bottom.
/// Extra fields (`state`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    /// Display label (`text` in jstree-shaped documents)
    #[serde(rename = "text", alias = "label")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RecordData>,
    #[serde(default)]
    pub children: Vec<NodeRecord>,
}

/// The `data` object of a jstree node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordData {
    /// Level number assigned by the topic model; roots carry the highest one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            data: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<NodeRecord>) -> Self {
        self.children = children;
        self
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.data = Some(RecordData { level: Some(level) });
        self
    }

    /// Level declared by the source, if any.
    pub fn level(&self) -> Option<usize> {
        self.data.as_ref().and_then(|d| d.level)
    }
}

// Nested records are released iteratively so a deep chain cannot exhaust the stack.
impl Drop for NodeRecord {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut record) = pending.pop() {
            pending.append(&mut record.children);
        }
    }
}

#[derive(Deserialize)]
struct WrappedHierarchy {
    nodes: Vec<NodeRecord>,
}

/// Parse a hierarchy document into its root records.
///
/// Accepts a JSON array of roots, an object `{"nodes": [...]}`, or a script
/// assignment such as `var nodes = [...];`. Nesting depth is unbounded.
pub fn parse_hierarchy(content: &str) -> DomainResult<Vec<NodeRecord>> {
    let json = strip_assignment(content);
    let parsed = if json.starts_with('{') {
        deserialize_unbounded::<WrappedHierarchy>(json).map(|doc| doc.nodes)
    } else {
        deserialize_unbounded::<Vec<NodeRecord>>(json)
    };
    parsed.map_err(|e| DomainError::InvalidDocument {
        kind: "hierarchy",
        message: e.to_string(),
    })
}

/// Deserialize without serde_json's recursion limit, growing the stack on
/// the heap as nesting requires.
fn deserialize_unbounded<'de, T: Deserialize<'de>>(json: &'de str) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// `var nodes = [ ... ];` → `[ ... ]`
fn strip_assignment(content: &str) -> &str {
    let trimmed = content.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return trimmed;
    }
    match trimmed.find('=') {
        Some(pos) => trimmed[pos + 1..].trim().trim_end_matches(';').trim_end(),
        None => trimmed,
    }
}

/// Year bounds of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetadata {
    pub min_year: i32,
    pub max_year: i32,
}

impl SummaryMetadata {
    pub fn parse(content: &str) -> DomainResult<Self> {
        serde_json::from_str(content).map_err(|e| DomainError::InvalidDocument {
            kind: "metadata",
            message: e.to_string(),
        })
    }

    /// Zero count for every year in `min_year..=max_year`.
    pub fn empty_histogram(&self) -> BTreeMap<i32, usize> {
        (self.min_year..=self.max_year).map(|y| (y, 0)).collect()
    }
}

/// Bibliographic fields of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub series: String,
    pub year: i32,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A document associated with a topic, with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub paper: Paper,
    pub prob: f64,
}

/// Documents returned for one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicDocuments {
    #[serde(rename = "doc", default)]
    pub documents: Vec<DocumentRecord>,
}

impl TopicDocuments {
    pub fn parse(content: &str) -> DomainResult<Self> {
        serde_json::from_str(content).map_err(|e| DomainError::InvalidDocument {
            kind: "document lookup",
            message: e.to_string(),
        })
    }

    /// Number of documents per year over the metadata range.
    ///
    /// Years outside `min_year..=max_year` are not counted.
    pub fn year_counts(&self, metadata: &SummaryMetadata) -> BTreeMap<i32, usize> {
        let mut counts = metadata.empty_histogram();
        for doc in &self.documents {
            if let Some(count) = counts.get_mut(&doc.paper.year) {
                *count += 1;
            }
        }
        counts
    }
}
