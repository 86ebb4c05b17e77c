//! Test support: logging setup and a small sample topic source.

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::NodeRecord;

static TEST_SETUP: Once = Once::new();

/// Hierarchy in the jstree shape a topic source serves: two level-3 roots,
/// six level-2 topics, two level-1 topics.
pub const SAMPLE_NODES: &str = r#"var nodes = [
  {"id": "Z21", "text": "learning network neural", "data": {"level": 3}, "children": [
    {"id": "Z11", "text": "convolutional image layers", "data": {"level": 2}, "children": [
      {"id": "Z01", "text": "pooling stride kernel", "data": {"level": 1}},
      {"id": "Z02", "text": "segmentation pixel mask", "data": {"level": 1}}
    ]},
    {"id": "Z12", "text": "recurrent sequence lstm", "data": {"level": 2}},
    {"id": "Z13", "text": "reinforcement reward policy", "data": {"level": 2}}
  ]},
  {"id": "Z22", "text": "query database index", "data": {"level": 3}, "children": [
    {"id": "Z14", "text": "transaction concurrency lock", "data": {"level": 2}},
    {"id": "Z15", "text": "join optimizer cost", "data": {"level": 2}},
    {"id": "Z16", "text": "storage page buffer", "data": {"level": 2}}
  ]}
];
"#;

pub const SAMPLE_META: &str = r#"{"minYear": 2014, "maxYear": 2017}"#;

/// Documents for `Z11`; one year falls outside the metadata bounds.
pub const SAMPLE_DOCS_Z11: &str = r#"{"doc": [
  {"prob": 0.91, "paper": {"series": "NIPS", "year": 2016, "title": "Deep Residual Pooling", "author": "A. Author", "url": "https://papers.example.org/1"}},
  {"prob": 0.84, "paper": {"series": "ICML", "year": 2016, "title": "Strided Kernels", "author": "B. Author"}},
  {"prob": 0.52, "paper": {"series": "NIPS", "year": 2014, "title": "Image Layers Revisited", "author": "C. Author"}},
  {"prob": 0.31, "paper": {"series": "ICML", "year": 2011, "title": "Early Convolutions", "author": "D. Author"}}
]}"#;

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "rustls"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Write the sample hierarchy, metadata and `Z11` documents into `dir`
/// using the default file layout.
pub fn write_sample_source(dir: &Path) -> io::Result<()> {
    fs::write(dir.join("sample.nodes.js"), SAMPLE_NODES)?;
    fs::write(dir.join("sample.meta.json"), SAMPLE_META)?;
    fs::create_dir_all(dir.join("search"))?;
    fs::write(dir.join("search").join("Z11.json"), SAMPLE_DOCS_Z11)?;
    Ok(())
}

/// `roots` roots with `children` leaf children each; ids `r{i}` and `r{i}.{j}`.
pub fn uniform_records(roots: usize, children: usize) -> Vec<NodeRecord> {
    (1..=roots)
        .map(|i| {
            NodeRecord::new(format!("r{}", i), format!("root {}", i)).with_children(
                (1..=children)
                    .map(|j| NodeRecord::new(format!("r{}.{}", i, j), format!("child {}.{}", i, j)))
                    .collect(),
            )
        })
        .collect()
}

/// A single chain `c1 -> c2 -> ... -> c{depth}`.
pub fn chain_records(depth: usize) -> Vec<NodeRecord> {
    let mut node: Option<NodeRecord> = None;
    for d in (1..=depth).rev() {
        let mut record = NodeRecord::new(format!("c{}", d), format!("chain node {}", d));
        if let Some(child) = node.take() {
            record = record.with_children(vec![child]);
        }
        node = Some(record);
    }
    node.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_hierarchy;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_sample_nodes_when_parsing_then_two_roots() {
        let roots = parse_hierarchy(SAMPLE_NODES).unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].children.len(), 3);
    }

    #[test]
    fn given_chain_builder_when_depth_three_then_nested_once_per_level() {
        let roots = chain_records(3);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children[0].children[0].id, "c3");
    }
}
