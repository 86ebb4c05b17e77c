//! End-to-end tests against a directory source wired by ServiceContainer

use std::fs;

use tempfile::TempDir;

use topictree::application::ApplicationError;
use topictree::config::Settings;
use topictree::infrastructure::di::ServiceContainer;
use topictree::infrastructure::traits::{Resource, TopicSource};
use topictree::infrastructure::InfraError;
use topictree::util::testing::write_sample_source;

fn sample_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_sample_source(temp.path()).expect("write sample source");
    temp
}

fn container_for(temp: &TempDir) -> ServiceContainer {
    let settings = Settings {
        source: temp.path().to_string_lossy().into_owned(),
        ..Settings::default()
    };
    ServiceContainer::new(settings).unwrap()
}

#[tokio::test]
async fn given_sample_directory_when_loading_then_indexes_three_levels() {
    // Arrange
    let temp = sample_dir();
    let container = container_for(&temp);

    // Act
    let loaded = container.loader().load().await.unwrap();

    // Assert
    assert_eq!(loaded.index.max_depth(), 3);
    assert_eq!(loaded.arena.len(), 10);
    assert_eq!(loaded.metadata.max_year, 2017);
}

#[tokio::test]
async fn given_node_documents_when_reporting_then_counts_years_in_range() {
    // Arrange
    let temp = sample_dir();
    let container = container_for(&temp);
    let loaded = container.loader().load().await.unwrap();
    let idx = loaded.arena.find("Z11").unwrap();
    let node = &loaded.arena.get_node(idx).unwrap().data;

    // Act
    let report = container
        .lookup()
        .report(node, &loaded.metadata)
        .await
        .unwrap();

    // Assert
    assert_eq!(report.title, "convolutional image layers (Z11)");
    let counts: Vec<_> = report.year_counts.into_iter().collect();
    assert_eq!(counts, vec![(2014, 1), (2015, 0), (2016, 2), (2017, 0)]);
    assert_eq!(report.total, 4);
    assert_eq!(report.documents[0].paper.url.as_deref(), Some("https://papers.example.org/1"));
}

#[tokio::test]
async fn given_small_document_limit_when_reporting_then_truncates_in_source_order() {
    let temp = sample_dir();
    let settings = Settings {
        source: temp.path().to_string_lossy().into_owned(),
        max_documents: 2,
        ..Settings::default()
    };
    let container = ServiceContainer::new(settings).unwrap();
    let loaded = container.loader().load().await.unwrap();
    let node = &loaded.arena.get_node(loaded.arena.find("Z11").unwrap()).unwrap().data;

    let report = container.lookup().report(node, &loaded.metadata).await.unwrap();

    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.total, 4);
    assert_eq!(report.documents[1].paper.title, "Strided Kernels");
}

#[tokio::test]
async fn given_node_without_documents_when_looking_up_then_lookup_failure() {
    let temp = sample_dir();
    let container = container_for(&temp);

    let err = container.lookup().lookup("Z12").await.unwrap_err();

    match err {
        ApplicationError::LookupFailure { node_id, .. } => assert_eq!(node_id, "Z12"),
        other => panic!("expected LookupFailure, got {:?}", other),
    }
}

#[tokio::test]
async fn given_malformed_document_file_when_looking_up_then_invalid_document() {
    let temp = sample_dir();
    fs::write(temp.path().join("search").join("Z13"), "<html>busy</html>").unwrap();
    let container = container_for(&temp);

    let err = container.lookup().lookup("Z13").await.unwrap_err();

    assert!(err.is_invalid_document());
}

#[tokio::test]
async fn given_missing_metadata_file_when_loading_then_metadata_stage_fails() {
    let temp = sample_dir();
    fs::remove_file(temp.path().join("sample.meta.json")).unwrap();
    let container = container_for(&temp);

    let err = container.loader().load().await.unwrap_err();

    assert!(err.to_string().starts_with("cannot load metadata"));
}

#[tokio::test]
async fn given_custom_layout_when_fetching_then_uses_configured_names() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tree.json"), r#"{"nodes": [{"id": "Z1", "label": "only"}]}"#)
        .unwrap();
    let settings = Settings {
        source: temp.path().to_string_lossy().into_owned(),
        nodes_file: "tree.json".into(),
        ..Settings::default()
    };
    let container = ServiceContainer::new(settings).unwrap();

    let raw = container.source.fetch(&Resource::Hierarchy).await.unwrap();

    assert!(raw.contains("only"));
}

#[test]
fn given_missing_directory_when_creating_container_then_invalid_source() {
    let temp = TempDir::new().unwrap();
    let settings = Settings {
        source: temp.path().join("absent").to_string_lossy().into_owned(),
        ..Settings::default()
    };

    let result = ServiceContainer::new(settings);

    assert!(matches!(result, Err(InfraError::InvalidSource(_))));
}

#[test]
fn given_http_source_when_creating_container_then_no_directory_check() {
    let settings = Settings {
        source: "http://localhost:9/topics".into(),
        ..Settings::default()
    };

    let container = ServiceContainer::new(settings).unwrap();

    assert_eq!(container.source.describe(), "http://localhost:9/topics");
}

#[test]
fn given_unparsable_http_source_when_creating_container_then_invalid_source() {
    let settings = Settings {
        source: "http://".into(),
        ..Settings::default()
    };

    let result = ServiceContainer::new(settings);

    assert!(matches!(result, Err(InfraError::InvalidSource(_))));
}
