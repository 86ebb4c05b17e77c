//! Tests for the interactive browse session driven line by line

use tempfile::TempDir;

use topictree::application::{BrowseSession, SessionOutcome};
use topictree::config::Settings;
use topictree::domain::RangeError;
use topictree::infrastructure::di::ServiceContainer;
use topictree::util::testing::write_sample_source;

async fn start() -> (TempDir, BrowseSession) {
    let temp = TempDir::new().unwrap();
    write_sample_source(temp.path()).unwrap();
    let settings = Settings {
        source: temp.path().to_string_lossy().into_owned(),
        ..Settings::default()
    };
    let container = ServiceContainer::new(settings).unwrap();
    let session = container
        .loader()
        .load_then(|loaded| BrowseSession::start(loaded, container.lookup()))
        .await
        .unwrap()
        .unwrap();
    (temp, session)
}

#[tokio::test]
async fn given_started_session_when_inspecting_then_initial_window_rendered() {
    let (_temp, session) = start().await;

    assert_eq!(session.controls().window().to_string(), "3..2");
    assert_eq!(session.controller().lifecycle().created, 1);
    assert_eq!(session.metadata().min_year, 2014);
    let rows = session.controller().widget().unwrap().visible_rows();
    let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["Z21", "Z11", "Z12", "Z13", "Z22", "Z14", "Z15", "Z16"]);
    assert!(rows.iter().filter(|r| r.level == 2).all(|r| !r.opened));
}

#[tokio::test]
async fn given_full_window_when_handling_then_roots_and_every_level_shown() {
    let (_temp, mut session) = start().await;

    let outcome = session.handle_line("levels 3 1").await;

    match outcome {
        SessionOutcome::Rendered(window) => assert_eq!(window.to_string(), "3..1"),
        other => panic!("unexpected outcome {:?}", other),
    }
    let widget = session.controller().widget().unwrap();
    assert_eq!(widget.roots().len(), 2);
    let rows = widget.visible_rows();
    let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["Z21", "Z11", "Z01", "Z02", "Z12", "Z13", "Z22", "Z14", "Z15", "Z16"]
    );
}

#[tokio::test]
async fn given_levels_line_when_handling_then_renders_window() {
    let (_temp, mut session) = start().await;

    let outcome = session.handle_line("levels 2 1").await;

    match outcome {
        SessionOutcome::Rendered(window) => assert_eq!(window.to_string(), "2..1"),
        other => panic!("unexpected outcome {:?}", other),
    }
    let roots = session.controller().widget().unwrap().roots().len();
    assert_eq!(roots, 6);
}

#[tokio::test]
async fn given_too_large_top_when_handling_then_rejected_and_window_kept() {
    let (_temp, mut session) = start().await;

    let outcome = session.handle_line("levels 9 1").await;

    assert_eq!(
        outcome,
        SessionOutcome::Rejected(RangeError::TopTooLarge { max_level: 3 })
    );
    assert_eq!(session.controls().window().to_string(), "3..2");
    assert_eq!(session.controls().top_input(), 3);
}

#[tokio::test]
async fn given_filter_then_clear_when_handling_then_rows_restored() {
    let (_temp, mut session) = start().await;
    session.handle_line("levels 2 1").await;
    let before = session.controller().widget().unwrap().visible_rows();

    let filtered = session.handle_line("filter LOCK").await;
    let rows = session.controller().widget().unwrap().visible_rows();
    let cleared = session.handle_line("clear").await;

    assert_eq!(
        filtered,
        SessionOutcome::Filtered {
            text: "LOCK".into(),
            matches: 1
        }
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "Z14");
    assert_eq!(cleared, SessionOutcome::Cleared);
    assert_eq!(session.controller().widget().unwrap().visible_rows(), before);
}

#[tokio::test]
async fn given_node_with_documents_when_selecting_then_document_report() {
    let (_temp, mut session) = start().await;

    let outcome = session.handle_line("select Z11").await;

    match outcome {
        SessionOutcome::Documents(report) => {
            assert_eq!(report.total, 4);
            assert_eq!(report.year_counts.get(&2016), Some(&2));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn given_node_without_documents_when_selecting_then_tree_untouched() {
    let (_temp, mut session) = start().await;
    let before = session.controller().widget().unwrap().visible_rows();

    let outcome = session.handle_line("select Z16").await;

    assert!(matches!(
        outcome,
        SessionOutcome::LookupUnavailable { ref node_id, .. } if node_id == "Z16"
    ));
    assert_eq!(session.controller().widget().unwrap().visible_rows(), before);
    assert_eq!(session.controller().lifecycle().created, 1);
}

#[tokio::test]
async fn given_unknown_node_or_verb_when_handling_then_usage() {
    let (_temp, mut session) = start().await;

    assert!(matches!(
        session.handle_line("select nope").await,
        SessionOutcome::Usage(_)
    ));
    assert!(matches!(
        session.handle_line("dance").await,
        SessionOutcome::Usage(_)
    ));
    assert_eq!(session.handle_line("quit").await, SessionOutcome::Quit);
}
