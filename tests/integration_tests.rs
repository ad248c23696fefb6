use std::path::PathBuf;
use std::sync::Arc;

use cgpa_rater::analyzers::analyzer::analyze_rows;
use cgpa_rater::analyzers::projection::Feasibility;
use cgpa_rater::analyzers::session::Session;
use cgpa_rater::config::Settings;
use cgpa_rater::infra::store::{FileStore, SNAPSHOT_KEY, SnapshotStore};
use cgpa_rater::obfuscate::Obfuscator;
use cgpa_rater::parser::parse_result_rows;
use cgpa_rater::services::results_source::HtmlFileSource;
use cgpa_rater::stats::ResultsStats;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/result_published.html")
}

#[test]
fn test_parse_fixture_page() {
    let html = include_str!("fixtures/result_published.html");
    let results = analyze_rows(&parse_result_rows(html));

    let terms: Vec<_> = results.terms().iter().map(|t| t.term.as_str()).collect();
    assert_eq!(terms, ["L-1/T-1", "L-1/T-2"]);

    // The "E" row and the row without a credit are dropped.
    let second = results.get("L-1/T-2").unwrap();
    let courses: Vec<_> = second.courses.iter().map(|c| c.course.as_str()).collect();
    assert_eq!(courses, ["CSE 103", "CSE 105"]);
    assert_eq!(second.cgpa, Some(3.38));

    assert_eq!(results.get("L-1/T-1").unwrap().cgpa, Some(3.55));
}

#[tokio::test]
async fn test_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path()));
    let session = Session::new(store.clone(), Obfuscator::default(), Settings::default());

    let snapshot = session
        .reload(&HtmlFileSource { path: fixture() })
        .await
        .expect("Failed to scrape fixture");
    assert_eq!(snapshot.terms.len(), 2);
    assert!(store.get(SNAPSHOT_KEY).await.unwrap().is_some());

    let metrics = session.metrics().await.unwrap();
    assert_eq!(metrics.cgpa, Some(3.47));
    assert_eq!(metrics.total_credits, 13.5);
    assert_eq!(metrics.term_count, 2);

    let stats = ResultsStats::from_results(&snapshot.terms);
    assert_eq!(stats.best.as_ref().unwrap().term, "L-1/T-1");
    assert!(!stats.is_improving());

    let projection = session.project(3.6, 10.0).await.unwrap();
    assert!(projection.required_gpa > 3.77 && projection.required_gpa < 3.78);
    assert_eq!(projection.grade_needed, "A+");
    assert_eq!(projection.feasibility, Feasibility::Attainable);

    // A fresh session over the same directory sees the stored results.
    let reopened = Session::open(Arc::new(FileStore::new(dir.path())), Obfuscator::default())
        .await
        .unwrap();
    assert_eq!(reopened.snapshot().await, Some(snapshot));
}

#[tokio::test]
async fn test_obfuscated_snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path()));
    let session = Session::new(store.clone(), Obfuscator::default(), Settings::default());
    session.update_settings(Settings { obfuscate: true }).await.unwrap();
    session
        .reload(&HtmlFileSource { path: fixture() })
        .await
        .unwrap();

    let raw = store.get(SNAPSHOT_KEY).await.unwrap().unwrap();
    assert!(!raw.contains("CSE 101"));

    let reopened = Session::open(store, Obfuscator::default()).await.unwrap();
    assert!(reopened.settings().await.obfuscate);
    assert_eq!(reopened.results().await.unwrap(), session.results().await.unwrap());
}
