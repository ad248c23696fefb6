use tracing::info;

use crate::analyzers::aggregate::group_by_term;
use crate::analyzers::extract::extract_courses;
use crate::analyzers::types::{SemesterResults, Snapshot};
use crate::error::Result;
use crate::infra::store::{SnapshotStore, save_snapshot};
use crate::obfuscate::Obfuscator;
use crate::services::results_source::RowSource;

/// Extracts valid courses from raw rows and aggregates them per term.
pub fn analyze_rows<R: AsRef<[String]>>(rows: &[R]) -> SemesterResults {
    group_by_term(extract_courses(rows))
}

/// Runs one full pass: read rows from `source`, aggregate, and replace the
/// stored snapshot.
///
/// The previous snapshot is never merged; a failed write leaves it in place
/// and the error is returned as is.
#[tracing::instrument(skip_all, fields(source = %source.describe()))]
pub async fn scrape_and_store(
    source: &dyn RowSource,
    store: &dyn SnapshotStore,
    obfuscator: Option<&Obfuscator>,
) -> Result<Snapshot> {
    let rows = source.rows().await?;
    let results = analyze_rows(&rows);
    let snapshot = Snapshot::new(results);

    save_snapshot(store, &snapshot, obfuscator).await?;

    info!(
        rows = rows.len(),
        courses = snapshot.terms.courses().count(),
        terms = snapshot.terms.len(),
        "Stored fresh snapshot"
    );
    Ok(snapshot)
}
