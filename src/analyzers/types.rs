//! Data types shared by the extraction, aggregation and persistence steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::CgpaError;

/// One validated course row from the results page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub course: String,
    pub credit: f64,
    pub level_term: String,
    pub grade_letter: String,
    pub grade_point: f64,
}

/// All courses of one term and their credit-weighted average.
///
/// `cgpa` is `None` when the term carries no credits; that is a distinct
/// state from a 0.00 average and renders as `N/A`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermAggregate {
    pub term: String,
    pub cgpa: Option<f64>,
    pub courses: Vec<CourseRecord>,
}

impl TermAggregate {
    pub fn total_credits(&self) -> f64 {
        self.courses.iter().map(|c| c.credit).sum()
    }
}

/// Terms in the order they were first seen on the page, labels unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TermAggregate>", into = "Vec<TermAggregate>")]
pub struct SemesterResults {
    terms: Vec<TermAggregate>,
}

impl SemesterResults {
    /// Callers must already guarantee unique term labels.
    pub(crate) fn from_unique(terms: Vec<TermAggregate>) -> Self {
        debug_assert!(Self::try_from(terms.clone()).is_ok());
        Self { terms }
    }

    pub fn terms(&self) -> &[TermAggregate] {
        &self.terms
    }

    pub fn get(&self, term: &str) -> Option<&TermAggregate> {
        self.terms.iter().find(|t| t.term == term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Every course of every term, term by term.
    pub fn courses(&self) -> impl Iterator<Item = &CourseRecord> + Clone {
        self.terms.iter().flat_map(|t| t.courses.iter())
    }
}

impl TryFrom<Vec<TermAggregate>> for SemesterResults {
    type Error = CgpaError;

    fn try_from(terms: Vec<TermAggregate>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for t in &terms {
            if !seen.insert(t.term.as_str()) {
                return Err(CgpaError::Persistence(format!(
                    "duplicate term '{}' in results",
                    t.term
                )));
            }
        }
        Ok(Self { terms })
    }
}

impl From<SemesterResults> for Vec<TermAggregate> {
    fn from(results: SemesterResults) -> Self {
        results.terms
    }
}

/// Credit-weighted figures across every course of every term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallMetrics {
    pub cgpa: Option<f64>,
    pub total_credits: f64,
    pub term_count: usize,
}

/// Persisted form of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub terms: SemesterResults,
}

impl Snapshot {
    pub const SCHEMA_VERSION: u8 = 1;

    pub fn new(terms: SemesterResults) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION,
            generated_at: Utc::now(),
            terms,
        }
    }
}
