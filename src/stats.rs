use serde::Serialize;
use tracing::debug;

use crate::analyzers::types::SemesterResults;
use crate::analyzers::utility::{mean, round2};

/// One term's line in the credit summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermCredits {
    pub term: String,
    pub credits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermHighlight {
    pub term: String,
    pub cgpa: f64,
}

/// Trend and highlight figures over the per-term CGPAs.
///
/// Terms without a CGPA are left out of the average, trend and highlights
/// but still appear in the credit summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsStats {
    /// Plain mean of the term CGPAs (not credit weighted).
    pub average: Option<f64>,
    /// Last term CGPA minus first term CGPA, in page order.
    pub trend: f64,
    pub best: Option<TermHighlight>,
    pub worst: Option<TermHighlight>,
    pub credits: Vec<TermCredits>,
}

impl ResultsStats {
    pub fn from_results(results: &SemesterResults) -> Self {
        let graded: Vec<(&str, f64)> = results
            .terms()
            .iter()
            .filter_map(|t| t.cgpa.map(|c| (t.term.as_str(), c)))
            .collect();
        let cgpas: Vec<f64> = graded.iter().map(|(_, c)| *c).collect();

        let average = if cgpas.is_empty() {
            None
        } else {
            Some(round2(mean(&cgpas)))
        };

        let trend = match (cgpas.first(), cgpas.last()) {
            (Some(first), Some(last)) if cgpas.len() > 1 => round2(last - first),
            _ => 0.0,
        };

        // Ties go to the earlier term.
        let mut best: Option<(&str, f64)> = None;
        let mut worst: Option<(&str, f64)> = None;
        for &(term, cgpa) in &graded {
            if best.is_none_or(|(_, b)| cgpa > b) {
                best = Some((term, cgpa));
            }
            if worst.is_none_or(|(_, w)| cgpa < w) {
                worst = Some((term, cgpa));
            }
        }

        let highlight = |(term, cgpa): (&str, f64)| TermHighlight {
            term: term.to_string(),
            cgpa,
        };

        let stats = Self {
            average,
            trend,
            best: best.map(highlight),
            worst: worst.map(highlight),
            credits: results
                .terms()
                .iter()
                .map(|t| TermCredits {
                    term: t.term.clone(),
                    credits: t.total_credits(),
                })
                .collect(),
        };
        debug!(?stats, "Computed results stats");
        stats
    }

    pub fn is_improving(&self) -> bool {
        self.trend >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::TermAggregate;

    fn results(terms: &[(&str, Option<f64>)]) -> SemesterResults {
        let terms = terms
            .iter()
            .map(|(term, cgpa)| TermAggregate {
                term: term.to_string(),
                cgpa: *cgpa,
                courses: vec![],
            })
            .collect::<Vec<_>>();
        SemesterResults::try_from(terms).unwrap()
    }

    #[test]
    fn test_empty_results() {
        let stats = ResultsStats::from_results(&SemesterResults::default());
        assert_eq!(stats.average, None);
        assert_eq!(stats.trend, 0.0);
        assert!(stats.best.is_none());
        assert!(stats.worst.is_none());
        assert!(stats.credits.is_empty());
        assert!(stats.is_improving());
    }

    #[test]
    fn test_single_term_has_no_trend() {
        let stats = ResultsStats::from_results(&results(&[("L1T1", Some(3.5))]));
        assert_eq!(stats.average, Some(3.5));
        assert_eq!(stats.trend, 0.0);
        assert_eq!(stats.best, stats.worst);
    }

    #[test]
    fn test_trend_and_highlights() {
        let stats = ResultsStats::from_results(&results(&[
            ("L1T1", Some(3.2)),
            ("L1T2", Some(3.8)),
            ("L2T1", Some(2.9)),
            ("L2T2", Some(3.5)),
        ]));
        assert_eq!(stats.average, Some(3.35));
        assert_eq!(stats.trend, 0.3);
        assert_eq!(stats.best.as_ref().unwrap().term, "L1T2");
        assert_eq!(stats.worst.as_ref().unwrap().term, "L2T1");
        assert!(stats.is_improving());
    }

    #[test]
    fn test_declining_trend() {
        let stats =
            ResultsStats::from_results(&results(&[("L1T1", Some(3.75)), ("L1T2", Some(3.0))]));
        assert_eq!(stats.trend, -0.75);
        assert!(!stats.is_improving());
    }

    #[test]
    fn test_terms_without_cgpa_are_skipped() {
        let stats = ResultsStats::from_results(&results(&[
            ("L1T1", Some(3.0)),
            ("L1T2", None),
            ("L2T1", Some(3.5)),
        ]));
        assert_eq!(stats.average, Some(3.25));
        assert_eq!(stats.trend, 0.5);
        assert_eq!(stats.credits.len(), 3);
    }
}
