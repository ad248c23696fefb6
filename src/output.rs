//! Rendering of results for the terminal and for files.
//!
//! Supports the overview and per-term tables, a short copy-paste summary, a
//! full plain-text report, and CSV export of the course list.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::analyzers::projection::{Feasibility, Projection};
use crate::analyzers::types::{OverallMetrics, SemesterResults};
use crate::analyzers::utility::{format_cgpa, format_credits};
use crate::stats::ResultsStats;

/// Renders a value as pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_overview(metrics: &OverallMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Overall CGPA:  {}", format_cgpa(metrics.cgpa));
    let _ = writeln!(out, "Total credits: {}", format_credits(metrics.total_credits));
    let _ = writeln!(out, "Semesters:     {}", metrics.term_count);
    out
}

/// One table per term, best and worst terms marked.
pub fn render_terms(results: &SemesterResults) -> String {
    let stats = ResultsStats::from_results(results);
    let best = stats.best.as_ref().map(|h| h.term.as_str());
    let worst = stats.worst.as_ref().map(|h| h.term.as_str());

    let name_width = results
        .courses()
        .map(|c| c.course.chars().count())
        .max()
        .unwrap_or(0)
        .max("Course".len());

    let mut out = String::new();
    for term in results.terms() {
        let marker = if Some(term.term.as_str()) == best && results.len() > 1 {
            "  (best)"
        } else if Some(term.term.as_str()) == worst && results.len() > 1 {
            "  (needs improvement)"
        } else {
            ""
        };

        let _ = writeln!(out, "{}  CGPA: {}{}", term.term, format_cgpa(term.cgpa), marker);
        let _ = writeln!(
            out,
            "  {:<name_width$}  {:>6}  {:<5}  {:>5}",
            "Course", "Credit", "Grade", "Point"
        );
        for course in &term.courses {
            let _ = writeln!(
                out,
                "  {:<name_width$}  {:>6}  {:<5}  {:>5.2}",
                course.course,
                format_credits(course.credit),
                course.grade_letter,
                course.grade_point
            );
        }
        let _ = writeln!(out);
    }
    out
}

pub fn render_stats(stats: &ResultsStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Average term CGPA: {}", format_cgpa(stats.average));
    let _ = writeln!(
        out,
        "Trend: {} ({}{:.2})",
        if stats.is_improving() { "Improving" } else { "Declining" },
        if stats.is_improving() { "+" } else { "" },
        stats.trend
    );
    if let Some(best) = &stats.best {
        let _ = writeln!(out, "Best performance: {} (CGPA: {:.2})", best.term, best.cgpa);
    }
    if let Some(worst) = &stats.worst {
        let _ = writeln!(out, "Needs improvement: {} (CGPA: {:.2})", worst.term, worst.cgpa);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Credits per semester:");
    for line in &stats.credits {
        let _ = writeln!(out, "  {}: {} credits", line.term, format_credits(line.credits));
    }
    out
}

pub fn render_projection(p: &Projection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "To achieve {} CGPA:", p.target_cgpa);
    let _ = writeln!(
        out,
        "You need {:.2} GPA in the remaining {} credits",
        p.required_gpa,
        format_credits(p.remaining_credits)
    );
    let _ = writeln!(out, "Average grade needed: {}", p.grade_needed);
    match p.feasibility {
        Feasibility::Unreachable => {
            let _ = writeln!(out, "This target is above the 4.00 maximum and cannot be reached.");
        }
        Feasibility::AlreadySecured => {
            let _ = writeln!(out, "This target is already secured.");
        }
        Feasibility::Attainable => {}
    }
    out
}

/// Short plain-text summary meant for pasting elsewhere.
pub fn summary_text(results: &SemesterResults, metrics: &OverallMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "CGPA Summary");
    let _ = writeln!(out, "Overall CGPA: {}", format_cgpa(metrics.cgpa));
    let _ = writeln!(out, "Total Credits: {}", format_credits(metrics.total_credits));
    let _ = writeln!(out, "Semesters: {}", metrics.term_count);
    let _ = writeln!(out);
    for term in results.terms() {
        let _ = writeln!(out, "{}: CGPA {}", term.term, format_cgpa(term.cgpa));
    }
    out
}

/// Full report: overall CGPA, then every term with its courses.
pub fn report_text(results: &SemesterResults, metrics: &OverallMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "CGPA Report");
    let _ = writeln!(out, "Overall CGPA: {}", format_cgpa(metrics.cgpa));
    let _ = writeln!(out);

    for term in results.terms() {
        let _ = writeln!(out, "{}: CGPA {}", term.term, format_cgpa(term.cgpa));
        for course in &term.courses {
            let _ = writeln!(
                out,
                "  {} - {} ({})",
                course.course, course.grade_letter, course.grade_point
            );
        }
        let _ = writeln!(out);
    }
    out
}

pub fn write_report(path: &Path, results: &SemesterResults, metrics: &OverallMetrics) -> Result<()> {
    std::fs::write(path, report_text(results, metrics))?;
    info!(path = %path.display(), "Report written");
    Ok(())
}

/// Writes every course as a CSV row with a header line, overwriting `path`.
pub fn write_courses_csv(path: &Path, results: &SemesterResults) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut count = 0;
    for course in results.courses() {
        writer.serialize(course)?;
        count += 1;
    }
    writer.flush()?;

    info!(path = %path.display(), courses = count, "Courses exported");
    Ok(count)
}
