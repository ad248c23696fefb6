//! What-if projection: the average needed over the remaining credits to
//! finish at a target CGPA.

use serde::Serialize;

use crate::analyzers::grade::grade_for_gpa;
use crate::analyzers::types::OverallMetrics;
use crate::error::{CgpaError, Result};

/// Top of the grade scale.
pub const MAX_GPA: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Feasibility {
    /// The target is met even with a zero average from here on.
    AlreadySecured,
    Attainable,
    /// The required average is above the top of the scale.
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub target_cgpa: f64,
    pub remaining_credits: f64,
    pub required_gpa: f64,
    pub grade_needed: &'static str,
    pub feasibility: Feasibility,
}

/// Computes the average needed over `remaining_credits` to reach `target_cgpa`.
///
/// A required average below zero or above 4.0 is a valid result and is
/// reported through [`Feasibility`]; only nonsensical inputs are rejected.
pub fn project(
    current_cgpa: f64,
    current_credits: f64,
    target_cgpa: f64,
    remaining_credits: f64,
) -> Result<Projection> {
    if !target_cgpa.is_finite() || target_cgpa <= 0.0 {
        return Err(CgpaError::InvalidInput(format!(
            "target CGPA must be a positive number, got {target_cgpa}"
        )));
    }
    if !remaining_credits.is_finite() || remaining_credits <= 0.0 {
        return Err(CgpaError::InvalidInput(format!(
            "remaining credits must be a positive number, got {remaining_credits}"
        )));
    }
    if !current_credits.is_finite() || current_credits < 0.0 {
        return Err(CgpaError::InvalidInput(format!(
            "current credits must be zero or more, got {current_credits}"
        )));
    }
    if !current_cgpa.is_finite() {
        return Err(CgpaError::InvalidInput(format!(
            "current CGPA must be a number, got {current_cgpa}"
        )));
    }

    let required_total = target_cgpa * (current_credits + remaining_credits);
    let current_total = current_cgpa * current_credits;
    let required_gpa = (required_total - current_total) / remaining_credits;
    if !required_gpa.is_finite() {
        return Err(CgpaError::InvalidInput(format!(
            "inputs are too large to project (required GPA came out as {required_gpa})"
        )));
    }

    let feasibility = if required_gpa <= 0.0 {
        Feasibility::AlreadySecured
    } else if required_gpa > MAX_GPA {
        Feasibility::Unreachable
    } else {
        Feasibility::Attainable
    };

    Ok(Projection {
        target_cgpa,
        remaining_credits,
        required_gpa,
        grade_needed: grade_for_gpa(required_gpa),
        feasibility,
    })
}

impl Projection {
    /// Projects from aggregated results. An empty record counts as 0 credits at 0.00.
    pub fn from_metrics(
        metrics: &OverallMetrics,
        target_cgpa: f64,
        remaining_credits: f64,
    ) -> Result<Self> {
        project(
            metrics.cgpa.unwrap_or(0.0),
            metrics.total_credits,
            target_cgpa,
            remaining_credits,
        )
    }
}
