use crate::analyzers::types::{CourseRecord, OverallMetrics, SemesterResults, TermAggregate};
use crate::analyzers::utility::{round_decimal, round2, to_decimal};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Groups validated courses into terms and computes each term's CGPA.
///
/// Terms keep the order in which they are first seen; courses keep their
/// order within a term.
pub fn group_by_term(courses: Vec<CourseRecord>) -> SemesterResults {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<CourseRecord>)> = Vec::new();

    for course in courses {
        match index.get(&course.level_term) {
            Some(&i) => buckets[i].1.push(course),
            None => {
                index.insert(course.level_term.clone(), buckets.len());
                buckets.push((course.level_term.clone(), vec![course]));
            }
        }
    }

    let terms = buckets
        .into_iter()
        .map(|(term, courses)| TermAggregate {
            cgpa: term_cgpa(&courses),
            term,
            courses,
        })
        .collect();

    SemesterResults::from_unique(terms)
}

/// Credit-weighted grade point average, rounded to two decimals.
///
/// Returns `None` when the courses carry no credits.
pub fn term_cgpa(courses: &[CourseRecord]) -> Option<f64> {
    weighted(courses.iter())
}

/// Credit-weighted figures over every course in every term.
///
/// This is not the mean of the per-term CGPAs: terms with more credits weigh
/// more.
pub fn overall_metrics(results: &SemesterResults) -> OverallMetrics {
    OverallMetrics {
        cgpa: weighted(results.courses()),
        total_credits: results.courses().map(|c| c.credit).sum(),
        term_count: results.len(),
    }
}

/// Weighted average in decimal arithmetic, so a result that is exactly on a
/// half rounds away from zero.
fn weighted<'a, I>(courses: I) -> Option<f64>
where
    I: Iterator<Item = &'a CourseRecord> + Clone,
{
    if let Some((points, credits)) = decimal_totals(courses.clone()) {
        if credits.is_zero() {
            return None;
        }
        if let Some(average) = points.checked_div(credits).and_then(round_decimal) {
            return Some(average);
        }
    }

    // Values beyond the decimal range.
    let (points, credits) = float_totals(courses);
    (credits > 0.0).then(|| round2(points / credits))
}

fn decimal_totals<'a>(courses: impl Iterator<Item = &'a CourseRecord>) -> Option<(Decimal, Decimal)> {
    let mut total_points = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;

    for course in courses {
        let credit = to_decimal(course.credit)?;
        let point = to_decimal(course.grade_point)?;
        total_points = total_points.checked_add(credit.checked_mul(point)?)?;
        total_credits = total_credits.checked_add(credit)?;
    }

    Some((total_points, total_credits))
}

fn float_totals<'a>(courses: impl Iterator<Item = &'a CourseRecord>) -> (f64, f64) {
    let mut total_points = 0.0;
    let mut total_credits = 0.0;

    for course in courses {
        total_points += course.credit * course.grade_point;
        total_credits += course.credit;
    }

    (total_points, total_credits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::grade::grade_point;

    fn course(name: &str, credit: f64, term: &str, letter: &str) -> CourseRecord {
        CourseRecord {
            course: name.to_string(),
            credit,
            level_term: term.to_string(),
            grade_letter: letter.to_string(),
            grade_point: grade_point(letter).unwrap(),
        }
    }

    #[test]
    fn test_single_term_cgpa() {
        let results = group_by_term(vec![
            course("CSE 101", 3.0, "L1T1", "A+"),
            course("MATH 101", 2.0, "L1T1", "B"),
        ]);
        assert_eq!(results.len(), 1);
        let term = results.get("L1T1").unwrap();
        assert_eq!(term.total_credits(), 5.0);
        assert_eq!(term.cgpa, Some(3.6));
    }

    #[test]
    fn test_terms_keep_first_seen_order() {
        let results = group_by_term(vec![
            course("A", 3.0, "L2T1", "A"),
            course("B", 3.0, "L1T1", "B"),
            course("C", 3.0, "L2T1", "C"),
        ]);
        let labels: Vec<_> = results.terms().iter().map(|t| t.term.as_str()).collect();
        assert_eq!(labels, vec!["L2T1", "L1T1"]);
        let l2 = results.get("L2T1").unwrap();
        assert_eq!(l2.courses[0].course, "A");
        assert_eq!(l2.courses[1].course, "C");
    }

    #[test]
    fn test_exact_half_rounds_up() {
        // 5.4375 / 2.5 = 2.175 exactly.
        let courses = vec![
            course("A", 0.75, "L1T1", "A+"),
            course("B", 0.75, "L1T1", "B+"),
            course("C", 1.0, "L1T1", "F"),
        ];
        assert_eq!(term_cgpa(&courses), Some(2.18));
        assert_eq!(overall_metrics(&group_by_term(courses)).cgpa, Some(2.18));
    }

    #[test]
    fn test_huge_credits_fall_back_to_float() {
        let courses = vec![course("A", 1e30, "L1T1", "B")];
        assert_eq!(term_cgpa(&courses), Some(3.0));
    }

    #[test]
    fn test_empty_term_is_not_applicable() {
        assert_eq!(term_cgpa(&[]), None);
    }

    #[test]
    fn test_overall_is_credit_weighted() {
        let results = group_by_term(vec![
            course("A", 4.0, "L1T1", "A+"),
            course("B", 1.0, "L1T2", "F"),
        ]);
        // Mean of term CGPAs would be 2.00; weighted is 16 / 5.
        let metrics = overall_metrics(&results);
        assert_eq!(metrics.cgpa, Some(3.2));
        assert_eq!(metrics.total_credits, 5.0);
        assert_eq!(metrics.term_count, 2);
    }

    #[test]
    fn test_overall_with_no_courses() {
        let metrics = overall_metrics(&SemesterResults::default());
        assert_eq!(metrics.cgpa, None);
        assert_eq!(metrics.total_credits, 0.0);
        assert_eq!(metrics.term_count, 0);
    }

    #[test]
    fn test_credits_counted_once() {
        let courses = vec![
            course("A", 3.0, "L1T1", "A"),
            course("B", 1.5, "L1T1", "B+"),
            course("C", 4.0, "L1T2", "C"),
            course("D", 0.75, "L2T1", "D"),
        ];
        let expected: f64 = courses.iter().map(|c| c.credit).sum();
        let results = group_by_term(courses);

        let per_term: f64 = results.terms().iter().map(|t| t.total_credits()).sum();
        assert_eq!(per_term, expected);
        assert_eq!(overall_metrics(&results).total_credits, expected);
        assert_eq!(results.courses().count(), 4);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let courses = vec![
            course("A", 3.0, "L1T1", "A-"),
            course("B", 2.0, "L1T2", "B+"),
            course("C", 3.0, "L1T1", "C+"),
        ];
        let first = group_by_term(courses.clone());
        let second = group_by_term(courses);
        assert_eq!(first, second);
        assert_eq!(overall_metrics(&first), overall_metrics(&second));
    }
}
