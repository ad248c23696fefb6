use tracing::debug;

use crate::analyzers::grade::grade_point;
use crate::analyzers::types::CourseRecord;

/// Minimum number of cells a results row must have.
pub const MIN_CELLS: usize = 6;

const COL_COURSE: usize = 0;
const COL_CREDIT: usize = 1;
const COL_TERM: usize = 2;
const COL_GRADE: usize = 4;

/// Turns raw table rows into validated [`CourseRecord`]s.
///
/// Rows are dropped, not reported, when they have fewer than [`MIN_CELLS`]
/// cells, when the credit is not a positive finite number, or when the letter
/// grade is not on the scale. Output keeps the input order.
pub fn extract_courses<R: AsRef<[String]>>(rows: &[R]) -> Vec<CourseRecord> {
    let mut courses = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;

    for row in rows {
        match parse_course(row.as_ref()) {
            Some(course) => courses.push(course),
            None => dropped += 1,
        }
    }

    debug!(kept = courses.len(), dropped, "Extracted course records");
    courses
}

/// Parses a single row, `None` if it is not a valid course.
pub fn parse_course(cells: &[String]) -> Option<CourseRecord> {
    if cells.len() < MIN_CELLS {
        return None;
    }

    let credit: f64 = cells[COL_CREDIT].trim().parse().ok()?;
    if !credit.is_finite() || credit <= 0.0 {
        return None;
    }

    let grade_letter = cells[COL_GRADE].trim();
    let point = grade_point(grade_letter)?;

    Some(CourseRecord {
        course: cells[COL_COURSE].trim().to_string(),
        credit,
        level_term: cells[COL_TERM].trim().to_string(),
        grade_letter: grade_letter.to_string(),
        grade_point: point,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_valid_row() {
        let course = parse_course(&row(&["CSE 101", "3.0", "L1T1", "x", "A+", "y"])).unwrap();
        assert_eq!(course.course, "CSE 101");
        assert_eq!(course.credit, 3.0);
        assert_eq!(course.level_term, "L1T1");
        assert_eq!(course.grade_letter, "A+");
        assert_eq!(course.grade_point, 4.0);
    }

    #[test]
    fn test_cells_are_trimmed() {
        let course = parse_course(&row(&[" CSE 101 ", " 1.5 ", " L2T2 ", "", " B- ", ""])).unwrap();
        assert_eq!(course.course, "CSE 101");
        assert_eq!(course.credit, 1.5);
        assert_eq!(course.level_term, "L2T2");
        assert_eq!(course.grade_letter, "B-");
    }

    #[test]
    fn test_short_row_dropped() {
        assert!(parse_course(&row(&["CSE 101", "3", "L1T1", "", "A"])).is_none());
    }

    #[test]
    fn test_bad_credit_dropped() {
        assert!(parse_course(&row(&["X", "three", "L1T1", "", "A", ""])).is_none());
        assert!(parse_course(&row(&["X", "0", "L1T1", "", "A", ""])).is_none());
        assert!(parse_course(&row(&["X", "-3", "L1T1", "", "A", ""])).is_none());
        assert!(parse_course(&row(&["X", "inf", "L1T1", "", "A", ""])).is_none());
        assert!(parse_course(&row(&["X", "NaN", "L1T1", "", "A", ""])).is_none());
        assert!(parse_course(&row(&["X", "", "L1T1", "", "A", ""])).is_none());
    }

    #[test]
    fn test_unknown_grade_dropped() {
        let rows = vec![
            row(&["CSE 101", "3", "L1T1", "", "A", ""]),
            row(&["CSE 102", "3", "L1T1", "", "E", ""]),
            row(&["CSE 103", "2", "L1T1", "", "B", ""]),
        ];
        let courses = extract_courses(&rows);
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].course, "CSE 101");
        assert_eq!(courses[1].course, "CSE 103");
        assert!(courses.iter().all(|c| c.grade_letter != "E"));
    }

    #[test]
    fn test_extra_cells_ignored() {
        let course =
            parse_course(&row(&["CSE 101", "3", "L1T1", "", "A", "", "extra", "more"])).unwrap();
        assert_eq!(course.grade_point, 3.75);
    }
}
