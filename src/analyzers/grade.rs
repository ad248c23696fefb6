/// The grading scale: letter grade to grade point, best grade first.
///
/// | Letter | Point |
/// |--------|-------|
/// | A+     | 4.00  |
/// | A      | 3.75  |
/// | A-     | 3.50  |
/// | B+     | 3.25  |
/// | B      | 3.00  |
/// | B-     | 2.75  |
/// | C+     | 2.50  |
/// | C      | 2.25  |
/// | D      | 2.00  |
/// | F      | 0.00  |
pub static GRADE_SCALE: &[(&str, f64)] = &[
    ("A+", 4.0),
    ("A", 3.75),
    ("A-", 3.5),
    ("B+", 3.25),
    ("B", 3.0),
    ("B-", 2.75),
    ("C+", 2.5),
    ("C", 2.25),
    ("D", 2.0),
    ("F", 0.0),
];

/// Looks up the grade point for a letter grade. Matching is exact after trimming.
pub fn grade_point(letter: &str) -> Option<f64> {
    let letter = letter.trim();
    GRADE_SCALE
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, p)| *p)
}

/// Converts a required average into the letter grade needed to reach it.
///
/// Each letter covers the band starting one step below its own point, so an
/// average of 3.80 needs an `A+` and anything below 0 needs only an `F`.
///
/// | Range   | Grade |
/// |---------|-------|
/// | >= 3.75 | A+    |
/// | >= 3.50 | A     |
/// | >= 3.25 | A-    |
/// | >= 3.00 | B+    |
/// | >= 2.75 | B     |
/// | >= 2.50 | B-    |
/// | >= 2.25 | C+    |
/// | >= 2.00 | C     |
/// | >= 0.00 | D     |
/// | < 0.00  | F     |
pub fn grade_for_gpa(gpa: f64) -> &'static str {
    match gpa {
        g if g >= 3.75 => "A+",
        g if g >= 3.5 => "A",
        g if g >= 3.25 => "A-",
        g if g >= 3.0 => "B+",
        g if g >= 2.75 => "B",
        g if g >= 2.5 => "B-",
        g if g >= 2.25 => "C+",
        g if g >= 2.0 => "C",
        g if g >= 0.0 => "D",
        _ => "F",
    }
}
