//! HTML parser for the published results page.
//!
//! Pulls the body rows out of every table on the page as plain-text cells.
//! It is a tag scanner, not a DOM: it matches tag names case-insensitively,
//! tolerates omitted `</td>`/`</tr>` close tags and does not descend into
//! nested tables. Results pages are simple enough for that.

use std::ops::Range;

/// Extracts the `<td>` texts of every body row of every table.
///
/// Rows inside `<tbody>` are used when a table has one; otherwise every row
/// outside `<thead>`/`<tfoot>` counts as a body row, the way a browser would
/// wrap them. Rows without any `<td>` cell are skipped.
pub fn parse_result_rows(html: &str) -> Vec<Vec<String>> {
    // ASCII lowercasing keeps byte offsets aligned with `html`.
    let lower = html.to_ascii_lowercase();
    let mut rows = Vec::new();

    for table in elements(&lower, "table", 0..lower.len()) {
        let bodies = elements(&lower, "tbody", table.clone());
        let (bodies, excluded) = if bodies.is_empty() {
            let mut excluded = elements(&lower, "thead", table.clone());
            excluded.extend(elements(&lower, "tfoot", table.clone()));
            (vec![table], excluded)
        } else {
            (bodies, Vec::new())
        };

        for body in bodies {
            for tr in elements(&lower, "tr", body) {
                if excluded.iter().any(|ex| ex.contains(&tr.start)) {
                    continue;
                }
                let cells: Vec<String> = elements(&lower, "td", tr)
                    .into_iter()
                    .map(|td| cell_text(&html[td]))
                    .collect();
                if !cells.is_empty() {
                    rows.push(cells);
                }
            }
        }
    }

    rows
}

/// Inner byte ranges of every `<tag>` element within `within`.
///
/// An element ends at its close tag, or at the next open tag of the same
/// name when the close tag was omitted, or at the end of `within`.
fn elements(lower: &str, tag: &str, within: Range<usize>) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut pos = within.start;

    while let Some(open) = find_open_tag(lower, tag, pos, within.end) {
        let Some(gt) = lower[open..within.end].find('>') else {
            break;
        };
        let inner_start = open + gt + 1;

        let close = find_close_tag(lower, tag, inner_start, within.end);
        let next_open = find_open_tag(lower, tag, inner_start, within.end);
        let inner_end = match (close, next_open) {
            (Some(c), Some(n)) => c.min(n),
            (Some(c), None) => c,
            (None, Some(n)) => n,
            (None, None) => within.end,
        };

        out.push(inner_start..inner_end);
        pos = inner_end;
    }

    out
}

fn find_open_tag(lower: &str, tag: &str, from: usize, end: usize) -> Option<usize> {
    find_tag(lower, &format!("<{tag}"), from, end)
}

fn find_close_tag(lower: &str, tag: &str, from: usize, end: usize) -> Option<usize> {
    find_tag(lower, &format!("</{tag}"), from, end)
}

/// Finds `pattern` followed by a tag-name boundary, so `<tr` does not match `<track`.
fn find_tag(lower: &str, pattern: &str, from: usize, end: usize) -> Option<usize> {
    let mut pos = from;
    while pos < end {
        let idx = lower.get(pos..end)?.find(pattern)? + pos;
        let after = idx + pattern.len();
        match lower.as_bytes().get(after) {
            Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r') | None => return Some(idx),
            _ => pos = idx + 1,
        }
    }
    None
}

fn cell_text(inner: &str) -> String {
    normalize_ws(&decode_entities(&strip_tags(inner)))
}

/// Removes all `<...>` tags.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Collapses runs of whitespace into a single space and trims.
fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tbody_rows() {
        let html = r#"
            <html><body>
            <TABLE class="results">
              <thead><tr><th>Course</th><th>Credit</th></tr></thead>
              <tbody>
                <tr><td>CSE 101</td><td>3.0</td><td>L1T1</td><td>x</td><td>A+</td><td>y</td></tr>
                <TR><TD> <b>MATH&nbsp;141</b> </TD><td>3</td><td>L1T1</td><td></td><td>B</td><td></td></TR>
              </tbody>
            </TABLE>
            </body></html>"#;

        let rows = parse_result_rows(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["CSE 101", "3.0", "L1T1", "x", "A+", "y"]);
        assert_eq!(rows[1][0], "MATH 141");
        assert_eq!(rows[1][4], "B");
    }

    #[test]
    fn test_table_without_tbody_skips_header() {
        let html = "<table><thead><tr><td>Course</td></tr></thead>\
                    <tr><td>EEE 105</td><td>1.5</td></tr></table>";
        let rows = parse_result_rows(html);
        assert_eq!(rows, vec![vec!["EEE 105".to_string(), "1.5".to_string()]]);
    }

    #[test]
    fn test_omitted_close_tags() {
        let html = "<table><tbody><tr><td>A<td>3<td>L1T1\
                    <tr><td>B<td>2<td>L1T2</tbody></table>";
        let rows = parse_result_rows(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["A", "3", "L1T1"]);
        assert_eq!(rows[1], vec!["B", "2", "L1T2"]);
    }

    #[test]
    fn test_multiple_tables() {
        let html = "<table><tbody><tr><td>one</td></tr></tbody></table>\
                    <p>between</p>\
                    <table><tbody><tr><td>two</td></tr></tbody></table>";
        let rows = parse_result_rows(html);
        assert_eq!(rows, vec![vec!["one".to_string()], vec!["two".to_string()]]);
    }

    #[test]
    fn test_tag_name_boundary() {
        assert_eq!(find_tag("<track><tr>", "<tr", 0, 11), Some(7));
        assert_eq!(find_tag("<tdx>", "<td", 0, 5), None);
    }

    #[test]
    fn test_no_tables() {
        assert!(parse_result_rows("<html><p>Not logged in</p></html>").is_empty());
        assert!(parse_result_rows("").is_empty());
    }

    #[test]
    fn test_inline_markup_does_not_split_text() {
        assert_eq!(cell_text("A<sup>+</sup>"), "A+");
    }

    #[test]
    fn test_entities_decoded_once() {
        assert_eq!(cell_text("R&amp;D &amp;lt;"), "R&D &lt;");
    }
}
