use regex::Regex;

use crate::roster::Roster;

/// A module/grade pair recovered from one text line. The student index is
/// resolved once per document, not per line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedGrade {
    pub module_code: String,
    pub grade_symbol: String,
}

const MODULE_CODE: &str = r"[A-Z]{2,4}[0-9]{3,4}";

// Closed set of grade tokens, longest alternatives first so the regex never
// stops short at a prefix ("A" before "A+" would). Deliberately wider than
// the grade-point map: symbols like "P" still parse and are flagged later.
const GRADE_TOKENS: &str = r"A\+|A-|B\+|B-|C\+|C-|D\+|D-|I-we|I-ca|AB|A|B|C|D|F|I|W|P";

struct Rule {
    name: &'static str,
    pattern: Regex,
}

/// Line-level grade grammar: an ordered list of pattern rules, first match
/// wins. The leftmost module code on a line wins, and among grade tokens the
/// one closest after the module code wins (lazy gap in the `titled` rule).
pub struct GradeLineParser {
    rules: Vec<Rule>,
}

impl Default for GradeLineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl GradeLineParser {
    pub fn new() -> Self {
        let rules = vec![
            // "CS101 A+": grade token directly after a leading module code.
            // Anchored so this rule can never latch onto a later module code;
            // leftmost-module preference belongs to the `titled` rule.
            Rule {
                name: "adjacent",
                pattern: Regex::new(&format!(
                    r"^\s*(?P<module>{MODULE_CODE})\b\s+(?P<grade>{GRADE_TOKENS})(?:\s|$)"
                ))
                .expect("adjacent rule compiles"),
            },
            // "MA1014 - Mathematics A-": module title between code and grade.
            Rule {
                name: "titled",
                pattern: Regex::new(&format!(
                    r"\b(?P<module>{MODULE_CODE})\b.*?\s(?P<grade>{GRADE_TOKENS})(?:\s|$)"
                ))
                .expect("titled rule compiles"),
            },
        ];
        Self { rules }
    }

    /// Most PDF lines are headers, footers, or layout noise; those return
    /// `None`, never an error.
    pub fn parse(&self, line: &str) -> Option<ParsedGrade> {
        for rule in &self.rules {
            if let Some(caps) = rule.pattern.captures(line) {
                let parsed = ParsedGrade {
                    module_code: caps["module"].to_string(),
                    grade_symbol: caps["grade"].to_string(),
                };
                log::debug!(
                    "rule `{}` matched {} {}",
                    rule.name,
                    parsed.module_code,
                    parsed.grade_symbol
                );
                return Some(parsed);
            }
        }
        None
    }
}

fn is_index_shaped(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 7
        && bytes[..6].iter().all(u8::is_ascii_digit)
        && bytes[6].is_ascii_uppercase()
}

/// Resolves the student index for one document, in fixed precedence order:
/// a labeled header line, then the first index-shaped token, then the first
/// token found on the roster, then the source file name. `None` means the
/// document cannot be attributed to a student.
pub fn resolve_student_index(lines: &[String], roster: &Roster, source_name: &str) -> Option<String> {
    let labeled = Regex::new(
        r"(?i)\bindex\s*(?:no\.?|number)?\s*[:#-]?\s*(?P<index>[0-9A-Za-z][0-9A-Za-z/-]*)",
    )
    .expect("labeled index pattern compiles");

    for line in lines {
        if let Some(caps) = labeled.captures(line) {
            return Some(caps["index"].to_string());
        }
    }

    for line in lines {
        if let Some(token) = line.split_whitespace().find(|t| is_index_shaped(t)) {
            return Some(token.to_string());
        }
    }

    for line in lines {
        if let Some(token) = line.split_whitespace().find(|t| roster.contains(t)) {
            return Some(token.to_string());
        }
    }

    let stem = source_name
        .rsplit('/')
        .next()
        .unwrap_or(source_name)
        .trim_end_matches(".pdf")
        .trim_end_matches(".PDF");
    stem.split(|c: char| !c.is_ascii_alphanumeric())
        .find(|t| is_index_shaped(t) || roster.contains(t))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RosterEntry;

    fn parser() -> GradeLineParser {
        GradeLineParser::new()
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_module_and_grade_from_plain_line() {
        let parsed = parser().parse("CS101 A+").unwrap();
        assert_eq!(parsed.module_code, "CS101");
        assert_eq!(parsed.grade_symbol, "A+");
    }

    #[test]
    fn parses_module_with_title_and_trailing_grade() {
        let parsed = parser().parse("MA1014 - Mathematics A-").unwrap();
        assert_eq!(parsed.module_code, "MA1014");
        assert_eq!(parsed.grade_symbol, "A-");
    }

    #[test]
    fn grade_nearest_to_module_code_wins() {
        let parsed = parser().parse("CS101 B+ A").unwrap();
        assert_eq!(parsed.grade_symbol, "B+");
    }

    #[test]
    fn leftmost_module_code_wins() {
        let parsed = parser().parse("CS101 CS102 A").unwrap();
        assert_eq!(parsed.module_code, "CS101");
        assert_eq!(parsed.grade_symbol, "A");
    }

    #[test]
    fn header_and_footer_lines_produce_nothing() {
        let p = parser();
        assert_eq!(p.parse("University of Moratuwa"), None);
        assert_eq!(p.parse("Page 1 of 3"), None);
        assert_eq!(p.parse(""), None);
        assert_eq!(p.parse("Semester 2 Results"), None);
    }

    #[test]
    fn grade_letters_inside_words_do_not_match() {
        // "Work" starts with W but is not a standalone grade token.
        assert_eq!(parser().parse("CS101 Advanced Work"), None);
    }

    #[test]
    fn every_grade_token_is_recognized() {
        let p = parser();
        for symbol in [
            "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "D-", "F", "I-we",
            "I-ca", "I", "W", "P", "AB",
        ] {
            let parsed = p.parse(&format!("CS101 {symbol}")).unwrap();
            assert_eq!(parsed.grade_symbol, symbol, "token {symbol}");
        }
    }

    #[test]
    fn resolves_index_from_labeled_header() {
        let roster = Roster::new(vec![]);
        let doc = lines(&["Results Sheet", "Index No: 123456X", "CS101 A"]);
        assert_eq!(
            resolve_student_index(&doc, &roster, "results.pdf"),
            Some("123456X".to_string())
        );
    }

    #[test]
    fn resolves_index_from_shaped_token() {
        let roster = Roster::new(vec![]);
        let doc = lines(&["Transcript for 200145B", "CS101 A"]);
        assert_eq!(
            resolve_student_index(&doc, &roster, "results.pdf"),
            Some("200145B".to_string())
        );
    }

    #[test]
    fn resolves_index_from_roster_membership() {
        let roster = Roster::new(vec![RosterEntry {
            index: "42".to_string(),
            name: "Alice".to_string(),
        }]);
        let doc = lines(&["Student 42", "CS101 A"]);
        assert_eq!(
            resolve_student_index(&doc, &roster, "results.pdf"),
            Some("42".to_string())
        );
    }

    #[test]
    fn falls_back_to_file_name() {
        let roster = Roster::new(vec![]);
        let doc = lines(&["no identifiers here"]);
        assert_eq!(
            resolve_student_index(&doc, &roster, "uploads/123456X_results.pdf"),
            Some("123456X".to_string())
        );
    }

    #[test]
    fn unresolvable_document_yields_none() {
        let roster = Roster::new(vec![]);
        let doc = lines(&["no identifiers here"]);
        assert_eq!(resolve_student_index(&doc, &roster, "results.pdf"), None);
    }
}
