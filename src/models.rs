use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub index: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleGradeRecord {
    pub student_index: String,
    pub module_code: String,
    pub grade_symbol: String,
}

/// Student index -> module code -> grade symbol. Mutated only by the merger.
pub type GradeMatrix = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, PartialEq)]
pub struct SgpaResult {
    pub student_index: String,
    /// `None` is the no-data sentinel: zero weighted modules matched.
    pub sgpa: Option<f64>,
    pub modules_counted: usize,
    pub modules_missing: usize,
}

#[derive(Debug, Clone)]
pub struct RankedEntry {
    pub rank: usize,
    pub student_index: String,
    pub name: String,
    pub sgpa: Option<f64>,
    pub modules_counted: usize,
    pub modules_missing: usize,
}

#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct DocumentFailure {
    pub source: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ModuleSummary {
    pub module_code: String,
    pub graded: usize,
    pub average_points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    UnknownStudent {
        index: String,
        module: String,
    },
    OverwrittenGrade {
        index: String,
        module: String,
        previous: String,
        replacement: String,
    },
    UnrecognizedGrade {
        index: String,
        module: String,
        grade: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownStudent { index, module } => write!(
                f,
                "student {index} is not on the roster; dropped grade for {module}"
            ),
            Warning::OverwrittenGrade {
                index,
                module,
                previous,
                replacement,
            } => write!(
                f,
                "grade for {index}/{module} replaced: {previous} -> {replacement}"
            ),
            Warning::UnrecognizedGrade {
                index,
                module,
                grade,
            } => write!(
                f,
                "unrecognized grade `{grade}` for {index}/{module}; module excluded"
            ),
        }
    }
}
