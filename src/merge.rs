use crate::extract::PdfTextExtractor;
use crate::grades::{self, GradeLineParser};
use crate::models::{DocumentFailure, GradeMatrix, ModuleGradeRecord, SourceDocument, Warning};
use crate::roster::Roster;

/// Folds parsed records into the grade matrix. Records for students off the
/// roster are dropped with a warning; an existing (student, module) cell is
/// overwritten so the latest merged document stays authoritative.
pub fn merge(
    matrix: &mut GradeMatrix,
    roster: &Roster,
    records: &[ModuleGradeRecord],
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for record in records {
        if !roster.contains(&record.student_index) {
            let warning = Warning::UnknownStudent {
                index: record.student_index.clone(),
                module: record.module_code.clone(),
            };
            log::warn!("{warning}");
            warnings.push(warning);
            continue;
        }

        let grades = matrix.entry(record.student_index.clone()).or_default();
        if let Some(previous) = grades.insert(
            record.module_code.clone(),
            record.grade_symbol.clone(),
        ) {
            let warning = Warning::OverwrittenGrade {
                index: record.student_index.clone(),
                module: record.module_code.clone(),
                previous,
                replacement: record.grade_symbol.clone(),
            };
            log::warn!("{warning}");
            warnings.push(warning);
        }
    }

    warnings
}

pub struct BatchOutcome {
    pub matrix: GradeMatrix,
    pub warnings: Vec<Warning>,
    pub failures: Vec<DocumentFailure>,
}

/// Runs extract -> resolve index -> parse -> merge over the documents in the
/// order given. Merge order is the caller's order, which is what makes
/// last-write-wins well defined. A document that cannot be read or attributed
/// is recorded as a failure and the batch continues.
pub fn ingest_documents(
    roster: &Roster,
    documents: &[SourceDocument],
    extractor: &PdfTextExtractor,
    parser: &GradeLineParser,
) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        matrix: GradeMatrix::new(),
        warnings: Vec::new(),
        failures: Vec::new(),
    };

    for document in documents {
        let lines = match extractor.extract_lines(&document.bytes) {
            Ok(lines) => lines,
            Err(e) => {
                outcome.failures.push(DocumentFailure {
                    source: document.name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let Some(student_index) = grades::resolve_student_index(&lines, roster, &document.name)
        else {
            outcome.failures.push(DocumentFailure {
                source: document.name.clone(),
                reason: "could not resolve a student index".to_string(),
            });
            continue;
        };

        let records: Vec<ModuleGradeRecord> = lines
            .iter()
            .filter_map(|line| parser.parse(line))
            .map(|parsed| ModuleGradeRecord {
                student_index: student_index.clone(),
                module_code: parsed.module_code,
                grade_symbol: parsed.grade_symbol,
            })
            .collect();

        if records.is_empty() {
            log::info!("{}: no grade lines found", document.name);
        }

        outcome
            .warnings
            .extend(merge(&mut outcome.matrix, roster, &records));
    }

    outcome
}
