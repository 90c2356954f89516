use std::collections::BTreeMap;

use crate::config::{GradePointMap, ModuleWeights};
use crate::models::{GradeMatrix, SgpaResult, Warning};
use crate::roster::Roster;

/// Computes one credit-weighted SGPA per roster student.
///
/// Only modules present in both the student's row and the weight table count.
/// An unrecognized grade symbol is excluded from numerator and denominator
/// and reported, never silently scored as zero. A student with no counted
/// module gets the no-data sentinel rather than 0.0, which would misrank
/// them above a student whose grades really average to zero.
pub fn compute(
    roster: &Roster,
    matrix: &GradeMatrix,
    weights: &ModuleWeights,
    points: &GradePointMap,
) -> (BTreeMap<String, SgpaResult>, Vec<Warning>) {
    let mut results = BTreeMap::new();
    let mut warnings = Vec::new();

    for entry in roster.entries() {
        let grades = matrix.get(&entry.index);
        let mut weighted_sum = 0.0;
        let mut credit_sum = 0.0;
        let mut counted = 0usize;

        for (module, weight) in weights.iter() {
            let Some(symbol) = grades.and_then(|g| g.get(module)) else {
                continue;
            };
            match points.get(symbol) {
                Some(point) => {
                    weighted_sum += point * weight;
                    credit_sum += weight;
                    counted += 1;
                }
                None => {
                    let warning = Warning::UnrecognizedGrade {
                        index: entry.index.clone(),
                        module: module.to_string(),
                        grade: symbol.clone(),
                    };
                    log::warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }

        let sgpa = if credit_sum > 0.0 {
            Some(weighted_sum / credit_sum)
        } else {
            None
        };

        results.insert(
            entry.index.clone(),
            SgpaResult {
                student_index: entry.index.clone(),
                sgpa,
                modules_counted: counted,
                modules_missing: weights.len() - counted,
            },
        );
    }

    (results, warnings)
}
