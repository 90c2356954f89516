use std::fmt::Write as _;
use std::io::Write;

use chrono::NaiveDate;

use crate::config::{GradePointMap, ModuleWeights};
use crate::models::{DocumentFailure, GradeMatrix, ModuleSummary, RankedEntry, Warning};

pub fn format_sgpa(sgpa: Option<f64>) -> String {
    match sgpa {
        Some(value) => format!("{value:.2}"),
        None => "N/A".to_string(),
    }
}

pub fn summarize_modules(
    matrix: &GradeMatrix,
    weights: &ModuleWeights,
    points: &GradePointMap,
) -> Vec<ModuleSummary> {
    let mut summaries = Vec::with_capacity(weights.len());

    for (module, _) in weights.iter() {
        let mut graded = 0usize;
        let mut point_sum = 0.0;
        let mut recognized = 0usize;

        for grades in matrix.values() {
            let Some(symbol) = grades.get(module) else {
                continue;
            };
            graded += 1;
            if let Some(point) = points.get(symbol) {
                point_sum += point;
                recognized += 1;
            }
        }

        summaries.push(ModuleSummary {
            module_code: module.to_string(),
            graded,
            average_points: if recognized > 0 {
                Some(point_sum / recognized as f64)
            } else {
                None
            },
        });
    }

    summaries
}

pub fn build_report(
    generated: NaiveDate,
    roster_size: usize,
    ranking: &[RankedEntry],
    summaries: &[ModuleSummary],
    warnings: &[Warning],
    failures: &[DocumentFailure],
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Exam Results Ranking");
    let _ = writeln!(
        output,
        "Generated {generated} for {roster_size} students across {} weighted modules",
        summaries.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Leaderboard");

    if ranking.is_empty() {
        let _ = writeln!(output, "No students to rank.");
    } else {
        for entry in ranking {
            let _ = writeln!(
                output,
                "- {}. {} ({}) sgpa {} from {} modules ({} missing)",
                entry.rank,
                entry.name,
                entry.student_index,
                format_sgpa(entry.sgpa),
                entry.modules_counted,
                entry.modules_missing
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Module Summary");

    if summaries.is_empty() {
        let _ = writeln!(output, "No weighted modules configured.");
    } else {
        for summary in summaries {
            match summary.average_points {
                Some(average) => {
                    let _ = writeln!(
                        output,
                        "- {}: {} grades (avg points {:.2})",
                        summary.module_code, summary.graded, average
                    );
                }
                None => {
                    let _ = writeln!(output, "- {}: no grades", summary.module_code);
                }
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Warnings");

    if warnings.is_empty() {
        let _ = writeln!(output, "None.");
    } else {
        for warning in warnings {
            let _ = writeln!(output, "- {warning}");
        }
    }

    if !failures.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Failed Documents");
        for failure in failures {
            let _ = writeln!(output, "- {}: {}", failure.source, failure.reason);
        }
    }

    output
}

pub fn write_ranking_csv<W: Write>(writer: W, ranking: &[RankedEntry]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "Rank",
        "Index",
        "Name",
        "SGPA",
        "Modules_Counted",
        "Modules_Missing",
    ])?;

    for entry in ranking {
        writer.write_record([
            entry.rank.to_string(),
            entry.student_index.clone(),
            entry.name.clone(),
            format_sgpa(entry.sgpa),
            entry.modules_counted.to_string(),
            entry.modules_missing.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
