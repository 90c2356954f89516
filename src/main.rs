use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

mod config;
mod extract;
mod grades;
mod merge;
mod models;
mod rank;
mod report;
mod roster;
mod sgpa;

use crate::config::{GradePointMap, ModuleWeights};
use crate::extract::PdfTextExtractor;
use crate::grades::GradeLineParser;
use crate::models::SourceDocument;
use crate::report::format_sgpa;
use crate::roster::Roster;

#[derive(Parser)]
#[command(name = "results-ranking")]
#[command(about = "Credit-weighted SGPA leaderboard from exam result PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract grades from result PDFs and rank the roster by SGPA
    Rank {
        /// Roster CSV with an Index column and optional Name column
        #[arg(long)]
        roster: PathBuf,
        /// Module credit weights as JSON, e.g. {"CS101": 3.0}
        #[arg(long)]
        weights: PathBuf,
        /// Alternate grade-point map as JSON
        #[arg(long)]
        grade_points: Option<PathBuf>,
        /// Leaderboard rows to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Write the full ranking as CSV
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write a markdown report
        #[arg(long)]
        report: Option<PathBuf>,
        /// Result PDFs, merged in the order given (later files win)
        #[arg(required = true)]
        pdfs: Vec<PathBuf>,
    },
    /// Preview the student index and grades parsed from a single PDF
    Inspect {
        /// Roster CSV used to help resolve the student index
        #[arg(long)]
        roster: Option<PathBuf>,
        pdf: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            roster,
            weights,
            grade_points,
            limit,
            out,
            report,
            pdfs,
        } => run_rank(
            &roster,
            &weights,
            grade_points.as_deref(),
            limit,
            out,
            report,
            &pdfs,
        ),
        Commands::Inspect { roster, pdf } => run_inspect(roster.as_deref(), &pdf),
    }
}

fn read_documents(paths: &[PathBuf]) -> anyhow::Result<Vec<SourceDocument>> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(SourceDocument {
                name: path.display().to_string(),
                bytes,
            })
        })
        .collect()
}

fn run_rank(
    roster_path: &Path,
    weights_path: &Path,
    grade_points_path: Option<&Path>,
    limit: usize,
    out: Option<PathBuf>,
    report_path: Option<PathBuf>,
    pdfs: &[PathBuf],
) -> anyhow::Result<()> {
    let roster = roster::load_roster(roster_path)?;
    let weights = ModuleWeights::load(weights_path)?;
    let points = match grade_points_path {
        Some(path) => GradePointMap::load(path)?,
        None => GradePointMap::default(),
    };

    let documents = read_documents(pdfs)?;
    let extractor = PdfTextExtractor::default();
    let parser = GradeLineParser::new();

    let outcome = merge::ingest_documents(&roster, &documents, &extractor, &parser);
    let (results, grade_warnings) = sgpa::compute(&roster, &outcome.matrix, &weights, &points);
    let ranking = rank::rank(&roster, &results);

    let mut warnings = outcome.warnings;
    warnings.extend(grade_warnings);

    println!("Top students by SGPA:");
    for entry in ranking.iter().take(limit) {
        println!(
            "- {}. {} ({}) sgpa {} from {} modules",
            entry.rank,
            entry.name,
            entry.student_index,
            format_sgpa(entry.sgpa),
            entry.modules_counted
        );
    }

    if !warnings.is_empty() {
        println!("\n{} warnings:", warnings.len());
        for warning in &warnings {
            println!("- {warning}");
        }
    }

    if !outcome.failures.is_empty() {
        println!("\n{} documents failed:", outcome.failures.len());
        for failure in &outcome.failures {
            println!("- {}: {}", failure.source, failure.reason);
        }
    }

    if let Some(path) = out {
        let file = std::fs::File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        report::write_ranking_csv(file, &ranking)?;
        println!("\nRanking written to {}.", path.display());
    }

    if let Some(path) = report_path {
        let summaries = report::summarize_modules(&outcome.matrix, &weights, &points);
        let markdown = report::build_report(
            chrono::Utc::now().date_naive(),
            roster.len(),
            &ranking,
            &summaries,
            &warnings,
            &outcome.failures,
        );
        std::fs::write(&path, markdown)?;
        println!("Report written to {}.", path.display());
    }

    Ok(())
}

fn run_inspect(roster_path: Option<&Path>, pdf: &Path) -> anyhow::Result<()> {
    let roster = match roster_path {
        Some(path) => roster::load_roster(path)?,
        None => Roster::new(Vec::new()),
    };

    let bytes =
        std::fs::read(pdf).with_context(|| format!("failed to read {}", pdf.display()))?;
    let lines = PdfTextExtractor::default()
        .extract_lines(&bytes)
        .with_context(|| format!("could not extract text from {}", pdf.display()))?;

    match grades::resolve_student_index(&lines, &roster, &pdf.display().to_string()) {
        Some(index) => println!("Student index: {index}"),
        None => println!("Student index: unresolved"),
    }

    let parser = GradeLineParser::new();
    let parsed: Vec<_> = lines.iter().filter_map(|line| parser.parse(line)).collect();

    if parsed.is_empty() {
        println!("No grade lines found across {} text lines.", lines.len());
        return Ok(());
    }

    println!("{} grades found:", parsed.len());
    for grade in parsed {
        println!("- {} {}", grade.module_code, grade.grade_symbol);
    }

    Ok(())
}
