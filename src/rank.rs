use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{RankedEntry, SgpaResult};
use crate::roster::Roster;

fn sgpa_order(a: &SgpaResult, b: &SgpaResult) -> Ordering {
    // Descending by SGPA at full precision; no-data students always sort
    // below every numeric score, however low. Ties fall back to index order
    // so runs are reproducible.
    let by_sgpa = match (a.sgpa, b.sgpa) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_sgpa.then_with(|| a.student_index.cmp(&b.student_index))
}

fn same_sgpa(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x == y,
        (None, None) => true,
        _ => false,
    }
}

/// Orders results into the final table using standard competition ranking:
/// tied students share a rank and the next distinct SGPA resumes at its
/// one-based position (1, 2, 2, 4).
pub fn rank(roster: &Roster, results: &BTreeMap<String, SgpaResult>) -> Vec<RankedEntry> {
    let mut sorted: Vec<&SgpaResult> = roster
        .entries()
        .iter()
        .filter_map(|entry| results.get(&entry.index))
        .collect();
    sorted.sort_by(|a, b| sgpa_order(a, b));

    let mut table = Vec::with_capacity(sorted.len());
    let mut rank = 0usize;

    for (position, result) in sorted.iter().enumerate() {
        let tied = position > 0 && same_sgpa(result.sgpa, sorted[position - 1].sgpa);
        if !tied {
            rank = position + 1;
        }
        table.push(RankedEntry {
            rank,
            student_index: result.student_index.clone(),
            name: roster
                .name_of(&result.student_index)
                .unwrap_or_default()
                .to_string(),
            sgpa: result.sgpa,
            modules_counted: result.modules_counted,
            modules_missing: result.modules_missing,
        });
    }

    table
}
