use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::Context;

/// Grade symbol -> numeric grade point. Loaded once at startup and never
/// mutated; tests and the CLI can inject an alternate table.
pub struct GradePointMap {
    points: HashMap<String, f64>,
}

impl Default for GradePointMap {
    fn default() -> Self {
        Self::from_pairs([
            ("A+", 4.0),
            ("A", 4.0),
            ("A-", 3.7),
            ("B+", 3.3),
            ("B", 3.0),
            ("B-", 2.7),
            ("C+", 2.3),
            ("C", 2.0),
            ("C-", 1.7),
            ("D", 1.0),
            ("I-we", 0.0),
            ("I-ca", 0.0),
            ("F", 0.0),
            ("AB", 0.0),
        ])
    }
}

impl GradePointMap {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            points: pairs
                .into_iter()
                .map(|(symbol, value)| (symbol.to_string(), value))
                .collect(),
        }
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let points: HashMap<String, f64> =
            serde_json::from_str(raw).context("grade-point map must be a JSON object of numbers")?;
        for (symbol, value) in &points {
            if !value.is_finite() || *value < 0.0 {
                anyhow::bail!("grade point for `{symbol}` must be a non-negative number");
            }
        }
        Ok(Self { points })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read grade-point map {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.points.get(symbol).copied()
    }
}

/// Module code -> credit weight. Only modules listed here count towards the
/// SGPA; every weight must be positive.
pub struct ModuleWeights {
    weights: BTreeMap<String, f64>,
}

impl ModuleWeights {
    pub fn new(weights: BTreeMap<String, f64>) -> anyhow::Result<Self> {
        for (module, weight) in &weights {
            if !weight.is_finite() || *weight <= 0.0 {
                anyhow::bail!("credit weight for `{module}` must be positive, got {weight}");
            }
        }
        Ok(Self { weights })
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let weights: BTreeMap<String, f64> =
            serde_json::from_str(raw).context("weight table must be a JSON object of numbers")?;
        Self::new(weights)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read weight table {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn get(&self, module: &str) -> Option<f64> {
        self.weights.get(module).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(module, &weight)| (module.as_str(), weight))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_covers_standard_letter_grades() {
        let points = GradePointMap::default();
        assert_eq!(points.get("A+"), Some(4.0));
        assert_eq!(points.get("B"), Some(3.0));
        assert_eq!(points.get("F"), Some(0.0));
        assert_eq!(points.get("P"), None);
    }

    #[test]
    fn loads_weights_from_json() {
        let weights = ModuleWeights::from_json(r#"{"CS101": 3.0, "CS102": 2.0}"#).unwrap();
        assert_eq!(weights.get("CS101"), Some(3.0));
        assert_eq!(weights.len(), 2);
    }

    #[test]
    fn rejects_non_positive_weight() {
        assert!(ModuleWeights::from_json(r#"{"CS101": 0.0}"#).is_err());
        assert!(ModuleWeights::from_json(r#"{"CS101": -1.5}"#).is_err());
    }

    #[test]
    fn rejects_negative_grade_point() {
        assert!(GradePointMap::from_json(r#"{"A": -4.0}"#).is_err());
    }

    #[test]
    fn alternate_map_is_injectable() {
        let points = GradePointMap::from_pairs([("S", 10.0)]);
        assert_eq!(points.get("S"), Some(10.0));
        assert_eq!(points.get("A"), None);
    }
}
