use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::model::{Classifier, InferenceError};
use crate::features::{ColumnOrder, Feature, FeatureKind, FeatureValue};

const DEFAULT_THRESHOLD: f64 = 0.5;

/// Bound on a single term's contribution to the logit. Far past the point
/// where the sigmoid saturates, so capping only keeps the sum finite.
const TERM_LIMIT: f64 = 1e6;

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// A standardized numeric term: `weight * (x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericTerm {
    pub weight: f64,
    #[serde(default)]
    pub mean: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
}

fn unit_scale() -> f64 {
    1.0
}

/// Logistic regression parameters as stored in the artifact, keyed by
/// column name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticSpec {
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub numeric: BTreeMap<String, NumericTerm>,
    /// One-hot weights per category. Unseen categories contribute nothing.
    #[serde(default)]
    pub categorical: BTreeMap<String, HashMap<String, f64>>,
}

#[derive(Debug, Clone)]
enum Term {
    Numeric { weight: f64, mean: f64, scale: f64 },
    Categorical(HashMap<String, f64>),
}

/// Logistic regression bound to column positions.
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    intercept: f64,
    threshold: f64,
    terms: Vec<Term>,
}

impl LogisticClassifier {
    /// Bind the named parameters to the positions of `columns`.
    ///
    /// Every column needs exactly one term and every term must name a
    /// column, otherwise the artifact is inconsistent.
    pub fn compile(spec: LogisticSpec, columns: &ColumnOrder) -> Result<Self, String> {
        let LogisticSpec {
            intercept,
            threshold,
            mut numeric,
            mut categorical,
        } = spec;

        if !intercept.is_finite() {
            return Err("intercept is not finite".into());
        }
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(format!("threshold {threshold} is outside (0, 1)"));
        }

        let mut terms = Vec::with_capacity(columns.len());
        for feature in columns.features() {
            let name = feature.column_name();
            let term = match (numeric.remove(name), categorical.remove(name)) {
                (Some(_), Some(_)) => {
                    return Err(format!("column '{name}' has both numeric and categorical terms"))
                }
                (None, None) => return Err(format!("no term for column '{name}'")),
                (Some(t), None) => numeric_term(*feature, t)?,
                (None, Some(weights)) => {
                    if weights.values().any(|w| !w.is_finite()) {
                        return Err(format!("column '{name}' has a non-finite category weight"));
                    }
                    Term::Categorical(weights)
                }
            };
            terms.push(term);
        }

        if let Some(name) = numeric.keys().chain(categorical.keys()).next() {
            return Err(format!("term references unknown column '{name}'"));
        }

        Ok(Self {
            intercept,
            threshold,
            terms,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn decision(&self, row: &[FeatureValue]) -> Result<f64, InferenceError> {
        if row.len() != self.terms.len() {
            return Err(InferenceError::WidthMismatch {
                expected: self.terms.len(),
                actual: row.len(),
            });
        }

        let mut z = self.intercept;
        for (index, (term, value)) in self.terms.iter().zip(row).enumerate() {
            z += match term {
                Term::Numeric {
                    weight,
                    mean,
                    scale,
                } => {
                    let x = value.as_f64().ok_or_else(|| InferenceError::TypeMismatch {
                        index,
                        expected: "numeric",
                        found: value.to_string(),
                    })?;
                    (weight * ((x - mean) / scale)).clamp(-TERM_LIMIT, TERM_LIMIT)
                }
                Term::Categorical(weights) => {
                    let key = value.category_key().ok_or_else(|| InferenceError::TypeMismatch {
                        index,
                        expected: "categorical",
                        found: value.to_string(),
                    })?;
                    weights.get(&key).copied().unwrap_or(0.0)
                }
            };
        }

        if z.is_nan() {
            Err(InferenceError::NonFinite)
        } else {
            Ok(z)
        }
    }

    fn delayed_probability(&self, row: &[FeatureValue]) -> Result<f64, InferenceError> {
        self.decision(row).map(sigmoid)
    }
}

fn numeric_term(feature: Feature, term: NumericTerm) -> Result<Term, String> {
    let name = feature.column_name();
    if feature.kind() == FeatureKind::Categorical {
        return Err(format!("column '{name}' is categorical but has a numeric term"));
    }
    if !term.weight.is_finite() || !term.mean.is_finite() {
        return Err(format!("column '{name}' has a non-finite weight or mean"));
    }
    if !(term.scale.is_finite() && term.scale > 0.0) {
        return Err(format!("column '{name}' has invalid scale {}", term.scale));
    }
    Ok(Term::Numeric {
        weight: term.weight,
        mean: term.mean,
        scale: term.scale,
    })
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticClassifier {
    fn kind(&self) -> &str {
        "logistic_regression"
    }

    fn input_width(&self) -> usize {
        self.terms.len()
    }

    fn classify(&self, row: &[FeatureValue]) -> Result<i64, InferenceError> {
        let p = self.delayed_probability(row)?;
        Ok(i64::from(p > self.threshold))
    }

    fn score(&self, row: &[FeatureValue]) -> Result<[f64; 2], InferenceError> {
        let p = self.delayed_probability(row)?;
        Ok([1.0 - p, p])
    }
}
