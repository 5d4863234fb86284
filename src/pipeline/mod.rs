//! Model pipeline - loading and running a trained churn classifier
//!
//! The artifact is treated as a black box behind [`ChurnModel`]: it takes one
//! feature row and returns a class label, and optionally class probabilities.

pub mod artifact;
pub mod estimator;
pub mod loader;
pub mod preprocess;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use artifact::PipelineModel;
pub use loader::ModelLoader;

/// Single input row keyed by column name
pub type FeatureRow = BTreeMap<String, FeatureValue>;

/// Value of one column in a feature row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FeatureValue::Number(_) => "numeric",
            FeatureValue::Category(_) => "categorical",
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Number(v)
    }
}

impl From<u32> for FeatureValue {
    fn from(v: u32) -> Self {
        FeatureValue::Number(f64::from(v))
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Category(v.to_string())
    }
}

/// Class label as written in the artifact.
///
/// Training code has been seen to emit both `"Yes"`/`"No"` and `1`/`0`, so
/// both encodings are accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Number(f64),
    Text(String),
}

impl Label {
    /// `"Yes"` or the number one. Anything else is the negative class.
    pub fn is_affirmative(&self) -> bool {
        match self {
            Label::Text(s) => s == "Yes",
            Label::Number(n) => *n == 1.0,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Text(s) => write!(f, "{}", s),
            Label::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Errors raised while running a loaded model on one row
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("column '{0}' is missing from the input")]
    MissingColumn(String),

    #[error("column '{column}' should be {expected} but got a {found} value")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("found unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("column '{0}' is not a finite number")]
    NonFinite(String),
}

/// A loaded classifier. Implementations are immutable after load and shared
/// across requests.
pub trait ChurnModel: Send + Sync {
    /// Human readable artifact name
    fn name(&self) -> &str;

    /// Ordered class labels; probability vectors follow this order
    fn classes(&self) -> &[Label];

    /// Predict the class label for one row
    fn predict(&self, row: &FeatureRow) -> Result<Label, PredictError>;

    /// Per-class probabilities, or `None` when the estimator has no
    /// probability capability.
    fn predict_proba(&self, _row: &FeatureRow) -> Option<Result<Vec<f64>, PredictError>> {
        None
    }

    /// Label together with the probabilities, if any. Implementations that
    /// encode the row should override this to encode it once.
    fn predict_with_proba(&self, row: &FeatureRow) -> Result<(Label, Option<Vec<f64>>), PredictError> {
        let label = self.predict(row)?;
        let proba = self.predict_proba(row).transpose()?;
        Ok((label, proba))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_labels() {
        assert!(Label::Text("Yes".into()).is_affirmative());
        assert!(Label::Number(1.0).is_affirmative());

        assert!(!Label::Text("No".into()).is_affirmative());
        assert!(!Label::Text("yes".into()).is_affirmative());
        assert!(!Label::Text("1".into()).is_affirmative());
        assert!(!Label::Number(0.0).is_affirmative());
        assert!(!Label::Number(2.0).is_affirmative());
    }

    #[test]
    fn test_label_deserializes_both_encodings() {
        let labels: Vec<Label> = serde_json::from_str(r#"["No", 1, 0.0]"#).unwrap();
        assert_eq!(labels[0], Label::Text("No".into()));
        assert_eq!(labels[1], Label::Number(1.0));
        assert_eq!(labels[2], Label::Number(0.0));
        assert_eq!(labels[1].to_string(), "1");
    }
}
