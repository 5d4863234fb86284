//! Column transforms applied before the estimator
//!
//! Turns a named feature row into the dense vector the estimator was fitted on.

use serde::{Deserialize, Serialize};

use super::{FeatureRow, FeatureValue, PredictError};

/// What a one-hot encoder does with a category it was not fitted on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    /// Encode as all zeros
    Ignore,
}

/// One fitted column transform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureTransform {
    Passthrough {
        column: String,
    },
    Standard {
        column: String,
        mean: f64,
        scale: f64,
    },
    OneHot {
        column: String,
        categories: Vec<String>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
}

impl FeatureTransform {
    pub fn column(&self) -> &str {
        match self {
            FeatureTransform::Passthrough { column }
            | FeatureTransform::Standard { column, .. }
            | FeatureTransform::OneHot { column, .. } => column,
        }
    }

    /// Number of output slots this transform writes
    pub fn width(&self) -> usize {
        match self {
            FeatureTransform::OneHot { categories, .. } => categories.len(),
            _ => 1,
        }
    }

    fn check(&self) -> Result<(), String> {
        match self {
            FeatureTransform::Passthrough { .. } => Ok(()),
            FeatureTransform::Standard { column, mean, scale } => {
                if !mean.is_finite() || !scale.is_finite() || *scale == 0.0 {
                    return Err(format!("invalid scaling parameters for column '{}'", column));
                }
                Ok(())
            }
            FeatureTransform::OneHot { column, categories, .. } => {
                if categories.is_empty() {
                    return Err(format!("no categories for column '{}'", column));
                }
                for (i, cat) in categories.iter().enumerate() {
                    if categories[..i].contains(cat) {
                        return Err(format!("duplicate category '{}' in column '{}'", cat, column));
                    }
                }
                Ok(())
            }
        }
    }

    fn apply(&self, row: &FeatureRow, out: &mut Vec<f64>) -> Result<(), PredictError> {
        let column = self.column();
        let value = row
            .get(column)
            .ok_or_else(|| PredictError::MissingColumn(column.to_string()))?;

        match self {
            FeatureTransform::Passthrough { .. } => {
                out.push(numeric(column, value)?);
            }
            FeatureTransform::Standard { mean, scale, .. } => {
                out.push((numeric(column, value)? - mean) / scale);
            }
            FeatureTransform::OneHot { categories, handle_unknown, .. } => {
                let FeatureValue::Category(cat) = value else {
                    return Err(PredictError::TypeMismatch {
                        column: column.to_string(),
                        expected: "categorical",
                        found: value.kind(),
                    });
                };

                let hit = categories.iter().position(|c| c == cat);
                if hit.is_none() && *handle_unknown == HandleUnknown::Error {
                    return Err(PredictError::UnknownCategory {
                        column: column.to_string(),
                        value: cat.clone(),
                    });
                }
                out.extend((0..categories.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));
            }
        }
        Ok(())
    }
}

fn numeric(column: &str, value: &FeatureValue) -> Result<f64, PredictError> {
    match value {
        FeatureValue::Number(n) if n.is_finite() => Ok(*n),
        FeatureValue::Number(_) => Err(PredictError::NonFinite(column.to_string())),
        FeatureValue::Category(_) => Err(PredictError::TypeMismatch {
            column: column.to_string(),
            expected: "numeric",
            found: value.kind(),
        }),
    }
}

/// Ordered list of column transforms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    pub features: Vec<FeatureTransform>,
}

impl Preprocessor {
    /// Length of the encoded vector
    pub fn width(&self) -> usize {
        self.features.iter().map(FeatureTransform::width).sum()
    }

    /// Structural checks run once at load time
    pub fn check(&self) -> Result<(), String> {
        if self.features.is_empty() {
            return Err("preprocessor has no features".to_string());
        }
        self.features.iter().try_for_each(FeatureTransform::check)
    }

    /// Encode one row
    pub fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, PredictError> {
        let mut out = Vec::with_capacity(self.width());
        for feature in &self.features {
            feature.apply(row, &mut out)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preprocessor(handle_unknown: HandleUnknown) -> Preprocessor {
        Preprocessor {
            features: vec![
                FeatureTransform::OneHot {
                    column: "Contract".into(),
                    categories: vec!["Monthly".into(), "Yearly".into()],
                    handle_unknown,
                },
                FeatureTransform::Standard { column: "Age".into(), mean: 40.0, scale: 10.0 },
                FeatureTransform::Passthrough { column: "Charges".into() },
            ],
        }
    }

    fn row(contract: &str, age: f64) -> FeatureRow {
        let mut row = FeatureRow::new();
        row.insert("Contract".into(), contract.into());
        row.insert("Age".into(), age.into());
        row.insert("Charges".into(), 12.5.into());
        row
    }

    #[test]
    fn test_transform_encodes_in_order() {
        let pre = preprocessor(HandleUnknown::Error);
        assert_eq!(pre.width(), 4);
        assert_eq!(pre.transform(&row("Yearly", 55.0)).unwrap(), vec![0.0, 1.0, 1.5, 12.5]);
    }

    #[test]
    fn test_unknown_category() {
        let err = preprocessor(HandleUnknown::Error)
            .transform(&row("Weekly", 30.0))
            .unwrap_err();
        assert_eq!(
            err,
            PredictError::UnknownCategory { column: "Contract".into(), value: "Weekly".into() }
        );

        let encoded = preprocessor(HandleUnknown::Ignore)
            .transform(&row("Weekly", 30.0))
            .unwrap();
        assert_eq!(&encoded[..2], &[0.0, 0.0]);
    }

    #[test]
    fn test_missing_column_and_type_mismatch() {
        let pre = preprocessor(HandleUnknown::Error);

        let mut missing = row("Monthly", 30.0);
        missing.remove("Charges");
        assert_eq!(
            pre.transform(&missing).unwrap_err(),
            PredictError::MissingColumn("Charges".into())
        );

        let mut swapped = row("Monthly", 30.0);
        swapped.insert("Age".into(), "thirty".into());
        assert!(matches!(
            pre.transform(&swapped).unwrap_err(),
            PredictError::TypeMismatch { expected: "numeric", .. }
        ));

        let mut nan = row("Monthly", 30.0);
        nan.insert("Charges".into(), f64::NAN.into());
        assert_eq!(pre.transform(&nan).unwrap_err(), PredictError::NonFinite("Charges".into()));
    }

    #[test]
    fn test_check_rejects_bad_parameters() {
        let zero_scale = Preprocessor {
            features: vec![FeatureTransform::Standard { column: "Age".into(), mean: 0.0, scale: 0.0 }],
        };
        assert!(zero_scale.check().is_err());

        let duplicate = Preprocessor {
            features: vec![FeatureTransform::OneHot {
                column: "Gender".into(),
                categories: vec!["Male".into(), "Male".into()],
                handle_unknown: HandleUnknown::Error,
            }],
        };
        assert!(duplicate.check().is_err());
        assert!(preprocessor(HandleUnknown::Error).check().is_ok());
    }
}
