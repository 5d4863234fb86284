//! Serialized pipeline artifact
//!
//! A JSON document holding the fitted preprocessor, the estimator and the
//! class labels. Everything is checked once at load so that prediction only
//! fails on bad input, never on a bad artifact.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::estimator::Estimator;
use super::preprocess::Preprocessor;
use super::{ChurnModel, FeatureRow, Label, PredictError};

/// Artifact layout version this build understands
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("model file '{}' was not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("model file is not a valid pipeline: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported artifact format version {found} (expected {})", FORMAT_VERSION)]
    IncompatibleVersion { found: u32 },

    #[error("inconsistent model artifact: {0}")]
    Invalid(String),
}

/// On-disk representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub classes: Vec<Label>,
    pub preprocessor: Preprocessor,
    pub estimator: Estimator,
}

/// Loaded, validated pipeline
#[derive(Debug, Clone)]
pub struct PipelineModel {
    name: String,
    classes: Vec<Label>,
    preprocessor: Preprocessor,
    estimator: Estimator,
}

impl PipelineModel {
    /// Read and validate an artifact from disk
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let model = Self::from_json(&raw)?;

        tracing::debug!(
            "Parsed {} pipeline '{}' ({} classes, {} encoded features)",
            model.estimator.kind(),
            model.name,
            model.classes.len(),
            model.preprocessor.width()
        );
        Ok(model)
    }

    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        let artifact: ModelArtifact = serde_json::from_str(raw)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, LoadError> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(LoadError::IncompatibleVersion { found: artifact.format_version });
        }
        if artifact.classes.len() < 2 {
            return Err(LoadError::Invalid("at least two classes are required".to_string()));
        }

        artifact.preprocessor.check().map_err(LoadError::Invalid)?;
        artifact
            .estimator
            .check(artifact.classes.len(), artifact.preprocessor.width())
            .map_err(LoadError::Invalid)?;

        let name = artifact
            .name
            .unwrap_or_else(|| artifact.estimator.kind().to_string());

        Ok(Self {
            name,
            classes: artifact.classes,
            preprocessor: artifact.preprocessor,
            estimator: artifact.estimator,
        })
    }

    pub fn estimator_kind(&self) -> &'static str {
        self.estimator.kind()
    }
}

impl ChurnModel for PipelineModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn predict(&self, row: &FeatureRow) -> Result<Label, PredictError> {
        let x = self.preprocessor.transform(row)?;
        Ok(self.classes[self.estimator.predict_index(&x)].clone())
    }

    fn predict_proba(&self, row: &FeatureRow) -> Option<Result<Vec<f64>, PredictError>> {
        if !self.estimator.has_proba() {
            return None;
        }
        self.preprocessor
            .transform(row)
            .map(|x| self.estimator.proba(&x))
            .transpose()
    }

    fn predict_with_proba(&self, row: &FeatureRow) -> Result<(Label, Option<Vec<f64>>), PredictError> {
        let x = self.preprocessor.transform(row)?;
        let label = self.classes[self.estimator.predict_index(&x)].clone();
        Ok((label, self.estimator.proba(&x)))
    }
}
