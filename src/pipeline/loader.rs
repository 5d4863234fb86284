//! Model Loader - one-shot, memoized artifact loading
//!
//! The artifact is read at most once per process. Any failure is logged and
//! kept as [`Unavailable`] and served as-is until restart.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::artifact::{LoadError, PipelineModel};
use super::ChurnModel;

/// Read-only model handle shared across requests
pub type SharedModel = Arc<dyn ChurnModel>;

/// Why no model is available
#[derive(Debug, Clone, PartialEq)]
pub enum Unavailable {
    Missing(PathBuf),
    Failed(String),
}

impl Unavailable {
    /// Message shown on the blocking error page
    pub fn user_message(&self) -> String {
        match self {
            Unavailable::Missing(path) => format!(
                "Error: The model file '{}' was not found. \
                 Please make sure you have run the training script to save the model.",
                path.display()
            ),
            Unavailable::Failed(reason) => {
                format!("An error occurred while loading the model: {}", reason)
            }
        }
    }
}

impl From<LoadError> for Unavailable {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::NotFound(path) => Unavailable::Missing(path),
            other => Unavailable::Failed(other.to_string()),
        }
    }
}

/// Outcome of the single load attempt
#[derive(Clone)]
pub enum ModelStatus {
    Ready(SharedModel),
    Unavailable(Unavailable),
}

impl ModelStatus {
    pub fn model(&self) -> Option<SharedModel> {
        match self {
            ModelStatus::Ready(model) => Some(Arc::clone(model)),
            ModelStatus::Unavailable(_) => None,
        }
    }

    pub fn ready(&self) -> Result<&SharedModel, &Unavailable> {
        match self {
            ModelStatus::Ready(model) => Ok(model),
            ModelStatus::Unavailable(why) => Err(why),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelStatus::Ready(_))
    }
}

impl fmt::Debug for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelStatus::Ready(model) => f.debug_tuple("Ready").field(&model.name()).finish(),
            ModelStatus::Unavailable(why) => f.debug_tuple("Unavailable").field(why).finish(),
        }
    }
}

/// Loads the artifact at `path` on first use and caches the result
pub struct ModelLoader {
    path: PathBuf,
    status: OnceCell<ModelStatus>,
}

impl ModelLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            status: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Result of the load, attempting it on the first call only
    pub fn status(&self) -> &ModelStatus {
        self.status.get_or_init(|| match PipelineModel::from_path(&self.path) {
            Ok(model) => {
                tracing::info!(
                    "Model '{}' ({}) loaded successfully from {}",
                    model.name(),
                    model.estimator_kind(),
                    self.path.display()
                );
                ModelStatus::Ready(Arc::new(model))
            }
            Err(e) => {
                tracing::error!("Model unavailable ({}): {}", self.path.display(), e);
                ModelStatus::Unavailable(e.into())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE: &str = include_str!("../../fixtures/churn_model_pipeline.json");

    #[test]
    fn test_valid_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("churn_model_pipeline.json");
        fs::write(&path, SAMPLE).unwrap();

        let loader = ModelLoader::new(&path);
        let model = loader.status().model().expect("model should load");
        assert_eq!(model.name(), "telecom-churn-logreg");
        assert!(loader.status().is_ready());
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ModelLoader::new(dir.path().join("nope.json"));

        assert!(loader.status().model().is_none());
        match loader.status() {
            ModelStatus::Unavailable(why @ Unavailable::Missing(_)) => {
                assert!(why.user_message().contains("was not found"));
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("churn_model_pipeline.json");
        fs::write(&path, &SAMPLE[..SAMPLE.len() / 2]).unwrap();

        let loader = ModelLoader::new(&path);
        assert!(loader.status().model().is_none());
        assert!(matches!(loader.status(), ModelStatus::Unavailable(Unavailable::Failed(_))));
    }

    #[test]
    fn test_load_is_memoized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("churn_model_pipeline.json");
        fs::write(&path, SAMPLE).unwrap();

        let loader = ModelLoader::new(&path);
        let first = loader.status().model().unwrap();
        fs::remove_file(&path).unwrap();
        let second = loader.status().model().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // a failed attempt is not retried either
        let missing = ModelLoader::new(&path);
        assert!(missing.status().model().is_none());
        fs::write(&path, SAMPLE).unwrap();
        assert!(missing.status().model().is_none());
    }
}
