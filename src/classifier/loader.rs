use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logistic::{LogisticClassifier, LogisticSpec};
use super::model::Classifier;
use crate::features::{ColumnOrder, ColumnOrderError};

pub const FORMAT_VERSION: u32 = 1;

/// Why the model bundle could not be loaded.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model artifact not found at {}", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to read model artifact {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed model artifact {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported artifact format version {found} (expected {})", FORMAT_VERSION)]
    UnsupportedVersion { found: u32 },

    #[error("inconsistent model artifact: {0}")]
    Inconsistent(String),
}

impl From<ColumnOrderError> for ArtifactError {
    fn from(e: ColumnOrderError) -> Self {
        ArtifactError::Inconsistent(format!("column list: {e}"))
    }
}

/// On-disk bundle: the column order and the classifier that was trained on
/// it travel together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub columns: Vec<String>,
    pub classifier: ClassifierSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    LogisticRegression(LogisticSpec),
}

/// A classifier together with the column order its rows must follow.
#[derive(Clone)]
pub struct LoadedModel {
    columns: ColumnOrder,
    classifier: Arc<dyn Classifier>,
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("columns", &self.columns.names())
            .field("classifier", &self.classifier.kind())
            .finish()
    }
}

impl LoadedModel {
    /// Pair a classifier with a column order, refusing widths that disagree.
    pub fn new(
        columns: ColumnOrder,
        classifier: Arc<dyn Classifier>,
    ) -> Result<Self, ArtifactError> {
        if classifier.input_width() != columns.len() {
            return Err(ArtifactError::Inconsistent(format!(
                "classifier expects {} inputs but the column list has {}",
                classifier.input_width(),
                columns.len()
            )));
        }
        Ok(Self {
            columns,
            classifier,
        })
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ArtifactError> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: artifact.format_version,
            });
        }
        let columns = ColumnOrder::from_names(&artifact.columns)?;
        let classifier: Arc<dyn Classifier> = match artifact.classifier {
            ClassifierSpec::LogisticRegression(spec) => Arc::new(
                LogisticClassifier::compile(spec, &columns).map_err(ArtifactError::Inconsistent)?,
            ),
        };
        Self::new(columns, classifier)
    }

    pub fn columns(&self) -> &ColumnOrder {
        &self.columns
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }
}

/// Read and check the model bundle at `path`.
pub fn load_model(path: &Path) -> Result<LoadedModel, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ArtifactError::Missing {
            path: path.to_path_buf(),
        },
        _ => ArtifactError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let artifact: ModelArtifact =
        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    let model = LoadedModel::from_artifact(artifact)?;

    tracing::info!(
        path = %path.display(),
        classifier = model.classifier().kind(),
        columns = ?model.columns().names(),
        "Model loaded"
    );

    Ok(model)
}
