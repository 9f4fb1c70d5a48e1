pub mod loader;
pub mod logistic;
pub mod model;

pub use loader::{load_model, ArtifactError, ClassifierSpec, LoadedModel, ModelArtifact};
pub use logistic::{LogisticClassifier, LogisticSpec, NumericTerm};
pub use model::{Classifier, InferenceError};
