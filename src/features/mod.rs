//! Feature contract: the named, typed, ordered inputs of the classifier.

pub mod row;
pub mod schema;
pub mod validate;

pub use row::{FeatureRow, FeatureValue};
pub use schema::{ColumnOrder, ColumnOrderError, Feature, FeatureKind};
pub use validate::{validate, ValidationError};
