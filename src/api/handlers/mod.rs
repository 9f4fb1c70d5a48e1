pub mod form;
pub mod health;
pub mod metrics;
pub mod predict;
