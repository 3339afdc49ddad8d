//! Churn classifier: feature encoding, training, scoring, persistence.
//!
//! This is a data pipeline disjoint from the reporting ETL; the two
//! share record-keeping conventions but no runtime state.

mod features;
mod model;
mod trainer;

pub use features::{CHURN_FEATURES, ChurnObservation, ContractTerm};
pub use model::{ChurnModel, ChurnPrediction};
pub use trainer::{TrainingConfig, TrainingSummary, fetch_observations, train, train_from_database};
