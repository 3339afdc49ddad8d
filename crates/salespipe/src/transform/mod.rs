//! The reporting transform: normalize, derive, join, project.

mod engine;
mod report;

pub use engine::{normalize_city, transform};
pub use report::TransformReport;
