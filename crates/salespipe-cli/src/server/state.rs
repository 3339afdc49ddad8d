//! Application state for the prediction server.

use std::path::PathBuf;
use std::sync::Arc;

use salespipe::ChurnModel;

/// Shared application state.
///
/// The model is immutable once loaded; the server shares no state with
/// the reporting pipeline.
#[derive(Clone)]
pub struct AppState {
    /// The fitted churn model.
    pub model: Arc<ChurnModel>,
    /// Path the model was loaded from (for display).
    pub model_path: PathBuf,
}

impl AppState {
    /// Create new application state.
    pub fn new(model: ChurnModel, model_path: PathBuf) -> Self {
        Self {
            model: Arc::new(model),
            model_path,
        }
    }
}
