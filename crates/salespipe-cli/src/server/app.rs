//! Axum application setup.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Serve the router on the given listener until `shutdown` resolves.
///
/// In-flight requests are drained before the future completes.
pub async fn serve_with_shutdown(
    state: AppState,
    listener: tokio::net::TcpListener,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Start the prediction server, stopping cleanly on Ctrl+C.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("Server listening on http://{}", addr);

    serve_with_shutdown(state, listener, async {
        tokio::signal::ctrl_c().await.ok();
    })
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use salespipe::ChurnModel;
    use tokio::sync::oneshot;

    use super::*;

    fn test_state() -> AppState {
        let model = ChurnModel {
            feature_names: salespipe::churn::CHURN_FEATURES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            weights: vec![-2.0, 0.5, -0.1, -1.0],
            bias: 0.0,
            means: vec![30.0, 65.0, 2000.0, 1.0],
            stds: vec![20.0, 25.0, 1500.0, 0.8],
            holdout_accuracy: 0.85,
            trained_at: Utc::now(),
        };
        AppState::new(model, "model_churn.json".into())
    }

    #[tokio::test]
    async fn test_server_stops_cleanly_on_shutdown_signal() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve_with_shutdown(test_state(), listener, async {
            rx.await.ok();
        }));

        tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server did not stop after the shutdown signal")
            .unwrap();
        assert!(result.is_ok());
    }
}
