use axum::{extract::State, response::IntoResponse, Json};

use crate::error::ApiError;
use crate::AppState;

/// GET /health
///
/// With a PostgreSQL store, the pool must answer a trivial query.
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    if let Some(pool) = &state.pool {
        technotes_db::log_pool_metrics(pool);
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!(subsystem = "api", error = %e, "Health check query failed");
            return Err(ApiError::Unavailable("Database unavailable.".to_string()));
        }
    }

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.storage.as_str(),
    })))
}
