//! HTTP API handlers for mmo-api

pub mod auth;
pub mod content;
pub mod health;
pub mod library;
pub mod lists;
pub mod settings;
pub mod spotify;
pub mod youtube;

pub use health::health_routes;

use crate::error::{ApiError, ApiResult};

/// Run key-value store work on the blocking pool
///
/// `FileStore` rewrites its backing file on every mutation while holding a
/// `std::sync::Mutex`.
pub(crate) async fn blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> mmo_common::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Store task failed: {}", e)))?;
    Ok(result?)
}
