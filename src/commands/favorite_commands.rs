use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::AppError;
use crate::models::listing::ListingView;
use crate::services::favorite_service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub path: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveFavoriteRequest {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub success: bool,
}

pub async fn add_favorite(
    state: Arc<AppState>,
    request: AddFavoriteRequest,
) -> Result<FavoriteResponse, AppError> {
    tokio::task::spawn_blocking(move || {
        favorite_service::add_favorite(&state.conn(), &request.path, &request.name)
    })
    .await??;
    Ok(FavoriteResponse { success: true })
}

pub async fn remove_favorite(
    state: Arc<AppState>,
    request: RemoveFavoriteRequest,
) -> Result<FavoriteResponse, AppError> {
    tokio::task::spawn_blocking(move || {
        favorite_service::remove_favorite(&state.conn(), &request.path)
    })
    .await??;
    Ok(FavoriteResponse { success: true })
}

pub async fn favorites_page(state: Arc<AppState>) -> Result<ListingView, AppError> {
    tokio::task::spawn_blocking(move || {
        // The store guard is released before any target is stat'ed.
        let records = favorite_service::list_favorites(&state.conn())?;
        Ok::<_, AppError>(favorite_service::favorites_page(records, state.config.root()))
    })
    .await?
    .map_err(|e| {
        error!("reading favorites failed: {e}");
        AppError::General("Error reading favorites".to_string())
    })
}
