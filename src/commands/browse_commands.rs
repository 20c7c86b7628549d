use std::path::PathBuf;
use std::sync::Arc;

use tracing::error;

use crate::error::AppError;
use crate::models::listing::ListingView;
use crate::services::path_service::{self, Resolution};
use crate::services::{breadcrumb_service, file_service, search_service, view_service};
use crate::state::AppState;

#[derive(Debug)]
pub enum BrowseOutcome {
    File(PathBuf),
    Listing(ListingView),
}

/// Resolves `request_path` under the configured root and either hands back
/// a file to stream or builds the listing (search results when `query` is
/// non-empty).
pub async fn browse(
    state: Arc<AppState>,
    request_path: String,
    query: Option<String>,
) -> Result<BrowseOutcome, AppError> {
    let root = state.config.root().to_path_buf();
    let query = query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty());

    let resolution = {
        let root = root.clone();
        tokio::task::spawn_blocking(move || path_service::resolve(&root, &request_path)).await?
    };

    let (full_path, clean_path) = match resolution {
        Resolution::Forbidden => return Err(AppError::Forbidden),
        Resolution::NotFound => return Err(AppError::NotFound),
        Resolution::File(path) => return Ok(BrowseOutcome::File(path)),
        Resolution::Directory {
            full_path,
            clean_path,
        } => (full_path, clean_path),
    };

    let files = match &query {
        Some(term) => search_service::search(state.searcher.as_ref(), term, &root).await,
        None => {
            let listing_path = clean_path.clone();
            tokio::task::spawn_blocking(move || {
                file_service::list_directory(&full_path, &listing_path)
            })
            .await?
            .map_err(|e| {
                error!("listing {clean_path} failed: {e}");
                AppError::General("Error reading directory".to_string())
            })?
        }
    };

    let breadcrumbs = breadcrumb_service::build_breadcrumbs(&clean_path);
    let parent = breadcrumb_service::parent_path(&clean_path);

    let view = tokio::task::spawn_blocking(move || {
        view_service::assemble(files, breadcrumbs, parent, query, |path| {
            state.is_favorite(path)
        })
    })
    .await?;

    Ok(BrowseOutcome::Listing(view))
}
