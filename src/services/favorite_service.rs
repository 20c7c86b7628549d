use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::data::repository;
use crate::error::AppError;
use crate::models::favorite::FavoriteRecord;
use crate::models::file_entry::FileEntry;
use crate::models::listing::ListingView;
use crate::scope_path::{is_within_scope, join_request};
use crate::services::file_service::build_entry;

/// Best-effort membership check: lookup failures count as "not a favorite".
pub fn is_favorite(conn: &Connection, path: &str) -> bool {
    match repository::favorite_exists(conn, path) {
        Ok(found) => found,
        Err(e) => {
            warn!("favorite lookup for {path} failed: {e}");
            false
        }
    }
}

pub fn add_favorite(conn: &Connection, path: &str, name: &str) -> Result<(), AppError> {
    if path.trim().is_empty() {
        return Err(AppError::InvalidRequest("path is empty".to_string()));
    }
    if !repository::insert_favorite(conn, path, name)? {
        debug!("{path} is already a favorite");
    }
    Ok(())
}

pub fn remove_favorite(conn: &Connection, path: &str) -> Result<(), AppError> {
    repository::delete_favorite(conn, path)?;
    Ok(())
}

/// Every stored favorite, most recent first.
pub fn list_favorites(conn: &Connection) -> Result<Vec<FavoriteRecord>, AppError> {
    repository::list_favorites(conn)
}

/// Builds the favorites page from already-loaded records, keeping their order.
///
/// Records whose target is gone, or whose path would leave `root`, are
/// skipped rather than reported. Only the filesystem is touched here, so
/// callers should release the store before calling.
pub fn favorites_page(records: Vec<FavoriteRecord>, root: &Path) -> ListingView {
    let root_str = root.to_string_lossy();
    let mut files: Vec<FileEntry> = Vec::new();

    for record in records {
        let full_path = join_request(root, &record.path);
        if !is_within_scope(&full_path.to_string_lossy(), &root_str) {
            debug!("skipping favorite outside root: {}", record.path);
            continue;
        }
        let metadata = match fs::metadata(&full_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("skipping favorite {}: {e}", record.path);
                continue;
            }
        };

        let mut entry = build_entry(record.name, record.path, &metadata);
        entry.is_favorite = true;
        files.push(entry);
    }

    ListingView {
        files,
        breadcrumbs: Vec::new(),
        parent: None,
        query: None,
        is_favorites_page: true,
    }
}
