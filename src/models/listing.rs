use serde::Serialize;

use crate::models::breadcrumb::Breadcrumb;
use crate::models::file_entry::FileEntry;

/// Everything a page needs to render one listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub files: Vec<FileEntry>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub parent: Option<String>,
    pub query: Option<String>,
    pub is_favorites_page: bool,
}
