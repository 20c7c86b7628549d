use serde::{Deserialize, Serialize};

/// Size shown for directories.
pub const DIRECTORY_SIZE: &str = "-";

/// One row of a listing, search result or favorites page.
///
/// `name` is the bare child name for directory listings, the root-relative
/// path for search results and the stored label on the favorites page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub size: String,
    pub modified_at: String,
    pub is_directory: bool,
    /// Unescaped root-anchored path, the key used for favorites.
    pub path: String,
    /// `path` percent-encoded for use in an href.
    pub link: String,
    pub is_favorite: bool,
}
