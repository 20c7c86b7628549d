use std::fs;
use std::path::{Path, PathBuf};

use crate::scope_path::{is_within_scope, join_request, root_relative};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The request climbs out of the root.
    Forbidden,
    NotFound,
    File(PathBuf),
    Directory {
        full_path: PathBuf,
        /// Root-anchored form of the request, `/` for the root itself.
        clean_path: String,
    },
}

/// Maps a raw request path onto `root` and classifies the target.
///
/// The scope check is lexical: a symlink inside the root that points
/// elsewhere resolves normally.
pub fn resolve(root: &Path, request: &str) -> Resolution {
    let full_path = join_request(root, request);
    if !is_within_scope(&full_path.to_string_lossy(), &root.to_string_lossy()) {
        return Resolution::Forbidden;
    }

    let Some(clean_path) = root_relative(&full_path, root) else {
        return Resolution::Forbidden;
    };

    match fs::metadata(&full_path) {
        Err(_) => Resolution::NotFound,
        Ok(metadata) if metadata.is_dir() => Resolution::Directory {
            full_path,
            clean_path,
        },
        Ok(_) => Resolution::File(full_path),
    }
}
