use std::path::{Path, PathBuf};

pub fn normalize(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");
    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }
    normalized
}

pub fn is_within_scope(path: &str, root: &str) -> bool {
    let path = normalize(path);
    let root = normalize(root);

    if path == root {
        return true;
    }

    if root == "/" {
        return path.starts_with('/');
    }

    path.starts_with(&(root + "/"))
}

/// Lexically applies a `/`-separated request path onto `root`.
///
/// `.` and empty segments are dropped and `..` pops the previous component,
/// which may climb above `root`. Nothing touches the filesystem, so the
/// result must still be checked with [`is_within_scope`].
pub fn join_request(root: &Path, request: &str) -> PathBuf {
    let mut joined = root.to_path_buf();
    for segment in request.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                joined.pop();
            }
            other => joined.push(other),
        }
    }
    joined
}

/// The root-anchored form of `full` (`/` for the root itself), or `None`
/// when `full` is not under `root`.
pub fn root_relative(full: &Path, root: &Path) -> Option<String> {
    let relative = full.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Some(format!("/{}", segments.join("/")))
}
