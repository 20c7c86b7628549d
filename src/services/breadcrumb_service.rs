use crate::models::breadcrumb::Breadcrumb;

fn segments(clean_path: &str) -> Vec<&str> {
    clean_path
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// One crumb per segment; empty for the root.
pub fn build_breadcrumbs(clean_path: &str) -> Vec<Breadcrumb> {
    let parts = segments(clean_path);
    (0..parts.len())
        .map(|i| Breadcrumb {
            name: parts[i].to_string(),
            path: format!("/{}", parts[..=i].join("/")),
        })
        .collect()
}

/// `None` for the root, `/` for its direct children.
pub fn parent_path(clean_path: &str) -> Option<String> {
    let parts = segments(clean_path);
    if parts.is_empty() {
        return None;
    }
    Some(format!("/{}", parts[..parts.len() - 1].join("/")))
}
