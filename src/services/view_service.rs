use crate::models::breadcrumb::Breadcrumb;
use crate::models::file_entry::FileEntry;
use crate::models::listing::ListingView;

/// Merges a listing with navigation data, flagging favorites through `is_favorite`.
pub fn assemble<F>(
    files: Vec<FileEntry>,
    breadcrumbs: Vec<Breadcrumb>,
    parent: Option<String>,
    query: Option<String>,
    is_favorite: F,
) -> ListingView
where
    F: Fn(&str) -> bool,
{
    let files = files
        .into_iter()
        .map(|mut entry| {
            entry.is_favorite = is_favorite(&entry.path);
            entry
        })
        .collect();

    ListingView {
        files,
        breadcrumbs,
        parent,
        query,
        is_favorites_page: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> FileEntry {
        FileEntry {
            name: path.trim_matches('/').to_string(),
            size: "1".to_string(),
            modified_at: "2025-01-01 00:00".to_string(),
            is_directory: path.ends_with('/'),
            path: path.to_string(),
            link: path.to_string(),
            is_favorite: false,
        }
    }

    #[test]
    fn test_flags_favorites_by_path() {
        let view = assemble(
            vec![entry("/notes.txt"), entry("/photos/")],
            Vec::new(),
            None,
            None,
            |path| path == "/photos/",
        );

        assert!(!view.files[0].is_favorite);
        assert!(view.files[1].is_favorite);
        assert!(!view.is_favorites_page);
    }

    #[test]
    fn test_passes_navigation_through() {
        let crumbs = vec![Breadcrumb {
            name: "docs".to_string(),
            path: "/docs".to_string(),
        }];
        let view = assemble(
            Vec::new(),
            crumbs.clone(),
            Some("/".to_string()),
            Some("report".to_string()),
            |_| true,
        );

        assert!(view.files.is_empty());
        assert_eq!(view.breadcrumbs, crumbs);
        assert_eq!(view.parent.as_deref(), Some("/"));
        assert_eq!(view.query.as_deref(), Some("report"));
    }
}
