use std::fs::{self, Metadata};
use std::path::Path;
use std::time::SystemTime;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::debug;

use crate::error::AppError;
use crate::models::file_entry::{FileEntry, DIRECTORY_SIZE};

/// Characters escaped in links. `/` stays literal so links remain paths.
const LINK_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub fn escape_link(path: &str) -> String {
    utf8_percent_encode(path, LINK_ESCAPE).to_string()
}

/// Groups digits in threes from the right: `1234567` becomes `1,234,567`.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_modified(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Local>::from(time)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Root-anchored link target for a child of `parent`; directories get a trailing `/`.
pub fn child_path(parent: &str, name: &str, is_directory: bool) -> String {
    let mut path = if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    };
    if is_directory {
        path.push('/');
    }
    path
}

/// Builds an entry for `path`, the unescaped root-anchored key used for
/// favorites. Directory paths are expected to carry their trailing `/`.
pub fn build_entry(name: String, path: String, metadata: &Metadata) -> FileEntry {
    let is_directory = metadata.is_dir();
    let size = if is_directory {
        DIRECTORY_SIZE.to_string()
    } else {
        format_number(metadata.len())
    };
    let modified_at = metadata.modified().map(format_modified).unwrap_or_default();

    FileEntry {
        name,
        size,
        modified_at,
        is_directory,
        link: escape_link(&path),
        path,
        is_favorite: false,
    }
}

/// Lists the direct children of `dir`, whose root-anchored form is `clean_path`.
///
/// Children whose metadata cannot be read (broken symlinks, races with
/// deletion, permission errors) are skipped; only failing to open `dir`
/// itself is an error.
pub fn list_directory(dir: &Path, clean_path: &str) -> Result<Vec<FileEntry>, AppError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };
        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("skipping {}: {e}", entry.path().display());
                continue;
            }
        };

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                debug!("skipping non-UTF-8 name {:?} in {}", raw, dir.display());
                continue;
            }
        };
        let path = child_path(clean_path, &name, metadata.is_dir());
        entries.push(build_entry(name, path, &metadata));
    }

    entries.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    Ok(entries)
}
