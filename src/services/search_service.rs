use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::file_entry::FileEntry;
use crate::scope_path::root_relative;
use crate::services::file_service::build_entry;

/// Finds filesystem objects under `root` whose name matches `term`
/// case-insensitively, returning their absolute paths.
#[async_trait]
pub trait FileSearcher: Send + Sync {
    async fn find(&self, term: &str, root: &Path) -> Result<Vec<PathBuf>, AppError>;
}

/// Runs an `fd`-compatible binary: `{program} -i -- {term} {root}`, one
/// absolute path per output line.
pub struct FdSearcher {
    program: String,
    timeout: Option<Duration>,
}

impl FdSearcher {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl FileSearcher for FdSearcher {
    async fn find(&self, term: &str, root: &Path) -> Result<Vec<PathBuf>, AppError> {
        let mut child = Command::new(&self.program)
            .arg("-i")
            .arg("--")
            .arg(term)
            .arg(root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::General("search stdout unavailable".to_string()))?;

        let program = &self.program;
        let collect = async move {
            let mut lines = BufReader::new(stdout).split(b'\n');
            let mut paths = Vec::new();
            while let Some(line) = lines.next_segment().await? {
                match String::from_utf8(line) {
                    Ok(line) if !line.is_empty() => paths.push(PathBuf::from(line)),
                    Ok(_) => {}
                    Err(e) => debug!("skipping non-UTF-8 search result: {e}"),
                }
            }

            let status = child.wait().await?;
            if !status.success() {
                return Err(AppError::General(format!("{program} exited with {status}")));
            }
            Ok::<_, AppError>(paths)
        };

        // Dropping `collect` on timeout drops the child, which kills it.
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, collect).await.map_err(|_| {
                AppError::General(format!(
                    "{program} timed out after {}s",
                    limit.as_secs_f32()
                ))
            })?,
            None => collect.await,
        }
    }
}

/// Returns a fixed set of paths regardless of the term.
#[derive(Debug, Clone, Default)]
pub struct CannedSearcher {
    paths: Vec<PathBuf>,
}

impl CannedSearcher {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl FileSearcher for CannedSearcher {
    async fn find(&self, _term: &str, _root: &Path) -> Result<Vec<PathBuf>, AppError> {
        Ok(self.paths.clone())
    }
}

/// Turns search hits into entries named by their root-relative path.
///
/// Hits outside `root` or that can no longer be stat'ed are skipped.
pub fn entries_from_paths(paths: &[PathBuf], root: &Path) -> Vec<FileEntry> {
    let mut entries = Vec::new();
    for full_path in paths {
        let Some(relative) = root_relative(full_path, root) else {
            debug!("skipping search hit outside root: {}", full_path.display());
            continue;
        };
        if relative == "/" {
            continue;
        }
        let metadata = match fs::metadata(full_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("skipping search hit {}: {e}", full_path.display());
                continue;
            }
        };

        let name = relative.trim_start_matches('/').to_string();
        let mut path = relative;
        if metadata.is_dir() {
            path.push('/');
        }
        entries.push(build_entry(name, path, &metadata));
    }
    entries
}

/// Searches `root` for `term`. Any searcher failure yields an empty result.
pub async fn search(searcher: &dyn FileSearcher, term: &str, root: &Path) -> Vec<FileEntry> {
    let paths = match searcher.find(term, root).await {
        Ok(paths) => paths,
        Err(e) => {
            warn!("search for {term:?} failed: {e}");
            return Vec::new();
        }
    };

    let root = root.to_path_buf();
    match tokio::task::spawn_blocking(move || entries_from_paths(&paths, &root)).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("search result task failed: {e}");
            Vec::new()
        }
    }
}
