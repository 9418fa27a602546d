// Folder-level orchestration: one client folder in, one `index.html` out.
//
// Each client is independent. A failure is recorded against that client and
// the run carries on with the next folder.
use crate::error::{PortalError, Result};
use crate::loader::{config_path, output_path, read_document};
use crate::output::write_html;
use crate::portal::{render, RenderOptions};
use crate::util::Clock;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug)]
pub enum ClientStatus {
    Generated { path: PathBuf, bytes: usize },
    /// Folder has no `reports.json`.
    Skipped,
    Failed(PortalError),
}

#[derive(Debug)]
pub struct ClientOutcome {
    pub folder: PathBuf,
    pub status: ClientStatus,
}

impl ClientOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, ClientStatus::Failed(_))
    }
}

/// Render one client folder and write its `index.html`.
///
/// Nothing is written unless loading and rendering both succeed.
pub fn generate_client(folder: &Path, clock: &dyn Clock, opts: &RenderOptions) -> Result<(PathBuf, usize)> {
    let doc = read_document(folder)?;
    let html = render(&doc, clock, opts)?;
    let path = output_path(folder);
    write_html(&path, &html)?;
    info!(path = %path.display(), bytes = html.len(), "portal generated");
    Ok((path, html.len()))
}

/// Immediate, non-hidden subdirectories of `root`, sorted by name.
pub fn discover_clients(root: &Path) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        // Depth 0 is the root itself, which may be hidden (e.g. a temp dir).
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry.map_err(|e| PortalError::Io(e.into()))?;
        if entry.file_type().is_dir() {
            folders.push(entry.into_path());
        }
    }
    debug!(root = %root.display(), count = folders.len(), "discovered client folders");
    Ok(folders)
}

pub fn generate_all(root: &Path, clock: &dyn Clock, opts: &RenderOptions) -> Result<Vec<ClientOutcome>> {
    let mut outcomes = Vec::new();
    for folder in discover_clients(root)? {
        let status = if !config_path(&folder).is_file() {
            debug!(folder = %folder.display(), "no config, skipping");
            ClientStatus::Skipped
        } else {
            match generate_client(&folder, clock, opts) {
                Ok((path, bytes)) => ClientStatus::Generated { path, bytes },
                Err(err) => {
                    warn!(folder = %folder.display(), error = %err, "client failed");
                    ClientStatus::Failed(err)
                }
            }
        };
        outcomes.push(ClientOutcome { folder, status });
    }
    Ok(outcomes)
}
