//! Temporary project directories.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary project directory that is removed on drop.
///
/// Holds a separate `contexts/` directory so tests can point the context
/// store at it without touching the user's real configuration.
///
/// # Panics
/// All writers panic if the filesystem operation fails.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new()
            .unwrap_or_else(|e| panic!("Workspace: failed to create temp dir: {e}"));
        Self { dir }
    }

    /// Root of the project.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `relative` inside the project.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Directory meant for the context store.
    pub fn context_dir(&self) -> PathBuf {
        self.path("contexts")
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Workspace: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Workspace: failed to write {}: {e}", path.display()));
        path
    }

    /// Write `engctl.yml` at the project root.
    pub fn write_config(&self, content: &str) -> PathBuf {
        self.write("engctl.yml", content)
    }

    /// Write `contexts/contexts.yml`.
    pub fn write_contexts(&self, content: &str) -> PathBuf {
        self.write("contexts/contexts.yml", content)
    }

    /// Read a file inside the project.
    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Workspace: failed to read {}: {e}", path.display()))
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
