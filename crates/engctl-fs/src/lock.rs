//! Advisory locks guarding read-modify-write cycles

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Exclusive lock on a sidecar `<name>.lock` file next to a document.
///
/// Hold it from the read until the last write of the document. The lock
/// file itself is left in place; the lock is released on drop.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Block until the lock for `target` is acquired.
    pub fn acquire(target: &NormalizedPath) -> Result<Self> {
        let target = target.to_native();
        let mut name = target.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        let path = target.with_file_name(name);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;
        file.lock_exclusive()
            .map_err(|_| Error::LockFailed { path: path.clone() })?;

        tracing::debug!(lock = %path.display(), "Acquired lock");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(lock = %self.path.display(), "Failed to release lock: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_lock_file_sits_next_to_target() {
        let temp = TempDir::new().unwrap();
        let target = NormalizedPath::new(temp.path().join("state/contexts.yml"));

        let lock = FileLock::acquire(&target).unwrap();

        assert_eq!(lock.path(), temp.path().join("state/contexts.yml.lock"));
        assert!(lock.path().is_file());
    }

    #[test]
    fn test_second_holder_waits_for_release() {
        let temp = TempDir::new().unwrap();
        let target = NormalizedPath::new(temp.path().join("app.json"));
        let first = FileLock::acquire(&target).unwrap();

        let (tx, rx) = mpsc::channel();
        let waiter_target = target.clone();
        let waiter = thread::spawn(move || {
            let _second = FileLock::acquire(&waiter_target).unwrap();
            tx.send(()).unwrap();
        });

        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
        drop(first);
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
        waiter.join().unwrap();
    }
}
