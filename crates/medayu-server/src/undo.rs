//! Compensating actions for file side effects.
//!
//! A request that writes files pushes one [`UndoAction`] per write onto a
//! [`Rollback`]. If the request fails anywhere before [`Rollback::commit`],
//! dropping the rollback runs the pending actions in reverse (LIFO) order so
//! no upload of a rejected request is left on disk.

use std::path::PathBuf;

/// A single compensating action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoAction {
    /// Remove a file this request created.
    RemoveFile(PathBuf),
}

impl UndoAction {
    fn run(&self) {
        match self {
            UndoAction::RemoveFile(path) => match std::fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed file of failed request"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "could not remove file of failed request"
                ),
            },
        }
    }
}

/// Pending compensating actions for one request.
#[derive(Debug, Default)]
pub struct Rollback {
    pending: Vec<UndoAction>,
}

impl Rollback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly written file for removal on failure.
    pub fn created_file(&mut self, path: impl Into<PathBuf>) {
        self.pending.push(UndoAction::RemoveFile(path.into()));
    }

    /// Actions that would run if the rollback were dropped now.
    pub fn pending(&self) -> &[UndoAction] {
        &self.pending
    }

    /// Keeps every side effect; nothing runs on drop.
    pub fn commit(mut self) {
        self.pending.clear();
    }
}

impl Drop for Rollback {
    fn drop(&mut self) {
        for action in self.pending.drain(..).rev() {
            action.run();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn drop_removes_created_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.png");
        let b = touch(dir.path(), "b.png");
        {
            let mut rollback = Rollback::new();
            rollback.created_file(&a);
            rollback.created_file(&b);
            assert_eq!(
                rollback.pending(),
                &[UndoAction::RemoveFile(a.clone()), UndoAction::RemoveFile(b.clone())]
            );
        }
        assert!(!a.exists());
        assert!(!b.exists());
    }

    #[test]
    fn commit_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.png");
        let mut rollback = Rollback::new();
        rollback.created_file(&a);
        rollback.commit();
        assert!(a.exists());
    }

    #[test]
    fn already_missing_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut rollback = Rollback::new();
        rollback.created_file(dir.path().join("gone.png"));
        drop(rollback);
    }
}
