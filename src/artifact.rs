//! Scratch files handed to the interpreter.
//!
//! Each staged [`Artifact`] owns exactly one file. The file goes away when the
//! artifact is retired or dropped, whichever happens first, so every exit path
//! of a run (including unwinding) cleans up after itself.

use crate::error::ExecError;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Directory that staged artifacts are written into.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    scratch_dir: PathBuf,
}

impl ArtifactStore {
    /// Open the store, creating the scratch directory if needed.
    pub fn open(scratch_dir: impl Into<PathBuf>) -> Result<Self, ExecError> {
        let scratch_dir = scratch_dir.into();
        fs::create_dir_all(&scratch_dir)
            .map_err(|e| ExecError::Artifact(format!("mkdir {}: {}", scratch_dir.display(), e)))?;
        Ok(Self { scratch_dir })
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Write `content` verbatim to a freshly named file.
    pub fn stage(&self, content: &str) -> Result<Artifact, ExecError> {
        let path = self
            .scratch_dir
            .join(format!("{}.txt", Uuid::new_v4().simple()));

        // create_new: never clobber a file we did not create
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| ExecError::Artifact(format!("create {}: {}", path.display(), e)))?;

        // Guard exists before the write so a failed write still cleans up.
        let artifact = Artifact {
            path,
            retired: false,
        };
        file.write_all(content.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| ExecError::Artifact(format!("write {}: {}", artifact.path.display(), e)))?;

        debug!(path = %artifact.path.display(), bytes = content.len(), "Artifact staged");
        Ok(artifact)
    }
}

/// A staged file; removed on [`Artifact::retire`] or on drop.
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
    retired: bool,
}

impl Artifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now and report whether that worked.
    pub fn retire(mut self) -> Result<(), ExecError> {
        self.retired = true;
        remove(&self.path).map_err(|e| ExecError::Artifact(format!("remove {}: {}", self.path.display(), e)))
    }
}

impl Drop for Artifact {
    fn drop(&mut self) {
        if self.retired {
            return;
        }
        if let Err(e) = remove(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove artifact");
        }
    }
}

fn remove(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Artifact retired");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
