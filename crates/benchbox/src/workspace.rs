//! Ephemeral workspace directories
//!
//! Each execution gets a uniquely named directory holding the uploaded source
//! and the generated Dockerfile. The directory doubles as the docker build
//! context, and its name doubles as the image tag, so uniqueness partitions
//! both the filesystem and the image namespace between concurrent executions.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::{DOCKERFILE_NAME, Language};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace directory {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove workspace directory {path}: {source}")]
    Destroy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not allocate a unique workspace id for language '{0}'")]
    IdCollision(String),
}

/// An ephemeral, uniquely named directory for one execution
///
/// Created at the start of an execution and destroyed exactly once at the
/// end, whatever the outcome. [`destroy()`](Self::destroy) consumes the
/// handle so a workspace cannot be torn down twice; if the handle is dropped
/// without an explicit destroy (the owning future was cancelled), the
/// directory is removed best-effort from `Drop`.
#[derive(Debug)]
pub struct Workspace {
    id: String,
    path: PathBuf,
    created_at: SystemTime,
    destroyed: bool,
}

impl Workspace {
    /// Create a new workspace under `root`
    ///
    /// The id mixes the language tag, a random component, and a nanosecond
    /// timestamp so two calls within the same clock tick still diverge.
    /// `create_dir` (not `create_dir_all`) detects the unlikely collision
    /// with a concurrently live workspace, and a fresh id is tried.
    #[instrument(skip(root))]
    pub async fn create(root: &Path, language_id: &str) -> Result<Self, WorkspaceError> {
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|source| WorkspaceError::Create {
                path: root.to_path_buf(),
                source,
            })?;

        for _ in 0..3 {
            let id = unique_id(language_id);
            let path = root.join(&id);
            match tokio::fs::create_dir(&path).await {
                Ok(()) => {
                    debug!(%id, path = %path.display(), "workspace created");
                    return Ok(Self {
                        id,
                        path,
                        created_at: SystemTime::now(),
                        destroyed: false,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(WorkspaceError::Create { path, source }),
            }
        }

        Err(WorkspaceError::IdCollision(language_id.to_string()))
    }

    /// Workspace id, also used as the image tag
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path to the workspace directory (the docker build context)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the workspace was created
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Write the source file and the generated Dockerfile into the workspace
    #[instrument(skip(self, language, source), fields(id = %self.id))]
    pub async fn populate(&self, language: &Language, source: &[u8]) -> Result<(), WorkspaceError> {
        self.write(language.source_name.as_str(), source).await?;
        self.write(DOCKERFILE_NAME, language.dockerfile().as_bytes())
            .await?;
        debug!(source_name = %language.source_name, "workspace populated");
        Ok(())
    }

    /// Recursively remove the workspace directory
    ///
    /// Consumes the handle; callers must invoke this on every exit path.
    #[instrument(skip(self), fields(id = %self.id))]
    pub async fn destroy(mut self) -> Result<(), WorkspaceError> {
        self.destroyed = true;
        tokio::fs::remove_dir_all(&self.path)
            .await
            .map_err(|source| WorkspaceError::Destroy {
                path: self.path.clone(),
                source,
            })?;
        debug!("workspace destroyed");
        Ok(())
    }

    async fn write(&self, name: &str, content: &[u8]) -> Result<(), WorkspaceError> {
        let path = self.path.join(name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| WorkspaceError::Write {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), len = content.len(), "wrote file");
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.destroyed {
            // Cancellation path: the execute future was dropped mid-flight
            if std::fs::remove_dir_all(&self.path).is_ok() {
                debug!(id = %self.id, "workspace removed on drop");
            }
        }
    }
}

/// Generate a workspace id: language tag + random suffix + time component.
///
/// Also serves as the docker image tag, so it sticks to lowercase hex and
/// separators.
fn unique_id(language_id: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{language_id}-bench-{}-{nanos}", &suffix[..8])
}
