//! Container engine abstraction
//!
//! Narrow capability interface over the isolation backend: build an image
//! from a workspace, run it, remove it, pre-fetch a base image. The
//! orchestration logic in [`crate::runner`] depends only on this trait, not
//! on which engine executes it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::Instant;

pub use crate::engine::docker::DockerCli;

mod docker;

/// Errors that occur at the engine boundary
///
/// These cover spawning and talking to the engine binary itself. A program
/// inside a container failing or timing out is not an engine error; that
/// outcome is reported through [`EngineExit`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("engine command did not expose captured output streams")]
    StreamUnavailable,

    #[error("failed to pull base image '{image}': {log}")]
    Pull { image: String, log: String },

    #[error("engine command failed: {0}")]
    CommandFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a build or run phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineExit {
    /// The subprocess exited on its own with this code
    Exited(i32),

    /// The deadline fired; the subprocess was killed and reaped
    TimedOut,
}

/// Captured result of a build or run phase
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Combined standard output and error streams.
    /// On timeout, whatever was captured before the cutoff.
    pub output: Vec<u8>,

    /// How the phase ended
    pub exit: EngineExit,
}

impl EngineOutput {
    /// Check if the phase completed with exit code zero
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self.exit, EngineExit::Exited(0))
    }
}

/// Capability interface over the container backend
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Build an image tagged `tag` from the build context at `context`,
    /// bounded by `deadline`. On timeout the build process must not outlive
    /// the call.
    async fn build_image(
        &self,
        context: &Path,
        tag: &str,
        deadline: Instant,
    ) -> Result<EngineOutput, EngineError>;

    /// Run the image `tag` as a container, bounded by the remaining time
    /// until `deadline`, capturing combined output. On timeout both the
    /// container and the client process must be terminated and reaped
    /// before returning.
    async fn run_image(&self, tag: &str, deadline: Instant) -> Result<EngineOutput, EngineError>;

    /// Remove the image `tag`
    async fn remove_image(&self, tag: &str) -> Result<(), EngineError>;

    /// Pull `image` from the registry
    async fn pull_image(&self, image: &str) -> Result<(), EngineError>;
}
