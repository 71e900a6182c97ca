//! Execution orchestration
//!
//! Composes the language catalog, workspace lifecycle, container engine, and
//! output bounding into a single `execute` operation with one deadline
//! spanning the build and run phases and guaranteed cleanup on every path.

use std::borrow::Cow;

use thiserror::Error;
use tracing::debug;

mod execute;

use crate::config::Config;
use crate::engine::{ContainerEngine, DockerCli, EngineError};
use crate::workspace::WorkspaceError;

/// Result of a successful execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Combined program output, bounded to the configured maximum
    pub output: Vec<u8>,

    /// Whether the output was cut to the maximum size
    pub truncated: bool,
}

impl ExecutionResult {
    /// Output as text, with invalid UTF-8 replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }
}

/// Errors that occur during execution
///
/// Build, run, and timeout failures embed the captured output or log in
/// their message, so the caller can diagnose the failure without a separate
/// log fetch.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The language ID is not in the catalog. Raised before any filesystem
    /// or engine resource is allocated.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    /// The image build exited non-zero; carries the build log
    #[error("image build failed: {}", String::from_utf8_lossy(.log))]
    Build { log: Vec<u8> },

    /// The program exited non-zero; carries the captured output
    #[error("program exited with code {exit_code}: {}", String::from_utf8_lossy(.output))]
    Run { exit_code: i32, output: Vec<u8> },

    /// The shared build+run deadline fired; carries whatever output was
    /// captured before the cutoff
    #[error("execution timed out after {limit_secs}s: {}", String::from_utf8_lossy(.output))]
    Timeout { limit_secs: u64, output: Vec<u8> },

    #[error("container engine error: {0}")]
    Engine(#[from] EngineError),
}

impl ExecuteError {
    /// Captured output or log embedded in this error, if any
    pub fn captured_output(&self) -> Option<&[u8]> {
        match self {
            ExecuteError::Build { log } => Some(log),
            ExecuteError::Run { output, .. } => Some(output),
            ExecuteError::Timeout { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Orchestrator for build-and-run executions
///
/// Each [`execute`](Self::execute) call is independent; concurrent calls
/// share nothing but the filesystem and image namespaces, which are
/// partitioned by per-execution workspace ids.
#[derive(Debug)]
pub struct Executor<E: ContainerEngine> {
    config: Config,
    engine: E,
}

impl Executor<DockerCli> {
    /// Create an executor backed by the docker CLI from the config
    pub fn with_docker(config: Config) -> Self {
        let engine = DockerCli::new(config.docker_binary());
        Self { config, engine }
    }
}

impl<E: ContainerEngine> Executor<E> {
    /// Create a new executor with the given configuration and engine
    pub fn new(config: Config, engine: E) -> Self {
        Self { config, engine }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build and run `source` for the given language
    ///
    /// Allocates a unique workspace, builds an image from it, runs the image
    /// under the shared deadline, bounds the output, removes the image
    /// (best-effort), and destroys the workspace on every path.
    pub async fn execute(
        &self,
        source: &[u8],
        language_id: &str,
    ) -> Result<ExecutionResult, ExecuteError> {
        execute::execute(&self.engine, &self.config, source, language_id).await
    }

    /// Pull every configured base image
    ///
    /// Meant to run once at process startup, before the first `execute`; a
    /// pull failure is returned to the entry point rather than surfacing
    /// later as a per-request build error.
    pub async fn prefetch_base_images(&self) -> Result<(), EngineError> {
        for image in self.config.base_images() {
            debug!(%image, "pre-fetching base image");
            self.engine.pull_image(&image).await?;
        }
        Ok(())
    }
}
