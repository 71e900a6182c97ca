//! Docker CLI engine
//!
//! Implements [`ContainerEngine`] by shelling out to the `docker` binary via
//! `tokio::process`, capturing combined output and enforcing deadlines with
//! forced termination.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::Instant;
use tracing::debug;

use crate::engine::{ContainerEngine, EngineError, EngineExit, EngineOutput};

/// Container engine backed by the `docker` command-line binary
#[derive(Debug, Clone)]
pub struct DockerCli {
    docker_path: PathBuf,
}

impl DockerCli {
    /// Create a new docker CLI engine
    pub fn new(docker_path: impl Into<PathBuf>) -> Self {
        Self {
            docker_path: docker_path.into(),
        }
    }

    /// Get the path to the docker binary
    pub fn docker_path(&self) -> &Path {
        &self.docker_path
    }

    fn spawn_error(&self, source: std::io::Error) -> EngineError {
        EngineError::Spawn {
            program: self.docker_path.clone(),
            source,
        }
    }

    /// Run `cmd` to completion or until `deadline`, capturing combined output.
    ///
    /// Stdout and stderr are drained concurrently while waiting, so a chatty
    /// subprocess cannot deadlock on a full pipe. On timeout, `kill_container`
    /// (if given) is stopped via `docker kill` first - killing only the CLI
    /// client would leave the container running behind it - then the client
    /// process is killed and reaped before this function returns.
    async fn capture(
        &self,
        mut cmd: Command,
        deadline: Instant,
        kill_container: Option<&str>,
    ) -> Result<EngineOutput, EngineError> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;
        let mut stdout = child.stdout.take().ok_or(EngineError::StreamUnavailable)?;
        let mut stderr = child.stderr.take().ok_or(EngineError::StreamUnavailable)?;

        let reader = tokio::spawn(async move {
            let mut out = Vec::new();
            let mut err = Vec::new();
            let _ = tokio::join!(stdout.read_to_end(&mut out), stderr.read_to_end(&mut err));
            if !err.is_empty() && !out.is_empty() && !out.ends_with(b"\n") {
                out.push(b'\n');
            }
            out.extend_from_slice(&err);
            out
        });

        match tokio::time::timeout_at(deadline, child.wait()).await {
            Ok(status) => {
                let status = status?;
                let output = reader.await.unwrap_or_default();
                Ok(EngineOutput {
                    output,
                    exit: EngineExit::Exited(status.code().unwrap_or(-1)),
                })
            }
            Err(_) => {
                debug!("deadline exceeded, terminating subprocess");
                if let Some(name) = kill_container {
                    let _ = Command::new(&self.docker_path)
                        .args(["kill", name])
                        .stdin(Stdio::null())
                        .output()
                        .await;
                }
                // kill() sends SIGKILL and reaps the child before returning
                let _ = child.kill().await;
                let output = reader.await.unwrap_or_default();
                Ok(EngineOutput {
                    output,
                    exit: EngineExit::TimedOut,
                })
            }
        }
    }
}

#[async_trait]
impl ContainerEngine for DockerCli {
    async fn build_image(
        &self,
        context: &Path,
        tag: &str,
        deadline: Instant,
    ) -> Result<EngineOutput, EngineError> {
        let mut cmd = Command::new(&self.docker_path);
        cmd.args(["build", "-t", tag, "."]).current_dir(context);
        debug!(tag, context = %context.display(), "building image");
        self.capture(cmd, deadline, None).await
    }

    async fn run_image(&self, tag: &str, deadline: Instant) -> Result<EngineOutput, EngineError> {
        // The container is named after the tag so a timeout can `docker kill`
        // it; --rm removes the container itself once it stops.
        let mut cmd = Command::new(&self.docker_path);
        cmd.args(["run", "--rm", "--name", tag, tag]);
        debug!(tag, "running container");
        self.capture(cmd, deadline, Some(tag)).await
    }

    async fn remove_image(&self, tag: &str) -> Result<(), EngineError> {
        let output = Command::new(&self.docker_path)
            .args(["rmi", "--force", tag])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::CommandFailed(stderr.trim().to_string()));
        }
        debug!(tag, "image removed");
        Ok(())
    }

    async fn pull_image(&self, image: &str) -> Result<(), EngineError> {
        debug!(image, "pulling base image");
        let output = Command::new(&self.docker_path)
            .args(["pull", image])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
            if !log.is_empty() {
                log.push('\n');
            }
            log.push_str(String::from_utf8_lossy(&output.stderr).trim());
            return Err(EngineError::Pull {
                image: image.to_string(),
                log: log.trim().to_string(),
            });
        }
        Ok(())
    }
}
