//! The execute pipeline
//!
//! Catalog lookup, workspace creation, image build, container run, output
//! bounding, artifact reclaim, workspace destruction - in that order, with
//! the cleanup steps running on every path out of the pipeline.

use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::config::{Config, Language};
use crate::engine::{ContainerEngine, EngineExit};
use crate::output::bound_output;
use crate::runner::{ExecuteError, ExecutionResult};
use crate::workspace::Workspace;

#[instrument(skip(engine, config, source), fields(len = source.len()))]
pub(crate) async fn execute<E: ContainerEngine>(
    engine: &E,
    config: &Config,
    source: &[u8],
    language_id: &str,
) -> Result<ExecutionResult, ExecuteError> {
    // Reject unknown languages before touching the filesystem or the engine
    let language = config
        .get_language(language_id)
        .map_err(|_| ExecuteError::UnsupportedLanguage(language_id.to_string()))?;

    // One countdown for build + run together, fixed up front
    let deadline = Instant::now() + config.deadline();

    let workspace = Workspace::create(&config.workspace_dir(), language_id).await?;

    let result = run_pipeline(engine, config, language, &workspace, source, deadline).await;

    // The workspace is removed on every path out of the pipeline. A failure
    // here is logged and never displaces the result computed above.
    if let Err(e) = workspace.destroy().await {
        warn!(error = %e, "failed to destroy workspace");
    }

    result
}

async fn run_pipeline<E: ContainerEngine>(
    engine: &E,
    config: &Config,
    language: &Language,
    workspace: &Workspace,
    source: &[u8],
    deadline: Instant,
) -> Result<ExecutionResult, ExecuteError> {
    workspace.populate(language, source).await?;

    let tag = workspace.id();

    let build = engine.build_image(workspace.path(), tag, deadline).await?;
    match build.exit {
        EngineExit::Exited(0) => {
            debug!(tag, "image built");
        }
        EngineExit::Exited(code) => {
            debug!(tag, code, "image build failed");
            let (log, _) = bound_output(build.output, config.max_output_bytes);
            return Err(ExecuteError::Build { log });
        }
        EngineExit::TimedOut => {
            let (output, _) = bound_output(build.output, config.max_output_bytes);
            return Err(ExecuteError::Timeout {
                limit_secs: config.deadline_secs,
                output,
            });
        }
    }

    // The image exists from here on: remove it exactly once, whatever the
    // run does. Removal failure is logged and never displaces the run result.
    let run = engine.run_image(tag, deadline).await;
    if let Err(e) = engine.remove_image(tag).await {
        warn!(tag, error = %e, "failed to remove image");
    }
    let run = run?;

    let (output, truncated) = bound_output(run.output, config.max_output_bytes);
    match run.exit {
        EngineExit::Exited(0) => Ok(ExecutionResult { output, truncated }),
        EngineExit::Exited(code) => Err(ExecuteError::Run {
            exit_code: code,
            output,
        }),
        EngineExit::TimedOut => Err(ExecuteError::Timeout {
            limit_secs: config.deadline_secs,
            output,
        }),
    }
}
