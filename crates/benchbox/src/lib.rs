//! A library for building and benchmarking untrusted code in disposable containers.
//!
//! Benchbox takes a source snippet in a supported language, materializes a
//! one-shot docker build context for it, builds an image, runs it under a
//! hard deadline, and returns the bounded output - tearing down every
//! resource it allocated whatever the outcome.
//!
//! # Features
//!
//! - **Disposable isolation** - every execution gets its own workspace, image
//!   tag, and container, removed when the call returns.
//! - **Per-language build descriptors** - TOML-configured base image,
//!   prepare/setup steps, and run command chain (including warmed-up
//!   benchmarking passes).
//! - **One deadline, build + run** - a single countdown spans both phases,
//!   with forced termination and partial output on expiry.
//! - **Bounded output** - captured output is cut to a configured maximum,
//!   keeping the leading bytes.
//! - **Engine seam** - orchestration is written against a narrow
//!   [`ContainerEngine`] trait; the default backend shells out to the docker
//!   CLI.

pub use config::{Config, ConfigError, EXAMPLE_CONFIG, Language, SourceFileName};
pub use engine::{ContainerEngine, DockerCli, EngineError, EngineExit, EngineOutput};
pub use output::{DEFAULT_MAX_OUTPUT_BYTES, bound_output};
pub use runner::{ExecuteError, ExecutionResult, Executor};
pub use workspace::{Workspace, WorkspaceError};

pub mod config;
pub mod engine;
pub mod output;
pub mod runner;
pub mod workspace;
