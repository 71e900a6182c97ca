//! Integration tests for benchbox
//!
//! These tests require a working docker daemon and network access to pull
//! base images. Run with: cargo test -p benchbox --features integration-tests
//!
//! Slow tests are marked `#[ignore]`. To include them:
//!    cargo test -p benchbox --features integration-tests -- --include-ignored

#![cfg(feature = "integration-tests")]

use benchbox::{Config, DockerCli, Executor};

mod build_failure;
mod execution;
mod timeout;

/// Descriptors that compile at build time and run the bare program, so build
/// failures carry compiler diagnostics and run output is just the program's.
const TEST_CONFIG: &str = r#"
deadline_secs = 120

[languages.java]
name = "Java 22 (Amazon Corretto)"
source_name = "Main.java"
base_image = "amazoncorretto:22-alpine-jdk"
setup = ["javac Main.java"]
run = ["java Main"]

[languages.go]
name = "Go (latest)"
source_name = "main.go"
base_image = "golang:alpine"
setup = ["go mod init workload", "go build -o main main.go"]
run = ["/app/main"]
"#;

pub(crate) fn test_config(workspace_root: &std::path::Path) -> Config {
    let mut config = Config::parse_toml(TEST_CONFIG).expect("test config should parse");
    config.workspace_root = Some(workspace_root.to_path_buf());
    config
}

pub(crate) fn test_executor(workspace_root: &std::path::Path) -> Executor<DockerCli> {
    Executor::with_docker(test_config(workspace_root))
}
