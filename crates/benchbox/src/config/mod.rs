use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub use crate::config::language::{DOCKERFILE_NAME, Language, SourceFileName};

pub mod language;
mod loader;

/// Example configuration embedded at compile time.
///
/// Library users can access this to generate a starter config file.
pub const EXAMPLE_CONFIG: &str = include_str!("../../benchbox.example.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid source file name: {0:?}")]
    InvalidSourceName(String),

    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Config for Benchbox
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the docker binary (uses PATH if not specified).
    #[serde(default)]
    pub docker_path: Option<PathBuf>,

    /// Directory that per-execution workspaces are created under.
    ///
    /// Defaults to the system temp directory. Each execution creates a
    /// uniquely named subdirectory here and removes it when done.
    #[serde(default)]
    pub workspace_root: Option<PathBuf>,

    /// Wall-clock budget for build + run combined, in seconds.
    ///
    /// A single countdown spans both phases; it is not restarted between the
    /// image build and the container run.
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,

    /// Captured output is cut to this many bytes, keeping the leading bytes.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,

    /// Build descriptors keyed by language ID
    #[serde(default)]
    pub languages: HashMap<String, Language>,
}

impl Config {
    /// Create a new config with the embedded default languages
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty config with no languages
    pub fn empty() -> Self {
        Self {
            docker_path: None,
            workspace_root: None,
            deadline_secs: default_deadline_secs(),
            max_output_bytes: default_max_output_bytes(),
            languages: HashMap::new(),
        }
    }

    /// Get a build descriptor by language ID
    pub fn get_language(&self, id: &str) -> Result<&Language, ConfigError> {
        self.languages
            .get(id)
            .ok_or_else(|| ConfigError::UnsupportedLanguage(id.to_string()))
    }

    /// Get the path to the docker binary
    pub fn docker_binary(&self) -> PathBuf {
        self.docker_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("docker"))
    }

    /// Get the directory workspaces are created under
    pub fn workspace_dir(&self) -> PathBuf {
        self.workspace_root.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Get the execution deadline as a duration
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    /// Deduplicated base images of all configured languages, for pre-fetching
    pub fn base_images(&self) -> Vec<String> {
        let mut images: Vec<String> = self
            .languages
            .values()
            .map(|lang| lang.base_image.clone())
            .collect();
        images.sort();
        images.dedup();
        images
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_toml(EXAMPLE_CONFIG).expect("embedded default config should be valid")
    }
}

fn default_deadline_secs() -> u64 {
    30
}

fn default_max_output_bytes() -> usize {
    crate::output::DEFAULT_MAX_OUTPUT_BYTES
}
