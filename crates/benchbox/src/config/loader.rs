//! Configuration file loading for Benchbox
//!
//! Handles loading and parsing configuration files using the config crate.

use std::path::Path;

use config::{Config as ConfigBuilder, File, FileFormat};

use crate::config::{Config, ConfigError};

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = ConfigBuilder::builder()
            .add_source(File::from(path))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Runs automatically on every load; callers that mutate a loaded config
    /// (e.g., applying command-line overrides) should re-run it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deadline_secs == 0 {
            return Err(ConfigError::Invalid("deadline_secs must be > 0".into()));
        }
        if self.max_output_bytes == 0 {
            return Err(ConfigError::Invalid("max_output_bytes must be > 0".into()));
        }

        for (id, lang) in &self.languages {
            // Language IDs become part of image tags, so docker's tag grammar applies
            if id.is_empty()
                || !id
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
            {
                return Err(ConfigError::Invalid(format!(
                    "language id '{id}' must be lowercase alphanumeric with '-' or '_'"
                )));
            }
            if lang.name.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "language '{id}' has empty name"
                )));
            }
            if lang.base_image.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "language '{id}' has empty base_image"
                )));
            }
            if lang.run.is_empty() || lang.run.iter().any(String::is_empty) {
                return Err(ConfigError::Invalid(format!(
                    "language '{id}' has an empty run command"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[languages.test]
name = "Test Language"
source_name = "main.test"
base_image = "alpine"
run = ["./test"]
"#;
        let config = Config::parse_toml(toml).unwrap();
        assert!(config.languages.contains_key("test"));
        assert_eq!(config.languages["test"].name, "Test Language");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
docker_path = "/usr/local/bin/docker"
workspace_root = "/var/tmp/bench"
deadline_secs = 45
max_output_bytes = 8192

[languages.go]
name = "Go"
source_name = "main.go"
base_image = "golang:alpine"
prepare = ["apk add --no-cache hyperfine"]
setup = ["go mod init workload"]
run = ["go build -o main main.go", "/app/main"]
"#;

        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(
            config.docker_path,
            Some(std::path::PathBuf::from("/usr/local/bin/docker"))
        );
        assert_eq!(
            config.workspace_root,
            Some(std::path::PathBuf::from("/var/tmp/bench"))
        );
        assert_eq!(config.deadline_secs, 45);
        assert_eq!(config.max_output_bytes, 8192);
        assert_eq!(config.languages["go"].setup, vec!["go mod init workload"]);
    }

    #[test]
    fn test_embedded_example_config_is_valid() {
        let config = Config::parse_toml(crate::config::EXAMPLE_CONFIG).unwrap();
        assert!(config.languages.contains_key("java"));
        assert!(config.languages.contains_key("go"));
        assert_eq!(config.deadline_secs, 30);
        assert_eq!(config.max_output_bytes, 4096);
    }

    #[test]
    fn test_invalid_empty_name() {
        let toml = r#"
[languages.test]
name = ""
source_name = "main.test"
base_image = "alpine"
run = ["./test"]
"#;
        assert!(Config::parse_toml(toml).is_err());
    }

    #[test]
    fn test_invalid_empty_base_image() {
        let toml = r#"
[languages.test]
name = "Test"
source_name = "main.test"
base_image = ""
run = ["./test"]
"#;
        assert!(Config::parse_toml(toml).is_err());
    }

    #[test]
    fn test_invalid_language_id_characters() {
        // Validated directly: the config crate lowercases file keys, so an
        // uppercase id cannot reach the validator through parse_toml.
        let mut config = Config::empty();
        let lang = Config::default().languages["go"].clone();
        for bad_id in ["", "Java", "my lang", "go:1.22"] {
            config.languages.clear();
            config.languages.insert(bad_id.to_string(), lang.clone());
            assert!(config.validate().is_err(), "id {bad_id:?} should be rejected");
        }
    }

    #[test]
    fn test_validate_catches_overridden_zero_values() {
        let mut config = Config::default();
        config.deadline_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.max_output_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_zero_deadline() {
        let toml = "deadline_secs = 0";
        assert!(Config::parse_toml(toml).is_err());
    }

    #[test]
    fn test_invalid_zero_max_output() {
        let toml = "max_output_bytes = 0";
        assert!(Config::parse_toml(toml).is_err());
    }
}
