use serde::{Deserialize, Deserializer, Serialize, de};

use crate::config::ConfigError;

/// File name the generated build instructions are written under.
pub const DOCKERFILE_NAME: &str = "Dockerfile";

/// Build descriptor for a programming language
///
/// Describes how to turn an uploaded source file into a runnable container
/// image: which base image to start from, how the image is prepared, and the
/// command chain the container executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    /// Human-readable name for the language (e.g., "Java 22 (Amazon Corretto)")
    pub name: String,

    /// File name the source is written under inside the workspace
    pub source_name: SourceFileName,

    /// Base container image reference (e.g., "golang:alpine")
    pub base_image: String,

    /// RUN lines executed before the source is copied into the image
    /// (image-level setup such as package installs)
    #[serde(default)]
    pub prepare: Vec<String>,

    /// RUN lines executed after the source is copied into the image
    /// (source-level setup such as module init or compilation)
    #[serde(default)]
    pub setup: Vec<String>,

    /// Shell commands chained with `&&` into the container CMD
    pub run: Vec<String>,
}

impl Language {
    /// Render the Dockerfile for this descriptor.
    ///
    /// `prepare` lines come before `COPY` so image-level layers are cached
    /// across executions; `setup` lines come after, since they need the source
    /// tree. The `run` chain becomes a single CMD.
    pub fn dockerfile(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("FROM {}\n", self.base_image));
        for line in &self.prepare {
            out.push_str(&format!("RUN {line}\n"));
        }
        out.push_str("COPY . /app\n");
        out.push_str("WORKDIR /app\n");
        for line in &self.setup {
            out.push_str(&format!("RUN {line}\n"));
        }
        out.push_str("CMD ");
        out.push_str(&self.run.join(" \\\n\t&& "));
        out.push('\n');
        out
    }
}

/// A bare file name (e.g., "Main.java") for the source inside the workspace
#[derive(Debug, Clone, Serialize)]
pub struct SourceFileName(String);

impl SourceFileName {
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return Err(ConfigError::InvalidSourceName(name.to_owned()));
        }
        Ok(Self(name.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for SourceFileName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SourceFileName::new(&s).map_err(|_| {
            de::Error::invalid_value(
                de::Unexpected::Str(&s),
                &"a non-empty file name without '/' or '..'",
            )
        })
    }
}

impl std::fmt::Display for SourceFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn source_file_name_rejects_all_strings_with_slash(s in ".*/.*") {
            prop_assert!(SourceFileName::new(&s).is_err());
        }

        #[test]
        fn source_file_name_accepts_simple_names(s in "[a-zA-Z0-9_-]+\\.[a-z]{1,4}") {
            prop_assert!(SourceFileName::new(&s).is_ok());
        }

        #[test]
        fn dockerfile_always_starts_with_base_image(image in "[a-z]+(:[a-z0-9.-]+)?") {
            let lang = Language {
                name: "L".to_owned(),
                source_name: SourceFileName::new("main.x").unwrap(),
                base_image: image.clone(),
                prepare: vec![],
                setup: vec![],
                run: vec!["true".to_owned()],
            };
            let expected_prefix = format!("FROM {image}\n");
            prop_assert!(lang.dockerfile().starts_with(&expected_prefix));
        }
    }
}
