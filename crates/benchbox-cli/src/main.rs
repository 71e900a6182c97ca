//! Benchbox CLI
//!
//! A command-line tool for building and benchmarking code in disposable
//! docker containers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use benchbox::{Config, EXAMPLE_CONFIG, Executor};
use clap::{Parser, Subcommand};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "benchbox")]
#[command(about = "Build and benchmark code in disposable containers")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration file
    Init {
        /// Output path (default: benchbox.toml)
        #[arg(short, long, default_value = "benchbox.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Build and run a source file
    Run {
        /// Source file to execute
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Language ID (e.g., java, go)
        #[arg(short, long)]
        language: String,

        /// Deadline for build + run combined, in seconds
        #[arg(short, long)]
        deadline: Option<u64>,

        /// Maximum output size in bytes
        #[arg(short, long)]
        max_output: Option<usize>,

        /// Pull base images before executing
        #[arg(long)]
        prefetch: bool,
    },

    /// Pull all configured base images
    Prefetch,

    /// List available languages
    Languages,

    /// Show the effective configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration
    let config = if let Some(ref path) = cli.config {
        info!(?path, "loading configuration");
        Config::from_file(path).context("failed to load configuration")?
    } else {
        debug!("using default configuration");
        Config::default()
    };

    match cli.command {
        Commands::Init { output, force } => init_config(&output, force).await,
        Commands::Run {
            source,
            language,
            deadline,
            max_output,
            prefetch,
        } => run_execute(config, &source, &language, deadline, max_output, prefetch).await,
        Commands::Prefetch => run_prefetch(config).await,
        Commands::Languages => {
            list_languages(&config);
            Ok(())
        }
        Commands::ShowConfig => {
            show_config(&config);
            Ok(())
        }
    }
}

async fn run_execute(
    mut config: Config,
    source: &PathBuf,
    language_id: &str,
    deadline: Option<u64>,
    max_output: Option<usize>,
    prefetch: bool,
) -> Result<()> {
    // CLI flags override the config file for this invocation
    if let Some(secs) = deadline {
        config.deadline_secs = secs;
    }
    if let Some(bytes) = max_output {
        config.max_output_bytes = bytes;
    }
    config.validate().context("invalid configuration")?;

    let source_content = tokio::fs::read(source)
        .await
        .context("failed to read source file")?;

    let executor = Executor::with_docker(config);

    if prefetch {
        info!("pre-fetching base images");
        executor
            .prefetch_base_images()
            .await
            .context("failed to pre-fetch base images")?;
    }

    info!(language = language_id, "executing");

    match executor.execute(&source_content, language_id).await {
        Ok(result) => {
            print!("{}", result.text());
            if result.truncated {
                warn!(
                    max_bytes = executor.config().max_output_bytes,
                    "output was truncated"
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

async fn run_prefetch(config: Config) -> Result<()> {
    let images = config.base_images();
    if images.is_empty() {
        println!("No languages configured, nothing to pull");
        return Ok(());
    }

    let executor = Executor::with_docker(config);
    executor
        .prefetch_base_images()
        .await
        .context("failed to pre-fetch base images")?;

    println!("Pulled {} base image(s)", images.len());
    Ok(())
}

fn list_languages(config: &Config) {
    println!("Available languages:\n");

    let mut languages: Vec<_> = config.languages.iter().collect();
    languages.sort_by_key(|(id, _)| *id);

    for (id, lang) in languages {
        println!("  {:<10} {} (image: {})", id, lang.name, lang.base_image);
    }
}

fn show_config(config: &Config) {
    println!("Deadline (build + run): {}s", config.deadline_secs);
    println!("Max output: {} bytes", config.max_output_bytes);
    println!("Docker binary: {}", config.docker_binary().display());
    println!("Workspace root: {}", config.workspace_dir().display());
    println!();
    println!("Languages configured: {}", config.languages.len());
}

async fn init_config(output: &PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at '{}'. Use --force to overwrite.",
            output.display()
        );
    }

    tokio::fs::write(output, EXAMPLE_CONFIG)
        .await
        .context("failed to write configuration file")?;

    println!("Created configuration file at '{}'", output.display());
    Ok(())
}
