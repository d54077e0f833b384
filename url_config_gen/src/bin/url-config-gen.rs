//! Generates a configuration type from a service spec.
//!
//! ```bash
//! url-config-gen --spec services/zulip.yml --type-name ZulipConfig --out src/zulip_config.rs
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url_config::spec::ServiceSpec;
use url_config_gen::{GenOptions, generate_source};

#[derive(Parser, Debug)]
#[command(
    name = "url-config-gen",
    version,
    about = "Generates a URL-backed config type from a service spec"
)]
struct Cli {
    /// Path to the spec document
    #[arg(long, value_name = "PATH")]
    spec: PathBuf,

    /// Where to write the generated source; stdout when omitted
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Name of the generated struct
    #[arg(long, default_value = "Config")]
    type_name: String,

    /// Log planning details
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let source = fs::read_to_string(&cli.spec)
        .with_context(|| format!("Failed to read spec {}", cli.spec.display()))?;
    let spec = ServiceSpec::from_yaml(&source)
        .with_context(|| format!("Invalid spec {}", cli.spec.display()))?;
    let opts = GenOptions::new(&cli.type_name)?;
    let generated = generate_source(&spec, &opts)
        .with_context(|| format!("Failed to generate {}", cli.type_name))?;

    match &cli.out {
        Some(path) => {
            fs::write(path, generated)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote generated config");
        }
        None => print!("{generated}"),
    }
    Ok(())
}
