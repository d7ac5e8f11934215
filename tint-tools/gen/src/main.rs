//! Tint Generator Binary
//!
//! Run with: `tint-gen [OPTIONS] <COMMAND>`

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use tint_gen::config::CONFIG_FILE;
use tint_gen::{report, Config, Generator, TargetKind};

#[derive(Parser)]
#[command(name = "tint-gen")]
#[command(about = "Generate resolved color data from Tint themes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (defaults to ./tint.toml when present)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Accept themes whose `ansi` block is missing or incomplete
    #[arg(long, global = true)]
    allow_incomplete_ansi: bool,

    /// Disable colored diagnostics
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze themes and report diagnostics
    Check {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
    /// Render a theme to a target format
    Build {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (overrides `default_target`)
        #[arg(short, long, value_enum)]
        target: Option<TargetKind>,

        /// Output file (overrides `out_dir`)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;
    let colored = !cli.no_color && io::stderr().is_terminal();

    match &cli.command {
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
        Commands::Check { files } => {
            let generator = Generator::new(config);
            let mut failed = 0;
            for path in files {
                match check_file(path, &generator, colored) {
                    Ok(true) => {}
                    Ok(false) => failed += 1,
                    Err(e) => {
                        error!("Error processing {}: {:#}", path.display(), e);
                        failed += 1;
                    }
                }
            }

            info!("Checked {} files, {} failed", files.len(), failed);
            if failed > 0 {
                std::process::exit(1);
            }
        }
        Commands::Build { file, target, out } => {
            let generator = Generator::new(config);
            if let Err(e) = build_file(file, *target, out.as_deref(), &generator, colored) {
                error!("{:#}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::load(config_path)
            .with_context(|| format!("Failed to load config file: {}", config_path.display()))?
    } else {
        Config::discover(Path::new("."))
            .with_context(|| format!("Failed to load {}", CONFIG_FILE))?
    };

    // Override with CLI options
    if cli.allow_incomplete_ansi {
        config.strict_ansi = false;
    }

    Ok(config)
}

/// Analyzes one file and prints its diagnostics. Returns whether the theme
/// would build.
fn check_file(path: &Path, generator: &Generator, colored: bool) -> Result<bool> {
    debug!("Checking: {}", path.display());

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let name = path.display().to_string();

    let result = generator.analyze(&source);
    eprint!("{}", report::render(&name, &source, &result.diagnostics, colored));

    match generator.validate(result) {
        Ok(_) => {
            info!("{}: ok", name);
            Ok(true)
        }
        Err(e) => {
            error!("{}: {}", name, e);
            Ok(false)
        }
    }
}

fn build_file(
    path: &Path,
    target: Option<TargetKind>,
    out: Option<&Path>,
    generator: &Generator,
    colored: bool,
) -> Result<()> {
    let target = target.unwrap_or(generator.config().default_target).target();
    debug!("Building {} as {}", path.display(), target.name());

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let name = path.display().to_string();

    let result = generator.analyze(&source);
    eprint!("{}", report::render(&name, &source, &result.diagnostics, colored));

    let theme = generator
        .validate(result)
        .with_context(|| format!("Cannot build {}", name))?;
    let output = target.render(&theme)?;

    let destination = out
        .map(Path::to_path_buf)
        .or_else(|| generator.output_path(path, target.as_ref()));
    match destination {
        Some(destination) => {
            if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            fs::write(&destination, output)
                .with_context(|| format!("Failed to write file: {}", destination.display()))?;
            info!("Wrote {}", destination.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}
