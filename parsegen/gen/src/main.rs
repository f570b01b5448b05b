//! Parsegen Code Generator
//!
//! Generates typed conversion methods from annotated response parsers.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use parsegen_define::ParserManifest;
use parsegen_gen::config::{DuplicateAliasPolicy, GeneratorConfig};
use parsegen_gen::errors::GeneratorError;
use parsegen_gen::output::{OutputFormat, generate_and_write};
use parsegen_gen::pipeline::generate;
use parsegen_gen::registry::Diagnostic;
use parsegen_gen::scan::scan_sources;
use tracing::{debug, info};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Parsegen code generator - turns annotated parsers into toObservable methods
#[derive(Parser, Debug)]
#[command(name = "parsegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Generator configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parser manifest (TOML, JSON or YAML); may be repeated
    #[arg(short, long)]
    manifest: Vec<PathBuf>,

    /// Java source file or directory to scan; may be repeated
    #[arg(short, long)]
    source: Vec<PathBuf>,

    /// Output directory for generated files
    #[arg(short, long, default_value = "build/generated/parsegen")]
    output: PathBuf,

    /// Which backends to run
    #[arg(short, long, value_enum, default_value_t = OutputFormat::All)]
    format: OutputFormat,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Skip stream-returning methods (no reactive runtime available)
    #[arg(long)]
    no_reactive: bool,

    /// Let a later parser replace an earlier one with the same alias
    #[arg(long)]
    last_write_wins: bool,

    /// Package of the generated class
    #[arg(long)]
    package: Option<String>,

    /// Name of the generated class
    #[arg(long)]
    class_name: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Installs the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise:
/// - 0: WARN
/// - 1 (-v): INFO (written files)
/// - 2 (-vv): DEBUG (registered parsers, skipped constructors)
/// - 3+ (-vvv): TRACE
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,parsegen=info,parsegen_gen=info".to_string(),
            2 => "info,parsegen=debug,parsegen_gen=debug".to_string(),
            _ => "debug,parsegen=trace,parsegen_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn load_config(cli: &Cli) -> Result<GeneratorConfig, GeneratorError> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };

    if cli.no_reactive {
        config.reactive_streams = false;
    }
    if cli.last_write_wins {
        config.duplicate_aliases = DuplicateAliasPolicy::LastWriteWins;
    }
    if let Some(package) = &cli.package {
        config.output.package = package.clone();
    }
    if let Some(class_name) = &cli.class_name {
        config.output.class_name = class_name.clone();
    }

    config.validate()?;
    Ok(config)
}

fn print_diagnostic(diagnostic: &Diagnostic) {
    eprintln!("{} {}", "error:".red().bold(), diagnostic.rejection);
    if let Some(location) = &diagnostic.location {
        eprintln!("  {} {}", "-->".blue().bold(), location);
    }
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    if cli.manifest.is_empty() && cli.source.is_empty() {
        return Err(GeneratorError::ConfigError(
            "No input given. Pass --manifest and/or --source".to_string(),
        ));
    }

    let mut classes = Vec::new();
    for path in &cli.manifest {
        let manifest = ParserManifest::load(path)?;
        debug!(path = %path.display(), classes = manifest.classes.len(), "Loaded manifest");
        classes.extend(manifest.classes);
    }
    if !cli.source.is_empty() {
        classes.extend(scan_sources(&cli.source, &config)?);
    }
    info!(classes = classes.len(), "Collected class declarations");

    let generation = generate(classes, &config)?;
    if !generation.is_clean() {
        for diagnostic in &generation.diagnostics {
            print_diagnostic(diagnostic);
        }
        return Err(GeneratorError::Rejected {
            count: generation.diagnostics.len(),
        });
    }

    let files = generate_and_write(
        &generation.unit,
        &config,
        &cli.output,
        cli.format,
        cli.dry_run,
    )?;

    if !cli.dry_run {
        let methods = generation.unit.methods().count();
        eprintln!(
            "{} {} methods for {} parsers",
            "Generated".green().bold(),
            methods,
            generation.unit.parsers.len()
        );
        for file in &files {
            eprintln!("  {}", cli.output.join(&file.path).display());
        }
    }

    Ok(())
}
