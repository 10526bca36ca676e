//! dalgen: data-access layer generator
//!
//! Reads annotated SQL files and emits Go methods, mocks or interfaces.
//!
//! # Usage
//!
//! ```bash
//! # Generate implementations
//! dalgen --pkg store --dir db/queries -o store/queries.go \
//!     --read-type '(r *Reader)' --write-type '(w *Writer)'
//!
//! # Interfaces, printed instead of written
//! dalgen --pkg store --dir db/queries --mode interface \
//!     --read-type Reader --write-type Writer --dry-run
//!
//! # Same run, explicit subcommand
//! dalgen generate --pkg store --dir db/queries -o store/queries.go \\
//!     --read-type '(r *Reader)' --write-type '(w *Writer)'
//!
//! # Only validate the directives
//! dalgen check --dir db/queries
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dalgen::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dalgen")]
#[command(version)]
#[command(about = "Generate data-access code, mocks and interfaces from annotated SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    dalgen --pkg store --dir db/queries -o store/queries.go --read-type '(r *Reader)' --write-type '(w *Writer)'
    dalgen --pkg store --dir db/queries --mode interface --read-type Reader --write-type Writer --dry-run
    dalgen check --dir db/queries --json")]
struct Cli {
    /// Config file (default: ./dalgen.toml, then the user config dir)
    #[arg(long, global = true, env = "DALGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Go package of the generated unit
    #[arg(long, global = true)]
    pkg: Option<String>,

    /// Directory containing the annotated query files
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Output file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// What to generate
    #[arg(short, long, value_enum, global = true)]
    mode: Option<Mode>,

    /// Receiver (code/mock) or interface name (interface) for read methods
    #[arg(long, global = true)]
    read_type: Option<String>,

    /// Receiver (code/mock) or interface name (interface) for write methods
    #[arg(long, global = true)]
    write_type: Option<String>,

    /// Formatter command; pass an empty string to skip formatting
    #[arg(long, global = true)]
    formatter: Option<String>,

    /// Print to stdout instead of writing the output file; `--dry-run=false`
    /// overrides the config file
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    dry_run: Option<bool>,

    /// Read inserted ids from a RETURNING clause (true) or last-insert-id (false)
    #[arg(long, global = true, value_name = "BOOL")]
    returning_insert: Option<bool>,

    /// Extension of query files
    #[arg(long, global = true)]
    extension: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the unit (the default when no subcommand is given)
    Generate,
    /// Scan and parse directives without generating anything
    Check {
        /// Print the parsed invocations as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the command vocabulary
    Commands,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Check { json }) => check(&cli, *json),
        Some(Commands::Commands) => show_commands(&cli),
        Some(Commands::Generate) | None => generate_cmd(&cli),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "dalgen=debug" } else { "dalgen=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn settings(cli: &Cli) -> Result<Settings> {
    let file = FileConfig::load(cli.config.as_deref())?;
    let overrides = Overrides {
        package: cli.pkg.clone(),
        dir: cli.dir.clone(),
        output: cli.output.clone(),
        mode: cli.mode,
        read_type: cli.read_type.clone(),
        write_type: cli.write_type.clone(),
        formatter: cli.formatter.clone(),
        dry_run: cli.dry_run,
        returning_insert: cli.returning_insert,
        extension: cli.extension.clone(),
    };
    Ok(Settings::resolve(file, overrides))
}

fn generate_cmd(cli: &Cli) -> Result<()> {
    let settings = settings(cli)?;
    let report = run(&settings)?;

    if let Some(path) = &report.output {
        eprintln!(
            "{} Wrote {} ({} invocation(s), {} mode)",
            "✓".green(),
            path.display().to_string().cyan(),
            report.invocations,
            report.mode
        );
    }
    Ok(())
}

fn check(cli: &Cli, json: bool) -> Result<()> {
    let settings = settings(cli)?;
    let registry = Registry::initialize(&settings.registry)?;
    let invocations = collect_invocations(&registry, settings.source_dir()?, &settings.scan)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&invocations)?);
        return Ok(());
    }

    for invocation in &invocations {
        let capability = match invocation.capability() {
            Capability::ReadCapable => "read ".green(),
            Capability::WriteOnly => "write".yellow(),
        };
        println!(
            "  {} {} {}",
            capability,
            invocation.signature().white(),
            invocation.key.dimmed()
        );
    }
    println!();
    println!(
        "{} {} directive(s) OK",
        "✓".green(),
        invocations.len().to_string().cyan()
    );
    Ok(())
}

fn show_commands(cli: &Cli) -> Result<()> {
    let settings = settings(cli)?;
    let registry = Registry::initialize(&settings.registry)?;

    println!("{}", "dalgen command reference".cyan().bold());
    println!();
    println!(
        "{:12} {:10} {:12} {}",
        "Command".white().bold(),
        "Access".white().bold(),
        "Injected".white().bold(),
        "Returns".white().bold()
    );
    println!("{}", "─".repeat(56).dimmed());

    for command in registry.commands() {
        println!(
            "{:12} {:10} {:12} {}",
            command.name().cyan().bold(),
            command.capability().to_string().yellow(),
            command.injected().unwrap_or("-"),
            command.returns().dimmed()
        );
        if let Some(defect) = command.code().defect() {
            println!("  {} {}", "template defect:".red(), defect);
        }
    }
    Ok(())
}
