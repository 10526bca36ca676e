//! Generation engine.
//!
//! Wires the pieces together for one run:
//!
//! ```text
//! scan_dir → parse_block → render(mode) → formatter → file / stdout
//! ```

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::GenResult;
use crate::generator::{Mode, render};
use crate::invocation::Invocation;
use crate::output::{format_source, write_output};
use crate::parser::parse_block;
use crate::registry::Registry;
use crate::scanner::{ScanOptions, scan_dir};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub mode: Mode,
    pub invocations: usize,
    /// Where the unit was written; `None` for stdout.
    pub output: Option<PathBuf>,
}

/// Scan `dir` and parse every directive, in discovery order.
///
/// The first structural error aborts: partial output is never produced.
pub fn collect_invocations(
    registry: &Registry,
    dir: &Path,
    scan: &ScanOptions,
) -> GenResult<Vec<Invocation>> {
    scan_dir(dir, scan)?
        .iter()
        .map(|block| {
            let invocation = parse_block(registry, block)?;
            tracing::debug!(
                "{}: {} {}",
                invocation.key,
                invocation.command.name(),
                invocation.name
            );
            Ok(invocation)
        })
        .collect()
}

/// Build the registry, collect invocations and render the unformatted unit.
pub fn generate_source(settings: &Settings) -> GenResult<(String, usize)> {
    let registry = Registry::initialize(&settings.registry)?;
    let invocations = collect_invocations(&registry, settings.source_dir()?, &settings.scan)?;
    let source = render(settings.mode, &settings.package, &settings.roles, &invocations);
    Ok((source, invocations.len()))
}

/// Full run: validate, generate, format and write.
pub fn run(settings: &Settings) -> GenResult<Report> {
    settings.validate()?;

    let (source, count) = generate_source(settings)?;
    let text = match settings.formatter.as_deref() {
        Some(command) => format_source(source, command)?,
        None => source,
    };

    let output = if settings.dry_run {
        None
    } else {
        settings.output.clone()
    };
    write_output(&text, output.as_deref())?;

    tracing::info!(
        "{} mode: {} invocation(s) -> {}",
        settings.mode,
        count,
        output
            .as_deref()
            .map_or_else(|| "stdout".to_string(), |p| p.display().to_string())
    );

    Ok(Report {
        mode: settings.mode,
        invocations: count,
        output,
    })
}
