//! Run configuration.
//!
//! Settings come from three layers, lowest precedence first: built-in
//! defaults, a `dalgen.toml` file, command-line flags.
//!
//! ```toml
//! package = "store"
//! dir = "db/queries"
//! output = "store/queries.go"
//! mode = "code"
//! read_type = "(r *Reader)"
//! write_type = "(w *Writer)"
//! formatter = "goimports"
//! returning_insert = true
//!
//! [templates]
//! insert = "return dal.InsertReturning({{ var }}, \"{{ file }}\", {{ params }})"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GenError, GenResult};
use crate::generator::Mode;
use crate::invocation::RoleTypes;
use crate::registry::RegistryConfig;
use crate::scanner::ScanOptions;

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE: &str = "dalgen.toml";

pub const DEFAULT_FORMATTER: &str = "goimports";

/// Contents of a `dalgen.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub package: Option<String>,
    pub dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub mode: Option<Mode>,
    pub read_type: Option<String>,
    pub write_type: Option<String>,
    pub formatter: Option<String>,
    pub dry_run: Option<bool>,
    pub returning_insert: Option<bool>,
    pub extension: Option<String>,
    pub comment: Option<String>,
    pub marker: Option<String>,
    /// Implementation template alterations, keyed by command name.
    pub templates: BTreeMap<String, String>,
}

impl FileConfig {
    pub fn parse(content: &str) -> GenResult<Self> {
        toml::from_str(content).map_err(|e| GenError::config(e.to_string()))
    }

    pub fn from_path(path: &Path) -> GenResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GenError::config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| GenError::config(format!("{}: {}", path.display(), e)))
    }

    /// Load the config file.
    ///
    /// An explicit path must exist. Otherwise `./dalgen.toml` is tried,
    /// then `<config dir>/dalgen/dalgen.toml`; with neither present the
    /// result is empty.
    pub fn load(explicit: Option<&Path>) -> GenResult<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.is_file() {
            return Self::from_path(&local);
        }

        if let Some(user) = dirs::config_dir().map(|d| d.join("dalgen").join(CONFIG_FILE))
            && user.is_file()
        {
            return Self::from_path(&user);
        }

        Ok(Self::default())
    }
}

/// Values given on the command line. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub package: Option<String>,
    pub dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub mode: Option<Mode>,
    pub read_type: Option<String>,
    pub write_type: Option<String>,
    pub formatter: Option<String>,
    pub dry_run: Option<bool>,
    pub returning_insert: Option<bool>,
    pub extension: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub package: String,
    pub dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub mode: Mode,
    pub roles: RoleTypes,
    /// Formatter command line; `None` skips formatting.
    pub formatter: Option<String>,
    pub dry_run: bool,
    pub registry: RegistryConfig,
    pub scan: ScanOptions,
}

impl Settings {
    /// Layer `overrides` on top of `file` on top of the defaults.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        let scan_defaults = ScanOptions::default();
        let formatter = overrides
            .formatter
            .or(file.formatter)
            .unwrap_or_else(|| DEFAULT_FORMATTER.to_string());

        Self {
            package: overrides.package.or(file.package).unwrap_or_default(),
            dir: overrides.dir.or(file.dir),
            output: overrides.output.or(file.output),
            mode: overrides.mode.or(file.mode).unwrap_or_default(),
            roles: RoleTypes::new(
                overrides.read_type.or(file.read_type).unwrap_or_default(),
                overrides.write_type.or(file.write_type).unwrap_or_default(),
            ),
            formatter: Some(formatter).filter(|f| !f.trim().is_empty()),
            dry_run: overrides.dry_run.or(file.dry_run).unwrap_or(false),
            registry: RegistryConfig {
                returning_insert: overrides
                    .returning_insert
                    .or(file.returning_insert)
                    .unwrap_or(true),
                alterations: file.templates,
            },
            scan: ScanOptions {
                extension: overrides
                    .extension
                    .or(file.extension)
                    .unwrap_or(scan_defaults.extension),
                comment: file.comment.unwrap_or(scan_defaults.comment),
                marker: file.marker.unwrap_or(scan_defaults.marker),
            },
        }
    }

    /// The query directory, required by every command that scans.
    pub fn source_dir(&self) -> GenResult<&Path> {
        self.dir
            .as_deref()
            .ok_or_else(|| GenError::config("Directory must be specified with --dir path/to/dir"))
    }

    /// Check everything a generation run needs.
    pub fn validate(&self) -> GenResult<()> {
        if self.package.trim().is_empty() {
            return Err(GenError::config("Package must be specified with --pkg name"));
        }
        self.source_dir()?;
        if !self.dry_run && self.output.is_none() {
            return Err(GenError::config(
                "Output file must be specified with -o path/to/file",
            ));
        }
        if self.roles.read.trim().is_empty() {
            return Err(GenError::config(format!(
                "Read type must be specified with --read-type for {} mode",
                self.mode
            )));
        }
        if self.roles.write.trim().is_empty() {
            return Err(GenError::config(format!(
                "Write type must be specified with --write-type for {} mode",
                self.mode
            )));
        }
        if self.scan.comment.is_empty() || self.scan.marker.is_empty() {
            return Err(GenError::config("Comment prefix and marker must not be empty"));
        }
        Ok(())
    }
}
