//! Formatting and writing generated source.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use crate::error::{GenError, GenResult};

/// Pipe `source` through an external formatter (stdin to stdout).
///
/// `command` is split on whitespace: `"gofmt -s"` runs `gofmt` with `-s`.
pub fn format_source(source: String, command: &str) -> GenResult<String> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| GenError::config("Formatter command is empty"))?;

    let failed = |message: String| GenError::Formatter {
        command: command.to_string(),
        message,
    };

    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| failed(e.to_string()))?;

    // Feed stdin from another thread so a full stdout pipe cannot stall us.
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| failed("stdin unavailable".to_string()))?;
    let feeder = thread::spawn(move || stdin.write_all(source.as_bytes()));

    let output = child.wait_with_output().map_err(|e| failed(e.to_string()))?;
    let fed = feeder
        .join()
        .map_err(|_| failed("stdin writer panicked".to_string()))?;

    if !output.status.success() {
        return Err(failed(format!(
            "{}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    fed.map_err(|e| failed(e.to_string()))?;

    String::from_utf8(output.stdout).map_err(|e| failed(e.to_string()))
}

/// Write to `path`, creating parent directories; `None` writes to stdout.
pub fn write_output(text: &str, path: Option<&Path>) -> GenResult<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_formatter() {
        let err = format_source("package x\n".to_string(), "dalgen-no-such-formatter").unwrap_err();
        assert!(matches!(err, GenError::Formatter { .. }));
    }

    #[test]
    fn test_empty_formatter() {
        let err = format_source(String::new(), "   ").unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_formatter_passthrough() {
        let out = format_source("package x\n".to_string(), "cat").unwrap();
        assert_eq!(out, "package x\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_formatter_failure() {
        let err = format_source("package x\n".to_string(), "false").unwrap_err();
        assert!(err.to_string().starts_with("Formatter 'false' failed"));
    }

    #[test]
    fn test_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store").join("queries.go");
        write_output("package store\n", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "package store\n");
    }
}
