//! Directive extraction from annotated query files.
//!
//! Directives live in comments of the query files:
//!
//! ```sql
//! -- !selectOne GetUser
//! -- !$1: id int64
//! SELECT * FROM users WHERE id = $1
//! ```
//!
//! Each run of annotated lines is split into blocks; a line that does not
//! start with `$` opens a new block.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};

/// How annotated files are found and read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// File extension of query files, without the dot.
    pub extension: String,
    /// Line comment prefix of the host language.
    pub comment: String,
    /// Marker that turns a comment into a directive line.
    pub marker: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: "sql".to_string(),
            comment: "--".to_string(),
            marker: "!".to_string(),
        }
    }
}

/// One directive line and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveLine {
    /// 1-indexed line number in the source file.
    pub number: usize,
    pub text: String,
}

impl DirectiveLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Raw lines of one directive occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveBlock {
    pub file: PathBuf,
    /// Query lookup key for every directive in the file.
    pub key: String,
    pub lines: Vec<DirectiveLine>,
}

/// Query lookup key: path relative to `root`, `/`-separated.
pub fn query_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Scan `root` recursively, in lexical order, for directive blocks.
pub fn scan_dir(root: &Path, options: &ScanOptions) -> GenResult<Vec<DirectiveBlock>> {
    let mut files = Vec::new();
    collect_files(root, &options.extension, &mut files)?;

    let mut blocks = Vec::new();
    for file in files {
        let content = fs::read_to_string(&file).map_err(|e| {
            GenError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read '{}': {}", file.display(), e),
            ))
        })?;
        let key = query_key(root, &file);
        let found = extract_blocks(&file, &key, &content, options);
        tracing::debug!("{}: {} directive(s)", file.display(), found.len());
        blocks.extend(found);
    }
    Ok(blocks)
}

/// Symlinked directories are not descended into, so a link back to an
/// ancestor cannot make the walk revisit files.
fn collect_files(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> GenResult<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.and_then(|e| Ok((e.path(), e.file_type()?))))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (path, file_type) in entries {
        if file_type.is_dir() {
            collect_files(&path, extension, files)?;
        } else if file_type.is_symlink() && path.is_dir() {
            tracing::debug!("skipping linked directory {}", path.display());
        } else if path.extension().is_some_and(|e| e == extension) {
            files.push(path);
        }
    }
    Ok(())
}

/// Directive text of an annotated line, if it is one.
fn directive_text<'a>(line: &'a str, options: &ScanOptions) -> Option<&'a str> {
    let rest = line.trim_start().strip_prefix(options.comment.as_str())?;
    let rest = rest.trim_start().strip_prefix(options.marker.as_str())?;
    Some(rest.trim())
}

/// Split a file's annotated lines into directive blocks.
pub fn extract_blocks(
    file: &Path,
    key: &str,
    content: &str,
    options: &ScanOptions,
) -> Vec<DirectiveBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<DirectiveBlock> = None;

    for (i, line) in content.lines().enumerate() {
        let Some(text) = directive_text(line, options) else {
            blocks.extend(current.take());
            continue;
        };

        let continues = text.starts_with('$') && current.is_some();
        if !continues {
            blocks.extend(current.take());
            current = Some(DirectiveBlock {
                file: file.to_path_buf(),
                key: key.to_string(),
                lines: Vec::new(),
            });
        }
        if let Some(block) = current.as_mut() {
            block.lines.push(DirectiveLine::new(i + 1, text));
        }
    }

    blocks.extend(current);
    blocks
}
