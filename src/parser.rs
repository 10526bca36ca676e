//! Directive parser.
//!
//! Turns the raw lines of one directive block into an [`Invocation`].
//!
//! # Grammar
//!
//! ```text
//! selectOne GetUser
//! ───┬───── ───┬───
//!    │         └── generated method name
//!    └── command (must be registered)
//! $1: id int64
//! ─┬─ ─┬ ──┬──
//!  │   │   └── parameter type
//!  │   └── parameter name
//!  └── position marker, $1, $2, ... with no gaps
//! ```
//!
//! Any deviation is a structural error. Those are fatal for the whole run.

use nom::{
    IResult, Parser,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res},
    sequence::delimited,
};
use thiserror::Error;

use crate::error::{GenError, GenResult};
use crate::invocation::{Invocation, Param};
use crate::registry::Registry;
use crate::scanner::DirectiveBlock;

/// What is wrong with a directive block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveErrorKind {
    #[error("Empty directive")]
    Empty,

    #[error("Bad line: '{line}'; expected 2 components, got {found}")]
    HeaderTokens { line: String, found: usize },

    #[error("Bad line: '{line}'; expected 3 components, got {found}")]
    ParamTokens { line: String, found: usize },

    #[error("Parameter line is bad: '{line}'; expected marker '${expected}:'")]
    BadMarker { line: String, expected: usize },

    #[error("Parameter line is out of sequence: '{line}'; expected '${expected}:', got '${found}:'")]
    Numbering {
        line: String,
        expected: usize,
        found: usize,
    },

    #[error("Command {0} is not defined")]
    UnknownCommand(String),
}

/// A structural error, located by line index within the block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct DirectiveError {
    /// Zero-based index of the offending line within the block.
    pub index: usize,
    pub kind: DirectiveErrorKind,
}

impl DirectiveError {
    fn at(index: usize, kind: DirectiveErrorKind) -> Self {
        Self { index, kind }
    }
}

/// Parse one directive block.
///
/// `lines` are the directive texts with comment markers already removed.
pub fn parse_directive<S: AsRef<str>>(
    registry: &Registry,
    key: &str,
    lines: &[S],
) -> Result<Invocation, DirectiveError> {
    let (header, rest) = lines
        .split_first()
        .ok_or(DirectiveError::at(0, DirectiveErrorKind::Empty))?;

    let header = header.as_ref();
    let (command_name, method_name) = match tokens(header).as_slice() {
        [command, method] => (*command, *method),
        other => {
            return Err(DirectiveError::at(
                0,
                DirectiveErrorKind::HeaderTokens {
                    line: header.to_string(),
                    found: other.len(),
                },
            ));
        }
    };

    let command = registry.lookup(command_name).map_err(|_| {
        DirectiveError::at(
            0,
            DirectiveErrorKind::UnknownCommand(command_name.to_string()),
        )
    })?;

    let params = rest
        .iter()
        .enumerate()
        .map(|(i, line)| parse_param(i + 1, line.as_ref()).map_err(|k| DirectiveError::at(i + 1, k)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Invocation {
        command,
        key: key.to_string(),
        name: method_name.to_string(),
        params,
    })
}

/// Parse a scanned block, reporting errors against its source location.
pub fn parse_block(registry: &Registry, block: &DirectiveBlock) -> GenResult<Invocation> {
    let texts: Vec<&str> = block.lines.iter().map(|l| l.text.as_str()).collect();
    parse_directive(registry, &block.key, &texts).map_err(|e| {
        let line = block
            .lines
            .get(e.index)
            .or(block.lines.first())
            .map_or(0, |l| l.number);
        GenError::directive(&block.file, line, e.kind.to_string())
    })
}

fn tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Parse a `$n:` position marker.
fn marker(input: &str) -> IResult<&str, usize> {
    all_consuming(delimited(
        char('$'),
        map_res(digit1, str::parse::<usize>),
        char(':'),
    ))
    .parse(input)
}

fn parse_param(position: usize, line: &str) -> Result<Param, DirectiveErrorKind> {
    let (mark, name, typ) = match tokens(line).as_slice() {
        [mark, name, typ] => (*mark, *name, *typ),
        other => {
            return Err(DirectiveErrorKind::ParamTokens {
                line: line.to_string(),
                found: other.len(),
            });
        }
    };

    if mark == format!("${position}:") {
        return Ok(Param::new(name, typ));
    }

    // Only the canonical spelling is accepted; `$01:` is a bad marker.
    match marker(mark) {
        Ok((_, n)) if n != position => Err(DirectiveErrorKind::Numbering {
            line: line.to_string(),
            expected: position,
            found: n,
        }),
        _ => Err(DirectiveErrorKind::BadMarker {
            line: line.to_string(),
            expected: position,
        }),
    }
}
