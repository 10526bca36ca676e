//! Method body templates.
//!
//! A template is literal text with a fixed set of named slots:
//!
//! ```text
//! return dal.SelectOne({{ var }}, "{{ file }}", instance, {{ params }})
//!                      ───┬───     ────┬───               ─────┬────
//!                         │            │                       └── comma-joined parameter names
//!                         │            └── query lookup key
//!                         └── receiver variable of the bound role
//! ```
//!
//! Templates are compiled once, when the registry is built. A defective
//! template is still a value: it remembers its defect so that expansion can
//! report it inline for every method that uses it.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_until},
    sequence::delimited,
};
use serde::Serialize;
use thiserror::Error;

/// A named substitution point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Var,
    File,
    Params,
}

impl Slot {
    fn from_name(name: &str, offset: usize) -> Result<Self, TemplateError> {
        match name {
            "var" => Ok(Slot::Var),
            "file" => Ok(Slot::File),
            "params" => Ok(Slot::Params),
            "" => Err(TemplateError::EmptySlot { offset }),
            other => Err(TemplateError::UnknownSlot {
                name: other.to_string(),
                offset,
            }),
        }
    }
}

/// Why a template could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unterminated slot at offset {offset}")]
    Unterminated { offset: usize },

    #[error("empty slot at offset {offset}")]
    EmptySlot { offset: usize },

    #[error("unknown slot '{name}' at offset {offset}; expected var, file or params")]
    UnknownSlot { name: String, offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(Slot),
}

/// Values bound to the slots of one method body.
#[derive(Debug, Clone, Copy)]
pub struct SlotValues<'a> {
    pub var: &'a str,
    pub file: &'a str,
    pub params: &'a str,
}

impl SlotValues<'_> {
    fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::Var => self.var,
            Slot::File => self.file,
            Slot::Params => self.params,
        }
    }
}

/// A compiled body template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    compiled: Result<Vec<Segment>, TemplateError>,
}

impl Template {
    /// Compile a template. Never fails; see [`Template::defect`].
    pub fn compile(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = compile_segments(&source);
        Self { source, compiled }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compile-time defect, if any.
    pub fn defect(&self) -> Option<&TemplateError> {
        self.compiled.as_ref().err()
    }

    /// Substitute every slot.
    pub fn expand(&self, values: &SlotValues<'_>) -> Result<String, TemplateError> {
        let segments = self.compiled.as_ref().map_err(Clone::clone)?;
        let mut out = String::with_capacity(self.source.len());
        for segment in segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(slot) => out.push_str(values.get(*slot)),
            }
        }
        Ok(out)
    }
}

/// Parse `{{ name }}`, returning the raw name between the braces.
fn slot(input: &str) -> IResult<&str, &str> {
    delimited(tag("{{"), take_until("}}"), tag("}}")).parse(input)
}

fn compile_segments(source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut rest = source;

    while !rest.is_empty() {
        match rest.find("{{") {
            None => {
                segments.push(Segment::Text(rest.to_string()));
                break;
            }
            Some(0) => {
                let offset = source.len() - rest.len();
                let (after, name) =
                    slot(rest).map_err(|_| TemplateError::Unterminated { offset })?;
                segments.push(Segment::Slot(Slot::from_name(name.trim(), offset)?));
                rest = after;
            }
            Some(n) => {
                segments.push(Segment::Text(rest[..n].to_string()));
                rest = &rest[n..];
            }
        }
    }

    Ok(segments)
}
