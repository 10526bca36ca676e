//! Generation drivers.
//!
//! Every artifact is produced by the same traversal:
//!
//! ```text
//! start() → handle(invocation)* → finish()
//! ```
//!
//! [`MethodGenerator`] emits method bodies (implementation or mock),
//! [`InterfaceGenerator`] emits the read and write interfaces.

mod interface;
mod methods;
mod writer;

pub use interface::InterfaceGenerator;
pub use methods::{BodyKind, MethodGenerator};
pub use writer::GoWriter;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::invocation::{Invocation, RoleTypes};

/// Which artifact to produce.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Code,
    Mock,
    Interface,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Code => write!(f, "code"),
            Mode::Mock => write!(f, "mock"),
            Mode::Interface => write!(f, "interface"),
        }
    }
}

/// Driver lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Created,
    Accumulating,
}

/// One artifact strategy over the invocation stream.
///
/// Callers drive it exactly once through `start`, `handle` for each
/// invocation in discovery order, then `finish`.
pub trait Generator {
    fn start(&mut self);

    fn handle(&mut self, invocation: &Invocation);

    /// Consume the driver and return the emitted text.
    fn finish(self) -> String;
}

/// Run `generator` over `invocations`.
pub fn generate<G: Generator>(mut generator: G, invocations: &[Invocation]) -> String {
    generator.start();
    for invocation in invocations {
        generator.handle(invocation);
    }
    generator.finish()
}

/// Produce the full unit for `mode`, package header included.
pub fn render(mode: Mode, package: &str, roles: &RoleTypes, invocations: &[Invocation]) -> String {
    let mut out = GoWriter::new();
    out.package(package);

    match mode {
        Mode::Code => generate(MethodGenerator::code(out, roles.clone()), invocations),
        Mode::Mock => generate(MethodGenerator::mock(out, roles.clone()), invocations),
        Mode::Interface => generate(InterfaceGenerator::new(out, roles.clone()), invocations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Interface.to_string(), "interface");
        assert_eq!(Mode::default(), Mode::Code);
    }

    #[test]
    fn test_render_empty() {
        let roles = RoleTypes::new("Reader", "Writer");
        assert_eq!(render(Mode::Code, "store", &roles, &[]), "package store\n\n");
        assert_eq!(
            render(Mode::Interface, "store", &roles, &[]),
            "package store\n\ntype Reader interface {\n}\n\ntype Writer interface {\n}\n\n"
        );
    }
}
