//! Interface emission.

use super::{Generator, GoWriter, Phase};
use crate::invocation::{Invocation, RoleTypes};
use crate::registry::Capability;

/// Collects signatures into a read and a write bucket, then writes one
/// interface per role. Order within a bucket is encounter order.
#[derive(Debug)]
pub struct InterfaceGenerator {
    out: GoWriter,
    roles: RoleTypes,
    read: Vec<String>,
    write: Vec<String>,
    phase: Phase,
}

impl InterfaceGenerator {
    pub fn new(out: GoWriter, roles: RoleTypes) -> Self {
        Self {
            out,
            roles,
            read: Vec::new(),
            write: Vec::new(),
            phase: Phase::Created,
        }
    }
}

impl Generator for InterfaceGenerator {
    fn start(&mut self) {
        debug_assert_eq!(self.phase, Phase::Created, "start called twice");
        self.phase = Phase::Accumulating;
    }

    fn handle(&mut self, invocation: &Invocation) {
        debug_assert_eq!(self.phase, Phase::Accumulating, "handle before start");

        let bucket = match invocation.capability() {
            Capability::ReadCapable => &mut self.read,
            Capability::WriteOnly => &mut self.write,
        };
        bucket.push(invocation.signature());
    }

    fn finish(mut self) -> String {
        debug_assert_eq!(self.phase, Phase::Accumulating, "finish before start");
        self.out.interface(&self.roles.read, &self.read);
        self.out.interface(&self.roles.write, &self.write);
        self.out.finish()
    }
}
