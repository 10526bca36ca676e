//! Method emission for the `code` and `mock` modes.

use super::{Generator, GoWriter, Phase};
use crate::expand::expand_body;
use crate::invocation::{Invocation, RoleTypes};
use crate::template::Template;

/// Which body template a [`MethodGenerator`] binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Implementation,
    Mock,
}

/// Emits one method per applicable role for each invocation.
///
/// Read-capable commands get a read-role and a write-role method;
/// write-only commands only the write-role one. The two differ in receiver
/// and the receiver variable substituted into the body.
#[derive(Debug)]
pub struct MethodGenerator {
    out: GoWriter,
    roles: RoleTypes,
    kind: BodyKind,
    phase: Phase,
}

impl MethodGenerator {
    pub fn new(out: GoWriter, roles: RoleTypes, kind: BodyKind) -> Self {
        Self {
            out,
            roles,
            kind,
            phase: Phase::Created,
        }
    }

    /// Real implementations calling the runtime helpers.
    pub fn code(out: GoWriter, roles: RoleTypes) -> Self {
        Self::new(out, roles, BodyKind::Implementation)
    }

    /// Test doubles returning canned receiver fields.
    pub fn mock(out: GoWriter, roles: RoleTypes) -> Self {
        Self::new(out, roles, BodyKind::Mock)
    }

    fn template<'a>(&self, invocation: &'a Invocation) -> &'a Template {
        match self.kind {
            BodyKind::Implementation => invocation.command.code(),
            BodyKind::Mock => invocation.command.mock(),
        }
    }
}

impl Generator for MethodGenerator {
    fn start(&mut self) {
        debug_assert_eq!(self.phase, Phase::Created, "start called twice");
        self.phase = Phase::Accumulating;
    }

    fn handle(&mut self, invocation: &Invocation) {
        debug_assert_eq!(self.phase, Phase::Accumulating, "handle before start");

        let signature = invocation.signature();
        let template = self.template(invocation);
        for &role in invocation.roles() {
            let receiver = self.roles.type_for(role);
            let body = expand_body(invocation, receiver, template);
            self.out.function(receiver, &signature, &body);
        }
    }

    fn finish(self) -> String {
        debug_assert_eq!(self.phase, Phase::Accumulating, "finish before start");
        self.out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::invocation::Param;
    use crate::registry::Registry;
    use pretty_assertions::assert_eq;

    fn roles() -> RoleTypes {
        RoleTypes::new("(r *Reader)", "(w *Writer)")
    }

    fn invocation(registry: &Registry, command: &str, name: &str, params: Vec<Param>) -> Invocation {
        Invocation {
            command: registry.lookup(command).unwrap(),
            key: "users/q.sql".to_string(),
            name: name.to_string(),
            params,
        }
    }

    #[test]
    fn test_read_capable_gets_both_roles() {
        let registry = Registry::default();
        let inv = invocation(&registry, "exists", "HasUser", vec![Param::new("id", "int64")]);
        let out = generate(MethodGenerator::code(GoWriter::new(), roles()), &[inv]);
        assert_eq!(
            out,
            "func (r *Reader) HasUser(id int64) (bool, error) {\n\
             \treturn dal.Exists(r, \"users/q.sql\", id)\n\
             }\n\n\
             func (w *Writer) HasUser(id int64) (bool, error) {\n\
             \treturn dal.Exists(w, \"users/q.sql\", id)\n\
             }\n\n"
        );
    }

    #[test]
    fn test_write_only_gets_write_role() {
        let registry = Registry::default();
        let inv = invocation(&registry, "deleteOne", "DropUser", vec![Param::new("id", "int64")]);
        let out = generate(MethodGenerator::code(GoWriter::new(), roles()), &[inv]);
        assert!(!out.contains("(r *Reader)"));
        assert_eq!(
            out,
            "func (w *Writer) DropUser(id int64) error {\n\
             \treturn dal.DeleteOne(w, \"users/q.sql\", id)\n\
             }\n\n"
        );
    }

    #[test]
    fn test_mock_bodies() {
        let registry = Registry::default();
        let inv = invocation(&registry, "selectAll", "ListUsers", vec![]);
        let out = generate(MethodGenerator::mock(GoWriter::new(), roles()), &[inv]);
        assert_eq!(
            out,
            "func (r *Reader) ListUsers(instances interface{}) error {\n\
             \tinstances = r.Slice\n\
             \treturn r.Error\n\
             }\n\n\
             func (w *Writer) ListUsers(instances interface{}) error {\n\
             \tinstances = w.Slice\n\
             \treturn w.Error\n\
             }\n\n"
        );
    }

    #[test]
    fn test_defective_template_is_local() {
        let mut builder = crate::registry::RegistryBuilder::new();
        builder.alter("insert", "return {{ oops").unwrap();
        let registry = builder.build();

        let broken = invocation(&registry, "insert", "AddUser", vec![]);
        let fine = invocation(&registry, "updateOne", "Touch", vec![]);
        let out = generate(MethodGenerator::code(GoWriter::new(), roles()), &[broken, fine]);

        assert!(out.contains("\tERROR unterminated slot at offset 7\n"));
        assert!(out.contains("\treturn dal.UpdateOne(w, \"users/q.sql\", )\n"));
    }
}
