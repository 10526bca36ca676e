//! The parsed, resolved form of one directive.

use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::registry::{Capability, Command};

/// One declared method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
}

impl Param {
    pub fn new(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
        }
    }
}

/// Emission-time role selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Read,
    Write,
}

/// Type text used for each role.
///
/// In method modes this is a receiver declaration such as `(r *Reader)`;
/// in interface mode it is the interface name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleTypes {
    pub read: String,
    pub write: String,
}

impl RoleTypes {
    pub fn new(read: impl Into<String>, write: impl Into<String>) -> Self {
        Self {
            read: read.into(),
            write: write.into(),
        }
    }

    pub fn type_for(&self, role: Role) -> &str {
        match role {
            Role::Read => &self.read,
            Role::Write => &self.write,
        }
    }
}

/// Receiver variable for a role type: leading `(` stripped, first token.
///
/// `(r *Reader)` gives `r`.
pub fn target_var(role_type: &str) -> &str {
    role_type
        .trim_start_matches('(')
        .split_whitespace()
        .next()
        .unwrap_or("")
}

/// A directive, resolved against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    #[serde(serialize_with = "command_name")]
    pub command: Arc<Command>,
    /// Query lookup key, derived from the source path.
    pub key: String,
    /// Generated method name.
    pub name: String,
    pub params: Vec<Param>,
}

fn command_name<S: Serializer>(command: &Arc<Command>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(command.name())
}

const READ_AND_WRITE: &[Role] = &[Role::Read, Role::Write];
const WRITE: &[Role] = &[Role::Write];

impl Invocation {
    pub fn capability(&self) -> Capability {
        self.command.capability()
    }

    /// Roles a method is emitted for. Write-only commands never get a read method.
    pub fn roles(&self) -> &'static [Role] {
        match self.command.capability() {
            Capability::ReadCapable => READ_AND_WRITE,
            Capability::WriteOnly => WRITE,
        }
    }

    /// Comma-joined parameter names, as substituted into bodies.
    pub fn param_names(&self) -> String {
        self.params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Method signature: name, parameter list and return type.
    ///
    /// The injected role parameter, if any, comes first.
    pub fn signature(&self) -> String {
        let mut params: Vec<String> = Vec::with_capacity(self.params.len() + 1);
        if let Some(injected) = self.command.injected() {
            params.push(format!("{} interface{{}}", injected));
        }
        params.extend(self.params.iter().map(|p| format!("{} {}", p.name, p.typ)));

        format!(
            "{}({}) {}",
            self.name,
            params.join(", "),
            self.command.returns()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn invocation(command: &str, name: &str, params: Vec<Param>) -> Invocation {
        Invocation {
            command: Registry::default().lookup(command).unwrap(),
            key: "users/get.sql".to_string(),
            name: name.to_string(),
            params,
        }
    }

    #[test]
    fn test_target_var() {
        assert_eq!(target_var("(r *Reader)"), "r");
        assert_eq!(target_var("((db Handle)"), "db");
        assert_eq!(target_var("w"), "w");
        assert_eq!(target_var(""), "");
    }

    #[test]
    fn test_signature_with_injected_param() {
        let inv = invocation("selectOne", "GetUser", vec![Param::new("id", "int64")]);
        assert_eq!(inv.signature(), "GetUser(instance interface{}, id int64) error");
    }

    #[test]
    fn test_signature_injected_only() {
        let inv = invocation("selectAll", "ListUsers", vec![]);
        assert_eq!(inv.signature(), "ListUsers(instances interface{}) error");
    }

    #[test]
    fn test_signature_plain() {
        let inv = invocation(
            "insert",
            "CreateUser",
            vec![Param::new("name", "string"), Param::new("age", "int")],
        );
        assert_eq!(inv.signature(), "CreateUser(name string, age int) (int64, error)");
        assert_eq!(inv.param_names(), "name, age");
    }

    #[test]
    fn test_roles() {
        assert_eq!(
            invocation("exists", "HasUser", vec![]).roles(),
            &[Role::Read, Role::Write]
        );
        assert_eq!(invocation("deleteOne", "DropUser", vec![]).roles(), &[Role::Write]);
    }

    #[test]
    fn test_role_types() {
        let roles = RoleTypes::new("(r *Reader)", "(w *Writer)");
        assert_eq!(roles.type_for(Role::Read), "(r *Reader)");
        assert_eq!(target_var(roles.type_for(Role::Write)), "w");
    }
}
