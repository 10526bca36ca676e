//! Command registry.
//!
//! The fixed vocabulary of directive commands. Each command has a shape
//! (capability, injected role parameter, return signature) and two body
//! templates, one for the real implementation and one for mocks.
//!
//! The registry is built once from a [`RegistryConfig`] and is immutable
//! afterwards. Template alterations happen on the [`RegistryBuilder`] only
//! and can never touch a command's shape.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};
use crate::template::Template;

/// Whether a command may be called through the read role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    ReadCapable,
    WriteOnly,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ReadCapable => write!(f, "read"),
            Capability::WriteOnly => write!(f, "write"),
        }
    }
}

/// One operation kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: &'static str,
    capability: Capability,
    injected: Option<&'static str>,
    returns: &'static str,
    code: Template,
    mock: Template,
}

impl Command {
    fn new(
        name: &'static str,
        capability: Capability,
        injected: Option<&'static str>,
        returns: &'static str,
        code: &str,
        mock: &str,
    ) -> Self {
        Self {
            name,
            capability,
            injected,
            returns,
            code: Template::compile(code),
            mock: Template::compile(mock),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn is_write_only(&self) -> bool {
        self.capability == Capability::WriteOnly
    }

    /// Name of the role parameter injected ahead of the declared ones.
    pub fn injected(&self) -> Option<&'static str> {
        self.injected
    }

    /// Return signature, e.g. `(bool, error)`.
    pub fn returns(&self) -> &'static str {
        self.returns
    }

    /// Implementation body template.
    pub fn code(&self) -> &Template {
        &self.code
    }

    /// Mock body template.
    pub fn mock(&self) -> &Template {
        &self.mock
    }
}

/// Inputs consumed while the registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Obtain inserted ids from a `RETURNING` clause rather than from the
    /// driver's last-insert-id.
    pub returning_insert: bool,
    /// Extra implementation templates, keyed by command name. Applied after
    /// `returning_insert`, so they win.
    pub alterations: BTreeMap<String, String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            returning_insert: true,
            alterations: BTreeMap::new(),
        }
    }
}

const INSERT_RETURNING: &str = "return dal.InsertReturning({{ var }}, \"{{ file }}\", {{ params }})";

fn standard_commands() -> Vec<Command> {
    use Capability::*;

    vec![
        Command::new(
            "exists",
            ReadCapable,
            None,
            "(bool, error)",
            "return dal.Exists({{ var }}, \"{{ file }}\", {{ params }})",
            "return {{ var }}.Bool, {{ var }}.Error",
        ),
        Command::new(
            "selectOne",
            ReadCapable,
            Some("instance"),
            "error",
            "return dal.SelectOne({{ var }}, \"{{ file }}\", instance, {{ params }})",
            "instance = {{ var }}.Thing\nreturn {{ var }}.Error",
        ),
        Command::new(
            "selectAll",
            ReadCapable,
            Some("instances"),
            "error",
            "return dal.SelectAll({{ var }}, \"{{ file }}\", instances, {{ params }})",
            "instances = {{ var }}.Slice\nreturn {{ var }}.Error",
        ),
        Command::new(
            "insert",
            WriteOnly,
            None,
            "(int64, error)",
            "return dal.Insert({{ var }}, \"{{ file }}\", {{ params }})",
            "return {{ var }}.Int64, {{ var }}.Error",
        ),
        Command::new(
            "updateOne",
            WriteOnly,
            None,
            "error",
            "return dal.UpdateOne({{ var }}, \"{{ file }}\", {{ params }})",
            "return {{ var }}.Error",
        ),
        Command::new(
            "deleteOne",
            WriteOnly,
            None,
            "error",
            "return dal.DeleteOne({{ var }}, \"{{ file }}\", {{ params }})",
            "return {{ var }}.Error",
        ),
        Command::new(
            "exec",
            ReadCapable,
            None,
            "error",
            "return dal.Exec({{ var }}, \"{{ file }}\", {{ params }})",
            "return {{ var }}.Error",
        ),
    ]
}

/// Construction stage of a [`Registry`].
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    commands: Vec<Command>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Start from the standard command table.
    pub fn new() -> Self {
        Self {
            commands: standard_commands(),
        }
    }

    /// Replace the implementation template of one command.
    pub fn alter(&mut self, name: &str, template: &str) -> GenResult<()> {
        let command = self
            .commands
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| GenError::UnknownAlteration(name.to_string()))?;
        command.code = Template::compile(template);
        Ok(())
    }

    fn use_returning_insert(&mut self) {
        if let Some(insert) = self.commands.iter_mut().find(|c| c.name == "insert") {
            insert.code = Template::compile(INSERT_RETURNING);
        }
    }

    /// Freeze the table.
    pub fn build(self) -> Registry {
        for command in &self.commands {
            for (kind, template) in [("code", &command.code), ("mock", &command.mock)] {
                if let Some(defect) = template.defect() {
                    tracing::warn!(
                        "{} template of '{}' is defective: {}",
                        kind,
                        command.name,
                        defect
                    );
                }
            }
        }

        let index = self
            .commands
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name, i))
            .collect();

        Registry {
            commands: self.commands.into_iter().map(Arc::new).collect(),
            index,
        }
    }
}

/// Immutable table of supported commands.
#[derive(Debug, Clone)]
pub struct Registry {
    commands: Vec<Arc<Command>>,
    index: HashMap<&'static str, usize>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut builder = RegistryBuilder::new();
        builder.use_returning_insert();
        builder.build()
    }
}

impl Registry {
    /// Build the standard table and apply the configured alterations.
    pub fn initialize(config: &RegistryConfig) -> GenResult<Self> {
        let mut builder = RegistryBuilder::new();
        if config.returning_insert {
            builder.use_returning_insert();
        }
        for (name, template) in &config.alterations {
            builder.alter(name, template)?;
        }
        Ok(builder.build())
    }

    /// Find a command by name.
    pub fn lookup(&self, name: &str) -> GenResult<Arc<Command>> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.commands[i]))
            .ok_or_else(|| GenError::UnknownCommand(name.to_string()))
    }

    /// All commands in declaration order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
