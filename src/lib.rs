//! # dalgen
//!
//! Generates a Go data-access layer from annotated SQL files, keeping three
//! artifacts in lockstep with one source of truth:
//!
//! - `code`: methods calling the runtime helpers with the right query key
//! - `mock`: the same methods returning canned values, for tests
//! - `interface`: read and write interfaces listing every signature
//!
//! ## Quick Example
//!
//! ```rust
//! use dalgen::prelude::*;
//!
//! let registry = Registry::default();
//! let invocation = parse_directive(
//!     &registry,
//!     "users/get.sql",
//!     &["selectOne GetUser", "$1: id int64"],
//! )
//! .unwrap();
//!
//! let roles = RoleTypes::new("Reader", "Writer");
//! let go = render(Mode::Interface, "store", &roles, &[invocation]);
//! assert!(go.contains("GetUser(instance interface{}, id int64) error"));
//! ```
//!
//! ## Commands
//!
//! | Command     | Capability | Injected      | Returns          |
//! |-------------|------------|---------------|------------------|
//! | `exists`    | read       |               | `(bool, error)`  |
//! | `selectOne` | read       | `instance`    | `error`          |
//! | `selectAll` | read       | `instances`   | `error`          |
//! | `insert`    | write      |               | `(int64, error)` |
//! | `updateOne` | write      |               | `error`          |
//! | `deleteOne` | write      |               | `error`          |
//! | `exec`      | read       |               | `error`          |

pub mod config;
pub mod engine;
pub mod error;
pub mod expand;
pub mod generator;
pub mod invocation;
pub mod output;
pub mod parser;
pub mod registry;
pub mod scanner;
pub mod template;

pub mod prelude {
    pub use crate::config::{FileConfig, Overrides, Settings};
    pub use crate::engine::{Report, collect_invocations, run};
    pub use crate::error::*;
    pub use crate::generator::{Generator, Mode, generate, render};
    pub use crate::invocation::{Invocation, Param, Role, RoleTypes};
    pub use crate::parser::{parse_block, parse_directive};
    pub use crate::registry::{Capability, Command, Registry, RegistryBuilder, RegistryConfig};
    pub use crate::scanner::{ScanOptions, scan_dir};
}
