//! Dependency-aware registry of user-selectable configuration variants.
//!
//! A *variant* is a named alternative branch of a configuration tree; a
//! *parameter* is a typed leaf value, possibly gated by a value range or
//! enumeration and possibly driving nested variants. This crate builds
//! registries of such records from model descriptions, propagates
//! activation through value changes and dependency rules, aggregates
//! registries behind a repository with `registry:path` addressing, and
//! persists chosen values as line-oriented profiles.
//!
//! # Modules
//!
//! - [`path`] - slash-separated record addressing
//! - [`value`] - typed parameter values, units
//! - [`model`] - parameter/variant model descriptions
//! - [`record`] - record nodes (kind, activation, value state)
//! - [`dependency`] - cross-parameter dependency rules
//! - [`registry`] - the record tree and activation propagation
//! - [`repository`] - named registries behind one command surface
//! - [`ascii_io`] - value-profile text I/O
//! - [`command`] - the soft-failure command boundary

pub mod ascii_io;
pub mod command;
pub mod dependency;
pub mod error;
pub mod model;
pub mod path;
pub mod record;
pub mod registry;
pub mod repository;
pub mod units;
pub mod value;

pub use ascii_io::{AsciiIo, IoFlags};
pub use command::Outcome;
pub use dependency::{DependencyModel, DependencyRule};
pub use error::{Result, VariantError};
pub use model::{
	ModelError, ModelManager, Mutability, ParameterModel, ValueDomain, VariantModel,
};
pub use path::{PathAddress, PathSegment, ROOT_PATH};
pub use record::{Record, RecordKind, ValueState};
pub use registry::{Mount, RecordFilter, Registry};
pub use repository::{Repository, SharedRegistry, share};
pub use value::{ParameterType, ParameterValue, UnitSpec};

#[cfg(test)]
mod tests;
