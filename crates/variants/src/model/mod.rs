//! Model descriptions: the static shape of a registry's record tree.
//!
//! A [`ModelManager`] holds named [`ParameterModel`]s and [`VariantModel`]s
//! parsed from a sectioned carrier source, plus the declared top variant.
//! A registry consumes a manager once, at build time; records reference
//! their backing models by name afterwards.

mod manager;
mod parameter;
mod variant;

pub use manager::ModelManager;
pub use parameter::{
	DomainViolation, EnumValue, Mutability, ParameterModel, ValueDomain, ValueGroup, VariantDecl,
};
pub use variant::{ParameterDecl, VariantModel};

use thiserror::Error;

/// Errors raised while loading or resolving model descriptions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
	/// The manager holds no models yet.
	#[error("model manager is not initialized")]
	ManagerNotInitialized,

	/// The requested top variant model does not exist.
	#[error("unknown top variant model: '{0}'")]
	UnknownTopVariant(String),

	/// A declaration references a parameter model that does not exist.
	#[error("unknown parameter model: '{0}'")]
	UnknownParameterModel(String),

	/// A declaration references a variant model that does not exist.
	#[error("unknown variant model: '{0}'")]
	UnknownVariantModel(String),

	/// A model section is malformed.
	#[error("model section '{section}': {reason}")]
	Invalid {
		/// Name of the offending section.
		section: String,
		/// What went wrong.
		reason: String,
	},

	/// The carrier itself failed.
	#[error(transparent)]
	Props(#[from] vario_props::PropsError),
}

pub(crate) fn invalid(section: &str, reason: impl Into<String>) -> ModelError {
	ModelError::Invalid {
		section: section.to_string(),
		reason: reason.into(),
	}
}
