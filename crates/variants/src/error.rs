use thiserror::Error;

use crate::model::ModelError;

/// Errors raised by the variant core.
///
/// Structural misuse (double initialization, unknown paths, wrong record
/// kinds) is surfaced as a hard `Err` to the caller. User-data-driven
/// operations wrap these into soft [`Outcome`](crate::command::Outcome)
/// objects at the command boundary instead of aborting a batch.
#[derive(Debug, Error)]
pub enum VariantError {
	/// The registry was already initialized.
	#[error("registry is already initialized")]
	AlreadyInitialized,

	/// The registry was never initialized (or was reset).
	#[error("registry is not initialized")]
	NotInitialized,

	/// No record exists at the given path.
	#[error("unknown record path: '{0}'")]
	UnknownPath(String),

	/// A record already exists at the given path.
	#[error("duplicate record path: '{0}'")]
	DuplicatePath(String),

	/// The path exists but holds the other record kind.
	#[error("record '{path}' is a {actual} record, expected a {expected} record")]
	WrongKind {
		/// The looked-up path.
		path: String,
		/// The requested kind.
		expected: &'static str,
		/// The kind actually stored.
		actual: &'static str,
	},

	/// A supplied value does not match the parameter's declared type.
	#[error("type mismatch for '{path}': expected {expected}, got {got}")]
	TypeMismatch {
		/// The parameter record path.
		path: String,
		/// The declared type name.
		expected: &'static str,
		/// What was supplied.
		got: String,
	},

	/// A numeric value falls outside every declared value group.
	#[error("value {value} is out of range for '{path}'")]
	OutOfRange {
		/// The parameter record path.
		path: String,
		/// Rendering of the rejected value.
		value: String,
	},

	/// A value is not among the parameter's enumerated values.
	#[error("value {value} is not in any value group of '{path}'")]
	NotInValueGroup {
		/// The parameter record path.
		path: String,
		/// Rendering of the rejected value.
		value: String,
	},

	/// No registry is registered under the given name.
	#[error("unknown registry: '{0}'")]
	UnknownRegistry(String),

	/// A registration name collides with an existing one.
	#[error("registry name already used: '{0}'")]
	NameAlreadyUsed(String),

	/// The registry is already mounted in a repository.
	#[error("registry '{registry}' is already mounted in repository '{repository}'")]
	AlreadyMounted {
		/// The registry's own name.
		registry: String,
		/// The repository currently holding it.
		repository: String,
	},

	/// A repository path carries no registry prefix while several registries
	/// are registered, or no registry is registered at all.
	#[error("cannot resolve '{0}': missing registry prefix or no registry registered")]
	AmbiguousOrMissingRegistry(String),

	/// The dependency rules form a cycle.
	#[error("dependency cycle through '{0}'")]
	CyclicDependency(String),

	/// An address string could not be parsed.
	#[error("malformed address '{text}': {reason}")]
	MalformedAddress {
		/// The offending text.
		text: String,
		/// What went wrong.
		reason: String,
	},

	/// The record exists but its ancestor chain does not select it.
	#[error("record '{0}' is not active")]
	InactiveRecord(String),

	/// The parameter's value is fixed by the model.
	#[error("parameter '{0}' is fixed and cannot be set")]
	FixedParameter(String),

	/// The parameter holds no value.
	#[error("parameter '{0}' has no value")]
	UnsetValue(String),

	/// The registry (or repository) is sealed against mutation.
	#[error("'{0}' is locked")]
	Locked(String),

	/// A profile stream or bag does not match the target repository.
	#[error("profile mismatch: {0}")]
	ProfileMismatch(String),

	/// A profile stream could not be read or written.
	#[error("I/O error: {0}")]
	Io(String),

	/// A model description is invalid.
	#[error(transparent)]
	Model(#[from] ModelError),

	/// The underlying carrier failed.
	#[error(transparent)]
	Props(#[from] vario_props::PropsError),
}

/// Result type for variant operations.
pub type Result<T> = std::result::Result<T, VariantError>;
