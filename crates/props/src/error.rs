use thiserror::Error;

/// Errors raised by the properties store and its text format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropsError {
	/// The requested key is absent from the store.
	#[error("missing key: {0}")]
	MissingKey(String),

	/// The key exists but holds a value of a different type.
	#[error("type mismatch for key '{key}': expected {expected}, got {got}")]
	TypeMismatch {
		/// The offending key.
		key: String,
		/// The requested type name.
		expected: &'static str,
		/// The stored type name.
		got: &'static str,
	},

	/// A line in the text format could not be parsed.
	#[error("syntax error at line {line}: {reason}")]
	Syntax {
		/// 1-based line number in the source text.
		line: usize,
		/// What went wrong.
		reason: String,
	},

	/// A file could not be read.
	#[error("I/O error for '{path}': {reason}")]
	Io {
		/// Path of the file.
		path: String,
		/// Underlying error message.
		reason: String,
	},
}

/// Result type for properties operations.
pub type Result<T> = std::result::Result<T, PropsError>;
