use std::fmt;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{PropsError, Result};
use crate::parse;
use crate::value::Value;

/// An ordered `key → Value` store with a line-oriented text format.
///
/// Iteration order is insertion order; the order of a parsed file is the
/// order of its lines. Consumers that treat declaration order as meaningful
/// (ranked enumeration, profile application) rely on this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
	entries: IndexMap<String, Value>,
}

impl Properties {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns true if `key` is present.
	pub fn has_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Returns true if `key` is present, boolean, and true.
	pub fn has_flag(&self, key: &str) -> bool {
		matches!(self.entries.get(key), Some(Value::Bool(true)))
	}

	/// Returns the raw value for `key`, if any.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries.get(key)
	}

	/// Fetches a boolean value.
	pub fn fetch_boolean(&self, key: &str) -> Result<bool> {
		self.typed(key, "boolean", Value::as_bool)
	}

	/// Fetches an integer value.
	pub fn fetch_integer(&self, key: &str) -> Result<i64> {
		self.typed(key, "integer", Value::as_int)
	}

	/// Fetches a real value.
	pub fn fetch_real(&self, key: &str) -> Result<f64> {
		self.typed(key, "real", Value::as_real)
	}

	/// Fetches a string value.
	pub fn fetch_string(&self, key: &str) -> Result<String> {
		self.typed(key, "string", |v| v.as_str().map(str::to_string))
	}

	/// Fetches a string vector.
	pub fn fetch_string_vec(&self, key: &str) -> Result<Vec<String>> {
		self.typed(key, "string[]", |v| v.as_str_vec().map(<[String]>::to_vec))
	}

	/// Fetches an integer vector.
	pub fn fetch_integer_vec(&self, key: &str) -> Result<Vec<i64>> {
		self.typed(key, "integer[]", |v| v.as_int_vec().map(<[i64]>::to_vec))
	}

	/// Fetches a real vector.
	pub fn fetch_real_vec(&self, key: &str) -> Result<Vec<f64>> {
		self.typed(key, "real[]", |v| v.as_real_vec().map(<[f64]>::to_vec))
	}

	/// Fetches a boolean vector.
	pub fn fetch_boolean_vec(&self, key: &str) -> Result<Vec<bool>> {
		self.typed(key, "boolean[]", |v| v.as_bool_vec().map(<[bool]>::to_vec))
	}

	fn typed<T>(&self, key: &str, expected: &'static str, pick: impl Fn(&Value) -> Option<T>) -> Result<T> {
		let value = self
			.entries
			.get(key)
			.ok_or_else(|| PropsError::MissingKey(key.to_string()))?;
		pick(value).ok_or_else(|| PropsError::TypeMismatch {
			key: key.to_string(),
			expected,
			got: value.type_name(),
		})
	}

	/// Stores a value under `key`, replacing any previous entry.
	pub fn store(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.entries.insert(key.into(), value.into());
	}

	/// Stores a boolean.
	pub fn store_boolean(&mut self, key: impl Into<String>, value: bool) {
		self.store(key, value);
	}

	/// Stores an integer.
	pub fn store_integer(&mut self, key: impl Into<String>, value: i64) {
		self.store(key, value);
	}

	/// Stores a real.
	pub fn store_real(&mut self, key: impl Into<String>, value: f64) {
		self.store(key, value);
	}

	/// Stores a string.
	pub fn store_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.store(key, Value::Str(value.into()));
	}

	/// Removes an entry, returning its value if present.
	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.entries.shift_remove(key)
	}

	/// Iterates keys in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Iterates `(key, value)` pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True if no entries are stored.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Parses the text format: `key : type = value` lines, `#` comments.
	pub fn parse_str(text: &str) -> Result<Self> {
		let mut props = Self::new();
		for (idx, raw) in text.lines().enumerate() {
			let line = raw.trim();
			if line.is_empty() || line.starts_with('#') {
				continue;
			}
			let (key, value) = parse::parse_entry(line, idx + 1)?;
			props.entries.insert(key, value);
		}
		Ok(props)
	}

	/// Reads and parses a file.
	pub fn parse_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|e| PropsError::Io {
			path: path.display().to_string(),
			reason: e.to_string(),
		})?;
		Self::parse_str(&text)
	}
}

impl fmt::Display for Properties {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (key, value) in &self.entries {
			let type_decl = match value.len() {
				Some(n) => format!("{}[{n}]", value.type_name()),
				None => value.type_name().to_string(),
			};
			writeln!(f, "{key} : {type_decl} = {value}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	const SAMPLE: &str = r#"
# sample store
debug : boolean = true
count : integer = 12
ratio : real = 0.75
label : string = "plate A"
names : string[2] = "left" "right"
"#;

	#[test]
	fn parse_and_fetch() {
		let props = Properties::parse_str(SAMPLE).unwrap();
		assert!(props.has_key("debug"));
		assert!(props.has_flag("debug"));
		assert_eq!(props.fetch_integer("count").unwrap(), 12);
		assert_eq!(props.fetch_real("ratio").unwrap(), 0.75);
		assert_eq!(props.fetch_string("label").unwrap(), "plate A");
		assert_eq!(
			props.fetch_string_vec("names").unwrap(),
			vec!["left".to_string(), "right".to_string()]
		);
	}

	#[test]
	fn fetch_errors() {
		let props = Properties::parse_str(SAMPLE).unwrap();
		assert_eq!(
			props.fetch_boolean("missing"),
			Err(PropsError::MissingKey("missing".into()))
		);
		assert!(matches!(
			props.fetch_boolean("count"),
			Err(PropsError::TypeMismatch { .. })
		));
	}

	#[test]
	fn keys_preserve_declaration_order() {
		let props = Properties::parse_str(SAMPLE).unwrap();
		let keys: Vec<_> = props.keys().collect();
		assert_eq!(keys, vec!["debug", "count", "ratio", "label", "names"]);
	}

	#[test]
	fn display_round_trips() {
		let props = Properties::parse_str(SAMPLE).unwrap();
		let text = props.to_string();
		let reparsed = Properties::parse_str(&text).unwrap();
		assert_eq!(props, reparsed);
	}
}
