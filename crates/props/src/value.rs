use std::fmt;

/// A typed value held by a [`Properties`](crate::Properties) store.
///
/// Scalars and homogeneous vectors of the four carrier types. The text format
/// tags every entry with its type, so values never change type in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Boolean value (true/false).
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Real value.
	Real(f64),
	/// String value.
	Str(String),
	/// Vector of booleans.
	BoolVec(Vec<bool>),
	/// Vector of integers.
	IntVec(Vec<i64>),
	/// Vector of reals.
	RealVec(Vec<f64>),
	/// Vector of strings.
	StrVec(Vec<String>),
}

impl Value {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the real value if this is a `Real` variant.
	pub fn as_real(&self) -> Option<f64> {
		match self {
			Value::Real(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `Str` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the string vector if this is a `StrVec` variant.
	pub fn as_str_vec(&self) -> Option<&[String]> {
		match self {
			Value::StrVec(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the boolean vector if this is a `BoolVec` variant.
	pub fn as_bool_vec(&self) -> Option<&[bool]> {
		match self {
			Value::BoolVec(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the integer vector if this is an `IntVec` variant.
	pub fn as_int_vec(&self) -> Option<&[i64]> {
		match self {
			Value::IntVec(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the real vector if this is a `RealVec` variant.
	pub fn as_real_vec(&self) -> Option<&[f64]> {
		match self {
			Value::RealVec(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the type name of this value, as spelled in the text format.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Bool(_) | Value::BoolVec(_) => "boolean",
			Value::Int(_) | Value::IntVec(_) => "integer",
			Value::Real(_) | Value::RealVec(_) => "real",
			Value::Str(_) | Value::StrVec(_) => "string",
		}
	}

	/// Returns the vector length, or `None` for scalars.
	pub fn len(&self) -> Option<usize> {
		match self {
			Value::BoolVec(v) => Some(v.len()),
			Value::IntVec(v) => Some(v.len()),
			Value::RealVec(v) => Some(v.len()),
			Value::StrVec(v) => Some(v.len()),
			_ => None,
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Real(v)
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Str(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Str(v.to_string())
	}
}

/// Quotes and escapes a string for the text format.
pub(crate) fn quote(s: &str) -> String {
	let mut out = String::with_capacity(s.len() + 2);
	out.push('"');
	for c in s.chars() {
		match c {
			'"' => out.push_str("\\\""),
			'\\' => out.push_str("\\\\"),
			_ => out.push(c),
		}
	}
	out.push('"');
	out
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fn join<T, F: Fn(&T) -> String>(items: &[T], render: F) -> String {
			items.iter().map(render).collect::<Vec<_>>().join(" ")
		}
		match self {
			Value::Bool(v) => write!(f, "{v}"),
			Value::Int(v) => write!(f, "{v}"),
			Value::Real(v) => write!(f, "{v}"),
			Value::Str(v) => write!(f, "{}", quote(v)),
			Value::BoolVec(v) => write!(f, "{}", join(v, |b| b.to_string())),
			Value::IntVec(v) => write!(f, "{}", join(v, |i| i.to_string())),
			Value::RealVec(v) => write!(f, "{}", join(v, |r| r.to_string())),
			Value::StrVec(v) => write!(f, "{}", join(v, |s| quote(s))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accessors_match_variants() {
		assert_eq!(Value::Bool(true).as_bool(), Some(true));
		assert_eq!(Value::Int(3).as_int(), Some(3));
		assert_eq!(Value::Real(1.5).as_real(), Some(1.5));
		assert_eq!(Value::from("abc").as_str(), Some("abc"));
		assert_eq!(Value::Int(3).as_bool(), None);
	}

	#[test]
	fn display_quotes_strings() {
		assert_eq!(Value::from("a \"b\"").to_string(), r#""a \"b\"""#);
		assert_eq!(
			Value::StrVec(vec!["a".into(), "b".into()]).to_string(),
			r#""a" "b""#
		);
	}
}
