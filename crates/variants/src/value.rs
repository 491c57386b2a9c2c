//! Typed parameter values and their text forms.

use std::fmt;

use crate::units;

/// The declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
	/// Boolean type.
	Boolean,
	/// Integer type.
	Integer,
	/// Real type, optionally dimensioned.
	Real,
	/// String type.
	String,
}

impl ParameterType {
	/// Returns the type name as spelled in model descriptions.
	pub fn name(self) -> &'static str {
		match self {
			ParameterType::Boolean => "boolean",
			ParameterType::Integer => "integer",
			ParameterType::Real => "real",
			ParameterType::String => "string",
		}
	}

	/// Parses a model-description type name.
	pub fn from_name(name: &str) -> Option<Self> {
		match name {
			"boolean" => Some(ParameterType::Boolean),
			"integer" => Some(ParameterType::Integer),
			"real" => Some(ParameterType::Real),
			"string" => Some(ParameterType::String),
			_ => None,
		}
	}
}

impl fmt::Display for ParameterType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// The unit declaration of a dimensioned real parameter: the dimension its
/// values live in and the preferred symbol for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSpec {
	/// Dimension label, e.g. `length`.
	pub dimension: String,
	/// Preferred display symbol, e.g. `mm`.
	pub preferred: String,
}

/// The current value of a parameter record.
///
/// Real magnitudes are stored in the base unit of their dimension (see
/// [`units`]); rendering converts back to the model's preferred unit.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
	/// Boolean value.
	Boolean(bool),
	/// Integer value.
	Integer(i64),
	/// Real value (base-unit magnitude when dimensioned).
	Real(f64),
	/// String value.
	String(String),
}

impl ParameterValue {
	/// Returns the boolean value if this is a `Boolean` variant.
	pub fn as_boolean(&self) -> Option<bool> {
		match self {
			ParameterValue::Boolean(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Integer` variant.
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			ParameterValue::Integer(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the real value if this is a `Real` variant.
	pub fn as_real(&self) -> Option<f64> {
		match self {
			ParameterValue::Real(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `String` variant.
	pub fn as_string(&self) -> Option<&str> {
		match self {
			ParameterValue::String(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the [`ParameterType`] of this value.
	pub fn parameter_type(&self) -> ParameterType {
		match self {
			ParameterValue::Boolean(_) => ParameterType::Boolean,
			ParameterValue::Integer(_) => ParameterType::Integer,
			ParameterValue::Real(_) => ParameterType::Real,
			ParameterValue::String(_) => ParameterType::String,
		}
	}

	/// Returns true if this value matches the given type.
	pub fn matches_type(&self, ty: ParameterType) -> bool {
		self.parameter_type() == ty
	}

	/// Parses a text form against a declared type.
	///
	/// For dimensioned reals the text may carry a unit symbol (`32.4 mm`);
	/// the symbol must belong to the declared dimension. A bare number is
	/// taken as a base-unit magnitude.
	pub fn parse(text: &str, ty: ParameterType, unit: Option<&UnitSpec>) -> Result<Self, String> {
		let text = text.trim();
		match ty {
			ParameterType::Boolean => parse_boolean(text).map(ParameterValue::Boolean),
			ParameterType::Integer => text
				.parse()
				.map(ParameterValue::Integer)
				.map_err(|_| format!("invalid integer: '{text}'")),
			ParameterType::Real => parse_real(text, unit).map(ParameterValue::Real),
			ParameterType::String => Ok(ParameterValue::String(unquote(text))),
		}
	}

	/// Renders the value back to text, using the preferred unit when given.
	///
	/// `parse(render(v)) == v` for any value produced by `parse` with the
	/// same type and unit declaration.
	pub fn render(&self, unit: Option<&UnitSpec>) -> String {
		match self {
			ParameterValue::Boolean(v) => v.to_string(),
			ParameterValue::Integer(v) => v.to_string(),
			ParameterValue::Real(v) => match unit.and_then(|u| units::find(&u.preferred)) {
				Some(u) => format!("{} {}", v / u.factor, u.symbol),
				None => v.to_string(),
			},
			ParameterValue::String(v) => format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")),
		}
	}
}

/// Parses a boolean from common spellings.
fn parse_boolean(text: &str) -> Result<bool, String> {
	match text.to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		_ => Err(format!(
			"invalid boolean: '{text}' (expected true/false, yes/no, on/off, 1/0)"
		)),
	}
}

fn parse_real(text: &str, unit: Option<&UnitSpec>) -> Result<f64, String> {
	let mut parts = text.split_whitespace();
	let number = parts.next().ok_or_else(|| "empty real value".to_string())?;
	let magnitude: f64 = number
		.parse()
		.map_err(|_| format!("invalid real: '{number}'"))?;
	match (parts.next(), unit) {
		(None, _) => Ok(magnitude),
		(Some(symbol), Some(spec)) => {
			let unit = units::find(symbol).ok_or_else(|| format!("unknown unit: '{symbol}'"))?;
			if unit.dimension != spec.dimension {
				return Err(format!(
					"unit '{symbol}' has dimension {}, expected {}",
					unit.dimension, spec.dimension
				));
			}
			Ok(magnitude * unit.factor)
		}
		(Some(symbol), None) => Err(format!("unexpected unit '{symbol}' on dimensionless real")),
	}
}

/// Strips surrounding double quotes and unescapes, if present.
fn unquote(text: &str) -> String {
	let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) else {
		return text.to_string();
	};
	let mut out = String::with_capacity(inner.len());
	let mut chars = inner.chars();
	while let Some(c) = chars.next() {
		if c == '\\' {
			if let Some(next) = chars.next() {
				out.push(next);
			}
		} else {
			out.push(c);
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn length_mm() -> UnitSpec {
		UnitSpec {
			dimension: "length".into(),
			preferred: "mm".into(),
		}
	}

	#[test]
	fn parse_booleans() {
		for text in ["true", "1", "yes", "on", "TRUE"] {
			assert_eq!(
				ParameterValue::parse(text, ParameterType::Boolean, None).unwrap(),
				ParameterValue::Boolean(true)
			);
		}
		assert!(ParameterValue::parse("maybe", ParameterType::Boolean, None).is_err());
	}

	#[test]
	fn parse_real_with_unit() {
		let spec = length_mm();
		let v = ParameterValue::parse("32.4 mm", ParameterType::Real, Some(&spec)).unwrap();
		assert_eq!(v, ParameterValue::Real(32.4));

		let v = ParameterValue::parse("3.5 cm", ParameterType::Real, Some(&spec)).unwrap();
		assert_eq!(v, ParameterValue::Real(35.0));

		assert!(ParameterValue::parse("3 s", ParameterType::Real, Some(&spec)).is_err());
		assert!(ParameterValue::parse("3 cubit", ParameterType::Real, Some(&spec)).is_err());
	}

	#[test]
	fn render_round_trips() {
		let spec = length_mm();
		let v = ParameterValue::parse("32.4 mm", ParameterType::Real, Some(&spec)).unwrap();
		let text = v.render(Some(&spec));
		assert_eq!(text, "32.4 mm");
		assert_eq!(
			ParameterValue::parse(&text, ParameterType::Real, Some(&spec)).unwrap(),
			v
		);

		let s = ParameterValue::String("say \"hi\"".into());
		let text = s.render(None);
		assert_eq!(
			ParameterValue::parse(&text, ParameterType::String, None).unwrap(),
			s
		);
	}

	#[test]
	fn strings_accept_bare_text() {
		assert_eq!(
			ParameterValue::parse("copper", ParameterType::String, None).unwrap(),
			ParameterValue::String("copper".into())
		);
	}
}
