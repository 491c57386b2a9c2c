//! Line-level parsing shared by [`Properties`](crate::Properties) and
//! [`MultiProperties`](crate::MultiProperties).

use crate::error::{PropsError, Result};
use crate::value::Value;

fn syntax(line: usize, reason: impl Into<String>) -> PropsError {
	PropsError::Syntax {
		line,
		reason: reason.into(),
	}
}

/// Parses one `key : type = value` entry line.
pub(crate) fn parse_entry(text: &str, line: usize) -> Result<(String, Value)> {
	let (key, rest) = text
		.split_once(':')
		.ok_or_else(|| syntax(line, "expected 'key : type = value'"))?;
	let key = key.trim();
	if key.is_empty() {
		return Err(syntax(line, "empty key"));
	}
	if key.chars().any(char::is_whitespace) {
		return Err(syntax(line, format!("key '{key}' contains whitespace")));
	}

	let (type_spec, value_text) = rest
		.split_once('=')
		.ok_or_else(|| syntax(line, "missing '=' after type"))?;
	let (type_name, count) = parse_type_spec(type_spec.trim(), line)?;
	let tokens = tokenize(value_text.trim(), line)?;

	let value = match count {
		None => {
			if tokens.len() != 1 {
				return Err(syntax(
					line,
					format!("expected one value, got {}", tokens.len()),
				));
			}
			scalar(&tokens[0], type_name, line)?
		}
		Some(n) => {
			if tokens.len() != n {
				return Err(syntax(
					line,
					format!("expected {n} values, got {}", tokens.len()),
				));
			}
			vector(&tokens, type_name, line)?
		}
	};

	Ok((key.to_string(), value))
}

/// Splits `type` / `type[N]` into the base type and optional vector length.
fn parse_type_spec(spec: &str, line: usize) -> Result<(&str, Option<usize>)> {
	match spec.split_once('[') {
		None => Ok((spec, None)),
		Some((base, rest)) => {
			let digits = rest
				.strip_suffix(']')
				.ok_or_else(|| syntax(line, "unterminated '[' in type"))?;
			let n: usize = digits
				.parse()
				.map_err(|_| syntax(line, format!("invalid vector length '{digits}'")))?;
			Ok((base, Some(n)))
		}
	}
}

fn scalar(token: &Token, type_name: &str, line: usize) -> Result<Value> {
	match type_name {
		"boolean" => parse_bool(token, line).map(Value::Bool),
		"integer" => parse_int(token, line).map(Value::Int),
		"real" => parse_real(token, line).map(Value::Real),
		"string" => parse_string(token, line).map(Value::Str),
		other => Err(syntax(line, format!("unknown type '{other}'"))),
	}
}

fn vector(tokens: &[Token], type_name: &str, line: usize) -> Result<Value> {
	match type_name {
		"boolean" => tokens
			.iter()
			.map(|t| parse_bool(t, line))
			.collect::<Result<_>>()
			.map(Value::BoolVec),
		"integer" => tokens
			.iter()
			.map(|t| parse_int(t, line))
			.collect::<Result<_>>()
			.map(Value::IntVec),
		"real" => tokens
			.iter()
			.map(|t| parse_real(t, line))
			.collect::<Result<_>>()
			.map(Value::RealVec),
		"string" => tokens
			.iter()
			.map(|t| parse_string(t, line))
			.collect::<Result<_>>()
			.map(Value::StrVec),
		other => Err(syntax(line, format!("unknown type '{other}'"))),
	}
}

fn parse_bool(token: &Token, line: usize) -> Result<bool> {
	match token.text.as_str() {
		"true" | "1" => Ok(true),
		"false" | "0" => Ok(false),
		other => Err(syntax(line, format!("invalid boolean '{other}'"))),
	}
}

fn parse_int(token: &Token, line: usize) -> Result<i64> {
	token
		.text
		.parse()
		.map_err(|_| syntax(line, format!("invalid integer '{}'", token.text)))
}

fn parse_real(token: &Token, line: usize) -> Result<f64> {
	token
		.text
		.parse()
		.map_err(|_| syntax(line, format!("invalid real '{}'", token.text)))
}

fn parse_string(token: &Token, line: usize) -> Result<String> {
	if !token.quoted {
		return Err(syntax(
			line,
			format!("string value '{}' must be double-quoted", token.text),
		));
	}
	Ok(token.text.clone())
}

/// A whitespace-separated token of the value field. Quoted tokens may contain
/// spaces and escaped quotes.
pub(crate) struct Token {
	pub text: String,
	pub quoted: bool,
}

/// Splits a value field into tokens, honoring double quotes and escapes.
pub(crate) fn tokenize(text: &str, line: usize) -> Result<Vec<Token>> {
	let mut tokens = Vec::new();
	let mut chars = text.chars().peekable();
	while let Some(&c) = chars.peek() {
		if c.is_whitespace() {
			chars.next();
			continue;
		}
		if c == '"' {
			chars.next();
			let mut out = String::new();
			let mut closed = false;
			while let Some(c) = chars.next() {
				match c {
					'\\' => match chars.next() {
						Some('"') => out.push('"'),
						Some('\\') => out.push('\\'),
						Some(other) => {
							return Err(syntax(line, format!("invalid escape '\\{other}'")));
						}
						None => return Err(syntax(line, "dangling escape at end of line")),
					},
					'"' => {
						closed = true;
						break;
					}
					other => out.push(other),
				}
			}
			if !closed {
				return Err(syntax(line, "unterminated string literal"));
			}
			tokens.push(Token {
				text: out,
				quoted: true,
			});
		} else {
			let mut out = String::new();
			while let Some(&c) = chars.peek() {
				if c.is_whitespace() {
					break;
				}
				out.push(c);
				chars.next();
			}
			tokens.push(Token {
				text: out,
				quoted: false,
			});
		}
	}
	Ok(tokens)
}

/// Parses a `[name="..." type="..."]` section header.
pub(crate) fn parse_section_header(text: &str, line: usize) -> Result<(String, String)> {
	let inner = text
		.strip_prefix('[')
		.and_then(|t| t.strip_suffix(']'))
		.ok_or_else(|| syntax(line, "malformed section header"))?;

	let mut name = None;
	let mut kind = None;
	for field in split_header_fields(inner, line)? {
		let (fkey, fval) = field;
		match fkey.as_str() {
			"name" => name = Some(fval),
			"type" => kind = Some(fval),
			other => return Err(syntax(line, format!("unknown header field '{other}'"))),
		}
	}
	let name = name.ok_or_else(|| syntax(line, "section header missing 'name'"))?;
	Ok((name, kind.unwrap_or_default()))
}

fn split_header_fields(inner: &str, line: usize) -> Result<Vec<(String, String)>> {
	let mut fields = Vec::new();
	for part in inner.split_whitespace() {
		let (key, raw) = part
			.split_once('=')
			.ok_or_else(|| syntax(line, format!("expected key=\"value\", got '{part}'")))?;
		let val = raw
			.strip_prefix('"')
			.and_then(|v| v.strip_suffix('"'))
			.ok_or_else(|| syntax(line, format!("header value for '{key}' must be quoted")))?;
		fields.push((key.to_string(), val.to_string()));
	}
	Ok(fields)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scalar_entries() {
		let (k, v) = parse_entry(r#"flag : boolean = true"#, 1).unwrap();
		assert_eq!(k, "flag");
		assert_eq!(v, Value::Bool(true));

		let (_, v) = parse_entry(r#"n : integer = -4"#, 1).unwrap();
		assert_eq!(v, Value::Int(-4));

		let (_, v) = parse_entry(r#"x : real = 2.5"#, 1).unwrap();
		assert_eq!(v, Value::Real(2.5));

		let (_, v) = parse_entry(r#"s : string = "a b""#, 1).unwrap();
		assert_eq!(v, Value::Str("a b".into()));
	}

	#[test]
	fn vector_entries() {
		let (_, v) = parse_entry(r#"tags : string[2] = "a" "b c""#, 1).unwrap();
		assert_eq!(v, Value::StrVec(vec!["a".into(), "b c".into()]));

		let (_, v) = parse_entry("ids : integer[3] = 1 2 3", 1).unwrap();
		assert_eq!(v, Value::IntVec(vec![1, 2, 3]));
	}

	#[test]
	fn vector_length_mismatch() {
		let err = parse_entry("ids : integer[3] = 1 2", 7).unwrap_err();
		assert!(matches!(err, PropsError::Syntax { line: 7, .. }));
	}

	#[test]
	fn unquoted_string_rejected() {
		assert!(parse_entry("s : string = bare", 1).is_err());
	}

	#[test]
	fn section_headers() {
		let (name, kind) = parse_section_header(r#"[name="core.VM" type="variant"]"#, 1).unwrap();
		assert_eq!(name, "core.VM");
		assert_eq!(kind, "variant");

		assert!(parse_section_header("[name=core]", 1).is_err());
	}
}
