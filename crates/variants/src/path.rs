//! Slash-separated record addressing.
//!
//! A local address names a record inside one registry: `segment(/segment)*`,
//! each segment optionally carrying a `[index]` repeat suffix. A global
//! address prefixes a registry name: `registry:local/path`. The root record
//! of every registry is the sentinel path `/`, which never appears nested
//! inside another path.

use std::fmt;

use crate::error::{Result, VariantError};

/// The sentinel path of a registry's top variant record.
pub const ROOT_PATH: &str = "/";

/// One segment of a path: a name plus an optional repeat index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
	/// Segment name.
	pub name: String,
	/// Repeat index, for parameters declared with an occurrence count.
	pub index: Option<u32>,
}

impl fmt::Display for PathSegment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.index {
			Some(i) => write!(f, "{}[{i}]", self.name),
			None => write!(f, "{}", self.name),
		}
	}
}

/// A parsed record address, local or global.
///
/// Parsing and formatting round-trip exactly: for every valid address string
/// `s`, `PathAddress::parse(s)?.to_string() == s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAddress {
	registry: Option<String>,
	segments: Vec<PathSegment>,
}

impl PathAddress {
	/// Parses an address, accepting an optional `registry:` prefix.
	pub fn parse(text: &str) -> Result<Self> {
		Self::parse_inner(text, true)
	}

	/// Parses an address in local-only mode; a `registry:` prefix is rejected.
	pub fn parse_local(text: &str) -> Result<Self> {
		Self::parse_inner(text, false)
	}

	fn parse_inner(text: &str, allow_global: bool) -> Result<Self> {
		let malformed = |reason: &str| VariantError::MalformedAddress {
			text: text.to_string(),
			reason: reason.to_string(),
		};

		if text.is_empty() {
			return Err(malformed("empty address"));
		}

		let (registry, local) = match text.split_once(':') {
			Some((reg, rest)) => {
				if !allow_global {
					return Err(malformed("registry prefix not allowed here"));
				}
				if reg.is_empty() {
					return Err(malformed("empty registry name"));
				}
				if !reg.chars().all(is_name_char) {
					return Err(malformed("invalid character in registry name"));
				}
				(Some(reg.to_string()), rest)
			}
			None => (None, text),
		};

		if local == ROOT_PATH {
			return Ok(Self {
				registry,
				segments: Vec::new(),
			});
		}
		if local.is_empty() {
			return Err(malformed("empty local path"));
		}

		let mut segments = Vec::new();
		for part in local.split('/') {
			if part.is_empty() {
				return Err(malformed("empty path segment"));
			}
			segments.push(parse_segment(part).map_err(|reason| malformed(&reason))?);
		}
		Ok(Self { registry, segments })
	}

	/// True if the address carries no registry prefix.
	pub fn is_local(&self) -> bool {
		self.registry.is_none()
	}

	/// True if the address carries a registry prefix.
	pub fn is_global(&self) -> bool {
		self.registry.is_some()
	}

	/// The registry prefix, if any.
	pub fn registry_name(&self) -> Option<&str> {
		self.registry.as_deref()
	}

	/// The path segments (empty for the root sentinel).
	pub fn segments(&self) -> &[PathSegment] {
		&self.segments
	}

	/// Formats the local part of the address (without a registry prefix).
	pub fn local_path(&self) -> String {
		if self.segments.is_empty() {
			return ROOT_PATH.to_string();
		}
		self.segments
			.iter()
			.map(PathSegment::to_string)
			.collect::<Vec<_>>()
			.join("/")
	}
}

impl fmt::Display for PathAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.registry {
			Some(reg) => write!(f, "{reg}:{}", self.local_path()),
			None => write!(f, "{}", self.local_path()),
		}
	}
}

fn is_name_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn parse_segment(part: &str) -> std::result::Result<PathSegment, String> {
	let (name, index) = match part.split_once('[') {
		None => (part, None),
		Some((name, rest)) => {
			let digits = rest
				.strip_suffix(']')
				.ok_or_else(|| format!("unterminated index in segment '{part}'"))?;
			let index: u32 = digits
				.parse()
				.map_err(|_| format!("invalid index '{digits}' in segment '{part}'"))?;
			(name, Some(index))
		}
	};
	if name.is_empty() {
		return Err(format!("empty name in segment '{part}'"));
	}
	if !name.chars().all(is_name_char) {
		return Err(format!("invalid character in segment '{name}'"));
	}
	Ok(PathSegment {
		name: name.to_string(),
		index,
	})
}

/// Joins a parent record path and a daughter's local name.
///
/// The root sentinel is never used as a prefix: daughters of `/` are
/// addressed by their bare local name.
pub fn join(parent: &str, leaf: &str) -> String {
	if parent == ROOT_PATH {
		leaf.to_string()
	} else {
		format!("{parent}/{leaf}")
	}
}

/// Returns the parent record path, or `None` for the root sentinel.
pub fn parent_of(path: &str) -> Option<&str> {
	if path == ROOT_PATH {
		return None;
	}
	match path.rfind('/') {
		Some(pos) => Some(&path[..pos]),
		None => Some(ROOT_PATH),
	}
}

/// Returns the last segment of a record path.
pub fn leaf_of(path: &str) -> &str {
	match path.rfind('/') {
		Some(pos) => &path[pos + 1..],
		None => path,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_format_round_trip() {
		for text in [
			"/",
			"has_detector_0",
			"has_detector_0/if_detector/thickness",
			"seeds[3]",
			"core/slots[0]/width",
			"geometry:/",
			"geometry:has_detector_0/if_detector/thickness",
			"radioactivity:sources[1]",
		] {
			let address = PathAddress::parse(text).unwrap();
			assert_eq!(address.to_string(), text, "round trip failed for {text}");
		}
	}

	#[test]
	fn global_parts() {
		let address = PathAddress::parse("geometry:a/b[2]").unwrap();
		assert!(address.is_global());
		assert_eq!(address.registry_name(), Some("geometry"));
		assert_eq!(address.local_path(), "a/b[2]");
		assert_eq!(address.segments()[1].index, Some(2));
	}

	#[test]
	fn local_only_mode_rejects_prefix() {
		assert!(PathAddress::parse_local("a/b").is_ok());
		assert!(matches!(
			PathAddress::parse_local("geometry:a/b"),
			Err(VariantError::MalformedAddress { .. })
		));
	}

	#[test]
	fn malformed_addresses() {
		for text in ["", "a//b", "a/", "/a", "a[x]", "a[1", "a[-1]", ":a", "a b"] {
			assert!(
				matches!(
					PathAddress::parse(text),
					Err(VariantError::MalformedAddress { .. })
				),
				"expected failure for {text:?}"
			);
		}
	}

	#[test]
	fn join_and_parent() {
		assert_eq!(join(ROOT_PATH, "a"), "a");
		assert_eq!(join("a", "b"), "a/b");
		assert_eq!(parent_of("/"), None);
		assert_eq!(parent_of("a"), Some(ROOT_PATH));
		assert_eq!(parent_of("a/b/c"), Some("a/b"));
		assert_eq!(leaf_of("a/b[2]"), "b[2]");
		assert_eq!(leaf_of("a"), "a");
	}
}
