use std::fmt;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{PropsError, Result};
use crate::parse;
use crate::properties::Properties;
use crate::value::quote;

/// One named, typed section of a [`MultiProperties`] source.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
	/// Section name from the `name="..."` header field.
	pub name: String,
	/// Section type from the `type="..."` header field (may be empty).
	pub kind: String,
	/// The section's key/value entries.
	pub props: Properties,
}

/// A sectioned properties source: an optional header block followed by
/// `[name="..." type="..."]` sections, each holding a [`Properties`] block.
///
/// Section order is declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiProperties {
	header: Properties,
	sections: IndexMap<String, Section>,
}

impl MultiProperties {
	/// Creates an empty source.
	pub fn new() -> Self {
		Self::default()
	}

	/// Entries appearing before the first section header.
	pub fn header(&self) -> &Properties {
		&self.header
	}

	/// Mutable access to the header block.
	pub fn header_mut(&mut self) -> &mut Properties {
		&mut self.header
	}

	/// Returns true if a section named `name` exists.
	pub fn has_section(&self, name: &str) -> bool {
		self.sections.contains_key(name)
	}

	/// Returns the section named `name`, if any.
	pub fn get(&self, name: &str) -> Option<&Section> {
		self.sections.get(name)
	}

	/// Iterates sections in declaration order.
	pub fn sections(&self) -> impl Iterator<Item = &Section> {
		self.sections.values()
	}

	/// Number of sections.
	pub fn len(&self) -> usize {
		self.sections.len()
	}

	/// True if no sections are present.
	pub fn is_empty(&self) -> bool {
		self.sections.is_empty()
	}

	/// Appends a section, replacing any section with the same name.
	pub fn add_section(&mut self, name: impl Into<String>, kind: impl Into<String>, props: Properties) {
		let name = name.into();
		self.sections.insert(
			name.clone(),
			Section {
				name,
				kind: kind.into(),
				props,
			},
		);
	}

	/// Parses the sectioned text format.
	pub fn parse_str(text: &str) -> Result<Self> {
		let mut multi = Self::new();
		let mut current: Option<Section> = None;

		for (idx, raw) in text.lines().enumerate() {
			let line = raw.trim();
			if line.is_empty() || line.starts_with('#') {
				continue;
			}
			if line.starts_with('[') {
				if let Some(done) = current.take() {
					multi.sections.insert(done.name.clone(), done);
				}
				let (name, kind) = parse::parse_section_header(line, idx + 1)?;
				current = Some(Section {
					name,
					kind,
					props: Properties::new(),
				});
				continue;
			}
			let (key, value) = parse::parse_entry(line, idx + 1)?;
			match &mut current {
				Some(section) => section.props.store(key, value),
				None => multi.header.store(key, value),
			}
		}
		if let Some(done) = current.take() {
			multi.sections.insert(done.name.clone(), done);
		}
		Ok(multi)
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

impl fmt::Display for MultiProperties {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if !self.header.is_empty() {
			write!(f, "{}", self.header)?;
			writeln!(f)?;
		}
		for section in self.sections.values() {
			if section.kind.is_empty() {
				writeln!(f, "[name={}]", quote(&section.name))?;
			} else {
				writeln!(f, "[name={} type={}]", quote(&section.name), quote(&section.kind))?;
			}
			write!(f, "{}", section.props)?;
			writeln!(f)?;
		}
		Ok(())
	}
}
