//! Line-oriented rendering of current parameter values.
//!
//! Purpose-built for operator inspection and round-trip persistence of
//! *values only* — the model structure is re-supplied at load time by a
//! matching model source. One `path = value` line per active, value-set
//! parameter, grouped under `[registry="name"]` sections, with optional
//! `#@` header lines.

use std::io::{self, Write};
use std::path::Path;

use bitflags::bitflags;
use tracing::trace;
use vario_props::Properties;

use crate::error::{Result, VariantError};
use crate::registry::Registry;
use crate::repository::Repository;

bitflags! {
	/// Controls optional header lines and tracing during store/load.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
	pub struct IoFlags: u32 {
		/// Emit a `#@title` header line.
		const TITLE = 1 << 0;
		/// Emit `#@description` header lines.
		const DESCRIPTION = 1 << 1;
		/// Trace every stored/loaded value line.
		const TRACE = 1 << 2;
	}
}

const FORMAT_TAG: &str = "vario::profile";

/// Stores and loads value profiles in the line-oriented text format.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiIo {
	flags: IoFlags,
}

impl AsciiIo {
	/// Creates an I/O helper with the given flags.
	pub fn new(flags: IoFlags) -> Self {
		Self { flags }
	}

	/// Writes one registry's active, value-set parameters.
	pub fn store_registry(&self, out: &mut dyn Write, registry: &Registry) -> Result<()> {
		writeln!(out, "#@format {FORMAT_TAG}").map_err(io_err)?;
		if self.flags.contains(IoFlags::TITLE) {
			writeln!(out, "#@title {}", registry.display_name()).map_err(io_err)?;
		}
		if self.flags.contains(IoFlags::DESCRIPTION) && !registry.description().is_empty() {
			writeln!(out, "#@description {}", registry.description()).map_err(io_err)?;
		}
		self.store_registry_body(out, registry)
	}

	fn store_registry_body(&self, out: &mut dyn Write, registry: &Registry) -> Result<()> {
		writeln!(out, "[registry=\"{}\"]", registry.name()).map_err(io_err)?;
		for record_path in registry.list_of_ranked_parameters() {
			let record = registry.get_record(&record_path)?;
			if !(record.is_active() && record.value_is_set()) {
				continue;
			}
			let rendered = registry.render_parameter(&record_path)?;
			if self.flags.contains(IoFlags::TRACE) {
				trace!(registry = registry.name(), path = %record_path, value = %rendered, "store");
			}
			writeln!(out, "{record_path} = {rendered}").map_err(io_err)?;
		}
		Ok(())
	}

	/// Writes every registered registry's values, in registration order.
	pub fn store_repository(&self, out: &mut dyn Write, repository: &Repository) -> Result<()> {
		writeln!(out, "#@format {FORMAT_TAG}").map_err(io_err)?;
		if self.flags.contains(IoFlags::TITLE) {
			writeln!(out, "#@title {}", repository.name()).map_err(io_err)?;
		}
		for name in repository.registry_names() {
			let registry = repository.registry(&name)?;
			let guard = registry.read();
			if self.flags.contains(IoFlags::DESCRIPTION) && !guard.description().is_empty() {
				writeln!(out, "#@description {name}: {}", guard.description()).map_err(io_err)?;
			}
			self.store_registry_body(out, &guard)?;
		}
		Ok(())
	}

	/// Parses a profile stream and applies it to the repository.
	///
	/// The stream's registry sections and parameter paths must match the
	/// repository's current registrations; a mismatch is reported as an
	/// error without partial application.
	pub fn load_repository(&self, text: &str, repository: &Repository) -> Result<()> {
		let mut profile = Properties::new();
		let mut current: Option<String> = None;

		for (idx, raw) in text.lines().enumerate() {
			let line = raw.trim();
			if line.is_empty() {
				continue;
			}
			if let Some(directive) = line.strip_prefix("#@") {
				if let Some(tag) = directive.strip_prefix("format ") {
					if tag.trim() != FORMAT_TAG {
						return Err(VariantError::ProfileMismatch(format!(
							"unsupported format tag '{}'",
							tag.trim()
						)));
					}
				}
				continue;
			}
			if line.starts_with('#') {
				continue;
			}
			if line.starts_with('[') {
				current = Some(parse_registry_header(line, idx + 1)?);
				continue;
			}
			let Some(registry) = &current else {
				return Err(VariantError::ProfileMismatch(format!(
					"line {}: value line outside a registry section",
					idx + 1
				)));
			};
			let (record_path, value_text) = line.split_once('=').ok_or_else(|| {
				VariantError::ProfileMismatch(format!("line {}: expected 'path = value'", idx + 1))
			})?;
			let record_path = record_path.trim();
			let value_text = value_text.trim();
			if self.flags.contains(IoFlags::TRACE) {
				trace!(registry = %registry, path = %record_path, value = %value_text, "load");
			}
			profile.store_string(format!("{registry}:{record_path}"), value_text);
		}

		repository.import_profile(&profile)
	}

	/// Writes a repository profile to a file.
	pub fn store_repository_file(&self, file_path: impl AsRef<Path>, repository: &Repository) -> Result<()> {
		let mut buffer = Vec::new();
		self.store_repository(&mut buffer, repository)?;
		std::fs::write(file_path, buffer).map_err(io_err)
	}

	/// Reads a repository profile from a file and applies it.
	pub fn load_repository_file(&self, file_path: impl AsRef<Path>, repository: &Repository) -> Result<()> {
		let text = std::fs::read_to_string(file_path).map_err(io_err)?;
		self.load_repository(&text, repository)
	}
}

fn io_err(e: io::Error) -> VariantError {
	VariantError::Io(e.to_string())
}

fn parse_registry_header(line: &str, lineno: usize) -> Result<String> {
	line.strip_prefix("[registry=\"")
		.and_then(|rest| rest.strip_suffix("\"]"))
		.map(str::to_string)
		.ok_or_else(|| {
			VariantError::ProfileMismatch(format!("line {lineno}: malformed registry header '{line}'"))
		})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::ModelManager;
	use crate::repository::share;

	const GEOMETRY: &str = r#"
top_variant : string = "geometry.VM"

[name="has_detector.PM" type="parameter"]
type : string = "boolean"
default.value : boolean = false
variants : string[1] = "if_detector"
variants.if_detector.model : string = "detector.VM"
boolean.true.variant : string = "if_detector"

[name="thickness.PM" type="parameter"]
type : string = "real"
real.unit.dimension : string = "length"
real.unit.preferred : string = "mm"
default.value : real = 30.0

[name="detector.VM" type="variant"]
parameters : string[1] = "thickness"
parameters.thickness.model : string = "thickness.PM"

[name="geometry.VM" type="variant"]
parameters : string[1] = "has_detector_0"
parameters.has_detector_0.model : string = "has_detector.PM"
"#;

	fn repository() -> Repository {
		let manager = ModelManager::parse_str(GEOMETRY).unwrap();
		let mut registry = Registry::new();
		registry
			.initialize_from(&manager, "", "geometry", "Geometry", "detector geometry")
			.unwrap();
		let mut repository = Repository::new("setup");
		repository.registration_external(share(registry), "").unwrap();
		repository
	}

	#[test]
	fn store_then_load_round_trips() {
		let source = repository();
		source.set_parameter("geometry:has_detector_0", "true").unwrap();
		source
			.set_parameter("geometry:has_detector_0/if_detector/thickness", "32.4 mm")
			.unwrap();

		let io = AsciiIo::new(IoFlags::TITLE | IoFlags::DESCRIPTION);
		let mut buffer = Vec::new();
		io.store_repository(&mut buffer, &source).unwrap();
		let text = String::from_utf8(buffer).unwrap();
		assert!(text.contains("#@format vario::profile"));
		assert!(text.contains("[registry=\"geometry\"]"));
		assert!(text.contains("has_detector_0/if_detector/thickness = 32.4 mm"));

		let target = repository();
		io.load_repository(&text, &target).unwrap();
		assert_eq!(
			target.export_profile().unwrap(),
			source.export_profile().unwrap()
		);
	}

	#[test]
	fn load_rejects_unknown_registry() {
		let target = repository();
		let text = "#@format vario::profile\n[registry=\"ghost\"]\nx = 1\n";
		assert!(matches!(
			AsciiIo::default().load_repository(text, &target),
			Err(VariantError::ProfileMismatch(_))
		));
	}

	#[test]
	fn load_rejects_unknown_paths_without_applying() {
		let target = repository();
		let text = "\
#@format vario::profile
[registry=\"geometry\"]
has_detector_0 = true
no_such_parameter = 1
";
		assert!(matches!(
			AsciiIo::default().load_repository(text, &target),
			Err(VariantError::ProfileMismatch(_))
		));
		// Partial application did not happen.
		assert_eq!(target.get_parameter("geometry:has_detector_0").unwrap(), "false");
	}

	#[test]
	fn load_rejects_foreign_format_tags() {
		let target = repository();
		assert!(matches!(
			AsciiIo::default().load_repository("#@format somebody::else\n", &target),
			Err(VariantError::ProfileMismatch(_))
		));
	}

	#[test]
	fn file_round_trip() {
		let source = repository();
		source.set_parameter("geometry:has_detector_0", "true").unwrap();

		let dir = tempfile::tempdir().unwrap();
		let file_path = dir.path().join("variants.profile");
		let io = AsciiIo::default();
		io.store_repository_file(&file_path, &source).unwrap();

		let target = repository();
		io.load_repository_file(&file_path, &target).unwrap();
		assert_eq!(
			target.export_profile().unwrap(),
			source.export_profile().unwrap()
		);
	}
}
