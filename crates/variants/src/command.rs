//! The soft-failure command boundary.
//!
//! Structural misuse stays a hard `Err` inside the core; user-data-driven
//! operations (a CLI or script driving value changes) go through `cmd_*`
//! wrappers that capture success or failure into an [`Outcome`], so a batch
//! of attempts can proceed and inspect each failure individually.

use crate::error::VariantError;
use crate::registry::{RecordFilter, Registry};
use crate::repository::Repository;

/// Result object of a command: success flag, error message on failure, and
/// an optional returned value for query commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
	success: bool,
	message: Option<String>,
	value: Option<String>,
}

impl Outcome {
	/// A successful outcome with no returned value.
	pub fn ok() -> Self {
		Self {
			success: true,
			message: None,
			value: None,
		}
	}

	/// A successful outcome carrying a returned value.
	pub fn ok_with_value(value: impl Into<String>) -> Self {
		Self {
			success: true,
			message: None,
			value: Some(value.into()),
		}
	}

	/// A failed outcome carrying a human-readable message.
	pub fn failure(message: impl Into<String>) -> Self {
		Self {
			success: false,
			message: Some(message.into()),
			value: None,
		}
	}

	/// True if the command succeeded.
	pub fn is_success(&self) -> bool {
		self.success
	}

	/// The failure message, if the command failed.
	pub fn error_message(&self) -> Option<&str> {
		self.message.as_deref()
	}

	/// The returned value, for query commands.
	pub fn value(&self) -> Option<&str> {
		self.value.as_deref()
	}
}

/// Appends a "did you mean" hint for unknown paths, when a registered path
/// is close enough.
fn describe(error: &VariantError, suggestion: Option<String>) -> String {
	match suggestion {
		Some(hint) => format!("{error} (did you mean '{hint}'?)"),
		None => error.to_string(),
	}
}

fn suggest_path(registry: &Registry, wanted: &str) -> Option<String> {
	registry
		.list_of_ranked_records(RecordFilter::all())
		.into_iter()
		.min_by_key(|p| strsim::levenshtein(wanted, p))
		.filter(|p| strsim::levenshtein(wanted, p) <= 3)
}

fn suggestion_for(registry: &Registry, error: &VariantError) -> Option<String> {
	match error {
		VariantError::UnknownPath(p) => suggest_path(registry, p),
		_ => None,
	}
}

impl Registry {
	/// Attempts to set a parameter value from its text form.
	pub fn cmd_set_parameter_value(&mut self, record_path: &str, value_text: &str) -> Outcome {
		match self.set_parameter_value_from_string(record_path, value_text) {
			Ok(()) => Outcome::ok(),
			Err(e) => {
				let hint = suggestion_for(self, &e);
				Outcome::failure(describe(&e, hint))
			}
		}
	}

	/// Attempts to render a parameter's current value.
	pub fn cmd_get_parameter_value(&self, record_path: &str) -> Outcome {
		match self.render_parameter(record_path) {
			Ok(rendered) => Outcome::ok_with_value(rendered),
			Err(e) => {
				let hint = suggestion_for(self, &e);
				Outcome::failure(describe(&e, hint))
			}
		}
	}

	/// Reports whether a variant record is currently active.
	pub fn cmd_is_active_variant(&self, record_path: &str) -> Outcome {
		match self
			.get_variant_record(record_path)
			.map(|record| record.is_active())
		{
			Ok(active) => Outcome::ok_with_value(active.to_string()),
			Err(e) => {
				let hint = suggestion_for(self, &e);
				Outcome::failure(describe(&e, hint))
			}
		}
	}

	/// Reports whether a parameter record exists at the given path.
	pub fn cmd_has_parameter(&self, record_path: &str) -> Outcome {
		Outcome::ok_with_value(self.get_parameter_record(record_path).is_ok().to_string())
	}
}

impl Repository {
	fn run<T>(
		&self,
		address: &str,
		op: impl FnOnce(&mut Registry, &str) -> crate::error::Result<T>,
		render: impl FnOnce(T) -> Outcome,
	) -> Outcome {
		let (reg_name, local) = match self.resolve(address) {
			Ok(resolved) => resolved,
			Err(e) => return Outcome::failure(e.to_string()),
		};
		let registry = match self.registry(&reg_name) {
			Ok(registry) => registry,
			Err(e) => return Outcome::failure(e.to_string()),
		};
		let mut guard = registry.write();
		match op(&mut guard, &local) {
			Ok(value) => render(value),
			Err(e) => {
				let hint = suggestion_for(&guard, &e);
				Outcome::failure(describe(&e, hint))
			}
		}
	}

	/// Attempts to set a parameter value through a repository address.
	pub fn cmd_set_parameter_value(&self, address: &str, value_text: &str) -> Outcome {
		if self.is_locked() {
			return Outcome::failure(VariantError::Locked(self.name().to_string()).to_string());
		}
		self.run(
			address,
			|registry, local| registry.set_parameter_value_from_string(local, value_text),
			|()| Outcome::ok(),
		)
	}

	/// Attempts to render a parameter's current value.
	pub fn cmd_get_parameter_value(&self, address: &str) -> Outcome {
		self.run(
			address,
			|registry, local| registry.render_parameter(local),
			Outcome::ok_with_value,
		)
	}

	/// Reports whether a variant record is currently active.
	pub fn cmd_is_active_variant(&self, address: &str) -> Outcome {
		self.run(
			address,
			|registry, local| registry.get_variant_record(local).map(|r| r.is_active()),
			|active| Outcome::ok_with_value(active.to_string()),
		)
	}

	/// Reports whether a parameter record exists at the given address.
	pub fn cmd_has_parameter(&self, address: &str) -> Outcome {
		self.run(
			address,
			|registry, local| Ok(registry.get_parameter_record(local).is_ok()),
			|exists: bool| Outcome::ok_with_value(exists.to_string()),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::ModelManager;
	use crate::repository::share;

	const MODEL: &str = r#"
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

[name="detector.VM" type="variant"]
parameters : string[1] = "thickness"
parameters.thickness.model : string = "thickness.PM"

[name="geometry.VM" type="variant"]
parameters : string[1] = "has_detector_0"
parameters.has_detector_0.model : string = "has_detector.PM"
"#;

	fn registry() -> Registry {
		let manager = ModelManager::parse_str(MODEL).unwrap();
		let mut registry = Registry::new();
		registry.initialize_from(&manager, "", "geometry", "", "").unwrap();
		registry
	}

	#[test]
	fn set_while_gated_fails_softly() {
		let mut registry = registry();
		let thickness = "has_detector_0/if_detector/thickness";

		let denied = registry.cmd_set_parameter_value(thickness, "32.4 mm");
		assert!(!denied.is_success());
		assert!(denied.error_message().unwrap().contains("not active"));

		assert!(registry.cmd_set_parameter_value("has_detector_0", "true").is_success());
		assert!(registry.cmd_set_parameter_value(thickness, "32.4 mm").is_success());
		assert_eq!(
			registry.cmd_get_parameter_value(thickness).value(),
			Some("32.4 mm")
		);

		assert!(registry.cmd_set_parameter_value("has_detector_0", "false").is_success());
		let denied = registry.cmd_set_parameter_value(thickness, "32.4 mm");
		assert!(!denied.is_success());
	}

	#[test]
	fn unknown_path_gets_a_suggestion() {
		let mut registry = registry();
		let outcome = registry.cmd_set_parameter_value("has_detector_1", "true");
		assert!(!outcome.is_success());
		assert!(
			outcome.error_message().unwrap().contains("did you mean 'has_detector_0'"),
			"message was: {:?}",
			outcome.error_message()
		);
	}

	#[test]
	fn variant_activity_query() {
		let mut registry = registry();
		let outcome = registry.cmd_is_active_variant("has_detector_0/if_detector");
		assert_eq!(outcome.value(), Some("false"));
		assert!(registry.cmd_set_parameter_value("has_detector_0", "true").is_success());
		let outcome = registry.cmd_is_active_variant("has_detector_0/if_detector");
		assert_eq!(outcome.value(), Some("true"));

		// Wrong kind is a soft failure, not a panic.
		assert!(!registry.cmd_is_active_variant("has_detector_0").is_success());
	}

	#[test]
	fn repository_commands_resolve_addresses() {
		let mut repository = Repository::new("setup");
		repository.registration_external(share(registry()), "").unwrap();

		assert!(repository.cmd_set_parameter_value("geometry:has_detector_0", "true").is_success());
		assert_eq!(
			repository
				.cmd_get_parameter_value("geometry:has_detector_0")
				.value(),
			Some("true")
		);
		assert_eq!(
			repository
				.cmd_is_active_variant("geometry:has_detector_0/if_detector")
				.value(),
			Some("true")
		);
		assert_eq!(
			repository.cmd_has_parameter("geometry:ghost").value(),
			Some("false")
		);

		let bad = repository.cmd_set_parameter_value("ghost:x", "1");
		assert!(!bad.is_success());
		assert!(bad.error_message().unwrap().contains("unknown registry"));
	}
}
