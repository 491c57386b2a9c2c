//! Cross-module scenarios driving the full stack: models, registries,
//! repository addressing, commands, and profile round trips.

use pretty_assertions::assert_eq;

use crate::ascii_io::{AsciiIo, IoFlags};
use crate::model::ModelManager;
use crate::path::PathAddress;
use crate::registry::Registry;
use crate::repository::{Repository, SharedRegistry, share};
use crate::value::ParameterValue;

const GEOMETRY_MODELS: &str = r#"
name : string = "geometry_models"
top_variant : string = "geometry.VM"

[name="has_detector.PM" type="parameter"]
type : string = "boolean"
description : string = "Detector presence flag"
default.value : boolean = false
variants : string[1] = "if_detector"
variants.if_detector.model : string = "detector.VM"
variants.if_detector.description : string = "Detector geometry branch"
boolean.true.variant : string = "if_detector"

[name="thickness.PM" type="parameter"]
type : string = "real"
description : string = "Plate thickness"
real.unit.dimension : string = "length"
real.unit.preferred : string = "mm"
default.value : real = 30.0
real.groups : string[1] = "plate"
real.groups.plate.min : real = 0.0
real.groups.plate.max : real = 100.0

[name="material.PM" type="parameter"]
type : string = "string"
description : string = "Plate material"
string.enumerated : string[2] = "copper" "iron"

[name="detector.VM" type="variant"]
description : string = "Detector geometry"
parameters : string[2] = "thickness" "material"
parameters.thickness.model : string = "thickness.PM"
parameters.material.model : string = "material.PM"

[name="geometry.VM" type="variant"]
description : string = "Top geometry variant"
parameters : string[1] = "has_detector_0"
parameters.has_detector_0.model : string = "has_detector.PM"
"#;

const RADIOACTIVITY_MODELS: &str = r#"
name : string = "radioactivity_models"
top_variant : string = "radioactivity.VM"

[name="activity.PM" type="parameter"]
type : string = "real"
default.value : real = 2.5

[name="isotope.PM" type="parameter"]
type : string = "string"
string.enumerated : string[2] = "Tl208" "Bi214"
default.value : string = "Tl208"

[name="radioactivity.VM" type="variant"]
parameters : string[2] = "activity" "isotope"
parameters.activity.model : string = "activity.PM"
parameters.isotope.model : string = "isotope.PM"
"#;

fn build_registry(models: &str, name: &str) -> SharedRegistry {
	let manager = ModelManager::parse_str(models).unwrap();
	let mut registry = Registry::new();
	registry.initialize_from(&manager, "", name, "", "").unwrap();
	share(registry)
}

fn build_repository() -> Repository {
	let mut repository = Repository::new("setup");
	repository
		.registration_external(build_registry(GEOMETRY_MODELS, "geometry"), "")
		.unwrap();
	repository
		.registration_external(build_registry(RADIOACTIVITY_MODELS, "radioactivity"), "")
		.unwrap();
	repository
}

#[test]
fn gated_thickness_command_scenario() {
	let repository = build_repository();
	let thickness = "geometry:has_detector_0/if_detector/thickness";

	// The record exists but the gate is off: soft failure, batch continues.
	let denied = repository.cmd_set_parameter_value(thickness, "32.4 mm");
	assert!(!denied.is_success());
	assert!(denied.error_message().is_some());

	assert!(
		repository
			.cmd_set_parameter_value("geometry:has_detector_0", "true")
			.is_success()
	);
	assert!(repository.cmd_set_parameter_value(thickness, "32.4 mm").is_success());
	assert_eq!(
		repository.cmd_get_parameter_value(thickness).value(),
		Some("32.4 mm")
	);

	// Turning the gate back off deactivates the branch again.
	assert!(
		repository
			.cmd_set_parameter_value("geometry:has_detector_0", "false")
			.is_success()
	);
	assert!(!repository.cmd_set_parameter_value(thickness, "32.4 mm").is_success());
}

#[test]
fn unregister_then_remount_external_registry() {
	let mut repository = Repository::new("setup");
	let geometry = build_registry(GEOMETRY_MODELS, "geometry");
	let radioactivity = build_registry(RADIOACTIVITY_MODELS, "radioactivity");
	repository
		.registration_external(std::sync::Arc::clone(&geometry), "")
		.unwrap();
	repository.registration_external(radioactivity, "").unwrap();

	repository.unregistration("geometry").unwrap();
	assert!(repository.registry("geometry").is_err());

	// The caller-owned registry survives and can be mounted again.
	repository.registration_external(geometry, "").unwrap();
	assert!(repository.registry("geometry").is_ok());
}

#[test]
fn profile_backup_and_restore_across_repositories() {
	let repository = build_repository();
	for (address, text) in [
		("geometry:has_detector_0", "true"),
		("geometry:has_detector_0/if_detector/thickness", "32.4 mm"),
		("geometry:has_detector_0/if_detector/material", "iron"),
		("radioactivity:isotope", "Bi214"),
	] {
		assert!(repository.cmd_set_parameter_value(address, text).is_success());
	}
	let backup = repository.export_profile().unwrap();

	// A structurally identical fresh repository reproduces every
	// (active, value-set, value) triple from the profile.
	let fresh = build_repository();
	fresh.import_profile(&backup).unwrap();
	assert_eq!(fresh.export_profile().unwrap(), backup);

	// Mutate, restore, and compare against the backup again.
	assert!(
		fresh
			.cmd_set_parameter_value("geometry:has_detector_0/if_detector/thickness", "12 mm")
			.is_success()
	);
	assert_ne!(fresh.export_profile().unwrap(), backup);
	fresh.import_profile(&backup).unwrap();
	assert_eq!(fresh.export_profile().unwrap(), backup);
}

#[test]
fn ascii_profile_survives_a_full_store_load_cycle() {
	let source = build_repository();
	for (address, text) in [
		("geometry:has_detector_0", "true"),
		("geometry:has_detector_0/if_detector/material", "copper"),
		("radioactivity:activity", "7.25"),
	] {
		assert!(source.cmd_set_parameter_value(address, text).is_success());
	}

	let io = AsciiIo::new(IoFlags::TITLE);
	let mut buffer = Vec::new();
	io.store_repository(&mut buffer, &source).unwrap();
	let text = String::from_utf8(buffer).unwrap();

	let target = build_repository();
	io.load_repository(&text, &target).unwrap();
	assert_eq!(target.export_profile().unwrap(), source.export_profile().unwrap());

	// A second store of the loaded state is byte-identical.
	let mut again = Vec::new();
	io.store_repository(&mut again, &target).unwrap();
	assert_eq!(String::from_utf8(again).unwrap(), text);
}

#[test]
fn repository_wide_accomplishment() {
	let repository = build_repository();
	assert!(repository.is_accomplished());

	// Opening the detector branch exposes the default-less material.
	assert!(
		repository
			.cmd_set_parameter_value("geometry:has_detector_0", "true")
			.is_success()
	);
	assert!(!repository.is_accomplished());

	assert!(
		repository
			.cmd_set_parameter_value("geometry:has_detector_0/if_detector/material", "copper")
			.is_success()
	);
	assert!(repository.is_accomplished());
}

#[test]
fn exported_keys_are_valid_global_addresses() {
	let repository = build_repository();
	for (address, text) in [
		("geometry:has_detector_0", "true"),
		("geometry:has_detector_0/if_detector/material", "iron"),
	] {
		assert!(repository.cmd_set_parameter_value(address, text).is_success());
	}
	let profile = repository.export_profile().unwrap();
	assert!(!profile.is_empty());
	for key in profile.keys() {
		let address = PathAddress::parse(key).unwrap();
		assert!(address.is_global(), "exported key '{key}' is not global");
		assert_eq!(address.to_string(), key);
	}
}

#[test]
fn update_stability_under_shared_handles() {
	let geometry = build_registry(GEOMETRY_MODELS, "geometry");
	{
		let mut guard = geometry.write();
		guard
			.set_parameter_value("has_detector_0", ParameterValue::Boolean(true))
			.unwrap();
	}
	let before: Vec<(String, bool)> = {
		let guard = geometry.read();
		guard
			.list_of_ranked_parameters()
			.into_iter()
			.map(|p| {
				let active = guard.get_record(&p).unwrap().is_active();
				(p, active)
			})
			.collect()
	};
	geometry.write().update().unwrap();
	let after: Vec<(String, bool)> = {
		let guard = geometry.read();
		guard
			.list_of_ranked_parameters()
			.into_iter()
			.map(|p| {
				let active = guard.get_record(&p).unwrap().is_active();
				(p, active)
			})
			.collect()
	};
	assert_eq!(before, after);
}
