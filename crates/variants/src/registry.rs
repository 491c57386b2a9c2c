//! The variant registry: one record tree built from a model description.

use bitflags::bitflags;
use indexmap::IndexMap;
use tracing::{debug, warn};
use vario_props::Properties;

use crate::dependency::DependencyModel;
use crate::error::{Result, VariantError};
use crate::model::{ModelError, ModelManager, ParameterModel, VariantModel};
use crate::path::{self, ROOT_PATH};
use crate::record::{Record, RecordKind, ValueState};
use crate::value::ParameterValue;

bitflags! {
	/// Filter for ranked record enumeration.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct RecordFilter: u32 {
		/// Include parameter records.
		const PARAMETERS = 1 << 0;
		/// Include variant records.
		const VARIANTS = 1 << 1;
	}
}

/// Where a registry is mounted, when held by a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
	/// Name of the holding repository.
	pub repository: String,
	/// Name the registry is mounted under.
	pub name: String,
}

/// A registry of variant and parameter records rooted at one top variant.
///
/// The flat `path → Record` dictionary is the sole owner of every record;
/// parent, daughter, and dependency relations are path strings resolved
/// through it on demand. A registry is either fully uninitialized or fully
/// built — `initialize_from` performs a single recursive build pass and
/// `reset` tears the whole dictionary down.
#[derive(Debug, Clone, Default)]
pub struct Registry {
	name: String,
	display_name: String,
	description: String,
	top_variant_name: String,
	records: IndexMap<String, Record>,
	parameter_models: IndexMap<String, ParameterModel>,
	variant_models: IndexMap<String, VariantModel>,
	dependencies: Option<DependencyModel>,
	mount: Option<Mount>,
	locked: bool,
	initialized: bool,
}

impl Registry {
	/// Creates an empty, uninitialized registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// True once the record tree has been built.
	pub fn is_initialized(&self) -> bool {
		self.initialized
	}

	/// Registry name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Human-readable display name.
	pub fn display_name(&self) -> &str {
		&self.display_name
	}

	/// Free-form description.
	pub fn description(&self) -> &str {
		&self.description
	}

	/// Model name of the top variant the tree is rooted at.
	pub fn top_variant_name(&self) -> &str {
		&self.top_variant_name
	}

	/// Builds the whole record tree from a model manager.
	///
	/// An empty `top_variant_name` falls back to the manager's declared top
	/// variant. The tree is built in one recursive pass, then activation is
	/// propagated once.
	pub fn initialize_from(
		&mut self,
		manager: &ModelManager,
		top_variant_name: &str,
		name: &str,
		display_name: &str,
		description: &str,
	) -> Result<()> {
		if self.initialized {
			return Err(VariantError::AlreadyInitialized);
		}
		if !manager.is_initialized() {
			return Err(ModelError::ManagerNotInitialized.into());
		}
		let top = if top_variant_name.is_empty() {
			manager
				.top_variant_name()
				.ok_or_else(|| ModelError::UnknownTopVariant(String::new()))?
				.to_string()
		} else {
			top_variant_name.to_string()
		};
		if !manager.has_variant_model(&top) {
			return Err(ModelError::UnknownTopVariant(top).into());
		}

		self.name = name.to_string();
		self.display_name = display_name.to_string();
		self.description = description.to_string();
		self.top_variant_name = top.clone();
		self.parameter_models = manager.parameter_models().clone();
		self.variant_models = manager.variant_models().clone();

		if let Err(e) = self.build_variant(ROOT_PATH.to_string(), &top, None) {
			// No partial state: a failed build leaves the registry empty.
			self.records.clear();
			self.parameter_models.clear();
			self.variant_models.clear();
			self.top_variant_name.clear();
			return Err(e);
		}
		self.initialized = true;
		self.update()?;
		debug!(
			registry = %self.name,
			records = self.records.len(),
			top = %self.top_variant_name,
			"registry built"
		);
		Ok(())
	}

	fn build_variant(&mut self, vpath: String, model_name: &str, parent: Option<String>) -> Result<()> {
		self.add_record(vpath.clone(), RecordKind::Variant, model_name.to_string(), parent)?;
		let decls: Vec<(String, String, u32)> = self
			.variant_models
			.get(model_name)
			.ok_or_else(|| ModelError::UnknownVariantModel(model_name.to_string()))?
			.parameters
			.iter()
			.map(|(local, decl)| (local.clone(), decl.model.clone(), decl.occurrence))
			.collect();

		for (local, pmodel, occurrence) in decls {
			for i in 0..occurrence {
				let leaf = if occurrence > 1 {
					format!("{local}[{i}]")
				} else {
					local.clone()
				};
				let ppath = path::join(&vpath, &leaf);
				self.grab_record(&vpath)?.add_daughter(leaf);
				self.build_parameter(ppath, &pmodel, vpath.clone())?;
			}
		}
		Ok(())
	}

	fn build_parameter(&mut self, ppath: String, model_name: &str, parent: String) -> Result<()> {
		self.add_record(
			ppath.clone(),
			RecordKind::Parameter,
			model_name.to_string(),
			Some(parent),
		)?;
		let model = self
			.parameter_models
			.get(model_name)
			.ok_or_else(|| ModelError::UnknownParameterModel(model_name.to_string()))?
			.clone();
		self.grab_record(&ppath)?.apply_initial(&model);

		for (vname, vdecl) in &model.variants {
			let vpath = path::join(&ppath, vname);
			self.grab_record(&ppath)?.add_daughter(vname.clone());
			self.build_variant(vpath, &vdecl.model, Some(ppath.clone()))?;
		}
		Ok(())
	}

	/// Inserts an empty record at `path`. The single allocation point for
	/// all records; callers never construct records directly.
	pub fn add_record(
		&mut self,
		record_path: String,
		kind: RecordKind,
		model: String,
		parent: Option<String>,
	) -> Result<&mut Record> {
		if self.records.contains_key(&record_path) {
			return Err(VariantError::DuplicatePath(record_path));
		}
		let record = Record::new(record_path.clone(), kind, model, parent);
		Ok(self.records.entry(record_path).or_insert(record))
	}

	/// True if a record exists at `path`.
	pub fn has_record(&self, record_path: &str) -> bool {
		self.records.contains_key(record_path)
	}

	/// Looks up any record.
	pub fn get_record(&self, record_path: &str) -> Result<&Record> {
		self.records
			.get(record_path)
			.ok_or_else(|| VariantError::UnknownPath(record_path.to_string()))
	}

	fn grab_record(&mut self, record_path: &str) -> Result<&mut Record> {
		self.records
			.get_mut(record_path)
			.ok_or_else(|| VariantError::UnknownPath(record_path.to_string()))
	}

	/// Looks up a variant record.
	pub fn get_variant_record(&self, record_path: &str) -> Result<&Record> {
		let record = self.get_record(record_path)?;
		expect_kind(record, RecordKind::Variant)?;
		Ok(record)
	}

	/// Looks up a parameter record.
	pub fn get_parameter_record(&self, record_path: &str) -> Result<&Record> {
		let record = self.get_record(record_path)?;
		expect_kind(record, RecordKind::Parameter)?;
		Ok(record)
	}

	/// Mutable variant-record lookup.
	pub fn grab_variant_record(&mut self, record_path: &str) -> Result<&mut Record> {
		expect_kind(self.get_record(record_path)?, RecordKind::Variant)?;
		self.grab_record(record_path)
	}

	/// Mutable parameter-record lookup.
	pub fn grab_parameter_record(&mut self, record_path: &str) -> Result<&mut Record> {
		expect_kind(self.get_record(record_path)?, RecordKind::Parameter)?;
		self.grab_record(record_path)
	}

	/// The parameter model backing a parameter record.
	pub fn parameter_model_of(&self, record_path: &str) -> Result<&ParameterModel> {
		let record = self.get_parameter_record(record_path)?;
		self.parameter_models
			.get(record.model_name())
			.ok_or_else(|| ModelError::UnknownParameterModel(record.model_name().to_string()).into())
	}

	/// Depth-first, rank-ordered enumeration of record paths, filtered by
	/// kind. This order is the canonical processing order of `update()`.
	pub fn list_of_ranked_records(&self, filter: RecordFilter) -> Vec<String> {
		let mut out = Vec::new();
		if self.records.contains_key(ROOT_PATH) {
			self.visit_ranked(ROOT_PATH, filter, &mut out);
		}
		out
	}

	fn visit_ranked(&self, record_path: &str, filter: RecordFilter, out: &mut Vec<String>) {
		let Some(record) = self.records.get(record_path) else {
			return;
		};
		let wanted = match record.kind() {
			RecordKind::Parameter => filter.contains(RecordFilter::PARAMETERS),
			RecordKind::Variant => filter.contains(RecordFilter::VARIANTS),
		};
		if wanted {
			out.push(record_path.to_string());
		}
		for leaf in record.ranked_daughters() {
			self.visit_ranked(&path::join(record_path, leaf), filter, out);
		}
	}

	/// Rank-ordered enumeration of every parameter path.
	pub fn list_of_ranked_parameters(&self) -> Vec<String> {
		self.list_of_ranked_records(RecordFilter::PARAMETERS)
	}

	/// Every active parameter record whose value-state is unset.
	pub fn list_of_unset_parameters(&self) -> Vec<String> {
		self.list_of_ranked_parameters()
			.into_iter()
			.filter(|p| {
				self.records
					.get(p)
					.is_some_and(|r| r.is_active() && r.value_state() == ValueState::Unset)
			})
			.collect()
	}

	/// True iff every active parameter has a set value — the registry's
	/// configuration is fully specified.
	pub fn is_accomplished(&self) -> bool {
		self.initialized && self.list_of_unset_parameters().is_empty()
	}

	/// Installs a dependency model, validating its paths against the built
	/// tree and resolving admissible values to typed values.
	pub fn set_dependency_model(&mut self, mut model: DependencyModel) -> Result<()> {
		if !self.initialized {
			return Err(VariantError::NotInitialized);
		}
		for rule in model.rules() {
			self.get_record(&rule.depender)?;
			self.get_parameter_record(&rule.dependee)?;
		}
		{
			let parameter_models = &self.parameter_models;
			let records = &self.records;
			model.bind(|dependee, text| {
				let record = records
					.get(dependee)
					.ok_or_else(|| VariantError::UnknownPath(dependee.to_string()))?;
				let pm = parameter_models
					.get(record.model_name())
					.ok_or_else(|| ModelError::UnknownParameterModel(record.model_name().to_string()))?;
				ParameterValue::parse(text, pm.ty, pm.unit.as_ref()).map_err(|reason| {
					VariantError::TypeMismatch {
						path: dependee.to_string(),
						expected: pm.ty.name(),
						got: reason,
					}
				})
			})?;
		}
		self.dependencies = Some(model);
		self.update()
	}

	/// Parses and installs a dependency description.
	pub fn load_dependencies(&mut self, config: &Properties) -> Result<()> {
		self.set_dependency_model(DependencyModel::initialize(config)?)
	}

	/// The installed dependency model, if any.
	pub fn dependency_model(&self) -> Option<&DependencyModel> {
		self.dependencies.as_ref()
	}

	/// Re-evaluates every record's activation in ranked order, consulting
	/// the ancestor chain and the dependency model.
	///
	/// Idempotent: with no intervening mutation a second call changes
	/// nothing. Internally iterates to a fixpoint so that rules referencing
	/// later-ranked paths settle; the dependency model's acyclicity check
	/// bounds this.
	pub fn update(&mut self) -> Result<()> {
		if !self.initialized {
			return Err(VariantError::NotInitialized);
		}
		let order = self.list_of_ranked_records(RecordFilter::all());
		let max_passes = self.records.len() + 1;
		for _ in 0..max_passes {
			let mut changed = false;
			for record_path in &order {
				let target = self.compute_active(record_path)?;
				let record = self.grab_record(record_path)?;
				if record.is_active() != target {
					record.set_active(target);
					changed = true;
				}
			}
			if !changed {
				return Ok(());
			}
		}
		warn!(registry = %self.name, "activation propagation did not settle");
		Ok(())
	}

	fn compute_active(&self, record_path: &str) -> Result<bool> {
		if record_path == ROOT_PATH {
			return Ok(true);
		}
		let record = self.get_record(record_path)?;
		let parent_path = record
			.parent_path()
			.ok_or_else(|| VariantError::UnknownPath(record_path.to_string()))?;
		let parent = self.get_record(parent_path)?;

		let selected = match record.kind() {
			// A parameter is reachable whenever its variant is.
			RecordKind::Parameter => parent.is_active(),
			// A variant is selected by its parent parameter's current value.
			RecordKind::Variant => {
				let model = self
					.parameter_models
					.get(parent.model_name())
					.ok_or_else(|| ModelError::UnknownParameterModel(parent.model_name().to_string()))?;
				parent.is_active()
					&& parent.value_is_set()
					&& parent
						.value()
						.and_then(|v| model.triggered_variant(v))
						.is_some_and(|v| v == path::leaf_of(record_path))
			}
		};
		Ok(selected && self.dependencies_satisfied(record_path))
	}

	fn dependencies_satisfied(&self, record_path: &str) -> bool {
		let Some(deps) = &self.dependencies else {
			return true;
		};
		deps.rules_for(record_path).all(|rule| {
			self.records.get(&rule.dependee).is_some_and(|dependee| {
				dependee.is_active()
					&& dependee.value_is_set()
					&& (rule.resolved.is_empty()
						|| dependee.value().is_some_and(|v| rule.resolved.contains(v)))
			})
		})
	}

	/// Sets a parameter's value and propagates activation.
	///
	/// Fails on locked registries, unknown or inactive paths, wrong record
	/// kinds, fixed parameters, and type/domain violations.
	pub fn set_parameter_value(&mut self, record_path: &str, value: ParameterValue) -> Result<()> {
		self.check_mutable()?;
		let record = self.get_parameter_record(record_path)?;
		if !record.is_active() {
			return Err(VariantError::InactiveRecord(record_path.to_string()));
		}
		let model = self
			.parameter_models
			.get(record.model_name())
			.ok_or_else(|| ModelError::UnknownParameterModel(record.model_name().to_string()))?
			.clone();
		self.grab_record(record_path)?.set_value(&model, value)?;
		self.update()
	}

	/// Parses a text form against the parameter's model, then sets it.
	pub fn set_parameter_value_from_string(&mut self, record_path: &str, text: &str) -> Result<()> {
		let model = self.parameter_model_of(record_path)?;
		let value = ParameterValue::parse(text, model.ty, model.unit.as_ref()).map_err(|reason| {
			VariantError::TypeMismatch {
				path: record_path.to_string(),
				expected: model.ty.name(),
				got: reason,
			}
		})?;
		self.set_parameter_value(record_path, value)
	}

	/// Drops a parameter's explicit value (falling back to its default) and
	/// propagates activation.
	pub fn unset_parameter_value(&mut self, record_path: &str) -> Result<()> {
		self.check_mutable()?;
		let record = self.get_parameter_record(record_path)?;
		if !record.is_active() {
			return Err(VariantError::InactiveRecord(record_path.to_string()));
		}
		let model = self
			.parameter_models
			.get(record.model_name())
			.ok_or_else(|| ModelError::UnknownParameterModel(record.model_name().to_string()))?
			.clone();
		self.grab_record(record_path)?.unset_value(&model)?;
		self.update()
	}

	/// The current value of a parameter record.
	pub fn parameter_value(&self, record_path: &str) -> Result<ParameterValue> {
		let record = self.get_parameter_record(record_path)?;
		record
			.value()
			.cloned()
			.ok_or_else(|| VariantError::UnsetValue(record_path.to_string()))
	}

	/// Renders a parameter's current value in its preferred unit.
	pub fn render_parameter(&self, record_path: &str) -> Result<String> {
		let model = self.parameter_model_of(record_path)?;
		let value = self.parameter_value(record_path)?;
		Ok(value.render(model.unit.as_ref()))
	}

	/// True if the record at `path` is currently active.
	pub fn is_active_record(&self, record_path: &str) -> Result<bool> {
		Ok(self.get_record(record_path)?.is_active())
	}

	/// Seals the registry against value mutation.
	pub fn lock(&mut self) {
		self.locked = true;
	}

	/// Reopens a sealed registry.
	pub fn unlock(&mut self) {
		self.locked = false;
	}

	/// True if the registry is sealed.
	pub fn is_locked(&self) -> bool {
		self.locked
	}

	fn check_mutable(&self) -> Result<()> {
		if !self.initialized {
			return Err(VariantError::NotInitialized);
		}
		if self.locked {
			return Err(VariantError::Locked(self.name.clone()));
		}
		Ok(())
	}

	/// Tears down the record tree, models, and dependency rules. The
	/// registry must be re-initialized before reuse.
	pub fn reset(&mut self) -> Result<()> {
		if !self.initialized {
			return Err(VariantError::NotInitialized);
		}
		self.records.clear();
		self.parameter_models.clear();
		self.variant_models.clear();
		self.dependencies = None;
		self.top_variant_name.clear();
		self.locked = false;
		self.initialized = false;
		Ok(())
	}

	pub(crate) fn mount(&self) -> Option<&Mount> {
		self.mount.as_ref()
	}

	pub(crate) fn set_mount(&mut self, mount: Mount) {
		self.mount = Some(mount);
	}

	pub(crate) fn clear_mount(&mut self) {
		self.mount = None;
	}
}

fn expect_kind(record: &Record, expected: RecordKind) -> Result<()> {
	if record.kind() != expected {
		return Err(VariantError::WrongKind {
			path: record.path().to_string(),
			expected: expected.name(),
			actual: record.kind().name(),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

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
default.value : real = 30.0
real.groups : string[1] = "plate"
real.groups.plate.min : real = 0.0
real.groups.plate.max : real = 100.0

[name="material.PM" type="parameter"]
type : string = "string"
string.enumerated : string[2] = "copper" "iron"

[name="seed.PM" type="parameter"]
type : string = "integer"
default.value : integer = 0

[name="detector.VM" type="variant"]
parameters : string[2] = "thickness" "material"
parameters.thickness.model : string = "thickness.PM"
parameters.material.model : string = "material.PM"

[name="geometry.VM" type="variant"]
parameters : string[2] = "has_detector_0" "seeds"
parameters.has_detector_0.model : string = "has_detector.PM"
parameters.seeds.model : string = "seed.PM"
parameters.seeds.occurrence : integer = 2
"#;

	fn built() -> Registry {
		let manager = ModelManager::parse_str(MODEL).unwrap();
		let mut registry = Registry::new();
		registry
			.initialize_from(&manager, "", "geometry", "Geometry", "test registry")
			.unwrap();
		registry
	}

	fn snapshot(registry: &Registry) -> Vec<(String, bool, ValueState)> {
		registry
			.list_of_ranked_records(RecordFilter::all())
			.into_iter()
			.map(|p| {
				let r = registry.get_record(&p).unwrap();
				(p, r.is_active(), r.value_state())
			})
			.collect()
	}

	#[test]
	fn build_creates_expected_tree() {
		let registry = built();
		for p in [
			"/",
			"has_detector_0",
			"has_detector_0/if_detector",
			"has_detector_0/if_detector/thickness",
			"has_detector_0/if_detector/material",
			"seeds[0]",
			"seeds[1]",
		] {
			assert!(registry.has_record(p), "missing record {p}");
		}
		assert!(registry.get_record("/").unwrap().is_active());
		assert!(registry.get_record("has_detector_0").unwrap().is_active());
		assert!(!registry.get_record("has_detector_0/if_detector").unwrap().is_active());
	}

	#[test]
	fn ranked_order_is_declaration_order() {
		let registry = built();
		assert_eq!(
			registry.list_of_ranked_parameters(),
			vec![
				"has_detector_0",
				"has_detector_0/if_detector/thickness",
				"has_detector_0/if_detector/material",
				"seeds[0]",
				"seeds[1]",
			]
		);
	}

	#[test]
	fn gating_scenario() {
		let mut registry = built();
		// Inactive until the gate is set.
		assert!(matches!(
			registry.set_parameter_value_from_string("has_detector_0/if_detector/thickness", "32.4 mm"),
			Err(VariantError::InactiveRecord(_))
		));

		registry
			.set_parameter_value("has_detector_0", ParameterValue::Boolean(true))
			.unwrap();
		assert!(registry.is_active_record("has_detector_0/if_detector").unwrap());

		registry
			.set_parameter_value_from_string("has_detector_0/if_detector/thickness", "32.4 mm")
			.unwrap();
		assert_eq!(
			registry.render_parameter("has_detector_0/if_detector/thickness").unwrap(),
			"32.4 mm"
		);

		// Dropping the gate deactivates the whole branch again.
		registry
			.set_parameter_value("has_detector_0", ParameterValue::Boolean(false))
			.unwrap();
		assert!(!registry.is_active_record("has_detector_0/if_detector").unwrap());
		assert!(!registry
			.is_active_record("has_detector_0/if_detector/thickness")
			.unwrap());
	}

	#[test]
	fn accomplished_tracks_unset_parameters() {
		let mut registry = built();
		// Everything active has a default.
		assert!(registry.is_accomplished());

		registry
			.set_parameter_value("has_detector_0", ParameterValue::Boolean(true))
			.unwrap();
		// material has no default and is now active.
		assert_eq!(
			registry.list_of_unset_parameters(),
			vec!["has_detector_0/if_detector/material"]
		);
		assert!(!registry.is_accomplished());

		registry
			.set_parameter_value_from_string("has_detector_0/if_detector/material", "copper")
			.unwrap();
		assert!(registry.is_accomplished());
	}

	#[test]
	fn update_is_idempotent() {
		let mut registry = built();
		registry
			.set_parameter_value("has_detector_0", ParameterValue::Boolean(true))
			.unwrap();
		let before = snapshot(&registry);
		registry.update().unwrap();
		assert_eq!(before, snapshot(&registry));
		registry.update().unwrap();
		assert_eq!(before, snapshot(&registry));
	}

	#[test]
	fn value_domain_is_enforced() {
		let mut registry = built();
		registry
			.set_parameter_value("has_detector_0", ParameterValue::Boolean(true))
			.unwrap();
		assert!(matches!(
			registry.set_parameter_value_from_string("has_detector_0/if_detector/thickness", "250 mm"),
			Err(VariantError::OutOfRange { .. })
		));
		assert!(matches!(
			registry.set_parameter_value_from_string("has_detector_0/if_detector/material", "wood"),
			Err(VariantError::NotInValueGroup { .. })
		));
		assert!(matches!(
			registry.set_parameter_value("seeds[0]", ParameterValue::Boolean(true)),
			Err(VariantError::TypeMismatch { .. })
		));
	}

	#[test]
	fn lookup_errors() {
		let registry = built();
		assert!(matches!(
			registry.get_parameter_record("ghost"),
			Err(VariantError::UnknownPath(_))
		));
		assert!(matches!(
			registry.get_variant_record("has_detector_0"),
			Err(VariantError::WrongKind { .. })
		));
		assert!(matches!(
			registry.get_parameter_record("has_detector_0/if_detector"),
			Err(VariantError::WrongKind { .. })
		));
	}

	#[test]
	fn initialization_guards() {
		let manager = ModelManager::parse_str(MODEL).unwrap();
		let mut registry = built();
		assert!(matches!(
			registry.initialize_from(&manager, "", "again", "", ""),
			Err(VariantError::AlreadyInitialized)
		));

		let mut fresh = Registry::new();
		assert!(matches!(
			fresh.initialize_from(&ModelManager::new(), "", "r", "", ""),
			Err(VariantError::Model(ModelError::ManagerNotInitialized))
		));
		assert!(matches!(
			fresh.initialize_from(&manager, "ghost.VM", "r", "", ""),
			Err(VariantError::Model(ModelError::UnknownTopVariant(_)))
		));
		assert!(matches!(fresh.update(), Err(VariantError::NotInitialized)));
	}

	#[test]
	fn reset_and_reinitialize() {
		let manager = ModelManager::parse_str(MODEL).unwrap();
		let mut registry = built();
		registry.reset().unwrap();
		assert!(!registry.is_initialized());
		assert!(matches!(registry.reset(), Err(VariantError::NotInitialized)));

		registry
			.initialize_from(&manager, "", "geometry", "", "")
			.unwrap();
		assert!(registry.has_record("has_detector_0"));
	}

	#[test]
	fn locked_registry_rejects_mutation() {
		let mut registry = built();
		registry.lock();
		assert!(registry.is_locked());
		assert!(matches!(
			registry.set_parameter_value("has_detector_0", ParameterValue::Boolean(true)),
			Err(VariantError::Locked(_))
		));
		registry.unlock();
		registry
			.set_parameter_value("has_detector_0", ParameterValue::Boolean(true))
			.unwrap();
	}

	#[test]
	fn dependency_rules_gate_activation() {
		let mut registry = built();
		registry
			.load_dependencies(
				&Properties::parse_str(
					r#"
dependencies : string[1] = "d0"
dependencies.d0.depender : string = "seeds[1]"
dependencies.d0.dependee : string = "seeds[0]"
dependencies.d0.values : string[1] = "42"
"#,
				)
				.unwrap(),
			)
			.unwrap();

		// seeds[1] only meaningful while seeds[0] == 42.
		assert!(!registry.is_active_record("seeds[1]").unwrap());
		registry
			.set_parameter_value("seeds[0]", ParameterValue::Integer(42))
			.unwrap();
		assert!(registry.is_active_record("seeds[1]").unwrap());
		registry
			.set_parameter_value("seeds[0]", ParameterValue::Integer(7))
			.unwrap();
		assert!(!registry.is_active_record("seeds[1]").unwrap());
	}

	#[test]
	fn add_record_rejects_duplicates() {
		let mut registry = built();
		assert!(matches!(
			registry.add_record(
				"has_detector_0".into(),
				RecordKind::Parameter,
				"has_detector.PM".into(),
				Some("/".into()),
			),
			Err(VariantError::DuplicatePath(_))
		));
	}
}
