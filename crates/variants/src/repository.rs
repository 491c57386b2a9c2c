//! The variant repository: named registries behind one command surface.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;
use vario_props::Properties;

use crate::error::{Result, VariantError};
use crate::model::ModelManager;
use crate::path::PathAddress;
use crate::registry::{Mount, Registry};

/// Shared handle to a registry, usable both for repository-embedded and
/// caller-owned (external) registrations.
pub type SharedRegistry = Arc<RwLock<Registry>>;

/// Wraps a freshly built registry into a shared handle.
pub fn share(registry: Registry) -> SharedRegistry {
	Arc::new(RwLock::new(registry))
}

struct Registration {
	registry: SharedRegistry,
	embedded: bool,
}

/// Aggregates named registries and resolves `registry:path` addresses.
///
/// A registration is *embedded* (the repository built and owns the registry)
/// or *external* (the caller keeps its own handle; unregistration releases
/// the repository's claim without touching the registry's contents).
pub struct Repository {
	name: String,
	registrations: IndexMap<String, Registration>,
	locked: bool,
}

impl Repository {
	/// Creates an empty repository.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			registrations: IndexMap::new(),
			locked: false,
		}
	}

	/// Repository name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Number of registered registries.
	pub fn len(&self) -> usize {
		self.registrations.len()
	}

	/// True if no registry is registered.
	pub fn is_empty(&self) -> bool {
		self.registrations.is_empty()
	}

	/// True if a registry is registered under `name`.
	pub fn has_registry(&self, name: &str) -> bool {
		self.registrations.contains_key(name)
	}

	/// Registration names, in registration order.
	pub fn registry_names(&self) -> Vec<String> {
		self.registrations.keys().cloned().collect()
	}

	/// Builds a registry from a model source file and registers it under
	/// `reg_name`, owned by the repository.
	pub fn registration_embedded(
		&mut self,
		model_source: impl AsRef<Path>,
		top_variant_name: &str,
		reg_name: &str,
		display_name: &str,
		description: &str,
	) -> Result<()> {
		let manager = ModelManager::parse_file(model_source)?;
		self.register_embedded_manager(&manager, top_variant_name, reg_name, display_name, description)
	}

	/// Builds a registry from in-memory model text and registers it under
	/// `reg_name`, owned by the repository.
	pub fn registration_embedded_str(
		&mut self,
		model_text: &str,
		top_variant_name: &str,
		reg_name: &str,
		display_name: &str,
		description: &str,
	) -> Result<()> {
		let manager = ModelManager::parse_str(model_text)?;
		self.register_embedded_manager(&manager, top_variant_name, reg_name, display_name, description)
	}

	fn register_embedded_manager(
		&mut self,
		manager: &ModelManager,
		top_variant_name: &str,
		reg_name: &str,
		display_name: &str,
		description: &str,
	) -> Result<()> {
		if self.registrations.contains_key(reg_name) {
			return Err(VariantError::NameAlreadyUsed(reg_name.to_string()));
		}
		let mut registry = Registry::new();
		registry.initialize_from(manager, top_variant_name, reg_name, display_name, description)?;
		registry.set_mount(Mount {
			repository: self.name.clone(),
			name: reg_name.to_string(),
		});
		self.registrations.insert(
			reg_name.to_string(),
			Registration {
				registry: share(registry),
				embedded: true,
			},
		);
		debug!(repository = %self.name, registry = reg_name, "embedded registration");
		Ok(())
	}

	/// Registers a caller-owned registry by shared handle. An empty
	/// `mounting_name` falls back to the registry's own name.
	pub fn registration_external(&mut self, registry: SharedRegistry, mounting_name: &str) -> Result<()> {
		let name = {
			let guard = registry.read();
			if !guard.is_initialized() {
				return Err(VariantError::NotInitialized);
			}
			if let Some(mount) = guard.mount() {
				return Err(VariantError::AlreadyMounted {
					registry: guard.name().to_string(),
					repository: mount.repository.clone(),
				});
			}
			if mounting_name.is_empty() {
				guard.name().to_string()
			} else {
				mounting_name.to_string()
			}
		};
		if self.registrations.contains_key(&name) {
			return Err(VariantError::NameAlreadyUsed(name));
		}
		registry.write().set_mount(Mount {
			repository: self.name.clone(),
			name: name.clone(),
		});
		debug!(repository = %self.name, registry = %name, "external registration");
		self.registrations.insert(
			name,
			Registration {
				registry,
				embedded: false,
			},
		);
		Ok(())
	}

	/// Removes a registration. Embedded registries are destroyed with it;
	/// external ones are released untouched and may be re-registered.
	pub fn unregistration(&mut self, reg_name: &str) -> Result<()> {
		let registration = self
			.registrations
			.shift_remove(reg_name)
			.ok_or_else(|| VariantError::UnknownRegistry(reg_name.to_string()))?;
		registration.registry.write().clear_mount();
		debug!(
			repository = %self.name,
			registry = reg_name,
			embedded = registration.embedded,
			"unregistration"
		);
		Ok(())
	}

	/// Returns the shared handle registered under `name`.
	pub fn registry(&self, name: &str) -> Result<SharedRegistry> {
		self.registrations
			.get(name)
			.map(|r| Arc::clone(&r.registry))
			.ok_or_else(|| VariantError::UnknownRegistry(name.to_string()))
	}

	/// True if the registration under `name` is embedded.
	pub fn is_embedded(&self, name: &str) -> Result<bool> {
		self.registrations
			.get(name)
			.map(|r| r.embedded)
			.ok_or_else(|| VariantError::UnknownRegistry(name.to_string()))
	}

	/// Resolves an address to `(registry name, local path)`.
	///
	/// A bare local path is accepted only while exactly one registry is
	/// registered; otherwise the address must carry a `registry:` prefix.
	pub fn resolve(&self, text: &str) -> Result<(String, String)> {
		let address = PathAddress::parse(text)?;
		match address.registry_name() {
			Some(reg) => Ok((reg.to_string(), address.local_path())),
			None => {
				if self.registrations.len() == 1 {
					let only = self.registrations.keys().next().cloned().unwrap_or_default();
					Ok((only, address.local_path()))
				} else {
					Err(VariantError::AmbiguousOrMissingRegistry(text.to_string()))
				}
			}
		}
	}

	/// Sets a parameter through a repository address.
	pub fn set_parameter(&self, address: &str, value_text: &str) -> Result<()> {
		if self.locked {
			return Err(VariantError::Locked(self.name.clone()));
		}
		let (reg_name, local) = self.resolve(address)?;
		let registry = self.registry(&reg_name)?;
		let mut guard = registry.write();
		guard.set_parameter_value_from_string(&local, value_text)
	}

	/// Renders a parameter's current value through a repository address.
	pub fn get_parameter(&self, address: &str) -> Result<String> {
		let (reg_name, local) = self.resolve(address)?;
		let registry = self.registry(&reg_name)?;
		let guard = registry.read();
		guard.render_parameter(&local)
	}

	/// True if the addressed record is currently active.
	pub fn is_active_record(&self, address: &str) -> Result<bool> {
		let (reg_name, local) = self.resolve(address)?;
		let registry = self.registry(&reg_name)?;
		let active = registry.read().is_active_record(&local)?;
		Ok(active)
	}

	/// True iff every registered registry is accomplished.
	pub fn is_accomplished(&self) -> bool {
		self.registrations
			.values()
			.all(|r| r.registry.read().is_accomplished())
	}

	/// Seals the repository and every registered registry.
	pub fn lock(&mut self) {
		self.locked = true;
		for registration in self.registrations.values() {
			registration.registry.write().lock();
		}
	}

	/// Reopens the repository and every registered registry.
	pub fn unlock(&mut self) {
		self.locked = false;
		for registration in self.registrations.values() {
			registration.registry.write().unlock();
		}
	}

	/// True if the repository is sealed.
	pub fn is_locked(&self) -> bool {
		self.locked
	}

	/// Flattens every active, value-set parameter into a property bag keyed
	/// `registry:path`, in registration and ranked order.
	pub fn export_profile(&self) -> Result<Properties> {
		let mut profile = Properties::new();
		for (name, registration) in &self.registrations {
			let guard = registration.registry.read();
			for record_path in guard.list_of_ranked_parameters() {
				let record = guard.get_record(&record_path)?;
				if record.is_active() && record.value_is_set() {
					profile.store_string(format!("{name}:{record_path}"), guard.render_parameter(&record_path)?);
				}
			}
		}
		Ok(profile)
	}

	/// Applies a previously exported profile.
	///
	/// The whole key set is validated against the registered registries
	/// before any value is applied — a mismatched profile is rejected
	/// without partial application. Fixed parameters are verified against
	/// the profile rather than set.
	pub fn import_profile(&self, profile: &Properties) -> Result<()> {
		if self.locked {
			return Err(VariantError::Locked(self.name.clone()));
		}

		// Validation pass: addresses well-formed, registries known, record
		// paths present (activation may legitimately change as values land).
		for key in profile.keys() {
			let address = PathAddress::parse(key)?;
			let Some(reg_name) = address.registry_name() else {
				return Err(VariantError::ProfileMismatch(format!(
					"key '{key}' carries no registry prefix"
				)));
			};
			let registry = self.registry(reg_name).map_err(|_| {
				VariantError::ProfileMismatch(format!("key '{key}' names an unregistered registry"))
			})?;
			let guard = registry.read();
			let local = address.local_path();
			if guard.get_parameter_record(&local).is_err() {
				return Err(VariantError::ProfileMismatch(format!(
					"key '{key}' matches no parameter record"
				)));
			}
		}

		for (key, value) in profile.iter() {
			let text = value.as_str().ok_or_else(|| {
				VariantError::ProfileMismatch(format!("key '{key}' holds a non-string value"))
			})?;
			let (reg_name, local) = self.resolve(key)?;
			let registry = self.registry(&reg_name)?;
			let mut guard = registry.write();
			let model = guard.parameter_model_of(&local)?;
			if model.is_fixed() {
				// Model-determined values are re-derived, not applied; a
				// disagreeing profile is a mismatch.
				let stored = guard.render_parameter(&local)?;
				if stored != text {
					return Err(VariantError::ProfileMismatch(format!(
						"fixed parameter '{key}' disagrees with the model ({stored} != {text})"
					)));
				}
				continue;
			}
			guard.set_parameter_value_from_string(&local, text)?;
		}
		Ok(())
	}
}
