use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;
use vario_props::MultiProperties;

use super::{ModelError, ParameterModel, VariantModel, invalid};

/// A library of named models plus the declared top variant.
///
/// Built once from a sectioned carrier source (sections typed `parameter`
/// and `variant`, header keys `name`, `description`, `top_variant`), then
/// consumed read-only by registries at build time.
#[derive(Debug, Clone, Default)]
pub struct ModelManager {
	name: String,
	description: String,
	parameters: IndexMap<String, ParameterModel>,
	variants: IndexMap<String, VariantModel>,
	top_variant: Option<String>,
	initialized: bool,
}

impl ModelManager {
	/// Creates an empty, uninitialized manager.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses and validates a sectioned source.
	pub fn from_multi(multi: &MultiProperties) -> Result<Self, ModelError> {
		let header = multi.header();
		let mut manager = Self {
			name: header.fetch_string("name").unwrap_or_default(),
			description: header.fetch_string("description").unwrap_or_default(),
			parameters: IndexMap::new(),
			variants: IndexMap::new(),
			top_variant: header.fetch_string("top_variant").ok(),
			initialized: false,
		};

		for section in multi.sections() {
			match section.kind.as_str() {
				"parameter" => {
					let model = ParameterModel::from_props(&section.name, &section.props)?;
					manager.parameters.insert(section.name.clone(), model);
				}
				"variant" => {
					let model = VariantModel::from_props(&section.name, &section.props)?;
					manager.variants.insert(section.name.clone(), model);
				}
				other => {
					return Err(invalid(&section.name, format!("unknown section type '{other}'")));
				}
			}
		}

		manager.validate()?;
		manager.initialized = true;
		debug!(
			parameters = manager.parameters.len(),
			variants = manager.variants.len(),
			top = manager.top_variant.as_deref().unwrap_or(""),
			"model manager loaded"
		);
		Ok(manager)
	}

	/// Parses a sectioned source from text.
	pub fn parse_str(text: &str) -> Result<Self, ModelError> {
		Self::from_multi(&MultiProperties::parse_str(text)?)
	}

	/// Reads and parses a sectioned source file.
	pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
		Self::from_multi(&MultiProperties::parse_file(path)?)
	}

	fn validate(&self) -> Result<(), ModelError> {
		for variant in self.variants.values() {
			for decl in variant.parameters.values() {
				if !self.parameters.contains_key(&decl.model) {
					return Err(ModelError::UnknownParameterModel(decl.model.clone()));
				}
			}
		}
		for parameter in self.parameters.values() {
			for decl in parameter.variants.values() {
				if !self.variants.contains_key(&decl.model) {
					return Err(ModelError::UnknownVariantModel(decl.model.clone()));
				}
			}
		}
		if let Some(top) = &self.top_variant {
			if !self.variants.contains_key(top) {
				return Err(ModelError::UnknownTopVariant(top.clone()));
			}
		}
		Ok(())
	}

	/// True once models have been loaded and validated.
	pub fn is_initialized(&self) -> bool {
		self.initialized
	}

	/// Manager name from the source header.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Manager description from the source header.
	pub fn description(&self) -> &str {
		&self.description
	}

	/// The declared top variant model name, if any.
	pub fn top_variant_name(&self) -> Option<&str> {
		self.top_variant.as_deref()
	}

	/// Looks up a parameter model by name.
	pub fn parameter_model(&self, name: &str) -> Result<&ParameterModel, ModelError> {
		self.parameters
			.get(name)
			.ok_or_else(|| ModelError::UnknownParameterModel(name.to_string()))
	}

	/// Looks up a variant model by name.
	pub fn variant_model(&self, name: &str) -> Result<&VariantModel, ModelError> {
		self.variants
			.get(name)
			.ok_or_else(|| ModelError::UnknownVariantModel(name.to_string()))
	}

	/// True if a variant model with this name exists.
	pub fn has_variant_model(&self, name: &str) -> bool {
		self.variants.contains_key(name)
	}

	pub(crate) fn parameter_models(&self) -> &IndexMap<String, ParameterModel> {
		&self.parameters
	}

	pub(crate) fn variant_models(&self) -> &IndexMap<String, VariantModel> {
		&self.variants
	}
}
