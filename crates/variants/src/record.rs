//! Record nodes of a registry's configuration tree.
//!
//! A record is either a variant node (a named alternative branch) or a
//! parameter node (a typed leaf value). Records never own each other:
//! parent/daughter relations are path strings resolved through the owning
//! registry's flat dictionary. Activation cascading is the registry's job;
//! a record only stores its own flags.

use crate::error::{Result, VariantError};
use crate::model::ParameterModel;
use crate::value::ParameterValue;

/// The two record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
	/// A named alternative configuration branch.
	Variant,
	/// A typed leaf value.
	Parameter,
}

impl RecordKind {
	/// Kind name used in error messages.
	pub fn name(self) -> &'static str {
		match self {
			RecordKind::Variant => "variant",
			RecordKind::Parameter => "parameter",
		}
	}
}

/// Value-state of a parameter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueState {
	/// No value yet.
	Unset,
	/// Holding the model default.
	DefaultSet,
	/// Holding an explicitly set value (fixed parameters are terminal here).
	ValueSet,
}

/// One node of the configuration tree.
#[derive(Debug, Clone)]
pub struct Record {
	path: String,
	kind: RecordKind,
	model: String,
	parent: Option<String>,
	daughters: Vec<String>,
	active: bool,
	value_state: ValueState,
	value: Option<ParameterValue>,
}

impl Record {
	pub(crate) fn new(path: String, kind: RecordKind, model: String, parent: Option<String>) -> Self {
		Self {
			path,
			kind,
			model,
			parent,
			daughters: Vec::new(),
			active: false,
			value_state: ValueState::Unset,
			value: None,
		}
	}

	/// The record's path within its registry.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Variant or parameter.
	pub fn kind(&self) -> RecordKind {
		self.kind
	}

	/// True for variant records.
	pub fn is_variant(&self) -> bool {
		self.kind == RecordKind::Variant
	}

	/// True for parameter records.
	pub fn is_parameter(&self) -> bool {
		self.kind == RecordKind::Parameter
	}

	/// Name of the backing model.
	pub fn model_name(&self) -> &str {
		&self.model
	}

	/// Path of the parent record, if not the top variant.
	pub fn parent_path(&self) -> Option<&str> {
		self.parent.as_deref()
	}

	/// Local names of daughter records, in rank order.
	pub fn ranked_daughters(&self) -> &[String] {
		&self.daughters
	}

	pub(crate) fn add_daughter(&mut self, local_name: String) {
		self.daughters.push(local_name);
	}

	/// True if the record's ancestor chain currently selects it.
	pub fn is_active(&self) -> bool {
		self.active
	}

	/// Sets the activation flag. Does not cascade; the registry resolves
	/// sibling paths and propagates during `update()`.
	pub fn set_active(&mut self, active: bool) {
		self.active = active;
	}

	/// The parameter's value-state (always `Unset` for variant records).
	pub fn value_state(&self) -> ValueState {
		self.value_state
	}

	/// True if the parameter holds a value (default or explicit).
	pub fn value_is_set(&self) -> bool {
		self.value_state != ValueState::Unset
	}

	/// The current value, if any.
	pub fn value(&self) -> Option<&ParameterValue> {
		self.value.as_ref()
	}

	/// Applies the model's initial value: fixed parameters become
	/// `ValueSet`, variable parameters with a default become `DefaultSet`,
	/// the rest stay `Unset`.
	pub(crate) fn apply_initial(&mut self, model: &ParameterModel) {
		match model.initial_value() {
			Some(value) => {
				self.value = Some(value.clone());
				self.value_state = if model.is_fixed() {
					ValueState::ValueSet
				} else {
					ValueState::DefaultSet
				};
			}
			None => {
				self.value = None;
				self.value_state = ValueState::Unset;
			}
		}
	}

	/// Sets an explicit value, validating type and domain against the model.
	pub(crate) fn set_value(&mut self, model: &ParameterModel, value: ParameterValue) -> Result<()> {
		if model.is_fixed() {
			return Err(VariantError::FixedParameter(self.path.clone()));
		}
		if !value.matches_type(model.ty) {
			return Err(VariantError::TypeMismatch {
				path: self.path.clone(),
				expected: model.ty.name(),
				got: value.parameter_type().name().to_string(),
			});
		}
		model.check_value(&value).map_err(|violation| {
			let rendered = value.render(model.unit.as_ref());
			match violation {
				crate::model::DomainViolation::OutOfRange => VariantError::OutOfRange {
					path: self.path.clone(),
					value: rendered,
				},
				crate::model::DomainViolation::NotInValueGroup => VariantError::NotInValueGroup {
					path: self.path.clone(),
					value: rendered,
				},
			}
		})?;
		self.value = Some(value);
		self.value_state = ValueState::ValueSet;
		Ok(())
	}

	/// Drops an explicit value, falling back to the model default when one
	/// exists.
	pub(crate) fn unset_value(&mut self, model: &ParameterModel) -> Result<()> {
		if model.is_fixed() {
			return Err(VariantError::FixedParameter(self.path.clone()));
		}
		match model.default_value.as_ref() {
			Some(default) => {
				self.value = Some(default.clone());
				self.value_state = ValueState::DefaultSet;
			}
			None => {
				self.value = None;
				self.value_state = ValueState::Unset;
			}
		}
		Ok(())
	}
}
