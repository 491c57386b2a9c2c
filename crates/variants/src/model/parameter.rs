use indexmap::IndexMap;
use vario_props::Properties;

use super::{ModelError, invalid};
use crate::units;
use crate::value::{ParameterType, ParameterValue, UnitSpec};

/// Whether a parameter's value is user-settable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
	/// The value is chosen by the user (possibly from a default).
	Variable,
	/// The value is determined entirely by the model.
	Fixed,
}

/// A daughter variant declared by a parameter model.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDecl {
	/// Name of the backing variant model.
	pub model: String,
	/// Free-form description.
	pub description: String,
}

/// One admissible value of an enumerated parameter, with the variant it
/// triggers when selected.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
	/// The admissible value.
	pub value: ParameterValue,
	/// Local name of the daughter variant this value activates, if any.
	pub variant: Option<String>,
}

/// A named interval of a numeric parameter's domain.
///
/// An open bound is `None`. A group may activate a daughter variant when the
/// current value falls inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueGroup {
	/// Group name.
	pub name: String,
	/// Inclusive lower bound, in base units.
	pub min: Option<f64>,
	/// Inclusive upper bound, in base units.
	pub max: Option<f64>,
	/// Local name of the daughter variant this group activates, if any.
	pub variant: Option<String>,
}

impl ValueGroup {
	fn contains(&self, v: f64) -> bool {
		self.min.is_none_or(|m| v >= m) && self.max.is_none_or(|m| v <= m)
	}
}

/// The admissible-value domain of a parameter.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ValueDomain {
	/// Any value of the declared type.
	#[default]
	Free,
	/// An explicit list of admissible values.
	Enumerated(Vec<EnumValue>),
	/// Named numeric intervals; a value must fall in at least one.
	Groups(Vec<ValueGroup>),
}

/// How a value violates a parameter's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainViolation {
	/// Outside every numeric group.
	OutOfRange,
	/// Not among the enumerated values.
	NotInValueGroup,
}

/// The model of a parameter: its type, mutability, default, domain, and the
/// daughter variants its values can activate.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterModel {
	/// Model name (section name in the source).
	pub name: String,
	/// Free-form description.
	pub description: String,
	/// Declared value type.
	pub ty: ParameterType,
	/// Variable or fixed.
	pub mutability: Mutability,
	/// The model-determined value, for fixed parameters.
	pub fixed_value: Option<ParameterValue>,
	/// Initial value for variable parameters, if declared.
	pub default_value: Option<ParameterValue>,
	/// Unit declaration for dimensioned reals.
	pub unit: Option<UnitSpec>,
	/// Admissible-value domain.
	pub domain: ValueDomain,
	/// Daughter variants keyed by local name, in declaration order.
	pub variants: IndexMap<String, VariantDecl>,
}

impl ParameterModel {
	/// True if the parameter's value is fixed by the model.
	pub fn is_fixed(&self) -> bool {
		self.mutability == Mutability::Fixed
	}

	/// The value a freshly built record starts from: the fixed value for
	/// fixed parameters, the default otherwise.
	pub fn initial_value(&self) -> Option<&ParameterValue> {
		match self.mutability {
			Mutability::Fixed => self.fixed_value.as_ref(),
			Mutability::Variable => self.default_value.as_ref(),
		}
	}

	/// Checks a value of the correct type against the domain.
	pub fn check_value(&self, value: &ParameterValue) -> Result<(), DomainViolation> {
		match &self.domain {
			ValueDomain::Free => Ok(()),
			ValueDomain::Enumerated(values) => {
				if values.iter().any(|e| &e.value == value) {
					Ok(())
				} else {
					Err(DomainViolation::NotInValueGroup)
				}
			}
			ValueDomain::Groups(groups) => {
				let v = numeric(value).ok_or(DomainViolation::OutOfRange)?;
				if groups.iter().any(|g| g.contains(v)) {
					Ok(())
				} else {
					Err(DomainViolation::OutOfRange)
				}
			}
		}
	}

	/// Returns the local name of the daughter variant the given value
	/// activates, if any.
	pub fn triggered_variant(&self, value: &ParameterValue) -> Option<&str> {
		match &self.domain {
			ValueDomain::Free => None,
			ValueDomain::Enumerated(values) => values
				.iter()
				.find(|e| &e.value == value)
				.and_then(|e| e.variant.as_deref()),
			ValueDomain::Groups(groups) => {
				let v = numeric(value)?;
				groups
					.iter()
					.find(|g| g.contains(v))
					.and_then(|g| g.variant.as_deref())
			}
		}
	}

	/// Parses a `type="parameter"` section.
	pub(crate) fn from_props(name: &str, props: &Properties) -> Result<Self, ModelError> {
		let type_name = props
			.fetch_string("type")
			.map_err(|_| invalid(name, "missing 'type'"))?;
		let ty = ParameterType::from_name(&type_name)
			.ok_or_else(|| invalid(name, format!("unknown parameter type '{type_name}'")))?;

		let description = props.fetch_string("description").unwrap_or_default();

		let mutability = match props.fetch_string("mutability").as_deref() {
			Ok("fixed") => Mutability::Fixed,
			Ok("variable") | Err(_) => Mutability::Variable,
			Ok(other) => {
				return Err(invalid(name, format!("unknown mutability '{other}'")));
			}
		};

		let unit = parse_unit(name, ty, props)?;
		let unit_factor = unit
			.as_ref()
			.and_then(|u| units::find(&u.preferred))
			.map_or(1.0, |u| u.factor);

		let fixed_value = fetch_typed(props, "fixed.value", ty, unit_factor)?;
		if mutability == Mutability::Fixed && fixed_value.is_none() {
			return Err(invalid(name, "fixed parameter without 'fixed.value'"));
		}
		let default_value = fetch_typed(props, "default.value", ty, unit_factor)?;

		let variants = parse_variants(name, props)?;
		let domain = parse_domain(name, ty, props, unit_factor, &variants)?;

		Ok(Self {
			name: name.to_string(),
			description,
			ty,
			mutability,
			fixed_value,
			default_value,
			unit,
			domain,
			variants,
		})
	}
}

fn numeric(value: &ParameterValue) -> Option<f64> {
	match value {
		ParameterValue::Integer(v) => Some(*v as f64),
		ParameterValue::Real(v) => Some(*v),
		_ => None,
	}
}

fn parse_unit(name: &str, ty: ParameterType, props: &Properties) -> Result<Option<UnitSpec>, ModelError> {
	if !props.has_key("real.unit.dimension") {
		return Ok(None);
	}
	if ty != ParameterType::Real {
		return Err(invalid(name, "unit declared on a non-real parameter"));
	}
	let dimension = props.fetch_string("real.unit.dimension")?;
	if !units::known_dimension(&dimension) {
		return Err(invalid(name, format!("unknown unit dimension '{dimension}'")));
	}
	let preferred = props.fetch_string("real.unit.preferred")?;
	match units::find(&preferred) {
		Some(u) if u.dimension == dimension => {}
		Some(_) => {
			return Err(invalid(
				name,
				format!("preferred unit '{preferred}' is not a {dimension} unit"),
			));
		}
		None => return Err(invalid(name, format!("unknown unit '{preferred}'"))),
	}
	Ok(Some(UnitSpec { dimension, preferred }))
}

/// Fetches a typed carrier value for `key`, if present. Real magnitudes in
/// the source are expressed in the preferred unit and converted to base.
fn fetch_typed(
	props: &Properties,
	key: &str,
	ty: ParameterType,
	unit_factor: f64,
) -> Result<Option<ParameterValue>, ModelError> {
	if !props.has_key(key) {
		return Ok(None);
	}
	let value = match ty {
		ParameterType::Boolean => ParameterValue::Boolean(props.fetch_boolean(key)?),
		ParameterType::Integer => ParameterValue::Integer(props.fetch_integer(key)?),
		ParameterType::Real => ParameterValue::Real(props.fetch_real(key)? * unit_factor),
		ParameterType::String => ParameterValue::String(props.fetch_string(key)?),
	};
	Ok(Some(value))
}

fn parse_variants(name: &str, props: &Properties) -> Result<IndexMap<String, VariantDecl>, ModelError> {
	let mut variants = IndexMap::new();
	if !props.has_key("variants") {
		return Ok(variants);
	}
	for vname in props.fetch_string_vec("variants")? {
		let model = props
			.fetch_string(&format!("variants.{vname}.model"))
			.map_err(|_| invalid(name, format!("variant '{vname}' missing '.model'")))?;
		let description = props
			.fetch_string(&format!("variants.{vname}.description"))
			.unwrap_or_default();
		if variants
			.insert(vname.clone(), VariantDecl { model, description })
			.is_some()
		{
			return Err(invalid(name, format!("duplicate variant '{vname}'")));
		}
	}
	Ok(variants)
}

fn parse_domain(
	name: &str,
	ty: ParameterType,
	props: &Properties,
	unit_factor: f64,
	variants: &IndexMap<String, VariantDecl>,
) -> Result<ValueDomain, ModelError> {
	let check_trigger = |variant: &Option<String>| -> Result<(), ModelError> {
		if let Some(v) = variant {
			if !variants.contains_key(v) {
				return Err(invalid(name, format!("trigger references undeclared variant '{v}'")));
			}
		}
		Ok(())
	};

	match ty {
		ParameterType::Boolean => {
			let on_true = props.fetch_string("boolean.true.variant").ok();
			let on_false = props.fetch_string("boolean.false.variant").ok();
			check_trigger(&on_true)?;
			check_trigger(&on_false)?;
			if on_true.is_none() && on_false.is_none() {
				return Ok(ValueDomain::Free);
			}
			Ok(ValueDomain::Enumerated(vec![
				EnumValue {
					value: ParameterValue::Boolean(true),
					variant: on_true,
				},
				EnumValue {
					value: ParameterValue::Boolean(false),
					variant: on_false,
				},
			]))
		}
		ParameterType::String => {
			if !props.has_key("string.enumerated") {
				return Ok(ValueDomain::Free);
			}
			let mut values = Vec::new();
			for text in props.fetch_string_vec("string.enumerated")? {
				let variant = props.fetch_string(&format!("string.enumerated.{text}.variant")).ok();
				check_trigger(&variant)?;
				values.push(EnumValue {
					value: ParameterValue::String(text),
					variant,
				});
			}
			Ok(ValueDomain::Enumerated(values))
		}
		ParameterType::Integer => {
			if props.has_key("integer.enumerated") {
				let mut values = Vec::new();
				for n in props.fetch_integer_vec("integer.enumerated")? {
					let variant = props.fetch_string(&format!("integer.enumerated.{n}.variant")).ok();
					check_trigger(&variant)?;
					values.push(EnumValue {
						value: ParameterValue::Integer(n),
						variant,
					});
				}
				return Ok(ValueDomain::Enumerated(values));
			}
			parse_groups(name, props, "integer.groups", 1.0, check_trigger)
		}
		ParameterType::Real => parse_groups(name, props, "real.groups", unit_factor, check_trigger),
	}
}

fn parse_groups(
	name: &str,
	props: &Properties,
	key: &str,
	unit_factor: f64,
	check_trigger: impl Fn(&Option<String>) -> Result<(), ModelError>,
) -> Result<ValueDomain, ModelError> {
	if !props.has_key(key) {
		return Ok(ValueDomain::Free);
	}
	let mut groups = Vec::new();
	for gname in props.fetch_string_vec(key)? {
		let min = props.fetch_real(&format!("{key}.{gname}.min")).ok();
		let max = props.fetch_real(&format!("{key}.{gname}.max")).ok();
		if min.is_none() && max.is_none() {
			return Err(invalid(name, format!("group '{gname}' has no bounds")));
		}
		let variant = props.fetch_string(&format!("{key}.{gname}.variant")).ok();
		check_trigger(&variant)?;
		groups.push(ValueGroup {
			name: gname,
			min: min.map(|v| v * unit_factor),
			max: max.map(|v| v * unit_factor),
			variant,
		});
	}
	Ok(ValueDomain::Groups(groups))
}
