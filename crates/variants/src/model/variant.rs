use indexmap::IndexMap;
use vario_props::Properties;

use super::{ModelError, invalid};

/// A parameter declared by a variant model.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDecl {
	/// Name of the backing parameter model.
	pub model: String,
	/// Free-form description.
	pub description: String,
	/// Number of repeated records to build (`name[0]..name[n-1]` when > 1).
	pub occurrence: u32,
}

/// The model of a variant: an ordered set of named parameters.
///
/// Declaration order is the parameters' rank, which fixes the deterministic
/// enumeration and update-propagation order.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantModel {
	/// Model name (section name in the source).
	pub name: String,
	/// Free-form description.
	pub description: String,
	/// Parameter declarations keyed by local name, in rank order.
	pub parameters: IndexMap<String, ParameterDecl>,
}

impl VariantModel {
	/// Parses a `type="variant"` section.
	pub(crate) fn from_props(name: &str, props: &Properties) -> Result<Self, ModelError> {
		let description = props.fetch_string("description").unwrap_or_default();
		let mut parameters = IndexMap::new();
		if props.has_key("parameters") {
			for pname in props.fetch_string_vec("parameters")? {
				let model = props
					.fetch_string(&format!("parameters.{pname}.model"))
					.map_err(|_| invalid(name, format!("parameter '{pname}' missing '.model'")))?;
				let description = props
					.fetch_string(&format!("parameters.{pname}.description"))
					.unwrap_or_default();
				let occurrence = match props.fetch_integer(&format!("parameters.{pname}.occurrence")) {
					Ok(n) if n >= 1 => n as u32,
					Ok(n) => {
						return Err(invalid(name, format!("parameter '{pname}' occurrence {n} < 1")));
					}
					Err(_) => 1,
				};
				if parameters
					.insert(
						pname.clone(),
						ParameterDecl {
							model,
							description,
							occurrence,
						},
					)
					.is_some()
				{
					return Err(invalid(name, format!("duplicate parameter '{pname}'")));
				}
			}
		}
		Ok(Self {
			name: name.to_string(),
			description,
			parameters,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_ranked_parameters() {
		let props = Properties::parse_str(
			r#"
description : string = "Core geometry"
parameters : string[2] = "width" "seeds"
parameters.width.model : string = "width.PM"
parameters.seeds.model : string = "seed.PM"
parameters.seeds.occurrence : integer = 3
"#,
		)
		.unwrap();
		let model = VariantModel::from_props("core.VM", &props).unwrap();

		let names: Vec<_> = model.parameters.keys().map(String::as_str).collect();
		assert_eq!(names, vec!["width", "seeds"]);
		assert_eq!(model.parameters["seeds"].occurrence, 3);
		assert_eq!(model.parameters["width"].occurrence, 1);
	}

	#[test]
	fn missing_model_reference_fails() {
		let props = Properties::parse_str("parameters : string[1] = \"width\"").unwrap();
		assert!(VariantModel::from_props("core.VM", &props).is_err());
	}
}
