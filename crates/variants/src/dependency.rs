//! Cross-parameter dependency rules.
//!
//! A rule states that a *depender* record (variant or parameter) is only
//! meaningful while a *dependee* parameter holds one of a set of admissible
//! values. Rules are consulted exclusively by `Registry::update()` — they
//! reference sibling paths that only exist once the whole tree is built.
//!
//! The rule graph is checked for cycles at initialization time: a cyclic
//! dependency description is rejected with `CyclicDependency` instead of
//! risking non-terminating propagation.

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use rustc_hash::FxHashMap;
use tracing::debug;
use vario_props::Properties;

use crate::error::{Result, VariantError};
use crate::path;
use crate::value::ParameterValue;

/// One dependency rule.
#[derive(Debug, Clone)]
pub struct DependencyRule {
	/// Rule name from the description.
	pub name: String,
	/// Path of the gated record.
	pub depender: String,
	/// Path of the driving parameter record.
	pub dependee: String,
	/// Admissible dependee values, as written in the description. Empty
	/// means any value, as long as the dependee is active and set.
	pub admissible: Vec<String>,
	pub(crate) resolved: Vec<ParameterValue>,
}

/// The per-registry set of dependency rules.
#[derive(Debug, Clone, Default)]
pub struct DependencyModel {
	rules: Vec<DependencyRule>,
	by_depender: FxHashMap<String, Vec<usize>>,
}

impl DependencyModel {
	/// Parses a dependency description and rejects cyclic rule graphs.
	///
	/// Format: `dependencies : string[N]` lists rule names; each rule `r`
	/// carries `dependencies.r.depender`, `dependencies.r.dependee`, and
	/// optionally `dependencies.r.values : string[M]`.
	pub fn initialize(config: &Properties) -> Result<Self> {
		let mut rules = Vec::new();
		if config.has_key("dependencies") {
			for rule_name in config.fetch_string_vec("dependencies")? {
				let depender = config.fetch_string(&format!("dependencies.{rule_name}.depender"))?;
				let dependee = config.fetch_string(&format!("dependencies.{rule_name}.dependee"))?;
				let admissible = config
					.fetch_string_vec(&format!("dependencies.{rule_name}.values"))
					.unwrap_or_default();
				if depender == dependee {
					return Err(VariantError::CyclicDependency(depender));
				}
				rules.push(DependencyRule {
					name: rule_name,
					depender,
					dependee,
					admissible,
					resolved: Vec::new(),
				});
			}
		}

		check_acyclic(&rules)?;

		let mut by_depender: FxHashMap<String, Vec<usize>> = FxHashMap::default();
		for (idx, rule) in rules.iter().enumerate() {
			by_depender.entry(rule.depender.clone()).or_default().push(idx);
		}
		debug!(rules = rules.len(), "dependency model initialized");
		Ok(Self { rules, by_depender })
	}

	/// All rules, in declaration order.
	pub fn rules(&self) -> &[DependencyRule] {
		&self.rules
	}

	/// True if any rule gates the given path.
	pub fn has_rules_for(&self, depender: &str) -> bool {
		self.by_depender.contains_key(depender)
	}

	pub(crate) fn rules_for(&self, depender: &str) -> impl Iterator<Item = &DependencyRule> {
		self.by_depender
			.get(depender)
			.into_iter()
			.flatten()
			.map(|&idx| &self.rules[idx])
	}

	/// Resolves the raw admissible-value texts into typed values via the
	/// owning registry's models.
	pub(crate) fn bind(
		&mut self,
		resolve: impl Fn(&str, &str) -> Result<ParameterValue>,
	) -> Result<()> {
		for rule in &mut self.rules {
			rule.resolved = rule
				.admissible
				.iter()
				.map(|text| resolve(&rule.dependee, text))
				.collect::<Result<_>>()?;
		}
		Ok(())
	}
}

/// Rejects rule sets whose combined graph (rule edges plus the implicit
/// "descendant depends on ancestor" tree edges) contains a cycle.
fn check_acyclic(rules: &[DependencyRule]) -> Result<()> {
	let mut nodes: Vec<String> = Vec::new();
	for rule in rules {
		for p in [&rule.depender, &rule.dependee] {
			let mut cursor = p.as_str();
			loop {
				if !nodes.iter().any(|n| n == cursor) {
					nodes.push(cursor.to_string());
				}
				match path::parent_of(cursor) {
					Some(parent) => cursor = parent,
					None => break,
				}
			}
		}
	}

	let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
	for node in &nodes {
		graph.add_node(node.as_str());
	}
	for node in &nodes {
		if let Some(parent) = path::parent_of(node) {
			graph.add_edge(node.as_str(), parent, ());
		}
	}
	for rule in rules {
		graph.add_edge(rule.depender.as_str(), rule.dependee.as_str(), ());
	}

	toposort(&graph, None)
		.map(|_| ())
		.map_err(|cycle| VariantError::CyclicDependency(cycle.node_id().to_string()))
}
