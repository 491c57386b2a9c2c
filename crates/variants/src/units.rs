//! Unit table for dimensioned real parameters.
//!
//! Each dimension has a canonical base unit (factor 1.0); stored magnitudes
//! are always in base units. Bases: length in mm, time in ns, angle in rad,
//! energy in MeV, mass in g.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

/// One entry of the unit table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
	/// Unit symbol as written in value text (`mm`, `deg`, ...).
	pub symbol: &'static str,
	/// Dimension label (`length`, `time`, ...).
	pub dimension: &'static str,
	/// Multiplier to the dimension's base unit.
	pub factor: f64,
}

const UNITS: &[Unit] = &[
	Unit { symbol: "um", dimension: "length", factor: 1e-3 },
	Unit { symbol: "mm", dimension: "length", factor: 1.0 },
	Unit { symbol: "cm", dimension: "length", factor: 10.0 },
	Unit { symbol: "m", dimension: "length", factor: 1e3 },
	Unit { symbol: "km", dimension: "length", factor: 1e6 },
	Unit { symbol: "ns", dimension: "time", factor: 1.0 },
	Unit { symbol: "us", dimension: "time", factor: 1e3 },
	Unit { symbol: "ms", dimension: "time", factor: 1e6 },
	Unit { symbol: "s", dimension: "time", factor: 1e9 },
	Unit { symbol: "rad", dimension: "angle", factor: 1.0 },
	Unit { symbol: "mrad", dimension: "angle", factor: 1e-3 },
	Unit { symbol: "deg", dimension: "angle", factor: std::f64::consts::PI / 180.0 },
	Unit { symbol: "eV", dimension: "energy", factor: 1e-6 },
	Unit { symbol: "keV", dimension: "energy", factor: 1e-3 },
	Unit { symbol: "MeV", dimension: "energy", factor: 1.0 },
	Unit { symbol: "GeV", dimension: "energy", factor: 1e3 },
	Unit { symbol: "mg", dimension: "mass", factor: 1e-3 },
	Unit { symbol: "g", dimension: "mass", factor: 1.0 },
	Unit { symbol: "kg", dimension: "mass", factor: 1e3 },
];

fn table() -> &'static FxHashMap<&'static str, &'static Unit> {
	static TABLE: OnceLock<FxHashMap<&'static str, &'static Unit>> = OnceLock::new();
	TABLE.get_or_init(|| UNITS.iter().map(|u| (u.symbol, u)).collect())
}

/// Looks up a unit by symbol.
pub fn find(symbol: &str) -> Option<&'static Unit> {
	table().get(symbol).copied()
}

/// Returns true if `dimension` is a known dimension label.
pub fn known_dimension(dimension: &str) -> bool {
	UNITS.iter().any(|u| u.dimension == dimension)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lookup_by_symbol() {
		let mm = find("mm").unwrap();
		assert_eq!(mm.dimension, "length");
		assert_eq!(mm.factor, 1.0);
		assert_eq!(find("cm").unwrap().factor, 10.0);
		assert!(find("furlong").is_none());
	}

	#[test]
	fn dimensions_are_known() {
		assert!(known_dimension("length"));
		assert!(known_dimension("energy"));
		assert!(!known_dimension("charm"));
	}
}
