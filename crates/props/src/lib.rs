//! Ordered key/value stores with a line-oriented text format.
//!
//! `vario-props` is the configuration carrier for the variant subsystem:
//! model descriptions and exported value profiles travel as [`Properties`]
//! (flat `key : type = value` files) or [`MultiProperties`] (the same format
//! split into `[name="..." type="..."]` sections with an optional header
//! block). Entry and section order is always declaration order.

mod error;
mod multi;
mod parse;
mod properties;
mod value;

pub use error::{PropsError, Result};
pub use multi::{MultiProperties, Section};
pub use properties::Properties;
pub use value::Value;
