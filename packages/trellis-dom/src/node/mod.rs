#![allow(clippy::module_inception)]

mod attributes;
mod element;
mod node;

pub use attributes::{Attribute, Attributes};
pub use element::{ElementData, StyleDeclaration, parse_style_attribute};
pub use node::*;
