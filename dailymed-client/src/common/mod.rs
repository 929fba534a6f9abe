//! Identifier types, normalization and parsing helpers shared across modules

pub(crate) mod deserializers;
pub mod ids;
pub mod normalize;
pub(crate) mod xml_utils;

pub use ids::{Ndc, SetId};
pub use normalize::{normalize_term, normalize_terms};
