//! Structured Product Label documents
//!
//! [`SplParser`] turns a detail document into an [`SplDocument`] holding
//! normalized ingredient, route and dosage form data.

pub mod models;
pub mod parser;

pub use models::{IngredientRecord, IngredientRole, RouteForm, SplDocument, SplProduct};
pub use parser::{SplParser, UNII_CODE_SYSTEM};
