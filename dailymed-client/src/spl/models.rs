use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an ingredient is therapeutically active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientRole {
    Active,
    Inactive,
}

impl IngredientRole {
    /// Map an SPL ingredient `classCode` to a role
    ///
    /// `ACTIB`, `ACTIM` and `ACTIR` are active, `IACT` is inactive. Anything
    /// else (`CNTM`, `INGR`, ...) is not tracked.
    pub fn from_class_code(class_code: &str) -> Option<Self> {
        let code = class_code.trim().to_ascii_uppercase();
        if code.starts_with("ACT") {
            Some(IngredientRole::Active)
        } else if code == "IACT" {
            Some(IngredientRole::Inactive)
        } else {
            None
        }
    }
}

impl fmt::Display for IngredientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngredientRole::Active => write!(f, "active"),
            IngredientRole::Inactive => write!(f, "inactive"),
        }
    }
}

/// An ingredient of a product, with its name already normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRecord {
    pub name: String,
    pub role: IngredientRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unii: Option<String>,
}

impl IngredientRecord {
    pub fn is_active(&self) -> bool {
        self.role == IngredientRole::Active
    }
}

/// A route of administration paired with a dosage form, both normalized
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteForm {
    pub route: Option<String>,
    pub form: Option<String>,
}

/// One product described by a label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplProduct {
    pub name: Option<String>,
    pub ingredients: Vec<IngredientRecord>,
    pub route_forms: Vec<RouteForm>,
}

/// The parts of an SPL document the search pipeline cares about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplDocument {
    pub set_id: String,
    pub title: Option<String>,
    pub version: Option<String>,
    pub effective_time: Option<String>,
    pub products: Vec<SplProduct>,
}

impl SplDocument {
    /// Every ingredient record across all products
    pub fn ingredients(&self) -> impl Iterator<Item = &IngredientRecord> {
        self.products.iter().flat_map(|p| p.ingredients.iter())
    }

    /// Deduplicated names of active ingredients
    pub fn active_ingredient_names(&self) -> BTreeSet<String> {
        self.names_with_role(IngredientRole::Active)
    }

    /// Deduplicated names of inactive ingredients
    pub fn inactive_ingredient_names(&self) -> BTreeSet<String> {
        self.names_with_role(IngredientRole::Inactive)
    }

    fn names_with_role(&self, role: IngredientRole) -> BTreeSet<String> {
        self.ingredients()
            .filter(|i| i.role == role)
            .map(|i| i.name.clone())
            .collect()
    }

    pub fn route_forms(&self) -> impl Iterator<Item = &RouteForm> {
        self.products.iter().flat_map(|p| p.route_forms.iter())
    }

    /// Distinct routes of administration
    pub fn routes(&self) -> BTreeSet<&str> {
        self.route_forms()
            .filter_map(|rf| rf.route.as_deref())
            .collect()
    }

    /// Distinct dosage forms
    pub fn forms(&self) -> BTreeSet<&str> {
        self.route_forms()
            .filter_map(|rf| rf.form.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ACTIB", Some(IngredientRole::Active))]
    #[case("ACTIM", Some(IngredientRole::Active))]
    #[case("actir", Some(IngredientRole::Active))]
    #[case("IACT", Some(IngredientRole::Inactive))]
    #[case("CNTM", None)]
    #[case("INGR", None)]
    #[case("", None)]
    fn test_role_from_class_code(#[case] code: &str, #[case] expected: Option<IngredientRole>) {
        assert_eq!(IngredientRole::from_class_code(code), expected);
    }

    #[test]
    fn test_document_accessors() {
        let ingredient = |name: &str, role| IngredientRecord {
            name: name.to_string(),
            role,
            strength: None,
            unii: None,
        };
        let doc = SplDocument {
            set_id: "a1b2c3d4-e5f6-7890-abcd-ef1234567890".to_string(),
            title: None,
            version: None,
            effective_time: None,
            products: vec![
                SplProduct {
                    name: Some("part a".to_string()),
                    ingredients: vec![
                        ingredient("ibuprofen", IngredientRole::Active),
                        ingredient("starch", IngredientRole::Inactive),
                    ],
                    route_forms: vec![RouteForm {
                        route: Some("oral".to_string()),
                        form: Some("tablet".to_string()),
                    }],
                },
                SplProduct {
                    name: None,
                    ingredients: vec![ingredient("ibuprofen", IngredientRole::Active)],
                    route_forms: vec![RouteForm {
                        route: Some("oral".to_string()),
                        form: Some("capsule".to_string()),
                    }],
                },
            ],
        };

        assert_eq!(doc.ingredients().count(), 3);
        assert_eq!(
            doc.active_ingredient_names().into_iter().collect::<Vec<_>>(),
            vec!["ibuprofen"]
        );
        assert_eq!(
            doc.inactive_ingredient_names().into_iter().collect::<Vec<_>>(),
            vec!["starch"]
        );
        assert_eq!(doc.routes().into_iter().collect::<Vec<_>>(), vec!["oral"]);
        assert_eq!(
            doc.forms().into_iter().collect::<Vec<_>>(),
            vec!["capsule", "tablet"]
        );
    }
}
