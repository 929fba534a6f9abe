//! Tolerant SPL document parser
//!
//! Walks the document with the `quick-xml` pull reader while tracking the
//! element stack. Only a handful of SPL constructs are interpreted:
//!
//! - `document/title`, `setId@root`, `versionNumber@value`, `effectiveTime@value`
//! - `subject/manufacturedProduct` opens a product scope
//! - `formCode@displayName` under `manufacturedProduct` or `partProduct`
//! - `routeCode@displayName` anywhere in the product scope
//! - `ingredient@classCode` (and the older `activeIngredient` /
//!   `inactiveIngredient` elements) with substance name, UNII and quantity
//!
//! Everything else is skipped. Damage after the root element has opened ends
//! the walk but keeps what was gathered.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

use crate::common::normalize_term;
use crate::common::xml_utils::{get_attr, local_name, make_reader, read_text_content};
use crate::error::{DailyMedError, Result};
use crate::spl::models::{IngredientRecord, IngredientRole, RouteForm, SplDocument, SplProduct};

/// Code system OID of FDA UNII codes
pub const UNII_CODE_SYSTEM: &str = "2.16.840.1.113883.4.9";

const ROOT_ELEMENT: &str = "document";

const SUBSTANCE_ELEMENTS: [&str; 3] = [
    "ingredientSubstance",
    "activeIngredientSubstance",
    "inactiveIngredientSubstance",
];

/// Parser for SPL detail documents
pub struct SplParser;

impl SplParser {
    /// Parse an SPL document
    ///
    /// `set_id` is the identifier the document was requested with; it is used
    /// in errors and when the document carries no `setId` of its own.
    ///
    /// # Errors
    ///
    /// Returns `DailyMedError::DocumentUnparseable` if the input has no root
    /// element, is malformed before the root opens, or the root is not
    /// `<document>`.
    ///
    /// # Example
    ///
    /// ```
    /// use dailymed_client::SplParser;
    ///
    /// let xml = r#"<document xmlns="urn:hl7-org:v3"><title>EMPTY LABEL</title></document>"#;
    /// let doc = SplParser::parse(xml, "a1b2c3d4-e5f6-7890-abcd-ef1234567890").unwrap();
    /// assert_eq!(doc.title.as_deref(), Some("EMPTY LABEL"));
    /// assert!(doc.products.is_empty());
    ///
    /// assert!(SplParser::parse("<html></html>", "x").is_err());
    /// ```
    pub fn parse(xml: &str, set_id: &str) -> Result<SplDocument> {
        ParseState::new(set_id).run(xml)
    }
}

struct IngredientBuilder {
    depth: usize,
    role: Option<IngredientRole>,
    name: Option<String>,
    unii: Option<String>,
    numerator: Option<String>,
    denominator: Option<String>,
}

impl IngredientBuilder {
    fn new(depth: usize, role: Option<IngredientRole>) -> Self {
        Self {
            depth,
            role,
            name: None,
            unii: None,
            numerator: None,
            denominator: None,
        }
    }

    fn finish(self) -> Option<IngredientRecord> {
        let role = self.role?;
        let name = self.name.filter(|n| !n.is_empty())?;
        let strength = self.numerator.map(|numerator| match self.denominator {
            Some(denominator) => format!("{numerator} / {denominator}"),
            None => numerator,
        });
        Some(IngredientRecord {
            name,
            role,
            strength,
            unii: self.unii,
        })
    }
}

struct ProductBuilder {
    depth: usize,
    name: Option<String>,
    ingredients: Vec<IngredientRecord>,
    forms: Vec<String>,
    routes: Vec<String>,
}

impl ProductBuilder {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            name: None,
            ingredients: Vec::new(),
            forms: Vec::new(),
            routes: Vec::new(),
        }
    }

    fn finish(self) -> SplProduct {
        SplProduct {
            name: self.name,
            ingredients: self.ingredients,
            route_forms: pair_routes_and_forms(&self.routes, &self.forms),
        }
    }
}

/// One pair per form and route; a missing side is left as `None`
fn pair_routes_and_forms(routes: &[String], forms: &[String]) -> Vec<RouteForm> {
    let mut pairs: Vec<RouteForm> = Vec::new();
    let routes: Vec<Option<&String>> = if routes.is_empty() {
        vec![None]
    } else {
        routes.iter().map(Some).collect()
    };
    let forms: Vec<Option<&String>> = if forms.is_empty() {
        vec![None]
    } else {
        forms.iter().map(Some).collect()
    };

    for form in &forms {
        for route in &routes {
            if route.is_none() && form.is_none() {
                continue;
            }
            let pair = RouteForm {
                route: route.cloned(),
                form: form.cloned(),
            };
            if !pairs.contains(&pair) {
                pairs.push(pair);
            }
        }
    }
    pairs
}

/// `value unit`, dropping the unit `1`; `None` for the implicit `1 1` denominator
fn render_quantity(e: &BytesStart, is_denominator: bool) -> Option<String> {
    let value = get_attr(e, b"value")?;
    let unit = get_attr(e, b"unit").filter(|u| u != "1");
    if is_denominator && value == "1" && unit.is_none() {
        return None;
    }
    Some(match unit {
        Some(unit) => format!("{value} {unit}"),
        None => value,
    })
}

fn normalized_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    get_attr(e, name)
        .map(|v| normalize_term(&v))
        .filter(|v| !v.is_empty())
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

struct ParseState {
    requested_set_id: String,
    root_seen: bool,
    stack: Vec<String>,
    set_id: Option<String>,
    title: Option<String>,
    version: Option<String>,
    effective_time: Option<String>,
    products: Vec<SplProduct>,
    product: Option<ProductBuilder>,
    ingredient: Option<IngredientBuilder>,
}

impl ParseState {
    fn new(set_id: &str) -> Self {
        Self {
            requested_set_id: set_id.to_string(),
            root_seen: false,
            stack: Vec::new(),
            set_id: None,
            title: None,
            version: None,
            effective_time: None,
            products: Vec::new(),
            product: None,
            ingredient: None,
        }
    }

    fn unparseable(&self, reason: String) -> DailyMedError {
        DailyMedError::DocumentUnparseable {
            set_id: self.requested_set_id.clone(),
            reason,
        }
    }

    fn run(mut self, xml: &str) -> Result<SplDocument> {
        let mut reader = make_reader(xml);
        let mut buf = Vec::new();
        let mut text_buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = local_name(e);
                    if !self.root_seen {
                        if name != ROOT_ELEMENT {
                            return Err(self.unparseable(format!(
                                "root element is <{name}>, expected <{ROOT_ELEMENT}>"
                            )));
                        }
                        self.root_seen = true;
                    }
                    if let Err(err) = self.on_start(&name, e, &mut reader, &mut text_buf) {
                        warn!(set_id = %self.requested_set_id, error = %err, "SPL document damaged, keeping partial data");
                        break;
                    }
                }
                Ok(Event::End(_)) => self.on_end(),
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    if !self.root_seen {
                        return Err(self.unparseable(format!("not well-formed XML: {err}")));
                    }
                    warn!(set_id = %self.requested_set_id, error = %err, "SPL document damaged, keeping partial data");
                    break;
                }
            }
            buf.clear();
        }

        if !self.root_seen {
            return Err(self.unparseable("no XML root element".to_string()));
        }
        Ok(self.finish())
    }

    fn on_start(
        &mut self,
        name: &str,
        e: &BytesStart,
        reader: &mut Reader<&[u8]>,
        text_buf: &mut Vec<u8>,
    ) -> std::result::Result<(), quick_xml::Error> {
        let parent = self.stack.last().cloned().unwrap_or_default();
        let depth = self.stack.len();

        if parent == ROOT_ELEMENT {
            match name {
                "title" => {
                    self.title = non_empty(read_text_content(reader, b"title", text_buf)?);
                    return Ok(());
                }
                "setId" => self.set_id = get_attr(e, b"root"),
                "versionNumber" => self.version = get_attr(e, b"value"),
                "effectiveTime" => self.effective_time = get_attr(e, b"value"),
                _ => {}
            }
        }

        if name == "manufacturedProduct" && parent == "subject" && self.product.is_none() {
            self.product = Some(ProductBuilder::new(depth));
        }

        if let Some(product) = self.product.as_mut() {
            match name {
                "formCode" if parent == "manufacturedProduct" || parent == "partProduct" => {
                    if let Some(form) = normalized_attr(e, b"displayName") {
                        product.forms.push(form);
                    }
                }
                "routeCode" => {
                    if let Some(route) = normalized_attr(e, b"displayName") {
                        if !product.routes.contains(&route) {
                            product.routes.push(route);
                        }
                    }
                }
                "ingredient" | "activeIngredient" | "inactiveIngredient"
                    if self.ingredient.is_none() =>
                {
                    let role = match name {
                        "activeIngredient" => Some(IngredientRole::Active),
                        "inactiveIngredient" => Some(IngredientRole::Inactive),
                        _ => get_attr(e, b"classCode")
                            .and_then(|code| IngredientRole::from_class_code(&code)),
                    };
                    self.ingredient = Some(IngredientBuilder::new(depth, role));
                }
                "name" => {
                    let in_substance = SUBSTANCE_ELEMENTS.contains(&parent.as_str());
                    if let Some(ingredient) = self.ingredient.as_mut() {
                        if in_substance && ingredient.name.is_none() {
                            let text = read_text_content(reader, b"name", text_buf)?;
                            ingredient.name = non_empty(normalize_term(&text));
                            return Ok(());
                        }
                    } else if parent == "manufacturedProduct" && product.name.is_none() {
                        product.name = non_empty(read_text_content(reader, b"name", text_buf)?);
                        return Ok(());
                    }
                }
                "code" if SUBSTANCE_ELEMENTS.contains(&parent.as_str()) => {
                    if let Some(ingredient) = self.ingredient.as_mut() {
                        if get_attr(e, b"codeSystem").as_deref() == Some(UNII_CODE_SYSTEM) {
                            ingredient.unii = get_attr(e, b"code");
                        }
                    }
                }
                "numerator" | "denominator" if parent == "quantity" => {
                    if let Some(ingredient) = self.ingredient.as_mut() {
                        if name == "numerator" {
                            ingredient.numerator = render_quantity(e, false);
                        } else {
                            ingredient.denominator = render_quantity(e, true);
                        }
                    }
                }
                _ => {}
            }
        }

        self.stack.push(name.to_string());
        Ok(())
    }

    fn on_end(&mut self) {
        self.stack.pop();
        let depth = self.stack.len();

        if self.ingredient.as_ref().is_some_and(|i| i.depth == depth) {
            self.close_ingredient();
        }
        if self.product.as_ref().is_some_and(|p| p.depth == depth) {
            self.close_product();
        }
    }

    fn close_ingredient(&mut self) {
        let Some(builder) = self.ingredient.take() else {
            return;
        };
        if let (Some(record), Some(product)) = (builder.finish(), self.product.as_mut()) {
            product.ingredients.push(record);
        }
    }

    fn close_product(&mut self) {
        if let Some(product) = self.product.take() {
            self.products.push(product.finish());
        }
    }

    fn finish(mut self) -> SplDocument {
        self.close_ingredient();
        self.close_product();

        debug!(
            set_id = %self.requested_set_id,
            products = self.products.len(),
            "Parsed SPL document"
        );

        SplDocument {
            set_id: self
                .set_id
                .map(|id| id.to_ascii_lowercase())
                .unwrap_or(self.requested_set_id),
            title: self.title,
            version: self.version,
            effective_time: self.effective_time,
            products: self.products,
        }
    }
}
