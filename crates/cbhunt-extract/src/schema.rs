//! Declared output shapes.
//!
//! A [`Shape`] is both the contract sent to the generative service and the
//! rule set the validator enforces on what comes back.

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    String,
    /// Any JSON number within `min..=max`, fractional values included.
    Range { min: f64, max: f64 },
    Number,
    Enum(&'static [&'static str]),
    Array { items: Box<Shape>, min_items: usize },
    Object(Vec<Field>),
    /// Object with arbitrary keys whose values share one shape.
    Map(Box<Shape>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    /// Required fields must be present and non-null. Optional fields may be
    /// absent or null.
    pub required: bool,
}

impl Field {
    #[must_use]
    pub fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    #[must_use]
    pub fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

/// Top-level JSON container a shape expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    List,
    Object,
}

impl Shape {
    #[must_use]
    pub fn array(items: Shape) -> Self {
        Shape::Array {
            items: Box::new(items),
            min_items: 0,
        }
    }

    #[must_use]
    pub fn non_empty_array(items: Shape) -> Self {
        Shape::Array {
            items: Box::new(items),
            min_items: 1,
        }
    }

    #[must_use]
    pub fn strings() -> Self {
        Shape::array(Shape::String)
    }

    #[must_use]
    pub fn payload_kind(&self) -> PayloadKind {
        match self {
            Shape::Array { .. } => PayloadKind::List,
            _ => PayloadKind::Object,
        }
    }

    /// Human-readable skeleton of the shape, embedded in the request so the
    /// service knows exactly what to emit.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.write_description(&mut out, 0);
        out
    }

    fn write_description(&self, out: &mut String, indent: usize) {
        match self {
            Shape::String => out.push_str("string"),
            Shape::Number => out.push_str("number"),
            Shape::Range { min, max } => {
                let _ = write!(out, "number ({min}-{max})");
            }
            Shape::Enum(values) => {
                let quoted: Vec<String> = values.iter().map(|v| format!("\"{v}\"")).collect();
                out.push_str(&quoted.join(" | "));
            }
            Shape::Array { items, min_items } => {
                out.push('[');
                items.write_description(out, indent);
                out.push(']');
                if *min_items > 0 {
                    let _ = write!(out, " (at least {min_items})");
                }
            }
            Shape::Map(values) => {
                out.push_str("{ [field: string]: ");
                values.write_description(out, indent);
                out.push_str(" }");
            }
            Shape::Object(fields) => {
                let pad = "  ".repeat(indent + 1);
                out.push_str("{\n");
                for field in fields {
                    let _ = write!(out, "{pad}\"{}\": ", field.name);
                    field.shape.write_description(out, indent + 1);
                    if !field.required {
                        out.push_str(" | null");
                    }
                    out.push_str(",\n");
                }
                out.push_str(&"  ".repeat(indent));
                out.push('}');
            }
        }
    }
}

fn right_shape() -> Shape {
    Shape::Object(vec![
        Field::required("title", Shape::String),
        Field::required("description", Shape::String),
    ])
}

/// One co-branding case. Rights must hold at least one concrete entry.
#[must_use]
pub fn case_shape() -> Shape {
    Shape::Object(vec![
        Field::required("projectName", Shape::String),
        Field::required("brandName", Shape::String),
        Field::required("partnerIntro", Shape::String),
        Field::required("productName", Shape::String),
        Field::required("date", Shape::String),
        Field::optional("industry", Shape::String),
        Field::optional("visualStyle", Shape::String),
        Field::optional("campaignSlogan", Shape::String),
        Field::optional("impactResult", Shape::String),
        Field::optional("keyVisualUrl", Shape::String),
        Field::required("rights", Shape::non_empty_array(right_shape())),
        Field::required("insight", Shape::String),
        Field::required("platformSource", Shape::String),
        Field::optional("sourceUrls", Shape::strings()),
    ])
}

#[must_use]
pub fn case_list_shape() -> Shape {
    Shape::array(case_shape())
}

#[must_use]
pub fn trend_list_shape() -> Shape {
    Shape::array(Shape::Object(vec![
        Field::required("ipName", Shape::String),
        Field::required("category", Shape::String),
        Field::required("reason", Shape::String),
        Field::required("targetAudience", Shape::String),
        Field::optional(
            "momentum",
            Shape::Enum(&["Emerging", "Peaking", "Stabilizing"]),
        ),
        Field::optional("commercialValue", Shape::Enum(&["High", "Medium", "Niche"])),
        Field::optional("buzzwords", Shape::strings()),
        Field::optional("compatibility", Shape::strings()),
    ]))
}

#[must_use]
pub fn ip_profile_shape() -> Shape {
    Shape::Object(vec![
        Field::required(
            "meta",
            Shape::Object(vec![
                Field::required("ipName", Shape::String),
                Field::required("rightsHolder", Shape::String),
                Field::required("originMedium", Shape::String),
                Field::required(
                    "currentStatus",
                    Shape::Enum(&["Active", "Dormant", "Classic"]),
                ),
            ]),
        ),
        Field::required(
            "commercialAnalysis",
            Shape::Object(vec![
                Field::required("tier", Shape::Enum(&["S", "A", "B", "C"])),
                Field::required("marketMomentum", Shape::String),
                Field::required(
                    "coreAudience",
                    Shape::Object(vec![
                        Field::required("primaryGen", Shape::String),
                        Field::required("genderSkew", Shape::String),
                        Field::required("psychographics", Shape::String),
                    ]),
                ),
                Field::required("brandArchetype", Shape::String),
                Field::optional("riskFactors", Shape::strings()),
            ]),
        ),
        Field::required(
            "designElements",
            Shape::Object(vec![
                Field::optional("keyColors", Shape::strings()),
                Field::optional("iconography", Shape::strings()),
                Field::optional("texturesAndMaterials", Shape::strings()),
                Field::optional("signatureQuotes", Shape::strings()),
            ]),
        ),
        Field::optional(
            "collabHistory",
            Shape::array(Shape::Object(vec![
                Field::required("time", Shape::String),
                Field::required("brand", Shape::String),
                Field::required("product", Shape::String),
                Field::optional("result", Shape::String),
            ])),
        ),
        Field::required(
            "strategicFit",
            Shape::Object(vec![
                Field::optional("bestIndustries", Shape::strings()),
                Field::optional("avoidIndustries", Shape::strings()),
                Field::required("marketingHooks", Shape::String),
            ]),
        ),
        Field::optional(
            "upcomingTimeline",
            Shape::array(Shape::Object(vec![
                Field::required("date", Shape::String),
                Field::required("event", Shape::String),
            ])),
        ),
    ])
}

#[must_use]
pub fn match_list_shape() -> Shape {
    Shape::array(Shape::Object(vec![
        Field::required("ipName", Shape::String),
        Field::required("category", Shape::String),
        Field::required("matchScore", Shape::Range { min: 0.0, max: 100.0 }),
        Field::required("whyItWorks", Shape::String),
        Field::required("campaignIdea", Shape::String),
        Field::optional("riskFactor", Shape::String),
        Field::optional("budgetLevel", Shape::Enum(&["$", "$$", "$$$"])),
    ]))
}

/// Field-level suggestions for an existing case. Every field is optional and
/// rights may be empty.
#[must_use]
pub fn autocomplete_shape() -> Shape {
    let patch_fields = [
        "projectName",
        "brandName",
        "partnerIntro",
        "productName",
        "date",
        "industry",
        "visualStyle",
        "campaignSlogan",
        "impactResult",
        "keyVisualUrl",
        "insight",
        "platformSource",
    ]
    .into_iter()
    .map(|name| Field::optional(name, Shape::String))
    .chain([
        Field::optional("rights", Shape::array(right_shape())),
        Field::optional("sourceUrls", Shape::strings()),
    ])
    .collect();

    Shape::Object(vec![
        Field::required("suggestedPatch", Shape::Object(patch_fields)),
        Field::optional("confidence", Shape::Map(Box::new(Shape::Number))),
        Field::optional(
            "citations",
            Shape::array(Shape::Object(vec![
                Field::optional("title", Shape::String),
                Field::required("url", Shape::String),
            ])),
        ),
        Field::optional("warnings", Shape::strings()),
    ])
}

#[must_use]
pub fn idea_list_shape() -> Shape {
    Shape::strings()
}

#[must_use]
pub fn social_post_shape() -> Shape {
    Shape::Object(vec![
        Field::required("title", Shape::String),
        Field::required("content", Shape::String),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_shapes_expect_lists() {
        assert_eq!(case_list_shape().payload_kind(), PayloadKind::List);
        assert_eq!(match_list_shape().payload_kind(), PayloadKind::List);
        assert_eq!(ip_profile_shape().payload_kind(), PayloadKind::Object);
    }

    #[test]
    fn description_marks_optional_and_minimums() {
        let text = case_list_shape().describe();
        assert!(text.contains("\"industry\": string | null"));
        assert!(text.contains("(at least 1)"));
        assert!(text.starts_with('['));
    }

    #[test]
    fn description_lists_enum_values() {
        let text = match_list_shape().describe();
        assert!(text.contains("\"$\" | \"$$\" | \"$$$\""));
        assert!(text.contains("number (0-100)"));
    }
}
