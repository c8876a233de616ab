use std::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComponentKind {
    Header,
    Body,
    Footer,
    Buttons,
    #[serde(other)]
    Other,
}

impl ComponentKind {
    pub fn as_str(&self) -> &str {
        match self {
            ComponentKind::Header => "HEADER",
            ComponentKind::Body => "BODY",
            ComponentKind::Footer => "FOOTER",
            ComponentKind::Buttons => "BUTTONS",
            ComponentKind::Other => "OTHER",
        }
    }

    /// Component type as the send endpoint expects it.
    pub fn wire_name(&self) -> &str {
        match self {
            ComponentKind::Header => "header",
            ComponentKind::Body => "body",
            ComponentKind::Footer => "footer",
            ComponentKind::Buttons => "buttons",
            ComponentKind::Other => "other",
        }
    }
}

impl Display for ComponentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub components: Vec<TemplateComponent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_format: Option<String>,
}

impl Template {
    pub fn component(&self, kind: ComponentKind) -> Option<&TemplateComponent> {
        self.components.iter().find(|c| c.kind == kind)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateComponent {
    #[serde(rename = "type")]
    pub kind: ComponentKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<TemplateExample>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<TemplateButton>>,
}

impl TemplateComponent {
    /// Media headers (IMAGE, VIDEO, DOCUMENT, LOCATION) have no text to scan.
    pub fn is_text(&self) -> bool {
        match self.format.as_deref() {
            None => true,
            Some(format) => format.eq_ignore_ascii_case("TEXT"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateExample {
    #[serde(
        default,
        deserialize_with = "flatten_header_text",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub header_text: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_text: Vec<Vec<String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_text_named_params: Vec<NamedParamExample>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_text_named_params: Vec<NamedParamExample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedParamExample {
    pub param_name: String,
    pub example: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateButton {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HeaderText {
    Flat(Vec<String>),
    Nested(Vec<Vec<String>>),
}

// The provider documents `["x"]`; one front-end typed it as `[["x"]]`.
fn flatten_header_text<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<HeaderText>::deserialize(deserializer)?;
    Ok(match value {
        None => Vec::new(),
        Some(HeaderText::Flat(values)) => values,
        Some(HeaderText::Nested(rows)) => rows.into_iter().flatten().collect(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesResponse {
    #[serde(default)]
    pub templates: Vec<Template>,
}
