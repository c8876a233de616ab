use std::{
    collections::HashMap,
    fmt::{Display, Formatter, Result},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::models::template::ComponentKind;

/// Identifier inside a `{{...}}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamId {
    Positional(u32),
    Named(String),
}

impl ParamId {
    /// Classifies a raw token. Digits always win over the named pattern.
    pub fn parse(token: &str) -> Option<Self> {
        if token.is_empty() {
            return None;
        }

        if token.bytes().all(|b| b.is_ascii_digit()) {
            return token.parse::<u32>().ok().map(ParamId::Positional);
        }

        let mut bytes = token.bytes();
        let first = bytes.next()?;
        let valid_start = first.is_ascii_alphabetic() || first == b'_';
        let valid_rest = bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_');

        (valid_start && valid_rest).then(|| ParamId::Named(token.to_string()))
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, ParamId::Positional(_))
    }
}

impl Display for ParamId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ParamId::Positional(index) => write!(f, "{}", index),
            ParamId::Named(name) => write!(f, "{}", name),
        }
    }
}

impl Serialize for ParamId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ParamId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ParamId::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid parameter identifier '{}'", raw)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub component: ComponentKind,
    pub id: ParamId,
}

impl SlotKey {
    pub fn new(component: ComponentKind, id: ParamId) -> Self {
        Self { component, id }
    }

    pub fn body(id: ParamId) -> Self {
        Self::new(ComponentKind::Body, id)
    }

    pub fn header(id: ParamId) -> Self {
        Self::new(ComponentKind::Header, id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSlot {
    pub component: ComponentKind,
    pub id: ParamId,
    pub positional: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl ParameterSlot {
    pub fn new(component: ComponentKind, id: ParamId, example: Option<String>) -> Self {
        Self {
            component,
            positional: id.is_positional(),
            id,
            example,
        }
    }

    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.component, self.id.clone())
    }
}

/// User-entered values, keyed by the slot they fill.
#[derive(Debug, Clone, Default)]
pub struct ParameterValues {
    values: HashMap<SlotKey, String>,
}

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: SlotKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn with(mut self, key: SlotKey, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value for `key` if one was entered and it is non-empty.
    pub fn filled(&self, key: &SlotKey) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Wire form of a single entered value, as accepted by the console API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterInput {
    pub component: ComponentKind,
    pub id: ParamId,
    pub value: String,
}

impl FromIterator<ParameterInput> for ParameterValues {
    fn from_iter<I: IntoIterator<Item = ParameterInput>>(iter: I) -> Self {
        let mut values = ParameterValues::new();
        for input in iter {
            values.insert(SlotKey::new(input.component, input.id), input.value);
        }
        values
    }
}
