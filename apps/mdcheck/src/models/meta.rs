//! Front-matter document model.
//!
//! YAML values are converted once into `MetaValue` so validation can match
//! on shapes instead of probing a dynamic tree. Mapping order is preserved.

use serde_yaml::Value as Yaml;

#[derive(Debug, Clone, PartialEq)]
/// A front-matter value.
pub enum MetaValue {
    Null,
    Bool(bool),
    Number(String),
    String(String),
    List(Vec<MetaValue>),
    Map(Vec<(String, MetaValue)>),
}

impl MetaValue {
    /// Short type name used in validation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            MetaValue::Null => "null",
            MetaValue::Bool(_) => "bool",
            MetaValue::Number(_) => "number",
            MetaValue::String(_) => "string",
            MetaValue::List(_) => "list",
            MetaValue::Map(_) => "map",
        }
    }

    /// The string content when this is a non-empty string.
    pub fn as_non_empty_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

impl From<Yaml> for MetaValue {
    fn from(v: Yaml) -> Self {
        match v {
            Yaml::Null => MetaValue::Null,
            Yaml::Bool(b) => MetaValue::Bool(b),
            Yaml::Number(n) => MetaValue::Number(n.to_string()),
            Yaml::String(s) => MetaValue::String(s),
            Yaml::Sequence(items) => MetaValue::List(items.into_iter().map(MetaValue::from).collect()),
            Yaml::Mapping(map) => MetaValue::Map(
                map.into_iter()
                    .map(|(k, v)| (key_string(k), MetaValue::from(v)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => MetaValue::from(tagged.value),
        }
    }
}

/// Render a YAML mapping key as a plain string.
pub(crate) fn key_string(k: Yaml) -> String {
    match k {
        Yaml::String(s) => s,
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Parsed front matter: string keys in document order.
pub struct FrontMatter {
    entries: Vec<(String, MetaValue)>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<(String, MetaValue)>) -> Self {
        FrontMatter { entries }
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
