//! Field dictionary
//!
//! Entries such as `Proxy = ss, 1.2.3.4, 443, encrypt-method=aes-128-gcm`
//! carry a comma-separated value blob. [`FieldDict`] splits it once into
//! positional tokens and named options; lookups go by position or by name.

use indexmap::IndexMap;

use crate::parser::split::split_fields;

/// Positional + named decomposition of a value blob
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDict {
    positional: Vec<String>,
    named: IndexMap<String, String>,
}

impl FieldDict {
    /// Parse a comma-separated value blob
    pub fn parse(value: &str) -> Self {
        let (positional, named) = split_fields(value);
        Self { positional, named }
    }

    /// Positional token at `index`
    pub fn at(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    /// Option value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// Whether an option named `name` is present
    pub fn has_key(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Positional tokens, in source order
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Named options, in source order
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
