//! Entry model
//!
//! Every non-comment line of a known section parses into one [`Entry`]. The
//! variant is chosen by the section the line appears in. A line that does not
//! parse yields an [`EntryError`] and never reaches the document.

use std::fmt;
use thiserror::Error;

use crate::parser::dict::FieldDict;
use crate::parser::group::ProxyGroup;
use crate::parser::rewrite::{HeaderRewrite, UrlRewrite};
use crate::parser::rule::{Rule, RuleSet};
use crate::parser::section::Section;
use crate::parser::split::split_kv;

/// Why a line was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("expected `name = value`")]
    MissingSeparator,

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("unknown proxy group mode `{0}`")]
    UnknownGroupMode(String),

    #[error("unknown rule matcher `{0}`")]
    UnknownMatcher(String),

    #[error("nested RULE-SET is not expanded")]
    NestedRuleSet,

    #[error("unknown rewrite kind `{0}`")]
    UnknownRewriteKind(String),
}

pub type EntryResult<T> = Result<T, EntryError>;

/// One parsed line
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// `[General]`, `[Replica]` and `[Host]` lines
    KeyValue(KeyValue),
    Proxy(Proxy),
    ProxyGroup(ProxyGroup),
    Rule(Rule),
    RuleSet(RuleSet),
    UrlRewrite(UrlRewrite),
    HeaderRewrite(HeaderRewrite),
}

impl Entry {
    /// Parse `line` as an entry of `section`
    pub fn parse(section: Section, line: &str) -> EntryResult<Entry> {
        match section {
            Section::General | Section::Replica | Section::Host => {
                KeyValue::parse(line).map(Entry::KeyValue)
            }
            Section::Proxy => Proxy::parse(line).map(Entry::Proxy),
            Section::ProxyGroup => ProxyGroup::parse(line).map(Entry::ProxyGroup),
            Section::Rule if RuleSet::is_rule_set(line) => RuleSet::parse(line).map(Entry::RuleSet),
            Section::Rule => Rule::parse(line).map(Entry::Rule),
            Section::UrlRewrite => UrlRewrite::parse(line).map(Entry::UrlRewrite),
            Section::HeaderRewrite => HeaderRewrite::parse(line).map(Entry::HeaderRewrite),
        }
    }

    /// The line this entry was parsed from
    pub fn raw(&self) -> &str {
        match self {
            Entry::KeyValue(e) => &e.raw,
            Entry::Proxy(e) => &e.raw,
            Entry::ProxyGroup(e) => &e.raw,
            Entry::Rule(e) => &e.raw,
            Entry::RuleSet(e) => &e.raw,
            Entry::UrlRewrite(e) => &e.raw,
            Entry::HeaderRewrite(e) => &e.raw,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::KeyValue(e) => fmt::Display::fmt(e, f),
            Entry::Proxy(e) => fmt::Display::fmt(e, f),
            Entry::ProxyGroup(e) => fmt::Display::fmt(e, f),
            Entry::Rule(e) => fmt::Display::fmt(e, f),
            Entry::RuleSet(e) => fmt::Display::fmt(e, f),
            Entry::UrlRewrite(e) => fmt::Display::fmt(e, f),
            Entry::HeaderRewrite(e) => fmt::Display::fmt(e, f),
        }
    }
}

/// A `key = value` line
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    pub raw: String,
    pub key: String,
    pub value: String,
    pub dict: FieldDict,
}

impl KeyValue {
    pub fn parse(line: &str) -> EntryResult<Self> {
        let (key, value) = split_kv(line).ok_or(EntryError::MissingSeparator)?;
        if key.is_empty() {
            return Err(EntryError::MissingField("key"));
        }

        Ok(Self {
            raw: line.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            dict: FieldDict::parse(value),
        })
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A `[Proxy]` line: `name = type, server, port, options...`
#[derive(Debug, Clone, PartialEq)]
pub struct Proxy {
    pub raw: String,
    pub name: String,
    /// Everything after the `=`
    pub definition: String,
    pub dict: FieldDict,
}

impl Proxy {
    pub fn parse(line: &str) -> EntryResult<Self> {
        let (name, definition) = split_kv(line).ok_or(EntryError::MissingSeparator)?;
        if name.is_empty() {
            return Err(EntryError::MissingField("proxy name"));
        }
        Ok(Self::new(name, definition))
    }

    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        let name = name.into();
        let definition = definition.into();
        Self {
            raw: format!("{} = {}", name, definition),
            dict: FieldDict::parse(&definition),
            name,
            definition,
        }
    }

    /// Proxy protocol, e.g. `ss`, `vmess`, `http`
    pub fn kind(&self) -> Option<&str> {
        self.dict.at(0)
    }
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.definition)
    }
}
