//! `[Proxy Group]` entries
//!
//! ```text
//! Auto = url-test, HK, JP, url=http://www.gstatic.com/generate_204, interval=600
//! Pick = select, policy-path=https://example.com/proxies.list
//! ```

use std::fmt;

use crate::parser::dict::FieldDict;
use crate::parser::entry::{EntryError, EntryResult};
use crate::parser::split::{split_commas, split_kv};

/// Option key naming an external member list
pub const POLICY_PATH: &str = "policy-path";

/// How a group picks among its members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    UrlTest,
    Fallback,
    Select,
    Ssid,
}

impl GroupMode {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "url-test" => Some(GroupMode::UrlTest),
            "fallback" => Some(GroupMode::Fallback),
            "select" => Some(GroupMode::Select),
            "ssid" => Some(GroupMode::Ssid),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GroupMode::UrlTest => "url-test",
            GroupMode::Fallback => "fallback",
            GroupMode::Select => "select",
            GroupMode::Ssid => "ssid",
        }
    }
}

impl fmt::Display for GroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proxy group definition
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyGroup {
    pub raw: String,
    pub name: String,
    pub mode: GroupMode,
    /// Member policy names, in order
    pub members: Vec<String>,
    /// Latency test URL (`url=` option)
    pub test_url: Option<String>,
    /// Members still live in the document at `policy_path`
    pub external: bool,
    pub policy_path: Option<String>,
    pub dict: FieldDict,
}

impl ProxyGroup {
    pub fn parse(line: &str) -> EntryResult<Self> {
        let (name, value) = split_kv(line).ok_or(EntryError::MissingSeparator)?;
        if name.is_empty() {
            return Err(EntryError::MissingField("group name"));
        }

        let dict = FieldDict::parse(value);
        let mode_token = split_commas(value)
            .next()
            .ok_or(EntryError::MissingField("group mode"))?;
        let mode = GroupMode::parse(mode_token)
            .ok_or_else(|| EntryError::UnknownGroupMode(mode_token.to_string()))?;

        let mut group = Self {
            raw: line.to_string(),
            name: name.to_string(),
            mode,
            members: Vec::new(),
            test_url: dict.get("url").map(str::to_string),
            external: false,
            policy_path: None,
            dict,
        };

        if mode == GroupMode::Ssid {
            // members of ssid groups are keyed by network name and are not parsed
            return Ok(group);
        }

        // An external list replaces inline members only when it is the first field after the mode
        let first_field = split_commas(value).nth(1);
        match first_field.and_then(split_kv) {
            Some((POLICY_PATH, location)) if !location.is_empty() => {
                group.external = true;
                group.policy_path = Some(location.to_string());
            }
            _ => {
                group.members = group.dict.positional().iter().skip(1).cloned().collect();
            }
        }

        Ok(group)
    }

    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Replace the member list with names resolved from the external list.
    /// Duplicate names keep their first position.
    pub fn resolve(&mut self, names: impl IntoIterator<Item = String>) {
        self.members.clear();
        for name in names {
            if !self.members.contains(&name) {
                self.members.push(name);
            }
        }
        self.external = false;
    }
}

impl fmt::Display for ProxyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mode == GroupMode::Ssid {
            return f.write_str(&self.raw);
        }

        let mut fields = vec![self.mode.as_str().to_string()];
        match (&self.policy_path, self.external) {
            (Some(location), true) => fields.push(format!("{}={}", POLICY_PATH, location)),
            _ => fields.extend(self.members.iter().cloned()),
        }
        // an external list is written above (or already resolved into members)
        let external_list = self.policy_path.is_some();
        for (key, value) in self.dict.options().filter(|(k, _)| !(external_list && *k == POLICY_PATH)) {
            fields.push(format!("{}={}", key, value));
        }

        write!(f, "{} = {}", self.name, fields.join(", "))
    }
}
