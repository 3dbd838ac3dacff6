//! `[Rule]` entries
//!
//! ```text
//! DOMAIN-SUFFIX,google.com,Proxy
//! IP-CIDR,192.168.0.0/16,DIRECT,no-resolve
//! AND,((DOMAIN,a.com),(DEST-PORT,443)),Proxy
//! RULE-SET,https://example.com/streaming.list,Proxy
//! FINAL,DIRECT
//! ```
//!
//! Rule priority is positional, so the order of these entries is meaningful.

use std::fmt;

use crate::parser::entry::{EntryError, EntryResult};

/// Trailing flags a rule may carry after its policy
const RULE_FLAGS: [&str; 3] = ["no-resolve", "dns-failed", "extended-matching"];

/// Rule sets provided by the client itself; they have no location to fetch
const BUILTIN_RULE_SETS: [&str; 2] = ["SYSTEM", "LAN"];

/// What a rule matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    IpCidr,
    GeoIp,
    Domain,
    DomainSuffix,
    DomainKeyword,
    UserAgent,
    UrlRegex,
    ProcessName,
    And,
    Or,
    Not,
    DestPort,
    SrcIp,
    InPort,
    RuleSet,
    Final,
}

impl Matcher {
    pub fn parse(token: &str) -> Option<Self> {
        let matcher = match token {
            "IP-CIDR" => Matcher::IpCidr,
            "GEO-IP" => Matcher::GeoIp,
            "DOMAIN" => Matcher::Domain,
            "DOMAIN-SUFFIX" => Matcher::DomainSuffix,
            "DOMAIN-KEYWORD" => Matcher::DomainKeyword,
            "USER-AGENT" => Matcher::UserAgent,
            "URL-REGEX" => Matcher::UrlRegex,
            "PROCESS-NAME" => Matcher::ProcessName,
            "AND" => Matcher::And,
            "OR" => Matcher::Or,
            "NOT" => Matcher::Not,
            "DEST-PORT" => Matcher::DestPort,
            "SRC-IP" => Matcher::SrcIp,
            "IN-PORT" => Matcher::InPort,
            "RULE-SET" => Matcher::RuleSet,
            "FINAL" => Matcher::Final,
            _ => return None,
        };
        Some(matcher)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Matcher::IpCidr => "IP-CIDR",
            Matcher::GeoIp => "GEO-IP",
            Matcher::Domain => "DOMAIN",
            Matcher::DomainSuffix => "DOMAIN-SUFFIX",
            Matcher::DomainKeyword => "DOMAIN-KEYWORD",
            Matcher::UserAgent => "USER-AGENT",
            Matcher::UrlRegex => "URL-REGEX",
            Matcher::ProcessName => "PROCESS-NAME",
            Matcher::And => "AND",
            Matcher::Or => "OR",
            Matcher::Not => "NOT",
            Matcher::DestPort => "DEST-PORT",
            Matcher::SrcIp => "SRC-IP",
            Matcher::InPort => "IN-PORT",
            Matcher::RuleSet => "RULE-SET",
            Matcher::Final => "FINAL",
        }
    }

    /// Logical matchers wrap sub-rules, whose commas belong to the value
    pub fn is_logical(self) -> bool {
        matches!(self, Matcher::And | Matcher::Or | Matcher::Not)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split the matcher token off a rule line
fn split_matcher(line: &str) -> EntryResult<(Matcher, &str)> {
    let (token, rest) = match line.split_once(',') {
        Some((token, rest)) => (token.trim(), rest.trim()),
        None => (line.trim(), ""),
    };
    let matcher = Matcher::parse(token).ok_or_else(|| EntryError::UnknownMatcher(token.to_string()))?;
    Ok((matcher, rest))
}

/// Peel known trailing flags off `rest`
fn split_flags(mut rest: &str) -> (&str, Vec<String>) {
    let mut flags = Vec::new();
    while let Some((head, tail)) = rest.rsplit_once(',') {
        let tail = tail.trim();
        if !RULE_FLAGS.contains(&tail) {
            break;
        }
        flags.insert(0, tail.to_string());
        rest = head.trim_end();
    }
    (rest, flags)
}

/// Split `value,policy` at the last comma
fn split_policy(rest: &str) -> EntryResult<(&str, &str)> {
    let (value, policy) = rest
        .rsplit_once(',')
        .map(|(v, p)| (v.trim(), p.trim()))
        .ok_or(EntryError::MissingField("policy"))?;
    if value.is_empty() {
        return Err(EntryError::MissingField("match value"));
    }
    if policy.is_empty() {
        return Err(EntryError::MissingField("policy"));
    }
    Ok((value, policy))
}

/// Drop a trailing `,policy` after the closing parenthesis of a logical rule
fn strip_logical_policy(rest: &str) -> &str {
    match rest.rfind(')') {
        Some(end) if rest[end + 1..].trim_start().starts_with(',') => rest[..=end].trim_end(),
        _ => rest,
    }
}

fn write_flags(f: &mut fmt::Formatter<'_>, flags: &[String]) -> fmt::Result {
    for flag in flags {
        write!(f, ",{}", flag)?;
    }
    Ok(())
}

/// A single matching rule
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub raw: String,
    pub matcher: Matcher,
    /// Match value; `None` for `FINAL`
    pub value: Option<String>,
    /// Policy (direction) traffic matching this rule is sent to
    pub policy: String,
    pub flags: Vec<String>,
}

impl Rule {
    pub fn parse(line: &str) -> EntryResult<Self> {
        Self::parse_inner(line, None)
    }

    /// Parse a line from an external rule list, which takes its policy from the
    /// referencing `RULE-SET` entry. A policy present in the line is ignored.
    pub fn with_policy(line: &str, policy: &str) -> EntryResult<Self> {
        Self::parse_inner(line, Some(policy))
    }

    fn parse_inner(line: &str, inherited: Option<&str>) -> EntryResult<Self> {
        let (matcher, rest) = split_matcher(line)?;
        let (rest, flags) = split_flags(rest);

        let (value, policy) = match (matcher, inherited) {
            (Matcher::RuleSet, _) => return Err(EntryError::NestedRuleSet),
            (Matcher::Final, Some(policy)) => (None, policy),
            (Matcher::Final, None) => {
                let policy = rest.split(',').next().map(str::trim).unwrap_or_default();
                if policy.is_empty() {
                    return Err(EntryError::MissingField("policy"));
                }
                (None, policy)
            }
            (matcher, Some(policy)) => {
                let value = if matcher.is_logical() {
                    strip_logical_policy(rest)
                } else {
                    rest.split(',').next().map(str::trim).unwrap_or_default()
                };
                if value.is_empty() {
                    return Err(EntryError::MissingField("match value"));
                }
                (Some(value), policy)
            }
            (_, None) => {
                let (value, policy) = split_policy(rest)?;
                (Some(value), policy)
            }
        };

        Ok(Self {
            raw: line.to_string(),
            matcher,
            value: value.map(str::to_string),
            policy: policy.to_string(),
            flags,
        })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{},{},{}", self.matcher, value, self.policy)?,
            None => write!(f, "{},{}", self.matcher, self.policy)?,
        }
        write_flags(f, &self.flags)
    }
}

/// A reference to an external rule list
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub raw: String,
    /// Remote address or local path of the list
    pub location: String,
    /// Policy every rule of the list is sent to
    pub policy: String,
    pub flags: Vec<String>,
}

impl RuleSet {
    /// Whether `line` starts with the `RULE-SET` matcher
    pub fn is_rule_set(line: &str) -> bool {
        line.starts_with(Matcher::RuleSet.as_str())
    }

    pub fn parse(line: &str) -> EntryResult<Self> {
        let (matcher, rest) = split_matcher(line)?;
        if matcher != Matcher::RuleSet {
            return Err(EntryError::UnknownMatcher(matcher.to_string()));
        }
        let (rest, flags) = split_flags(rest);
        let (location, policy) = split_policy(rest)?;

        Ok(Self {
            raw: line.to_string(),
            location: location.to_string(),
            policy: policy.to_string(),
            flags,
        })
    }

    /// Built-in sets are resolved by the client and are never fetched
    pub fn is_builtin(&self) -> bool {
        BUILTIN_RULE_SETS.contains(&self.location.as_str())
    }

    pub fn matcher(&self) -> Matcher {
        Matcher::RuleSet
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", Matcher::RuleSet, self.location, self.policy)?;
        write_flags(f, &self.flags)
    }
}
