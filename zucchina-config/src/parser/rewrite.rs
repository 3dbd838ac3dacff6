//! `[URL Rewrite]` and `[Header Rewrite]` entries
//!
//! Both are whitespace separated:
//!
//! ```text
//! ^https?://(www.)?g.cn https://www.google.com 302
//! ^http://example.com header-add X-Client zucchina
//! ```

use std::fmt;

use crate::parser::entry::{EntryError, EntryResult};

/// Split off the first whitespace-delimited word
fn next_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim_start())),
        None => Some((input, "")),
    }
}

/// What a URL rewrite does with a matching request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlRewriteKind {
    /// Rewrite the request in place
    Header,
    /// Answer with a 302 redirect
    Found,
    /// Answer with a 307 redirect
    TemporaryRedirect,
    Reject,
}

impl UrlRewriteKind {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "header" => Some(UrlRewriteKind::Header),
            "302" => Some(UrlRewriteKind::Found),
            "307" => Some(UrlRewriteKind::TemporaryRedirect),
            "reject" => Some(UrlRewriteKind::Reject),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UrlRewriteKind::Header => "header",
            UrlRewriteKind::Found => "302",
            UrlRewriteKind::TemporaryRedirect => "307",
            UrlRewriteKind::Reject => "reject",
        }
    }
}

/// `regex replacement kind`
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRewrite {
    pub raw: String,
    pub pattern: String,
    pub replacement: String,
    pub kind: UrlRewriteKind,
}

impl UrlRewrite {
    pub fn parse(line: &str) -> EntryResult<Self> {
        let (pattern, rest) = next_word(line).ok_or(EntryError::MissingField("pattern"))?;
        let (replacement, rest) = next_word(rest).ok_or(EntryError::MissingField("replacement"))?;
        let (kind, _) = next_word(rest).ok_or(EntryError::MissingField("rewrite kind"))?;
        let kind = UrlRewriteKind::parse(kind)
            .ok_or_else(|| EntryError::UnknownRewriteKind(kind.to_string()))?;

        Ok(Self {
            raw: line.to_string(),
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            kind,
        })
    }
}

impl fmt::Display for UrlRewrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.pattern, self.replacement, self.kind.as_str())
    }
}

/// How a header rewrite mutates the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Add,
    Delete,
    Replace,
}

impl HeaderAction {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "header-add" | "add" => Some(HeaderAction::Add),
            "header-del" | "del" | "delete" => Some(HeaderAction::Delete),
            "header-replace" | "replace" => Some(HeaderAction::Replace),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeaderAction::Add => "header-add",
            HeaderAction::Delete => "header-del",
            HeaderAction::Replace => "header-replace",
        }
    }
}

/// `regex action field [value]`
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRewrite {
    pub raw: String,
    pub pattern: String,
    pub action: HeaderAction,
    pub field: String,
    /// New header value; the rest of the line, absent for deletions
    pub value: Option<String>,
}

impl HeaderRewrite {
    pub fn parse(line: &str) -> EntryResult<Self> {
        let (pattern, rest) = next_word(line).ok_or(EntryError::MissingField("pattern"))?;
        let (action, rest) = next_word(rest).ok_or(EntryError::MissingField("header action"))?;
        let action = HeaderAction::parse(action)
            .ok_or_else(|| EntryError::UnknownRewriteKind(action.to_string()))?;
        let (field, rest) = next_word(rest).ok_or(EntryError::MissingField("header field"))?;

        let value = match (action, rest.trim_end()) {
            (HeaderAction::Delete, _) => None,
            (_, "") => return Err(EntryError::MissingField("header value")),
            (_, value) => Some(value.to_string()),
        };

        Ok(Self {
            raw: line.to_string(),
            pattern: pattern.to_string(),
            action,
            field: field.to_string(),
            value,
        })
    }
}

impl fmt::Display for HeaderRewrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.pattern, self.action.as_str(), self.field)?;
        if let Some(value) = &self.value {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}
