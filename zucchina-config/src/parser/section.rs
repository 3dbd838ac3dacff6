//! Section names

use std::fmt;

/// A known `[Name]` section of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    General,
    Proxy,
    Replica,
    ProxyGroup,
    Rule,
    UrlRewrite,
    HeaderRewrite,
    Host,
}

impl Section {
    /// Every known section
    pub const ALL: [Section; 8] = [
        Section::General,
        Section::Proxy,
        Section::Replica,
        Section::ProxyGroup,
        Section::Rule,
        Section::UrlRewrite,
        Section::HeaderRewrite,
        Section::Host,
    ];

    /// Sections written by the renderer, in output order.
    /// `Replica` and `Host` are not rendered.
    pub const RENDERED: [Section; 6] = [
        Section::General,
        Section::Proxy,
        Section::ProxyGroup,
        Section::Rule,
        Section::UrlRewrite,
        Section::HeaderRewrite,
    ];

    /// Header name as written between brackets
    pub fn name(self) -> &'static str {
        match self {
            Section::General => "General",
            Section::Proxy => "Proxy",
            Section::Replica => "Replica",
            Section::ProxyGroup => "Proxy Group",
            Section::Rule => "Rule",
            Section::UrlRewrite => "URL Rewrite",
            Section::HeaderRewrite => "Header Rewrite",
            Section::Host => "Host",
        }
    }

    /// Resolve a header name. Matching is exact and case-sensitive.
    pub fn from_name(name: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
