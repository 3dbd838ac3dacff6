//! Section parser
//!
//! Line-oriented state machine: the current section decides how every
//! following line is parsed, until the next `[Header]`.

use crate::parser::document::{Document, ManagedConfig, MANAGED_CONFIG_PREFIX};
use crate::parser::entry::Entry;
use crate::parser::section::Section;
use crate::parser::split::split_kv;

/// Whether `line` (already trimmed) is a comment
pub fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with(';') || line.starts_with("//")
}

/// Trimmed lines of `text` that are neither blank nor comments
pub fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_comment(line))
}

/// Section the parser is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// Before the first header
    Start,
    Known(Section),
    /// Inside a section whose name is not recognised
    Unknown,
}

/// Parser state
pub struct Parser<'a> {
    source: &'a str,
    cursor: Cursor,
    document: Document,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: Cursor::Start,
            document: Document::new(),
        }
    }

    /// Parse the whole source into a document
    pub fn parse(mut self) -> Document {
        match self.source.lines().next().map(str::trim) {
            Some(first) if first.starts_with(MANAGED_CONFIG_PREFIX) => {
                self.document.managed = parse_managed(first);
                tracing::debug!(
                    "Config managed through {:?} interval={} strict={}",
                    self.document.managed.url,
                    self.document.managed.interval,
                    self.document.managed.strict
                );
            }
            _ => tracing::debug!("Unmanaged config"),
        }

        for line in content_lines(self.source) {
            self.parse_line(line);
        }

        self.document
    }

    fn parse_line(&mut self, line: &str) {
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            self.cursor = match Section::from_name(name) {
                Some(section) => {
                    self.document.open_section(section);
                    Cursor::Known(section)
                }
                None => {
                    tracing::debug!("Skipping unknown section [{}]", name);
                    Cursor::Unknown
                }
            };
            return;
        }

        let Cursor::Known(section) = self.cursor else {
            return;
        };

        match Entry::parse(section, line) {
            Ok(entry) => self.document.push(section, entry),
            Err(e) => tracing::debug!("Dropping invalid [{}] entry `{}`: {}", section, line, e),
        }
    }
}

/// Parse `#!MANAGED-CONFIG <url> interval=<secs> strict=<bool>`
fn parse_managed(line: &str) -> ManagedConfig {
    let mut managed = ManagedConfig::default();

    let mut parts = line.split_whitespace().skip(1);
    managed.url = parts.next().map(str::to_string);

    for part in parts {
        match split_kv(part) {
            Some(("interval", value)) => match value.parse() {
                Ok(interval) => managed.interval = interval,
                Err(_) => tracing::debug!("Ignoring invalid managed interval `{}`", value),
            },
            Some(("strict", value)) => managed.strict = value.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }

    managed
}

/// Parse a configuration source into a document
pub fn parse(source: &str) -> Document {
    Parser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::document::DEFAULT_INTERVAL;
    use crate::parser::group::GroupMode;

    #[test]
    fn test_parse_empty() {
        let doc = parse("");
        assert_eq!(doc.sections().count(), 0);
        assert_eq!(doc.managed, ManagedConfig::default());
    }

    #[test]
    fn test_managed_header() {
        let doc = parse("#!MANAGED-CONFIG https://example.com/a.conf interval=3600 strict=TRUE\n[General]\n");
        assert_eq!(doc.managed.url.as_deref(), Some("https://example.com/a.conf"));
        assert_eq!(doc.managed.interval, 3600);
        assert!(doc.managed.strict);
    }

    #[test]
    fn test_managed_header_defaults() {
        let doc = parse("#!MANAGED-CONFIG https://example.com/a.conf\n");
        assert_eq!(doc.managed.interval, DEFAULT_INTERVAL);
        assert!(!doc.managed.strict);

        let doc = parse("#!MANAGED-CONFIG https://example.com/a.conf interval=soon\n");
        assert_eq!(doc.managed.interval, DEFAULT_INTERVAL);
    }

    #[test]
    fn test_managed_url_with_query() {
        let doc = parse("#!MANAGED-CONFIG https://example.com/sub?token=abc strict=true\n");
        assert_eq!(doc.managed.url.as_deref(), Some("https://example.com/sub?token=abc"));
        assert!(doc.managed.strict);
    }

    #[test]
    fn test_managed_header_only_on_first_line() {
        let doc = parse("[General]\n#!MANAGED-CONFIG https://example.com/a.conf interval=60\n");
        assert_eq!(doc.managed, ManagedConfig::default());
        assert!(doc.entries(Section::General).is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let doc = parse(
            "# leading comment\n\n[General]\n; semicolon\n// slashes\n   \nloglevel = notify\n  # indented\n",
        );
        let general = doc.entries(Section::General);
        assert_eq!(general.len(), 1);
        assert_eq!(general[0].to_string(), "loglevel = notify");
    }

    #[test]
    fn test_lines_before_any_section_are_ignored() {
        let doc = parse("loglevel = notify\n[General]\nipv6 = false\n");
        assert_eq!(doc.entries(Section::General).len(), 1);
    }

    #[test]
    fn test_unknown_section_is_skipped() {
        let doc = parse("[MITM]\nhostname = *.example.com\n[rule]\nFINAL,DIRECT\n[Rule]\nFINAL,DIRECT\n");
        assert_eq!(doc.sections().count(), 1);
        assert_eq!(doc.entries(Section::Rule).len(), 1);
    }

    #[test]
    fn test_reopened_section_appends() {
        let doc = parse("[Rule]\nDOMAIN,a.com,DIRECT\n[General]\na = 1\n[Rule]\nFINAL,Proxy\n");
        let rules: Vec<_> = doc.entries(Section::Rule).iter().map(Entry::to_string).collect();
        assert_eq!(rules, vec!["DOMAIN,a.com,DIRECT", "FINAL,Proxy"]);

        let order: Vec<_> = doc.sections().map(|(s, _)| s).collect();
        assert_eq!(order, vec![Section::Rule, Section::General]);
    }

    #[test]
    fn test_empty_section_exists() {
        let doc = parse("[Host]\n");
        assert!(doc.has_section(Section::Host));
        assert!(!doc.has_section(Section::General));
    }

    #[test]
    fn test_invalid_entries_are_dropped() {
        let doc = parse(
            "[Proxy Group]\nA = select, X\nB = random, X\n[Rule]\nDOMAIN,a.com,A\nBOGUS,x,A\n[Proxy]\nnot a proxy\n",
        );
        assert_eq!(doc.entries(Section::ProxyGroup).len(), 1);
        assert_eq!(doc.entries(Section::Rule).len(), 1);
        assert!(doc.entries(Section::Proxy).is_empty());
    }

    #[test]
    fn test_dispatch() {
        let doc = parse(
            "[Proxy]\nHK = ss, hk.example.com, 443\n\
             [Proxy Group]\nAuto = url-test, HK, url=http://t/204\n\
             [Rule]\nRULE-SET,/srv/a.list,Auto\nFINAL,DIRECT\n\
             [URL Rewrite]\n^http://a http://b 302\n\
             [Header Rewrite]\n^http://a header-del Cookie\n",
        );

        assert!(matches!(doc.entries(Section::Proxy)[0], Entry::Proxy(_)));
        match &doc.entries(Section::ProxyGroup)[0] {
            Entry::ProxyGroup(group) => assert_eq!(group.mode, GroupMode::UrlTest),
            other => panic!("unexpected entry {:?}", other),
        }
        assert!(matches!(doc.entries(Section::Rule)[0], Entry::RuleSet(_)));
        assert!(matches!(doc.entries(Section::Rule)[1], Entry::Rule(_)));
        assert!(matches!(doc.entries(Section::UrlRewrite)[0], Entry::UrlRewrite(_)));
        assert!(matches!(doc.entries(Section::HeaderRewrite)[0], Entry::HeaderRewrite(_)));
    }

    #[test]
    fn test_content_lines() {
        let lines: Vec<_> = content_lines("DOMAIN,a.com\r\n\r\n# note\n  IP-CIDR,1.0.0.0/8  \n").collect();
        assert_eq!(lines, vec!["DOMAIN,a.com", "IP-CIDR,1.0.0.0/8"]);
    }
}
