//! In-memory configuration document

use indexmap::IndexMap;

use crate::parser::entry::Entry;
use crate::parser::section::Section;

/// Prefix of the managed-config directive line
pub const MANAGED_CONFIG_PREFIX: &str = "#!MANAGED-CONFIG";

/// Default refresh interval of a managed config, in seconds
pub const DEFAULT_INTERVAL: u64 = 86400;

/// Managed-config metadata taken from the first line of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedConfig {
    /// Where the client should refresh the config from
    pub url: Option<String>,
    /// Refresh interval in seconds
    pub interval: u64,
    /// Whether the client must refresh before use
    pub strict: bool,
}

impl Default for ManagedConfig {
    fn default() -> Self {
        Self {
            url: None,
            interval: DEFAULT_INTERVAL,
            strict: false,
        }
    }
}

impl ManagedConfig {
    /// The directive line announcing `url` as the managed source
    pub fn directive(&self, url: &str) -> String {
        format!(
            "{} {} interval={} strict={}",
            MANAGED_CONFIG_PREFIX, url, self.interval, self.strict
        )
    }
}

/// A parsed configuration: section-keyed, ordered entry lists.
///
/// Sections keep the order in which their header first appeared. Only known
/// sections are stored. After expansion `[Proxy]` may also exist without a
/// header in the source, when external groups contributed proxies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub managed: ManagedConfig,
    sections: IndexMap<Section, Vec<Entry>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `section` exists, keeping any entries it already has
    pub fn open_section(&mut self, section: Section) -> &mut Vec<Entry> {
        self.sections.entry(section).or_default()
    }

    pub fn push(&mut self, section: Section, entry: Entry) {
        self.open_section(section).push(entry);
    }

    pub fn has_section(&self, section: Section) -> bool {
        self.sections.contains_key(&section)
    }

    /// Entries of `section`; empty when the section never appeared
    pub fn entries(&self, section: Section) -> &[Entry] {
        self.sections.get(&section).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn entries_mut(&mut self, section: Section) -> Option<&mut Vec<Entry>> {
        self.sections.get_mut(&section)
    }

    /// Replace the entries of `section`, creating it if needed
    pub fn set_entries(&mut self, section: Section, entries: Vec<Entry>) {
        *self.open_section(section) = entries;
    }

    /// Take the entries of `section` out, leaving it empty but present
    pub fn take_entries(&mut self, section: Section) -> Vec<Entry> {
        self.sections
            .get_mut(&section)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Sections in order of first appearance
    pub fn sections(&self) -> impl Iterator<Item = (Section, &[Entry])> {
        self.sections.iter().map(|(s, e)| (*s, e.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::entry::KeyValue;

    fn kv(line: &str) -> Entry {
        Entry::KeyValue(KeyValue::parse(line).unwrap())
    }

    #[test]
    fn test_sections_keep_first_appearance_order() {
        let mut doc = Document::new();
        doc.open_section(Section::Rule);
        doc.push(Section::General, kv("a = 1"));
        doc.push(Section::Rule, Entry::Rule(crate::parser::rule::Rule::parse("FINAL,DIRECT").unwrap()));
        doc.open_section(Section::General);

        let order: Vec<_> = doc.sections().map(|(s, _)| s).collect();
        assert_eq!(order, vec![Section::Rule, Section::General]);
        assert_eq!(doc.entries(Section::General).len(), 1);
        assert_eq!(doc.entries(Section::Rule).len(), 1);
    }

    #[test]
    fn test_missing_section_is_empty() {
        let doc = Document::new();
        assert!(!doc.has_section(Section::Proxy));
        assert!(doc.entries(Section::Proxy).is_empty());
    }

    #[test]
    fn test_take_entries_keeps_section() {
        let mut doc = Document::new();
        doc.push(Section::Host, kv("a.com = 1.2.3.4"));
        let taken = doc.take_entries(Section::Host);
        assert_eq!(taken.len(), 1);
        assert!(doc.has_section(Section::Host));
        assert!(doc.entries(Section::Host).is_empty());
    }

    #[test]
    fn test_directive() {
        let managed = ManagedConfig::default();
        assert_eq!(
            managed.directive("https://s.example.com/abc"),
            "#!MANAGED-CONFIG https://s.example.com/abc interval=86400 strict=false"
        );
    }
}
