//! Expansion of external references
//!
//! Two passes run over a parsed [`Document`]:
//!
//! 1. **Rules.** Every `RULE-SET` entry is replaced, in place, by the rules of
//!    the list it points to. Sets are fetched one after another.
//! 2. **Proxies.** Every group with a `policy-path` gets its members from the
//!    list it points to, and the listed proxies are merged into `[Proxy]`.
//!    All lists are fetched concurrently; results are merged in group order.
//!
//! A failed fetch expands to nothing. It never aborts the pipeline, but it is
//! recorded in the returned [`ExpansionReport`].

use futures::future::join_all;
use indexmap::IndexMap;
use zucchina_core::Fetch;

use crate::parser::{content_lines, split_kv, Document, Entry, Proxy, Rule, Section};

/// A referenced document that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub location: String,
    pub reason: String,
}

/// Outcome of an expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// Number of documents requested
    pub fetched: usize,
    /// Requests that failed and were treated as empty documents
    pub failures: Vec<FetchFailure>,
}

impl ExpansionReport {
    /// Whether every referenced document was fetched
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn a fetch result into document text, recording failures
    fn settle(&mut self, location: &str, result: zucchina_core::Result<String>) -> String {
        self.fetched += 1;
        match result {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("⚠️ Expanding {} as an empty document: {}", location, e);
                self.failures.push(FetchFailure {
                    location: location.to_string(),
                    reason: e.to_string(),
                });
                String::new()
            }
        }
    }
}

/// Resolves external references of a document through a [`Fetch`] implementation
pub struct Expander<'a> {
    fetcher: &'a dyn Fetch,
}

impl<'a> Expander<'a> {
    pub fn new(fetcher: &'a dyn Fetch) -> Self {
        Self { fetcher }
    }

    /// Run both passes over `doc`
    pub async fn expand(&self, doc: &mut Document) -> ExpansionReport {
        let mut report = ExpansionReport::default();
        self.expand_rules(doc, &mut report).await;
        self.expand_proxies(doc, &mut report).await;
        report
    }

    /// Splice the rules of every `RULE-SET` into `[Rule]` at its position
    pub async fn expand_rules(&self, doc: &mut Document, report: &mut ExpansionReport) {
        if !doc.has_section(Section::Rule) {
            return;
        }

        let rules = doc.take_entries(Section::Rule);
        let mut expanded = Vec::with_capacity(rules.len());

        for entry in rules {
            let set = match entry {
                Entry::RuleSet(set) if !set.is_builtin() => set,
                other => {
                    expanded.push(other);
                    continue;
                }
            };

            let result = self.fetcher.fetch(&set.location).await;
            let text = report.settle(&set.location, result);

            let before = expanded.len();
            for line in content_lines(&text) {
                match Rule::with_policy(line, &set.policy) {
                    Ok(rule) => expanded.push(Entry::Rule(rule)),
                    Err(e) => tracing::debug!("Dropping rule `{}` from {}: {}", line, set.location, e),
                }
            }
            tracing::debug!("Expanded {} into {} rule(s)", set.location, expanded.len() - before);
        }

        doc.set_entries(Section::Rule, expanded);
    }

    /// Resolve external proxy groups and rebuild `[Proxy]`.
    ///
    /// Proxies are keyed by name; a later definition replaces an earlier one.
    /// Precedence: inline proxies in order, then groups in section order, then
    /// lines within each fetched list.
    ///
    /// A resolved group lists the fetched names in fetched order, keeping only
    /// the first occurrence of a repeated name. `[Proxy]` is created when it was
    /// absent from the source but fetched lists supplied proxies.
    pub async fn expand_proxies(&self, doc: &mut Document, report: &mut ExpansionReport) {
        let mut proxies: IndexMap<String, Proxy> = IndexMap::new();
        for entry in doc.entries(Section::Proxy) {
            if let Entry::Proxy(proxy) = entry {
                proxies.insert(proxy.name.clone(), proxy.clone());
            }
        }

        let targets: Vec<(usize, String)> = doc
            .entries(Section::ProxyGroup)
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                Entry::ProxyGroup(group) if group.is_external() => {
                    group.policy_path.clone().map(|location| (index, location))
                }
                _ => None,
            })
            .collect();

        let results = join_all(
            targets
                .iter()
                .map(|(_, location)| self.fetcher.fetch(location)),
        )
        .await;

        if let Some(groups) = doc.entries_mut(Section::ProxyGroup) {
            for ((index, location), result) in targets.iter().zip(results) {
                let text = report.settle(location, result);

                let mut names = Vec::new();
                for line in content_lines(&text) {
                    match split_kv(line) {
                        Some((name, definition)) if !name.is_empty() => {
                            names.push(name.to_string());
                            proxies.insert(name.to_string(), Proxy::new(name, definition));
                        }
                        _ => tracing::debug!("Dropping proxy line `{}` from {}", line, location),
                    }
                }

                if let Some(Entry::ProxyGroup(group)) = groups.get_mut(*index) {
                    tracing::debug!("Resolved group {} with {} member(s)", group.name, names.len());
                    group.resolve(names);
                }
            }
        }

        if doc.has_section(Section::Proxy) || !proxies.is_empty() {
            doc.set_entries(Section::Proxy, proxies.into_values().map(Entry::Proxy).collect());
        }
    }
}
