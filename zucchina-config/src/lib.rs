//! Zucchina Configuration Pipeline
//!
//! This crate parses sectioned proxy-client configuration files, expands the
//! external rule and proxy lists they reference, and renders them back to
//! text.
//!
//! # Example
//!
//! ```rust,ignore
//! use zucchina_config::Template;
//!
//! let mut template = Template::parse(source, "https://s.example.com/abc");
//! let report = template.expand(&fetcher).await;
//! let text = template.render();
//! ```

pub mod expand;
pub mod parser;
pub mod render;

pub use expand::{ExpansionReport, Expander, FetchFailure};
pub use parser::{parse, Document, Entry, EntryError, ManagedConfig, Section};
pub use render::render;

use zucchina_core::Fetch;

/// A document on its way through parse → expand → render
#[derive(Debug, Clone)]
pub struct Template {
    document: Document,
    url: String,
}

impl Template {
    /// Parse `source`. `url` is written into the managed-config line of the output.
    pub fn parse(source: &str, url: impl Into<String>) -> Self {
        Self {
            document: parse(source),
            url: url.into(),
        }
    }

    /// Resolve every external reference through `fetcher`
    pub async fn expand(&mut self, fetcher: &dyn Fetch) -> ExpansionReport {
        Expander::new(fetcher).expand(&mut self.document).await
    }

    pub fn render(&self) -> String {
        render(&self.document, &self.url)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Full pipeline: source text → rendered text plus the expansion report
pub async fn process(source: &str, url: &str, fetcher: &dyn Fetch) -> (String, ExpansionReport) {
    let mut template = Template::parse(source, url);
    let report = template.expand(fetcher).await;
    (template.render(), report)
}
