//! Parser module
//!
//! Splitting helpers, the entry model, the document and the section parser.

pub mod dict;
pub mod document;
pub mod entry;
pub mod group;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod rewrite;
pub mod rule;
pub mod section;
pub mod split;

pub use dict::FieldDict;
pub use document::{Document, ManagedConfig, DEFAULT_INTERVAL, MANAGED_CONFIG_PREFIX};
pub use entry::{Entry, EntryError, EntryResult, KeyValue, Proxy};
pub use group::{GroupMode, ProxyGroup};
pub use parser::{content_lines, is_comment, parse, Parser};
pub use rewrite::{HeaderAction, HeaderRewrite, UrlRewrite, UrlRewriteKind};
pub use rule::{Matcher, Rule, RuleSet};
pub use section::Section;
pub use split::{split_fields, split_kv};
