//! Renderer
//!
//! Writes a document back out as configuration text: the managed-config
//! directive, then every rendered section in a fixed order, each followed by
//! a blank line. Missing sections are written as an empty header block.

use std::fmt::Display;

use crate::parser::{Document, Section};

/// Accumulates output lines
#[derive(Debug, Default)]
struct Writer {
    content: String,
}

impl Writer {
    fn line(&mut self, line: impl Display) {
        self.content.push_str(&line.to_string());
        self.content.push('\n');
    }
}

/// Render `doc`, announcing `url` as its managed source
pub fn render(doc: &Document, url: &str) -> String {
    let mut writer = Writer::default();
    writer.line(doc.managed.directive(url));

    for section in Section::RENDERED {
        writer.line(format_args!("[{}]", section));
        for entry in doc.entries(section) {
            writer.line(entry);
        }
        writer.line("");
    }

    writer.content
}
