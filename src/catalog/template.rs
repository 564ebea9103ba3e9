//! Accumulates markup strings for the catalog-template generator.
//!
//! xgettext has no markup parser, so strings collected from annotated
//! documents are rendered as a virtual PHP source of gettext calls, each
//! preceded by a `// Source: ...` comment that ends up in the `.pot` file.

use std::collections::HashSet;

use crate::utils::normalize_whitespace;

/// Marker xgettext is told to keep comments for (`--add-comments=Source:`).
pub const SOURCE_COMMENT_TAG: &str = "Source:";

#[derive(Debug, Clone, PartialEq, Eq)]
struct TemplateEntry {
    domain: Option<String>,
    canonical: String,
    comment: String,
}

impl TemplateEntry {
    fn render(&self) -> String {
        let call = match &self.domain {
            Some(domain) => format!("dgettext({}, {});", php_string(domain), php_string(&self.canonical)),
            None => format!("_({});", php_string(&self.canonical)),
        };
        format!("// {} {}\n{}\n", SOURCE_COMMENT_TAG, self.comment, call)
    }
}

#[derive(Debug, Default, Clone)]
pub struct CatalogTemplate {
    entries: Vec<TemplateEntry>,
    seen: HashSet<String>,
}

impl CatalogTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one string. Empty strings are ignored and an entry identical to
    /// an earlier one (same domain, string and comment) is kept once.
    pub fn emit(&mut self, domain: Option<&str>, canonical: &str, source_comment: &str) {
        if canonical.is_empty() {
            return;
        }
        let entry = TemplateEntry {
            domain: domain.map(str::to_string),
            canonical: canonical.to_string(),
            comment: normalize_whitespace(source_comment),
        };
        if self.seen.insert(entry.render()) {
            self.entries.push(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The virtual PHP source handed to xgettext.
    pub fn render_php(&self) -> String {
        let mut out = String::from("<?php\n");
        for entry in &self.entries {
            out.push_str(&entry.render());
        }
        out
    }
}

/// Double-quoted PHP string literal. Non-ASCII text is kept as UTF-8.
fn php_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
