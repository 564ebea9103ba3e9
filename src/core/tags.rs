//! The compact per-element annotation grammar.
//!
//! An annotated element carries one marker attribute (by default `gettext`)
//! whose value is a whitespace-separated list of tags:
//!
//! ```text
//! [domain:](attribute|.)[#hash]
//! ```
//!
//! - `.` binds the tag to the element's text content, any other keyword to
//!   the attribute of that name.
//! - `domain:` overrides the file's default domain for that one string.
//! - `#hash` is the string identity, added by the dictionary builder. Source
//!   templates never carry it; generated locale files always do.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::log::RunLog;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<domain>[A-Za-z0-9_]+):)?(?P<keyword>[A-Za-z0-9_]+|\.)(?:#(?P<hash>[A-Za-z0-9_]+))?$")
        .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("Invalid gettext tag: {0}")]
    Invalid(String),
}

/// What a tag's string is read from and written back to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `.`: the element's text content.
    Text,
    /// The named attribute of the element.
    Attribute(String),
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keyword::Text => write!(f, "."),
            Keyword::Attribute(name) => write!(f, "{}", name),
        }
    }
}

/// One parsed tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub domain: Option<String>,
    pub keyword: Keyword,
    pub hash: Option<String>,
}

impl Annotation {
    pub fn text() -> Self {
        Self {
            domain: None,
            keyword: Keyword::Text,
            hash: None,
        }
    }

    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            domain: None,
            keyword: Keyword::Attribute(name.into()),
            hash: None,
        }
    }

    pub fn in_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// The tag's own domain, or `default` when it has none.
    pub fn effective_domain<'a>(&'a self, default: &'a str) -> &'a str {
        self.domain.as_deref().unwrap_or(default)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(domain) = &self.domain {
            write!(f, "{}:", domain)?;
        }
        write!(f, "{}", self.keyword)?;
        if let Some(hash) = &self.hash {
            write!(f, "#{}", hash)?;
        }
        Ok(())
    }
}

/// A tag as it appeared in the marker, next to its parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    pub raw: String,
    pub annotation: Annotation,
}

/// Parse a single tag.
pub fn parse_tag(raw: &str) -> Result<Annotation, TagError> {
    let caps = TAG_REGEX
        .captures(raw)
        .ok_or_else(|| TagError::Invalid(raw.to_string()))?;

    let keyword = match &caps["keyword"] {
        "." => Keyword::Text,
        name => Keyword::Attribute(name.to_string()),
    };

    Ok(Annotation {
        domain: caps.name("domain").map(|m| m.as_str().to_string()),
        keyword,
        hash: caps.name("hash").map(|m| m.as_str().to_string()),
    })
}

/// Parse a marker value into its tags, in source order.
///
/// Invalid tags are logged and skipped. A tag repeated verbatim is kept once.
pub fn parse_tags(marker: &str, log: &mut RunLog) -> Vec<ParsedTag> {
    let mut tags: Vec<ParsedTag> = Vec::new();

    for raw in marker.split_ascii_whitespace() {
        if tags.iter().any(|t| t.raw == raw) {
            continue;
        }
        match parse_tag(raw) {
            Ok(annotation) => tags.push(ParsedTag {
                raw: raw.to_string(),
                annotation,
            }),
            Err(err) => log.error(err.to_string()),
        }
    }

    tags
}

/// Join tags back into a marker value.
pub fn format_tags<'a>(annotations: impl IntoIterator<Item = &'a Annotation>) -> String {
    annotations
        .into_iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
