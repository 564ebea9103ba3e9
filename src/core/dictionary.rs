//! Hash-keyed dictionaries of canonical strings and the builder that derives
//! them from source templates.

use std::{collections::BTreeMap, fmt};

use super::{
    document::{Document, DocumentScanner},
    hash::string_hash,
    tags::{Annotation, format_tags, parse_tags},
};
use crate::log::RunLog;

/// `{domain}:#{hash}`, the identity of one canonical string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DictionaryKey {
    pub domain: String,
    pub hash: String,
}

impl DictionaryKey {
    pub fn new(domain: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            hash: hash.into(),
        }
    }
}

impl fmt::Display for DictionaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:#{}", self.domain, self.hash)
    }
}

/// Outcome of registering a string under a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Inserted,
    /// The same string was already registered under this key.
    Unchanged,
    /// A different string already owns this key; it was kept.
    Collision { existing: String },
}

/// Mapping from `{domain}:#{hash}` to canonical source strings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dictionary {
    entries: BTreeMap<DictionaryKey, String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &DictionaryKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Register `canonical` under `key`. An existing entry is never replaced.
    pub fn register(&mut self, key: DictionaryKey, canonical: String) -> Registration {
        match self.entries.get(&key) {
            None => {
                self.entries.insert(key, canonical);
                Registration::Inserted
            }
            Some(existing) if *existing == canonical => Registration::Unchanged,
            Some(existing) => Registration::Collision {
                existing: existing.clone(),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DictionaryKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }
}

/// An annotated template and the dictionary built from it.
#[derive(Debug)]
pub struct FileTemplate {
    pub document: Document,
    pub dictionary: Dictionary,
}

/// Assigns hash identities to the un-hashed tags of a source template.
#[derive(Debug, Clone)]
pub struct DictionaryBuilder {
    scanner: DocumentScanner,
    default_domain: String,
}

impl DictionaryBuilder {
    pub fn new(scanner: DocumentScanner, default_domain: impl Into<String>) -> Self {
        Self {
            scanner,
            default_domain: default_domain.into(),
        }
    }

    /// Hash every un-hashed tag of `document` and collect its canonical string.
    ///
    /// - A tag that already carries a hash is an error in a source template:
    ///   it is logged and dropped from the marker.
    /// - A tag whose bound value is empty has nothing to translate; it stays
    ///   in the marker un-hashed and adds no dictionary entry.
    /// - Two different strings hashing to the same key are logged; the first
    ///   one wins.
    pub fn build(&self, document: Document, log: &mut RunLog) -> FileTemplate {
        let mut dictionary = Dictionary::new();
        let file = document.display_name();

        for node in self.scanner.scan(&document) {
            let mut rebuilt: Vec<Annotation> = Vec::new();

            for tag in parse_tags(&node.marker(), log) {
                let annotation = tag.annotation;
                if annotation.hash.is_some() {
                    log.error(format!(
                        "{}: {} already translated in source {}: {}",
                        file,
                        annotation.keyword,
                        file,
                        node.outer_html()
                    ));
                    continue;
                }

                let canonical = node.canonical_value(&annotation.keyword);
                if canonical.is_empty() {
                    rebuilt.push(annotation);
                    continue;
                }

                let hash = string_hash(&canonical);
                let key = DictionaryKey::new(annotation.effective_domain(&self.default_domain), &hash);
                if let Registration::Collision { existing } =
                    dictionary.register(key.clone(), canonical.clone())
                {
                    log.error(format!(
                        "{}: hash collision for {}: {:?} and {:?}",
                        file, key, existing, canonical
                    ));
                }
                rebuilt.push(annotation.with_hash(hash));
            }

            node.set_marker(&format_tags(&rebuilt));
        }

        FileTemplate {
            document,
            dictionary,
        }
    }
}
