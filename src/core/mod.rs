//! The markup translation core.
//!
//! Leaves first:
//!
//! - `tags`: the `[domain:](attribute|.)[#hash]` annotation grammar
//! - `hash`: string identities
//! - `document`: markup documents and the annotated-node scanner
//! - `dictionary`: hash-keyed canonical strings and their builder
//! - `translator`: writes translations back into annotated nodes
//! - `synthesizer`: per-locale replace / cherry-pick file generation
//! - `locale`: locale identifiers and the supported-locale set

pub mod dictionary;
pub mod document;
pub mod hash;
pub mod locale;
pub mod synthesizer;
pub mod tags;
pub mod translator;

pub use dictionary::{Dictionary, DictionaryBuilder, DictionaryKey, FileTemplate};
pub use document::{AnnotatedNode, Document, DocumentScanner, GettextMode};
pub use hash::string_hash;
pub use locale::{DEFAULT_LOCALE, LocaleError, LocaleTag, SupportedLocales};
pub use synthesizer::{LocaleFileSynthesizer, Synthesis, target_file_name};
pub use tags::{Annotation, Keyword, TagError};
pub use translator::DocumentTranslator;
