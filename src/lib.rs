//! markup-gettext - gettext extraction and per-locale regeneration for HTML
//!
//! Strings in HTML templates are marked with a `gettext` attribute, extracted
//! into the module's gettext catalogs next to the PHP and JavaScript strings,
//! and written back into one translated copy of each template per locale.
//! Every marked string carries a short content hash, so translated copies stay
//! reconcilable with their template across runs.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Tag grammar, hashing, documents, dictionaries and translation
//! - `catalog`: `.po` reading, lookups, JSON message maps, template strings
//! - `pipeline`: Extraction and compile runs over modules
//! - `tools`: External gettext tool invocation
//! - `log`: Run-scoped diagnostics
//! - `utils`: Shared utility functions

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod log;
pub mod pipeline;
pub mod tools;
pub mod utils;
