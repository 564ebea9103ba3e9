//! Conversion of merged catalogs into JSON message maps for script
//! consumers.
//!
//! ```json
//! {
//!     "": { "language": "fr", "plural-forms": "nplurals=2; plural=n>1;" },
//!     "Welcome": "Bienvenue",
//!     "There is %1 apple": ["Il y a %1 pomme", "Il y a %1 pommes"]
//! }
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

use super::po::{PoCatalog, parse_headers};

/// Convert merged catalog text into a message map.
///
/// Keys keep catalog order. The header entry becomes an object of lowercase
/// header names. An entry with one `msgstr` maps to a string, a plural entry
/// to the list of its forms. Obsolete entries are left out.
pub fn convert(catalog_text: &str) -> Result<Map<String, Value>> {
    let catalog = PoCatalog::parse(catalog_text).context("Cannot parse merged catalog")?;
    let mut map = Map::new();

    for entry in catalog.entries().iter().filter(|e| !e.obsolete) {
        if entry.msgstr.is_empty() {
            continue;
        }

        let value = if entry.is_header() {
            let headers = parse_headers(&entry.msgstr[0])
                .into_iter()
                .map(|(name, value)| (name, Value::String(value)))
                .collect::<Map<_, _>>();
            Value::Object(headers)
        } else if entry.msgstr.len() == 1 {
            Value::String(entry.msgstr[0].clone())
        } else {
            Value::Array(entry.msgstr.iter().cloned().map(Value::String).collect())
        };

        map.insert(entry.msgid.clone(), value);
    }

    Ok(map)
}

/// Serialize with 4-space indentation. UTF-8 and slashes are written as is.
pub fn to_pretty_json(map: &Map<String, Value>) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    map.serialize(&mut serializer)
        .context("Failed to serialize JSON")?;
    String::from_utf8(buf).context("Serialized JSON is not UTF-8")
}

pub fn write_json(path: &Path, map: &Map<String, Value>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, to_pretty_json(map)?)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}
