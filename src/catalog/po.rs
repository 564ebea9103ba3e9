//! Reader for gettext `.po`/`.pot` text catalogs.
//!
//! Only what the pipeline consumes is modelled: message ids, plural ids,
//! translations, flags and the obsolete marker. Other comments are skipped.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoError {
    #[error("line {line}: unexpected content: {content}")]
    Syntax { line: usize, content: String },
    #[error("line {line}: unterminated string")]
    Unterminated { line: usize },
}

/// One catalog message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoEntry {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    /// `msgstr`, or `msgstr[0..n]` for plural entries.
    pub msgstr: Vec<String>,
    pub flags: Vec<String>,
    pub obsolete: bool,
}

impl PoEntry {
    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|f| f == "fuzzy")
    }

    /// The header pseudo-entry (`msgid ""`).
    pub fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.msgctxt.is_none()
    }

    /// First translation form, when it is usable.
    pub fn translation(&self) -> Option<&str> {
        if self.obsolete || self.is_fuzzy() {
            return None;
        }
        self.msgstr
            .first()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
}

#[derive(Default)]
struct EntryBuilder {
    entry: PoEntry,
    last: Option<Field>,
}

impl EntryBuilder {
    fn has_message(&self) -> bool {
        self.last.is_some()
    }

    fn has_translation(&self) -> bool {
        !self.entry.msgstr.is_empty()
    }

    fn append(&mut self, text: &str) {
        match self.last {
            Some(Field::Msgctxt) => {
                if let Some(ctx) = self.entry.msgctxt.as_mut() {
                    ctx.push_str(text);
                }
            }
            Some(Field::Msgid) => self.entry.msgid.push_str(text),
            Some(Field::MsgidPlural) => {
                if let Some(plural) = self.entry.msgid_plural.as_mut() {
                    plural.push_str(text);
                }
            }
            Some(Field::Msgstr) => {
                if let Some(last) = self.entry.msgstr.last_mut() {
                    last.push_str(text);
                }
            }
            None => {}
        }
    }
}

/// A parsed catalog, entries in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoCatalog {
    entries: Vec<PoEntry>,
}

impl PoCatalog {
    pub fn parse(text: &str) -> Result<Self, PoError> {
        let mut entries = Vec::new();
        let mut current = EntryBuilder::default();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let mut line = raw.trim();

            if line.is_empty() {
                finish(&mut entries, &mut current);
                continue;
            }

            let mut obsolete = false;
            if let Some(rest) = line.strip_prefix("#~") {
                obsolete = true;
                line = rest.trim_start();
                if line.is_empty() || line.starts_with('|') {
                    continue;
                }
            } else if let Some(flags) = line.strip_prefix("#,") {
                if current.has_translation() {
                    finish(&mut entries, &mut current);
                }
                current.entry.flags.extend(
                    flags
                        .split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(str::to_string),
                );
                continue;
            } else if line.starts_with('#') {
                if current.has_translation() {
                    finish(&mut entries, &mut current);
                }
                continue;
            }

            if line.starts_with('"') {
                let value = unquote(line).ok_or(PoError::Unterminated { line: line_no })?;
                if !current.has_message() {
                    return Err(PoError::Syntax {
                        line: line_no,
                        content: raw.to_string(),
                    });
                }
                current.append(&value);
                continue;
            }

            let (keyword, rest) = line.split_once(char::is_whitespace).ok_or_else(|| PoError::Syntax {
                line: line_no,
                content: raw.to_string(),
            })?;
            let value = unquote(rest.trim()).ok_or(PoError::Unterminated { line: line_no })?;

            match keyword {
                "msgctxt" => {
                    if current.has_message() {
                        finish(&mut entries, &mut current);
                    }
                    current.entry.msgctxt = Some(value);
                    current.last = Some(Field::Msgctxt);
                }
                "msgid" => {
                    if current.has_message() && current.last != Some(Field::Msgctxt) {
                        finish(&mut entries, &mut current);
                    }
                    current.entry.msgid = value;
                    current.last = Some(Field::Msgid);
                }
                "msgid_plural" => {
                    current.entry.msgid_plural = Some(value);
                    current.last = Some(Field::MsgidPlural);
                }
                k if k == "msgstr" || (k.starts_with("msgstr[") && k.ends_with(']')) => {
                    current.entry.msgstr.push(value);
                    current.last = Some(Field::Msgstr);
                }
                _ => {
                    return Err(PoError::Syntax {
                        line: line_no,
                        content: raw.to_string(),
                    });
                }
            }
            current.entry.obsolete |= obsolete;
        }
        finish(&mut entries, &mut current);

        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read catalog: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Cannot parse catalog: {}", path.display()))
    }

    pub fn entries(&self) -> &[PoEntry] {
        &self.entries
    }

    /// Live entries flagged fuzzy, header included.
    pub fn fuzzy_entries(&self) -> impl Iterator<Item = &PoEntry> {
        self.entries.iter().filter(|e| !e.obsolete && e.is_fuzzy())
    }

    pub fn has_fuzzy_entries(&self) -> bool {
        self.fuzzy_entries().next().is_some()
    }

    /// Usable translation of a context-free message.
    pub fn translation(&self, msgid: &str) -> Option<&str> {
        self.entries
            .iter()
            .filter(|e| e.msgctxt.is_none() && !e.is_header() && e.msgid == msgid)
            .find_map(PoEntry::translation)
    }
}

fn finish(entries: &mut Vec<PoEntry>, current: &mut EntryBuilder) {
    let done = std::mem::take(current);
    if done.has_message() {
        entries.push(done.entry);
    }
}

/// Parse `Name: value` header lines into lowercase-keyed pairs, in order.
pub fn parse_headers(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect()
}

/// Decode one C-style quoted string. `None` when the quotes do not match.
pub fn unquote(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            if c == '"' {
                return None;
            }
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            other => out.push(other),
        }
    }
    Some(out)
}
