//! Locale identifiers and the supported-locale set.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;

/// The untranslated default locale. Strings in source templates are in it.
pub const DEFAULT_LOCALE: &str = "en_US";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("Invalid locale identifier: '{0}'")]
    Invalid(String),
    #[error("The language is missing in the locale identifier: '{0}'")]
    MissingLanguage(String),
    #[error("The region is missing in the locale identifier: '{0}'")]
    MissingRegion(String),
    #[error("The locale '{value}' is not supported. Supported locales: {supported}")]
    Unsupported { value: String, supported: String },
    #[error("The language '{value}' is ambiguous. Supported locales: {supported}")]
    Ambiguous { value: String, supported: String },
    #[error("No supported locales configured")]
    Empty,
}

/// A `(language, region)` locale target with optional script, variants and
/// `@keywords`.
///
/// ```
/// use markup_gettext::core::locale::LocaleTag;
///
/// let tag: LocaleTag = "cs-cz".parse().unwrap();
/// assert_eq!(tag.posix(), "cs_CZ");
/// assert_eq!(tag.web(), "cs-CZ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocaleTag {
    language: String,
    script: Option<String>,
    region: String,
    variants: Vec<String>,
    keywords: Option<String>,
}

impl LocaleTag {
    /// Parse and canonicalise a locale identifier.
    ///
    /// Both `_` and `-` separate subtags. A `.codeset` suffix is dropped.
    pub fn parse(value: &str) -> Result<Self, LocaleError> {
        let trimmed = value.trim();
        let (base, keywords) = match trimmed.split_once('@') {
            Some((base, kw)) if !kw.is_empty() => (base, Some(kw.to_string())),
            Some((base, _)) => (base, None),
            None => (trimmed, None),
        };
        let base = base.split_once('.').map_or(base, |(b, _)| b);

        let mut subtags = base.split(['_', '-']);
        let language = match subtags.next() {
            Some(lang) if is_alpha(lang, 2..=8) => lang.to_ascii_lowercase(),
            Some("") | None => return Err(LocaleError::MissingLanguage(value.to_string())),
            Some(_) => return Err(LocaleError::Invalid(value.to_string())),
        };

        let mut script = None;
        let mut region = None;
        let mut variants = Vec::new();
        for subtag in subtags {
            if subtag.is_empty() {
                return Err(LocaleError::Invalid(value.to_string()));
            }
            if script.is_none() && region.is_none() && is_alpha(subtag, 4..=4) {
                script = Some(titlecase(subtag));
            } else if region.is_none()
                && (is_alpha(subtag, 2..=2)
                    || (subtag.len() == 3 && subtag.bytes().all(|b| b.is_ascii_digit())))
            {
                region = Some(subtag.to_ascii_uppercase());
            } else if region.is_some() && subtag.bytes().all(|b| b.is_ascii_alphanumeric()) {
                variants.push(subtag.to_ascii_uppercase());
            } else {
                return Err(LocaleError::Invalid(value.to_string()));
            }
        }

        let region = region.ok_or_else(|| LocaleError::MissingRegion(value.to_string()))?;

        Ok(Self {
            language,
            script,
            region,
            variants,
            keywords,
        })
    }

    /// `en_US`.
    pub fn default_locale() -> Self {
        Self {
            language: "en".to_string(),
            script: None,
            region: "US".to_string(),
            variants: Vec::new(),
            keywords: None,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// `lang_REGION`, the form used for catalog file names.
    pub fn posix(&self) -> String {
        format!("{}_{}", self.language, self.region)
    }

    /// `lang-REGION`, the form used for generated file names and JSON maps.
    pub fn web(&self) -> String {
        format!("{}-{}", self.language, self.region)
    }

    /// Full canonical identifier, keeping script, variants and keywords.
    pub fn tag(&self) -> String {
        let mut tag = self.language.clone();
        if let Some(script) = &self.script {
            tag.push('_');
            tag.push_str(script);
        }
        tag.push('_');
        tag.push_str(&self.region);
        for variant in &self.variants {
            tag.push('_');
            tag.push_str(variant);
        }
        if let Some(keywords) = &self.keywords {
            tag.push('@');
            tag.push_str(keywords);
        }
        tag
    }
}

impl FromStr for LocaleTag {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.posix())
    }
}

fn is_alpha(s: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphabetic())
}

fn titlecase(s: &str) -> String {
    let lower = s.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `dir/name.ext` → `dir/name.{lang-REGION}.ext`.
pub fn localized_path(path: &Path, locale: &LocaleTag) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}.{}.{}", stem, locale.web(), ext.to_string_lossy()),
        None => format!("{}.{}", stem, locale.web()),
    };
    path.with_file_name(name)
}

/// The supported locales of a project and the currently selected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLocales {
    tags: Vec<LocaleTag>,
    current: usize,
    default: LocaleTag,
}

impl SupportedLocales {
    /// Parse and de-duplicate the supported identifiers. The first one is
    /// selected and `en_US` is the untranslated default.
    pub fn new<I, S>(identifiers: I) -> Result<Self, LocaleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags: Vec<LocaleTag> = Vec::new();
        for id in identifiers {
            let tag = LocaleTag::parse(id.as_ref())?;
            if !tags.iter().any(|t| t.posix() == tag.posix()) {
                tags.push(tag);
            }
        }
        if tags.is_empty() {
            return Err(LocaleError::Empty);
        }
        Ok(Self {
            tags,
            current: 0,
            default: LocaleTag::default_locale(),
        })
    }

    /// Use another locale as the untranslated default.
    pub fn with_default(mut self, default: LocaleTag) -> Self {
        self.default = default;
        self
    }

    pub fn default_locale(&self) -> &LocaleTag {
        &self.default
    }

    pub fn supported(&self) -> &[LocaleTag] {
        &self.tags
    }

    pub fn current(&self) -> &LocaleTag {
        &self.tags[self.current]
    }

    pub fn contains(&self, tag: &LocaleTag) -> bool {
        self.tags.iter().any(|t| t.posix() == tag.posix())
    }

    /// True for the configured untranslated locale.
    pub fn is_default(&self, tag: &LocaleTag) -> bool {
        tag.posix() == self.default.posix()
    }

    /// Supported locales except the untranslated default.
    pub fn targets(&self) -> impl Iterator<Item = &LocaleTag> {
        self.tags.iter().filter(|t| !self.is_default(t))
    }

    /// Select a supported locale by full identifier.
    pub fn select(&mut self, value: &str) -> Result<&LocaleTag, LocaleError> {
        let tag = LocaleTag::parse(value)?;
        let index = self
            .tags
            .iter()
            .position(|t| t.posix() == tag.posix())
            .ok_or_else(|| LocaleError::Unsupported {
                value: value.to_string(),
                supported: self.listing(),
            })?;
        self.current = index;
        Ok(self.current())
    }

    /// Select the single supported locale of a primary language.
    pub fn select_language(&mut self, language: &str) -> Result<&LocaleTag, LocaleError> {
        let language = language.trim().to_ascii_lowercase();
        let matches: Vec<usize> = self
            .tags
            .iter()
            .enumerate()
            .filter(|(_, t)| t.language == language)
            .map(|(i, _)| i)
            .collect();

        match matches.as_slice() {
            [index] => {
                self.current = *index;
                Ok(self.current())
            }
            [] => Err(LocaleError::Unsupported {
                value: language,
                supported: self.listing(),
            }),
            _ => Err(LocaleError::Ambiguous {
                value: language,
                supported: self.listing(),
            }),
        }
    }

    /// The current locale's variant of `path` if it exists, else `path`.
    pub fn localized_file(&self, path: &Path) -> PathBuf {
        let localized = localized_path(path, self.current());
        if localized.is_file() {
            localized
        } else {
            path.to_path_buf()
        }
    }

    fn listing(&self) -> String {
        self.tags
            .iter()
            .map(LocaleTag::tag)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
