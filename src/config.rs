use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::locale::{DEFAULT_LOCALE, LocaleTag, SupportedLocales};

pub const CONFIG_FILE_NAME: &str = ".mgettextrc.json";

static ATTRIBUTE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.:-]*$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    #[serde(default = "default_default_locale")]
    pub default_locale: String,
    #[serde(default = "default_modules")]
    pub modules: Vec<String>,
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,
    #[serde(default = "default_markup_attribute")]
    pub markup_attribute: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Program names of the gettext tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolsConfig {
    pub xgettext: String,
    pub msginit: String,
    pub msgmerge: String,
    pub msgfmt: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            xgettext: "xgettext".to_string(),
            msginit: "msginit".to_string(),
            msgmerge: "msgmerge".to_string(),
            msgfmt: "msgfmt".to_string(),
        }
    }
}

impl ToolsConfig {
    pub fn all(&self) -> [&str; 4] {
        [
            self.xgettext.as_str(),
            self.msginit.as_str(),
            self.msgmerge.as_str(),
            self.msgfmt.as_str(),
        ]
    }
}

fn default_locales() -> Vec<String> {
    vec![DEFAULT_LOCALE.to_string()]
}

fn default_default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_modules() -> Vec<String> {
    vec![".".to_string()]
}

fn default_excludes() -> Vec<String> {
    ["*/vendor/*", "*/tmp/*", "*/.*"].map(String::from).to_vec()
}

fn default_markup_attribute() -> String {
    "gettext".to_string()
}

fn default_batch_size() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locales: default_locales(),
            default_locale: default_default_locale(),
            modules: default_modules(),
            excludes: default_excludes(),
            markup_attribute: default_markup_attribute(),
            batch_size: default_batch_size(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.excludes {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'excludes': \"{}\"", pattern))?;
        }

        // Entries without wildcards are literal directory paths.
        for pattern in &self.modules {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'modules': \"{}\"", pattern)
                })?;
            }
        }

        for locale in &self.locales {
            LocaleTag::parse(locale).with_context(|| format!("Invalid locale in 'locales': \"{}\"", locale))?;
        }
        LocaleTag::parse(&self.default_locale)
            .with_context(|| format!("Invalid 'defaultLocale': \"{}\"", self.default_locale))?;

        if !ATTRIBUTE_NAME_REGEX.is_match(&self.markup_attribute) {
            bail!("Invalid 'markupAttribute': \"{}\"", self.markup_attribute);
        }
        if self.batch_size == 0 {
            bail!("'batchSize' must be greater than 0");
        }
        for tool in self.tools.all() {
            if tool.trim().is_empty() {
                bail!("Tool names in 'tools' must not be empty");
            }
        }

        Ok(())
    }

    /// Configured locales, with the default locale as the untranslated one.
    pub fn supported_locales(&self) -> Result<SupportedLocales> {
        let default = LocaleTag::parse(&self.default_locale)?;
        Ok(SupportedLocales::new(&self.locales)?.with_default(default))
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
    /// Directory module paths are relative to: the config file's directory,
    /// or the start directory when no file was found.
    pub root: PathBuf,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                from_file: true,
                root,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
            root: start_dir.to_path_buf(),
        }),
    }
}
