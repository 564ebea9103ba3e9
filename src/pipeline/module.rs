use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};

use crate::{
    catalog::ModuleResolver,
    core::locale::{LocaleTag, SupportedLocales},
    log::RunLog,
    tools::ToolRunner,
};

pub const LOCALE_DIR: &str = "locale";
pub const TEMPLATE_FILE: &str = "messages.pot";
pub const LINGUAS_FILE: &str = "LINGUAS";

const TEMPLATE_HEADER: &str = "msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n\"Language: en\\n\"\n\n";

/// A directory with a `locale/` subdirectory, ready for the gettext tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GettextModule {
    /// Basename of the directory; also the default translation domain.
    pub name: String,
    pub path: PathBuf,
    pub locale_dir: PathBuf,
    pub pot_file: PathBuf,
    pub locales: Vec<LocaleTag>,
}

impl GettextModule {
    /// Check the module directory and prepare its catalog template and
    /// `LINGUAS` file.
    ///
    /// Fails when the directory or its `locale/` is missing or inaccessible,
    /// or when one of `required_tools` cannot be found.
    pub fn setup(
        path: &Path,
        name: &str,
        supported: &SupportedLocales,
        required_tools: &[&str],
        runner: &dyn ToolRunner,
        log: &mut RunLog,
    ) -> Result<Self> {
        if !path.is_dir() {
            bail!("The gettext directory does not exist: {}", path.display());
        }
        let locale_dir = path.join(LOCALE_DIR);
        if !locale_dir.is_dir() {
            bail!("The locale directory does not exist: {}", locale_dir.display());
        }
        fs::read_dir(&locale_dir)
            .with_context(|| format!("The locale directory is not readable: {}", locale_dir.display()))?;
        let metadata = fs::metadata(&locale_dir)
            .with_context(|| format!("Failed to read metadata: {}", locale_dir.display()))?;
        if metadata.permissions().readonly() {
            bail!("The locale directory is not writable: {}", locale_dir.display());
        }
        for tool in required_tools {
            if runner.locate(tool).is_none() {
                bail!("The command {} is not found.", tool);
            }
        }

        let pot_file = locale_dir.join(TEMPLATE_FILE);
        if !pot_file.exists() {
            fs::write(&pot_file, TEMPLATE_HEADER)
                .with_context(|| format!("Failed to write file: {}", pot_file.display()))?;
        }

        let linguas = locale_dir.join(LINGUAS_FILE);
        if !linguas.exists() {
            let content: String = supported
                .supported()
                .iter()
                .map(|tag| format!("{}\n", tag.posix()))
                .collect();
            fs::write(&linguas, content)
                .with_context(|| format!("Failed to write file: {}", linguas.display()))?;
        }

        let locales = module_locales(supported, &read_linguas(&linguas, log)?);

        Ok(Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            locale_dir,
            pot_file,
            locales,
        })
    }

    pub fn po_file(&self, locale: &LocaleTag) -> PathBuf {
        crate::catalog::po_file(&self.locale_dir, locale)
    }

    pub fn mo_file(&self, locale: &LocaleTag) -> PathBuf {
        self.locale_dir
            .join(locale.posix())
            .join("LC_MESSAGES")
            .join(format!("{}.mo", self.name))
    }
}

/// Basename of a module directory.
pub fn module_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Locales listed in a `LINGUAS` file. `#` starts a comment line.
fn read_linguas(path: &Path, log: &mut RunLog) -> Result<Vec<LocaleTag>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let mut tags = Vec::new();
    for line in content.lines().map(str::trim) {
        if line.starts_with('#') {
            continue;
        }
        for id in line.split_whitespace() {
            match LocaleTag::parse(id) {
                Ok(tag) => tags.push(tag),
                Err(err) => log.warning(format!("{}: {}", path.display(), err)),
            }
        }
    }
    Ok(tags)
}

/// Configured locales, then `LINGUAS` entries, then the default locale.
fn module_locales(supported: &SupportedLocales, linguas: &[LocaleTag]) -> Vec<LocaleTag> {
    let mut locales: Vec<LocaleTag> = Vec::new();
    let candidates = supported
        .supported()
        .iter()
        .chain(linguas)
        .chain(std::iter::once(supported.default_locale()));
    for tag in candidates {
        if !locales.iter().any(|t| t.posix() == tag.posix()) {
            locales.push(tag.clone());
        }
    }
    locales
}

/// Module name to `locale/` directory, for catalog lookups by domain.
#[derive(Debug, Clone, Default)]
pub struct ModuleSet {
    modules: Vec<(String, PathBuf)>,
}

impl ModuleSet {
    /// Every path in `paths` that has a `locale/` directory.
    pub fn from_paths(paths: &[PathBuf]) -> Self {
        let modules = paths
            .iter()
            .filter(|p| p.join(LOCALE_DIR).is_dir())
            .map(|p| (module_name(p), p.join(LOCALE_DIR)))
            .collect();
        Self { modules }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleResolver for ModuleSet {
    fn locale_dir(&self, domain: &str) -> Option<PathBuf> {
        self.modules
            .iter()
            .find(|(name, _)| name == domain)
            .map(|(_, dir)| dir.clone())
    }
}
