use std::{fs, path::Path};

use anyhow::{Context, Result};
use tempfile::TempDir;

use super::{Pipeline, locale_list, module::GettextModule};
use crate::{
    catalog::{CatalogTemplate, template::SOURCE_COMMENT_TAG},
    core::{
        document::{Document, DocumentScanner, GettextMode},
        tags::{Keyword, parse_tags},
    },
    log::RunLog,
    tools::ToolInvocation,
    utils::{dedent_lines, relative_display},
};

const README_FILE: &str = "README.txt";
const MARKUP_SOURCE_FILE: &str = "gettext-markup-strings.php";

const DISTRIBUTION_README: &str = "This directory contains the language files for the JavaScript Gettext translations.

DO NOT EDIT THESE FILES MANUALLY IN THIS {MODULE}/install/dist/locale DIRECTORY.

They are generated automatically by the Gettext service. All translations that need to be updated
are located in module's \"{MODULE}/locale\" directory.
";

/// Source languages extracted with xgettext's own parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Php,
    JavaScript,
}

impl SourceKind {
    fn pattern(self) -> &'static str {
        match self {
            SourceKind::Php => "*.php",
            SourceKind::JavaScript => "*.js",
        }
    }

    fn language_args(self) -> &'static [&'static str] {
        match self {
            SourceKind::Php => &["--add-location", "-L", "PHP"],
            SourceKind::JavaScript => &[
                "--add-location",
                "-L",
                "JavaScript",
                "--keyword=__",
                "--keyword=_n:1,2",
            ],
        }
    }
}

impl Pipeline<'_> {
    pub(super) fn extract_module(&self, module: &GettextModule, log: &mut RunLog) {
        log.info(format!(
            "Extracting gettext strings from {} for locales: {} (with PO files)",
            module.path.display(),
            locale_list(module)
        ));
        self.generate_template(module, log);
        self.update_catalogs(module, log);
    }

    /// Template only; the translations live in the owning module's catalogs.
    pub(super) fn extract_distribution(&self, module: &GettextModule, log: &mut RunLog) {
        log.info(format!(
            "Extracting gettext strings from {} for locales: {} (no PO files)",
            module.path.display(),
            locale_list(module)
        ));
        self.generate_template(module, log);

        let readme = module.locale_dir.join(README_FILE);
        if let Err(err) = fs::write(&readme, DISTRIBUTION_README) {
            log.error(format!("Failed to write file: {}: {}", readme.display(), err));
        }
    }

    fn generate_template(&self, module: &GettextModule, log: &mut RunLog) {
        for kind in [SourceKind::Php, SourceKind::JavaScript] {
            if let Err(err) = self.extract_sources(module, kind, log) {
                log.error(format!("{}: {:#}", module.path.display(), err));
            }
        }
        if let Err(err) = self.extract_markup(module, log) {
            log.error(format!("{}: {:#}", module.path.display(), err));
        }
    }

    /// Run xgettext over dedented copies of the sources, `batch_size` files
    /// per invocation.
    fn extract_sources(&self, module: &GettextModule, kind: SourceKind, log: &mut RunLog) -> Result<()> {
        let files = self.find_files(&module.path, &[kind.pattern()]);
        if files.is_empty() {
            return Ok(());
        }

        let scratch = TempDir::new().context("Failed to create scratch directory")?;
        let mut relative = Vec::with_capacity(files.len());
        for file in &files {
            let Ok(rel) = file.strip_prefix(&module.path) else {
                continue;
            };
            let source = match fs::read_to_string(file) {
                Ok(source) => source,
                Err(err) => {
                    log.error(format!("Cannot read file: {}: {}", file.display(), err));
                    continue;
                }
            };
            let copy = scratch.path().join(rel);
            if let Some(parent) = copy.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            fs::write(&copy, dedent_lines(&source))
                .with_context(|| format!("Failed to write file: {}", copy.display()))?;
            relative.push(rel.to_string_lossy().to_string());
        }

        for batch in relative.chunks(self.config.batch_size) {
            let invocation = self
                .xgettext(module)
                .args(kind.language_args().iter().copied())
                .args(batch.iter().cloned())
                .current_dir(scratch.path());
            if self.run_tool(&invocation, log).is_some() {
                log.info(format!(
                    "Extracted gettext strings from {} {} files",
                    batch.len(),
                    kind.pattern()
                ));
            }
        }

        Ok(())
    }

    /// Collect the un-hashed strings of every `translate` document into one
    /// virtual PHP source and run xgettext over it.
    fn extract_markup(&self, module: &GettextModule, log: &mut RunLog) -> Result<()> {
        let scanner = DocumentScanner::new(self.config.markup_attribute.as_str());
        let mut template = CatalogTemplate::new();

        for file in self.find_files(&module.path, &["*.html"]) {
            let document = match Document::load(&file) {
                Ok(document) => document,
                Err(err) => {
                    log.error(format!("{:#}", err));
                    continue;
                }
            };
            if document.mode() != Some(GettextMode::Translate) {
                continue;
            }
            log.info(format!("Preparing extraction from {}", file.display()));
            collect_markup_strings(&document, &scanner, &relative_display(&module.path, &file), &mut template, log);
        }

        if template.is_empty() {
            return Ok(());
        }

        let scratch = TempDir::new().context("Failed to create scratch directory")?;
        let source = scratch.path().join(MARKUP_SOURCE_FILE);
        fs::write(&source, template.render_php())
            .with_context(|| format!("Failed to write file: {}", source.display()))?;

        let invocation = self
            .xgettext(module)
            .args(["-L", "PHP", "--no-location"])
            .arg(format!("--add-comments={}", SOURCE_COMMENT_TAG))
            .path_arg(&source);
        if self.run_tool(&invocation, log).is_some() {
            log.info(format!("Extracted {} gettext strings from HTML files", template.len()));
        }

        Ok(())
    }

    /// Create missing `.po` files from the template and merge existing ones.
    fn update_catalogs(&self, module: &GettextModule, log: &mut RunLog) {
        let tools = &self.config.tools;

        for locale in &module.locales {
            let po = module.po_file(locale);
            let invocation = if po.exists() {
                log.info(format!("Updating {}", po.display()));
                ToolInvocation::new(tools.msgmerge.as_str())
                    .args(["--previous", "--update"])
                    .path_arg(&po)
                    .path_arg(&module.pot_file)
            } else {
                log.info(format!("Creating {}", po.display()));
                ToolInvocation::new(tools.msginit.as_str())
                    .arg("--no-translator")
                    .arg(format!("--input={}", module.pot_file.display()))
                    .arg(format!("--locale={}", locale.posix()))
                    .arg(format!("--output={}", po.display()))
            };
            self.run_tool(&invocation, log);
        }
    }

    fn xgettext(&self, module: &GettextModule) -> ToolInvocation {
        ToolInvocation::new(self.config.tools.xgettext.as_str())
            .args([
                "--verbose",
                "--omit-header",
                "--join-existing",
                "--from-code",
                "UTF-8",
                "-F",
                "--package-version=1.0",
                "-o",
            ])
            .path_arg(&module.pot_file)
            .arg(format!("--package-name={}", module.name))
    }
}

/// Emit every un-hashed tag of `document` into `template`.
fn collect_markup_strings(
    document: &Document,
    scanner: &DocumentScanner,
    relative_file: &str,
    template: &mut CatalogTemplate,
    log: &mut RunLog,
) {
    for node in scanner.scan(document) {
        for tag in parse_tags(&node.marker(), log) {
            let annotation = tag.annotation;
            if annotation.hash.is_some() {
                continue;
            }
            let comment = match &annotation.keyword {
                Keyword::Text => format!("{}: Text content of {}", relative_file, node.marker_source()),
                Keyword::Attribute(name) => {
                    format!("{}: Attr {} of {}", relative_file, name, node.marker_source())
                }
            };
            template.emit(
                annotation.domain.as_deref(),
                &node.canonical_value(&annotation.keyword),
                &comment,
            );
        }
    }
}
