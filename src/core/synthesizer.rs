//! Per-locale generation of translated markup files.
//!
//! For every `(template, locale)` pair the target is `name.{lang-REGION}.ext`
//! next to the template. What happens to it depends on its mode marker:
//!
//! | target                | action                                        |
//! |-----------------------|-----------------------------------------------|
//! | missing               | regenerate from the template, mode `replace`  |
//! | `replace`             | regenerate from the template                  |
//! | `cherry-pick`         | translate the existing file in place          |
//! | anything else         | skip and log                                  |
//!
//! `replace` discards manual edits to the target on every run. `cherry-pick`
//! keeps them and only refreshes annotated strings.

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{
    dictionary::FileTemplate,
    document::{Document, DocumentScanner, GettextMode},
    locale::{LocaleTag, localized_path},
    translator::DocumentTranslator,
};
use crate::{catalog::CatalogLookup, log::RunLog};

/// Name of the generated file for `source` in `locale`.
pub fn target_file_name(source: &Path, locale: &LocaleTag) -> PathBuf {
    localized_path(source, locale)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Synthesis {
    Replaced,
    CherryPicked,
    /// The target carries no usable mode marker and was left alone.
    Skipped,
}

pub struct LocaleFileSynthesizer<'a> {
    translator: DocumentTranslator<'a>,
}

impl<'a> LocaleFileSynthesizer<'a> {
    pub fn new(lookup: &'a dyn CatalogLookup, attribute: &str) -> Self {
        Self {
            translator: DocumentTranslator::new(
                lookup,
                DocumentScanner::new(attribute).with_charset(),
            ),
        }
    }

    /// Generate or refresh the `locale` variant of the template at `source`.
    ///
    /// Errors are returned only for I/O on the target file.
    pub fn synthesize(
        &self,
        template: &FileTemplate,
        source: &Path,
        default_domain: &str,
        locale: &LocaleTag,
        log: &mut RunLog,
    ) -> Result<Synthesis> {
        let target = target_file_name(source, locale);

        let (document, synthesis) = if target.exists() {
            let existing = Document::load(&target)?;
            match existing.mode() {
                Some(GettextMode::Replace) => (Self::from_template(template, &target), Synthesis::Replaced),
                Some(GettextMode::CherryPick) => (existing, Synthesis::CherryPicked),
                _ => {
                    log.error(format!(
                        "{}: invalid mode marker {:?}, expected <meta name=\"gettext\" content=\"replace\"/> or <meta name=\"gettext\" content=\"cherry-pick\"/>",
                        target.display(),
                        existing.mode_marker().unwrap_or_default()
                    ));
                    return Ok(Synthesis::Skipped);
                }
            }
        } else {
            (Self::from_template(template, &target), Synthesis::Replaced)
        };

        let verb = match synthesis {
            Synthesis::CherryPicked => "Cherry-picking",
            _ => "Generating",
        };
        log.info(format!("{} {} ({})", verb, target.display(), locale.tag()));

        let mut dictionary = template.dictionary.clone();
        self.translator
            .translate(&document, &mut dictionary, default_domain, locale, log);
        document.save(&target)?;

        Ok(synthesis)
    }

    fn from_template(template: &FileTemplate, target: &Path) -> Document {
        let document = template.document.deep_clone().with_path(target);
        document.set_mode(GettextMode::Replace);
        document
    }
}
