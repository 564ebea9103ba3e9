use std::{fs, path::Path};

use super::{
    DIST_DIR, ModuleSet, Pipeline, locale_list,
    module::{GettextModule, LOCALE_DIR, TEMPLATE_FILE},
};
use crate::{
    catalog::{PoCatalog, PoCatalogs, json},
    core::{
        dictionary::DictionaryBuilder,
        document::{Document, DocumentScanner, GettextMode},
        synthesizer::LocaleFileSynthesizer,
    },
    log::RunLog,
    tools::ToolInvocation,
};

impl Pipeline<'_> {
    pub(super) fn compile_module(&self, module: &GettextModule, modules: &ModuleSet, log: &mut RunLog) {
        log.info(format!(
            "Compiling gettext strings in {} for locales: {}",
            module.path.display(),
            locale_list(module)
        ));
        self.compile_catalogs(module, log);
        self.translate_markup(module, modules, log);
    }

    /// `msgfmt --strict` every locale's `.po` into its `LC_MESSAGES`.
    fn compile_catalogs(&self, module: &GettextModule, log: &mut RunLog) {
        for locale in &module.locales {
            let po = module.po_file(locale);
            let mo = module.mo_file(locale);

            if !po.is_file() {
                log.error(format!("{} not found. Run extraction first.", po.display()));
                continue;
            }
            if let Some(dir) = mo.parent()
                && let Err(err) = fs::create_dir_all(dir)
            {
                log.error(format!("Cannot create directory {}: {}", dir.display(), err));
                continue;
            }

            let invocation = ToolInvocation::new(self.config.tools.msgfmt.as_str())
                .path_arg(&po)
                .arg("--strict")
                .arg("-o")
                .path_arg(&mo);
            if self.run_tool(&invocation, log).is_some() {
                log.info(format!("Compiled {} to {}", po.display(), mo.display()));
            }
            if !mo.is_file() {
                log.error(format!("{} not created", mo.display()));
            }

            match PoCatalog::load(&po) {
                Ok(catalog) => {
                    let fuzzy = catalog.fuzzy_entries().count();
                    if fuzzy > 0 {
                        log.error(format!(
                            "{} contains {} fuzzy translation(s). Review the translations marked with 'fuzzy' and remove the 'fuzzy' flag from the ones that are correct.",
                            po.display(),
                            fuzzy
                        ));
                    }
                }
                Err(err) => log.error(format!("{:#}", err)),
            }
        }
    }

    /// Synthesize the locale variants of every `translate` document.
    fn translate_markup(&self, module: &GettextModule, modules: &ModuleSet, log: &mut RunLog) {
        let attribute = self.config.markup_attribute.as_str();
        let builder = DictionaryBuilder::new(DocumentScanner::new(attribute).with_charset(), module.name.as_str());
        let lookup = PoCatalogs::new(modules);
        let synthesizer = LocaleFileSynthesizer::new(&lookup, attribute);

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

            let template = builder.build(document, log);
            for locale in self.locales.targets() {
                if let Err(err) = synthesizer.synthesize(&template, &file, &module.name, locale, log) {
                    log.error(format!("{}: {:#}", file.display(), err));
                }
            }
        }
    }

    /// Merge each locale's catalog with the distribution template and write
    /// the result as `{lang-REGION}.json`.
    pub(super) fn compile_distribution(&self, module: &GettextModule, log: &mut RunLog) {
        let dist_locale = module.path.join(DIST_DIR).join(LOCALE_DIR);
        let pot = dist_locale.join(TEMPLATE_FILE);

        if !pot.is_file() {
            log.error(format!("{} not found. Run extraction first.", pot.display()));
            return;
        }

        for locale in &module.locales {
            let po = module.po_file(locale);
            if !po.is_file() {
                log.error(format!("{} not found. Run extraction first.", po.display()));
                continue;
            }

            let invocation = ToolInvocation::new(self.config.tools.msgmerge.as_str())
                .arg("--no-fuzzy-matching")
                .path_arg(&po)
                .path_arg(&pot);
            let Some(output) = self.run_tool(&invocation, log) else {
                log.error(format!("Cannot merge {} with {}", po.display(), pot.display()));
                continue;
            };

            let target = dist_locale.join(format!("{}.json", locale.web()));
            if let Err(err) = write_message_map(&output.stdout, &target) {
                log.error(format!("{:#}", err));
                continue;
            }
            log.info(format!("Wrote {} ({})", target.display(), locale.tag()));
        }
    }
}

fn write_message_map(merged: &str, target: &Path) -> anyhow::Result<()> {
    let map = json::convert(merged)?;
    json::write_json(target, &map)
}
