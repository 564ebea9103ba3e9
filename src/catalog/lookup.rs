use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
};

use super::po::PoCatalog;
use crate::core::locale::LocaleTag;

/// Translation source for the document translator.
///
/// Implementations return the source string itself when they have no
/// translation. Callers therefore cannot tell a string that is intentionally
/// identical in `locale` from one nobody has translated yet; both come back
/// unchanged.
pub trait CatalogLookup {
    fn lookup(&self, domain: &str, canonical: &str, locale: &LocaleTag) -> String;
}

/// Maps a translation domain to the `locale/` directory holding its catalogs.
pub trait ModuleResolver {
    fn locale_dir(&self, domain: &str) -> Option<PathBuf>;
}

/// Path of the `.po` catalog for `locale` in `locale_dir`.
pub fn po_file(locale_dir: &Path, locale: &LocaleTag) -> PathBuf {
    locale_dir.join(format!("{}.po", locale.posix()))
}

/// Looks translations up in the per-locale `.po` files of each domain's
/// module. Catalogs are read on first use and kept for the life of the value.
pub struct PoCatalogs<'a> {
    resolver: &'a dyn ModuleResolver,
    loaded: RefCell<HashMap<(String, String), Option<PoCatalog>>>,
}

impl<'a> PoCatalogs<'a> {
    pub fn new(resolver: &'a dyn ModuleResolver) -> Self {
        Self {
            resolver,
            loaded: RefCell::new(HashMap::new()),
        }
    }

    fn load(&self, domain: &str, locale: &LocaleTag) -> Option<PoCatalog> {
        let dir = self.resolver.locale_dir(domain)?;
        PoCatalog::load(&po_file(&dir, locale)).ok()
    }
}

impl CatalogLookup for PoCatalogs<'_> {
    fn lookup(&self, domain: &str, canonical: &str, locale: &LocaleTag) -> String {
        let key = (domain.to_string(), locale.posix());
        let mut loaded = self.loaded.borrow_mut();
        let catalog = loaded
            .entry(key)
            .or_insert_with(|| self.load(domain, locale));

        catalog
            .as_ref()
            .and_then(|c| c.translation(canonical))
            .unwrap_or(canonical)
            .to_string()
    }
}
