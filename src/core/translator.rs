use super::{
    dictionary::{Dictionary, DictionaryKey, Registration},
    document::{Document, DocumentScanner},
    hash::string_hash,
    locale::LocaleTag,
    tags::{Annotation, format_tags, parse_tags},
};
use crate::{catalog::CatalogLookup, log::RunLog};

/// Writes translations into the annotated nodes of a document.
pub struct DocumentTranslator<'a> {
    lookup: &'a dyn CatalogLookup,
    scanner: DocumentScanner,
}

impl<'a> DocumentTranslator<'a> {
    pub fn new(lookup: &'a dyn CatalogLookup, scanner: DocumentScanner) -> Self {
        Self { lookup, scanner }
    }

    /// Translate `document` in place for `locale`.
    ///
    /// Hashed tags are resolved through `dictionary` and never re-hashed from
    /// the document's (possibly already translated) content, which makes a
    /// second pass a no-op. Un-hashed tags are hashed from their current value
    /// and registered, so a cherry-picked file that still holds source text
    /// re-anchors itself. A hash missing from the dictionary is logged once per
    /// occurrence and the tag is kept verbatim with its node untouched.
    pub fn translate(
        &self,
        document: &Document,
        dictionary: &mut Dictionary,
        default_domain: &str,
        locale: &LocaleTag,
        log: &mut RunLog,
    ) {
        let file = document.display_name();

        for node in self.scanner.scan(document) {
            let mut rebuilt: Vec<Annotation> = Vec::new();

            for tag in parse_tags(&node.marker(), log) {
                let annotation = tag.annotation;
                let domain = annotation.effective_domain(default_domain).to_string();

                let (annotation, canonical) = match annotation.hash.clone() {
                    Some(hash) => {
                        let key = DictionaryKey::new(&domain, hash);
                        let Some(canonical) = dictionary.get(&key).map(str::to_string) else {
                            log.error(format!(
                                "{}: {} not found in dictionary: {} Was the corresponding string removed from the source file? Remove the tag or restore the string.",
                                file,
                                tag.raw,
                                node.outer_html()
                            ));
                            rebuilt.push(annotation);
                            continue;
                        };
                        (annotation, canonical)
                    }
                    None => {
                        let canonical = node.canonical_value(&annotation.keyword);
                        if canonical.is_empty() {
                            rebuilt.push(annotation);
                            continue;
                        }
                        let hash = string_hash(&canonical);
                        let key = DictionaryKey::new(&domain, &hash);
                        if let Registration::Collision { existing } =
                            dictionary.register(key.clone(), canonical.clone())
                        {
                            log.warning(format!(
                                "{}: {} is already registered as {:?}, not {:?}",
                                file, key, existing, canonical
                            ));
                        }
                        (annotation.with_hash(hash), canonical)
                    }
                };

                let translated = self.lookup.lookup(&domain, &canonical, locale);
                node.write_value(&annotation.keyword, &translated);
                rebuilt.push(annotation);
            }

            node.set_marker(&format_tags(&rebuilt));
        }
    }
}
