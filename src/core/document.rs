//! Markup documents and the scanner that finds annotated elements in them.
//!
//! Documents are parsed with html5ever through `kuchiki`, which recovers from
//! malformed markup the way browsers do: the tree is always built and parse
//! errors are never surfaced. Only annotated elements and the mode marker are
//! touched. Everything else is serialized back as it was parsed.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use html5ever::{LocalName, Namespace, QualName};
use kuchiki::{ElementData, ExpandedName, NodeDataRef, NodeRef, traits::*};

use super::tags::Keyword;
use crate::utils::normalize_whitespace;

/// `name` of the `<meta>` element holding the mode marker.
pub const MODE_META_NAME: &str = "gettext";

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// File-level mode marker: `<meta name="gettext" content="...">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GettextMode {
    /// A source template, eligible for extraction and locale-file generation.
    Translate,
    /// A generated locale file, regenerated from its template on every run.
    Replace,
    /// A generated locale file whose manual edits are kept; only annotated
    /// strings are refreshed.
    CherryPick,
}

impl GettextMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GettextMode::Translate => "translate",
            GettextMode::Replace => "replace",
            GettextMode::CherryPick => "cherry-pick",
        }
    }
}

impl fmt::Display for GettextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GettextMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "translate" => Ok(GettextMode::Translate),
            "replace" => Ok(GettextMode::Replace),
            "cherry-pick" => Ok(GettextMode::CherryPick),
            other => Err(other.to_string()),
        }
    }
}

/// A parsed markup document.
pub struct Document {
    root: NodeRef,
    path: Option<PathBuf>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Parse markup. Never fails: malformed input yields a best-effort tree.
    ///
    /// `<template>` contents are kept as ordinary children of the template
    /// element, so they are scanned and serialized like the rest of the tree.
    pub fn parse(html: &str) -> Self {
        let root = kuchiki::parse_html().one(html);
        inline_template_contents(&root);
        Self { root, path: None }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read file: {}", path.display()))?;
        let mut doc = Self::parse(&content);
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Attach the path used in diagnostics.
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    /// File the document was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Path for diagnostics.
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<document>".to_string())
    }

    /// Independent copy of the whole tree.
    pub fn deep_clone(&self) -> Self {
        let mut copy = Self::parse(&self.to_html());
        copy.path = self.path.clone();
        copy
    }

    /// Raw content of the mode marker, if the document has one.
    pub fn mode_marker(&self) -> Option<String> {
        self.mode_metas().iter().find_map(|meta| {
            let attrs = meta.attributes.borrow();
            attrs.get("content").map(|c| c.to_string())
        })
    }

    /// The mode marker, when present and valid.
    pub fn mode(&self) -> Option<GettextMode> {
        self.mode_marker().and_then(|m| m.parse().ok())
    }

    /// Rewrite every existing mode marker. Returns how many were updated.
    pub fn set_mode(&self, mode: GettextMode) -> usize {
        let metas = self.mode_metas();
        for meta in &metas {
            meta.attributes
                .borrow_mut()
                .insert("content", mode.as_str().to_string());
        }
        metas.len()
    }

    fn mode_metas(&self) -> Vec<NodeDataRef<ElementData>> {
        self.elements_named("meta")
            .into_iter()
            .filter(|meta| {
                meta.attributes
                    .borrow()
                    .get("name")
                    .is_some_and(|n| n.eq_ignore_ascii_case(MODE_META_NAME))
            })
            .collect()
    }

    fn elements_named(&self, name: &str) -> Vec<NodeDataRef<ElementData>> {
        self.root
            .descendants()
            .elements()
            .filter(|el| &*el.name.local == name)
            .collect()
    }

    /// Add `<meta charset="UTF-8">` to the head unless the document already
    /// declares its charset. Returns true when the element was added.
    pub fn ensure_charset(&self) -> bool {
        let declared = self.elements_named("meta").iter().any(|meta| {
            let attrs = meta.attributes.borrow();
            attrs.contains("charset")
                || attrs
                    .get("content")
                    .is_some_and(|c| c.to_ascii_lowercase().contains("charset="))
        });
        if declared {
            return false;
        }

        let Some(head) = self.elements_named("head").into_iter().next() else {
            return false;
        };

        let name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("meta"));
        let meta = NodeRef::new_element(name, Vec::<(ExpandedName, kuchiki::Attribute)>::new());
        if let Some(element) = meta.as_element() {
            element
                .attributes
                .borrow_mut()
                .insert("charset", "UTF-8".to_string());
        }
        head.as_node().append(meta);
        true
    }

    /// Serialize the whole document.
    ///
    /// Text is written as raw UTF-8; only the characters HTML requires are
    /// escaped, no numeric character references are produced.
    pub fn to_html(&self) -> String {
        self.root.to_string()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_html())
            .with_context(|| format!("Cannot write file: {}", path.display()))
    }
}

/// Move the content fragment of every `<template>` under the element itself.
/// Repeats until no fragment is left, since inlined content may hold nested
/// templates.
fn inline_template_contents(root: &NodeRef) {
    loop {
        let pending: Vec<(NodeRef, NodeRef)> = root
            .descendants()
            .filter_map(|node| {
                let contents = node.as_element()?.template_contents.clone()?;
                contents.first_child().is_some().then_some((node, contents))
            })
            .collect();
        if pending.is_empty() {
            return;
        }

        for (template, contents) in pending {
            let children: Vec<NodeRef> = contents.children().collect();
            for child in children {
                template.append(child);
            }
        }
    }
}

/// An element carrying the annotation marker attribute.
#[derive(Clone)]
pub struct AnnotatedNode {
    element: NodeDataRef<ElementData>,
    attribute: String,
}

impl fmt::Debug for AnnotatedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedNode")
            .field("element", &self.outer_html())
            .field("attribute", &self.attribute)
            .finish()
    }
}

impl AnnotatedNode {
    /// Current value of the marker attribute.
    pub fn marker(&self) -> String {
        self.element
            .attributes
            .borrow()
            .get(self.attribute.as_str())
            .unwrap_or_default()
            .to_string()
    }

    pub fn set_marker(&self, value: &str) {
        self.element
            .attributes
            .borrow_mut()
            .insert(self.attribute.as_str(), value.to_string());
    }

    /// Raw value a tag is bound to: the element's text or an attribute value.
    /// A missing attribute reads as empty.
    pub fn bound_value(&self, keyword: &Keyword) -> String {
        match keyword {
            Keyword::Text => self.element.as_node().text_contents(),
            Keyword::Attribute(name) => self
                .element
                .attributes
                .borrow()
                .get(name.as_str())
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// The bound value in canonical form.
    pub fn canonical_value(&self, keyword: &Keyword) -> String {
        normalize_whitespace(&self.bound_value(keyword))
    }

    /// Replace the bound value. Writing `.` replaces all children of the
    /// element with a single text node.
    pub fn write_value(&self, keyword: &Keyword, value: &str) {
        match keyword {
            Keyword::Text => {
                let node = self.element.as_node();
                let children: Vec<NodeRef> = node.children().collect();
                for child in children {
                    child.detach();
                }
                node.append(NodeRef::new_text(value));
            }
            Keyword::Attribute(name) => {
                self.element
                    .attributes
                    .borrow_mut()
                    .insert(name.as_str(), value.to_string());
            }
        }
    }

    /// `gettext="..."` as written on the element, for source comments.
    pub fn marker_source(&self) -> String {
        format!("{}=\"{}\"", self.attribute, self.marker())
    }

    /// Serialized element, for diagnostics.
    pub fn outer_html(&self) -> String {
        self.element.as_node().to_string()
    }
}

/// Finds annotated elements in a document.
#[derive(Debug, Clone)]
pub struct DocumentScanner {
    attribute: String,
    ensure_charset: bool,
}

impl DocumentScanner {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            ensure_charset: false,
        }
    }

    /// Also add a UTF-8 charset declaration to scanned documents that lack one.
    /// Used when building templates and regenerating locale files.
    pub fn with_charset(mut self) -> Self {
        self.ensure_charset = true;
        self
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// All annotated elements, in document order.
    pub fn scan(&self, doc: &Document) -> Vec<AnnotatedNode> {
        if self.ensure_charset {
            doc.ensure_charset();
        }

        doc.root
            .descendants()
            .elements()
            .filter(|el| el.attributes.borrow().contains(self.attribute.as_str()))
            .map(|element| AnnotatedNode {
                element,
                attribute: self.attribute.clone(),
            })
            .collect()
    }
}
