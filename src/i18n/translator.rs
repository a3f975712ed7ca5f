//! Applies dictionary text to bound document elements.

use std::sync::Arc;

use crate::config::{
    BindingConfig,
    ResourceConfig,
    SiteSettings,
};
use crate::input::{
    Dictionary,
    Document,
    Lookup,
};
use crate::ir::{
    BindingKind,
    RichText,
    parse_attr_bindings,
};
use crate::types::Locale;

/// Outcome of one [`Translator::apply`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Locale the document now declares.
    pub locale: Locale,
    /// Elements whose text was replaced.
    pub text: usize,
    /// Elements whose markup was replaced.
    pub html: usize,
    /// Attributes rewritten.
    pub attributes: usize,
    /// Well-formed attribute pairs rejected (malformed pairs are not counted individually).
    pub skipped_pairs: usize,
    /// Keys that did not resolve, with the binding kind that asked for them.
    pub missing: Vec<(BindingKind, String)>,
    /// Whether the locale-dependent resource link was repointed.
    pub resource_updated: bool,
}

/// Rewrites bound elements from an immutable dictionary.
///
/// Never fails: unresolved keys leave elements untouched and unknown locale codes
/// degrade to the dictionary's default locale.
#[derive(Debug, Clone)]
pub struct Translator {
    /// Shared translation tables.
    dictionary: Arc<Dictionary>,
    /// Binding attribute names.
    bindings: BindingConfig,
    /// Per-locale resource link.
    resources: ResourceConfig,
}

impl Translator {
    #[must_use]
    pub fn new(dictionary: Arc<Dictionary>, settings: &SiteSettings) -> Self {
        Self {
            dictionary,
            bindings: settings.bindings.clone(),
            resources: settings.resources.clone(),
        }
    }

    #[must_use]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    #[must_use]
    pub const fn bindings(&self) -> &BindingConfig {
        &self.bindings
    }

    #[must_use]
    pub fn default_locale(&self) -> Locale {
        self.dictionary.default_locale()
    }

    #[must_use]
    pub fn lookup(&self, locale: Locale, key: &str) -> Lookup<'_> {
        self.dictionary.lookup(locale, key)
    }

    /// Applies the locale named by `code`, degrading unknown codes to the default locale.
    pub fn apply_code<D: Document>(&self, doc: &mut D, code: &str) -> ApplyReport {
        let locale = Locale::from_code(code).unwrap_or_else(|| {
            tracing::debug!("Unknown locale '{}', using '{}'", code, self.default_locale());
            self.default_locale()
        });
        self.apply(doc, locale)
    }

    /// Synchronizes every bound element of `doc` with `locale`'s dictionary.
    pub fn apply<D: Document>(&self, doc: &mut D, locale: Locale) -> ApplyReport {
        let mut report = ApplyReport { locale, ..ApplyReport::default() };

        for node in doc.elements_with_attribute(&self.bindings.text) {
            let Some(key) = doc.attribute(node, &self.bindings.text).map(str::to_owned) else {
                continue;
            };
            match self.lookup(locale, &key) {
                Lookup::Found(value) => {
                    doc.set_text(node, value);
                    report.text += 1;
                }
                Lookup::Missing => report.missing.push((BindingKind::Text, key)),
            }
        }

        for node in doc.elements_with_attribute(&self.bindings.html) {
            let Some(key) = doc.attribute(node, &self.bindings.html).map(str::to_owned) else {
                continue;
            };
            match self.lookup(locale, &key) {
                Lookup::Found(value) => {
                    doc.set_rich_text(node, RichText::parse(value));
                    report.html += 1;
                }
                Lookup::Missing => report.missing.push((BindingKind::Html, key)),
            }
        }

        for node in doc.elements_with_attribute(&self.bindings.attr) {
            let Some(declaration) = doc.attribute(node, &self.bindings.attr).map(str::to_owned)
            else {
                continue;
            };
            let pairs = parse_attr_bindings(&declaration);
            let declared = declaration.split(';').filter(|pair| !pair.trim().is_empty()).count();
            report.skipped_pairs += declared.saturating_sub(pairs.len());

            for pair in pairs {
                match self.lookup(locale, pair.key) {
                    Lookup::Found(value) => {
                        doc.set_attribute(node, pair.attribute, value);
                        report.attributes += 1;
                    }
                    Lookup::Missing => {
                        report.missing.push((BindingKind::Attr, pair.key.to_string()));
                    }
                }
            }
        }

        if let Some(path) = self.resources.paths.get(&locale)
            && let Some(link) = doc.element_by_id(&self.resources.link_id)
        {
            doc.set_attribute(link, &self.resources.attribute, path);
            report.resource_updated = true;
        }

        let root = doc.document_element();
        doc.set_attribute(root, "lang", locale.as_str());

        tracing::debug!(
            locale = %locale,
            text = report.text,
            html = report.html,
            attributes = report.attributes,
            missing = report.missing.len(),
            "Applied translations"
        );
        report
    }
}
