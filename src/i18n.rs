//! Page localization: locale resolution, dictionary application and locale controls.

pub mod controls;
pub mod coverage;
pub mod preference;
pub mod translator;

use std::sync::Arc;

pub use coverage::{
    CoverageReport,
    MarkupIssue,
};
pub use preference::LocalePreference;
pub use translator::{
    ApplyReport,
    Translator,
};

use crate::config::SiteSettings;
use crate::input::{
    Dictionary,
    Document,
    Storage,
};
use crate::types::Locale;

/// Localization state of one page.
///
/// Owns the translator and preference, and remembers the locale last applied.
#[derive(Debug, Clone)]
pub struct I18nContext {
    /// Applies dictionary entries to the page.
    translator: Translator,
    /// Stored locale preference.
    preference: LocalePreference,
    /// Locale most recently applied.
    active: Locale,
}

impl I18nContext {
    #[must_use]
    pub fn new(translator: Translator, preference: LocalePreference) -> Self {
        let active = preference.default_locale();
        Self { translator, preference, active }
    }

    #[must_use]
    pub fn from_settings(dictionary: Arc<Dictionary>, settings: &SiteSettings) -> Self {
        let preference = LocalePreference::new(&settings.storage_key, dictionary.default_locale());
        Self::new(Translator::new(dictionary, settings), preference)
    }

    #[must_use]
    pub const fn active(&self) -> Locale {
        self.active
    }

    #[must_use]
    pub const fn translator(&self) -> &Translator {
        &self.translator
    }

    #[must_use]
    pub const fn preference(&self) -> &LocalePreference {
        &self.preference
    }

    /// First render: prepares the controls, resolves the initial locale and applies it.
    pub fn init<D: Document>(
        &mut self,
        doc: &mut D,
        storage: &mut dyn Storage,
        hint: Option<&str>,
    ) -> ApplyReport {
        let controls = controls::prepare_controls(doc, self.translator.bindings());
        let locale = self.preference.resolve_initial(storage, hint);
        tracing::info!("Initial locale '{}' ({} locale controls)", locale, controls.len());
        self.render(doc, locale)
    }

    /// Switches to the locale named by `code`, persisting the choice.
    ///
    /// Unsupported codes switch to the default locale.
    pub fn set_locale<D: Document>(
        &mut self,
        doc: &mut D,
        storage: &mut dyn Storage,
        code: &str,
    ) -> ApplyReport {
        let default = self.preference.default_locale();
        let locale = Locale::from_code(code).unwrap_or_else(|| {
            tracing::warn!("Unsupported locale '{}', using '{}'", code, default);
            default
        });
        self.preference.store(storage, locale);
        tracing::info!("Locale changed to '{}'", locale);
        self.render(doc, locale)
    }

    /// Handles activation of a locale control element.
    ///
    /// Controls without a code are ignored.
    pub fn select_control<D: Document>(
        &mut self,
        doc: &mut D,
        storage: &mut dyn Storage,
        control: D::Node,
    ) -> Option<ApplyReport> {
        let code = controls::control_code(doc, self.translator.bindings(), control)
            .filter(|code| !code.is_empty())?
            .to_string();
        Some(self.set_locale(doc, storage, &code))
    }

    /// Marks the control for `locale` active and translates the page into it.
    fn render<D: Document>(&mut self, doc: &mut D, locale: Locale) -> ApplyReport {
        controls::mark_active(doc, self.translator.bindings(), locale);
        let report = self.translator.apply(doc, locale);
        self.active = locale;
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::input::{
        ElementSnapshot,
        MemoryStorage,
        NodeId,
        Page,
    };

    fn context() -> I18nContext {
        let dictionary = Dictionary::new(Locale::Pt)
            .with_entries(Locale::Pt, [("nav.open", "Abrir menu")])
            .with_entries(Locale::En, [("nav.open", "Open menu")])
            .with_entries(Locale::Es, [("nav.open", "Abrir menú")]);
        I18nContext::from_settings(Arc::new(dictionary), &SiteSettings::default())
    }

    /// html > [button.lang-btn "PT", button.lang-btn "EN", span[data-i18n]]
    fn page() -> Page {
        Page::from_snapshot(
            &ElementSnapshot::new("html")
                .child(ElementSnapshot::new("button").class("lang-btn").text("PT"))
                .child(ElementSnapshot::new("button").class("lang-btn").text("EN"))
                .child(ElementSnapshot::new("span").attr("data-i18n", "nav.open")),
        )
    }

    #[googletest::test]
    fn test_init_applies_hinted_locale_and_marks_control() {
        let mut page = page();
        let mut storage = MemoryStorage::new();
        let mut context = context();

        context.init(&mut page, &mut storage, Some("en-US"));

        expect_that!(context.active(), eq(Locale::En));
        expect_that!(page.text(NodeId::new(3)), eq("Open menu"));
        expect_that!(page.has_class(NodeId::new(1), "active"), eq(false));
        expect_that!(page.has_class(NodeId::new(2), "active"), eq(true));
        expect_that!(storage.get_item("idioma").unwrap(), some(eq("en")));
    }

    #[googletest::test]
    fn test_selected_locale_survives_reload() {
        let mut storage = MemoryStorage::new();
        let mut context = context();
        let mut page = page();
        context.init(&mut page, &mut storage, Some("es-ES"));

        context.select_control(&mut page, &mut storage, NodeId::new(2));

        let mut reloaded = self::page();
        let mut fresh = self::context();
        fresh.init(&mut reloaded, &mut storage, Some("es-ES"));
        expect_that!(fresh.active(), eq(Locale::En));
        expect_that!(reloaded.text(NodeId::new(3)), eq("Open menu"));
    }

    #[googletest::test]
    fn test_control_without_label_is_ignored() {
        let mut page = Page::from_snapshot(
            &ElementSnapshot::new("html")
                .child(ElementSnapshot::new("button").class("lang-btn").text("EN"))
                .child(ElementSnapshot::new("button").class("lang-btn").text("  "))
                .child(ElementSnapshot::new("span").attr("data-i18n", "nav.open")),
        );
        let mut storage = MemoryStorage::new();
        let mut context = context();
        context.init(&mut page, &mut storage, Some("en-US"));

        let report = context.select_control(&mut page, &mut storage, NodeId::new(2));

        expect_that!(report, none());
        expect_that!(page.attr(NodeId::new(2), "data-lang"), some(eq("")));
        expect_that!(context.active(), eq(Locale::En));
        expect_that!(page.text(NodeId::new(3)), eq("Open menu"));
        expect_that!(storage.get_item("idioma").unwrap(), some(eq("en")));
    }

    #[googletest::test]
    fn test_set_locale_with_unknown_code_uses_default() {
        let mut page = page();
        let mut storage = MemoryStorage::new();
        let mut context = context();
        context.init(&mut page, &mut storage, Some("en"));

        let report = context.set_locale(&mut page, &mut storage, "xx");

        expect_that!(report.locale, eq(Locale::Pt));
        expect_that!(page.attr(page.root(), "lang"), some(eq("pt")));
        expect_that!(page.has_class(NodeId::new(1), "active"), eq(true));
        expect_that!(storage.get_item("idioma").unwrap(), some(eq("pt")));
    }

    #[googletest::test]
    fn test_blocked_storage_still_switches_locale() {
        let mut page = page();
        let mut storage = MemoryStorage::blocked();
        let mut context = context();

        context.init(&mut page, &mut storage, None);
        context.set_locale(&mut page, &mut storage, "es");

        expect_that!(context.active(), eq(Locale::Es));
        expect_that!(page.text(NodeId::new(3)), eq("Abrir menú"));
    }

    #[googletest::test]
    fn test_select_control_without_locale_is_ignored() {
        let mut page = page();
        let mut storage = MemoryStorage::new();
        let mut context = context();

        let report = context.select_control(&mut page, &mut storage, NodeId::new(3));

        expect_that!(report, none());
    }
}
