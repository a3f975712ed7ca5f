//! Persisted locale preference.

use crate::input::Storage;
use crate::types::Locale;

/// Reads and writes the user's locale choice under one storage key.
///
/// Storage failures never surface: reads degrade to "nothing stored" and writes are
/// dropped with a warning, so the page keeps working with storage disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalePreference {
    /// Storage key holding the locale code.
    key: String,
    /// Locale used when neither storage nor the environment hint yields one.
    default_locale: Locale,
}

impl LocalePreference {
    #[must_use]
    pub fn new(key: impl Into<String>, default_locale: Locale) -> Self {
        Self { key: key.into(), default_locale }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn default_locale(&self) -> Locale {
        self.default_locale
    }

    /// The stored locale, if storage is readable and holds a supported code.
    #[must_use]
    pub fn stored(&self, storage: &dyn Storage) -> Option<Locale> {
        let code = match storage.get_item(&self.key) {
            Ok(code) => code?,
            Err(e) => {
                tracing::warn!("Could not read locale preference: {}", e);
                return None;
            }
        };
        let locale = Locale::from_code(&code);
        if locale.is_none() {
            tracing::debug!("Ignoring unsupported stored locale '{}'", code);
        }
        locale
    }

    /// Persists `locale`; returns whether the write succeeded.
    pub fn store(&self, storage: &mut dyn Storage, locale: Locale) -> bool {
        match storage.set_item(&self.key, locale.as_str()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Could not persist locale preference '{}': {}", locale, e);
                false
            }
        }
    }

    /// Picks the locale to show on first render.
    ///
    /// A supported stored code wins. Otherwise the environment `hint` (such as `es-ES`)
    /// is matched by prefix, falling back to the default locale, and the derived choice is
    /// persisted.
    pub fn resolve_initial(&self, storage: &mut dyn Storage, hint: Option<&str>) -> Locale {
        if let Some(locale) = self.stored(storage) {
            tracing::debug!("Using stored locale '{}'", locale);
            return locale;
        }

        let locale = hint.and_then(Locale::from_hint).unwrap_or(self.default_locale);
        tracing::debug!("Derived locale '{}' from hint {:?}", locale, hint);
        self.store(storage, locale);
        locale
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::input::{
        MemoryStorage,
        StorageError,
    };

    fn preference() -> LocalePreference {
        LocalePreference::new("idioma", Locale::Pt)
    }

    #[rstest]
    #[case::spanish_region("es-ES", Locale::Es)]
    #[case::english_region("en-US", Locale::En)]
    #[case::bare_english("en", Locale::En)]
    #[case::portuguese_brazil("pt-BR", Locale::Pt)]
    #[case::uppercase("EN-gb", Locale::En)]
    #[case::unsupported("fr-FR", Locale::Pt)]
    #[case::empty("", Locale::Pt)]
    fn test_resolve_initial_from_hint(#[case] hint: &str, #[case] expected: Locale) {
        let mut storage = MemoryStorage::new();

        let locale = preference().resolve_initial(&mut storage, Some(hint));

        assert_eq!(locale, expected);
        assert_eq!(storage.get_item("idioma").unwrap().as_deref(), Some(expected.as_str()));
    }

    #[googletest::test]
    fn test_stored_locale_wins_over_hint() {
        let mut storage = MemoryStorage::new();
        storage.set_item("idioma", "en").unwrap();

        let locale = preference().resolve_initial(&mut storage, Some("es-ES"));

        expect_that!(locale, eq(Locale::En));
    }

    #[googletest::test]
    fn test_unsupported_stored_code_is_replaced() {
        let mut storage = MemoryStorage::new();
        storage.set_item("idioma", "xx").unwrap();

        let locale = preference().resolve_initial(&mut storage, Some("es-ES"));

        expect_that!(locale, eq(Locale::Es));
        expect_that!(storage.get_item("idioma").unwrap(), some(eq("es")));
    }

    #[googletest::test]
    fn test_missing_hint_uses_default() {
        let mut storage = MemoryStorage::new();

        let preference = LocalePreference::new("idioma", Locale::En);

        let locale = preference.resolve_initial(&mut storage, None);

        expect_that!(locale, eq(Locale::En));
    }

    #[googletest::test]
    fn test_blocked_storage_still_resolves() {
        let mut storage = MemoryStorage::blocked();
        let preference = preference();

        expect_that!(preference.resolve_initial(&mut storage, Some("en-US")), eq(Locale::En));
        expect_that!(preference.store(&mut storage, Locale::Es), eq(false));
        expect_that!(preference.stored(&storage), none());
        assert!(matches!(storage.get_item("idioma"), Err(StorageError::Unavailable)));
    }
}
