//! Dictionary completeness checks.

use std::collections::{
    BTreeMap,
    BTreeSet,
};

use crate::input::Dictionary;
use crate::ir::markup::unsupported_tags;
use crate::types::Locale;

/// A dictionary value using markup outside the supported inline subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupIssue {
    pub locale: Locale,
    pub key: String,
    pub tags: Vec<String>,
}

/// Keys each locale lacks relative to the union of all tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Missing keys per locale with a table, sorted.
    pub missing: BTreeMap<Locale, Vec<String>>,
    /// Supported locales with no table; they render from the default locale's table.
    pub without_table: Vec<Locale>,
    pub markup: Vec<MarkupIssue>,
}

impl CoverageReport {
    /// Compares every table against the union of all keys.
    #[must_use]
    pub fn check(dictionary: &Dictionary) -> Self {
        let all_keys: BTreeSet<&str> = dictionary
            .locales()
            .filter_map(|locale| dictionary.table(locale))
            .flat_map(|table| table.keys().map(String::as_str))
            .collect();

        let mut report = Self::default();
        for locale in Locale::ALL {
            let Some(table) = dictionary.table(locale) else {
                report.without_table.push(locale);
                continue;
            };

            let missing: Vec<String> = all_keys
                .iter()
                .filter(|key| !table.contains_key(**key))
                .map(|key| (*key).to_string())
                .collect();
            if !missing.is_empty() {
                report.missing.insert(locale, missing);
            }

            let mut keys: Vec<&String> = table.keys().collect();
            keys.sort();
            for key in keys {
                let Some(value) = table.get(key) else { continue };
                let tags = unsupported_tags(value);
                if !tags.is_empty() {
                    report.markup.push(MarkupIssue { locale, key: key.clone(), tags });
                }
            }
        }
        report
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.without_table.is_empty() && self.markup.is_empty()
    }

    #[must_use]
    pub fn missing_count(&self, locale: Locale) -> usize {
        self.missing.get(&locale).map_or(0, Vec::len)
    }

    /// Emits the report through `tracing`: a warning per gap, details at debug level.
    pub fn log(&self) {
        for (locale, keys) in &self.missing {
            tracing::warn!("Locale '{}' is missing {} keys", locale, keys.len());
            tracing::debug!("Missing keys for '{}': {:?}", locale, keys);
        }
        for locale in &self.without_table {
            tracing::warn!("Locale '{}' has no table and renders from the default locale", locale);
        }
        for issue in &self.markup {
            tracing::warn!(
                "Key '{}' in '{}' uses unsupported markup: {:?}",
                issue.key,
                issue.locale,
                issue.tags
            );
        }
        if self.is_complete() {
            tracing::debug!("Dictionary coverage is complete");
        }
    }
}
