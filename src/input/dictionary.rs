//! Translation dictionary input definitions

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::path::{
    Path,
    PathBuf,
};

use globset::Glob;
use ignore::WalkBuilder;
use serde_json::Value;
use thiserror::Error;

use crate::types::Locale;

/// Flattened key → value map for one locale.
pub type LocaleTable = HashMap<String, String>;

/// Built-in locale files: (locale, file name, JSON-with-comments source).
const BUILTIN_LOCALES: [(Locale, &str, &str); 3] = [
    (Locale::Pt, "pt.json", include_str!("../../locales/pt.json")),
    (Locale::En, "en.json", include_str!("../../locales/en.json")),
    (Locale::Es, "es.json", include_str!("../../locales/es.json")),
];

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read locale file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse locale file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Locale file '{path}' must contain a JSON object")]
    NotAnObject { path: String },

    #[error("Invalid locale file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No locale files matching '{0}' were found")]
    NoLocaleFiles(String),
}

/// Result of looking a key up in one locale's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a str),
    Missing,
}

impl<'a> Lookup<'a> {
    #[must_use]
    pub const fn value(self) -> Option<&'a str> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing => None,
        }
    }
}

/// Immutable locale-keyed dictionary.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    /// Tables by locale.
    tables: BTreeMap<Locale, LocaleTable>,
    /// Locale whose table stands in for locales without one.
    default_locale: Locale,
}

impl Dictionary {
    #[must_use]
    pub fn new(default_locale: Locale) -> Self {
        Self { tables: BTreeMap::new(), default_locale }
    }

    /// Adds `entries` to `locale`'s table; later entries win on duplicate keys.
    #[must_use]
    pub fn with_entries<K, V>(
        mut self,
        locale: Locale,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.merge(locale, entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    fn merge(&mut self, locale: Locale, entries: LocaleTable) {
        let table = self.tables.entry(locale).or_default();
        for (key, value) in entries {
            if table.insert(key.clone(), value).is_some() {
                tracing::debug!("Key '{}' redefined for locale '{}'", key, locale);
            }
        }
    }

    #[must_use]
    pub const fn default_locale(&self) -> Locale {
        self.default_locale
    }

    /// Locales with a table, in enum order.
    pub fn locales(&self) -> impl Iterator<Item = Locale> + '_ {
        self.tables.keys().copied()
    }

    #[must_use]
    pub fn table(&self, locale: Locale) -> Option<&LocaleTable> {
        self.tables.get(&locale)
    }

    /// The table used when rendering `locale`: its own, else the default locale's.
    #[must_use]
    pub fn effective_table(&self, locale: Locale) -> Option<&LocaleTable> {
        self.tables.get(&locale).or_else(|| self.tables.get(&self.default_locale))
    }

    /// Looks `key` up in the table used for `locale`. No per-key fallback is attempted.
    #[must_use]
    pub fn lookup(&self, locale: Locale, key: &str) -> Lookup<'_> {
        self.effective_table(locale)
            .and_then(|table| table.get(key))
            .map_or(Lookup::Missing, |value| Lookup::Found(value.as_str()))
    }

    /// Dictionary built from the locale files embedded in the binary.
    pub fn builtin(default_locale: Locale, separator: &str) -> Result<Self, DictionaryError> {
        let mut dictionary = Self::new(default_locale);
        for (locale, name, source) in BUILTIN_LOCALES {
            let entries = parse_locale_source(name, source, separator)?;
            dictionary.merge(locale, entries);
        }
        Ok(dictionary)
    }

    /// Loads every locale file under `root` matching `file_pattern`.
    ///
    /// The locale of each file is detected from its path; files whose locale cannot be
    /// detected are skipped with a warning. Several files for one locale are merged.
    pub fn load_from_dir(
        root: &Path,
        file_pattern: &str,
        separator: &str,
        default_locale: Locale,
    ) -> Result<Self, DictionaryError> {
        let files = find_locale_files(root, file_pattern)?;
        if files.is_empty() {
            return Err(DictionaryError::NoLocaleFiles(file_pattern.to_string()));
        }

        let mut dictionary = Self::new(default_locale);
        for path in files {
            let Some(locale) = detect_locale_from_path(&path) else {
                tracing::warn!("Skipping locale file with unknown locale: {:?}", path);
                continue;
            };
            let source = std::fs::read_to_string(&path)
                .map_err(|source| DictionaryError::Io { path: path.clone(), source })?;
            let entries = parse_locale_source(&path.to_string_lossy(), &source, separator)?;
            tracing::debug!("Loaded {} keys for '{}' from {:?}", entries.len(), locale, path);
            dictionary.merge(locale, entries);
        }
        Ok(dictionary)
    }
}

/// Parses a JSON (comments and trailing commas allowed) locale file into a flat table.
fn parse_locale_source(
    path: &str,
    source: &str,
    separator: &str,
) -> Result<LocaleTable, DictionaryError> {
    let value = jsonc_parser::parse_to_serde_value(source, &jsonc_parser::ParseOptions::default())
        .map_err(|e| DictionaryError::Parse { path: path.to_string(), message: e.to_string() })?;

    match value {
        Some(json @ Value::Object(_)) => Ok(flatten_json(&json, separator, None)),
        _ => Err(DictionaryError::NotAnObject { path: path.to_string() }),
    }
}

/// Flatten nested JSON object into separator-joined key map.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use folio_i18n::input::dictionary::flatten_json;
///
/// let json = json!({
///     "hero": {
///         "title": "PORTFOLIO",
///         "nav": { "contact": "Contact" }
///     }
/// });
///
/// let flattened = flatten_json(&json, ".", None);
/// assert_eq!(flattened.get("hero.title"), Some(&"PORTFOLIO".to_string()));
/// assert_eq!(flattened.get("hero.nav.contact"), Some(&"Contact".to_string()));
/// ```
#[must_use]
pub fn flatten_json(json: &Value, separator: &str, prefix: Option<&str>) -> LocaleTable {
    let mut result = HashMap::new();
    flatten_json_value(json, separator, prefix, &mut result);
    result
}

fn flatten_json_value(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
    result: &mut LocaleTable,
) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key =
                    prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::Array(arr) => {
            for (index, value) in arr.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), s.clone());
            }
        }
        Value::Null => {}
        _ => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), json.to_string());
            }
        }
    }
}

/// Finds files under `root` whose root-relative path matches `file_pattern`.
fn find_locale_files(root: &Path, file_pattern: &str) -> Result<Vec<PathBuf>, DictionaryError> {
    let matcher = Glob::new(file_pattern)
        .map_err(|e| DictionaryError::InvalidPattern {
            pattern: file_pattern.to_string(),
            message: e.to_string(),
        })?
        .compile_matcher();

    let mut found = Vec::new();
    for result in WalkBuilder::new(root).hidden(false).git_ignore(true).follow_links(false).build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(root) else {
            continue;
        };
        if matcher.is_match(relative_path) {
            found.push(path.to_path_buf());
        }
    }
    found.sort();
    Ok(found)
}

/// Detect the locale of a locale file from its path.
///
/// Splits the path by '/' and '.', then searches backwards for a part that is a
/// supported locale code, optionally followed by region or script subtags.
///
/// # Examples
/// - `locales/en.json` → `en`
/// - `messages/pt-BR/site.json` → `pt`
/// - `locales/en-site.json` → none (not a language tag)
fn detect_locale_from_path(path: &Path) -> Option<Locale> {
    let path_str = path.to_string_lossy();
    path_str.split(['/', '\\', '.']).rev().find_map(locale_of_tag)
}

/// Locale of a BCP 47-like tag (`es`, `en-US`, `pt_BR`, `pt-Latn-BR`).
///
/// A script subtag is only accepted in title case right after the language.
fn locale_of_tag(tag: &str) -> Option<Locale> {
    let mut subtags = tag.split(['-', '_']);
    let locale = Locale::from_code(subtags.next()?)?;
    subtags
        .enumerate()
        .all(|(position, subtag)| is_region(subtag) || (position == 0 && is_script(subtag)))
        .then_some(locale)
}

/// Region subtag: two letters (`BR`) or three digits (`419`).
fn is_region(subtag: &str) -> bool {
    let alpha = subtag.len() == 2 && subtag.chars().all(|c| c.is_ascii_alphabetic());
    let digits = subtag.len() == 3 && subtag.chars().all(|c| c.is_ascii_digit());
    alpha || digits
}

/// Script subtag in title case (`Latn`, `Hant`).
fn is_script(subtag: &str) -> bool {
    let mut chars = subtag.chars();
    subtag.len() == 4
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_lowercase())
}
