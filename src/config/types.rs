use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::Locale;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "bindings.text")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration syntax: {0}")]
    SyntaxError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    /// Locale used when neither the stored preference nor the ambient hint decides.
    pub default_locale: Locale,

    /// Storage key holding the user's locale preference.
    pub storage_key: String,
    /// File backing local storage, relative to the site root.
    pub storage_path: String,

    pub key_separator: String,

    /// External locale files. When unset the built-in dictionary is used.
    pub locale_files: Option<LocaleFilesConfig>,

    pub bindings: BindingConfig,
    pub resources: ResourceConfig,
    pub effects: EffectsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocaleFilesConfig {
    pub file_pattern: String,
}

impl Default for LocaleFilesConfig {
    fn default() -> Self {
        Self { file_pattern: "**/{locales,messages}/**/*.json".to_string() }
    }
}

/// Attribute and class names that mark translatable elements.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BindingConfig {
    /// Plain-text binding attribute.
    pub text: String,
    /// Rich-text binding attribute.
    pub html: String,
    /// `attribute:key;...` binding attribute.
    pub attr: String,
    /// Class of the locale selection controls.
    pub control_class: String,
    /// Attribute of a control naming its locale.
    pub control_locale_attribute: String,
    /// Class marking the selected control.
    pub active_class: String,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            text: "data-i18n".to_string(),
            html: "data-i18n-html".to_string(),
            attr: "data-i18n-attr".to_string(),
            control_class: "lang-btn".to_string(),
            control_locale_attribute: "data-lang".to_string(),
            active_class: "active".to_string(),
        }
    }
}

/// Locale-dependent download link (the résumé).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceConfig {
    /// Element id of the link.
    pub link_id: String,
    /// Attribute receiving the path.
    pub attribute: String,
    /// Path per locale. Locales without an entry leave the link unchanged.
    pub paths: BTreeMap<Locale, String>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            link_id: "cv-link".to_string(),
            attribute: "href".to_string(),
            paths: BTreeMap::from([
                (Locale::Pt, "./assets/curriculo-Ingrid-Lima.pdf".to_string()),
                (Locale::En, "./assets/resume-Ingrid-Lima.pdf".to_string()),
            ]),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectsConfig {
    /// Equivalent of `prefers-reduced-motion: reduce`.
    pub reduced_motion: bool,
    /// Visible fraction at which a `.reveal` element is shown.
    pub reveal_threshold: f64,
    /// Per-item transition delay inside a reveal group.
    pub reveal_stagger_ms: u64,
    pub carousel_interval_ms: u64,
    /// Duration of the gallery show/hide animation.
    pub filter_duration_ms: u64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            reveal_threshold: 0.2,
            reveal_stagger_ms: 60,
            carousel_interval_ms: 4500,
            filter_duration_ms: 280,
        }
    }
}

impl SiteSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Binding attributes collide
    /// - Effect parameter out of range
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.storage_key.trim().is_empty() {
            errors.push(ValidationError::new(
                "storageKey",
                "The storage key cannot be empty. Example: \"idioma\"",
            ));
        }

        if self.storage_path.trim().is_empty() {
            errors.push(ValidationError::new(
                "storagePath",
                "The storage path cannot be empty. Example: \".folio-storage.json\"",
            ));
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if let Some(locale_files) = &self.locale_files {
            if locale_files.file_pattern.is_empty() {
                errors.push(ValidationError::new(
                    "localeFiles.filePattern",
                    "The pattern cannot be empty. Example: \"**/locales/*.json\"",
                ));
            } else if let Err(e) = globset::Glob::new(&locale_files.file_pattern) {
                errors.push(ValidationError::new(
                    "localeFiles.filePattern",
                    format!("Invalid glob pattern '{}': {e}", locale_files.file_pattern),
                ));
            }
        }

        self.bindings.validate_into(&mut errors);
        self.resources.validate_into(&mut errors);
        self.effects.validate_into(&mut errors);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl BindingConfig {
    fn validate_into(&self, errors: &mut Vec<ValidationError>) {
        let fields = [
            ("bindings.text", &self.text),
            ("bindings.html", &self.html),
            ("bindings.attr", &self.attr),
            ("bindings.controlClass", &self.control_class),
            ("bindings.controlLocaleAttribute", &self.control_locale_attribute),
            ("bindings.activeClass", &self.active_class),
        ];
        for (path, value) in fields {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(path, "The name cannot be empty"));
            }
        }

        let attributes = [&self.text, &self.html, &self.attr];
        for (index, name) in attributes.iter().enumerate() {
            if !name.is_empty() && attributes.iter().skip(index + 1).any(|other| other == name) {
                errors.push(ValidationError::new(
                    "bindings",
                    format!("Binding attribute '{name}' is used for more than one binding kind"),
                ));
            }
        }
    }
}

impl ResourceConfig {
    fn validate_into(&self, errors: &mut Vec<ValidationError>) {
        if self.link_id.trim().is_empty() {
            errors.push(ValidationError::new("resources.linkId", "The link id cannot be empty"));
        }
        if self.attribute.trim().is_empty() {
            errors.push(ValidationError::new(
                "resources.attribute",
                "The attribute cannot be empty. Example: \"href\"",
            ));
        }
        for (locale, path) in &self.paths {
            if path.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("resources.paths.{locale}"),
                    "The path cannot be empty. Remove the entry to leave the link unchanged",
                ));
            }
        }
    }
}

impl EffectsConfig {
    fn validate_into(&self, errors: &mut Vec<ValidationError>) {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            errors.push(ValidationError::new(
                "effects.revealThreshold",
                format!("The threshold must be between 0 and 1, got {}", self.reveal_threshold),
            ));
        }
        if self.carousel_interval_ms == 0 {
            errors.push(ValidationError::new(
                "effects.carouselIntervalMs",
                "The interval must be greater than 0",
            ));
        }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            default_locale: Locale::Pt,
            storage_key: "idioma".to_string(),
            storage_path: ".folio-storage.json".to_string(),
            key_separator: ".".to_string(),
            locale_files: None,
            bindings: BindingConfig::default(),
            resources: ResourceConfig::default(),
            effects: EffectsConfig::default(),
        }
    }
}
