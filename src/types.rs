//! Core types used throughout the project.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// A locale supported by the site.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Portuguese.
    #[default]
    Pt,
    /// English.
    En,
    /// Spanish.
    Es,
}

impl Locale {
    /// Every supported locale, in the order used for ambient hint matching.
    pub const ALL: [Self; 3] = [Self::Pt, Self::En, Self::Es];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Parses a bare locale code (`"pt"`, `"EN"`, ` es `).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.into_iter().find(|locale| locale.as_str().eq_ignore_ascii_case(code))
    }

    /// Parses a locale code, degrading to `default` for anything unknown.
    #[must_use]
    pub fn from_code_or(code: &str, default: Self) -> Self {
        Self::from_code(code).unwrap_or(default)
    }

    /// Matches an ambient language hint such as `en-US` or `pt_BR`.
    ///
    /// A locale matches when its code is a prefix of the hint (case-insensitive).
    #[must_use]
    pub fn from_hint(hint: &str) -> Option<Self> {
        let hint = hint.trim().to_ascii_lowercase();
        if hint.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|locale| hint.starts_with(locale.as_str()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported locale code '{0}'")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownLocale(s.to_string()))
    }
}
