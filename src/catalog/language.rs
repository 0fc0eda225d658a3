//! Supported languages and localized string lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The closed set of languages the catalog is authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Zh,
    Fr,
    Ar,
}

/// All supported languages, in fallback-preference order.
pub const SUPPORTED_LANGUAGES: [Language; 5] = [
    Language::En,
    Language::Es,
    Language::Zh,
    Language::Fr,
    Language::Ar,
];

impl Language {
    /// The wire/storage code for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Zh => "zh",
            Self::Fr => "fr",
            Self::Ar => "ar",
        }
    }

    /// Parse a language code. Returns `None` for anything outside the
    /// supported set — callers decide whether that is `UnsupportedLanguage`
    /// or a catalog defect.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            "zh" => Some(Self::Zh),
            "fr" => Some(Self::Fr),
            "ar" => Some(Self::Ar),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown language: {s}"))
    }
}

/// A string authored once per supported language.
///
/// The catalog validator requires every entry to carry all supported codes;
/// `get` still has a defined fallback chain (requested → English → any) so a
/// runtime lookup never panics even against an incomplete map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText(pub HashMap<Language, String>);

impl LocalizedText {
    /// Look up the text for `language`, falling back to English and then to
    /// any available translation. An empty map yields the empty string.
    pub fn get(&self, language: Language) -> &str {
        if let Some(s) = self.0.get(&language) {
            return s;
        }
        if let Some(s) = self.0.get(&Language::En) {
            return s;
        }
        SUPPORTED_LANGUAGES
            .iter()
            .find_map(|l| self.0.get(l))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Languages from the supported set with no translation here.
    pub fn missing_languages(&self) -> Vec<Language> {
        SUPPORTED_LANGUAGES
            .iter()
            .copied()
            .filter(|l| !self.0.contains_key(l))
            .collect()
    }

    /// Build from explicit pairs. Mostly for tests and fixtures.
    pub fn from_pairs(pairs: &[(Language, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(l, s)| (*l, (*s).to_string()))
                .collect(),
        )
    }

    /// English-only text. Deliberately incomplete — for tests exercising the
    /// fallback path.
    pub fn english(text: &str) -> Self {
        Self::from_pairs(&[(Language::En, text)])
    }
}
