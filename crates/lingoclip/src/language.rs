//! The supported target-language set.
//!
//! A closed enumeration shared by translate-request validation and the
//! capability-advertisement response. Codes are ISO 639-1.

use serde::{Deserialize, Serialize};

/// A supported translation target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "hi")]
    Hindi,
}

/// Every supported language, in advertisement order.
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language::Spanish,
    Language::French,
    Language::German,
    Language::Italian,
    Language::Portuguese,
    Language::Russian,
    Language::Japanese,
    Language::Korean,
    Language::Chinese,
    Language::Hindi,
];

impl Language {
    /// The ISO 639-1 code for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Russian => "ru",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Chinese => "zh",
            Language::Hindi => "hi",
        }
    }

    /// Parses a language code. Returns `None` for anything outside the
    /// supported set.
    pub fn parse(code: &str) -> Option<Self> {
        SUPPORTED_LANGUAGES
            .iter()
            .copied()
            .find(|lang| lang.code() == code)
    }

    /// All supported codes, for error messages and the status endpoint.
    pub fn supported_codes() -> Vec<&'static str> {
        SUPPORTED_LANGUAGES.iter().map(|l| l.code()).collect()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
