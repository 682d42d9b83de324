//! UI language context
//!
//! The page is bilingual. The current language is a plain value owned by the
//! composition root and passed to whatever needs to pick a string; nothing
//! reads it from shared global state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Korean (initial language)
    #[default]
    Ko,
    En,
}

impl Language {
    /// The other language
    pub fn toggled(self) -> Self {
        match self {
            Language::Ko => Language::En,
            Language::En => Language::Ko,
        }
    }

    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }

    /// Label shown on the language toggle
    pub fn badge(&self) -> &'static str {
        match self {
            Language::Ko => "KR",
            Language::En => "EN",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "ko" | "kr" => Some(Language::Ko),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A value available in both languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localized<T> {
    pub ko: T,
    pub en: T,
}

impl<T> Localized<T> {
    pub const fn new(ko: T, en: T) -> Self {
        Self { ko, en }
    }

    pub fn get(&self, language: Language) -> &T {
        match language {
            Language::Ko => &self.ko,
            Language::En => &self.en,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_korean() {
        assert_eq!(Language::default(), Language::Ko);
    }

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Language::Ko.toggled(), Language::En);
        assert_eq!(Language::Ko.toggled().toggled(), Language::Ko);
    }

    #[test]
    fn test_badge_and_code() {
        assert_eq!(Language::Ko.badge(), "KR");
        assert_eq!(Language::En.badge(), "EN");
        assert_eq!(Language::from_code("KR"), Some(Language::Ko));
        assert_eq!(Language::from_code("en"), Some(Language::En));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_localized_lookup() {
        const GREETING: Localized<&str> = Localized::new("안녕하세요", "Hello");
        assert_eq!(*GREETING.get(Language::Ko), "안녕하세요");
        assert_eq!(*GREETING.get(Language::En), "Hello");
    }
}
