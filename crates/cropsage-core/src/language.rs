use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Display language selectable by the user.
///
/// English is the canonical language: every query is classified in English and
/// every result is translated back out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "mr")]
    Marathi,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Marathi];

    /// Two-letter code used by the translation service (`en`, `hi`, `mr`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Marathi => "mr",
        }
    }

    /// Locale tag handed to speech recognizers and synthesizers.
    #[must_use]
    pub fn locale_tag(self) -> &'static str {
        match self {
            Language::English => "en-IN",
            Language::Hindi => "hi-IN",
            Language::Marathi => "mr-IN",
        }
    }

    #[must_use]
    pub fn is_canonical(self) -> bool {
        self == Language::English
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::English),
            "hi" => Ok(Language::Hindi),
            "mr" => Ok(Language::Marathi),
            _ => Err(CoreError::UnknownLanguage(s.to_string())),
        }
    }
}
