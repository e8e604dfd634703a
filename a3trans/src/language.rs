//! The closed set of languages understood by the XLIFF converter.
//!
//! Stringtables tag translations with English display names (`German`),
//! XLIFF files use ISO 639-1 style codes (`de`). Note that Czech is `cz`,
//! matching the game's own convention rather than ISO 639-1.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageCode {
    English,
    Czech,
    French,
    Spanish,
    Italian,
    Polish,
    Portuguese,
    Russian,
    German,
    Korean,
    Japanese,
}

impl LanguageCode {
    /// Every supported language, in the order XLIFF files are looked up.
    pub const ALL: [LanguageCode; 11] = [
        LanguageCode::English,
        LanguageCode::Czech,
        LanguageCode::French,
        LanguageCode::Spanish,
        LanguageCode::Italian,
        LanguageCode::Polish,
        LanguageCode::Portuguese,
        LanguageCode::Russian,
        LanguageCode::German,
        LanguageCode::Korean,
        LanguageCode::Japanese,
    ];

    pub fn code(self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Czech => "cz",
            LanguageCode::French => "fr",
            LanguageCode::Spanish => "es",
            LanguageCode::Italian => "it",
            LanguageCode::Polish => "pl",
            LanguageCode::Portuguese => "pt",
            LanguageCode::Russian => "ru",
            LanguageCode::German => "de",
            LanguageCode::Korean => "ko",
            LanguageCode::Japanese => "ja",
        }
    }

    /// The stringtable language tag for this language.
    pub fn display_name(self) -> &'static str {
        match self {
            LanguageCode::English => "English",
            LanguageCode::Czech => "Czech",
            LanguageCode::French => "French",
            LanguageCode::Spanish => "Spanish",
            LanguageCode::Italian => "Italian",
            LanguageCode::Polish => "Polish",
            LanguageCode::Portuguese => "Portuguese",
            LanguageCode::Russian => "Russian",
            LanguageCode::German => "German",
            LanguageCode::Korean => "Korean",
            LanguageCode::Japanese => "Japanese",
        }
    }
}

impl Display for LanguageCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Accepts the codes case-insensitively, surrounding whitespace ignored.
impl FromStr for LanguageCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LanguageCode::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedLanguage(s.to_string()))
    }
}

/// Maps a language code to its display name, `""` for unknown codes.
pub fn display_name_for_code(code: &str) -> &'static str {
    code.parse::<LanguageCode>()
        .map(LanguageCode::display_name)
        .unwrap_or("")
}
