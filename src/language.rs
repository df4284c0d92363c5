//! User-facing languages and the two code spaces they map to.
//!
//! Recognition (tesseract) and speech synthesis use different language codes
//! for the same language: `eng`/`urd` versus `en`/`ur`. Callers only ever pick
//! a [`Language`]; the mapping to each engine's code happens here and nowhere
//! else.

use crate::error::ToolkitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language the toolkit can recognise and speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Urdu,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Urdu];

    /// Label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Urdu => "Urdu",
        }
    }

    /// Tesseract traineddata code.
    pub fn ocr_code(self) -> &'static str {
        match self {
            Language::English => "eng",
            Language::Urdu => "urd",
        }
    }

    /// Speech-synthesis code.
    pub fn speech_code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Urdu => "ur",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = ToolkitError;

    /// Accepts the label or either engine code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Language::ALL
            .into_iter()
            .find(|l| {
                needle.eq_ignore_ascii_case(l.label())
                    || needle.eq_ignore_ascii_case(l.ocr_code())
                    || needle.eq_ignore_ascii_case(l.speech_code())
            })
            .ok_or_else(|| {
                ToolkitError::InvalidConfig(format!(
                    "unknown language '{needle}' (expected English or Urdu)"
                ))
            })
    }
}

/// The set of languages handed to the recognition engine.
///
/// Never empty, never contains duplicates, and keeps the caller's order
/// (tesseract weighs the first language highest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrLanguages(Vec<Language>);

impl OcrLanguages {
    /// Build a selection; duplicates are dropped, an empty list is rejected.
    pub fn new(languages: impl IntoIterator<Item = Language>) -> Result<Self, ToolkitError> {
        let mut selected: Vec<Language> = Vec::new();
        for lang in languages {
            if !selected.contains(&lang) {
                selected.push(lang);
            }
        }
        if selected.is_empty() {
            return Err(ToolkitError::InvalidConfig(
                "select at least one OCR language".into(),
            ));
        }
        Ok(Self(selected))
    }

    pub fn single(language: Language) -> Self {
        Self(vec![language])
    }

    /// The first selected language.
    pub fn primary(&self) -> Language {
        self.0[0]
    }

    pub fn as_slice(&self) -> &[Language] {
        &self.0
    }

    /// Value for tesseract's `-l` flag, e.g. `eng+urd`.
    pub fn tesseract_arg(&self) -> String {
        self.0
            .iter()
            .map(|l| l.ocr_code())
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl Default for OcrLanguages {
    fn default() -> Self {
        Self::single(Language::English)
    }
}

impl fmt::Display for OcrLanguages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.0.iter().map(|l| l.label()).collect();
        f.write_str(&labels.join(", "))
    }
}
