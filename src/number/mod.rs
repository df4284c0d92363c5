//! Number parsing and number-to-words conversion.
//!
//! Both languages cover the full `i64` range, so every value that parses
//! can be spoken. Digits typed on an Urdu keyboard (`۱۲۳`) are accepted as
//! well as ASCII digits.

mod english;
mod urdu;

use crate::error::ToolkitError;
use crate::language::Language;
use crate::output::SpokenNumber;

/// Thousands separators removed before parsing: ASCII comma and the Arabic
/// thousands separator.
const SEPARATORS: [char; 2] = [',', '\u{066C}'];

/// Parse a user-typed integer.
///
/// Surrounding whitespace and thousands separators are ignored and a
/// leading `+` or `-` is allowed. Anything else, including a decimal point,
/// is [`ToolkitError::InvalidNumber`]. A well-formed integer that does not
/// fit in `i64` is [`ToolkitError::NumberOutOfRange`].
pub fn parse_number(input: &str) -> Result<i64, ToolkitError> {
    let invalid = || ToolkitError::InvalidNumber {
        input: input.to_string(),
    };
    let out_of_range = || ToolkitError::NumberOutOfRange {
        input: input.to_string(),
        min: i64::MIN,
        max: i64::MAX,
    };

    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !SEPARATORS.contains(c))
        .collect();

    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    if digits.is_empty() {
        return Err(invalid());
    }

    let mut magnitude: i128 = 0;
    for c in digits.chars() {
        let d = digit_value(c).ok_or_else(invalid)?;
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|m| m.checked_add(i128::from(d)))
            .ok_or_else(out_of_range)?;
    }

    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| out_of_range())
}

/// ASCII, Arabic-Indic (U+0660) or Extended Arabic-Indic (U+06F0) digit.
fn digit_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        '\u{0660}'..='\u{0669}' => Some(c as u32 - 0x0660),
        '\u{06F0}'..='\u{06F9}' => Some(c as u32 - 0x06F0),
        _ => None,
    }
}

/// Spell out `n` in `language`.
pub fn to_words(n: i64, language: Language) -> String {
    match language {
        Language::English => english::to_words(n),
        Language::Urdu => urdu::to_words(n),
    }
}

/// Parse `input` and spell it out in `language`.
pub fn verbalize(input: &str, language: Language) -> Result<SpokenNumber, ToolkitError> {
    let value = parse_number(input)?;
    Ok(SpokenNumber {
        value,
        words: to_words(value, language),
        language,
    })
}
