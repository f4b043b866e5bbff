//! Pure field normalizers for the source-specific string encodings.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Parse a feed price string by stripping everything that is not a digit and
/// reading the remaining run as integer cents.
///
/// `"1.234,56 €"` → `Some(1234.56)`. An input with no digits at all is
/// `None`; a legitimate zero (`"0,00 €"`) is preserved as `Some(0.0)`.
pub fn parse_price_string(raw: &str) -> Option<f64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let cents: u64 = digits.parse().ok()?;
    Some(cents as f64 / 100.0)
}

/// Parse a feed integer string by stripping non-digits.
pub fn parse_integer_string(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parse a `DD/MM/YYYY HH:mm` timestamp and shift it by the feed's fixed
/// offset to undo its timezone artifact. Empty or unparseable input is
/// `None`.
pub fn repair_date(raw: &str, offset_hours: i64) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(trimmed, "%d/%m/%Y %H:%M").ok()?;
    Some((naive + Duration::hours(offset_hours)).and_utc())
}

/// Split a delimited code list, keeping only the digits of each token and
/// dropping tokens that carry none.
pub fn split_code_list(raw: &str, delimiter: char) -> Vec<String> {
    raw.split(delimiter)
        .map(|token| token.chars().filter(|c| c.is_ascii_digit()).collect::<String>())
        .filter(|code| !code.is_empty())
        .collect()
}

/// Lowercase, fold diacritics, and collapse non-alphanumeric runs into a
/// single dash. Used for identity slugs and vocabulary table keys.
pub fn slugify(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(fold_diacritic)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

// Covers the Castilian, Catalan and Portuguese letters seen in the feeds.
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// `"Sí"`/`"No"` style answers to a boolean; anything else is `None` when
/// empty, `false` otherwise.
pub fn parse_yes_no(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(slugify(trimmed) == "si")
}
