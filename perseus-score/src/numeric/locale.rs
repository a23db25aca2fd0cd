//! Locale-specific number formatting.

/// Languages whose convention writes the decimal separator as a comma.
const DECIMAL_COMMA_LANGUAGES: &[&str] = &[
    "af", "az", "be", "bg", "bs", "ca", "cs", "da", "de", "el", "es", "et", "eu", "fi", "fo",
    "fr", "gl", "hr", "hu", "hy", "id", "is", "it", "ka", "kk", "ky", "lt", "lv", "mk", "mn",
    "nb", "nl", "nn", "no", "pl", "pt", "ro", "ru", "sk", "sl", "sq", "sr", "sv", "tr", "uk",
    "uz", "vi",
];

/// Regional variants that use a period even though their language does not.
const DECIMAL_POINT_REGIONS: &[&str] = &["es-mx", "es-us", "es-419", "de-ch", "it-ch"];

/// Decimal separator for a BCP-47-like locale tag such as `en`, `pt-BR` or `de_DE`.
///
/// Unknown or empty locales use `.`.
pub fn decimal_separator(locale: &str) -> char {
    let normalized = locale.trim().replace('_', "-").to_ascii_lowercase();
    if DECIMAL_POINT_REGIONS.contains(&normalized.as_str()) {
        return '.';
    }

    let language = normalized.split('-').next().unwrap_or_default();
    if DECIMAL_COMMA_LANGUAGES.contains(&language) {
        ','
    } else {
        '.'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_separator() {
        assert_eq!(decimal_separator("en"), '.');
        assert_eq!(decimal_separator(""), '.');
        assert_eq!(decimal_separator("fr"), ',');
        assert_eq!(decimal_separator("pt-BR"), ',');
        assert_eq!(decimal_separator("de_DE"), ',');
        assert_eq!(decimal_separator("es-MX"), '.');
        assert_eq!(decimal_separator("ja"), '.');
    }
}
