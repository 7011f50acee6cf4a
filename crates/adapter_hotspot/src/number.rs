//! Locale-tolerant numeric parsing for report values.

/// Parses a raw report value into a finite `f64`.
///
/// HotSpot output formats numbers according to the host locale: the decimal
/// separator may be `,` or `.`, scientific notation may use `E` or `e`, and
/// values are occasionally wrapped in stray markers (`<`, `>`). The value is
/// sanitized before parsing:
///
/// 1. surrounding whitespace is trimmed;
/// 2. `,` is normalized to `.`;
/// 3. every character outside `[0-9 . + - e E]` is dropped.
///
/// Returns `None` when the sanitized text is not a finite number.
///
/// ```
/// use adapter_hotspot::number::parse_number;
///
/// assert_eq!(parse_number("1,50E-02"), Some(1.5e-2));
/// assert_eq!(parse_number(" 4.885 "), Some(4.885));
/// assert_eq!(parse_number("<0.25>"), Some(0.25));
/// assert_eq!(parse_number("n/a"), None);
/// ```
pub fn parse_number(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    let sanitized: String = normalized
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
        .collect();

    let value: f64 = sanitized.parse().ok()?;
    value.is_finite().then_some(value)
}
