use rust_decimal::Decimal;
use std::str::FromStr;

use super::commands_model::CommandError;

/// Parses a spoken or typed monetary amount, tolerating both comma and dot
/// as decimal or thousands separators.
///
/// With both separators present the rightmost one is the decimal point. A
/// single separator occurring once with at most two trailing digits is the
/// decimal point; otherwise every occurrence is a thousands separator.
pub fn parse_spoken_amount(raw: &str) -> std::result::Result<Decimal, CommandError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(CommandError::InvalidAmount(format!(
            "'{}' is not a number",
            raw.trim()
        )));
    }

    let has_dot = cleaned.contains('.');
    let has_comma = cleaned.contains(',');

    let normalized = match (has_dot, has_comma) {
        (true, true) => {
            if cleaned.rfind('.') > cleaned.rfind(',') {
                cleaned.replace(',', "")
            } else {
                cleaned.replace('.', "").replace(',', ".")
            }
        }
        (true, false) => normalize_single(&cleaned, '.'),
        (false, true) => normalize_single(&cleaned, ','),
        (false, false) => cleaned,
    };

    Decimal::from_str(&normalized).map_err(|_| {
        CommandError::InvalidAmount(format!("'{}' is not a number", raw.trim()))
    })
}

fn normalize_single(value: &str, sep: char) -> String {
    let occurrences = value.matches(sep).count();
    let trailing = value.rsplit(sep).next().map(str::len).unwrap_or(0);
    if occurrences == 1 && trailing <= 2 {
        value.replace(sep, ".")
    } else {
        value.split(sep).collect()
    }
}
