use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use std::collections::HashMap;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

lazy_static! {
    static ref ORDINAL_WORDS: HashMap<&'static str, u32> = {
        let mut m = HashMap::new();
        let words = [
            "first",
            "second",
            "third",
            "fourth",
            "fifth",
            "sixth",
            "seventh",
            "eighth",
            "ninth",
            "tenth",
            "eleventh",
            "twelfth",
            "thirteenth",
            "fourteenth",
            "fifteenth",
            "sixteenth",
            "seventeenth",
            "eighteenth",
            "nineteenth",
            "twentieth",
            "twenty-first",
            "twenty-second",
            "twenty-third",
            "twenty-fourth",
            "twenty-fifth",
            "twenty-sixth",
            "twenty-seventh",
            "twenty-eighth",
            "twenty-ninth",
            "thirtieth",
            "thirty-first",
        ];
        for (i, word) in words.iter().enumerate() {
            m.insert(*word, i as u32 + 1);
        }
        m
    };
}

fn month_number(word: &str) -> Option<u32> {
    let w = word
        .trim_matches(|c: char| !c.is_ascii_alphabetic())
        .to_ascii_lowercase();
    MONTHS.iter().position(|m| *m == w).map(|i| i as u32 + 1)
}

fn day_number(word: &str) -> Option<u32> {
    let w = word.trim_matches(|c: char| c == ',' || c == '.').to_ascii_lowercase();
    if let Some(day) = ORDINAL_WORDS.get(w.as_str()) {
        return Some(*day);
    }
    let digits = w
        .strip_suffix("st")
        .or_else(|| w.strip_suffix("nd"))
        .or_else(|| w.strip_suffix("rd"))
        .or_else(|| w.strip_suffix("th"))
        .unwrap_or(&w);
    digits.parse::<u32>().ok().filter(|d| (1..=31).contains(d))
}

/// Removes a trailing spoken date phrase from the text, returning the
/// remainder and the date it named (in the current year). Recognized forms:
/// "<Month> <day>", "<day> <Month>", "<day> of <Month>", with numeric or
/// ordinal-word days. Run before amount extraction so a day-of-month digit
/// cannot be misread as the amount.
pub fn strip_trailing_date(text: &str, today: NaiveDate) -> (String, Option<NaiveDate>) {
    let words: Vec<&str> = text.split_whitespace().collect();
    let n = words.len();

    let mut matched: Option<(usize, u32, u32)> = None;

    if n >= 3 {
        if let (Some(day), Some(month)) = (day_number(words[n - 3]), month_number(words[n - 1])) {
            if words[n - 2].eq_ignore_ascii_case("of") {
                matched = Some((3, month, day));
            }
        }
    }
    if matched.is_none() && n >= 2 {
        if let (Some(month), Some(day)) = (month_number(words[n - 2]), day_number(words[n - 1])) {
            matched = Some((2, month, day));
        }
    }
    if matched.is_none() && n >= 2 {
        if let (Some(day), Some(month)) = (day_number(words[n - 2]), month_number(words[n - 1])) {
            matched = Some((2, month, day));
        }
    }

    if let Some((consumed, month, day)) = matched {
        if let Some(date) = NaiveDate::from_ymd_opt(today.year(), month, day) {
            return (words[..n - consumed].join(" "), Some(date));
        }
    }

    (text.trim().to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn month_day_form() {
        let (rest, date) = strip_trailing_date("expense from Wallet 50 category food June 5", today());
        assert_eq!(rest, "expense from Wallet 50 category food");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 5));
    }

    #[test]
    fn day_month_form_with_suffix() {
        let (rest, date) = strip_trailing_date("lunch 21st June", today());
        assert_eq!(rest, "lunch");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 21));
    }

    #[test]
    fn day_of_month_form() {
        let (rest, date) = strip_trailing_date("lunch 5 of June", today());
        assert_eq!(rest, "lunch");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 5));
    }

    #[test]
    fn ordinal_word_day() {
        let (rest, date) = strip_trailing_date("lunch twenty-first of June", today());
        assert_eq!(rest, "lunch");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 21));
    }

    #[test]
    fn no_date_leaves_text_intact() {
        let (rest, date) = strip_trailing_date("transfer from Wallet to Bank 100", today());
        assert_eq!(rest, "transfer from Wallet to Bank 100");
        assert_eq!(date, None);
    }

    #[test]
    fn invalid_calendar_date_is_not_stripped() {
        let (rest, date) = strip_trailing_date("lunch June 31", today());
        assert_eq!(rest, "lunch June 31");
        assert_eq!(date, None);
    }

    #[test]
    fn amount_is_not_mistaken_for_a_day() {
        let (rest, date) = strip_trailing_date("expense from Wallet 100 category food", today());
        assert_eq!(rest, "expense from Wallet 100 category food");
        assert_eq!(date, None);
    }
}
