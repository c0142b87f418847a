//! Conversion helpers shared by the database models.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::constants::DATE_FORMAT;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parses a stored decimal string, falling back to zero on malformed data.
pub fn parse_decimal(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e) => {
            log::error!(
                "Failed to parse {} '{}' as Decimal: {}. Falling back to ZERO.",
                field_name,
                value_str,
                e
            );
            Decimal::ZERO
        }
    }
}

pub fn parse_date(value_str: &str, field_name: &str) -> NaiveDate {
    match NaiveDate::parse_from_str(value_str, DATE_FORMAT) {
        Ok(d) => d,
        Err(e) => {
            log::error!(
                "Failed to parse {} '{}' as date: {}. Falling back to epoch.",
                field_name,
                value_str,
                e
            );
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
        }
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_datetime(value_str: &str, field_name: &str) -> NaiveDateTime {
    match NaiveDateTime::parse_from_str(value_str, DATETIME_FORMAT) {
        Ok(ts) => ts,
        Err(e) => {
            log::error!(
                "Failed to parse {} '{}' as timestamp: {}. Falling back to epoch.",
                field_name,
                value_str,
                e
            );
            NaiveDateTime::default()
        }
    }
}

/// Current UTC timestamp in the persisted text representation.
pub fn now_string() -> String {
    Utc::now().naive_utc().format(DATETIME_FORMAT).to_string()
}
