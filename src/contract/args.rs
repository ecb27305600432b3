use crate::core::{LedgerError, Result};
use chrono::{DateTime, NaiveDate};
use std::str::FromStr;

/// String arguments of one invocation, with typed accessors.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    function: &'a str,
    values: &'a [String],
}

impl<'a> Args<'a> {
    pub fn new(function: &'a str, values: &'a [String]) -> Self {
        Self { function, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn expect(&self, count: usize) -> Result<()> {
        self.expect_range(count, count)
    }

    pub fn expect_range(&self, min: usize, max: usize) -> Result<()> {
        let len = self.values.len();
        if len < min || len > max {
            let expected = if min == max {
                min.to_string()
            } else {
                format!("{} to {}", min, max)
            };
            return Err(LedgerError::InvalidArgument(format!(
                "{} expects {} argument(s), got {}",
                self.function, expected, len
            )));
        }
        Ok(())
    }

    pub fn get(&self, index: usize, field: &str) -> Result<&'a str> {
        self.values.get(index).map(String::as_str).ok_or_else(|| {
            LedgerError::InvalidArgument(format!(
                "{} is missing argument {} ({})",
                self.function, index, field
            ))
        })
    }

    /// Parse an enum-valued argument
    pub fn parse<T>(&self, index: usize, field: &str) -> Result<T>
    where
        T: FromStr<Err = LedgerError>,
    {
        self.get(index, field)?.parse()
    }

    /// Non-negative integer amount
    pub fn amount(&self, index: usize, field: &str) -> Result<u64> {
        let raw = self.get(index, field)?;
        raw.trim().parse::<u64>().map_err(|_| {
            LedgerError::InvalidArgument(format!(
                "{} must be a non-negative integer, got '{}'",
                field, raw
            ))
        })
    }

    /// Epoch milliseconds, an RFC 3339 timestamp, or a `YYYY-MM-DD` date (UTC midnight)
    pub fn timestamp(&self, index: usize, field: &str) -> Result<i64> {
        let raw = self.get(index, field)?;
        parse_timestamp(raw).ok_or_else(|| {
            LedgerError::InvalidArgument(format!(
                "{} must be epoch milliseconds or an RFC 3339 date, got '{}'",
                field, raw
            ))
        })
    }
}

fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return Some(millis);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp_millis())
}
