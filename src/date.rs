use serde::Deserialize;
use time::{macros::format_description, Date, OffsetDateTime};

use crate::error::{AppError, AppResult};

// `YYYY-MM-DD` on the wire, both for bodies and query strings.
time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

pub fn parse_date(raw: &str) -> AppResult<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::validation("invalid date, expected YYYY-MM-DD"))
}

/// Parses an optional `?date=` value, falling back to the current UTC day.
pub fn date_or_today(raw: Option<&str>) -> AppResult<Date> {
    match raw {
        Some(s) if !s.trim().is_empty() => parse_date(s),
        _ => Ok(OffsetDateTime::now_utc().date()),
    }
}

/// `?date=YYYY-MM-DD` shared by the day-scoped listings.
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

impl DateQuery {
    pub fn resolve(&self) -> AppResult<Date> {
        date_or_today(self.date.as_deref())
    }
}
