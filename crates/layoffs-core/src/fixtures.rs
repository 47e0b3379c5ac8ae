//! Shared builders for unit tests.

use chrono::{Datelike, NaiveDate};

use crate::event::LayoffEvent;

/// A US, Series A event on `date` (`YYYY-MM-DD`).
pub(crate) fn event(company: &str, industry: &str, total: u64, date: &str) -> LayoffEvent {
  let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("fixture date");
  LayoffEvent {
    company:        company.into(),
    date,
    month:          LayoffEvent::month_of(date),
    year:           date.year(),
    industry:       industry.into(),
    country:        "USA".into(),
    location:       "SF Bay Area".into(),
    total_laid_off: total,
    percentage:     None,
    stage:          Some("Series A".into()),
    funds_raised:   None,
  }
}
