//! Layoff events — one record per company announcement.
//!
//! Events are immutable once loaded. The loader is lenient about how numbers
//! are spelled (pandas exports integral counts as `150.0`) but strict about
//! what they mean: a count must be a non-negative whole number.

use std::fmt;

use chrono::NaiveDate;
use serde::{
  Deserialize, Deserializer, Serialize,
  de::{self, Unexpected, Visitor},
};

// ─── Event ───────────────────────────────────────────────────────────────────

/// A single recorded layoff at a company on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoffEvent {
  pub company:        String,
  pub date:           NaiveDate,
  /// `YYYY-MM` bucket. Derived from `date` by the loader when the source
  /// leaves it blank.
  #[serde(default)]
  pub month:          String,
  pub year:           i32,
  pub industry:       String,
  pub country:        String,
  #[serde(default)]
  pub location:       String,
  #[serde(deserialize_with = "count")]
  pub total_laid_off: u64,
  #[serde(default, deserialize_with = "optional_text")]
  pub percentage:     Option<String>,
  #[serde(default, deserialize_with = "optional_text")]
  pub stage:          Option<String>,
  #[serde(default, deserialize_with = "optional_text")]
  pub funds_raised:   Option<String>,
}

impl LayoffEvent {
  /// The `YYYY-MM` month bucket for `date`.
  pub fn month_of(date: NaiveDate) -> String { date.format("%Y-%m").to_string() }

  /// Fill in derived fields the source document may omit.
  pub(crate) fn normalise(&mut self) {
    if self.month.trim().is_empty() {
      self.month = Self::month_of(self.date);
    }
  }
}

// ─── Date range ──────────────────────────────────────────────────────────────

/// An inclusive span of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl DateRange {
  pub fn single(date: NaiveDate) -> Self { Self { start: date, end: date } }

  /// Widen the range so that it covers `date`.
  pub fn including(self, date: NaiveDate) -> Self {
    Self {
      start: self.start.min(date),
      end:   self.end.max(date),
    }
  }
}

impl fmt::Display for DateRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} – {}",
      self.start.format("%Y-%m-%d"),
      self.end.format("%Y-%m-%d")
    )
  }
}

// ─── Lenient field decoding ──────────────────────────────────────────────────

/// A layoff count as it appears in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Count(pub u64);

impl<'de> Deserialize<'de> for Count {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_any(CountVisitor).map(Count)
  }
}

struct CountVisitor;

impl Visitor<'_> for CountVisitor {
  type Value = u64;

  fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("a non-negative whole number")
  }

  fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> { Ok(v) }

  fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
    u64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
  }

  fn visit_f64<E: de::Error>(self, v: f64) -> Result<u64, E> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 {
      Ok(v as u64)
    } else {
      Err(E::invalid_value(Unexpected::Float(v), &self))
    }
  }
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
  Count::deserialize(deserializer).map(|c| c.0)
}

/// Absent, `null` and blank strings all decode to `None`. Numbers keep their
/// decimal text.
fn optional_text<'de, D: Deserializer<'de>>(
  deserializer: D,
) -> Result<Option<String>, D::Error> {
  use serde_json::Value;

  match Option::<Value>::deserialize(deserializer)? {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(Value::Number(n)) => Ok(Some(n.to_string())),
    Some(Value::Bool(b)) => Err(de::Error::invalid_type(
      Unexpected::Bool(b),
      &"a string or number",
    )),
    Some(_) => Err(de::Error::invalid_type(
      Unexpected::Other("a JSON array or object"),
      &"a string or number",
    )),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(json: &str) -> serde_json::Result<LayoffEvent> { serde_json::from_str(json) }

  const BASE: &str = r#""company": "Acme", "date": "2022-01-14", "year": 2022,
    "industry": "Hardware", "country": "USA", "location": "SF Bay Area""#;

  #[test]
  fn decodes_a_full_record() {
    let e = parse(&format!(
      r#"{{ {BASE}, "month": "2022-01", "total_laid_off": 150,
           "percentage": "0.1", "stage": "Series A", "funds_raised": "12" }}"#
    ))
    .unwrap();
    assert_eq!(e.company, "Acme");
    assert_eq!(e.date, NaiveDate::from_ymd_opt(2022, 1, 14).unwrap());
    assert_eq!(e.total_laid_off, 150);
    assert_eq!(e.stage.as_deref(), Some("Series A"));
  }

  #[test]
  fn integral_float_counts_are_accepted() {
    let e = parse(&format!(r#"{{ {BASE}, "total_laid_off": 150.0 }}"#)).unwrap();
    assert_eq!(e.total_laid_off, 150);
  }

  #[test]
  fn negative_or_fractional_counts_are_rejected() {
    assert!(parse(&format!(r#"{{ {BASE}, "total_laid_off": -3 }}"#)).is_err());
    assert!(parse(&format!(r#"{{ {BASE}, "total_laid_off": 2.5 }}"#)).is_err());
    assert!(parse(&format!(r#"{{ {BASE}, "total_laid_off": "12" }}"#)).is_err());
    assert!(parse(&format!(r#"{{ {BASE}, "total_laid_off": null }}"#)).is_err());
  }

  #[test]
  fn floats_beyond_the_u64_range_are_rejected() {
    assert!(parse(&format!(r#"{{ {BASE}, "total_laid_off": 18446744073709551616.0 }}"#)).is_err());
    assert!(parse(&format!(r#"{{ {BASE}, "total_laid_off": 1e30 }}"#)).is_err());
  }

  #[test]
  fn blank_optional_fields_mean_no_value() {
    let e = parse(&format!(
      r#"{{ {BASE}, "total_laid_off": 1, "percentage": "", "stage": null }}"#
    ))
    .unwrap();
    assert_eq!(e.percentage, None);
    assert_eq!(e.stage, None);
    assert_eq!(e.funds_raised, None);
  }

  #[test]
  fn numeric_optional_fields_keep_their_text() {
    let e = parse(&format!(
      r#"{{ {BASE}, "total_laid_off": 1, "funds_raised": 250.5 }}"#
    ))
    .unwrap();
    assert_eq!(e.funds_raised.as_deref(), Some("250.5"));
  }

  #[test]
  fn missing_month_is_derived_from_date() {
    let mut e = parse(&format!(r#"{{ {BASE}, "total_laid_off": 1 }}"#)).unwrap();
    assert!(e.month.is_empty());
    e.normalise();
    assert_eq!(e.month, "2022-01");
  }

  #[test]
  fn date_range_widens() {
    let d = |day| NaiveDate::from_ymd_opt(2023, 3, day).unwrap();
    let range = DateRange::single(d(10)).including(d(2)).including(d(20)).including(d(5));
    assert_eq!(range.start, d(2));
    assert_eq!(range.end, d(20));
  }
}
