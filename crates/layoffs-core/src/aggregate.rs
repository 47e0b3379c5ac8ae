//! Aggregations over filtered events — one per chart.
//!
//! Every function takes any iterator of event references so callers can pass
//! either a whole slice or the output of
//! [`filter_events`](crate::filter::filter_events). Results depend only on
//! grouping and summation, never on input order, apart from the documented
//! stable tie-breaks.
//!
//! Sums saturate at `u64::MAX` instead of overflowing.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::event::{DateRange, LayoffEvent};

/// Maximum number of rows in the company ranking.
pub const TOP_COMPANIES: usize = 15;

// ─── Monthly matrix ──────────────────────────────────────────────────────────

/// One month's totals, keyed by industry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
  pub month:  String,
  #[serde(flatten)]
  pub totals: BTreeMap<String, u64>,
}

impl MonthTotals {
  pub fn get(&self, industry: &str) -> u64 { self.totals.get(industry).copied().unwrap_or(0) }

  pub fn sum(&self) -> u64 { self.totals.values().fold(0, |acc, n| acc.saturating_add(*n)) }
}

/// Month × industry totals for the stacked area chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyMatrix {
  /// Column (stacking) order. Every row carries exactly these keys.
  pub industries: Vec<String>,
  /// Ascending by month.
  pub rows:       Vec<MonthTotals>,
}

impl MonthlyMatrix {
  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  /// Sum over every cell.
  pub fn total(&self) -> u64 {
    self
      .rows
      .iter()
      .map(MonthTotals::sum)
      .fold(0, u64::saturating_add)
  }
}

/// Group by month then industry. Only `active` industries become columns,
/// zero-filled where a month has no events for them; every month present in
/// `events` becomes a row.
pub fn aggregate_monthly<'a, I>(events: I, active: &[String]) -> MonthlyMatrix
where
  I: IntoIterator<Item = &'a LayoffEvent>,
{
  let mut by_month: BTreeMap<&str, HashMap<&str, u64>> = BTreeMap::new();
  for event in events {
    let cell = by_month
      .entry(event.month.as_str())
      .or_default()
      .entry(event.industry.as_str())
      .or_default();
    *cell = cell.saturating_add(event.total_laid_off);
  }

  // `YYYY-MM` sorts lexicographically in date order, so the BTreeMap is
  // already ascending.
  let rows = by_month
    .into_iter()
    .map(|(month, sums)| MonthTotals {
      month:  month.to_owned(),
      totals: active
        .iter()
        .map(|industry| {
          let total = sums.get(industry.as_str()).copied().unwrap_or(0);
          (industry.clone(), total)
        })
        .collect(),
    })
    .collect();

  MonthlyMatrix {
    industries: active.to_vec(),
    rows,
  }
}

// ─── Company ranking ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyTotal {
  pub company: String,
  pub total:   u64,
}

/// Totals per company, largest first, at most [`TOP_COMPANIES`] rows. Ties
/// keep the order in which companies were first encountered.
pub fn aggregate_by_company<'a, I>(events: I) -> Vec<CompanyTotal>
where
  I: IntoIterator<Item = &'a LayoffEvent>,
{
  let mut ranking: Vec<CompanyTotal> = Vec::new();
  let mut index: HashMap<&str, usize> = HashMap::new();

  for event in events {
    match index.get(event.company.as_str()) {
      Some(&i) => ranking[i].total = ranking[i].total.saturating_add(event.total_laid_off),
      None => {
        index.insert(event.company.as_str(), ranking.len());
        ranking.push(CompanyTotal {
          company: event.company.clone(),
          total:   event.total_laid_off,
        });
      }
    }
  }

  // `sort_by` is stable.
  ranking.sort_by(|a, b| b.total.cmp(&a.total));
  ranking.truncate(TOP_COMPANIES);
  ranking
}

// ─── Industry totals ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryTotal {
  pub industry: String,
  pub total:    u64,
}

/// Totals for every industry present in `events`, largest first, ties by
/// name.
pub fn aggregate_by_industry<'a, I>(events: I) -> Vec<IndustryTotal>
where
  I: IntoIterator<Item = &'a LayoffEvent>,
{
  let mut sums: BTreeMap<&str, u64> = BTreeMap::new();
  for event in events {
    let sum = sums.entry(event.industry.as_str()).or_default();
    *sum = sum.saturating_add(event.total_laid_off);
  }

  let mut totals: Vec<_> = sums
    .into_iter()
    .map(|(industry, total)| IndustryTotal {
      industry: industry.to_owned(),
      total,
    })
    .collect();
  totals.sort_by(|a, b| b.total.cmp(&a.total));
  totals
}

// ─── Summary statistics ──────────────────────────────────────────────────────

/// Headline counters. [`SummaryStats::NoData`] stands in when nothing
/// matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryStats {
  NoData,
  Data {
    total_laid_off: u64,
    companies:      usize,
    events:         usize,
    date_range:     DateRange,
  },
}

impl SummaryStats {
  pub fn is_no_data(&self) -> bool { matches!(self, Self::NoData) }

  pub fn total_laid_off(&self) -> u64 {
    match self {
      Self::NoData => 0,
      Self::Data { total_laid_off, .. } => *total_laid_off,
    }
  }

  pub fn companies(&self) -> usize {
    match self {
      Self::NoData => 0,
      Self::Data { companies, .. } => *companies,
    }
  }

  pub fn date_range(&self) -> Option<DateRange> {
    match self {
      Self::NoData => None,
      Self::Data { date_range, .. } => Some(*date_range),
    }
  }
}

pub fn compute_stats<'a, I>(events: I) -> SummaryStats
where
  I: IntoIterator<Item = &'a LayoffEvent>,
{
  let mut total_laid_off: u64 = 0;
  let mut companies = HashSet::new();
  let mut count = 0;
  let mut range: Option<DateRange> = None;

  for event in events {
    total_laid_off = total_laid_off.saturating_add(event.total_laid_off);
    companies.insert(event.company.as_str());
    count += 1;
    range = Some(match range {
      None => DateRange::single(event.date),
      Some(r) => r.including(event.date),
    });
  }

  match range {
    None => SummaryStats::NoData,
    Some(date_range) => SummaryStats::Data {
      total_laid_off,
      companies: companies.len(),
      events: count,
      date_range,
    },
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::{
    filter::{FilterState, filter_events},
    fixtures::event,
  };

  fn industries(names: &[&str]) -> Vec<String> { names.iter().map(|s| s.to_string()).collect() }

  fn scenario() -> Vec<LayoffEvent> {
    let mut acme = event("Acme", "Hardware", 150, "2022-01-10");
    acme.stage = Some("Series A".into());
    let mut zeta = event("Zeta", "Finance", 50, "2022-02-03");
    zeta.country = "UK".into();
    zeta.stage = Some("Seed".into());
    vec![acme, zeta]
  }

  #[test]
  fn hardware_only_scenario() {
    let events = scenario();
    let state = FilterState::with_industries(["Hardware"]);
    let filtered = filter_events(&events, &state);

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].company, "Acme");

    assert_eq!(
      aggregate_by_industry(filtered.iter().copied()),
      vec![IndustryTotal {
        industry: "Hardware".into(),
        total:    150,
      }]
    );

    let jan10 = NaiveDate::from_ymd_opt(2022, 1, 10).unwrap();
    assert_eq!(
      compute_stats(filtered.iter().copied()),
      SummaryStats::Data {
        total_laid_off: 150,
        companies:      1,
        events:         1,
        date_range:     DateRange::single(jan10),
      }
    );
  }

  #[test]
  fn monthly_rows_are_sorted_and_zero_filled() {
    let events = vec![
      event("A", "Finance", 10, "2022-03-01"),
      event("B", "Hardware", 20, "2021-12-09"),
      event("C", "Hardware", 5, "2022-03-15"),
      event("D", "Retail", 7, "2022-01-20"),
    ];
    let active = industries(&["Hardware", "Finance"]);
    let matrix = aggregate_monthly(&events, &active);

    assert_eq!(matrix.industries, active);
    let months: Vec<_> = matrix.rows.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(months, ["2021-12", "2022-01", "2022-03"]);

    for row in &matrix.rows {
      let keys: Vec<_> = row.totals.keys().map(String::as_str).collect();
      assert_eq!(keys, ["Finance", "Hardware"]);
    }
    // Retail's month stays as a row but contributes nothing.
    assert_eq!(matrix.rows[1].sum(), 0);
    assert_eq!(matrix.rows[2].get("Hardware"), 5);
    assert_eq!(matrix.rows[2].get("Finance"), 10);
    assert_eq!(matrix.rows[0].get("Retail"), 0);
  }

  #[test]
  fn monthly_of_nothing_is_empty() {
    let none: Vec<LayoffEvent> = Vec::new();
    let matrix = aggregate_monthly(&none, &industries(&["Hardware"]));
    assert!(matrix.is_empty());
    assert_eq!(matrix.total(), 0);
  }

  #[test]
  fn company_ranking_sums_sorts_and_truncates() {
    let mut events = Vec::new();
    for i in 0..20u64 {
      events.push(event(&format!("Co{i:02}"), "Hardware", 10 + i, "2022-01-01"));
    }
    events.push(event("Co00", "Hardware", 100, "2022-02-01"));

    let ranking = aggregate_by_company(&events);
    assert_eq!(ranking.len(), TOP_COMPANIES);
    assert_eq!(ranking[0], CompanyTotal {
      company: "Co00".into(),
      total:   110,
    });
    assert!(ranking.windows(2).all(|w| w[0].total >= w[1].total));
    assert_eq!(ranking[1].company, "Co19");
  }

  #[test]
  fn company_ties_keep_encounter_order() {
    let events = vec![
      event("Zeta", "Finance", 40, "2022-01-01"),
      event("Acme", "Hardware", 40, "2022-01-02"),
      event("Midco", "Retail", 90, "2022-01-03"),
    ];
    let names: Vec<_> = aggregate_by_company(&events)
      .into_iter()
      .map(|c| c.company)
      .collect();
    assert_eq!(names, ["Midco", "Zeta", "Acme"]);
  }

  #[test]
  fn industry_totals_conserve_the_sum() {
    let events = vec![
      event("A", "Finance", 10, "2022-03-01"),
      event("B", "Hardware", 20, "2021-12-09"),
      event("C", "Hardware", 5, "2022-03-15"),
      event("D", "Retail", 7, "2022-01-20"),
      event("E", "Retail", 18, "2022-01-21"),
    ];
    let totals = aggregate_by_industry(&events);
    let grouped: u64 = totals.iter().map(|t| t.total).sum();
    let raw: u64 = events.iter().map(|e| e.total_laid_off).sum();
    assert_eq!(grouped, raw);

    let order: Vec<_> = totals.iter().map(|t| t.industry.as_str()).collect();
    assert_eq!(order, ["Hardware", "Retail", "Finance"]);
  }

  #[test]
  fn stats_of_nothing_is_the_no_data_sentinel() {
    let none: Vec<LayoffEvent> = Vec::new();
    let stats = compute_stats(&none);
    assert!(stats.is_no_data());
    assert_eq!(stats.total_laid_off(), 0);
    assert_eq!(stats.date_range(), None);
    assert!(aggregate_by_company(&none).is_empty());
    assert!(aggregate_by_industry(&none).is_empty());
  }

  #[test]
  fn stats_count_distinct_companies_and_span_dates() {
    let events = vec![
      event("Acme", "Hardware", 10, "2022-05-01"),
      event("Acme", "Hardware", 30, "2021-02-11"),
      event("Zeta", "Finance", 5, "2023-07-30"),
    ];
    let stats = compute_stats(&events);
    assert_eq!(stats.total_laid_off(), 45);
    assert_eq!(stats.companies(), 2);
    let range = stats.date_range().unwrap();
    assert_eq!(range.start, NaiveDate::from_ymd_opt(2021, 2, 11).unwrap());
    assert_eq!(range.end, NaiveDate::from_ymd_opt(2023, 7, 30).unwrap());
  }

  #[test]
  fn huge_counts_saturate_instead_of_overflowing() {
    let events = vec![
      event("Acme", "Hardware", 10_000_000_000_000_000_000, "2022-01-10"),
      event("Acme", "Hardware", 10_000_000_000_000_000_000, "2022-01-20"),
    ];
    let active = industries(&["Hardware"]);

    assert_eq!(compute_stats(&events).total_laid_off(), u64::MAX);
    assert_eq!(aggregate_by_company(&events)[0].total, u64::MAX);
    assert_eq!(aggregate_by_industry(&events)[0].total, u64::MAX);
    let matrix = aggregate_monthly(&events, &active);
    assert_eq!(matrix.rows[0].get("Hardware"), u64::MAX);
    assert_eq!(matrix.total(), u64::MAX);
  }

  #[test]
  fn no_data_serialises_with_a_status_tag() {
    let json = serde_json::to_value(SummaryStats::NoData).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "no_data" }));
  }
}
