//! The loaded dataset and the catalog of values it contains.
//!
//! A [`Dataset`] is built once from the processed JSON document and never
//! mutated. Building it also derives a [`Catalog`]: the sorted company list
//! used by search, and the known domains used to validate filter values.

use std::{
  collections::{BTreeMap, BTreeSet},
  path::Path,
};

use serde::Deserialize;
use tracing::debug;

use crate::{
  Result,
  aggregate::{MonthTotals, MonthlyMatrix},
  event::{Count, DateRange, LayoffEvent},
};

// ─── Source document ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DatasetDocument {
  events:         Vec<LayoffEvent>,
  top_industries: Vec<String>,
  #[serde(default)]
  monthly:        Vec<MonthlyRecord>,
  stats:          DocumentStats,
}

#[derive(Deserialize)]
struct MonthlyRecord {
  month:  String,
  #[serde(flatten)]
  totals: BTreeMap<String, Count>,
}

#[derive(Deserialize)]
struct DocumentStats {
  date_range: DateRange,
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Distinct values present in the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
  /// Distinct company names, case-insensitively alphabetical.
  pub companies:  Vec<String>,
  /// `top_industries` in their given order, then any other industry seen in
  /// the events, alphabetically.
  pub industries: Vec<String>,
  pub countries:  Vec<String>,
  pub stages:     Vec<String>,
  pub years:      Vec<i32>,
}

impl Catalog {
  fn build(events: &[LayoffEvent], top_industries: &[String]) -> Self {
    let mut companies = BTreeSet::new();
    let mut other_industries = BTreeSet::new();
    let mut countries = BTreeSet::new();
    let mut stages = BTreeSet::new();
    let mut years = BTreeSet::new();

    for event in events {
      companies.insert(event.company.as_str());
      if !top_industries.contains(&event.industry) {
        other_industries.insert(event.industry.clone());
      }
      countries.insert(event.country.clone());
      if let Some(stage) = &event.stage {
        stages.insert(stage.clone());
      }
      years.insert(event.year);
    }

    let mut companies: Vec<String> = companies.into_iter().map(str::to_owned).collect();
    companies.sort_by_cached_key(|name| name.to_lowercase());

    let mut industries: Vec<String> = Vec::with_capacity(top_industries.len());
    for industry in top_industries {
      if !industries.contains(industry) {
        industries.push(industry.clone());
      }
    }
    industries.extend(other_industries);

    Self {
      companies,
      industries,
      countries: countries.into_iter().collect(),
      stages: stages.into_iter().collect(),
      years: years.into_iter().collect(),
    }
  }

  /// The catalog spelling of `industry`, if known.
  pub fn industry(&self, industry: &str) -> Option<&str> { lookup(&self.industries, industry) }

  pub fn country(&self, country: &str) -> Option<&str> { lookup(&self.countries, country) }

  pub fn stage(&self, stage: &str) -> Option<&str> { lookup(&self.stages, stage) }

  pub fn has_year(&self, year: i32) -> bool { self.years.contains(&year) }
}

fn lookup<'a>(values: &'a [String], wanted: &str) -> Option<&'a str> {
  values.iter().map(String::as_str).find(|v| *v == wanted)
}

// ─── Dataset ─────────────────────────────────────────────────────────────────

/// The immutable, pre-loaded event collection.
#[derive(Debug, Clone)]
pub struct Dataset {
  events:         Vec<LayoffEvent>,
  top_industries: Vec<String>,
  monthly:        Vec<MonthTotals>,
  date_range:     Option<DateRange>,
  catalog:        Catalog,
}

impl Dataset {
  /// Build a dataset from already-decoded events. The date range is computed
  /// from the events and there is no precomputed monthly baseline.
  pub fn from_events(events: Vec<LayoffEvent>, top_industries: Vec<String>) -> Self {
    let date_range = events.iter().fold(None, |range: Option<DateRange>, e| {
      Some(range.map_or(DateRange::single(e.date), |r| r.including(e.date)))
    });
    Self::assemble(events, top_industries, Vec::new(), date_range)
  }

  /// Decode the processed JSON document.
  pub fn from_json(json: &str) -> Result<Self> {
    Self::from_document(serde_json::from_str(json)?)
  }

  pub fn from_slice(bytes: &[u8]) -> Result<Self> {
    Self::from_document(serde_json::from_slice(bytes)?)
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let bytes = std::fs::read(path.as_ref())?;
    Self::from_slice(&bytes)
  }

  fn from_document(doc: DatasetDocument) -> Result<Self> {
    let monthly = doc
      .monthly
      .into_iter()
      .map(|record| MonthTotals {
        month:  record.month,
        totals: record
          .totals
          .into_iter()
          .map(|(industry, count)| (industry, count.0))
          .collect(),
      })
      .collect();
    Ok(Self::assemble(
      doc.events,
      doc.top_industries,
      monthly,
      Some(doc.stats.date_range),
    ))
  }

  fn assemble(
    mut events: Vec<LayoffEvent>,
    top_industries: Vec<String>,
    mut monthly: Vec<MonthTotals>,
    date_range: Option<DateRange>,
  ) -> Self {
    events.iter_mut().for_each(LayoffEvent::normalise);
    monthly.sort_by(|a, b| a.month.cmp(&b.month));
    let catalog = Catalog::build(&events, &top_industries);
    debug!(
      events = events.len(),
      companies = catalog.companies.len(),
      industries = catalog.industries.len(),
      "dataset assembled"
    );
    Self {
      events,
      top_industries,
      monthly,
      date_range,
      catalog,
    }
  }

  pub fn events(&self) -> &[LayoffEvent] { &self.events }

  pub fn top_industries(&self) -> &[String] { &self.top_industries }

  /// The precomputed month → industry totals shipped with the document.
  pub fn monthly(&self) -> &[MonthTotals] { &self.monthly }

  /// The date span reported by the document (or computed from the events).
  pub fn date_range(&self) -> Option<DateRange> { self.date_range }

  pub fn catalog(&self) -> &Catalog { &self.catalog }

  pub fn is_empty(&self) -> bool { self.events.is_empty() }

  /// The precomputed monthly rows projected onto `active`, zero-filled.
  /// This is the chart input before any filter other than industry applies.
  pub fn baseline_matrix(&self, active: &[String]) -> MonthlyMatrix {
    let rows = self
      .monthly
      .iter()
      .map(|row| MonthTotals {
        month:  row.month.clone(),
        totals: active
          .iter()
          .map(|industry| (industry.clone(), row.get(industry)))
          .collect(),
      })
      .collect();
    MonthlyMatrix {
      industries: active.to_vec(),
      rows,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;
  use crate::{Error, aggregate::aggregate_monthly};

  const DOC: &str = r#"{
    "events": [
      { "company": "Acme", "date": "2022-01-10", "month": "2022-01", "year": 2022,
        "industry": "Hardware", "country": "USA", "location": "SF Bay Area",
        "total_laid_off": 150, "stage": "Series A" },
      { "company": "zeta", "date": "2022-02-03", "year": 2022,
        "industry": "Finance", "country": "UK", "location": "London",
        "total_laid_off": 50.0, "stage": "" },
      { "company": "Byte", "date": "2023-04-11", "month": "2023-04", "year": 2023,
        "industry": "Crypto", "country": "USA", "location": "NYC",
        "total_laid_off": 20, "stage": "Seed", "funds_raised": 40 },
      { "company": "Acme", "date": "2023-04-20", "month": "2023-04", "year": 2023,
        "industry": "Hardware", "country": "USA", "location": "SF Bay Area",
        "total_laid_off": 30, "stage": "Series A" }
    ],
    "top_industries": ["Hardware", "Finance"],
    "monthly": [
      { "month": "2023-04", "Hardware": 30 },
      { "month": "2022-02", "Finance": 50.0 },
      { "month": "2022-01", "Hardware": 150 }
    ],
    "stats": { "date_range": { "start": "2022-01-10", "end": "2023-04-20" },
               "total_events": 4 }
  }"#;

  #[test]
  fn loads_the_processed_document() {
    let ds = Dataset::from_json(DOC).unwrap();
    assert_eq!(ds.events().len(), 4);
    assert_eq!(ds.top_industries(), ["Hardware", "Finance"]);
    assert_eq!(ds.events()[1].month, "2022-02");
    assert_eq!(ds.events()[1].stage, None);
    let range = ds.date_range().unwrap();
    assert_eq!(range.start.to_string(), "2022-01-10");
    assert_eq!(range.end.to_string(), "2023-04-20");
  }

  #[test]
  fn catalog_is_sorted_and_distinct() {
    let ds = Dataset::from_json(DOC).unwrap();
    let catalog = ds.catalog();
    assert_eq!(catalog.companies, ["Acme", "Byte", "zeta"]);
    assert_eq!(catalog.industries, ["Hardware", "Finance", "Crypto"]);
    assert_eq!(catalog.countries, ["UK", "USA"]);
    assert_eq!(catalog.stages, ["Seed", "Series A"]);
    assert_eq!(catalog.years, [2022, 2023]);
    assert_eq!(catalog.industry("Crypto"), Some("Crypto"));
    assert_eq!(catalog.country("France"), None);
    assert!(catalog.has_year(2023));
  }

  #[test]
  fn baseline_matches_recomputed_totals() {
    let ds = Dataset::from_json(DOC).unwrap();
    let active = ds.top_industries().to_vec();
    let baseline = ds.baseline_matrix(&active);
    let months: Vec<_> = baseline.rows.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(months, ["2022-01", "2022-02", "2023-04"]);

    let in_top: Vec<_> = ds
      .events()
      .iter()
      .filter(|e| active.contains(&e.industry))
      .collect();
    let recomputed = aggregate_monthly(in_top, &active);
    assert_eq!(baseline, recomputed);
  }

  #[test]
  fn malformed_documents_are_errors() {
    let err = Dataset::from_json(r#"{ "events": [] }"#).unwrap_err();
    assert!(matches!(err, Error::Malformed(_)));

    let err = Dataset::from_json("not json").unwrap_err();
    assert!(matches!(err, Error::Malformed(_)));
  }

  #[test]
  fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Dataset::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
  }

  #[test]
  fn loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DOC.as_bytes()).unwrap();
    let ds = Dataset::from_path(file.path()).unwrap();
    assert_eq!(ds.catalog().companies.len(), 3);
  }

  #[test]
  fn from_events_computes_the_date_range() {
    let ds = Dataset::from_json(DOC).unwrap();
    let rebuilt = Dataset::from_events(ds.events().to_vec(), ds.top_industries().to_vec());
    assert_eq!(rebuilt.date_range(), ds.date_range());
    assert!(rebuilt.monthly().is_empty());
    assert!(Dataset::from_events(Vec::new(), Vec::new()).date_range().is_none());
  }
}
