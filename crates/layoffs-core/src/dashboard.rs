//! The dashboard controller — the one owner of the filter state.
//!
//! UI code never touches [`FilterState`] directly. It calls the validating
//! setters here; each successful change recomputes every derived view from
//! scratch and hands the resulting [`Views`] to the registered consumers, in
//! registration order. Getters likewise recompute on every call; nothing is
//! cached.

use serde::Serialize;
use tracing::debug;

use crate::{
  Error, Result,
  aggregate::{
    CompanyTotal, MonthlyMatrix, SummaryStats, aggregate_by_company, aggregate_by_industry,
    aggregate_monthly, compute_stats,
  },
  dataset::Dataset,
  event::LayoffEvent,
  filter::{FilterState, Selection, SizeBucket},
  search,
};

// ─── Views ───────────────────────────────────────────────────────────────────

/// One slice of the industry share chart. Inactive industries are still
/// reported so they can be drawn dimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustrySlice {
  pub industry: String,
  pub total:    u64,
  pub active:   bool,
}

/// Every derived view, computed together from one filter state.
#[derive(Debug, Clone, Serialize)]
pub struct Views {
  pub filter:     FilterState,
  pub events:     Vec<LayoffEvent>,
  pub monthly:    MonthlyMatrix,
  /// The document's precomputed monthly totals for the active industries,
  /// unaffected by the facet filters.
  pub baseline:   MonthlyMatrix,
  pub companies:  Vec<CompanyTotal>,
  pub industries: Vec<IndustrySlice>,
  pub stats:      SummaryStats,
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

/// Handle returned by [`Dashboard::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Consumer = Box<dyn FnMut(&Views)>;

// ─── Dashboard ───────────────────────────────────────────────────────────────

pub struct Dashboard {
  dataset:   Dataset,
  filter:    FilterState,
  consumers: Vec<(SubscriptionId, Consumer)>,
  next_id:   u64,
}

impl Dashboard {
  /// A dashboard with every top industry active and every other facet open.
  pub fn new(dataset: Dataset) -> Self {
    let filter = Self::default_filter(&dataset);
    Self {
      dataset,
      filter,
      consumers: Vec::new(),
      next_id: 0,
    }
  }

  fn default_filter(dataset: &Dataset) -> FilterState {
    FilterState::with_industries(dataset.top_industries().iter().cloned())
  }

  pub fn dataset(&self) -> &Dataset { &self.dataset }

  pub fn filter(&self) -> &FilterState { &self.filter }

  // ── Notification ──────────────────────────────────────────────────────

  /// Register `consumer` to receive fresh [`Views`] after every filter
  /// change.
  pub fn subscribe(&mut self, consumer: impl FnMut(&Views) + 'static) -> SubscriptionId {
    let id = SubscriptionId(self.next_id);
    self.next_id += 1;
    self.consumers.push((id, Box::new(consumer)));
    id
  }

  /// Returns `false` if `id` was not subscribed.
  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
    let before = self.consumers.len();
    self.consumers.retain(|(existing, _)| *existing != id);
    self.consumers.len() != before
  }

  fn changed(&mut self) {
    let views = self.views();
    debug!(
      events = views.events.len(),
      total_laid_off = views.stats.total_laid_off(),
      filter = ?views.filter,
      "filters changed"
    );
    for (_, consumer) in &mut self.consumers {
      consumer(&views);
    }
  }

  // ── Setters ───────────────────────────────────────────────────────────

  /// Switch one industry on or off.
  pub fn set_industry_active(&mut self, industry: &str, active: bool) -> Result<()> {
    let industry = self
      .dataset
      .catalog()
      .industry(industry.trim())
      .ok_or_else(|| Error::UnknownIndustry(industry.to_owned()))?
      .to_owned();
    if active {
      self.filter.industries.insert(industry);
    } else {
      self.filter.industries.remove(&industry);
    }
    self.changed();
    Ok(())
  }

  /// Flip one industry and return its new state.
  pub fn toggle_industry(&mut self, industry: &str) -> Result<bool> {
    let active = !self.filter.industries.contains(industry.trim());
    self.set_industry_active(industry, active)?;
    Ok(active)
  }

  pub fn set_country_filter(&mut self, value: &str) -> Result<()> {
    let catalog = self.dataset.catalog();
    let country = Selection::parse_with(value, |raw| {
      catalog
        .country(raw)
        .map(str::to_owned)
        .ok_or_else(|| Error::UnknownCountry(raw.to_owned()))
    })?;
    self.filter.country = country;
    self.changed();
    Ok(())
  }

  pub fn set_stage_filter(&mut self, value: &str) -> Result<()> {
    let catalog = self.dataset.catalog();
    let stage = Selection::parse_with(value, |raw| {
      catalog
        .stage(raw)
        .map(str::to_owned)
        .ok_or_else(|| Error::UnknownStage(raw.to_owned()))
    })?;
    self.filter.stage = stage;
    self.changed();
    Ok(())
  }

  pub fn set_year_filter(&mut self, value: &str) -> Result<()> {
    let catalog = self.dataset.catalog();
    let year = Selection::parse_with(value, |raw| {
      let year: i32 = raw.parse().map_err(|_| Error::InvalidYear(raw.to_owned()))?;
      if catalog.has_year(year) {
        Ok(year)
      } else {
        Err(Error::UnknownYear(year))
      }
    })?;
    self.filter.year = year;
    self.changed();
    Ok(())
  }

  pub fn set_size_filter(&mut self, value: &str) -> Result<()> {
    let size = Selection::parse_with(value, |raw| {
      raw
        .parse::<SizeBucket>()
        .map_err(|_| Error::InvalidSize(raw.to_owned()))
    })?;
    self.filter.size = size;
    self.changed();
    Ok(())
  }

  /// Back to every top industry active and every facet open.
  pub fn reset_filters(&mut self) {
    self.filter = Self::default_filter(&self.dataset);
    self.changed();
  }

  // ── Getters ───────────────────────────────────────────────────────────

  pub fn filtered_events(&self) -> Vec<&LayoffEvent> {
    self
      .dataset
      .events()
      .iter()
      .filter(|e| self.filter.matches(e))
      .collect()
  }

  /// Active industries in stacking order.
  pub fn active_industries(&self) -> Vec<String> {
    self
      .dataset
      .catalog()
      .industries
      .iter()
      .filter(|i| self.filter.industries.contains(*i))
      .cloned()
      .collect()
  }

  /// Precomputed monthly totals projected onto the active industries. Empty
  /// for datasets built without a monthly section.
  pub fn baseline_matrix(&self) -> MonthlyMatrix {
    self.dataset.baseline_matrix(&self.active_industries())
  }

  pub fn monthly_matrix(&self) -> MonthlyMatrix {
    aggregate_monthly(self.filtered_events(), &self.active_industries())
  }

  pub fn company_totals(&self) -> Vec<CompanyTotal> { aggregate_by_company(self.filtered_events()) }

  /// Share per industry over events passing every facet except industry
  /// membership, so switched-off industries keep their slice.
  pub fn industry_totals(&self) -> Vec<IndustrySlice> {
    let candidates = self
      .dataset
      .events()
      .iter()
      .filter(|e| self.filter.matches_facets(e));
    aggregate_by_industry(candidates)
      .into_iter()
      .map(|t| IndustrySlice {
        active:   self.filter.industries.contains(&t.industry),
        industry: t.industry,
        total:    t.total,
      })
      .collect()
  }

  pub fn summary_stats(&self) -> SummaryStats { compute_stats(self.filtered_events()) }

  /// Up to five company names containing `query`, alphabetically.
  pub fn search_companies(&self, query: &str) -> Vec<&str> {
    search::search_companies(query, &self.dataset.catalog().companies)
  }

  pub fn company_events(&self, company: &str) -> Vec<&LayoffEvent> {
    search::events_for_company(self.dataset.events(), company)
  }

  /// Recompute every view at once.
  pub fn views(&self) -> Views {
    let filtered = self.filtered_events();
    let active = self.active_industries();
    Views {
      filter:     self.filter.clone(),
      monthly:    aggregate_monthly(filtered.iter().copied(), &active),
      baseline:   self.dataset.baseline_matrix(&active),
      companies:  aggregate_by_company(filtered.iter().copied()),
      industries: self.industry_totals(),
      stats:      compute_stats(filtered.iter().copied()),
      events:     filtered.into_iter().cloned().collect(),
    }
  }
}
