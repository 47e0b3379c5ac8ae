//! Filter state and the event predicate.
//!
//! An event passes when its industry is active and every other facet either
//! matches or is left at [`Selection::All`].

use std::{collections::BTreeSet, fmt};

use serde::{Serialize, Serializer};
use strum::{Display, EnumIter, EnumString};

use crate::event::LayoffEvent;

// ─── Selection ───────────────────────────────────────────────────────────────

/// A single-valued facet filter: either everything, or one specific value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection<T> {
  #[default]
  All,
  Only(T),
}

impl<T> Selection<T> {
  pub fn is_all(&self) -> bool { matches!(self, Self::All) }

  /// Parse a UI value. The keyword `all` (any case, surrounding whitespace
  /// ignored) selects [`Selection::All`]; anything else goes to `parse`
  /// trimmed.
  pub fn parse_with<E>(
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
  ) -> Result<Self, E> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("all") {
      Ok(Self::All)
    } else {
      parse(raw).map(Self::Only)
    }
  }
}

impl<T: PartialEq> Selection<T> {
  pub fn admits(&self, value: &T) -> bool {
    match self {
      Self::All => true,
      Self::Only(wanted) => wanted == value,
    }
  }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("all"),
      Self::Only(v) => v.fmt(f),
    }
  }
}

impl<T: fmt::Display> Serialize for Selection<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

// ─── Size buckets ────────────────────────────────────────────────────────────

/// Half-open ranges over `total_laid_off`. Together they partition the
/// non-negative integers; a boundary value belongs to the bucket it opens.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
)]
pub enum SizeBucket {
  #[strum(serialize = "0-100")]
  UnderHundred,
  #[strum(serialize = "100-500")]
  Hundreds,
  #[strum(serialize = "500-1000")]
  UnderThousand,
  #[strum(serialize = "1000+")]
  Thousands,
}

impl SizeBucket {
  /// The bucket `total` falls into.
  pub fn of(total: u64) -> Self {
    match total {
      0..100 => Self::UnderHundred,
      100..500 => Self::Hundreds,
      500..1000 => Self::UnderThousand,
      _ => Self::Thousands,
    }
  }

  /// Inclusive lower bound and exclusive upper bound (`None` = unbounded).
  pub fn bounds(self) -> (u64, Option<u64>) {
    match self {
      Self::UnderHundred => (0, Some(100)),
      Self::Hundreds => (100, Some(500)),
      Self::UnderThousand => (500, Some(1000)),
      Self::Thousands => (1000, None),
    }
  }

  pub fn contains(self, total: u64) -> bool {
    let (low, high) = self.bounds();
    total >= low && high.is_none_or(|h| total < h)
  }
}

// ─── Filter state ────────────────────────────────────────────────────────────

/// The active inclusion criteria across every facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
  /// Industries currently switched on. Events of any other industry fail.
  pub industries: BTreeSet<String>,
  pub country:    Selection<String>,
  pub stage:      Selection<String>,
  pub year:       Selection<i32>,
  pub size:       Selection<SizeBucket>,
}

impl FilterState {
  /// A state with the given industries active and every other facet open.
  pub fn with_industries<I, S>(industries: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      industries: industries.into_iter().map(Into::into).collect(),
      country:    Selection::All,
      stage:      Selection::All,
      year:       Selection::All,
      size:       Selection::All,
    }
  }

  pub fn matches(&self, event: &LayoffEvent) -> bool {
    self.industries.contains(&event.industry) && self.matches_facets(event)
  }

  /// Every rule except industry membership.
  pub fn matches_facets(&self, event: &LayoffEvent) -> bool {
    self.country.admits(&event.country)
      && self.stage_admits(event.stage.as_deref())
      && self.year.admits(&event.year)
      && match self.size {
        Selection::All => true,
        Selection::Only(bucket) => bucket.contains(event.total_laid_off),
      }
  }

  fn stage_admits(&self, stage: Option<&str>) -> bool {
    match &self.stage {
      Selection::All => true,
      Selection::Only(wanted) => stage == Some(wanted.as_str()),
    }
  }
}

/// `true` when `event` satisfies every rule of `state`.
pub fn matches(event: &LayoffEvent, state: &FilterState) -> bool { state.matches(event) }

/// The events passing `state`, in their original order.
pub fn filter_events<'a, I>(events: I, state: &FilterState) -> Vec<&'a LayoffEvent>
where
  I: IntoIterator<Item = &'a LayoffEvent>,
{
  events.into_iter().filter(|e| state.matches(e)).collect()
}
