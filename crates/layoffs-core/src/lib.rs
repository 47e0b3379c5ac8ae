//! Filter and aggregation engine for the layoffs dashboard.
//!
//! This crate is deliberately free of terminal and network dependencies. It
//! turns a loaded [`Dataset`] plus the active [`FilterState`] into the
//! derived views each chart draws, and owns the controller that keeps those
//! views in step with the filters.

pub mod aggregate;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod event;
pub mod filter;
pub mod search;

#[cfg(test)]
mod fixtures;

pub use aggregate::{CompanyTotal, MonthTotals, MonthlyMatrix, SummaryStats};
pub use dashboard::{Dashboard, IndustrySlice, SubscriptionId, Views};
pub use dataset::{Catalog, Dataset};
pub use error::{Error, Result};
pub use event::{DateRange, LayoffEvent};
pub use filter::{FilterState, Selection, SizeBucket};
