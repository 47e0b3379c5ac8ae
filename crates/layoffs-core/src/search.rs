//! Company name search for the autocomplete box.
//!
//! Plain case-insensitive substring matching over the pre-sorted company
//! list; results keep that alphabetical order. No fuzzy ranking.

use crate::event::LayoffEvent;

/// Maximum number of suggestions returned by [`search_companies`].
pub const MAX_SUGGESTIONS: usize = 5;

/// The first [`MAX_SUGGESTIONS`] names in `companies` containing `query`.
/// A blank query yields nothing rather than everything.
pub fn search_companies<'a>(query: &str, companies: &'a [String]) -> Vec<&'a str> {
  let needle = query.trim().to_lowercase();
  if needle.is_empty() {
    return Vec::new();
  }
  companies
    .iter()
    .filter(|name| name.to_lowercase().contains(&needle))
    .take(MAX_SUGGESTIONS)
    .map(String::as_str)
    .collect()
}

/// Every event recorded for exactly `company`, in source order.
pub fn events_for_company<'a, I>(events: I, company: &str) -> Vec<&'a LayoffEvent>
where
  I: IntoIterator<Item = &'a LayoffEvent>,
{
  events.into_iter().filter(|e| e.company == company).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fixtures::event;

  fn names() -> Vec<String> {
    [
      "Airbnb", "Amazon", "Bolt", "Carvana", "Coinbase", "Meta", "Netflix",
      "Salesforce", "Shopify", "Snap", "Stripe",
    ]
    .into_iter()
    .map(String::from)
    .collect()
  }

  #[test]
  fn blank_query_matches_nothing() {
    let names = names();
    assert!(search_companies("", &names).is_empty());
    assert!(search_companies("   ", &names).is_empty());
  }

  #[test]
  fn matching_is_case_insensitive_substring() {
    let names = names();
    assert_eq!(search_companies("BNB", &names), ["Airbnb"]);
    assert_eq!(search_companies("sh", &names), ["Shopify"]);
    assert_eq!(search_companies(" meta ", &names), ["Meta"]);
  }

  #[test]
  fn results_are_capped_and_alphabetical() {
    let names = names();
    let hits = search_companies("a", &names);
    assert_eq!(hits.len(), MAX_SUGGESTIONS);
    assert_eq!(hits, ["Airbnb", "Amazon", "Carvana", "Coinbase", "Meta"]);

    for query in ["e", "o", "x", "zz", "s"] {
      assert!(search_companies(query, &names).len() <= MAX_SUGGESTIONS);
    }
  }

  #[test]
  fn company_events_are_exact_matches() {
    let events = vec![
      event("Meta", "Consumer", 11_000, "2022-11-09"),
      event("Metaview", "HR", 20, "2023-01-05"),
      event("Meta", "Consumer", 10_000, "2023-03-14"),
    ];
    let hits = events_for_company(&events, "Meta");
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|e| e.company == "Meta"));
  }
}
