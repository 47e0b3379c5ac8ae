//! Application state machine and key dispatcher.

use std::{
  cell::{Ref, RefCell},
  rc::Rc,
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use layoffs_core::{Dashboard, LayoffEvent, SizeBucket, Views};
use strum::IntoEnumIterator;
use tracing::warn;

// ─── Focus & mode ─────────────────────────────────────────────────────────────

/// Which filter control receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Industries,
  Country,
  Stage,
  Year,
  Size,
}

impl Focus {
  const ORDER: [Focus; 5] = [
    Focus::Industries,
    Focus::Country,
    Focus::Stage,
    Focus::Year,
    Focus::Size,
  ];

  /// The single-valued selectors, in display order.
  pub const SELECTORS: [Focus; 4] = [Focus::Country, Focus::Stage, Focus::Year, Focus::Size];

  fn step(self, delta: isize) -> Self {
    let len = Self::ORDER.len() as isize;
    let pos = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
    Self::ORDER[(pos + delta).rem_euclid(len) as usize]
  }

  pub fn label(self) -> &'static str {
    match self {
      Focus::Industries => "Industries",
      Focus::Country => "Country",
      Focus::Stage => "Stage",
      Focus::Year => "Year",
      Focus::Size => "Size",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Normal,
  /// Typing into the company search box.
  Search,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Owner of the filter state; every change goes through it.
  pub dashboard: Dashboard,

  /// Latest views, replaced by the dashboard subscription on every change.
  views: Rc<RefCell<Views>>,

  pub focus: Focus,
  pub mode:  Mode,

  /// Cursor within the industry toggle list.
  pub industry_cursor: usize,

  /// Current search text (only edited in [`Mode::Search`]).
  pub query: String,

  /// Up to five company names matching `query`.
  pub suggestions: Vec<String>,

  pub suggestion_cursor: usize,

  /// Company whose events are highlighted on the time chart.
  pub pinned: Option<String>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl App {
  pub fn new(mut dashboard: Dashboard) -> Self {
    let views = Rc::new(RefCell::new(dashboard.views()));
    let sink = Rc::clone(&views);
    dashboard.subscribe(move |fresh: &Views| *sink.borrow_mut() = fresh.clone());

    Self {
      dashboard,
      views,
      focus: Focus::Industries,
      mode: Mode::Normal,
      industry_cursor: 0,
      query: String::new(),
      suggestions: Vec::new(),
      suggestion_cursor: 0,
      pinned: None,
      status_msg: String::new(),
    }
  }

  /// The views computed after the most recent filter change.
  pub fn views(&self) -> Ref<'_, Views> { self.views.borrow() }

  /// Every industry in the dataset, in list order.
  pub fn industries(&self) -> &[String] { &self.dashboard.dataset().catalog().industries }

  /// Events of the pinned company, regardless of filters.
  pub fn pinned_events(&self) -> Vec<&LayoffEvent> {
    self
      .pinned
      .as_deref()
      .map(|company| self.dashboard.company_events(company))
      .unwrap_or_default()
  }

  // ── Selectors ─────────────────────────────────────────────────────────────

  /// Choices offered by a selector, `all` first.
  pub fn options(&self, focus: Focus) -> Vec<String> {
    let catalog = self.dashboard.dataset().catalog();
    let values: Vec<String> = match focus {
      Focus::Industries => return Vec::new(),
      Focus::Country => catalog.countries.clone(),
      Focus::Stage => catalog.stages.clone(),
      Focus::Year => catalog.years.iter().map(i32::to_string).collect(),
      Focus::Size => SizeBucket::iter().map(|b| b.to_string()).collect(),
    };
    std::iter::once("all".to_string()).chain(values).collect()
  }

  /// The selector's current value as displayed.
  pub fn selected(&self, focus: Focus) -> String {
    let filter = self.dashboard.filter();
    match focus {
      Focus::Industries => String::new(),
      Focus::Country => filter.country.to_string(),
      Focus::Stage => filter.stage.to_string(),
      Focus::Year => filter.year.to_string(),
      Focus::Size => filter.size.to_string(),
    }
  }

  fn cycle_selector(&mut self, delta: isize) {
    let options = self.options(self.focus);
    if options.is_empty() {
      return;
    }
    let current = self.selected(self.focus);
    let pos = options.iter().position(|o| *o == current).unwrap_or(0) as isize;
    let next = &options[(pos + delta).rem_euclid(options.len() as isize) as usize];

    let result = match self.focus {
      Focus::Industries => Ok(()),
      Focus::Country => self.dashboard.set_country_filter(next),
      Focus::Stage => self.dashboard.set_stage_filter(next),
      Focus::Year => self.dashboard.set_year_filter(next),
      Focus::Size => self.dashboard.set_size_filter(next),
    };
    self.report(result);
  }

  fn toggle_industry_at_cursor(&mut self) {
    let Some(industry) = self.industries().get(self.industry_cursor).cloned() else {
      return;
    };
    match self.dashboard.toggle_industry(&industry) {
      Ok(active) => {
        self.status_msg = format!("{industry} {}", if active { "shown" } else { "hidden" });
      }
      Err(e) => self.report(Err(e)),
    }
  }

  fn report(&mut self, result: layoffs_core::Result<()>) {
    match result {
      Ok(()) => self.status_msg.clear(),
      Err(e) => {
        warn!(error = %e, "filter change rejected");
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  // ── Search ────────────────────────────────────────────────────────────────

  fn refresh_suggestions(&mut self) {
    self.suggestions = self
      .dashboard
      .search_companies(&self.query)
      .into_iter()
      .map(str::to_owned)
      .collect();
    self.suggestion_cursor = 0;
  }

  fn clear_search(&mut self) {
    self.query.clear();
    self.suggestions.clear();
    self.suggestion_cursor = 0;
    self.pinned = None;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.mode {
      Mode::Search => {
        self.handle_search_key(key);
        true
      }
      Mode::Normal => self.handle_normal_key(key),
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.clear_search();
      }
      KeyCode::Enter => {
        self.mode = Mode::Normal;
        if let Some(company) = self.suggestions.get(self.suggestion_cursor).cloned() {
          let count = self.dashboard.company_events(&company).len();
          let noun = if count == 1 { "event" } else { "events" };
          self.status_msg = format!("{company}: {count} {noun}");
          self.query = company.clone();
          self.pinned = Some(company);
        }
        self.suggestions.clear();
      }
      KeyCode::Down => {
        if self.suggestion_cursor + 1 < self.suggestions.len() {
          self.suggestion_cursor += 1;
        }
      }
      KeyCode::Up => {
        self.suggestion_cursor = self.suggestion_cursor.saturating_sub(1);
      }
      KeyCode::Backspace => {
        self.query.pop();
        self.refresh_suggestions();
      }
      KeyCode::Char(c) => {
        self.query.push(c);
        self.refresh_suggestions();
      }
      _ => {}
    }
  }

  fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Tab => self.focus = self.focus.step(1),
      KeyCode::BackTab => self.focus = self.focus.step(-1),

      KeyCode::Char('/') => {
        self.mode = Mode::Search;
        self.clear_search();
      }
      KeyCode::Esc => self.clear_search(),

      KeyCode::Char('r') => {
        self.dashboard.reset_filters();
        self.status_msg = "Filters reset".into();
      }

      KeyCode::Down | KeyCode::Char('j') if self.focus == Focus::Industries => {
        if self.industry_cursor + 1 < self.industries().len() {
          self.industry_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') if self.focus == Focus::Industries => {
        self.industry_cursor = self.industry_cursor.saturating_sub(1);
      }
      KeyCode::Char(' ') | KeyCode::Enter if self.focus == Focus::Industries => {
        self.toggle_industry_at_cursor();
      }

      KeyCode::Right | KeyCode::Char('l') if self.focus != Focus::Industries => {
        self.cycle_selector(1);
      }
      KeyCode::Left | KeyCode::Char('h') if self.focus != Focus::Industries => {
        self.cycle_selector(-1);
      }

      _ => {}
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use layoffs_core::{Dataset, Selection};

  use super::*;

  fn press(app: &mut App, code: KeyCode) -> bool { app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)) }

  fn typed(app: &mut App, text: &str) {
    for c in text.chars() {
      press(app, KeyCode::Char(c));
    }
  }

  fn app() -> App {
    let events: Vec<LayoffEvent> = serde_json::from_value(serde_json::json!([
      { "company": "Acme", "date": "2022-01-10", "year": 2022, "industry": "Hardware",
        "country": "USA", "total_laid_off": 150, "stage": "Series A" },
      { "company": "Zeta", "date": "2022-02-03", "year": 2022, "industry": "Finance",
        "country": "UK", "total_laid_off": 50, "stage": "Seed" },
      { "company": "Acorn", "date": "2023-03-01", "year": 2023, "industry": "Finance",
        "country": "UK", "total_laid_off": 700 }
    ]))
    .unwrap();
    let dataset = Dataset::from_events(events, vec!["Hardware".into(), "Finance".into()]);
    App::new(Dashboard::new(dataset))
  }

  #[test]
  fn space_toggles_the_industry_under_the_cursor() {
    let mut app = app();
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char(' '));

    assert!(!app.dashboard.filter().industries.contains("Finance"));
    assert_eq!(app.views().events.len(), 1);
    assert_eq!(app.status_msg, "Finance hidden");

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.views().events.len(), 3);
  }

  #[test]
  fn selectors_cycle_through_all_and_catalog_values() {
    let mut app = app();
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.focus, Focus::Country);
    assert_eq!(app.options(Focus::Country), ["all", "UK", "USA"]);

    press(&mut app, KeyCode::Right);
    assert_eq!(app.dashboard.filter().country, Selection::Only("UK".into()));
    assert_eq!(app.views().stats.total_laid_off(), 750);

    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Left);
    assert_eq!(app.selected(Focus::Country), "USA");

    press(&mut app, KeyCode::BackTab);
    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.focus, Focus::Size);
    press(&mut app, KeyCode::Right);
    assert_eq!(app.selected(Focus::Size), "0-100");
  }

  #[test]
  fn reset_restores_defaults() {
    let mut app = app();
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Right);
    assert_eq!(app.views().events.len(), 2);

    press(&mut app, KeyCode::Char('r'));
    assert_eq!(app.views().events.len(), 3);
    assert!(app.dashboard.filter().year.is_all());
  }

  #[test]
  fn search_suggests_and_pins_a_company() {
    let mut app = app();
    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.mode, Mode::Search);

    typed(&mut app, "ac");
    assert_eq!(app.suggestions, ["Acme", "Acorn"]);

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mode, Mode::Normal);
    assert_eq!(app.pinned.as_deref(), Some("Acorn"));
    assert_eq!(app.pinned_events().len(), 1);
    assert_eq!(app.status_msg, "Acorn: 1 event");

    press(&mut app, KeyCode::Esc);
    assert!(app.pinned.is_none());
  }

  #[test]
  fn typing_q_while_searching_does_not_quit() {
    let mut app = app();
    press(&mut app, KeyCode::Char('/'));
    assert!(press(&mut app, KeyCode::Char('q')));
    press(&mut app, KeyCode::Esc);
    assert!(!press(&mut app, KeyCode::Char('q')));
  }

  #[test]
  fn ctrl_c_quits_anywhere() {
    let mut app = app();
    press(&mut app, KeyCode::Char('/'));
    assert!(!app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
  }
}
