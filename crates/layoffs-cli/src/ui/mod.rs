//! TUI rendering — orchestrates all panes.

pub mod companies;
pub mod filters;
pub mod industries;
pub mod monthly;
pub mod palette;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::{App, Focus, Mode};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, counters, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(3), // counters
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_counters(f, rows[1], app);
  draw_body(f, rows[2], app);
  draw_status(f, rows[3], app);

  if app.mode == Mode::Search {
    draw_search(f, rows[2], app);
  }
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// `1234567` → `1,234,567`.
pub fn thousands(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

/// Grey one-liner shown in place of an empty chart.
pub fn placeholder(text: &str) -> Line<'_> {
  Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let left = Span::styled(
    " layoffs  [/] search  [Tab] focus  [r] reset  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let span = app
    .dashboard
    .dataset()
    .date_range()
    .map(|r| format!("data {} ", r))
    .unwrap_or_default();
  let right = Span::styled(span, Style::default().fg(Color::Gray));

  // Simple left-right header: pad the middle.
  let left_width = left.width() as u16;
  let right_width = right.width() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Counters ─────────────────────────────────────────────────────────────────

fn draw_counters(f: &mut Frame, area: Rect, app: &App) {
  let views = app.views();
  let stats = &views.stats;

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage(30),
      Constraint::Percentage(20),
      Constraint::Percentage(50),
    ])
    .split(area);

  let period = stats
    .date_range()
    .map(|r| r.to_string())
    .unwrap_or_else(|| "no data".to_string());

  let counters = [
    ("Total laid off", thousands(stats.total_laid_off())),
    ("Companies", thousands(stats.companies() as u64)),
    ("Period", period),
  ];

  for ((title, value), col) in counters.into_iter().zip(cols.iter()) {
    let block = Block::default()
      .title(format!(" {title} "))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray));
    let value_style = if stats.is_no_data() {
      Style::default().fg(Color::DarkGray)
    } else {
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
    };
    f.render_widget(
      Paragraph::new(Span::styled(value, value_style)).block(block),
      *col,
    );
  }
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  // Filters on the left, charts on the right.
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Length(28), Constraint::Min(0)])
    .split(area);

  filters::draw(f, cols[0], app);

  let charts = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
    .split(cols[1]);

  monthly::draw(f, charts[0], app);

  let bottom = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
    .split(charts[1]);

  companies::draw(f, bottom[0], app);
  industries::draw(f, bottom[1], app);
}

// ─── Search popup ─────────────────────────────────────────────────────────────

fn draw_search(f: &mut Frame, body: Rect, app: &App) {
  let height = (app.suggestions.len() as u16 + 3).min(body.height);
  let width = 40.min(body.width);
  let area = Rect {
    x: body.x + body.width.saturating_sub(width) / 2,
    y: body.y + 1,
    width,
    height,
  };

  let block = Block::default()
    .title(" Search companies ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));
  let inner = block.inner(area);
  f.render_widget(Clear, area);
  f.render_widget(block, area);

  let parts = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(inner);

  f.render_widget(
    Paragraph::new(format!("/{}_", app.query)).style(Style::default().fg(Color::Yellow)),
    parts[0],
  );

  let items: Vec<ListItem> = app
    .suggestions
    .iter()
    .enumerate()
    .map(|(i, name)| {
      let style = if i == app.suggestion_cursor {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      ListItem::new(Span::styled(name.clone(), style))
    })
    .collect();
  f.render_widget(List::new(items), parts[1]);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match (app.mode, app.focus) {
    (Mode::Search, _) => ("SEARCH", "Type a company  ↑↓ choose  Enter pin  Esc cancel"),
    (Mode::Normal, Focus::Industries) => (
      "FILTER",
      "↑↓/jk move  Space toggle  Tab next filter  / search  r reset  q quit",
    ),
    (Mode::Normal, _) => (
      "FILTER",
      "←→/hl change  Tab next filter  / search  Esc unpin  r reset  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
