//! Industry share — the terminal stand-in for the donut chart.
//!
//! Every industry with matching events gets a row, including switched-off
//! ones, which are dimmed rather than dropped.

use layoffs_core::IndustrySlice;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use super::{palette, placeholder, thousands};
use crate::app::App;

/// Percentage of `total` held by each slice, rounded to one decimal.
pub fn shares(slices: &[IndustrySlice]) -> Vec<f64> {
  let total = slices.iter().map(|s| s.total).fold(0, u64::saturating_add);
  slices
    .iter()
    .map(|s| {
      if total == 0 {
        0.0
      } else {
        (s.total as f64 * 1000.0 / total as f64).round() / 10.0
      }
    })
    .collect()
}

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let views = app.views();
  let slices = &views.industries;

  let block = Block::default()
    .title(" Share by industry ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if slices.is_empty() {
    f.render_widget(
      Paragraph::new(placeholder("No industries to show.")).block(block),
      area,
    );
    return;
  }

  let industries = app.industries();
  let name_width = slices.iter().map(|s| s.industry.len()).max().unwrap_or(0);
  // Room left for the bar after name, count and percentage columns.
  let bar_room = (area.width as usize).saturating_sub(name_width + 22).max(4);

  let lines: Vec<Line> = slices
    .iter()
    .zip(shares(slices))
    .map(|(slice, pct)| {
      let color = palette::color_in(industries, &slice.industry);
      let style = if slice.active {
        Style::default().fg(color)
      } else {
        Style::default()
          .fg(Color::DarkGray)
          .add_modifier(Modifier::DIM)
      };
      let filled = ((pct / 100.0) * bar_room as f64).round() as usize;
      Line::from(vec![
        Span::styled(format!("{:<name_width$} ", slice.industry), style),
        Span::styled("█".repeat(filled.max(1)), style),
        Span::raw(" "),
        Span::styled(
          format!("{pct:>5.1}%  {}", thousands(slice.total)),
          if slice.active {
            Style::default().fg(Color::White)
          } else {
            style
          },
        ),
      ])
    })
    .collect();

  f.render_widget(Paragraph::new(lines).block(block), area);
}
