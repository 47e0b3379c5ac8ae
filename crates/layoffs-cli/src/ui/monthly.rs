//! Stacked monthly chart — one band per active industry.
//!
//! Each industry is drawn as the running top of the stack, bottom band first,
//! so the gap between two lines is that industry's share of the month. A
//! pinned company's events are overlaid as scatter points at their own size.

use chrono::NaiveDate;
use layoffs_core::aggregate::MonthlyMatrix;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  symbols::Marker,
  widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use super::{palette, placeholder, thousands};
use crate::app::App;

/// Cumulative `(x, y)` points per industry, in stacking order.
pub fn stack(matrix: &MonthlyMatrix) -> Vec<(String, Vec<(f64, f64)>)> {
  let mut floor = vec![0u64; matrix.rows.len()];
  matrix
    .industries
    .iter()
    .map(|industry| {
      let points = matrix
        .rows
        .iter()
        .zip(floor.iter_mut())
        .enumerate()
        .map(|(x, (row, base))| {
          *base = base.saturating_add(row.get(industry));
          (x as f64, *base as f64)
        })
        .collect();
      (industry.clone(), points)
    })
    .collect()
}

/// `2022-01` → `Jan 2022`; anything unparseable is shown as is.
pub fn month_label(month: &str) -> String {
  NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
    .map(|d| d.format("%b %Y").to_string())
    .unwrap_or_else(|_| month.to_string())
}

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let views = app.views();
  let matrix = &views.monthly;

  let block = Block::default()
    .title(" Layoffs per month ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if matrix.is_empty() {
    f.render_widget(
      Paragraph::new(placeholder("No layoffs match the current filters.")).block(block),
      area,
    );
    return;
  }

  let series = stack(matrix);
  let industries = app.industries();

  // Pinned company events, placed on the month axis.
  let pinned: Vec<(f64, f64)> = app
    .pinned_events()
    .into_iter()
    .filter_map(|e| {
      let x = matrix.rows.iter().position(|r| r.month == e.month)?;
      Some((x as f64, e.total_laid_off as f64))
    })
    .collect();

  let top = series
    .last()
    .map(|(_, points)| points.iter().map(|(_, y)| *y).fold(0.0, f64::max))
    .unwrap_or(0.0)
    .max(pinned.iter().map(|(_, y)| *y).fold(0.0, f64::max))
    .max(1.0);

  let mut datasets: Vec<Dataset> = series
    .iter()
    .map(|(industry, points)| {
      Dataset::default()
        .name(industry.as_str())
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(palette::color_in(industries, industry)))
        .data(points)
    })
    .collect();

  if let Some(company) = &app.pinned {
    datasets.push(
      Dataset::default()
        .name(company.as_str())
        .marker(Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::Red))
        .data(&pinned),
    );
  }

  let last = matrix.rows.len() - 1;
  let x_labels: Vec<String> = [0, last / 2, last]
    .iter()
    .map(|&i| month_label(&matrix.rows[i].month))
    .collect();
  let y_labels: Vec<String> = [0.0, top / 2.0, top]
    .iter()
    .map(|y| thousands(*y as u64))
    .collect();

  let chart = Chart::new(datasets)
    .block(block)
    .x_axis(
      Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([0.0, last.max(1) as f64])
        .labels(x_labels),
    )
    .y_axis(
      Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([0.0, top])
        .labels(y_labels),
    );

  f.render_widget(chart, area);
}
