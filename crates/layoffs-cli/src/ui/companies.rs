//! Company ranking — horizontal bar chart of the top companies.

use ratatui::{
  Frame,
  layout::{Direction, Rect},
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};

use super::{placeholder, thousands};
use crate::app::App;

const BAR: Color = Color::Rgb(0x66, 0x7e, 0xea);

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let views = app.views();
  let ranking = &views.companies;

  let block = Block::default()
    .title(format!(" Top {} companies ", ranking.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if ranking.is_empty() {
    f.render_widget(
      Paragraph::new(placeholder("No companies to rank.")).block(block),
      area,
    );
    return;
  }

  let bars: Vec<Bar> = ranking
    .iter()
    .map(|entry| {
      let pinned = app.pinned.as_deref() == Some(entry.company.as_str());
      let style = if pinned {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(BAR)
      };
      Bar::default()
        .value(entry.total)
        .label(Line::from(entry.company.clone()))
        .text_value(thousands(entry.total))
        .style(style)
        .value_style(Style::default().fg(Color::White).bg(BAR))
    })
    .collect();

  let chart = BarChart::default()
    .block(block)
    .direction(Direction::Horizontal)
    .data(BarGroup::default().bars(&bars))
    .bar_width(1)
    .bar_gap(0);

  f.render_widget(chart, area);
}
