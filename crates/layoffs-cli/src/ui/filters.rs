//! Filter pane — left panel: industry toggles and facet selectors.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::palette;
use crate::app::{App, Focus};

/// Render the filter pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let parts = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Min(3),
      Constraint::Length(Focus::SELECTORS.len() as u16 + 2),
    ])
    .split(area);

  draw_industries(f, parts[0], app);
  draw_selectors(f, parts[1], app);
}

fn border(focused: bool) -> Style {
  if focused {
    Style::default().fg(Color::Cyan)
  } else {
    Style::default().fg(Color::DarkGray)
  }
}

fn draw_industries(f: &mut Frame, area: Rect, app: &App) {
  let industries = app.industries();
  let active = &app.dashboard.filter().industries;
  let focused = app.focus == Focus::Industries;

  let block = Block::default()
    .title(format!(" Industries ({}/{}) ", active.len(), industries.len()))
    .borders(Borders::ALL)
    .border_style(border(focused));

  let items: Vec<ListItem> = industries
    .iter()
    .enumerate()
    .map(|(i, industry)| {
      let on = active.contains(industry);
      let (mark, style) = if on {
        (
          "■ ",
          Style::default().fg(palette::industry_color(industry, i)),
        )
      } else {
        (
          "□ ",
          Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM),
        )
      };
      ListItem::new(Line::from(vec![
        Span::styled(mark, style),
        Span::styled(industry.clone(), style),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((focused && !industries.is_empty()).then_some(app.industry_cursor));

  f.render_stateful_widget(
    List::new(items)
      .block(block)
      .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
      .highlight_symbol(""),
    area,
    &mut state,
  );
}

fn draw_selectors(f: &mut Frame, area: Rect, app: &App) {
  let focused = app.focus != Focus::Industries;
  let block = Block::default()
    .title(" Filters ")
    .borders(Borders::ALL)
    .border_style(border(focused));

  let lines: Vec<Line> = Focus::SELECTORS
    .iter()
    .map(|&selector| {
      let value = app.selected(selector);
      let is_focus = app.focus == selector;
      let value_style = if is_focus {
        Style::default()
          .fg(Color::Black)
          .bg(Color::Cyan)
          .add_modifier(Modifier::BOLD)
      } else if value == "all" {
        Style::default().fg(Color::DarkGray)
      } else {
        Style::default().fg(Color::Yellow)
      };
      Line::from(vec![
        Span::styled(
          format!("{:<8}", selector.label()),
          Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("‹ {value} ›"), value_style),
      ])
    })
    .collect();

  f.render_widget(Paragraph::new(lines).block(block), area);
}
