//! Industry colours shared by every chart.

use ratatui::style::Color;

const NAMED: [(&str, Color); 8] = [
  ("Hardware", Color::Rgb(0x66, 0x7e, 0xea)),
  ("Other", Color::Rgb(0x76, 0x4b, 0xa2)),
  ("Consumer", Color::Rgb(0xf0, 0x93, 0xfb)),
  ("Retail", Color::Rgb(0x4f, 0xac, 0xfe)),
  ("Transportation", Color::Rgb(0x43, 0xe9, 0x7b)),
  ("Finance", Color::Rgb(0xfa, 0x70, 0x9a)),
  ("Food", Color::Rgb(0xfe, 0xe1, 0x40)),
  ("Healthcare", Color::Rgb(0x30, 0xcf, 0xd0)),
];

/// Colour for `industry`. Unnamed industries cycle through the palette by
/// their `position` in the industry list.
pub fn industry_color(industry: &str, position: usize) -> Color {
  NAMED
    .iter()
    .find(|(name, _)| *name == industry)
    .map(|(_, color)| *color)
    .unwrap_or(NAMED[position % NAMED.len()].1)
}

/// Colour for `industry` looked up by its position in `industries`.
pub fn color_in(industries: &[String], industry: &str) -> Color {
  let position = industries.iter().position(|i| i == industry).unwrap_or(0);
  industry_color(industry, position)
}
