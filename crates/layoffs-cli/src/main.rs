//! `layoffs` — terminal dashboard for company layoff events.
//!
//! # Usage
//!
//! ```
//! layoffs --dataset data/layoffs_processed.json
//! layoffs --dataset https://example.org/layoffs_processed.json --year 2023
//! layoffs --config ~/.config/layoffs/config.toml --json > views.json
//! ```

mod app;
mod config;
mod source;
mod ui;

use std::{
  fs::File,
  io::{self, Write},
  path::Path,
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use config::{Args, Settings};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use layoffs_core::Dashboard;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  let settings = Settings::load(Args::parse())?;
  init_tracing(settings.log_file.as_deref(), settings.json)?;

  info!(source = %settings.source, "loading dataset");
  let dataset = settings.source.load().await?;
  info!(
    events = dataset.events().len(),
    companies = dataset.catalog().companies.len(),
    "dataset loaded"
  );

  let mut dashboard = Dashboard::new(dataset);
  settings.filters.apply(&mut dashboard)?;

  if settings.json {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &dashboard.views()).context("writing views")?;
    writeln!(stdout).context("writing views")?;
    return Ok(());
  }

  let mut app = App::new(dashboard);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app);

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Logging ──────────────────────────────────────────────────────────────────

fn env_filter() -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy()
}

/// The terminal UI owns stdout, so logs go to a file when one is configured,
/// to stderr in `--json` mode, and nowhere otherwise.
fn init_tracing(log_file: Option<&Path>, json: bool) -> Result<()> {
  let builder = tracing_subscriber::fmt().with_env_filter(env_filter());
  match log_file {
    Some(path) => {
      let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
      builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    }
    None if json => builder.with_writer(io::stderr).init(),
    None => builder.with_writer(io::sink).init(),
  }
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    if !event::poll(Duration::from_millis(250)).context("polling terminal")? {
      continue;
    }
    match event::read().context("reading terminal event")? {
      Event::Key(key) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key) {
          break;
        }
      }
      Event::Resize(_, _) => {
        // Terminal will redraw on next iteration.
      }
      _ => {}
    }
  }

  Ok(())
}
