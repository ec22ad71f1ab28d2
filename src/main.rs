//! A circular dial picker for the terminal.
//!
//! Drag the dial with the mouse, fling it, or step it with the keys; it
//! always comes to rest with one item on the center line.  Confirming prints
//! that item to stdout (the TUI itself draws on stderr), so the picker can
//! be used inside shell pipelines:
//!
//! ```sh
//! minutes=$(dial-picker --description min $(seq -w 0 59))
//! ```

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Paragraph},
    Frame, Terminal,
};
use tokio::time::MissedTickBehavior;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler, persist,
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::error::MIN_ITEMS;
use crate::ui::{dial_widget::DialWidget, theme::Theme};

/// Animation frame period while the dial is moving.
const FRAME: Duration = Duration::from_millis(16);
/// Longest step handed to the physics in one frame.
const MAX_FRAME_STEP: Duration = Duration::from_millis(64);

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Circular dial picker")]
struct Cli {
    /// Items to pick from (at least five).
    items: Vec<String>,

    /// Read items from a file, one per line.
    #[arg(short, long, conflicts_with = "items")]
    file: Option<PathBuf>,

    /// Start on this item index.
    #[arg(short, long)]
    position: Option<usize>,

    /// Label shown next to the centered item.
    #[arg(short, long)]
    description: Option<String>,

    /// Never ring the bell on settle.
    #[arg(long)]
    no_haptics: bool,

    /// Start where the last run over a list of the same length stopped.
    #[arg(long, conflicts_with = "position")]
    restore: bool,

    /// Config file (defaults to `$XDG_CONFIG_HOME/dial-picker/config.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

fn read_items(cli: &Cli) -> Result<Vec<String>> {
    let items: Vec<String> = match &cli.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading items from {}", path.display()))?
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
        None => cli.items.clone(),
    };
    if items.len() < MIN_ITEMS {
        bail!("need at least {MIN_ITEMS} items to pick from, got {}", items.len());
    }
    Ok(items)
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &mut AppState) {
    let layout = state.sync_layout(frame.area());

    let title = format!(
        " {} / {} ",
        state.picker.position() + 1,
        state.picker.list().len()
    );
    let block = Block::bordered()
        .title(title)
        .title_style(Theme::title_style())
        .border_style(Theme::border_style());
    frame.render_widget(DialWidget::new(&state.picker).block(block), layout.dial_area);

    let hint = state.config.status_bar_hint();
    let status_text = match (&state.status_message, state.settled_item()) {
        (Some(message), _) => message.clone(),
        (None, Some(item)) => format!("{item} | {hint}"),
        (None, None) => hint,
    };
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Only prints when RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref());
    if let Some(description) = &cli.description {
        config.dial.description = description.clone();
    }
    if cli.no_haptics {
        config.dial.haptic_feedback = false;
    }
    if cli.write_config {
        config.save(cli.config.as_deref())?;
        return Ok(());
    }

    let items = read_items(&cli)?;
    let state_file = config::state_path();
    let position = if cli.restore {
        persist::load(&state_file, items.len()).map_or(0, |saved| saved.position)
    } else {
        cli.position.unwrap_or(0)
    };
    let mut state = AppState::new(items, config, position)?;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stderr(), EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stderr()))?;

    let result = run(&mut terminal, &mut state).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    result?;

    if let Err(err) = persist::save(&state_file, state.picker.save_state(), state.picker.list().len()) {
        tracing::warn!("could not save position: {err:#}");
    }
    if let Some(item) = &state.selected {
        println!("{item}");
    }
    Ok(())
}

/// Time to advance the physics by, capped so a stalled loop slows the
/// animation down instead of skipping it.
fn frame_step(now: Instant, last_frame: Instant) -> Duration {
    now.saturating_duration_since(last_frame).min(MAX_FRAME_STEP)
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let mut frames = tokio::time::interval(FRAME);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();
    let mut dirty = true;

    loop {
        // Input always repaints; animation frames only when the dial moved.
        let moved = state.picker.take_redraw();
        if dirty || moved {
            terminal.draw(|frame| draw(frame, state))?;
            dirty = false;
        }

        tokio::select! {
            biased;

            event = events.recv() => {
                dirty = true;
                let was_animating = state.picker.is_animating();
                match event {
                    Some(AppEvent::Key(k)) => handler::handle_key(state, k),
                    Some(AppEvent::Mouse(m)) => handler::handle_mouse(state, m),
                    Some(AppEvent::Resize(_, _)) => {}
                    None => break,
                }
                // An animation started by this event is timed from now, not
                // from the last frame before the idle wait.
                if !was_animating && state.picker.is_animating() {
                    last_frame = Instant::now();
                    frames.reset();
                }
            }

            _ = frames.tick(), if state.picker.is_animating() => {
                let now = Instant::now();
                state.picker.tick(frame_step(now, last_frame));
                last_frame = now;
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
