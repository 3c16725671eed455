//! A career timeline you scroll through in the terminal.
//!
//! Run the binary to open the interactive timeline.
//! Run with `--serve ADDR` to host the projects / contact / resume API instead.

mod app;
mod config;
mod core;
mod server;
mod ui;

use std::io::{self, stderr};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, widgets::Paragraph, Terminal};
use tracing_subscriber::EnvFilter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::core::autoscroll::DriverState;
use crate::core::narrative::Narrative;
use crate::server::contact::MailSettings;
use crate::ui::{layout::AppLayout, page::PageWidget, rail::ProgressRail, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scroll-driven career timeline")]
struct Cli {
    /// Narrative JSON file (defaults to the built-in sample).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Recompute progress at most every 20ms.
    #[arg(long)]
    constrained: bool,

    /// Serve the HTTP API on this address instead of opening the timeline.
    #[arg(long, value_name = "ADDR")]
    serve: Option<SocketAddr>,

    /// SQLite database for the projects API.
    #[arg(long, default_value = "projects.db")]
    db: PathBuf,

    /// PDF served at `/api/download/resume`.
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Write the current settings to the config file and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

fn init_tracing(serving: bool) {
    // The service defaults to `info` when RUST_LOG is unset.
    let filter = if serving && std::env::var_os("RUST_LOG").is_none() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr) // never pollute stdout
        .init();
}

/// Load the narrative, falling back to the sample with a status message.
fn load_narrative(path: Option<&PathBuf>) -> (Narrative, Option<String>) {
    let Some(path) = path else {
        return (Narrative::sample(), None);
    };
    match Narrative::load(path) {
        Ok(n) if !n.is_empty() => {
            tracing::info!(entries = n.len(), path = %path.display(), "narrative loaded");
            (n, None)
        }
        Ok(_) => (
            Narrative::sample(),
            Some(format!("{} has no entries, showing sample", path.display())),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "narrative load failed");
            (Narrative::sample(), Some(format!("{e}; showing sample")))
        }
    }
}

fn status_line(state: &AppState) -> String {
    let elapsed = chrono::Duration::from_std(state.started_at.elapsed())
        .unwrap_or_else(|_| chrono::Duration::zero());
    let clock = format!(
        "{:02}:{:02}",
        elapsed.num_minutes(),
        elapsed.num_seconds() % 60
    );
    let scroll = state.engine.scroll_state();
    let total = state.engine.narrative().len();
    let position = if total == 0 {
        "no entries".to_string()
    } else {
        format!("entry {}/{}", scroll.active_index + 1, total)
    };
    let tour = match state.engine.tour_state() {
        DriverState::Running => " | touring".to_string(),
        DriverState::Idle => String::new(),
    };
    let hint = state.config.status_bar_hint();
    let lead = state.status_message.as_deref().unwrap_or(&hint);
    format!(
        " {clock} | {position} | {:>3.0}%{tour} | {lead}",
        scroll.progress * 100.0
    )
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.serve.is_some());

    let mut user_config = config::AppConfig::load();
    if cli.constrained {
        user_config.constrained = true;
    }

    if cli.write_config {
        user_config.save()?;
        println!("{}", config::config_path().display());
        return Ok(());
    }

    // ── service mode ──────────────────────────────────────────
    if let Some(addr) = cli.serve {
        return server::run(server::ServerConfig {
            addr,
            db_path: cli.db,
            resume_path: cli.resume,
            mail: MailSettings::from_env(),
        })
        .await;
    }

    let (narrative, load_message) = load_narrative(cli.data.as_ref());
    let frame_ms = user_config.frame_ms;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut state = AppState::new(
        narrative,
        user_config,
        Rect::new(0, 0, size.width, size.height),
    );
    state.status_message = load_message;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let mut frames = tokio::time::interval(Duration::from_millis(frame_ms));
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // ── event loop ────────────────────────────────────────────
    let mut needs_draw = true;
    loop {
        if needs_draw {
            needs_draw = false;
            terminal.draw(|frame| {
                let layout = AppLayout::from_area(frame.area());
                frame.render_widget(
                    PageWidget::new(&state.engine, &state.page, state.config.cell_height),
                    layout.page_area,
                );
                frame.render_widget(
                    ProgressRail {
                        progress: state.engine.scroll_state().progress,
                        touring: state.engine.tour_state() == DriverState::Running,
                    },
                    layout.rail_area,
                );
                let status = Paragraph::new(status_line(&state)).style(Theme::status_bar_style());
                frame.render_widget(status, layout.status_area);
            })?;
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k, Instant::now()),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(w, h) => state.resize(w, h),
                }
                needs_draw = true;
            }

            _ = frames.tick() => {
                let before = (state.engine.scroll_state(), state.engine.tour_state());
                let touring = state.engine.on_frame(Instant::now());
                if touring || before != (state.engine.scroll_state(), state.engine.tour_state()) {
                    needs_draw = true;
                }
                // The session clock ticks once a second.
                if state.started_at.elapsed().subsec_millis() < frame_ms as u32 {
                    needs_draw = true;
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    drop(state);
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
