//! PhysioDash TUI
//!
//! Terminal dashboard for the curated PhysioNet dataset collection.
//!
//! ## Layout
//!
//! Two-pane layout:
//! - Left: Dataset list (title, modality badge, completeness, year)
//! - Right: Detail view of the selected dataset
//!
//! A data indicator in the top-right corner shows where the current
//! collection came from (live, cached, empty, unavailable).
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - gg / G: Jump to first/last dataset
//! - Enter: Open dataset page in browser
//! - q: Quit
//!
//! ## Commands
//!
//! - r: Refresh now
//! - d: Remove selected dataset from view (with confirmation)
//! - y: Copy collection to clipboard as JSON
//! - J / C / M: Export collection as JSON / CSV / Markdown
//! - /: Filter current view
//! - ?: Help overlay

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use physidash_core::{Config, DocumentSource, ExportFormat, FallbackCache, RefreshOutcome};

use app::{App, InputMode};

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if PHYSIDASH_LOG is set)
    init_tui_logging(&config);

    let source = DocumentSource::new(&config)?;
    let cache = FallbackCache::new(&config);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new();

    // Run app
    let result = run_app(&mut terminal, &mut app, &config, &source, &cache).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

/// Spawn a background refresh; the outcome comes back over the channel
fn spawn_refresh(
    source: &DocumentSource,
    cache: &FallbackCache,
    tx: &mpsc::Sender<RefreshOutcome>,
) {
    let source = source.clone();
    let cache = cache.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = source.refresh(&cache).await;
        let _ = tx.send(outcome).await;
    });
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    config: &Config,
    source: &DocumentSource,
    cache: &FallbackCache,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<RefreshOutcome>(4);

    // Scheduled refresh ticks; the first tick fires immediately and
    // doubles as the startup fetch
    let mut ticker = tokio::time::interval(Duration::from_secs(config.refresh_secs.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        // Check for status message timeout
        app.check_status_timeout();

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            biased;

            // A background refresh finished
            outcome = rx.recv() => {
                if let Some(outcome) = outcome {
                    app.apply_refresh(outcome);
                }
            }

            // Scheduled refresh; skipped while one is already in flight
            _ = ticker.tick() => {
                if !app.refresh_in_flight {
                    app.refresh_in_flight = true;
                    spawn_refresh(source, cache, &tx);
                }
            }

            // Poll for terminal events
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                // Check for terminal events (non-blocking)
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        // Only handle key press events (not release)
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }

                        // If help is showing, any key dismisses it
                        if app.show_help {
                            app.show_help = false;
                            continue;
                        }

                        // Handle based on input mode
                        match app.input_mode {
                            InputMode::Normal => {
                                handle_normal_mode(app, config, source, cache, &tx, key.code, key.modifiers);
                            }
                            InputMode::Filter => {
                                handle_filter_mode(app, key.code);
                            }
                            InputMode::ConfirmDelete => {
                                handle_confirm_mode(app, key.code);
                            }
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle key events in normal mode
fn handle_normal_mode(
    app: &mut App,
    config: &Config,
    source: &DocumentSource,
    cache: &FallbackCache,
    tx: &mpsc::Sender<RefreshOutcome>,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    // Clear status message on navigation keys
    match code {
        KeyCode::Char('j')
        | KeyCode::Char('k')
        | KeyCode::Up
        | KeyCode::Down
        | KeyCode::Char('g')
        | KeyCode::Char('G') => {
            app.status_message = None;
        }
        _ => {}
    }

    // Clear pending 'g' if timeout expired (500ms)
    if let Some(time) = app.pending_g {
        if time.elapsed() > Duration::from_millis(500) {
            app.pending_g = None;
        }
    }

    match code {
        // Quit
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Navigation
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
        }

        // gg: jump to first (vim-style double tap)
        KeyCode::Char('g') => {
            if app.pending_g.take().is_some() {
                app.move_to_first();
            } else {
                app.pending_g = Some(std::time::Instant::now());
            }
        }
        KeyCode::Char('G') => {
            app.move_to_last();
        }

        // Detail pane scrolling
        KeyCode::PageDown => {
            app.detail_scroll = app.detail_scroll.saturating_add(5);
        }
        KeyCode::PageUp => {
            app.detail_scroll = app.detail_scroll.saturating_sub(5);
        }

        // Enter: open dataset page in browser
        KeyCode::Enter => {
            let url = app
                .current_record()
                .and_then(|r| r.dataset_url.clone());
            match url {
                Some(url) => {
                    if let Err(e) = open::that(&url) {
                        app.set_status(format!("Failed to open browser: {}", e));
                    } else {
                        app.set_status(format!("Opened {}", url));
                    }
                }
                None => app.set_status("No URL for this dataset"),
            }
        }

        // Manual refresh (no-op while one is in flight)
        KeyCode::Char('r') => {
            if !app.refresh_in_flight {
                app.refresh_in_flight = true;
                app.set_status("Refreshing...");
                spawn_refresh(source, cache, tx);
            }
        }

        // Delete from view (asks for confirmation)
        KeyCode::Char('d') => {
            app.request_delete();
        }

        // Copy collection to clipboard
        KeyCode::Char('y') => {
            app.copy_collection();
        }

        // Exports
        KeyCode::Char('J') => {
            app.export_collection(ExportFormat::Json, &config.effective_export_dir());
        }
        KeyCode::Char('C') => {
            app.export_collection(ExportFormat::Csv, &config.effective_export_dir());
        }
        KeyCode::Char('M') => {
            app.export_collection(ExportFormat::Markdown, &config.effective_export_dir());
        }

        // Filter
        KeyCode::Char('/') => {
            app.enter_filter_mode();
        }

        // Help
        KeyCode::Char('?') => {
            app.toggle_help();
        }

        _ => {}
    }
}

/// Handle key events in filter mode
fn handle_filter_mode(app: &mut App, code: KeyCode) {
    match code {
        // Esc: drop the filter and go back
        KeyCode::Esc => {
            app.clear_filter();
        }
        // Enter: keep the filter applied
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.delete_char();
        }
        KeyCode::Char(c) => {
            app.insert_char(c);
        }
        _ => {}
    }
}

/// Handle key events in the delete confirmation modal
fn handle_confirm_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.confirm_delete();
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.cancel_delete();
        }
        _ => {}
    }
}

/// Initialize file-based logging for TUI mode
///
/// Writes to {data_dir}/debug.log (or config log_file) instead of the
/// terminal, which the TUI owns.
fn init_tui_logging(config: &Config) {
    // Only log if PHYSIDASH_LOG is set
    let Ok(log_level) = std::env::var("PHYSIDASH_LOG") else {
        return;
    };

    // Determine log file path
    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(|| config.data_dir.join("debug.log"));

    // Create log file
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "physidash_core={},physidash_cli={}",
        log_level, log_level
    ));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
