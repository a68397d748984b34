use testview::app::{self, AppConfig, AppState};
use testview::browser;
use testview::cli::Cli;
use testview::events::{AppEvent, EventHandler};
use testview::input::{self, Action, InputContext};
use testview::record;
use testview::tui;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

fn setup_verbose_logging() -> Result<()> {
    let state_dir = state_dir();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(file)
        .with_ansi(false)
        .init();
    tracing::info!("testview v{} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn state_dir() -> PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        PathBuf::from(state).join("testview")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("testview")
    } else {
        PathBuf::from("/tmp/testview")
    }
}

fn read_run_list(path: &Path) -> Result<(String, String)> {
    if path == Path::new("-") {
        let mut json = String::new();
        io::stdin()
            .read_to_string(&mut json)
            .map_err(|e| eyre!("Failed to read run list from stdin: {e}"))?;
        Ok(("stdin".to_string(), json))
    } else {
        let json = std::fs::read_to_string(path)
            .map_err(|e| eyre!("Failed to read run list {}: {e}", path.display()))?;
        Ok((path.display().to_string(), json))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    if args.verbose {
        setup_verbose_logging()?;
    }

    let (source, json) = read_run_list(&args.data)?;
    let records = record::parse_records(&json)?;
    tracing::info!(runs = records.len(), %source, "run list loaded");

    let config = AppConfig {
        source,
        open_browser: !args.no_open,
    };
    let mut state = AppState::new(config, records)?;
    if let Some(key) = args.sort.as_deref() {
        state.click_sort_menu_id(key);
    }

    // Restore the terminal before the panic report is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut events = EventHandler::new(Duration::from_millis(app::TICK_RATE_MS));
    let tx = events.sender();

    let result = run_app(&mut terminal, &mut state, &mut events, &tx).await;

    events.stop();
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    events: &mut EventHandler,
    tx: &UnboundedSender<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| tui::render::render(f, state))?;

        state.prune_notifications();
        state.prune_error();

        let Some(event) = events.next().await else {
            return Ok(());
        };
        match event {
            AppEvent::Key(key) => {
                let ctx = InputContext {
                    has_error: state.error.is_some(),
                };
                match input::map_key(key, &ctx) {
                    Action::Quit => state.should_quit = true,
                    Action::DismissError => state.clear_error(),
                    Action::MoveUp => state.move_cursor_up(),
                    Action::MoveDown => state.move_cursor_down(),
                    Action::QuickSelect(n) => state.quick_select(n),
                    Action::ClickRow => state.click_focused_row(),
                    Action::ClickSort(key) => state.click_sort_item(key),
                    Action::ClickViewSummary => state.click_view_summary(),
                    Action::None => {}
                }
                follow_navigations(state, tx);
            }
            AppEvent::Tick => {}
            AppEvent::SummaryOpened(url) => state.notify(format!("Opened {url}")),
            AppEvent::Error(e) => state.set_error(e),
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

fn follow_navigations(state: &mut AppState, tx: &UnboundedSender<AppEvent>) {
    for url in state.take_navigations() {
        if !state.config.open_browser {
            state.notify(format!("Summary: {url}"));
            continue;
        }
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = browser::open_in_browser(&url).await;
            if let Err(e) = &result {
                tracing::warn!(%url, "browser launch failed: {e}");
            }
            if tx.send(AppEvent::summary_launch(url, result)).is_err() {
                tracing::warn!("browser: channel closed");
            }
        });
    }
}
