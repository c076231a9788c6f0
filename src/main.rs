//! # Widgetbook CLI Entry Point
//!
//! Starts the component gallery in the terminal.
//!
//! ## Usage
//!
//! ```bash
//! # Browse the built-in gallery
//! widgetbook
//!
//! # Use another theme and write logs to a file
//! widgetbook --theme nord --log-file /tmp/widgetbook.log --log-level debug
//!
//! # Print the registered entries and exit
//! widgetbook --list
//!
//! # Remember a theme in the config file
//! widgetbook --theme dracula --save-config
//! ```
//!
//! ## Key Bindings
//!
//! ### Anywhere
//! - `q` / `Ctrl+C` - Quit (closes the help screen first when it is open)
//! - `?` - Show/hide help
//! - `Tab` - Switch focus between list and preview
//! - `Esc` - Close help, or return focus to the list
//!
//! ### List (left panel)
//! - `j` / `Down`, `k` / `Up` - Move selection (loads the component under the cursor)
//! - `g` / `Home`, `G` / `End` - Jump to first / last entry
//! - `l` / `Right` - Expand group
//! - `h` / `Left` - Collapse group, or jump to the parent group
//! - `Enter` / `Space` - Toggle group, or focus the preview on a component
//!
//! ### Preview (right panel)
//! - Every other key and mouse event goes to the loaded component

use widgetbook::host::isolate::install_panic_hook;
use widgetbook::registry::{EntryTree, RegistryBuilder};
use widgetbook::samples;
use widgetbook::ui;
use widgetbook::ui::config::Config;
use widgetbook::ui::theme::Theme;
use widgetbook::ui::App;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming a log file when `--log-file` is not given.
const LOG_FILE_ENV: &str = "WIDGETBOOK_LOG";

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(event::read().context("Failed to read terminal event")?))
        } else {
            Ok(None)
        }
    }
}

/// Widgetbook - browse and drive terminal widgets live
#[derive(Parser, Debug)]
#[command(name = "widgetbook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A terminal component gallery", long_about = None)]
struct Args {
    /// Config file to use instead of the platform default
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Theme name (overrides the config file)
    #[arg(short, long, value_name = "NAME")]
    theme: Option<String>,

    /// Write logs to this file (defaults to $WIDGETBOOK_LOG)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `widgetbook::host=trace`
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log_level: String,

    /// Print the registered entries and exit
    #[arg(long)]
    list: bool,

    /// Skip commands listed in the config file
    #[arg(long)]
    no_commands: bool,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Restore the terminal on host panics; component panics are contained.
    install_panic_hook(|| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    });

    run_application(args).await
}

async fn run_application(args: Args) -> Result<()> {
    if args.save_config {
        let path = save_config(&args)?;
        println!("Saved config to {}", path.display());
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;

    let log_file = args
        .log_file
        .clone()
        .or_else(|| std::env::var_os(LOG_FILE_ENV).map(PathBuf::from));
    if let Some(path) = &log_file {
        init_logging(path, &args.log_level)?;
    }

    let theme = resolve_theme(args.theme.as_deref().unwrap_or(&config.theme));
    let tree = build_registry(&config, args.no_commands);

    if args.list {
        print!("{}", format_tree(&tree));
        return Ok(());
    }

    info!(entries = tree.count(), theme = theme.name, "starting gallery");

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(tree, theme, config.sidebar_width());
    let mut event_reader = CrosstermEventReader;
    let run_result = start_and_run(&mut terminal, &mut app, &mut event_reader).await;

    // Stop any bridged program before the terminal is handed back.
    app.preview.unload();

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(&mut terminal);

    run_result?;
    cleanup_result?;

    info!("gallery closed");
    Ok(())
}

/// Size the panes, load the first entry and run the loop.
async fn start_and_run<B>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_reader: &mut dyn EventReader,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let size = terminal.size().context("Failed to read terminal size")?;
    app.resize(size.width, size.height);
    app.start();
    run_app(terminal, app, event_reader).await
}

async fn run_app<B>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_reader: &mut dyn EventReader,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    loop {
        // Due timers and bridged output are applied here, on the render loop only.
        app.on_idle(Instant::now());

        terminal
            .draw(|f| ui::render(f, app))
            .context("Failed to draw terminal UI")?;

        let poll_timeout = app.poll_timeout(Instant::now());
        if let Some(event) = event_reader.read_event(poll_timeout)? {
            app.handle_event(&event);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Load the explicit config file (errors are fatal) or the platform default
/// (errors fall back to defaults).
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            anyhow::ensure!(path.exists(), "Config file not found: {}", path.display());
            Config::load_from(path)
        }
        None => Ok(Config::load()),
    }
}

/// Write the config file back with `--theme` applied, creating it if missing.
fn save_config(args: &Args) -> Result<PathBuf> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let mut config = Config::load_from(&path)?;
    if let Some(name) = &args.theme {
        config.theme = resolve_theme(name).name.to_string();
    }
    config.save_to(&path)?;
    Ok(path)
}

fn resolve_theme(name: &str) -> &'static Theme {
    Theme::by_name(name).unwrap_or_else(|| {
        let fallback = Theme::default_theme();
        eprintln!(
            "Warning: unknown theme '{}', using '{}'",
            name, fallback.name
        );
        fallback
    })
}

fn build_registry(config: &Config, skip_commands: bool) -> EntryTree {
    let mut registry = RegistryBuilder::new();
    samples::register_gallery(&mut registry);
    if !skip_commands {
        samples::register_commands(&mut registry, &config.commands);
    }
    registry.build()
}

/// One line per entry, indented by depth, with every group expanded.
fn format_tree(tree: &EntryTree) -> String {
    let mut out = String::new();
    for row in tree.flatten() {
        let marker = if row.entry.is_group() { "▼ " } else { "" };
        let _ = writeln!(
            out,
            "{}{}{}",
            "  ".repeat(row.depth),
            marker,
            row.entry.name()
        );
    }
    out
}

fn init_logging(path: &Path, level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();

    Ok(())
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}
