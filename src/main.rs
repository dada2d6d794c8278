use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::info;

use levelwatch::channel::{FileChannel, PushChannel, StreamChannel, WebSocketChannel};
use levelwatch::config::{Settings, Source};
use levelwatch::render::{Renderer, TimeFormat};
use levelwatch::{events, export, logging, ui, App};

#[derive(Parser, Debug)]
#[command(name = "levelwatch")]
#[command(about = "Live status display for a water-level monitoring station")]
struct Args {
    /// Path to a JSON file holding the latest measurement
    #[arg(short, long, conflicts_with_all = ["connect", "ws"])]
    file: Option<PathBuf>,

    /// Connect to a TCP endpoint for live measurements (host:port)
    #[arg(short, long, conflicts_with_all = ["file", "ws"])]
    connect: Option<String>,

    /// Connect to a WebSocket endpoint for live measurements
    #[arg(short, long, conflicts_with_all = ["file", "connect"])]
    ws: Option<String>,

    /// Settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh interval in milliseconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// How to display measurement timestamps
    #[arg(long, value_enum)]
    time_format: Option<TimeFormat>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Render the measurement file to JSON and exit
    #[arg(short, long, conflicts_with_all = ["connect", "ws"])]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args)?;

    logging::init(settings.log_file.as_deref(), &settings.log_level)?;

    let renderer = Renderer::new(settings.time_format);

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        let path = match settings.source() {
            Source::File(path) => path,
            _ => anyhow::bail!("--export reads a measurement file"),
        };
        return export_to_file(&path, export_path, renderer);
    }

    // Network channels spawn their transport tasks on this runtime
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let channel: Box<dyn PushChannel> = match settings.source() {
        Source::Tcp(addr) => {
            info!(%addr, "using TCP channel");
            Box::new(StreamChannel::connect(&addr, settings.reconnect_policy()))
        }
        Source::WebSocket(url) => {
            info!(%url, "using WebSocket channel");
            Box::new(WebSocketChannel::connect(&url, settings.reconnect_policy()))
        }
        Source::File(path) => {
            info!(path = %path.display(), "using file channel");
            Box::new(FileChannel::new(path))
        }
    };

    run_tui(channel, renderer, settings.refresh_interval())
}

/// Merge CLI flags over the layered settings.
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref()).context("failed to load settings")?;

    if let Some(ref url) = args.ws {
        settings.set_source(Source::WebSocket(url.clone()));
    } else if let Some(ref addr) = args.connect {
        settings.set_source(Source::Tcp(addr.clone()));
    } else if let Some(ref path) = args.file {
        settings.set_source(Source::File(path.clone()));
    }
    if let Some(refresh) = args.refresh {
        settings.refresh_ms = refresh;
    }
    if let Some(time_format) = args.time_format {
        settings.time_format = time_format;
    }
    if let Some(ref log_file) = args.log_file {
        settings.log_file = Some(log_file.clone());
    }

    Ok(settings)
}

/// Run the TUI with the given channel
fn run_tui(
    channel: Box<dyn PushChannel>,
    renderer: Renderer,
    refresh_interval: Duration,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(channel, renderer);
    app.activate();
    let _ = app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 48;
    const MIN_HEIGHT: u16 = 24;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Status region
                Constraint::Min(8),    // Content region
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::dashboard::render(frame, app, chunks[1]);
            ui::common::render_status_bar(frame, app, chunks[2]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }

        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Render a measurement file to JSON without starting the TUI.
///
/// The file is replayed as the first message of a fresh session, so the
/// alert starts from a clean state and the status region reports the
/// initial connecting state.
fn export_to_file(measurement_path: &Path, export_path: &Path, renderer: Renderer) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    export::file_to_file(measurement_path, export_path, renderer, now)?;

    println!("Exported measurement to: {}", export_path.display());
    Ok(())
}
