use std::fs::OpenOptions;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Command as Process, ExitCode, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use assessly_core::{html, Outcome, RecommendResponse, Session};
use assessly_service::{outcome_from, HttpService, RecommendService};
use assessly_tui::app::App;
use assessly_tui::config::{Cli, Command, Format};
use assessly_tui::report;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::runtime::Runtime;
use tracing::{error, info};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref(), cli.command.is_none())?;

    let runtime = Runtime::new().context("failed to create tokio runtime")?;
    let service = HttpService::with_timeout(&cli.api_base, cli.timeout())?;
    info!("service: {}", service.base_url());

    match cli.command {
        None => {
            let app = App::new(Arc::new(service), runtime.handle().clone(), cli.mode());
            run_tui(app)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Health) => {
            runtime.block_on(service.health_check())?;
            println!("ok");
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Query { ref text, format }) => {
            let text = if text.is_empty() {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read job description from stdin")?;
                buf
            } else {
                text.join(" ")
            };
            runtime.block_on(run_query(&service, &text, format, &cli))
        }
    }
}

fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    );

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        // Anything written to the terminal would tear the UI.
        None if interactive => builder.with_writer(io::sink).init(),
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

/// Exit status for a job description that was empty after trimming.
const EMPTY_QUERY_EXIT: u8 = 2;

async fn run_query(
    service: &HttpService,
    text: &str,
    format: Format,
    cli: &Cli,
) -> Result<ExitCode> {
    let mut session = Session::new(cli.mode());
    let pending = match session.begin(text) {
        Ok(pending) => pending,
        Err(e) => {
            eprintln!("{}", e.alert());
            return Ok(ExitCode::from(EMPTY_QUERY_EXIT));
        }
    };

    let outcome = outcome_from(service.recommend(&pending.query).await);
    let failed = outcome == Outcome::Failed;

    if let (Format::Json, Outcome::Loaded(items)) = (format, &outcome) {
        let response = RecommendResponse::new(items.clone());
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    session.complete(pending.token, outcome);
    let table = &session.view().table;
    match format {
        Format::Html => print!("{}", html::render_tbody(table)),
        Format::Text => print!("{}", report::render_text(table)),
        Format::Json => {}
    }

    if failed {
        bail!("recommendation request failed");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_tui(app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if let Some(url) = app.open_request.take() {
            if let Err(e) = open_url(&url) {
                error!("failed to open {url}: {e}");
                app.set_status(format!("Could not open link: {e}"));
            }
            continue;
        }

        // Poll with a timeout while a request is in flight, block otherwise
        let event = if app.needs_polling() {
            let ready = event::poll(Duration::from_millis(100))?;
            app.poll_responses();
            if ready {
                Some(event::read()?)
            } else {
                None
            }
        } else {
            Some(event::read()?)
        };

        if let Some(Event::Key(key)) = event {
            if app.is_quit_key(&key) {
                break;
            }
            app.handle_key(key);
        }
    }

    Ok(())
}

/// Hand a link to the platform's default browser.
fn open_url(url: &str) -> Result<()> {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };
    Process::new(opener)
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start {opener}"))?;
    info!("opened {url} with {opener}");
    Ok(())
}
