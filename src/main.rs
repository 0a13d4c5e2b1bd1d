mod app;
mod config;
mod engine;
mod error;
mod logging;
mod models;
mod ui;
pub mod utils;
mod worker;

use anyhow::{Context, Result};
use app::App;
use clap::{ArgAction, Parser};
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use engine::SubstitutionEngine;
use models::Mode;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{info, warn};
use worker::Worker;

#[derive(Parser, Debug)]
#[command(name = "garble")]
#[command(version)]
#[command(about = "An input method that helpfully ruins every word you type", long_about = None)]
// disable the default flags so i can customize them manually below
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
#[command(help_template = "\
{name} {version}
{about-section}
{usage-heading} {usage}

{all-args}
")]
struct Cli {
    /// Word map file (default: word_mapping.json in the data directory)
    #[arg(short, long)]
    map: Option<String>,

    /// Model name for generative mode (e.g. "llama3.2:3b")
    #[arg(long)]
    model: Option<String>,

    /// Generation server base URL (e.g. "http://localhost:11434")
    #[arg(long)]
    endpoint: Option<String>,

    /// Garble TEXT once, print it and exit
    #[arg(short, long)]
    text: Option<String>,

    // explicitly move these to a "Flags" heading
    /// Rewrite input with a language model instead of the word map
    #[arg(short, long, default_value_t = false, help_heading = "Flags")]
    ai: bool,

    /// Quit without asking for confirmation
    #[arg(long, default_value_t = false, help_heading = "Flags")]
    no_confirm: bool,

    /// Write debug-level logs
    #[arg(short, long, default_value_t = false, help_heading = "Flags")]
    verbose: bool,

    /// Print help
    #[arg(short, long, action = ArgAction::Help, help_heading = "Flags")]
    help: Option<bool>,

    /// Print version
    #[arg(short = 'V', long, action = ArgAction::Version, help_heading = "Flags")]
    version: Option<bool>,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.ai {
            Mode::Generative
        } else {
            Mode::Dictionary
        }
    }

    /// Command-line values win over file and environment settings.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(map) = &self.map {
            config.mapping.path = Some(map.clone());
        }
        if let Some(model) = &self.model {
            config.generative.model = model.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.generative.endpoint = endpoint.clone();
        }
        if self.no_confirm {
            config.confirm_quit = false;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = config::data_dir().join("garble.log");
    if let Err(e) = logging::init(&log_path, cli.verbose) {
        eprintln!("Warning: logging disabled. Error: {:#}", e);
    }

    let mut app_config = AppConfig::load().unwrap_or_else(|e| {
        warn!("failed to load config, using defaults: {:#}", e);
        eprintln!(
            "Warning: Failed to load config, using defaults. Error: {}",
            e
        );
        AppConfig::default()
    });
    cli.apply(&mut app_config);

    let mut engine = SubstitutionEngine::from_config(cli.mode(), &app_config);
    info!(mode = %engine.mode(), "engine ready");

    if let Some(text) = &cli.text {
        println!("{}", engine.corrupt(text));
        return Ok(());
    }

    let mode = engine.mode();
    let (worker, samples) = Worker::spawn(engine);
    let mut app = App::new(
        mode,
        worker,
        samples,
        app_config.theme,
        app_config.confirm_quit,
    );

    enable_raw_mode().context("could not enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    info!("exiting");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    loop {
        app.poll_worker();
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(std::time::Duration::from_millis(16))? {
            let ev = event::read()?;
            match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                        match key.code {
                            KeyCode::Esc => app.request_quit(),
                            KeyCode::Char('q') if ctrl => app.request_quit(),
                            KeyCode::Char('l') if ctrl => app.clear(),
                            KeyCode::Char('c') if ctrl => app.request_quit(),
                            KeyCode::Char('r') if ctrl => app.reload(),
                            KeyCode::Char(c) if !ctrl => app.on_key(c),
                            KeyCode::Enter => app.on_enter(),
                            KeyCode::Backspace => app.on_backspace(),
                            _ => {}
                        }
                    }
                }
                Event::Paste(text) => app.on_paste(&text),
                Event::Resize(w, h) => {
                    app.resize(w, h);
                }
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
