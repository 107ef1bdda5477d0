use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tracing_subscriber::filter::EnvFilter;

use invaders::app::App;
use invaders::assets::Assets;
use invaders::event::{Event, EventHandler};
use invaders::game::FIXED_DT;
use invaders::ui;

const LOG_FILE: &str = "invaders.log";

#[derive(Parser)]
#[command(name = "invaders")]
#[command(about = "Space Invaders in the terminal")]
struct Args {
    /// Directory for the options, high score and log files
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
    /// Directory holding the sprite assets
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Seed for the invaders' fire pattern (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging(dir: &Path) -> Result<()> {
    // The terminal belongs to the UI, so logs go to a file.
    let path = dir.join(LOG_FILE);
    let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut events = EventHandler::new(Duration::from_secs_f32(FIXED_DT));
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match events.next()? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
        }

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("failed to create {}", args.data_dir.display()))?;
    init_logging(&args.data_dir)?;

    // Without sprites there is nothing to draw; bail before touching the terminal.
    let assets = Assets::load(&args.assets).inspect_err(|e| tracing::error!("{e:#}"))?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut app = App::new(&args.data_dir, assets, seed);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    // Key release events where the terminal supports them; others fall back to key repeat.
    let keyboard_enhanced = execute!(
        stdout,
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok();
    // The push is a plain escape sequence; only a terminal that answers the
    // query will actually send releases.
    app.set_key_releases(keyboard_enhanced && supports_keyboard_enhancement().unwrap_or(false));
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    if keyboard_enhanced {
        let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("terminal error: {e}");
    }
    tracing::info!(score = app.world.score(), "session ended");
    Ok(result?)
}
