mod app;
mod ui;

use crate::{app::App, ui::screen::current_screen};
use chrono::Utc;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use itertools::Itertools;
use keyrace::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    history::HistoryLog,
    leaderboard::Leaderboard,
    passage::MAX_CUSTOM_CHARS,
    runtime::{
        AppEvent, Clock, CrosstermEventSource, EventSource, FixedTicker, Runner, SystemClock,
        Ticker,
    },
    store::{KeyValueStore, ProgressStore},
    Difficulty, WordDifficulty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::{
    error::Error,
    fs::{self, File},
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// race a simulated typist in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing race against an AI opponent, with a persistent top-10 leaderboard."
)]
pub struct Cli {
    /// speed of the AI opponent
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// vocabulary tier used for generated passages
    #[clap(short = 'w', long, value_enum)]
    word_difficulty: Option<WordDifficulty>,

    /// custom passage to type instead of generated text
    #[clap(short = 't', long, value_parser = parse_custom_text)]
    text: Option<String>,

    /// number of seconds per race
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    secs: Option<u32>,

    /// path of the progress database (leaderboard and sound preference)
    #[clap(long)]
    db: Option<PathBuf>,

    /// print the leaderboard and exit
    #[clap(long)]
    leaderboard: bool,

    /// remove every leaderboard entry and exit
    #[clap(long)]
    clear_leaderboard: bool,
}

fn parse_custom_text(s: &str) -> Result<String, String> {
    let len = s.chars().count();
    if len > MAX_CUSTOM_CHARS {
        return Err(format!(
            "custom text is {len} characters, the limit is {MAX_CUSTOM_CHARS}"
        ));
    }
    Ok(s.to_string())
}

impl Cli {
    /// Layer the command line flags over the persisted config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(word_difficulty) = self.word_difficulty {
            config.word_difficulty = word_difficulty;
        }
        if let Some(secs) = self.secs {
            config.session_secs = secs;
        }
        config
    }

    fn db_path(&self) -> PathBuf {
        self.db
            .clone()
            .or_else(AppDirs::db_path)
            .unwrap_or_else(|| PathBuf::from("keyrace.db"))
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&path) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }
}

fn leaderboard_report<S: KeyValueStore>(store: &ProgressStore<S>) -> String {
    let board = Leaderboard::new(store);
    let entries = board.entries();
    if entries.is_empty() {
        return "No results yet.".to_string();
    }

    let mut lines = vec![ui::leaderboard::HEADER.iter().join("\t")];
    lines.extend(
        entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| ui::leaderboard::entry_cells(idx + 1, entry).iter().join("\t")),
    );
    if let Some(summary) = board.summary() {
        lines.push(String::new());
        lines.push(ui::leaderboard::summary_line(&summary));
    }
    lines.join("\n")
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let store = ProgressStore::open(cli.db_path())?;

    if cli.clear_leaderboard {
        Leaderboard::new(&store).clear()?;
        println!("Leaderboard cleared.");
        return Ok(());
    }
    if cli.leaderboard {
        println!("{}", leaderboard_report(&store));
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let config = cli.apply(config_store.load());
    let history = AppDirs::history_path().map(HistoryLog::new);
    let mut app = App::new(config, cli.text.clone(), store, history, SystemClock);
    log::info!(
        "keyrace starting: {} / {}",
        app.config.difficulty,
        app.config.word_difficulty
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let outcome = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    outcome?;

    // only the tier choices carry over to the next launch
    let mut saved = config_store.load();
    saved.difficulty = app.config.difficulty;
    saved.word_difficulty = app.config.word_difficulty;
    if let Err(e) = config_store.save(&saved) {
        log::warn!("failed to save config: {e}");
    }

    Ok(())
}

fn start_tui<B, E, T, S, C>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, C>,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    E: EventSource,
    T: Ticker,
    S: KeyValueStore,
    C: Clock,
{
    loop {
        terminal.draw(|f| ui(&*app, f))?;

        match runner.step_until(app.next_deadline()) {
            AppEvent::Key(key) => app.on_key(key),
            AppEvent::Resize | AppEvent::Tick => {}
        }

        app.on_tick(Utc::now());
        if app.take_bell() {
            let mut stdout = io::stdout();
            execute!(stdout, Print('\u{7}'))?;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn ui<S: KeyValueStore, C: Clock>(app: &App<S, C>, f: &mut Frame) {
    current_screen::<S, C>(app.state).render(app, f);
}
