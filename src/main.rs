mod ui;

use std::{
    io::{self, stdin},
    sync::mpsc::Receiver,
};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use tracing::{info, warn};

use typesprint::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, ModeKind},
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    story::{FixedStoryProvider, RetryingProvider, StoryError, StoryProvider, WordListProvider},
    time_series::WpmHistory,
    Key, Session, Status, StatusChange,
};

/// terminal typing trainer with live wpm and accuracy
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A terminal typing trainer. Type a generated story against the clock (time mode) or to the end (words mode) and watch speed and accuracy as you go."
)]
pub struct Cli {
    /// words mode: number of words in the story (e.g. 10, 25, 50, 100)
    #[clap(short = 'w', long)]
    words: Option<usize>,

    /// time mode: seconds on the clock (e.g. 15, 30, 45, 60); wins over --words
    #[clap(short = 's', long)]
    secs: Option<u64>,

    /// add capitals, commas and sentence endings
    #[clap(long)]
    punctuation: bool,

    /// mix numbers into the story
    #[clap(long)]
    numbers: bool,

    /// put the whole alphabet somewhere in the story
    #[clap(long)]
    alphabet: bool,

    /// forget stored punctuation/numbers/alphabet preferences for this run
    #[clap(long, conflicts_with_all = ["punctuation", "numbers", "alphabet"])]
    plain: bool,

    /// type this text instead of a generated story
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// seed for story generation, for repeatable stories
    #[clap(long)]
    seed: Option<String>,

    /// remember the resulting options as the new defaults
    #[clap(long)]
    save: bool,

    /// log filter, e.g. "debug" or "typesprint=trace" (RUST_LOG wins)
    #[clap(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Layer the command line over the stored preferences
    fn resolve(&self, mut config: Config) -> Config {
        if let Some(words) = self.words {
            config.mode = ModeKind::Words;
            config.number_of_words = words;
        }
        if let Some(secs) = self.secs {
            config.mode = ModeKind::Time;
            config.number_of_secs = secs;
        }
        if self.plain {
            config.punctuation = false;
            config.numbers = false;
            config.alphabet = false;
        }
        config.punctuation |= self.punctuation;
        config.numbers |= self.numbers;
        config.alphabet |= self.alphabet;
        config
    }

    fn provider(&self) -> Result<Box<dyn StoryProvider>, StoryError> {
        Ok(match &self.prompt {
            Some(prompt) => Box::new(FixedStoryProvider::new(prompt.clone())),
            None => Box::new(RetryingProvider::new(WordListProvider::english()?)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub config: Config,
    pub session: Session,
    pub history: WpmHistory,
    pub last_error: Option<String>,
    provider: Box<dyn StoryProvider>,
    seed: String,
    stories: usize,
    status_rx: Receiver<StatusChange>,
}

impl App {
    pub fn new(
        config: Config,
        provider: Box<dyn StoryProvider>,
        seed: Option<String>,
    ) -> Result<Self, StoryError> {
        let seed = seed.unwrap_or_else(|| Local::now().format("%Y%m%d%H%M%S%f").to_string());
        let request = config.story_request(format!("{seed}-0"));
        let story = provider.generate(&request)?;

        let mut session = Session::new(story.story, config.session_mode());
        let status_rx = session.subscribe();

        Ok(Self {
            config,
            session,
            history: WpmHistory::new(),
            last_error: None,
            provider,
            seed,
            stories: 1,
            status_rx,
        })
    }

    /// Type the same text again
    pub fn replay(&mut self) {
        self.session.reset(None);
        self.history.clear();
        self.last_error = None;
    }

    /// Ask for a fresh story; on failure the current session stays as it is
    pub fn new_story(&mut self) -> Result<(), StoryError> {
        let request = self
            .config
            .story_request(format!("{}-{}", self.seed, self.stories));

        match self.provider.generate(&request) {
            Ok(story) => {
                self.stories += 1;
                self.session.reset(Some(story.story));
                self.history.clear();
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "keeping current story");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Forward a clock tick, unless the session has nothing armed
    pub fn on_tick(&mut self) {
        if self.session.tickers().is_armed() {
            let snapshot = self.session.tick();
            self.history.record(&snapshot);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if ctrl => return Control::Quit,
            KeyCode::Char('r') if ctrl => {
                self.replay();
                return Control::Continue;
            }
            KeyCode::Char('n') if ctrl => {
                // a failure is logged and kept in last_error
                self.new_story().ok();
                return Control::Continue;
            }
            _ => {}
        }

        if self.session.status() == Status::Finished {
            match key.code {
                KeyCode::Char('r') => self.replay(),
                KeyCode::Char('n') => {
                    self.new_story().ok();
                }
                _ => {}
            }
            return Control::Continue;
        }

        let snapshot = self.session.apply_key(Key::from(key));
        self.history.record(&snapshot);
        Control::Continue
    }

    /// Status changes since the last call
    pub fn drain_status(&mut self) -> Vec<StatusChange> {
        self.status_rx.try_iter().collect()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init(&path, cli.log_level.as_deref()) {
            eprintln!("logging disabled: {e}");
        }
    }

    let store = FileConfigStore::new();
    let config = cli.resolve(store.load());
    if cli.save {
        store
            .save(&config)
            .with_context(|| format!("saving preferences to {}", store.path().display()))?;
    }

    let provider = cli.provider().context("setting up story generation")?;
    let mut app = App::new(config, provider, cli.seed.clone()).context("generating a story")?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::every_second());

    loop {
        terminal.draw(|f| ui(app, f))?;

        let control = match runner.step() {
            AppEvent::Tick => {
                app.on_tick();
                Control::Continue
            }
            AppEvent::Resize => Control::Continue,
            AppEvent::Key(key) => app.handle_key(key),
        };

        if control == Control::Quit {
            break;
        }

        for change in app.drain_status() {
            info!(from = %change.from, to = %change.to, "session status");
            // the first second is counted from the first keystroke
            if change.to == Status::Running {
                runner.restart_ticks();
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
