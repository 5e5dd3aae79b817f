//! focusblocks terminal runner (default binary).
//!
//! Loads config and saved state, then runs the board and the ranked task
//! list in one screen. It uses crossterm for input and a custom
//! framebuffer-based renderer. Logs go to a file because stdout belongs to
//! the renderer.

use std::fs::{self, OpenOptions};
use std::io::{self, Stdout};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use focusblocks::app::App;
use focusblocks::config::Config;
use focusblocks::engine::Session;
use focusblocks::input::{handle_entry_key, handle_key_event};
use focusblocks::store::Store;
use focusblocks::term::{GameView, Screen, Viewport};

fn main() -> Result<()> {
    let (config, config_err) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    init_logging(&config.log_path())?;
    if let Some(err) = config_err {
        warn!(%err, "config unusable, running with defaults");
    }

    let store = Store::new(config.state_path());
    let profile = store
        .load(config.weights)
        .with_context(|| format!("loading state from {}", store.path().display()))?;

    let rng = match config.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut app = App::new(Session::new(config.session_config(), profile, rng));

    let mut screen = Screen::new(io::stdout(), GameView::default());
    screen.enter()?;

    let result = run(&mut screen, &mut app, &store, config.tick_interval());

    if let Err(err) = screen.leave() {
        warn!(%err, "could not restore terminal");
    }

    store
        .save(app.session().profile())
        .with_context(|| format!("saving state to {}", store.path().display()))?;
    info!("bye");
    result
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}

fn run(
    screen: &mut Screen<Stdout>,
    app: &mut App<fastrand::Rng>,
    store: &Store,
    tick_duration: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();
    let mut redraw = true;

    loop {
        if redraw {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            let ranked = app.session().ranked();
            screen.present(&app.view_state(&ranked), Viewport::new(w, h))?;
            redraw = false;
        }

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                // No key-repeat handling of our own, so held keys repeat as presses.
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if app.is_entering() {
                        if let Some(entry) = handle_entry_key(key) {
                            app.handle_entry(entry);
                        }
                    } else if let Some(command) = handle_key_event(key) {
                        app.handle(command);
                    }
                    redraw = true;
                }
                Event::Resize(_, _) => {
                    screen.force_repaint();
                    redraw = true;
                }
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            app.tick();
            redraw = true;
        }

        if app.take_dirty() {
            if let Err(err) = store.save(app.session().profile()) {
                warn!(%err, "could not save state");
            }
        }
    }
}
