//! Terminal battle runner (default binary).
//!
//! Usage: `battle-tetro [CONFIG.toml]`. The config path may also come from
//! `BATTLE_TETRO_CONFIG`; `BATTLE_TETRO_PLAYERS` and `BATTLE_TETRO_SEED`
//! override single keys. Logs go to `BATTLE_TETRO_LOG` (default
//! `battle-tetro.log`) and are filtered with `RUST_LOG`.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing_subscriber::EnvFilter;

use battle_tetro::core::{GameConfig, GameRound, RoundSnapshot, RoundStatus, RoutedEvent};
use battle_tetro::input::{route_key, should_quit, ReleaseTracker};
use battle_tetro::term::{BattleView, FrameBuffer, Terminal, Viewport};
use battle_tetro::types::{ControlScheme, TICK_MS};

const DEFAULT_LOG_PATH: &str = "battle-tetro.log";

fn main() -> Result<()> {
    init_tracing()?;
    let config = load_config()?;
    let mut round = GameRound::new(config, Duration::ZERO).context("invalid configuration")?;

    let mut term = Terminal::new();
    term.enter()?;
    let result = run(&mut term, &mut round);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        tracing::error!(error = %err, "exiting with error");
    }
    result
}

fn init_tracing() -> Result<()> {
    let path = std::env::var_os("BATTLE_TETRO_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config() -> Result<GameConfig> {
    let path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("BATTLE_TETRO_CONFIG"))
        .map(PathBuf::from);

    let mut config = match path {
        Some(path) => {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config = GameConfig::from_toml(&source)
                .with_context(|| format!("loading {}", path.display()))?;
            tracing::info!(path = %path.display(), "loaded configuration");
            config
        }
        None => GameConfig::default(),
    };

    // Environment variable overrides
    if let Ok(players) = std::env::var("BATTLE_TETRO_PLAYERS") {
        config.players = players
            .parse()
            .with_context(|| format!("BATTLE_TETRO_PLAYERS={players}"))?;
    }
    if let Ok(seed) = std::env::var("BATTLE_TETRO_SEED") {
        config.seed = Some(
            seed.parse()
                .with_context(|| format!("BATTLE_TETRO_SEED={seed}"))?,
        );
    }
    Ok(config)
}

fn run(term: &mut Terminal, round: &mut GameRound) -> Result<()> {
    let clock = Instant::now();
    let tick = Duration::from_millis(TICK_MS as u64);

    let view = BattleView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = RoundSnapshot::default();

    let schemes: Vec<ControlScheme> = round.sessions().iter().map(|s| s.controls()).collect();
    // Terminals without release reporting only send presses and repeats.
    let synthesize_releases = !term.release_events();
    let mut tracker = ReleaseTracker::new();
    let mut events: Vec<RoutedEvent> = Vec::with_capacity(16);

    let mut last_tick = Instant::now();
    let mut status = RoundStatus::Running;

    loop {
        // Render.
        let (w, h) = term.size()?;
        round.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input until the next tick is due.
        loop {
            let timeout = tick.saturating_sub(last_tick.elapsed());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        tracing::info!("quit requested");
                        return Ok(());
                    }
                    if status != RoundStatus::Running {
                        // Paused or over: any key press continues.
                        if key.kind == KeyEventKind::Press {
                            let now = clock.elapsed();
                            if status == RoundStatus::Paused {
                                round.resume(now);
                            } else {
                                round.restart(now);
                            }
                            tracker.reset();
                            events.clear();
                            status = RoundStatus::Running;
                        }
                        continue;
                    }
                    let now = clock.elapsed();
                    for (player, event) in route_key(key, &schemes) {
                        let event = if synthesize_releases {
                            tracker.observe(player, event, now)
                        } else {
                            Some(event)
                        };
                        if let Some(event) = event {
                            events.push(RoutedEvent::new(player, event));
                        }
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }
        last_tick = Instant::now();

        // Tick.
        let now = clock.elapsed();
        if synthesize_releases {
            for (player, event) in tracker.expire(now) {
                events.push(RoutedEvent::new(player, event));
            }
        }
        let next = round.step(now, &events);
        events.clear();
        if next != status {
            tracing::debug!(from = ?status, to = ?next, "round status changed");
            status = next;
        }
    }
}
