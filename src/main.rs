//! Blast puzzle runner (default binary).
//!
//! `blast-puzzle` plays interactively in the terminal using crossterm for
//! input and the framebuffer renderer for output. `blast-puzzle autoplay`
//! runs the greedy bot headless and logs each turn.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use serde::Serialize;

use blast_puzzle::cli::{parse_args, resolve_config, Mode};
use blast_puzzle::core::BoardSnapshot;
use blast_puzzle::engine::{Autoplay, PlaySession, SessionSnapshot};
use blast_puzzle::input::{handle_key_event, should_quit};
use blast_puzzle::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blast_puzzle::types::BoardConfig;

/// Delay between cascade stages so falls and spawns are visible.
const CASCADE_STEP_MS: u64 = 90;
/// Input poll timeout while idle.
const IDLE_POLL_MS: u64 = 250;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;
    let mut config = resolve_config(&cli, |key| std::env::var(key).ok())?;
    if config.seed.is_none() {
        config.seed = Some(clock_seed());
    }

    match cli.mode {
        Mode::Play => play(config),
        Mode::Autoplay { moves, json } => autoplay(config, moves, json),
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn play(config: BoardConfig) -> Result<()> {
    let mut session = PlaySession::new(config);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.leave();

    println!(
        "[Board] seed {} score {} moves {} shuffles {}",
        session.engine().seed(),
        session.score(),
        session.moves(),
        session.shuffles()
    );
    result
}

fn run(term: &mut TerminalRenderer, session: &mut PlaySession) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = SessionSnapshot::default();

    let step = Duration::from_millis(CASCADE_STEP_MS);
    let idle = Duration::from_millis(IDLE_POLL_MS);
    let mut last_step = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.present(&mut fb)?;

        let timeout = if session.is_busy() {
            step.checked_sub(last_step.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0))
        } else {
            idle
        };

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(command) = handle_key_event(key) {
                        // Refusals are reported through the session status line.
                        let _ = session.apply(command);
                        last_step = Instant::now();
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if session.is_busy() && last_step.elapsed() >= step {
            last_step = Instant::now();
            // An unresolved shuffle leaves the session playing with a NoMoves status.
            session.advance();
        }
    }
}

#[derive(Debug, Serialize)]
struct AutoplayReport {
    seed: u32,
    turns: u32,
    score: u32,
    moves: u32,
    shuffles: u32,
    board: BoardSnapshot,
}

fn autoplay(config: BoardConfig, moves: u32, json: bool) -> Result<()> {
    let mut session = PlaySession::new(config);
    let mut bot = Autoplay::new();

    println!(
        "[Autoplay] seed {} board {}x{} colors {}",
        session.engine().seed(),
        session.engine().rows(),
        session.engine().columns(),
        session.engine().color_count()
    );

    while bot.turns() < moves {
        let Some(report) = bot.play_turn(&mut session) else {
            // Only reachable when the board has no move; try one manual shuffle.
            match session.shuffle_now() {
                Ok(shuffle) if shuffle.resolved => {
                    println!("[Board] stuck board reshuffled");
                    continue;
                }
                _ => {
                    eprintln!("[Board] no moves left after shuffle, stopping");
                    break;
                }
            }
        };

        println!(
            "[Autoplay] turn {} blast {} cells of color {} +{} score {} (fell {}, spawned {})",
            report.turn,
            report.blast.size,
            report.blast.color,
            report.blast.points,
            report.score,
            report.cascade.fell,
            report.cascade.spawned
        );
        if report.cascade.unresolved {
            eprintln!("[Board] shuffle could not produce a move");
        } else if report.cascade.shuffles > 0 {
            println!("[Board] deadlock resolved by shuffle");
        }
    }

    println!(
        "[Autoplay] done: {} turns, score {}, shuffles {}",
        bot.turns(),
        session.score(),
        session.shuffles()
    );

    if json {
        let report = AutoplayReport {
            seed: session.engine().seed(),
            turns: bot.turns(),
            score: session.score(),
            moves: session.moves(),
            shuffles: session.shuffles(),
            board: session.engine().snapshot(),
        };
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}
