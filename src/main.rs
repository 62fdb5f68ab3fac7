//! Flapper headless runner
//!
//! Plays rounds with the autopilot at the configured tick rate and reports
//! the results. Rendering and real input belong to a front end; this binary
//! exists to exercise and tune the simulation.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;

use flapper::sim::{CrashCause, GameState, Phase, RoundEvent, TickInput, tick};
use flapper::highscores::HighScoreEntry;
use flapper::{Preset, Settings};

#[derive(Parser)]
#[command(name = "flapper")]
#[command(about = "Run Flapper rounds headlessly with the autopilot")]
struct Args {
    /// Session seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Rounds to play
    #[arg(long, default_value_t = 5)]
    rounds: u32,

    /// Give up on a round after this many ticks
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u64,

    /// Settings JSON file (missing fields use defaults)
    #[arg(long)]
    config: Option<String>,

    /// Difficulty preset applied on top of the settings (easy, normal, hard)
    #[arg(long)]
    preset: Option<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct RoundSummary {
    round: u32,
    score: u32,
    ticks: u64,
    /// None when the round hit the tick limit
    cause: Option<CrashCause>,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    preset: Preset,
    best_score: u32,
    rounds: Vec<RoundSummary>,
    leaderboard: Vec<HighScoreEntry>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path).with_context(|| format!("loading {path}"))?,
        None => Settings::default(),
    };
    if let Some(name) = &args.preset {
        let preset = Preset::from_str(name).ok_or_else(|| anyhow!("unknown preset '{name}'"))?;
        settings.apply_preset(preset);
    }

    let summary = run(&args, settings)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Seed {}  preset {}", summary.seed, summary.preset.as_str());
        for r in &summary.rounds {
            let cause = r
                .cause
                .map(|c| format!("{c:?}"))
                .unwrap_or_else(|| "tick limit".to_string());
            println!(
                "  round {:>3}: score {:>4}  ticks {:>6}  ({})",
                r.round, r.score, r.ticks, cause
            );
        }
        println!("Best score: {}", summary.best_score);
        for (place, e) in summary.leaderboard.iter().enumerate() {
            println!(
                "  #{:<2} {:>4} (round {}, {:?})",
                place + 1,
                e.score,
                e.round,
                e.cause
            );
        }
    }

    Ok(())
}

fn run(args: &Args, settings: Settings) -> Result<RunSummary> {
    if args.rounds == 0 {
        return Err(anyhow!("rounds must be > 0"));
    }

    let tick_ms = settings.tick_ms();
    let preset = settings.preset;
    let mut state = GameState::new(args.seed, settings).context("invalid settings")?;
    let mut rounds = Vec::with_capacity(args.rounds as usize);
    let mut clock_ticks: u64 = 0;

    log::info!("Playing {} rounds (seed {})", args.rounds, args.seed);

    for _ in 0..args.rounds {
        let mut cause = None;
        let mut restart = state.phase == Phase::Over;

        for _ in 0..args.max_ticks {
            let input = TickInput {
                restart,
                now_ms: (clock_ticks as f64 * tick_ms) as u64,
                autopilot: true,
                ..Default::default()
            };
            restart = false;
            clock_ticks += 1;

            let snapshot = tick(&mut state, &input);
            cause = snapshot.events.iter().find_map(|e| match e {
                RoundEvent::Crashed { cause } => Some(*cause),
                _ => None,
            });
            if cause.is_some() {
                break;
            }
        }

        rounds.push(RoundSummary {
            round: state.round,
            score: state.score,
            ticks: state.time_ticks,
            cause,
        });

        if cause.is_none() {
            log::warn!(
                "Round {} survived {} ticks; stopping run",
                state.round,
                args.max_ticks
            );
            break;
        }
    }

    Ok(RunSummary {
        seed: args.seed,
        preset,
        best_score: state.best_score.max(state.score),
        rounds,
        leaderboard: state.high_scores.entries().to_vec(),
    })
}
