//! Tender Rescue headless runner
//!
//! Plays one session at the fixed driver step, logs what happens and prints
//! the final snapshot as JSON. `RUST_LOG` controls verbosity.

use std::error::Error;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use tender_rescue::sim::{GameEvent, GameStatus, Session};
use tender_rescue::{Autopilot, Difficulty, Settings, format_time_left, time_running_low};

#[derive(Parser, Debug)]
#[command(name = "tender-rescue", version, about = "Finish the tender before the deadline")]
struct Args {
    /// easy, normal or hard
    #[arg(short, long, default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,

    /// Player name (blank uses the default)
    #[arg(short, long, default_value = "")]
    name: String,

    /// JSON settings file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// RNG seed, overrides the settings file
    #[arg(long)]
    seed: Option<u64>,

    /// Let the session run without anyone swatting
    #[arg(long)]
    no_autopilot: bool,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn log_event(now_ms: u64, event: &GameEvent) {
    match event {
        GameEvent::StatusChanged { status, score } => {
            log::info!("[{}ms] {:?} (score {})", now_ms, status, score)
        }
        GameEvent::BossArrived { .. } | GameEvent::BossDismissed { .. } | GameEvent::BossLeft { .. } => {
            log::info!("[{}ms] {:?}", now_ms, event)
        }
        GameEvent::BossTaunt { message, .. } => log::info!("[{}ms] Boss: {}", now_ms, message),
        _ => log::debug!("[{}ms] {:?}", now_ms, event),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let seed = args.seed.unwrap_or_else(|| settings.seed_or(clock_seed()));
    log::info!("Tender Rescue (headless) starting with seed {}", seed);

    let mut session = Session::new(seed, settings.viewport);
    let mut autopilot = Autopilot::new(settings.autopilot.clone());
    let autopilot_on = autopilot.settings().enabled && !args.no_autopilot;

    session.return_to_setup()?;
    session.begin(&args.name, args.difficulty)?;

    let mut last_time_left = session.state().time_left;
    while session.status() == GameStatus::Playing {
        session.advance_by(settings.step_ms);
        if autopilot_on {
            autopilot.act(&mut session);
        }
        for event in session.drain_events() {
            log_event(session.now_ms(), &event);
        }

        let time_left = session.state().time_left;
        if time_left != last_time_left {
            last_time_left = time_left;
            if time_left % 10 == 0 || time_running_low(time_left) {
                let warning = if time_running_low(time_left) { " (hurry)" } else { "" };
                log::info!(
                    "{}{} left, tender {:.1}%",
                    format_time_left(time_left),
                    warning,
                    session.state().progress
                );
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    Ok(())
}
