//! Bridge Battle entry point
//!
//! Native builds run a headless autopilot session and report the outcome.
//! The browser build is driven from JavaScript through `bridge_battle::web`.
//!
//! Usage: `bridge-battle [seed] [tuning.json]` or `bridge-battle --print-tuning`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bridge_battle::highscores::RunRecord;
    use bridge_battle::sim::GameEvent;
    use bridge_battle::{GameDriver, HighScores, Settings, Tuning};

    env_logger::init();
    log::info!("Bridge Battle (native) starting...");

    let mut args = std::env::args().skip(1).peekable();
    if args.peek().is_some_and(|a| a == "--print-tuning") {
        // Starting point for a tuning file
        match Tuning::default().to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Cannot serialize tuning: {}", e),
        }
        return;
    }
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);

    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("Invalid tuning file {}: {}", path, e);
                    std::process::exit(2);
                }
            },
            Err(e) => {
                log::error!("Cannot read {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => Tuning::default(),
    };

    let settings = Settings::load();
    log::debug!("Settings: {:?}", settings);

    let mut driver = GameDriver::new(seed, tuning);
    driver.input.idle_mode = true;

    // Ten simulated minutes at 60 fps is plenty for one run
    let frame_dt = 1.0 / 60.0;
    for _ in 0..(60 * 60 * 10) {
        driver.advance(frame_dt);
        for event in driver.drain_events() {
            match event {
                GameEvent::BossSpawned { archetype } => println!("Boss appears: {:?}", archetype),
                GameEvent::BossPhaseChanged { phase } => println!("Boss phase {}", phase),
                GameEvent::BossDefeated { archetype, score } => {
                    println!("{:?} defeated (+{})", archetype, score)
                }
                GameEvent::SquadEliminated => println!("Squad eliminated"),
                _ => {}
            }
        }
        if driver.is_finished() {
            break;
        }
    }

    let state = &driver.state;
    println!(
        "Result: {:?} | score {} | distance {:.0} | squad {} | {:.1}s simulated",
        state.phase,
        state.score,
        state.squad.anchor.y,
        state.squad.len(),
        state.clock
    );

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0);
    let mut high_scores = HighScores::load();
    if let Some(rank) = high_scores.record(RunRecord::from_state(state, timestamp)) {
        log::info!("Leaderboard rank {}", rank);
        high_scores.save();
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
