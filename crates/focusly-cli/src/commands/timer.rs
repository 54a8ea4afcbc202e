use chrono::Utc;
use clap::Subcommand;
use focusly_core::settings::PomodoroSettings;
use focusly_core::storage::Database;
use focusly_core::timer::{SessionType, TimerEngine, TimerStatus};
use tracing::debug;

pub(crate) const ENGINE_KEY: &str = "timer_engine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the selected session
    Start {
        /// Session kind: focus, break or long-break
        #[arg(long)]
        kind: Option<String>,
    },
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Reset to idle, discarding any in-flight session
    Reset,
    /// Switch the session kind while idle
    Switch {
        /// Session kind: focus, break or long-break
        kind: String,
    },
    /// Print current timer state as JSON
    Status,
    /// Run the timer in the foreground until the session completes
    Run {
        /// Session kind to start with: focus, break or long-break
        #[arg(long)]
        kind: Option<String>,
        /// Stop after this many seconds even if the session is still going
        #[arg(long)]
        max_secs: Option<u32>,
    },
}

fn load_engine(db: &Database, settings: &PomodoroSettings) -> TimerEngine {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<TimerEngine>(&json) {
            return engine;
        }
    }
    TimerEngine::new(settings)
}

fn save_engine(db: &Database, engine: &TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;
    let settings = db.load_snapshot()?.settings.pomodoro;
    let mut notifier = super::notifier_from_settings(&db);
    let mut engine = load_engine(&db, &settings);

    // Replay whatever should have happened since the last invocation. A
    // session whose time ran out while no process was alive completes here.
    let now = Utc::now();
    let replayed = engine.catch_up(&mut db, &mut notifier, &settings, now);
    debug!("catch-up replayed {} event(s)", replayed.len());
    for event in &replayed {
        println!("{}", serde_json::to_string_pretty(event)?);
    }

    match action {
        TimerAction::Start { kind } => {
            if let Some(kind) = kind {
                let kind: SessionType = kind.parse()?;
                engine.change_type(kind, &settings, now);
            }
            match engine.start(&settings, now) {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("{}", serde_json::to_string_pretty(&engine.snapshot(now))?),
            }
        }
        TimerAction::Pause => match engine.pause(now) {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("{}", serde_json::to_string_pretty(&engine.snapshot(now))?),
        },
        TimerAction::Resume => match engine.resume(now) {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("{}", serde_json::to_string_pretty(&engine.snapshot(now))?),
        },
        TimerAction::Reset => {
            if let Some(event) = engine.reset(&settings, now) {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Switch { kind } => {
            let kind: SessionType = kind.parse()?;
            match engine.change_type(kind, &settings, now) {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => {
                    save_engine(&db, &engine)?;
                    return Err(format!(
                        "cannot switch session kind while the timer is {}",
                        engine.status()
                    )
                    .into());
                }
            }
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&engine.snapshot(now))?);
        }
        TimerAction::Run { kind, max_secs } => {
            if let Some(kind) = kind {
                let kind: SessionType = kind.parse()?;
                engine.change_type(kind, &settings, now);
            }
            if engine.status() == TimerStatus::Idle {
                if let Some(event) = engine.start(&settings, now) {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                }
            }

            let mut elapsed = 0u32;
            while engine.status() == TimerStatus::Running {
                if let Some(cap) = max_secs {
                    if elapsed >= cap {
                        break;
                    }
                }
                std::thread::sleep(std::time::Duration::from_secs(1));
                elapsed += 1;
                let tick_at = Utc::now();
                if let Some(event) = engine.tick(&mut db, &mut notifier, &settings, tick_at) {
                    eprintln!();
                    println!("{}", serde_json::to_string_pretty(&event)?);
                } else {
                    eprint!(
                        "\r{} {:>4}s remaining ",
                        engine.session_type().label(),
                        engine.remaining_seconds()
                    );
                }
            }
            if engine.status() == TimerStatus::Running {
                eprintln!();
                eprintln!("stopping after {elapsed}s; the session keeps its place");
            }
        }
    }

    save_engine(&db, &engine)?;
    Ok(())
}
