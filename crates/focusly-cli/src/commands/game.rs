//! Interactive brain-game sessions on the terminal.
//!
//! The engines are turn-based; for the countdown games the seconds spent
//! thinking between prompts are fed back as ticks, so the clock runs on wall
//! time just like in the app.

use std::io::{self, BufRead, Write};

use chrono::Utc;
use clap::Subcommand;
use focusly_core::games::{
    AttentionGame, BrainGameScore, GameType, LogicGame, MemoryGame, Outcome, SpeedGame, COLORS,
};
use focusly_core::stats::TimeRange;
use focusly_core::storage::Database;

#[derive(Subcommand)]
pub enum GameAction {
    /// List the available games
    List,
    /// Play a game
    Play {
        /// Game: memory, attention, logic or speed
        game: String,
        /// Seed the randomness for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Per-game play volume and average scores
    Scores {
        /// Reporting window: 7d, 30d or 90d
        #[arg(long, default_value = "30d")]
        range: String,
    },
}

fn read_line() -> Option<String> {
    let mut buf = String::new();
    match io::stdin().lock().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn play_memory(seed: Option<u64>) -> Option<BrainGameScore> {
    let mut game = match seed {
        Some(seed) => MemoryGame::with_seed(seed),
        None => MemoryGame::new(),
    };
    game.start(Utc::now());
    println!("Repeat the sequence. Colors: 1=red 2=blue 3=green 4=yellow.");

    'game: loop {
        let shown: Vec<&str> = game
            .sequence()
            .iter()
            .map(|&i| COLORS[i as usize])
            .collect();
        println!("Watch: {}", shown.join(" "));
        game.begin_input();
        println!("Type it back (numbers 1-4, space separated):");

        let Some(line) = read_line() else { break };
        if line.is_empty() {
            break;
        }
        for token in line.split_whitespace() {
            let click = match token.parse::<u8>() {
                Ok(n @ 1..=4) => n - 1,
                _ => {
                    println!("Only numbers 1-4 count; ending the run.");
                    break 'game;
                }
            };
            match game.click(click, Utc::now()) {
                Outcome::Ended => {
                    println!("Wrong color! Final score {}.", game.score());
                    break 'game;
                }
                Outcome::Solved => {
                    println!("Level up! Score {}.", game.score());
                    continue 'game;
                }
                _ => {}
            }
        }
    }
    game.end(Utc::now())
}

fn play_attention(seed: Option<u64>) -> Option<BrainGameScore> {
    let mut game = match seed {
        Some(seed) => AttentionGame::with_seed(seed),
        None => AttentionGame::new(),
    };
    game.start(Utc::now());
    println!("Type the target color as fast as you can. 30 seconds on the clock.");

    let mut last = Utc::now();
    while !game.over() {
        println!(
            "Find: {:<8} Board: {}   [{}s left, score {}, round {}]",
            game.target(),
            game.board().join(" "),
            game.time_left(),
            game.score(),
            game.round()
        );

        let Some(line) = read_line() else { break };
        let now = Utc::now();
        let mut thinking = (now - last).num_seconds().max(0);
        last = now;
        while thinking > 0 && !game.over() {
            game.tick(now);
            thinking -= 1;
        }
        if game.over() {
            println!("Time's up! Final score {}.", game.score());
            break;
        }
        if line.is_empty() {
            break;
        }
        if !game.board().contains(&line.as_str()) {
            println!("No such color on the board.");
            continue;
        }
        match game.click(&line, now) {
            Outcome::Solved => println!("Hit!"),
            Outcome::Missed => println!("That was not it, -2."),
            _ => {}
        }
    }
    game.end(Utc::now())
}

fn play_logic(seed: Option<u64>) -> Option<BrainGameScore> {
    let mut game = match seed {
        Some(seed) => LogicGame::with_seed(seed),
        None => LogicGame::new(),
    };
    game.start(Utc::now());
    println!("Complete the number series. Ten correct answers win the game.");

    while !game.over() {
        let p = game.pattern();
        println!("Round {}: {} {} {} {} ?", game.round(), p[0], p[1], p[2], p[3]);
        for (i, option) in game.options().iter().enumerate() {
            println!("  {}) {option}", i + 1);
        }
        print!("Your answer (1-4): ");
        let _ = io::stdout().flush();

        let Some(line) = read_line() else { break };
        if line.is_empty() {
            break;
        }
        let pick = match line.parse::<usize>() {
            Ok(n @ 1..=4) => n,
            _ => {
                println!("Pick an option between 1 and 4.");
                continue;
            }
        };
        let correct = game.correct_answer();
        let value = game.options()[pick - 1];
        match game.answer(value, Utc::now()) {
            Outcome::Solved => println!("Correct! Score {}.", game.score()),
            Outcome::Ended if game.won() => println!("All ten solved. Perfect run!"),
            Outcome::Ended => println!("Wrong, it was {correct}. Final score {}.", game.score()),
            _ => {}
        }
    }
    game.end(Utc::now())
}

fn play_speed(seed: Option<u64>) -> Option<BrainGameScore> {
    let mut game = match seed {
        Some(seed) => SpeedGame::with_seed(seed),
        None => SpeedGame::new(),
    };
    game.start(Utc::now());
    println!("Solve as many as you can. 60 seconds on the clock.");

    let mut last = Utc::now();
    while !game.over() {
        println!(
            "{} = ?   [{}s left, score {}]",
            game.equation(),
            game.time_left(),
            game.score()
        );

        let Some(line) = read_line() else { break };
        let now = Utc::now();
        let mut thinking = (now - last).num_seconds().max(0);
        last = now;
        while thinking > 0 && !game.over() {
            game.tick(now);
            thinking -= 1;
        }
        if game.over() {
            println!("Time's up! {} solved, final score {}.", game.solved(), game.score());
            break;
        }
        if line.is_empty() {
            break;
        }
        match game.submit(&line, now) {
            Outcome::Solved => {}
            Outcome::Missed => println!("No, -1. Same one again:"),
            _ => {}
        }
    }
    game.end(Utc::now())
}

pub fn run(action: GameAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        GameAction::List => {
            for game_type in GameType::ALL {
                println!("{:<10} {}", game_type.as_str(), game_type.title());
            }
        }
        GameAction::Play { game, seed } => {
            let game_type: GameType = game.parse()?;
            let score = match game_type {
                GameType::Memory => play_memory(seed),
                GameType::Attention => play_attention(seed),
                GameType::Logic => play_logic(seed),
                GameType::Speed => play_speed(seed),
            };
            match score {
                Some(score) => {
                    let db = Database::open()?;
                    let mut snapshot = db.load_snapshot()?;
                    snapshot.brain_game_scores.push(score.clone());
                    db.save_snapshot(&snapshot)?;
                    println!("{}", serde_json::to_string_pretty(&score)?);
                }
                None => println!("Nothing to record; the game never started."),
            }
        }
        GameAction::Scores { range } => {
            let range: TimeRange = range.parse()?;
            let db = Database::open()?;
            let snapshot = db.load_snapshot()?;
            let summaries =
                focusly_core::stats::game_summaries(&snapshot, range.days(), Utc::now());
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
    }
    Ok(())
}
