//! Brain-training mini games.
//!
//! Four small engines share one shape: construct ([`MemoryGame::new`] or the
//! seeded variant for reproducible runs), `start`, feed player input, and
//! finally `end` to collect a [`BrainGameScore`]. Ending resets the engine to
//! pristine so it can be reused; a run that was never started records nothing.
//!
//! Countdown games (attention, speed) are advanced by a once-per-second
//! `tick` from the caller, mirroring how the timer engine is driven.

mod attention;
mod logic;
mod memory;
mod speed;

pub use attention::AttentionGame;
pub use logic::LogicGame;
pub use memory::{MemoryGame, MemoryPhase};
pub use speed::SpeedGame;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Colors on the attention board. The memory board uses the first four.
pub const COLORS: [&str; 6] = ["red", "blue", "green", "yellow", "purple", "orange"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Memory,
    Attention,
    Logic,
    Speed,
}

impl GameType {
    pub const ALL: [GameType; 4] = [
        GameType::Memory,
        GameType::Attention,
        GameType::Logic,
        GameType::Speed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Memory => "memory",
            GameType::Attention => "attention",
            GameType::Logic => "logic",
            GameType::Speed => "speed",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameType::Memory => "Memory Sequence",
            GameType::Attention => "Color Focus",
            GameType::Logic => "Number Series",
            GameType::Speed => "Quick Math",
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "memory" => Ok(GameType::Memory),
            "attention" => Ok(GameType::Attention),
            "logic" => Ok(GameType::Logic),
            "speed" => Ok(GameType::Speed),
            other => Err(format!("unknown game type: {other}")),
        }
    }
}

/// Result of one player input or clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Correct intermediate step; the round continues.
    Accepted,
    /// Completed a round or answer; score awarded.
    Solved,
    /// Wrong input; penalty applied, play continues.
    Missed,
    /// The run just ended.
    Ended,
    /// Input arrived while the game was not accepting any.
    Ignored,
}

/// One finished game run, as persisted in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrainGameScore {
    pub id: String,
    pub game_type: GameType,
    pub score: u32,
    pub max_score: u32,
    pub date: DateTime<Utc>,
    /// Seconds of play, frozen at game over.
    #[serde(rename = "duration")]
    pub duration_secs: u32,
}

impl BrainGameScore {
    pub(crate) fn record(
        game_type: GameType,
        score: u32,
        max_score: u32,
        duration_secs: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            game_type,
            score,
            max_score,
            date: now,
            duration_secs,
        }
    }
}

pub(crate) fn rng_from_seed(seed: Option<u64>) -> Mcg128Xsl64 {
    match seed {
        Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
        None => Mcg128Xsl64::from_entropy(),
    }
}

/// Seconds of play between `started_at` and game over (or `now` while the
/// run is still live).
pub(crate) fn play_seconds(
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> u32 {
    let end = ended_at.unwrap_or(now);
    (end - started_at).num_seconds().clamp(0, i64::from(u32::MAX)) as u32
}
