//! Memory sequence game.
//!
//! A color sequence (four possible colors, indices `0..4`) is shown to the
//! player, who then reproduces it click by click. Each full reproduction
//! scores the sequence length and extends the sequence by one color; the
//! first wrong click ends the run.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand_pcg::Mcg128Xsl64;

use crate::games::{play_seconds, rng_from_seed, BrainGameScore, GameType, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryPhase {
    /// The sequence is being presented; clicks are ignored.
    Showing,
    /// The player is reproducing the sequence.
    Input,
    Over,
}

pub struct MemoryGame {
    rng: Mcg128Xsl64,
    sequence: Vec<u8>,
    position: usize,
    showing: bool,
    game_over: bool,
    score: u32,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl MemoryGame {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Deterministic sequence generation for replays and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        Self {
            rng: rng_from_seed(seed),
            sequence: Vec::new(),
            position: 0,
            showing: false,
            game_over: false,
            score: 0,
            started_at: None,
            ended_at: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────

    pub fn active(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn phase(&self) -> MemoryPhase {
        if self.game_over {
            MemoryPhase::Over
        } else if self.showing {
            MemoryPhase::Showing
        } else {
            MemoryPhase::Input
        }
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    /// Level equals the current sequence length.
    pub fn level(&self) -> usize {
        self.sequence.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// How long the presentation phase lasts: one second per color plus a
    /// half-second tail.
    pub fn show_duration_ms(&self) -> u64 {
        1000 * self.sequence.len() as u64 + 500
    }

    // ── Commands ─────────────────────────────────────────────

    /// Begin a run with a one-color sequence in the showing phase.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.sequence = vec![self.rng.gen_range(0..4)];
        self.position = 0;
        self.showing = true;
        self.game_over = false;
        self.score = 0;
        self.started_at = Some(now);
        self.ended_at = None;
    }

    /// End the presentation phase and accept player input.
    pub fn begin_input(&mut self) {
        if self.active() && !self.game_over {
            self.showing = false;
        }
    }

    /// Player clicks color `index` (0..4).
    pub fn click(&mut self, index: u8, now: DateTime<Utc>) -> Outcome {
        if !self.active() || self.showing || self.game_over {
            return Outcome::Ignored;
        }

        if self.sequence.get(self.position) != Some(&index) {
            self.game_over = true;
            self.ended_at = Some(now);
            return Outcome::Ended;
        }

        self.position += 1;
        if self.position == self.sequence.len() {
            // Full reproduction: score the length, then grow the sequence
            // and present it again.
            self.score += self.sequence.len() as u32;
            let next = self.rng.gen_range(0..4);
            self.sequence.push(next);
            self.position = 0;
            self.showing = true;
            Outcome::Solved
        } else {
            Outcome::Accepted
        }
    }

    /// Record the run and reset to pristine. `None` if no run was started.
    pub fn end(&mut self, now: DateTime<Utc>) -> Option<BrainGameScore> {
        let started_at = self.started_at.take()?;
        let duration = play_seconds(started_at, self.ended_at, now);
        // Max score doubles the achieved score: the next level would have
        // been worth as much again.
        let record =
            BrainGameScore::record(GameType::Memory, self.score, self.score * 2, duration, now);

        self.sequence.clear();
        self.position = 0;
        self.showing = false;
        self.game_over = false;
        self.score = 0;
        self.ended_at = None;

        Some(record)
    }
}

impl Default for MemoryGame {
    fn default() -> Self {
        Self::new()
    }
}
