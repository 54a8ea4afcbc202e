//! Color focus game.
//!
//! Thirty seconds on the clock. Each round names a target color somewhere on
//! a shuffled six-color board; finding it scores more the more time is left,
//! a wrong pick costs two points. Every pick, right or wrong, deals a fresh
//! round.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_pcg::Mcg128Xsl64;

use crate::games::{play_seconds, rng_from_seed, BrainGameScore, GameType, Outcome, COLORS};

const ROUND_SECONDS: u32 = 30;
const MAX_SCORE: u32 = 100;

pub struct AttentionGame {
    rng: Mcg128Xsl64,
    target: &'static str,
    board: [&'static str; 6],
    time_left: u32,
    score: u32,
    round: u32,
    game_over: bool,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl AttentionGame {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        Self {
            rng: rng_from_seed(seed),
            target: COLORS[0],
            board: COLORS,
            time_left: ROUND_SECONDS,
            score: 0,
            round: 1,
            game_over: false,
            started_at: None,
            ended_at: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────

    pub fn active(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn over(&self) -> bool {
        self.game_over
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn board(&self) -> &[&'static str; 6] {
        &self.board
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    // ── Commands ─────────────────────────────────────────────

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.time_left = ROUND_SECONDS;
        self.score = 0;
        self.round = 1;
        self.game_over = false;
        self.started_at = Some(now);
        self.ended_at = None;
        self.next_round();
    }

    /// One second of clock. Returns `Some(Ended)` on the tick that exhausts
    /// the countdown.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Outcome> {
        if !self.active() || self.game_over {
            return None;
        }
        if self.time_left <= 1 {
            self.time_left = 0;
            self.game_over = true;
            self.ended_at = Some(now);
            Some(Outcome::Ended)
        } else {
            self.time_left -= 1;
            None
        }
    }

    /// Player picks a color from the board.
    pub fn click(&mut self, color: &str, _now: DateTime<Utc>) -> Outcome {
        if !self.active() || self.game_over {
            return Outcome::Ignored;
        }

        if color == self.target {
            // Faster finds are worth more, never less than one point.
            self.score += (self.time_left / 3).max(1);
            self.round += 1;
            self.next_round();
            Outcome::Solved
        } else {
            self.score = self.score.saturating_sub(2);
            self.next_round();
            Outcome::Missed
        }
    }

    pub fn end(&mut self, now: DateTime<Utc>) -> Option<BrainGameScore> {
        let started_at = self.started_at.take()?;
        let duration = play_seconds(started_at, self.ended_at, now);
        let record =
            BrainGameScore::record(GameType::Attention, self.score, MAX_SCORE, duration, now);

        self.time_left = ROUND_SECONDS;
        self.score = 0;
        self.round = 1;
        self.game_over = false;
        self.ended_at = None;

        Some(record)
    }

    // Target is drawn before the board is shuffled, so a seeded run is
    // fully reproducible from the queries alone.
    fn next_round(&mut self) {
        self.target = COLORS[self.rng.gen_range(0..COLORS.len())];
        self.board = COLORS;
        self.board.shuffle(&mut self.rng);
    }
}

impl Default for AttentionGame {
    fn default() -> Self {
        Self::new()
    }
}
