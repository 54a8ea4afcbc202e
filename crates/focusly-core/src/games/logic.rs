//! Number series game.
//!
//! Ten rounds of arithmetic sequences: four terms are shown, the player
//! picks the fifth from four options. A correct answer is worth ten points;
//! the first wrong answer ends the run, surviving all ten rounds wins it.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_pcg::Mcg128Xsl64;

use crate::games::{play_seconds, rng_from_seed, BrainGameScore, GameType, Outcome};

const ROUNDS: u32 = 10;
const POINTS_PER_ROUND: u32 = 10;

pub struct LogicGame {
    rng: Mcg128Xsl64,
    pattern: [u32; 4],
    options: [u32; 4],
    correct: u32,
    score: u32,
    round: u32,
    game_over: bool,
    won: bool,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl LogicGame {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        Self {
            rng: rng_from_seed(seed),
            pattern: [0; 4],
            options: [0; 4],
            correct: 0,
            score: 0,
            round: 1,
            game_over: false,
            won: false,
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

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn pattern(&self) -> &[u32; 4] {
        &self.pattern
    }

    /// Answer options, one of which continues the series.
    pub fn options(&self) -> &[u32; 4] {
        &self.options
    }

    pub fn correct_answer(&self) -> u32 {
        self.correct
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    // ── Commands ─────────────────────────────────────────────

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.score = 0;
        self.round = 1;
        self.game_over = false;
        self.won = false;
        self.started_at = Some(now);
        self.ended_at = None;
        self.next_round();
    }

    pub fn answer(&mut self, value: u32, now: DateTime<Utc>) -> Outcome {
        if !self.active() || self.game_over {
            return Outcome::Ignored;
        }

        if value != self.correct {
            self.game_over = true;
            self.ended_at = Some(now);
            return Outcome::Ended;
        }

        self.score += POINTS_PER_ROUND;
        if self.round >= ROUNDS {
            // All ten rounds cleared; the counter stays at ten.
            self.game_over = true;
            self.won = true;
            self.ended_at = Some(now);
            Outcome::Ended
        } else {
            self.round += 1;
            self.next_round();
            Outcome::Solved
        }
    }

    pub fn end(&mut self, now: DateTime<Utc>) -> Option<BrainGameScore> {
        let started_at = self.started_at.take()?;
        let duration = play_seconds(started_at, self.ended_at, now);
        // Max score grows with the rounds reached, ten points apiece.
        let record = BrainGameScore::record(
            GameType::Logic,
            self.score,
            self.round * POINTS_PER_ROUND,
            duration,
            now,
        );

        self.pattern = [0; 4];
        self.options = [0; 4];
        self.correct = 0;
        self.score = 0;
        self.round = 1;
        self.game_over = false;
        self.won = false;
        self.ended_at = None;

        Some(record)
    }

    fn next_round(&mut self) {
        let start = self.rng.gen_range(1..=10u32);
        let step = self.rng.gen_range(1..=5u32);

        self.pattern = [start, start + step, start + 2 * step, start + 3 * step];
        self.correct = start + 4 * step;

        self.options = [
            self.correct,
            self.correct + step,
            self.correct - step,
            self.correct + self.rng.gen_range(1..=10),
        ];
        self.options.shuffle(&mut self.rng);
    }
}

impl Default for LogicGame {
    fn default() -> Self {
        Self::new()
    }
}
