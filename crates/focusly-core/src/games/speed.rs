//! Quick math game.
//!
//! Sixty seconds of mental arithmetic. Solving an equation scores more when
//! the clock is fuller and deals a new one; a wrong or unparseable answer
//! costs one point and leaves the same equation up. Subtractions are ordered
//! so the result is never negative, multiplications use smaller operands.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand_pcg::Mcg128Xsl64;

use crate::games::{play_seconds, rng_from_seed, BrainGameScore, GameType, Outcome};

const ROUND_SECONDS: u32 = 60;
const MAX_SCORE: u32 = 100;

pub struct SpeedGame {
    rng: Mcg128Xsl64,
    equation: String,
    answer: u32,
    time_left: u32,
    score: u32,
    solved: u32,
    game_over: bool,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl SpeedGame {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(Some(seed))
    }

    fn build(seed: Option<u64>) -> Self {
        Self {
            rng: rng_from_seed(seed),
            equation: String::new(),
            answer: 0,
            time_left: ROUND_SECONDS,
            score: 0,
            solved: 0,
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

    /// The equation to solve, e.g. `"17 - 4"` or `"6 × 9"`.
    pub fn equation(&self) -> &str {
        &self.equation
    }

    pub fn answer(&self) -> u32 {
        self.answer
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Equations solved this run.
    pub fn solved(&self) -> u32 {
        self.solved
    }

    // ── Commands ─────────────────────────────────────────────

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.time_left = ROUND_SECONDS;
        self.score = 0;
        self.solved = 0;
        self.game_over = false;
        self.started_at = Some(now);
        self.ended_at = None;
        self.next_equation();
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

    /// Submit an answer as typed. Anything that does not parse as a number
    /// counts as a wrong answer.
    pub fn submit(&mut self, input: &str, _now: DateTime<Utc>) -> Outcome {
        if !self.active() || self.game_over {
            return Outcome::Ignored;
        }

        if input.trim().parse::<i64>().ok() == Some(i64::from(self.answer)) {
            self.score += (self.time_left / 6).max(1);
            self.solved += 1;
            self.next_equation();
            Outcome::Solved
        } else {
            self.score = self.score.saturating_sub(1);
            Outcome::Missed
        }
    }

    pub fn end(&mut self, now: DateTime<Utc>) -> Option<BrainGameScore> {
        let started_at = self.started_at.take()?;
        let duration = play_seconds(started_at, self.ended_at, now);
        let record = BrainGameScore::record(GameType::Speed, self.score, MAX_SCORE, duration, now);

        self.equation.clear();
        self.answer = 0;
        self.time_left = ROUND_SECONDS;
        self.score = 0;
        self.solved = 0;
        self.game_over = false;
        self.ended_at = None;

        Some(record)
    }

    fn next_equation(&mut self) {
        let a = self.rng.gen_range(1..=20u32);
        let b = self.rng.gen_range(1..=20u32);

        match self.rng.gen_range(0..3u8) {
            0 => {
                self.answer = a + b;
                self.equation = format!("{a} + {b}");
            }
            1 => {
                self.answer = a.abs_diff(b);
                self.equation = format!("{} - {}", a.max(b), a.min(b));
            }
            _ => {
                let a = self.rng.gen_range(1..=10u32);
                let b = self.rng.gen_range(1..=10u32);
                self.answer = a * b;
                self.equation = format!("{a} × {b}");
            }
        }
    }
}

impl Default for SpeedGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn equations_are_well_formed() {
        let mut game = SpeedGame::with_seed(13);
        game.start(t0());

        for _ in 0..50 {
            let parts: Vec<&str> = game.equation().split(' ').collect();
            assert_eq!(parts.len(), 3);
            let lhs: u32 = parts[0].parse().unwrap();
            let rhs: u32 = parts[2].parse().unwrap();
            match parts[1] {
                "+" => assert_eq!(game.answer(), lhs + rhs),
                "-" => {
                    assert!(lhs >= rhs);
                    assert_eq!(game.answer(), lhs - rhs);
                }
                "×" => {
                    assert!(lhs <= 10 && rhs <= 10);
                    assert_eq!(game.answer(), lhs * rhs);
                }
                op => panic!("unexpected operator {op}"),
            }
            game.submit(&game.answer().to_string(), t0());
        }
    }

    #[test]
    fn correct_answer_scores_by_time_left() {
        let mut game = SpeedGame::with_seed(13);
        game.start(t0());

        assert_eq!(game.submit(&game.answer().to_string(), t0()), Outcome::Solved);
        // Full 60 seconds left: 60 / 6 = 10 points.
        assert_eq!(game.score(), 10);
        assert_eq!(game.solved(), 1);

        // With 5 seconds left the bonus floors at 1.
        for _ in 0..55 {
            game.tick(t0());
        }
        assert_eq!(game.time_left(), 5);
        game.submit(&game.answer().to_string(), t0());
        assert_eq!(game.score(), 11);
    }

    #[test]
    fn wrong_answer_keeps_the_equation() {
        let mut game = SpeedGame::with_seed(21);
        game.start(t0());
        let equation = game.equation().to_string();
        let wrong = game.answer() + 1;

        assert_eq!(game.submit(&wrong.to_string(), t0()), Outcome::Missed);
        assert_eq!(game.equation(), equation);
        assert_eq!(game.score(), 0);

        // Same equation is still solvable afterwards.
        assert_eq!(game.submit(&game.answer().to_string(), t0()), Outcome::Solved);
    }

    #[test]
    fn unparseable_input_counts_as_wrong() {
        let mut game = SpeedGame::with_seed(21);
        game.start(t0());
        game.submit(&game.answer().to_string(), t0());
        assert_eq!(game.score(), 10);

        assert_eq!(game.submit("twelve", t0()), Outcome::Missed);
        assert_eq!(game.score(), 9);
        assert_eq!(game.submit("", t0()), Outcome::Missed);
        assert_eq!(game.score(), 8);
    }

    #[test]
    fn countdown_ends_the_run() {
        let mut game = SpeedGame::with_seed(13);
        game.start(t0());

        for _ in 0..59 {
            assert_eq!(game.tick(t0()), None);
        }
        assert_eq!(game.tick(t0()), Some(Outcome::Ended));
        assert!(game.over());
        assert_eq!(game.submit("1", t0()), Outcome::Ignored);

        let record = game.end(t0()).unwrap();
        assert_eq!(record.game_type, GameType::Speed);
        assert_eq!(record.max_score, 100);
        assert!(!game.active());
    }
}
