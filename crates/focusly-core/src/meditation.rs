//! Guided meditation sessions.
//!
//! Three programs (breathing, mindfulness, body scan), each with a fixed set
//! of allowed durations. The caller drives a [`MeditationTimer`] with
//! once-per-second ticks; breathing sessions additionally walk an
//! inhale-hold-exhale cycle. The timer hands back the finished
//! [`MeditationSession`] record exactly once, whether the session ran out
//! naturally or was ended early.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeditationKind {
    Breathing,
    Mindfulness,
    BodyScan,
}

impl MeditationKind {
    pub const ALL: [MeditationKind; 3] = [
        MeditationKind::Breathing,
        MeditationKind::Mindfulness,
        MeditationKind::BodyScan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeditationKind::Breathing => "breathing",
            MeditationKind::Mindfulness => "mindfulness",
            MeditationKind::BodyScan => "body-scan",
        }
    }

    pub fn program(&self) -> &'static MeditationProgram {
        &PROGRAMS[*self as usize]
    }
}

impl std::fmt::Display for MeditationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MeditationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "breathing" => Ok(MeditationKind::Breathing),
            "mindfulness" => Ok(MeditationKind::Mindfulness),
            "body-scan" => Ok(MeditationKind::BodyScan),
            other => Err(format!("unknown meditation type: {other}")),
        }
    }
}

pub struct MeditationProgram {
    pub kind: MeditationKind,
    pub title: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    /// Allowed session lengths in minutes.
    pub durations: &'static [u32],
    pub instructions: &'static [&'static str],
}

/// Indexed by [`MeditationKind`] discriminant.
pub static PROGRAMS: [MeditationProgram; 3] = [
    MeditationProgram {
        kind: MeditationKind::Breathing,
        title: "Guided Breathing",
        description: "Breathing exercises to reduce stress",
        emoji: "🫁",
        durations: &[3, 5, 10, 15],
        instructions: &[
            "Settle in comfortably with your back straight",
            "Close your eyes or fix a point in front of you",
            "Breathe in slowly through your nose for 4 seconds",
            "Hold your breath for 4 seconds",
            "Breathe out slowly through your mouth for 6 seconds",
            "Repeat the cycle, focusing on your breath",
        ],
    },
    MeditationProgram {
        kind: MeditationKind::Mindfulness,
        title: "Mindfulness",
        description: "Mindfulness meditation for the present moment",
        emoji: "🧘‍♀️",
        durations: &[5, 10, 15, 20],
        instructions: &[
            "Sit in a comfortable position",
            "Close your eyes and take three deep breaths",
            "Bring your attention to your natural breathing",
            "Observe sensations without judging them",
            "When your mind wanders, gently bring it back to the breath",
            "Stay present in each moment",
        ],
    },
    MeditationProgram {
        kind: MeditationKind::BodyScan,
        title: "Body Scan",
        description: "Progressive relaxation of the whole body",
        emoji: "🌊",
        durations: &[10, 15, 20, 25],
        instructions: &[
            "Lie down comfortably on your back",
            "Close your eyes and breathe naturally",
            "Start by bringing attention to your feet",
            "Move gradually up toward your head",
            "Release each part of your body",
            "Feel the relaxation spread through your whole being",
        ],
    },
];

/// A named breathing rhythm, in seconds per phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathingPattern {
    pub key: &'static str,
    pub name: &'static str,
    pub inhale: u32,
    pub hold: u32,
    pub exhale: u32,
}

pub static BREATHING_PATTERNS: [BreathingPattern; 4] = [
    BreathingPattern { key: "4-4-6", name: "Relaxation", inhale: 4, hold: 4, exhale: 6 },
    BreathingPattern { key: "4-7-8", name: "Sleep", inhale: 4, hold: 7, exhale: 8 },
    BreathingPattern { key: "6-2-6", name: "Balance", inhale: 6, hold: 2, exhale: 6 },
    BreathingPattern { key: "4-4-4", name: "Focus", inhale: 4, hold: 4, exhale: 4 },
];

impl BreathingPattern {
    pub fn find(key: &str) -> Option<&'static BreathingPattern> {
        BREATHING_PATTERNS.iter().find(|p| p.key == key)
    }

    pub fn default_pattern() -> &'static BreathingPattern {
        &BREATHING_PATTERNS[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
}

impl BreathPhase {
    pub fn label(&self) -> &'static str {
        match self {
            BreathPhase::Inhale => "Breathe in",
            BreathPhase::Hold => "Hold",
            BreathPhase::Exhale => "Breathe out",
        }
    }
}

/// Walks inhale, hold and exhale phases of a [`BreathingPattern`], counting
/// completed cycles.
#[derive(Debug, Clone)]
pub struct BreathingCycle {
    pattern: BreathingPattern,
    phase: BreathPhase,
    phase_left: u32,
    cycle: u32,
}

impl BreathingCycle {
    pub fn new(pattern: BreathingPattern) -> Self {
        Self {
            phase: BreathPhase::Inhale,
            phase_left: pattern.inhale,
            cycle: 0,
            pattern,
        }
    }

    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    /// Seconds left in the current phase.
    pub fn phase_left(&self) -> u32 {
        self.phase_left
    }

    /// Completed full cycles, starting at zero.
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn pattern(&self) -> &BreathingPattern {
        &self.pattern
    }

    /// Advance one second, rolling into the next phase when the current one
    /// is exhausted.
    pub fn tick(&mut self) {
        if self.phase_left > 1 {
            self.phase_left -= 1;
            return;
        }
        match self.phase {
            BreathPhase::Inhale => {
                self.phase = BreathPhase::Hold;
                self.phase_left = self.pattern.hold;
            }
            BreathPhase::Hold => {
                self.phase = BreathPhase::Exhale;
                self.phase_left = self.pattern.exhale;
            }
            BreathPhase::Exhale => {
                self.phase = BreathPhase::Inhale;
                self.phase_left = self.pattern.inhale;
                self.cycle += 1;
            }
        }
    }
}

/// One recorded meditation session, wire-compatible with the app snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeditationSession {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MeditationKind,
    /// Minutes.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub date: DateTime<Utc>,
    pub completed: bool,
}

/// A running meditation session.
pub struct MeditationTimer {
    kind: MeditationKind,
    time_left: u32,
    total_seconds: u32,
    playing: bool,
    breathing: Option<BreathingCycle>,
    pending: Option<MeditationSession>,
}

impl MeditationTimer {
    /// Begin a session. The duration must be one of the program's allowed
    /// lengths; the breathing pattern applies only to breathing sessions and
    /// defaults to 4-4-6.
    pub fn start(
        kind: MeditationKind,
        duration_minutes: u32,
        pattern: Option<&BreathingPattern>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let program = kind.program();
        if !program.durations.contains(&duration_minutes) {
            return Err(ValidationError::InvalidValue {
                field: "duration".into(),
                message: format!(
                    "{duration_minutes} minutes is not offered by {}; choose one of {:?}",
                    kind, program.durations
                ),
            }
            .into());
        }

        let breathing = (kind == MeditationKind::Breathing).then(|| {
            BreathingCycle::new(*pattern.unwrap_or_else(|| BreathingPattern::default_pattern()))
        });

        Ok(Self {
            kind,
            time_left: duration_minutes * 60,
            total_seconds: duration_minutes * 60,
            playing: true,
            breathing,
            pending: Some(MeditationSession {
                id: Uuid::new_v4().to_string(),
                kind,
                duration_minutes,
                date: now,
                completed: false,
            }),
        })
    }

    // ── Queries ──────────────────────────────────────────────

    pub fn kind(&self) -> MeditationKind {
        self.kind
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    pub fn done(&self) -> bool {
        self.time_left == 0
    }

    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        f64::from(self.total_seconds - self.time_left) / f64::from(self.total_seconds) * 100.0
    }

    pub fn breathing(&self) -> Option<&BreathingCycle> {
        self.breathing.as_ref()
    }

    // ── Commands ─────────────────────────────────────────────

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        if !self.done() {
            self.playing = true;
        }
    }

    /// One second of session time. Returns the completed record on the tick
    /// that finishes the session.
    pub fn tick(&mut self) -> Option<MeditationSession> {
        if !self.playing || self.done() {
            return None;
        }

        self.time_left -= 1;
        if let Some(cycle) = &mut self.breathing {
            cycle.tick();
        }

        if self.time_left == 0 {
            self.playing = false;
            return self.take_record();
        }
        None
    }

    /// Stop early. The session still counts as completed, matching how the
    /// app records sessions ended by hand.
    pub fn end(&mut self) -> Option<MeditationSession> {
        self.playing = false;
        self.take_record()
    }

    fn take_record(&mut self) -> Option<MeditationSession> {
        let mut record = self.pending.take()?;
        record.completed = true;
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn kinds_use_kebab_case_wire_names() {
        assert_eq!(
            serde_json::to_string(&MeditationKind::BodyScan).unwrap(),
            "\"body-scan\""
        );
        assert_eq!("body-scan".parse::<MeditationKind>().unwrap(), MeditationKind::BodyScan);
        assert!("yoga".parse::<MeditationKind>().is_err());
    }

    #[test]
    fn programs_offer_expected_durations() {
        assert_eq!(MeditationKind::Breathing.program().durations, &[3, 5, 10, 15]);
        assert_eq!(MeditationKind::Mindfulness.program().durations, &[5, 10, 15, 20]);
        assert_eq!(MeditationKind::BodyScan.program().durations, &[10, 15, 20, 25]);
        for kind in MeditationKind::ALL {
            assert_eq!(kind.program().kind, kind);
            assert_eq!(kind.program().instructions.len(), 6);
        }
    }

    #[test]
    fn pattern_lookup_by_key() {
        let sleep = BreathingPattern::find("4-7-8").unwrap();
        assert_eq!(sleep.name, "Sleep");
        assert_eq!((sleep.inhale, sleep.hold, sleep.exhale), (4, 7, 8));
        assert!(BreathingPattern::find("9-9-9").is_none());
        assert_eq!(BreathingPattern::default_pattern().key, "4-4-6");
    }

    #[test]
    fn breathing_cycle_walks_phases() {
        let mut cycle = BreathingCycle::new(*BreathingPattern::find("4-4-6").unwrap());
        assert_eq!(cycle.phase(), BreathPhase::Inhale);
        assert_eq!(cycle.phase_left(), 4);

        for _ in 0..4 {
            cycle.tick();
        }
        assert_eq!(cycle.phase(), BreathPhase::Hold);
        assert_eq!(cycle.phase_left(), 4);

        for _ in 0..4 {
            cycle.tick();
        }
        assert_eq!(cycle.phase(), BreathPhase::Exhale);
        assert_eq!(cycle.phase_left(), 6);

        for _ in 0..6 {
            cycle.tick();
        }
        assert_eq!(cycle.phase(), BreathPhase::Inhale);
        assert_eq!(cycle.cycle(), 1);
    }

    #[test]
    fn rejects_duration_outside_program() {
        assert!(MeditationTimer::start(MeditationKind::Breathing, 7, None, t0()).is_err());
        assert!(MeditationTimer::start(MeditationKind::BodyScan, 3, None, t0()).is_err());
        assert!(MeditationTimer::start(MeditationKind::BodyScan, 10, None, t0()).is_ok());
    }

    #[test]
    fn session_completes_after_duration() {
        let mut timer = MeditationTimer::start(MeditationKind::Breathing, 3, None, t0()).unwrap();
        assert!(timer.breathing().is_some());

        let mut record = None;
        for _ in 0..180 {
            if let Some(r) = timer.tick() {
                record = Some(r);
            }
        }

        let record = record.expect("session should complete");
        assert!(record.completed);
        assert_eq!(record.kind, MeditationKind::Breathing);
        assert_eq!(record.duration_minutes, 3);
        assert!(timer.done());
        assert_eq!(timer.progress(), 100.0);

        // Completion is emitted exactly once.
        assert!(timer.tick().is_none());
        assert!(timer.end().is_none());
    }

    #[test]
    fn early_end_still_records_completed() {
        let mut timer =
            MeditationTimer::start(MeditationKind::Mindfulness, 5, None, t0()).unwrap();
        assert!(timer.breathing().is_none());

        for _ in 0..30 {
            timer.tick();
        }
        let record = timer.end().expect("ending should record");
        assert!(record.completed);
        assert_eq!(record.duration_minutes, 5);
        assert!(timer.end().is_none());
    }

    #[test]
    fn pause_stops_the_clock() {
        let mut timer = MeditationTimer::start(MeditationKind::Breathing, 3, None, t0()).unwrap();
        timer.tick();
        assert_eq!(timer.time_left(), 179);

        timer.pause();
        assert!(timer.tick().is_none());
        assert_eq!(timer.time_left(), 179);

        timer.resume();
        timer.tick();
        assert_eq!(timer.time_left(), 178);
    }

    #[test]
    fn session_record_wire_format() {
        let mut timer = MeditationTimer::start(MeditationKind::BodyScan, 10, None, t0()).unwrap();
        let record = timer.end().unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "body-scan");
        assert_eq!(json["duration"], 10);
        assert_eq!(json["completed"], true);
    }
}
