//! Game state: the activity level and the countdown timer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::config::SessionConfig;
use super::conversation::Conversation;
use super::notes::CuratorNotes;

/// Lowest activity level.
pub const MIN_ACTIVITY_LEVEL: f64 = 1.0;
/// Highest activity level.
pub const MAX_ACTIVITY_LEVEL: f64 = 10.0;

/// Clamps to `[1, 10]` and rounds to three decimals.
#[must_use]
pub fn normalize_activity_level(level: f64) -> f64 {
    let clamped = level.clamp(MIN_ACTIVITY_LEVEL, MAX_ACTIVITY_LEVEL);
    (clamped * 1000.0).round() / 1000.0
}

/// Activity level and countdown of a running session.
///
/// The timer is computed on demand from the time it was started; nothing
/// ticks in the background.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    activity_level: f64,
    initial_activity_level: f64,
    growth_factor: f64,
    initial_timer: Option<f64>,
    timer_total: Option<f64>,
    timer_started_at: Option<DateTime<Utc>>,
}

impl GameState {
    /// Creates a state at `initial_activity_level`. A timer of `None` or
    /// `<= 0` seconds means the session has no countdown.
    #[must_use]
    pub fn new(
        initial_activity_level: f64,
        growth_factor: f64,
        timer_seconds: Option<f64>,
        now: DateTime<Utc>,
    ) -> Self {
        let initial_timer = timer_seconds.filter(|seconds| *seconds > 0.0);
        Self {
            activity_level: normalize_activity_level(initial_activity_level),
            initial_activity_level,
            growth_factor,
            initial_timer,
            timer_total: initial_timer,
            timer_started_at: initial_timer.map(|_| now),
        }
    }

    /// Creates the state described by `config`.
    #[must_use]
    pub fn from_config(config: &SessionConfig, now: DateTime<Utc>) -> Self {
        Self::new(
            config.initial_activity_level,
            config.activity_growth_factor,
            config.timer_seconds,
            now,
        )
    }

    /// Current activity level, always within `[1, 10]`.
    #[must_use]
    pub fn activity_level(&self) -> f64 {
        self.activity_level
    }

    /// Sets the activity level, clamped and rounded.
    pub fn set_activity_level(&mut self, level: f64) {
        self.activity_level = normalize_activity_level(level);
    }

    /// Applies the per-turn growth.
    pub fn increment_activity(&mut self) {
        self.set_activity_level(self.activity_level + self.growth_factor);
    }

    /// Whether the session was configured with a countdown.
    #[must_use]
    pub fn has_timer(&self) -> bool {
        self.timer_started_at.is_some()
    }

    /// Total countdown length in seconds, including curator adjustments.
    #[must_use]
    pub fn timer_total(&self) -> Option<f64> {
        self.timer_total
    }

    /// Seconds left at `now`, never negative; `None` without a timer.
    #[must_use]
    pub fn remaining_time(&self, now: DateTime<Utc>) -> Option<f64> {
        let started_at = self.timer_started_at?;
        let total = self.timer_total?;
        #[allow(clippy::cast_precision_loss)]
        let elapsed = (now - started_at).num_milliseconds() as f64 / 1000.0;
        Some((total - elapsed).max(0.0))
    }

    /// Moves the timer total by `delta` seconds. Returns the new total, or
    /// `None` when the session has no timer.
    pub fn adjust_timer(&mut self, delta: f64) -> Option<f64> {
        if !self.has_timer() {
            return None;
        }
        let total = self.timer_total? + delta;
        self.timer_total = Some(total);
        Some(total)
    }

    /// Restores the initial activity level and timer, restarting the
    /// countdown at `now`.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.set_activity_level(self.initial_activity_level);
        self.timer_total = self.initial_timer;
        self.timer_started_at = self.initial_timer.map(|_| now);
    }
}

/// The mutable state one orchestrator owns for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Activity level and timer.
    pub game: GameState,
    /// Transcript.
    pub conversation: Conversation,
    /// Curator directives for the ghosts.
    pub notes: CuratorNotes,
}

impl SessionState {
    /// Fresh state for a session starting at `now`.
    #[must_use]
    pub fn new(config: &SessionConfig, now: DateTime<Utc>) -> Self {
        Self {
            game: GameState::from_config(config, now),
            conversation: Conversation::new(),
            notes: CuratorNotes::default(),
        }
    }
}
