//! Responder selection.
//!
//! The activity level is floored to an integer step and looked up in a fixed
//! weight table; a weighted draw then picks who answers. Low levels belong to
//! the primary ghost alone, the secondary ghost joins from level 4, and from
//! level 8 on both ghosts increasingly answer together.

use spiritbox_core::agent::{GhostRole, Responder};
use spiritbox_core::rng::DeterministicRng;
use tracing::warn;

/// Selection weights for one activity step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponderWeights {
    /// Weight of the primary ghost answering alone.
    pub primary: f64,
    /// Weight of the secondary ghost answering alone.
    pub secondary: f64,
    /// Weight of both ghosts answering.
    pub both: f64,
}

impl ResponderWeights {
    const fn new(primary: f64, secondary: f64, both: f64) -> Self {
        Self {
            primary,
            secondary,
            both,
        }
    }

    fn total(self) -> f64 {
        self.primary + self.secondary + self.both
    }
}

/// Integer activity step used for the table lookup.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn activity_step(activity_level: f64) -> i64 {
    if activity_level.is_nan() {
        return 1;
    }
    activity_level.floor().clamp(1.0, 10.0) as i64
}

/// The weight table.
#[must_use]
pub fn weights_for(activity_level: f64) -> ResponderWeights {
    match activity_step(activity_level) {
        4 => ResponderWeights::new(8.0, 2.0, 0.0),
        5 => ResponderWeights::new(7.0, 3.0, 0.0),
        6 => ResponderWeights::new(6.0, 4.0, 0.0),
        7 => ResponderWeights::new(5.0, 5.0, 0.0),
        8 => ResponderWeights::new(3.0, 3.0, 4.0),
        9 => ResponderWeights::new(2.0, 2.0, 6.0),
        10 => ResponderWeights::new(0.5, 0.5, 9.0),
        _ => ResponderWeights::new(10.0, 0.0, 0.0),
    }
}

/// Weighted draw over `weights`. All-zero (or otherwise unusable) weights
/// fall back to the primary ghost.
pub fn draw(weights: ResponderWeights, rng: &mut dyn DeterministicRng) -> Responder {
    let total = weights.total();
    if !total.is_finite() || total <= 0.0 {
        warn!(?weights, "selection weights collapsed, defaulting to primary");
        return Responder::Primary;
    }

    let target = rng.next_f64() * total;
    let options = [
        (Responder::Primary, weights.primary),
        (Responder::Secondary, weights.secondary),
        (Responder::Both, weights.both),
    ];

    let mut cumulative = 0.0;
    let mut fallback = Responder::Primary;
    for (responder, weight) in options {
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        fallback = responder;
        if target < cumulative {
            return responder;
        }
    }
    fallback
}

/// Picks the responder for the current activity level.
pub fn choose(activity_level: f64, rng: &mut dyn DeterministicRng) -> Responder {
    draw(weights_for(activity_level), rng)
}

/// Fair coin deciding which ghost goes first when both answer.
pub fn both_order(rng: &mut dyn DeterministicRng) -> [GhostRole; 2] {
    if rng.next_f64() < 0.5 {
        [GhostRole::Primary, GhostRole::Secondary]
    } else {
        [GhostRole::Secondary, GhostRole::Primary]
    }
}
