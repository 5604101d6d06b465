#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adaptive difficulty controller for the Ring Runner platformer.
//!
//! The controller consumes the gameplay event stream one [`GameEvent`] at a
//! time and maintains two records: a rolling [`PlayerMetrics`] estimate and
//! the authoritative [`DifficultySettings`] vector consumed by enemy motion,
//! gravity, and spawn logic each frame. Every event is handled to completion
//! before the call returns: the estimator folds the event into the metrics,
//! the skill blend is recomputed, and a cooldown-gated rule cascade may nudge
//! the settings inside their legal bounds. Consumers only ever receive copies
//! of controller-owned state.

use std::collections::VecDeque;

use ring_runner_core::{
    AppliedAdjustment, DifficultySettings, GameEvent, PlayerMetrics, Timestamp, TuningDebugInfo,
};

mod estimator;
mod ruleset;

/// Minimum wall-clock interval between two applied adjustments.
const ADJUSTMENT_COOLDOWN_MS: u64 = 10_000;
/// Number of signed intensities retained in the adjustment history.
const ADJUSTMENT_HISTORY_CAP: usize = 10;

/// Owned difficulty controller driven by the surrounding game loop.
#[derive(Debug)]
pub struct DifficultyController {
    baseline: DifficultySettings,
    settings: DifficultySettings,
    metrics: PlayerMetrics,
    session: SessionState,
}

impl DifficultyController {
    /// Creates a controller around the provided baseline settings.
    ///
    /// The baseline is retained immutably for [`DifficultyController::reset`];
    /// the working copy starts equal to it, so consumers observe no drift
    /// before the first event arrives. `now` seeds the level-start and
    /// last-action timestamps.
    #[must_use]
    pub fn new(baseline: DifficultySettings, now: Timestamp) -> Self {
        Self {
            baseline,
            settings: baseline,
            metrics: PlayerMetrics::default(),
            session: SessionState::new(now),
        }
    }

    /// Folds one gameplay event into the metric estimates and, when the
    /// cooldown allows and a decision rule matches, retunes the settings.
    ///
    /// `now` is the caller's wall clock at the moment of the call; the
    /// controller reads no clock of its own. Returns the adjustment that was
    /// applied, or `None` when the settings were left alone.
    pub fn record_event(&mut self, event: GameEvent, now: Timestamp) -> Option<AppliedAdjustment> {
        estimator::apply_event(&mut self.metrics, &mut self.session, event, now);
        estimator::recompute_skill(&mut self.metrics, &self.session);
        self.maybe_adjust(now)
    }

    /// Snapshot of the current settings vector.
    #[must_use]
    pub fn settings(&self) -> DifficultySettings {
        self.settings
    }

    /// Snapshot of the current metric estimates.
    #[must_use]
    pub fn metrics(&self) -> PlayerMetrics {
        self.metrics
    }

    /// Read-only composite for HUD overlays and telemetry tooling.
    #[must_use]
    pub fn debug_info(&self) -> TuningDebugInfo {
        TuningDebugInfo {
            metrics: self.metrics,
            settings: self.settings,
            consecutive_failures: self.session.consecutive_failures,
            consecutive_successes: self.session.consecutive_successes,
            history_len: self.session.history.len(),
            last_action: self.session.last_action,
        }
    }

    /// Restores the settings from the baseline and clears the death, streak,
    /// and history bookkeeping.
    ///
    /// Metric estimates survive a reset on purpose: the player behind the
    /// controller is still the same player after a game-over restart.
    /// Idempotent on everything it touches.
    pub fn reset(&mut self) {
        self.settings = self.baseline;
        self.session.death_count = 0;
        self.session.consecutive_failures = 0;
        self.session.consecutive_successes = 0;
        self.session.history.clear();
    }

    fn maybe_adjust(&mut self, now: Timestamp) -> Option<AppliedAdjustment> {
        if let Some(last) = self.session.last_adjustment {
            if now.saturating_millis_since(last) < ADJUSTMENT_COOLDOWN_MS {
                return None;
            }
        }

        let adjustment = ruleset::decide(&self.metrics, &self.session)?;
        ruleset::apply(&mut self.settings, adjustment);
        self.session.push_history(adjustment.signed_intensity());
        self.session.last_adjustment = Some(now);
        Some(adjustment)
    }
}

/// Per-session bookkeeping owned by the controller.
#[derive(Debug)]
struct SessionState {
    death_count: u32,
    consecutive_failures: u32,
    consecutive_successes: u32,
    level_start: Timestamp,
    last_action: Timestamp,
    last_adjustment: Option<Timestamp>,
    history: VecDeque<f32>,
}

impl SessionState {
    fn new(now: Timestamp) -> Self {
        Self {
            death_count: 0,
            consecutive_failures: 0,
            consecutive_successes: 0,
            level_start: now,
            last_action: now,
            last_adjustment: None,
            history: VecDeque::with_capacity(ADJUSTMENT_HISTORY_CAP),
        }
    }

    /// Appends a signed intensity, evicting the oldest entry past the cap.
    fn push_history(&mut self, signed_intensity: f32) {
        if self.history.len() == ADJUSTMENT_HISTORY_CAP {
            let _ = self.history.pop_front();
        }
        self.history.push_back(signed_intensity);
    }

    /// Marks a player action, feeding the informational last-action clock.
    fn touch_action(&mut self, now: Timestamp) {
        self.last_action = now;
    }
}
