//! Pure per-event metric updates.
//!
//! Every estimate in [`PlayerMetrics`] moves by exponential smoothing:
//! `old + (sample - old) * weight`. The weights below set how quickly each
//! estimate chases its samples; the normalization constants turn raw times
//! and counts into unit-range scores before smoothing.

use ring_runner_core::{GameEvent, PlayerMetrics, Timestamp};

use crate::SessionState;

const SUCCESS_RATE_WEIGHT: f32 = 0.2;
const REACTION_WEIGHT: f32 = 0.1;
const ENGAGEMENT_WEIGHT: f32 = 0.3;
const SKILL_WEIGHT: f32 = 0.1;

const DEATH_FRUSTRATION_STEP: f32 = 0.1;
const RING_RELIEF_STEP: f32 = 0.02;
const POWER_UP_BONUS: f32 = 0.05;

const LEVEL_TIME_NORM_MS: f32 = 60_000.0;
const ATTEMPT_NORM: f32 = 5.0;
const REACTION_NORM_MS: f32 = 1_000.0;
const STREAK_NORM: f32 = 5.0;

/// Folds a single gameplay event into the metrics and session bookkeeping.
pub(crate) fn apply_event(
    metrics: &mut PlayerMetrics,
    session: &mut SessionState,
    event: GameEvent,
    now: Timestamp,
) {
    match event {
        GameEvent::LevelStarted => {
            session.level_start = now;
            session.death_count = 0;
        }
        GameEvent::PlayerDied => {
            session.death_count += 1;
            session.consecutive_failures += 1;
            session.consecutive_successes = 0;
            metrics.frustration = clamp_unit(metrics.frustration + DEATH_FRUSTRATION_STEP);
        }
        GameEvent::LevelCompleted => {
            let attempts = session.death_count + 1;
            let sample = 1.0 / attempts as f32;
            metrics.success_rate = lerp(metrics.success_rate, sample, SUCCESS_RATE_WEIGHT);
            session.consecutive_successes += 1;
            session.consecutive_failures = 0;
            let level_ms = now.saturating_millis_since(session.level_start) as f32;
            update_engagement(metrics, level_ms, attempts as f32, 0.0);
        }
        GameEvent::RingCollected => {
            metrics.frustration = clamp_unit(metrics.frustration - RING_RELIEF_STEP);
            session.touch_action(now);
        }
        GameEvent::PowerUpCollected => {
            update_engagement(metrics, 0.0, 0.0, POWER_UP_BONUS);
        }
        GameEvent::PlayerInput { expected } => {
            if let Some(expected) = expected {
                let latency = now.saturating_millis_since(expected) as f32;
                metrics.reaction_time_ms = lerp(metrics.reaction_time_ms, latency, REACTION_WEIGHT);
            }
            session.touch_action(now);
        }
    }
}

/// Recomputes the skill blend. Runs after every event, unconditionally.
pub(crate) fn recompute_skill(metrics: &mut PlayerMetrics, session: &SessionState) {
    let success_component = metrics.success_rate;
    let reaction_component = (1.0 - metrics.reaction_time_ms / REACTION_NORM_MS).max(0.0);
    let consistency_component = (session.consecutive_successes as f32 / STREAK_NORM).min(1.0);
    let sample = (success_component + reaction_component + consistency_component) / 3.0;
    metrics.skill = lerp(metrics.skill, sample, SKILL_WEIGHT);
}

/// Blends completion time and attempt count into the engagement estimate.
///
/// The power-up bonus can push the raw sample above 1, so the smoothed result
/// is saturated back into the unit range.
fn update_engagement(metrics: &mut PlayerMetrics, level_ms: f32, attempts: f32, bonus: f32) {
    let time_score = (1.0 - level_ms / LEVEL_TIME_NORM_MS).max(0.0);
    let attempt_score = (1.0 - attempts / ATTEMPT_NORM).max(0.0);
    let sample = (time_score + attempt_score) / 2.0 + bonus;
    metrics.engagement = clamp_unit(lerp(metrics.engagement, sample, ENGAGEMENT_WEIGHT));
}

fn lerp(old: f32, sample: f32, weight: f32) -> f32 {
    old + (sample - old) * weight
}

fn clamp_unit(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
