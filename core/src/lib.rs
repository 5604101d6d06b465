#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ring Runner difficulty layer.
//!
//! This crate defines the message surface that connects gameplay adapters to
//! the pure difficulty system. Adapters submit [`GameEvent`] values describing
//! what the player just did, the difficulty controller folds those events into
//! its metric estimates, and consumers read back [`DifficultySettings`]
//! snapshots once per frame to drive enemy motion, gravity, and spawn cadence.
//! Consumers always receive copies; nothing outside the controller mutates the
//! records defined here.

use serde::{Deserialize, Serialize};

/// Wall-clock instant expressed in whole milliseconds.
///
/// The difficulty controller never reads a clock of its own; every entry point
/// takes the caller's notion of "now" so that replay harnesses and tests can
/// drive a simulated clock deterministically.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from a millisecond count.
    #[must_use]
    pub const fn from_millis(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the underlying millisecond count.
    #[must_use]
    pub const fn millis(&self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, saturating to zero when `earlier`
    /// lies in the future.
    #[must_use]
    pub const fn saturating_millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Discrete gameplay occurrences the difficulty controller reacts to.
///
/// Each variant carries exactly the payload its estimator update needs, so
/// there is no optional-field probing at the call site. The set is closed:
/// anything the surrounding game emits that has no counterpart here simply
/// never reaches the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A level began; the attempt clock starts and the death tally clears.
    LevelStarted,
    /// The player died inside the current level.
    PlayerDied,
    /// The player reached the level exit.
    LevelCompleted,
    /// The player picked up a ring.
    RingCollected,
    /// The player picked up a power-up.
    PowerUpCollected,
    /// A raw input arrived from the player.
    PlayerInput {
        /// Instant at which the input was expected, when the gameplay layer
        /// knows one. Without a marker the event contributes no reaction-time
        /// sample.
        expected: Option<Timestamp>,
    },
}

/// Rolling estimate of how the player is doing, smoothed across events.
///
/// Every field except `reaction_time_ms` is held inside `[0, 1]` by the
/// estimator; `reaction_time_ms` is an unbounded latency in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerMetrics {
    /// Exponential moving estimate of completions per attempt.
    pub success_rate: f32,
    /// Seed-time attempts estimate. Carried for interface compatibility; the
    /// smoothing logic never rewrites it.
    pub average_attempts: f32,
    /// Smoothed input-latency estimate in milliseconds.
    pub reaction_time_ms: f32,
    /// Saturating accumulator fed by deaths and drained by ring pickups.
    pub frustration: f32,
    /// Smoothed blend of completion time and attempt count, with small
    /// additive bonuses for power-up pickups.
    pub engagement: f32,
    /// Smoothed blend of success rate, normalized reaction time, and streak
    /// consistency.
    pub skill: f32,
}

impl PlayerMetrics {
    /// Reports whether every normalized field sits inside `[0, 1]`.
    ///
    /// `reaction_time_ms` is exempt; it only has to be non-negative.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        let unit = |value: f32| (0.0..=1.0).contains(&value);
        unit(self.success_rate)
            && unit(self.frustration)
            && unit(self.engagement)
            && unit(self.skill)
            && self.reaction_time_ms >= 0.0
    }
}

impl Default for PlayerMetrics {
    /// Neutral mid-band seed for a fresh session: nothing about a player is
    /// known yet, so no decision rule should fire off the seed alone.
    fn default() -> Self {
        Self {
            success_rate: 0.5,
            average_attempts: 1.0,
            reaction_time_ms: 500.0,
            frustration: 0.0,
            engagement: 0.5,
            skill: 0.5,
        }
    }
}

/// Authoritative tunable parameters consumed by gameplay systems each frame.
///
/// Every field has a fixed legal range; [`DifficultySettings::clamped`] is the
/// unconditional post-condition applied after each adjustment, so consumers
/// never observe a value outside its documented bounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Horizontal enemy patrol speed in world units per second.
    pub enemy_speed: f32,
    /// Number of enemies the spawner keeps alive at once.
    pub enemy_count: u32,
    /// Horizontal gap between generated platforms in world units.
    pub platform_spacing: f32,
    /// Rings required to open the level exit. Part of the vector for the
    /// level generator's benefit; the adjustment logic never rescales it.
    pub ring_requirement: u32,
    /// Downward acceleration applied to the player in world units per second
    /// squared.
    pub gravity_strength: f32,
    /// Probability weight for power-up placement per spawn opportunity.
    pub power_up_frequency: f32,
}

impl DifficultySettings {
    /// Lower bound for [`DifficultySettings::enemy_speed`].
    pub const ENEMY_SPEED_MIN: f32 = 50.0;
    /// Upper bound for [`DifficultySettings::enemy_speed`].
    pub const ENEMY_SPEED_MAX: f32 = 300.0;
    /// Lower bound for [`DifficultySettings::enemy_count`].
    pub const ENEMY_COUNT_MIN: u32 = 1;
    /// Upper bound for [`DifficultySettings::enemy_count`].
    pub const ENEMY_COUNT_MAX: u32 = 10;
    /// Lower bound for [`DifficultySettings::platform_spacing`].
    pub const PLATFORM_SPACING_MIN: f32 = 50.0;
    /// Upper bound for [`DifficultySettings::platform_spacing`].
    pub const PLATFORM_SPACING_MAX: f32 = 200.0;
    /// Lower bound for [`DifficultySettings::gravity_strength`].
    pub const GRAVITY_MIN: f32 = 300.0;
    /// Upper bound for [`DifficultySettings::gravity_strength`].
    pub const GRAVITY_MAX: f32 = 800.0;
    /// Lower bound for [`DifficultySettings::power_up_frequency`].
    pub const POWER_UP_FREQUENCY_MIN: f32 = 0.1;
    /// Upper bound for [`DifficultySettings::power_up_frequency`].
    pub const POWER_UP_FREQUENCY_MAX: f32 = 1.0;

    /// Returns a copy with every field saturated into its legal range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            enemy_speed: self
                .enemy_speed
                .clamp(Self::ENEMY_SPEED_MIN, Self::ENEMY_SPEED_MAX),
            enemy_count: self
                .enemy_count
                .clamp(Self::ENEMY_COUNT_MIN, Self::ENEMY_COUNT_MAX),
            platform_spacing: self
                .platform_spacing
                .clamp(Self::PLATFORM_SPACING_MIN, Self::PLATFORM_SPACING_MAX),
            ring_requirement: self.ring_requirement,
            gravity_strength: self
                .gravity_strength
                .clamp(Self::GRAVITY_MIN, Self::GRAVITY_MAX),
            power_up_frequency: self
                .power_up_frequency
                .clamp(Self::POWER_UP_FREQUENCY_MIN, Self::POWER_UP_FREQUENCY_MAX),
        }
    }

    /// Reports whether every bounded field already sits inside its range.
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        self.clamped() == *self
    }
}

impl Default for DifficultySettings {
    /// Baseline tuning for a standard campaign level.
    fn default() -> Self {
        Self {
            enemy_speed: 100.0,
            enemy_count: 3,
            platform_spacing: 120.0,
            ring_requirement: 5,
            gravity_strength: 400.0,
            power_up_frequency: 0.3,
        }
    }
}

/// Direction in which an adjustment moves the difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustmentDirection {
    /// Difficulty goes up; the level gets harder.
    Increase,
    /// Difficulty goes down; the level gets gentler.
    Decrease,
}

impl AdjustmentDirection {
    /// Multiplicative factor applied to scaled settings fields.
    #[must_use]
    pub fn multiplier(self, intensity: f32) -> f32 {
        match self {
            Self::Increase => 1.0 + intensity,
            Self::Decrease => 1.0 - intensity,
        }
    }

    /// Signs a non-negative intensity for history bookkeeping: positive for
    /// increases, negative for decreases.
    #[must_use]
    pub fn signed(self, intensity: f32) -> f32 {
        match self {
            Self::Increase => intensity,
            Self::Decrease => -intensity,
        }
    }
}

/// Record of one adjustment the controller actually applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedAdjustment {
    /// Direction the settings moved.
    pub direction: AdjustmentDirection,
    /// Non-negative magnitude of the nudge.
    pub intensity: f32,
}

impl AppliedAdjustment {
    /// Signed intensity as stored in the adjustment history.
    #[must_use]
    pub fn signed_intensity(&self) -> f32 {
        self.direction.signed(self.intensity)
    }
}

/// Read-only composite exposed to HUD overlays and telemetry tooling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TuningDebugInfo {
    /// Snapshot of the current metric estimates.
    pub metrics: PlayerMetrics,
    /// Snapshot of the current settings vector.
    pub settings: DifficultySettings,
    /// Deaths since the current streak of failures began.
    pub consecutive_failures: u32,
    /// Completions since the current streak of successes began.
    pub consecutive_successes: u32,
    /// Number of signed intensities retained in the adjustment history.
    pub history_len: usize,
    /// Instant of the most recent player action (ring pickup or raw input).
    pub last_action: Timestamp,
}
