//! Session file decoding for the replay adapter.
//!
//! A session file is TOML: a `[baseline]` table mirroring the settings vector
//! plus an ordered `[[events]]` list. Event kinds are free strings so captures
//! from other builds stay loadable; unrecognized kinds are skipped silently,
//! which is the adapter-side realization of the controller's tolerance for
//! unknown events. Timestamps must be non-decreasing because the controller
//! processes events strictly in delivery order.

use ring_runner_core::{DifficultySettings, GameEvent, Timestamp};
use serde::Deserialize;
use thiserror::Error;

/// Reasons a session file may be rejected after parsing.
#[derive(Debug, Error)]
pub(crate) enum SessionError {
    /// The file is not syntactically valid TOML.
    #[error("session file is not valid TOML: {0}")]
    Malformed(#[from] toml::de::Error),
    /// A baseline field sits outside its documented legal range.
    #[error("baseline `{field}` lies outside its legal range")]
    BaselineOutOfBounds {
        /// Name of the offending settings field.
        field: &'static str,
    },
    /// An event timestamp runs backwards relative to its predecessor.
    #[error("event {index} runs backwards: {at_ms} ms precedes {previous_ms} ms")]
    NonMonotonicTimestamp {
        /// Zero-based index of the offending event.
        index: usize,
        /// Timestamp carried by the offending event.
        at_ms: u64,
        /// Timestamp carried by the preceding event.
        previous_ms: u64,
    },
}

/// Fully decoded and validated replay session.
#[derive(Debug)]
pub(crate) struct Session {
    /// Baseline settings handed to the controller at construction.
    pub(crate) baseline: DifficultySettings,
    /// Resolved events in delivery order, paired with their timestamps.
    pub(crate) events: Vec<(Timestamp, GameEvent)>,
    /// Number of scripted entries whose kind no build of the game emits.
    pub(crate) skipped: usize,
}

impl Session {
    /// Decodes a session from TOML text, validating the baseline and the
    /// event ordering.
    pub(crate) fn decode(text: &str) -> Result<Self, SessionError> {
        let file: SessionFile = toml::from_str(text)?;
        let baseline = file.baseline.into_settings()?;

        let mut events = Vec::with_capacity(file.events.len());
        let mut skipped = 0;
        let mut previous_ms = 0_u64;

        for (index, scripted) in file.events.iter().enumerate() {
            if index > 0 && scripted.at_ms < previous_ms {
                return Err(SessionError::NonMonotonicTimestamp {
                    index,
                    at_ms: scripted.at_ms,
                    previous_ms,
                });
            }
            previous_ms = scripted.at_ms;

            match scripted.resolve() {
                Some(event) => events.push((Timestamp::from_millis(scripted.at_ms), event)),
                None => skipped += 1,
            }
        }

        Ok(Self {
            baseline,
            events,
            skipped,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SessionFile {
    baseline: BaselineConfig,
    #[serde(default)]
    events: Vec<ScriptedEvent>,
}

/// Baseline settings table as written in the session file.
#[derive(Debug, Deserialize)]
struct BaselineConfig {
    enemy_speed: f32,
    enemy_count: u32,
    platform_spacing: f32,
    ring_requirement: u32,
    gravity_strength: f32,
    power_up_frequency: f32,
}

impl BaselineConfig {
    fn into_settings(self) -> Result<DifficultySettings, SessionError> {
        let settings = DifficultySettings {
            enemy_speed: self.enemy_speed,
            enemy_count: self.enemy_count,
            platform_spacing: self.platform_spacing,
            ring_requirement: self.ring_requirement,
            gravity_strength: self.gravity_strength,
            power_up_frequency: self.power_up_frequency,
        };

        let field = out_of_bounds_field(&settings);
        match field {
            Some(field) => Err(SessionError::BaselineOutOfBounds { field }),
            None => Ok(settings),
        }
    }
}

fn out_of_bounds_field(settings: &DifficultySettings) -> Option<&'static str> {
    let outside = |value: f32, min: f32, max: f32| !(min..=max).contains(&value);

    if outside(
        settings.enemy_speed,
        DifficultySettings::ENEMY_SPEED_MIN,
        DifficultySettings::ENEMY_SPEED_MAX,
    ) {
        Some("enemy_speed")
    } else if settings.enemy_count < DifficultySettings::ENEMY_COUNT_MIN
        || settings.enemy_count > DifficultySettings::ENEMY_COUNT_MAX
    {
        Some("enemy_count")
    } else if outside(
        settings.platform_spacing,
        DifficultySettings::PLATFORM_SPACING_MIN,
        DifficultySettings::PLATFORM_SPACING_MAX,
    ) {
        Some("platform_spacing")
    } else if outside(
        settings.gravity_strength,
        DifficultySettings::GRAVITY_MIN,
        DifficultySettings::GRAVITY_MAX,
    ) {
        Some("gravity_strength")
    } else if outside(
        settings.power_up_frequency,
        DifficultySettings::POWER_UP_FREQUENCY_MIN,
        DifficultySettings::POWER_UP_FREQUENCY_MAX,
    ) {
        Some("power_up_frequency")
    } else {
        None
    }
}

/// One scripted entry of the `[[events]]` list.
#[derive(Debug, Deserialize)]
struct ScriptedEvent {
    /// Session-relative timestamp in milliseconds.
    at_ms: u64,
    /// Event kind name; unknown names are skipped.
    kind: String,
    /// Expected-input marker, meaningful only for `player_input`.
    #[serde(default)]
    expected_ms: Option<u64>,
}

impl ScriptedEvent {
    fn resolve(&self) -> Option<GameEvent> {
        match self.kind.as_str() {
            "level_start" => Some(GameEvent::LevelStarted),
            "player_death" => Some(GameEvent::PlayerDied),
            "level_complete" => Some(GameEvent::LevelCompleted),
            "ring_collected" => Some(GameEvent::RingCollected),
            "power_up_collected" => Some(GameEvent::PowerUpCollected),
            "player_input" => Some(GameEvent::PlayerInput {
                expected: self.expected_ms.map(Timestamp::from_millis),
            }),
            _ => None,
        }
    }
}
