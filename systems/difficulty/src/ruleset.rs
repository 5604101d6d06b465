//! Priority-ordered adjustment rules and bounded settings application.
//!
//! The cascade is evaluated top to bottom with early exit, and the order is
//! load-bearing: relief for a struggling player outranks engagement-seeking,
//! which outranks fine skill-matching. Application scales the settings
//! multiplicatively and finishes with the unconditional bounds clamp.

use ring_runner_core::{
    AdjustmentDirection, AppliedAdjustment, DifficultySettings, PlayerMetrics,
};

use crate::SessionState;

const FRUSTRATION_CEILING: f32 = 0.7;
const SUCCESS_FLOOR: f32 = 0.4;
const FAILURE_STREAK_LIMIT: u32 = 3;
const RELIEF_INTENSITY_CAP: f32 = 0.2;

const ENGAGEMENT_FLOOR: f32 = 0.4;
const SUCCESS_CEILING: f32 = 0.9;
const SUCCESS_STREAK_LIMIT: u32 = 5;
const CHALLENGE_INTENSITY: f32 = 0.1;
const HOT_STREAK_INTENSITY: f32 = 0.15;

const SKILL_TARGET: f32 = 0.5;
const SKILL_DEADBAND: f32 = 0.2;
const SKILL_GAP_GAIN: f32 = 0.1;

const SPACING_GROWTH: f32 = 1.1;
const SPACING_DECAY: f32 = 0.9;
const POWER_UP_GROWTH: f32 = 1.1;
const POWER_UP_DECAY: f32 = 0.9;

type Rule = fn(&PlayerMetrics, &SessionState) -> Option<AppliedAdjustment>;

/// Decision cascade in priority order; the first matching rule wins.
const CASCADE: [Rule; 3] = [relief, challenge, skill_gap];

/// Picks the adjustment the current metrics call for, if any.
pub(crate) fn decide(
    metrics: &PlayerMetrics,
    session: &SessionState,
) -> Option<AppliedAdjustment> {
    CASCADE.iter().find_map(|rule| rule(metrics, session))
}

/// Applies a decided adjustment to the settings vector.
///
/// Enemy speed and gravity scale by the plain multiplier. Enemy count rounds
/// away from the current value (ceiling on increase, floor on decrease) so a
/// nudge always changes it by at least one when that stays within its cap.
/// Spacing and power-up frequency move by fixed counter-steps. Ends with the
/// full bounds clamp.
pub(crate) fn apply(settings: &mut DifficultySettings, adjustment: AppliedAdjustment) {
    let multiplier = adjustment.direction.multiplier(adjustment.intensity);
    settings.enemy_speed *= multiplier;
    settings.gravity_strength *= multiplier;

    let scaled_count = settings.enemy_count as f32 * multiplier;
    match adjustment.direction {
        AdjustmentDirection::Increase => {
            settings.enemy_count =
                (scaled_count.ceil() as u32).min(DifficultySettings::ENEMY_COUNT_MAX);
            settings.platform_spacing *= SPACING_GROWTH;
            settings.power_up_frequency *= POWER_UP_DECAY;
        }
        AdjustmentDirection::Decrease => {
            settings.enemy_count =
                (scaled_count.floor() as u32).max(DifficultySettings::ENEMY_COUNT_MIN);
            settings.platform_spacing *= SPACING_DECAY;
            settings.power_up_frequency *= POWER_UP_GROWTH;
        }
    }

    *settings = settings.clamped();
}

/// A frustrated or repeatedly failing player gets an immediate break.
fn relief(metrics: &PlayerMetrics, session: &SessionState) -> Option<AppliedAdjustment> {
    let triggered = metrics.frustration > FRUSTRATION_CEILING
        || metrics.success_rate < SUCCESS_FLOOR
        || session.consecutive_failures > FAILURE_STREAK_LIMIT;

    triggered.then(|| AppliedAdjustment {
        direction: AdjustmentDirection::Decrease,
        intensity: metrics.frustration.min(RELIEF_INTENSITY_CAP),
    })
}

/// A coasting or disengaged player gets pushed harder.
fn challenge(metrics: &PlayerMetrics, session: &SessionState) -> Option<AppliedAdjustment> {
    let triggered = metrics.engagement < ENGAGEMENT_FLOOR
        || metrics.success_rate > SUCCESS_CEILING
        || session.consecutive_successes > SUCCESS_STREAK_LIMIT;

    let intensity = if metrics.success_rate > SUCCESS_CEILING {
        HOT_STREAK_INTENSITY
    } else {
        CHALLENGE_INTENSITY
    };

    triggered.then(|| AppliedAdjustment {
        direction: AdjustmentDirection::Increase,
        intensity,
    })
}

/// Outside the deadband, difficulty tracks the skill estimate proportionally.
fn skill_gap(metrics: &PlayerMetrics, _session: &SessionState) -> Option<AppliedAdjustment> {
    let gap = metrics.skill - SKILL_TARGET;
    if gap.abs() <= SKILL_DEADBAND {
        return None;
    }

    let direction = if gap > 0.0 {
        AdjustmentDirection::Increase
    } else {
        AdjustmentDirection::Decrease
    };

    Some(AppliedAdjustment {
        direction,
        intensity: gap.abs() * SKILL_GAP_GAIN,
    })
}

#[cfg(test)]
mod tests {
    use super::{apply, decide};
    use crate::SessionState;
    use ring_runner_core::{
        AdjustmentDirection, AppliedAdjustment, DifficultySettings, PlayerMetrics, Timestamp,
    };

    const TOLERANCE: f32 = 1e-5;

    fn quiet_session() -> SessionState {
        SessionState::new(Timestamp::from_millis(0))
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn balanced_metrics_request_no_adjustment() {
        assert_eq!(decide(&PlayerMetrics::default(), &quiet_session()), None);
    }

    #[test]
    fn relief_outranks_challenge() {
        let metrics = PlayerMetrics {
            frustration: 0.9,
            success_rate: 0.95,
            ..PlayerMetrics::default()
        };

        let adjustment = decide(&metrics, &quiet_session()).expect("relief must fire");
        assert_eq!(adjustment.direction, AdjustmentDirection::Decrease);
        assert_close(adjustment.intensity, 0.2);
    }

    #[test]
    fn relief_intensity_follows_frustration_below_the_cap() {
        let mut session = quiet_session();
        session.consecutive_failures = 4;
        let metrics = PlayerMetrics {
            frustration: 0.12,
            ..PlayerMetrics::default()
        };

        let adjustment = decide(&metrics, &session).expect("failure streak must fire");
        assert_eq!(adjustment.direction, AdjustmentDirection::Decrease);
        assert_close(adjustment.intensity, 0.12);
    }

    #[test]
    fn hot_streak_escalates_the_challenge_intensity() {
        let metrics = PlayerMetrics {
            success_rate: 0.95,
            ..PlayerMetrics::default()
        };

        let adjustment = decide(&metrics, &quiet_session()).expect("challenge must fire");
        assert_eq!(adjustment.direction, AdjustmentDirection::Increase);
        assert_close(adjustment.intensity, 0.15);
    }

    #[test]
    fn low_engagement_uses_the_base_challenge_intensity() {
        let metrics = PlayerMetrics {
            engagement: 0.2,
            ..PlayerMetrics::default()
        };

        let adjustment = decide(&metrics, &quiet_session()).expect("challenge must fire");
        assert_eq!(adjustment.direction, AdjustmentDirection::Increase);
        assert_close(adjustment.intensity, 0.1);
    }

    #[test]
    fn challenge_outranks_skill_matching() {
        let mut session = quiet_session();
        session.consecutive_successes = 6;
        let metrics = PlayerMetrics {
            skill: 0.1,
            ..PlayerMetrics::default()
        };

        // Skill alone would decrease; the success streak must win instead.
        let adjustment = decide(&metrics, &session).expect("challenge must fire");
        assert_eq!(adjustment.direction, AdjustmentDirection::Increase);
    }

    #[test]
    fn skill_gap_scales_proportionally_in_both_directions() {
        let sharp = PlayerMetrics {
            skill: 0.8,
            ..PlayerMetrics::default()
        };
        let adjustment = decide(&sharp, &quiet_session()).expect("skill gap must fire");
        assert_eq!(adjustment.direction, AdjustmentDirection::Increase);
        assert_close(adjustment.intensity, 0.3 * 0.1);

        let struggling = PlayerMetrics {
            skill: 0.25,
            ..PlayerMetrics::default()
        };
        let adjustment = decide(&struggling, &quiet_session()).expect("skill gap must fire");
        assert_eq!(adjustment.direction, AdjustmentDirection::Decrease);
        assert_close(adjustment.intensity, 0.25 * 0.1);
    }

    #[test]
    fn skill_inside_the_deadband_stays_quiet() {
        let metrics = PlayerMetrics {
            skill: 0.65,
            ..PlayerMetrics::default()
        };
        assert_eq!(decide(&metrics, &quiet_session()), None);
    }

    #[test]
    fn increase_scales_and_rounds_up() {
        let mut settings = DifficultySettings::default();
        apply(
            &mut settings,
            AppliedAdjustment {
                direction: AdjustmentDirection::Increase,
                intensity: 0.1,
            },
        );

        assert_close(settings.enemy_speed, 110.0);
        assert_close(settings.gravity_strength, 440.0);
        assert_eq!(settings.enemy_count, 4, "ceil(3 * 1.1)");
        assert_close(settings.platform_spacing, 132.0);
        assert_close(settings.power_up_frequency, 0.27);
        assert!(settings.is_within_bounds());
    }

    #[test]
    fn decrease_scales_and_rounds_down() {
        let mut settings = DifficultySettings::default();
        apply(
            &mut settings,
            AppliedAdjustment {
                direction: AdjustmentDirection::Decrease,
                intensity: 0.2,
            },
        );

        assert_close(settings.enemy_speed, 80.0);
        assert_close(settings.gravity_strength, 320.0);
        assert_eq!(settings.enemy_count, 2, "floor(3 * 0.8)");
        assert_close(settings.platform_spacing, 108.0);
        assert_close(settings.power_up_frequency, 0.33);
        assert!(settings.is_within_bounds());
    }

    #[test]
    fn enemy_count_saturates_at_its_cap_and_floor() {
        let mut settings = DifficultySettings {
            enemy_count: 10,
            ..DifficultySettings::default()
        };
        apply(
            &mut settings,
            AppliedAdjustment {
                direction: AdjustmentDirection::Increase,
                intensity: 0.15,
            },
        );
        assert_eq!(settings.enemy_count, 10);

        let mut settings = DifficultySettings {
            enemy_count: 1,
            ..DifficultySettings::default()
        };
        apply(
            &mut settings,
            AppliedAdjustment {
                direction: AdjustmentDirection::Decrease,
                intensity: 0.2,
            },
        );
        assert_eq!(settings.enemy_count, 1);
    }

    #[test]
    fn repeated_decreases_stay_clamped() {
        let mut settings = DifficultySettings::default();
        for _ in 0..50 {
            apply(
                &mut settings,
                AppliedAdjustment {
                    direction: AdjustmentDirection::Decrease,
                    intensity: 0.2,
                },
            );
        }
        assert_close(settings.enemy_speed, DifficultySettings::ENEMY_SPEED_MIN);
        assert_eq!(settings.enemy_count, DifficultySettings::ENEMY_COUNT_MIN);
        assert_close(
            settings.platform_spacing,
            DifficultySettings::PLATFORM_SPACING_MIN,
        );
        assert_close(settings.gravity_strength, DifficultySettings::GRAVITY_MIN);
        assert_close(
            settings.power_up_frequency,
            DifficultySettings::POWER_UP_FREQUENCY_MAX,
        );
    }
}
