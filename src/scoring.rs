//! Scoring engine: distance/time points, hit bonuses and the time-bonus
//! schedule. Pure and fully host-testable; all rounding happens at the point
//! a value is added to the cumulative score.

use thiserror::Error;

/// Distance beyond which proximity credit runs out.
pub const MAX_SCORED_DISTANCE_M: f64 = 2_000.0;
/// Proximity credit for a click at distance zero.
pub const DISTANCE_POINTS_MAX: f64 = 1_000.0;
/// Flat penalty for a miss past [`MAX_SCORED_DISTANCE_M`].
pub const FAR_MISS_PENALTY: f64 = -20.0;
pub const TIME_POINTS_PER_SEC: f64 = 10.0;
/// Bonus for a click inside the target polygon.
pub const INSIDE_HIT_BONUS: f64 = 1_000.0;
/// Bonus for a click within the near-border band of the target.
pub const NEAR_BORDER_BONUS: f64 = 2_000.0;

/// Score thresholds and the bonus seconds granted at or above each.
const TIME_BONUS_SCHEDULE: [(i64, f64); 7] = [
    (20_000, 5.0),
    (10_000, 4.0),
    (5_000, 3.0),
    (2_500, 2.0),
    (1_000, 1.5),
    (500, 1.0),
    (0, 0.5),
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("distance must be finite and non-negative, got {0}")]
    InvalidDistance(f64),
    #[error("time must be finite and non-negative, got {0}")]
    InvalidTime(f64),
    #[error("round initial time must be positive, got {0}")]
    InvalidRoundTime(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreBreakdown {
    pub distance_points: f64,
    pub time_points: f64,
    pub total: f64,
}

/// Hit classification for a resolved click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    Inside,
    NearBorder,
}

/// Proximity + speed score for a miss.
///
/// Distance credit decays linearly to zero at [`MAX_SCORED_DISTANCE_M`] and
/// turns into a flat penalty past it; time credit grows with the seconds
/// still on the clock. Invalid inputs are a caller bug and fail fast.
pub fn score_for(distance_m: f64, time_left_s: f64) -> Result<ScoreBreakdown, ScoreError> {
    if !distance_m.is_finite() || distance_m < 0.0 {
        return Err(ScoreError::InvalidDistance(distance_m));
    }
    if !time_left_s.is_finite() || time_left_s < 0.0 {
        return Err(ScoreError::InvalidTime(time_left_s));
    }
    let distance_points = if distance_m <= MAX_SCORED_DISTANCE_M {
        DISTANCE_POINTS_MAX * (1.0 - distance_m / MAX_SCORED_DISTANCE_M)
    } else {
        FAR_MISS_PENALTY
    };
    let time_points = TIME_POINTS_PER_SEC * time_left_s;
    Ok(ScoreBreakdown {
        distance_points,
        time_points,
        total: distance_points + time_points,
    })
}

/// Fixed hit bonus scaled by the quadratic speed multiplier
/// `(time_left / round_initial_time)^2`, bypassing the decay curve.
pub fn hit_bonus(kind: HitKind, time_left_s: f64, round_initial_s: f64) -> Result<f64, ScoreError> {
    if !time_left_s.is_finite() || time_left_s < 0.0 {
        return Err(ScoreError::InvalidTime(time_left_s));
    }
    if !round_initial_s.is_finite() || round_initial_s <= 0.0 {
        return Err(ScoreError::InvalidRoundTime(round_initial_s));
    }
    let base = match kind {
        HitKind::Inside => INSIDE_HIT_BONUS,
        HitKind::NearBorder => NEAR_BORDER_BONUS,
    };
    let speed = (time_left_s / round_initial_s).clamp(0.0, 1.0);
    Ok(base * speed * speed)
}

/// Bonus seconds granted to the next round for the given cumulative score.
/// Monotonic non-decreasing; a negative score earns nothing.
pub fn time_bonus(score: i64) -> f64 {
    TIME_BONUS_SCHEDULE
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0.0)
}

/// Distance-bucketed feedback line for a miss.
pub fn feedback_message(distance_m: f64) -> &'static str {
    if distance_m < 10.0 {
        "Perfect! You know these neighborhoods cold!"
    } else if distance_m < 30.0 {
        "Impressive! Even the fishermen respect that aim!"
    } else if distance_m < 50.0 {
        "Superb! More local than the corner bakery!"
    } else if distance_m < 100.0 {
        "Very good!"
    } else if distance_m < 300.0 {
        "Very good! Practically a tour guide already!"
    } else if distance_m < 500.0 {
        "Nice! You know more than most people!"
    } else if distance_m < 1_000.0 {
        "Almost there! A little more and you move in!"
    } else if distance_m < 1_500.0 {
        "Oof! More lost than a tourist at the fish market!"
    } else if distance_m < 2_000.0 {
        "Yikes! Wandering the wrong end of town!"
    } else {
        "Missed by more than two kilometres..."
    }
}

/// Countdown/progress bar color by remaining fraction.
pub fn progress_bar_color(fraction: f64) -> &'static str {
    if fraction > 0.6 {
        "#00FF66"
    } else if fraction > 0.3 {
        "#FFD700"
    } else {
        "#FF4444"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn full_credit_at_zero_distance() {
        let s = score_for(0.0, 10.0).unwrap();
        assert_eq!(s.distance_points, DISTANCE_POINTS_MAX);
        assert_eq!(s.time_points, 100.0);
        assert_eq!(s.total.round() as i64, 1_100);
    }

    #[test]
    fn distance_credit_runs_out_at_the_cap() {
        let s = score_for(MAX_SCORED_DISTANCE_M, 0.0).unwrap();
        assert_eq!(s.distance_points, 0.0);
        let far = score_for(MAX_SCORED_DISTANCE_M + 1.0, 0.0).unwrap();
        assert_eq!(far.distance_points, FAR_MISS_PENALTY);
        assert!(far.total < 0.0);
    }

    #[test]
    fn far_slow_miss_is_negative() {
        // A wild guess with almost no time left must cost points.
        let s = score_for(5_000.0, 0.1).unwrap();
        assert!(s.total < 0.0);
    }

    #[test]
    fn invalid_inputs_fail_fast() {
        assert!(matches!(
            score_for(f64::NAN, 1.0),
            Err(ScoreError::InvalidDistance(_))
        ));
        assert!(matches!(
            score_for(-1.0, 1.0),
            Err(ScoreError::InvalidDistance(_))
        ));
        assert!(matches!(
            score_for(10.0, -0.1),
            Err(ScoreError::InvalidTime(_))
        ));
        assert!(matches!(
            score_for(10.0, f64::INFINITY),
            Err(ScoreError::InvalidTime(_))
        ));
        assert!(matches!(
            hit_bonus(HitKind::Inside, 1.0, 0.0),
            Err(ScoreError::InvalidRoundTime(_))
        ));
    }

    #[test]
    fn hit_bonus_full_multiplier_at_round_start() {
        // An instant click pays the undiminished bonus.
        assert_eq!(hit_bonus(HitKind::Inside, 10.0, 10.0).unwrap(), INSIDE_HIT_BONUS);
        assert_eq!(
            hit_bonus(HitKind::NearBorder, 10.0, 10.0).unwrap(),
            NEAR_BORDER_BONUS
        );
    }

    #[test]
    fn hit_bonus_decays_quadratically() {
        let half = hit_bonus(HitKind::Inside, 5.0, 10.0).unwrap();
        assert!((half - INSIDE_HIT_BONUS * 0.25).abs() < 1e-9);
        assert_eq!(hit_bonus(HitKind::Inside, 0.0, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn time_bonus_schedule_steps() {
        assert_eq!(time_bonus(-100), 0.0);
        assert_eq!(time_bonus(0), 0.5);
        assert_eq!(time_bonus(499), 0.5);
        assert_eq!(time_bonus(500), 1.0);
        assert_eq!(time_bonus(4_999), 2.0);
        assert_eq!(time_bonus(5_000), 3.0);
        assert_eq!(time_bonus(25_000), 5.0);
    }

    #[test]
    fn progress_colors() {
        assert_eq!(progress_bar_color(1.0), "#00FF66");
        assert_eq!(progress_bar_color(0.5), "#FFD700");
        assert_eq!(progress_bar_color(0.1), "#FF4444");
    }

    proptest! {
        #[test]
        fn distance_component_monotonically_non_increasing(
            d1 in 0.0f64..6_000.0, d2 in 0.0f64..6_000.0, t in 0.0f64..10.0,
        ) {
            let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            let a = score_for(near, t).unwrap();
            let b = score_for(far, t).unwrap();
            prop_assert!(a.total >= b.total);
            prop_assert!(a.distance_points >= b.distance_points);
        }

        #[test]
        fn time_component_monotonically_non_decreasing(
            d in 0.0f64..6_000.0, t1 in 0.0f64..10.0, t2 in 0.0f64..10.0,
        ) {
            let (slow, fast) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            let a = score_for(d, slow).unwrap();
            let b = score_for(d, fast).unwrap();
            prop_assert!(b.total >= a.total);
        }

        #[test]
        fn time_bonus_monotonic_in_score(s1 in -1_000i64..30_000, s2 in -1_000i64..30_000) {
            let (lo, hi) = if s1 <= s2 { (s1, s2) } else { (s2, s1) };
            prop_assert!(time_bonus(lo) <= time_bonus(hi));
        }
    }
}
