//! Level scoring

use serde::{Deserialize, Serialize};

pub const TURTLE_POINTS: u64 = 200;
pub const SPIKE_TURTLE_POINTS: u64 = 500;
/// Time bonus for finishing instantly
pub const MAX_TIME_BONUS: f64 = 500.0;
/// Completion time at which the bonus reaches zero
pub const DEFAULT_MAX_TIME_SECS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: u64,
    pub turtles: u64,
    pub spike_turtles: u64,
    pub time_bonus: u64,
}

/// Score for a completed level
///
/// The time bonus falls linearly from 500 at zero seconds to nothing at
/// `max_time` and beyond.
pub fn calculate_score(
    turtles_killed: u32,
    spike_turtles_killed: u32,
    time_spent: u32,
    max_time: u32,
) -> ScoreBreakdown {
    let turtles = turtles_killed as u64 * TURTLE_POINTS;
    let spike_turtles = spike_turtles_killed as u64 * SPIKE_TURTLE_POINTS;
    let time_bonus = if time_spent < max_time {
        let remaining = (max_time - time_spent) as f64 / max_time as f64;
        (remaining * MAX_TIME_BONUS).round() as u64
    } else {
        0
    };

    ScoreBreakdown {
        total: turtles + spike_turtles + time_bonus,
        turtles,
        spike_turtles,
        time_bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_score() {
        let score = calculate_score(3, 0, 95, DEFAULT_MAX_TIME_SECS);
        assert_eq!(
            score,
            ScoreBreakdown {
                total: 942,
                turtles: 600,
                spike_turtles: 0,
                time_bonus: 342,
            }
        );
    }

    #[test]
    fn test_no_bonus_past_max_time() {
        assert_eq!(calculate_score(0, 2, 300, 300).total, 1000);
        assert_eq!(calculate_score(0, 2, 999, 300).time_bonus, 0);
        assert_eq!(calculate_score(1, 1, 0, 300).total, 1200);
        // Zero budget never divides
        assert_eq!(calculate_score(1, 0, 0, 0).total, 200);
    }

    proptest! {
        #[test]
        fn prop_total_is_sum_and_bonus_bounded(
            turtles in 0u32..200,
            spikes in 0u32..200,
            time in 0u32..1000,
            max_time in 1u32..1000,
        ) {
            let s = calculate_score(turtles, spikes, time, max_time);
            prop_assert_eq!(s.total, s.turtles + s.spike_turtles + s.time_bonus);
            prop_assert!(s.time_bonus <= 500);
            prop_assert_eq!(s, calculate_score(turtles, spikes, time, max_time));
        }
    }
}
