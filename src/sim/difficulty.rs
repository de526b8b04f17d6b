//! Per-level difficulty curve

use serde::{Deserialize, Serialize};

/// Derived enemy behaviour for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Horizontal grid speed (px/s)
    pub enemy_speed: f32,
    /// Seconds between enemy shots
    pub fire_interval: f32,
}

/// Speed grows linearly per level; fire interval shrinks linearly down to a floor.
///
/// Levels start at 1; level 0 is treated as level 1.
pub fn difficulty_for(
    level: u32,
    base_speed: f32,
    base_fire_interval: f32,
    speed_step: f32,
    fire_interval_step: f32,
    min_fire_interval: f32,
) -> Difficulty {
    let steps = level.saturating_sub(1) as f32;
    Difficulty {
        enemy_speed: base_speed * (1.0 + steps * speed_step),
        fire_interval: (base_fire_interval - steps * fire_interval_step).max(min_fire_interval),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use proptest::prelude::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_level_zero_is_level_one() {
        let curve = |level| difficulty_for(level, 100.0, 1.0, 0.2, 0.15, 0.2);
        assert_eq!(curve(0), curve(1));
    }

    #[test]
    fn test_level_one() {
        let d = Tuning::default().difficulty(1);
        assert!(close(d.enemy_speed, 100.0));
        assert!(close(d.fire_interval, 1.0));
    }

    #[test]
    fn test_level_three() {
        let d = Tuning::default().difficulty(3);
        assert!(close(d.enemy_speed, 140.0));
        assert!(close(d.fire_interval, 0.70));
    }

    #[test]
    fn test_fire_interval_floor() {
        let tuning = Tuning::default();
        let six = tuning.difficulty(6);
        assert!(close(six.enemy_speed, 200.0));
        assert!(close(six.fire_interval, 0.25));

        let seven = tuning.difficulty(7);
        assert!(close(seven.enemy_speed, 220.0));
        assert!(close(seven.fire_interval, 0.20));

        assert!(close(tuning.difficulty(40).fire_interval, 0.20));
    }

    proptest! {
        #[test]
        fn difficulty_is_monotonic(level in 1u32..500) {
            let tuning = Tuning::default();
            let here = tuning.difficulty(level);
            let next = tuning.difficulty(level + 1);
            prop_assert!(next.enemy_speed > here.enemy_speed);
            prop_assert!(next.fire_interval <= here.fire_interval);
            prop_assert!(here.fire_interval >= 0.2);
        }
    }
}
