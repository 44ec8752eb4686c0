use chrono::Weekday;
use rand::Rng;

use crate::activity::WeightVector;

/// One of the three per-minute activity mixes. The base weights are
/// re-randomized every active minute within archetype-specific ranges, so
/// two mouse-heavy minutes never share an exact weight vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PatternArchetype {
    #[strum(serialize = "mouse-heavy")]
    MouseHeavy,
    #[strum(serialize = "keyboard-heavy")]
    KeyboardHeavy,
    #[strum(serialize = "mouse-heavy-variant")]
    MouseHeavyVariant,
}

impl PatternArchetype {
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => PatternArchetype::MouseHeavy,
            1 => PatternArchetype::KeyboardHeavy,
            _ => PatternArchetype::MouseHeavyVariant,
        }
    }

    /// Weight ranges per category, aligned with `ActivityCategory::ALL`:
    /// movement, click, navigation, tab switch, scroll, selection,
    /// copy/paste, hover.
    pub fn base_weights<R: Rng>(self, rng: &mut R) -> WeightVector {
        let ranges: [(f64, f64); 8] = match self {
            PatternArchetype::MouseHeavy => [
                (1.0, 4.0),
                (12.0, 30.0),
                (1.0, 8.0),
                (0.5, 3.5),
                (1.5, 5.0),
                (0.8, 2.5),
                (0.5, 2.0),
                (0.5, 2.0),
            ],
            PatternArchetype::KeyboardHeavy => [
                (0.2, 2.5),
                (3.0, 15.0),
                (12.0, 35.0),
                (0.2, 2.5),
                (0.5, 4.0),
                (0.2, 2.0),
                (0.1, 1.2),
                (0.1, 1.2),
            ],
            PatternArchetype::MouseHeavyVariant => [
                (1.5, 6.0),
                (15.0, 40.0),
                (0.5, 5.0),
                (1.0, 4.5),
                (2.0, 7.0),
                (1.0, 3.5),
                (0.8, 2.5),
                (0.8, 2.5),
            ],
        };
        ranges.map(|(lo, hi)| rng.gen_range(lo..hi))
    }
}

/// Baseline activity level by hour of day: night floor, morning ramp to a
/// late-morning plateau, lunch dip, afternoon recovery, evening wind-down.
fn hourly_level(hour: u32) -> f64 {
    match hour {
        0 | 5 => 0.1,
        1..=4 => 0.05,
        6 => 0.3,
        7 => 0.5,
        8 => 0.7,
        9 => 0.9,
        10 | 11 => 1.0,
        12 => 0.6,
        13 => 0.4,
        14 => 0.5,
        15 => 0.7,
        16 => 0.8,
        17 => 0.9,
        18 => 0.8,
        19 => 0.6,
        20 => 0.5,
        21 => 0.4,
        22 => 0.3,
        _ => 0.2,
    }
}

fn weekday_adjustment(weekday: Weekday) -> f64 {
    match weekday {
        // Slow Monday start, distracted Friday, quieter weekends.
        Weekday::Mon => 0.8,
        Weekday::Fri => 0.9,
        Weekday::Sat | Weekday::Sun => 0.6,
        _ => 1.0,
    }
}

/// Hour-of-day activity modifier with weekday adjustment and a per-minute
/// random factor.
pub fn time_of_day_modifier<R: Rng>(hour: u32, weekday: Weekday, rng: &mut R) -> f64 {
    hourly_level(hour) * weekday_adjustment(weekday) * rng.gen_range(0.8..1.2)
}

/// Work-intensity schedule: how hard this block of the day is being worked,
/// independent of the baseline activity level.
pub fn work_intensity<R: Rng>(hour: u32, weekday: Weekday, rng: &mut R) -> f64 {
    if matches!(weekday, Weekday::Sat | Weekday::Sun) {
        return rng.gen_range(0.3..0.7);
    }
    let (lo, hi) = match hour {
        6..=8 => (0.4, 0.8),
        9..=11 => (0.8, 1.0),
        12..=13 => (0.2, 0.5),
        14..=16 => (0.7, 0.9),
        17..=19 => (0.5, 0.8),
        _ => (0.1, 0.4),
    };
    rng.gen_range(lo..hi)
}
