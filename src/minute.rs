use rand::Rng;

use crate::util::centered_range;

/// What one active minute is allowed to spend: a target number of activity
/// attempts and a seconds budget already scaled by the current focus level.
#[derive(Debug, Clone, Copy)]
pub struct MinuteBudget {
    pub target_activities: u32,
    pub max_active_seconds: f64,
}

impl MinuteBudget {
    /// Draw a budget for a minute running at `scale`.
    ///
    /// The activity target uses the two-stage nested draw so the
    /// distribution humps toward the middle of the scale's range instead of
    /// spreading uniformly. The seconds budget is tri-modal: 20% of minutes
    /// are very dense (50-58 s), 40% normal (35-50 s), 40% light (20-40 s),
    /// then scaled down by focus.
    pub fn draw<R: Rng>(scale: u8, focus: f64, rng: &mut R) -> Self {
        let target_activities = match scale {
            7 => centered_range(rng, (17, 25), (33, 40)),
            8 => centered_range(rng, (33, 47), (47, 55)),
            _ => centered_range(rng, (47, 55), (65, 75)),
        };

        let base_active_seconds = if rng.gen_bool(0.2) {
            rng.gen_range(50..=58)
        } else if rng.gen_bool(0.5) {
            rng.gen_range(35..=50)
        } else {
            rng.gen_range(20..=40)
        };

        Self {
            target_activities,
            max_active_seconds: (base_active_seconds as f64 * focus).floor(),
        }
    }

    /// Inclusive bounds of the activity target for a scale.
    pub fn target_bounds(scale: u8) -> (u32, u32) {
        match scale {
            7 => (17, 40),
            8 => (33, 55),
            _ => (47, 75),
        }
    }
}
