use std::collections::VecDeque;
use std::time::Duration;

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::human::PersonalTraits;
use crate::timing::TimingModel;

/// The fixed set of simulated user actions. Order matters: weight vectors
/// are aligned with `ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActivityCategory {
    MouseMovement,
    MouseClick,
    Navigation,
    TabSwitching,
    ScrollWheel,
    TextSelection,
    CopyPaste,
    HoverBehavior,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 8] = [
        ActivityCategory::MouseMovement,
        ActivityCategory::MouseClick,
        ActivityCategory::Navigation,
        ActivityCategory::TabSwitching,
        ActivityCategory::ScrollWheel,
        ActivityCategory::TextSelection,
        ActivityCategory::CopyPaste,
        ActivityCategory::HoverBehavior,
    ];

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|c| *c == self)
            .unwrap_or_default()
    }
}

/// Weights aligned with `ActivityCategory::ALL`.
pub type WeightVector = [f64; ActivityCategory::ALL.len()];

/// One performed activity, as recorded in analytics and the history buffer.
#[derive(Debug, Clone)]
pub struct ActivityEvent {
    pub category: ActivityCategory,
    /// Offset from session start.
    pub at: Duration,
    pub duration: Duration,
}

/// Forcing a category change after this many consecutive identical picks.
pub const PATTERN_DETECTION_THRESHOLD: usize = 3;

/// Recent picks kept for repetition counting and diversity analytics.
pub const HISTORY_LIMIT: usize = 10;

/// The adaptive feedback layer reconsiders itself every this many
/// activities.
pub const ADAPT_INTERVAL: u64 = 20;

const LIKENESS_ROBOTIC_BELOW: f64 = 0.6;
const LIKENESS_CHAOTIC_ABOVE: f64 = 0.9;
const DOMINANT_SHARE: f64 = 0.6;

/// Weighted category picker with an anti-repetition rule and a slow
/// integral-style feedback correction.
///
/// The history buffer is never used for lookahead; it only feeds repetition
/// counting and the dominant-share check.
#[derive(Debug)]
pub struct ActivitySelector {
    history: VecDeque<ActivityCategory>,
    last: Option<ActivityCategory>,
    repetition_count: usize,
    multipliers: WeightVector,
    substitutions: u64,
}

impl ActivitySelector {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            last: None,
            repetition_count: 0,
            multipliers: [1.0; ActivityCategory::ALL.len()],
            substitutions: 0,
        }
    }

    /// Weighted draw over `weights`, with a single non-recursive remap when
    /// the candidate would extend a run past the detection threshold. The
    /// substitution resets the run counter for the new category.
    pub fn choose<R: Rng>(&mut self, weights: &WeightVector, rng: &mut R) -> ActivityCategory {
        let mut pick = match WeightedIndex::new(weights.iter()) {
            Ok(dist) => ActivityCategory::ALL[dist.sample(rng)],
            // Degenerate weight vector (all zero): fall back to uniform.
            Err(_) => ActivityCategory::ALL[rng.gen_range(0..ActivityCategory::ALL.len())],
        };

        if self.last == Some(pick) {
            self.repetition_count += 1;
        } else {
            self.repetition_count = 0;
        }

        if self.repetition_count >= PATTERN_DETECTION_THRESHOLD {
            let substitute = ActivityCategory::ALL
                .iter()
                .copied()
                .filter(|c| *c != pick)
                .collect::<Vec<_>>();
            pick = substitute.choose(rng).copied().unwrap_or(pick);
            self.repetition_count = 0;
            self.substitutions += 1;
        }

        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(pick);
        self.last = Some(pick);
        pick
    }

    /// Base weights scaled by the persistent per-category multipliers. The
    /// multipliers only change in `adapt`, so a correction always lands on
    /// the *next* minute's weight computation.
    pub fn adjusted(&self, base: WeightVector) -> WeightVector {
        let mut out = base;
        for (w, m) in out.iter_mut().zip(self.multipliers.iter()) {
            *w *= m;
        }
        out
    }

    /// Feedback pass, run every `ADAPT_INTERVAL` activities: a too-robotic
    /// session gets more timing spread and more mistakes, a too-chaotic one
    /// gets less, and any category dominating the recent history is
    /// discounted by 20%.
    pub fn adapt<R: Rng>(
        &mut self,
        human_likeness: f64,
        timing: &mut TimingModel,
        traits: &mut PersonalTraits,
        rng: &mut R,
    ) {
        if human_likeness < LIKENESS_ROBOTIC_BELOW {
            timing.nudge_signature(rng.gen_range(1.1..1.5));
            traits.nudge_mistake_frequency(rng.gen_range(1.1..1.5));
        } else if human_likeness > LIKENESS_CHAOTIC_ABOVE {
            timing.nudge_signature(rng.gen_range(0.7..0.9));
            traits.nudge_mistake_frequency(rng.gen_range(0.7..0.9));
        }

        if let Some(dominant) = self.dominant_category() {
            self.multipliers[dominant.index()] *= 0.8;
        }
    }

    fn dominant_category(&self) -> Option<ActivityCategory> {
        if self.history.is_empty() {
            return None;
        }
        for category in ActivityCategory::ALL {
            let count = self.history.iter().filter(|c| **c == category).count();
            if count as f64 / self.history.len() as f64 > DOMINANT_SHARE {
                return Some(category);
            }
        }
        None
    }

    /// Share of distinct categories in the recent history, in [0,1].
    pub fn diversity(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        let mut seen = [false; ActivityCategory::ALL.len()];
        for c in &self.history {
            seen[c.index()] = true;
        }
        seen.iter().filter(|s| **s).count() as f64 / self.history.len() as f64
    }

    pub fn substitutions(&self) -> u64 {
        self.substitutions
    }

    pub fn history(&self) -> impl Iterator<Item = ActivityCategory> + '_ {
        self.history.iter().copied()
    }
}

impl Default for ActivitySelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::human::HumanState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn uniform_weights() -> WeightVector {
        [1.0; ActivityCategory::ALL.len()]
    }

    #[test]
    fn category_display_is_snake_case() {
        assert_eq!(ActivityCategory::MouseMovement.to_string(), "mouse_movement");
        assert_eq!(ActivityCategory::CopyPaste.to_string(), "copy_paste");
    }

    #[test]
    fn index_round_trips() {
        for (i, category) in ActivityCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn no_run_exceeds_the_detection_threshold() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut selector = ActivitySelector::new();
        // Weights that would all but guarantee long runs without the rule.
        let mut weights = [0.001; ActivityCategory::ALL.len()];
        weights[ActivityCategory::MouseClick.index()] = 1_000.0;

        let picks: Vec<ActivityCategory> =
            (0..5_000).map(|_| selector.choose(&weights, &mut rng)).collect();

        let mut run = 1;
        for pair in picks.windows(2) {
            if pair[0] == pair[1] {
                run += 1;
            } else {
                run = 1;
            }
            assert!(
                run <= PATTERN_DETECTION_THRESHOLD,
                "run of {run} identical picks"
            );
        }
        assert!(selector.substitutions() > 0);
    }

    #[test]
    fn empirical_distribution_tracks_the_weights() {
        let mut rng = StdRng::seed_from_u64(32);
        let mut selector = ActivitySelector::new();
        let mut weights = uniform_weights();
        weights[ActivityCategory::Navigation.index()] = 5.0;
        // Normalized share of navigation would be 5/12 ≈ 0.42; the
        // anti-repetition remap shaves some of that off.

        let n = 20_000;
        let mut counts = [0u32; ActivityCategory::ALL.len()];
        for _ in 0..n {
            counts[selector.choose(&weights, &mut rng).index()] += 1;
        }

        let nav_share = counts[ActivityCategory::Navigation.index()] as f64 / n as f64;
        assert!((0.3..0.48).contains(&nav_share), "share {nav_share}");
        for (i, count) in counts.iter().enumerate() {
            assert!(*count > 0, "category {i} never chosen");
        }
    }

    #[test]
    fn degenerate_weights_fall_back_to_uniform() {
        let mut rng = StdRng::seed_from_u64(33);
        let mut selector = ActivitySelector::new();
        let weights = [0.0; ActivityCategory::ALL.len()];

        let mut counts = [0u32; ActivityCategory::ALL.len()];
        for _ in 0..2_000 {
            counts[selector.choose(&weights, &mut rng).index()] += 1;
        }
        for count in counts {
            assert!(count > 100);
        }
    }

    #[test]
    fn history_is_bounded_fifo() {
        let mut rng = StdRng::seed_from_u64(34);
        let mut selector = ActivitySelector::new();
        for _ in 0..100 {
            selector.choose(&uniform_weights(), &mut rng);
        }
        assert_eq!(selector.history().count(), HISTORY_LIMIT);
    }

    #[test]
    fn adjusted_weights_apply_multipliers() {
        let mut selector = ActivitySelector::new();
        selector.multipliers[0] = 0.5;
        let adjusted = selector.adjusted(uniform_weights());
        assert!((adjusted[0] - 0.5).abs() < 1e-9);
        assert!((adjusted[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn adapt_discounts_a_dominant_category() {
        let mut rng = StdRng::seed_from_u64(35);
        let mut selector = ActivitySelector::new();
        let mut timing = TimingModel::sample(&mut rng);
        let mut human = HumanState::new(&mut rng);

        // Saturate the history with one category.
        for _ in 0..HISTORY_LIMIT {
            selector.history.push_back(ActivityCategory::ScrollWheel);
        }
        let before = selector.multipliers[ActivityCategory::ScrollWheel.index()];
        selector.adapt(0.75, &mut timing, &mut human.traits, &mut rng);
        let after = selector.multipliers[ActivityCategory::ScrollWheel.index()];
        assert!((after - before * 0.8).abs() < 1e-9);
    }

    #[test]
    fn adapt_inflates_when_too_robotic() {
        let mut rng = StdRng::seed_from_u64(36);
        let mut selector = ActivitySelector::new();
        let mut timing = TimingModel::sample(&mut rng);
        timing.signature = 1.0;
        let mut human = HumanState::new(&mut rng);
        human.traits.mistake_frequency = 0.05;

        selector.adapt(0.2, &mut timing, &mut human.traits, &mut rng);
        assert!(timing.signature > 1.0);
        assert!(human.traits.mistake_frequency > 0.05);
    }

    #[test]
    fn adapt_deflates_when_too_chaotic() {
        let mut rng = StdRng::seed_from_u64(37);
        let mut selector = ActivitySelector::new();
        let mut timing = TimingModel::sample(&mut rng);
        timing.signature = 1.0;
        let mut human = HumanState::new(&mut rng);
        human.traits.mistake_frequency = 0.05;

        selector.adapt(0.95, &mut timing, &mut human.traits, &mut rng);
        assert!(timing.signature < 1.0);
        assert!(human.traits.mistake_frequency < 0.05);
    }

    #[test]
    fn diversity_reflects_distinct_share() {
        let mut selector = ActivitySelector::new();
        assert_eq!(selector.diversity(), 0.0);

        selector.history.push_back(ActivityCategory::MouseClick);
        selector.history.push_back(ActivityCategory::MouseClick);
        selector.history.push_back(ActivityCategory::Navigation);
        selector.history.push_back(ActivityCategory::ScrollWheel);
        assert!((selector.diversity() - 0.75).abs() < 1e-9);
    }
}
