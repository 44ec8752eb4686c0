use std::time::Duration;

use rand::Rng;

use crate::human::HumanState;

/// Delays never drop below this, whatever the jitter math produces.
pub const MIN_DELAY_SECS: f64 = 0.01;

/// Chance of a single delay landing far off its nominal value, modeling the
/// occasional human lapse or burst.
const OUTLIER_CHANCE: f64 = 0.1;

pub const SIGNATURE_BOUNDS: (f64, f64) = (0.5, 2.0);

/// Two-stage delay model.
///
/// `human_delay` scales a base delay by physiological state (fatigue slows,
/// focus speeds up) plus a per-call spread; `jitter` then applies the
/// session's personal timing signature, muscle-memory micro-variation, a
/// rare large excursion, and a constant micro-delay offset. The stages stay
/// separate so each can be tuned and tested on its own.
#[derive(Debug)]
pub struct TimingModel {
    pub signature: f64,
    micro_offset: f64,
}

impl TimingModel {
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            signature: rng.gen_range(0.8..1.2),
            micro_offset: rng.gen_range(0.02..0.08),
        }
    }

    pub fn human_delay<R: Rng>(&self, base: f64, human: &HumanState, rng: &mut R) -> f64 {
        let fatigue_multiplier = 1.0 + human.fatigue * 0.5;
        let focus_multiplier = 2.0 - human.focus;
        base * fatigue_multiplier * focus_multiplier * rng.gen_range(0.8..1.3)
    }

    pub fn jitter<R: Rng>(&self, delay: f64, rng: &mut R) -> f64 {
        let muscle_memory = rng.gen_range(0.95..1.05);
        let outlier = if rng.gen::<f64>() < OUTLIER_CHANCE {
            rng.gen_range(0.5..2.0)
        } else {
            1.0
        };
        (delay * self.signature * muscle_memory * outlier + self.micro_offset).max(MIN_DELAY_SECS)
    }

    /// Both stages composed, as a `Duration` ready to sleep on.
    pub fn paced_delay<R: Rng>(&self, base: f64, human: &HumanState, rng: &mut R) -> Duration {
        Duration::from_secs_f64(self.jitter(self.human_delay(base, human, rng), rng))
    }

    /// How much longer in-activity movements take in the current state;
    /// 1.0 for a fresh, fully focused person.
    pub fn movement_scale(&self, human: &HumanState) -> f64 {
        (1.0 + human.fatigue * 0.5) * (2.0 - human.focus)
    }

    /// Multiplicative feedback nudge from the adaptive layer, kept within
    /// sane bounds so repeated corrections cannot run away.
    pub fn nudge_signature(&mut self, factor: f64) {
        let (lo, hi) = SIGNATURE_BOUNDS;
        self.signature = (self.signature * factor).clamp(lo, hi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rested(rng: &mut StdRng) -> HumanState {
        let mut human = HumanState::new(rng);
        human.fatigue = 0.0;
        human.focus = 1.0;
        human
    }

    #[test]
    fn human_delay_spreads_around_the_base() {
        let mut rng = StdRng::seed_from_u64(21);
        let timing = TimingModel::sample(&mut rng);
        let human = rested(&mut rng);

        for _ in 0..1_000 {
            let d = timing.human_delay(1.0, &human, &mut rng);
            assert!((0.8..1.3).contains(&d), "rested delay out of spread: {d}");
        }
    }

    #[test]
    fn fatigue_and_low_focus_slow_things_down() {
        let mut rng = StdRng::seed_from_u64(22);
        let timing = TimingModel::sample(&mut rng);

        let mut tired = HumanState::new(&mut rng);
        tired.fatigue = 1.0;
        tired.focus = 0.3;

        // Worst-case multiplier 1.5 * 1.7; even the luckiest spread draw
        // stays above the rested worst case.
        for _ in 0..1_000 {
            let d = timing.human_delay(1.0, &tired, &mut rng);
            assert!(d >= 1.5 * 1.7 * 0.8 - 1e-9);
        }
    }

    #[test]
    fn jitter_never_goes_below_the_floor() {
        let mut rng = StdRng::seed_from_u64(23);
        let timing = TimingModel::sample(&mut rng);

        for _ in 0..5_000 {
            assert!(timing.jitter(0.0, &mut rng) >= MIN_DELAY_SECS);
            assert!(timing.jitter(0.0001, &mut rng) >= MIN_DELAY_SECS);
        }
    }

    #[test]
    fn jitter_produces_occasional_excursions() {
        let mut rng = StdRng::seed_from_u64(24);
        let mut timing = TimingModel::sample(&mut rng);
        timing.signature = 1.0;

        let outliers = (0..10_000)
            .map(|_| timing.jitter(1.0, &mut rng))
            .filter(|d| !(0.9..=1.2).contains(d))
            .count();
        // ~10% of draws take the 0.5x-2.0x excursion path.
        assert!(outliers > 500, "only {outliers} excursions in 10k draws");
        assert!(outliers < 1_500, "{outliers} excursions in 10k draws");
    }

    #[test]
    fn paced_delay_is_a_positive_duration() {
        let mut rng = StdRng::seed_from_u64(25);
        let timing = TimingModel::sample(&mut rng);
        let human = rested(&mut rng);

        let d = timing.paced_delay(0.05, &human, &mut rng);
        assert!(d >= Duration::from_millis(10));
    }

    #[test]
    fn signature_nudges_stay_clamped() {
        let mut rng = StdRng::seed_from_u64(26);
        let mut timing = TimingModel::sample(&mut rng);

        for _ in 0..50 {
            timing.nudge_signature(1.5);
        }
        assert!(timing.signature <= SIGNATURE_BOUNDS.1);

        for _ in 0..100 {
            timing.nudge_signature(0.7);
        }
        assert!(timing.signature >= SIGNATURE_BOUNDS.0);
    }

    #[test]
    fn movement_scale_is_one_when_fresh() {
        let mut rng = StdRng::seed_from_u64(27);
        let timing = TimingModel::sample(&mut rng);
        let human = rested(&mut rng);
        assert!((timing.movement_scale(&human) - 1.0).abs() < 1e-9);
    }
}
