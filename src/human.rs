use rand::Rng;

/// How this particular "person" moves the pointer. Fixed for the session,
/// drawn once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MovementStyle {
    Smooth,
    Jerky,
    Deliberate,
    Quick,
}

impl MovementStyle {
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        match rng.gen_range(0..4) {
            0 => MovementStyle::Smooth,
            1 => MovementStyle::Jerky,
            2 => MovementStyle::Deliberate,
            _ => MovementStyle::Quick,
        }
    }

    pub fn speed_multiplier(self) -> f64 {
        match self {
            MovementStyle::Smooth => 0.8,
            MovementStyle::Jerky => 1.3,
            MovementStyle::Deliberate => 0.6,
            MovementStyle::Quick => 1.5,
        }
    }

    pub fn steps_multiplier(self) -> f64 {
        match self {
            MovementStyle::Smooth => 1.5,
            MovementStyle::Jerky => 0.7,
            MovementStyle::Deliberate => 2.0,
            MovementStyle::Quick => 0.8,
        }
    }
}

/// Per-session quirks that stay constant while state (fatigue, focus)
/// evolves. The adaptive feedback layer may nudge `mistake_frequency`, so it
/// carries its own clamp.
#[derive(Debug, Clone)]
pub struct PersonalTraits {
    pub mistake_frequency: f64,
    pub distraction_proneness: f64,
    pub movement_style: MovementStyle,
}

pub const MISTAKE_FREQUENCY_BOUNDS: (f64, f64) = (0.005, 0.25);

impl PersonalTraits {
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            mistake_frequency: rng.gen_range(0.02..0.08),
            distraction_proneness: rng.gen_range(0.05..0.2),
            movement_style: MovementStyle::sample(rng),
        }
    }

    pub fn nudge_mistake_frequency(&mut self, factor: f64) {
        let (lo, hi) = MISTAKE_FREQUENCY_BOUNDS;
        self.mistake_frequency = (self.mistake_frequency * factor).clamp(lo, hi);
    }
}

/// Fatigue/focus state machine, updated once per simulated active minute.
///
/// Fatigue only ever falls through a break; focus wanders with fatigue, a
/// random spread, and the time of day, but always lands back in [0.3, 1.0].
#[derive(Debug)]
pub struct HumanState {
    pub fatigue: f64,
    pub focus: f64,
    pub consecutive_active_minutes: u32,
    pub break_needed: bool,
    break_threshold: u32,
    pub traits: PersonalTraits,
}

impl HumanState {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            fatigue: 0.0,
            focus: rng.gen_range(0.7..1.0),
            consecutive_active_minutes: 0,
            break_needed: false,
            break_threshold: rng.gen_range(45..=90),
            traits: PersonalTraits::sample(rng),
        }
    }

    /// Recompute fatigue and focus for the minute about to run.
    pub fn update<R: Rng>(&mut self, elapsed_session_hours: f64, hour_of_day: u32, rng: &mut R) {
        let base_fatigue = (elapsed_session_hours * 0.1).min(0.8);
        let activity_fatigue = self.consecutive_active_minutes as f64 * 0.02;
        self.fatigue = (base_fatigue + activity_fatigue).clamp(0.0, 1.0);

        let base_focus = 1.0 - self.fatigue * 0.5;
        let variation = rng.gen_range(-0.2..0.2);
        let focus = (base_focus + variation) * time_of_day_focus(hour_of_day);
        self.focus = focus.clamp(0.3, 1.0);

        if self.consecutive_active_minutes > self.break_threshold {
            self.break_needed = true;
        }
    }

    pub fn note_active_minute(&mut self) {
        self.consecutive_active_minutes += 1;
    }

    /// A break is taken either because one is due, or spontaneously with a
    /// probability that grows with fatigue and distraction proneness.
    pub fn should_take_break<R: Rng>(&self, rng: &mut R) -> bool {
        if self.break_needed {
            return true;
        }
        let chance = self.fatigue * 0.1 + self.traits.distraction_proneness;
        rng.gen::<f64>() < chance
    }

    /// Bookkeeping after a micro-break of `break_secs`: focus recovers a
    /// little, the active-minute streak drops (not to zero), the break flag
    /// clears, and a fresh threshold is drawn for the next break.
    pub fn rest<R: Rng>(&mut self, break_secs: f64, rng: &mut R) {
        let recovery = if break_secs > 20.0 { 0.15 } else { 0.1 };
        self.focus = (self.focus + recovery).min(1.0);
        self.consecutive_active_minutes = self.consecutive_active_minutes.saturating_sub(5);
        self.break_needed = false;
        self.break_threshold = rng.gen_range(45..=90);
    }
}

/// Morning peak, post-lunch dip, late-afternoon recovery.
fn time_of_day_focus(hour: u32) -> f64 {
    match hour {
        9..=11 => 1.2,
        13..=15 => 0.8,
        16..=18 => 1.1,
        _ => 1.0,
    }
}
