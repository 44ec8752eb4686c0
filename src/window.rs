use std::time::Duration;

use rand::Rng;

/// Minutes per scheduling window.
pub const WINDOW_MINUTES: usize = 10;

/// Nominal window length.
pub const WINDOW_SECONDS: u64 = 600;

/// Lowest and highest activity scale a window can be assigned.
pub const SCALE_RANGE: (u8, u8) = (7, 9);

/// One 10-minute scheduling unit: an activity scale and the scattered idle
/// minute slots it implies. `scale` of a window's 10 minutes are active,
/// the rest idle; the idle slots are drawn without replacement so the
/// active minutes never form a predictable burst-then-idle block.
#[derive(Debug, Clone)]
pub struct WindowPlan {
    pub index: u64,
    pub scale: u8,
    /// `min(600s, remaining session time)`.
    pub duration: Duration,
    idle_minutes: Vec<usize>,
}

impl WindowPlan {
    pub fn generate<R: Rng>(index: u64, remaining: Duration, rng: &mut R) -> Self {
        let scale = rng.gen_range(SCALE_RANGE.0..=SCALE_RANGE.1);
        Self::with_scale(index, scale, remaining, rng)
    }

    /// Plan a window with a fixed scale (scenario tests rely on this).
    pub fn with_scale<R: Rng>(index: u64, scale: u8, remaining: Duration, rng: &mut R) -> Self {
        debug_assert!((SCALE_RANGE.0..=SCALE_RANGE.1).contains(&scale));
        let idle_count = WINDOW_MINUTES - scale as usize;
        let idle_minutes = rand::seq::index::sample(rng, WINDOW_MINUTES, idle_count).into_vec();
        Self {
            index,
            scale,
            duration: remaining.min(Duration::from_secs(WINDOW_SECONDS)),
            idle_minutes,
        }
    }

    pub fn is_idle(&self, minute: usize) -> bool {
        self.idle_minutes.contains(&minute)
    }

    pub fn idle_minutes(&self) -> &[usize] {
        &self.idle_minutes
    }

    /// Whole or partial minutes this window will actually execute; 10 for a
    /// full window, fewer when truncated by the session deadline.
    pub fn minute_count(&self) -> usize {
        let minutes = (self.duration.as_secs_f64() / 60.0).ceil() as usize;
        minutes.min(WINDOW_MINUTES)
    }
}
