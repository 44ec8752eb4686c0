use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::activity::{ActivityCategory, ActivityEvent, ActivitySelector, ADAPT_INTERVAL};
use crate::analytics::{SessionAnalytics, SessionSummary};
use crate::clock::Clock;
use crate::config::{Config, PatternProfile};
use crate::control::{KillSwitch, StopReason, StopToken};
use crate::effector::{EffectorError, InputEffector, SafeZone};
use crate::human::HumanState;
use crate::minute::MinuteBudget;
use crate::pattern::{self, PatternArchetype};
use crate::perform::{self, ActionCtx};
use crate::timing::TimingModel;
use crate::window::WindowPlan;

const SIDEBAR_FLOURISH_CHANCE: f64 = 0.05;
const INTERRUPTION_CHANCE: f64 = 0.02;
const FOLLOWUP_BREAK_CHANCE: f64 = 0.3;

/// What one minute did; windows collect these, scenario tests assert on
/// them.
#[derive(Debug, Clone, Copy)]
pub struct MinuteOutcome {
    pub minute: usize,
    pub idle: bool,
    pub performed: u32,
    pub target: u32,
}

/// Top-level driver: windows until the requested duration elapses or a stop
/// arrives, minutes inside windows, activities inside minutes. Everything
/// runs on the calling thread; the only shared state is the stop token.
pub struct SessionController<E: InputEffector, C: Clock> {
    config: Config,
    profile: PatternProfile,
    effector: E,
    clock: C,
    stop: StopToken,
    kill_switch: KillSwitch,
    rng: StdRng,
    human: HumanState,
    timing: TimingModel,
    selector: ActivitySelector,
    analytics: SessionAnalytics,
    zone: SafeZone,
    error_count: u32,
    stop_reason: Option<StopReason>,
}

impl<E: InputEffector, C: Clock> SessionController<E, C> {
    pub fn new(config: Config, effector: E, clock: C, stop: StopToken, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let human = HumanState::new(&mut rng);
        let timing = TimingModel::sample(&mut rng);
        let zone = SafeZone::from_screen(config.screen_width, config.screen_height);
        let kill_switch = KillSwitch::new(&config.kill_switch_file);
        let profile = config.pattern_profile();
        Self {
            config,
            profile,
            effector,
            clock,
            stop,
            kill_switch,
            rng,
            human,
            timing,
            selector: ActivitySelector::new(),
            analytics: SessionAnalytics::new(),
            zone,
            error_count: 0,
            stop_reason: None,
        }
    }

    /// Run the session for `requested` wall-clock time and return its one
    /// summary report.
    pub fn run(&mut self, requested: Duration) -> SessionSummary {
        let start = self.clock.now();
        let deadline = start + requested;
        info!(
            hours = requested.as_secs_f64() / 3600.0,
            movement_style = %self.human.traits.movement_style,
            "session start"
        );

        let mut window_index: u64 = 0;
        while self.clock.now() < deadline && self.checkpoint() {
            let remaining = deadline.saturating_sub(self.clock.now());
            let plan = WindowPlan::generate(window_index, remaining, &mut self.rng);
            info!(
                window = plan.index + 1,
                scale = plan.scale,
                minutes = plan.minute_count(),
                "window start"
            );
            self.run_window(&plan, start);
            window_index += 1;

            // Context-switch pause between windows, skipped when stopping.
            if self.stop.is_running() && self.clock.now() < deadline {
                let pause = self.rng.gen_range(2.0..5.0);
                self.clock.sleep(Duration::from_secs_f64(pause));
            }
        }

        self.finish(start, requested)
    }

    /// Execute one planned window. Effector errors never escape this
    /// boundary; they are counted at the dispatch site and, past the
    /// budget, flip the stop token, which the minute loop observes at its
    /// next checkpoint.
    pub fn run_window(&mut self, plan: &WindowPlan, session_start: Duration) -> Vec<MinuteOutcome> {
        let window_start = self.clock.now();
        let window_end = window_start + plan.duration;
        let mut outcomes = Vec::with_capacity(plan.minute_count());

        for minute in 0..plan.minute_count() {
            if !self.checkpoint() {
                break;
            }
            // Boundaries come from the window schedule, not the current
            // time, so an overshooting minute shortens its successor
            // instead of drifting every boundary after it.
            let minute_end =
                (window_start + Duration::from_secs(60 * (minute as u64 + 1))).min(window_end);
            outcomes.push(self.run_minute(plan, minute, minute_end, session_start));
        }
        outcomes
    }

    fn run_minute(
        &mut self,
        plan: &WindowPlan,
        minute: usize,
        minute_end: Duration,
        session_start: Duration,
    ) -> MinuteOutcome {
        if plan.is_idle(minute) {
            debug!(minute, "idle minute");
            let now = self.clock.now();
            if minute_end > now {
                self.clock.sleep(minute_end - now);
            }
            return MinuteOutcome {
                minute,
                idle: true,
                performed: 0,
                target: 0,
            };
        }

        let elapsed_hours =
            self.clock.now().saturating_sub(session_start).as_secs_f64() / 3600.0;
        self.human
            .update(elapsed_hours, self.clock.local_hour(), &mut self.rng);

        let budget = MinuteBudget::draw(plan.scale, self.human.focus, &mut self.rng);
        let archetype = PatternArchetype::sample(&mut self.rng);
        let hour = self.clock.local_hour();
        let weekday = self.clock.weekday();
        let time_modifier = pattern::time_of_day_modifier(hour, weekday, &mut self.rng);
        let intensity = pattern::work_intensity(hour, weekday, &mut self.rng);

        let mut weights = archetype.base_weights(&mut self.rng);
        for w in weights.iter_mut() {
            *w *= time_modifier * intensity;
        }
        let weights = self.selector.adjusted(weights);

        debug!(
            minute,
            %archetype,
            target = budget.target_activities,
            seconds = budget.max_active_seconds,
            "active minute"
        );

        let mut seconds_used = 0.0;
        let mut performed = 0u32;
        while seconds_used < budget.max_active_seconds
            && self.clock.now() < minute_end
            && performed < budget.target_activities
            && self.checkpoint()
        {
            let category = self.selector.choose(&weights, &mut self.rng);
            let began = self.clock.now();
            match self.dispatch(category) {
                Ok(()) => {
                    let took = self.clock.now().saturating_sub(began);
                    self.analytics.record(ActivityEvent {
                        category,
                        at: began.saturating_sub(session_start),
                        duration: took,
                    });
                    if self.analytics.total_activities % ADAPT_INTERVAL == 0 {
                        let likeness = self.analytics.human_likeness();
                        self.selector.adapt(
                            likeness,
                            &mut self.timing,
                            &mut self.human.traits,
                            &mut self.rng,
                        );
                    }
                }
                Err(e) => {
                    let context = category.to_string();
                    self.note_error(&context, &e);
                }
            }
            performed += 1;
            seconds_used += self.clock.now().saturating_sub(began).as_secs_f64();

            self.side_actions();

            if seconds_used < budget.max_active_seconds
                && performed < budget.target_activities
                && self.stop.is_running()
            {
                let base = self.rng.gen_range(0.02..0.3);
                let delay = self.timing.paced_delay(base, &self.human, &mut self.rng);
                self.clock.sleep(delay);
            }
        }

        self.human.note_active_minute();
        if self.stop.is_running() && self.human.should_take_break(&mut self.rng) {
            self.take_break();
        }

        // Sleep off the rest of the minute so wall-clock boundaries stay
        // exact, unless the session is stopping.
        if self.stop.is_running() {
            let now = self.clock.now();
            if minute_end > now {
                self.clock.sleep(minute_end - now);
            }
        }

        MinuteOutcome {
            minute,
            idle: false,
            performed,
            target: budget.target_activities,
        }
    }

    fn action_ctx(&mut self) -> ActionCtx<'_, E, C> {
        ActionCtx {
            effector: &mut self.effector,
            clock: &self.clock,
            rng: &mut self.rng,
            human: &self.human,
            timing: &self.timing,
            zone: self.zone,
            profile: self.profile,
        }
    }

    fn dispatch(&mut self, category: ActivityCategory) -> Result<(), EffectorError> {
        debug!(%category, "activity");
        let mut ctx = self.action_ctx();
        perform::run(category, &mut ctx)
    }

    /// Mistakes, interruptions, and the occasional panel flick, each gated
    /// by its own probability draw. Suppressed entirely once a stop has
    /// been requested.
    fn side_actions(&mut self) {
        if !self.stop.is_running() {
            return;
        }
        if self.rng.gen::<f64>() < SIDEBAR_FLOURISH_CHANCE {
            let mut ctx = self.action_ctx();
            perform::sidebar_flourish(&mut ctx);
        }

        if self.rng.gen::<f64>() < self.human.traits.mistake_frequency {
            let result = {
                let mut ctx = self.action_ctx();
                perform::mistake(&mut ctx)
            };
            match result {
                Ok(()) => self.analytics.mistakes += 1,
                Err(e) => self.note_error("mistake", &e),
            }
        }

        if self.rng.gen::<f64>() < INTERRUPTION_CHANCE {
            {
                let mut ctx = self.action_ctx();
                perform::interruption(&mut ctx);
            }
            self.analytics.interruptions += 1;
            if self.rng.gen::<f64>() < FOLLOWUP_BREAK_CHANCE {
                self.take_break();
            }
        }
    }

    fn take_break(&mut self) {
        let lo = self.config.idle_period.min_secs.max(0.0);
        let hi = self.config.idle_period.max_secs;
        let secs = if lo < hi { self.rng.gen_range(lo..hi) } else { lo };
        debug!(seconds = secs, "micro-break");
        self.clock.sleep(Duration::from_secs_f64(secs));
        self.human.rest(secs, &mut self.rng);
        self.analytics.breaks += 1;
    }

    fn note_error(&mut self, context: &str, error: &EffectorError) {
        self.error_count += 1;
        warn!(
            context,
            error = %error,
            count = self.error_count,
            max = self.config.max_errors,
            "recovered error"
        );
        if self.error_count >= self.config.max_errors {
            warn!("error limit reached, stopping session");
            self.stop_reason.get_or_insert(StopReason::ErrorLimit);
            self.stop.request_stop();
        }
    }

    /// Stop-token and kill-switch check, run at every loop boundary.
    fn checkpoint(&mut self) -> bool {
        if self.stop.is_running() && self.kill_switch.triggered() {
            info!(path = %self.kill_switch.path().display(), "kill switch consumed, stopping");
            self.stop_reason.get_or_insert(StopReason::KillSwitch);
            self.stop.request_stop();
        }
        self.stop.is_running()
    }

    fn finish(&mut self, start: Duration, requested: Duration) -> SessionSummary {
        let reason = *self.stop_reason.get_or_insert(if self.stop.is_running() {
            StopReason::Completed
        } else {
            StopReason::Interrupted
        });
        self.stop.request_stop();

        let elapsed = self.clock.now().saturating_sub(start);
        let summary = self.analytics.summary(
            requested,
            elapsed,
            self.error_count,
            self.selector.substitutions(),
            &self.human,
            reason,
        );
        info!(
            reason = %summary.stop_reason,
            activities = summary.total_activities,
            mistakes = summary.mistakes,
            elapsed = %summary.humanized_elapsed(),
            "session finished"
        );
        summary
    }
}
