use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::activity::ActivityCategory;
use crate::clock::Clock;
use crate::config::PatternProfile;
use crate::effector::{EffectorError, InputEffector, Key, MouseButton, SafeZone, ScrollDirection};
use crate::human::HumanState;
use crate::timing::TimingModel;

/// Everything a performer needs, borrowed from the controller for the span
/// of one activity.
pub struct ActionCtx<'a, E: InputEffector, C: Clock> {
    pub effector: &'a mut E,
    pub clock: &'a C,
    pub rng: &'a mut StdRng,
    pub human: &'a HumanState,
    pub timing: &'a TimingModel,
    pub zone: SafeZone,
    pub profile: PatternProfile,
}

/// Translate one chosen category into effector primitives.
pub fn run<E: InputEffector, C: Clock>(
    category: ActivityCategory,
    ctx: &mut ActionCtx<'_, E, C>,
) -> Result<(), EffectorError> {
    match category {
        ActivityCategory::MouseMovement => mouse_movement(ctx),
        ActivityCategory::MouseClick => mouse_clicks(ctx),
        ActivityCategory::Navigation => navigation(ctx),
        ActivityCategory::TabSwitching => tab_switching(ctx),
        ActivityCategory::ScrollWheel => scroll_wheel(ctx),
        ActivityCategory::TextSelection => text_selection(ctx),
        ActivityCategory::CopyPaste => copy_paste(ctx),
        ActivityCategory::HoverBehavior => hover(ctx),
    }
}

const NAV_KEYS: [Key; 13] = [
    Key::Up,
    Key::Down,
    Key::Left,
    Key::Right,
    Key::PageUp,
    Key::PageDown,
    Key::Home,
    Key::End,
    Key::Tab,
    Key::Enter,
    Key::Space,
    Key::Backspace,
    Key::Delete,
];

fn random_direction(rng: &mut StdRng) -> ScrollDirection {
    if rng.gen_bool(0.5) {
        ScrollDirection::Up
    } else {
        ScrollDirection::Down
    }
}

/// Normal-distributed millisecond draw clamped to a sane range.
fn sample_ms<R: Rng>(rng: &mut R, mean: f64, std: f64, min: u64, max: u64) -> u64 {
    let normal = Normal::new(mean, std).unwrap_or_else(|_| Normal::new(mean, 1.0).unwrap());
    let sample: f64 = normal.sample(rng);
    (sample.round() as u64).clamp(min, max)
}

fn sleep_secs<E: InputEffector, C: Clock>(ctx: &mut ActionCtx<'_, E, C>, secs: f64) {
    ctx.clock.sleep(Duration::from_secs_f64(secs.max(0.0)));
}

fn jittered_sleep<E: InputEffector, C: Clock>(ctx: &mut ActionCtx<'_, E, C>, base: f64) {
    let secs = ctx.timing.jitter(base, ctx.rng);
    ctx.clock.sleep(Duration::from_secs_f64(secs));
}

fn paced_sleep<E: InputEffector, C: Clock>(ctx: &mut ActionCtx<'_, E, C>, base: f64) {
    let dur = ctx.timing.paced_delay(base, ctx.human, ctx.rng);
    ctx.clock.sleep(dur);
}

/// Stepped move toward a target with per-step wobble; step pacing follows
/// the personal movement style and the current fatigue/focus scale.
fn stepped_move<E: InputEffector, C: Clock>(
    ctx: &mut ActionCtx<'_, E, C>,
    from: (i32, i32),
    to: (i32, i32),
    wobble: i32,
) -> Result<(), EffectorError> {
    let style = ctx.human.traits.movement_style;
    let steps = ((ctx.rng.gen_range(5..=15) as f64 * style.steps_multiplier()).round() as i32)
        .max(2);
    let step_mean = 5.0 * ctx.timing.movement_scale(ctx.human) / style.speed_multiplier();
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let wx = ctx.rng.gen_range(-wobble..=wobble);
        let wy = ctx.rng.gen_range(-wobble..=wobble);
        let (px, py) = ctx.zone.clamp(
            from.0 + ((to.0 - from.0) as f64 * t) as i32 + wx,
            from.1 + ((to.1 - from.1) as f64 * t) as i32 + wy,
        );
        ctx.effector.move_to(px, py)?;
        let ms = sample_ms(ctx.rng, step_mean, 2.0, 2, 30);
        ctx.clock.sleep(Duration::from_millis(ms));
    }
    let (fx, fy) = ctx.zone.clamp(to.0, to.1);
    ctx.effector.move_to(fx, fy)
}

fn mouse_movement<E: InputEffector, C: Clock>(
    ctx: &mut ActionCtx<'_, E, C>,
) -> Result<(), EffectorError> {
    if ctx.rng.gen::<f64>() > ctx.profile.mouse_movement_frequency {
        return Ok(());
    }
    let (cx, cy) = ctx.effector.position()?;
    let (mut x, mut y) = ctx.zone.clamp(cx, cy);

    // Movement shape: around the cursor, to a nearby area, across the
    // screen, or a multi-hop random walk.
    let shape = ctx.rng.gen_range(0..4);
    let (num_moves, max_step) = match shape {
        0 => (ctx.rng.gen_range(2..=5), ctx.rng.gen_range(20..=60)),
        1 => (ctx.rng.gen_range(3..=6), ctx.rng.gen_range(100..=300)),
        2 => (
            ctx.rng.gen_range(1..=3),
            ctx.zone.width().max(ctx.zone.height()) / 2,
        ),
        _ => (ctx.rng.gen_range(5..=12), ctx.rng.gen_range(30..=80)),
    };

    for _ in 0..num_moves {
        let (tx, ty) = if shape == 2 {
            ctx.zone.random_point(ctx.rng)
        } else {
            let dx = ctx.rng.gen_range(-max_step..=max_step);
            let dy = ctx.rng.gen_range(-max_step..=max_step);
            ctx.zone.clamp(x + dx, y + dy)
        };
        stepped_move(ctx, (x, y), (tx, ty), 5)?;
        x = tx;
        y = ty;
        let pause = ctx.rng.gen_range(0.1..0.3);
        sleep_secs(ctx, pause);
    }
    Ok(())
}

fn mouse_clicks<E: InputEffector, C: Clock>(
    ctx: &mut ActionCtx<'_, E, C>,
) -> Result<(), EffectorError> {
    if ctx.rng.gen::<f64>() > ctx.profile.click_frequency {
        return Ok(());
    }
    let num_clicks = ctx.rng.gen_range(1..=6);
    for _ in 0..num_clicks {
        let (x, y) = ctx.zone.random_point(ctx.rng);
        ctx.effector.move_to(x, y)?;
        let travel_ms = sample_ms(ctx.rng, 180.0, 60.0, 80, 400);
        ctx.clock.sleep(Duration::from_millis(travel_ms));

        // Mostly single left clicks, occasionally a double; right and
        // middle clicks would open context menus.
        if ctx.rng.gen_range(0..4) == 3 {
            ctx.effector.double_click()?;
        } else {
            ctx.effector.click(MouseButton::Left)?;
        }
        if num_clicks > 1 {
            let gap = ctx.rng.gen_range(0.05..0.3);
            sleep_secs(ctx, gap);
        }
    }
    let tail = ctx.rng.gen_range(0.1..1.0);
    sleep_secs(ctx, tail);
    Ok(())
}

fn navigation<E: InputEffector, C: Clock>(
    ctx: &mut ActionCtx<'_, E, C>,
) -> Result<(), EffectorError> {
    let gate = ctx.rng.gen_range(0.4..0.7);
    if ctx.rng.gen::<f64>() > gate {
        return Ok(());
    }
    let num_keys = ctx.rng.gen_range(1..=4);
    for _ in 0..num_keys {
        let key = *NAV_KEYS.choose(ctx.rng).unwrap_or(&Key::Down);
        ctx.effector.press_key(key)?;
        let gap_ms = sample_ms(ctx.rng, 65.0, 25.0, 40, 120);
        ctx.clock.sleep(Duration::from_millis(gap_ms));
    }
    let tail = ctx.rng.gen_range(0.2..0.8);
    sleep_secs(ctx, tail);
    Ok(())
}

fn tab_switching<E: InputEffector, C: Clock>(
    ctx: &mut ActionCtx<'_, E, C>,
) -> Result<(), EffectorError> {
    if ctx.rng.gen::<f64>() > 0.7 {
        return Ok(());
    }
    let num_switches = ctx.rng.gen_range(1..=5);
    for _ in 0..num_switches {
        if ctx.rng.gen_bool(0.5) {
            match ctx.rng.gen_range(0..3) {
                0 => ctx.effector.key_combo(&[Key::Ctrl, Key::Tab])?,
                1 => ctx.effector.key_combo(&[Key::Ctrl, Key::Shift, Key::Tab])?,
                _ => {
                    ctx.effector.key_combo(&[Key::Alt, Key::Tab])?;
                    let pause = ctx.rng.gen_range(0.1..0.3);
                    sleep_secs(ctx, pause);
                    // And switch back.
                    ctx.effector.key_combo(&[Key::Alt, Key::Tab])?;
                }
            }
        } else {
            let strip = ctx.zone.tab_strip();
            let (x, y) = strip.random_point(ctx.rng);
            ctx.effector.move_to(x, y)?;
            let pause = ctx.rng.gen_range(0.1..0.3);
            sleep_secs(ctx, pause);
            ctx.effector.click(MouseButton::Left)?;
        }
        if num_switches > 1 {
            let gap = ctx.rng.gen_range(0.3..1.0);
            sleep_secs(ctx, gap);
        }
    }

    // Closing a tab is rare, roughly once an hour at typical densities.
    if ctx.rng.gen::<f64>() < 0.01 {
        let strip = ctx.zone.tab_strip();
        let x = ctx.rng.gen_range((strip.x_max - 180).max(strip.x_min)..=strip.x_max);
        let y = ctx.rng.gen_range(strip.y_min..=strip.y_max);
        ctx.effector.move_to(x, y)?;
        let pause = ctx.rng.gen_range(0.2..0.4);
        sleep_secs(ctx, pause);
        ctx.effector.click(MouseButton::Left)?;
        let settle = ctx.rng.gen_range(0.5..1.5);
        sleep_secs(ctx, settle);
    }

    let tail = ctx.rng.gen_range(0.5..2.0);
    sleep_secs(ctx, tail);
    Ok(())
}

fn scroll_wheel<E: InputEffector, C: Clock>(
    ctx: &mut ActionCtx<'_, E, C>,
) -> Result<(), EffectorError> {
    let (x, y) = ctx.zone.random_point(ctx.rng);
    ctx.effector.move_to(x, y)?;
    let settle = ctx.rng.gen_range(0.1..0.3);
    sleep_secs(ctx, settle);

    match ctx.rng.gen_range(0..5) {
        // Smooth continuous scrolling in one direction.
        0 => {
            let dir = random_direction(ctx.rng);
            for _ in 0..ctx.rng.gen_range(3..=8) {
                let amount = ctx.rng.gen_range(1..=3);
                ctx.effector.scroll(dir, amount)?;
                let gap = ctx.rng.gen_range(0.1..0.3);
                sleep_secs(ctx, gap);
            }
        }
        // Quick bursts.
        1 => {
            for _ in 0..ctx.rng.gen_range(2..=4) {
                let dir = random_direction(ctx.rng);
                for _ in 0..ctx.rng.gen_range(2..=5) {
                    let amount = ctx.rng.gen_range(2..=4);
                    ctx.effector.scroll(dir, amount)?;
                    let gap = ctx.rng.gen_range(0.05..0.1);
                    sleep_secs(ctx, gap);
                }
                let between = ctx.rng.gen_range(0.2..0.5);
                sleep_secs(ctx, between);
            }
        }
        // Slow deliberate single ticks.
        2 => {
            let dir = random_direction(ctx.rng);
            for _ in 0..ctx.rng.gen_range(5..=12) {
                ctx.effector.scroll(dir, 1)?;
                let gap = ctx.rng.gen_range(0.3..0.8);
                sleep_secs(ctx, gap);
            }
        }
        // Back-and-forth reading pattern.
        3 => {
            for _ in 0..ctx.rng.gen_range(6..=15) {
                let dir = random_direction(ctx.rng);
                let amount = ctx.rng.gen_range(1..=3);
                ctx.effector.scroll(dir, amount)?;
                let gap = ctx.rng.gen_range(0.1..0.4);
                sleep_secs(ctx, gap);
            }
        }
        // Page-sized jumps.
        _ => {
            for _ in 0..ctx.rng.gen_range(1..=3) {
                let dir = random_direction(ctx.rng);
                let amount = ctx.rng.gen_range(8..=15);
                ctx.effector.scroll(dir, amount)?;
                let gap = ctx.rng.gen_range(0.5..1.2);
                sleep_secs(ctx, gap);
            }
        }
    }

    let tail = ctx.rng.gen_range(0.2..0.8);
    sleep_secs(ctx, tail);
    Ok(())
}

fn text_selection<E: InputEffector, C: Clock>(
    ctx: &mut ActionCtx<'_, E, C>,
) -> Result<(), EffectorError> {
    let inner = ctx.zone.shrunk(100);
    match ctx.rng.gen_range(0..4) {
        // Click at a start point, sweep with tremor, click the end point.
        0 => {
            let (sx, sy) = inner.random_point(ctx.rng);
            let approach = ctx.zone.clamp(sx - 40, sy);
            stepped_move(ctx, approach, (sx, sy), 2)?;
            ctx.effector.click(MouseButton::Left)?;
            let ex = sx + ctx.rng.gen_range(50..=300);
            let ey = sy + ctx.rng.gen_range(-20..=60);
            let (ex, ey) = ctx.zone.clamp(ex, ey);
            stepped_move(ctx, (sx, sy), (ex, ey), 2)?;
            ctx.effector.click(MouseButton::Left)?;
        }
        // Double-click a word.
        1 => {
            let (x, y) = inner.random_point(ctx.rng);
            ctx.effector.move_to(x, y)?;
            paced_sleep(ctx, 0.1);
            ctx.effector.double_click()?;
        }
        // Triple-click a line.
        2 => {
            let (x, y) = inner.random_point(ctx.rng);
            ctx.effector.move_to(x, y)?;
            paced_sleep(ctx, 0.1);
            for _ in 0..3 {
                ctx.effector.click(MouseButton::Left)?;
                paced_sleep(ctx, 0.05);
            }
        }
        // Anchor click, pause, range click.
        _ => {
            let (sx, sy) = inner.random_point(ctx.rng);
            ctx.effector.move_to(sx, sy)?;
            ctx.effector.click(MouseButton::Left)?;
            paced_sleep(ctx, 0.5);
            let (ex, ey) = ctx
                .zone
                .clamp(sx + ctx.rng.gen_range(100..=400), sy + ctx.rng.gen_range(-50..=100));
            ctx.effector.move_to(ex, ey)?;
            ctx.effector.click(MouseButton::Left)?;
        }
    }
    let tail = ctx.rng.gen_range(0.3..1.0);
    paced_sleep(ctx, tail);
    Ok(())
}

fn copy_paste<E: InputEffector, C: Clock>(
    ctx: &mut ActionCtx<'_, E, C>,
) -> Result<(), EffectorError> {
    text_selection(ctx)?;

    // Reading the selection, then deciding where it goes. Clipboard key
    // combos are deliberately not used; the workflow is mouse-only.
    let reading = ctx.rng.gen_range(0.2..0.8);
    paced_sleep(ctx, reading);
    let thinking = ctx.rng.gen_range(0.5..2.0);
    paced_sleep(ctx, thinking);

    let inner = ctx.zone.shrunk(100);
    let (x, y) = inner.random_point(ctx.rng);
    ctx.effector.move_to(x, y)?;
    paced_sleep(ctx, 0.5);
    ctx.effector.click(MouseButton::Left)?;
    let settle = ctx.rng.gen_range(0.1..0.5);
    paced_sleep(ctx, settle);

    let tail = ctx.rng.gen_range(0.3..1.0);
    paced_sleep(ctx, tail);
    Ok(())
}

fn hover<E: InputEffector, C: Clock>(ctx: &mut ActionCtx<'_, E, C>) -> Result<(), EffectorError> {
    let inner = ctx.zone.shrunk(50);
    let (x, y) = inner.random_point(ctx.rng);
    let from = ctx.effector.position()?;
    let from = ctx.zone.clamp(from.0, from.1);
    stepped_move(ctx, from, (x, y), 3)?;

    // Dwell as if reading a tooltip.
    let dwell = ctx.rng.gen_range(0.5..2.5);
    paced_sleep(ctx, dwell);

    // Natural hand tremor while holding position.
    for _ in 0..ctx.rng.gen_range(1..=4) {
        let (tx, ty) = ctx
            .zone
            .clamp(x + ctx.rng.gen_range(-3..=3), y + ctx.rng.gen_range(-3..=3));
        ctx.effector.move_to(tx, ty)?;
        sleep_secs(ctx, 0.1);
    }
    Ok(())
}

/// A realistic slip: an accidental extra click, an overshoot that gets
/// corrected, or a selection started in the wrong place.
pub fn mistake<E: InputEffector, C: Clock>(
    ctx: &mut ActionCtx<'_, E, C>,
) -> Result<(), EffectorError> {
    let inner = ctx.zone.shrunk(100);
    match ctx.rng.gen_range(0..3) {
        0 => {
            let (x, y) = inner.random_point(ctx.rng);
            ctx.effector.move_to(x, y)?;
            ctx.effector.click(MouseButton::Left)?;
            jittered_sleep(ctx, 0.1);
            ctx.effector.click(MouseButton::Left)?;
        }
        1 => {
            let (wx, wy) = ctx.zone.random_point(ctx.rng);
            ctx.effector.move_to(wx, wy)?;
            let realizing = ctx.rng.gen_range(0.1..0.4);
            jittered_sleep(ctx, realizing);
            let (cx, cy) = ctx.zone.random_point(ctx.rng);
            ctx.effector.move_to(cx, cy)?;
        }
        _ => {
            let (sx, sy) = inner.random_point(ctx.rng);
            ctx.effector.move_to(sx, sy)?;
            ctx.effector.click(MouseButton::Left)?;
            let (ex, ey) = ctx.zone.clamp(sx + ctx.rng.gen_range(20..=80), sy);
            ctx.effector.move_to(ex, ey)?;
            jittered_sleep(ctx, 0.2);
            // Reselect somewhere sensible.
            let (rx, ry) = inner.random_point(ctx.rng);
            ctx.effector.move_to(rx, ry)?;
            ctx.effector.click(MouseButton::Left)?;
        }
    }
    let recover = ctx.rng.gen_range(0.2..1.0);
    jittered_sleep(ctx, recover);
    Ok(())
}

/// A short real-world distraction: nothing is injected, time just passes.
pub fn interruption<E: InputEffector, C: Clock>(ctx: &mut ActionCtx<'_, E, C>) {
    let secs = ctx.rng.gen_range(1.0..8.0);
    jittered_sleep(ctx, secs);
}

/// Brief sidebar-toggle-style pause: a flick of attention to a panel,
/// sometimes flicking back.
pub fn sidebar_flourish<E: InputEffector, C: Clock>(ctx: &mut ActionCtx<'_, E, C>) {
    let open = ctx.rng.gen_range(0.5..1.2);
    sleep_secs(ctx, open);
    if ctx.rng.gen_bool(0.5) {
        let linger = ctx.rng.gen_range(1.0..3.0);
        sleep_secs(ctx, linger);
        let close = ctx.rng.gen_range(0.3..0.8);
        sleep_secs(ctx, close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TestClock;
    use crate::effector::{EffectorCall, RecordingEffector};
    use rand::SeedableRng;

    fn profile() -> PatternProfile {
        PatternProfile {
            mouse_movement_frequency: 1.0,
            click_frequency: 1.0,
        }
    }

    fn fixtures(seed: u64) -> (RecordingEffector, TestClock, StdRng, HumanState, TimingModel) {
        let mut rng = StdRng::seed_from_u64(seed);
        let human = HumanState::new(&mut rng);
        let timing = TimingModel::sample(&mut rng);
        (RecordingEffector::new(), TestClock::new(), rng, human, timing)
    }

    #[test]
    fn clicks_land_inside_the_safe_zone() {
        let (mut effector, clock, mut rng, human, timing) = fixtures(71);
        let zone = SafeZone::from_screen(1920, 1080);
        for _ in 0..50 {
            let mut ctx = ActionCtx {
                effector: &mut effector,
                clock: &clock,
                rng: &mut rng,
                human: &human,
                timing: &timing,
                zone,
                profile: profile(),
            };
            mouse_clicks(&mut ctx).unwrap();
        }
        let mut moves = 0;
        for call in &effector.calls {
            if let EffectorCall::MoveTo(x, y) = call {
                moves += 1;
                assert!(*x >= zone.x_min && *x <= zone.x_max);
                assert!(*y >= zone.y_min && *y <= zone.y_max);
            }
        }
        assert!(moves > 0);
        assert!(effector
            .calls
            .iter()
            .any(|c| matches!(c, EffectorCall::Click(_) | EffectorCall::DoubleClick)));
    }

    #[test]
    fn gated_movement_skips_cleanly() {
        let (mut effector, clock, mut rng, human, timing) = fixtures(72);
        let zone = SafeZone::from_screen(1920, 1080);
        let mut ctx = ActionCtx {
            effector: &mut effector,
            clock: &clock,
            rng: &mut rng,
            human: &human,
            timing: &timing,
            zone,
            profile: PatternProfile {
                mouse_movement_frequency: 0.0,
                click_frequency: 0.0,
            },
        };
        mouse_movement(&mut ctx).unwrap();
        mouse_clicks(&mut ctx).unwrap();
        assert!(effector.calls.is_empty());
    }

    #[test]
    fn navigation_uses_only_allowed_keys() {
        let (mut effector, clock, mut rng, human, timing) = fixtures(73);
        let zone = SafeZone::from_screen(1920, 1080);
        for _ in 0..100 {
            let mut ctx = ActionCtx {
                effector: &mut effector,
                clock: &clock,
                rng: &mut rng,
                human: &human,
                timing: &timing,
                zone,
                profile: profile(),
            };
            navigation(&mut ctx).unwrap();
        }
        let presses: Vec<&Key> = effector
            .calls
            .iter()
            .filter_map(|c| match c {
                EffectorCall::PressKey(k) => Some(k),
                _ => None,
            })
            .collect();
        assert!(!presses.is_empty(), "gate should let some runs through");
        assert!(presses.iter().all(|k| NAV_KEYS.contains(k)));
    }

    #[test]
    fn tab_switching_emits_combos_or_tab_bar_clicks() {
        let (mut effector, clock, mut rng, human, timing) = fixtures(74);
        let zone = SafeZone::from_screen(1920, 1080);
        for _ in 0..50 {
            let mut ctx = ActionCtx {
                effector: &mut effector,
                clock: &clock,
                rng: &mut rng,
                human: &human,
                timing: &timing,
                zone,
                profile: profile(),
            };
            tab_switching(&mut ctx).unwrap();
        }
        let combos = effector
            .calls
            .iter()
            .filter(|c| matches!(c, EffectorCall::KeyCombo(_)))
            .count();
        let clicks = effector
            .calls
            .iter()
            .filter(|c| matches!(c, EffectorCall::Click(_)))
            .count();
        assert!(combos + clicks > 0);
    }

    #[test]
    fn every_category_dispatches() {
        for category in ActivityCategory::ALL {
            let (mut effector, clock, mut rng, human, timing) = fixtures(75);
            let zone = SafeZone::from_screen(2880, 1800);
            let mut ctx = ActionCtx {
                effector: &mut effector,
                clock: &clock,
                rng: &mut rng,
                human: &human,
                timing: &timing,
                zone,
                profile: profile(),
            };
            run(category, &mut ctx).unwrap();
        }
    }

    #[test]
    fn mistakes_and_interruptions_only_cost_time() {
        let (mut effector, clock, mut rng, human, timing) = fixtures(76);
        let zone = SafeZone::from_screen(1920, 1080);
        let mut ctx = ActionCtx {
            effector: &mut effector,
            clock: &clock,
            rng: &mut rng,
            human: &human,
            timing: &timing,
            zone,
            profile: profile(),
        };
        mistake(&mut ctx).unwrap();
        let before = ctx.clock.now();
        interruption(&mut ctx);
        sidebar_flourish(&mut ctx);
        assert!(ctx.clock.now() > before);
    }

    #[test]
    fn sample_ms_respects_the_clamp() {
        let mut rng = StdRng::seed_from_u64(77);
        for _ in 0..5_000 {
            let ms = sample_ms(&mut rng, 65.0, 25.0, 40, 120);
            assert!((40..=120).contains(&ms));
        }
    }
}
