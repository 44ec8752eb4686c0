use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::control::StopToken;

/// Errors an input backend may raise. All of them are recoverable from the
/// engine's point of view: the call site counts them against the session
/// error budget and moves on.
#[derive(Debug, Error)]
pub enum EffectorError {
    #[error("input backend unavailable: {0}")]
    Backend(String),
    #[error("target ({x}, {y}) is outside the addressable screen")]
    OutOfBounds { x: i32, y: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Key codes the engine is allowed to emit. Deliberately restricted to
/// harmless navigation keys and the modifiers needed for tab switching; no
/// printable characters, so the simulation can never type into a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Tab,
    Enter,
    Space,
    Backspace,
    Delete,
    Ctrl,
    Alt,
    Shift,
}

/// The platform-specific input primitive set. The engine is written against
/// this trait only; a backend is a small adapter implementing it.
pub trait InputEffector {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), EffectorError>;
    fn click(&mut self, button: MouseButton) -> Result<(), EffectorError>;
    fn double_click(&mut self) -> Result<(), EffectorError>;
    fn scroll(&mut self, direction: ScrollDirection, amount: u32) -> Result<(), EffectorError>;
    fn press_key(&mut self, key: Key) -> Result<(), EffectorError>;
    fn key_combo(&mut self, keys: &[Key]) -> Result<(), EffectorError>;
    fn position(&mut self) -> Result<(i32, i32), EffectorError>;
}

/// Margin-inset rectangle of the screen where all synthetic pointer activity
/// stays, away from edges, title bars, and close buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeZone {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

const EDGE_MARGIN: i32 = 100;
const BAR_MARGIN: i32 = 50;

impl SafeZone {
    pub fn from_screen(width: i32, height: i32) -> Self {
        Self {
            x_min: EDGE_MARGIN,
            x_max: (width - EDGE_MARGIN).max(EDGE_MARGIN + 1),
            y_min: EDGE_MARGIN + BAR_MARGIN,
            y_max: (height - EDGE_MARGIN - BAR_MARGIN).max(EDGE_MARGIN + BAR_MARGIN + 1),
        }
    }

    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }

    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x.clamp(self.x_min, self.x_max),
            y.clamp(self.y_min, self.y_max),
        )
    }

    pub fn random_point<R: Rng>(&self, rng: &mut R) -> (i32, i32) {
        (
            rng.gen_range(self.x_min..=self.x_max),
            rng.gen_range(self.y_min..=self.y_max),
        )
    }

    /// A copy inset by `pad` on every side, for picks that must stay clear
    /// of the zone's own edges.
    pub fn shrunk(&self, pad: i32) -> Self {
        let mut zone = Self {
            x_min: self.x_min + pad,
            x_max: self.x_max - pad,
            y_min: self.y_min + pad,
            y_max: self.y_max - pad,
        };
        if zone.x_min >= zone.x_max {
            zone.x_min = self.x_min;
            zone.x_max = self.x_max;
        }
        if zone.y_min >= zone.y_max {
            zone.y_min = self.y_min;
            zone.y_max = self.y_max;
        }
        zone
    }

    /// The strip along the top of the zone where window tabs live.
    pub fn tab_strip(&self) -> Self {
        Self {
            x_min: self.x_min + BAR_MARGIN,
            x_max: (self.x_max - BAR_MARGIN).max(self.x_min + BAR_MARGIN + 1),
            y_min: self.y_min,
            y_max: self.y_min + (self.height() / 10).max(1),
        }
    }
}

/// Stand-in backend that performs no real injection: it tracks a virtual
/// cursor, bounds-checks targets, and logs every primitive at debug level.
/// Useful for dry runs and as the default until a platform adapter is wired.
pub struct TraceEffector {
    width: i32,
    height: i32,
    x: i32,
    y: i32,
}

impl TraceEffector {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            x: width / 2,
            y: height / 2,
        }
    }
}

impl InputEffector for TraceEffector {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), EffectorError> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return Err(EffectorError::OutOfBounds { x, y });
        }
        self.x = x;
        self.y = y;
        debug!(x, y, "move");
        Ok(())
    }

    fn click(&mut self, button: MouseButton) -> Result<(), EffectorError> {
        debug!(?button, x = self.x, y = self.y, "click");
        Ok(())
    }

    fn double_click(&mut self) -> Result<(), EffectorError> {
        debug!(x = self.x, y = self.y, "double click");
        Ok(())
    }

    fn scroll(&mut self, direction: ScrollDirection, amount: u32) -> Result<(), EffectorError> {
        debug!(?direction, amount, "scroll");
        Ok(())
    }

    fn press_key(&mut self, key: Key) -> Result<(), EffectorError> {
        debug!(?key, "press");
        Ok(())
    }

    fn key_combo(&mut self, keys: &[Key]) -> Result<(), EffectorError> {
        debug!(?keys, "combo");
        Ok(())
    }

    fn position(&mut self) -> Result<(i32, i32), EffectorError> {
        Ok((self.x, self.y))
    }
}

/// One recorded primitive call, for assertions in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectorCall {
    MoveTo(i32, i32),
    Click(MouseButton),
    DoubleClick,
    Scroll(ScrollDirection, u32),
    PressKey(Key),
    KeyCombo(Vec<Key>),
}

/// Test backend: records every call, and can be told to start failing after
/// a number of calls or to clear a stop token once enough calls were seen.
#[derive(Default)]
pub struct RecordingEffector {
    pub calls: Vec<EffectorCall>,
    /// Once `calls.len()` reaches this, every further call errors.
    pub fail_after: Option<usize>,
    /// Once `calls.len()` reaches the count, request a stop on the token.
    pub stop_after: Option<(usize, StopToken)>,
    x: i32,
    y: i32,
}

impl RecordingEffector {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, call: EffectorCall) -> Result<(), EffectorError> {
        if let Some(limit) = self.fail_after {
            if self.calls.len() >= limit {
                return Err(EffectorError::Backend("injected failure".into()));
            }
        }
        self.calls.push(call);
        if let Some((count, token)) = &self.stop_after {
            if self.calls.len() >= *count {
                token.request_stop();
            }
        }
        Ok(())
    }
}

impl InputEffector for RecordingEffector {
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), EffectorError> {
        self.record(EffectorCall::MoveTo(x, y))?;
        self.x = x;
        self.y = y;
        Ok(())
    }

    fn click(&mut self, button: MouseButton) -> Result<(), EffectorError> {
        self.record(EffectorCall::Click(button))
    }

    fn double_click(&mut self) -> Result<(), EffectorError> {
        self.record(EffectorCall::DoubleClick)
    }

    fn scroll(&mut self, direction: ScrollDirection, amount: u32) -> Result<(), EffectorError> {
        self.record(EffectorCall::Scroll(direction, amount))
    }

    fn press_key(&mut self, key: Key) -> Result<(), EffectorError> {
        self.record(EffectorCall::PressKey(key))
    }

    fn key_combo(&mut self, keys: &[Key]) -> Result<(), EffectorError> {
        self.record(EffectorCall::KeyCombo(keys.to_vec()))
    }

    fn position(&mut self) -> Result<(i32, i32), EffectorError> {
        Ok((self.x, self.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn safe_zone_stays_inside_screen() {
        let zone = SafeZone::from_screen(2880, 1800);
        assert_eq!(zone.x_min, 100);
        assert_eq!(zone.x_max, 2780);
        assert_eq!(zone.y_min, 150);
        assert_eq!(zone.y_max, 1650);

        let (x, y) = zone.clamp(-50, 9999);
        assert_eq!((x, y), (100, 1650));
    }

    #[test]
    fn safe_zone_random_points_are_in_bounds() {
        let zone = SafeZone::from_screen(1920, 1080);
        let mut rng = rand::thread_rng();
        for _ in 0..1_000 {
            let (x, y) = zone.random_point(&mut rng);
            assert!(x >= zone.x_min && x <= zone.x_max);
            assert!(y >= zone.y_min && y <= zone.y_max);
        }
    }

    #[test]
    fn safe_zone_survives_tiny_screens() {
        let zone = SafeZone::from_screen(120, 100);
        assert!(zone.x_max > zone.x_min);
        assert!(zone.y_max > zone.y_min);
        let shrunk = zone.shrunk(500);
        assert!(shrunk.x_max > shrunk.x_min);
    }

    #[test]
    fn trace_effector_rejects_offscreen_targets() {
        let mut effector = TraceEffector::new(800, 600);
        assert_matches!(
            effector.move_to(800, 10),
            Err(EffectorError::OutOfBounds { .. })
        );
        assert!(effector.move_to(400, 300).is_ok());
        assert_eq!(effector.position().unwrap(), (400, 300));
    }

    #[test]
    fn recording_effector_fails_on_cue() {
        let mut effector = RecordingEffector::new();
        effector.fail_after = Some(1);

        assert!(effector.move_to(10, 10).is_ok());
        assert_matches!(
            effector.click(MouseButton::Left),
            Err(EffectorError::Backend(_))
        );
        assert_eq!(effector.calls.len(), 1);
    }

    #[test]
    fn recording_effector_clears_stop_token() {
        let token = StopToken::new();
        let mut effector = RecordingEffector::new();
        effector.stop_after = Some((2, token.clone()));

        effector.move_to(1, 1).unwrap();
        assert!(token.is_running());
        effector.double_click().unwrap();
        assert!(!token.is_running());
    }
}
