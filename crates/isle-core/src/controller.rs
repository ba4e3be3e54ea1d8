//! Rotation controller - input adapter, damping integrator, and stage tracking
//!
//! The controller owns every piece of mutable interaction state for one
//! rotatable model: the accumulated angle, the per-frame speed estimate, the
//! last horizontal input coordinate, the is-rotating flag, and the most
//! recently classified stage.
//!
//! Input callbacks apply drag and key rotation immediately. [`advance`] runs
//! once per rendered frame: while idle it damps the stored speed and spins the
//! model by it, and while rotating it classifies the current angle.
//!
//! [`advance`]: RotationController::advance

use tracing::{debug, trace};

use crate::config::{IdleDecay, InteractionConfig, StageTracking};
use crate::frame::{FrameOutput, StageSignal, Tick};
use crate::input::{Handled, InputHandler, InputSource, Key};
use crate::stage::{classify_with, Stage};

/// Upper bound on steps run for one `Tick::Elapsed`, e.g. after a backgrounded tab resumes
const MAX_CATCH_UP_STEPS: u32 = 240;

#[derive(Debug, Clone, PartialEq)]
pub struct RotationController {
    config: InteractionConfig,
    rotation: f64,
    speed: f64,
    last_x: f64,
    is_rotating: bool,
    viewport_width: f64,
    stage: Option<Stage>,
    /// Fractional steps carried between `Tick::Elapsed` calls
    pending_steps: f64,
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl RotationController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            rotation: 0.0,
            speed: 0.0,
            last_x: 0.0,
            is_rotating: false,
            viewport_width: 0.0,
            // The island opens on its first stage
            stage: Some(Stage::One),
            pending_steps: 0.0,
        }
    }

    pub fn with_viewport_width(mut self, width: f64) -> Self {
        self.set_viewport_width(width);
        self
    }

    /// Start from the node's resting angle instead of zero
    pub fn with_rotation(mut self, angle: f64) -> Self {
        self.rotation = angle;
        self
    }

    /// Accumulated rotation angle in radians
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Angle change per frame
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn last_x(&self) -> f64 {
        self.last_x
    }

    pub fn is_rotating(&self) -> bool {
        self.is_rotating
    }

    /// Last classified stage; sticky while idle
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Swap tuning without resetting rotation state
    pub fn set_config(&mut self, config: InteractionConfig) {
        self.config = config;
        self.pending_steps = 0.0;
    }

    /// Drag divisor: visible scene width at the model's depth
    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    /// Apply the horizontal distance from the last coordinate as rotation
    fn apply_drag(&mut self, x: f32) -> Handled {
        let x = f64::from(x);
        if !(self.viewport_width > 0.0) {
            debug!(width = self.viewport_width, "Ignoring drag with no viewport width");
            return Handled::Ignored;
        }

        let delta = (x - self.last_x) / self.viewport_width;
        let step = delta * self.config.drag_gain;
        self.rotation += step;
        self.speed = step;
        self.last_x = x;
        Handled::Consumed
    }

    fn press_arrow(&mut self, direction: f64) -> Handled {
        if !self.is_rotating {
            self.is_rotating = true;
        }
        self.rotation += direction * self.config.key_step;
        self.speed = direction * self.config.key_speed;
        Handled::Consumed
    }

    fn classify(&self) -> Option<Stage> {
        classify_with(self.rotation, &self.config.stage_windows)
    }

    /// Advance by one tick: damp and spin while idle, classify while rotating
    pub fn advance(&mut self, tick: Tick) -> FrameOutput {
        let steps = match tick {
            Tick::Frame => 1,
            Tick::Elapsed(elapsed) => {
                self.pending_steps += elapsed.as_secs_f64() * self.config.reference_frame_rate;
                let whole = self.pending_steps.floor();
                self.pending_steps -= whole;
                (whole as u32).min(MAX_CATCH_UP_STEPS)
            }
        };

        let mut stage = StageSignal::Held;
        for _ in 0..steps {
            stage = self.step();
        }

        FrameOutput {
            rotation: self.rotation,
            stage,
            steps,
        }
    }

    fn step(&mut self) -> StageSignal {
        if self.is_rotating {
            // Rotation was already applied by the input callbacks
            let stage = self.classify();
            self.stage = stage;
            return StageSignal::Emitted(stage);
        }

        self.speed *= self.config.damping_factor;
        if self.speed.abs() < self.config.rest_threshold {
            self.speed = match self.config.idle_decay {
                IdleDecay::ResidualSpin => self.config.residual_speed,
                IdleDecay::FullStop => 0.0,
            };
        }
        self.rotation += self.speed;

        match self.config.stage_tracking {
            StageTracking::WhileRotating => StageSignal::Held,
            StageTracking::Always => {
                let stage = self.classify();
                self.stage = stage;
                StageSignal::Emitted(stage)
            }
        }
    }
}

impl InputHandler for RotationController {
    fn on_drag_start(&mut self, source: InputSource, x: f32) -> Handled {
        trace!(?source, x, "Drag start");
        self.is_rotating = true;
        self.last_x = f64::from(x);
        Handled::Consumed
    }

    fn on_drag_move(&mut self, _source: InputSource, x: f32) -> Handled {
        if !self.is_rotating {
            return Handled::Ignored;
        }
        self.apply_drag(x)
    }

    fn on_drag_end(&mut self, source: InputSource, x: f32) -> Handled {
        if !self.is_rotating {
            return Handled::Ignored;
        }
        trace!(?source, x, "Drag end");

        // Touch end carries no live coordinate; keep the fling speed from the last move
        if source == InputSource::Pointer {
            self.apply_drag(x);
        }
        self.is_rotating = false;
        Handled::Consumed
    }

    fn on_key_down(&mut self, key: Key) -> Handled {
        match key {
            Key::ArrowLeft => self.press_arrow(1.0),
            Key::ArrowRight => self.press_arrow(-1.0),
            Key::Other => Handled::Ignored,
        }
    }

    fn on_key_up(&mut self, key: Key) -> Handled {
        if !key.is_arrow() {
            return Handled::Ignored;
        }
        self.is_rotating = false;
        Handled::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};
    use std::time::Duration;

    fn controller() -> RotationController {
        RotationController::new(InteractionConfig::default()).with_viewport_width(1000.0)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_pointer_drag_applies_once() {
        let mut c = controller();
        c.on_drag_start(InputSource::Pointer, 100.0);
        assert!(c.is_rotating());
        assert_eq!(c.rotation(), 0.0);

        c.on_drag_end(InputSource::Pointer, 200.0);

        let expected = 0.001 * PI;
        assert!(approx(c.rotation(), expected), "rotation {}", c.rotation());
        assert!(approx(c.speed(), expected));
        assert_eq!(c.last_x(), 200.0);
        assert!(!c.is_rotating());

        // A stray release after the gesture does not apply again
        assert_eq!(c.on_drag_end(InputSource::Pointer, 900.0), Handled::Ignored);
        assert!(approx(c.rotation(), expected));
    }

    #[test]
    fn test_drag_delta_formula() {
        for (x0, x1, w) in [(0.0_f32, 50.0_f32, 13.64_f64), (300.0, 120.0, 1280.0), (10.0, 10.0, 800.0)] {
            let mut c = RotationController::default().with_viewport_width(w);
            c.on_drag_start(InputSource::Pointer, x0);
            c.on_drag_end(InputSource::Pointer, x1);
            let expected = ((f64::from(x1) - f64::from(x0)) / w) * 0.01 * PI;
            assert!(approx(c.rotation(), expected), "{} -> {} over {}", x0, x1, w);
        }
    }

    #[test]
    fn test_moves_split_the_drag() {
        let mut c = controller();
        c.on_drag_start(InputSource::Pointer, 100.0);
        c.on_drag_move(InputSource::Pointer, 150.0);
        assert!(c.is_rotating());
        c.on_drag_move(InputSource::Pointer, 175.0);
        c.on_drag_end(InputSource::Pointer, 200.0);

        assert!(approx(c.rotation(), 0.001 * PI));
        // Speed reflects only the last segment
        assert!(approx(c.speed(), 0.025 * 0.01 * PI));
    }

    #[test]
    fn test_move_without_gesture_is_ignored() {
        let mut c = controller();
        assert_eq!(c.on_drag_move(InputSource::Pointer, 500.0), Handled::Ignored);
        assert_eq!(c.rotation(), 0.0);
    }

    #[test]
    fn test_touch_end_keeps_fling_speed() {
        let mut c = controller();
        c.on_drag_start(InputSource::Touch, 100.0);
        c.on_drag_move(InputSource::Touch, 300.0);
        let fling = c.speed();
        assert!(approx(fling, 0.2 * 0.01 * PI));

        c.on_drag_end(InputSource::Touch, 300.0);

        assert!(!c.is_rotating());
        assert_eq!(c.speed(), fling);
        assert_eq!(c.last_x(), 300.0);
    }

    #[test]
    fn test_zero_viewport_ignores_drag() {
        let mut c = RotationController::default();
        c.on_drag_start(InputSource::Pointer, 0.0);
        assert_eq!(c.on_drag_move(InputSource::Pointer, 100.0), Handled::Ignored);
        assert_eq!(c.rotation(), 0.0);
        assert!(c.rotation().is_finite());
    }

    #[test]
    fn test_arrow_left_once() {
        let mut c = controller();
        assert!(!c.is_rotating());

        assert_eq!(c.on_key_down(Key::ArrowLeft), Handled::Consumed);

        assert!(c.is_rotating());
        assert_eq!(c.rotation(), 0.005 * PI);
        assert_eq!(c.speed(), 0.007);
    }

    #[test]
    fn test_arrow_right_mirrors_and_repeats() {
        let mut c = controller();
        c.on_key_down(Key::ArrowRight);
        c.on_key_down(Key::ArrowRight);

        assert!(approx(c.rotation(), -0.01 * PI));
        assert_eq!(c.speed(), -0.007);

        c.on_key_up(Key::ArrowRight);
        assert!(!c.is_rotating());
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut c = controller();
        assert_eq!(c.on_key_down(Key::Other), Handled::Ignored);
        c.on_key_down(Key::ArrowLeft);
        assert_eq!(c.on_key_up(Key::Other), Handled::Ignored);
        assert!(c.is_rotating());
    }

    #[test]
    fn test_idle_decay_is_geometric() {
        let mut c = controller();
        c.on_drag_start(InputSource::Pointer, 0.0);
        c.on_drag_end(InputSource::Pointer, 1000.0);
        let mut expected_speed = c.speed();
        let mut expected_rotation = c.rotation();

        // 0.0314 * 0.55^n stays above 0.001 for n <= 5
        for _ in 0..5 {
            let output = c.advance(Tick::Frame);
            expected_speed *= 0.55;
            expected_rotation += expected_speed;
            assert_eq!(c.speed(), expected_speed);
            assert_eq!(output.rotation, expected_rotation);
            assert_eq!(output.stage, StageSignal::Held);
        }

        // Sixth frame drops below the threshold and snaps to the residual spin
        c.advance(Tick::Frame);
        assert_eq!(c.speed(), 0.01);
        assert!(approx(c.rotation(), expected_rotation + 0.01));
    }

    #[test]
    fn test_residual_spin_never_stops() {
        let mut c = controller();
        c.on_key_down(Key::ArrowLeft);
        c.on_key_up(Key::ArrowLeft);

        // 0.007 -> 0.00385 -> 0.0021175 -> 0.00116 -> reset
        for _ in 0..4 {
            c.advance(Tick::Frame);
        }
        assert_eq!(c.speed(), 0.01);

        // The residual decays and snaps back every four frames
        let mut seen = Vec::new();
        for _ in 0..8 {
            c.advance(Tick::Frame);
            seen.push(c.speed());
        }
        let cycle = [0.0055, 0.003025, 0.00166375, 0.01];
        for (speed, expected) in seen.iter().zip(cycle.iter().cycle()) {
            assert!(approx(*speed, *expected), "{} vs {}", speed, expected);
            assert!(*speed > 0.0);
        }
    }

    #[test]
    fn test_full_stop_policy() {
        let config = InteractionConfig {
            idle_decay: IdleDecay::FullStop,
            ..InteractionConfig::default()
        };
        let mut c = RotationController::new(config);
        c.on_key_down(Key::ArrowLeft);
        c.on_key_up(Key::ArrowLeft);

        for _ in 0..10 {
            c.advance(Tick::Frame);
        }
        let settled = c.rotation();
        assert_eq!(c.speed(), 0.0);
        c.advance(Tick::Frame);
        assert_eq!(c.rotation(), settled);
    }

    #[test]
    fn test_stage_emitted_while_rotating() {
        let mut c = controller();
        assert_eq!(c.stage(), Some(Stage::One));

        // Drag far enough to land inside the stage-3 window (0.85..1.30 rad)
        c.on_drag_start(InputSource::Pointer, 0.0);
        c.on_drag_move(InputSource::Pointer, (1000.0 * 1.0 / (0.01 * PI)) as f32);
        assert!(approx(c.rotation(), 1.0));

        let output = c.advance(Tick::Frame);
        assert_eq!(output.stage, StageSignal::Emitted(Some(Stage::Three)));
        // No debouncing: the same stage comes out every frame
        let output = c.advance(Tick::Frame);
        assert_eq!(output.stage, StageSignal::Emitted(Some(Stage::Three)));
        // No integration while dragging
        assert!(approx(output.rotation, 1.0));
    }

    #[test]
    fn test_stage_sticks_while_idle() {
        let mut c = controller();
        c.on_drag_start(InputSource::Pointer, 0.0);
        c.on_drag_move(InputSource::Pointer, (1000.0 * 2.5 / (0.01 * PI)) as f32);
        c.advance(Tick::Frame);
        assert_eq!(c.stage(), Some(Stage::Two));
        c.on_drag_end(InputSource::Pointer, (1000.0 * 2.5 / (0.01 * PI)) as f32);

        // Residual spin carries the angle out of the window, stage stays put
        for _ in 0..100 {
            let output = c.advance(Tick::Frame);
            assert_eq!(output.stage, StageSignal::Held);
        }
        assert!(c.rotation() > 2.6);
        assert_eq!(c.stage(), Some(Stage::Two));
    }

    #[test]
    fn test_stage_tracking_always() {
        let config = InteractionConfig {
            stage_tracking: StageTracking::Always,
            ..InteractionConfig::default()
        };
        let mut c = RotationController::new(config);
        let output = c.advance(Tick::Frame);
        assert_eq!(output.stage, StageSignal::Emitted(None));
        assert_eq!(c.stage(), None);
    }

    #[test]
    fn test_elapsed_ticks_carry_remainder() {
        let mut c = controller();
        c.on_key_down(Key::ArrowLeft);

        let output = c.advance(Tick::Elapsed(Duration::from_millis(50)));
        assert_eq!(output.steps, 3);

        let output = c.advance(Tick::Elapsed(Duration::from_millis(10)));
        assert_eq!(output.steps, 0);
        assert_eq!(output.stage, StageSignal::Held);

        let output = c.advance(Tick::Elapsed(Duration::from_millis(10)));
        assert_eq!(output.steps, 1);
    }

    #[test]
    fn test_elapsed_catch_up_is_bounded() {
        let mut c = controller();
        let output = c.advance(Tick::Elapsed(Duration::from_secs(600)));
        assert_eq!(output.steps, MAX_CATCH_UP_STEPS);
    }

    #[test]
    fn test_end_to_end_drag_then_decay() {
        let mut c = controller();
        c.on_drag_start(InputSource::Pointer, 100.0);
        c.on_drag_end(InputSource::Pointer, 200.0);

        let delta = 0.001 * PI;
        assert!(approx(c.rotation(), delta));
        assert!(approx(c.speed(), delta));

        // 0.00314 -> 0.00173 -> 0.00095 (reset to 0.01)
        c.advance(Tick::Frame);
        assert!(approx(c.speed(), delta * 0.55));
        c.advance(Tick::Frame);
        assert_eq!(c.speed(), 0.01);
    }

    #[test]
    fn test_seeded_rotation_classifies_resting_pose() {
        let mut c = controller().with_rotation(11.0);
        assert_eq!(c.rotation(), 11.0);

        c.on_key_down(Key::ArrowLeft);
        let output = c.advance(Tick::Frame);

        assert!(approx(output.rotation, 11.0 + 0.005 * PI));
        assert_eq!(output.stage, StageSignal::Emitted(Some(Stage::One)));
    }

    #[test]
    fn test_residual_spin_keeps_moving_at_large_angles() {
        // Thousands of turns out, where a single-precision angle would round the step away
        let mut c = controller().with_rotation(20_000.0 * TAU);
        let mut previous = c.rotation();
        for frame in 0..40 {
            c.advance(Tick::Frame);
            assert!(c.rotation() > previous, "frame {} did not move", frame);
            previous = c.rotation();
        }
    }
}
