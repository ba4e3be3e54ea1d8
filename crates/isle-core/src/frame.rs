//! Per-frame stepping types and the scene-node binding guard

use std::time::Duration;
use tracing::trace;

use crate::controller::RotationController;
use crate::stage::Stage;

/// How much time a call to [`RotationController::advance`] covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Exactly one integrator step (one rendered frame)
    Frame,
    /// Wall time, converted to whole steps at the reference frame rate
    Elapsed(Duration),
}

/// Stage classifier result for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSignal {
    /// The classifier did not run; the previous stage stands
    Held,
    /// The classifier ran and produced this stage (or none)
    Emitted(Option<Stage>),
}

impl StageSignal {
    pub fn emitted(self) -> Option<Option<Stage>> {
        match self {
            StageSignal::Held => None,
            StageSignal::Emitted(stage) => Some(stage),
        }
    }
}

/// Result of advancing the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    /// Accumulated rotation angle in radians (not wrapped)
    pub rotation: f64,
    pub stage: StageSignal,
    /// Number of integrator steps that ran
    pub steps: u32,
}

/// Scene node whose rotation follows the controller
pub trait RotationTarget {
    /// `angle` is the full Euler Z in radians, unwrapped
    fn apply_rotation(&mut self, angle: f64);
}

/// Advance the controller and push its angle onto the bound node.
///
/// Returns `None` without touching the controller when no node is bound yet.
pub fn drive_frame<T: RotationTarget + ?Sized>(
    controller: &mut RotationController,
    target: Option<&mut T>,
    tick: Tick,
) -> Option<FrameOutput> {
    let Some(target) = target else {
        trace!("Scene node not bound, skipping frame");
        return None;
    };

    let output = controller.advance(tick);
    target.apply_rotation(output.rotation);
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InteractionConfig;
    use crate::input::{InputHandler, Key};

    #[derive(Default)]
    struct Node {
        angle: f64,
        writes: usize,
    }

    impl RotationTarget for Node {
        fn apply_rotation(&mut self, angle: f64) {
            self.angle = angle;
            self.writes += 1;
        }
    }

    #[test]
    fn test_unbound_node_skips_frame() {
        let mut controller = RotationController::new(InteractionConfig::default());
        controller.on_key_down(Key::ArrowRight);
        controller.on_key_up(Key::ArrowRight);
        let before = controller.clone();

        let output = drive_frame::<Node>(&mut controller, None, Tick::Frame);

        assert!(output.is_none());
        assert_eq!(controller, before);
    }

    #[test]
    fn test_bound_node_follows_rotation() {
        let mut controller = RotationController::new(InteractionConfig::default());
        let mut node = Node::default();

        let output = drive_frame(&mut controller, Some(&mut node), Tick::Frame).unwrap();

        assert_eq!(output.steps, 1);
        assert_eq!(node.writes, 1);
        assert_eq!(node.angle, controller.rotation());
    }

    #[test]
    fn test_stage_signal_emitted() {
        assert_eq!(StageSignal::Held.emitted(), None);
        assert_eq!(StageSignal::Emitted(None).emitted(), Some(None));
        assert_eq!(
            StageSignal::Emitted(Some(Stage::Two)).emitted(),
            Some(Some(Stage::Two))
        );
    }
}
