//! Shared resources and messages for the island scene

use bevy::prelude::*;
use isle_core::{InputEvent, InteractionConfig, SceneConfig, Stage};

/// Scene placement settings
#[derive(Debug, Clone, Resource, Default)]
pub struct SceneSettings(pub SceneConfig);

/// Tuning applied to newly mounted models
#[derive(Debug, Clone, Resource, Default)]
pub struct InteractionSettings(pub InteractionConfig);

/// Last stage reported by any rotatable model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource)]
pub struct CurrentStage(pub Option<Stage>);

impl Default for CurrentStage {
    fn default() -> Self {
        Self(Some(Stage::One))
    }
}

/// Whether a gesture is in progress on any rotatable model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource, Default)]
pub struct RotatingState(pub bool);

/// Set by the HUD when the pointer is over an overlay, so drags are not started underneath it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource, Default)]
pub struct PointerOverHud(pub bool);

/// Primary window size in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

/// Normalized input routed to every mounted rotatable model
#[derive(Debug, Clone, Copy, Message)]
pub struct ModelInput(pub InputEvent);

/// Stage classifier output, written every frame while rotating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Message)]
pub struct StageChanged {
    pub entity: Entity,
    pub stage: Option<Stage>,
}

/// Is-rotating flag flipped on a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Message)]
pub struct RotatingChanged {
    pub entity: Entity,
    pub rotating: bool,
}

/// Spawn the island model if none is mounted
#[derive(Debug, Clone, Copy, Message, Default)]
pub struct MountModel;

/// Despawn every mounted island model
#[derive(Debug, Clone, Copy, Message, Default)]
pub struct UnmountModel;
