//! Isle Scene - Bevy rendering and interaction for the rotatable island
//!
//! Hosts the island model in a 3D scene, routes window input to its
//! rotation controller, and publishes stage and is-rotating changes as
//! messages for the hosting application.

pub mod camera;
pub mod input;
pub mod models;
pub mod rotation;
pub mod scene;
pub mod types;

use bevy::prelude::*;
use isle_core::IsleConfig;

/// Plugin that sets up the island scene and its interaction
#[derive(Default)]
pub struct IsleScenePlugin {
    pub config: IsleConfig,
}

impl IsleScenePlugin {
    pub fn new(config: IsleConfig) -> Self {
        Self { config }
    }
}

impl Plugin for IsleScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SceneSettings(self.config.scene.clone()))
            .insert_resource(InteractionSettings(self.config.interaction.clone()))
            .add_plugins(rotation::RotationPlugin)
            .add_plugins(input::NativeInputPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(models::ModelsPlugin);
    }
}

// Re-export commonly used types
pub use types::*;
pub use camera::MainCamera;
pub use models::{IslandModel, ModelLoadFailed};
pub use rotation::{visible_width, IsleSet, ModelPose, ModelReady, RotatableModel};
