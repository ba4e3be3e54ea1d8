//! Fixed perspective camera on +Z looking down -Z at the island

use bevy::prelude::*;

use crate::types::SceneSettings;

/// Vertical field of view in degrees
pub const CAMERA_FOV_DEGREES: f32 = 75.0;

/// Distance from the origin along +Z
pub const CAMERA_DISTANCE: f32 = 5.0;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for the scene camera
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);
    }
}

fn spawn_camera(mut commands: Commands, settings: Res<SceneSettings>) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: settings.0.camera_near,
            far: settings.0.camera_far,
            ..default()
        }),
        Transform::from_xyz(0.0, 0.0, CAMERA_DISTANCE).looking_to(Vec3::NEG_Z, Vec3::Y),
        MainCamera,
    ));
}
