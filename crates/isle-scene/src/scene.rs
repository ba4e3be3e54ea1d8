//! Scene setup - background and lights

use bevy::prelude::*;

use crate::types::SceneSettings;

/// Ambient brightness approximating a unit-intensity hemisphere light
pub const HEMISPHERE_FILL_BRIGHTNESS: f32 = 400.0;

/// Marker component for the main directional light
#[derive(Component)]
pub struct MainDirectionalLight;

/// Plugin for scene setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

fn setup_scene(mut commands: Commands, settings: Res<SceneSettings>) {
    let [r, g, b] = settings.0.clear_color;
    commands.insert_resource(ClearColor(Color::linear_rgb(r, g, b)));

    // Stands in for a white sky / black ground hemisphere light; Bevy has no
    // ground term, so the lower half gets the same fill as the upper half
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: HEMISPHERE_FILL_BRIGHTNESS,
        ..default()
    });

    // Key light
    commands.spawn((
        DirectionalLight {
            illuminance: 4000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(1.0, 1.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainDirectionalLight,
    ));

    // Fill
    commands.spawn((
        PointLight {
            intensity: 2_000_000.0,
            range: 100.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(10.0, 5.0, 10.0),
    ));

    // Narrow spot from above
    commands.spawn((
        SpotLight {
            intensity: 4_000_000.0,
            range: 200.0,
            inner_angle: 0.0,
            outer_angle: 0.15,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, 50.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    tracing::debug!("Scene lights spawned");
}
