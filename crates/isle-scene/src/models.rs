//! Island model loading, mounting, and responsive placement

use bevy::asset::LoadState;
use bevy::ecs::message::Messages;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use isle_core::{InteractionConfig, SceneConfig};
use crate::camera::{CAMERA_DISTANCE, CAMERA_FOV_DEGREES};
use crate::rotation::{visible_width, ModelPose, ModelReady, RotatableModel};
use crate::types::*;

/// Marker component for the island model entity
#[derive(Component)]
pub struct IslandModel;

/// Marker: the model asset failed to load and the node will never be bound
#[derive(Component)]
pub struct ModelLoadFailed;

/// Load state of the island glTF
#[derive(Resource, Default)]
pub struct IslandModelCache {
    /// In-flight glTF load
    pub loading: Option<Handle<Gltf>>,
    /// Scene extracted from the loaded glTF
    pub scene: Option<Handle<Scene>>,
    /// Set once loading finished; `false` means the load failed
    pub ready: Option<bool>,
}

/// Plugin for model loading
pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<IslandModelCache>()
            .add_message::<MountModel>()
            .add_message::<UnmountModel>()
            .add_systems(Startup, request_initial_mount)
            .add_systems(
                Update,
                (
                    handle_unmount,
                    handle_mount,
                    load_models,
                    bind_loaded_models,
                    apply_responsive_scale,
                )
                    .chain()
                    .before(crate::rotation::IsleSet::Apply),
            );
    }
}

fn request_initial_mount(mut mount: MessageWriter<MountModel>) {
    mount.write(MountModel);
}

/// Spawn the island entity and start loading its asset
fn handle_mount(
    mut commands: Commands,
    mut requests: MessageReader<MountModel>,
    mut cache: ResMut<IslandModelCache>,
    asset_server: Res<AssetServer>,
    scene_settings: Res<SceneSettings>,
    interaction: Res<InteractionSettings>,
    viewport: Res<ViewportSize>,
    existing: Query<(), With<IslandModel>>,
) {
    if requests.read().count() == 0 {
        return;
    }
    if !existing.is_empty() {
        tracing::debug!("Island model already mounted");
        return;
    }

    let scene = &scene_settings.0;
    if cache.loading.is_none() && cache.scene.is_none() {
        tracing::info!("Starting to load model: {}", scene.model_path);
        let handle: Handle<Gltf> = asset_server.load(scene.model_path.clone());
        cache.loading = Some(handle);
        cache.ready = None;
    }

    commands.spawn(island_bundle(scene, &interaction.0, &viewport));
    tracing::info!("Mounted island model");
}

/// Components for a freshly mounted island resting at its configured pose
fn island_bundle(
    scene: &SceneConfig,
    interaction: &InteractionConfig,
    viewport: &ViewportSize,
) -> impl Bundle {
    let pose = ModelPose {
        base_rotation: Vec3::from_array(scene.rotation),
        scale: scene.scale_for_width(viewport.width),
    };
    let model = RotatableModel::for_pose(&pose, interaction.clone(), initial_view_width(viewport));

    (
        Transform::from_translation(Vec3::from_array(scene.position))
            .with_rotation(pose.resting_rotation())
            .with_scale(Vec3::splat(pose.scale)),
        Visibility::default(),
        pose,
        model,
        IslandModel,
    )
}

/// World-space drag divisor for the stock camera until the viewport pass measures the real one
fn initial_view_width(viewport: &ViewportSize) -> f64 {
    if viewport.height <= 0.0 {
        return 0.0;
    }
    visible_width(
        CAMERA_FOV_DEGREES.to_radians(),
        CAMERA_DISTANCE,
        viewport.width / viewport.height,
    )
}

/// Despawn mounted models; queued input and listeners die with them
fn handle_unmount(
    mut commands: Commands,
    mut requests: MessageReader<UnmountModel>,
    models: Query<Entity, With<IslandModel>>,
    mut rotating: ResMut<RotatingState>,
    mut inputs: ResMut<Messages<ModelInput>>,
) {
    if requests.read().count() == 0 {
        return;
    }

    let mut count = 0;
    for entity in models.iter() {
        commands.entity(entity).despawn();
        count += 1;
    }
    inputs.clear();
    rotating.set_if_neq(RotatingState(false));
    tracing::info!("Unmounted {} island model(s)", count);
}

/// Check loading state and extract the scene from the loaded glTF
fn load_models(
    mut cache: ResMut<IslandModelCache>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
) {
    let Some(handle) = cache.loading.clone() else {
        return;
    };

    match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            if let Some(gltf) = gltf_assets.get(&handle) {
                let scene = gltf
                    .default_scene
                    .clone()
                    .or_else(|| gltf.scenes.first().cloned());
                match scene {
                    Some(scene) => {
                        tracing::info!("Model loaded");
                        cache.scene = Some(scene);
                        cache.ready = Some(true);
                    }
                    None => {
                        tracing::error!("Model has no scenes");
                        cache.ready = Some(false);
                    }
                }
            }
            cache.loading = None;
        }
        Some(LoadState::Failed(err)) => {
            tracing::error!("Failed to load model: {}", err);
            cache.loading = None;
            cache.ready = Some(false);
        }
        _ => {
            // Still loading
        }
    }
}

/// Attach the loaded scene to waiting models and mark them ready
fn bind_loaded_models(
    mut commands: Commands,
    cache: Res<IslandModelCache>,
    waiting: Query<
        Entity,
        (
            With<IslandModel>,
            Without<ModelReady>,
            Without<ModelLoadFailed>,
        ),
    >,
) {
    match cache.ready {
        Some(true) => {
            let Some(scene) = cache.scene.clone() else {
                return;
            };
            for entity in waiting.iter() {
                commands
                    .entity(entity)
                    .insert((SceneRoot(scene.clone()), ModelReady));
                tracing::debug!("Bound island scene to {:?}", entity);
            }
        }
        Some(false) => {
            for entity in waiting.iter() {
                commands.entity(entity).insert(ModelLoadFailed);
            }
        }
        None => {}
    }
}

/// Shrink the model on narrow viewports
fn apply_responsive_scale(
    viewport: Res<ViewportSize>,
    scene_settings: Res<SceneSettings>,
    mut models: Query<(&mut ModelPose, &mut Transform), With<IslandModel>>,
) {
    if !viewport.is_changed() {
        return;
    }

    let scale = scene_settings.0.scale_for_width(viewport.width);
    for (mut pose, mut transform) in models.iter_mut() {
        if pose.scale != scale {
            pose.scale = scale;
            transform.scale = Vec3::splat(scale);
            tracing::debug!("Model scale set to {} for width {}", scale, viewport.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<SceneSettings>()
            .init_resource::<ViewportSize>()
            .add_systems(Update, apply_responsive_scale);
        app
    }

    fn spawn_model(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((ModelPose::default(), Transform::default(), IslandModel))
            .id()
    }

    #[test]
    fn test_narrow_viewport_shrinks_model() {
        let mut app = test_app();
        let entity = spawn_model(&mut app);
        app.world_mut().resource_mut::<ViewportSize>().width = 500.0;
        app.update();

        let transform = app.world().get::<Transform>(entity).unwrap();
        assert_eq!(transform.scale, Vec3::splat(0.9));
        assert_eq!(app.world().get::<ModelPose>(entity).unwrap().scale, 0.9);
    }

    #[test]
    fn test_breakpoint_width_uses_full_scale() {
        let mut app = test_app();
        app.insert_resource(SceneSettings(SceneConfig {
            scale: 2.0,
            ..SceneConfig::default()
        }));
        let entity = spawn_model(&mut app);
        app.world_mut().resource_mut::<ViewportSize>().width = 768.0;
        app.update();

        let transform = app.world().get::<Transform>(entity).unwrap();
        assert_eq!(transform.scale, Vec3::splat(2.0));
    }

    #[test]
    fn test_initial_view_width_uses_stock_camera() {
        let viewport = ViewportSize {
            width: 1280.0,
            height: 720.0,
        };
        assert!((initial_view_width(&viewport) - 13.641).abs() < 1e-3);
        let collapsed = ViewportSize {
            width: 1280.0,
            height: 0.0,
        };
        assert_eq!(initial_view_width(&collapsed), 0.0);
    }

    #[test]
    fn test_mounted_model_starts_at_resting_pose() {
        let mut app = App::new();
        let scene = SceneConfig::default();
        let entity = app
            .world_mut()
            .spawn(island_bundle(
                &scene,
                &InteractionConfig::default(),
                &ViewportSize::default(),
            ))
            .id();

        let world = app.world();
        let z = f64::from(scene.rotation[2]);
        let model = world.get::<RotatableModel>(entity).unwrap();
        assert_eq!(model.controller().rotation(), z);
        assert_eq!(isle_core::classify(z), Some(isle_core::Stage::One));

        let [x, y, _] = scene.rotation;
        let expected = Quat::from_euler(EulerRot::XYZ, x, y, isle_core::normalize_angle(z) as f32);
        let transform = world.get::<Transform>(entity).unwrap();
        assert!(transform.rotation.abs_diff_eq(expected, 1e-5));
        assert_eq!(transform.translation, Vec3::from_array(scene.position));
    }

    #[test]
    fn test_failed_load_marks_waiting_models() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(IslandModelCache {
                ready: Some(false),
                ..default()
            })
            .add_systems(Update, bind_loaded_models);
        let entity = app.world_mut().spawn(IslandModel).id();
        app.update();

        assert!(app.world().get::<ModelLoadFailed>(entity).is_some());
        assert!(app.world().get::<ModelReady>(entity).is_none());
    }

    #[test]
    fn test_unmount_despawns_models() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(RotatingState(true))
            .add_message::<UnmountModel>()
            .add_message::<ModelInput>()
            .add_systems(Update, handle_unmount);
        let entity = app.world_mut().spawn(IslandModel).id();

        app.world_mut().write_message(UnmountModel);
        app.update();

        assert!(app.world().get_entity(entity).is_err());
        assert_eq!(*app.world().resource::<RotatingState>(), RotatingState(false));
    }
}
