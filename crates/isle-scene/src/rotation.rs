//! Rotatable model binding - routes input to controllers and drives them each frame

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use isle_core::{
    drive_frame, normalize_angle, FramePacing, InputHandler, InteractionConfig, RotationController,
    RotationTarget, Tick,
};

use crate::camera::MainCamera;
use crate::types::*;

/// System ordering within `Update`
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum IsleSet {
    /// Window size tracking
    Viewport,
    /// Native input to `ModelInput`
    Input,
    /// `ModelInput` to controllers
    Apply,
    /// Damping, classification, and node sync
    Advance,
    /// Host-facing resources
    Publish,
}

/// Interaction state for one rotatable model
#[derive(Component, Debug, Clone, Default)]
pub struct RotatableModel {
    controller: RotationController,
}

impl RotatableModel {
    pub fn new(controller: RotationController) -> Self {
        Self { controller }
    }

    /// Controller starting at the pose's resting Euler Z
    pub fn for_pose(pose: &ModelPose, config: InteractionConfig, viewport_width: f64) -> Self {
        Self::new(
            RotationController::new(config)
                .with_viewport_width(viewport_width)
                .with_rotation(f64::from(pose.base_rotation.z)),
        )
    }

    pub fn controller(&self) -> &RotationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RotationController {
        &mut self.controller
    }
}

/// Resting pose of the model; the controller owns the live Euler Z
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ModelPose {
    /// XYZ Euler angles in radians; Z seeds the controller
    pub base_rotation: Vec3,
    pub scale: f32,
}

impl Default for ModelPose {
    fn default() -> Self {
        Self {
            base_rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl ModelPose {
    /// Orientation with `z` as the Euler Z angle
    pub fn rotation_at(&self, z: f64) -> Quat {
        // Wrap before narrowing so an unbounded angle keeps its precision
        Quat::from_euler(
            EulerRot::XYZ,
            self.base_rotation.x,
            self.base_rotation.y,
            normalize_angle(z) as f32,
        )
    }

    pub fn resting_rotation(&self) -> Quat {
        self.rotation_at(f64::from(self.base_rotation.z))
    }
}

/// Width of the visible scene in world units at `distance` from a perspective camera
pub fn visible_width(fov: f32, distance: f32, aspect: f32) -> f64 {
    2.0 * f64::from(distance) * f64::from(fov / 2.0).tan() * f64::from(aspect)
}

/// Marker: the model's scene finished loading and its node can be rotated
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ModelReady;

/// Writes the controller's angle into a model transform
pub struct PoseTarget<'a> {
    pub pose: &'a ModelPose,
    pub transform: &'a mut Transform,
}

impl RotationTarget for PoseTarget<'_> {
    fn apply_rotation(&mut self, angle: f64) {
        self.transform.rotation = self.pose.rotation_at(angle);
    }
}

/// Plugin for rotation interaction
pub struct RotationPlugin;

impl Plugin for RotationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentStage>()
            .init_resource::<RotatingState>()
            .init_resource::<PointerOverHud>()
            .init_resource::<ViewportSize>()
            .add_message::<ModelInput>()
            .add_message::<StageChanged>()
            .add_message::<RotatingChanged>()
            .configure_sets(
                Update,
                (
                    IsleSet::Viewport,
                    IsleSet::Input,
                    IsleSet::Apply,
                    IsleSet::Advance,
                    IsleSet::Publish,
                )
                    .chain(),
            )
            .add_systems(Update, track_viewport.in_set(IsleSet::Viewport))
            .add_systems(Update, apply_model_input.in_set(IsleSet::Apply))
            .add_systems(Update, advance_models.in_set(IsleSet::Advance))
            .add_systems(Update, publish_host_state.in_set(IsleSet::Publish));
    }
}

/// Keep the viewport size and every controller's drag divisor in sync with the window.
///
/// Drags are divided by the visible scene width in world units at the
/// camera's distance from the origin, not by the window width in pixels.
fn track_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Projection, &Transform), With<MainCamera>>,
    mut viewport: ResMut<ViewportSize>,
    mut models: Query<&mut RotatableModel>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let width = window.width();
    let height = window.height();
    if viewport.width != width || viewport.height != height {
        viewport.width = width;
        viewport.height = height;
        tracing::debug!("Viewport resized to {}x{}", width, height);
    }

    let Ok((Projection::Perspective(perspective), transform)) = cameras.single() else {
        return;
    };
    if height <= 0.0 {
        return;
    }
    let world_width = visible_width(
        perspective.fov,
        transform.translation.length(),
        width / height,
    );

    for mut model in models.iter_mut() {
        if model.controller.viewport_width() != world_width {
            model.controller.set_viewport_width(world_width);
        }
    }
}

/// Feed normalized input to every mounted model
fn apply_model_input(
    mut inputs: MessageReader<ModelInput>,
    mut models: Query<(Entity, &mut RotatableModel)>,
    mut rotating_events: MessageWriter<RotatingChanged>,
) {
    for ModelInput(event) in inputs.read() {
        for (entity, mut model) in models.iter_mut() {
            let was_rotating = model.controller.is_rotating();
            if !model.controller.handle(event).is_consumed() {
                tracing::trace!(?event, "Input ignored by {:?}", entity);
                continue;
            }
            let rotating = model.controller.is_rotating();
            if rotating != was_rotating {
                rotating_events.write(RotatingChanged { entity, rotating });
            }
        }
    }
}

/// Per-frame step: damp or classify, then sync the node when it is bound
fn advance_models(
    time: Res<Time>,
    mut models: Query<(
        Entity,
        &mut RotatableModel,
        &ModelPose,
        &mut Transform,
        Has<ModelReady>,
    )>,
    mut stage_events: MessageWriter<StageChanged>,
) {
    for (entity, mut model, pose, mut transform, ready) in models.iter_mut() {
        let tick = match model.controller.config().frame_pacing {
            FramePacing::PerFrame => Tick::Frame,
            FramePacing::FixedRate => Tick::Elapsed(time.delta()),
        };

        let output = if ready {
            let mut target = PoseTarget {
                pose,
                transform: &mut *transform,
            };
            drive_frame(&mut model.controller, Some(&mut target), tick)
        } else {
            drive_frame::<PoseTarget<'_>>(&mut model.controller, None, tick)
        };

        if let Some(stage) = output.and_then(|o| o.stage.emitted()) {
            stage_events.write(StageChanged { entity, stage });
        }
    }
}

/// Mirror model notifications into host-facing resources
fn publish_host_state(
    mut stage_events: MessageReader<StageChanged>,
    mut rotating_events: MessageReader<RotatingChanged>,
    mut current_stage: ResMut<CurrentStage>,
    mut rotating: ResMut<RotatingState>,
) {
    if let Some(last) = stage_events.read().last() {
        current_stage.set_if_neq(CurrentStage(last.stage));
    }
    if let Some(last) = rotating_events.read().last() {
        rotating.set_if_neq(RotatingState(last.rotating));
    }
}
