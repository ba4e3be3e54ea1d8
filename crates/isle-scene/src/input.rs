//! Native window input translated to `ModelInput`

use bevy::input::keyboard::KeyboardInput;
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};
use isle_core::{InputEvent, InputSource, Key};

use crate::rotation::IsleSet;
use crate::types::*;

/// Touch currently driving the gesture
#[derive(Resource, Default)]
pub struct TouchState {
    active: Option<u64>,
}

/// Last known cursor x, used when the button is released outside the canvas
#[derive(Resource, Default)]
pub struct PointerState {
    last_x: f32,
}

/// Plugin translating mouse, touch, and keyboard input
pub struct NativeInputPlugin;

impl Plugin for NativeInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TouchState>()
            .init_resource::<PointerState>()
            .add_systems(
                Update,
                (translate_pointer, translate_touches, translate_keyboard).in_set(IsleSet::Input),
            );
    }
}

pub fn key_from_code(code: KeyCode) -> Key {
    match code {
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        _ => Key::Other,
    }
}

fn translate_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut cursor_moved: MessageReader<CursorMoved>,
    over_hud: Res<PointerOverHud>,
    mut pointer: ResMut<PointerState>,
    mut out: MessageWriter<ModelInput>,
) {
    let source = InputSource::Pointer;

    if mouse_button.just_pressed(MouseButton::Left) && !over_hud.0 {
        if let Some(cursor) = windows.single().ok().and_then(|w| w.cursor_position()) {
            pointer.last_x = cursor.x;
        }
        out.write(ModelInput(InputEvent::DragStart { source, x: pointer.last_x }));
    }

    for moved in cursor_moved.read() {
        pointer.last_x = moved.position.x;
        out.write(ModelInput(InputEvent::DragMove { source, x: moved.position.x }));
    }

    if mouse_button.just_released(MouseButton::Left) {
        out.write(ModelInput(InputEvent::DragEnd { source, x: pointer.last_x }));
    }
}

fn translate_touches(
    touches: Res<Touches>,
    over_hud: Res<PointerOverHud>,
    mut state: ResMut<TouchState>,
    mut out: MessageWriter<ModelInput>,
) {
    let source = InputSource::Touch;

    if state.active.is_none() && !over_hud.0 {
        if let Some(touch) = touches.iter_just_pressed().next() {
            state.active = Some(touch.id());
            out.write(ModelInput(InputEvent::DragStart { source, x: touch.position().x }));
        }
    }

    let Some(id) = state.active else {
        return;
    };

    if let Some(touch) = touches.get_pressed(id) {
        if touch.delta().x != 0.0 {
            out.write(ModelInput(InputEvent::DragMove { source, x: touch.position().x }));
        }
    }

    let ended = touches
        .get_released(id)
        .or_else(|| touches.iter_just_canceled().find(|t| t.id() == id));
    if let Some(touch) = ended {
        state.active = None;
        out.write(ModelInput(InputEvent::DragEnd { source, x: touch.position().x }));
    }
}

/// Reads raw keyboard messages so OS auto-repeat keeps nudging the model
fn translate_keyboard(mut keys: MessageReader<KeyboardInput>, mut out: MessageWriter<ModelInput>) {
    for key in keys.read() {
        let mapped = key_from_code(key.key_code);
        let event = match key.state {
            ButtonState::Pressed => InputEvent::KeyDown(mapped),
            ButtonState::Released => InputEvent::KeyUp(mapped),
        };
        out.write(ModelInput(event));
    }
}
