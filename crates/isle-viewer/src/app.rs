//! Bevy application setup

use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use isle_core::IsleConfig;
use isle_scene::{IsleScenePlugin, IsleSet, RotatingState};

use crate::ui::UiPlugin;

/// Asset root: the page origin in the browser, `assets/` on desktop
#[cfg(target_arch = "wasm32")]
const ASSET_ROOT: &str = "";
#[cfg(not(target_arch = "wasm32"))]
const ASSET_ROOT: &str = "assets";

/// Build the viewer app without running it
pub fn build_app(config: IsleConfig) -> App {
    let mut app = App::new();
    app
        // Idle spin needs continuous frames
        .insert_resource(WinitSettings::default())
        // Bevy 0.17+ has built-in https:// asset loading via the "https" feature
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Island of Wizardry".to_string(),
                    canvas: Some("#isle-canvas".to_string()),
                    fit_canvas_to_parent: true,
                    // Keeps arrow keys and touch drags from scrolling the page
                    prevent_default_event_handling: true,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: ASSET_ROOT.to_string(),
                // Don't look for .meta files - static hosts don't have them
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
        )
        .add_plugins(EguiPlugin::default())
        .add_plugins(IsleScenePlugin::new(config))
        .add_plugins(UiPlugin)
        .add_systems(Update, update_cursor_icon.after(IsleSet::Publish));
    app
}

/// Build and run the viewer
pub fn run(config: IsleConfig) -> AppExit {
    build_app(config).run()
}

pub fn cursor_for(rotating: bool) -> SystemCursorIcon {
    if rotating {
        SystemCursorIcon::Grabbing
    } else {
        SystemCursorIcon::Grab
    }
}

/// Grab while idle, grabbing while a gesture is in progress
fn update_cursor_icon(
    mut commands: Commands,
    rotating: Res<RotatingState>,
    windows: Query<Entity, With<PrimaryWindow>>,
) {
    if !rotating.is_changed() {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    commands
        .entity(window)
        .insert(CursorIcon::from(cursor_for(rotating.0)));
}
