//! HUD overlay using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use isle_scene::{CurrentStage, IslandModel, ModelLoadFailed, ModelReady, PointerOverHud};

const WELCOME: &str = "Welcome to Island of Wizardry!";

/// What the HUD shows for the mounted model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudStatus {
    Unmounted,
    Loading,
    Ready,
    Failed,
}

/// Fold `(ready, failed)` flags of mounted models into one status
pub fn hud_status(models: impl IntoIterator<Item = (bool, bool)>) -> HudStatus {
    let mut status = HudStatus::Unmounted;
    for (ready, failed) in models {
        status = match (ready, failed) {
            (_, true) => return HudStatus::Failed,
            (true, false) => HudStatus::Ready,
            (false, false) => HudStatus::Loading,
        };
    }
    status
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
        app.add_systems(EguiPrimaryContextPass, hud_system);
    }
}

fn hud_system(
    mut contexts: EguiContexts,
    stage: Res<CurrentStage>,
    models: Query<(Has<ModelReady>, Has<ModelLoadFailed>), With<IslandModel>>,
    mut over_hud: ResMut<PointerOverHud>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let status = hud_status(models.iter());

    egui::Area::new(egui::Id::new("isle_hud"))
        .anchor(egui::Align2::CENTER_TOP, [0.0, 24.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| match status {
                HudStatus::Loading => {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new().size(20.0));
                        ui.label(egui::RichText::new("Loading…").size(18.0));
                    });
                }
                HudStatus::Failed => {
                    ui.label(
                        egui::RichText::new("Failed to load the island model")
                            .size(18.0)
                            .color(egui::Color32::from_rgb(220, 80, 80)),
                    );
                }
                HudStatus::Ready => {
                    ui.heading(
                        egui::RichText::new(WELCOME)
                            .size(28.0)
                            .color(egui::Color32::from_rgb(60, 200, 90)),
                    );
                    if let Some(stage) = stage.0 {
                        ui.label(
                            egui::RichText::new(stage.to_string())
                                .size(20.0)
                                .color(egui::Color32::WHITE),
                        );
                    }
                }
                HudStatus::Unmounted => {}
            });
        });

    over_hud.set_if_neq(PointerOverHud(ctx.wants_pointer_input()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_before_and_after_load() {
        assert_eq!(hud_status([]), HudStatus::Unmounted);
        assert_eq!(hud_status([(false, false)]), HudStatus::Loading);
        assert_eq!(hud_status([(true, false)]), HudStatus::Ready);
    }

    #[test]
    fn test_failure_wins() {
        assert_eq!(hud_status([(true, false), (false, true)]), HudStatus::Failed);
    }
}
