//! JavaScript bridge for stage and rotating notifications
//!
//! The page registers callbacks with `onStageChange` / `onRotatingChange` and
//! removes them with `removeListener`. `unmount()` drops every callback at
//! once and despawns the model on the next frame.

use std::cell::Cell;

use bevy::prelude::*;
use isle_core::Stage;
use isle_scene::{IsleSet, RotatingChanged, StageChanged, UnmountModel};
use wasm_bindgen::prelude::*;

use crate::bridge::HostRegistry;

#[derive(Debug, Clone, Copy)]
enum HostEvent {
    Stage(Option<Stage>),
    Rotating(bool),
}

// wasm is single-threaded; these are only touched from the main thread
thread_local! {
    static REGISTRY: HostRegistry<HostEvent> = HostRegistry::new();
    static UNMOUNT_REQUESTED: Cell<bool> = const { Cell::new(false) };
}

fn subscribe(listener: impl FnMut(&HostEvent) + 'static) -> u32 {
    REGISTRY.with(|r| r.subscribe(listener))
}

fn call(callback: &js_sys::Function, value: &JsValue) {
    if let Err(err) = callback.call1(&JsValue::NULL, value) {
        tracing::warn!("Listener threw: {:?}", err);
    }
}

/// Register a stage callback; receives 1-4 or null
#[wasm_bindgen(js_name = onStageChange)]
pub fn on_stage_change(callback: js_sys::Function) -> u32 {
    subscribe(move |event| {
        if let HostEvent::Stage(stage) = event {
            let value = stage.map_or(JsValue::NULL, |s| JsValue::from(s.number()));
            call(&callback, &value);
        }
    })
}

/// Register an is-rotating callback; receives a boolean
#[wasm_bindgen(js_name = onRotatingChange)]
pub fn on_rotating_change(callback: js_sys::Function) -> u32 {
    subscribe(move |event| {
        if let HostEvent::Rotating(rotating) = event {
            call(&callback, &JsValue::from_bool(*rotating));
        }
    })
}

#[wasm_bindgen(js_name = removeListener)]
pub fn remove_listener(id: u32) -> bool {
    REGISTRY.with(|r| r.remove(id))
}

/// Drop every listener and despawn the model
#[wasm_bindgen]
pub fn unmount() {
    REGISTRY.with(|r| r.clear());
    UNMOUNT_REQUESTED.with(|u| u.set(true));
    tracing::info!("Unmount requested by host");
}

fn emit(event: HostEvent) {
    REGISTRY.with(|r| r.emit(&event));
}

pub struct HostBridgePlugin;

impl Plugin for HostBridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (process_unmount_requests, forward_to_host)
                .chain()
                .after(IsleSet::Publish),
        );
    }
}

fn process_unmount_requests(mut unmount: MessageWriter<UnmountModel>) {
    if UNMOUNT_REQUESTED.with(|u| u.replace(false)) {
        unmount.write(UnmountModel);
    }
}

/// Forward this frame's notifications in the order they happened
fn forward_to_host(
    mut stages: MessageReader<StageChanged>,
    mut rotating: MessageReader<RotatingChanged>,
) {
    // Input handling precedes the frame step, so rotating changes go first
    for change in rotating.read() {
        emit(HostEvent::Rotating(change.rotating));
    }
    for change in stages.read() {
        emit(HostEvent::Stage(change.stage));
    }
}
