//! Isle Viewer - Island of Wizardry
//!
//! Runs the rotatable island scene in the browser (wasm) or in a desktop
//! window, draws the HUD, and bridges stage and rotating notifications to
//! JavaScript callbacks.

pub mod app;
pub mod bridge;
pub mod ui;

#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod web_config;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// WASM entry point
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build()
    );

    // The config URL has to resolve before the scene is built
    wasm_bindgen_futures::spawn_local(async {
        let config = web_config::resolve_config().await;
        app::build_app(config).add_plugins(host::HostBridgePlugin).run();
    });
}
