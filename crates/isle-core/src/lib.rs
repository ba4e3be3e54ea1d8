//! Isle Core - Rotation interaction core for the island viewer
//!
//! This crate holds the interaction logic behind the rotatable island model,
//! independent of any UI or rendering library:
//! - Input adapter turning pointer, touch, and keyboard events into rotation
//! - Per-frame integrator with exponential idle damping
//! - Stage classifier mapping the rotation angle to one of four orientations
//! - Listener registry for notifying the hosting application
//! - TOML configuration with validation

pub mod config;
pub mod controller;
pub mod frame;
pub mod input;
pub mod listeners;
pub mod stage;

pub use config::{
    load_config, save_default_config, ConfigError, FramePacing, IdleDecay, InteractionConfig,
    IsleConfig, SceneConfig, StageTracking,
};
pub use controller::RotationController;
pub use frame::{drive_frame, FrameOutput, RotationTarget, StageSignal, Tick};
pub use input::{Handled, InputEvent, InputHandler, InputSource, Key};
pub use listeners::{ListenerId, Listeners};
pub use stage::{classify, classify_with, normalize_angle, Stage, StageWindow, DEFAULT_STAGE_WINDOWS};
