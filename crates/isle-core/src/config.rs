//! Configuration loading and validation
//!
//! Every field has a default matching the stock island scene, so an empty
//! file (or no file at all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::stage::{StageWindow, DEFAULT_STAGE_WINDOWS};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("Invalid stage window #{index}: {reason}")]
    InvalidStageWindow { index: usize, reason: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsleConfig {
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

/// What happens once the residual spin falls below the rest threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdleDecay {
    /// Snap the speed back up to `residual_speed`, so the island never fully stops
    #[default]
    ResidualSpin,
    /// Snap the speed to zero
    FullStop,
}

/// When the stage classifier runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageTracking {
    /// Only during an active gesture; the last stage sticks after release
    #[default]
    WhileRotating,
    /// Every frame, including while the spin decays
    Always,
}

/// How the host turns rendered frames into integrator ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FramePacing {
    /// One integrator step per rendered frame
    #[default]
    PerFrame,
    /// Steps derived from elapsed time at `reference_frame_rate`
    FixedRate,
}

/// Rotation and damping tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Per-frame multiplicative decay applied while idle
    #[serde(default = "default_damping_factor")]
    pub damping_factor: f64,
    /// Speed magnitude below which the idle decay resets
    #[serde(default = "default_rest_threshold")]
    pub rest_threshold: f64,
    /// Speed restored by `IdleDecay::ResidualSpin`
    #[serde(default = "default_residual_speed")]
    pub residual_speed: f64,
    /// Radians per viewport width of horizontal drag
    #[serde(default = "default_drag_gain")]
    pub drag_gain: f64,
    /// Radians added per arrow key press
    #[serde(default = "default_key_step")]
    pub key_step: f64,
    /// Speed stored per arrow key press
    #[serde(default = "default_key_speed")]
    pub key_speed: f64,
    #[serde(default)]
    pub idle_decay: IdleDecay,
    #[serde(default)]
    pub stage_tracking: StageTracking,
    #[serde(default)]
    pub frame_pacing: FramePacing,
    /// Frames per second assumed by `Tick::Elapsed`
    #[serde(default = "default_reference_frame_rate")]
    pub reference_frame_rate: f64,
    #[serde(default = "default_stage_windows", rename = "stage_window")]
    pub stage_windows: Vec<StageWindow>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            damping_factor: default_damping_factor(),
            rest_threshold: default_rest_threshold(),
            residual_speed: default_residual_speed(),
            drag_gain: default_drag_gain(),
            key_step: default_key_step(),
            key_speed: default_key_speed(),
            idle_decay: IdleDecay::default(),
            stage_tracking: StageTracking::default(),
            frame_pacing: FramePacing::default(),
            reference_frame_rate: default_reference_frame_rate(),
            stage_windows: default_stage_windows(),
        }
    }
}

fn default_damping_factor() -> f64 {
    0.55
}

fn default_rest_threshold() -> f64 {
    0.001
}

fn default_residual_speed() -> f64 {
    0.01
}

fn default_drag_gain() -> f64 {
    0.01 * PI
}

fn default_key_step() -> f64 {
    0.005 * PI
}

fn default_key_speed() -> f64 {
    0.007
}

fn default_reference_frame_rate() -> f64 {
    60.0
}

fn default_stage_windows() -> Vec<StageWindow> {
    DEFAULT_STAGE_WINDOWS.to_vec()
}

impl InteractionConfig {
    /// Check that tuning values keep the integrator well-behaved
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.damping_factor > 0.0 && self.damping_factor < 1.0) {
            return Err(invalid("damping_factor", format!("must be in (0, 1), got {}", self.damping_factor)));
        }
        if !(self.rest_threshold >= 0.0) {
            return Err(invalid("rest_threshold", format!("must be >= 0, got {}", self.rest_threshold)));
        }
        if !(self.residual_speed >= 0.0) {
            return Err(invalid("residual_speed", format!("must be >= 0, got {}", self.residual_speed)));
        }
        if !(self.drag_gain > 0.0) || !self.drag_gain.is_finite() {
            return Err(invalid("drag_gain", format!("must be > 0, got {}", self.drag_gain)));
        }
        if !self.key_step.is_finite() || !self.key_speed.is_finite() {
            return Err(invalid("key_step", "key step and speed must be finite".to_string()));
        }
        if !(self.reference_frame_rate > 0.0) || !self.reference_frame_rate.is_finite() {
            return Err(invalid(
                "reference_frame_rate",
                format!("must be > 0, got {}", self.reference_frame_rate),
            ));
        }

        for (index, window) in self.stage_windows.iter().enumerate() {
            if !(window.start <= window.end) {
                return Err(ConfigError::InvalidStageWindow {
                    index,
                    reason: format!("start {} is after end {}", window.start, window.end),
                });
            }
            if window.start < 0.0 || window.end > TAU {
                return Err(ConfigError::InvalidStageWindow {
                    index,
                    reason: format!("[{}, {}] is outside [0, 2π]", window.start, window.end),
                });
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidValue { field, reason }
}

/// Scene placement and model source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// glTF/GLB asset path or URL
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_position")]
    pub position: [f32; 3],
    /// Base orientation as XYZ Euler angles in radians
    #[serde(default = "default_rotation")]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Scale used when the window is narrower than `mobile_breakpoint`
    #[serde(default = "default_mobile_scale")]
    pub mobile_scale: f32,
    /// Window width in logical pixels
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: f32,
    #[serde(default = "default_camera_near")]
    pub camera_near: f32,
    #[serde(default = "default_camera_far")]
    pub camera_far: f32,
    /// Background as linear sRGB (0.0-1.0)
    #[serde(default)]
    pub clear_color: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            position: default_position(),
            rotation: default_rotation(),
            scale: default_scale(),
            mobile_scale: default_mobile_scale(),
            mobile_breakpoint: default_mobile_breakpoint(),
            camera_near: default_camera_near(),
            camera_far: default_camera_far(),
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}

fn default_model_path() -> String {
    "models/bridge.glb".to_string()
}

fn default_position() -> [f32; 3] {
    [0.0, 0.0, -35.0]
}

fn default_rotation() -> [f32; 3] {
    [2.0, 3.15, 11.0]
}

fn default_scale() -> f32 {
    1.0
}

fn default_mobile_scale() -> f32 {
    0.9
}

fn default_mobile_breakpoint() -> f32 {
    768.0
}

fn default_camera_near() -> f32 {
    0.2
}

fn default_camera_far() -> f32 {
    1000.0
}

impl SceneConfig {
    /// Model scale for a given window width
    pub fn scale_for_width(&self, width: f32) -> f32 {
        if width < self.mobile_breakpoint {
            self.mobile_scale
        } else {
            self.scale
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_path.trim().is_empty() {
            return Err(invalid("model_path", "must not be empty".to_string()));
        }
        if !(self.scale > 0.0) || !(self.mobile_scale > 0.0) {
            return Err(invalid("scale", "scales must be > 0".to_string()));
        }
        if !(self.camera_near > 0.0 && self.camera_near < self.camera_far) {
            return Err(invalid(
                "camera_near",
                format!("need 0 < near < far, got near={} far={}", self.camera_near, self.camera_far),
            ));
        }
        Ok(())
    }
}

impl IsleConfig {
    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: IsleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.interaction.validate()?;
        self.scene.validate()
    }
}

/// Load configuration from file, falling back to defaults when it does not exist
pub fn load_config(path: &Path) -> Result<IsleConfig, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = IsleConfig::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(IsleConfig::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<(), ConfigError> {
    let content = IsleConfig::default().to_toml_string()?;
    std::fs::write(path, content)?;
    Ok(())
}
