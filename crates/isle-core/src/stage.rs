//! Stage classification - maps a model rotation angle to one of four orientations
//!
//! The classifier normalizes the accumulated angle into `[0, 2π)` and checks it
//! against a small table of inclusive angular windows. Windows are checked in
//! table order, so the first match wins. Angles outside every window classify
//! as "no stage".

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

/// One of the four named orientations of the island
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Stage {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Stage {
    /// Numeric stage value (1-4) as reported to the host application
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Stage::One),
            2 => Some(Stage::Two),
            3 => Some(Stage::Three),
            4 => Some(Stage::Four),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stage {}", self.number())
    }
}

impl TryFrom<u8> for Stage {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Stage::from_number(n).ok_or_else(|| format!("stage must be 1-4, got {}", n))
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> u8 {
        stage.number()
    }
}

/// An inclusive angular window `[start, end]` (radians) mapped to a stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageWindow {
    pub start: f64,
    pub end: f64,
    pub stage: Stage,
}

impl StageWindow {
    pub const fn new(start: f64, end: f64, stage: Stage) -> Self {
        Self { start, end, stage }
    }

    /// Check whether a normalized angle falls inside this window
    pub fn contains(&self, normalized: f64) -> bool {
        normalized >= self.start && normalized <= self.end
    }
}

/// The island's stage windows, in match order
pub const DEFAULT_STAGE_WINDOWS: [StageWindow; 4] = [
    StageWindow::new(5.45, 5.85, Stage::Four),
    StageWindow::new(0.85, 1.30, Stage::Three),
    StageWindow::new(2.40, 2.60, Stage::Two),
    StageWindow::new(4.25, 4.75, Stage::One),
];

/// Normalize an unbounded angle into `[0, 2π)`
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if normalized >= TAU {
        0.0
    } else {
        normalized
    }
}

/// Classify an angle against a window table
pub fn classify_with(angle: f64, windows: &[StageWindow]) -> Option<Stage> {
    let normalized = normalize_angle(angle);
    windows
        .iter()
        .find(|w| w.contains(normalized))
        .map(|w| w.stage)
}

/// Classify an angle against the default island windows
pub fn classify(angle: f64) -> Option<Stage> {
    classify_with(angle, &DEFAULT_STAGE_WINDOWS)
}
