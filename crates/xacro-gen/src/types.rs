use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rigid mounting offset between the base frame and a sensor frame.
///
/// Absent components default to zero, so purely logical sensors (frame
/// markers with no physical offset) can omit the block entirely. Values are
/// emitted into the description verbatim, without unit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub roll: f64,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub yaw: f64,
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// One sensor entry after loading and parameter merging. Immutable for the
/// rest of the run.
#[derive(Debug, Clone)]
pub struct SensorRecord {
    pub name: String,
    /// Type tag looked up in the sensor type registry.
    pub kind: String,
    /// Explicit frame override; `None` derives the frame from the registry.
    pub frame_id: Option<String>,
    pub transform: Transform,
    /// Merged individual macro arguments, inline `params` over `params_file`.
    pub params: BTreeMap<String, String>,
}

/// A parsed sensor configuration document: one base frame plus its sensors
/// in document order.
#[derive(Debug, Clone)]
pub struct SensorConfig {
    pub base_frame: String,
    pub sensors: Vec<SensorRecord>,
}
