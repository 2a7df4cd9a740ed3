use crate::error::{CompileError, Result};
use crate::types::{SensorConfig, SensorRecord, Transform};
use sensor_registry::SensorTypeRegistry;
use std::collections::BTreeMap;
use tracing::warn;

/// A sensor with its frame, transform, and macro arguments fully determined.
#[derive(Debug, Clone)]
pub struct ResolvedSensor {
    pub name: String,
    /// Parent frame every invocation attaches to.
    pub parent: String,
    pub frame_id: String,
    pub transform: Transform,
    pub macro_name: String,
    pub include: String,
    /// Registry defaults overlaid by the record's individual parameters.
    pub params: BTreeMap<String, String>,
}

/// Resolve every record of `config` against `registry`, in input order.
///
/// Duplicate effective frames across sensors are allowed (several sensors
/// may share one physical mount) but reported.
pub fn resolve_sensors(
    config: &SensorConfig,
    registry: &SensorTypeRegistry,
) -> Result<Vec<ResolvedSensor>> {
    let mut resolved = Vec::with_capacity(config.sensors.len());
    for record in &config.sensors {
        resolved.push(resolve_sensor(record, &config.base_frame, registry)?);
    }
    warn_duplicate_frames(&resolved);
    Ok(resolved)
}

/// Resolve a single record: explicit `frame_id` wins, otherwise the frame is
/// `{name}_{suffix}` from the registry entry; an absent transform stays the
/// identity.
pub fn resolve_sensor(
    record: &SensorRecord,
    base_frame: &str,
    registry: &SensorTypeRegistry,
) -> Result<ResolvedSensor> {
    let entry = registry
        .resolve(&record.kind)
        .map_err(|_| CompileError::UnknownSensorType {
            sensor: record.name.clone(),
            kind: record.kind.clone(),
        })?;

    let frame_id = match &record.frame_id {
        Some(frame) => frame.clone(),
        None => format!("{}_{}", record.name, entry.frame_suffix),
    };

    let mut params = entry.default_params.clone();
    params.extend(record.params.iter().map(|(k, v)| (k.clone(), v.clone())));

    for required in &entry.required_params {
        if !params.contains_key(required) {
            return Err(CompileError::MissingRequiredParameter {
                sensor: record.name.clone(),
                param: required.clone(),
            });
        }
    }

    Ok(ResolvedSensor {
        name: record.name.clone(),
        parent: base_frame.to_string(),
        frame_id,
        transform: record.transform,
        macro_name: entry.macro_name.clone(),
        include: entry.include.clone(),
        params,
    })
}

fn warn_duplicate_frames(resolved: &[ResolvedSensor]) {
    let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
    for sensor in resolved {
        if let Some(first) = owners.insert(sensor.frame_id.as_str(), sensor.name.as_str()) {
            warn!(
                frame = %sensor.frame_id,
                first,
                second = %sensor.name,
                "sensors share a frame id"
            );
        }
    }
}
