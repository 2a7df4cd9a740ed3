use crate::error::{CompileError, Result};
use crate::types::{SensorConfig, SensorRecord, Transform};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::debug;

/// File name of the primary sensor configuration document.
pub const MAIN_CONFIG: &str = "sensors.yaml";

/// Keys owned by the top level of a sensor entry. Individual parameter
/// documents may not redeclare them.
const RESERVED_KEYS: [&str; 4] = ["type", "frame_id", "transform", "params_file"];

#[derive(Debug, Deserialize)]
struct ConfigDoc {
    base_frame: String,
    #[serde(default)]
    sensors: serde_yaml::Mapping,
}

#[derive(Debug, Deserialize)]
struct SensorDoc {
    #[serde(rename = "type")]
    kind: String,
    frame_id: Option<String>,
    #[serde(default)]
    transform: Transform,
    #[serde(default)]
    params: serde_yaml::Mapping,
    params_file: Option<String>,
}

/// Load and normalize one sensor configuration document from `config_dir`.
///
/// Sensor order follows the document. Referenced `params_file` documents are
/// merged into each record's individual parameters, with inline `params`
/// winning on key conflicts and reserved top-level keys rejected outright.
pub fn load_config(config_dir: impl AsRef<Path>, file_name: &str) -> Result<SensorConfig> {
    let config_dir = config_dir.as_ref();
    let path = config_dir.join(file_name);
    if !path.is_file() {
        return Err(CompileError::ConfigNotFound(path));
    }
    let raw = fs::read_to_string(&path).map_err(|e| CompileError::Io(e.to_string()))?;
    let doc: ConfigDoc = serde_yaml::from_str(&raw).map_err(|e| parse_err(&path, &e.to_string()))?;

    let mut seen = BTreeSet::new();
    let mut sensors = Vec::with_capacity(doc.sensors.len());
    for (key, value) in doc.sensors {
        let name = key
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| parse_err(&path, "sensor names must be strings"))?;
        // Generated frames and file names derive from the sensor name.
        if !is_identifier(&name) {
            return Err(parse_err(
                &path,
                &format!("sensor '{name}': names must be ASCII identifiers ([A-Za-z0-9_])"),
            ));
        }
        if !seen.insert(name.clone()) {
            return Err(CompileError::DuplicateSensorName(name));
        }
        let sensor: SensorDoc = serde_yaml::from_value(value)
            .map_err(|e| parse_err(&path, &format!("sensor '{name}': {e}")))?;
        let params = merge_params(config_dir, &path, &name, &sensor)?;
        debug!(sensor = %name, kind = %sensor.kind, "loaded sensor record");
        sensors.push(SensorRecord {
            name,
            kind: sensor.kind,
            frame_id: sensor.frame_id,
            transform: sensor.transform,
            params,
        });
    }
    Ok(SensorConfig {
        base_frame: doc.base_frame,
        sensors,
    })
}

fn merge_params(
    config_dir: &Path,
    config_path: &Path,
    sensor: &str,
    doc: &SensorDoc,
) -> Result<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    if let Some(file) = &doc.params_file {
        let path = config_dir.join(file);
        if !path.is_file() {
            return Err(CompileError::ConfigNotFound(path));
        }
        let raw = fs::read_to_string(&path).map_err(|e| CompileError::Io(e.to_string()))?;
        let mapping: serde_yaml::Mapping =
            serde_yaml::from_str(&raw).map_err(|e| parse_err(&path, &e.to_string()))?;
        insert_params(&mut params, &mapping, &path, sensor)?;
    }
    // Inline params win over the referenced file.
    insert_params(&mut params, &doc.params, config_path, sensor)?;
    Ok(params)
}

fn insert_params(
    out: &mut BTreeMap<String, String>,
    mapping: &serde_yaml::Mapping,
    path: &Path,
    sensor: &str,
) -> Result<()> {
    for (key, value) in mapping {
        let key = key
            .as_str()
            .ok_or_else(|| parse_err(path, &format!("sensor '{sensor}': parameter keys must be strings")))?;
        if RESERVED_KEYS.contains(&key) {
            return Err(parse_err(
                path,
                &format!("sensor '{sensor}': '{key}' may only be set at the top level"),
            ));
        }
        let value = scalar_string(value).ok_or_else(|| {
            parse_err(path, &format!("sensor '{sensor}': parameter '{key}' must be a scalar"))
        })?;
        out.insert(key.to_string(), value);
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn scalar_string(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn parse_err(path: &Path, reason: &str) -> CompileError {
    CompileError::ConfigParse {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(dir: &Path, body: &str) {
        fs::write(dir.join(MAIN_CONFIG), body).unwrap();
    }

    #[test]
    fn loads_records_in_document_order() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
base_frame: sensor_kit_base_link
sensors:
  rear_lidar:
    type: pandar_xt32
  front_cam:
    type: monocular_camera
    transform: { x: 0.1, yaw: 1.57 }
"#,
        );
        let config = load_config(dir.path(), MAIN_CONFIG).unwrap();
        assert_eq!(config.base_frame, "sensor_kit_base_link");
        let names: Vec<&str> = config.sensors.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["rear_lidar", "front_cam"]);
        assert!(config.sensors[0].transform.is_identity());
        assert_eq!(config.sensors[1].transform.x, 0.1);
        assert_eq!(config.sensors[1].transform.yaw, 1.57);
        assert_eq!(config.sensors[1].transform.z, 0.0);
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path(), MAIN_CONFIG).unwrap_err();
        assert!(matches!(err, CompileError::ConfigNotFound(_)));
    }

    #[test]
    fn malformed_yaml_is_config_parse() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "base_frame: [unterminated");
        let err = load_config(dir.path(), MAIN_CONFIG).unwrap_err();
        assert!(matches!(err, CompileError::ConfigParse { .. }));
    }

    #[test]
    fn missing_type_field_is_config_parse() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "base_frame: base\nsensors:\n  front_cam:\n    frame_id: f\n",
        );
        let err = load_config(dir.path(), MAIN_CONFIG).unwrap_err();
        match err {
            CompileError::ConfigParse { reason, .. } => {
                assert!(reason.contains("front_cam"), "reason: {reason}");
            }
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }

    #[test]
    fn params_file_merges_under_inline_params() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cam_extra.yaml"), "fps: 15\nfov: 2.0\n").unwrap();
        write_config(
            dir.path(),
            r#"
base_frame: base
sensors:
  front_cam:
    type: monocular_camera
    params: { fps: 60 }
    params_file: cam_extra.yaml
"#,
        );
        let config = load_config(dir.path(), MAIN_CONFIG).unwrap();
        let params = &config.sensors[0].params;
        assert_eq!(params.get("fps").map(String::as_str), Some("60"));
        assert_eq!(params.get("fov").map(String::as_str), Some("2.0"));
    }

    #[test]
    fn params_may_not_redeclare_reserved_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.yaml"), "frame_id: sneaky\n").unwrap();
        write_config(
            dir.path(),
            r#"
base_frame: base
sensors:
  front_cam:
    type: monocular_camera
    params_file: bad.yaml
"#,
        );
        let err = load_config(dir.path(), MAIN_CONFIG).unwrap_err();
        match err {
            CompileError::ConfigParse { reason, .. } => {
                assert!(reason.contains("frame_id"), "reason: {reason}");
                assert!(reason.contains("front_cam"), "reason: {reason}");
            }
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }

    #[test]
    fn missing_params_file_is_config_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
base_frame: base
sensors:
  front_cam:
    type: monocular_camera
    params_file: nowhere.yaml
"#,
        );
        let err = load_config(dir.path(), MAIN_CONFIG).unwrap_err();
        assert!(matches!(err, CompileError::ConfigNotFound(p) if p.ends_with("nowhere.yaml")));
    }

    #[test]
    fn non_identifier_sensor_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "base_frame: base\nsensors:\n  front/cam:\n    type: monocular_camera\n",
        );
        let err = load_config(dir.path(), MAIN_CONFIG).unwrap_err();
        match err {
            CompileError::ConfigParse { reason, .. } => {
                assert!(reason.contains("front/cam"), "reason: {reason}");
            }
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }

    #[test]
    fn non_scalar_param_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
base_frame: base
sensors:
  front_cam:
    type: monocular_camera
    params:
      roi: [0, 0, 100, 100]
"#,
        );
        let err = load_config(dir.path(), MAIN_CONFIG).unwrap_err();
        match err {
            CompileError::ConfigParse { reason, .. } => {
                assert!(reason.contains("roi"), "reason: {reason}");
            }
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }
}
