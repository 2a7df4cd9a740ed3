use crate::error::{CompileError, Result};
use crate::loader::MAIN_CONFIG;
use crate::resolve::ResolvedSensor;
use crate::types::Transform;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Template skeleton for the main sensors document.
pub const SENSORS_TEMPLATE: &str = "sensors.xacro.template";
/// Template skeleton for one joint-unit document.
pub const SENSOR_UNIT_TEMPLATE: &str = "sensor_unit.xacro.template";

/// File name of the main generated document.
pub const SENSORS_OUTPUT: &str = "sensors.xacro";

/// A rendered description file, assembled fully in memory before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub file_name: String,
    pub content: String,
}

/// Read a template skeleton from the template directory.
pub fn load_template(template_dir: &Path, file_name: &str) -> Result<String> {
    let path = template_dir.join(file_name);
    if !path.is_file() {
        return Err(CompileError::TemplateNotFound(path.display().to_string()));
    }
    fs::read_to_string(&path).map_err(|e| CompileError::Io(e.to_string()))
}

/// Replace each `{{ key }}` marker with its value. Unknown markers are left
/// in place.
pub(crate) fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{ {key} }}}}"), value);
    }
    out
}

/// Preamble includes for `sensors`, deduplicated in first-occurrence order.
pub fn collect_includes(sensors: &[ResolvedSensor]) -> Result<Vec<String>> {
    let mut includes: Vec<String> = Vec::new();
    for sensor in sensors {
        if sensor.include.is_empty() {
            return Err(CompileError::TemplateNotFound(format!(
                "include for macro '{}' (sensor '{}')",
                sensor.macro_name, sensor.name
            )));
        }
        if !includes.iter().any(|i| i == &sensor.include) {
            includes.push(sensor.include.clone());
        }
    }
    Ok(includes)
}

pub(crate) fn fmt_includes(includes: &[String]) -> String {
    includes
        .iter()
        .map(|i| format!("  <xacro:include filename=\"{i}\"/>"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One macro invocation for a resolved sensor: frame, parent, transform
/// components, then all parameters sorted by key.
pub fn macro_invocation(sensor: &ResolvedSensor) -> String {
    invocation_text(
        &sensor.macro_name,
        &sensor.frame_id,
        &sensor.parent,
        &sensor.transform,
        &sensor.params,
    )
}

pub(crate) fn invocation_text(
    macro_name: &str,
    name: &str,
    parent: &str,
    transform: &Transform,
    params: &BTreeMap<String, String>,
) -> String {
    let mut out = format!("  <xacro:{macro_name}");
    push_attr(&mut out, "name", name);
    push_attr(&mut out, "parent", parent);
    let t = transform;
    for (key, value) in [
        ("x", t.x),
        ("y", t.y),
        ("z", t.z),
        ("roll", t.roll),
        ("pitch", t.pitch),
        ("yaw", t.yaw),
    ] {
        push_attr(&mut out, key, &value.to_string());
    }
    for (key, value) in params {
        push_attr(&mut out, key, value);
    }
    out.push_str("\n  />");
    out
}

fn push_attr(out: &mut String, key: &str, value: &str) {
    out.push_str(&format!("\n    {key}=\"{value}\""));
}

/// Render the main sensors document from its template skeleton.
pub fn render_sensors(
    template: &str,
    project_name: &str,
    sensors: &[ResolvedSensor],
    unit_includes: &[String],
    unit_invocations: &[String],
) -> Result<GeneratedDocument> {
    let includes = collect_includes(sensors)?;
    let invocations: Vec<String> = sensors.iter().map(macro_invocation).collect();
    let content = substitute(
        template,
        &[
            ("default_config_path", &format!("$(find {project_name})/config")),
            ("sensor_config_path", &format!("$(arg config_dir)/{MAIN_CONFIG}")),
            ("sensor_includes", &fmt_includes(&includes)),
            ("sensors", &invocations.join("\n")),
            ("unit_includes", &fmt_includes(unit_includes)),
            ("units", &unit_invocations.join("\n")),
        ],
    );
    Ok(GeneratedDocument {
        file_name: SENSORS_OUTPUT.to_string(),
        content,
    })
}

/// Write every document into `output_dir`, creating it if needed.
pub fn write_documents(documents: &[GeneratedDocument], output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|e| CompileError::Io(e.to_string()))?;
    let mut written = Vec::with_capacity(documents.len());
    for doc in documents {
        let path = output_dir.join(&doc.file_name);
        fs::write(&path, &doc.content).map_err(|e| CompileError::Io(e.to_string()))?;
        debug!(path = %path.display(), "wrote description");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(name: &str) -> ResolvedSensor {
        ResolvedSensor {
            name: name.to_string(),
            parent: "base".to_string(),
            frame_id: format!("{name}_camera_frame"),
            transform: Transform::default(),
            macro_name: "camera_macro".to_string(),
            include: "$(find camera_description)/urdf/monocular_camera.xacro".to_string(),
            params: BTreeMap::from([("fps".to_string(), "30".to_string())]),
        }
    }

    #[test]
    fn invocation_inlines_frame_parent_transform_and_params() {
        let mut sensor = camera("front_cam");
        sensor.transform.x = 0.25;
        sensor.transform.yaw = -1.5;
        let text = macro_invocation(&sensor);
        assert!(text.starts_with("  <xacro:camera_macro"));
        assert!(text.contains("name=\"front_cam_camera_frame\""));
        assert!(text.contains("parent=\"base\""));
        assert!(text.contains("x=\"0.25\""));
        assert!(text.contains("yaw=\"-1.5\""));
        assert!(text.contains("roll=\"0\""));
        assert!(text.contains("fps=\"30\""));
    }

    #[test]
    fn includes_dedup_in_first_occurrence_order() {
        let mut lidar = camera("top_lidar");
        lidar.include = "$(find lidar_description)/urdf/lidar.xacro".to_string();
        let sensors = vec![camera("a"), lidar, camera("b")];
        let includes = collect_includes(&sensors).unwrap();
        assert_eq!(
            includes,
            [
                "$(find camera_description)/urdf/monocular_camera.xacro",
                "$(find lidar_description)/urdf/lidar.xacro",
            ]
        );
    }

    #[test]
    fn empty_include_is_template_not_found() {
        let mut sensor = camera("front_cam");
        sensor.include = String::new();
        let err = collect_includes(&[sensor]).unwrap_err();
        assert!(matches!(err, CompileError::TemplateNotFound(_)));
    }

    #[test]
    fn missing_skeleton_is_template_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_template(dir.path(), SENSORS_TEMPLATE).unwrap_err();
        assert!(matches!(err, CompileError::TemplateNotFound(_)));
    }

    #[test]
    fn substitution_fills_markers_and_rendering_is_stable() {
        let template = "<robot>\n{{ sensor_includes }}\n{{ sensors }}\n</robot>\n";
        let sensors = vec![camera("front_cam")];
        let a = render_sensors(template, "proj", &sensors, &[], &[]).unwrap();
        let b = render_sensors(template, "proj", &sensors, &[], &[]).unwrap();
        assert_eq!(a, b);
        assert!(a.content.contains("<xacro:include filename=\"$(find camera_description)"));
        assert!(!a.content.contains("{{ sensors }}"));
    }
}
