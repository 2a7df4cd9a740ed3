use crate::error::{CompileError, Result};
use crate::loader;
use crate::render::{self, GeneratedDocument};
use crate::resolve::resolve_sensors;
use crate::types::{SensorConfig, SensorRecord, Transform};
use sensor_registry::SensorTypeRegistry;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Type tag marking a joint unit in the main configuration.
pub const UNIT_TYPE: &str = "units";

/// A joint unit: a sensor cluster with its own configuration document,
/// generated into its own description file defining `{name}_macro`.
#[derive(Debug, Clone)]
pub struct SensorUnit {
    pub name: String,
    /// Frame the unit macro is attached under in the main document.
    pub frame_id: String,
    pub parent: String,
    pub transform: Transform,
    pub params: BTreeMap<String, String>,
    /// The unit's own document, same schema as the main configuration.
    pub config: SensorConfig,
}

impl SensorUnit {
    pub fn macro_name(&self) -> String {
        format!("{}_macro", self.name)
    }

    /// Generated file, also the include the main document pulls in.
    pub fn output_file(&self) -> String {
        format!("{}.xacro", self.name)
    }

    fn config_file(name: &str) -> String {
        format!("{name}.yaml")
    }
}

/// Split `config` into plain sensors and joint units, loading each unit's
/// own document from `config_dir`. Unit sensors never reach the main pass.
pub fn partition_units(
    config_dir: &Path,
    config: SensorConfig,
) -> Result<(SensorConfig, Vec<SensorUnit>)> {
    let base_frame = config.base_frame;
    let mut sensors = Vec::new();
    let mut units = Vec::new();
    for record in config.sensors {
        if record.kind != UNIT_TYPE {
            sensors.push(record);
            continue;
        }
        units.push(load_unit(config_dir, &base_frame, record)?);
    }
    Ok((
        SensorConfig {
            base_frame,
            sensors,
        },
        units,
    ))
}

fn load_unit(config_dir: &Path, base_frame: &str, record: SensorRecord) -> Result<SensorUnit> {
    let config_file = SensorUnit::config_file(&record.name);
    let unit_config = loader::load_config(config_dir, &config_file)?;
    if let Some(nested) = unit_config.sensors.iter().find(|s| s.kind == UNIT_TYPE) {
        return Err(CompileError::ConfigParse {
            path: config_dir.join(&config_file),
            reason: format!("sensor '{}': joint units may not nest", nested.name),
        });
    }
    let unit = SensorUnit {
        frame_id: record
            .frame_id
            .unwrap_or_else(|| format!("{}_base_link", record.name)),
        name: record.name,
        parent: base_frame.to_string(),
        transform: record.transform,
        params: record.params,
        config: unit_config,
    };
    // A unit named after the main document would clobber it on write.
    if unit.output_file() == render::SENSORS_OUTPUT {
        return Err(CompileError::DuplicateSensorName(unit.name));
    }
    debug!(unit = %unit.name, sensors = unit.config.sensors.len(), "loaded joint unit");
    Ok(unit)
}

/// Includes the main document needs for its units, in unit order.
pub fn unit_includes(units: &[SensorUnit]) -> Vec<String> {
    units.iter().map(SensorUnit::output_file).collect()
}

/// Invocation of the unit macro inside the main document.
pub fn unit_invocation(unit: &SensorUnit) -> String {
    render::invocation_text(
        &unit.macro_name(),
        &unit.frame_id,
        &unit.parent,
        &unit.transform,
        &unit.params,
    )
}

/// Render one unit document from the unit template skeleton.
pub fn render_unit(
    template: &str,
    unit: &SensorUnit,
    project_name: &str,
    registry: &SensorTypeRegistry,
) -> Result<GeneratedDocument> {
    let resolved = resolve_sensors(&unit.config, registry)?;
    let includes = render::collect_includes(&resolved)?;
    let invocations: Vec<String> = resolved.iter().map(render::macro_invocation).collect();
    let content = render::substitute(
        template,
        &[
            ("unit_macro_name", unit.macro_name().as_str()),
            ("unit_name", unit.name.as_str()),
            ("base_frame", unit.config.base_frame.as_str()),
            ("default_config_path", &format!("$(find {project_name})/config")),
            ("sensor_includes", &render::fmt_includes(&includes)),
            ("sensors", &invocations.join("\n")),
        ],
    );
    Ok(GeneratedDocument {
        file_name: unit.output_file(),
        content,
    })
}
