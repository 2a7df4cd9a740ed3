use crate::error::Result;
use crate::loader;
use crate::render;
use crate::resolve;
use crate::units;
use sensor_registry::SensorTypeRegistry;
use std::path::{Path, PathBuf};
use tracing::info;

/// Run one configuration-to-description compilation.
///
/// Every input is read and every document rendered before anything is
/// written, so a failing run leaves no partial output behind. Repeated runs
/// over unchanged input produce byte-identical files.
pub fn compile(
    template_dir: &Path,
    config_dir: &Path,
    output_dir: &Path,
    project_name: &str,
    registry: &SensorTypeRegistry,
) -> Result<Vec<PathBuf>> {
    info!(config_dir = %config_dir.display(), "loading sensor configuration");
    let sensors_template = render::load_template(template_dir, render::SENSORS_TEMPLATE)?;
    let config = loader::load_config(config_dir, loader::MAIN_CONFIG)?;
    let (config, sensor_units) = units::partition_units(config_dir, config)?;
    let unit_template = if sensor_units.is_empty() {
        String::new()
    } else {
        render::load_template(template_dir, render::SENSOR_UNIT_TEMPLATE)?
    };

    info!(
        sensors = config.sensors.len(),
        units = sensor_units.len(),
        "resolving frames and transforms"
    );
    let resolved = resolve::resolve_sensors(&config, registry)?;

    info!("generating description documents");
    let unit_includes = units::unit_includes(&sensor_units);
    let unit_invocations: Vec<String> =
        sensor_units.iter().map(units::unit_invocation).collect();
    let mut documents = vec![render::render_sensors(
        &sensors_template,
        project_name,
        &resolved,
        &unit_includes,
        &unit_invocations,
    )?];
    for unit in &sensor_units {
        documents.push(units::render_unit(&unit_template, unit, project_name, registry)?);
    }

    let written = render::write_documents(&documents, output_dir)?;
    info!(files = written.len(), "compilation finished");
    Ok(written)
}
