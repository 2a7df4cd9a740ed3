use anyhow::Result;
use clap::Parser;
use sensor_registry::SensorTypeRegistry;
use std::path::PathBuf;
use tracing::info;

/// Compiles a sensor configuration into URDF/xacro description files.
///
/// Invoked once per build by the description package's build glue; a
/// non-zero exit fails that build.
#[derive(Parser, Debug)]
#[command(name = "sdc", version, about = "Sensor description compiler")]
struct Cli {
    /// Directory holding the xacro template skeletons
    template_dir: PathBuf,
    /// Directory holding sensors.yaml and per-unit configuration files
    config_dir: PathBuf,
    /// Description directory receiving the generated files
    urdf_dir: PathBuf,
    /// Name of the description package the generated files belong to
    project_name: String,
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let registry = SensorTypeRegistry::builtin();
    let written = xacro_gen::compile(
        &cli.template_dir,
        &cli.config_dir,
        &cli.urdf_dir,
        &cli.project_name,
        &registry,
    )?;

    info!(project = %cli.project_name, files = written.len(), "descriptions generated");
    for path in &written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn setup_tracing() {
    // Best-effort; avoid panics if already set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
