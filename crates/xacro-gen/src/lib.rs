//! xacro-gen: compiles sensor configuration YAML into URDF/xacro documents
//!
//! The pipeline loads a sensor configuration, resolves each sensor's frame
//! and mounting transform against a [`sensor_registry::SensorTypeRegistry`],
//! and renders deterministic xacro documents from template skeletons. Joint
//! units (sensor clusters with their own configuration file) are handled by
//! a separate pass that emits one document per unit.

mod error;
pub use error::{CompileError, Result};

mod types;
pub use types::{SensorConfig, SensorRecord, Transform};

mod loader;
pub use loader::{load_config, MAIN_CONFIG};

mod resolve;
pub use resolve::{resolve_sensor, resolve_sensors, ResolvedSensor};

mod render;
pub use render::{
    collect_includes, load_template, macro_invocation, render_sensors, write_documents,
    GeneratedDocument, SENSORS_OUTPUT, SENSORS_TEMPLATE, SENSOR_UNIT_TEMPLATE,
};

mod units;
pub use units::{
    partition_units, render_unit, unit_includes, unit_invocation, SensorUnit, UNIT_TYPE,
};

mod pipeline;
pub use pipeline::compile;
