//! sensor-registry: mapping from sensor type tags to description macro rules

mod entry;
pub use entry::RegistryEntry;

mod error;
pub use error::{RegistryError, Result};

mod registry;
pub use registry::SensorTypeRegistry;
