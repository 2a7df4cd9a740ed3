use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generation rule for one sensor type tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Name of the description macro invoked for sensors of this type.
    pub macro_name: String,
    /// Include path pulled into the generated document preamble.
    pub include: String,
    /// Suffix appended to the sensor name when no explicit frame is given.
    pub frame_suffix: String,
    /// Parameters every record of this type must carry.
    #[serde(default)]
    pub required_params: Vec<String>,
    /// Macro arguments emitted unless a record overrides them.
    #[serde(default)]
    pub default_params: BTreeMap<String, String>,
}

impl RegistryEntry {
    pub fn new(macro_name: &str, include: &str, frame_suffix: &str) -> Self {
        Self {
            macro_name: macro_name.to_string(),
            include: include.to_string(),
            frame_suffix: frame_suffix.to_string(),
            required_params: Vec::new(),
            default_params: BTreeMap::new(),
        }
    }

    pub fn with_defaults(mut self, defaults: &[(&str, &str)]) -> Self {
        self.default_params = defaults
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    pub fn with_required(mut self, required: &[&str]) -> Self {
        self.required_params = required.iter().map(|p| p.to_string()).collect();
        self
    }
}
