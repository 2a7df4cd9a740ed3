use crate::{RegistryEntry, RegistryError, Result};
use std::collections::BTreeMap;

/// Lookup table from sensor type tags to their generation rules.
///
/// The registry is an explicit value handed to the compilation pipeline, so
/// tests can run against reduced or extended tables. Adding a tag never
/// changes how existing tags resolve.
#[derive(Debug, Default, Clone)]
pub struct SensorTypeRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl SensorTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table covering the sensor families of the stock description packages.
    pub fn builtin() -> Self {
        let lidar_defaults: &[(&str, &str)] = &[
            ("topic", "/points_raw"),
            ("hz", "10"),
            ("samples", "220"),
            ("gpu", "$(arg gpu)"),
        ];

        let mut reg = Self::new();
        reg.insert(
            "monocular_camera",
            RegistryEntry::new(
                "monocular_camera_macro",
                "$(find camera_description)/urdf/monocular_camera.xacro",
                "camera_link",
            )
            .with_defaults(&[
                ("fps", "30"),
                ("width", "800"),
                ("height", "400"),
                ("namespace", ""),
                ("fov", "1.3"),
            ]),
        );
        reg.insert(
            "imu",
            RegistryEntry::new("imu_macro", "$(find imu_description)/urdf/imu.xacro", "imu_link")
                .with_defaults(&[("fps", "100"), ("namespace", "")]),
        );
        // GNSS rides on the imu description package.
        reg.insert(
            "gnss",
            RegistryEntry::new("imu_macro", "$(find imu_description)/urdf/imu.xacro", "gnss_link")
                .with_defaults(&[("fps", "100"), ("namespace", "")]),
        );
        reg.insert(
            "velodyne_16",
            RegistryEntry::new(
                "VLP-16",
                "$(find velodyne_description)/urdf/VLP-16.urdf.xacro",
                "base_link",
            )
            .with_defaults(lidar_defaults),
        );
        reg.insert(
            "velodyne_128",
            RegistryEntry::new(
                "VLS-128",
                "$(find vls_description)/urdf/VLS-128.urdf.xacro",
                "base_link",
            )
            .with_defaults(lidar_defaults),
        );
        reg.insert(
            "pandar_40p",
            RegistryEntry::new(
                "Pandar40P",
                "$(find pandar_description)/urdf/pandar_40p.xacro",
                "base_link",
            ),
        );
        reg.insert(
            "pandar_ot128",
            RegistryEntry::new(
                "PandarOT-128",
                "$(find pandar_description)/urdf/pandar_ot128.xacro",
                "base_link",
            ),
        );
        reg.insert(
            "pandar_xt32",
            RegistryEntry::new(
                "PandarXT-32",
                "$(find pandar_description)/urdf/pandar_xt32.xacro",
                "base_link",
            ),
        );
        reg.insert(
            "pandar_qt",
            RegistryEntry::new(
                "PandarQT",
                "$(find pandar_description)/urdf/pandar_qt.xacro",
                "base_link",
            ),
        );
        reg.insert(
            "pandar_qt128",
            RegistryEntry::new(
                "PandarQT-128",
                "$(find pandar_description)/urdf/pandar_qt128.xacro",
                "base_link",
            ),
        );
        reg.insert(
            "livox_horizon",
            RegistryEntry::new(
                "livox_horizon_macro",
                "$(find livox_description)/urdf/livox_horizon.xacro",
                "base_link",
            ),
        );
        reg.insert(
            "radar",
            RegistryEntry::new("radar_macro", "$(find radar_description)/urdf/radar.xacro", "radar_link"),
        );
        reg
    }

    /// Register or replace the rule for `tag`.
    pub fn insert(&mut self, tag: impl Into<String>, entry: RegistryEntry) {
        self.entries.insert(tag.into(), entry);
    }

    /// Pure lookup; fails on tags with no registered rule.
    pub fn resolve(&self, tag: &str) -> Result<&RegistryEntry> {
        self.entries
            .get(tag)
            .ok_or_else(|| RegistryError::UnknownType(tag.to_string()))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
