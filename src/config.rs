use serde::Deserialize;

/// VM configuration as handed over by the management daemon, using its
/// camelCase key layout.
///
/// Consumed, never owned: identity fields describe the VM being
/// defined, [`CustomSettings`] drives the optional metadata sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VmConfig {
    pub vm_id: String,
    pub vm_name: String,
    pub smp: u16,
    pub max_v_cpus: u16,
    /// Memory size in MiB.
    pub mem_size: u64,
    /// Guaranteed memory size in MiB.
    pub mem_guaranteed_size: u64,
    pub custom: CustomSettings,
}

/// Optional per-VM settings.
///
/// The container section of the metadata is emitted only when both
/// `container_image` and `container_type` are non-empty; `volume_map`
/// is the compact `name:device,...` drive-mapping string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSettings {
    pub container_image: Option<String>,
    pub container_type: Option<String>,
    pub volume_map: Option<String>,
}
