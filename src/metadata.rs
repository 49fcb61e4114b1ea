use std::collections::BTreeMap;

use tracing::debug;

use crate::config::{CustomSettings, VmConfig};
use crate::document::{Document, Node};
use crate::error::Error;

/// QoS metadata namespace.
pub const TUNE_URI: &str = "http://ovirt.org/vm/tune/1.0";
/// VM identity metadata namespace.
pub const VM_URI: &str = "http://ovirt.org/vm/1.0";
/// Container metadata namespace.
pub const CONTAINERS_URI: &str = "http://ovirt.org/vm/containers/1.0";
/// Drive-map metadata namespace.
pub const DRIVEMAP_URI: &str = "http://ovirt.org/vm/containers/drivemap/1.0";

const TUNE_PREFIX: &str = "ovirt-tune";
const VM_PREFIX: &str = "ovirt-vm";
const CONTAINERS_PREFIX: &str = "ovirt-ct";
const DRIVEMAP_PREFIX: &str = "ovirt-dm";

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Build the `<metadata>` child of `domain` from `config`.
///
/// The section always carries the QoS and VM-identity elements, in
/// that order. A container element with `image` and `runtime` children
/// follows only when both container image and container type are
/// non-empty in the custom settings, and a drive-map element with one
/// child per mapped volume only when the volume map parses to a
/// non-empty mapping.
///
/// Nothing is attached to `domain` unless the whole section builds.
///
/// ```rust
/// use domxml::{append_metadata, Document, VmConfig};
///
/// let mut doc = Document::new("domain");
/// let root = doc.root();
/// append_metadata(&mut doc, root, &VmConfig::default())?;
/// let metadata = doc.find_first(root, "metadata")?;
/// assert_eq!(doc.children(metadata).count(), 2);
/// # Ok::<(), domxml::Error>(())
/// ```
pub fn append_metadata(doc: &mut Document, domain: Node, config: &VmConfig) -> Result<(), Error> {
    let mapping = parse_drive_mapping(&config.custom)?;
    debug!(vm = %config.vm_name, "appending domain metadata");

    let metadata = doc.new_element("metadata");

    let qos = doc.new_element_ns("qos", TUNE_PREFIX, TUNE_URI)?;
    doc.append_child(metadata, Some(qos), None)?;

    let vm = doc.new_element_ns("vm", VM_PREFIX, VM_URI)?;
    doc.append_child(metadata, Some(vm), None)?;

    // container section is all or nothing: image and type together
    let image = non_empty(config.custom.container_image.as_deref());
    let runtime = non_empty(config.custom.container_type.as_deref());
    if let (Some(image), Some(runtime)) = (image, runtime) {
        let container = doc.new_element_ns("container", CONTAINERS_PREFIX, CONTAINERS_URI)?;
        let image_element = doc.new_element_ns("image", CONTAINERS_PREFIX, CONTAINERS_URI)?;
        doc.set_text(image_element, image);
        doc.append_child(container, Some(image_element), None)?;
        let runtime_element = doc.new_element_ns("runtime", CONTAINERS_PREFIX, CONTAINERS_URI)?;
        doc.set_text(runtime_element, runtime);
        doc.append_child(container, Some(runtime_element), None)?;
        doc.append_child(metadata, Some(container), None)?;
    }

    if !mapping.is_empty() {
        let drivemap = doc.new_element_ns("drivemap", DRIVEMAP_PREFIX, DRIVEMAP_URI)?;
        for (volume, device) in &mapping {
            let entry = doc.new_element_ns(volume, DRIVEMAP_PREFIX, DRIVEMAP_URI)?;
            doc.set_text(entry, device);
            doc.append_child(drivemap, Some(entry), None)?;
        }
        doc.append_child(metadata, Some(drivemap), None)?;
    }

    doc.append_child(domain, Some(metadata), None)?;
    Ok(())
}

/// Parse the compact drive-mapping string
/// (`volume1:device1,volume2:device2,...`) from the custom settings.
///
/// An absent or blank volume map yields an empty mapping. Whitespace
/// around entries and around the `:` is tolerated. Every entry must
/// contain exactly one `:` separating two non-empty parts, otherwise
/// [`Error::Validation`] is raised.
///
/// ```rust
/// use domxml::{parse_drive_mapping, CustomSettings};
///
/// let custom = CustomSettings {
///     volume_map: Some("data1:vda, data2:vdb".to_string()),
///     ..CustomSettings::default()
/// };
/// let mapping = parse_drive_mapping(&custom)?;
/// assert_eq!(mapping["data1"], "vda");
/// assert_eq!(mapping["data2"], "vdb");
/// # Ok::<(), domxml::Error>(())
/// ```
pub fn parse_drive_mapping(custom: &CustomSettings) -> Result<BTreeMap<String, String>, Error> {
    let raw = match custom.volume_map.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(BTreeMap::new()),
    };
    let mut mapping = BTreeMap::new();
    for entry in raw.split(',') {
        let mut parts = entry.split(':');
        let (volume, device) = match (parts.next(), parts.next(), parts.next()) {
            (Some(volume), Some(device), None) => (volume.trim(), device.trim()),
            _ => {
                return Err(Error::Validation(format!(
                    "entry {:?} is not volume:device",
                    entry.trim()
                )));
            }
        };
        if volume.is_empty() || device.is_empty() {
            return Err(Error::Validation(format!(
                "entry {:?} is not volume:device",
                entry.trim()
            )));
        }
        mapping.insert(volume.to_string(), device.to_string());
    }
    Ok(mapping)
}
