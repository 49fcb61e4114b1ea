use std::sync::Arc;

use tracing::debug;

use crate::document::{Document, Node};
use crate::error::Error;

/// A guest-communication channel: the guest-facing logical name paired
/// with the host-side Unix socket path backing it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChannelInfo {
    pub name: String,
    pub path: String,
}

fn channels(doc: &Document) -> impl Iterator<Item = ChannelInfo> + '_ {
    doc.find_first_opt(doc.root(), "devices")
        .into_iter()
        .flat_map(move |devices| doc.find_all(devices, "channel"))
        .filter_map(move |channel| {
            let name = doc.find_attr(channel, "target", "name");
            let path = doc.find_attr(channel, "source", "path");
            if name.is_empty() || path.is_empty() {
                None
            } else {
                Some(ChannelInfo {
                    name: name.to_string(),
                    path: path.to_string(),
                })
            }
        })
}

fn device_elements<'a>(doc: &'a Document, tag: &'a str) -> impl Iterator<Item = Node> + 'a {
    doc.find_first_opt(doc.root(), "devices")
        .into_iter()
        .flat_map(move |devices| doc.find_all(devices, tag))
}

fn text_of(doc: &Document, tag: &str) -> Option<String> {
    doc.find_first_opt(doc.root(), tag)
        .map(|node| doc.text(node).to_string())
}

fn memory_size_mib(doc: &Document) -> Option<u64> {
    let memory = doc.find_first_opt(doc.root(), "memory")?;
    doc.text(memory)
        .trim()
        .parse::<u64>()
        .ok()
        .map(|kib| kib / 1024)
}

/// Read-only view over a parsed domain description.
///
/// The source text is kept verbatim and never re-parsed; use
/// [`MutableDomainDescriptor`] when the backing text may be replaced
/// between reads.
pub struct DomainDescriptor {
    xml: String,
    snapshot: Arc<Document>,
}

impl DomainDescriptor {
    pub fn new(xml: &str) -> Result<Self, Error> {
        Ok(DomainDescriptor {
            xml: xml.to_string(),
            snapshot: Arc::new(Document::parse(xml)?),
        })
    }

    /// The domain description text this descriptor was built from.
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// The parsed document snapshot.
    pub fn document(&self) -> &Document {
        &self.snapshot
    }

    /// One entry per channel device backed by a host-side Unix socket,
    /// pairing the guest-facing channel name with the socket path.
    /// Empty when the domain has no devices section or no such
    /// channels.
    pub fn all_channels(&self) -> impl Iterator<Item = ChannelInfo> + '_ {
        channels(&self.snapshot)
    }

    /// Device elements with the given tag.
    pub fn device_elements<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = Node> + 'a {
        device_elements(&self.snapshot, tag)
    }

    /// The domain's name, when present.
    pub fn vm_name(&self) -> Option<String> {
        text_of(&self.snapshot, "name")
    }

    /// The domain's UUID, when present.
    pub fn vm_id(&self) -> Option<String> {
        text_of(&self.snapshot, "uuid")
    }

    /// The domain memory size in MiB (the `<memory>` element is in
    /// KiB), when present and numeric.
    pub fn memory_size_mib(&self) -> Option<u64> {
        memory_size_mib(&self.snapshot)
    }
}

/// Read-only view whose backing text may be replaced wholesale by its
/// owner between reads.
///
/// The current parsed document is held behind a single reference that
/// [`MutableDomainDescriptor::set_xml`] replaces atomically; readers
/// always observe a complete snapshot, never a partially updated one.
pub struct MutableDomainDescriptor {
    snapshot: Arc<Document>,
}

impl MutableDomainDescriptor {
    pub fn new(xml: &str) -> Result<Self, Error> {
        Ok(MutableDomainDescriptor {
            snapshot: Arc::new(Document::parse(xml)?),
        })
    }

    /// Replace the backing text.
    ///
    /// The new text is parsed first and the snapshot reference swapped
    /// only on success; a failed parse leaves the previous snapshot
    /// readable.
    pub fn set_xml(&mut self, xml: &str) -> Result<(), Error> {
        let document = Document::parse(xml)?;
        self.snapshot = Arc::new(document);
        debug!("domain descriptor snapshot replaced");
        Ok(())
    }

    /// The current document snapshot.
    pub fn document(&self) -> &Document {
        &self.snapshot
    }

    /// The current snapshot serialized back to text.
    pub fn xml(&self) -> Result<String, Error> {
        self.snapshot.to_xml(self.snapshot.root())
    }

    /// See [`DomainDescriptor::all_channels`]; reads reflect the most
    /// recently assigned text.
    pub fn all_channels(&self) -> impl Iterator<Item = ChannelInfo> + '_ {
        channels(&self.snapshot)
    }

    /// Device elements with the given tag.
    pub fn device_elements<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = Node> + 'a {
        device_elements(&self.snapshot, tag)
    }

    /// The domain's name, when present.
    pub fn vm_name(&self) -> Option<String> {
        text_of(&self.snapshot, "name")
    }

    /// The domain's UUID, when present.
    pub fn vm_id(&self) -> Option<String> {
        text_of(&self.snapshot, "uuid")
    }

    /// The domain memory size in MiB, when present and numeric.
    pub fn memory_size_mib(&self) -> Option<u64> {
        memory_size_mib(&self.snapshot)
    }
}

/// Whether the domain description text carries a channel device with
/// the given guest-facing name.
pub fn has_channel(dom_xml: &str, name: &str) -> Result<bool, Error> {
    let doc = Document::parse(dom_xml)?;
    let devices = match doc.find_first_opt(doc.root(), "devices") {
        Some(devices) => devices,
        None => return Ok(false),
    };
    let found = doc
        .find_all(devices, "channel")
        .any(|channel| doc.find_attr(channel, "target", "name") == name);
    Ok(found)
}
