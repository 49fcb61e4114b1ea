#![forbid(unsafe_code)]

//! Tree manipulation for hypervisor domain descriptions.
//!
//! A [`Document`] is a namespace-aware XML tree with per-document
//! namespace bookkeeping, read-only queries, in-place mutation and a
//! deterministic pretty printer. [`DomainDescriptor`] gives a read-only
//! view over the guest-communication channels of a parsed domain
//! description, and [`append_metadata`] injects the vendor-namespaced
//! metadata section derived from a [`VmConfig`].

mod access;
mod config;
mod descriptor;
mod document;
mod entity;
mod error;
mod idmap;
mod manipulation;
mod metadata;
mod names;
mod parse;
mod serialize;
mod value;

pub use config::{CustomSettings, VmConfig};
pub use descriptor::{has_channel, ChannelInfo, DomainDescriptor, MutableDomainDescriptor};
pub use document::{Document, Node};
pub use error::Error;
pub use metadata::{
    append_metadata, parse_drive_mapping, CONTAINERS_URI, DRIVEMAP_URI, TUNE_URI, VM_URI,
};
