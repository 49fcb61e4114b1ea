use crate::idmap::{IdIndex, IdMap};

/// Namespace the `xml` prefix is implicitly bound to.
pub(crate) const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Id of an element or attribute name (local part + namespace).
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub(crate) struct NameId(u32);

/// Id of a namespace URI.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub(crate) struct NamespaceId(u32);

/// Id of a namespace prefix.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub(crate) struct PrefixId(u32);

impl IdIndex<NameId> for NameId {
    fn to_id(index: usize) -> NameId {
        NameId(index as u32)
    }

    fn from_id(id: NameId) -> usize {
        id.0 as usize
    }
}

impl IdIndex<NamespaceId> for NamespaceId {
    fn to_id(index: usize) -> NamespaceId {
        NamespaceId(index as u32)
    }

    fn from_id(id: NamespaceId) -> usize {
        id.0 as usize
    }
}

impl IdIndex<PrefixId> for PrefixId {
    fn to_id(index: usize) -> PrefixId {
        PrefixId(index as u32)
    }

    fn from_id(id: PrefixId) -> usize {
        id.0 as usize
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub(crate) struct Name {
    pub(crate) local: String,
    pub(crate) namespace: NamespaceId,
}

impl Name {
    pub(crate) fn new(local: impl Into<String>, namespace: NamespaceId) -> Self {
        Name {
            local: local.into(),
            namespace,
        }
    }
}

pub(crate) type NameLookup = IdMap<NameId, Name>;
pub(crate) type NamespaceLookup = IdMap<NamespaceId, String>;
pub(crate) type PrefixLookup = IdMap<PrefixId, String>;
