use crate::names::{NameId, NamespaceId, PrefixId};

/// Element value stored in the arena.
///
/// Tag name and namespace are fixed at creation. Attributes keep
/// insertion order; `text` is the element's direct text content, the
/// empty string meaning absent.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) name: NameId,
    /// Namespace declarations introduced on this element, in
    /// declaration order.
    pub(crate) declarations: Vec<(PrefixId, NamespaceId)>,
    pub(crate) attributes: Vec<(NameId, String)>,
    pub(crate) text: String,
}

impl Element {
    pub(crate) fn new(name: NameId) -> Self {
        Element {
            name,
            declarations: Vec::new(),
            attributes: Vec::new(),
            text: String::new(),
        }
    }

    /// Set an attribute value, updating in place when the name is
    /// already present so serialization order stays stable.
    pub(crate) fn set_attribute(&mut self, name: NameId, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(id, _)| *id == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    pub(crate) fn declare(&mut self, prefix: PrefixId, namespace: NamespaceId) {
        if !self.declarations.iter().any(|(p, _)| *p == prefix) {
            self.declarations.push((prefix, namespace));
        }
    }
}
