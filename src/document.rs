use ahash::HashMap;
use indextree::{Arena, NodeId};

use crate::error::Error;
use crate::names::{
    Name, NameId, NameLookup, NamespaceId, NamespaceLookup, PrefixId, PrefixLookup, XML_NAMESPACE,
};
use crate::value::Element;

/// A node in a document tree.
/// This is a lightweight handle and can be copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node(NodeId);

impl Node {
    #[inline]
    pub(crate) fn new(node_id: NodeId) -> Self {
        Node(node_id)
    }

    #[inline]
    pub(crate) fn get(&self) -> NodeId {
        self.0
    }
}

/// A domain-description document: a tree of elements plus the
/// document's own name, prefix and namespace tables.
///
/// Namespace bookkeeping is per instance; documents processed in the
/// same run never interfere with each other's prefixes.
///
/// A document is created by [`Document::parse`] or by constructing a
/// root element with [`Document::new`], mutated in place through the
/// mutation API, and serialized with [`Document::to_xml`] or
/// [`Document::to_pretty_xml`].
pub struct Document {
    pub(crate) arena: Arena<Element>,
    pub(crate) names: NameLookup,
    pub(crate) namespaces: NamespaceLookup,
    pub(crate) prefixes: PrefixLookup,
    /// Per-document prefix registry: first binding wins, conflicting
    /// builder re-registration is rejected.
    pub(crate) declared: HashMap<PrefixId, NamespaceId>,
    pub(crate) no_namespace: NamespaceId,
    pub(crate) empty_prefix: PrefixId,
    pub(crate) xml_namespace: NamespaceId,
    pub(crate) xml_prefix: PrefixId,
    root: Node,
}

impl Document {
    /// Create a document consisting of a single root element.
    ///
    /// ```rust
    /// use domxml::Document;
    ///
    /// let mut doc = Document::new("domain");
    /// doc.set_attribute(doc.root(), "type", "kvm");
    /// assert_eq!(doc.to_xml(doc.root())?, r#"<domain type="kvm" />"#);
    /// # Ok::<(), domxml::Error>(())
    /// ```
    pub fn new(tag: &str) -> Document {
        let mut names = NameLookup::new();
        let mut namespaces = NamespaceLookup::new();
        let mut prefixes = PrefixLookup::new();
        let no_namespace = namespaces.intern(String::new());
        let empty_prefix = prefixes.intern(String::new());
        let xml_namespace = namespaces.intern(XML_NAMESPACE.to_string());
        let xml_prefix = prefixes.intern("xml".to_string());
        let name = names.intern(Name::new(tag, no_namespace));
        let mut arena = Arena::new();
        let root = Node::new(arena.new_node(Element::new(name)));
        Document {
            arena,
            names,
            namespaces,
            prefixes,
            declared: HashMap::default(),
            no_namespace,
            empty_prefix,
            xml_namespace,
            xml_prefix,
            root,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        arena: Arena<Element>,
        names: NameLookup,
        namespaces: NamespaceLookup,
        prefixes: PrefixLookup,
        declared: HashMap<PrefixId, NamespaceId>,
        no_namespace: NamespaceId,
        empty_prefix: PrefixId,
        xml_namespace: NamespaceId,
        xml_prefix: PrefixId,
        root: Node,
    ) -> Document {
        Document {
            arena,
            names,
            namespaces,
            prefixes,
            declared,
            no_namespace,
            empty_prefix,
            xml_namespace,
            xml_prefix,
            root,
        }
    }

    /// The document's root element.
    pub fn root(&self) -> Node {
        self.root
    }

    /// Create a new, unattached element.
    ///
    /// Attach it with [`Document::append_child`].
    pub fn new_element(&mut self, tag: &str) -> Node {
        let name = self.names.intern(Name::new(tag, self.no_namespace));
        Node::new(self.arena.new_node(Element::new(name)))
    }

    /// Create a new, unattached element in a namespace.
    ///
    /// The first element to introduce a prefix carries its
    /// `xmlns:prefix` declaration; later elements created with the same
    /// (prefix, uri) pair rely on that declaration being in scope.
    /// Registering a prefix against a different URI fails.
    ///
    /// ```rust
    /// use domxml::Document;
    ///
    /// let mut doc = Document::new("domain");
    /// let qos = doc.new_element_ns("qos", "ovirt-tune", "http://ovirt.org/vm/tune/1.0")?;
    /// doc.append_child(doc.root(), Some(qos), None)?;
    /// assert_eq!(
    ///     doc.to_xml(doc.root())?,
    ///     r#"<domain><ovirt-tune:qos xmlns:ovirt-tune="http://ovirt.org/vm/tune/1.0" /></domain>"#,
    /// );
    /// # Ok::<(), domxml::Error>(())
    /// ```
    pub fn new_element_ns(&mut self, tag: &str, prefix: &str, uri: &str) -> Result<Node, Error> {
        let prefix_id = self.prefixes.intern(prefix.to_string());
        let namespace_id = self.namespaces.intern(uri.to_string());
        let name = self.names.intern(Name::new(tag, namespace_id));
        let mut element = Element::new(name);
        match self.declared.get(&prefix_id) {
            Some(bound) if *bound != namespace_id => {
                return Err(Error::DuplicatePrefix(prefix.to_string()));
            }
            Some(_) => {}
            None => {
                self.declared.insert(prefix_id, namespace_id);
                element.declare(prefix_id, namespace_id);
            }
        }
        Ok(Node::new(self.arena.new_node(element)))
    }

    /// Set an attribute on an element, replacing any existing value.
    pub fn set_attribute(&mut self, node: Node, name: &str, value: &str) {
        let name = self.names.intern(Name::new(name, self.no_namespace));
        self.element_mut(node).set_attribute(name, value);
    }

    /// Set an element's direct text content.
    pub fn set_text(&mut self, node: Node, text: &str) {
        self.element_mut(node).text = text.to_string();
    }

    #[inline]
    pub(crate) fn element(&self, node: Node) -> &Element {
        self.arena[node.get()].get()
    }

    #[inline]
    pub(crate) fn element_mut(&mut self, node: Node) -> &mut Element {
        self.arena[node.get()].get_mut()
    }

    pub(crate) fn name_of(&self, node: Node) -> &Name {
        self.names.resolve(self.element(node).name)
    }
}
