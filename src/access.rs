use crate::document::{Document, Node};
use crate::error::Error;

/// ## Read-only access
///
/// Queries never mutate the tree they traverse; every iterator is a
/// fresh, finite walk in document order.
impl Document {
    /// The element's local tag name, with any namespace stripped.
    ///
    /// ```rust
    /// use domxml::Document;
    ///
    /// let doc = Document::parse("<domain><uuid>x</uuid></domain>")?;
    /// assert_eq!(doc.tag(doc.root()), "domain");
    /// # Ok::<(), domxml::Error>(())
    /// ```
    pub fn tag(&self, node: Node) -> &str {
        &self.name_of(node).local
    }

    /// The element's direct text content, or the empty string.
    pub fn text(&self, node: Node) -> &str {
        &self.element(node).text
    }

    /// Get parent node.
    ///
    /// Returns [`None`] for the root element and for unattached
    /// elements.
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.arena[node.get()].parent().map(Node::new)
    }

    /// The element's attributes as (name, value) pairs, in the order
    /// they were set or parsed. Empty when the element has none.
    pub fn attributes(&self, node: Node) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.element(node)
            .attributes
            .iter()
            .map(|(name, value)| (self.names.resolve(*name).local.as_str(), value.as_str()))
    }

    /// Look up an attribute by name.
    pub fn attr(&self, node: Node, name: &str) -> Option<&str> {
        self.element(node)
            .attributes
            .iter()
            .find(|(id, _)| self.names.resolve(*id).local == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterator over the immediate child elements of this node.
    pub fn children(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().children(&self.arena).map(Node::new)
    }

    /// Iterator over the immediate child elements with the given tag.
    pub fn children_named<'a>(
        &'a self,
        node: Node,
        tag: &'a str,
    ) -> impl Iterator<Item = Node> + 'a {
        self.children(node).filter(move |child| self.tag(*child) == tag)
    }

    /// Every element with the given local tag, in document order
    /// (depth-first), starting at and including `node` itself.
    ///
    /// Each call returns a fresh iterator.
    ///
    /// ```rust
    /// use domxml::Document;
    ///
    /// let doc = Document::parse("<devices><channel/><channel/></devices>")?;
    /// assert_eq!(doc.find_all(doc.root(), "channel").count(), 2);
    /// # Ok::<(), domxml::Error>(())
    /// ```
    pub fn find_all<'a>(&'a self, node: Node, tag: &'a str) -> impl Iterator<Item = Node> + 'a {
        node.get()
            .descendants(&self.arena)
            .map(Node::new)
            .filter(move |n| self.tag(*n) == tag)
    }

    /// The first element with the given tag, in document order.
    ///
    /// Fails with [`Error::NotFound`] when nothing matches; use
    /// [`Document::find_first_opt`] for a non-failing lookup.
    ///
    /// ```rust
    /// use domxml::{Document, Error};
    ///
    /// let doc = Document::parse("<domain><name>vm0</name></domain>")?;
    /// let name = doc.find_first(doc.root(), "name")?;
    /// assert_eq!(doc.text(name), "vm0");
    /// assert!(matches!(doc.find_first(doc.root(), "none"), Err(Error::NotFound(_))));
    /// # Ok::<(), domxml::Error>(())
    /// ```
    pub fn find_first(&self, node: Node, tag: &str) -> Result<Node, Error> {
        self.find_first_opt(node, tag)
            .ok_or_else(|| Error::NotFound(tag.to_string()))
    }

    /// The first element with the given tag, or [`None`].
    pub fn find_first_opt(&self, node: Node, tag: &str) -> Option<Node> {
        self.find_all(node, tag).next()
    }

    /// The value of `attribute` on the first element matching `tag`.
    ///
    /// Returns the empty string, never an error, when no element
    /// matches or the attribute is missing on the match.
    pub fn find_attr(&self, node: Node, tag: &str, attribute: &str) -> &str {
        self.find_first_opt(node, tag)
            .and_then(|found| self.attr(found, attribute))
            .unwrap_or("")
    }
}
