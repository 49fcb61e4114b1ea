use crate::document::{Document, Node};
use crate::error::Error;
use crate::names::Name;
use crate::value::Element;

/// ## Mutation
///
/// Every operation either fully succeeds or fails without touching the
/// tree; sibling order is never disturbed beyond the stated node.
impl Document {
    /// Append a child as the new last child of `parent`.
    ///
    /// Exactly one child source must be given: `element` attaches a
    /// node of this document, `external_child` deep-copies the root
    /// subtree of another document first. Anything else fails with
    /// [`Error::InvalidArguments`].
    ///
    /// ```rust
    /// use domxml::Document;
    ///
    /// let mut doc = Document::parse("<domain><devices/></domain>")?;
    /// let devices = doc.find_first(doc.root(), "devices")?;
    /// let fragment = Document::parse("<controller type=\"virtio-serial\" />")?;
    /// doc.append_child(devices, None, Some(&fragment))?;
    /// assert!(doc.find_first_opt(doc.root(), "controller").is_some());
    /// # Ok::<(), domxml::Error>(())
    /// ```
    pub fn append_child(
        &mut self,
        parent: Node,
        element: Option<Node>,
        external_child: Option<&Document>,
    ) -> Result<(), Error> {
        let child = match (element, external_child) {
            (Some(node), None) => node,
            (None, Some(other)) => self.import_root(other)?,
            (None, None) => {
                return Err(Error::InvalidArguments(
                    "append_child requires a child source",
                ));
            }
            (Some(_), Some(_)) => {
                return Err(Error::InvalidArguments(
                    "append_child accepts only one child source",
                ));
            }
        };
        parent.get().checked_append(child.get(), &mut self.arena)?;
        Ok(())
    }

    /// Remove `child` from `parent`'s children.
    ///
    /// Fails with [`Error::NotFound`] unless `child` currently is a
    /// child of `parent`. The detached subtree stays valid as an
    /// unattached fragment.
    pub fn remove_child(&mut self, parent: Node, child: Node) -> Result<(), Error> {
        if self.parent(child) != Some(parent) {
            return Err(Error::NotFound(self.tag(child).to_string()));
        }
        child.get().detach(&mut self.arena);
        Ok(())
    }

    /// Replace `parent`'s first child with `new_child`, keeping the
    /// position and all other children untouched.
    ///
    /// Fails with [`Error::NotFound`] when `parent` has no children.
    pub fn replace_first_child(&mut self, parent: Node, new_child: Node) -> Result<(), Error> {
        let first = self
            .children(parent)
            .next()
            .ok_or_else(|| Error::NotFound(format!("first child of <{}>", self.tag(parent))))?;
        first
            .get()
            .checked_insert_before(new_child.get(), &mut self.arena)?;
        first.get().detach(&mut self.arena);
        Ok(())
    }

    /// Deep-copy another document's tree into this document, returning
    /// the copied root as an unattached node.
    ///
    /// Names and namespaces are re-interned into this document's
    /// tables; namespace declarations stay on the elements that carry
    /// them.
    pub fn import_root(&mut self, other: &Document) -> Result<Node, Error> {
        self.import_subtree(other, other.root())
    }

    fn import_subtree(&mut self, other: &Document, node: Node) -> Result<Node, Error> {
        let source = other.element(node);
        let source_name = other.names.resolve(source.name);

        let namespace = self
            .namespaces
            .intern(other.namespaces.resolve(source_name.namespace).clone());
        let name = self
            .names
            .intern(Name::new(source_name.local.clone(), namespace));
        let mut element = Element::new(name);
        element.text = source.text.clone();
        for (prefix, uri) in &source.declarations {
            let prefix = self
                .prefixes
                .intern(other.prefixes.resolve(*prefix).clone());
            let uri = self.namespaces.intern(other.namespaces.resolve(*uri).clone());
            element.declare(prefix, uri);
            self.declared.entry(prefix).or_insert(uri);
        }
        for (attr, value) in &source.attributes {
            let attr_name = other.names.resolve(*attr);
            let attr_namespace = self
                .namespaces
                .intern(other.namespaces.resolve(attr_name.namespace).clone());
            let attr = self
                .names
                .intern(Name::new(attr_name.local.clone(), attr_namespace));
            element.set_attribute(attr, value.clone());
        }

        let copy = Node::new(self.arena.new_node(element));
        for child in other.children(node).collect::<Vec<_>>() {
            let child_copy = self.import_subtree(other, child)?;
            copy.get()
                .checked_append(child_copy.get(), &mut self.arena)?;
        }
        Ok(copy)
    }
}
