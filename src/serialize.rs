use std::fmt::Write;

use indextree::NodeEdge;

use crate::document::{Document, Node};
use crate::entity::{escape_attribute, escape_text};
use crate::error::Error;
use crate::names::{NameId, NamespaceId, PrefixId};

/// In-scope namespace bindings during serialization, one frame per
/// open element. Each frame is the merged effective binding list, in
/// declaration order, inner declarations shadowing outer ones.
struct PrefixScope<'a> {
    doc: &'a Document,
    stack: Vec<Vec<(PrefixId, NamespaceId)>>,
}

impl<'a> PrefixScope<'a> {
    fn new(doc: &'a Document) -> Self {
        let mut scope = PrefixScope {
            doc,
            stack: Vec::new(),
        };
        scope.push(&[(doc.xml_prefix, doc.xml_namespace)]);
        scope
    }

    fn push(&mut self, declarations: &[(PrefixId, NamespaceId)]) {
        let mut bindings = self.stack.last().cloned().unwrap_or_default();
        for (prefix, namespace) in declarations {
            bindings.retain(|(bound, _)| bound != prefix);
            bindings.push((*prefix, *namespace));
        }
        self.stack.push(bindings);
    }

    fn pop(&mut self) {
        self.stack.pop();
    }

    fn bindings(&self) -> &[(PrefixId, NamespaceId)] {
        self.stack.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Qualified name for an element. The empty prefix is preferred
    /// when the namespace is the in-scope default.
    fn fullname(&self, name: NameId) -> Result<String, Error> {
        let name = self.doc.names.resolve(name);
        if name.namespace == self.doc.no_namespace {
            return Ok(name.local.clone());
        }
        let empty = self
            .bindings()
            .iter()
            .any(|(p, ns)| *p == self.doc.empty_prefix && *ns == name.namespace);
        if empty {
            return Ok(name.local.clone());
        }
        match self.prefix_for(name.namespace, false) {
            Some(prefix) => Ok(format!(
                "{}:{}",
                self.doc.prefixes.resolve(prefix),
                name.local
            )),
            None => Err(Error::MissingPrefix(
                self.doc.namespaces.resolve(name.namespace).clone(),
            )),
        }
    }

    /// Qualified name for an attribute. Unprefixed attributes carry no
    /// namespace, so a non-empty prefix is required.
    fn fullname_attribute(&self, name: NameId) -> Result<String, Error> {
        let name = self.doc.names.resolve(name);
        if name.namespace == self.doc.no_namespace {
            return Ok(name.local.clone());
        }
        match self.prefix_for(name.namespace, true) {
            Some(prefix) => Ok(format!(
                "{}:{}",
                self.doc.prefixes.resolve(prefix),
                name.local
            )),
            None => Err(Error::MissingPrefix(
                self.doc.namespaces.resolve(name.namespace).clone(),
            )),
        }
    }

    fn prefix_for(&self, namespace: NamespaceId, skip_empty: bool) -> Option<PrefixId> {
        self.bindings()
            .iter()
            .find(|(prefix, bound)| {
                *bound == namespace && !(skip_empty && *prefix == self.doc.empty_prefix)
            })
            .map(|(prefix, _)| *prefix)
    }
}

/// ## Serialization
impl Document {
    /// Serialize `node` and its subtree to compact form.
    ///
    /// The output carries no XML declaration; empty elements are
    /// self-closed as `<tag />`; attributes keep their insertion
    /// order. Serializing a node below the root re-declares inherited
    /// namespace prefixes on the fragment's top element so the result
    /// stays well formed on its own.
    pub fn to_xml(&self, node: Node) -> Result<String, Error> {
        let mut out = String::new();
        let inherited = self.inherited_declarations(node);
        let mut scope = PrefixScope::new(self);
        scope.push(&inherited);

        for edge in node.get().traverse(&self.arena) {
            match edge {
                NodeEdge::Start(id) => {
                    let current = Node::new(id);
                    let element = self.element(current);
                    scope.push(&element.declarations);
                    write!(out, "<{}", scope.fullname(element.name)?)?;
                    if current == node {
                        for (prefix, namespace) in &inherited {
                            if !element.declarations.iter().any(|(p, _)| p == prefix) {
                                self.write_declaration(&mut out, *prefix, *namespace)?;
                            }
                        }
                    }
                    for (prefix, namespace) in &element.declarations {
                        self.write_declaration(&mut out, *prefix, *namespace)?;
                    }
                    for (attr, value) in &element.attributes {
                        write!(
                            out,
                            " {}=\"{}\"",
                            scope.fullname_attribute(*attr)?,
                            escape_attribute(value)
                        )?;
                    }
                    if self.is_empty_element(current) {
                        out.push_str(" />");
                    } else {
                        out.push('>');
                        out.push_str(&escape_text(&element.text));
                    }
                }
                NodeEdge::End(id) => {
                    let current = Node::new(id);
                    if !self.is_empty_element(current) {
                        let name = self.element(current).name;
                        write!(out, "</{}>", scope.fullname(name)?)?;
                    }
                    scope.pop();
                }
            }
        }
        Ok(out)
    }

    /// Serialize `node` and its subtree in pretty form.
    ///
    /// The output starts with `<?xml version='1.0' encoding='utf-8'?>`
    /// and a newline; elements indent four spaces per depth. Leaves
    /// are self-closed on one line, text-only elements stay on one
    /// line, and a mixed element's leading text keeps the first child
    /// on the opening line, with the close tag on its own line.
    ///
    /// ```rust
    /// use domxml::Document;
    ///
    /// let doc = Document::parse("<domain><vcpu>8</vcpu><devices/></domain>")?;
    /// assert_eq!(
    ///     doc.to_pretty_xml(doc.root())?,
    ///     "<?xml version='1.0' encoding='utf-8'?>\n\
    ///      <domain>\n    <vcpu>8</vcpu>\n    <devices />\n</domain>\n",
    /// );
    /// # Ok::<(), domxml::Error>(())
    /// ```
    pub fn to_pretty_xml(&self, node: Node) -> Result<String, Error> {
        let mut out = String::from("<?xml version='1.0' encoding='utf-8'?>\n");
        let inherited = self.inherited_declarations(node);
        let mut scope = PrefixScope::new(self);
        scope.push(&inherited);
        self.pretty_element(node, node, 0, false, &inherited, &mut scope, &mut out)?;
        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn pretty_element(
        &self,
        top: Node,
        node: Node,
        depth: usize,
        inline: bool,
        inherited: &[(PrefixId, NamespaceId)],
        scope: &mut PrefixScope,
        out: &mut String,
    ) -> Result<(), Error> {
        let element = self.element(node);
        scope.push(&element.declarations);
        if !inline {
            for _ in 0..depth {
                out.push_str("    ");
            }
        }
        write!(out, "<{}", scope.fullname(element.name)?)?;
        if node == top {
            for (prefix, namespace) in inherited {
                if !element.declarations.iter().any(|(p, _)| p == prefix) {
                    self.write_declaration(out, *prefix, *namespace)?;
                }
            }
        }
        for (prefix, namespace) in &element.declarations {
            self.write_declaration(out, *prefix, *namespace)?;
        }
        for (attr, value) in &element.attributes {
            write!(
                out,
                " {}=\"{}\"",
                scope.fullname_attribute(*attr)?,
                escape_attribute(value)
            )?;
        }

        let children: Vec<Node> = self.children(node).collect();
        if children.is_empty() {
            if element.text.is_empty() {
                out.push_str(" />\n");
            } else {
                out.push('>');
                out.push_str(&escape_text(&element.text));
                write!(out, "</{}>", scope.fullname(element.name)?)?;
                out.push('\n');
            }
        } else {
            out.push('>');
            // whitespace-only text is formatting noise, not content
            let leading_text = !element.text.trim().is_empty();
            if leading_text {
                out.push_str(&escape_text(&element.text));
            } else {
                out.push('\n');
            }
            for (index, child) in children.iter().enumerate() {
                let child_inline = index == 0 && leading_text;
                self.pretty_element(top, *child, depth + 1, child_inline, inherited, scope, out)?;
            }
            for _ in 0..depth {
                out.push_str("    ");
            }
            write!(out, "</{}>", scope.fullname(element.name)?)?;
            out.push('\n');
        }
        scope.pop();
        Ok(())
    }

    fn is_empty_element(&self, node: Node) -> bool {
        self.element(node).text.is_empty() && self.children(node).next().is_none()
    }

    fn write_declaration(
        &self,
        out: &mut String,
        prefix: PrefixId,
        namespace: NamespaceId,
    ) -> Result<(), Error> {
        let uri = escape_attribute(self.namespaces.resolve(namespace));
        if prefix == self.empty_prefix {
            write!(out, " xmlns=\"{}\"", uri)?;
        } else {
            write!(out, " xmlns:{}=\"{}\"", self.prefixes.resolve(prefix), uri)?;
        }
        Ok(())
    }

    /// Namespace declarations in scope on `node`'s ancestors,
    /// outermost first with shadowed prefixes dropped. Used to make
    /// fragment output self-contained.
    fn inherited_declarations(&self, node: Node) -> Vec<(PrefixId, NamespaceId)> {
        let mut frames: Vec<Vec<(PrefixId, NamespaceId)>> = node
            .get()
            .ancestors(&self.arena)
            .skip(1)
            .map(|id| self.element(Node::new(id)).declarations.clone())
            .collect();
        frames.reverse();
        let mut merged: Vec<(PrefixId, NamespaceId)> = Vec::new();
        for (prefix, namespace) in frames.into_iter().flatten() {
            merged.retain(|(bound, _)| *bound != prefix);
            merged.push((prefix, namespace));
        }
        merged
    }
}
