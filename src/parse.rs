use ahash::HashMap;
use indextree::Arena;
use xmlparser::{ElementEnd, Token, Tokenizer};

use crate::document::{Document, Node};
use crate::entity::unescape;
use crate::error::Error;
use crate::names::{
    Name, NameLookup, NamespaceId, NamespaceLookup, PrefixId, PrefixLookup, XML_NAMESPACE,
};
use crate::value::Element;

struct Pending<'input> {
    prefix: &'input str,
    local: &'input str,
    declarations: Vec<(PrefixId, NamespaceId)>,
    attributes: Vec<(&'input str, &'input str, String)>,
}

struct OpenElement<'input> {
    node: Node,
    prefix: &'input str,
    local: &'input str,
}

struct DocumentBuilder<'input> {
    arena: Arena<Element>,
    names: NameLookup,
    namespaces: NamespaceLookup,
    prefixes: PrefixLookup,
    declared: HashMap<PrefixId, NamespaceId>,
    no_namespace: NamespaceId,
    empty_prefix: PrefixId,
    xml_namespace: NamespaceId,
    xml_prefix: PrefixId,
    stack: Vec<OpenElement<'input>>,
    /// One namespace-declaration frame per open element, kept in sync
    /// with `stack` (plus a transient frame while finishing an empty
    /// element).
    scopes: Vec<Vec<(PrefixId, NamespaceId)>>,
    pending: Option<Pending<'input>>,
    root: Option<Node>,
}

fn qname(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

impl<'input> DocumentBuilder<'input> {
    fn new() -> Self {
        let mut namespaces = NamespaceLookup::new();
        let mut prefixes = PrefixLookup::new();
        let no_namespace = namespaces.intern(String::new());
        let empty_prefix = prefixes.intern(String::new());
        let xml_namespace = namespaces.intern(XML_NAMESPACE.to_string());
        let xml_prefix = prefixes.intern("xml".to_string());
        DocumentBuilder {
            arena: Arena::new(),
            names: NameLookup::new(),
            namespaces,
            prefixes,
            declared: HashMap::default(),
            no_namespace,
            empty_prefix,
            xml_namespace,
            xml_prefix,
            stack: Vec::new(),
            scopes: Vec::new(),
            pending: None,
            root: None,
        }
    }

    fn start_element(&mut self, prefix: &'input str, local: &'input str) {
        self.pending = Some(Pending {
            prefix,
            local,
            declarations: Vec::new(),
            attributes: Vec::new(),
        });
    }

    fn attribute(
        &mut self,
        prefix: &'input str,
        local: &'input str,
        value: &'input str,
    ) -> Result<(), Error> {
        let value = unescape(value.into())?;
        let pending = match self.pending.as_mut() {
            Some(pending) => pending,
            // xmlparser only emits attributes inside a start tag
            None => return Ok(()),
        };
        if prefix == "xmlns" || (prefix.is_empty() && local == "xmlns") {
            let prefix_id = if prefix.is_empty() {
                self.prefixes.intern(String::new())
            } else {
                self.prefixes.intern(local.to_string())
            };
            let namespace_id = self.namespaces.intern(value.into_owned());
            pending.declarations.push((prefix_id, namespace_id));
            self.declared.entry(prefix_id).or_insert(namespace_id);
        } else {
            pending.attributes.push((prefix, local, value.into_owned()));
        }
        Ok(())
    }

    fn resolve_prefix(&self, prefix: &str) -> Option<NamespaceId> {
        let prefix_id = self.prefixes.lookup(&prefix.to_string())?;
        for frame in self.scopes.iter().rev() {
            if let Some((_, namespace)) = frame.iter().rev().find(|(p, _)| *p == prefix_id) {
                return Some(*namespace);
            }
        }
        // the xml prefix is bound implicitly
        if prefix_id == self.xml_prefix {
            return Some(self.xml_namespace);
        }
        None
    }

    fn finish_element(&mut self, open: bool) -> Result<(), Error> {
        let pending = match self.pending.take() {
            Some(pending) => pending,
            None => return Ok(()),
        };
        self.scopes.push(pending.declarations.clone());

        let namespace = if pending.prefix.is_empty() {
            // unprefixed elements pick up an in-scope default namespace
            self.resolve_prefix("").unwrap_or(self.no_namespace)
        } else {
            self.resolve_prefix(pending.prefix)
                .ok_or_else(|| Error::UnknownPrefix(pending.prefix.to_string()))?
        };
        let name = self.names.intern(Name::new(pending.local, namespace));
        let mut element = Element::new(name);
        element.declarations = pending.declarations;
        for (prefix, local, value) in pending.attributes {
            // unprefixed attributes are never in the default namespace
            let namespace = if prefix.is_empty() {
                self.no_namespace
            } else {
                self.resolve_prefix(prefix)
                    .ok_or_else(|| Error::UnknownPrefix(prefix.to_string()))?
            };
            let attr = self.names.intern(Name::new(local, namespace));
            element.set_attribute(attr, value);
        }

        let node = Node::new(self.arena.new_node(element));
        match self.stack.last() {
            Some(parent) => {
                parent.node.get().checked_append(node.get(), &mut self.arena)?;
            }
            None => {
                if self.root.is_some() {
                    return Err(Error::TrailingContent);
                }
                self.root = Some(node);
            }
        }
        if open {
            self.stack.push(OpenElement {
                node,
                prefix: pending.prefix,
                local: pending.local,
            });
        } else {
            self.scopes.pop();
        }
        Ok(())
    }

    fn close_element(&mut self, prefix: &str, local: &str) -> Result<(), Error> {
        match self.stack.pop() {
            Some(open) => {
                if open.prefix != prefix || open.local != local {
                    return Err(Error::InvalidCloseTag {
                        expected: qname(open.prefix, open.local),
                        actual: qname(prefix, local),
                    });
                }
                self.scopes.pop();
                Ok(())
            }
            None => Err(Error::UnexpectedEndTag(qname(prefix, local))),
        }
    }

    fn text(&mut self, text: &str, raw: bool) -> Result<(), Error> {
        match self.stack.last() {
            Some(open) => {
                let node = open.node.get();
                // whitespace after the element already has children is
                // indentation between siblings, not content
                if !raw && text.trim().is_empty() && self.arena[node].first_child().is_some() {
                    return Ok(());
                }
                let text = if raw {
                    text.into()
                } else {
                    unescape(text.into())?
                };
                self.arena[node].get_mut().text.push_str(&text);
                Ok(())
            }
            None => {
                if text.trim().is_empty() {
                    Ok(())
                } else {
                    Err(Error::TrailingContent)
                }
            }
        }
    }

    fn finish(mut self) -> Result<Document, Error> {
        if let Some(open) = self.stack.pop() {
            return Err(Error::UnclosedElement(qname(open.prefix, open.local)));
        }
        let root = self.root.ok_or(Error::NoDocumentElement)?;
        Ok(Document::from_parts(
            self.arena,
            self.names,
            self.namespaces,
            self.prefixes,
            self.declared,
            self.no_namespace,
            self.empty_prefix,
            self.xml_namespace,
            self.xml_prefix,
            root,
        ))
    }
}

impl Document {
    /// Parse a domain-description document from text.
    ///
    /// Comments, processing instructions and the XML declaration are
    /// skipped; element text is collected as the element's direct text
    /// content.
    ///
    /// ```rust
    /// use domxml::Document;
    ///
    /// let doc = Document::parse("<domain type='kvm'><uuid>b5eb02</uuid></domain>")?;
    /// assert_eq!(doc.find_attr(doc.root(), "domain", "type"), "kvm");
    /// assert!(Document::parse("<domain>").is_err());
    /// # Ok::<(), domxml::Error>(())
    /// ```
    pub fn parse(text: &str) -> Result<Document, Error> {
        let mut builder = DocumentBuilder::new();

        for token in Tokenizer::from(text) {
            match token? {
                Token::ElementStart { prefix, local, .. } => {
                    builder.start_element(prefix.as_str(), local.as_str());
                }
                Token::Attribute {
                    prefix,
                    local,
                    value,
                    ..
                } => {
                    builder.attribute(prefix.as_str(), local.as_str(), value.as_str())?;
                }
                Token::ElementEnd { end, .. } => match end {
                    ElementEnd::Open => builder.finish_element(true)?,
                    ElementEnd::Empty => builder.finish_element(false)?,
                    ElementEnd::Close(prefix, local) => {
                        builder.close_element(prefix.as_str(), local.as_str())?;
                    }
                },
                Token::Text { text } => {
                    builder.text(text.as_str(), false)?;
                }
                Token::Cdata { text, .. } => {
                    builder.text(text.as_str(), true)?;
                }
                _ => {}
            }
        }

        builder.finish()
    }
}
