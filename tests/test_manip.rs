use domxml::{Document, Error};

const DOC: &str = "<topelement>\
<hello lang=\"english\">hello</hello>\
<hello cyrillic=\"yes\" lang=\"русский\">здра́вствуйте</hello>\
<bye>good bye<hello lang=\"čeština\">dobrý den</hello></bye>\
<container><subelement /></container>\
<container><subelement>some content</subelement></container>\
<empty /></topelement>";

#[test]
fn append_child_element() {
    let mut doc = Document::parse(DOC).unwrap();
    let empty = doc.find_first(doc.root(), "empty").unwrap();
    let new = doc.new_element("new");
    doc.append_child(empty, Some(new), None).unwrap();
    assert!(doc.find_first_opt(doc.root(), "new").is_some());
    let empty = doc.find_first(doc.root(), "empty").unwrap();
    assert!(doc.find_first_opt(empty, "new").is_some());
}

#[test]
fn append_child_external() {
    let mut doc = Document::parse(DOC).unwrap();
    let empty = doc.find_first(doc.root(), "empty").unwrap();
    let external = Document::parse("<new />").unwrap();
    doc.append_child(empty, None, Some(&external)).unwrap();
    let empty = doc.find_first(doc.root(), "empty").unwrap();
    assert!(doc.find_first_opt(empty, "new").is_some());
}

#[test]
fn append_child_no_source() {
    let mut doc = Document::parse(DOC).unwrap();
    let empty = doc.find_first(doc.root(), "empty").unwrap();
    let before = doc.to_xml(doc.root()).unwrap();
    assert!(matches!(
        doc.append_child(empty, None, None),
        Err(Error::InvalidArguments(_))
    ));
    assert_eq!(doc.to_xml(doc.root()).unwrap(), before);
}

#[test]
fn append_child_two_sources() {
    let mut doc = Document::parse(DOC).unwrap();
    let empty = doc.find_first(doc.root(), "empty").unwrap();
    let new = doc.new_element("new");
    let external = Document::parse("<new />").unwrap();
    let before = doc.to_xml(doc.root()).unwrap();
    assert!(matches!(
        doc.append_child(empty, Some(new), Some(&external)),
        Err(Error::InvalidArguments(_))
    ));
    assert_eq!(doc.to_xml(doc.root()).unwrap(), before);
}

#[test]
fn append_keeps_sibling_order() {
    let mut doc = Document::parse(DOC).unwrap();
    let before: Vec<String> = doc
        .children(doc.root())
        .map(|child| doc.tag(child).to_string())
        .collect();
    let new = doc.new_element("new");
    doc.append_child(doc.root(), Some(new), None).unwrap();
    let after: Vec<String> = doc
        .children(doc.root())
        .map(|child| doc.tag(child).to_string())
        .collect();
    assert_eq!(after[..after.len() - 1], before[..]);
    assert_eq!(after.last().map(String::as_str), Some("new"));
}

#[test]
fn remove_child() {
    let mut doc = Document::parse(DOC).unwrap();
    let top = doc.root();
    let hellos: Vec<_> = doc.find_all(top, "hello").collect();
    doc.remove_child(top, hellos[1]).unwrap();
    let updated: Vec<_> = doc.find_all(top, "hello").collect();
    assert_eq!(updated, vec![hellos[0], hellos[2]]);
}

#[test]
fn remove_child_not_a_child() {
    let mut doc = Document::parse(DOC).unwrap();
    let bye = doc.find_first(doc.root(), "bye").unwrap();
    let nested = doc.find_first(bye, "hello").unwrap();
    assert!(matches!(
        doc.remove_child(doc.root(), nested),
        Err(Error::NotFound(_))
    ));
    // still attached
    assert_eq!(doc.find_all(doc.root(), "hello").count(), 3);
}

#[test]
fn replace_first_child() {
    let expected = "<?xml version='1.0' encoding='utf-8'?>
<topelement>
    <hello lang=\"english\">hello</hello>
    <hello cyrillic=\"yes\" lang=\"русский\">здра́вствуйте</hello>
    <bye>good bye<hello lang=\"čeština\">dobrý den</hello>
    </bye>
    <container>
        <foo>
            <bar>baz</bar>
        </foo>
    </container>
    <container>
        <subelement>some content</subelement>
    </container>
    <empty />
</topelement>
";
    let mut doc = Document::parse(DOC).unwrap();
    let fragment = Document::parse("<foo><bar>baz</bar></foo>").unwrap();
    let new_child = doc.import_root(&fragment).unwrap();
    let container = doc.find_first(doc.root(), "container").unwrap();
    doc.replace_first_child(container, new_child).unwrap();
    assert_eq!(doc.to_pretty_xml(doc.root()).unwrap(), expected);
}

#[test]
fn replace_first_child_keeps_later_children() {
    let mut doc = Document::parse("<devices><a /><b /><c /></devices>").unwrap();
    let new_child = doc.new_element("d");
    doc.replace_first_child(doc.root(), new_child).unwrap();
    let tags: Vec<String> = doc
        .children(doc.root())
        .map(|child| doc.tag(child).to_string())
        .collect();
    assert_eq!(tags, ["d", "b", "c"]);
}

#[test]
fn replace_first_child_without_children() {
    let mut doc = Document::parse(DOC).unwrap();
    let empty = doc.find_first(doc.root(), "empty").unwrap();
    let new_child = doc.new_element("new");
    assert!(matches!(
        doc.replace_first_child(empty, new_child),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn import_root_copies_namespaces() {
    let mut doc = Document::parse("<domain />").unwrap();
    let fragment = Document::parse(
        "<metadata xmlns:ovirt-tune=\"http://ovirt.org/vm/tune/1.0\"><ovirt-tune:qos /></metadata>",
    )
    .unwrap();
    let imported = doc.import_root(&fragment).unwrap();
    doc.append_child(doc.root(), Some(imported), None).unwrap();
    assert_eq!(
        doc.to_xml(doc.root()).unwrap(),
        "<domain><metadata xmlns:ovirt-tune=\"http://ovirt.org/vm/tune/1.0\"><ovirt-tune:qos /></metadata></domain>",
    );
}
