use std::collections::HashMap;

use rstest::rstest;

use domxml::Document;

const DOC: &str = "<topelement>\
<hello lang=\"english\">hello</hello>\
<hello cyrillic=\"yes\" lang=\"русский\">здра́вствуйте</hello>\
<bye>good bye<hello lang=\"čeština\">dobrý den</hello></bye>\
<container><subelement /></container>\
<container><subelement>some content</subelement></container>\
<empty /></topelement>";

#[rstest]
#[case("topelement", 1)]
#[case("hello", 3)]
#[case("bye", 1)]
#[case("subelement", 2)]
#[case("none", 0)]
fn find_all_counts(#[case] tag: &str, #[case] number: usize) {
    let doc = Document::parse(DOC).unwrap();
    let matches: Vec<_> = doc.find_all(doc.root(), tag).collect();
    assert_eq!(matches.len(), number);
    assert!(matches.iter().all(|node| doc.tag(*node) == tag));
}

#[test]
fn find_all_from_inner_element() {
    let doc = Document::parse(DOC).unwrap();
    let bye = doc.find_first(doc.root(), "bye").unwrap();
    assert_eq!(doc.find_all(bye, "hello").count(), 1);
}

#[test]
fn find_all_is_repeatable() {
    let doc = Document::parse(DOC).unwrap();
    assert_eq!(doc.find_all(doc.root(), "hello").count(), 3);
    assert_eq!(doc.find_all(doc.root(), "hello").count(), 3);
}

#[test]
fn find_first_not_found() {
    let doc = Document::parse(DOC).unwrap();
    assert!(matches!(
        doc.find_first(doc.root(), "none"),
        Err(domxml::Error::NotFound(_))
    ));
    assert_eq!(doc.find_first_opt(doc.root(), "none"), None);
}

#[test]
fn find_first_includes_the_start_node() {
    // a same-tagged descendant nested inside a same-tagged descendant:
    // the first match in document order is the start node itself
    let xml = "<topelement>\
        <subelement id=\"1\"><subelement id=\"2\" /></subelement>\
        </topelement>";
    let doc = Document::parse(xml).unwrap();
    let outer = doc.find_first(doc.root(), "subelement").unwrap();
    assert_eq!(doc.attr(outer, "id"), Some("1"));
    let again = doc.find_first(outer, "subelement").unwrap();
    assert_eq!(again, outer);
}

#[rstest]
#[case("hello", "lang", "english")]
#[case("hello", "none", "")]
#[case("none", "lang", "")]
fn find_attr_cases(#[case] tag: &str, #[case] attribute: &str, #[case] result: &str) {
    let doc = Document::parse(DOC).unwrap();
    assert_eq!(doc.find_attr(doc.root(), tag, attribute), result);
}

#[test]
fn attributes_of_second_hello() {
    let doc = Document::parse(DOC).unwrap();
    let hello = doc.find_all(doc.root(), "hello").nth(1).unwrap();
    let attributes: HashMap<&str, &str> = doc.attributes(hello).collect();
    assert_eq!(
        attributes,
        HashMap::from([("cyrillic", "yes"), ("lang", "русский")])
    );
}

#[rstest]
#[case("topelement", 0)]
#[case("empty", 0)]
fn attributes_empty(#[case] tag: &str, #[case] number: usize) {
    let doc = Document::parse(DOC).unwrap();
    let element = doc.find_first(doc.root(), tag).unwrap();
    assert_eq!(doc.attributes(element).count(), number);
}

#[rstest]
#[case("hello", "hello")]
#[case("empty", "")]
fn text_content(#[case] tag: &str, #[case] result: &str) {
    let doc = Document::parse(DOC).unwrap();
    let element = doc.find_first(doc.root(), tag).unwrap();
    assert_eq!(doc.text(element), result);
}

#[rstest]
#[case("topelement", Some("hello"), 2)]
#[case("bye", Some("hello"), 1)]
#[case("empty", Some("hello"), 0)]
#[case("topelement", Some("none"), 0)]
#[case("topelement", None, 6)]
fn children_counts(#[case] start: &str, #[case] tag: Option<&str>, #[case] number: usize) {
    let doc = Document::parse(DOC).unwrap();
    let element = doc.find_first(doc.root(), start).unwrap();
    let count = match tag {
        Some(tag) => doc.children_named(element, tag).count(),
        None => doc.children(element).count(),
    };
    assert_eq!(count, number);
}

#[test]
fn parent_links() {
    let doc = Document::parse(DOC).unwrap();
    let bye = doc.find_first(doc.root(), "bye").unwrap();
    let nested = doc.find_first(bye, "hello").unwrap();
    assert_eq!(doc.parent(nested), Some(bye));
    assert_eq!(doc.parent(doc.root()), None);
}

#[test]
fn queries_do_not_mutate() {
    let doc = Document::parse(DOC).unwrap();
    let before = doc.to_xml(doc.root()).unwrap();
    let _ = doc.find_all(doc.root(), "hello").count();
    let _ = doc.find_attr(doc.root(), "hello", "lang");
    let _ = doc.find_first_opt(doc.root(), "none");
    assert_eq!(doc.to_xml(doc.root()).unwrap(), before);
}
