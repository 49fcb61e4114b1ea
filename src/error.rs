use thiserror::Error;

/// Errors raised by document parsing, queries, mutation and
/// serialization.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed document text.
    #[error("malformed document: {0}")]
    Parser(#[from] xmlparser::Error),
    /// An entity reference without a terminating `;`.
    #[error("unclosed entity: &{0}")]
    UnclosedEntity(String),
    /// An entity reference that is neither predefined nor a character
    /// reference.
    #[error("invalid entity: &{0};")]
    InvalidEntity(String),
    /// A close tag that does not match the open element.
    #[error("close tag </{actual}> does not match <{expected}>")]
    InvalidCloseTag { expected: String, actual: String },
    /// A close tag with no element open.
    #[error("unexpected close tag </{0}>")]
    UnexpectedEndTag(String),
    /// Input ended while an element was still open.
    #[error("unclosed element <{0}>")]
    UnclosedElement(String),
    /// Input contained no document element.
    #[error("no document element")]
    NoDocumentElement,
    /// Content found after the document element was closed.
    #[error("content after document element")]
    TrailingContent,
    /// An element or attribute used a prefix with no in-scope
    /// declaration.
    #[error("unknown namespace prefix: {0}")]
    UnknownPrefix(String),
    /// A prefix was registered twice with different namespace URIs.
    #[error("prefix {0} is already bound to a different namespace")]
    DuplicatePrefix(String),
    /// A name in a namespace was serialized with no prefix declared in
    /// scope.
    #[error("no prefix declared for namespace: {0}")]
    MissingPrefix(String),
    /// A required query or mutation target does not exist.
    #[error("element not found: {0}")]
    NotFound(String),
    /// A call violated its argument contract.
    #[error("invalid arguments: {0}")]
    InvalidArguments(&'static str),
    /// A malformed drive-mapping entry.
    #[error("invalid drive mapping: {0}")]
    Validation(String),
    /// A structural tree operation failed.
    #[error("tree operation failed: {0}")]
    Tree(#[from] indextree::NodeError),
    #[error("format error: {0}")]
    Fmt(#[from] std::fmt::Error),
}
