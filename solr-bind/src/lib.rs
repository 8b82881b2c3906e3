//! Binds search engine XML responses to typed result objects.
//!
//! A response document is read into a [`solr_node::Element`] tree, then:
//!
//! - every `doc` under `result` becomes a fresh `T`, filled field by field
//!   through a [`MappingManager`] (usually a [`DocumentMapping`]);
//! - `numFound`, `start` and `maxScore` come from the `result` attributes;
//! - `facet_counts`, `responseHeader` and `highlighting` are parsed when
//!   present, highlighting last since it refers back to documents by key.
//!
//! ```
//! use solr_bind::DocumentMapping;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Book {
//!     id: i32,
//!     title: String,
//! }
//!
//! let mapping = DocumentMapping::<Book>::new()
//!     .scalar("id", "id", |b, v| b.id = v)
//!     .scalar("title", "title", |b, v| b.title = v);
//!
//! let xml = r#"<response><result name="response" numFound="1" start="0"><doc><int name="id">7</int><str name="title">Dune</str></doc></result></response>"#;
//! let results = solr_bind::from_str(xml, &mapping).unwrap();
//!
//! assert_eq!(results.num_found, 1);
//! assert_eq!(results.documents, [Book { id: 7, title: "Dune".into() }]);
//! ```

mod bind;
mod coerce;
mod collection;
mod document;
mod error;
mod facets;
mod header;
mod highlight;
mod mapping;
mod response;

pub use coerce::{DATE_FORMAT, FromWire, Value, parse_date};
pub use collection::CollectionShape;
pub use error::{
    BindCause, BindError, CoercionError, CoercionErrorKind, CollectionError, ResponseError,
};
pub use facets::{FacetCount, FacetField};
pub use header::ResponseHeader;
pub use highlight::{SNIPPET_SEPARATOR, Snippets};
pub use mapping::{DocumentMapping, FieldBinding, FieldKind, MappingManager, UniqueKey};
pub use response::{ParseOptions, ResponseParser, ResultSet};

use solr_node::Element;

#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($tt:tt)*) => { tracing::trace!($($tt)*) };
}
#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}
pub(crate) use trace;

/// Parse a response document with default options.
pub fn from_str<T, M>(input: &str, mapping: &M) -> Result<ResultSet<T>, ResponseError>
where
    T: Default,
    M: MappingManager<T>,
{
    ResponseParser::new(mapping).parse_str(input)
}

/// Parse an already read response tree with default options.
pub fn from_element<T, M>(root: &Element, mapping: &M) -> Result<ResultSet<T>, ResponseError>
where
    T: Default,
    M: MappingManager<T>,
{
    ResponseParser::new(mapping).parse(root)
}
