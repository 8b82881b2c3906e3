//! Assembly of a complete [`ResultSet`] from a response document.

use std::collections::HashMap;

use solr_node::{Element, Kind, Path, Segment};

use crate::coerce::FromWire;
use crate::document::{FieldIndex, build_document};
use crate::error::ResponseError;
use crate::facets::{FacetField, parse_facet_counts};
use crate::header::{ResponseHeader, parse_header};
use crate::highlight::{Snippets, parse_highlighting};
use crate::mapping::MappingManager;
use crate::trace;

/// Options for a [`ResponseParser`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fail on wire fields that have no binding instead of skipping them.
    pub deny_unknown_fields: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deny_unknown_fields(mut self, deny: bool) -> Self {
        self.deny_unknown_fields = deny;
        self
    }
}

/// The typed result of one response document.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet<T> {
    /// Total number of matches; may exceed `documents.len()` when paginated.
    pub num_found: u64,
    /// Offset of the first returned document.
    pub start: u64,
    pub max_score: Option<f32>,
    /// Documents in wire order.
    pub documents: Vec<T>,
    pub facet_queries: HashMap<String, u64>,
    /// Faceted fields in wire order.
    pub facet_fields: Vec<FacetField>,
    pub header: Option<ResponseHeader>,
    /// Snippets keyed by position in `documents`.
    pub highlights: HashMap<usize, Snippets>,
}

impl<T> ResultSet<T> {
    pub fn facet_query(&self, query: &str) -> Option<u64> {
        self.facet_queries.get(query).copied()
    }

    pub fn facet_field(&self, name: &str) -> Option<&FacetField> {
        self.facet_fields.iter().find(|field| field.name == name)
    }

    /// Snippets for the document at `position`.
    pub fn highlighting(&self, position: usize) -> Option<&Snippets> {
        self.highlights.get(&position)
    }

    /// Highlighted documents with their snippets, in document order.
    pub fn highlighted(&self) -> impl Iterator<Item = (&T, &Snippets)> {
        self.documents
            .iter()
            .enumerate()
            .filter_map(|(position, doc)| Some((doc, self.highlights.get(&position)?)))
    }
}

/// Parses response documents for one mapping. Reusable across calls.
#[derive(Debug)]
pub struct ResponseParser<'m, M> {
    mapping: &'m M,
    options: ParseOptions,
}

impl<'m, M> ResponseParser<'m, M> {
    pub fn new(mapping: &'m M) -> Self {
        Self {
            mapping,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Read `input` as XML and parse it.
    pub fn parse_str<T>(&self, input: &str) -> Result<ResultSet<T>, ResponseError>
    where
        T: Default,
        M: MappingManager<T>,
    {
        let root = solr_node::from_str(input)?;
        self.parse(&root)
    }

    /// Parse an already read response tree.
    pub fn parse<T>(&self, root: &Element) -> Result<ResultSet<T>, ResponseError>
    where
        T: Default,
        M: MappingManager<T>,
    {
        if root.tag != "response" {
            return Err(ResponseError::MissingNode {
                path: "response".to_owned(),
            });
        }
        let result = root
            .select(&Path::from(Segment::tag("result")))
            .ok_or_else(|| ResponseError::MissingNode {
                path: "response/result".to_owned(),
            })?;

        let num_found = result_attr::<u64>(result, "numFound")?.ok_or_else(|| {
            ResponseError::MissingAttribute {
                node: "response/result".to_owned(),
                attribute: "numFound",
            }
        })?;
        let start = result_attr::<u64>(result, "start")?.unwrap_or(0);
        let max_score = result_attr::<f32>(result, "maxScore")?;

        let index = FieldIndex::new(self.mapping.fields());
        let documents = result
            .select_all(&Path::from(Segment::tag("doc")))
            .into_iter()
            .map(|doc| build_document::<T>(doc, &index, &self.options))
            .collect::<Result<Vec<_>, _>>()?;
        trace!(num_found, documents = documents.len(), "assembled documents");

        let mut set = ResultSet {
            num_found,
            start,
            max_score,
            documents,
            facet_queries: HashMap::new(),
            facet_fields: Vec::new(),
            header: None,
            highlights: HashMap::new(),
        };

        if let Some(facets) = root.select(&named_list("facet_counts")) {
            let counts = parse_facet_counts(facets)?;
            set.facet_queries = counts.queries;
            set.facet_fields = counts.fields;
        }

        if let Some(header) = root.select(&named_list("responseHeader")) {
            set.header = Some(parse_header(header)?);
        }

        // Needs the assembled documents to resolve keys.
        if let Some(highlighting) = root.select(&named_list("highlighting")) {
            set.highlights =
                parse_highlighting(highlighting, &set.documents, self.mapping.unique_key())?;
        }

        Ok(set)
    }
}

fn named_list(name: &str) -> Path {
    Path::from(Segment::named(Kind::Lst.tag(), name))
}

fn result_attr<V: FromWire>(result: &Element, name: &'static str) -> Result<Option<V>, ResponseError> {
    let Some(text) = result.get_attr(name) else {
        return Ok(None);
    };
    V::from_wire(text)
        .map(Some)
        .map_err(|source| ResponseError::InvalidValue {
            path: format!("response/result@{name}"),
            source,
        })
}
