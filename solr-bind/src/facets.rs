//! Facet count parsing.

use std::collections::HashMap;

use solr_node::{Element, Kind, Path, Segment};

use crate::coerce::FromWire;
use crate::error::ResponseError;
use crate::trace;

/// One bucket of a field facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCount {
    /// The bucket value. Empty for the missing-value bucket, which has no name.
    pub value: String,
    pub count: u64,
}

/// The buckets of one faceted field, in the order the server sorted them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetField {
    pub name: String,
    pub values: Vec<FacetCount>,
}

impl FacetField {
    /// Count of the bucket with the given value.
    pub fn count(&self, value: &str) -> Option<u64> {
        self.values
            .iter()
            .find(|bucket| bucket.value == value)
            .map(|bucket| bucket.count)
    }
}

#[derive(Debug, Default)]
pub(crate) struct FacetCounts {
    pub queries: HashMap<String, u64>,
    pub fields: Vec<FacetField>,
}

/// Parse a `lst[name=facet_counts]` block. Each sub-block is optional.
pub(crate) fn parse_facet_counts(node: &Element) -> Result<FacetCounts, ResponseError> {
    let mut counts = FacetCounts::default();

    if let Some(queries) = node.select(&sub_block("facet_queries")) {
        for query in queries.child_elements() {
            let name = query.name().unwrap_or_default();
            let count = parse_count(query, "facet_queries", name)?;
            counts.queries.insert(name.to_owned(), count);
        }
        trace!(queries = counts.queries.len(), "parsed facet queries");
    }

    if let Some(fields) = node.select(&sub_block("facet_fields")) {
        for field in fields.child_elements() {
            let name = field.name().unwrap_or_default();
            let values = field
                .child_elements()
                .map(|bucket| {
                    let value = bucket.name().unwrap_or_default();
                    Ok(FacetCount {
                        value: value.to_owned(),
                        count: parse_count(bucket, name, value)?,
                    })
                })
                .collect::<Result<Vec<_>, ResponseError>>()?;
            counts.fields.push(FacetField {
                name: name.to_owned(),
                values,
            });
        }
        trace!(fields = counts.fields.len(), "parsed facet fields");
    }

    Ok(counts)
}

fn sub_block(name: &str) -> Path {
    Path::from(Segment::named(Kind::Lst.tag(), name))
}

fn parse_count(node: &Element, block: &str, name: &str) -> Result<u64, ResponseError> {
    u64::from_wire(&node.text_content()).map_err(|source| ResponseError::InvalidValue {
        path: format!("response/lst[name=facet_counts]/{block}/{name}"),
        source,
    })
}
