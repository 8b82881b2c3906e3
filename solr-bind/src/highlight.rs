//! Highlighting parsing and attachment to already built documents.

use std::collections::HashMap;

use solr_node::{Element, Kind};

use crate::error::ResponseError;
use crate::mapping::UniqueKey;
use crate::trace;

/// Highlighted snippets of one document, by wire field name.
pub type Snippets = HashMap<String, String>;

/// Placed between the fragments of a field highlighted more than once.
pub const SNIPPET_SEPARATOR: &str = " ... ";

/// Parse a `lst[name=highlighting]` block against `documents`.
///
/// Returns snippets keyed by document position. Each per-document block is
/// resolved through `unique_key`; a key that matches no document is an error.
pub(crate) fn parse_highlighting<T>(
    node: &Element,
    documents: &[T],
    unique_key: Option<&UniqueKey<T>>,
) -> Result<HashMap<usize, Snippets>, ResponseError> {
    let mut highlights = HashMap::new();
    let mut blocks = node.child_elements().peekable();
    if blocks.peek().is_none() {
        return Ok(highlights);
    }
    let unique_key = unique_key.ok_or(ResponseError::MissingUniqueKey)?;

    // Later documents with the same key replace earlier ones.
    let by_key: HashMap<String, usize> = documents
        .iter()
        .enumerate()
        .filter_map(|(position, doc)| Some((unique_key.key_of(doc)?, position)))
        .collect();
    trace!(keyed = by_key.len(), key_field = unique_key.field(), "indexed documents");

    for block in blocks {
        let key = block.name().ok_or_else(|| ResponseError::MissingAttribute {
            node: "response/lst[name=highlighting]/lst".to_owned(),
            attribute: "name",
        })?;
        let position = *by_key
            .get(key)
            .ok_or_else(|| ResponseError::DanglingHighlight {
                key: key.to_owned(),
            })?;

        let snippets: &mut Snippets = highlights.entry(position).or_default();
        for field in block.child_elements() {
            if let Some(name) = field.name() {
                snippets.insert(name.to_owned(), snippet_text(field));
            }
        }
    }
    Ok(highlights)
}

/// Text of a highlighted field. An `arr` contributes the text of each leaf
/// fragment; text between the fragments is formatting and is dropped.
fn snippet_text(field: &Element) -> String {
    if field.kind().is_some_and(Kind::is_leaf) {
        return field.text_content();
    }
    field
        .child_elements()
        .map(Element::text_content)
        .collect::<Vec<_>>()
        .join(SNIPPET_SEPARATOR)
}
