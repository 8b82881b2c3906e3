//! Construction of one document from a `doc` node.

use std::collections::HashMap;

use solr_node::Element;

use crate::bind::bind_field;
use crate::error::ResponseError;
use crate::mapping::FieldBinding;
use crate::response::ParseOptions;
use crate::trace;

/// Precomputed wire-name lookup over a mapping's bindings.
///
/// Built once per parse call so documents do not rescan the binding list for
/// every field. When two bindings share a wire name, the first one is kept.
pub(crate) struct FieldIndex<'m, T> {
    by_wire_name: HashMap<&'m str, &'m FieldBinding<T>>,
}

impl<'m, T> FieldIndex<'m, T> {
    pub fn new(fields: &'m [FieldBinding<T>]) -> Self {
        let mut by_wire_name = HashMap::with_capacity(fields.len());
        for binding in fields {
            by_wire_name.entry(binding.wire_name()).or_insert(binding);
        }
        Self { by_wire_name }
    }

    pub fn get(&self, wire_name: &str) -> Option<&'m FieldBinding<T>> {
        self.by_wire_name.get(wire_name).copied()
    }
}

/// Build a fresh document from `node`, binding its named children in wire order.
///
/// Children with no binding are skipped unless `options` denies unknown
/// fields. The first binding error aborts the document.
pub(crate) fn build_document<T: Default>(
    node: &Element,
    index: &FieldIndex<'_, T>,
    options: &ParseOptions,
) -> Result<T, ResponseError> {
    trace!(fields = node.child_elements().count(), "building document");
    let mut doc = T::default();
    for field in node.child_elements() {
        let wire_name = field.name().unwrap_or(&field.tag);
        let Some(binding) = field.name().and_then(|name| index.get(name)) else {
            if options.deny_unknown_fields {
                return Err(ResponseError::UnknownField {
                    wire_name: wire_name.to_owned(),
                });
            }
            trace!(wire_name, "skipping unmapped field");
            continue;
        };
        bind_field(&mut doc, binding, field)?;
    }
    trace!("built document");
    Ok(doc)
}
