//! Reconstruction of collection fields from `arr` nodes.
//!
//! Every strategy collects into a fresh value and hands it back only when all
//! elements converted, so a failing element never leaves a field half filled.

use std::any::type_name;

use solr_node::Element;

use crate::coerce::{FromWire, Value};
use crate::error::{CoercionError, CollectionError};

/// How a collection field is rebuilt, decided when the binding is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionShape {
    /// `Box<[E]>`, sized to the number of `arr` children.
    FixedArray,
    /// Any `FromIterator<E>` target; each element converted to `E`.
    Typed,
    /// `Vec<Value>`; each element converted by its own wire tag.
    Untyped,
}

fn element_error(declared: &'static str) -> impl Fn((usize, CoercionError)) -> CollectionError {
    move |(index, source)| CollectionError::Element {
        declared,
        index,
        source,
    }
}

/// Rebuild a fixed-size array, assigning elements positionally.
pub fn rebuild_array<E: FromWire>(node: &Element) -> Result<Box<[E]>, CollectionError> {
    let items: Vec<&Element> = node.child_elements().collect();
    let mut slots = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let value =
            E::from_wire(&item.text_content()).map_err(|source| CollectionError::Element {
                declared: type_name::<Box<[E]>>(),
                index,
                source,
            })?;
        slots.push(value);
    }
    Ok(slots.into_boxed_slice())
}

/// Rebuild a collection whose element type is known statically.
pub fn rebuild_typed<E, C>(node: &Element) -> Result<C, CollectionError>
where
    E: FromWire,
    C: FromIterator<E>,
{
    node.child_elements()
        .enumerate()
        .map(|(index, item)| E::from_wire(&item.text_content()).map_err(|e| (index, e)))
        .collect::<Result<C, _>>()
        .map_err(element_error(type_name::<C>()))
}

/// Rebuild an untyped collection, letting each element's tag pick its type.
pub fn rebuild_untyped(node: &Element) -> Result<Vec<Value>, CollectionError> {
    node.child_elements()
        .enumerate()
        .map(|(index, item)| Value::from_element(item).map_err(|e| (index, e)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(element_error(type_name::<Vec<Value>>()))
}
