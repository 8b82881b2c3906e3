//! Population of one document field from its wire node.

use solr_node::Element;

use crate::error::{BindCause, BindError, CoercionError, CollectionError};
use crate::mapping::{FieldBinding, Setter};
use crate::trace;

/// What happened to a field after binding succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
    Assigned,
    /// A nullable field with empty text.
    LeftUnset,
}

/// Assign `node`'s value to the field described by `binding`.
///
/// `arr` nodes go to collection reconstruction; everything else goes through
/// the scalar setter, which applies the date rule for date kinds and
/// [`FromWire`](crate::FromWire) otherwise.
pub(crate) fn bind_field<T>(
    doc: &mut T,
    binding: &FieldBinding<T>,
    node: &Element,
) -> Result<Bound, BindError> {
    assign(doc, binding, node).map_err(|cause| BindError {
        field: binding.field(),
        wire_name: binding.wire_name().to_owned(),
        cause,
    })
}

fn assign<T>(doc: &mut T, binding: &FieldBinding<T>, node: &Element) -> Result<Bound, BindCause> {
    let kind = binding.kind();

    if node.is_array() {
        return match binding.setter() {
            Setter::Collection(set) => {
                set(doc, node)?;
                Ok(Bound::Assigned)
            }
            Setter::Scalar(_) => Err(CollectionError::Unsupported {
                declared: kind.type_name(),
            }
            .into()),
        };
    }

    let text = node.text_content();
    if kind.is_nullable() && text.is_empty() {
        trace!(field = binding.field(), "empty nullable field left unset");
        return Ok(Bound::LeftUnset);
    }

    match binding.setter() {
        Setter::Scalar(set) => {
            set(doc, &text)?;
            Ok(Bound::Assigned)
        }
        Setter::Collection(_) => Err(CoercionError::malformed(kind.type_name(), &text).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;
    use crate::coerce::Value;
    use crate::error::CoercionErrorKind;
    use chrono::{DateTime, Utc};
    use solr_node::Kind;

    #[derive(Debug, Default, PartialEq)]
    struct Item {
        count: i32,
        weight: Option<f32>,
        created: Option<DateTime<Utc>>,
        expires: Option<DateTime<Utc>>,
        sizes: Box<[u32]>,
        misc: Vec<Value>,
    }

    #[test]
    fn scalar_is_coerced_and_assigned() {
        let binding = FieldBinding::scalar("count", "cnt", |d: &mut Item, v| d.count = v);
        let mut item = Item::default();
        let bound = bind_field(&mut item, &binding, &Element::leaf(Kind::Int, "cnt", "12"));
        assert_eq!(bound, Ok(Bound::Assigned));
        assert_eq!(item.count, 12);
    }

    #[test]
    fn empty_nullable_is_left_unset() {
        let binding = FieldBinding::nullable("weight", "w", |d: &mut Item, v| d.weight = Some(v));
        let mut item = Item::default();

        let bound = bind_field(&mut item, &binding, &Element::named(Kind::Float, "w"));
        assert_eq!(bound, Ok(Bound::LeftUnset));
        assert_eq!(item.weight, None);

        bind_field(&mut item, &binding, &Element::leaf(Kind::Float, "w", "2.5")).unwrap();
        assert_eq!(item.weight, Some(2.5));
    }

    #[test]
    fn empty_required_scalar_fails_with_field_names() {
        let binding = FieldBinding::scalar("count", "cnt", |d: &mut Item, v| d.count = v);
        let mut item = Item::default();
        let err = bind_field(&mut item, &binding, &Element::named(Kind::Int, "cnt")).unwrap_err();
        assert_eq!(err.field, "count");
        assert_eq!(err.wire_name, "cnt");
        assert!(matches!(err.cause, BindCause::Coercion(_)));
        assert_eq!(err.to_string(), "cannot bind wire field `cnt` to field `count`");
    }

    #[test]
    fn required_date_rejects_empty_text() {
        let binding =
            FieldBinding::date("created", "created", |d: &mut Item, v| d.created = Some(v));
        let mut item = Item::default();
        let err = bind_field(&mut item, &binding, &Element::named(Kind::Date, "created"))
            .unwrap_err();
        let BindCause::Coercion(cause) = err.cause else {
            panic!("expected coercion failure");
        };
        assert_eq!(cause.kind(), &CoercionErrorKind::DateFormat);
    }

    #[test]
    fn nullable_date_is_parsed_when_present() {
        let binding = FieldBinding::nullable_date("expires", "exp", |d: &mut Item, v| {
            d.expires = Some(v)
        });
        let mut item = Item::default();

        bind_field(&mut item, &binding, &Element::named(Kind::Date, "exp")).unwrap();
        assert_eq!(item.expires, None);

        bind_field(
            &mut item,
            &binding,
            &Element::leaf(Kind::Date, "exp", "2009-01-15T14:30:05.123Z"),
        )
        .unwrap();
        assert_eq!(
            item.expires.map(|d| d.timestamp_millis()),
            Some(1_232_029_805_123)
        );

        let err = bind_field(
            &mut item,
            &binding,
            &Element::leaf(Kind::Date, "exp", "2009-01-15"),
        )
        .unwrap_err();
        assert_eq!(err.wire_name, "exp");
    }

    #[test]
    fn arr_node_goes_to_collection_reconstruction() {
        let binding = FieldBinding::array("sizes", "sizes", |d: &mut Item, v| d.sizes = v);
        let node = Element::named(Kind::Arr, "sizes")
            .with_child(Element::item(Kind::Int, "1"))
            .with_child(Element::item(Kind::Int, "2"));
        let mut item = Item::default();
        bind_field(&mut item, &binding, &node).unwrap();
        assert_eq!(&*item.sizes, &[1, 2]);
    }

    #[test]
    fn failing_element_leaves_collection_untouched() {
        let binding = FieldBinding::untyped("misc", "misc", |d: &mut Item, v| d.misc = v);
        let mut item = Item {
            misc: vec![Value::Bool(true)],
            ..Item::default()
        };
        let node = Element::named(Kind::Arr, "misc")
            .with_child(Element::item(Kind::Int, "3"))
            .with_child(Element::item(Kind::Int, "three"));
        let err = bind_field(&mut item, &binding, &node).unwrap_err();
        assert!(matches!(
            err.cause,
            BindCause::Collection(CollectionError::Element { index: 1, .. })
        ));
        assert_eq!(item.misc, [Value::Bool(true)]);
    }

    #[test]
    fn arr_node_on_scalar_field_is_unsupported() {
        let binding = FieldBinding::scalar("count", "cnt", |d: &mut Item, v| d.count = v);
        let node = Element::named(Kind::Arr, "cnt").with_child(Element::item(Kind::Int, "1"));
        let err = bind_field(&mut Item::default(), &binding, &node).unwrap_err();
        assert_eq!(
            err.cause,
            BindCause::Collection(CollectionError::Unsupported { declared: "i32" })
        );
    }

    #[test]
    fn leaf_node_on_collection_field_fails() {
        let binding = FieldBinding::untyped("misc", "misc", |d: &mut Item, v| d.misc = v);
        let err = bind_field(
            &mut Item::default(),
            &binding,
            &Element::leaf(Kind::Str, "misc", "x"),
        )
        .unwrap_err();
        assert!(matches!(err.cause, BindCause::Coercion(_)));
    }
}
