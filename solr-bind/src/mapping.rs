//! Statically compiled binding tables between wire fields and document fields.
//!
//! A [`DocumentMapping`] is built once per document type and then only read.
//! Each [`FieldBinding`] pairs a wire field name with a typed setter, and its
//! [`FieldKind`] records the declared shape so the binder never has to inspect
//! types while parsing.

use std::any::type_name;
use std::fmt;

use chrono::{DateTime, Utc};
use solr_node::Element;

use crate::coerce::{FromWire, Value, parse_date};
use crate::collection::{CollectionShape, rebuild_array, rebuild_typed, rebuild_untyped};
use crate::error::{CoercionError, CollectionError};

/// Declared shape of a bound document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Plain scalar; empty text must still convert.
    Scalar { type_name: &'static str },
    /// Optional scalar; empty text leaves the field unset.
    Nullable { type_name: &'static str },
    /// Required date-time.
    Date,
    /// Optional date-time; empty text leaves the field unset.
    NullableDate,
    /// A collection rebuilt from an `arr` node.
    Collection {
        shape: CollectionShape,
        type_name: &'static str,
    },
}

impl FieldKind {
    /// Name of the declared Rust type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Scalar { type_name }
            | FieldKind::Nullable { type_name }
            | FieldKind::Collection { type_name, .. } => type_name,
            FieldKind::Date | FieldKind::NullableDate => type_name::<DateTime<Utc>>(),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, FieldKind::Nullable { .. } | FieldKind::NullableDate)
    }
}

type ScalarSetter<T> = Box<dyn Fn(&mut T, &str) -> Result<(), CoercionError> + Send + Sync>;
type CollectionSetter<T> = Box<dyn Fn(&mut T, &Element) -> Result<(), CollectionError> + Send + Sync>;

pub(crate) enum Setter<T> {
    Scalar(ScalarSetter<T>),
    Collection(CollectionSetter<T>),
}

/// Association between one document field and one wire field name.
pub struct FieldBinding<T> {
    field: &'static str,
    wire_name: String,
    kind: FieldKind,
    setter: Setter<T>,
}

impl<T> FieldBinding<T> {
    fn scalar_with(
        field: &'static str,
        wire_name: impl Into<String>,
        kind: FieldKind,
        setter: ScalarSetter<T>,
    ) -> Self {
        Self {
            field,
            wire_name: wire_name.into(),
            kind,
            setter: Setter::Scalar(setter),
        }
    }

    fn collection_with(
        field: &'static str,
        wire_name: impl Into<String>,
        shape: CollectionShape,
        type_name: &'static str,
        setter: CollectionSetter<T>,
    ) -> Self {
        Self {
            field,
            wire_name: wire_name.into(),
            kind: FieldKind::Collection { shape, type_name },
            setter: Setter::Collection(setter),
        }
    }

    /// A plain scalar field.
    pub fn scalar<V: FromWire>(
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        let kind = FieldKind::Scalar {
            type_name: type_name::<V>(),
        };
        Self::scalar_with(
            field,
            wire_name,
            kind,
            Box::new(move |doc: &mut T, text: &str| {
                set(doc, V::from_wire(text)?);
                Ok(())
            }),
        )
    }

    /// An optional scalar field. `set` is only called for non-empty text.
    pub fn nullable<V: FromWire>(
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        let kind = FieldKind::Nullable {
            type_name: type_name::<V>(),
        };
        Self::scalar_with(
            field,
            wire_name,
            kind,
            Box::new(move |doc: &mut T, text: &str| {
                set(doc, V::from_wire(text)?);
                Ok(())
            }),
        )
    }

    /// A required date-time field.
    pub fn date(
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, DateTime<Utc>) + Send + Sync + 'static,
    ) -> Self {
        Self::scalar_with(
            field,
            wire_name,
            FieldKind::Date,
            Box::new(move |doc: &mut T, text: &str| {
                set(doc, parse_date(text)?);
                Ok(())
            }),
        )
    }

    /// An optional date-time field. `set` is only called for non-empty text.
    pub fn nullable_date(
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, DateTime<Utc>) + Send + Sync + 'static,
    ) -> Self {
        Self::scalar_with(
            field,
            wire_name,
            FieldKind::NullableDate,
            Box::new(move |doc: &mut T, text: &str| {
                set(doc, parse_date(text)?);
                Ok(())
            }),
        )
    }

    /// A fixed-size array field, sized by the wire data.
    pub fn array<E: FromWire>(
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, Box<[E]>) + Send + Sync + 'static,
    ) -> Self {
        Self::collection_with(
            field,
            wire_name,
            CollectionShape::FixedArray,
            type_name::<Box<[E]>>(),
            Box::new(move |doc: &mut T, node: &Element| {
                set(doc, rebuild_array(node)?);
                Ok(())
            }),
        )
    }

    /// A collection field whose element type is known statically
    /// (`Vec<E>`, `VecDeque<E>`, `BTreeSet<E>`, `HashSet<E>`, ...).
    pub fn collection<C>(
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, C) + Send + Sync + 'static,
    ) -> Self
    where
        C: IntoIterator + FromIterator<<C as IntoIterator>::Item>,
        C::Item: FromWire,
    {
        Self::collection_with(
            field,
            wire_name,
            CollectionShape::Typed,
            type_name::<C>(),
            Box::new(move |doc: &mut T, node: &Element| {
                set(doc, rebuild_typed::<C::Item, C>(node)?);
                Ok(())
            }),
        )
    }

    /// A collection field whose elements are typed by their wire tags.
    pub fn untyped(
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, Vec<Value>) + Send + Sync + 'static,
    ) -> Self {
        Self::collection_with(
            field,
            wire_name,
            CollectionShape::Untyped,
            type_name::<Vec<Value>>(),
            Box::new(move |doc: &mut T, node: &Element| {
                set(doc, rebuild_untyped(node)?);
                Ok(())
            }),
        )
    }

    /// Name of the document field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Name of the wire field bound to it.
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub(crate) fn setter(&self) -> &Setter<T> {
        &self.setter
    }
}

impl<T> fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("field", &self.field)
            .field("wire_name", &self.wire_name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// The field used to index documents by key, for attaching highlighting.
pub struct UniqueKey<T> {
    field: &'static str,
    read: Box<dyn Fn(&T) -> Option<String> + Send + Sync>,
}

impl<T> UniqueKey<T> {
    /// `read` returns the string form of the key, or `None` when unset.
    pub fn new<K>(field: &'static str, read: impl Fn(&T) -> K + Send + Sync + 'static) -> Self
    where
        K: Into<Option<String>>,
    {
        Self {
            field,
            read: Box::new(move |doc: &T| read(doc).into()),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The key of `doc`, if its key field is set.
    pub fn key_of(&self, doc: &T) -> Option<String> {
        (self.read)(doc)
    }
}

impl<T> fmt::Debug for UniqueKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueKey")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// Supplies the bindings for one document type. Read-only during parsing.
pub trait MappingManager<T> {
    /// Bindings in declaration order. When two share a wire name, the first wins.
    fn fields(&self) -> &[FieldBinding<T>];

    /// The designated unique key, if any.
    fn unique_key(&self) -> Option<&UniqueKey<T>>;
}

/// Binding table built once per document type.
///
/// ```
/// use solr_bind::DocumentMapping;
///
/// #[derive(Default)]
/// struct Book {
///     id: i32,
///     title: String,
///     price: Option<f32>,
///     tags: Vec<String>,
/// }
///
/// let mapping = DocumentMapping::<Book>::new()
///     .scalar("id", "id", |b, v| b.id = v)
///     .scalar("title", "title", |b, v| b.title = v)
///     .nullable("price", "price", |b, v| b.price = Some(v))
///     .collection("tags", "cat", |b, v| b.tags = v)
///     .with_unique_key("id", |b| b.id.to_string());
/// ```
pub struct DocumentMapping<T> {
    fields: Vec<FieldBinding<T>>,
    unique_key: Option<UniqueKey<T>>,
}

impl<T> DocumentMapping<T> {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            unique_key: None,
        }
    }

    /// Add a prebuilt binding.
    pub fn bind(mut self, binding: FieldBinding<T>) -> Self {
        self.fields.push(binding);
        self
    }

    pub fn scalar<V: FromWire>(
        self,
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.bind(FieldBinding::scalar(field, wire_name, set))
    }

    pub fn nullable<V: FromWire>(
        self,
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.bind(FieldBinding::nullable(field, wire_name, set))
    }

    pub fn date(
        self,
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, DateTime<Utc>) + Send + Sync + 'static,
    ) -> Self {
        self.bind(FieldBinding::date(field, wire_name, set))
    }

    pub fn nullable_date(
        self,
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, DateTime<Utc>) + Send + Sync + 'static,
    ) -> Self {
        self.bind(FieldBinding::nullable_date(field, wire_name, set))
    }

    pub fn array<E: FromWire>(
        self,
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, Box<[E]>) + Send + Sync + 'static,
    ) -> Self {
        self.bind(FieldBinding::array(field, wire_name, set))
    }

    pub fn collection<C>(
        self,
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, C) + Send + Sync + 'static,
    ) -> Self
    where
        C: IntoIterator + FromIterator<<C as IntoIterator>::Item>,
        C::Item: FromWire,
    {
        self.bind(FieldBinding::collection(field, wire_name, set))
    }

    pub fn untyped(
        self,
        field: &'static str,
        wire_name: impl Into<String>,
        set: impl Fn(&mut T, Vec<Value>) + Send + Sync + 'static,
    ) -> Self {
        self.bind(FieldBinding::untyped(field, wire_name, set))
    }

    /// Designate the unique key used to attach highlighting.
    pub fn with_unique_key<K>(
        mut self,
        field: &'static str,
        read: impl Fn(&T) -> K + Send + Sync + 'static,
    ) -> Self
    where
        K: Into<Option<String>>,
    {
        self.unique_key = Some(UniqueKey::new(field, read));
        self
    }
}

impl<T> Default for DocumentMapping<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DocumentMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentMapping")
            .field("fields", &self.fields)
            .field("unique_key", &self.unique_key)
            .finish()
    }
}

impl<T> MappingManager<T> for DocumentMapping<T> {
    fn fields(&self) -> &[FieldBinding<T>] {
        &self.fields
    }

    fn unique_key(&self) -> Option<&UniqueKey<T>> {
        self.unique_key.as_ref()
    }
}
