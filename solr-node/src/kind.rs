//! Tag vocabulary of response documents.

use std::fmt;

/// What a response element declares itself to be, by tag.
///
/// Leaf kinds carry a single text value; the remaining kinds are containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int,
    Long,
    Float,
    Double,
    Bool,
    Str,
    Date,
    /// An ordered, unnamed sequence of leaves (a multi-valued field).
    Arr,
    /// A named list of named children.
    Lst,
    Doc,
    Result,
    Null,
}

impl Kind {
    /// Look up the kind for a tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "int" => Kind::Int,
            "long" => Kind::Long,
            "float" => Kind::Float,
            "double" => Kind::Double,
            "bool" => Kind::Bool,
            "str" => Kind::Str,
            "date" => Kind::Date,
            "arr" => Kind::Arr,
            "lst" => Kind::Lst,
            "doc" => Kind::Doc,
            "result" => Kind::Result,
            "null" => Kind::Null,
            _ => return None,
        })
    }

    /// The tag this kind is written as.
    pub fn tag(self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Long => "long",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::Bool => "bool",
            Kind::Str => "str",
            Kind::Date => "date",
            Kind::Arr => "arr",
            Kind::Lst => "lst",
            Kind::Doc => "doc",
            Kind::Result => "result",
            Kind::Null => "null",
        }
    }

    /// True for kinds whose value is a single text leaf.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            Kind::Int | Kind::Long | Kind::Float | Kind::Double | Kind::Bool | Kind::Str | Kind::Date
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
