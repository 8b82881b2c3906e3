//! Conversion of single wire text values into target scalar types.
//!
//! Numbers use Rust's locale-invariant parsers: `.` as the decimal point, no
//! grouping separators and no implicit trimming, so `" 1"` and `"1,000"` fail.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use solr_node::{Element, Kind};

use crate::error::CoercionError;

/// Format of `date` values on the wire, e.g. `2009-01-15T14:30:05.123Z`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Conversion from the text of a wire leaf.
///
/// Implemented for the primitive scalars, `String`, `char` and
/// `DateTime<Utc>`. Other `FromStr` types opt in with
/// [`from_wire_via_from_str!`](crate::from_wire_via_from_str).
pub trait FromWire: Sized {
    fn from_wire(text: &str) -> Result<Self, CoercionError>;
}

macro_rules! from_wire_parse {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromWire for $ty {
                fn from_wire(text: &str) -> Result<Self, CoercionError> {
                    text.parse::<$ty>()
                        .map_err(|_| CoercionError::malformed(stringify!($ty), text))
                }
            }
        )*
    };
}

from_wire_parse!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char
);

/// Implement [`FromWire`] for types that already implement `FromStr`.
///
/// ```
/// use std::net::IpAddr;
///
/// struct Host(IpAddr);
///
/// impl std::str::FromStr for Host {
///     type Err = std::net::AddrParseError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.parse().map(Host)
///     }
/// }
///
/// solr_bind::from_wire_via_from_str!(Host);
/// ```
#[macro_export]
macro_rules! from_wire_via_from_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FromWire for $ty {
                fn from_wire(text: &str) -> Result<Self, $crate::CoercionError> {
                    <$ty as ::std::str::FromStr>::from_str(text)
                        .map_err(|_| $crate::CoercionError::malformed(stringify!($ty), text))
                }
            }
        )+
    };
}

impl FromWire for bool {
    fn from_wire(text: &str) -> Result<Self, CoercionError> {
        match text {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(CoercionError::malformed("bool", text)),
        }
    }
}

impl FromWire for String {
    fn from_wire(text: &str) -> Result<Self, CoercionError> {
        Ok(text.to_owned())
    }
}

impl FromWire for DateTime<Utc> {
    fn from_wire(text: &str) -> Result<Self, CoercionError> {
        parse_date(text)
    }
}

/// Parse a wire date. Exactly three fractional digits and the `Z` marker
/// are required.
pub fn parse_date(text: &str) -> Result<DateTime<Utc>, CoercionError> {
    let err = || CoercionError::date_format("DateTime<Utc>", text);

    let bytes = text.as_bytes();
    if bytes.len() != 24 {
        return Err(err());
    }
    for (i, b) in bytes.iter().enumerate() {
        let ok = match i {
            4 | 7 => *b == b'-',
            10 => *b == b'T',
            13 | 16 => *b == b':',
            19 => *b == b'.',
            23 => *b == b'Z',
            _ => b.is_ascii_digit(),
        };
        if !ok {
            return Err(err());
        }
    }

    let naive = NaiveDateTime::parse_from_str(text, DATE_FORMAT).map_err(|_| err())?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// An element of an untyped collection, typed by its own wire tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Str(String),
    Date(DateTime<Utc>),
}

impl Value {
    /// Convert `text` according to a leaf kind.
    pub fn from_kind(kind: Kind, text: &str) -> Result<Self, CoercionError> {
        Ok(match kind {
            Kind::Int => Value::Int(i32::from_wire(text)?),
            Kind::Long => Value::Long(i64::from_wire(text)?),
            Kind::Float => Value::Float(f32::from_wire(text)?),
            Kind::Double => Value::Double(f64::from_wire(text)?),
            Kind::Bool => Value::Bool(bool::from_wire(text)?),
            Kind::Str => Value::Str(text.to_owned()),
            Kind::Date => Value::Date(parse_date(text)?),
            other => return Err(CoercionError::unknown_kind(other.tag(), text)),
        })
    }

    /// Convert a leaf element using its own tag as the type.
    pub fn from_element(element: &Element) -> Result<Self, CoercionError> {
        let text = element.text_content();
        match element.kind() {
            Some(kind) => Value::from_kind(kind, &text),
            None => Err(CoercionError::unknown_kind(&element.tag, &text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoercionErrorKind;
    use chrono::{Datelike, Timelike};
    use facet_testhelpers::test;

    #[test]
    fn integers_are_strict() {
        assert_eq!(i32::from_wire("42"), Ok(42));
        assert_eq!(i64::from_wire("-9000000000"), Ok(-9_000_000_000));
        for bad in [" 1", "1 ", "1,000", "", "1.0", "0x10"] {
            let err = i32::from_wire(bad).unwrap_err();
            assert_eq!(err.kind(), &CoercionErrorKind::Malformed, "{bad:?}");
            assert_eq!(err.type_name(), "i32");
            assert_eq!(err.text(), bad);
        }
        assert!(u8::from_wire("256").is_err());
    }

    #[test]
    fn floats_use_decimal_point() {
        assert_eq!(f64::from_wire("1.5"), Ok(1.5));
        assert_eq!(f32::from_wire("0.25"), Ok(0.25));
        assert!(f64::from_wire("1,5").is_err());
        assert!(f64::from_wire(" 1.5").is_err());
    }

    #[test]
    fn booleans_accept_wire_tokens_only() {
        assert_eq!(bool::from_wire("true"), Ok(true));
        assert_eq!(bool::from_wire("false"), Ok(false));
        for bad in ["TRUE", "1", "yes", ""] {
            assert!(bool::from_wire(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn strings_pass_through() {
        assert_eq!(String::from_wire(""), Ok(String::new()));
        assert_eq!(String::from_wire(" a b "), Ok(" a b ".to_owned()));
        assert_eq!(char::from_wire("x"), Ok('x'));
        assert!(char::from_wire("xy").is_err());
    }

    #[test]
    fn date_parses_to_exact_instant() {
        let date = parse_date("2009-01-15T14:30:05.123Z").unwrap();
        assert_eq!(date.year(), 2009);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
        assert_eq!(date.hour(), 14);
        assert_eq!(date.minute(), 30);
        assert_eq!(date.second(), 5);
        assert_eq!(date.timestamp_subsec_millis(), 123);
        assert_eq!(date.timestamp_millis(), 1_232_029_805_123);
    }

    #[test]
    fn date_rejects_other_shapes() {
        for bad in [
            "2009-01-15",
            "2009-01-15T14:30:05Z",
            "2009-01-15T14:30:05.12Z",
            "2009-01-15T14:30:05.1234Z",
            "2009-01-15T14:30:05.123",
            "2009-01-15 14:30:05.123Z",
            "2009-13-15T14:30:05.123Z",
            "2009-02-30T14:30:05.123Z",
            "",
        ] {
            let err = parse_date(bad).unwrap_err();
            assert_eq!(err.kind(), &CoercionErrorKind::DateFormat, "{bad:?}");
        }
    }

    #[test]
    fn value_follows_wire_kind() {
        assert_eq!(Value::from_kind(Kind::Int, "3"), Ok(Value::Int(3)));
        assert_eq!(Value::from_kind(Kind::Long, "3"), Ok(Value::Long(3)));
        assert_eq!(Value::from_kind(Kind::Str, "3"), Ok(Value::Str("3".into())));
        assert_eq!(Value::from_kind(Kind::Bool, "true"), Ok(Value::Bool(true)));
        assert!(Value::from_kind(Kind::Int, "x").is_err());

        let err = Value::from_kind(Kind::Lst, "").unwrap_err();
        assert_eq!(err.kind(), &CoercionErrorKind::UnknownKind("lst".into()));

        let value = Value::from_element(&Element::item(Kind::Str, "x")).unwrap();
        assert_eq!(value, Value::Str("x".to_owned()));

        let mut custom = Element::new("custom");
        custom.children.push("1".into());
        assert!(Value::from_element(&custom).is_err());
    }
}
