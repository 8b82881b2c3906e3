//! Path selection over an [`Element`] tree.
//!
//! Paths are `/`-separated segments, each either a bare tag (`result`) or a
//! tag with a `name` attribute constraint (`lst[name=facet_counts]`).
//! Paths are relative to the element they are applied to.

use std::fmt;
use std::str::FromStr;

use crate::Element;

/// Error when parsing a selection path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Path was empty.
    EmptyPath,
    /// A segment between two separators was empty.
    EmptySegment { path: String, index: usize },
    /// A segment was not `tag` or `tag[name=value]`.
    InvalidSegment { path: String, segment: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::EmptyPath => write!(f, "empty path"),
            PathError::EmptySegment { path, index } => {
                write!(f, "empty segment {index} in path {path:?}")
            }
            PathError::InvalidSegment { path, segment } => {
                write!(f, "invalid segment {segment:?} in path {path:?}")
            }
        }
    }
}

impl std::error::Error for PathError {}

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    tag: String,
    name: Option<String>,
}

impl Segment {
    /// Match any child with this tag.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: None,
        }
    }

    /// Match a child with this tag and `name` attribute.
    pub fn named(tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: Some(name.into()),
        }
    }

    /// Whether `element` satisfies this segment.
    pub fn matches(&self, element: &Element) -> bool {
        element.tag == self.tag
            && match &self.name {
                Some(name) => element.name() == Some(name.as_str()),
                None => true,
            }
    }

    fn parse(path: &str, raw: &str) -> Result<Self, PathError> {
        let invalid = || PathError::InvalidSegment {
            path: path.to_owned(),
            segment: raw.to_owned(),
        };

        let Some(open) = raw.find('[') else {
            if raw.contains(']') {
                return Err(invalid());
            }
            return Ok(Segment::tag(raw));
        };

        let tag = &raw[..open];
        let predicate = raw[open + 1..].strip_suffix(']').ok_or_else(invalid)?;
        let value = predicate.strip_prefix("name=").ok_or_else(invalid)?;
        let value = strip_quotes(value);
        if tag.is_empty() || value.is_empty() || value.contains(['[', ']']) {
            return Err(invalid());
        }
        Ok(Segment::named(tag, value))
    }
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}[name={}]", self.tag, name),
            None => f.write_str(&self.tag),
        }
    }
}

/// A parsed selection path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Parse a path such as `lst[name=facet_counts]/lst[name=facet_fields]`.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::EmptyPath);
        }
        let segments = path
            .split('/')
            .enumerate()
            .map(|(index, raw)| {
                if raw.is_empty() {
                    Err(PathError::EmptySegment {
                        path: path.to_owned(),
                        index,
                    })
                } else {
                    Segment::parse(path, raw)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Extend the path by one step.
    pub fn then(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl From<Segment> for Path {
    fn from(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl Element {
    /// First element reached by `path`, in document order.
    pub fn select(&self, path: &Path) -> Option<&Element> {
        select_first(self, path.segments())
    }

    /// Every element reached by `path`, in document order.
    pub fn select_all(&self, path: &Path) -> Vec<&Element> {
        let mut out = Vec::new();
        select_into(self, path.segments(), &mut out);
        out
    }
}

fn select_first<'a>(element: &'a Element, segments: &[Segment]) -> Option<&'a Element> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(element);
    };
    element
        .child_elements()
        .filter(|child| head.matches(child))
        .find_map(|child| select_first(child, rest))
}

fn select_into<'a>(element: &'a Element, segments: &[Segment], out: &mut Vec<&'a Element>) {
    let Some((head, rest)) = segments.split_first() else {
        out.push(element);
        return;
    };
    for child in element.child_elements().filter(|child| head.matches(child)) {
        select_into(child, rest, out);
    }
}
