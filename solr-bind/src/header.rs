//! Response header parsing.

use std::collections::HashMap;

use solr_node::{Element, Kind};

use crate::coerce::FromWire;
use crate::error::ResponseError;

/// The `responseHeader` block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseHeader {
    pub status: i32,
    /// Server-side query time, in milliseconds.
    pub q_time: i64,
    /// Echoed request parameters. Only single-valued (`str`) parameters.
    pub params: HashMap<String, String>,
}

impl ResponseHeader {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

pub(crate) fn parse_header(node: &Element) -> Result<ResponseHeader, ResponseError> {
    let status = required::<i32>(node, "status")?;
    let q_time = required::<i64>(node, "QTime")?;

    let params = node
        .child_named(Kind::Lst.tag(), "params")
        .map(|params| {
            params
                .child_elements()
                .filter(|param| param.kind() == Some(Kind::Str))
                .filter_map(|param| Some((param.name()?.to_owned(), param.text_content())))
                .collect::<HashMap<_, _>>()
        })
        .unwrap_or_default();

    Ok(ResponseHeader {
        status,
        q_time,
        params,
    })
}

fn required<V: FromWire>(node: &Element, name: &str) -> Result<V, ResponseError> {
    let path = format!("response/lst[name=responseHeader]/{name}");
    let Some(value) = node.child_elements().find(|e| e.name() == Some(name)) else {
        return Err(ResponseError::MissingNode { path });
    };
    V::from_wire(&value.text_content()).map_err(|source| ResponseError::InvalidValue { path, source })
}
