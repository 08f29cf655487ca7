//! Parameter table extraction.
//!
//! Parameters are declared as [`DECLARATION_TAG`] elements inside
//! `dmodel.xml` carrying three attributes: `name`, `expr` (an opaque value
//! expression, possibly with a bracketed unit such as `10[mm]`) and `descr`.
//! Other elements with the same attributes (local variables, feature nodes)
//! are not parameters. Attributes are looked up by key, so their order on the
//! element does not matter.
//!
//! Some declarations are internal to the solver and are filtered out:
//!
//! - the iteration counter [`RESERVED_NAME`];
//! - expressions starting with [`MESH_EXPR_PREFIX`] (computed mesh data);
//! - expressions of [`MAX_EXPR_CHARS`] characters or more, counted as
//!   written in the document (an entity such as `&lt;` counts in full).
//!
//! Extraction never fails. A missing member, unreadable text or a syntax
//! error yields an empty table.
//!
//! ```rust
//! use mphkit::params::parse_parameters;
//!
//! let xml = r#"<model>
//!   <expressions name="Voltage" expr="10[V]" descr="Supply voltage"/>
//!   <expressions name="currentiter" expr="1" descr=""/>
//! </model>"#;
//!
//! let table = parse_parameters(xml);
//! assert_eq!(table.len(), 1);
//! assert_eq!(table[0].value, "10[V]");
//! ```

use std::io::{Read, Seek};
use std::ops::ControlFlow;
use std::path::Path;

use crate::DMODEL_MEMBER;
use crate::container::Container;
use crate::xml::scan_elements;

/// Tag of parameter declarations.
pub const DECLARATION_TAG: &str = "expressions";

/// Name of the internal iteration counter, never reported.
pub const RESERVED_NAME: &str = "currentiter";

/// Prefix of computed mesh expressions, never reported.
pub const MESH_EXPR_PREFIX: &str = "Triangle";

/// Expressions must be shorter than this many characters to be reported.
pub const MAX_EXPR_CHARS: usize = 100;

/// One user-editable parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Unique key within a container.
    pub name: String,
    /// Value expression, e.g. `"10[mm]"`.
    pub value: String,
    /// Free-text description.
    pub description: String,
}

impl Parameter {
    /// Creates a parameter.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: description.into(),
        }
    }

    /// Splits a trailing bracketed unit off the value.
    ///
    /// ```
    /// use mphkit::Parameter;
    ///
    /// let p = Parameter::new("L", "10[mm]", "");
    /// assert_eq!(p.unit(), Some("mm"));
    /// assert_eq!(Parameter::new("n", "3", "").unit(), None);
    /// ```
    pub fn unit(&self) -> Option<&str> {
        let body = self.value.trim_end().strip_suffix(']')?;
        let open = body.rfind('[')?;
        Some(&body[open + 1..])
    }
}

/// Returns true if a declaration with this name and expression is reported.
///
/// `raw_expr` is the `expr` attribute as written in the document, before
/// entity decoding.
pub fn is_user_parameter(name: &str, raw_expr: &str) -> bool {
    name != RESERVED_NAME
        && !raw_expr.starts_with(MESH_EXPR_PREFIX)
        && raw_expr.chars().count() < MAX_EXPR_CHARS
}

/// Extracts the parameter table from `dmodel.xml` text, in source order.
///
/// Returns an empty table if the text is not well-formed.
pub fn parse_parameters(xml: &str) -> Vec<Parameter> {
    let mut table = Vec::new();
    let scanned = scan_elements(xml, |element| {
        if element.local_name != DECLARATION_TAG {
            return ControlFlow::Continue(());
        }
        if let (Some(name), Some(expr), Some(raw_expr), Some(descr)) = (
            element.get("name"),
            element.get("expr"),
            element.raw("expr"),
            element.get("descr"),
        ) {
            if is_user_parameter(name, raw_expr) {
                table.push(Parameter::new(name, expr, descr));
            }
        }
        ControlFlow::Continue(())
    });

    match scanned {
        Ok(()) => table,
        Err(e) => {
            log::debug!("parameter table unavailable: {}", e);
            Vec::new()
        }
    }
}

/// Reads the parameter table of the container at `path`.
///
/// Returns an empty table on any failure.
pub fn extract_parameters(path: impl AsRef<Path>) -> Vec<Parameter> {
    let path = path.as_ref();
    match Container::open(path) {
        Ok(mut container) => from_container(&mut container),
        Err(e) => {
            log::debug!("no parameters for '{}': {}", path.display(), e);
            Vec::new()
        }
    }
}

pub(crate) fn from_container<R: Read + Seek>(container: &mut Container<R>) -> Vec<Parameter> {
    match container.read_member_text(DMODEL_MEMBER) {
        Ok(Some(text)) => parse_parameters(&text),
        Ok(None) => {
            log::debug!("no parameters: '{}' member missing", DMODEL_MEMBER);
            Vec::new()
        }
        Err(e) => {
            log::debug!("no parameters: {}", e);
            Vec::new()
        }
    }
}
