//! In-memory rewriting of parameter expressions.

use std::collections::BTreeMap;
use std::ops::{ControlFlow, Range};
use std::sync::LazyLock;

use regex::Regex;

use crate::params::DECLARATION_TAG;
use crate::xml::scan_elements;

/// One `key="value"` or `key='value'` pair inside a start tag. Matching
/// left to right consumes whole quoted values, so text inside one value is
/// never taken for another attribute.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/<>"']+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid attribute pattern")
});

/// Text with parameter edits applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedText {
    /// The rewritten document.
    pub text: String,
    /// Names that matched a declaration, in the order they were found.
    pub matched: Vec<String>,
    /// Names with no declaration in the document, sorted.
    pub unmatched: Vec<String>,
    /// Number of `expr` values whose bytes actually changed.
    pub rewritten: usize,
}

impl PatchedText {
    /// Returns true if the document differs from the input.
    pub fn is_changed(&self) -> bool {
        self.rewritten > 0
    }
}

/// Applies `edits` (name to new expression) to a `dmodel.xml` document.
///
/// For each name, the first `<expressions>` declaration whose `name` attribute
/// equals it and that carries an `expr` attribute has its `expr` value
/// replaced. Other elements are never rewritten, even when their `name`
/// matches. Only the
/// bytes of that value change; attribute order, quoting, whitespace and all
/// other text are preserved. New values are escaped for use inside an
/// attribute. An edit whose value equals the current one leaves the bytes
/// untouched. Names without a declaration are reported in
/// [`PatchedText::unmatched`], not treated as errors.
///
/// # Errors
///
/// Returns the parser error if the document is not well-formed.
///
/// ```rust
/// use mphkit::edit::patch_expressions;
///
/// let xml = r#"<expressions name="Voltage" expr="10[V]" descr="Supply voltage"/>"#;
/// let patched = patch_expressions(xml, [("Voltage", "20[V]")]).unwrap();
/// assert_eq!(patched.text, r#"<expressions name="Voltage" expr="20[V]" descr="Supply voltage"/>"#);
/// ```
pub fn patch_expressions<I, K, V>(text: &str, edits: I) -> Result<PatchedText, quick_xml::Error>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pending: BTreeMap<String, String> = edits
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect();
    let mut matched = Vec::new();
    let mut replacements: Vec<(Range<usize>, String)> = Vec::new();

    scan_elements(text, |element| {
        if pending.is_empty() {
            return ControlFlow::Break(());
        }
        if element.local_name != DECLARATION_TAG {
            return ControlFlow::Continue(());
        }
        let (Some(name), Some(current)) = (element.get("name"), element.get("expr")) else {
            return ControlFlow::Continue(());
        };
        let Some(new_value) = pending.remove(name) else {
            return ControlFlow::Continue(());
        };

        if current != new_value {
            let tag = &text[element.span.clone()];
            match expr_value_range(tag) {
                Some(range) => {
                    let start = element.span.start + range.start;
                    let end = element.span.start + range.end;
                    let escaped = quick_xml::escape::escape(new_value.as_str()).into_owned();
                    replacements.push((start..end, escaped));
                }
                None => {
                    log::warn!("cannot locate expr value of '{}' in {}", name, tag);
                    return ControlFlow::Continue(());
                }
            }
        }
        matched.push(name.to_string());
        ControlFlow::Continue(())
    })?;

    let mut patched = text.to_string();
    replacements.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    for (range, value) in &replacements {
        patched.replace_range(range.clone(), value);
    }

    let unmatched: Vec<String> = pending.into_keys().collect();
    for name in &unmatched {
        log::debug!("no declaration for '{}', edit ignored", name);
    }

    Ok(PatchedText {
        text: patched,
        matched,
        unmatched,
        rewritten: replacements.len(),
    })
}

/// Byte range of the `expr` value (between the quotes) within a start tag.
fn expr_value_range(tag: &str) -> Option<Range<usize>> {
    ATTRIBUTE
        .captures_iter(tag)
        .find(|c| &c[1] == "expr")
        .and_then(|c| c.get(2).or_else(|| c.get(3)))
        .map(|m| m.range())
}
