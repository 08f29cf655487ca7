//! Pending parameter edits.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::EditError;
use crate::params::Parameter;

/// Parameter edits staged by a client and committed together.
///
/// Values are trimmed when staged and must not be empty. Staging a value
/// equal to the current one is allowed: it still counts toward
/// [`modified_count`](Self::modified_count) but does not change the
/// container when committed.
///
/// # Example
///
/// ```rust
/// use mphkit::{EditSet, Parameter};
///
/// let table = vec![
///     Parameter::new("Voltage", "10[V]", "Supply voltage"),
///     Parameter::new("Length", "9[cm]", "Bar length"),
/// ];
///
/// let mut edits = EditSet::new();
/// edits.stage("Voltage", " 20[V] ")?;
/// edits.stage("Length", "9[cm]")?;
///
/// assert_eq!(edits.get("Voltage"), Some("20[V]"));
/// assert_eq!(edits.modified_count(), 2);
/// assert_eq!(edits.effective_count(&table), 1);
/// # Ok::<(), mphkit::EditError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSet {
    edits: BTreeMap<String, String>,
}

impl EditSet {
    /// Creates an empty edit set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages `value` for parameter `name`, replacing any earlier value.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::EmptyName`] or [`EditError::EmptyValue`] if
    /// either is empty after trimming.
    pub fn stage(&mut self, name: impl Into<String>, value: impl AsRef<str>) -> Result<(), EditError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EditError::EmptyName);
        }
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(EditError::EmptyValue { name });
        }
        self.edits.insert(name, value.to_string());
        Ok(())
    }

    /// Removes the staged value for `name`, returning it.
    pub fn unstage(&mut self, name: &str) -> Option<String> {
        self.edits.remove(name)
    }

    /// Returns the staged value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.edits.get(name).map(String::as_str)
    }

    /// Number of staged edits, no-op edits included.
    pub fn modified_count(&self) -> usize {
        self.edits.len()
    }

    /// Returns true if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Discards all staged edits.
    pub fn clear(&mut self) {
        self.edits.clear();
    }

    /// Number of staged edits that would change a value in `table`.
    ///
    /// Edits for names absent from `table` are not counted.
    pub fn effective_count(&self, table: &[Parameter]) -> usize {
        table
            .iter()
            .filter(|p| self.get(&p.name).is_some_and(|v| v != p.value))
            .count()
    }

    /// Returns `table` with staged values substituted, the view an editor
    /// shows before the edits are committed.
    pub fn preview(&self, table: &[Parameter]) -> Vec<Parameter> {
        table
            .iter()
            .map(|p| match self.get(&p.name) {
                Some(value) => Parameter {
                    value: value.to_string(),
                    ..p.clone()
                },
                None => p.clone(),
            })
            .collect()
    }

    /// Iterates over `(name, value)` pairs sorted by name.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.edits.iter()
    }
}

impl<'a> IntoIterator for &'a EditSet {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_trims_and_replaces() {
        let mut edits = EditSet::new();
        edits.stage("V", "  1[V]").unwrap();
        edits.stage("V", "2[V]\n").unwrap();

        assert_eq!(edits.get("V"), Some("2[V]"));
        assert_eq!(edits.modified_count(), 1);
    }

    #[test]
    fn test_empty_value_rejected() {
        let mut edits = EditSet::new();
        let err = edits.stage("V", "   ").unwrap_err();
        assert_eq!(err, EditError::EmptyValue { name: "V".into() });
        assert!(edits.is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut edits = EditSet::new();
        assert_eq!(edits.stage(" ", "1").unwrap_err(), EditError::EmptyName);
    }

    #[test]
    fn test_noop_edits_counted_but_not_effective() {
        let table = vec![
            Parameter::new("a", "1", ""),
            Parameter::new("b", "2", ""),
        ];
        let mut edits = EditSet::new();
        edits.stage("a", "1").unwrap();
        edits.stage("b", "3").unwrap();
        edits.stage("ghost", "4").unwrap();

        assert_eq!(edits.modified_count(), 3);
        assert_eq!(edits.effective_count(&table), 1);
    }

    #[test]
    fn test_preview() {
        let table = vec![
            Parameter::new("a", "1", "first"),
            Parameter::new("b", "2", "second"),
        ];
        let mut edits = EditSet::new();
        edits.stage("b", "20").unwrap();

        let preview = edits.preview(&table);
        assert_eq!(preview[0], table[0]);
        assert_eq!(preview[1], Parameter::new("b", "20", "second"));
    }

    #[test]
    fn test_unstage_and_clear() {
        let mut edits = EditSet::new();
        edits.stage("a", "1").unwrap();
        edits.stage("b", "2").unwrap();

        assert_eq!(edits.unstage("a"), Some("1".to_string()));
        assert_eq!(edits.unstage("a"), None);
        edits.clear();
        assert!(edits.is_empty());
    }

    #[test]
    fn test_iteration_sorted_by_name() {
        let mut edits = EditSet::new();
        edits.stage("zeta", "1").unwrap();
        edits.stage("alpha", "2").unwrap();

        let names: Vec<_> = (&edits).into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }
}
