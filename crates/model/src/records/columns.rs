use crate::execution::errors::ColumnListError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered, unique column names shared by the source and target tables.
///
/// Position `i` in every row corresponds to `names[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnList {
    names: Vec<String>,
}

impl ColumnList {
    pub fn new(names: Vec<String>) -> Result<Self, ColumnListError> {
        if names.is_empty() {
            return Err(ColumnListError::Empty);
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if name.is_empty() {
                return Err(ColumnListError::EmptyName);
            }
            if !seen.insert(name.as_str()) {
                return Err(ColumnListError::Duplicate(name.clone()));
            }
        }

        Ok(ColumnList { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Names in `self` that `other` does not expose, in `self`'s order.
    pub fn missing_from(&self, other: &ColumnList) -> Vec<String> {
        self.names
            .iter()
            .filter(|name| !other.contains(name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ColumnList;
    use crate::execution::errors::ColumnListError;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keeps_catalog_order() {
        let columns = ColumnList::new(names(&["id", "name", "value"])).unwrap();
        assert_eq!(columns.iter().collect::<Vec<_>>(), vec!["id", "name", "value"]);
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(
            ColumnList::new(Vec::new()),
            Err(ColumnListError::Empty)
        ));
        assert!(matches!(
            ColumnList::new(names(&["id", "id"])),
            Err(ColumnListError::Duplicate(name)) if name == "id"
        ));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let columns = ColumnList::new(names(&["Id", "id"])).unwrap();
        assert_eq!(columns.len(), 2);
    }

    #[test]
    fn test_missing_from() {
        let source = ColumnList::new(names(&["id", "name", "value"])).unwrap();
        let target = ColumnList::new(names(&["value", "id"])).unwrap();
        assert_eq!(source.missing_from(&target), vec!["name".to_string()]);
        assert!(target.missing_from(&source).is_empty());
    }
}
