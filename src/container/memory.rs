//! In-memory container
use super::sort_paths;
use crate::traits::TreeContainer;
use crate::types::{Error, Result};
use std::collections::BTreeMap;

/// Serialized trees held in memory, keyed by absolute dataset path
#[derive(Debug, Clone, Default)]
pub struct MemoryTreeContainer {
    datasets: BTreeMap<String, String>,
}

impl MemoryTreeContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `content` as the dataset `path`
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.datasets.insert(path.into(), content.into());
    }

    /// Number of datasets
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Is the container empty?
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl TreeContainer for MemoryTreeContainer {
    fn dataset_names(&self, group: &str) -> Result<Vec<String>> {
        if self.datasets.contains_key(group) {
            return Ok(vec![group.to_string()]);
        }
        let prefix = if group.ends_with('/') {
            group.to_string()
        } else {
            format!("{group}/")
        };
        let mut names = self
            .datasets
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .cloned()
            .collect::<Vec<_>>();
        sort_paths(&mut names);
        Ok(names)
    }

    fn read_tree_string(&self, path: &str) -> Result<String> {
        self.datasets
            .get(path)
            .cloned()
            .ok_or_else(|| Error::container_io(path, "no such dataset"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dataset_names() {
        let mut c = MemoryTreeContainer::new();
        c.insert("/TreeXML/1/Tree_0", "a");
        c.insert("/TreeXML/1/Tree_1", "b");
        c.insert("/TreeXML/10/Tree_0", "c");

        assert_eq!(
            c.dataset_names("/TreeXML/1/").unwrap(),
            vec!["/TreeXML/1/Tree_0", "/TreeXML/1/Tree_1"]
        );
        assert_eq!(
            c.dataset_names("/TreeXML/1").unwrap(),
            c.dataset_names("/TreeXML/1/").unwrap()
        );
        assert_eq!(
            c.dataset_names("/TreeXML/10/Tree_0").unwrap(),
            vec!["/TreeXML/10/Tree_0"]
        );
        assert!(c.dataset_names("/Other/").unwrap().is_empty());
        assert_eq!(c.dataset_names_for_year(10).unwrap().len(), 1);
    }

    #[test]
    fn test_read_tree_string() {
        let mut c = MemoryTreeContainer::new();
        c.insert("/TreeXML/1/Tree_0", "<Tree/>");
        assert_eq!(c.read_tree_string("/TreeXML/1/Tree_0").unwrap(), "<Tree/>");
        assert!(matches!(
            c.read_tree_string("/TreeXML/1/Tree_1"),
            Err(Error::ContainerIo { .. })
        ));
    }
}
