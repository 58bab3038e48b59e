//! Containers of serialized trees
//!
//! Simulations store one serialized tree per dataset, grouped by simulation year below
//! `/TreeXML/`, e.g. `/TreeXML/60/Tree_8`.
#[cfg(feature = "hdf5")]
mod hdf5_file;
mod memory;

#[cfg(feature = "hdf5")]
pub use hdf5_file::Hdf5TreeFile;
pub use memory::MemoryTreeContainer;

use crate::traits::TreeContainer;
use crate::types::{Error, Result};
use std::fmt;

/// Selection of tree datasets in a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSelector {
    /// All trees of a simulation year
    Year(i32),
    /// Trees whose dataset path matches a pattern
    Path {
        /// Path or part of a path
        pattern: String,
        /// Match `pattern` as a suffix of the path instead of as a substring
        exact_match: bool,
    },
}

impl DatasetSelector {
    /// Does the dataset `path` match a path selector? Year selectors match nothing.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Year(_) => false,
            Self::Path {
                pattern,
                exact_match: true,
            } => path.ends_with(pattern.as_str()),
            Self::Path {
                pattern,
                exact_match: false,
            } => path.contains(pattern.as_str()),
        }
    }

    /// Paths of the selected datasets in container order.
    ///
    /// An empty selection is a [Error::NotFound].
    pub fn select<C: TreeContainer + ?Sized>(&self, container: &C) -> Result<Vec<String>> {
        let paths = match self {
            Self::Year(year) => container.dataset_names_for_year(*year)?,
            Self::Path { .. } => container
                .dataset_names(container.tree_group_name())?
                .into_iter()
                .filter(|p| self.matches(p))
                .collect(),
        };
        if paths.is_empty() {
            Err(Error::NotFound(format!("no tree datasets for {self}")))
        } else {
            Ok(paths)
        }
    }
}

impl fmt::Display for DatasetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "year {year}"),
            Self::Path {
                pattern,
                exact_match: true,
            } => write!(f, "path {pattern}"),
            Self::Path {
                pattern,
                exact_match: false,
            } => write!(f, "path containing {pattern}"),
        }
    }
}

/// Paths of all tree datasets in `container`
pub fn list_datasets<C: TreeContainer + ?Sized>(container: &C) -> Result<Vec<String>> {
    container.dataset_names(container.tree_group_name())
}

/// Sort dataset paths depth first with the members of each group in name order
pub(crate) fn sort_paths(paths: &mut [String]) {
    paths.sort_by(|a, b| a.split('/').cmp(b.split('/')));
}

#[cfg(test)]
mod test {
    use super::*;

    fn container() -> MemoryTreeContainer {
        let mut c = MemoryTreeContainer::new();
        for path in [
            "/TreeXML/60/Tree_8",
            "/TreeXML/60/Tree_18",
            "/TreeXML/61/Tree_8",
            "/Forest/60/Tree_8",
        ] {
            c.insert(path, format!("<Tree SegmentType=\"Cf\" name=\"{path}\"/>"));
        }
        c
    }

    #[test]
    fn test_select_year() {
        let c = container();
        assert_eq!(
            DatasetSelector::Year(60).select(&c).unwrap(),
            vec!["/TreeXML/60/Tree_18", "/TreeXML/60/Tree_8"]
        );
        assert!(matches!(
            DatasetSelector::Year(20).select(&c),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_select_path() {
        let c = container();
        let exact = DatasetSelector::Path {
            pattern: String::from("60/Tree_8"),
            exact_match: true,
        };
        assert_eq!(exact.select(&c).unwrap(), vec!["/TreeXML/60/Tree_8"]);

        let substring = DatasetSelector::Path {
            pattern: String::from("Tree_8"),
            exact_match: false,
        };
        assert_eq!(
            substring.select(&c).unwrap(),
            vec!["/TreeXML/60/Tree_8", "/TreeXML/61/Tree_8"]
        );

        let none = DatasetSelector::Path {
            pattern: String::from("Tree_1"),
            exact_match: true,
        };
        assert!(matches!(none.select(&c), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_datasets() {
        let names = list_datasets(&container()).unwrap();
        assert_eq!(names.len(), 3);
        assert!(names.iter().all(|n| n.starts_with("/TreeXML/")));
    }

    #[test]
    fn test_sort_paths() {
        let mut paths = vec![
            String::from("/g/a-b"),
            String::from("/g/a/x"),
            String::from("/g/b"),
        ];
        sort_paths(&mut paths);
        assert_eq!(paths, vec!["/g/a/x", "/g/a-b", "/g/b"]);
    }
}
