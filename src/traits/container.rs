//! Hierarchical container of serialized trees
use crate::types::{Result, TREE_XML_GROUP};

pub trait TreeContainer {
    //! Read access to serialized trees stored as datasets in a hierarchical container
    //!
    //! Dataset paths are absolute, for example `/TreeXML/60/Tree_8`.

    /// Root group of the tree datasets
    fn tree_group_name(&self) -> &str {
        TREE_XML_GROUP
    }

    /// Paths of all datasets below `group`, depth first with members in name order.
    ///
    /// If `group` names a dataset the result is that single path. If it names neither a
    /// group nor a dataset the result is empty.
    fn dataset_names(&self, group: &str) -> Result<Vec<String>>;

    /// Paths of the datasets stored for the simulation year `year`
    fn dataset_names_for_year(&self, year: i32) -> Result<Vec<String>> {
        self.dataset_names(&format!("{}{year}/", self.tree_group_name()))
    }

    /// Content of the dataset `path` as a string
    fn read_tree_string(&self, path: &str) -> Result<String>;
}
