//! HDF5 container
use crate::traits::TreeContainer;
use crate::types::{Error, Result};
use hdf5::types::{VarLenAscii, VarLenUnicode};
use hdf5::{File, Group};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// HDF5 file with serialized trees stored as scalar variable length strings
#[derive(Debug)]
pub struct Hdf5TreeFile {
    file: File,
    path: PathBuf,
}

impl Hdf5TreeFile {
    /// Open an existing file read-only
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).map_err(|e| Error::container_io(path.display().to_string(), e))?;
        debug!("Opened {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn context(&self, name: &str) -> String {
        format!("{}:{name}", self.path.display())
    }
}

/// Append the paths of all datasets below `group` to `names`
fn visit_datasets(group: &Group, prefix: &str, names: &mut Vec<String>) -> hdf5::Result<()> {
    let mut members = group.member_names()?;
    members.sort();
    for member in members {
        if let Ok(child) = group.group(&member) {
            visit_datasets(&child, &format!("{prefix}{member}/"), names)?;
        } else if group.dataset(&member).is_ok() {
            names.push(format!("{prefix}{member}"));
        }
    }
    Ok(())
}

impl TreeContainer for Hdf5TreeFile {
    fn dataset_names(&self, group: &str) -> Result<Vec<String>> {
        let name = match group.trim_end_matches('/') {
            "" => "/",
            name => name,
        };
        if let Ok(g) = self.file.group(name) {
            let prefix = if group.ends_with('/') {
                group.to_string()
            } else {
                format!("{group}/")
            };
            let mut names = vec![];
            visit_datasets(&g, &prefix, &mut names)
                .map_err(|e| Error::container_io(self.context(group), e))?;
            Ok(names)
        } else if self.file.dataset(name).is_ok() {
            Ok(vec![group.to_string()])
        } else {
            warn!("{group} is neither a group nor a dataset");
            Ok(vec![])
        }
    }

    fn read_tree_string(&self, path: &str) -> Result<String> {
        let dataset = self
            .file
            .dataset(path)
            .map_err(|e| Error::container_io(self.context(path), e))?;
        match dataset.read_scalar::<VarLenAscii>() {
            Ok(s) => Ok(s.as_str().to_string()),
            Err(_) => dataset
                .read_scalar::<VarLenUnicode>()
                .map(|s| s.as_str().to_string())
                .map_err(|e| Error::container_io(self.context(path), e)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_hdf5_tree_file() {
        let path = std::env::temp_dir().join("_test_lignumvtk_container.h5");
        {
            let file = File::create(&path).unwrap();
            let year = file
                .create_group("TreeXML")
                .unwrap()
                .create_group("60")
                .unwrap();
            for tree in ["Tree_8", "Tree_18"] {
                let content = VarLenUnicode::from_str("<Tree SegmentType=\"Cf\"/>").unwrap();
                year.new_dataset::<VarLenUnicode>()
                    .shape(())
                    .create(tree)
                    .unwrap()
                    .write_scalar(&content)
                    .unwrap();
            }
        }
        let container = Hdf5TreeFile::open(&path).unwrap();
        assert_eq!(
            container.dataset_names("/TreeXML/").unwrap(),
            vec!["/TreeXML/60/Tree_18", "/TreeXML/60/Tree_8"]
        );
        assert_eq!(container.dataset_names_for_year(60).unwrap().len(), 2);
        assert!(container.dataset_names_for_year(20).unwrap().is_empty());
        assert_eq!(
            container.read_tree_string("/TreeXML/60/Tree_8").unwrap(),
            "<Tree SegmentType=\"Cf\"/>"
        );
        std::fs::remove_file(&path).unwrap();
    }
}
