//! JSON file tree of included paths

use std::collections::BTreeMap;

use serde::Serialize;

/// TreeNode for JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    File {
        name: String,
    },
    Dir {
        name: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::File { name } => name,
            TreeNode::Dir { name, .. } => name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Dir { .. })
    }
}

#[derive(Default)]
struct Builder {
    is_file: bool,
    children: BTreeMap<String, Builder>,
}

impl Builder {
    fn into_node(self, name: String) -> TreeNode {
        if self.is_file {
            return TreeNode::File { name };
        }
        let mut children: Vec<TreeNode> = self
            .children
            .into_iter()
            .map(|(child_name, child)| child.into_node(child_name))
            .collect();
        // Directories first, then by name.
        children.sort_by(|a, b| b.is_dir().cmp(&a.is_dir()).then_with(|| a.name().cmp(b.name())));
        TreeNode::Dir { name, children }
    }
}

/// Build a tree named `root_name` from slash-separated file paths.
///
/// The last component of each path is a file; every other component is a
/// directory. Empty components are ignored.
pub fn build<I, S>(root_name: &str, paths: I) -> TreeNode
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = Builder::default();

    for path in paths {
        let parts: Vec<&str> = path.as_ref().split('/').filter(|p| !p.is_empty()).collect();
        let Some((file, dirs)) = parts.split_last() else {
            continue;
        };
        let mut current = &mut root;
        for dir in dirs {
            current = current.children.entry(dir.to_string()).or_default();
        }
        current
            .children
            .entry(file.to_string())
            .or_insert_with(|| Builder {
                is_file: true,
                children: BTreeMap::new(),
            });
    }

    root.into_node(root_name.to_string())
}
