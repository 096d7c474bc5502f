/// `index.json` describing where lesson files live, as a tree of topics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct CatalogManifest {
    pub roots: Vec<CatalogNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct CatalogNode {
    pub label: String,
    pub slug: String,
    /// Lesson list for this topic, relative to the manifest.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub children: Vec<CatalogNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CatalogLeaf {
    pub path: Vec<String>,
    pub file: String,
}

impl CatalogManifest {
    /// Every node that names a file, depth first, with its label path.
    pub fn leaves(&self) -> Vec<CatalogLeaf> {
        let mut leaves = Vec::new();

        for node in &self.roots {
            gather_leaves(node, Vec::new(), &mut leaves);
        }

        leaves
    }
}

fn gather_leaves(node: &CatalogNode, mut prefix: Vec<String>, leaves: &mut Vec<CatalogLeaf>) {
    prefix.push(node.label.clone());

    if let Some(file) = &node.file {
        leaves.push(CatalogLeaf {
            path: prefix.clone(),
            file: file.clone(),
        });
    }

    for child in &node.children {
        gather_leaves(child, prefix.clone(), leaves);
    }
}
