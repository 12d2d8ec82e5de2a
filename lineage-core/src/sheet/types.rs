use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// One person in the lineage (a researcher, or a placeholder for a listed
/// student that has no row of its own).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonNode {
    pub id: NodeId,
    pub name: String,
    pub email: Option<String>,
    pub current_role: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    /// In advisee-list order; the layout re-sorts them.
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Leaf weight. Set to 1 on leaves; internal nodes are summed by the layout.
    pub value: Option<f64>,
    /// Created from an advisee name with no row of its own.
    pub synthetic: bool,
}

impl PersonNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Rooted lineage tree stored as an arena. Indices are pre-order from the root,
/// so `nodes[0]` is always the root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTree {
    pub root: NodeId,
    pub nodes: Vec<PersonNode>,
}

impl ChartTree {
    pub fn get(&self, id: NodeId) -> Option<&PersonNode> {
        self.nodes.get(id.0)
    }

    pub fn root(&self) -> &PersonNode {
        &self.nodes[self.root.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node with the given name, in pre-order.
    pub fn find(&self, name: &str) -> Option<&PersonNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Nested form, shaped like the hierarchy the front end used to build.
    pub fn to_chart_data(&self) -> ChartData {
        fn walk(tree: &ChartTree, id: NodeId) -> ChartData {
            let n = &tree.nodes[id.0];
            ChartData {
                name: n.name.clone(),
                email: n.email.clone(),
                current_role: n.current_role.clone(),
                start_year: n.start_year.clone(),
                end_year: n.end_year.clone(),
                children: n.children.iter().map(|&c| walk(tree, c)).collect(),
                value: n.value,
            }
        }
        walk(self, self.root)
    }
}

/// Serializable nested hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChartData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}
