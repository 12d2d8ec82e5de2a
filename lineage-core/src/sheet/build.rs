//
// Build step: sheet rows -> ChartTree
//
// What this does:
// - Resolves the semantic columns from the headers
// - Collects every name listed in an advisee cell (the "advisee set")
// - Creates one node per named row; rows sharing a name share the node and
//   the last row's metadata wins
// - Links advisors to advisees in row order, then list order. Unknown advisee
//   names become synthetic leaves (one per name)
// - Attaches every named row that nobody lists as an advisee to the fixed root
// - Materializes the part reachable from the root and marks leaves with value 1
//
// Placement is exactly-once: a node that already has a parent keeps it, and a
// link that would close a cycle (self-listing included) is skipped. Skipped
// links are logged; the advisee still counts as an advisee, so it is never
// promoted to the root.

use std::collections::{HashMap, HashSet};

use crate::config::{RootIdentity, TreeConfig};
use crate::sheet::{ChartTree, Columns, NodeId, PersonNode, SheetRow};

const ROOT: usize = 0;

pub fn build_tree(rows: &[SheetRow], headers: &[String], cfg: &TreeConfig) -> ChartTree {
    let cols = Columns::resolve(headers, &cfg.columns);
    let mut ctx = BuildCtx::new(&cfg.root);

    // Everyone listed as somebody's student stays off the root ring.
    let mut advisees: HashSet<&str> = HashSet::new();
    for row in rows {
        if cols.row_name(row).is_some() {
            advisees.extend(cols.row_advisees(row, cfg.advisee_separator));
        }
    }

    for row in rows {
        if let Some(name) = cols.row_name(row) {
            ctx.upsert_person(name, row, &cols);
        }
    }

    for row in rows {
        let Some(name) = cols.row_name(row) else { continue };
        let Some(advisor) = ctx.lookup_row_node(name) else { continue };
        for student in cols.row_advisees(row, cfg.advisee_separator) {
            let child = ctx.resolve_advisee(student);
            ctx.place(advisor, child);
        }
    }

    for row in rows {
        let Some(name) = cols.row_name(row) else { continue };
        if name == ctx.root_name() || advisees.contains(name) {
            continue;
        }
        if let Some(idx) = ctx.lookup_row_node(name) {
            if ctx.drafts[idx].parent.is_none() {
                ctx.place(ROOT, idx);
            }
        }
    }

    let tree = ctx.finish();
    log::debug!(
        "built lineage tree: {} rows -> {} nodes ({} root children)",
        rows.len(),
        tree.len(),
        tree.root().children.len()
    );
    tree
}

#[derive(Debug, Clone, Default)]
struct Draft {
    name: String,
    email: Option<String>,
    current_role: Option<String>,
    start_year: Option<String>,
    end_year: Option<String>,
    children: Vec<usize>,
    parent: Option<usize>,
    synthetic: bool,
}

struct BuildCtx {
    drafts: Vec<Draft>,
    /// Row-backed nodes by trimmed name.
    by_name: HashMap<String, usize>,
    /// Synthetic leaves by name.
    synthetic_by_name: HashMap<String, usize>,
}

impl BuildCtx {
    fn new(root: &RootIdentity) -> Self {
        let root = Draft {
            name: root.name.clone(),
            email: root.email.clone(),
            current_role: root.current_role.clone(),
            ..Draft::default()
        };
        Self {
            drafts: vec![root],
            by_name: HashMap::new(),
            synthetic_by_name: HashMap::new(),
        }
    }

    fn root_name(&self) -> &str {
        &self.drafts[ROOT].name
    }

    /// Create or overwrite the node for a named row. Rows naming the root are
    /// folded into the root, which keeps its configured identity.
    fn upsert_person(&mut self, name: &str, row: &SheetRow, cols: &Columns) {
        if name == self.root_name() {
            return;
        }
        let draft = Draft {
            name: name.to_string(),
            email: cols.field(row, &cols.email),
            current_role: cols.field(row, &cols.role),
            start_year: cols.field(row, &cols.start_year),
            end_year: cols.field(row, &cols.end_year),
            ..Draft::default()
        };
        match self.by_name.get(name) {
            Some(&idx) => {
                // Last row wins for metadata; links are made later.
                let existing = &mut self.drafts[idx];
                existing.email = draft.email;
                existing.current_role = draft.current_role;
                existing.start_year = draft.start_year;
                existing.end_year = draft.end_year;
            }
            None => {
                let idx = self.drafts.len();
                self.drafts.push(draft);
                self.by_name.insert(name.to_string(), idx);
            }
        }
    }

    fn lookup_row_node(&self, name: &str) -> Option<usize> {
        if name == self.root_name() {
            return Some(ROOT);
        }
        self.by_name.get(name).copied()
    }

    fn resolve_advisee(&mut self, name: &str) -> usize {
        if let Some(idx) = self.lookup_row_node(name) {
            return idx;
        }
        if let Some(&idx) = self.synthetic_by_name.get(name) {
            return idx;
        }
        let idx = self.drafts.len();
        self.drafts.push(Draft {
            name: name.to_string(),
            synthetic: true,
            ..Draft::default()
        });
        self.synthetic_by_name.insert(name.to_string(), idx);
        idx
    }

    /// Is `candidate` equal to `node` or one of its ancestors?
    fn is_self_or_ancestor(&self, candidate: usize, node: usize) -> bool {
        let mut cur = Some(node);
        while let Some(c) = cur {
            if c == candidate {
                return true;
            }
            cur = self.drafts[c].parent;
        }
        false
    }

    fn place(&mut self, parent: usize, child: usize) {
        if let Some(existing) = self.drafts[child].parent {
            log::warn!(
                "'{}' is already a student of '{}'; ignoring listing under '{}'",
                self.drafts[child].name,
                self.drafts[existing].name,
                self.drafts[parent].name
            );
            return;
        }
        if child == ROOT || self.is_self_or_ancestor(child, parent) {
            log::warn!(
                "listing '{}' under '{}' would create a cycle; skipped",
                self.drafts[child].name,
                self.drafts[parent].name
            );
            return;
        }
        self.drafts[child].parent = Some(parent);
        self.drafts[parent].children.push(child);
    }

    /// Re-index the reachable part in pre-order and assign leaf values.
    fn finish(self) -> ChartTree {
        let mut nodes: Vec<PersonNode> = Vec::new();
        let mut drafts: Vec<Option<Draft>> = self.drafts.into_iter().map(Some).collect();

        // (draft index, new parent id)
        let mut stack: Vec<(usize, Option<NodeId>)> = vec![(ROOT, None)];
        while let Some((idx, parent)) = stack.pop() {
            let Some(d) = drafts[idx].take() else { continue };
            let id = NodeId(nodes.len());
            if let Some(p) = parent {
                nodes[p.0].children.push(id);
            }
            // Push in reverse so children come out in listing order.
            for &c in d.children.iter().rev() {
                stack.push((c, Some(id)));
            }
            nodes.push(PersonNode {
                id,
                name: d.name,
                email: d.email,
                current_role: d.current_role,
                start_year: d.start_year,
                end_year: d.end_year,
                children: Vec::new(),
                parent,
                value: if d.children.is_empty() { Some(1.0) } else { None },
                synthetic: d.synthetic,
            });
        }

        ChartTree { root: NodeId(ROOT), nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::parse_sheet;

    fn row(cells: &[(&str, &str)]) -> SheetRow {
        cells.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn names(tree: &ChartTree, id: NodeId) -> Vec<&str> {
        tree.nodes[id.0].children.iter().map(|c| tree.nodes[c.0].name.as_str()).collect()
    }

    #[test]
    fn test_advisor_with_two_students() {
        let rows = vec![
            row(&[("Name", "A"), ("PhDStudents", "B;C")]),
            row(&[("Name", "B"), ("PhDStudents", "")]),
            row(&[("Name", "C"), ("PhDStudents", "")]),
        ];
        let tree = build_tree(&rows, &headers(&["Name", "PhDStudents"]), &TreeConfig::default());

        assert_eq!(tree.root().name, "John Stasko");
        assert_eq!(names(&tree, tree.root), vec!["A"]);
        let a = tree.find("A").unwrap();
        assert_eq!(names(&tree, a.id), vec!["B", "C"]);
        assert_eq!(a.value, None);
        assert_eq!(tree.find("B").unwrap().value, Some(1.0));
        assert_eq!(tree.find("C").unwrap().value, Some(1.0));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_empty_rows_give_bare_root() {
        let tree = build_tree(&[], &headers(&["Name"]), &TreeConfig::default());
        assert_eq!(tree.len(), 1);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().value, Some(1.0));
        assert_eq!(tree.root().email.as_deref(), Some("stasko@cc.gatech.edu"));
    }

    #[test]
    fn test_unknown_advisee_becomes_synthetic_leaf() {
        let rows = vec![row(&[("Name", "A"), ("PhD Students", "D")])];
        let tree = build_tree(&rows, &headers(&["Name", "PhD Students"]), &TreeConfig::default());
        let d = tree.find("D").unwrap();
        assert!(d.synthetic);
        assert!(d.is_leaf());
        assert_eq!(d.value, Some(1.0));
        assert_eq!(d.email, None);
        assert_eq!(d.parent, Some(tree.find("A").unwrap().id));
    }

    #[test]
    fn test_row_backed_student_is_never_synthesized() {
        // D has a row of its own further down: all row nodes exist before any
        // link is made, so A links the row-backed D and D keeps its students.
        let rows = vec![
            row(&[("Name", "A"), ("PhD Students", "D")]),
            row(&[("Name", "D"), ("PhD Students", "E"), ("Email", "d@x.org")]),
        ];
        let hdr = headers(&["Name", "PhD Students", "Email"]);
        let tree = build_tree(&rows, &hdr, &TreeConfig::default());
        let d = tree.find("D").unwrap();
        assert!(!d.synthetic);
        assert_eq!(d.email.as_deref(), Some("d@x.org"));
        assert_eq!(names(&tree, d.id), vec!["E"]);
        assert!(tree.find("E").unwrap().synthetic);
        assert_eq!(tree.nodes.iter().filter(|n| n.name == "D").count(), 1);
    }

    #[test]
    fn test_name_collision_last_row_wins() {
        let rows = vec![
            row(&[("Name", "X"), ("Email", "first@x.org"), ("PhD Students", "P")]),
            row(&[("Name", " X "), ("Email", "second@x.org"), ("PhD Students", "Q")]),
        ];
        let hdr = headers(&["Name", "Email", "PhD Students"]);
        let tree = build_tree(&rows, &hdr, &TreeConfig::default());
        let x = tree.find("X").unwrap();
        assert_eq!(x.email.as_deref(), Some("second@x.org"));
        // Students from both rows, one node, attached to the root once.
        assert_eq!(names(&tree, x.id), vec!["P", "Q"]);
        assert_eq!(names(&tree, tree.root), vec!["X"]);
    }

    #[test]
    fn test_nameless_rows_are_skipped() {
        // The nameless row lists A, but it is not an advisee source either.
        let rows = vec![
            row(&[("Name", "  "), ("PhD Students", "A;Z")]),
            row(&[("Name", "A"), ("PhD Students", "")]),
        ];
        let tree = build_tree(&rows, &headers(&["Name", "PhD Students"]), &TreeConfig::default());
        assert_eq!(names(&tree, tree.root), vec!["A"]);
        assert!(tree.find("Z").is_none());
    }

    #[test]
    fn test_advisee_is_not_promoted_to_root() {
        let rows = vec![
            row(&[("Name", "B"), ("PhD Students", "")]),
            row(&[("Name", "A"), ("PhD Students", "B")]),
        ];
        let tree = build_tree(&rows, &headers(&["Name", "PhD Students"]), &TreeConfig::default());
        assert_eq!(names(&tree, tree.root), vec!["A"]);
        assert_eq!(tree.find("B").unwrap().parent, Some(tree.find("A").unwrap().id));
    }

    #[test]
    fn test_shared_student_placed_once() {
        let rows = vec![
            row(&[("Name", "A"), ("PhD Students", "S")]),
            row(&[("Name", "B"), ("PhD Students", "S")]),
            row(&[("Name", "S"), ("PhD Students", "")]),
        ];
        let tree = build_tree(&rows, &headers(&["Name", "PhD Students"]), &TreeConfig::default());
        assert_eq!(tree.nodes.iter().filter(|n| n.name == "S").count(), 1);
        assert_eq!(names(&tree, tree.find("A").unwrap().id), vec!["S"]);
        assert!(tree.find("B").unwrap().is_leaf());
    }

    #[test]
    fn test_self_listing_is_kept_as_advisee_but_not_linked() {
        // A lists itself: it counts as an advisee (so it is not a root child),
        // but the self link is never made.
        let rows = vec![
            row(&[("Name", "A"), ("PhD Students", "A")]),
            row(&[("Name", "B"), ("PhD Students", "A")]),
        ];
        let tree = build_tree(&rows, &headers(&["Name", "PhD Students"]), &TreeConfig::default());
        let a = tree.find("A").unwrap();
        assert!(a.is_leaf());
        assert_eq!(a.parent, Some(tree.find("B").unwrap().id));
        assert_eq!(names(&tree, tree.root), vec!["B"]);
    }

    #[test]
    fn test_mutual_listing_does_not_loop() {
        let rows = vec![
            row(&[("Name", "R"), ("PhD Students", "A")]),
            row(&[("Name", "A"), ("PhD Students", "B")]),
            row(&[("Name", "B"), ("PhD Students", "A")]),
        ];
        let tree = build_tree(&rows, &headers(&["Name", "PhD Students"]), &TreeConfig::default());
        assert_eq!(tree.len(), 4);
        assert_eq!(names(&tree, tree.find("A").unwrap().id), vec!["B"]);
        assert!(tree.find("B").unwrap().is_leaf());
    }

    #[test]
    fn test_root_row_folds_into_root() {
        let rows = vec![
            row(&[("Name", "John Stasko"), ("PhD Students", "A"), ("Email", "other@x.org")]),
            row(&[("Name", "A"), ("PhD Students", "")]),
        ];
        let hdr = headers(&["Name", "PhD Students", "Email"]);
        let tree = build_tree(&rows, &hdr, &TreeConfig::default());
        assert_eq!(tree.len(), 2);
        assert_eq!(names(&tree, tree.root), vec!["A"]);
        assert_eq!(tree.root().email.as_deref(), Some("stasko@cc.gatech.edu"));
    }

    #[test]
    fn test_ids_are_preorder() {
        let sheet = parse_sheet("Name,PhD Students\nA,B;C\nB,D\nE,\n").unwrap();
        let tree = build_tree(&sheet.rows, &sheet.headers, &TreeConfig::default());
        let order: Vec<&str> = tree.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(order, vec!["John Stasko", "A", "B", "D", "C", "E"]);
        for (i, n) in tree.nodes.iter().enumerate() {
            assert_eq!(n.id, NodeId(i));
        }
    }

    #[test]
    fn test_chart_data_export() {
        let sheet = parse_sheet("Name,PhD Students,Email\nA,B,a@x.org\n").unwrap();
        let tree = build_tree(&sheet.rows, &sheet.headers, &TreeConfig::default());
        let json = serde_json::to_value(tree.to_chart_data()).unwrap();
        assert_eq!(json["name"], "John Stasko");
        assert_eq!(json["children"][0]["email"], "a@x.org");
        assert_eq!(json["children"][0]["children"][0]["name"], "B");
        assert_eq!(json["children"][0]["children"][0]["value"], 1.0);
        assert!(json["children"][0].get("value").is_none());
    }
}
