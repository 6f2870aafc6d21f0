//! The layered DAG. Nodes live in an arena and are referred to by handles.
//! Every placed node sits in a row (a layer) at a fixed index, and edges
//! only connect a row to the row right below it. The order inside a row is
//! decided by the caller; this module records it and answers position queries
//! in constant time.

/// A handle to a node in the arena.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash, Debug)]
pub struct NodeHandle {
    idx: usize,
}

impl NodeHandle {
    pub fn new(idx: usize) -> Self {
        NodeHandle { idx }
    }
    pub fn get_index(&self) -> usize {
        self.idx
    }
}

impl From<usize> for NodeHandle {
    fn from(idx: usize) -> Self {
        NodeHandle::new(idx)
    }
}

impl std::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.idx)
    }
}

/// Where a node sits: its row and its index inside the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    level: usize,
    pos: usize,
}

#[derive(Debug, Default)]
struct Node {
    // Neighbors in the row above.
    up: Vec<NodeHandle>,
    // Neighbors in the row below.
    down: Vec<NodeHandle>,
    // None until the node is appended to a row.
    slot: Option<Slot>,
}

pub type Rows = Vec<Vec<NodeHandle>>;

#[derive(Debug, Default)]
pub struct DAG {
    nodes: Vec<Node>,
    rows: Rows,
}

/// Iterates over the handles of all of the nodes, in creation order.
#[derive(Debug)]
pub struct NodeIterator {
    range: std::ops::Range<usize>,
}

impl Iterator for NodeIterator {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        self.range.next().map(NodeHandle::new)
    }
}

impl DAG {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> NodeIterator {
        NodeIterator {
            range: 0..self.nodes.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeHandle) -> bool {
        node.idx < self.nodes.len()
    }

    fn slot(&self, node: NodeHandle) -> Slot {
        assert!(self.contains(node), "Node not in the dag");
        self.nodes[node.idx].slot.expect("Node is not ranked")
    }

    /// Create a node at the end of the row \p level. Missing rows are
    /// created on the way.
    pub fn new_node(&mut self, level: usize) -> NodeHandle {
        let node = self.new_unranked_node();
        self.append_to_level(node, level);
        node
    }

    /// Create a node that is not in any row yet.
    pub fn new_unranked_node(&mut self) -> NodeHandle {
        self.nodes.push(Node::default());
        NodeHandle::new(self.nodes.len() - 1)
    }

    /// Append the unranked node \p elem to the end of the row \p level.
    pub fn append_to_level(&mut self, elem: NodeHandle, level: usize) {
        assert!(!self.is_ranked(elem), "Node is already ranked");
        if self.rows.len() <= level {
            self.rows.resize_with(level + 1, Vec::new);
        }
        let pos = self.rows[level].len();
        self.rows[level].push(elem);
        self.nodes[elem.idx].slot = Some(Slot { level, pos });
    }

    /// Connect \p from to the node \p to in the row right below it.
    pub fn add_edge(&mut self, from: NodeHandle, to: NodeHandle) {
        assert_eq!(
            self.level(from) + 1,
            self.level(to),
            "Edges must connect adjacent levels"
        );
        self.nodes[from.idx].down.push(to);
        self.nodes[to.idx].up.push(from);
    }

    /// \returns the neighbors in the row below.
    pub fn successors(&self, from: NodeHandle) -> &Vec<NodeHandle> {
        &self.nodes[from.idx].down
    }

    /// \returns the neighbors in the row above.
    pub fn predecessors(&self, from: NodeHandle) -> &Vec<NodeHandle> {
        &self.nodes[from.idx].up
    }

    pub fn single_pred(&self, from: NodeHandle) -> Option<NodeHandle> {
        match self.nodes[from.idx].up.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn single_succ(&self, from: NodeHandle) -> Option<NodeHandle> {
        match self.nodes[from.idx].down.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Check the edges against the rows and the rows against the cached
    /// slots. Panics on the first inconsistency.
    pub fn verify(&self) {
        for (i, node) in self.nodes.iter().enumerate() {
            for dest in &node.down {
                assert!(self.contains(*dest), "Edge to an unknown node");
                assert_eq!(
                    self.level(NodeHandle::new(i)) + 1,
                    self.level(*dest),
                    "Edges must connect adjacent levels"
                );
            }
        }

        let mut in_rows = 0;
        for (level, row) in self.rows.iter().enumerate() {
            for (pos, elem) in row.iter().enumerate() {
                assert_eq!(self.nodes[elem.idx].slot, Some(Slot { level, pos }));
            }
            in_rows += row.len();
        }
        let ranked = self.nodes.iter().filter(|n| n.slot.is_some()).count();
        assert_eq!(in_rows, ranked, "A ranked node is missing from its row");
    }

    pub fn num_levels(&self) -> usize {
        self.rows.len()
    }

    /// \returns the nodes of the row \p level, in order.
    pub fn row(&self, level: usize) -> &Vec<NodeHandle> {
        assert!(level < self.rows.len(), "Invalid rank");
        &self.rows[level]
    }

    pub fn rows(&self) -> &Rows {
        &self.rows
    }

    pub fn is_ranked(&self, node: NodeHandle) -> bool {
        self.nodes[node.idx].slot.is_some()
    }

    /// \returns the row of \p node.
    pub fn level(&self, node: NodeHandle) -> usize {
        self.slot(node).level
    }

    /// \returns the index of \p node inside its row.
    pub fn position(&self, node: NodeHandle) -> usize {
        self.slot(node).pos
    }

    /// \returns True if \p elem is the last node in the row \p level.
    pub fn is_last_in_row(&self, elem: NodeHandle, level: usize) -> bool {
        self.rows
            .get(level)
            .and_then(|row| row.last())
            .map_or(false, |last| *last == elem)
    }
}

#[test]
fn test_simple_construction() {
    let mut g = DAG::new();
    let h0 = g.new_node(0);
    let h1 = g.new_node(1);
    let h2 = g.new_node(1);
    let h3 = g.new_node(2);
    g.verify();

    assert_ne!(h0, h1);
    assert_ne!(h1, h2);

    g.add_edge(h0, h1);
    g.add_edge(h0, h2);
    g.add_edge(h2, h3);
    g.verify();

    assert_eq!(g.num_levels(), 3);
    assert_eq!(g.position(h1), 0);
    assert_eq!(g.position(h2), 1);
    assert_eq!(g.single_pred(h3), Some(h2));
    assert_eq!(g.single_succ(h0), None);
    assert!(g.is_last_in_row(h2, 1));
    assert!(!g.is_last_in_row(h2, 7));
}

#[test]
fn test_unranked_nodes() {
    let mut g = DAG::new();
    let h0 = g.new_node(0);
    let h1 = g.new_unranked_node();
    assert!(!g.is_ranked(h1));
    g.verify();

    // Appending to a row that does not exist yet creates the rows before it.
    g.append_to_level(h1, 2);
    assert_eq!(g.level(h1), 2);
    assert_eq!(g.position(h1), 0);
    assert!(g.row(1).is_empty());
    assert_eq!(g.row(0), &vec![h0]);
    assert_eq!(g.iter().collect::<Vec<_>>(), vec![h0, h1]);
    g.verify();
}

#[test]
#[should_panic(expected = "Edges must connect adjacent levels")]
fn test_reject_long_edge() {
    let mut g = DAG::new();
    let h0 = g.new_node(0);
    let h1 = g.new_node(2);
    g.add_edge(h0, h1);
}
