//! The sparse compaction graph. Its nodes are the vertices of the layered
//! graph, except that all of the inner dummies of a segment collapse into one
//! node that stands for the whole segment. An edge (a, b) says that a is the
//! left neighbor of b in some layer, so b must be placed at least the minimal
//! distance to the right of a. The graph is built once and then only read.

use crate::adt::dag::NodeHandle;
use crate::topo::graph::{LayeredGraph, SegmentId, VertexKind};
use std::collections::HashSet;

/// A node of the compaction graph.
#[derive(Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, Debug)]
pub enum Data {
    Vertex(NodeHandle),
    Segment(SegmentId),
}

#[derive(Debug)]
pub struct CompactionGraph {
    // Left neighbors, indexed by the data index.
    preds: Vec<Vec<Data>>,
    // Right neighbors, indexed by the data index.
    succs: Vec<Vec<Data>>,
    // Data indices of segments start after the vertices.
    num_vertices: usize,
    num_edges: usize,
}

impl CompactionGraph {
    /// \returns the compaction node that represents \p node.
    pub fn data_of(g: &LayeredGraph, node: NodeHandle) -> Data {
        match g.kind(node) {
            VertexKind::Dummy(Some(seg)) => Data::Segment(seg),
            VertexKind::Original
            | VertexKind::Dummy(None)
            | VertexKind::P(_)
            | VertexKind::Q(_) => Data::Vertex(node),
        }
    }

    pub fn build(g: &LayeredGraph) -> Self {
        let num_vertices = g.num_nodes();
        let size = num_vertices + g.segments().len();
        let mut res = Self {
            preds: vec![Vec::new(); size],
            succs: vec![Vec::new(); size],
            num_vertices,
            num_edges: 0,
        };

        let mut seen: HashSet<(Data, Data)> = HashSet::new();
        for row in g.dag.rows() {
            for pair in row.windows(2) {
                let left = Self::data_of(g, pair[0]);
                let right = Self::data_of(g, pair[1]);
                assert!(left != right, "A segment can't be its own neighbor");
                if seen.insert((left, right)) {
                    res.add_edge(left, right);
                }
            }
        }
        res
    }

    fn index(&self, d: Data) -> usize {
        match d {
            Data::Vertex(node) => node.get_index(),
            Data::Segment(seg) => self.num_vertices + seg.get_index(),
        }
    }

    fn add_edge(&mut self, left: Data, right: Data) {
        let l = self.index(left);
        let r = self.index(right);
        self.succs[l].push(right);
        self.preds[r].push(left);
        self.num_edges += 1;
    }

    /// \returns the nodes that must be placed to the left of \p d.
    pub fn in_edges(&self, d: Data) -> &[Data] {
        &self.preds[self.index(d)]
    }

    /// \returns the nodes that must be placed to the right of \p d.
    pub fn out_edges(&self, d: Data) -> &[Data] {
        &self.succs[self.index(d)]
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }
}

#[cfg(test)]
use crate::core::geometry::Point;

#[test]
fn test_segment_collapses() {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(4.);
    let a = g.add_node(0, sz);
    let d0 = g.add_dummy(1);
    let x1 = g.add_node(1, sz);
    let d1 = g.add_dummy(2);
    let x2 = g.add_node(2, sz);
    let d2 = g.add_dummy(3);
    let x3 = g.add_node(3, sz);
    let b = g.add_node(4, sz);
    g.add_edge(a, b, &[d0, d1, d2]).unwrap();

    let cg = CompactionGraph::build(&g);
    let seg = Data::Segment(SegmentId::new(0));
    // The inner dummy is represented by the segment node.
    assert_eq!(CompactionGraph::data_of(&g, d1), seg);
    assert_eq!(cg.out_edges(seg), &[Data::Vertex(x2)]);
    assert_eq!(cg.in_edges(Data::Vertex(x1)), &[Data::Vertex(d0)]);
    assert_eq!(cg.in_edges(Data::Vertex(x3)), &[Data::Vertex(d2)]);
    assert_eq!(cg.num_edges(), 3);
}

#[test]
fn test_no_duplicate_edges() {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(4.);
    let a = g.add_node(0, sz);
    let p0 = g.add_dummy(1);
    let p1 = g.add_dummy(2);
    let p2 = g.add_dummy(3);
    let p3 = g.add_dummy(4);
    let b = g.add_node(5, sz);
    g.add_edge(a, b, &[p0, p1, p2, p3]).unwrap();
    let c = g.add_node(0, sz);
    let r1 = g.add_dummy(1);
    let r2 = g.add_node(2, sz);
    g.add_edge(c, r2, &[r1]).unwrap();
    let r3 = g.add_node(3, sz);

    let cg = CompactionGraph::build(&g);
    let seg = Data::Segment(SegmentId::new(0));
    // The segment is left of r2 and r3, and each pair is recorded once.
    assert_eq!(cg.out_edges(seg), &[Data::Vertex(r2), Data::Vertex(r3)]);
    assert_eq!(cg.in_edges(Data::Vertex(r2)), &[seg]);
    assert_eq!(cg.out_edges(Data::Vertex(a)), &[Data::Vertex(c)]);
}
