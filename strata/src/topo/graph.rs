//! This module the implementation of LayeredGraph, which is the data-structure
//! that the caller fills with an already layered and ordered graph. The
//! LayeredGraph uses a DAG to represent the relationships between adjacent
//! layers. Long edges are split by the caller into dummy vertices. A chain of
//! two or more dummies becomes a segment that is anchored by a P-vertex at the
//! top and a Q-vertex at the bottom.

#[cfg(feature = "log")]
extern crate log;

use crate::adt::dag::{NodeHandle, NodeIterator, DAG};
use crate::core::base::LayoutDirection;
use crate::core::error::{Error, Result};
use crate::core::geometry::{clamp_non_negative, Point};

/// Identifies a segment (the rigid dummy chain of a long edge).
#[derive(Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, Debug)]
pub struct SegmentId {
    idx: usize,
}

impl SegmentId {
    pub fn new(idx: usize) -> Self {
        Self { idx }
    }
    pub fn get_index(&self) -> usize {
        self.idx
    }
}

/// Identifies an original edge of the graph.
#[derive(Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, Debug)]
pub struct EdgeHandle {
    idx: usize,
}

impl EdgeHandle {
    pub fn new(idx: usize) -> Self {
        Self { idx }
    }
    pub fn get_index(&self) -> usize {
        self.idx
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    /// A vertex that the caller wants to draw.
    Original,
    /// A bend point of a long edge. A dummy that is not part of a segment is
    /// a relay vertex (the only bend point of its edge).
    Dummy(Option<SegmentId>),
    /// The top end of a segment.
    P(SegmentId),
    /// The bottom end of a segment.
    Q(SegmentId),
}

impl VertexKind {
    pub fn is_original(&self) -> bool {
        matches!(self, VertexKind::Original)
    }

    /// \returns True for every kind of bend point (relays, inner dummies and
    /// segment ends).
    pub fn is_dummy(&self) -> bool {
        !self.is_original()
    }

    /// \returns the segment that this vertex belongs to, if any.
    pub fn segment(&self) -> Option<SegmentId> {
        match self {
            VertexKind::Original => None,
            VertexKind::Dummy(seg) => *seg,
            VertexKind::P(seg) | VertexKind::Q(seg) => Some(*seg),
        }
    }
}

#[derive(Debug, Clone)]
struct Vertex {
    kind: VertexKind,
    size: Point,
}

/// A rigid chain of dummies. Owns the handles of its two ends.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub p: NodeHandle,
    pub q: NodeHandle,
}

/// An original edge and the bend points that the layering inserted into it.
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: NodeHandle,
    pub to: NodeHandle,
    /// The dummy vertices, ordered from `from` to `to`.
    pub dummies: Vec<NodeHandle>,
}

#[derive(Debug)]
pub struct LayeredGraph {
    // Holds the kind and size of every vertex.
    vertices: Vec<Vertex>,
    // The original edges.
    edges: Vec<Edge>,
    // The dummy chains of two or more dummies.
    segments: Vec<Segment>,
    // Maps dummy vertices to the edge that claimed them.
    owner: Vec<Option<EdgeHandle>>,
    // Vertices with no edges that wait for a layer.
    isolated: Vec<NodeHandle>,
    // Representing the connections between vertices of adjacent layers, in
    // the top-down direction, as well as the layer order.
    pub dag: DAG,
}

impl LayeredGraph {
    pub fn new() -> Self {
        LayeredGraph {
            vertices: Vec::new(),
            edges: Vec::new(),
            segments: Vec::new(),
            owner: Vec::new(),
            isolated: Vec::new(),
            dag: DAG::new(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.dag.len()
    }

    pub fn num_levels(&self) -> usize {
        self.dag.num_levels()
    }

    pub fn iter_nodes(&self) -> NodeIterator {
        self.dag.iter()
    }

    pub fn kind(&self, node: NodeHandle) -> VertexKind {
        self.vertices[node.get_index()].kind
    }

    pub fn size(&self, node: NodeHandle) -> Point {
        self.vertices[node.get_index()].size
    }

    /// \returns the size of \p node in layout space: x is the extent along
    /// the slice axis and y is the extent along the layer axis.
    pub fn extent(&self, node: NodeHandle, dir: LayoutDirection) -> Point {
        let size = self.size(node);
        if dir.is_vertical() {
            size
        } else {
            size.transpose()
        }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, edge: EdgeHandle) -> &Edge {
        &self.edges[edge.get_index()]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, seg: SegmentId) -> &Segment {
        &self.segments[seg.get_index()]
    }

    /// \returns the vertices that are waiting to be reinserted.
    pub fn isolated(&self) -> &[NodeHandle] {
        &self.isolated
    }

    /// \returns True if \p a and \p b are consecutive dummies of the same
    /// segment.
    pub fn is_inner_segment_edge(&self, a: NodeHandle, b: NodeHandle) -> bool {
        match (self.kind(a).segment(), self.kind(b).segment()) {
            (Some(s0), Some(s1)) => s0 == s1,
            _ => false,
        }
    }

    fn push_vertex(&mut self, kind: VertexKind, size: Point) {
        let size = Point::new(clamp_non_negative(size.x), clamp_non_negative(size.y));
        self.vertices.push(Vertex { kind, size });
        self.owner.push(None);
    }

    /// Add an original vertex at the end of the layer \p layer.
    /// \returns a handle to the vertex.
    pub fn add_node(&mut self, layer: usize, size: Point) -> NodeHandle {
        let res = self.dag.new_node(layer);
        assert!(res.get_index() == self.vertices.len());
        self.push_vertex(VertexKind::Original, size);
        res
    }

    /// Add a zero sized dummy vertex at the end of the layer \p layer.
    pub fn add_dummy(&mut self, layer: usize) -> NodeHandle {
        self.add_dummy_with_size(layer, Point::zero())
    }

    pub fn add_dummy_with_size(&mut self, layer: usize, size: Point) -> NodeHandle {
        let res = self.dag.new_node(layer);
        assert!(res.get_index() == self.vertices.len());
        self.push_vertex(VertexKind::Dummy(None), size);
        res
    }

    /// Add an original vertex without edges. The placer will pick a layer
    /// for it.
    pub fn add_isolated(&mut self, size: Point) -> NodeHandle {
        let res = self.dag.new_unranked_node();
        assert!(res.get_index() == self.vertices.len());
        self.push_vertex(VertexKind::Original, size);
        self.isolated.push(res);
        res
    }

    fn check_handle(&self, node: NodeHandle) -> Result<()> {
        if !self.dag.contains(node) {
            return Err(Error::UnknownVertex(node.get_index()));
        }
        Ok(())
    }

    fn check_endpoint(&self, node: NodeHandle) -> Result<()> {
        self.check_handle(node)?;
        if !self.kind(node).is_original() {
            return Err(Error::NotOriginal(node.get_index()));
        }
        if !self.dag.is_ranked(node) {
            return Err(Error::IsolatedEndpoint(node.get_index()));
        }
        Ok(())
    }

    /// Add an edge from \p from to \p to that passes through the dummy
    /// vertices \p via (in the order of the edge). Every hop of the path must
    /// move by exactly one layer, in the same direction.
    pub fn add_edge(
        &mut self,
        from: NodeHandle,
        to: NodeHandle,
        via: &[NodeHandle],
    ) -> Result<EdgeHandle> {
        self.check_endpoint(from)?;
        self.check_endpoint(to)?;
        if from == to {
            return Err(Error::SelfEdge(from.get_index()));
        }
        for (i, dummy) in via.iter().enumerate() {
            self.check_handle(*dummy)?;
            let free = self.kind(*dummy) == VertexKind::Dummy(None)
                && self.owner[dummy.get_index()].is_none()
                && !via[..i].contains(dummy);
            if !free {
                return Err(Error::NotAFreeDummy(dummy.get_index()));
            }
        }

        let mut path = Vec::with_capacity(via.len() + 2);
        path.push(from);
        path.extend_from_slice(via);
        path.push(to);

        // All hops must go in the direction of the first hop.
        let downward = self.dag.level(to) > self.dag.level(from);
        for hop in path.windows(2) {
            let l0 = self.dag.level(hop[0]);
            let l1 = self.dag.level(hop[1]);
            let ok = if downward { l0 + 1 == l1 } else { l1 + 1 == l0 };
            if !ok {
                return Err(Error::LayerGap {
                    from: hop[0].get_index(),
                    to: hop[1].get_index(),
                    from_layer: l0,
                    to_layer: l1,
                });
            }
        }

        // The dag and the segments see the path in the top-down direction.
        if !downward {
            path.reverse();
        }
        for hop in path.windows(2) {
            self.dag.add_edge(hop[0], hop[1]);
        }

        let handle = EdgeHandle::new(self.edges.len());
        let chain = &path[1..path.len() - 1];
        if chain.len() >= 2 {
            let seg = SegmentId::new(self.segments.len());
            let p = chain[0];
            let q = chain[chain.len() - 1];
            self.segments.push(Segment { p, q });
            for dummy in chain {
                self.vertices[dummy.get_index()].kind = VertexKind::Dummy(Some(seg));
            }
            self.vertices[p.get_index()].kind = VertexKind::P(seg);
            self.vertices[q.get_index()].kind = VertexKind::Q(seg);
        }
        for dummy in via {
            self.owner[dummy.get_index()] = Some(handle);
        }

        self.edges.push(Edge {
            from,
            to,
            dummies: via.to_vec(),
        });
        Ok(handle)
    }

    /// \returns True if the edge points from a lower layer to a higher one.
    pub fn is_reversed(&self, edge: EdgeHandle) -> bool {
        let e = self.edge(edge);
        self.dag.level(e.from) > self.dag.level(e.to)
    }

    /// Make sure that the graph is ready for placement.
    pub fn validate(&self) -> Result<()> {
        for node in self.iter_nodes() {
            if self.kind(node).is_dummy() && self.owner[node.get_index()].is_none() {
                return Err(Error::DanglingDummy(node.get_index()));
            }
        }
        self.dag.verify();
        Ok(())
    }

    /// Distribute the vertices that have no edges between the layers in a
    /// round-robin order, appending each one to the end of its layer.
    /// \returns the number of vertices that were placed.
    pub fn reinsert_isolated(&mut self) -> usize {
        let pending = std::mem::take(&mut self.isolated);
        let num_levels = self.dag.num_levels().max(1);
        for (i, node) in pending.iter().enumerate() {
            self.dag.append_to_level(*node, i % num_levels);
        }
        #[cfg(feature = "log")]
        log::info!("Reinserted {} isolated vertices.", pending.len());
        pending.len()
    }
}

impl Default for LayeredGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn test_segment_classification() {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let d0 = g.add_dummy(1);
    let d1 = g.add_dummy(2);
    let d2 = g.add_dummy(3);
    let b = g.add_node(4, sz);
    let e = g.add_edge(a, b, &[d0, d1, d2]).unwrap();

    assert_eq!(g.segments().len(), 1);
    let seg = SegmentId::new(0);
    assert_eq!(g.kind(d0), VertexKind::P(seg));
    assert_eq!(g.kind(d1), VertexKind::Dummy(Some(seg)));
    assert_eq!(g.kind(d2), VertexKind::Q(seg));
    assert!(g.is_inner_segment_edge(d0, d1));
    assert!(!g.is_inner_segment_edge(a, d0));
    assert!(!g.is_reversed(e));
    assert_eq!(g.dag.single_succ(a), Some(d0));
    g.validate().unwrap();
}

#[test]
fn test_reversed_edge_segment() {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let d0 = g.add_dummy(1);
    let d1 = g.add_dummy(2);
    let b = g.add_node(3, sz);
    // The edge goes from the bottom layer to the top layer.
    let e = g.add_edge(b, a, &[d1, d0]).unwrap();
    assert!(g.is_reversed(e));
    // P is still the top end of the chain.
    assert!(matches!(g.kind(d0), VertexKind::P(_)));
    assert!(matches!(g.kind(d1), VertexKind::Q(_)));
    assert_eq!(g.dag.single_succ(a), Some(d0));
    assert_eq!(g.edge(e).dummies, vec![d1, d0]);
}

#[test]
fn test_relay_vertex() {
    let mut g = LayeredGraph::new();
    let a = g.add_node(0, Point::splat(1.));
    let r = g.add_dummy(1);
    let b = g.add_node(2, Point::splat(1.));
    g.add_edge(a, b, &[r]).unwrap();
    assert_eq!(g.kind(r), VertexKind::Dummy(None));
    assert!(g.segments().is_empty());
    g.validate().unwrap();
}

#[test]
fn test_edge_errors() {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(1.);
    let a = g.add_node(0, sz);
    let b = g.add_node(2, sz);
    let c = g.add_node(1, sz);
    let d = g.add_dummy(1);
    let z = g.add_isolated(sz);

    assert!(matches!(g.add_edge(a, a, &[]), Err(Error::SelfEdge(_))));
    assert!(matches!(g.add_edge(a, b, &[]), Err(Error::LayerGap { .. })));
    assert!(matches!(g.add_edge(a, b, &[c]), Err(Error::NotAFreeDummy(_))));
    assert!(matches!(g.add_edge(a, d, &[]), Err(Error::NotOriginal(_))));
    assert!(matches!(g.add_edge(a, z, &[]), Err(Error::IsolatedEndpoint(_))));
    assert!(matches!(
        g.add_edge(a, NodeHandle::new(99), &[]),
        Err(Error::UnknownVertex(99))
    ));
    assert!(matches!(g.validate(), Err(Error::DanglingDummy(_))));

    g.add_edge(a, b, &[d]).unwrap();
    // The dummy is taken now.
    assert!(matches!(g.add_edge(a, b, &[d]), Err(Error::NotAFreeDummy(_))));
}

#[test]
fn test_reinsert_isolated_round_robin() {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(2.);
    let a = g.add_node(0, sz);
    let b = g.add_node(1, sz);
    g.add_edge(a, b, &[]).unwrap();
    let z0 = g.add_isolated(sz);
    let z1 = g.add_isolated(sz);
    let z2 = g.add_isolated(sz);

    assert_eq!(g.reinsert_isolated(), 3);
    assert!(g.isolated().is_empty());
    assert_eq!(g.dag.level(z0), 0);
    assert_eq!(g.dag.level(z1), 1);
    assert_eq!(g.dag.level(z2), 0);
    assert_eq!(g.dag.row(0), &vec![a, z0, z2]);
    g.validate().unwrap();
}

#[test]
fn test_reinsert_into_empty_graph() {
    let mut g = LayeredGraph::new();
    let z0 = g.add_isolated(Point::splat(2.));
    let z1 = g.add_isolated(Point::splat(2.));
    g.reinsert_isolated();
    assert_eq!(g.num_levels(), 1);
    assert_eq!(g.dag.position(z0), 0);
    assert_eq!(g.dag.position(z1), 1);
}
