//! This module implements the vertical alignment step of the Brandes and Kopf
//! paper "Fast and Simple Horizontal Coordinate Assignment." Every vertex is
//! either aligned with a median neighbor or starts a block of its own. The
//! dummies of a segment are always aligned with each other, so the long edge
//! stays straight.

use crate::adt::dag::NodeHandle;
use crate::core::base::{LayoutDirection, Mode, Side, NUM_MODES};
use crate::core::error::{Error, Result};
use crate::topo::graph::{LayeredGraph, VertexKind};
use std::collections::HashSet;

/// The per-mode bookkeeping of one vertex. Every field has one slot for each
/// of the four modes.
#[derive(Debug, Clone)]
pub struct VertexState {
    /// The first vertex of the block.
    pub root: [NodeHandle; NUM_MODES],
    /// The next vertex in the block. The last vertex points back at the root.
    pub align: [NodeHandle; NUM_MODES],
    /// The widest vertex in the block (kept on the root).
    pub block_width: [f64; NUM_MODES],
    /// The block that the spacing of this block bottoms out at.
    pub sink: [NodeHandle; NUM_MODES],
    /// The correction of the class that this sink represents.
    pub shift: [Option<f64>; NUM_MODES],
    /// The slice coordinate, or None before the block is placed.
    pub slice_position: [Option<f64>; NUM_MODES],
}

impl VertexState {
    fn new(node: NodeHandle) -> Self {
        Self {
            root: [node; NUM_MODES],
            align: [node; NUM_MODES],
            block_width: [0.; NUM_MODES],
            sink: [node; NUM_MODES],
            shift: [None; NUM_MODES],
            slice_position: [None; NUM_MODES],
        }
    }
}

/// The scratch state of all of the vertices.
#[derive(Debug)]
pub struct Scratch {
    states: Vec<VertexState>,
}

impl Scratch {
    pub fn new(num_nodes: usize) -> Self {
        let states = (0..num_nodes)
            .map(|i| VertexState::new(NodeHandle::from(i)))
            .collect();
        Self { states }
    }

    /// Wipe the slots of \p mode. Every vertex becomes a block of its own.
    pub fn reset(&mut self, g: &LayeredGraph, mode: Mode, dir: LayoutDirection) {
        let m = mode.index();
        for node in g.iter_nodes() {
            let state = &mut self.states[node.get_index()];
            state.root[m] = node;
            state.align[m] = node;
            state.block_width[m] = g.extent(node, dir).x;
            state.sink[m] = node;
            state.shift[m] = None;
            state.slice_position[m] = None;
        }
    }

    pub fn get(&self, node: NodeHandle) -> &VertexState {
        &self.states[node.get_index()]
    }

    pub fn get_mut(&mut self, node: NodeHandle) -> &mut VertexState {
        &mut self.states[node.get_index()]
    }

    pub fn root(&self, node: NodeHandle, m: usize) -> NodeHandle {
        self.get(node).root[m]
    }

    pub fn align(&self, node: NodeHandle, m: usize) -> NodeHandle {
        self.get(node).align[m]
    }

    /// \returns the computed coordinates of \p mode, indexed by vertex.
    pub fn slices(&self, mode: Mode) -> Vec<f64> {
        let m = mode.index();
        self.states
            .iter()
            .map(|s| s.slice_position[m].expect("Vertex was not placed"))
            .collect()
    }

    /// \returns the root of every vertex in \p mode.
    pub fn roots(&self, mode: Mode) -> Vec<NodeHandle> {
        self.states.iter().map(|s| s.root[mode.index()]).collect()
    }

    /// \returns the next block member of every vertex in \p mode.
    pub fn aligns(&self, mode: Mode) -> Vec<NodeHandle> {
        self.states.iter().map(|s| s.align[mode.index()]).collect()
    }

    /// Append \p v to the block that ends at \p neighbor.
    fn join(&mut self, neighbor: NodeHandle, v: NodeHandle, width: f64, m: usize) {
        let root = self.root(neighbor, m);
        debug_assert_eq!(self.align(neighbor, m), root, "Neighbor is taken");
        self.get_mut(neighbor).align[m] = v;
        let state = self.get_mut(v);
        state.root[m] = root;
        state.align[m] = root;
        let root_state = self.get_mut(root);
        root_state.block_width[m] = root_state.block_width[m].max(width);
    }
}

/// A set of top-down edges between two nodes in the graph.
pub type MarkedEdges = HashSet<(NodeHandle, NodeHandle)>;
// Represents an edge between two rows (index of the element in the row).
type EdgeIdxs = (usize, usize);

/// A conflict happens when the order of the indices in the row does
/// not match.
/// R1:  o  o         o  o
///       \\/        /    \
/// CROSS  \\       /      \
///       / \\     /   OK   \
/// R0:  o    o   o          o
/// \returns True if the edge \p edge_a crosses the edge \p edge_b.
/// Edges are represented as a pair of indices representing the index of the
/// src and dest node in the rows.
fn are_edges_crossing(edge_a: EdgeIdxs, edge_b: EdgeIdxs) -> bool {
    // Check if there is no conflict.
    let before = edge_a.0 < edge_b.0 && edge_a.1 < edge_b.1;
    let after = edge_a.0 > edge_b.0 && edge_a.1 > edge_b.1;
    !before && !after
}

/// Collects the edges that cross an inner segment edge (type 1 conflicts).
/// Those edges must never be used for alignment, or the block would cross
/// the straight segment. Two crossing segments can't both be straight, so
/// they are reported as an error.
pub fn mark_type1_conflicts(g: &LayeredGraph) -> Result<MarkedEdges> {
    let mut marked = MarkedEdges::new();
    if g.num_levels() == 0 {
        return Ok(marked);
    }

    for i in 0..g.num_levels() - 1 {
        let r0 = g.dag.row(i);
        let mut regular_edges: Vec<EdgeIdxs> = Vec::new();
        let mut inner_edges: Vec<EdgeIdxs> = Vec::new();
        for (idx0, elem) in r0.iter().enumerate() {
            for succ in g.dag.successors(*elem) {
                let idx1 = g.dag.position(*succ);
                if g.is_inner_segment_edge(*elem, *succ) {
                    inner_edges.push((idx0, idx1));
                } else {
                    regular_edges.push((idx0, idx1));
                }
            }
        }

        for (k, a) in inner_edges.iter().enumerate() {
            for b in inner_edges.iter().skip(k + 1) {
                if are_edges_crossing(*a, *b) {
                    let sa = g.kind(r0[a.0]).segment().map_or(0, |s| s.get_index());
                    let sb = g.kind(r0[b.0]).segment().map_or(0, |s| s.get_index());
                    return Err(Error::CrossingSegments(sa, sb));
                }
            }
        }

        let r1 = g.dag.row(i + 1);
        for reg in regular_edges.iter() {
            if inner_edges.iter().any(|inner| are_edges_crossing(*reg, *inner)) {
                marked.insert((r0[reg.0], r1[reg.1]));
            }
        }
    }

    #[cfg(feature = "log")]
    log::debug!("Marked {} edges that cross segments.", marked.len());
    Ok(marked)
}

/// \returns the one or two median indices of a list of \p k neighbors, in
/// the order in which they should be tried.
fn median_indices(k: usize, side: Side) -> Vec<usize> {
    assert!(k > 0, "No neighbors");
    let low = (k + 1) / 2 - 1;
    let high = (k + 2) / 2 - 1;
    if low == high {
        return vec![low];
    }
    match side {
        Side::Left => vec![low, high],
        Side::Right => vec![high, low],
    }
}

/// \returns True if \p pos is strictly past the cursor in the scan direction.
fn is_beyond(cursor: Option<usize>, pos: usize, side: Side) -> bool {
    match (cursor, side) {
        (None, _) => true,
        (Some(r), Side::Left) => pos > r,
        (Some(r), Side::Right) => pos < r,
    }
}

/// How a vertex takes part in the alignment of a specific mode.
enum Role {
    /// Picks a median neighbor.
    Alignable,
    /// Follows the segment neighbor that was already visited.
    Proxy(NodeHandle),
}

fn role_of(g: &LayeredGraph, v: NodeHandle, mode: Mode) -> Role {
    let upper = mode.edges.is_upper();
    let proxy = match g.kind(v) {
        VertexKind::Original | VertexKind::Dummy(None) => false,
        VertexKind::P(_) => !upper,
        VertexKind::Q(_) => upper,
        VertexKind::Dummy(Some(_)) => true,
    };
    if !proxy {
        return Role::Alignable;
    }
    let neighbor = if upper {
        g.dag.single_pred(v)
    } else {
        g.dag.single_succ(v)
    };
    Role::Proxy(neighbor.expect("Segment chain is broken"))
}

/// Build the blocks of \p mode. \returns the number of vertices that were
/// appended to some other block.
pub fn align_blocks(
    g: &LayeredGraph,
    marked: &MarkedEdges,
    scratch: &mut Scratch,
    mode: Mode,
    dir: LayoutDirection,
) -> usize {
    let m = mode.index();
    let upper = mode.edges.is_upper();
    let mut cnt = 0;

    let mut levels: Vec<usize> = (0..g.num_levels()).collect();
    if !upper {
        levels.reverse();
    }

    for level in levels {
        let mut row = g.dag.row(level).clone();
        if !mode.side.is_left() {
            row.reverse();
        }

        // The position of the last neighbor that was aligned to.
        let mut cursor: Option<usize> = None;

        for v in row {
            let width = g.extent(v, dir).x;
            match role_of(g, v, mode) {
                Role::Proxy(neighbor) => {
                    scratch.join(neighbor, v, width, m);
                    cursor = Some(g.dag.position(neighbor));
                    cnt += 1;
                }
                Role::Alignable => {
                    let mut neighbors = if upper {
                        g.dag.predecessors(v).clone()
                    } else {
                        g.dag.successors(v).clone()
                    };
                    if neighbors.is_empty() {
                        continue;
                    }
                    neighbors.sort_by_key(|n| g.dag.position(*n));

                    for idx in median_indices(neighbors.len(), mode.side) {
                        // Only align once.
                        if scratch.align(v, m) != v {
                            break;
                        }
                        let neighbor = neighbors[idx];
                        let edge = if upper { (neighbor, v) } else { (v, neighbor) };
                        if marked.contains(&edge) {
                            continue;
                        }
                        let pos = g.dag.position(neighbor);
                        if !is_beyond(cursor, pos, mode.side) {
                            continue;
                        }
                        scratch.join(neighbor, v, width, m);
                        cursor = Some(pos);
                        cnt += 1;
                    }
                }
            }
        }
    }

    #[cfg(feature = "log")]
    log::debug!("Mode {}: aligned {} vertices.", mode, cnt);
    cnt
}

#[cfg(test)]
use crate::core::base::EdgeSet;
#[cfg(test)]
use crate::core::geometry::Point;

#[cfg(test)]
fn run_alignment(g: &LayeredGraph) -> Scratch {
    let dir = LayoutDirection::TopToBottom;
    let marked = mark_type1_conflicts(g).unwrap();
    let mut scratch = Scratch::new(g.num_nodes());
    for mode in Mode::all().iter() {
        scratch.reset(g, *mode, dir);
        align_blocks(g, &marked, &mut scratch, *mode, dir);
    }
    scratch
}

#[test]
fn edge_crossing() {
    /*  X  */
    assert!(are_edges_crossing((0, 10), (10, 0)));
    /* | | */
    assert!(!are_edges_crossing((0, 0), (10, 10)));
    /* \ \ */
    assert!(!are_edges_crossing((10, 0), (13, 3)));
    /*  /\  */
    assert!(are_edges_crossing((0, 10), (13, 10)));
}

#[test]
fn test_median_indices() {
    assert_eq!(median_indices(1, Side::Left), vec![0]);
    assert_eq!(median_indices(3, Side::Right), vec![1]);
    assert_eq!(median_indices(2, Side::Left), vec![0, 1]);
    assert_eq!(median_indices(4, Side::Left), vec![1, 2]);
    assert_eq!(median_indices(4, Side::Right), vec![2, 1]);
}

#[test]
fn test_median_tie_break() {
    // Two parents above one child.
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let b = g.add_node(0, sz);
    let c = g.add_node(1, sz);
    g.add_edge(a, c, &[]).unwrap();
    g.add_edge(b, c, &[]).unwrap();

    let scratch = run_alignment(&g);
    let upper_left = Mode::new(Side::Left, EdgeSet::Upper).index();
    let upper_right = Mode::new(Side::Right, EdgeSet::Upper).index();
    // Left prefers the lower median, right prefers the higher one.
    assert_eq!(scratch.root(c, upper_left), a);
    assert_eq!(scratch.root(c, upper_right), b);
}

#[test]
fn test_alignments_do_not_cross() {
    // a-d and b-c cross. Only one of them can be used in each mode.
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let b = g.add_node(0, sz);
    let c = g.add_node(1, sz);
    let d = g.add_node(1, sz);
    g.add_edge(a, d, &[]).unwrap();
    g.add_edge(b, c, &[]).unwrap();

    let scratch = run_alignment(&g);
    let m = Mode::new(Side::Left, EdgeSet::Upper).index();
    assert_eq!(scratch.root(c, m), b);
    // d's only neighbor is left of the cursor.
    assert_eq!(scratch.root(d, m), d);
}

#[test]
fn test_segment_is_one_block() {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let p = g.add_dummy(1);
    let inner = g.add_dummy(2);
    let q = g.add_dummy(3);
    let b = g.add_node(4, sz);
    g.add_edge(a, b, &[p, inner, q]).unwrap();

    let scratch = run_alignment(&g);
    for mode in Mode::all().iter() {
        let m = mode.index();
        let root = scratch.root(p, m);
        assert_eq!(scratch.root(inner, m), root);
        assert_eq!(scratch.root(q, m), root);
        // The chain is closed and visits every member once.
        let mut w = root;
        let mut steps = 0;
        loop {
            w = scratch.align(w, m);
            steps += 1;
            if w == root {
                break;
            }
            assert!(steps <= g.num_levels());
        }
    }
}

#[test]
fn test_crossing_edge_is_marked() {
    // The edge x -> y crosses the inner edge between the two dummies.
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let x = g.add_node(0, sz);
    let p = g.add_dummy(1);
    let y0 = g.add_node(1, sz);
    let y = g.add_node(2, sz);
    let q = g.add_dummy(2);
    let b = g.add_node(3, sz);
    g.add_edge(a, b, &[p, q]).unwrap();
    g.add_edge(x, y0, &[]).unwrap();
    // y0 is right of p, and y is left of q.
    g.add_edge(y0, y, &[]).unwrap();

    let marked = mark_type1_conflicts(&g).unwrap();
    assert!(marked.contains(&(y0, y)));
    assert!(!marked.contains(&(x, y0)));
}

#[test]
fn test_crossing_segments_are_rejected() {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let b = g.add_node(0, sz);
    let pa = g.add_dummy(1);
    let pb = g.add_dummy(1);
    let qb = g.add_dummy(2);
    let qa = g.add_dummy(2);
    let c = g.add_node(3, sz);
    let d = g.add_node(3, sz);
    g.add_edge(a, c, &[pa, qa]).unwrap();
    g.add_edge(b, d, &[pb, qb]).unwrap();
    assert!(matches!(
        mark_type1_conflicts(&g),
        Err(Error::CrossingSegments(_, _))
    ));
}
