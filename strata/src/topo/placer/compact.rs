//! Horizontal compaction of the blocks of one mode. Every block is placed as
//! close as possible to the side of the mode. Blocks whose spacing bottoms out
//! at the same sink form a class, and the classes are pushed apart at the end.

use super::bk::Scratch;
use crate::adt::dag::NodeHandle;
use crate::core::base::{LayoutDirection, Mode};
use crate::topo::compaction::{CompactionGraph, Data};
use crate::topo::graph::{LayeredGraph, VertexKind};
use std::collections::{BTreeMap, HashMap};

/// Records that the class \p class must keep a distance from the class
/// \p other.
#[derive(Debug, Clone, Copy)]
struct ClassBound {
    class: NodeHandle,
    other: NodeHandle,
    bound: f64,
}

/// A block that is being placed, and the walk over its members.
#[derive(Debug)]
struct Frame {
    block: NodeHandle,
    walker: NodeHandle,
    preds: Vec<NodeHandle>,
    next: usize,
}

impl Frame {
    fn new(block: NodeHandle, preds: Vec<NodeHandle>) -> Self {
        Self {
            block,
            walker: block,
            preds,
            next: 0,
        }
    }
}

pub struct Compactor<'a> {
    g: &'a LayeredGraph,
    cg: &'a CompactionGraph,
    mode: Mode,
    dir: LayoutDirection,
    vertex_distance: f64,
    bounds: Vec<ClassBound>,
}

impl<'a> Compactor<'a> {
    pub fn new(
        g: &'a LayeredGraph,
        cg: &'a CompactionGraph,
        mode: Mode,
        dir: LayoutDirection,
        vertex_distance: f64,
    ) -> Self {
        Self {
            g,
            cg,
            mode,
            dir,
            vertex_distance,
            bounds: Vec::new(),
        }
    }

    /// Place all of the blocks, resolve the class shifts and write the final
    /// coordinate of every vertex into the scratch.
    pub fn run(&mut self, scratch: &mut Scratch) {
        let m = self.mode.index();
        let mut levels: Vec<usize> = (0..self.g.num_levels()).collect();
        if !self.mode.edges.is_upper() {
            levels.reverse();
        }

        for level in levels {
            let mut row = self.g.dag.row(level).clone();
            if !self.mode.side.is_left() {
                row.reverse();
            }
            for v in row {
                if scratch.root(v, m) == v {
                    self.place_block(scratch, v);
                }
            }
        }

        self.resolve_shifts(scratch);
        self.finalize(scratch);
    }

    /// \returns the other end of the segment if \p w is the end that the
    /// walk of this mode enters the segment from.
    fn segment_exit(&self, w: NodeHandle) -> Option<NodeHandle> {
        let upper = self.mode.edges.is_upper();
        match self.g.kind(w) {
            VertexKind::P(seg) if upper => Some(self.g.segment(seg).q),
            VertexKind::Q(seg) if !upper => Some(self.g.segment(seg).p),
            _ => None,
        }
    }

    /// \returns the next member of the block after \p w. The inner dummies
    /// of a segment are skipped.
    fn next_in_block(&self, scratch: &Scratch, w: NodeHandle) -> NodeHandle {
        if let Some(exit) = self.segment_exit(w) {
            return exit;
        }
        scratch.align(w, self.mode.index())
    }

    /// \returns the root of the block that holds the compaction node \p d.
    fn root_of(&self, scratch: &Scratch, d: Data) -> NodeHandle {
        let m = self.mode.index();
        match d {
            Data::Vertex(node) => scratch.root(node, m),
            Data::Segment(seg) => {
                let seg = self.g.segment(seg);
                let anchor = if self.mode.edges.is_upper() { seg.p } else { seg.q };
                scratch.root(anchor, m)
            }
        }
    }

    /// \returns the roots of the blocks that must be placed before the
    /// member \p w, on the side that the mode compacts towards.
    fn block_preds(&self, scratch: &Scratch, w: NodeHandle) -> Vec<NodeHandle> {
        let left = self.mode.side.is_left();
        let neighbors = |d: Data| {
            if left {
                self.cg.in_edges(d)
            } else {
                self.cg.out_edges(d)
            }
        };

        let mut res: Vec<NodeHandle> = neighbors(Data::Vertex(w))
            .iter()
            .map(|d| self.root_of(scratch, *d))
            .collect();

        if self.segment_exit(w).is_some() {
            if let Some(seg) = self.g.kind(w).segment() {
                for d in neighbors(Data::Segment(seg)) {
                    res.push(self.root_of(scratch, *d));
                }
            }
        }
        res
    }

    /// Place the block with the root \p start, and every block that it
    /// depends on.
    fn place_block(&mut self, scratch: &mut Scratch, start: NodeHandle) {
        let m = self.mode.index();
        if scratch.get(start).slice_position[m].is_some() {
            return;
        }
        scratch.get_mut(start).slice_position[m] = Some(0.);
        let preds = self.block_preds(scratch, start);
        let mut stack = vec![Frame::new(start, preds)];

        loop {
            let (block, walker, pending) = match stack.last() {
                Some(f) => (f.block, f.walker, f.preds.get(f.next).copied()),
                None => break,
            };

            if let Some(u) = pending {
                if scratch.get(u).slice_position[m].is_none() {
                    // Place the neighbor first.
                    scratch.get_mut(u).slice_position[m] = Some(0.);
                    let preds = self.block_preds(scratch, u);
                    stack.push(Frame::new(u, preds));
                    continue;
                }
                if u != block {
                    self.separate(scratch, block, u);
                }
                if let Some(f) = stack.last_mut() {
                    f.next += 1;
                }
                continue;
            }

            let next = self.next_in_block(scratch, walker);
            if next == block {
                stack.pop();
                continue;
            }
            let preds = self.block_preds(scratch, next);
            if let Some(f) = stack.last_mut() {
                f.walker = next;
                f.preds = preds;
                f.next = 0;
            }
        }
    }

    /// Keep the block \p v at a legal distance from the placed block \p u.
    fn separate(&mut self, scratch: &mut Scratch, v: NodeHandle, u: NodeHandle) {
        let m = self.mode.index();
        let left = self.mode.side.is_left();

        if scratch.get(v).sink[m] == v {
            let sink = scratch.get(u).sink[m];
            scratch.get_mut(v).sink[m] = sink;
        }

        let sv = scratch.get(v);
        let su = scratch.get(u);
        let delta = self.vertex_distance + (sv.block_width[m] + su.block_width[m]) / 2.;
        let xv = sv.slice_position[m].unwrap_or(0.);
        let xu = su.slice_position[m].unwrap_or(0.);

        if sv.sink[m] != su.sink[m] {
            let bound = if left {
                xv - xu - delta
            } else {
                xv - xu + delta
            };
            self.bounds.push(ClassBound {
                class: su.sink[m],
                other: sv.sink[m],
                bound,
            });
            return;
        }

        let x = if left {
            xv.max(xu + delta)
        } else {
            xv.min(xu - delta)
        };
        scratch.get_mut(v).slice_position[m] = Some(x);
    }

    /// Compute the shift of every class that is bounded by another class.
    /// The classes that a class depends on are resolved first, so the shifts
    /// add up along chains of classes.
    fn resolve_shifts(&self, scratch: &mut Scratch) {
        let m = self.mode.index();
        let left = self.mode.side.is_left();

        let mut by_class: BTreeMap<NodeHandle, Vec<(NodeHandle, f64)>> = BTreeMap::new();
        for b in self.bounds.iter() {
            by_class.entry(b.class).or_default().push((b.other, b.bound));
        }

        let mut visited: HashMap<NodeHandle, bool> = HashMap::new();
        // Holds the class and a flag that says that the dependencies are done.
        let mut worklist: Vec<(NodeHandle, bool)> =
            by_class.keys().rev().map(|c| (*c, false)).collect();

        while let Some((class, ready)) = worklist.pop() {
            let bounds = match by_class.get(&class) {
                Some(b) => b,
                None => continue,
            };

            if ready {
                let mut shift: Option<f64> = None;
                for (other, bound) in bounds.iter() {
                    let val = scratch.get(*other).shift[m].unwrap_or(0.) + bound;
                    shift = Some(match shift {
                        None => val,
                        Some(s) if left => s.min(val),
                        Some(s) => s.max(val),
                    });
                }
                scratch.get_mut(class).shift[m] = shift;
                continue;
            }

            if visited.contains_key(&class) {
                continue;
            }
            visited.insert(class, true);
            worklist.push((class, true));
            for (other, _) in bounds.iter() {
                if !visited.contains_key(other) {
                    worklist.push((*other, false));
                }
            }
        }

        #[cfg(feature = "log")]
        log::debug!(
            "Mode {}: {} class bounds between {} classes.",
            self.mode,
            self.bounds.len(),
            by_class.len()
        );
    }

    /// Move every vertex to the final coordinate of its block, and translate
    /// the mode so that its leftmost edge is at zero.
    fn finalize(&self, scratch: &mut Scratch) {
        let m = self.mode.index();
        let mut xs: Vec<(NodeHandle, f64)> = Vec::with_capacity(self.g.num_nodes());
        for v in self.g.iter_nodes() {
            let root = scratch.root(v, m);
            let state = scratch.get(root);
            let x = state.slice_position[m].expect("Block was not placed");
            let shift = scratch.get(state.sink[m]).shift[m].unwrap_or(0.);
            xs.push((v, x + shift));
        }

        let mut min_edge: Option<f64> = None;
        for (v, x) in xs.iter() {
            let edge = x - self.g.extent(*v, self.dir).x / 2.;
            min_edge = Some(min_edge.map_or(edge, |m| m.min(edge)));
        }
        let offset = min_edge.unwrap_or(0.);

        for (v, x) in xs {
            scratch.get_mut(v).slice_position[m] = Some(x - offset);
        }
    }
}

#[cfg(test)]
use super::bk::{align_blocks, mark_type1_conflicts};
#[cfg(test)]
use crate::core::base::{EdgeSet, Side};
#[cfg(test)]
use crate::core::geometry::Point;

#[cfg(test)]
fn compact_all(g: &LayeredGraph, vertex_distance: f64) -> Scratch {
    let dir = LayoutDirection::TopToBottom;
    let marked = mark_type1_conflicts(g).unwrap();
    let cg = CompactionGraph::build(g);
    let mut scratch = Scratch::new(g.num_nodes());
    for mode in Mode::all().iter() {
        scratch.reset(g, *mode, dir);
        align_blocks(g, &marked, &mut scratch, *mode, dir);
        Compactor::new(g, &cg, *mode, dir, vertex_distance).run(&mut scratch);
    }
    scratch
}

#[cfg(test)]
fn assert_spacing(g: &LayeredGraph, scratch: &Scratch, vertex_distance: f64) {
    for mode in Mode::all().iter() {
        let xs = scratch.slices(*mode);
        for row in g.dag.rows() {
            for pair in row.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let need = vertex_distance + (g.size(a).x + g.size(b).x) / 2.;
                let gap = xs[b.get_index()] - xs[a.get_index()];
                assert!(gap + 0.001 >= need, "{} {} gap {} < {}", a, b, gap, need);
            }
        }
    }
}

#[test]
fn test_single_row() {
    let mut g = LayeredGraph::new();
    let a = g.add_node(0, Point::new(10., 10.));
    let b = g.add_node(0, Point::new(20., 10.));
    let c = g.add_node(0, Point::new(10., 10.));

    let scratch = compact_all(&g, 5.);
    for mode in Mode::all().iter() {
        let xs = scratch.slices(*mode);
        // Packed tightly, and the left edge is at zero.
        assert_eq!(xs[a.get_index()], 5.);
        assert_eq!(xs[b.get_index()], 25.);
        assert_eq!(xs[c.get_index()], 45.);
    }
}

#[test]
fn test_blocks_are_straight() {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let b = g.add_node(1, sz);
    let c = g.add_node(2, sz);
    g.add_edge(a, b, &[]).unwrap();
    g.add_edge(b, c, &[]).unwrap();

    let scratch = compact_all(&g, 5.);
    for mode in Mode::all().iter() {
        let xs = scratch.slices(*mode);
        assert_eq!(xs[a.get_index()], xs[b.get_index()]);
        assert_eq!(xs[b.get_index()], xs[c.get_index()]);
    }
}

#[test]
fn test_segment_is_straight_in_every_mode() {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let x = g.add_node(0, sz);
    let p = g.add_dummy(1);
    let y = g.add_node(1, sz);
    let inner = g.add_dummy(2);
    let z = g.add_node(2, sz);
    let q = g.add_dummy(3);
    let b = g.add_node(4, sz);
    g.add_edge(a, b, &[p, inner, q]).unwrap();
    g.add_edge(x, y, &[]).unwrap();
    g.add_edge(y, z, &[]).unwrap();

    let scratch = compact_all(&g, 5.);
    for mode in Mode::all().iter() {
        let xs = scratch.slices(*mode);
        assert_eq!(xs[p.get_index()], xs[inner.get_index()]);
        assert_eq!(xs[inner.get_index()], xs[q.get_index()]);
    }
    assert_spacing(&g, &scratch, 5.);
}

#[test]
fn test_wide_vertex_widens_block() {
    // The wide vertex pushes the whole block that it belongs to.
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a0 = g.add_node(0, sz);
    let a1 = g.add_node(1, sz);
    let w = g.add_node(1, Point::new(40., 10.));
    let b1 = g.add_node(2, sz);
    let b2 = g.add_node(2, sz);
    let c = g.add_node(3, sz);
    g.add_edge(a0, a1, &[]).unwrap();
    g.add_edge(a0, w, &[]).unwrap();
    g.add_edge(a1, b1, &[]).unwrap();
    g.add_edge(w, b2, &[]).unwrap();
    g.add_edge(b1, c, &[]).unwrap();
    g.add_edge(b2, c, &[]).unwrap();

    let scratch = compact_all(&g, 5.);
    assert_spacing(&g, &scratch, 5.);
}

#[test]
fn test_class_shift() {
    // The block v0-v1 belongs to the class of s1, and the wide vertex s2
    // starts a class of its own that must move away from it.
    let mut g = LayeredGraph::new();
    let s1 = g.add_node(0, Point::splat(10.));
    let v0 = g.add_node(0, Point::splat(10.));
    let s2 = g.add_node(1, Point::new(50., 10.));
    let v1 = g.add_node(1, Point::splat(10.));
    g.add_edge(v0, v1, &[]).unwrap();

    let scratch = compact_all(&g, 5.);
    let xs = scratch.slices(Mode::new(Side::Left, EdgeSet::Upper));
    assert_eq!(xs[s2.get_index()], 25.);
    assert_eq!(xs[s1.get_index()], 45.);
    assert_eq!(xs[v0.get_index()], 60.);
    assert_eq!(xs[v1.get_index()], 60.);
    assert_spacing(&g, &scratch, 5.);
}

#[test]
fn test_right_mode_mirrors_left() {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let b = g.add_node(1, sz);
    let c = g.add_node(1, sz);
    g.add_edge(a, b, &[]).unwrap();
    g.add_edge(a, c, &[]).unwrap();

    let scratch = compact_all(&g, 10.);
    let ul = scratch.slices(Mode::new(Side::Left, EdgeSet::Upper));
    let ur = scratch.slices(Mode::new(Side::Right, EdgeSet::Upper));
    // Left aligns a with b, right aligns a with c.
    assert_eq!(ul[a.get_index()], ul[b.get_index()]);
    assert_eq!(ur[a.get_index()], ur[c.get_index()]);
    assert_eq!(ul[c.get_index()] - ul[b.get_index()], 20.);
    assert_eq!(ur[c.get_index()] - ur[b.get_index()], 20.);
}
