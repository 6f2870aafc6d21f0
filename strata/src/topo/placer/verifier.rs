//! Checks the results of the placer. The block structure must always be
//! correct and is asserted. Spacing problems are collected and reported.

use super::bk::Scratch;
use crate::adt::dag::NodeHandle;
use crate::core::base::{LayoutDirection, Mode};
use crate::core::geometry::EPSILON;
use crate::topo::graph::LayeredGraph;

/// Two neighbors in a layer that are closer than the minimal distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Violation {
    pub layer: usize,
    pub left: NodeHandle,
    pub right: NodeHandle,
    pub gap: f64,
    pub required: f64,
}

/// Make sure that every block of \p mode is a closed chain that starts at
/// its root, and that the root of a root is itself.
pub fn verify_blocks(g: &LayeredGraph, scratch: &Scratch, mode: Mode) {
    let m = mode.index();
    for v in g.iter_nodes() {
        let root = scratch.root(v, m);
        assert_eq!(scratch.root(root, m), root, "The root must be its own root");

        // Walk the chain from the root. It must reach v and come back.
        let mut w = root;
        let mut found = w == v;
        for _ in 0..g.num_nodes() {
            w = scratch.align(w, m);
            assert_eq!(scratch.root(w, m), root, "Chain leaves the block");
            found |= w == v;
            if w == root {
                break;
            }
        }
        assert_eq!(w, root, "The chain must be closed");
        assert!(found, "The vertex must be on the chain of its root");
    }
}

/// \returns the pairs of adjacent vertices that are too close to each other
/// or out of order, in the coordinates \p slices.
pub fn check_spacing(
    g: &LayeredGraph,
    dir: LayoutDirection,
    slices: &[f64],
    vertex_distance: f64,
) -> Vec<Violation> {
    let mut res = Vec::new();
    for (layer, row) in g.dag.rows().iter().enumerate() {
        for pair in row.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            let widths = g.extent(left, dir).x + g.extent(right, dir).x;
            let required = vertex_distance + widths / 2.;
            let gap = slices[right.get_index()] - slices[left.get_index()];
            if gap + EPSILON < required {
                #[cfg(feature = "log")]
                log::warn!(
                    "{} and {} in layer {} are {:.3} apart, need {:.3}.",
                    left,
                    right,
                    layer,
                    gap,
                    required
                );
                res.push(Violation {
                    layer,
                    left,
                    right,
                    gap,
                    required,
                });
            }
        }
    }
    res
}

#[cfg(test)]
use crate::core::geometry::Point;

#[test]
fn test_check_spacing() {
    let mut g = LayeredGraph::new();
    let a = g.add_node(0, Point::splat(10.));
    let b = g.add_node(0, Point::splat(10.));
    let dir = LayoutDirection::TopToBottom;

    assert!(check_spacing(&g, dir, &[0., 15.], 5.).is_empty());
    let bad = check_spacing(&g, dir, &[0., 14.], 5.);
    assert_eq!(bad.len(), 1);
    assert_eq!(bad[0].left, a);
    assert_eq!(bad[0].right, b);
    // Out of order.
    assert_eq!(check_spacing(&g, dir, &[15., 0.], 5.).len(), 1);
}

#[test]
#[should_panic(expected = "The chain must be closed")]
fn test_verify_broken_chain() {
    let mut g = LayeredGraph::new();
    let a = g.add_node(0, Point::splat(10.));
    let b = g.add_node(1, Point::splat(10.));
    g.add_edge(a, b, &[]).unwrap();

    let mode = Mode::all()[0];
    let mut scratch = Scratch::new(g.num_nodes());
    scratch.reset(&g, mode, LayoutDirection::TopToBottom);
    // The chain a -> b never returns to a.
    scratch.get_mut(a).align[0] = b;
    scratch.get_mut(b).root[0] = a;
    scratch.get_mut(b).align[0] = b;
    verify_blocks(&g, &scratch, mode);
}
