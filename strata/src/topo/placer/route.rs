//! Computes the polylines of the original edges, after all of the vertices
//! have their final coordinates.

use super::layers::LayerGeometry;
use crate::adt::dag::NodeHandle;
use crate::core::base::LayoutDirection;
use crate::core::config::EdgeRouting;
use crate::core::geometry::Point;
use crate::topo::graph::{Edge, LayeredGraph};

/// \returns the route of every edge, indexed by the edge handle. The
/// traditional routing has no route for edges without dummies.
pub fn route_edges(
    g: &LayeredGraph,
    geometry: &LayerGeometry,
    slices: &[f64],
    dir: LayoutDirection,
    layer_distance: f64,
    routing: EdgeRouting,
) -> Vec<Option<Vec<Point>>> {
    let router = Router {
        g,
        geometry,
        slices,
        dir,
        layer_distance,
    };
    g.edges()
        .iter()
        .map(|e| match routing {
            EdgeRouting::Traditional => router.traditional(e),
            EdgeRouting::Orthogonal => Some(router.orthogonal(e)),
        })
        .collect()
}

struct Router<'a> {
    g: &'a LayeredGraph,
    geometry: &'a LayerGeometry,
    slices: &'a [f64],
    dir: LayoutDirection,
    layer_distance: f64,
}

impl<'a> Router<'a> {
    fn slice(&self, node: NodeHandle) -> f64 {
        self.slices[node.get_index()]
    }

    /// \returns the drawing coordinate of the center of \p node.
    fn center(&self, node: NodeHandle) -> Point {
        let layer = self.g.dag.level(node);
        let own = self.g.extent(node, self.dir).y;
        let along = self.geometry.vertex_center(layer, own);
        self.geometry.project(self.slice(node), along)
    }

    /// A straight polyline through the dummy vertices.
    fn traditional(&self, e: &Edge) -> Option<Vec<Point>> {
        if e.dummies.is_empty() {
            return None;
        }
        Some(e.dummies.iter().map(|d| self.center(*d)).collect())
    }

    /// A polyline with right angles. The edge leaves the source into the gap
    /// after the source layer, runs along the channel of its dummies and
    /// enters the target from the gap before the target layer.
    fn orthogonal(&self, e: &Edge) -> Vec<Point> {
        let src_layer = self.g.dag.level(e.from);
        let tgt_layer = self.g.dag.level(e.to);
        let half = self.layer_distance / 2.;
        let downward = src_layer < tgt_layer;

        let (exit, entry) = if downward {
            (
                self.geometry.end(src_layer) + half,
                self.geometry.start(tgt_layer) - half,
            )
        } else {
            (
                self.geometry.start(src_layer) - half,
                self.geometry.end(tgt_layer) + half,
            )
        };

        let src = self.geometry.project(self.slice(e.from), exit);
        let tgt = self.geometry.project(self.slice(e.to), entry);
        let (first, last) = match (e.dummies.first(), e.dummies.last()) {
            (Some(first), Some(last)) => (*first, *last),
            // A short edge only needs the two anchors.
            _ => return vec![src, tgt],
        };
        let first_channel = self.slice(first);
        let last_channel = self.slice(last);

        let mut res = Vec::with_capacity(e.dummies.len() + 4);
        res.push(src);
        res.push(self.geometry.project(first_channel, exit));
        for d in e.dummies.iter() {
            res.push(self.center(*d));
        }
        res.push(self.geometry.project(last_channel, entry));
        res.push(tgt);
        res
    }
}

#[cfg(test)]
fn build_long_edge() -> (LayeredGraph, Vec<f64>) {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let d0 = g.add_dummy(1);
    let d1 = g.add_dummy(2);
    let b = g.add_node(3, sz);
    let c = g.add_node(1, sz);
    g.add_edge(a, b, &[d0, d1]).unwrap();
    g.add_edge(a, c, &[]).unwrap();
    // a, d0, d1, b, c
    let slices = vec![5., 5., 5., 20., 30.];
    (g, slices)
}

#[test]
fn test_traditional_routes() {
    let (g, slices) = build_long_edge();
    let dir = LayoutDirection::TopToBottom;
    let lg = LayerGeometry::compute(&g, dir, 10.);
    let routes = route_edges(&g, &lg, &slices, dir, 10., EdgeRouting::Traditional);
    assert_eq!(routes.len(), 2);
    let long = routes[0].as_ref().unwrap();
    assert_eq!(long.len(), 2);
    // Layer 1 starts at 20 and has the size 10, and the dummy is centered.
    assert_eq!(long[0], Point::new(5., 25.));
    assert!(routes[1].is_none());
}

#[test]
fn test_orthogonal_routes() {
    let (g, slices) = build_long_edge();
    let dir = LayoutDirection::TopToBottom;
    let lg = LayerGeometry::compute(&g, dir, 10.);
    let routes = route_edges(&g, &lg, &slices, dir, 10., EdgeRouting::Orthogonal);

    let long = routes[0].as_ref().unwrap();
    assert_eq!(long.len(), 6);
    // Layer 0 ends at 10, and layer 3 starts at 50.
    assert_eq!(long[0], Point::new(5., 15.));
    assert_eq!(long[5], Point::new(20., 45.));
    for pair in long.windows(2) {
        assert!(pair[0].is_axis_aligned_with(pair[1]));
    }

    let short = routes[1].as_ref().unwrap();
    assert_eq!(short, &vec![Point::new(5., 15.), Point::new(30., 15.)]);
}

#[test]
fn test_orthogonal_short_edge() {
    // Two vertices on top of each other in adjacent layers.
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let b = g.add_node(1, sz);
    g.add_edge(a, b, &[]).unwrap();
    let slices = vec![5., 5.];

    let dir = LayoutDirection::TopToBottom;
    let lg = LayerGeometry::compute(&g, dir, 40.);
    let routes = route_edges(&g, &lg, &slices, dir, 40., EdgeRouting::Orthogonal);
    let route = routes[0].as_ref().unwrap();
    // The anchors meet in the middle of the gap, with no extra bends.
    assert_eq!(route.len(), 2);
    assert_eq!(route[0], Point::new(5., 30.));
    assert_eq!(route[1], Point::new(5., 30.));
}

#[test]
fn test_orthogonal_back_edge() {
    let mut g = LayeredGraph::new();
    let sz = Point::splat(10.);
    let a = g.add_node(0, sz);
    let b = g.add_node(1, sz);
    g.add_edge(b, a, &[]).unwrap();
    let slices = vec![5., 25.];

    let dir = LayoutDirection::TopToBottom;
    let lg = LayerGeometry::compute(&g, dir, 10.);
    let routes = route_edges(&g, &lg, &slices, dir, 10., EdgeRouting::Orthogonal);
    let route = routes[0].as_ref().unwrap();
    // Leaves above the source layer and enters below the target layer.
    assert_eq!(route, &vec![Point::new(25., 15.), Point::new(5., 15.)]);
}
