//! Computes the size and the offset of every layer along the layer axis, and
//! converts layout coordinates (slice, layer) into the X,Y of the direction.

use crate::core::base::LayoutDirection;
use crate::core::geometry::Point;
use crate::topo::graph::LayeredGraph;

#[derive(Debug, Clone)]
pub struct LayerGeometry {
    /// The extent of the tallest vertex in each layer.
    sizes: Vec<f64>,
    /// The start of each layer along the layer axis.
    offsets: Vec<f64>,
    dir: LayoutDirection,
}

impl LayerGeometry {
    pub fn compute(g: &LayeredGraph, dir: LayoutDirection, layer_distance: f64) -> Self {
        let mut sizes: Vec<f64> = vec![0.; g.num_levels()];
        for (i, row) in g.dag.rows().iter().enumerate() {
            for node in row {
                sizes[i] = sizes[i].max(g.extent(*node, dir).y);
            }
        }

        let mut offsets = Vec::with_capacity(sizes.len());
        let mut pos = 0.;
        for size in sizes.iter() {
            offsets.push(pos);
            pos += size + layer_distance;
        }

        #[cfg(feature = "log")]
        log::debug!("Layer sizes: {:?}", sizes);
        Self {
            sizes,
            offsets,
            dir,
        }
    }

    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// \returns where the layer \p layer starts along the layer axis.
    pub fn start(&self, layer: usize) -> f64 {
        self.offsets[layer]
    }

    /// \returns where the layer \p layer ends along the layer axis.
    pub fn end(&self, layer: usize) -> f64 {
        self.offsets[layer] + self.sizes[layer]
    }

    /// \returns the layer-axis center of a vertex with the extent \p own that
    /// lives in the layer \p layer.
    pub fn vertex_center(&self, layer: usize, own: f64) -> f64 {
        self.offsets[layer] + own.max(self.sizes[layer]) / 2.
    }

    /// \returns the extent of all of the layers along the layer axis.
    pub fn total_extent(&self) -> f64 {
        match self.sizes.len() {
            0 => 0.,
            n => self.end(n - 1),
        }
    }

    /// Convert the layout coordinate (\p slice, \p along) to a point in the
    /// drawing, according to the direction.
    pub fn project(&self, slice: f64, along: f64) -> Point {
        let along = if self.dir.is_mirrored() {
            self.total_extent() - along
        } else {
            along
        };
        if self.dir.is_vertical() {
            Point::new(slice, along)
        } else {
            Point::new(along, slice)
        }
    }
}

#[test]
fn test_layer_offsets() {
    let mut g = LayeredGraph::new();
    let a = g.add_node(0, Point::new(10., 2.));
    let b = g.add_node(1, Point::new(10., 2.));
    let _c = g.add_node(2, Point::new(10., 2.));
    g.add_edge(a, b, &[]).unwrap();

    let lg = LayerGeometry::compute(&g, LayoutDirection::TopToBottom, 10.);
    assert_eq!(lg.sizes(), &[2., 2., 2.]);
    assert_eq!(lg.offsets(), &[0., 12., 24.]);
    assert_eq!(lg.vertex_center(1, 2.), 13.);
    assert_eq!(lg.total_extent(), 26.);
}

#[test]
fn test_tallest_vertex_sets_layer_size() {
    let mut g = LayeredGraph::new();
    g.add_node(0, Point::new(10., 4.));
    g.add_node(0, Point::new(10., 30.));
    g.add_node(1, Point::new(10., 4.));

    let lg = LayerGeometry::compute(&g, LayoutDirection::TopToBottom, 5.);
    assert_eq!(lg.sizes(), &[30., 4.]);
    assert_eq!(lg.offsets(), &[0., 35.]);
    // Short vertices are centered in the layer.
    assert_eq!(lg.vertex_center(0, 4.), 15.);
}

#[test]
fn test_projection() {
    let mut g = LayeredGraph::new();
    g.add_node(0, Point::new(4., 10.));
    g.add_node(1, Point::new(4., 10.));

    let lr = LayerGeometry::compute(&g, LayoutDirection::LeftToRight, 10.);
    // The layer axis is X, so the layer size comes from the width.
    assert_eq!(lr.sizes(), &[4., 4.]);
    assert_eq!(lr.project(7., 2.), Point::new(2., 7.));

    let bt = LayerGeometry::compute(&g, LayoutDirection::BottomToTop, 10.);
    assert_eq!(bt.total_extent(), 30.);
    assert_eq!(bt.project(7., 5.), Point::new(7., 25.));
}
