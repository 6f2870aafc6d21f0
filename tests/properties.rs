//! Property tests for the placer, over random layered graphs.
//!
//! Invariants checked:
//! 1. Placing the same graph twice gives the same coordinates and routes.
//! 2. The root of every vertex is its own root, in every mode.
//! 3. Following the alignment chain from the root of a vertex visits the
//!    vertex and comes back to the root.
//! 4. The average mode is the mean of the four modes, and a single mode is
//!    the coordinates of that mode.
//! 5. Vertices of the same layer never overlap.
//! 6. Traditional routes have one point per dummy. Orthogonal routes have
//!    four more, or just the two anchors when the edge has no dummies.

use proptest::prelude::*;
use strata::adt::dag::NodeHandle;
use strata::core::config::{EdgeRouting, LayoutConfig, PositionMode};
use strata::core::error::Error;
use strata::core::geometry::Point;
use strata::topo::graph::{EdgeHandle, LayeredGraph};
use strata::topo::placer::{Layout, Placer};

#[derive(Debug, Clone)]
struct GraphSpec {
    /// The sizes of the vertices, layer by layer.
    layers: Vec<Vec<(f64, f64)>>,
    /// Edges between adjacent layers: (layer, from, to, reversed).
    short: Vec<(usize, usize, usize, bool)>,
    /// Edges with dummies: (first layer, span, from, to, reversed).
    long: Vec<(usize, usize, usize, usize, bool)>,
    isolated: Vec<f64>,
}

fn arb_size() -> impl Strategy<Value = (f64, f64)> {
    (1u32..50, 1u32..50).prop_map(|(w, h)| (w as f64, h as f64))
}

fn arb_graph() -> impl Strategy<Value = GraphSpec> {
    (
        prop::collection::vec(prop::collection::vec(arb_size(), 1..5), 1..6),
        prop::collection::vec((0usize..8, 0usize..8, 0usize..8, any::<bool>()), 0..16),
        prop::collection::vec(
            (0usize..8, 2usize..4, 0usize..8, 0usize..8, any::<bool>()),
            0..4,
        ),
        prop::collection::vec(1u32..30, 0..3),
    )
        .prop_map(|(layers, short, long, isolated)| GraphSpec {
            layers,
            short,
            long,
            isolated: isolated.into_iter().map(|s| s as f64).collect(),
        })
}

fn arb_routing() -> impl Strategy<Value = EdgeRouting> {
    prop_oneof![Just(EdgeRouting::Traditional), Just(EdgeRouting::Orthogonal)]
}

fn build(spec: &GraphSpec) -> LayeredGraph {
    let mut g = LayeredGraph::new();
    let mut rows: Vec<Vec<NodeHandle>> = Vec::new();
    for (l, row) in spec.layers.iter().enumerate() {
        let nodes = row
            .iter()
            .map(|&(w, h)| g.add_node(l, Point::new(w, h)))
            .collect();
        rows.push(nodes);
    }

    let n = rows.len();
    for &(layer, from, to, reversed) in &spec.short {
        if n < 2 {
            break;
        }
        let l = layer % (n - 1);
        let a = rows[l][from % rows[l].len()];
        let b = rows[l + 1][to % rows[l + 1].len()];
        let res = if reversed {
            g.add_edge(b, a, &[])
        } else {
            g.add_edge(a, b, &[])
        };
        res.unwrap();
    }

    // The dummies of each long edge are appended to the end of their layers,
    // so the segments never cross each other.
    for &(layer, span, from, to, reversed) in &spec.long {
        if n <= span {
            continue;
        }
        let l = layer % (n - span);
        let a = rows[l][from % rows[l].len()];
        let b = rows[l + span][to % rows[l + span].len()];
        let mut via: Vec<NodeHandle> = (l + 1..l + span).map(|k| g.add_dummy(k)).collect();
        let res = if reversed {
            via.reverse();
            g.add_edge(b, a, &via)
        } else {
            g.add_edge(a, b, &via)
        };
        res.unwrap();
    }

    for &s in &spec.isolated {
        g.add_isolated(Point::splat(s));
    }
    g
}

fn place(spec: &GraphSpec, config: LayoutConfig) -> (LayeredGraph, Layout) {
    let mut g = build(spec);
    let res = Placer::new(&mut g, config).layout();
    match res {
        Ok(layout) => (g, layout),
        Err(Error::CrossingSegments(a, b)) => {
            panic!("segments {} and {} cross in a generated graph", a, b)
        }
        Err(err) => panic!("unexpected error: {}", err),
    }
}

proptest! {
    #[test]
    fn layout_is_deterministic(spec in arb_graph(), routing in arb_routing()) {
        let mut config = LayoutConfig::new();
        config.set_edge_routing(routing);
        let (_, l0) = place(&spec, config.clone());
        let (_, l1) = place(&spec, config);
        prop_assert_eq!(l0.positions(), l1.positions());
        prop_assert_eq!(l0.routes(), l1.routes());
    }

    #[test]
    fn blocks_are_closed_chains(spec in arb_graph()) {
        let (g, layout) = place(&spec, LayoutConfig::new());
        let n = g.num_nodes();
        for k in 0..4 {
            let roots = layout.mode_roots(k);
            let aligns = layout.mode_aligns(k);
            for v in g.iter_nodes() {
                let root = roots[v.get_index()];
                prop_assert_eq!(roots[root.get_index()], root);

                let mut found = false;
                let mut cur = root;
                for _ in 0..=n {
                    found |= cur == v;
                    cur = aligns[cur.get_index()];
                    if cur == root {
                        break;
                    }
                }
                prop_assert_eq!(cur, root);
                prop_assert!(found);
            }
        }
    }

    #[test]
    fn aggregation_combines_modes(spec in arb_graph(), k in 0usize..4) {
        let (g, average) = place(&spec, LayoutConfig::new());
        for v in g.iter_nodes() {
            let i = v.get_index();
            let sum: f64 = (0..4).map(|m| average.mode_slices(m)[i]).sum();
            prop_assert!((average.slice(v) - sum / 4.).abs() < 1e-6);
        }

        let mut config = LayoutConfig::new();
        config.set_position_mode(PositionMode::Single(k));
        let (_, single) = place(&spec, config);
        prop_assert_eq!(single.slices(), single.mode_slices(k));
    }

    #[test]
    fn vertices_do_not_overlap(spec in arb_graph()) {
        let config = LayoutConfig::new();
        let vd = config.vertex_distance;
        let (g, layout) = place(&spec, config);
        prop_assert!(layout.violations().is_empty());
        for row in g.dag.rows() {
            for pair in row.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let need = vd + (g.size(a).x + g.size(b).x) / 2.;
                prop_assert!(layout.slice(b) - layout.slice(a) + 1e-6 >= need);
            }
        }
    }

    #[test]
    fn routes_follow_the_dummies(spec in arb_graph()) {
        let (g, traditional) = place(&spec, LayoutConfig::new());
        let mut config = LayoutConfig::new();
        config.set_edge_routing(EdgeRouting::Orthogonal);
        let (_, orthogonal) = place(&spec, config);

        for (i, edge) in g.edges().iter().enumerate() {
            let handle = EdgeHandle::new(i);
            let k = edge.dummies.len();
            match traditional.route(handle) {
                None => {
                    prop_assert_eq!(k, 0);
                }
                Some(points) => {
                    prop_assert_eq!(points.len(), k);
                }
            }
            let points = orthogonal.route(handle).unwrap();
            let expected = if k == 0 { 2 } else { k + 4 };
            prop_assert_eq!(points.len(), expected);
        }
    }
}
