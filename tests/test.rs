use strata::core::geometry::Point;

#[cfg(test)]
mod tests {

    use super::*;
    use strata::adt::dag::NodeHandle;
    use strata::core::base::LayoutDirection;
    use strata::core::config::{EdgeRouting, LayoutConfig, PositionMode};
    use strata::core::error::Error;
    use strata::lgf::{GraphBuilder, LgfParser};
    use strata::topo::graph::{EdgeHandle, LayeredGraph};
    use strata::topo::placer::{CancelToken, Layout, Placer};

    fn place(g: &mut LayeredGraph, config: LayoutConfig) -> Layout {
        Placer::new(g, config).layout().unwrap()
    }

    /// Checks that no two vertices of a layer overlap, in the final
    /// coordinates.
    fn assert_no_overlap(g: &LayeredGraph, layout: &Layout, vertex_distance: f64) {
        for row in g.dag.rows() {
            for pair in row.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let need = vertex_distance + (g.size(a).x + g.size(b).x) / 2.;
                let gap = layout.slice(b) - layout.slice(a);
                assert!(gap + 0.001 >= need, "{} {}: {} < {}", a, b, gap, need);
            }
        }
    }

    /// A graph with a segment, a relay and a few short edges.
    fn sample_graph() -> (LayeredGraph, Vec<NodeHandle>, EdgeHandle) {
        let mut g = LayeredGraph::new();
        let a = g.add_node(0, Point::new(30., 20.));
        let b = g.add_node(0, Point::new(20., 20.));
        let c = g.add_node(1, Point::new(20., 20.));
        let p = g.add_dummy(1);
        let d = g.add_node(1, Point::new(50., 20.));
        let e = g.add_node(2, Point::new(20., 40.));
        let q = g.add_dummy(2);
        let r = g.add_dummy(2);
        let gg = g.add_node(2, Point::new(20., 20.));
        let h = g.add_node(3, Point::new(20., 20.));
        let f = g.add_node(3, Point::new(60., 20.));

        g.add_edge(a, c, &[]).unwrap();
        g.add_edge(a, d, &[]).unwrap();
        g.add_edge(b, d, &[]).unwrap();
        let long = g.add_edge(b, f, &[p, q]).unwrap();
        g.add_edge(c, e, &[]).unwrap();
        g.add_edge(d, gg, &[]).unwrap();
        g.add_edge(e, h, &[]).unwrap();
        g.add_edge(gg, f, &[]).unwrap();
        g.add_edge(d, h, &[r]).unwrap();
        (g, vec![a, b, c, p, d, e, q, r, gg, h, f], long)
    }

    #[test]
    fn test_three_layer_chain() {
        let mut g = LayeredGraph::new();
        let sz = Point::splat(2.);
        let a = g.add_node(0, sz);
        let b = g.add_node(1, sz);
        let c = g.add_node(2, sz);
        g.add_edge(a, b, &[]).unwrap();
        g.add_edge(b, c, &[]).unwrap();

        let mut config = LayoutConfig::new();
        config.set_layer_distance(10.);
        let layout = place(&mut g, config);

        assert_eq!(layout.layer_offsets(), &[0., 12., 24.]);
        assert_eq!(layout.position(a).y, 1.);
        assert_eq!(layout.position(b).y, 13.);
        assert_eq!(layout.position(c).y, 25.);
        assert_eq!(layout.position(a).x, layout.position(c).x);
    }

    #[test]
    fn test_isolated_round_robin() {
        let mut g = LayeredGraph::new();
        let sz = Point::splat(10.);
        let a = g.add_node(0, sz);
        let b = g.add_node(1, sz);
        g.add_edge(a, b, &[]).unwrap();
        let z0 = g.add_isolated(sz);
        let z1 = g.add_isolated(sz);

        let layout = place(&mut g, LayoutConfig::new());
        assert_eq!(g.dag.level(z0), 0);
        assert_eq!(g.dag.level(z1), 1);
        assert!(g.dag.is_last_in_row(z0, 0));
        assert_ne!(layout.position(z0), layout.position(a));
        assert_ne!(layout.position(z1), layout.position(b));
        assert_no_overlap(&g, &layout, LayoutConfig::new().vertex_distance);
    }

    #[test]
    fn test_orthogonal_long_edge() {
        let mut g = LayeredGraph::new();
        let sz = Point::splat(10.);
        let a = g.add_node(0, sz);
        let d0 = g.add_dummy(1);
        let d1 = g.add_dummy(2);
        let b = g.add_node(3, sz);
        let e = g.add_edge(a, b, &[d0, d1]).unwrap();

        let mut config = LayoutConfig::new();
        config
            .set_layer_distance(10.)
            .set_edge_routing(EdgeRouting::Orthogonal);
        let layout = place(&mut g, config);

        let route = layout.route(e).unwrap();
        assert_eq!(route.len(), 6);
        // The dummy layers are empty, so the layer offsets are 0, 20, 30, 40.
        let ends = layout.layer_offsets()[0] + layout.layer_sizes()[0];
        assert_eq!(route[0].y, ends + 5.);
        assert_eq!(route[5].y, layout.layer_offsets()[3] - 5.);
        for pair in route.windows(2) {
            assert!(pair[0].is_axis_aligned_with(pair[1]));
        }
    }

    #[test]
    fn test_traditional_route_counts() {
        let (mut g, _, long) = sample_graph();
        let layout = place(&mut g, LayoutConfig::new());
        for (i, edge) in g.edges().iter().enumerate() {
            let route = layout.route(EdgeHandle::new(i));
            if edge.dummies.is_empty() {
                assert!(route.is_none());
            } else {
                assert_eq!(route.unwrap().len(), edge.dummies.len());
            }
        }
        assert_eq!(layout.route(long).unwrap().len(), 2);
    }

    #[test]
    fn test_orthogonal_route_counts() {
        let (mut g, _, _) = sample_graph();
        let mut config = LayoutConfig::new();
        config.set_edge_routing(EdgeRouting::Orthogonal);
        let layout = place(&mut g, config);
        for (i, edge) in g.edges().iter().enumerate() {
            let route = layout.route(EdgeHandle::new(i)).unwrap();
            if edge.dummies.is_empty() {
                assert_eq!(route.len(), 2);
            } else {
                assert_eq!(route.len(), edge.dummies.len() + 4);
            }
        }
    }

    #[test]
    fn test_single_mode_is_used_as_is() {
        for k in 0..4 {
            let (mut g, _, _) = sample_graph();
            let mut config = LayoutConfig::new();
            config.set_position_mode(PositionMode::Single(k));
            let layout = place(&mut g, config);
            assert_eq!(layout.slices(), layout.mode_slices(k));
        }
    }

    #[test]
    fn test_average_of_modes() {
        let (mut g, nodes, _) = sample_graph();
        let layout = place(&mut g, LayoutConfig::new());
        for n in nodes {
            let i = n.get_index();
            let sum: f64 = (0..4).map(|k| layout.mode_slices(k)[i]).sum();
            assert!((layout.slice(n) - sum / 4.).abs() < 1e-9);
        }
    }

    #[test]
    fn test_spacing_in_every_mode() {
        let (mut g, _, _) = sample_graph();
        let config = LayoutConfig::new();
        let vd = config.vertex_distance;
        let layout = place(&mut g, config);
        assert!(layout.violations().is_empty());
        assert_no_overlap(&g, &layout, vd);
    }

    #[test]
    fn test_segment_is_straight() {
        let (mut g, nodes, _) = sample_graph();
        let (p, q) = (nodes[3], nodes[6]);
        let layout = place(&mut g, LayoutConfig::new());
        for k in 0..4 {
            let xs = layout.mode_slices(k);
            assert_eq!(xs[p.get_index()], xs[q.get_index()]);
        }
        assert_eq!(layout.position(p).x, layout.position(q).x);
    }

    #[test]
    fn test_deterministic() {
        let (mut g0, _, _) = sample_graph();
        let (mut g1, _, _) = sample_graph();
        let l0 = place(&mut g0, LayoutConfig::new());
        let l1 = place(&mut g1, LayoutConfig::new());
        assert_eq!(l0.positions(), l1.positions());
        assert_eq!(l0.routes(), l1.routes());
    }

    #[test]
    fn test_cancellation() {
        let (mut g, _, _) = sample_graph();
        let token = CancelToken::new();
        let remote = token.clone();

        // Cancel while the second mode starts.
        let res = Placer::new(&mut g, LayoutConfig::new())
            .with_cancel_token(token)
            .on_progress(|stage| {
                if stage == strata::topo::placer::Stage::Mode(1) {
                    remote.cancel();
                }
            })
            .layout();
        assert!(matches!(res, Err(Error::Cancelled)));
    }

    #[test]
    fn test_bottom_to_top_mirrors() {
        let (mut g0, nodes, _) = sample_graph();
        let (mut g1, _, _) = sample_graph();
        let down = place(&mut g0, LayoutConfig::new());
        let mut config = LayoutConfig::new();
        config.set_direction(LayoutDirection::BottomToTop);
        let up = place(&mut g1, config);

        let total = down.geometry().total_extent();
        for n in nodes {
            assert_eq!(down.position(n).x, up.position(n).x);
            assert!((down.position(n).y - (total - up.position(n).y)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_left_to_right_swaps_axes() {
        let mut g = LayeredGraph::new();
        let a = g.add_node(0, Point::new(10., 30.));
        let b = g.add_node(0, Point::new(10., 30.));
        let c = g.add_node(1, Point::new(10., 30.));
        g.add_edge(a, c, &[]).unwrap();
        g.add_edge(b, c, &[]).unwrap();

        let mut config = LayoutConfig::new();
        config.set_direction(LayoutDirection::LeftToRight);
        let layout = place(&mut g, config);
        // a and b share the first layer, so they share the X coordinate and
        // are stacked along Y by their heights.
        assert_eq!(layout.position(a).x, layout.position(b).x);
        assert!(layout.position(b).y - layout.position(a).y >= 50. - 0.001);
        assert!(layout.position(c).x > layout.position(a).x);
    }

    #[test]
    fn test_crossing_segments() {
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
        let res = Placer::new(&mut g, LayoutConfig::new()).layout();
        assert!(matches!(res, Err(Error::CrossingSegments(_, _))));
    }

    #[test]
    fn test_layout_from_text() {
        let text = "
        /* A diamond with a long edge on the side. */
        layer { node top; }
        layer { node left; node right; dummy d0; }
        layer { node bottom [40, 20]; dummy d1; }
        layer { node last; }
        edge top -> left;
        edge top -> right;
        edge left -> bottom;
        edge right -> bottom;
        edge top -> last via d0, d1;
        edge bottom -> last;
        isolated lonely [5, 5];
        ";
        let tree = LgfParser::new(text).process().unwrap();
        let mut gb = GraphBuilder::new();
        gb.visit_graph(&tree).unwrap();
        let mut named = gb.get();

        let layout = place(&mut named.graph, LayoutConfig::new());
        let top = named.lookup("top").unwrap();
        let last = named.lookup("last").unwrap();
        assert!(layout.position(top).y < layout.position(last).y);
        assert!(layout.violations().is_empty());
        assert_eq!(named.nodes().len(), 6);
        assert_eq!(layout.positions().len(), named.graph.num_nodes());
    }
}
