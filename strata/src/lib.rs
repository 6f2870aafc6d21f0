/*!
This crate assigns coordinates to graphs that were already layered and
ordered, in the style of Sugiyama. It computes the position of every vertex
along the layer (with the method of Brandes and Kopf), stacks the layers with
a fixed gap between them, and routes the edges through their dummy vertices,
either with straight polylines or with right angles.

Assigning vertices to layers, inserting dummy vertices for long edges and
ordering the vertices inside each layer are the job of the caller.

The project also comes with a command line utility that reads `.lgf` files
and prints the coordinates.

# Parser example: parse a layered graph file

```rust
    use strata::lgf::{GraphBuilder, LgfParser};

    let contents = "layer { node a; } layer { node b; } edge a -> b;";
    let mut parser = LgfParser::new(contents);

    match parser.process() {
        Result::Err(err) => {
            parser.print_error();
            eprintln!("Error: {}", err);
        }

        Result::Ok(tree) => {
            strata::lgf::dump_ast(&tree);
            let mut gb = GraphBuilder::new();
            gb.visit_graph(&tree).unwrap();
            let named = gb.get();
            assert_eq!(named.graph.num_levels(), 2);
        }
    }
```

# Placer example: place a small graph

This code builds a graph with a long edge that passes through two dummy
vertices, and computes the coordinates.

```rust
fn simple_graph() {
    use strata::core::config::{EdgeRouting, LayoutConfig};
    use strata::core::geometry::Point;
    use strata::topo::graph::LayeredGraph;
    use strata::topo::placer::Placer;

    let mut g = LayeredGraph::new();
    let sz = Point::new(40., 20.);

    // Add the vertices, layer by layer, in the order of the layer.
    let a = g.add_node(0, sz);
    let d0 = g.add_dummy(1);
    let b = g.add_node(1, sz);
    let d1 = g.add_dummy(2);
    let c = g.add_node(3, sz);

    // Connect them. The long edge names the dummies that it passes through.
    g.add_edge(a, b, &[]).unwrap();
    let long = g.add_edge(a, c, &[d0, d1]).unwrap();

    let mut config = LayoutConfig::new();
    config.set_edge_routing(EdgeRouting::Orthogonal);
    let layout = Placer::new(&mut g, config).layout().unwrap();

    println!("a is at {}", layout.position(a));
    assert_eq!(layout.route(long).unwrap().len(), 6);
}
```

*/

pub mod adt;
pub mod core;
pub mod lgf;
pub mod topo;
