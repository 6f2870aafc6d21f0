//! A graph builder that converts parsed AST trees to layered graphs.

use super::parser::ast;
use crate::adt::dag::NodeHandle;
use crate::core::error::{Error, Result};
use crate::core::geometry::Point;
use crate::topo::graph::{EdgeHandle, LayeredGraph};
use std::collections::HashMap;

/// The size of a node that does not specify one.
pub const DEFAULT_NODE_SIZE: f64 = 20.;

/// A layered graph, and the names that the file gave to its vertices and
/// edges.
#[derive(Debug)]
pub struct NamedGraph {
    pub graph: LayeredGraph,
    // The original vertices in the order of their definition.
    nodes: Vec<(String, NodeHandle)>,
    // The edges with the names of their endpoints.
    edges: Vec<(String, String, EdgeHandle)>,
    names: HashMap<String, NodeHandle>,
}

impl NamedGraph {
    /// \returns the handle of the vertex or dummy called \p name.
    pub fn lookup(&self, name: &str) -> Option<NodeHandle> {
        self.names.get(name).copied()
    }

    /// \returns the original vertices, in the order of the file.
    pub fn nodes(&self) -> &[(String, NodeHandle)] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(String, String, EdgeHandle)] {
        &self.edges
    }
}

/// This class constructs a layered graph from the parsed AST.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: LayeredGraph,
    nodes: Vec<(String, NodeHandle)>,
    edges: Vec<(String, String, EdgeHandle)>,
    names: HashMap<String, NodeHandle>,
}

fn to_point(size: &Option<ast::Size>, default: f64) -> Point {
    match size {
        Some(s) => Point::new(s.width, s.height),
        None => Point::splat(default),
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, name: &str, node: NodeHandle) -> Result<()> {
        if self.names.insert(name.to_string(), node).is_some() {
            return Err(Error::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<NodeHandle> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownName(name.to_string()))
    }

    /// Add the content of \p graph. The vertices are created first, so edges
    /// may refer to vertices that are defined later in the file.
    pub fn visit_graph(&mut self, graph: &ast::Graph) -> Result<()> {
        let mut layer = 0;
        for stmt in &graph.list {
            match stmt {
                ast::Stmt::Layer(l) => {
                    self.visit_layer(l, layer)?;
                    layer += 1;
                }
                ast::Stmt::Isolated(n) => {
                    let size = to_point(&n.size, DEFAULT_NODE_SIZE);
                    let node = self.graph.add_isolated(size);
                    self.register(&n.name, node)?;
                    self.nodes.push((n.name.clone(), node));
                }
                ast::Stmt::Edge(_) => {}
            }
        }

        for stmt in &graph.list {
            if let ast::Stmt::Edge(e) = stmt {
                self.visit_edge(e)?;
            }
        }

        #[cfg(feature = "log")]
        log::info!(
            "Built a graph with {} vertices in {} layers and {} edges.",
            self.graph.num_nodes(),
            layer,
            self.edges.len()
        );
        Ok(())
    }

    fn visit_layer(&mut self, l: &ast::LayerStmt, layer: usize) -> Result<()> {
        for m in &l.list {
            let node = match m.kind {
                ast::MemberKind::Node => {
                    let node = self
                        .graph
                        .add_node(layer, to_point(&m.size, DEFAULT_NODE_SIZE));
                    self.nodes.push((m.name.clone(), node));
                    node
                }
                ast::MemberKind::Dummy => self
                    .graph
                    .add_dummy_with_size(layer, to_point(&m.size, 0.)),
            };
            self.register(&m.name, node)?;
        }
        Ok(())
    }

    fn visit_edge(&mut self, e: &ast::EdgeStmt) -> Result<()> {
        let from = self.lookup(&e.from)?;
        let to = self.lookup(&e.to)?;
        let via = e
            .via
            .iter()
            .map(|name| self.lookup(name))
            .collect::<Result<Vec<NodeHandle>>>()?;
        let handle = self.graph.add_edge(from, to, &via)?;
        self.edges.push((e.from.clone(), e.to.clone(), handle));
        Ok(())
    }

    pub fn get(self) -> NamedGraph {
        NamedGraph {
            graph: self.graph,
            nodes: self.nodes,
            edges: self.edges,
            names: self.names,
        }
    }
}

#[cfg(test)]
use super::parser::LgfParser;

#[cfg(test)]
fn build(text: &str) -> Result<NamedGraph> {
    let tree = LgfParser::new(text).process()?;
    let mut gb = GraphBuilder::new();
    gb.visit_graph(&tree)?;
    Ok(gb.get())
}

#[test]
fn test_build_graph() {
    let ng = build(
        "layer { node a [40, 10]; }
         layer { node b; dummy d0; }
         layer { dummy d1; }
         layer { node c; }
         edge a -> b;
         edge a -> c via d0, d1;
         isolated z;",
    )
    .unwrap();

    let g = &ng.graph;
    assert_eq!(g.num_levels(), 4);
    assert_eq!(g.edges().len(), 2);
    assert_eq!(g.segments().len(), 1);
    let a = ng.lookup("a").unwrap();
    assert_eq!(g.size(a), Point::new(40., 10.));
    let b = ng.lookup("b").unwrap();
    assert_eq!(g.size(b), Point::splat(DEFAULT_NODE_SIZE));
    let d0 = ng.lookup("d0").unwrap();
    assert_eq!(g.size(d0), Point::zero());
    let names: Vec<&str> = ng.nodes().iter().map(|n| n.0.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "z"]);
    assert_eq!(g.isolated().len(), 1);
}

#[test]
fn test_build_errors() {
    assert!(matches!(
        build("layer { node a; node a; }"),
        Err(Error::DuplicateName(_))
    ));
    assert!(matches!(
        build("layer { node a; } edge a -> b;"),
        Err(Error::UnknownName(_))
    ));
    assert!(matches!(
        build("layer { node a; } layer { } layer { node b; } edge a -> b;"),
        Err(Error::LayerGap { .. })
    ));
}
