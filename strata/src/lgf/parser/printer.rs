//! A collection of methods for printing the AST.

use super::ast;

fn print_size(size: &Option<ast::Size>) -> String {
    match size {
        Some(s) => format!(" [{}, {}]", s.width, s.height),
        None => String::new(),
    }
}

fn print_member(m: &ast::MemberStmt, indent: usize) {
    print!("{}", " ".repeat(indent));
    let kind = match m.kind {
        ast::MemberKind::Node => "Node",
        ast::MemberKind::Dummy => "Dummy",
    };
    println!("{} {}{}", kind, m.name, print_size(&m.size));
}

fn print_layer(l: &ast::LayerStmt, idx: usize, indent: usize) {
    print!("{}", " ".repeat(indent));
    println!("Layer {}:", idx);
    for m in &l.list {
        print_member(m, indent + 1);
    }
}

fn print_edge(e: &ast::EdgeStmt, indent: usize) {
    print!("{}", " ".repeat(indent));
    println!("Edge {} -> {}", e.from, e.to);
    for (i, d) in e.via.iter().enumerate() {
        print!("{}", " ".repeat(indent + 1));
        println!("{}) via {}", i, d);
    }
}

fn print_isolated(n: &ast::IsolatedStmt, indent: usize) {
    print!("{}", " ".repeat(indent));
    println!("Isolated {}{}", n.name, print_size(&n.size));
}

pub fn dump_ast(graph: &ast::Graph) {
    println!("Graph:");
    let mut layer = 0;
    for stmt in &graph.list {
        match stmt {
            ast::Stmt::Layer(l) => {
                print_layer(l, layer, 1);
                layer += 1;
            }
            ast::Stmt::Edge(e) => {
                print_edge(e, 1);
            }
            ast::Stmt::Isolated(n) => {
                print_isolated(n, 1);
            }
        }
    }
}
