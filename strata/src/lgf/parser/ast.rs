//! An AST that represents the layered graph file format.

// [width, height]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// (node | dummy)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Node,
    Dummy,
}

// node a [10, 20];
#[derive(Debug, Clone)]
pub struct MemberStmt {
    pub kind: MemberKind,
    pub name: String,
    pub size: Option<Size>,
}

impl MemberStmt {
    pub fn new(kind: MemberKind, name: &str, size: Option<Size>) -> Self {
        Self {
            kind,
            name: name.to_string(),
            size,
        }
    }
}

// layer { ... }
#[derive(Debug, Clone, Default)]
pub struct LayerStmt {
    pub list: Vec<MemberStmt>,
}

// edge a -> b via d0, d1;
#[derive(Debug, Clone)]
pub struct EdgeStmt {
    pub from: String,
    pub to: String,
    pub via: Vec<String>,
}

impl EdgeStmt {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            via: Vec::new(),
        }
    }
}

// isolated z [10, 10];
#[derive(Debug, Clone)]
pub struct IsolatedStmt {
    pub name: String,
    pub size: Option<Size>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Layer(LayerStmt),
    Edge(EdgeStmt),
    Isolated(IsolatedStmt),
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub list: Vec<Stmt>,
}

impl Graph {
    pub fn new() -> Self {
        Self { list: Vec::new() }
    }

    /// \returns the number of layer statements.
    pub fn num_layers(&self) -> usize {
        self.list
            .iter()
            .filter(|s| matches!(s, Stmt::Layer(_)))
            .count()
    }
}
