use super::ast;
use super::lexer::Lexer;
use super::lexer::Token;
use crate::core::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct LgfParser {
    lexer: Lexer,
    tok: Token,
}

impl LgfParser {
    pub fn new(input: &str) -> Self {
        Self {
            lexer: Lexer::from_string(input),
            tok: Token::Comma,
        }
    }

    pub fn print_error(&self) {
        self.lexer.print_error();
    }

    /// Creates an error at the current position from the string \p msg.
    fn to_error<T>(&self, msg: &str) -> Result<T> {
        Err(Error::Parse {
            pos: self.lexer.pos,
            message: msg.to_string(),
        })
    }

    pub fn lex(&mut self) {
        match self.tok {
            Token::Error(_) => {
                panic!("can't parse after error");
            }
            Token::EOF => {
                panic!("can't parse after EOF");
            }
            _ => {
                // Lex the next token.
                self.tok = self.lexer.next_token();
            }
        }
    }

    /// Consume the token \p expected, or report \p msg.
    fn expect(&mut self, expected: Token, msg: &str) -> Result<()> {
        if self.tok == expected {
            self.lex();
            return Ok(());
        }
        self.to_error(msg)
    }

    fn parse_identifier(&mut self) -> Result<String> {
        if let Token::Identifier(name) = self.tok.clone() {
            // Consume the name.
            self.lex();
            return Ok(name);
        }
        self.to_error("Expected an identifier.")
    }

    fn parse_number(&mut self) -> Result<f64> {
        if let Token::Number(val) = self.tok {
            self.lex();
            return Ok(val);
        }
        self.to_error("Expected a number.")
    }

    // size : '[' NUM ',' NUM ']'
    fn parse_size(&mut self) -> Result<Option<ast::Size>> {
        if self.tok != Token::OpenBracket {
            return Ok(None);
        }
        self.lex();
        let width = self.parse_number()?;
        self.expect(Token::Comma, "Expected ','")?;
        let height = self.parse_number()?;
        self.expect(Token::CloseBracket, "Expected ']'")?;
        Ok(Some(ast::Size::new(width, height)))
    }

    // member : (node | dummy) ID [ size ] ';'
    fn parse_member(&mut self) -> Result<ast::MemberStmt> {
        let kind = match self.tok {
            Token::NodeKW => ast::MemberKind::Node,
            Token::DummyKW => ast::MemberKind::Dummy,
            _ => {
                return self.to_error("Expected 'node' or 'dummy'");
            }
        };
        self.lex();
        let name = self.parse_identifier()?;
        let size = self.parse_size()?;
        self.expect(Token::Semicolon, "Expected ';'")?;
        Ok(ast::MemberStmt::new(kind, &name, size))
    }

    // layer : 'layer' '{' member* '}'
    fn parse_layer(&mut self) -> Result<ast::LayerStmt> {
        self.expect(Token::LayerKW, "Expected 'layer'")?;
        self.expect(Token::OpenBrace, "Expected '{'")?;
        let mut layer = ast::LayerStmt::default();
        loop {
            if self.tok == Token::CloseBrace {
                // Consume the '}' and exit.
                self.lex();
                return Ok(layer);
            }
            layer.list.push(self.parse_member()?);
        }
    }

    // edge : 'edge' ID '->' ID [ 'via' ID (',' ID)* ] ';'
    fn parse_edge(&mut self) -> Result<ast::EdgeStmt> {
        self.expect(Token::EdgeKW, "Expected 'edge'")?;
        let from = self.parse_identifier()?;
        self.expect(Token::ArrowRight, "Expected '->'")?;
        let to = self.parse_identifier()?;
        let mut es = ast::EdgeStmt::new(&from, &to);

        if self.tok == Token::ViaKW {
            self.lex();
            es.via.push(self.parse_identifier()?);
            while self.tok == Token::Comma {
                self.lex();
                es.via.push(self.parse_identifier()?);
            }
        }
        self.expect(Token::Semicolon, "Expected ';'")?;
        Ok(es)
    }

    // isolated : 'isolated' ID [ size ] ';'
    fn parse_isolated(&mut self) -> Result<ast::IsolatedStmt> {
        self.expect(Token::IsolatedKW, "Expected 'isolated'")?;
        let name = self.parse_identifier()?;
        let size = self.parse_size()?;
        self.expect(Token::Semicolon, "Expected ';'")?;
        Ok(ast::IsolatedStmt { name, size })
    }

    pub fn parse_stmt(&mut self) -> Result<ast::Stmt> {
        match self.tok {
            Token::LayerKW => Ok(ast::Stmt::Layer(self.parse_layer()?)),
            Token::EdgeKW => Ok(ast::Stmt::Edge(self.parse_edge()?)),
            Token::IsolatedKW => Ok(ast::Stmt::Isolated(self.parse_isolated()?)),
            Token::Error(_) => self.to_error("Invalid character."),
            _ => self.to_error("Expected 'layer', 'edge' or 'isolated'"),
        }
    }

    /// Parses a whole layered graph file.
    pub fn process(&mut self) -> Result<ast::Graph> {
        self.lex();
        let mut graph = ast::Graph::new();
        loop {
            // Skip empty statements.
            while self.tok == Token::Semicolon {
                self.lex();
            }
            if self.tok == Token::EOF {
                return Ok(graph);
            }
            graph.list.push(self.parse_stmt()?);
        }
    }
}

#[test]
fn test_parse_file() {
    let text = "
    // Two layers.
    layer { node a [40, 20]; dummy d0; }
    layer { node b; dummy d1; }
    layer { node c; }
    edge a -> b;
    edge a -> c via d0, d1;
    isolated z [10, 10];
    ";
    let mut parser = LgfParser::new(text);
    let g = parser.process().unwrap();
    assert_eq!(g.list.len(), 6);
    assert_eq!(g.num_layers(), 3);

    match &g.list[0] {
        ast::Stmt::Layer(l) => {
            assert_eq!(l.list.len(), 2);
            assert_eq!(l.list[0].size, Some(ast::Size::new(40., 20.)));
            assert_eq!(l.list[1].kind, ast::MemberKind::Dummy);
            assert_eq!(l.list[1].size, None);
        }
        _ => panic!("Expected a layer"),
    }
    match &g.list[4] {
        ast::Stmt::Edge(e) => {
            assert_eq!(e.from, "a");
            assert_eq!(e.via, vec!["d0".to_string(), "d1".to_string()]);
        }
        _ => panic!("Expected an edge"),
    }
}

#[test]
fn test_parse_errors() {
    let bad_inputs = [
        "layer { node a }",
        "edge a b;",
        "layer { node a [1]; }",
        "isolated;",
        "node a;",
        "layer { node a; } $",
    ];
    for input in bad_inputs.iter() {
        let mut parser = LgfParser::new(input);
        assert!(
            matches!(parser.process(), Err(Error::Parse { .. })),
            "{}",
            input
        );
    }
}
