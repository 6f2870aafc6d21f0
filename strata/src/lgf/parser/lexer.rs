//! The Lexer implementation for the layered graph file format.

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    EOF,
    Identifier(String),
    Number(f64),
    LayerKW,
    NodeKW,
    DummyKW,
    EdgeKW,
    IsolatedKW,
    ViaKW,
    Comma,
    Semicolon,
    ArrowRight,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Error(usize),
}

impl Token {
    fn keyword(name: &str) -> Option<Token> {
        Some(match name {
            "layer" => Token::LayerKW,
            "node" => Token::NodeKW,
            "dummy" => Token::DummyKW,
            "edge" => Token::EdgeKW,
            "isolated" => Token::IsolatedKW,
            "via" => Token::ViaKW,
            _ => return None,
        })
    }

    fn punctuation(ch: char) -> Option<Token> {
        Some(match ch {
            ';' => Token::Semicolon,
            ',' => Token::Comma,
            '[' => Token::OpenBracket,
            ']' => Token::CloseBracket,
            '{' => Token::OpenBrace,
            '}' => Token::CloseBrace,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<char>,
    /// The offset of the char after `ch`.
    pub pos: usize,
    /// The current char, or '\0' at the end of the input.
    pub ch: char,
}

impl Lexer {
    pub fn from_string(input: &str) -> Self {
        let mut l = Self {
            input: input.chars().collect(),
            pos: 0,
            ch: '\0',
        };
        l.bump();
        l
    }

    /// Print the line that contains the current position, and a marker under
    /// the position.
    pub fn print_error(&self) {
        let end = self.pos.saturating_sub(1).min(self.input.len());
        let line_start = self.input[..end]
            .iter()
            .rposition(|ch| *ch == '\n')
            .map_or(0, |i| i + 1);
        let line: String = self.input[line_start..]
            .iter()
            .take_while(|ch| **ch != '\n')
            .collect();
        println!("{}", line);
        println!("{}^", " ".repeat(end - line_start));
    }

    /// Move to the next char. Past the end `ch` is '\0' and `pos` stays one
    /// after the last char.
    fn bump(&mut self) {
        self.ch = self.input.get(self.pos).copied().unwrap_or('\0');
        self.pos = (self.pos + 1).min(self.input.len() + 1);
    }

    fn peek(&self) -> char {
        self.input.get(self.pos).copied().unwrap_or('\0')
    }

    /// Consume chars while \p pred holds. \returns the consumed text.
    fn take_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let mut res = String::new();
        while self.ch != '\0' && pred(self.ch) {
            res.push(self.ch);
            self.bump();
        }
        res
    }

    /// Skip one run of whitespace or one comment.
    /// \returns True if something was skipped.
    fn skip_trivia(&mut self) -> bool {
        if self.ch.is_ascii_whitespace() {
            self.take_while(|ch| ch.is_ascii_whitespace());
            return true;
        }
        if self.ch != '/' {
            return false;
        }
        match self.peek() {
            '/' => {
                self.take_while(|ch| ch != '\n');
                true
            }
            '*' => {
                self.bump();
                self.bump();
                // An unterminated comment runs to the end of the input.
                while self.ch != '\0' && !(self.ch == '*' && self.peek() == '/') {
                    self.bump();
                }
                self.bump();
                self.bump();
                true
            }
            _ => false,
        }
    }

    /// Read a number with at most one period, with an optional leading
    /// minus sign.
    fn read_number(&mut self) -> Token {
        let start = self.pos;
        let mut text = String::new();
        if self.ch == '-' {
            text.push('-');
            self.bump();
        }
        let mut seen_period = false;
        text.push_str(&self.take_while(|ch| {
            if ch == '.' && !seen_period {
                seen_period = true;
                return true;
            }
            ch.is_ascii_digit()
        }));
        text.parse::<f64>()
            .map_or(Token::Error(start), Token::Number)
    }

    pub fn next_token(&mut self) -> Token {
        while self.skip_trivia() {}

        if self.ch == '\0' {
            return Token::EOF;
        }
        if let Some(tok) = Token::punctuation(self.ch) {
            self.bump();
            return tok;
        }
        if self.ch == '-' {
            if self.peek() == '>' {
                self.bump();
                self.bump();
                return Token::ArrowRight;
            }
            return self.read_number();
        }
        if self.ch.is_ascii_digit() || self.ch == '.' {
            return self.read_number();
        }
        if self.ch.is_ascii_alphabetic() || self.ch == '_' {
            let name = self.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
            return Token::keyword(&name).unwrap_or(Token::Identifier(name));
        }
        Token::Error(self.pos)
    }
}

#[test]
fn test_lexer() {
    let mut l = Lexer::from_string("layer { node a0 [4, -2.5]; } // x\n edge a -> b;");
    let expected = vec![
        Token::LayerKW,
        Token::OpenBrace,
        Token::NodeKW,
        Token::Identifier("a0".to_string()),
        Token::OpenBracket,
        Token::Number(4.),
        Token::Comma,
        Token::Number(-2.5),
        Token::CloseBracket,
        Token::Semicolon,
        Token::CloseBrace,
        Token::EdgeKW,
        Token::Identifier("a".to_string()),
        Token::ArrowRight,
        Token::Identifier("b".to_string()),
        Token::Semicolon,
        Token::EOF,
    ];
    for tok in expected {
        assert_eq!(l.next_token(), tok);
    }
}

#[test]
fn test_block_comment() {
    let mut l = Lexer::from_string("/* layer * / */ via");
    assert_eq!(l.next_token(), Token::ViaKW);
    assert_eq!(l.next_token(), Token::EOF);
    assert_eq!(l.next_token(), Token::EOF);
}

#[test]
fn test_lexer_error() {
    let mut l = Lexer::from_string("node $");
    assert_eq!(l.next_token(), Token::NodeKW);
    assert!(matches!(l.next_token(), Token::Error(_)));
    // A lone minus sign is not a number.
    let mut l = Lexer::from_string("- 3");
    assert!(matches!(l.next_token(), Token::Error(_)));
}
