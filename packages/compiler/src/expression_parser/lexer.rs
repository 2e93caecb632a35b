//! Expression Lexer
//!
//! Splits a binding expression into tokens. Offsets are relative to the
//! expression text; the parser rebases them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Character,
    Identifier,
    Keyword,
    String,
    Operator,
    Number,
    Error,
}

const KEYWORDS: &[&str] = &["null", "undefined", "true", "false", "this", "typeof"];

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub index: usize,
    pub end: usize,
    pub token_type: TokenType,
    pub num_value: f64,
    pub str_value: String,
}

impl Token {
    fn new(index: usize, end: usize, token_type: TokenType, num_value: f64, str_value: impl Into<String>) -> Self {
        Token {
            index,
            end,
            token_type,
            num_value,
            str_value: str_value.into(),
        }
    }

    pub fn is_character(&self, code: char) -> bool {
        self.token_type == TokenType::Character && self.str_value.chars().next() == Some(code)
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.token_type == TokenType::Operator && self.str_value == operator
    }

    pub fn is_identifier(&self) -> bool {
        self.token_type == TokenType::Identifier
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == keyword
    }

    pub fn is_error(&self) -> bool {
        self.token_type == TokenType::Error
    }
}

#[derive(Debug, Default)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Lexer
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut scanner = Scanner {
            input: text.char_indices().collect(),
            len: text.len(),
            pos: 0,
        };
        let mut tokens = Vec::new();
        while let Some(token) = scanner.scan_token() {
            let is_error = token.is_error();
            tokens.push(token);
            if is_error {
                break;
            }
        }
        tokens
    }
}

struct Scanner {
    input: Vec<(usize, char)>,
    len: usize,
    pos: usize,
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

impl Scanner {
    fn peek_at(&self, pos: usize) -> Option<char> {
        self.input.get(pos).map(|(_, c)| *c)
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(self.pos)
    }

    fn offset(&self, pos: usize) -> usize {
        self.input.get(pos).map_or(self.len, |(i, _)| *i)
    }

    fn scan_token(&mut self) -> Option<Token> {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
        let ch = self.peek()?;
        let start = self.pos;

        if is_identifier_start(ch) {
            return Some(self.scan_identifier(start));
        }
        if ch.is_ascii_digit() {
            return Some(self.scan_number(start));
        }
        match ch {
            '.' => {
                if matches!(self.peek_at(start + 1), Some(c) if c.is_ascii_digit()) {
                    Some(self.scan_number(start))
                } else {
                    Some(self.scan_character(start))
                }
            }
            '(' | ')' | '[' | ']' | '{' | '}' | ',' | ':' | ';' => Some(self.scan_character(start)),
            '\'' | '"' => Some(self.scan_string(start, ch)),
            '+' | '-' | '*' | '/' | '%' | '^' => Some(self.scan_operator(start, 1)),
            '?' => {
                let len = match self.peek_at(start + 1) {
                    Some('?') | Some('.') => 2,
                    _ => 1,
                };
                Some(self.scan_operator(start, len))
            }
            '<' | '>' => {
                let len = if self.peek_at(start + 1) == Some('=') { 2 } else { 1 };
                Some(self.scan_operator(start, len))
            }
            '!' | '=' => {
                let mut len = 1;
                if self.peek_at(start + 1) == Some('=') {
                    len = 2;
                    if self.peek_at(start + 2) == Some('=') {
                        len = 3;
                    }
                }
                Some(self.scan_operator(start, len))
            }
            '&' | '|' => {
                let len = if self.peek_at(start + 1) == Some(ch) { 2 } else { 1 };
                Some(self.scan_operator(start, len))
            }
            _ => {
                self.pos = self.input.len();
                Some(self.error(start, format!("Unexpected character [{}]", ch)))
            }
        }
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.input[start..end].iter().map(|(_, c)| *c).collect()
    }

    fn error(&self, start: usize, message: String) -> Token {
        Token::new(self.offset(start), self.offset(self.pos), TokenType::Error, 0.0, message)
    }

    fn scan_character(&mut self, start: usize) -> Token {
        self.pos += 1;
        Token::new(
            self.offset(start),
            self.offset(self.pos),
            TokenType::Character,
            0.0,
            self.text(start, self.pos),
        )
    }

    fn scan_operator(&mut self, start: usize, len: usize) -> Token {
        self.pos += len;
        Token::new(
            self.offset(start),
            self.offset(self.pos),
            TokenType::Operator,
            0.0,
            self.text(start, self.pos),
        )
    }

    fn scan_identifier(&mut self, start: usize) -> Token {
        self.pos += 1;
        while matches!(self.peek(), Some(c) if is_identifier_part(c)) {
            self.pos += 1;
        }
        let value = self.text(start, self.pos);
        let token_type = if KEYWORDS.contains(&value.as_str()) {
            TokenType::Keyword
        } else {
            TokenType::Identifier
        };
        Token::new(self.offset(start), self.offset(self.pos), token_type, 0.0, value)
    }

    fn scan_number(&mut self, start: usize) -> Token {
        let mut seen_exponent = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' || c == '_' {
                self.pos += 1;
            } else if (c == 'e' || c == 'E') && !seen_exponent {
                seen_exponent = true;
                self.pos += 1;
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
        let raw = self.text(start, self.pos).replace('_', "");
        match raw.parse::<f64>() {
            Ok(value) => Token::new(self.offset(start), self.offset(self.pos), TokenType::Number, value, raw),
            Err(_) => self.error(start, format!("Invalid number [{}]", raw)),
        }
    }

    fn scan_string(&mut self, start: usize, quote: char) -> Token {
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(c) = self.peek() else {
                return self.error(start, "Unterminated quote".to_string());
            };
            self.pos += 1;
            if c == quote {
                break;
            }
            if c != '\\' {
                value.push(c);
                continue;
            }
            let Some(escaped) = self.peek() else {
                return self.error(start, "Unterminated quote".to_string());
            };
            self.pos += 1;
            match escaped {
                'n' => value.push('\n'),
                'r' => value.push('\r'),
                't' => value.push('\t'),
                'u' => {
                    let hex = self.text(self.pos, (self.pos + 4).min(self.input.len()));
                    match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                        Some(ch) if hex.len() == 4 => {
                            value.push(ch);
                            self.pos += 4;
                        }
                        _ => return self.error(start, format!("Invalid unicode escape [\\u{}]", hex)),
                    }
                }
                other => value.push(other),
            }
        }
        Token::new(self.offset(start), self.offset(self.pos), TokenType::String, 0.0, value)
    }
}
