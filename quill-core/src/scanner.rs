use phf::{phf_map, Map};

use crate::error::Error;
use crate::token::{Literal, Token, Type};

pub struct Scanner;

impl Scanner {
    const KEYWORDS: Map<&'static str, Type> = phf_map! {
        "let" => Type::Let,
        "const" => Type::Const,
        "fn" => Type::Fn,
        "null" => Type::Null,
    };

    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Scanner
    }

    pub fn scan_tokens<'a, 'b>(&'a mut self, src: &'b str) -> TokenStream
    where
        'b: 'a,
    {
        TokenStream::new(src)
    }
}

pub struct TokenStream<'a> {
    src: &'a str,
    line: usize,

    // `start` and `current` points to the start and end of the token being scanned
    start: usize,
    current: usize,

    // This represents a token's index in the token stream
    index: usize,

    // This flag is set to `true` if the eof is reached and the eof token has been emitted.
    // This is required because the iterator needs to distinguish between when eof is reached but
    // the token is not emitted, and eof is reached and token has been emitted.
    eof: bool,
    error: Option<Error>,
}

impl<'a> TokenStream<'a> {
    pub fn new(src: &'a str) -> Self {
        TokenStream {
            src,
            line: 0,
            start: 0,
            current: 0,
            index: 0,
            eof: false,
            error: None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Drains the stream, returning the complete token sequence or the first
    /// scan error. The parser consumes tokens as an immutable buffer, so the
    /// usual entry point is this rather than the iterator.
    pub fn collect_tokens(mut self) -> Result<Vec<Token>, Error> {
        let tokens = self.by_ref().collect();
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(tokens),
        }
    }

    fn scan_token(&mut self) -> Result<Option<Token>, Error> {
        let c = self.advance();

        let token = match c {
            '(' => Some(self.make_token(Type::LeftParen)),
            ')' => Some(self.make_token(Type::RightParen)),
            '{' => Some(self.make_token(Type::LeftBrace)),
            '}' => Some(self.make_token(Type::RightBrace)),
            ',' => Some(self.make_token(Type::Comma)),
            ':' => Some(self.make_token(Type::Colon)),
            ';' => Some(self.make_token(Type::SemiColon)),
            '+' => Some(self.make_token(Type::Plus)),
            '-' => Some(self.make_token(Type::Minus)),
            '*' => Some(self.make_token(Type::Star)),
            '%' => Some(self.make_token(Type::Percent)),
            '=' => Some(self.make_token(Type::Equal)),

            '/' => {
                if self.match_char('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                    None
                } else if self.match_char('*') {
                    let mut done = false;
                    while !self.is_at_end() && !done {
                        // Multi-line comments are allowed, so ensure to increment the line since
                        // `advance()` doesn't increment line number
                        if self.current() == '\n' {
                            self.line += 1;
                        }

                        let now = self.advance();
                        if now == '*' && self.peek() == '/' {
                            self.advance();
                            done = true;
                        }
                    }

                    if done {
                        None
                    } else {
                        return Err(Error::UnterminatedBlockComment { line: self.line });
                    }
                } else {
                    Some(self.make_token(Type::Slash))
                }
            }

            '"' => Some(self.string()?),

            // White spaces, do nothing
            ' ' | '\t' | '\r' => None,

            // Increment for new line
            '\n' => {
                self.line += 1;
                None
            }

            _ => {
                if c.is_ascii_digit() {
                    Some(self.number())
                } else if c.is_alphabetic() || c == '_' {
                    Some(self.identifier())
                } else {
                    return Err(Error::UnexpectedCharacter {
                        ch: c,
                        line: self.line,
                    });
                }
            }
        };

        Ok(token)
    }

    fn string(&mut self) -> Result<Token, Error> {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }

            self.advance();
        }

        if self.is_at_end() {
            return Err(Error::UnterminatedString { line: self.line });
        }

        // consume the closing "
        self.advance();
        Ok(self.make_token_with_val(
            Type::String,
            Literal::from(String::from(&self.src[self.start + 1..self.current - 1])),
        ))
    }

    fn number(&mut self) -> Token {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        self.make_token_with_val(
            Type::Number,
            Literal::Num(self.src[self.start..self.current].parse::<f64>().unwrap()),
        )
    }

    fn identifier(&mut self) -> Token {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text = &self.src[self.start..self.current];
        match Scanner::KEYWORDS.get(text) {
            None => self.make_token(Type::Identifier),
            Some(keyword) => self.make_token(*keyword),
        }
    }

    fn current(&self) -> char {
        self.src.chars().nth(self.current).unwrap()
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.current()
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.src.len() {
            '\0'
        } else {
            self.src.chars().nth(self.current + 1).unwrap()
        }
    }

    fn advance(&mut self) -> char {
        let res = self.current();
        self.current += 1;
        res
    }

    fn match_char(&mut self, c: char) -> bool {
        if self.is_at_end() || self.current() != c {
            false
        } else {
            self.current += 1;
            true
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.src.len()
    }

    fn make_token(&mut self, ty: Type) -> Token {
        self.make_token_with_val(ty, Literal::Null)
    }

    fn make_token_with_val(&mut self, ty: Type, val: Literal) -> Token {
        let lexeme = match ty {
            Type::Eof => String::new(),
            _ => String::from(&self.src[self.start..self.current]),
        };

        let token = Token::new(ty, lexeme, self.line, self.start, self.index, val);
        self.index += 1;
        token
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof || self.error.is_some() {
            return None;
        }

        while !self.is_at_end() {
            self.start = self.current;

            let token = self.scan_token();
            match token {
                Ok(None) => continue,
                Ok(Some(token)) => return Some(token),
                Err(err) => {
                    self.error = Some(err);
                    return None;
                }
            }
        }

        self.eof = true;
        Some(self.make_token(Type::Eof))
    }
}
