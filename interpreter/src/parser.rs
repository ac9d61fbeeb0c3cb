use crate::ast::{Expr, Property, Stmt};
use crate::error::Error;
use quill_core::{Literal, Token, Type};

pub struct Parser<'a> {
    tokens: &'a Vec<Token>,
    current: usize,
}

// A wrapper over the statement list to not leak Stmt to public
#[derive(Debug, PartialEq)]
pub struct Program(pub(crate) Vec<Stmt>);

// Helper aliases for shorter return types
type StmtResult = Result<Stmt, Error>;
type ExprResult = Result<Expr, Error>;

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a Vec<Token>) -> Self {
        Parser { tokens, current: 0 }
    }

    // The first grammar violation aborts the whole parse. There is no
    // synchronization point to recover at and no partial program output.
    pub fn parse(&mut self) -> Result<Program, Error> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        Ok(Program(statements))
    }

    fn declaration(&mut self) -> StmtResult {
        if self.match_either(&[Type::Let, Type::Const]) {
            let constant = self.previous().ty == Type::Const;
            self.var_declaration(constant)
        } else if self.match_one(Type::Fn) {
            self.function()
        } else {
            self.statement()
        }
    }

    fn var_declaration(&mut self, constant: bool) -> StmtResult {
        let name = self.consume(Type::Identifier, "Expected identifier")?.clone();

        // A bare declaration is only legal when the semicolon follows the
        // identifier immediately. It binds the name to null.
        if self.match_one(Type::SemiColon) {
            return Ok(Stmt::var(name, constant, None));
        }

        self.consume(Type::Equal, "Expected variable assignment")?;
        let init = self.expression()?;
        self.consume(Type::SemiColon, "Expected semicolon")?;
        Ok(Stmt::var(name, constant, Some(init)))
    }

    fn function(&mut self) -> StmtResult {
        let name = self
            .consume(Type::Identifier, "Expected function name")?
            .clone();
        self.consume(Type::LeftParen, "Expected '(' after function name")?;

        let mut params = Vec::new();
        if !self.check(Type::RightParen) {
            loop {
                if params.len() > 255 {
                    return Err(Error::parse_error(
                        self.peek(),
                        "Can't have more than 255 parameters.",
                    ));
                }

                params.push(
                    self.consume(Type::Identifier, "Expected parameter name")?
                        .clone(),
                );
                if !self.match_one(Type::Comma) {
                    break;
                }
            }
        }

        self.consume(Type::RightParen, "Expected ')' after parameters")?;
        self.consume(Type::LeftBrace, "Expected '{' before function body")?;

        let mut body = Vec::new();
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            body.push(self.declaration()?);
        }
        self.consume(Type::RightBrace, "Expected '}' after function body")?;

        Ok(Stmt::function(name, params, body))
    }

    fn statement(&mut self) -> StmtResult {
        let expr = self.expression()?;

        // A terminating semicolon is tolerated but not mandatory for a plain
        // expression statement; assignments already consumed theirs as part
        // of the expression grammar.
        self.match_one(Type::SemiColon);
        Ok(Stmt::expression(expr))
    }

    fn expression(&mut self) -> ExprResult {
        self.assignment()
    }

    // Assignment chains to the right, and every `=` demands a closing
    // semicolon of its own. That makes assignment well-formed only as a full
    // statement: nested inside another expression (say a call argument) the
    // terminator check necessarily fails. The assignee shape is not
    // inspected here, the evaluator rejects non-variable targets.
    fn assignment(&mut self) -> ExprResult {
        let expr = self.object()?;
        if self.match_one(Type::Equal) {
            let token = self.previous().clone();
            let value = self.assignment()?;
            self.consume(Type::SemiColon, "Expected semicolon")?;
            Ok(Expr::assign(expr, token, value))
        } else {
            Ok(expr)
        }
    }

    fn object(&mut self) -> ExprResult {
        if !self.match_one(Type::LeftBrace) {
            return self.additive();
        }

        let mut properties = Vec::new();
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            let key = self.consume(Type::Identifier, "Expected identifier")?.clone();

            // Shorthand forms: `{ key, ... }` and `{ key }`. The closing
            // brace is left for the loop exit to consume.
            if self.match_one(Type::Comma) {
                properties.push(Property::shorthand(key));
                continue;
            }
            if self.check(Type::RightBrace) {
                properties.push(Property::shorthand(key));
                continue;
            }

            self.consume(Type::Colon, "Expected colon")?;
            let value = self.expression()?;
            properties.push(Property::new(key, value));

            if !self.check(Type::RightBrace) && !self.match_one(Type::Comma) {
                return Err(Error::parse_error(
                    self.peek(),
                    "Expected close brace or comma",
                ));
            }
        }

        self.consume(Type::RightBrace, "Expected close brace or comma")?;
        Ok(Expr::object(properties))
    }

    fn additive(&mut self) -> ExprResult {
        let mut expr = self.multiplicative()?;
        while self.match_either(&[Type::Plus, Type::Minus]) {
            let operator = self.previous().clone();
            let right = self.multiplicative()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn multiplicative(&mut self) -> ExprResult {
        let mut expr = self.call()?;
        while self.match_either(&[Type::Star, Type::Slash, Type::Percent]) {
            let operator = self.previous().clone();
            let right = self.call()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn call(&mut self) -> ExprResult {
        let mut expr = self.primary()?;
        while self.match_one(Type::LeftParen) {
            expr = self.finish_call(expr)?;
        }
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ExprResult {
        let mut args: Vec<Expr> = Vec::new();
        if !self.check(Type::RightParen) {
            loop {
                if args.len() >= 255 {
                    return Err(Error::parse_error(
                        self.peek(),
                        "Can't have more than 255 arguments.",
                    ));
                }

                args.push(self.expression()?);
                if !self.match_one(Type::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(Type::RightParen, "Expected ')' after arguments")?;
        Ok(Expr::call(callee, paren.clone(), args))
    }

    fn primary(&mut self) -> ExprResult {
        if self.match_one(Type::Number) {
            Ok(Expr::literal(self.previous().value.clone()))
        } else if self.match_one(Type::String) {
            Ok(Expr::literal(self.previous().value.clone()))
        } else if self.match_one(Type::Null) {
            Ok(Expr::literal(Literal::Null))
        } else if self.match_one(Type::Identifier) {
            Ok(Expr::variable(self.previous().clone()))
        } else if self.match_one(Type::LeftParen) {
            // Parenthesized groups don't materialize a node of their own
            let expr = self.expression()?;
            self.consume(Type::RightParen, "Expected close paren")?;
            Ok(expr)
        } else {
            let token = self.peek();
            Err(Error::parse_error(
                token,
                &format!("Unexpected token {} ({:?})", token.lexeme, token.ty),
            ))
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().ty == Type::Eof
    }

    fn check(&self, ty: Type) -> bool {
        if self.is_at_end() {
            false
        } else {
            self.peek().ty == ty
        }
    }

    fn consume(&mut self, ty: Type, msg: &str) -> Result<&Token, Error> {
        if self.check(ty) {
            Ok(self.advance())
        } else {
            Err(Error::parse_error(self.peek(), msg))
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn match_either(&mut self, types: &[Type]) -> bool {
        for ty in types {
            if self.match_one(*ty) {
                // Already skipped in the `match_one`, just return result
                return true;
            }
        }

        false
    }

    fn match_one(&mut self, ty: Type) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Expr, Property, Stmt};
    use crate::error::Error;
    use crate::parser::{Parser, Program};
    use quill_core::{Literal, Scanner, Token, Type};

    macro_rules! token {
        ($ty:ident, $lex:literal, $col:literal, $idx:literal) => {
            Token::new(Type::$ty, String::from($lex), 0, $col, $idx, Literal::Null)
        };
    }

    fn parse(src: &str) -> Result<Program, Error> {
        let mut scanner = Scanner::new();
        let tokens = scanner.scan_tokens(src).collect_tokens().unwrap();
        Parser::new(&tokens).parse()
    }

    #[test]
    fn test_statements() {
        let tests = [
            // precedence, multiplicative binds tighter
            (
                "1 + 2 * 3;",
                Stmt::expression(Expr::binary(
                    Expr::literal(1),
                    token!(Plus, "+", 2, 1),
                    Expr::binary(Expr::literal(2), token!(Star, "*", 6, 3), Expr::literal(3)),
                )),
            ),
            // left associativity
            (
                "10 - 3 - 2;",
                Stmt::expression(Expr::binary(
                    Expr::binary(
                        Expr::literal(10),
                        token!(Minus, "-", 3, 1),
                        Expr::literal(3),
                    ),
                    token!(Minus, "-", 7, 3),
                    Expr::literal(2),
                )),
            ),
            // parenthesized groups return the inner expression directly
            (
                "(1 + 2) * 3;",
                Stmt::expression(Expr::binary(
                    Expr::binary(Expr::literal(1), token!(Plus, "+", 3, 2), Expr::literal(2)),
                    token!(Star, "*", 8, 5),
                    Expr::literal(3),
                )),
            ),
            // variable declarations
            (
                "let x = 5;",
                Stmt::var(token!(Identifier, "x", 4, 1), false, Some(Expr::literal(5))),
            ),
            (
                "const y;",
                Stmt::var(token!(Identifier, "y", 6, 1), true, None),
            ),
            // assignment keeps the assignee as a general expression
            (
                "x = 1;",
                Stmt::expression(Expr::assign(
                    Expr::variable(token!(Identifier, "x", 0, 0)),
                    token!(Equal, "=", 2, 1),
                    Expr::literal(1),
                )),
            ),
            // object literal with a shorthand property
            (
                "{ a: 1, b };",
                Stmt::expression(Expr::object(vec![
                    Property::new(token!(Identifier, "a", 2, 1), Expr::literal(1)),
                    Property::shorthand(token!(Identifier, "b", 8, 5)),
                ])),
            ),
            ("{};", Stmt::expression(Expr::object(vec![]))),
            // literals
            ("null;", Stmt::expression(Expr::literal(Literal::Null))),
            ("\"hi\";", Stmt::expression(Expr::literal("hi"))),
            // calls
            (
                "add(1, 2);",
                Stmt::expression(Expr::call(
                    Expr::variable(token!(Identifier, "add", 0, 0)),
                    token!(RightParen, ")", 8, 5),
                    vec![Expr::literal(1), Expr::literal(2)],
                )),
            ),
            (
                "f()();",
                Stmt::expression(Expr::call(
                    Expr::call(
                        Expr::variable(token!(Identifier, "f", 0, 0)),
                        token!(RightParen, ")", 2, 2),
                        vec![],
                    ),
                    token!(RightParen, ")", 4, 4),
                    vec![],
                )),
            ),
            // function declaration
            (
                "fn id(x) { x; }",
                Stmt::function(
                    token!(Identifier, "id", 3, 1),
                    vec![token!(Identifier, "x", 6, 3)],
                    vec![Stmt::expression(Expr::variable(token!(
                        Identifier, "x", 11, 6
                    )))],
                ),
            ),
        ];

        for (src, expected) in tests {
            assert_eq!(parse(src), Ok(Program(vec![expected])), "source: {}", src);
        }
    }

    #[test]
    fn test_parse_errors() {
        let tests = [
            ("let x = ;", "Unexpected token ; (SemiColon)"),
            ("let = 5;", "Expected identifier"),
            ("const y", "Expected variable assignment"),
            ("let x = 5", "Expected semicolon"),
            ("(1 + 2;", "Expected close paren"),
            ("1 + * 2;", "Unexpected token * (Star)"),
            ("{ a 1 };", "Expected colon"),
            ("{ a: 1 b };", "Expected close brace or comma"),
            ("fn (x) { x; }", "Expected function name"),
            // assignment isn't a general sub-expression, its mandatory
            // terminator cannot appear inside an argument list
            ("f(x = 1);", "Expected semicolon"),
        ];

        for (src, expected) in tests {
            match parse(src) {
                Err(Error::ParseError { msg, .. }) => assert_eq!(msg, expected, "source: {}", src),
                other => panic!("expected parse error for {:?}, got {:?}", src, other),
            }
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        let src = "let a = 1; fn inc(n) { n + 1; } { a, b: inc(a) };";
        assert_eq!(parse(src), parse(src));
    }
}
