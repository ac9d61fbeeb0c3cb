use crate::error::Error;
use quill_core::{Literal, Token};
use std::rc::Rc;

// Currently tokens are cloned in every creation (stmt or expr) because they are not that
// expensive to do so, and the cloning are done during parsing stage only.

#[derive(Debug, PartialEq)]
pub(crate) enum Expr {
    Assign {
        assignee: Box<Expr>,
        token: Token,
        value: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        paren: Token,
        args: Vec<Expr>,
    },
    Literal {
        value: Literal,
    },
    Object {
        properties: Vec<Property>,
    },
    Variable {
        name: Token,
    },
}

// A property with no value expression is the shorthand form `{ key }`; the
// value is resolved by looking the key up in the active environment when the
// object literal is evaluated, not when it is parsed.
#[derive(Debug, PartialEq)]
pub(crate) struct Property {
    pub(crate) key: Token,
    pub(crate) value: Option<Expr>,
}

impl Property {
    pub(crate) fn new(key: Token, value: Expr) -> Self {
        Property {
            key,
            value: Some(value),
        }
    }

    pub(crate) fn shorthand(key: Token) -> Self {
        Property { key, value: None }
    }
}

pub(crate) trait ExprVisitor {
    type Item;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Item, Error> {
        match expr {
            Expr::Assign {
                assignee,
                token,
                value,
            } => self.visit_assign(assignee, token, value),
            Expr::Binary {
                left,
                operator,
                right,
            } => self.visit_binary(left, operator, right),
            Expr::Call {
                callee,
                paren,
                args,
            } => self.visit_call(callee, paren, args),
            Expr::Literal { value } => self.visit_literal(value),
            Expr::Object { properties } => self.visit_object(properties),
            Expr::Variable { name } => self.visit_variable(name),
        }
    }

    fn visit_assign(
        &mut self,
        assignee: &Expr,
        token: &Token,
        value: &Expr,
    ) -> Result<Self::Item, Error>;
    fn visit_binary(
        &mut self,
        left: &Expr,
        operator: &Token,
        right: &Expr,
    ) -> Result<Self::Item, Error>;
    fn visit_call(
        &mut self,
        callee: &Expr,
        paren: &Token,
        args: &[Expr],
    ) -> Result<Self::Item, Error>;
    fn visit_literal(&mut self, value: &Literal) -> Result<Self::Item, Error>;
    fn visit_object(&mut self, properties: &[Property]) -> Result<Self::Item, Error>;
    fn visit_variable(&mut self, name: &Token) -> Result<Self::Item, Error>;
}

impl Expr {
    // Creator methods, these could most likely be written as a proc-macro, but I will need
    // a separate crate. So here they go.
    pub(crate) fn assign(assignee: Expr, token: Token, value: Expr) -> Self {
        Expr::Assign {
            assignee: Box::new(assignee),
            token,
            value: Box::new(value),
        }
    }

    pub(crate) fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub(crate) fn call(callee: Expr, paren: Token, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            paren,
            args,
        }
    }

    pub(crate) fn literal<T>(value: T) -> Self
    where
        Literal: From<T>,
    {
        Expr::Literal {
            value: Literal::from(value),
        }
    }

    pub(crate) fn object(properties: Vec<Property>) -> Self {
        Expr::Object { properties }
    }

    pub(crate) fn variable(name: Token) -> Self {
        Expr::Variable { name }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub(crate) enum Stmt {
    Expression {
        expression: Rc<Expr>,
    },
    Function {
        name: Token,
        params: Vec<Token>,
        body: Vec<Stmt>,
    },
    Var {
        name: Token,
        constant: bool,
        init: Option<Rc<Expr>>,
    },
}

pub(crate) trait StmtVisitor {
    type Item;

    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<Self::Item, Error> {
        match stmt {
            Stmt::Expression { expression } => self.visit_expression(expression),
            Stmt::Function { name, params, body } => self.visit_function(name, params, body),
            Stmt::Var {
                name,
                constant,
                init,
            } => self.visit_var(name, *constant, init.as_deref()),
        }
    }

    fn visit_expression(&mut self, expression: &Expr) -> Result<Self::Item, Error>;
    fn visit_function(
        &mut self,
        name: &Token,
        params: &[Token],
        body: &[Stmt],
    ) -> Result<Self::Item, Error>;
    fn visit_var(
        &mut self,
        name: &Token,
        constant: bool,
        init: Option<&Expr>,
    ) -> Result<Self::Item, Error>;
}

impl Stmt {
    pub(crate) fn expression(expression: Expr) -> Self {
        Stmt::Expression {
            expression: Rc::new(expression),
        }
    }

    pub(crate) fn function(name: Token, params: Vec<Token>, body: Vec<Stmt>) -> Self {
        Stmt::Function { name, params, body }
    }

    pub(crate) fn var(name: Token, constant: bool, init: Option<Expr>) -> Self {
        Stmt::Var {
            name,
            constant,
            init: init.map(Rc::new),
        }
    }
}
