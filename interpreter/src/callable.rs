use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use quill_core::Token;

use crate::ast::Stmt;
use crate::env::Environment;
use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::value::Value;

#[derive(Debug, PartialEq)]
pub enum CallableType {
    Function,
    Native,
}

pub trait Callable {
    fn ty(&self) -> CallableType;
    fn name(&self) -> &str;
    fn arity(&self) -> usize;
    fn execute(
        self: Rc<Self>,
        interpreter: &mut Interpreter,
        args: &[Value],
    ) -> Result<Value, Error>;
}

impl Debug for dyn Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{:?} {}>", self.ty(), self.name())
    }
}

/// The calling convention a host capability must satisfy: evaluated arguments
/// plus the environment active at the call site.
pub type NativeFn = Box<dyn Fn(&[Value], Rc<RefCell<Environment>>) -> Result<Value, Error>>;

// `Native` bridges host-provided Rust functions and the quill interpreter.
// All of these trait objects live in the global scope.
pub(crate) struct Native {
    func: NativeFn,
    name: String,
    arity: usize,
}

impl Native {
    pub(crate) fn new(func: NativeFn, name: String, arity: usize) -> Self {
        Self { func, name, arity }
    }
}

impl Callable for Native {
    fn ty(&self) -> CallableType {
        CallableType::Native
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn execute(
        self: Rc<Self>,
        interpreter: &mut Interpreter,
        args: &[Value],
    ) -> Result<Value, Error> {
        (self.func)(args, interpreter.env())
    }
}

#[derive(Debug)]
pub(crate) struct Function {
    closure: Rc<RefCell<Environment>>,
    name: Token,
    params: Vec<Token>,
    body: Vec<Stmt>,
}

impl Function {
    // The body statements are stored by value. An Rc into the program tree
    // would avoid the copy, but declarations are parsed once and the clone
    // happens only when the declaration statement is evaluated.
    pub(crate) fn new(
        closure: Rc<RefCell<Environment>>,
        name: &Token,
        params: &[Token],
        body: &[Stmt],
    ) -> Self {
        Function {
            closure,
            name: name.clone(),
            params: Vec::from(params),
            body: Vec::from(body),
        }
    }
}

impl Callable for Function {
    fn ty(&self) -> CallableType {
        CallableType::Function
    }

    fn name(&self) -> &str {
        &self.name.lexeme
    }

    fn arity(&self) -> usize {
        self.params.len()
    }

    fn execute(
        self: Rc<Self>,
        interpreter: &mut Interpreter,
        args: &[Value],
    ) -> Result<Value, Error> {
        // The new scope encloses the environment captured at definition time,
        // not the caller's. Arity has already been checked by the call site.
        let mut env = Environment::with(Rc::clone(&self.closure));
        for (param, arg) in self.params.iter().zip(args) {
            env.define(&param.lexeme, arg.clone(), false)
                .map_err(|_| Error::duplicate_definition(&param.lexeme))?;
        }

        interpreter.execute_block_with_env(&self.body, Rc::new(RefCell::new(env)))
    }
}
