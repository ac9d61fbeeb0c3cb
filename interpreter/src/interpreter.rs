use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use quill_core::{Literal, Token, Type};

use crate::ast::{Expr, ExprVisitor, Property, Stmt, StmtVisitor};
use crate::callable::{Function, Native, NativeFn};
use crate::env::{BindError, Environment};
use crate::error::Error;
use crate::parser::Program;
use crate::value::Value;

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    env: Rc<RefCell<Environment>>,
}

impl Interpreter {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let globals = Rc::new(RefCell::new(Environment::new()));

        {
            // Booleans are ordinary constant bindings in the global scope,
            // not keywords known to the scanner.
            let mut globals = RefCell::borrow_mut(&globals);
            globals.define("true", Value::Bool(true), true).unwrap();
            globals.define("false", Value::Bool(false), true).unwrap();
        }

        Interpreter {
            env: globals.clone(),
            globals,
        }
    }

    /// Binds a host-provided function into the global scope. This is the only
    /// extension point the host needs to expose new capabilities to scripts.
    pub fn define_native(&mut self, name: &str, arity: usize, func: NativeFn) -> Result<(), Error> {
        let native = Native::new(func, String::from(name), arity);
        RefCell::borrow_mut(&self.globals)
            .define(name, Value::Callable(Rc::new(native)), false)
            .map_err(|_| Error::duplicate_definition(name))
    }

    /// Evaluates the program statement by statement and yields the value of
    /// the last one, or null for an empty program.
    pub fn interpret(&mut self, program: &Program) -> Result<Value, Error> {
        let mut result = Value::Null;
        for stmt in &program.0 {
            result = self.visit_stmt(stmt)?;
        }
        Ok(result)
    }

    pub(crate) fn execute_block_with_env(
        &mut self,
        stmts: &[Stmt],
        env: Rc<RefCell<Environment>>,
    ) -> Result<Value, Error> {
        let current = self.env.clone();
        self.env = env;

        let mut result = Ok(Value::Null);
        for stmt in stmts {
            result = self.visit_stmt(stmt);
            if result.is_err() {
                break;
            }
        }

        self.env = current;
        result
    }

    pub(crate) fn env(&self) -> Rc<RefCell<Environment>> {
        self.env.clone()
    }

    fn lookup(&self, name: &Token) -> Result<Value, Error> {
        RefCell::borrow(&self.env)
            .get(&name.lexeme)
            .ok_or_else(|| Error::undefined_variable(&name.lexeme))
    }
}

impl ExprVisitor for Interpreter {
    type Item = Value;

    fn visit_assign(
        &mut self,
        assignee: &Expr,
        token: &Token,
        value: &Expr,
    ) -> Result<Value, Error> {
        // Only plain variables are assignable in this grammar
        let name = match assignee {
            Expr::Variable { name } => name,
            _ => return Err(Error::NotAssignable { line: token.line }),
        };

        let value = self.visit_expr(value)?;
        match RefCell::borrow_mut(&self.env).assign(&name.lexeme, value.clone()) {
            Ok(()) => Ok(value),
            Err(BindError::ReadOnly) => Err(Error::const_reassignment(&name.lexeme)),
            Err(BindError::Undefined) => Err(Error::undefined_variable(&name.lexeme)),
            Err(BindError::Duplicate) => unreachable!("assignment never defines a binding"),
        }
    }

    fn visit_binary(
        &mut self,
        left: &Expr,
        operator: &Token,
        right: &Expr,
    ) -> Result<Value, Error> {
        let left = self.visit_expr(left)?;
        let right = self.visit_expr(right)?;

        // Arithmetic is defined on numbers only. Nothing is coerced, a
        // mismatch on either side is a type error.
        match (left, right) {
            (Value::Num(left), Value::Num(right)) => match operator.ty {
                Type::Plus => Ok(Value::Num(left + right)),
                Type::Minus => Ok(Value::Num(left - right)),
                Type::Star => Ok(Value::Num(left * right)),
                Type::Slash => Ok(Value::Num(left / right)),
                Type::Percent => Ok(Value::Num(left % right)),
                _ => unreachable!("parser only folds arithmetic operators"),
            },
            _ => Err(Error::type_error(
                operator.line,
                "Operands must be numbers.",
            )),
        }
    }

    fn visit_call(
        &mut self,
        callee: &Expr,
        paren: &Token,
        args: &[Expr],
    ) -> Result<Value, Error> {
        let callee = self.visit_expr(callee)?;
        let mut evaluated_args = Vec::new();
        for arg in args {
            evaluated_args.push(self.visit_expr(arg)?);
        }

        match callee {
            Value::Callable(func) => {
                if func.arity() != evaluated_args.len() {
                    return Err(Error::arity(
                        func.name(),
                        func.arity(),
                        evaluated_args.len(),
                    ));
                }

                func.execute(self, &evaluated_args)
            }
            _ => Err(Error::type_error(paren.line, "Can only call functions.")),
        }
    }

    fn visit_literal(&mut self, value: &Literal) -> Result<Value, Error> {
        Ok(Value::from(value.clone()))
    }

    fn visit_object(&mut self, properties: &[Property]) -> Result<Value, Error> {
        let mut map = HashMap::new();
        for property in properties {
            let value = match &property.value {
                Some(expr) => self.visit_expr(expr)?,
                // Shorthand: the key doubles as a variable reference,
                // resolved now, in the active environment
                None => self.lookup(&property.key)?,
            };
            map.insert(property.key.lexeme.clone(), value);
        }

        Ok(Value::Object(Rc::new(RefCell::new(map))))
    }

    fn visit_variable(&mut self, name: &Token) -> Result<Value, Error> {
        self.lookup(name)
    }
}

impl StmtVisitor for Interpreter {
    type Item = Value;

    fn visit_expression(&mut self, expression: &Expr) -> Result<Value, Error> {
        self.visit_expr(expression)
    }

    fn visit_function(
        &mut self,
        name: &Token,
        params: &[Token],
        body: &[Stmt],
    ) -> Result<Value, Error> {
        // The function captures the environment it is declared in
        let function = Rc::new(Function::new(self.env.clone(), name, params, body));
        RefCell::borrow_mut(&self.env)
            .define(&name.lexeme, Value::Callable(function), false)
            .map_err(|_| Error::duplicate_definition(&name.lexeme))?;

        Ok(Value::Null)
    }

    fn visit_var(
        &mut self,
        name: &Token,
        constant: bool,
        init: Option<&Expr>,
    ) -> Result<Value, Error> {
        let value = match init {
            Some(expr) => self.visit_expr(expr)?,
            None => Value::Null,
        };

        RefCell::borrow_mut(&self.env)
            .define(&name.lexeme, value.clone(), constant)
            .map_err(|_| Error::duplicate_definition(&name.lexeme))?;

        Ok(value)
    }
}
