use crate::value::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// A single scope in the scope chain. Children hold the only links, pointing
/// upward to their enclosing scope, so the `Rc` graph stays acyclic and a
/// child can be dropped independently of its parent.
#[derive(Debug, Default)]
pub struct Environment {
    enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Value>,
    constants: HashSet<String>,
}

#[derive(Debug, PartialEq)]
pub enum BindError {
    /// The name is already bound in this scope (ancestors don't conflict).
    Duplicate,
    /// No scope in the chain binds the name.
    Undefined,
    /// The nearest binding scope marked the name constant.
    ReadOnly,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn with(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            enclosing: Some(enclosing),
            values: HashMap::new(),
            constants: HashSet::new(),
        }
    }

    pub fn define(&mut self, key: &str, value: Value, constant: bool) -> Result<(), BindError> {
        if self.values.contains_key(key) {
            return Err(BindError::Duplicate);
        }

        if constant {
            self.constants.insert(String::from(key));
        }
        self.values.insert(String::from(key), value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(val) = self.values.get(key) {
            Some(val.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.as_ref().borrow().get(key)
        } else {
            None
        }
    }

    pub fn assign(&mut self, key: &str, value: Value) -> Result<(), BindError> {
        if let Some(val) = self.values.get_mut(key) {
            if self.constants.contains(key) {
                return Err(BindError::ReadOnly);
            }

            *val = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.as_ref().borrow_mut().assign(key, value)
        } else {
            Err(BindError::Undefined)
        }
    }
}
