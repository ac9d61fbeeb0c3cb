use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::ptr;
use std::rc::Rc;

use quill_core::Literal;

use crate::callable::Callable;

#[derive(Debug, Clone)]
pub enum Value {
    Callable(Rc<dyn Callable>),
    Object(Rc<RefCell<HashMap<String, Value>>>),
    Str(Rc<String>),
    Num(f64),
    Bool(bool),
    Null,
}

impl From<Literal> for Value {
    fn from(value: Literal) -> Self {
        match value {
            Literal::Str(val) => Value::Str(Rc::new(val)),
            Literal::Num(val) => Value::Num(val),
            Literal::Null => Value::Null,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Callables and objects compare by identity, everything else by value
            (Value::Callable(lhs), Value::Callable(rhs)) => ptr::eq(lhs, rhs),
            (Value::Object(lhs), Value::Object(rhs)) => Rc::ptr_eq(lhs, rhs),
            (Value::Str(lhs), Value::Str(rhs)) => lhs == rhs,
            (Value::Num(lhs), Value::Num(rhs)) => lhs == rhs,
            (Value::Bool(lhs), Value::Bool(rhs)) => lhs == rhs,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Rc::new(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Rc::new(String::from(value)))
    }
}

macro_rules! impl_from_num_for_value {
    ( $( $t:ident )* ) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Value {
                    Value::Num(n as f64)
                }
            }
        )*
    }
}

impl_from_num_for_value!(u8 i8 u16 i16 u32 i32 u64 i64 u128 i128 usize isize f32 f64);

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Callable(val) => {
                write!(f, "{:?}", val)
            }
            Value::Object(properties) => {
                // Sorted so the rendering doesn't depend on hash order
                let properties = RefCell::borrow(properties);
                let mut keys: Vec<&String> = properties.keys().collect();
                keys.sort();

                write!(f, "{{ ")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, properties[key.as_str()])?;
                }
                write!(f, " }}")
            }
            Value::Str(val) => write!(f, "{}", val),
            Value::Num(val) => write!(f, "{}", val),
            Value::Bool(val) => write!(f, "{}", val),
            Value::Null => write!(f, "null"),
        }
    }
}
