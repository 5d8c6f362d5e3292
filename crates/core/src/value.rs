//! Runtime values bound to options, parameters and numeric flags.

use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use serde::Serialize;

/// A parsed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Values of an option or flag given more than once, in order.
    Tuple(Vec<Value>),
}

impl Value {
    /// Merge another occurrence into this value.
    ///
    /// The first repeat turns a scalar into a two element tuple, further
    /// repeats append to it.
    pub fn accumulate(self, next: Value) -> Value {
        match self {
            Value::Tuple(mut values) => {
                values.push(next);
                Value::Tuple(values)
            }
            scalar => Value::Tuple(vec![scalar, next]),
        }
    }

    /// Number of occurrences this value stands for.
    pub fn occurrences(&self) -> usize {
        match self {
            Value::Tuple(values) => values.len(),
            _ => 1,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            Value::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(values) => Some(values),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(value) => write!(formatter, "{value}"),
            Value::Int(value) => write!(formatter, "{value}"),
            Value::Float(value) => write!(formatter, "{value}"),
            Value::Str(value) => write!(formatter, "{value:?}"),
            Value::Tuple(values) => {
                formatter.write_str("(")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{value}")?;
                }
                formatter.write_str(")")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(values: Vec<V>) -> Self {
        Value::Tuple(values.into_iter().map(Into::into).collect())
    }
}

/// Merge `next` into an optional slot, see [`Value::accumulate`].
pub fn accumulate_into(slot: &mut Option<Value>, next: Value) {
    *slot = Some(match slot.take() {
        Some(previous) => previous.accumulate(next),
        None => next,
    });
}

/// Coerce a positional parameter: integer first, then float, else the string itself.
pub fn coerce_parameter(raw: &str) -> Value {
    if let Ok(value) = raw.parse::<i64>() {
        return Value::Int(value);
    }

    if let Ok(value) = raw.parse::<f64>() {
        return Value::Float(value);
    }

    Value::Str(raw.to_string())
}

type ValidatorFn = dyn Fn(&str) -> Result<Value, String> + Send + Sync;

/// A named, user supplied value check used in place of a built-in type.
#[derive(Clone)]
pub struct Validator {
    name: String,
    check: Arc<ValidatorFn>,
}

impl Validator {
    pub fn new<F>(name: &str, check: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, raw: &str) -> Result<Value, String> {
        (self.check)(raw)
    }
}

impl Debug for Validator {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("Validator").field("name", &self.name).finish()
    }
}

/// How the value of an option is checked and converted.
#[derive(Debug, Clone, Default)]
pub enum ValueType {
    /// A flag. Takes no value.
    #[default]
    Bool,
    Int,
    Float,
    Str,
    Custom(Validator),
}

impl ValueType {
    pub fn custom<F>(name: &str, check: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        ValueType::Custom(Validator::new(name, check))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, ValueType::Bool)
    }

    pub fn name(&self) -> &str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "str",
            ValueType::Custom(validator) => validator.name(),
        }
    }

    /// Convert a raw value. A `Bool` option never accepts one.
    ///
    /// # Errors
    ///
    /// Returns the reason the value was rejected.
    pub fn coerce(&self, raw: &str) -> Result<Value, String> {
        match self {
            ValueType::Bool => Err("a boolean option takes no value".to_string()),
            ValueType::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| e.to_string()),
            ValueType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| e.to_string()),
            ValueType::Str => Ok(Value::Str(raw.to_string())),
            ValueType::Custom(validator) => validator.check(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_parameter_order() {
        assert_eq!(coerce_parameter("3"), Value::Int(3));
        assert_eq!(coerce_parameter("-3"), Value::Int(-3));
        assert_eq!(coerce_parameter("2.5"), Value::Float(2.5));
        assert_eq!(coerce_parameter("abc"), Value::Str("abc".to_string()));
        assert_eq!(coerce_parameter(""), Value::Str(String::new()));
    }

    #[test]
    fn test_accumulate_turns_scalar_into_tuple() {
        let value = Value::Bool(true).accumulate(Value::Bool(true));
        assert_eq!(value, Value::Tuple(vec![Value::Bool(true), Value::Bool(true)]));

        let value = value.accumulate(Value::Bool(false));
        assert_eq!(value.occurrences(), 3);
        assert_eq!(value.as_tuple().unwrap()[2], Value::Bool(false));
    }

    #[test]
    fn test_accumulate_into_slot() {
        let mut slot = None;
        accumulate_into(&mut slot, Value::Int(11));
        assert_eq!(slot, Some(Value::Int(11)));

        accumulate_into(&mut slot, Value::Int(12));
        assert_eq!(slot, Some(Value::from(vec![11_i64, 12])));
    }

    #[test]
    fn test_value_type_coerce() {
        assert_eq!(ValueType::Int.coerce("42"), Ok(Value::Int(42)));
        assert!(ValueType::Int.coerce("4.2").is_err());
        assert_eq!(ValueType::Float.coerce("4.2"), Ok(Value::Float(4.2)));
        assert_eq!(ValueType::Str.coerce("4.2"), Ok(Value::from("4.2")));
        assert!(ValueType::Bool.coerce("yes").is_err());
    }

    #[test]
    fn test_custom_validator() {
        let even = ValueType::custom("even", |raw| match raw.parse::<i64>() {
            Ok(number) if number % 2 == 0 => Ok(Value::Int(number)),
            _ => Err(format!("`{raw}` is not an even number")),
        });

        assert_eq!(even.name(), "even");
        assert!(!even.is_bool());
        assert_eq!(even.coerce("4"), Ok(Value::Int(4)));
        assert!(even.coerce("5").is_err());
    }

    #[test]
    fn test_value_display() {
        let value = Value::from(vec![Value::Int(11), Value::Int(12)]);
        assert_eq!(value.to_string(), "(11, 12)");
        assert_eq!(Value::from("x").to_string(), "\"x\"");
    }
}
