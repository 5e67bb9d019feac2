use core::fmt;

/// A scalar or a per-path vector.
///
/// Booleans are kept apart from numbers so that a comparison result reads
/// back as a boolean; under arithmetic they coerce to 1 and 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Number(f64),
    Bool(bool),
    Array(&'a [f64]),
    Mask(&'a [bool]),
}

impl<'a> Value<'a> {
    /// Number of elements for vectors, `None` for scalars.
    pub fn vector_len(&self) -> Option<usize> {
        match self {
            Value::Number(_) | Value::Bool(_) => None,
            Value::Array(values) => Some(values.len()),
            Value::Mask(mask) => Some(mask.len()),
        }
    }

    pub fn is_vector(&self) -> bool {
        self.vector_len().is_some()
    }

    /// Truthiness of a scalar. Vectors have no single truth value.
    pub fn truthy(&self) -> Option<bool> {
        match *self {
            Value::Number(n) => Some(n != 0.0),
            Value::Bool(b) => Some(b),
            Value::Array(_) | Value::Mask(_) => None,
        }
    }

    /// The numeric value at path `index`. Scalars ignore the index.
    ///
    /// Callers must check the length first (see [`super::broadcast_len`]).
    pub(crate) fn number_at(&self, index: usize) -> f64 {
        match *self {
            Value::Number(n) => n,
            Value::Bool(b) => bool_to_f64(b),
            Value::Array(values) => values[index],
            Value::Mask(mask) => bool_to_f64(mask[index]),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Value::Number(n) => Some(n),
            Value::Bool(b) => Some(bool_to_f64(b)),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&'a [f64]> {
        match *self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_mask(&self) -> Option<&'a [bool]> {
        match *self {
            Value::Mask(mask) => Some(mask),
            _ => None,
        }
    }

    /// Sum over `len` paths, broadcasting scalars and counting `True` as 1.
    ///
    /// Returns `None` when a vector does not have exactly `len` elements.
    pub fn sum_over(&self, len: usize) -> Option<f64> {
        match *self {
            Value::Number(n) => Some(n * len as f64),
            Value::Bool(b) => Some(bool_to_f64(b) * len as f64),
            Value::Array(values) if values.len() == len => Some(values.iter().sum()),
            Value::Mask(mask) if mask.len() == len => {
                Some(mask.iter().filter(|b| **b).count() as f64)
            }
            Value::Array(_) | Value::Mask(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Array(_) => "array",
            Value::Mask(_) => "boolean array",
        }
    }
}

fn bool_to_f64(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

fn format_bool(f: &mut fmt::Formatter<'_>, b: bool) -> fmt::Result {
    f.write_str(if b { "True" } else { "False" })
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => format_bool(f, b),
            Value::Array(values) => {
                f.write_str("[")?;
                for (i, n) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", n)?;
                }
                f.write_str("]")
            }
            Value::Mask(mask) => {
                f.write_str("[")?;
                for (i, b) in mask.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    format_bool(f, *b)?;
                }
                f.write_str("]")
            }
        }
    }
}
