//! Values produced by object-kind features.

use crate::tensor::Tensor;

/// An object feature value: either a tensor or a plain double.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Double(f64),
    Tensor(Tensor),
}

impl Value {
    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Value::Tensor(tensor) => Some(tensor),
            Value::Double(_) => None,
        }
    }

    /// Scalar projection of the value.
    pub fn as_double(&self) -> f64 {
        match self {
            Value::Double(v) => *v,
            Value::Tensor(tensor) => tensor.as_double(),
        }
    }

    pub fn is_tensor(&self) -> bool {
        matches!(self, Value::Tensor(_))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<Tensor> for Value {
    fn from(tensor: Tensor) -> Self {
        Value::Tensor(tensor)
    }
}
