//! Dense tensor values produced by object-kind features.
//!
//! A [`Tensor`] remembers the [`TensorEngine`] that created it; feature
//! extraction serializes tensors through that engine so the bytes handed to
//! summary consumers are the engine's canonical encoding.

pub mod engine;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DocMatchError, Result};

pub use self::engine::{DenseTensorEngine, TensorEngine};

/// A named, sized (indexed) tensor dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Dimension name, e.g. `x`.
    pub name: String,
    /// Number of indices along this dimension.
    pub size: u32,
}

impl Dimension {
    pub fn new<S: Into<String>>(name: S, size: u32) -> Self {
        Dimension {
            name: name.into(),
            size,
        }
    }
}

/// Type of a dense tensor. A type without dimensions is a plain double.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TensorType {
    dimensions: Vec<Dimension>,
}

impl TensorType {
    /// Create a tensor type. Dimensions are kept sorted by name.
    pub fn new(mut dimensions: Vec<Dimension>) -> Result<Self> {
        dimensions.sort_by(|a, b| a.name.cmp(&b.name));
        for pair in dimensions.windows(2) {
            if pair[0].name == pair[1].name {
                return Err(DocMatchError::tensor(format!(
                    "duplicate dimension '{}'",
                    pair[0].name
                )));
            }
        }
        if let Some(empty) = dimensions.iter().find(|d| d.size == 0) {
            return Err(DocMatchError::tensor(format!(
                "dimension '{}' has size 0",
                empty.name
            )));
        }
        Ok(TensorType { dimensions })
    }

    /// Shorthand for a single indexed dimension, `tensor(name[size])`.
    pub fn vector<S: Into<String>>(name: S, size: u32) -> Self {
        TensorType {
            dimensions: vec![Dimension::new(name, size)],
        }
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn is_double(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Number of cells a dense tensor of this type holds.
    pub fn cell_count(&self) -> usize {
        self.dimensions.iter().map(|d| d.size as usize).product()
    }

    /// Like [`TensorType::cell_count`], but `None` when the product does
    /// not fit in a `usize`.
    pub fn checked_cell_count(&self) -> Option<usize> {
        self.dimensions
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(d.size as usize))
    }
}

impl fmt::Display for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_double() {
            return write!(f, "double");
        }
        write!(f, "tensor(")?;
        for (i, dim) in self.dimensions.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}[{}]", dim.name, dim.size)?;
        }
        write!(f, ")")
    }
}

/// A dense tensor with row-major cells.
#[derive(Clone)]
pub struct Tensor {
    tensor_type: TensorType,
    cells: Vec<f64>,
    engine: &'static dyn TensorEngine,
}

impl Tensor {
    /// Create a tensor owned by the default dense engine.
    pub fn new(tensor_type: TensorType, cells: Vec<f64>) -> Result<Self> {
        Self::with_engine(tensor_type, cells, DenseTensorEngine::get())
    }

    pub fn with_engine(
        tensor_type: TensorType,
        cells: Vec<f64>,
        engine: &'static dyn TensorEngine,
    ) -> Result<Self> {
        if cells.len() != tensor_type.cell_count() {
            return Err(DocMatchError::tensor(format!(
                "{} expects {} cells, got {}",
                tensor_type,
                tensor_type.cell_count(),
                cells.len()
            )));
        }
        Ok(Tensor {
            tensor_type,
            cells,
            engine,
        })
    }

    /// All-zero tensor of the given type.
    pub fn zero(tensor_type: TensorType) -> Self {
        let cells = vec![0.0; tensor_type.cell_count()];
        Tensor {
            tensor_type,
            cells,
            engine: DenseTensorEngine::get(),
        }
    }

    pub fn tensor_type(&self) -> &TensorType {
        &self.tensor_type
    }

    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// The engine responsible for encoding this tensor.
    pub fn engine(&self) -> &'static dyn TensorEngine {
        self.engine
    }

    /// Scalar projection: the sum of all cells.
    pub fn as_double(&self) -> f64 {
        self.cells.iter().sum()
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.tensor_type == other.tensor_type && self.cells == other.cells
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("type", &self.tensor_type.to_string())
            .field("cells", &self.cells)
            .finish()
    }
}
