//! Dense n-dimensional numeric arrays read from a store.

use crate::error::{StoreError, StoreResult};

/// A decoded numeric variable: values in row-major order plus the dimension lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl Field {
    /// Create a field, checking that the value count matches the shape.
    pub fn new(shape: Vec<usize>, values: Vec<f64>) -> StoreResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(StoreError::InvalidFormat(format!(
                "shape {:?} needs {} values, got {}",
                shape,
                expected,
                values.len()
            )));
        }
        Ok(Self { shape, values })
    }

    /// A 1-D field.
    pub fn vector(values: Vec<f64>) -> Self {
        Self {
            shape: vec![values.len()],
            values,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
