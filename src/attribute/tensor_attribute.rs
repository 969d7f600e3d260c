//! Per-document tensor storage.

use crate::error::{DocMatchError, Result};
use crate::tensor::{Tensor, TensorType};

/// A named attribute holding one dense tensor per document.
#[derive(Debug)]
pub struct TensorAttribute {
    name: String,
    tensor_type: TensorType,
    docs: Vec<Option<Tensor>>,
}

impl TensorAttribute {
    pub fn new<S: Into<String>>(name: S, tensor_type: TensorType) -> Self {
        TensorAttribute {
            name: name.into(),
            tensor_type,
            docs: Vec::new(),
        }
    }

    /// Store a tensor for a document. Its type must match the attribute type.
    pub fn set_tensor(&mut self, doc_id: u32, tensor: Tensor) -> Result<()> {
        if tensor.tensor_type() != &self.tensor_type {
            return Err(DocMatchError::attribute(format!(
                "attribute '{}' has type {}, got {}",
                self.name,
                self.tensor_type,
                tensor.tensor_type()
            )));
        }
        let idx = doc_id as usize;
        if self.docs.len() <= idx {
            self.docs.resize_with(idx + 1, || None);
        }
        self.docs[idx] = Some(tensor);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tensor_type(&self) -> &TensorType {
        &self.tensor_type
    }

    /// The document's tensor, or the zero tensor of the attribute type.
    pub fn tensor(&self, doc_id: u32) -> Tensor {
        self.docs
            .get(doc_id as usize)
            .and_then(Option::as_ref)
            .cloned()
            .unwrap_or_else(|| Tensor::zero(self.tensor_type.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_lookup() {
        let mut attr = TensorAttribute::new("embedding", TensorType::vector("x", 2));
        let tensor = Tensor::new(TensorType::vector("x", 2), vec![0.5, 1.5]).unwrap();
        attr.set_tensor(4, tensor.clone()).unwrap();

        assert_eq!(attr.tensor(4), tensor);
        assert_eq!(attr.tensor(2).cells(), &[0.0, 0.0]);
        assert_eq!(attr.tensor(50).cells(), &[0.0, 0.0]);
    }

    #[test]
    fn test_type_mismatch() {
        let mut attr = TensorAttribute::new("embedding", TensorType::vector("x", 2));
        let wrong = Tensor::new(TensorType::vector("y", 2), vec![0.5, 1.5]).unwrap();
        assert!(attr.set_tensor(1, wrong).is_err());
    }
}
