//! Tensor engines and the dense binary format.
//!
//! Layout (network byte order):
//!
//! ```text
//! u8        format tag (DENSE_FORMAT)
//! varint    dimension count
//! per dim:  varint name length, name bytes (UTF-8), varint size
//! f64 * N   cells, row-major, N = product of sizes
//! ```

use std::fmt::Debug;
use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{DocMatchError, Result};
use crate::tensor::{Dimension, Tensor, TensorType};
use crate::util::varint;

/// Format tag for dense tensors.
pub const DENSE_FORMAT: u8 = 2;

/// Serialization engine for tensors.
pub trait TensorEngine: Send + Sync + Debug {
    /// Append the binary encoding of `tensor` to `out`.
    fn encode(&self, tensor: &Tensor, out: &mut Vec<u8>) -> Result<()>;

    /// Decode a tensor previously produced by [`TensorEngine::encode`].
    fn decode(&self, bytes: &[u8]) -> Result<Tensor>;
}

/// The canonical engine for dense tensors.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenseTensorEngine;

static DENSE_ENGINE: DenseTensorEngine = DenseTensorEngine;

impl DenseTensorEngine {
    /// Shared engine instance.
    pub fn get() -> &'static DenseTensorEngine {
        &DENSE_ENGINE
    }
}

impl TensorEngine for DenseTensorEngine {
    fn encode(&self, tensor: &Tensor, out: &mut Vec<u8>) -> Result<()> {
        let dims = tensor.tensor_type().dimensions();
        out.write_u8(DENSE_FORMAT)?;
        varint::write_u64(out, dims.len() as u64)?;
        for dim in dims {
            varint::write_u64(out, dim.name.len() as u64)?;
            out.extend_from_slice(dim.name.as_bytes());
            varint::write_u64(out, dim.size as u64)?;
        }
        for &cell in tensor.cells() {
            out.write_f64::<BigEndian>(cell)?;
        }
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Tensor> {
        let mut reader = Cursor::new(bytes);

        let tag = reader.read_u8()?;
        if tag != DENSE_FORMAT {
            return Err(DocMatchError::tensor(format!("unknown format tag {tag}")));
        }

        let dim_count = varint::read_len(&mut reader)?;
        let mut dimensions = Vec::with_capacity(dim_count.min(64));
        for _ in 0..dim_count {
            let name_len = varint::read_len(&mut reader)?;
            if name_len > remaining(&reader) {
                return Err(DocMatchError::tensor("dimension name exceeds buffer"));
            }
            let mut name = vec![0u8; name_len];
            reader.read_exact(&mut name)?;
            let name = String::from_utf8(name)
                .map_err(|e| DocMatchError::tensor(format!("dimension name is not UTF-8: {e}")))?;
            let size = u32::try_from(varint::read_u64(&mut reader)?)
                .map_err(|_| DocMatchError::tensor(format!("size of '{name}' out of range")))?;
            dimensions.push(Dimension::new(name, size));
        }
        let tensor_type = TensorType::new(dimensions)?;

        let (cell_count, cell_bytes) = tensor_type
            .checked_cell_count()
            .and_then(|count| Some((count, count.checked_mul(8)?)))
            .ok_or_else(|| DocMatchError::tensor("cell count overflows"))?;
        if remaining(&reader) != cell_bytes {
            return Err(DocMatchError::tensor(format!(
                "{} expects {} cell bytes, found {}",
                tensor_type,
                cell_bytes,
                remaining(&reader)
            )));
        }
        let mut cells = Vec::with_capacity(cell_count);
        for _ in 0..cell_count {
            cells.push(reader.read_f64::<BigEndian>()?);
        }

        Tensor::with_engine(tensor_type, cells, DenseTensorEngine::get())
    }
}

fn remaining(reader: &Cursor<&[u8]>) -> usize {
    reader.get_ref().len().saturating_sub(reader.position() as usize)
}
