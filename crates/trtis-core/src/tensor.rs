use bytes::Bytes;
use smallvec::SmallVec;

use crate::CodecError;

/// Element tags understood by the inference server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F16,
    F32,
    F64,
    String,
}

impl DType {
    /// Width of one element on the wire. Strings are length-prefixed, so they have none.
    pub fn byte_size(self) -> Option<usize> {
        match self {
            DType::Bool | DType::U8 | DType::I8 => Some(1),
            DType::U16 | DType::I16 | DType::F16 => Some(2),
            DType::U32 | DType::I32 | DType::F32 => Some(4),
            DType::U64 | DType::I64 | DType::F64 => Some(8),
            DType::String => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape(pub SmallVec<[usize; 6]>);

impl Shape {
    pub fn from_slice(d: &[usize]) -> Self {
        Self(d.iter().copied().collect())
    }
    pub fn numel(&self) -> usize {
        self.0.iter().product::<usize>().max(1)
    }
}

/// One raw payload per tensor slot, in declaration order.
///
/// Instances of a batch are concatenated inside each slot; slots are never
/// interleaved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTensorBatch {
    pub slots: Vec<Bytes>,
}

impl RawTensorBatch {
    pub fn new(slots: Vec<Bytes>) -> Self {
        Self { slots }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Result<&Bytes, CodecError> {
        self.slots.get(index).ok_or(CodecError::IndexOutOfRange {
            start: index,
            end: index.saturating_add(1),
            available: self.slots.len(),
        })
    }

    /// Returns the slot after checking it holds exactly `batch_size` instances
    /// of `elements_per_instance` elements.
    pub fn check_slot(
        &self,
        index: usize,
        elements_per_instance: usize,
        batch_size: usize,
        element_width: usize,
    ) -> Result<&Bytes, CodecError> {
        let slot = self.slot(index)?;
        let expected = elements_per_instance
            .checked_mul(batch_size)
            .and_then(|n| n.checked_mul(element_width));
        match expected {
            Some(expected) if expected == slot.len() => Ok(slot),
            // An overflowing size can never match a real buffer.
            expected => Err(CodecError::PayloadSizeMismatch {
                expected: expected.unwrap_or(usize::MAX),
                actual: slot.len(),
            }),
        }
    }
}
