use thiserror::Error;

/// Raw payload does not match the tensor shape it claims to carry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("malformed payload: {len} bytes is not a whole number of {width}-byte elements")]
    MalformedPayload { len: usize, width: usize },

    #[error("malformed payload: expected {expected} bytes, got {actual}")]
    PayloadSizeMismatch { expected: usize, actual: usize },

    #[error("index out of range: elements {start}..{end} requested from a buffer of {available}")]
    IndexOutOfRange {
        start: usize,
        end: usize,
        available: usize,
    },
}

/// Why a deployed model cannot be driven by this client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("couldn't find model in server status: {0}")]
    ModelNotFound(String),

    #[error("expecting 1 input, got {0}")]
    UnsupportedInputArity(usize),

    #[error("expecting 1 output, got {0}")]
    UnsupportedOutputArity(usize),

    #[error("expecting output type to be F32, got {0:?}")]
    UnsupportedOutputType(crate::DType),

    #[error("expecting model output to be a vector, got dims {0:?}")]
    OutputNotVector(Vec<i64>),

    #[error("batching not supported for model: {model}")]
    BatchingUnsupported { model: String },

    #[error("expecting batch size <= {max} for model [{model}], got {requested}")]
    BatchSizeExceeded {
        model: String,
        max: u32,
        requested: u32,
    },

    #[error("expecting input to have 3 dimensions, model [{model}] input had {rank}")]
    UnsupportedInputRank { model: String, rank: usize },

    #[error("input of model [{model}] must have a fixed-width element type, got {dtype:?}")]
    UnsupportedInputType { model: String, dtype: crate::DType },

    #[error("input dimensions of model [{model}] must be positive, got {dims:?}")]
    NonPositiveInputDim { model: String, dims: Vec<i64> },
}

impl ResolveError {
    /// True when the caller can try again with a different batch size.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            ResolveError::BatchingUnsupported { .. } | ResolveError::BatchSizeExceeded { .. }
        )
    }
}
