use tracing::debug;

use crate::{DType, InputDef, Layout, ModelConfig, ResolveError, Shape, StatusSnapshot};

/// Checks that `model_name` is a single-input, single-output vector model that
/// can take `batch_size` instances, and derives how to address it.
///
/// Checks run in a fixed order and stop at the first violation.
pub fn resolve_model(
    status: &StatusSnapshot,
    model_name: &str,
    batch_size: u32,
) -> Result<ModelConfig, ResolveError> {
    let model = status
        .get(model_name)
        .ok_or_else(|| ResolveError::ModelNotFound(model_name.to_string()))?;

    let [input] = model.inputs.as_slice() else {
        return Err(ResolveError::UnsupportedInputArity(model.inputs.len()));
    };
    let [output] = model.outputs.as_slice() else {
        return Err(ResolveError::UnsupportedOutputArity(model.outputs.len()));
    };

    if output.dtype != DType::F32 {
        return Err(ResolveError::UnsupportedOutputType(output.dtype));
    }

    // e.g. [10], [1, 10] and [10, 1, 1] are all vectors.
    if output.dims.iter().filter(|d| **d > 1).count() > 1 {
        return Err(ResolveError::OutputNotVector(output.dims.clone()));
    }

    // No batch axis at all when max_batch_size is 0.
    if model.max_batch_size == 0 {
        if batch_size != 1 {
            return Err(ResolveError::BatchingUnsupported {
                model: model_name.to_string(),
            });
        }
    } else if batch_size > model.max_batch_size {
        return Err(ResolveError::BatchSizeExceeded {
            model: model_name.to_string(),
            max: model.max_batch_size,
            requested: batch_size,
        });
    }

    let (channels, height, width) = input_chw(model_name, input)?;
    if input.dtype.byte_size().is_none() {
        return Err(ResolveError::UnsupportedInputType {
            model: model_name.to_string(),
            dtype: input.dtype,
        });
    }
    // Every declared dim was checked positive above.
    let input_dims = Shape(input.dims.iter().map(|d| *d as usize).collect());

    let config = ModelConfig {
        input_name: input.name.clone(),
        output_name: output.name.clone(),
        channels,
        height,
        width,
        input_layout: input.layout,
        input_dims,
        input_element_type: input.dtype,
        output_element_type: output.dtype,
    };
    debug!(
        model = model_name,
        input = %config.input_name,
        output = %config.output_name,
        channels,
        height,
        width,
        "resolved model config"
    );
    Ok(config)
}

/// Image inputs are CHW or HWC; a rank-1 input is a flat vector `1 x 1 x n`.
fn input_chw(model_name: &str, input: &InputDef) -> Result<(usize, usize, usize), ResolveError> {
    let (c, h, w) = match (input.dims.as_slice(), input.layout) {
        ([n], _) => (1, 1, *n),
        ([h, w, c], Layout::ChannelLast) => (*c, *h, *w),
        ([c, h, w], Layout::ChannelFirst | Layout::Unspecified) => (*c, *h, *w),
        _ => {
            return Err(ResolveError::UnsupportedInputRank {
                model: model_name.to_string(),
                rank: input.dims.len(),
            })
        }
    };

    let positive = |d: i64| usize::try_from(d).ok().filter(|d| *d > 0);
    match (positive(c), positive(h), positive(w)) {
        (Some(c), Some(h), Some(w)) => Ok((c, h, w)),
        _ => Err(ResolveError::NonPositiveInputDim {
            model: model_name.to_string(),
            dims: input.dims.clone(),
        }),
    }
}
