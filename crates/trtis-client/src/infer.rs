use anyhow::{Context, Result};
use bytes::Bytes;
use trtis_core::{IOName, RawTensorBatch};

use crate::convert::check_request_status;
use crate::pb;

/// Version sent when the caller does not pin one.
const LATEST_VERSION: i64 = -1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputSpec {
    pub name: IOName,
    /// Ask the server for the top-k classes instead of only the raw tensor.
    pub top_k: Option<u32>,
}

impl OutputSpec {
    pub fn raw(name: impl Into<String>) -> Self {
        Self {
            name: IOName(name.into()),
            top_k: None,
        }
    }

    pub fn classes(name: impl Into<String>, top_k: u32) -> Self {
        Self {
            name: IOName(name.into()),
            top_k: Some(top_k),
        }
    }
}

/// Everything needed for one inference call.
#[derive(Clone, Debug)]
pub struct InferSpec {
    pub model_name: String,
    pub model_version: Option<i64>,
    pub batch_size: u32,
    /// One raw payload per input, batch instances concatenated.
    pub inputs: Vec<(IOName, Bytes)>,
    pub outputs: Vec<OutputSpec>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub index: i32,
    pub score: f32,
    pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct InferOutcome {
    /// One payload per requested output, in request order.
    pub raw_outputs: RawTensorBatch,
    /// Per output, per batch instance, the top-k classes (empty unless asked for).
    pub classes: Vec<Vec<Vec<Classification>>>,
}

pub fn build_infer_request(spec: &InferSpec) -> pb::InferRequest {
    let input = spec
        .inputs
        .iter()
        .map(|(name, data)| pb::infer_request_header::Input {
            name: name.0.clone(),
            dims: Vec::new(),
            batch_byte_size: data.len() as u64,
        })
        .collect();

    let output = spec
        .outputs
        .iter()
        .map(|out| pb::infer_request_header::Output {
            name: out.name.0.clone(),
            cls: out
                .top_k
                .map(|count| pb::infer_request_header::output::Class { count }),
        })
        .collect();

    tracing::trace!(
        model = %spec.model_name,
        batch_size = spec.batch_size,
        inputs = spec.inputs.len(),
        "building infer request"
    );

    pb::InferRequest {
        model_name: spec.model_name.clone(),
        model_version: spec.model_version.unwrap_or(LATEST_VERSION),
        meta_data: Some(pb::InferRequestHeader {
            batch_size: spec.batch_size,
            input,
            output,
        }),
        raw_input: spec.inputs.iter().map(|(_, data)| data.to_vec()).collect(),
    }
}

pub fn outcome_from_response(resp: pb::InferResponse) -> Result<InferOutcome> {
    check_request_status(resp.request_status.as_ref()).context("inference request failed")?;

    let classes = resp
        .meta_data
        .map(|header| {
            header
                .output
                .into_iter()
                .map(|out| {
                    out.batch_classes
                        .into_iter()
                        .map(|instance| {
                            instance
                                .cls
                                .into_iter()
                                .map(|c| Classification {
                                    index: c.idx,
                                    score: c.value,
                                    label: c.label,
                                })
                                .collect()
                        })
                        .collect()
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(InferOutcome {
        raw_outputs: RawTensorBatch::new(resp.raw_output.into_iter().map(Bytes::from).collect()),
        classes,
    })
}
