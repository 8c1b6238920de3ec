mod client;
mod config;
mod convert;
mod infer;

pub use client::{HealthMode, TrtisClient};
pub use config::{ClientConfig, DEFAULT_TIMEOUT, DEFAULT_URL};
pub use convert::{parse_dtype, parse_layout, snapshot_from_status};
pub use infer::{
    build_infer_request, outcome_from_response, Classification, InferOutcome, InferSpec,
    OutputSpec,
};

pub use trtis_proto::nvidia::inferenceserver as pb;
