use std::time::Duration;

use anyhow::{Context, Result};
use tonic::transport::{Channel, Endpoint};
use tracing::debug;
use trtis_core::StatusSnapshot;

use crate::convert::{check_request_status, snapshot_from_status};
use crate::infer::{build_infer_request, outcome_from_response, InferOutcome, InferSpec};
use crate::pb;
use crate::pb::grpc_service_client::GrpcServiceClient;
use crate::ClientConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthMode {
    Live,
    Ready,
}

impl HealthMode {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthMode::Live => "live",
            HealthMode::Ready => "ready",
        }
    }
}

/// Thin wrapper over the generated stub. Every call carries the configured
/// timeout and is attempted once.
#[derive(Clone)]
pub struct TrtisClient {
    client: GrpcServiceClient<Channel>,
    timeout: Duration,
}

impl TrtisClient {
    /// The channel connects on first use, so an unreachable server shows up
    /// as an error from the first call rather than from here.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let channel = Endpoint::from_shared(config.endpoint_uri())
            .with_context(|| format!("invalid inference server address {}", config.url))?
            .connect_timeout(config.timeout)
            .connect_lazy();
        Ok(Self {
            client: GrpcServiceClient::new(channel),
            timeout: config.timeout,
        })
    }

    pub async fn health(&self, mode: HealthMode) -> Result<bool> {
        let request = self.request(pb::HealthRequest {
            mode: mode.as_str().to_string(),
        });
        let mut client = self.client.clone();
        let resp = client
            .health(request)
            .await
            .with_context(|| format!("couldn't get server health ({})", mode.as_str()))?
            .into_inner();
        check_request_status(resp.request_status.as_ref())?;
        debug!(mode = mode.as_str(), health = resp.health, "server health");
        Ok(resp.health)
    }

    /// Fetches the status of one model, or of every model when `model` is `None`.
    pub async fn status(&self, model: Option<&str>) -> Result<StatusSnapshot> {
        let request = self.request(pb::StatusRequest {
            model_name: model.unwrap_or_default().to_string(),
        });
        let mut client = self.client.clone();
        let resp = client
            .status(request)
            .await
            .context("couldn't get server status")?
            .into_inner();
        let snapshot = snapshot_from_status(resp)?;
        debug!(models = snapshot.models.len(), "server status");
        Ok(snapshot)
    }

    pub async fn infer(&self, spec: &InferSpec) -> Result<InferOutcome> {
        let request = self.request(build_infer_request(spec));
        let mut client = self.client.clone();
        let resp = client
            .infer(request)
            .await
            .with_context(|| format!("error processing infer request for {}", spec.model_name))?
            .into_inner();
        let outcome = outcome_from_response(resp)?;
        debug!(
            model = %spec.model_name,
            outputs = outcome.raw_outputs.slot_count(),
            "inference complete"
        );
        Ok(outcome)
    }

    fn request<T>(&self, msg: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(msg);
        request.set_timeout(self.timeout);
        request
    }
}
