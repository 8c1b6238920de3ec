use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpListener;
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use trtis_client::pb::grpc_service_server::{GrpcService, GrpcServiceServer};
use trtis_client::{pb, ClientConfig, HealthMode, InferSpec, OutputSpec, TrtisClient};
use trtis_core::{decode_i32, decode_i32_slice, encode_u32, resolve_model, IOName};

/// Serves the add/sub `simple` model: OUTPUT0 = INPUT0 + INPUT1, OUTPUT1 = INPUT0 - INPUT1.
struct SimpleServer;

fn ok() -> Option<pb::RequestStatus> {
    Some(pb::RequestStatus {
        code: pb::RequestStatusCode::Success as i32,
        server_id: "mock".to_string(),
        ..Default::default()
    })
}

fn int_input(name: &str) -> pb::ModelInput {
    pb::ModelInput {
        name: name.to_string(),
        data_type: pb::DataType::TypeInt32 as i32,
        format: pb::model_input::Format::None as i32,
        dims: vec![16],
    }
}

fn int_output(name: &str) -> pb::ModelOutput {
    pb::ModelOutput {
        name: name.to_string(),
        data_type: pb::DataType::TypeInt32 as i32,
        dims: vec![16],
        label_filename: String::new(),
    }
}

fn simple_config() -> pb::ModelConfig {
    pb::ModelConfig {
        name: "simple".to_string(),
        platform: "tensorflow_graphdef".to_string(),
        max_batch_size: 0,
        input: vec![int_input("INPUT0"), int_input("INPUT1")],
        output: vec![int_output("OUTPUT0"), int_output("OUTPUT1")],
    }
}

fn vector_config() -> pb::ModelConfig {
    pb::ModelConfig {
        name: "vector".to_string(),
        platform: "onnxruntime_onnx".to_string(),
        max_batch_size: 0,
        input: vec![pb::ModelInput {
            name: "INPUT0".to_string(),
            data_type: pb::DataType::TypeFp32 as i32,
            format: pb::model_input::Format::None as i32,
            dims: vec![16],
        }],
        output: vec![pb::ModelOutput {
            name: "OUTPUT0".to_string(),
            data_type: pb::DataType::TypeFp32 as i32,
            dims: vec![16],
            label_filename: String::new(),
        }],
    }
}

#[tonic::async_trait]
impl GrpcService for SimpleServer {
    async fn status(
        &self,
        req: Request<pb::StatusRequest>,
    ) -> std::result::Result<Response<pb::StatusResponse>, Status> {
        let mut models = HashMap::from([
            ("simple".to_string(), simple_config()),
            ("vector".to_string(), vector_config()),
        ]);
        let wanted = req.into_inner().model_name;
        if !wanted.is_empty() {
            models.retain(|name, _| *name == wanted);
        }
        Ok(Response::new(pb::StatusResponse {
            request_status: ok(),
            server_status: Some(pb::ServerStatus {
                id: "mock".to_string(),
                version: "0.0.0".to_string(),
                model_status: models
                    .into_iter()
                    .map(|(name, config)| {
                        (
                            name,
                            pb::ModelStatus {
                                config: Some(config),
                            },
                        )
                    })
                    .collect(),
            }),
        }))
    }

    async fn health(
        &self,
        req: Request<pb::HealthRequest>,
    ) -> std::result::Result<Response<pb::HealthResponse>, Status> {
        let mode = req.into_inner().mode;
        Ok(Response::new(pb::HealthResponse {
            request_status: ok(),
            health: mode == "live" || mode == "ready",
        }))
    }

    async fn infer(
        &self,
        req: Request<pb::InferRequest>,
    ) -> std::result::Result<Response<pb::InferResponse>, Status> {
        let req = req.into_inner();
        if req.model_name != "simple" {
            return Ok(Response::new(pb::InferResponse {
                request_status: Some(pb::RequestStatus {
                    code: pb::RequestStatusCode::NotFound as i32,
                    msg: format!("unknown model {}", req.model_name),
                    ..Default::default()
                }),
                ..Default::default()
            }));
        }
        let [a, b] = req.raw_input.as_slice() else {
            return Err(Status::invalid_argument("expected two inputs"));
        };
        let a = decode_i32(a).map_err(|e| Status::invalid_argument(e.to_string()))?;
        let b = decode_i32(b).map_err(|e| Status::invalid_argument(e.to_string()))?;
        let sum: Vec<u32> = a.iter().zip(&b).map(|(x, y)| x.wrapping_add(*y) as u32).collect();
        let diff: Vec<u32> = a.iter().zip(&b).map(|(x, y)| x.wrapping_sub(*y) as u32).collect();
        Ok(Response::new(pb::InferResponse {
            request_status: ok(),
            meta_data: None,
            raw_output: vec![encode_u32(&sum).to_vec(), encode_u32(&diff).to_vec()],
        }))
    }
}

async fn start_mock_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        Server::builder()
            .add_service(GrpcServiceServer::new(SimpleServer))
            .serve_with_incoming(tokio_stream::wrappers::TcpListenerStream::new(listener))
            .await
            .unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> Result<TrtisClient> {
    let config = ClientConfig::new(addr.to_string()).with_timeout(Duration::from_secs(5));
    TrtisClient::connect(&config)
}

#[tokio::test(flavor = "multi_thread")]
async fn health_and_status_round_trip() -> Result<()> {
    let client = client_for(start_mock_server().await)?;
    assert!(client.health(HealthMode::Live).await?);
    assert!(client.health(HealthMode::Ready).await?);

    let all = client.status(None).await?;
    assert_eq!(all.models.len(), 2);

    let only = client.status(Some("vector")).await?;
    assert_eq!(only.models.len(), 1);
    let config = resolve_model(&only, "vector", 1)?;
    assert_eq!(config.input_name, IOName::from("INPUT0"));
    assert_eq!(config.output_name, IOName::from("OUTPUT0"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn simple_add_sub_inference() -> Result<()> {
    let client = client_for(start_mock_server().await)?;

    let input0: Vec<u32> = (0..16).collect();
    let input1 = vec![1u32; 16];
    let spec = InferSpec {
        model_name: "simple".to_string(),
        model_version: None,
        batch_size: 1,
        inputs: vec![
            (IOName::from("INPUT0"), encode_u32(&input0)),
            (IOName::from("INPUT1"), encode_u32(&input1)),
        ],
        outputs: vec![OutputSpec::raw("OUTPUT0"), OutputSpec::raw("OUTPUT1")],
    };
    let outcome = client.infer(&spec).await?;

    let sum = decode_i32_slice(outcome.raw_outputs.check_slot(0, 16, 1, 4)?, 0, 16)?;
    let diff = decode_i32_slice(outcome.raw_outputs.check_slot(1, 16, 1, 4)?, 0, 16)?;
    for i in 0..16 {
        assert_eq!(sum[i], i as i32 + 1);
        assert_eq!(diff[i], i as i32 - 1);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn server_side_failure_is_reported() -> Result<()> {
    let client = client_for(start_mock_server().await)?;
    let spec = InferSpec {
        model_name: "missing".to_string(),
        model_version: Some(1),
        batch_size: 1,
        inputs: Vec::new(),
        outputs: Vec::new(),
    };
    let err = client.infer(&spec).await.unwrap_err();
    assert!(format!("{err:#}").contains("unknown model missing"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_fails_within_timeout() -> Result<()> {
    // Bind then drop to get a port nobody listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        listener.local_addr()?
    };
    let client = client_for(addr)?;
    assert!(client.status(None).await.is_err());
    Ok(())
}
