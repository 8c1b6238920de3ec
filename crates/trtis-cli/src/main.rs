mod cli;
mod inputs;
mod simple;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use trtis_client::{ClientConfig, HealthMode, TrtisClient};
use trtis_core::{resolve_model, StatusSnapshot};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    std::env::set_var("RUST_LOG", &cli.global.log);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::new(cli.global.url.clone())
        .with_timeout(Duration::from_secs(cli.global.timeout_secs));
    let client = TrtisClient::connect(&config)?;
    tracing::debug!(url = %config.url, timeout = ?config.timeout, "client configured");

    match cli.command {
        Command::Health => health(&client).await,
        Command::Status { model } => status(&client, model.as_deref()).await,
        Command::Simple {
            model,
            model_version,
        } => simple::run(&client, model, model_version).await,
        Command::Resolve {
            model,
            model_version,
            batch_size,
            classes,
            input,
        } => {
            resolve(
                &client,
                &model,
                model_version,
                batch_size,
                classes,
                input.as_deref(),
            )
            .await
        }
    }
}

async fn health(client: &TrtisClient) -> Result<()> {
    let live = client.health(HealthMode::Live).await?;
    println!("Health - Live: {live}");
    let ready = client.health(HealthMode::Ready).await?;
    println!("Health - Ready: {ready}");
    Ok(())
}

async fn status(client: &TrtisClient, model: Option<&str>) -> Result<()> {
    let snapshot = client.status(model).await?;
    print_status(&snapshot);
    Ok(())
}

fn print_status(snapshot: &StatusSnapshot) {
    let mut names: Vec<_> = snapshot.models.keys().collect();
    names.sort();
    for name in names {
        let model = &snapshot.models[name];
        println!("{name} (max_batch_size {})", model.max_batch_size);
        for input in &model.inputs {
            println!(
                "  input  {} {:?} {:?} {:?}",
                input.name, input.dims, input.layout, input.dtype
            );
        }
        for output in &model.outputs {
            println!("  output {} {:?} {:?}", output.name, output.dims, output.dtype);
        }
    }
}

async fn resolve(
    client: &TrtisClient,
    model: &str,
    model_version: Option<i64>,
    batch_size: u32,
    classes: u32,
    input: Option<&std::path::Path>,
) -> Result<()> {
    let snapshot = client.status(Some(model)).await?;
    let config = resolve_model(&snapshot, model, batch_size)
        .with_context(|| format!("couldn't parse model {model}"))?;
    tracing::info!(model, "found model");
    println!("{config:#?}");

    let Some(input) = input else {
        return Ok(());
    };
    let files = inputs::discover_inputs(input).await?;
    let version = model_version.map_or_else(|| "latest".to_string(), |v| v.to_string());
    for (i, batch) in inputs::plan_batches(&config, &files, batch_size).iter().enumerate() {
        println!(
            "request {i}: {model} (version {version}) batch {} input {} dims {:?} {} bytes, output {} top-{classes}",
            batch.files.len(),
            config.input_name,
            config.input_dims.0.as_slice(),
            batch.batch_byte_size,
            config.output_name,
        );
        for file in &batch.files {
            println!("  {}", file.display());
        }
    }
    Ok(())
}
