use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "trtis", version, about = "TensorRT inference server client")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Inference server gRPC address
    #[arg(short = 'u', long, env = "TRTIS_URL", default_value = "localhost:8001", global = true)]
    pub url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "TRTIS_TIMEOUT_SECS", default_value_t = 10, global = true)]
    pub timeout_secs: u64,

    /// Log level (RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    pub log: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report whether the server is live and ready
    Health,

    /// Print the configuration of deployed models
    Status {
        /// Only report this model
        #[arg(short = 'm', long)]
        model: Option<String>,
    },

    /// Run the add/sub example model and check its results
    Simple {
        /// Name of the add/sub model
        #[arg(short = 'm', long, default_value = "simple")]
        model: String,

        /// Model version (latest when omitted)
        #[arg(short = 'x', long)]
        model_version: Option<i64>,
    },

    /// Check that a classification model fits this client and plan its batches
    Resolve {
        /// Name of model being served
        #[arg(short = 'm', long)]
        model: String,

        /// Model version (latest when omitted)
        #[arg(short = 'x', long)]
        model_version: Option<i64>,

        /// Instances per request
        #[arg(short = 'b', long, default_value_t = 1)]
        batch_size: u32,

        /// Number of class predictions to report
        #[arg(short = 'c', long, default_value_t = 1)]
        classes: u32,

        /// Input file or directory of inputs
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,
    },
}
