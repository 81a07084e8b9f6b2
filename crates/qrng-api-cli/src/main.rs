/*
[INPUT]:  CLI arguments, optional YAML configuration, QRNG_* environment, OS signals
[OUTPUT]: Entropy, health status or streamed chunks on stdout; logs on stderr
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use qrng_api::{
    EntropyMethod, Format, GenerateOptions, QrngClient, QrngStreamClient, SignatureType,
    StreamOptions,
};
use qrng_api_cli::CliConfig;
use qrng_api_cli::commands::{self, StreamExit};

#[derive(Parser, Debug)]
#[command(name = "qrng", version, about = "Quantum random numbers from the QRNG API")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "api-key", value_name = "KEY", global = true)]
    api_key: Option<String>,
    #[arg(long = "base-url", value_name = "URL", global = true)]
    base_url: Option<String>,
    #[arg(long = "timeout-ms", value_name = "MS", global = true)]
    timeout_ms: Option<u64>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one block of signed entropy
    Generate(GenerateArgs),
    /// Show service health
    Health,
    /// Print live entropy chunks, one per line
    Stream(StreamArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long, default_value_t = qrng_api::DEFAULT_BYTES)]
    bytes: u32,
    #[arg(long, default_value_t = Format::Hex)]
    format: Format,
    #[arg(long)]
    method: Option<EntropyMethod>,
    #[arg(long = "signature-type")]
    signature_type: Option<SignatureType>,
    /// Print the full result (proof, signature, metadata) as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct StreamArgs {
    #[arg(long = "chunk-size", default_value_t = qrng_api::DEFAULT_CHUNK_SIZE)]
    chunk_size: u32,
    #[arg(long, default_value_t = Format::Hex)]
    format: Format,
    /// Stop after this many chunks
    #[arg(long)]
    count: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = CliConfig::load(args.config_path.as_deref())
        .context("load config")?
        .overlay(CliConfig {
            api_key: args.api_key.clone(),
            base_url: args.base_url.clone(),
            timeout_ms: args.timeout_ms,
        });
    info!(
        base_url = config.base_url.as_deref().unwrap_or(qrng_api::http::client::DEFAULT_BASE_URL),
        "configuration loaded"
    );

    let mut stdout = std::io::stdout().lock();
    match args.command {
        Command::Generate(generate) => {
            let client = QrngClient::with_config(config.client_config()?)
                .context("build http client")?;
            let mut options = GenerateOptions::default()
                .with_bytes(generate.bytes)
                .with_format(generate.format);
            options.method = generate.method;
            options.signature_type = generate.signature_type;
            commands::generate(&client, &options, generate.json, &mut stdout).await?;
        }
        Command::Health => {
            let client = QrngClient::with_config(config.client_config()?)
                .context("build http client")?;
            commands::health(&client, &mut stdout).await?;
        }
        Command::Stream(stream) => {
            let api_key = config.api_key()?;
            let mut client = match config.base_url.as_deref() {
                Some(base_url) => QrngStreamClient::with_base_url(api_key, base_url),
                None => QrngStreamClient::new(api_key),
            };
            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());

            let options = StreamOptions::default()
                .with_chunk_size(stream.chunk_size)
                .with_format(stream.format);
            let exit =
                commands::stream(&mut client, options, stream.count, shutdown, &mut stdout).await?;
            if exit == StreamExit::ServerClosed {
                info!("stream closed by server");
            }
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
