use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use crop_core::telemetry::init_tracing;
use crop_core::{LogFormat, ServerConfig, StoreConfig};
use crop_server::{serve, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("crop-server")
        .version(crop_core::VERSION)
        .about("Crop Doctor analysis endpoint")
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .value_parser(value_parser!(SocketAddr))
                .help("Listen address, e.g. 0.0.0.0:5000"),
        )
        .arg(
            Arg::new("delay-ms")
                .long("delay-ms")
                .value_parser(value_parser!(u64))
                .help("Placeholder analysis latency in milliseconds"),
        )
        .arg(
            Arg::new("store-path")
                .long("store-path")
                .value_parser(value_parser!(PathBuf))
                .conflicts_with("memory-store")
                .help("Append analyses to this JSON-lines file"),
        )
        .arg(
            Arg::new("memory-store")
                .long("memory-store")
                .action(ArgAction::SetTrue)
                .help("Keep analyses in memory only"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_parser(["pretty", "json"])
                .help("Log output format"),
        )
}

async fn resolve_config(args: &ArgMatches) -> anyhow::Result<ServerConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => ServerConfig::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::new(),
    };

    if let Some(addr) = args.get_one::<SocketAddr>("bind") {
        config = config.with_bind_addr(*addr);
    }
    if let Some(delay) = args.get_one::<u64>("delay-ms") {
        config = config.with_analysis_delay_ms(*delay);
    }
    if let Some(path) = args.get_one::<PathBuf>("store-path") {
        config = config.with_store(StoreConfig::Jsonl { path: path.clone() });
    }
    if args.get_flag("memory-store") {
        config = config.with_store(StoreConfig::Memory);
    }
    if let Some(format) = args.get_one::<String>("log-format").and_then(|f| LogFormat::parse(f)) {
        config = config.with_log_format(format);
    }

    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli().get_matches();
    let config = resolve_config(&args).await?;
    init_tracing(&config.log);

    let state = AppState::from_config(&config)
        .await
        .context("building server state")?;
    tracing::debug!(?config, "configuration resolved");

    serve(&config, state, shutdown_signal()).await?;
    Ok(())
}
