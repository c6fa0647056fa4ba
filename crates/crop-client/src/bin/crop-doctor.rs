use anyhow::Context;
use clap::{value_parser, Arg, ArgMatches, Command};
use crop_client::{render_results, FileCandidate, HttpAnalyzeClient, UiState, ViewStateMachine};
use crop_core::telemetry::init_tracing;
use crop_core::{ClientConfig, Language, StaticTranslations, TextKey};
use std::path::PathBuf;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("crop-doctor")
        .version(crop_core::VERSION)
        .about("Diagnose a crop photo with the Crop Doctor service")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML client configuration"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("analyze")
                .about("Upload an image and print the diagnosis")
                .arg(
                    Arg::new("image")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Image file to analyze"),
                )
                .arg(
                    Arg::new("lang")
                        .long("lang")
                        .help("Diagnosis and label language (en, hi)"),
                )
                .arg(
                    Arg::new("server")
                        .long("server")
                        .help("Base URL of the analysis server"),
                ),
        )
}

async fn resolve_config(matches: &ArgMatches, args: &ArgMatches) -> anyhow::Result<ClientConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ClientConfig::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::new(),
    };
    if let Some(code) = args.get_one::<String>("lang") {
        let language = Language::parse(code)
            .with_context(|| format!("unsupported language {code:?}, expected en or hi"))?;
        config = config.with_language(language);
    }
    if let Some(server) = args.get_one::<String>("server") {
        config = config.with_base_url(server.clone());
    }
    Ok(config)
}

async fn analyze(matches: &ArgMatches, args: &ArgMatches) -> anyhow::Result<bool> {
    let config = resolve_config(matches, args).await?;
    init_tracing(&config.log);

    let client = HttpAnalyzeClient::from_config(&config)?;
    let labels = Arc::new(StaticTranslations::new());
    let mut view = ViewStateMachine::new(client, labels.clone(), config.language);

    let path = args
        .get_one::<PathBuf>("image")
        .context("image path is required")?;
    let candidate = FileCandidate::from_path(path).await?;

    if view.select_file(candidate).is_ok() {
        println!("{}...", view.label(TextKey::Analyzing));
        // Failures surface as notices below.
        let _ = view.submit().await;
    }

    for notice in view.take_notices() {
        eprintln!("{}: {}", notice.title, notice.description);
    }

    match view.state() {
        UiState::Resolved(result) => {
            println!("{}", render_results(result, labels.as_ref(), view.language()));
            Ok(true)
        }
        _ => Ok(false),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let succeeded = match matches.subcommand() {
        Some(("analyze", args)) => analyze(&matches, args).await?,
        _ => unreachable!("subcommand is required"),
    };

    std::process::exit(if succeeded { 0 } else { 1 });
}
