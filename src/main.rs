use anyhow::Context;
use delve::{
    AppState, DelveConfig, OpenAIClient, ResearchCoordinator,
    cli::{
        self, Cli, Commands,
        init::{self, InitConfig, InitResult},
        output::Output,
    },
    utils::toml_config::LogFormat,
};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut cli = Cli::parse_args();
    let command = cli.take_command();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let command = match command {
        Commands::Init { path, force } => {
            return match init::run(InitConfig { path, force }, &output) {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => Err(anyhow::anyhow!(e)),
            };
        }
        other => other,
    };

    let config = DelveConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    init_tracing(&config, cli.verbose, matches!(command, Commands::Serve { .. }));

    let api_key = match config.api_key() {
        Ok(key) => key,
        Err(e) => {
            output.error(&e.to_string());
            output.hint(&format!(
                "Add {} to your environment or .env file",
                config.provider.api_key_env
            ));
            std::process::exit(1);
        }
    };

    let client = Arc::new(OpenAIClient::new(api_key, &config.provider)?);
    let coordinator = Arc::new(ResearchCoordinator::new(
        client.clone(),
        client,
        &config.research,
    ));

    match command {
        Commands::Chat => {
            output.banner();
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::repl::run(stdin, &coordinator, &output, &cli.output_dir).await?;
        }
        Commands::Ask { question, save } => {
            let question = cli::join_question(&question);
            let save_dir = save.then_some(cli.output_dir.as_path());
            if let Err(e) = cli::repl::ask(&coordinator, &output, &question, save_dir).await {
                output.error("An error occurred during research:");
                output.error(&e.to_string());
                std::process::exit(1);
            }
        }
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config, coordinator).await?;
        }
        // handled before provider setup
        Commands::Init { .. } => {}
    }

    Ok(())
}

async fn serve(config: DelveConfig, coordinator: Arc<ResearchCoordinator>) -> anyhow::Result<()> {
    let address = config.bind_address();
    let state = AppState {
        config: Arc::new(config),
        coordinator,
    };

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, delve::api::routes::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// RUST_LOG wins; otherwise the configured level, or debug with `--verbose`.
///
/// Interactive commands log to stderr so stdout stays readable.
fn init_tracing(config: &DelveConfig, verbose: bool, server: bool) {
    let fallback = if verbose {
        "debug"
    } else if server {
        config.server.log_level.as_str()
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
