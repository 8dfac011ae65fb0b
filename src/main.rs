use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use lane_zen as app;
use lane_zen::config::{AppConfig, RuntimeEnvironment};

/// Lane Zen freight forecasting server
#[derive(Debug, Parser)]
#[command(name = "lane-zen", version, about)]
struct Cli {
    /// Runtime environment: development, qa or production
    #[arg(long = "env")]
    environment: Option<String>,

    /// Address to bind, overrides `host`
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overrides `port`
    #[arg(long)]
    port: Option<u16>,
}

impl Cli {
    fn apply(self, mut cfg: AppConfig) -> AppConfig {
        if let Some(name) = self.environment.as_deref() {
            cfg = cfg.with_environment(name);
        }
        if let Some(host) = self.host {
            cfg.host = host;
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        cfg
    }
}

fn environment_banner(cfg: &AppConfig) -> String {
    // ANSI colour per environment
    let colour = match cfg.environment {
        RuntimeEnvironment::Development => "34",
        RuntimeEnvironment::Qa => "33",
        RuntimeEnvironment::Production => "31",
    };
    let line = format!(
        "{} - Running in {} mode",
        cfg.app_name,
        cfg.environment.as_ref().to_uppercase()
    );
    let rule = "─".repeat(line.chars().count() + 2);
    format!(
        "\x1b[{c}m┌{rule}┐\n│ {line} │\n└{rule}┘\x1b[0m",
        c = colour,
        rule = rule,
        line = line
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = app::config::with_bootstrap_logging(std::io::stderr, || {
        app::config::load_config().map(|cfg| cli.apply(cfg))
    })
    .context("failed to load configuration")?;
    app::config::init_tracing(cfg.log_level, cfg.log_json);

    println!("{}", environment_banner(&cfg));
    if cfg.use_mock_data {
        info!("Serving data from mock fixtures");
    }
    if cfg.debug_mode {
        info!("Debug mode enabled, configuration at /api/config");
    }

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.host, cfg.port))?;
    let state = app::AppState::from_config(cfg).context("failed to build application state")?;
    let router = app::app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Lane Zen ready on http://{}", addr);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
