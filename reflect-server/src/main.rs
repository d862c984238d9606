use std::sync::Arc;

use clap::Parser;
use reflect_core::ReflectConfig;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use reflect_server::http::{self, HttpState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "reflect.toml")]
    config: String,

    /// Print the resolved generation mode and analytics state, then exit
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience, production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config
    let config = match ReflectConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level));
    fmt().with_env_filter(filter).init();

    let state = Arc::new(HttpState::from_config(config));

    if args.health {
        if state.controller.is_live() {
            println!("✅ Generation: live ({})", state.config.generation.model);
        } else {
            println!(
                "⚠️  Generation: offline fallback ({} not set)",
                state.config.generation.api_key_env
            );
        }

        match state.events.aggregate().await {
            Ok(summary) => println!(
                "✅ Analytics log {}: {} started, {} completed, {} abandoned",
                state.events.path().display(),
                summary.total_conversations,
                summary.completed_conversations,
                summary.abandoned_conversations
            ),
            Err(e) => {
                println!("❌ Analytics log {} unreadable: {}", state.events.path().display(), e);
                std::process::exit(1);
            }
        }

        println!("✅ Reflect health check passed");
        return Ok(());
    }

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    http::start_http_server(state, tx.subscribe()).await?;

    Ok(())
}
