use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tower_http::cors::CorsLayer;

use facerelay_core::detection::infrastructure::model_resolver;
use facerelay_core::relay::registry::ConnectionRegistry;

mod ws;

/// Real-time face-detection frame relay over WebSocket.
#[derive(Parser)]
#[command(name = "facerelay")]
struct Cli {
    /// Address to bind the server to.
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    /// Path to the face-detection ONNX model (resolved from the user
    /// cache, or downloaded, when the file is absent).
    #[arg(long, default_value = "models/res10_300x300_ssd.onnx")]
    model: PathBuf,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = 0.5)]
    confidence: f32,

    /// Minimum interval between processed frames, in milliseconds.
    #[arg(long, default_value_t = 100)]
    frame_interval_ms: u64,
}

/// Shared state handed to every connection handler.
pub(crate) struct AppState {
    pub(crate) model_path: PathBuf,
    pub(crate) confidence: f32,
    pub(crate) frame_interval: Duration,
    pub(crate) registry: Arc<ConnectionRegistry>,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let model_path = model_resolver::resolve(&cli.model)?;
    log::info!("Using detector model at {}", model_path.display());

    let state = Arc::new(AppState {
        model_path,
        confidence: cli.confidence,
        frame_interval: Duration::from_millis(cli.frame_interval_ms),
        registry: ConnectionRegistry::new(),
    });

    let app = axum::Router::new()
        .route("/ws", axum::routing::get(ws::ws_handler))
        // Open policy, development only
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    log::info!("Listening on {}", cli.bind);
    axum::serve(listener, app).await?;
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.frame_interval_ms == 0 {
        return Err("Frame interval must be at least 1 ms".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_upstream_behavior() {
        let cli = Cli::try_parse_from(["facerelay"]).unwrap();
        assert_eq!(cli.bind, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(cli.model, PathBuf::from("models/res10_300x300_ssd.onnx"));
        assert_eq!(cli.confidence, 0.5);
        assert_eq!(cli.frame_interval_ms, 100);
        assert!(validate(&cli).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence() {
        let cli = Cli::try_parse_from(["facerelay", "--confidence", "1.5"]).unwrap();
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let cli = Cli::try_parse_from(["facerelay", "--frame-interval-ms", "0"]).unwrap();
        assert!(validate(&cli).is_err());
    }
}
