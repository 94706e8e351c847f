use anyhow::{Context, Result};
use clap::Parser;
use sentence_voice::{create_router_with_config, AppState, ClipExporter, Config, DirectorySink};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sentence-voice")]
#[command(about = "Record one clip per sentence and export them as WAV")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/sentence-voice")]
    config: String,

    /// Override the HTTP port from the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("Loaded config: {}", cfg.service.name);
    info!(
        "Processing at {}Hz, gap presets {:?}",
        cfg.audio.sample_rate, cfg.export.gap_presets
    );

    let mut exporter = ClipExporter::new(cfg.audio.sample_rate)
        .with_gap_presets(cfg.export.gap_presets.clone());
    if cfg.export.persist {
        let sink = DirectorySink::new(&cfg.export.output_dir)?;
        exporter = exporter.with_sink(Arc::new(sink));
    } else {
        info!("Export persistence disabled; save_audio and export_all will return 503");
    }

    let app = create_router_with_config(AppState::new(exporter), &cfg.service.http);

    let addr: SocketAddr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port)
        .parse()
        .context("Failed to parse listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}
