use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

use ipsec_exporter::runtime::{bind_listener, load_and_log_config, resolve_listen_address, shutdown_signal};
use ipsec_exporter::{Args, Collector, CommandStatusSource, ExporterState, logging, render, serve};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(args.log_file.as_deref());

    let (config, _source) = load_and_log_config(&args)?;

    let source = Arc::new(CommandStatusSource::from_config(&config.source));
    info!(
        "Querying status with '{} {} <connection>'",
        config.source.command,
        config.source.args.join(" ")
    );
    let collector = Collector::new(config.connections.clone(), source);

    if args.once {
        let snapshot = collector.collect().await;
        let body = render(&snapshot)?;
        std::io::stdout().write_all(&body)?;
        return Ok(());
    }

    let (host, port) = resolve_listen_address(&args, &config);
    let listener = bind_listener(&host, port, config.exporter.metrics_path.as_str()).await?;

    let state = ExporterState::new(collector, config.exporter.metrics_path.clone());
    serve(listener, state, shutdown_signal()).await?;

    info!("Shutdown complete");
    Ok(())
}
