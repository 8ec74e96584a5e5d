use anyhow::Result;
use clap::{Parser, Subcommand};
use image_metadata::aggregator;
use image_metadata::catalog::{Catalog, JsonCatalog};
use image_metadata::config::{AppConfig, ConfigOverrides};
use image_metadata::geocode::{NominatimGeocoder, OfflineGeocoder, ReverseGeocoder};
use image_metadata::web_server;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "image_metadata", about = "Extract image metadata into a JSON sidecar and serve it")]
struct Cli {
    /// Additional configuration file layered over config/
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the source directory and write the metadata file
    Extract {
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        remote_base_url: Option<String>,
        /// Language for place names
        #[arg(long)]
        language: Option<String>,
        /// Skip reverse geocoding
        #[arg(long)]
        offline: bool,
    },
    /// Serve the metadata file and images over HTTP
    Serve {
        #[arg(long)]
        port: Option<u16>,
        /// Metadata file to serve (defaults to output_path)
        #[arg(long)]
        metadata: Option<String>,
        /// Image directory (defaults to source_directory)
        #[arg(long)]
        images: Option<String>,
    },
}

fn extract(config: AppConfig) -> Result<()> {
    let geocoder: Box<dyn ReverseGeocoder> = if config.geocoding_enabled {
        Box::new(NominatimGeocoder::new(&config)?)
    } else {
        info!("Reverse geocoding disabled");
        Box::new(OfflineGeocoder)
    };
    aggregator::run_extraction(&config, geocoder.as_ref())?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = match &cli.command {
        Command::Extract { source, output, remote_base_url, language, offline } => ConfigOverrides {
            source_directory: source.clone(),
            output_path: output.clone(),
            remote_base_url: remote_base_url.clone(),
            geocoding_language: language.clone(),
            geocoding_enabled: offline.then_some(false),
            ..Default::default()
        },
        Command::Serve { port, metadata, images } => ConfigOverrides {
            source_directory: images.clone(),
            output_path: metadata.clone(),
            web_port: *port,
            ..Default::default()
        },
    };
    let config = AppConfig::load(cli.config.as_deref(), &overrides)?;

    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    info!("Starting image_metadata");

    match cli.command {
        Command::Extract { .. } => {
            // Geocoding is blocking I/O; keep it off the async workers.
            tokio::task::spawn_blocking(move || extract(config)).await??;
        }
        Command::Serve { .. } => {
            let catalog: Arc<dyn Catalog> = Arc::new(JsonCatalog::new(&config.output_path));
            if let Err(e) = web_server::start_web_server(Arc::new(config), catalog).await {
                log::error!("Web server error: {}", e);
            }
        }
    }

    info!("image_metadata finished");

    Ok(())
}
