//! # Etiqueta CLI
//!
//! Command-line interface for label generation.
//!
//! ## Usage
//!
//! ```bash
//! # Serve the web UI and API
//! etiqueta serve --listen 0.0.0.0:8080 \
//!     --registry-url https://script.google.com/macros/s/ID/exec \
//!     --logo assets/logo.png
//!
//! # One-shot render to a file
//! etiqueta render --order 123 --frame Q-7 --link https://example.com/p/123 \
//!     --format pdf --out etiqueta.pdf
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use etiqueta::{
    EtiquetaError,
    assets::ImageCache,
    compose::compose,
    export::{ExportEngine, ExportFormat},
    label::LabelRecord,
    render::LabelRasterizer,
    server::{self, ServerConfig},
    surface::Surface,
};

/// Etiqueta - printable QR label generator
#[derive(Parser, Debug)]
#[command(name = "etiqueta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the web UI and JSON API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        /// Registry endpoint URL (omit to disable registry sync)
        #[arg(long)]
        registry_url: Option<String>,

        /// Logo image composited onto QR codes
        #[arg(long)]
        logo: Option<PathBuf>,
    },

    /// Render one label straight to a PDF or PNG file
    Render {
        /// Order id printed in the header
        #[arg(long)]
        order: String,

        /// Frame code printed in the header
        #[arg(long)]
        frame: String,

        /// Link encoded by both QR codes
        #[arg(long)]
        link: String,

        /// Display date (DD/MM/YYYY), defaults to today
        #[arg(long, default_value = "")]
        date: String,

        /// Output format: pdf or png
        #[arg(long, default_value = "pdf")]
        format: String,

        /// Output file path
        #[arg(long)]
        out: PathBuf,

        /// Logo image composited onto QR codes
        #[arg(long)]
        logo: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("etiqueta=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), EtiquetaError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            registry_url,
            logo,
        } => {
            server::serve(ServerConfig {
                listen_addr: listen,
                registry_url,
                logo_path: logo,
            })
            .await
        }

        Commands::Render {
            order,
            frame,
            link,
            date,
            format,
            out,
            logo,
        } => {
            let record = LabelRecord::new(&order, &frame, &link, &date)?;
            let view = compose(&record)?;

            let logo_image = match logo {
                Some(path) => Some(ImageCache::new().get_or_load(&path).await?),
                None => None,
            };

            let mut surface = Surface::new("cli");
            surface.mount(record, view);

            let engine = ExportEngine::new(LabelRasterizer::new(logo_image));
            let exported = engine.export(&mut surface, format.parse::<ExportFormat>()?)?;

            std::fs::write(&out, &exported.bytes)?;
            println!("Wrote {} ({} bytes)", out.display(), exported.bytes.len());
            Ok(())
        }
    }
}
