use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "mapsheet")]
#[command(about = "MapSheet - Print-quality map sheet export")]
#[command(version)]
#[command(long_about = "
MapSheet renders styled map views into print-ready sheets. PNG and JPEG
produce bare rasters; PDF lays the map on a page with a title and a
footer table. SVG output is experimental.

Examples:
  mapsheet export --style style.json --center 24.94,60.17 --zoom 10 --out sheet.pdf
  mapsheet export --style style.json --center 2.35,48.86 --zoom 12 --page a3 --dpi 200 --out paris.png
  mapsheet pages
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export a styled map view as a print-ready sheet
    Export {
        /// Style document (JSON file)
        #[arg(long, required = true)]
        style: PathBuf,

        /// Map center as lng,lat
        #[arg(long, required = true)]
        center: String,

        /// Zoom level
        #[arg(long, required = true)]
        zoom: f64,

        /// Bearing in degrees
        #[arg(long, default_value_t = 0.0)]
        bearing: f64,

        /// Pitch in degrees
        #[arg(long, default_value_t = 0.0)]
        pitch: f64,

        /// Output file; the extension selects the format unless --format is given
        #[arg(short, long, required = true)]
        out: PathBuf,

        /// Catalog page size (see 'mapsheet pages')
        #[arg(long)]
        page: Option<String>,

        /// Page orientation (landscape, portrait)
        #[arg(long)]
        orientation: Option<String>,

        /// Custom page width (with --height; bypasses the catalog)
        #[arg(long)]
        width: Option<f64>,

        /// Custom page height (with --width; bypasses the catalog)
        #[arg(long)]
        height: Option<f64>,

        /// Unit for custom dimensions (mm, in)
        #[arg(long)]
        unit: Option<String>,

        /// Print resolution (72, 96, 200, 300, 400)
        #[arg(long)]
        dpi: Option<u32>,

        /// Output format (png, jpg, pdf, svg)
        #[arg(long)]
        format: Option<String>,

        /// Sheet title (PDF only)
        #[arg(long)]
        title: Option<String>,

        /// Footer subtitle (PDF only)
        #[arg(long)]
        subtitle: Option<String>,

        /// Logo file path or URL for the PDF footer
        #[arg(long)]
        logo: Option<String>,

        /// Access token forwarded to tile sources
        #[arg(long)]
        access_token: Option<String>,
    },

    /// List the page size catalog
    Pages,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Export {
            style,
            center,
            zoom,
            bearing,
            pitch,
            out,
            page,
            orientation,
            width,
            height,
            unit,
            dpi,
            format,
            title,
            subtitle,
            logo,
            access_token,
        } => commands::export::execute(
            &config,
            style,
            center,
            zoom,
            bearing,
            pitch,
            out,
            page,
            orientation,
            width,
            height,
            unit,
            dpi,
            format,
            title,
            subtitle,
            logo,
            access_token,
        ),
        Commands::Pages => commands::pages::execute(),
    }
}
