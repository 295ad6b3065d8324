use clap::{Parser, Subcommand};
use gallery_loader::app::GalleryApp;
use gallery_loader::console::Console;
use gallery_loader::ingest::{IngestionController, load_dropped_files};
use gallery_loader::layout::compute_sizing;
use gallery_loader::types::{Dimensions, ImageRecord};
use gallery_loader::viewport::ResizeBus;
use gallery_loader::{config, output, render};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "gallery-loader")]
#[command(about = "Load images from URLs, manifests or files into a responsive gallery")]
#[command(long_about = "\
Load images from URLs, manifests or files into a responsive gallery

Inputs:

  https://example.com/photo.jpg      # Image URL: probed for its pixel size
  https://example.com/gallery.json   # Manifest URL: entries appended as listed
  photos/dawn.png                    # Local path or file:// URL

Dropped files (--file, or 'drop' in a session) are read by extension:
  *.jpg, *.jpeg, *.png   embedded as data URIs and probed
  *.json                 parsed as a manifest
  anything else          rejected

Manifest format:

  { \"galleryImages\": [ { \"url\": \"a.jpg\", \"width\": 640, \"height\": 480 } ] }

Run 'gallery-loader gen-config' to generate a documented gallery.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./gallery.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive session reading one command per line from stdin
    Session,
    /// Ingest inputs and write a self-contained HTML page
    Build {
        /// Image URLs, manifest URLs or local paths, submitted in order
        inputs: Vec<String>,
        /// Files or directories to drop after the inputs are submitted
        #[arg(long = "file")]
        files: Vec<PathBuf>,
        /// Viewport width the tiles are pre-sized for
        #[arg(long)]
        viewport: Option<u32>,
        /// Output HTML file
        #[arg(long, default_value = "gallery.html")]
        output: PathBuf,
    },
    /// Print tile sizing for WIDTHxHEIGHT image sizes
    Layout {
        /// Viewport width in pixels
        #[arg(long)]
        width: u32,
        /// Image sizes, e.g. 800x600
        #[arg(required = true)]
        sizes: Vec<Dimensions>,
    },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_FILE));
    if cli.config.is_some() && !config_path.exists() {
        return Err(format!("config file not found: {}", config_path.display()).into());
    }

    match cli.command {
        Command::Session => {
            let config = config::load_config(&config_path)?;
            let (tx, rx) = std::sync::mpsc::channel();
            let controller = IngestionController::from_config(&config.ingest)?.with_events(tx);
            let bus = ResizeBus::new();
            let width = config.render.viewport_width;
            let mut app = GalleryApp::mount(config, controller, &bus, width);

            let interactive = io::stdin().is_terminal();
            if interactive {
                println!("{}", app.controller().placeholder_hint());
                println!("Type 'help' for commands.");
            }
            Console::new(&mut app, &bus, rx)
                .with_prompt(interactive)
                .run(io::stdin().lock(), &mut io::stdout().lock())?;
        }
        Command::Build {
            inputs,
            files,
            viewport,
            output: output_path,
        } => {
            let mut config = config::load_config(&config_path)?;
            if let Some(width) = viewport {
                config.render.viewport_width = width;
            }
            let width = config.render.viewport_width;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_ingest_event(&event);
                }
            });

            let bus = ResizeBus::new();
            let controller = IngestionController::from_config(&config.ingest)?.with_events(tx);
            let mut app = GalleryApp::mount(config, controller, &bus, width);
            for input in inputs {
                app.submit_value(input);
            }
            if !files.is_empty() {
                app.handle_drop(load_dropped_files(&files)?);
            }
            app.wait_idle();

            let records = app.gallery().records().to_vec();
            render::write_page(&output_path, &records, &app.page_options())?;
            // Dropping the app drops the event sender and ends the printer.
            drop(app);
            printer.join().map_err(|_| "event printer panicked")?;
            println!(
                "==> Wrote {} ({} images, viewport {}px)",
                output_path.display(),
                records.len(),
                width
            );
        }
        Command::Layout { width, sizes } => {
            let config = config::load_config(&config_path)?;
            let rows: Vec<_> = sizes
                .into_iter()
                .map(|dims| {
                    let record = ImageRecord::new("", dims);
                    (dims, compute_sizing(&record, width, &config.layout))
                })
                .collect();
            output::print_layout(width, &config.layout, &rows);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Route diagnostics to stderr so stdout stays clean for command output.
fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else if quiet {
        LevelFilter::ERROR
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
