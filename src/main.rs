// ABOUTME: Main entry point for the carousel-block program.
// ABOUTME: Provides CLI commands to decorate, simulate and watch carousel blocks.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use carousel_block::{Carousel, Config, ResourceFile, WatchConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decorate a block and write a preview page
    Decorate(DecorateArgs),

    /// Run an interaction script against a block and print the state after each step
    Simulate(SimulateArgs),

    /// Regenerate the preview page whenever the block changes
    Watch(WatchArgs),
}

#[derive(Args)]
struct DecorateArgs {
    /// Path to the block file (HTML fragment or markdown)
    #[arg(short, long)]
    input: PathBuf,

    /// Path to output HTML file
    #[arg(short, long)]
    output: PathBuf,

    /// Page title
    #[arg(long)]
    title: Option<String>,

    /// CSS files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    css: Option<Vec<String>>,

    /// JavaScript files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    js: Option<Vec<String>>,

    /// Mode for CSS/JS: 'embed' to embed content or 'link' to reference
    #[arg(long, default_value = "embed")]
    mode: String,
}

#[derive(Args)]
struct SimulateArgs {
    /// Path to the block file (HTML fragment or markdown)
    #[arg(short, long)]
    input: PathBuf,

    /// Rendered width reported for every slide
    #[arg(long, default_value_t = 800.0)]
    slide_width: f64,

    /// Comma-separated steps, e.g. "next,dot:1,swipe:60,wait:5000"
    #[arg(long, default_value = "")]
    steps: String,

    /// Disable autoplay
    #[arg(long)]
    no_autoplay: bool,

    /// Autoplay period in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Print the decorated markup after the last step
    #[arg(long)]
    print_html: bool,
}

#[derive(Args)]
struct WatchArgs {
    /// Path to the block file (HTML fragment or markdown)
    #[arg(short, long)]
    input: PathBuf,

    /// Path to output HTML file
    #[arg(short, long)]
    output: PathBuf,

    /// CSS files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    css: Option<Vec<String>>,

    /// Serve the page on a local HTTP server with auto-reload
    #[arg(long)]
    serve: bool,

    /// Port for the local server
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Debounce window for file changes in milliseconds
    #[arg(long, default_value_t = 500)]
    debounce_ms: u64,
}

fn embed_mode(mode: &str) -> anyhow::Result<bool> {
    match mode {
        "embed" => Ok(true),
        "link" => Ok(false),
        other => anyhow::bail!("Unknown mode '{}': expected 'embed' or 'link'", other),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env();

    match cli.command {
        Some(Commands::Decorate(args)) => {
            let page_config = config.get_page_config(
                args.title,
                args.css.unwrap_or_default(),
                args.js.unwrap_or_default(),
                Some(embed_mode(&args.mode)?),
            );
            let carousel_config = config.get_carousel_config(None, None, None);

            let html_content =
                carousel_block::generate_page(&args.input, &page_config, &carousel_config)?;
            carousel_block::write_html_to_file(&html_content, &args.output)
                .with_context(|| format!("Failed to write output file {:?}", args.output))?;

            println!("Carousel page generated successfully: {:?}", args.output);
        }
        Some(Commands::Simulate(args)) => {
            let steps = carousel_block::parse_steps(&args.steps)?;
            let carousel_config = config.get_carousel_config(
                args.no_autoplay.then_some(false),
                args.delay_ms,
                None,
            );

            let block = carousel_block::load_block(&args.input)?;
            let mut carousel = Carousel::from_block(block, carousel_config)?;
            carousel.set_slide_width(args.slide_width);
            carousel.render(false);

            println!("{}", carousel_block::Snapshot::capture("init", &carousel));
            for snapshot in carousel_block::run_script(&mut carousel, &steps) {
                println!("{}", snapshot);
            }

            if args.print_html {
                println!("{}", carousel.to_html());
            }
        }
        Some(Commands::Watch(args)) => {
            let watch_config = WatchConfig {
                block_path: args.input,
                html_output: args.output,
                css_files: args
                    .css
                    .unwrap_or_default()
                    .iter()
                    .map(|path| ResourceFile::new(path))
                    .collect(),
                embed_resources: config.embed_resources,
                debounce_ms: args.debounce_ms,
                serve: args.serve,
                port: args.port,
                ..WatchConfig::default()
            };
            carousel_block::watch_block(watch_config, &config)?;
        }
        None => {
            println!("No command specified. Use --help for usage information.");
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
