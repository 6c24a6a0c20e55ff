use bandsite::assemble;
use bandsite::config;
use bandsite::imaging::RustBackend;
use bandsite::layout::SiteLayout;
use bandsite::output;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Flags for the build command.
#[derive(clap::Args, Clone, Default)]
struct BuildArgs {
    /// Long edge of display images, overriding `[images] display_width`
    #[arg(long)]
    display_width: Option<u32>,

    /// Long edge of thumbnails, overriding `[images] thumbnail_width`
    #[arg(long)]
    thumbnail_width: Option<u32>,

    /// Print the build report as JSON instead of the human-readable summary
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
#[command(name = "bandsite")]
#[command(about = "Static site builder for band websites")]
#[command(long_about = "\
Static site builder for band websites

Reads markdown pages, YAML lists of shows and releases, and raw photos, and
writes a complete static site with resized images.

Site structure:

  site/
  ├── config.toml                  # Site config (optional)
  ├── templates/                   # Tera templates
  │   ├── index.html               # Homepage
  │   ├── page.html                # One markdown page
  │   ├── concerts.html            # Show listing
  │   └── albums.html              # Discography
  ├── content/
  │   ├── pages/about.md           # Page → about/index.html (front-matter `title` required)
  │   ├── concerts.yaml            # - date: 2026-03-07 / venue / city / tickets
  │   └── albums.yaml              # - title / year / cover / tracks / links
  ├── static/                      # Copied verbatim → static/
  ├── photos/raw/                  # Gallery → photos/{original,1600,thumb}/
  └── images/                      # Artwork → images/{original,1600,thumb}/

The output directory is wiped and rebuilt on every run.

Run 'bandsite gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Output directory (deleted and recreated by build)
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: reset → load → render → static → images (default)
    Build(BuildArgs),
    /// Load content and render templates without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let command = cli
        .command
        .unwrap_or_else(|| Command::Build(BuildArgs::default()));
    let today = chrono::Local::now().date_naive();

    match command {
        Command::Build(args) => {
            let mut site_config = config::load_config(&cli.root)?;
            if let Some(width) = args.display_width {
                site_config.images.display_width = width;
            }
            if let Some(width) = args.thumbnail_width {
                site_config.images.thumbnail_width = width;
            }
            site_config.validate()?;
            init_thread_pool(&site_config.processing);

            let layout = SiteLayout::new(&cli.root);
            let report = assemble::build_with_backend(
                &RustBackend::new(),
                &layout,
                &cli.output,
                &site_config,
                today,
                &mut |stage| {
                    if !args.json {
                        output::print_stage(stage, &cli.root, &cli.output);
                    }
                },
            )?;

            output::print_image_warnings(&report.image_failures);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_build_report(&report, &cli.root);
                println!("==> Build complete: {}", cli.output.display());
            }
        }
        Command::Check => {
            let site_config = config::load_config(&cli.root)?;
            let layout = SiteLayout::new(&cli.root);
            println!("==> Checking {}", cli.root.display());
            let site = assemble::load(&RustBackend::new(), &layout, &site_config, today)?;
            assemble::render_site(&site, &site_config, today)?;
            output::print_content(&site, &cli.root);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can only lower it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
