use clap::{ArgAction, Parser, Subcommand};
use page_scout::config::{self, ScoutConfig};
use page_scout::manifest::{self, Manifest};
use page_scout::output;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "page-scout")]
#[command(about = "Discover multi-page bundler entries by filesystem convention")]
#[command(long_about = "\
Discover multi-page bundler entries by filesystem convention

Entries are never declared by hand. A file becomes an entry when:

  <pages>/index.js            -> entry \"index\", page /index.html
  <pages>/<dir>/<dir>.js      -> entry \"<dir>\", page /<path to dir>/index.html

Each page renders <dir>/<dir>.html when present, otherwise the default
template. Output is JSON on stdout; diagnostics go to stderr.

Run 'page-scout gen-config' to print a documented page-scout.toml.")]
#[command(version)]
struct Cli {
    /// Pages directory to scan
    #[arg(long, default_value = "src/pages", global = true)]
    source: PathBuf,

    /// Config file (default: page-scout.toml in the pages directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the entry map (name → module path)
    Entries,
    /// Print entries wired to the shared chunk, plus the shared entry itself
    EntryDescriptors,
    /// Print HTML page descriptors
    Pages,
    /// Print the bundle filename pattern for an entry or chunk name
    Filename { name: String },
    /// Print the URL segment for an entry or chunk name
    Url { name: String },
    /// Write the full discovery manifest as JSON
    Manifest {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show discovered pages without writing anything
    Check,
    /// Print a stock page-scout.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let discover = || run_discovery(&cli.source, cli.config.as_deref());

    match &cli.command {
        Command::Entries => print_json(&discover()?.entries)?,
        Command::EntryDescriptors => print_json(&discover()?.entry_descriptors)?,
        Command::Pages => print_json(&discover()?.pages)?,
        Command::Filename { name } => println!("{}", discover()?.filename_of(name)),
        Command::Url { name } => println!("{}", discover()?.url_of(name)),
        Command::Manifest { out } => {
            let json = serde_json::to_string_pretty(&discover()?)?;
            match out {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(path, json)?;
                    tracing::info!(path = %path.display(), "wrote manifest");
                }
                None => println!("{}", json),
            }
        }
        Command::Check => {
            let manifest = discover()?;
            println!("==> Checking {}", manifest.root.display());
            output::print_manifest_output(&manifest);
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

fn run_discovery(
    source: &Path,
    config_path: Option<&Path>,
) -> Result<Manifest, Box<dyn std::error::Error>> {
    let manifest = match config_path {
        Some(path) => {
            let config: ScoutConfig = config::load_config_file(path)?;
            manifest::discover_with(source, &config)?
        }
        None => manifest::discover(source)?,
    };
    Ok(manifest)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("page_scout={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
