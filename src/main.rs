use anyhow::Result;
use clap::{Parser, Subcommand};
use pipfix::{
    config::Config,
    exit_codes,
    lister::PipLister,
    listing::{run_listing, ListSanitizer},
    logging,
    version::install,
};
use std::process::ExitCode;
use tracing::warn;

#[derive(Parser)]
#[command(name = "pipfix")]
#[command(
    author,
    version,
    about = "Work around vendor-suffixed Python package versions (e.g. 2.4.0-ubuntu4-zorin1)"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the sanitizing version parser and optionally preview versions
    Patch {
        /// Version strings to run through the sanitizing parser
        versions: Vec<String>,
    },

    /// Run `pip list --format=json` and sanitize version fields
    List {
        /// Python interpreter to run pip with (overrides the config file)
        #[arg(long)]
        python: Option<String>,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();

    let loaded = Config::load();
    let (config, source) = match &loaded {
        Ok(config) if Config::config_path().exists() => (config.clone(), "config file"),
        Ok(config) => (config.clone(), "built-in defaults"),
        Err(_) => (
            Config::default(),
            "built-in defaults (config file could not be read)",
        ),
    };
    logging::init(&config.log_level);
    if let Err(e) = loaded {
        warn!(path = %Config::config_path().display(), error = %e, "ignoring unreadable config file");
    }

    match cli.command {
        Commands::Patch { versions } => Ok(run_patch(&config, &versions)),
        Commands::List { python } => {
            let python = python.unwrap_or(config.python.clone());
            run_list(&config, python).await
        }
        Commands::Config { init, path } => {
            handle_config(&config, source, init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn run_patch(config: &Config, versions: &[String]) -> u8 {
    let parser = match install(config.markers()) {
        Ok(parser) => parser,
        Err(e) => {
            println!("✗ Failed to install sanitizing version parser: {}", e);
            println!("Failed to apply patch.");
            return exit_codes::ERROR;
        }
    };

    println!("✓ Successfully installed sanitizing version parser");
    println!(
        "Versions marked with [{}] are reduced to their numeric release before parsing.",
        parser.markers()
    );

    if versions.is_empty() {
        println!("Pass version strings as arguments to preview how they are parsed.");
        return exit_codes::SUCCESS;
    }

    let mut code = exit_codes::SUCCESS;
    for raw in versions {
        match parser.normalize(raw) {
            Ok(version) => println!("{} -> {}", raw, version),
            Err(e) => {
                println!("✗ {}: {}", raw, e);
                code = exit_codes::ERROR;
            }
        }
    }
    code
}

async fn run_list(config: &Config, python: String) -> Result<u8> {
    let lister = PipLister::new(python);
    let sanitizer = ListSanitizer::new(config.markers());

    let outcome = run_listing(&lister, &sanitizer).await?;

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let code = outcome.emit(&mut stdout.lock(), &mut stderr.lock())?;
    Ok(code)
}

fn handle_config(config: &Config, source: &str, init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        Config::default().save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    println!("Config path:    {}", config_path.display());
    println!("Loaded from:    {}", source);
    println!();
    println!("Interpreter:    {}", config.python);
    println!("Vendor markers: {}", config.markers());
    match std::env::var("RUST_LOG") {
        Ok(filter) => println!("Log filter:     {} (from RUST_LOG)", filter),
        Err(_) => println!("Log filter:     {}", config.log_level),
    }

    if !config_path.exists() {
        println!();
        println!("Run 'pipfix config --init' to write these defaults to disk.");
    }

    Ok(())
}
