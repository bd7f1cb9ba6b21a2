//! # Stego CLI
//!
//! Thin wrapper that hides text in, and recovers text from, image files.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin stego -- embed --input cover.png --output stego.png \
//!   --message "This is my secret message!" --verify
//! cargo run --bin stego -- extract --input stego.png
//! cargo run --bin stego -- capacity --input cover.png
//! ```

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{error, info, warn, LevelFilter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use lsb_stego::common::config::StegoConfig;
use lsb_stego::common::logging::init_logger;
use lsb_stego::processing::{embed_text_file, extract_text_file, image_capacity};

/// Command-line arguments for the stego binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace), overrides the configuration file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide a message in an image
    Embed(EmbedArgs),
    /// Print the message hidden in an image
    Extract {
        /// Stego image to read
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Print how many characters an image can hold
    Capacity {
        /// Cover image to measure
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(ClapArgs, Debug)]
struct EmbedArgs {
    /// Cover image
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the stego image (PNG, BMP, TIFF, TGA, QOI or WebP)
    #[arg(short, long)]
    output: PathBuf,

    /// Message text
    #[arg(short, long, conflicts_with = "message_file", required_unless_present = "message_file")]
    message: Option<String>,

    /// Read the message from a file instead
    #[arg(long)]
    message_file: Option<PathBuf>,

    /// Read the message back after writing and compare
    #[arg(long)]
    verify: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // The logger isn't up yet, so setup errors go straight to stderr.
    let level = match log_level(args.config.as_deref(), args.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logger(level);

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn log_level(config: Option<&Path>, cli_level: Option<String>) -> Result<LevelFilter> {
    let mut config = StegoConfig::load(config)?;
    if let Some(level) = cli_level {
        config.logging.level = level;
    }
    config.logging.level_filter()
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Embed(args) => embed(args),
        Command::Extract { input } => {
            let text = extract_text_file(&input)?;
            info!("Extracted {} characters from {}", text.chars().count(), input.display());
            println!("{}", text);
            Ok(())
        }
        Command::Capacity { input } => {
            let capacity = image_capacity(&input)?;
            println!("{}", capacity);
            Ok(())
        }
    }
}

fn embed(args: EmbedArgs) -> Result<()> {
    let message = read_message(args.message, args.message_file.as_deref())?;

    info!("Starting embedding process...");
    embed_text_file(&args.input, &message, &args.output)?;
    info!(
        "Secret message embedded and image saved at '{}'",
        args.output.display()
    );

    if args.verify {
        verify(&args.output, &message)?;
    }

    Ok(())
}

/// Read `output` back and compare against what was embedded.
fn verify(output: &Path, message: &str) -> Result<()> {
    info!("Starting extraction process...");
    let extracted = extract_text_file(output)?;
    if extracted != message {
        warn!("Extracted message: '{}'", extracted);
        anyhow::bail!("Verification failed: extracted message differs from input");
    }
    info!("Verified: message reads back intact");
    Ok(())
}

fn read_message(message: Option<String>, message_file: Option<&Path>) -> Result<String> {
    match (message, message_file) {
        (Some(message), _) => Ok(message),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message file {}", path.display())),
        (None, None) => anyhow::bail!("No message given"),
    }
}
