//! Command line argument parsing for the Kaisang CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kaisang - An intent-classification chat backend
#[derive(Parser, Debug, Clone)]
#[command(name = "kaisang")]
#[command(about = "An intent-classification chat backend")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Kaisang Contributors")]
#[command(long_about = None)]
pub struct KaisangArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl KaisangArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train the classifier from an intent configuration
    Train(TrainArgs),

    /// Classify one input and print the reply
    Respond(RespondArgs),

    /// Run the HTTP/WebSocket server
    Serve(ServeArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Intent configuration file (JSON)
    #[arg(short, long, value_name = "INTENTS_FILE", default_value = "data/intents.json")]
    pub intents: PathBuf,

    /// Directory to write the trained artifacts into
    #[arg(short, long, value_name = "MODELS_DIR", default_value = "models")]
    pub models_dir: PathBuf,
}

/// Arguments for one-shot classification
#[derive(Parser, Debug, Clone)]
pub struct RespondArgs {
    /// Input text to classify
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Directory holding the trained artifacts
    #[arg(short, long, value_name = "MODELS_DIR", default_value = "models")]
    pub models_dir: PathBuf,

    /// Intent configuration file (JSON)
    #[arg(short, long, value_name = "INTENTS_FILE", default_value = "data/intents.json")]
    pub intents: PathBuf,

    /// Also print the predicted tag
    #[arg(long)]
    pub show_tag: bool,
}

/// Arguments for serving
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Server configuration file (JSON); flags below override it
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// SQLite database file
    #[arg(short, long, value_name = "DB_FILE")]
    pub database: Option<PathBuf>,

    /// Directory holding the trained artifacts
    #[arg(short, long, value_name = "MODELS_DIR")]
    pub models_dir: Option<PathBuf>,

    /// Intent configuration file (JSON)
    #[arg(short, long, value_name = "INTENTS_FILE")]
    pub intents: Option<PathBuf>,

    /// Directory for uploaded and generated images
    #[arg(short, long, value_name = "UPLOADS_DIR")]
    pub uploads_dir: Option<PathBuf>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity() {
        let args = KaisangArgs::parse_from(["kaisang", "respond", "hi"]);
        assert_eq!(args.verbosity(), 1);

        let args = KaisangArgs::parse_from(["kaisang", "-q", "respond", "hi"]);
        assert_eq!(args.verbosity(), 0);

        let args = KaisangArgs::parse_from(["kaisang", "-vv", "respond", "hi"]);
        assert_eq!(args.verbosity(), 2);
    }

    #[test]
    fn test_train_defaults() {
        let args = KaisangArgs::parse_from(["kaisang", "train"]);
        let Command::Train(train) = args.command else {
            panic!("expected train command");
        };
        assert_eq!(train.intents, PathBuf::from("data/intents.json"));
        assert_eq!(train.models_dir, PathBuf::from("models"));
    }

    #[test]
    fn test_serve_overrides() {
        let args = KaisangArgs::parse_from(["kaisang", "serve", "--bind", "0.0.0.0:9000"]);
        let Command::Serve(serve) = args.command else {
            panic!("expected serve command");
        };
        assert_eq!(serve.bind.as_deref(), Some("0.0.0.0:9000"));
        assert!(serve.database.is_none());
    }
}
