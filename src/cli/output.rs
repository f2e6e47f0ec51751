//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{KaisangArgs, OutputFormat};
use crate::error::Result;

/// Result structure for training runs.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResult {
    pub models_dir: String,
    pub samples: usize,
    pub vocabulary_size: usize,
    pub classes: Vec<String>,
    pub iterations: usize,
    pub converged: bool,
    pub duration_ms: u64,
}

/// Result structure for one-shot classification.
#[derive(Debug, Serialize, Deserialize)]
pub struct RespondResult {
    pub input: String,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Output a result in the configured format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &KaisangArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &KaisangArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
    }

    let value = serde_json::to_value(result)?;
    if let Some(obj) = value.as_object() {
        for (key, val) in obj {
            match val {
                serde_json::Value::String(s) => println!("  {key}: {s}"),
                serde_json::Value::Array(items) => {
                    let rendered: Vec<String> =
                        items.iter().map(|v| v.to_string()).collect();
                    println!("  {key}: [{}]", rendered.join(", "));
                }
                other => println!("  {key}: {other}"),
            }
        }
    } else {
        println!("{value}");
    }

    Ok(())
}

/// Output as JSON.
fn output_json<T: Serialize>(result: &T, args: &KaisangArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
