//! Command implementations for the Kaisang CLI.

use std::time::Instant;

use crate::classifier::TrainedArtifacts;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::intent::IntentSet;
use crate::responder::Responder;
use crate::server::{self, ServerConfig};

/// Execute a CLI command.
pub fn execute_command(args: KaisangArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args.clone(), &args),
        Command::Respond(respond_args) => respond(respond_args.clone(), &args),
        Command::Serve(serve_args) => serve(serve_args.clone(), &args),
    }
}

/// Train the classifier and save the artifact bundle.
fn train(args: TrainArgs, cli_args: &KaisangArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!("Loading intents from: {}", args.intents.display());
    }

    let start_time = Instant::now();

    let intents = IntentSet::load(&args.intents)?;
    let artifacts = TrainedArtifacts::train(&intents)?;
    artifacts.save(&args.models_dir)?;

    let duration = start_time.elapsed();

    output_result(
        "Training complete",
        &TrainResult {
            models_dir: args.models_dir.to_string_lossy().to_string(),
            samples: artifacts.metadata.samples,
            vocabulary_size: artifacts.metadata.vocabulary_size,
            classes: artifacts.metadata.classes.clone(),
            iterations: artifacts.metadata.stats.iterations,
            converged: artifacts.metadata.stats.converged,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )?;

    Ok(())
}

/// Classify one input and print the reply.
fn respond(args: RespondArgs, cli_args: &KaisangArgs) -> Result<()> {
    let responder = Responder::load(&args.models_dir, &args.intents)?;

    let tag = if args.show_tag {
        responder.classify(&args.text).ok()
    } else {
        None
    };
    let response = responder.respond(&args.text);

    output_result(
        "Response",
        &RespondResult {
            input: args.text,
            response,
            tag,
        },
        cli_args,
    )?;

    Ok(())
}

/// Run the HTTP/WebSocket server.
fn serve(args: ServeArgs, cli_args: &KaisangArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }
    if let Some(models_dir) = args.models_dir {
        config.models_dir = models_dir;
    }
    if let Some(intents) = args.intents {
        config.intents_path = intents;
    }
    if let Some(uploads_dir) = args.uploads_dir {
        config.uploads_dir = uploads_dir;
    }

    if cli_args.verbosity() > 1 {
        println!("Serving on: {}", config.bind_addr);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::run(config))
}
