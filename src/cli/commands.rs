//! Command implementations for the triage CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use futures::stream::{self, StreamExt};

use crate::classifier::ClassificationPath;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::TriageConfig;
use crate::embedding::EmbeddingBackend;
use crate::error::{Result, TriageError};
use crate::intent::IntentLabel;
use crate::priority::PriorityResolver;
use crate::routing::{Category, RoutingTable};
use crate::ticket::TicketSeed;
use crate::triage::TicketClassifier;

/// Execute a CLI command.
pub async fn execute_command(args: TriageArgs) -> Result<()> {
    match &args.command {
        Command::Classify(classify_args) => classify(classify_args, &args).await,
        Command::Batch(batch_args) => batch(batch_args, &args).await,
        Command::Intents(intents_args) => list_intents(intents_args, &args),
        Command::Config(ConfigCommand::Init) => config_init(),
        Command::Config(ConfigCommand::Check { path }) => config_check(path, &args),
    }
}

/// Load the configuration file (or defaults) and apply command line overrides.
pub fn load_config(engine: &EngineArgs) -> Result<TriageConfig> {
    let mut config = match &engine.config {
        Some(path) => TriageConfig::from_file(path)?,
        None => TriageConfig::default(),
    };

    if let Some(endpoint) = &engine.embedding_endpoint {
        config.embedding.backend = EmbeddingBackend::Http;
        config.embedding.endpoint = endpoint.clone();
    }
    if engine.local_embeddings {
        config.embedding.backend = EmbeddingBackend::Local;
    }
    if let Some(model) = &engine.embedding_model {
        config.embedding.model = model.clone();
    }
    if let Some(threshold) = engine.threshold {
        config.similarity_threshold = threshold;
    }

    Ok(config)
}

async fn build_classifier(engine: &EngineArgs) -> Result<TicketClassifier> {
    let config = load_config(engine)?;
    let semantic_enabled = config.embedding.backend != EmbeddingBackend::Disabled;
    let classifier = TicketClassifier::new(config)?;

    if semantic_enabled && let Err(e) = classifier.warm_up().await {
        log::warn!("intent vectors unavailable, starting on the keyword path: {e}");
    }

    Ok(classifier)
}

/// Classify a single utterance.
async fn classify(args: &ClassifyArgs, cli_args: &TriageArgs) -> Result<()> {
    let classifier = build_classifier(&args.engine).await?;
    let result = classifier.classify_query(&args.text).await;

    let ticket = args.seed_ticket.then(|| TicketSeed::from_result(&result));

    output_result(
        "Classification",
        &ClassifyOutput { result, ticket },
        cli_args,
    )
}

/// Classify one utterance per input line, preserving input order.
async fn batch(args: &BatchArgs, cli_args: &TriageArgs) -> Result<()> {
    let lines = read_lines(&args.input)?;
    let classifier = build_classifier(&args.engine).await?;
    let start_time = Instant::now();

    let inputs: Vec<(usize, String)> = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !(args.skip_blank && line.trim().is_empty()))
        .collect();

    if cli_args.verbosity() > 1 {
        println!(
            "Classifying {} utterances from {} ({} at a time)",
            inputs.len(),
            args.input.display(),
            args.concurrency.max(1)
        );
    }

    let classifier = &classifier;
    let items: Vec<BatchItem> = stream::iter(inputs)
        .map(|(line, text)| async move {
            BatchItem {
                line,
                result: classifier.classify_query(&text).await,
            }
        })
        .buffered(args.concurrency.max(1))
        .collect()
        .await;

    let output = BatchOutput {
        total: items.len(),
        grievances: items
            .iter()
            .filter(|item| item.result.category() == Category::Grievance)
            .count(),
        semantic: items
            .iter()
            .filter(|item| item.result.path() == ClassificationPath::Semantic)
            .count(),
        duration_ms: start_time.elapsed().as_millis() as u64,
        items,
    };

    output_result("Batch classification", &output, cli_args)
}

fn read_lines(input: &Path) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = if input == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(input)?))
    };

    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?);
    }
    Ok(lines)
}

/// Show the intent catalog with routing and priority tiers.
fn list_intents(args: &IntentsArgs, cli_args: &TriageArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => TriageConfig::from_file(path)?,
        None => TriageConfig::default(),
    };
    let summaries = intent_summaries(&config)?;
    output_result("Intent catalog", &summaries, cli_args)
}

/// One summary row per intent, in rank order.
pub fn intent_summaries(config: &TriageConfig) -> Result<Vec<IntentSummary>> {
    config.validate()?;
    let routing = RoutingTable::new(config.routes.clone())?;
    let priority = PriorityResolver::new(&config.priority)?;

    IntentLabel::ALL
        .iter()
        .map(|&label| {
            let decision = routing.resolve(label);
            let description = config
                .intents
                .iter()
                .find(|d| d.label == label)
                .map(|d| d.description.clone())
                .ok_or_else(|| TriageError::config(format!("intent {label} has no descriptor")))?;
            Ok(IntentSummary {
                label,
                category: decision.category,
                priority_tier: priority.tier(label),
                routing_target: decision.routing_target,
                department: decision.department,
                description,
            })
        })
        .collect()
}

/// Print the default configuration.
fn config_init() -> Result<()> {
    println!("{}", TriageConfig::default().to_json_pretty()?);
    Ok(())
}

/// Validate a configuration file.
fn config_check(path: &Path, cli_args: &TriageArgs) -> Result<()> {
    let outcome = TriageConfig::from_file(path).and_then(|config| config.validate());

    let result = ConfigCheckResult {
        path: path.display().to_string(),
        valid: outcome.is_ok(),
        error: outcome.as_ref().err().map(|e| e.to_string()),
    };
    output_result("Configuration check", &result, cli_args)?;

    outcome
}
