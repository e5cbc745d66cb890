//! Command implementations for the Sieve CLI.

use std::io::{self, BufRead};
use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::classifier::{
    ClassifierConfig, FileSnapshotStore, Model, ModelSnapshot, NaiveBayesClassifier,
    SnapshotFormat, SnapshotStore, TrainingCorpus, load_model_or_empty, save_model,
};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{Result, SieveError};

/// Execute a CLI command.
pub fn execute_command(args: SieveArgs) -> Result<()> {
    let config = load_config(&args)?;
    match &args.command {
        Command::Train(train_args) => train(train_args, &config, &args),
        Command::Classify(classify_args) => classify(classify_args, &config, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &args),
    }
}

/// Load the classifier configuration named on the command line, if any.
fn load_config(args: &SieveArgs) -> Result<ClassifierConfig> {
    match &args.config {
        Some(path) => {
            debug!("loading configuration from {}", path.display());
            ClassifierConfig::from_json_file(path)
        }
        None => Ok(ClassifierConfig::default()),
    }
}

/// Train from corpus files and write the snapshot.
fn train(args: &TrainArgs, config: &ClassifierConfig, cli_args: &SieveArgs) -> Result<()> {
    let start_time = Instant::now();
    let (store, key) = FileSnapshotStore::for_file(&args.snapshot)?;

    let mut classifier = NaiveBayesClassifier::with_config(config)?;
    if args.append {
        classifier = classifier.with_model(load_model_or_empty(&store, &key)?);
    }

    let mut corpus = TrainingCorpus::default();
    for path in &args.corpus {
        info!("loading corpus from {}", path.display());
        corpus.append(TrainingCorpus::from_path(path, config.skip_blank_lines)?);
    }
    if let Some(samples) = &args.samples {
        info!("loading samples from {}", samples.display());
        corpus.append(TrainingCorpus::from_samples_json(samples)?);
    }
    if corpus.is_empty() {
        return Err(SieveError::invalid_argument(
            "the training corpus contains no documents",
        ));
    }

    let report = classifier.train_corpus(&corpus)?;
    let format = args.snapshot_format.unwrap_or(config.snapshot_format);
    save_model(&store, &key, classifier.model(), format)?;

    let model = classifier.model();
    output_result(
        "Training finished",
        &TrainingResult {
            snapshot: args.snapshot.display().to_string(),
            snapshot_format: format,
            documents_added: report.documents,
            tokens_added: report.tokens,
            labels_trained: report.labels,
            total_documents: model.total_documents(),
            vocabulary_size: model.vocabulary_size(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Classify command-line texts, or stdin lines when none are given.
fn classify(args: &ClassifyArgs, config: &ClassifierConfig, cli_args: &SieveArgs) -> Result<()> {
    let results = run_classification(args, config, io::stdin().lock())?;
    output_result("Classification results", &results, cli_args)
}

/// Classify `args.texts` against the snapshot, reading one text per
/// non-blank line of `input` when no texts were given.
pub fn run_classification<R: BufRead>(
    args: &ClassifyArgs,
    config: &ClassifierConfig,
    input: R,
) -> Result<ClassificationResults> {
    let (model, _) = read_snapshot(&args.snapshot)?;
    let classifier = NaiveBayesClassifier::with_config(config)?.with_model(model);

    let texts = if args.texts.is_empty() {
        read_lines(input)?
    } else {
        args.texts.clone()
    };

    let mut classifications = Vec::with_capacity(texts.len());
    for text in texts {
        let label = classifier.classify(&text)?;
        let scores = if args.explain {
            Some(classifier.scores(&text)?)
        } else {
            None
        };
        classifications.push(Classification {
            text,
            label,
            scores,
        });
    }

    Ok(ClassificationResults { classifications })
}

/// Show per-label statistics of a snapshot.
fn show_stats(args: &StatsArgs, cli_args: &SieveArgs) -> Result<()> {
    let (model, snapshot_format) = read_snapshot(&args.snapshot)?;
    let total = model.total_documents();

    let labels = model
        .classes()
        .map(|(label, stats)| LabelStats {
            label: label.to_string(),
            documents: stats.document_count(),
            prior: if total == 0 {
                0.0
            } else {
                stats.document_count() as f64 / total as f64
            },
            total_tokens: stats.total_tokens(),
            distinct_tokens: stats.distinct_tokens(),
        })
        .collect();

    output_result(
        "Model statistics",
        &ModelStats {
            snapshot: args.snapshot.display().to_string(),
            snapshot_format,
            total_documents: total,
            vocabulary_size: model.vocabulary_size(),
            labels,
        },
        cli_args,
    )
}

/// Read and validate a snapshot file.
///
/// Unlike training with `--append`, a missing or corrupt snapshot is an
/// error here: classifying against an empty model would silently answer
/// "no decision" for everything.
fn read_snapshot(path: &Path) -> Result<(Model, SnapshotFormat)> {
    let (store, key) = FileSnapshotStore::for_file(path)?;
    let bytes = store.load(&key)?.ok_or_else(|| {
        SieveError::storage(format!("no snapshot found at {}", path.display()))
    })?;
    let (snapshot, format) = ModelSnapshot::decode_with_format(&bytes)?;
    let model = Model::from_snapshot(snapshot)?;
    debug!(
        "read {format} snapshot {} ({} labels)",
        path.display(),
        model.label_count()
    );
    Ok((model, format))
}

fn read_lines<R: BufRead>(input: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in input.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}
