use anyhow::Context;
use clap::Parser;
use reasoning_grader::{
    backends::OpenAICompatible,
    batch::{BatchGrader, GradingOptions, Progress, RESULTS_FIELD},
    config::AppConfig,
    document::{load_document, save_document},
    resilient::{ResilienceConfig, ResilientProvider},
};
use serde_json::Value;

use crate::args::CliArgs;
use crate::logging::init_logging;

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("loading model configuration {}", args.config.display()))?;
    args.apply(&mut config);
    let _logger = init_logging(&config.logging)?;

    if let Some(model) = &args.model {
        let answers = config.model(model)?;
        log::info!("grading answers from {model} ({})", answers.openai_model);
    }
    let grader = config.model(&args.grader)?;
    let backend = OpenAICompatible::from_server(grader, Some(config.grading.timeout_secs))?;
    log::info!("grader model {} ({})", args.grader, backend.model());
    let provider = ResilientProvider::new(
        Box::new(backend),
        ResilienceConfig::defaults().with_max_attempts(config.grading.max_attempts),
    );
    let batch = BatchGrader::new(provider, GradingOptions::from(&config.grading));
    let options = batch.options();
    log::info!(
        "sample limit {}, {} call(s) in flight, {:?} per record",
        options
            .sample_limit
            .map_or_else(|| "none".to_string(), |n| n.to_string()),
        options.concurrency,
        options.timeout
    );

    println!("Loading JSON: {}", args.input.display());
    let mut document = load_document(&args.input)
        .with_context(|| format!("reading results file {}", args.input.display()))?;
    let entries = document
        .get(RESULTS_FIELD)
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    println!("Evaluating reasoning for {entries} entries...\n");

    let grading = batch.grade_document(&mut document, print_progress);
    let summary = tokio::select! {
        summary = grading => summary?,
        _ = tokio::signal::ctrl_c() => {
            anyhow::bail!("interrupted, no output written");
        }
    };

    println!("\nAverage reasoning score: {:.4}", summary.average);
    for (label, count) in &summary.label_counts {
        println!("  {label}: {count}");
    }

    save_document(&args.output, &document)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!("\nDone. Output saved to: {}", args.output.display());
    println!(
        "Average reasoning score = {:.4} ({} of {} results graded)",
        summary.average,
        summary.graded(),
        summary.total_records
    );
    Ok(())
}

fn print_progress(progress: &Progress) {
    println!(
        "[{}/{}] result #{}: {} (score {})",
        progress.completed, progress.total, progress.index, progress.label, progress.score
    );
}
