mod cli;

use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use mcq_generator::{GeneratorConfig, IndicatifProgress, QuestionGenerator};
use quiz_llm_service::telemetry;
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables win.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("warn", level))
        .with(telemetry::layer())
        .try_init()
        .context("installing tracing subscriber")?;

    let cfg = GeneratorConfig::from_env().context("loading generator config")?;
    let spec = cli.spec(cfg.batch_size);
    let generator = QuestionGenerator::from_config(cfg.llm).context("building LLM client")?;

    let show_progress = !cli.quiet && io::stderr().is_terminal();
    let progress = if show_progress {
        IndicatifProgress::spinner()
    } else {
        IndicatifProgress::hidden()
    };

    let questions = generator
        .generate_with_progress(&spec, &progress)
        .await
        .with_context(|| format!("generating questions on {:?}", spec.topic))?;

    info!(
        requested = spec.count.get(),
        parsed = questions.len(),
        "generation finished"
    );

    let json = if cli.pretty {
        serde_json::to_string_pretty(&questions)?
    } else {
        serde_json::to_string(&questions)?
    };
    println!("{json}");

    if !cli.quiet {
        let summary = format!(
            "{}/{} questions on {} ({})",
            questions.len(),
            spec.count,
            spec.topic,
            spec.difficulty
        );
        if questions.len() < spec.count.get() as usize {
            eprintln!("{} {}", "partial:".yellow().bold(), summary);
        } else {
            eprintln!("{} {}", "done:".green().bold(), summary);
        }
    }

    Ok(())
}
