use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod cli;

use cli::Args;
use esg_report_analyzer::analyzer::{FileOutcome, ReportAnalyzer, Stage};
use esg_report_analyzer::prompt::PROMPT_VERSION;
use esg_report_analyzer::{sections, BackendConfig, GroqBackend, Pipeline, ReportGenerator};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    info!("🌱 ESG report analyzer starting...");

    let pdf_files = if args.input.is_dir() {
        ReportAnalyzer::<GroqBackend>::find_pdf_files(&args.input)?
    } else if args.input.is_file() {
        vec![args.input.clone()]
    } else {
        bail!("input {} does not exist", args.input.display());
    };

    if pdf_files.is_empty() {
        warn!("No PDF files found in {}", args.input.display());
        return Ok(());
    }

    info!("Found {} PDF file(s)", pdf_files.len());

    // Flags win over GROQ_* variables
    let mut config = BackendConfig::from_env();
    if let Some(api_key) = &args.api_key {
        config.api_key = Some(api_key.clone());
    }
    if let Some(model) = &args.model {
        config = config.with_model(model.clone());
    }
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    if !args.extract_only {
        // Fail on configuration before touching any document
        config
            .validate()
            .context("backend configuration is not usable")?;
    }

    let backend = GroqBackend::new(&config).context("failed to build HTTP client")?;
    let pipeline = Pipeline::new(ReportGenerator::new(config, backend))
        .allow_empty_text(args.allow_empty);
    let analyzer = ReportAnalyzer::new(pipeline)
        .with_max_file_size(args.max_size_mb.saturating_mul(1024 * 1024))
        .with_progress(pdf_files.len() > 1);

    if args.extract_only {
        return print_extracted_text(&analyzer, &pdf_files).await;
    }

    if let Some(dir) = &args.output {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let results = analyzer.analyze_files(&pdf_files).await;

    let config = analyzer.pipeline().generator().config();
    for outcome in &results {
        report_outcome(outcome, config, args.output.as_deref()).await?;
    }

    let successful = results.iter().filter(|r| r.success()).count();
    let failed = results.len() - successful;

    println!("\n🎉 Analysis complete!");
    println!("Analyzed: {}/{} reports", successful, results.len());
    println!("Failed: {}", failed);
    if let Some(dir) = &args.output {
        println!("Reports written to: {}", dir.display());
    }

    if failed > 0 {
        bail!("{} of {} report(s) could not be analyzed", failed, results.len());
    }
    Ok(())
}

async fn print_extracted_text(
    analyzer: &ReportAnalyzer<GroqBackend>,
    pdf_files: &[PathBuf],
) -> Result<()> {
    let mut failed = 0;
    for path in pdf_files {
        let outcome = analyzer.extract_file(path).await;
        match &outcome.text {
            Some(text) => {
                println!("===== {} ({} pages) =====", path.display(), text.page_count());
                println!("{}", text);
            }
            None => {
                failed += 1;
                let message = outcome.error_message.as_deref().unwrap_or("unknown error");
                match outcome.stage {
                    Stage::Rejected => println!("❌ {}: skipped: {}", path.display(), message),
                    _ => println!(
                        "❌ {}: error occurred while extracting text: {}",
                        path.display(),
                        message
                    ),
                }
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} file(s) could not be extracted", failed, pdf_files.len());
    }
    Ok(())
}

async fn report_outcome(outcome: &FileOutcome, config: &BackendConfig, output: Option<&Path>) -> Result<()> {
    let path = outcome.file_path.display();
    let message = outcome.error_message.as_deref().unwrap_or("unknown error");

    match (&outcome.result, outcome.stage) {
        (Some(result), _) => {
            let check = sections::check(result);
            if !check.is_complete() {
                warn!(
                    "Analysis of {} does not follow the section layout (missing: {:?}, in order: {})",
                    path, check.missing, check.in_order
                );
            }

            match output {
                Some(dir) => {
                    let target = dir.join(report_file_name(&outcome.file_path));
                    let content = format!(
                        "<!-- source: {} | model: {} | prompt: {} | generated: {} -->\n\n{}\n",
                        path,
                        config.model,
                        PROMPT_VERSION,
                        chrono::Utc::now().to_rfc3339(),
                        result
                    );
                    tokio::fs::write(&target, content)
                        .await
                        .with_context(|| format!("failed to write {}", target.display()))?;
                    println!("✅ {} → {}", path, target.display());
                }
                None => {
                    println!("\n✅ Report processed successfully: {}", path);
                    println!("{}", "=".repeat(80));
                    println!("{}", result);
                    println!("{}", "=".repeat(80));
                }
            }
        }
        (None, Stage::Generation) => {
            println!(
                "⚠️  {}: text extracted ({} characters, {} pages) but analysis failed: {}",
                path, outcome.extracted_chars, outcome.page_count, message
            );
        }
        (None, Stage::Extraction) => {
            println!("❌ {}: error occurred while extracting text: {}", path, message);
        }
        (None, _) => {
            println!("❌ {}: skipped: {}", path, message);
        }
    }
    Ok(())
}

fn report_file_name(pdf_path: &Path) -> String {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    format!("{}.md", stem)
}
