use std::path::PathBuf;
use std::sync::Arc;

use doc_triage::channels::FsContentReader;
use doc_triage::config::{TriageConfig, load_manifest};
use doc_triage::error::Result;
use doc_triage::pipeline::{TextExtractor, TriageProcessor};
use doc_triage::store::{CaseStore, JsonFileExporter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = TriageConfig::from_env()?;

    // First CLI argument overrides TRIAGE_INPUTS.
    let manifest_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.manifest_path.clone())
        .unwrap_or_else(|| {
            eprintln!("Usage: doc-triage <inputs.json>");
            eprintln!("  or set TRIAGE_INPUTS=/path/to/inputs.json");
            std::process::exit(2);
        });

    let inputs = load_manifest(&manifest_path).await?;

    eprintln!("📄 Doc Triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Inputs: {} ({})", inputs.len(), manifest_path.display());
    eprintln!("   Snapshot: {}\n", config.export_path.display());

    let store = Arc::new(CaseStore::new());
    let processor = TriageProcessor::new(
        Arc::clone(&store),
        Arc::new(FsContentReader::new()),
        Arc::new(JsonFileExporter::new(config.export_path.clone())),
    )?
    .with_text_extractor(TextExtractor::with_default_rules()?.with_summary_chars(config.summary_chars))
    .with_default_sender(config.default_sender.clone());

    for input in inputs {
        tracing::info!(
            thread_id = input.thread_id.as_deref().unwrap_or("(generated)"),
            path = %input.file_path,
            "Processing input"
        );
        processor.process(input).await;
    }

    tracing::info!("Final case store state");
    println!("{}", serde_json::to_string_pretty(&store.snapshot().await)?);

    Ok(())
}
