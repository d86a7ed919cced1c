use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use judgeport_core::config::{CompareMode, ConfigDocument, Schema};
use judgeport_core::decoder;
use judgeport_core::fault::{self, FaultVariant};
use judgeport_core::problem::{ProblemBank, ProblemSource};
use judgeport_core::transport;
use judgeport_core::verdict::ResultVocabulary;

fn parse_schema(name: &str) -> Result<Schema> {
    match name.to_lowercase().as_str() {
        "legacy" => Ok(Schema::Legacy),
        "structured" => Ok(Schema::Structured),
        other => bail!("invalid schema '{}': valid options are legacy, structured", other),
    }
}

fn parse_compare_mode(name: &str) -> Result<CompareMode> {
    match name.to_lowercase().as_str() {
        "strict" => Ok(CompareMode::Strict),
        "ignore-spaces" => Ok(CompareMode::IgnoreSpaces),
        "case-insensitive" => Ok(CompareMode::CaseInsensitive),
        "float-tolerant" => Ok(CompareMode::FloatTolerant),
        other => bail!(
            "invalid compare mode '{other}': valid options are \
             strict, ignore-spaces, case-insensitive, float-tolerant"
        ),
    }
}

fn parse_fault(inject: Option<u8>) -> Result<Option<FaultVariant>> {
    match inject {
        None => Ok(None),
        Some(n) => FaultVariant::from_number(n)
            .map(Some)
            .ok_or_else(|| anyhow!("invalid fault variant {}: valid range is 1-6", n)),
    }
}

/// Fetch a problem from the bank and render its config in the chosen schema,
/// applying the requested fault variant, if any.
fn build_problem_config(
    problem_id: u32,
    bank_path: &Path,
    schema: Schema,
    security_check: bool,
    o2: bool,
    compare_mode: CompareMode,
    variant: Option<FaultVariant>,
) -> Result<String> {
    let bank = ProblemBank::load(bank_path)?;
    let data = bank.fetch(problem_id)?;
    info!(
        problem_id,
        title = %data.title(),
        examples = data.examples.len(),
        "fetched problem"
    );

    let mut doc = ConfigDocument::from_examples(data.time_limit_ms()?, &data.examples)?;
    doc.security_check_enabled = security_check;
    doc.o2_enabled = o2;
    doc.compare_mode = compare_mode;

    let mut value = doc.to_json(schema);
    if let Some(variant) = variant {
        info!(variant = variant.number(), "injecting fault into config");
        fault::apply(&mut value, schema, variant)?;
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

pub async fn submit(
    file: PathBuf,
    problem: Option<u32>,
    config: Option<PathBuf>,
    bank: &Path,
    host: String,
    port: u16,
    schema_name: &str,
    security_check: bool,
    o2: bool,
    compare_mode_name: &str,
    inject: Option<u8>,
    timeout_secs: u64,
) -> Result<()> {
    let schema = parse_schema(schema_name)?;
    let compare_mode = parse_compare_mode(compare_mode_name)?;
    let variant = parse_fault(inject)?;

    let config_json = match (problem, config) {
        (Some(id), None) => build_problem_config(
            id,
            bank,
            schema,
            security_check,
            o2,
            compare_mode,
            variant,
        )?,
        (None, Some(path)) => {
            // Custom-config mode: the document is sent verbatim, except that
            // a requested fault still goes through the parsed-document path.
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            match variant {
                Some(variant) => fault::apply_to_str(&raw, schema, variant)?,
                None => raw,
            }
        }
        _ => bail!("exactly one of --problem or --config must be given"),
    };

    println!("Generated config:\n{config_json}");
    println!("Submitting {} to {}:{}...", file.display(), host, port);

    let read_timeout = Duration::from_secs(timeout_secs);
    // The exchange runs on its own task; this context only waits on the
    // handle, so it stays free for progress rendering hooks.
    let worker = tokio::spawn(async move {
        transport::submit(&file, &config_json, &host, port, read_timeout, |progress| {
            eprint!("\rUploading... {:5.1}%", progress * 100.0);
        })
        .await
    });
    let messages = worker.await??;
    eprintln!();

    let vocabulary = ResultVocabulary::default();
    let summary = decoder::decode(&messages, &vocabulary);

    println!();
    println!("=== Evaluation results ===");
    for record in &summary.checkpoint_results {
        println!(
            "Checkpoint {}: {} - {:.0}ms, {} KB",
            record.index, record.status_text, record.time_used_ms, record.memory_used_kb
        );
    }
    println!();
    println!(
        "Total: {}, accepted: {}, average time: {:.2}ms, average memory: {} KB",
        summary.total_count,
        summary.accepted_count,
        summary.average_time_ms,
        summary.average_memory_kb
    );

    Ok(())
}

pub fn build_config(
    problem: u32,
    bank: &Path,
    schema_name: &str,
    security_check: bool,
    o2: bool,
    compare_mode_name: &str,
    inject: Option<u8>,
) -> Result<()> {
    let schema = parse_schema(schema_name)?;
    let compare_mode = parse_compare_mode(compare_mode_name)?;
    let variant = parse_fault(inject)?;

    let config_json = build_problem_config(
        problem,
        bank,
        schema,
        security_check,
        o2,
        compare_mode,
        variant,
    )?;
    println!("{config_json}");
    Ok(())
}
