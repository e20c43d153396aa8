//! Modify command implementation.

use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use pixmask_core::report::HashComparison;
use pixmask_core::{
    compare_hashes, verify_metadata_removal, BatchProcessor, BatchSummary, HashReport,
    ImageOutcome, MetadataRemovalReport, SeedSource, TransformParams,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::ModifyArgs;

/// Everything `--json` prints.
#[derive(Serialize)]
struct ModifyOutput<'a> {
    input: &'a Path,
    output: &'a Path,
    seed: SeedSource,
    params: &'a TransformParams,
    summary: &'a BatchSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    hashes: Option<&'a HashReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a MetadataRemovalReport>,
}

/// Execute the modify command.
pub fn execute(args: ModifyArgs, config: &Config, quiet: bool) -> Result<()> {
    let input = args.input.unwrap_or_else(|| config.input_path.clone());
    let output = args.output.unwrap_or_else(|| config.output_path.clone());
    let seed = SeedSource::from(args.seed.or(config.seed));

    let params = TransformParams {
        pixel_frequency: args.pixel_frequency,
        pixel_intensity: args.pixel_intensity,
        crop_percentage: args.crop_percentage,
        color_enhancement: args.color_enhancement,
        aggressive_mode: false,
    };
    let implied = params.implies_aggressive();
    let params = params.with_aggressive_mode(args.aggressive || implied);
    if implied && !args.aggressive {
        info!("Parameters imply aggressive mode");
    }
    debug!(?params, %seed, "Resolved parameters");

    let processor = BatchProcessor::new(params)
        .context("Invalid transformation parameters")?
        .with_seed(seed);
    let summary = processor
        .run(&input, &output)
        .with_context(|| format!("Batch run failed for {}", input.display()))?;

    let reports = args
        .verify
        .then(|| (compare_hashes(&summary.mapping), verify_metadata_removal(&summary.mapping)));

    if args.json {
        let out = ModifyOutput {
            input: &input,
            output: &output,
            seed,
            params: &params,
            summary: &summary,
            hashes: reports.as_ref().map(|(h, _)| h),
            metadata: reports.as_ref().map(|(_, m)| m),
        };
        let json = serde_json::to_string_pretty(&out).context("Failed to serialize summary")?;
        println!("{json}");
    } else if !quiet {
        print_summary(&summary, &output, &params);
        if let Some((hashes, metadata)) = &reports {
            print_hash_report(hashes);
            print_metadata_report(metadata);
        }
    }

    if let Some((hashes, metadata)) = &reports {
        if !hashes.passed() || !metadata.passed() {
            bail!(
                "Verification failed: {} unchanged hash(es), {} residual metadata item(s)",
                hashes.whole.identical + hashes.top_left.identical + hashes.top_right.identical,
                metadata.residual_count()
            );
        }
    }

    Ok(())
}

fn print_summary(summary: &BatchSummary, output: &Path, params: &TransformParams) {
    println!();
    if summary.discovered == 0 {
        println!("{}", "No supported images found.".yellow());
        return;
    }

    for record in &summary.outcomes {
        let name = record.source.display();
        match &record.outcome {
            ImageOutcome::Persisted { output } => {
                println!("   {} {} -> {}", "✓".green(), name, output.display())
            }
            ImageOutcome::PersistFailed { error } => {
                println!("   {} {} {}", "✗".red(), name, error.red())
            }
            ImageOutcome::Rejected { reason } => {
                println!("   {} {} {}", "!".yellow(), name, reason.yellow())
            }
            ImageOutcome::Failed { error } => println!("   {} {} {}", "✗".red(), name, error.red()),
        }
    }

    println!();
    let headline = format!("{} photo(s) modified", summary.accepted_count());
    if summary.rejected_count() == 0 {
        println!("{}", headline.green().bold());
    } else {
        println!("{}", headline.yellow().bold());
    }
    println!("   {} {}", "Output:".dimmed(), output.display());
    println!("   {} {}", "Discovered:".dimmed(), summary.discovered);
    println!("   {} {}", "Accepted:".dimmed(), summary.accepted_count());
    println!("   {} {}", "Rejected:".dimmed(), summary.rejected_count());
    if summary.persist_failures() > 0 {
        println!("   {} {}", "  not saved:".dimmed(), summary.persist_failures());
    }
    if params.aggressive_mode {
        println!("   {} {}", "Mode:".dimmed(), "aggressive".red());
    }
}

fn describe(comparison: &HashComparison) -> String {
    match comparison {
        HashComparison::Different { .. } => "changed".green().to_string(),
        HashComparison::Identical { .. } => "UNCHANGED".red().bold().to_string(),
        HashComparison::Error { error } => format!("error ({error})").yellow().to_string(),
    }
}

fn print_hash_report(report: &HashReport) {
    println!();
    println!("{}", "Hash comparison".bold());
    for pair in &report.pairs {
        println!(
            "   {} -> {}",
            pair.original.display(),
            pair.modified.display()
        );
        println!(
            "      whole: {}  top-left: {}  top-right: {}",
            describe(&pair.whole),
            describe(&pair.top_left),
            describe(&pair.top_right)
        );
    }
    let status = if report.passed() {
        "PASSED".green().bold()
    } else {
        "FAILED".red().bold()
    };
    println!(
        "   {} {} ({} whole-file changes)",
        "Result:".dimmed(),
        status,
        report.whole.different
    );
}

fn print_metadata_report(report: &MetadataRemovalReport) {
    println!();
    println!("{}", "Metadata removal".bold());
    for pair in &report.pairs {
        let detail = match (&pair.error, pair.residual.is_empty()) {
            (Some(error), _) => format!("error ({error})").yellow().to_string(),
            (None, true) => "clean".green().to_string(),
            (None, false) => format!("residual: {}", pair.residual.join(", "))
                .red()
                .to_string(),
        };
        println!(
            "   {} {} -> {} item(s), {}",
            pair.original.display(),
            pair.original_count,
            pair.modified_count,
            detail
        );
    }
    let status = if report.passed() {
        "PASSED".green().bold()
    } else {
        "FAILED".red().bold()
    };
    println!("   {} {}", "Result:".dimmed(), status);
}
