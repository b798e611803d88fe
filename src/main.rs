use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use disavow_sieve::classify::rules::SpamRuleSet;
use disavow_sieve::config::Config;
use disavow_sieve::disavow::DisavowFile;
use disavow_sieve::ingest::decode_text;
use disavow_sieve::output::{self, terminal, MERGED_DISAVOW_FILE};
use disavow_sieve::pipeline::{generate, merge};
use disavow_sieve::DisavowError;

/// disavow-sieve: find spammy referring domains in backlink exports.
///
/// Reads exports from several backlink tools, flags links whose anchor or
/// context looks like spam, and writes a disavow list plus a review workbook.
/// A reviewed workbook can later be merged back into the live disavow file.
#[derive(Parser)]
#[command(name = "disavow-sieve", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify backlink exports and write a new disavow list + review workbook
    Generate {
        /// Backlink export CSV files (Ahrefs, Semrush, Majestic, GSC, ...)
        #[arg(long, num_args = 1.., required = true)]
        backlinks: Vec<PathBuf>,

        /// Suspicious anchor list (CSV with an `anchor_text` column).
        /// Falls back to DISAVOW_ANCHOR_SHEET_URL when omitted.
        #[arg(long)]
        anchors: Option<PathBuf>,

        /// Existing disavow.txt; its domains are excluded from the new list
        #[arg(long)]
        disavow: Option<PathBuf>,

        /// Output directory (default: DISAVOW_OUTPUT_DIR or ./output)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge a reviewed workbook back into an existing disavow file
    Merge {
        /// Reviewed workbook (.xlsx, sheet "Disavow Details") or CSV,
        /// with a `referring_domain` column
        #[arg(long)]
        reviewed: PathBuf,

        /// Existing disavow.txt to merge into
        #[arg(long)]
        disavow: PathBuf,

        /// Where to write the merged file (default: <output dir>/merged_disavow.txt)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the merge summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the built-in spam rule categories
    Rules,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("disavow_sieve=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            backlinks,
            anchors,
            disavow,
            out_dir,
            json,
        } => {
            let config = Config::load()?;
            if backlinks.is_empty() {
                return Err(DisavowError::MissingRequiredInput("backlink files".to_string()).into());
            }
            let anchor_source = config.require_anchor_source(anchors.as_deref())?;

            info!(source = %anchor_source.describe(), "Loading suspicious anchors");
            let anchor_set = anchor_source.load().await?;

            let existing = match &disavow {
                Some(path) => read_disavow_file(path)?,
                None => DisavowFile::empty(),
            };

            let batch = generate::TableBatch::from_paths(&backlinks);
            let rules = SpamRuleSet::builtin()?;
            let report = generate::run(&batch, &rules, &anchor_set, &existing)?;

            let out_dir = config.output_dir_or(out_dir.as_deref());
            let files = output::write_generate_outputs(&out_dir, &report)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                terminal::display_generate_summary(&report);
                println!("\n  Disavow list:  {}", files.disavow_list.display());
                println!("  Review sheet:  {}", files.detail_export.display());
            }
        }

        Commands::Merge {
            reviewed,
            disavow,
            out,
            json,
        } => {
            let config = Config::load()?;
            for (label, path) in [("reviewed workbook", &reviewed), ("disavow file", &disavow)] {
                if !path.exists() {
                    return Err(DisavowError::MissingRequiredInput(format!(
                        "{label} {}",
                        path.display()
                    ))
                    .into());
                }
            }

            let bytes = std::fs::read(&disavow)
                .with_context(|| format!("Failed to read {}", disavow.display()))?;
            let existing_text = decode_text(&disavow.display().to_string(), &bytes)?;

            let report = merge::run(&reviewed, &existing_text)?;

            let out_path = out.unwrap_or_else(|| config.output_dir.join(MERGED_DISAVOW_FILE));
            if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&out_path, &report.content)
                .with_context(|| format!("Failed to write {}", out_path.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                terminal::display_merge_summary(&report);
                println!("\n  Merged file: {}", out_path.display());
            }
        }

        Commands::Rules => {
            terminal::display_rules(&SpamRuleSet::builtin()?);
        }
    }

    Ok(())
}

/// Read and parse an existing disavow file, tolerating non-UTF-8 bytes.
fn read_disavow_file(path: &std::path::Path) -> Result<DisavowFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = decode_text(&path.display().to_string(), &bytes)?;
    let file = DisavowFile::parse(&text);

    info!(
        path = %path.display(),
        domains = file.domains().len(),
        passthrough = file.passthrough_lines().len(),
        "Loaded existing disavow file"
    );
    if file.domains().is_empty() {
        warn!(path = %path.display(), "Existing disavow file has no domain: lines");
    }

    Ok(file)
}
