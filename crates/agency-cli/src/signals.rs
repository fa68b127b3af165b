//! `signals` command handlers.

use std::path::PathBuf;

use agency_core::{parse_status, Signal, SignalStatus};
use agency_db::DocumentStore;
use agency_sync::{
    check_signal, load_signals, set_signal_status, upload_signals, Candidate, ItemReport,
    StatusChangeReport, SyncContext, UploadOptions,
};
use clap::Subcommand;

use crate::output;

/// Sub-commands available under `signals`.
#[derive(Debug, Subcommand)]
pub enum SignalsCommands {
    /// Upload signals from JSON files, skipping urls already stored
    Upload {
        /// JSON files holding one signal object or an array of them
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Report what would be written without writing
        #[arg(long)]
        dry_run: bool,
        /// Status to apply to every uploaded signal
        #[arg(long)]
        status: Option<String>,
    },
    /// Check whether a signal url is already stored
    Check {
        #[arg(long)]
        url: String,
    },
    /// Set the status of stored signals
    Status {
        /// Signal urls
        #[arg(long = "url", required = true)]
        urls: Vec<String>,
        /// unused, used or rejected
        #[arg(long)]
        status: String,
        /// Brief that used the signals (recorded with `--status used`)
        #[arg(long)]
        brief: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
}

pub(crate) async fn run<S: DocumentStore>(
    ctx: &SyncContext<S>,
    command: &SignalsCommands,
    json: bool,
) -> anyhow::Result<bool> {
    match command {
        SignalsCommands::Upload {
            files,
            dry_run,
            status,
        } => run_upload(ctx, files, *dry_run, status.as_deref(), json).await,
        SignalsCommands::Check { url } => {
            let check = check_signal(ctx, url).await?;
            output::print_check(&check, json)?;
            Ok(!check.exists)
        }
        SignalsCommands::Status {
            urls,
            status,
            brief,
            dry_run,
        } => {
            parse_status::<SignalStatus>(status)?;
            let mut reports = Vec::with_capacity(urls.len());
            for url in urls {
                let report =
                    match set_signal_status(ctx, url, status, brief.as_deref(), *dry_run).await {
                        Ok(report) => report,
                        Err(e) => {
                            tracing::warn!(url = %url, error = %e, "status change refused");
                            let mut report =
                                StatusChangeReport::rejected(url.clone(), status, &e);
                            report.url = Some(url.clone());
                            report
                        }
                    };
                reports.push(report);
            }
            output::print_status_reports(&reports, json)?;
            Ok(reports.iter().all(|r| r.success))
        }
    }
}

async fn run_upload<S: DocumentStore>(
    ctx: &SyncContext<S>,
    files: &[PathBuf],
    dry_run: bool,
    status: Option<&str>,
    json: bool,
) -> anyhow::Result<bool> {
    let status = status.map(parse_status::<SignalStatus>).transpose()?;

    let (candidates, unreadable) = collect_signals(files);

    let options = UploadOptions {
        dry_run,
        also_local: false,
        status,
    };
    let mut summary = upload_signals(ctx, candidates, &options).await;
    for item in unreadable {
        summary.push(item);
    }

    output::print_summary(&summary, json)?;
    Ok(!summary.has_failures())
}

/// Load every file, keeping decodable signals as candidates and turning
/// unreadable files and undecodable elements into failed items.
pub(crate) fn collect_signals(
    files: &[PathBuf],
) -> (Vec<Candidate<Signal>>, Vec<ItemReport>) {
    let mut candidates = Vec::new();
    let mut failed = Vec::new();
    for file in files {
        let loaded = match load_signals(file) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "skipping unreadable file");
                let mut item = ItemReport::failed(file.display().to_string(), &e);
                item.source = Some(file.display().to_string());
                failed.push(item);
                continue;
            }
        };
        for (i, element) in loaded.into_iter().enumerate() {
            match element {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => {
                    let source = format!("{}[{i}]", file.display());
                    tracing::warn!(source = %source, error = %e, "skipping undecodable signal");
                    let mut item = ItemReport::failed(source.clone(), &e);
                    item.source = Some(source);
                    failed.push(item);
                }
            }
        }
    }
    (candidates, failed)
}
