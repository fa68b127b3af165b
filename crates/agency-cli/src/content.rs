//! `briefs` and `posts` command handlers. Both categories share one command
//! shape and differ only in the entity type.

use std::path::PathBuf;

use agency_core::{parse_status, Entity, Status};
use agency_db::DocumentStore;
use agency_sync::{
    load_entity, pull, set_status, upload, ItemReport, StatusChangeReport, SyncContext, Upload,
    UploadOptions,
};
use clap::Subcommand;

use crate::output;

/// Sub-commands available under `briefs` and `posts`.
#[derive(Debug, Subcommand)]
pub enum ContentCommands {
    /// Upload markdown (frontmatter) or JSON files, replacing by id
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Report what would be written without writing
        #[arg(long)]
        dry_run: bool,
        /// Status to apply to every uploaded item
        #[arg(long)]
        status: Option<String>,
        /// Also write the local file copy
        #[arg(long)]
        local: bool,
    },
    /// Set the status in both the local and remote copies
    Status {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        status: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Overwrite local files with the remote copies
    Pull {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

pub(crate) async fn run<E: Upload, S: DocumentStore>(
    ctx: &SyncContext<S>,
    command: &ContentCommands,
    json: bool,
) -> anyhow::Result<bool> {
    match command {
        ContentCommands::Upload {
            files,
            dry_run,
            status,
            local,
        } => {
            let options = UploadOptions {
                dry_run: *dry_run,
                also_local: *local,
                status: status.as_deref().map(parse_status::<E::Status>).transpose()?,
            };
            run_upload::<E, S>(ctx, files, &options, json).await
        }
        ContentCommands::Status {
            ids,
            status,
            dry_run,
        } => {
            let status = parse_status::<E::Status>(status)?;
            let reports = apply_statuses::<E, S>(ctx, ids, status, *dry_run).await;
            output::print_status_reports(&reports, json)?;
            Ok(reports.iter().all(|r| r.success))
        }
        ContentCommands::Pull { ids } => {
            let mut pulled = Vec::new();
            let mut failures = Vec::new();
            for id in ids {
                match pull::<E, S>(ctx, id).await {
                    Ok(report) => pulled.push(report),
                    Err(e) => {
                        tracing::warn!(category = %E::CATEGORY, id = %id, error = %e, "pull failed");
                        failures.push((id.clone(), e.to_string()));
                    }
                }
            }
            output::print_pulls(&pulled, &failures, json)?;
            Ok(failures.is_empty())
        }
    }
}

/// Apply `status` to every id in order. An id refused before any write is
/// reported as failed and the remaining ids still run.
pub(crate) async fn apply_statuses<E: Entity, S: DocumentStore>(
    ctx: &SyncContext<S>,
    ids: &[String],
    status: E::Status,
    dry_run: bool,
) -> Vec<StatusChangeReport> {
    let mut reports = Vec::with_capacity(ids.len());
    for id in ids {
        let report = match set_status::<E, S>(ctx, id, status, dry_run).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(
                    category = %E::CATEGORY,
                    id = %id,
                    error = %e,
                    "status change refused"
                );
                StatusChangeReport::rejected(id.clone(), status.as_str(), &e)
            }
        };
        reports.push(report);
    }
    reports
}

async fn run_upload<E: Upload, S: DocumentStore>(
    ctx: &SyncContext<S>,
    files: &[PathBuf],
    options: &UploadOptions<E::Status>,
    json: bool,
) -> anyhow::Result<bool> {
    let mut candidates = Vec::with_capacity(files.len());
    let mut unreadable = Vec::new();
    for file in files {
        match load_entity::<E>(file) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "skipping unreadable file");
                let id = file
                    .file_stem()
                    .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
                let mut item = ItemReport::failed(id, &e);
                item.source = Some(file.display().to_string());
                unreadable.push(item);
            }
        }
    }

    let mut summary = upload(ctx, candidates, options).await;
    for item in unreadable {
        summary.push(item);
    }

    output::print_summary(&summary, json)?;
    Ok(!summary.has_failures())
}
