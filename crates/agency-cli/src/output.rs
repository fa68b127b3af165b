//! Rendering of command results. Human output is a short table per run;
//! `--json` prints the same data as one JSON document on stdout.

use agency_core::IndexDocument;
use agency_sync::{ItemOutcome, ItemReport, PullReport, RunSummary, SignalCheck, StatusChangeReport};
use serde::Serialize;
use serde_json::Value;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_summary(summary: &RunSummary, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(summary);
    }

    for item in &summary.items {
        println!("{}", item_line(item));
        for warning in &item.warnings {
            println!("    warning: {warning}");
        }
    }
    let mode = if summary.dry_run { " (dry run)" } else { "" };
    println!(
        "{}: {} succeeded, {} skipped, {} failed{mode}",
        summary.category, summary.succeeded, summary.skipped, summary.failed
    );
    Ok(())
}

fn item_line(item: &ItemReport) -> String {
    let key = item.url.as_deref().unwrap_or(&item.id);
    let mut line = format!("{:<14} {key}", item.outcome.label());
    match &item.outcome {
        ItemOutcome::Skipped {
            reason,
            existing_id,
        } => {
            let reason = serde_json::to_value(reason)
                .ok()
                .and_then(|v| v.as_str().map(str::to_owned))
                .unwrap_or_default();
            line.push_str(&format!("  ({reason}, existing id {existing_id})"));
        }
        ItemOutcome::Failed { reason } => line.push_str(&format!("  {reason}")),
        _ => {}
    }
    if let Some(local) = &item.local {
        line.push_str(&format!("  local={}", local.label()));
    }
    if item.index_updated == Some(false) {
        line.push_str("  index=failed");
    }
    if let Some(source) = &item.source {
        line.push_str(&format!("  [{source}]"));
    }
    line
}

pub(crate) fn print_status_reports(
    reports: &[StatusChangeReport],
    json: bool,
) -> anyhow::Result<()> {
    if json {
        return print_json(reports);
    }
    for report in reports {
        let key = report.url.as_deref().unwrap_or(&report.id);
        let verdict = if report.success { "ok" } else { "FAILED" };
        println!(
            "{verdict:<7} {key} -> {}  local={} remote={}{}",
            report.status,
            report.local.label(),
            report.remote.label(),
            if report.index_updated { " index=updated" } else { "" }
        );
        if let agency_sync::StoreOutcome::Failed { reason } = &report.local {
            println!("    {reason}");
        }
        if let agency_sync::StoreOutcome::Failed { reason } = &report.remote {
            if report.remote != report.local {
                println!("    {reason}");
            }
        }
    }
    Ok(())
}

pub(crate) fn print_index(index: &IndexDocument, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(index);
    }
    for entry in &index.items {
        println!(
            "{:<24} {:<10} {:<21} {}",
            field(entry, "id"),
            field(entry, "status"),
            field(entry, "created_at"),
            field(entry, "title"),
        );
    }
    println!("{} entries", index.count);
    Ok(())
}

fn field<'a>(entry: &'a Value, key: &str) -> &'a str {
    entry.get(key).and_then(Value::as_str).unwrap_or("-")
}

pub(crate) fn print_check(check: &SignalCheck, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(check);
    }
    match &check.existing_id {
        Some(id) => println!("exists     {} (id {id})", check.url),
        None => println!("not found  {}", check.url),
    }
    Ok(())
}

pub(crate) fn print_pulls(
    pulled: &[PullReport],
    failures: &[(String, String)],
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let failed: Vec<Value> = failures
            .iter()
            .map(|(id, reason)| serde_json::json!({"id": id, "reason": reason}))
            .collect();
        return print_json(&serde_json::json!({"pulled": pulled, "failed": failed}));
    }
    for pull in pulled {
        println!("pulled  {} -> {}", pull.id, pull.path.display());
    }
    for (id, reason) in failures {
        println!("failed  {id}  {reason}");
    }
    Ok(())
}

/// Final diagnostic for an error that aborted the command.
pub(crate) fn print_error(kind: &str, message: &str, json: bool) {
    if json {
        println!("{}", serde_json::json!({"error": kind, "message": message}));
    } else {
        eprintln!("{kind}: {message}");
    }
}
