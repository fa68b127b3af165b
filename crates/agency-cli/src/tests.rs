use std::path::PathBuf;

use agency_core::{BriefStatus, Category};
use agency_db::{MemoryStore, TenantPath};
use agency_sync::{upload_briefs, Candidate, ItemReport, LocalStore, UploadOptions};
use serde_json::json;

use super::*;

fn memory_context(root: &std::path::Path) -> SyncContext<MemoryStore> {
    SyncContext::new(
        MemoryStore::new(),
        TenantPath::new("clients", "acme"),
        LocalStore::new(root),
    )
}

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["agency", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Db {
            command: DbCommands::Ping
        }
    ));
    assert!(!cli.json);
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["agency", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Db {
            command: DbCommands::Migrate
        }
    ));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["agency"]).is_err());
}

#[test]
fn parses_signals_upload_with_files_and_flags() {
    let cli = Cli::try_parse_from([
        "agency",
        "signals",
        "upload",
        "a.json",
        "b.json",
        "--dry-run",
        "--status",
        "rejected",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Commands::Signals {
            command: SignalsCommands::Upload {
                ref files,
                dry_run: true,
                status: Some(ref s),
            }
        } if files == &vec![PathBuf::from("a.json"), PathBuf::from("b.json")] && s == "rejected"
    ));
}

#[test]
fn signals_upload_requires_a_file() {
    assert!(Cli::try_parse_from(["agency", "signals", "upload"]).is_err());
}

#[test]
fn parses_signals_check() {
    let cli =
        Cli::try_parse_from(["agency", "signals", "check", "--url", "https://x.com/p/1"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Signals {
            command: SignalsCommands::Check { ref url }
        } if url == "https://x.com/p/1"
    ));
}

#[test]
fn parses_repeated_signal_urls_for_status() {
    let cli = Cli::try_parse_from([
        "agency",
        "signals",
        "status",
        "--url",
        "https://x.com/p/1",
        "--url",
        "https://x.com/p/2",
        "--status",
        "used",
        "--brief",
        "b1",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Signals {
            command: SignalsCommands::Status {
                ref urls,
                ref status,
                brief: Some(ref brief),
                dry_run: false,
            }
        } if urls.len() == 2 && status == "used" && brief == "b1"
    ));
}

#[test]
fn json_flag_is_global() {
    let cli = Cli::try_parse_from(["agency", "briefs", "pull", "b1", "--json"]).unwrap();
    assert!(cli.json);
    assert!(matches!(
        cli.command,
        Commands::Briefs {
            command: ContentCommands::Pull { ref ids }
        } if ids == &vec!["b1".to_string()]
    ));
}

#[test]
fn parses_briefs_upload_with_local_copy() {
    let cli = Cli::try_parse_from(["agency", "briefs", "upload", "b1.md", "--local"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Briefs {
            command: ContentCommands::Upload {
                local: true,
                dry_run: false,
                status: None,
                ..
            }
        }
    ));
}

#[test]
fn parses_posts_status_for_several_ids() {
    let cli = Cli::try_parse_from([
        "agency",
        "posts",
        "status",
        "p1",
        "p2",
        "--status",
        "scheduled",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Posts {
            command: ContentCommands::Status {
                ref ids,
                ref status,
                dry_run: true,
            }
        } if ids.len() == 2 && status == "scheduled"
    ));
}

#[test]
fn status_flag_is_required() {
    assert!(Cli::try_parse_from(["agency", "posts", "status", "p1"]).is_err());
}

#[test]
fn parses_index_rebuild_category() {
    let cli = Cli::try_parse_from(["agency", "index", "rebuild", "posts", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Index {
            command: IndexCommands::Rebuild {
                category: Category::Posts,
                dry_run: true,
            }
        }
    ));
}

#[test]
fn unknown_index_category_is_rejected() {
    assert!(Cli::try_parse_from(["agency", "index", "show", "drafts"]).is_err());
}

#[tokio::test]
async fn invalid_id_in_status_batch_fails_alone() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = memory_context(dir.path());
    let brief: Brief = serde_json::from_value(json!({"id": "b1", "title": "Caching"})).unwrap();
    let options = UploadOptions::<BriefStatus> {
        also_local: true,
        ..UploadOptions::default()
    };
    upload_briefs(&ctx, vec![Candidate::new(brief)], &options).await;

    let ids = ["b1", "_index", "b1"].map(String::from);
    let reports =
        content::apply_statuses::<Brief, _>(&ctx, &ids, BriefStatus::Used, false).await;

    assert_eq!(reports.len(), 3);
    assert!(reports[0].success);
    assert!(!reports[1].success);
    assert_eq!(reports[1].id, "_index");
    assert!(reports[2].success);

    let remote: Brief = ctx.read_remote("b1").await.unwrap().unwrap();
    assert_eq!(remote.status, BriefStatus::Used);
}

#[test]
fn undecodable_signals_become_failed_items_next_to_good_ones() {
    let dir = tempfile::tempdir().unwrap();
    let mixed = dir.path().join("mixed.json");
    let missing = dir.path().join("missing.json");
    std::fs::write(
        &mixed,
        r#"[{"url": "https://x.com/p/1"}, {"content": "no url"}, {"url": "https://x.com/p/3"}]"#,
    )
    .unwrap();

    let (candidates, failed) = signals::collect_signals(&[mixed, missing]);

    let urls: Vec<&str> = candidates.iter().map(|c| c.entity.url.as_str()).collect();
    assert_eq!(urls, ["https://x.com/p/1", "https://x.com/p/3"]);
    assert_eq!(failed.len(), 2);
    assert!(failed[0].id.ends_with("mixed.json[1]"));
    assert!(failed[1].id.ends_with("missing.json"));
    assert!(failed.iter().all(ItemReport::has_failure));
}
