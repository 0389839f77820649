use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use trama_sdk::{parse_edit_values, ContentService, FieldEdit, Language, UpdateStatus};
use trama_server::{ContentServer, ServerConfig, UpdateRequest};
use trama_store::{EntryStore, InMemoryContentCache, InMemoryEntryStore};

use crate::cli::*;
use crate::rows;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Pages(args) => cmd_pages(args, &cli.format),
        Command::Rebuild(args) => cmd_rebuild(args, &cli.format),
        Command::Check(args) => cmd_check(args, &cli.format),
        Command::Apply(args) => cmd_apply(args, &cli.format),
        Command::Serve(args) => cmd_serve(args),
    }
}

fn cmd_pages(args: PagesArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let (_store, service) = rows::open_service(Path::new(&args.rows))?;
    let pages = service.pages()?;

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }
    if pages.is_empty() {
        println!("No pages.");
        return Ok(());
    }
    for page in &pages {
        println!("  {}  {} rows", page.page_id.bold(), page.row_count);
    }
    Ok(())
}

fn cmd_rebuild(args: RebuildArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let (_store, service) = rows::open_service(Path::new(&args.rows))?;
    let language = parse_language(args.language.as_deref())?;
    let page = service.get_page(&args.page_id, language)?;

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&page.content)?);
    for (key, metadata) in &page.language_metadata {
        for issue in &metadata.issues {
            println!("  {} {}: {}", "!".yellow().bold(), key.bold(), issue);
        }
    }
    Ok(())
}

fn cmd_check(args: CheckArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let (_store, service) = rows::open_service(Path::new(&args.rows))?;
    let report = service.validate_page(&args.page_id)?;

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let verdict = if report.valid == report.checked {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        };
        println!(
            "{} {}: {}/{} keys valid",
            verdict,
            report.page_id.bold(),
            report.valid,
            report.checked
        );
        for key in &report.keys {
            if key.is_valid {
                println!("  {} {} ({})", "✓".green(), key.key, key.completeness);
            } else {
                println!("  {} {} ({})", "✗".red(), key.key.bold(), key.completeness);
                for issue in &key.issues {
                    println!("      {}", issue.red());
                }
            }
        }
    }

    if report.valid < report.checked {
        anyhow::bail!(
            "{} of {} keys failed integrity",
            report.checked - report.valid,
            report.checked
        );
    }
    Ok(())
}

fn cmd_apply(args: ApplyArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let (store, service) = rows::open_service(Path::new(&args.rows))?;
    let contents = std::fs::read_to_string(&args.edits)
        .with_context(|| format!("reading edits file {}", args.edits))?;
    let request: UpdateRequest = serde_json::from_str(&contents)
        .with_context(|| format!("parsing edits file {}", args.edits))?;

    let mut edits = Vec::with_capacity(request.edits.len());
    for (json_key, payload) in &request.edits {
        edits.push(FieldEdit {
            json_key: json_key.clone(),
            values: parse_edit_values(&payload.new_text)?,
        });
    }

    let outcome = service.apply_edits(&args.page_id, edits)?;

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        for entry in &outcome.update_log {
            let status = match entry.status {
                UpdateStatus::Success if entry.is_noop() => "unchanged".dimmed(),
                UpdateStatus::Success => "success".green(),
                UpdateStatus::Failed => "failed".red(),
                UpdateStatus::Exception => "exception".red().bold(),
            };
            println!("  {}  {}", status, entry.key);
            if let Some(error) = &entry.error {
                println!("      {}", error.red());
            }
        }
        println!(
            "{} {} of {} fields updated",
            "✓".green().bold(),
            outcome.updated_count,
            outcome.update_log.len()
        );
    }

    if args.write {
        let merged = rows::all_rows(store.as_ref())?;
        rows::save_rows(Path::new(&args.rows), &merged)?;
        println!("Wrote {} rows to {}", merged.len(), args.rows.bold());
    }
    Ok(())
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let store = Arc::new(InMemoryEntryStore::new());
    if let Some(path) = &args.rows {
        for entry in rows::load_rows(Path::new(path))? {
            store.upsert(&entry)?;
        }
        println!("Loaded {} rows from {}", store.len(), path.bold());
    }

    let mut config = ServerConfig::default();
    config.bind_addr = args
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", args.bind))?;

    let service = Arc::new(ContentService::new(
        store,
        Arc::new(InMemoryContentCache::new()),
        config.service.clone(),
    ));
    let server = ContentServer::new(config, service);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

/// Absent or `"all"` means all-languages reconstruction.
fn parse_language(raw: Option<&str>) -> anyhow::Result<Option<Language>> {
    match raw {
        None | Some("all") => Ok(None),
        Some(code) => Ok(Some(code.parse::<Language>()?)),
    }
}
