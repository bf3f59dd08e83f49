// src/commands.rs

use logsift::config::Config;
use logsift::context::Context;
use logsift::error::{LogsiftError, Result};
use logsift::query::{search, SearchFilter};
use logsift::upload::upload;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Handles 'init'
pub fn handle_init(config: &Config) -> Result<()> {
    let ctx = Context::open(config)?;
    println!(
        "✓ Database initialized successfully at: {}",
        config.database_path()?.display()
    );
    println!("✓ Uploads are stored in: {}", ctx.upload_root.display());
    Ok(())
}

/// Handles 'upload'
pub fn handle_upload(ctx: &Context, file: &Path, name: Option<String>) -> Result<()> {
    let filename = match name {
        Some(n) => n,
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
    };

    let mut reader = File::open(file)?;
    let report = upload(ctx, &filename, &mut reader)?;

    for failure in &report.failures {
        eprintln!("Warning: skipped {}: {}", failure.path.display(), failure.error);
    }
    println!(
        "✓ File: {} uploaded successfully ({} log(s) stored)",
        report.filename,
        report.logs.len()
    );
    for log in &report.logs {
        println!("  [{}] {}", log.id, log.file_path);
    }
    Ok(())
}

/// Handles 'search'
pub fn handle_search(
    ctx: &Context,
    config: &Config,
    start: Option<String>,
    end: Option<String>,
    keyword: Option<String>,
    order: Option<String>,
) -> Result<()> {
    let filter = SearchFilter::from_raw(
        start.as_deref(),
        end.as_deref(),
        keyword.as_deref(),
        order.as_deref(),
    )?;
    tracing::info!(actor = ctx.actor(), ?filter, "search requested");

    let logs = search(&ctx.store, &filter)?;
    if logs.is_empty() {
        println!("No logs found.");
        return Ok(());
    }

    for log in logs {
        println!("[{}] {}", log.id, log.formatted_date());
        println!("{}", log.preview(config.display.preview_chars).trim_end());
        println!("{}", "─".repeat(40));
    }
    Ok(())
}

/// Handles 'show'
pub fn handle_show(ctx: &Context, id: i64) -> Result<()> {
    let log = ctx.store.get(id)?;
    println!("[{}] {}", log.id, log.formatted_date());
    println!("  └─ Path: {}", log.file_path);
    println!("{}", log.content.trim_end());
    Ok(())
}

/// Largest number of ids a single `a-b` range may expand to.
const MAX_RANGE_IDS: i64 = 10_000;

/// Parses an id list such as "1,3,5-7".
pub fn parse_id_range(s: &str) -> Result<Vec<i64>> {
    let mut ids = BTreeSet::new();
    for part in s.split(',') {
        let part = part.trim();
        if let Some((start_str, end_str)) = part.split_once('-') {
            let start_str = start_str.trim();
            let end_str = end_str.trim();
            if start_str.is_empty() || end_str.is_empty() {
                return Err(LogsiftError::validation(format!("Invalid range: {}", part)));
            }
            let start = parse_id(start_str)?;
            let end = parse_id(end_str)?;
            if start > end {
                return Err(LogsiftError::validation(format!(
                    "Start of range {} cannot be greater than end {}",
                    start, end
                )));
            }
            if end - start >= MAX_RANGE_IDS {
                return Err(LogsiftError::validation(format!(
                    "Range {} covers more than {} IDs",
                    part, MAX_RANGE_IDS
                )));
            }
            ids.extend(start..=end);
        } else if !part.is_empty() {
            ids.insert(parse_id(part)?);
        }
    }
    Ok(ids.into_iter().collect())
}

fn parse_id(s: &str) -> Result<i64> {
    s.parse()
        .map_err(|_| LogsiftError::validation(format!("Invalid ID: {}", s)))
}

/// Handles 'del'
pub fn handle_del(ctx: &Context, ids_str: &str, yes: bool) -> Result<()> {
    let ids_to_delete = parse_id_range(ids_str)?;
    if ids_to_delete.is_empty() {
        println!("No valid log IDs to delete.");
        return Ok(());
    }

    if !yes {
        println!(
            "You are about to permanently delete the following log IDs: {:?}",
            ids_to_delete
        );
        print!("Confirm deletion? (y/N): ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let count = ctx.store.delete_logs_by_id(&ids_to_delete)?;
    tracing::info!(actor = ctx.actor(), count, "logs deleted");
    println!("✓ Successfully deleted {} log(s).", count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_lists_and_ranges() {
        assert_eq!(parse_id_range("5").unwrap(), vec![5]);
        assert_eq!(parse_id_range("3, 7-9,12,8").unwrap(), vec![3, 7, 8, 9, 12]);
        assert!(parse_id_range("").unwrap().is_empty());
    }

    #[test]
    fn bad_id_lists_are_rejected() {
        assert!(parse_id_range("9-7").is_err());
        assert!(parse_id_range("3-").is_err());
        assert!(parse_id_range("abc").is_err());
    }

    #[test]
    fn oversized_ranges_are_rejected_before_expanding() {
        assert!(parse_id_range("1-9223372036854775807").is_err());
        assert!(parse_id_range("0-10000").is_err());
        assert_eq!(parse_id_range("1-10000").unwrap().len(), 10_000);
    }
}
