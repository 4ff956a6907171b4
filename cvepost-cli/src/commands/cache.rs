//! `cvepost cache` command handler

use std::io::Write;

use serde::Serialize;

use cvepost_core::config::CvepostConfig;
use cvepost_notify::DedupCache;

use crate::cli::{CacheAction, CacheArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `cache` command.
pub async fn execute(
    args: CacheArgs,
    config: &CvepostConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        CacheAction::Show => {
            let cache = DedupCache::load(&config.cache.path)?;
            let report = CacheShowReport {
                path: cache.path().display().to_string(),
                entries: cache.len(),
                ids: cache.ids(),
            };
            writer.render(&report)
        }
        CacheAction::Reset => {
            let mut cache = DedupCache::load(&config.cache.path)?;
            let removed = cache.len();
            cache.clear();
            cache.save()?;

            tracing::info!(removed, path = %config.cache.path, "cache store reset");

            let report = CacheResetReport {
                path: cache.path().display().to_string(),
                removed,
            };
            writer.render(&report)
        }
    }
}

#[derive(Serialize)]
struct CacheShowReport {
    path: String,
    entries: usize,
    ids: Vec<String>,
}

impl Render for CacheShowReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Cache store: {}", self.path)?;
        writeln!(w, "Entries: {}", self.entries.to_string().bold())?;
        for id in &self.ids {
            writeln!(w, "  {id}")?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct CacheResetReport {
    path: String,
    removed: usize,
}

impl Render for CacheResetReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;
        writeln!(
            w,
            "{} cache store reset: {} ({} entries removed)",
            "✓".green(),
            self.path,
            self.removed
        )
    }
}
