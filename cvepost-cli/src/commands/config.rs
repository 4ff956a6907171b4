//! `cvepost config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use cvepost_core::config::CvepostConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// 알려진 설정 섹션 이름
const SECTIONS: [&str; 5] = ["general", "policy", "feed", "cache", "notify"];

/// Execute the `config` command.
///
/// The configuration was already loaded (and validated) by `main`, so
/// `validate` only needs to report success; a broken file never reaches
/// this handler.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    config: &CvepostConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => {
            let report = ConfigValidateReport {
                path: config_path.display().to_string(),
                valid: true,
            };
            writer.render(&report)
        }
        ConfigAction::Show { section } => {
            let value = serde_json::to_value(config)?;
            let selected = match &section {
                None => value,
                Some(name) => value
                    .get(name)
                    .cloned()
                    .ok_or_else(|| {
                        CliError::Command(format!(
                            "unknown config section: {name} (expected: {})",
                            SECTIONS.join(", ")
                        ))
                    })?,
            };

            let report = ConfigShowReport {
                path: config_path.display().to_string(),
                section,
                config: selected,
            };
            writer.render(&report)
        }
    }
}

#[derive(Serialize)]
struct ConfigValidateReport {
    path: String,
    valid: bool,
}

impl Render for ConfigValidateReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;
        writeln!(w, "{} configuration OK: {}", "✓".green(), self.path)
    }
}

#[derive(Serialize)]
struct ConfigShowReport {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    section: Option<String>,
    config: serde_json::Value,
}

impl Render for ConfigShowReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let toml_str =
            toml::to_string_pretty(&self.config).map_err(std::io::Error::other)?;
        writeln!(w, "# {}", self.path)?;
        write!(w, "{toml_str}")
    }
}
