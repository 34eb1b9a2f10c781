//! Output formatting for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;

use crate::ca::CertificateSummary;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "text" => Ok(OutputFormat::Text),
            _ => anyhow::bail!("Unsupported output format: '{}'. Use 'json', 'yaml', or 'text'.", s),
        }
    }
}

/// Print data as JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

/// Print data as YAML
pub fn print_yaml<T: Serialize>(data: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(data).context("Failed to serialize to YAML")?;
    println!("{}", yaml);
    Ok(())
}

pub fn print_summary(summary: &CertificateSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Yaml => print_yaml(summary),
        OutputFormat::Text => {
            print!("{}", render_summary(summary));
            Ok(())
        }
    }
}

fn render_summary(summary: &CertificateSummary) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: &str| {
        out.push_str(&format!("{:<20} {}\n", label, value));
    };
    line("Subject:", &summary.subject);
    line("Issuer:", &summary.issuer);
    line("Serial:", &summary.serial);
    line("Not before:", &summary.not_before.to_rfc3339());
    line("Not after:", &summary.not_after.to_rfc3339());
    line("Signature:", &summary.signature_algorithm);
    line("Key size:", &format!("{} bits", summary.key_bits));
    if let Some(id) = &summary.subject_key_id {
        line("Subject key id:", id);
    }
    line("CA:", if summary.is_ca { "yes" } else { "no" });
    line("Self-signed:", if summary.is_self_signed { "yes" } else { "no" });
    for ext in &summary.extensions {
        let critical = if ext.critical { " (critical)" } else { "" };
        line("Extension:", &format!("{}{}", ext.name, critical));
    }
    out
}
