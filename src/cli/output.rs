//! CLI output formatting.
//!
//! Text output is styled with `console`; JSON output is meant for scripts and
//! carries the same data.

use console::style;
use serde::Serialize;

use crate::cli::scenario::SimulationReport;
use crate::core::config::EngineConfig;
use crate::utils::math::format_wad;

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Compact JSON
    Json,
    /// Pretty JSON
    JsonPretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Ok(OutputFormat::JsonPretty),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMATTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Output formatter for CLI
#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create new formatter
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Get format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json | OutputFormat::JsonPretty)
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if !self.is_json() {
            println!("{} {}", style("✓").green(), message);
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if !self.is_json() {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print section header
    pub fn section(&self, title: &str) {
        if !self.is_json() {
            println!();
            println!("{}", style(format!("=== {} ===", title)).cyan().bold());
        }
    }

    /// Print key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if !self.is_json() {
            println!("  {}: {}", style(key).bold(), value);
        }
    }

    /// Print serializable data as JSON (JSON formats only)
    pub fn json<T: Serialize>(&self, data: &T) -> serde_json::Result<()> {
        let output = match self.format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(data)?,
            _ => serde_json::to_string(data)?,
        };
        println!("{}", output);
        Ok(())
    }

    /// Print text table
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        for line in render_table(headers, rows) {
            println!("{}", line);
        }
    }

    /// Print an engine configuration
    pub fn config(&self, config: &EngineConfig) -> serde_json::Result<()> {
        if self.is_json() {
            return self.json(config);
        }

        self.section("Engine Configuration");
        self.kv("Liquidation threshold", &format!("{}%", config.liquidation_threshold));
        self.kv("Liquidation bonus", &format!("{}%", config.liquidation_bonus));
        self.kv("Liquidation precision", &config.liquidation_precision.to_string());
        self.kv("Min health factor", &format_wad(config.min_health_factor.into()));
        self.kv("Precision", &config.precision.to_string());
        self.kv("Feed precision", &config.additional_feed_precision.to_string());
        self.kv("Oracle timeout", &format!("{}s", config.oracle_timeout_secs));
        Ok(())
    }

    /// Print a simulation report
    pub fn report(&self, report: &SimulationReport) -> serde_json::Result<()> {
        if self.is_json() {
            return self.json(report);
        }

        self.section("Steps");
        for step in &report.steps {
            let marker = if step.ok { style("✓").green() } else { style("✗").red() };
            let note = step
                .error
                .as_deref()
                .or(step.detail.as_deref())
                .map(|n| format!(": {}", n))
                .unwrap_or_default();
            println!("{} {:>3} {}{}", marker, step.index, step.action, note);
        }

        self.section("Accounts");
        self.table(
            &["account", "debt", "dsc", "collateral usd", "health factor"],
            &account_rows(report),
        );

        if let Some(solvency) = &report.solvency {
            self.section("Protocol");
            self.kv("Custody value", &format!("${}", format_wad(solvency.custody_value_usd)));
            self.kv("Ledger value", &format!("${}", format_wad(solvency.ledger_value_usd)));
            self.kv("Total supply", &format_wad(solvency.total_supply));
            if !solvency.is_solvent() {
                self.warning("custody value is below total supply");
            }
        }

        if report.failures() > 0 {
            println!();
            self.warning(&format!("{} step(s) failed", report.failures()));
        } else {
            println!();
            self.success("all steps succeeded");
        }
        Ok(())
    }
}

/// Table rows of the final account state
pub fn account_rows(report: &SimulationReport) -> Vec<Vec<String>> {
    report
        .accounts
        .iter()
        .map(|account| {
            let health = if account.liquidatable {
                format!("{} (liquidatable)", account.health_factor)
            } else {
                account.health_factor.clone()
            };
            vec![
                account.name.clone(),
                account.debt.clone(),
                account.dsc_balance.clone(),
                account.collateral_value_usd.clone(),
                health,
            ]
        })
        .collect()
}

/// Lay out a plain-text table with padded columns
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    if headers.is_empty() {
        return Vec::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(cell.len());
                format!("{:width$}", cell, width = width)
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(headers.iter().map(|h| h.to_string()).collect()));
    lines.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    for row in rows {
        lines.push(line(row.clone()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::scenario::{AccountReport, StepReport};
    use crate::utils::address::Address;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_table_pads_columns() {
        let lines = render_table(
            &["name", "debt"],
            &[vec!["alice".into(), "8000".into()], vec!["bo".into(), "1".into()]],
        );
        assert_eq!(lines[0], "name  | debt");
        assert_eq!(lines[1], "------+-----");
        assert_eq!(lines[3], "bo    | 1   ");
    }

    #[test]
    fn test_account_rows_flag_liquidatable() {
        let report = SimulationReport {
            steps: vec![StepReport {
                index: 1,
                action: "mint".into(),
                ok: false,
                detail: None,
                error: Some("Amount must be more than zero".into()),
            }],
            accounts: vec![AccountReport {
                name: "alice".into(),
                address: Address::from_label("alice"),
                debt: "8000".into(),
                dsc_balance: "8000".into(),
                collateral_value_usd: "5000".into(),
                health_factor: "0.3125".into(),
                liquidatable: true,
            }],
            solvency: None,
        };

        let rows = account_rows(&report);
        assert_eq!(rows[0][4], "0.3125 (liquidatable)");
        assert_eq!(report.failures(), 1);
    }
}
