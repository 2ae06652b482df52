//! Ranked signal export.
//!
//! Formats:
//! - `json`: one pretty-printed array
//! - `jsonl`: one object per line
//! - `csv`: header row `id,text,type,subreddit,reddit_score,score`

use crate::types::{RankedSignal, Result, SignalError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Output format for ranked signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty JSON array
    #[default]
    Json,
    /// Newline-delimited JSON
    Jsonl,
    /// Comma-separated values with header
    Csv,
}

impl OutputFormat {
    /// Get format name as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Jsonl => "jsonl",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::Jsonl),
            "csv" => Ok(Self::Csv),
            other => Err(format!(
                "Unknown output format '{}' (expected json, jsonl or csv)",
                other
            )),
        }
    }
}

/// Write ranked signals to a writer.
///
/// # Arguments
///
/// * `writer` - Destination (file, stdout, buffer)
/// * `signals` - Signals in output order
/// * `format` - Output format
///
/// # Errors
///
/// Returns `SignalError::ExportError` (or the underlying I/O, JSON or CSV
/// error) if writing fails
pub fn write_signals<W: Write>(
    mut writer: W,
    signals: &[RankedSignal],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, signals)?;
            writeln!(writer)?;
        }
        OutputFormat::Jsonl => {
            for signal in signals {
                serde_json::to_writer(&mut writer, signal)?;
                writeln!(writer)?;
            }
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(&mut writer);
            for signal in signals {
                csv_writer.serialize(signal)?;
            }
            csv_writer
                .flush()
                .map_err(|e| SignalError::ExportError(format!("Failed to flush CSV: {}", e)))?;
        }
    }

    writer.flush()?;
    Ok(())
}
