use crate::error::DecapResult;
use clap::ValueEnum;
use s7_decap_core::S7AccessRecord;
use serde::Deserialize;
use std::io::Write;

/// How records are written to the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per record
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

pub fn render<W: Write>(format: OutputFormat, records: &[S7AccessRecord], out: &mut W) -> DecapResult<()> {
    for record in records {
        match format {
            OutputFormat::Text => writeln!(out, "{record}")?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, record)?;
                out.write_all(b"\n")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
