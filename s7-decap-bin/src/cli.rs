use crate::render::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// S7 Decap - extract S7comm variable reads and writes from pcap captures
///
/// Decodes ReadVar/WriteVar telegrams carried over ISO-on-TCP (port 102) and
/// prints one line per accessed variable.
#[derive(Debug, Default, Parser)]
#[command(name = "s7-decap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "S7comm ReadVar/WriteVar extractor", long_about = None)]
pub struct Cli {
    /// Capture file to read (classic pcap)
    #[arg(short = 'r', long = "read", value_name = "FILE")]
    pub source: Option<PathBuf>,

    /// Stop after the first packet that carries a decodable telegram
    #[arg(short = 'f', long = "first")]
    pub first: bool,

    /// Only dissect the packet with this 0-based capture index
    #[arg(short = 'n', long = "packet", value_name = "N")]
    pub packet: Option<usize>,

    /// Log intermediate layers and skipped packets
    #[arg(short, long)]
    pub verbose: bool,

    /// Optional settings file (TOML)
    #[arg(short, long, env = "S7DECAP_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Segments buffered between the capture reader and the dissector
    #[arg(long, value_name = "N")]
    pub queue_depth: Option<usize>,
}
