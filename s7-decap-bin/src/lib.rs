//! `s7-decap` application: pcap capture, settings, logging and rendering
//! around the [`s7_decap_core`] dissector.

pub mod capture;
pub mod cli;
pub mod error;
pub mod logger;
pub mod render;
pub mod settings;

use capture::{spawn_capture, PcapSource};
use error::{DecapError, DecapResult};
use s7_decap_core::{Dissector, DissectorStats, Flow};
use settings::Settings;
use std::io::Write;
use tracing::{debug, info};

/// Dissect the configured capture and write the records to `out`.
///
/// Records decoded before a capture read error are still written; the error is
/// returned afterwards unless the selection policy had already finished.
pub async fn run<W: Write>(settings: &Settings, out: &mut W) -> DecapResult<DissectorStats> {
    let path = settings
        .source
        .as_deref()
        .ok_or_else(|| DecapError::ConfigurationError("no capture source".to_string()))?;
    let source = PcapSource::open(path)?;
    info!(path = %path.display(), link = ?source.link(), "Reading capture");

    let (mut segments, reader) = spawn_capture(source, settings.queue_depth);
    let mut dissector = Dissector::new(settings.selection_policy());
    while let Some(segment) = segments.recv().await {
        if dissector.feed(&segment) == Flow::Stop {
            break;
        }
    }
    // Unblocks the reader if the policy stopped the run early
    drop(segments);

    let read_result = match reader.await? {
        Ok(forwarded) => {
            debug!(forwarded, "Capture reader finished");
            Ok(())
        }
        Err(e) if dissector.is_finished() => {
            debug!("Capture read error after selection finished: {}", e);
            Ok(())
        }
        Err(e) => Err(e),
    };

    let stats = dissector.finish();
    render::render(settings.format, dissector.records(), out)?;
    read_result.map(|_| stats)
}
