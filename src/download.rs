// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

//! Remote document fetching.
//!
//! Pose documents referenced by `http://` or `https://` sources are fetched
//! with a blocking `ureq` agent. Non-success statuses, timeouts and network
//! failures all surface as [`PoseError::LoadError`].

use std::io::Read;
use std::time::{Duration, Instant};

use crate::error::{PoseError, Result};
use crate::verbose;

/// Format bytes as human-readable string (e.g., "10.4MB").
#[allow(clippy::cast_precision_loss)]
pub(crate) fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let bytes = bytes as f64;
    if bytes >= GB {
        format!("{:.1}GB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.1}MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1}KB", bytes / KB)
    } else {
        format!("{bytes:.0}B")
    }
}

/// Fetch the body at `url` into memory.
///
/// # Errors
///
/// Returns [`PoseError::LoadError`] if the request fails, the server answers
/// with an error status, or the body cannot be read.
pub fn fetch(url: &str, connect_timeout: Duration, read_timeout: Duration) -> Result<Vec<u8>> {
    let config = ureq::Agent::config_builder()
        .timeout_connect(Some(connect_timeout))
        .timeout_recv_body(Some(read_timeout))
        .build();
    let agent = ureq::Agent::new_with_config(config);

    let start = Instant::now();
    let response = agent.get(url).call().map_err(|e| {
        let msg = match &e {
            ureq::Error::StatusCode(code) => format!("Server returned HTTP {code} for {url}"),
            ureq::Error::Timeout(_) => format!("Connection timed out while fetching {url}"),
            ureq::Error::Io(io_err) => format!("Network error fetching {url}: {io_err}"),
            _ => format!("Failed to fetch {url}: {e}"),
        };
        PoseError::LoadError(msg)
    })?;

    let mut body = Vec::new();
    response
        .into_body()
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|e| PoseError::LoadError(format!("Failed to read response from {url}: {e}")))?;

    verbose!(
        "Fetched {url} ({}) in {:.1}s",
        format_bytes(body.len() as u64),
        start.elapsed().as_secs_f64()
    );

    Ok(body)
}
