use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use lofty::probe::Probe;

/// Best-effort duration lookup.
///
/// Failures (unreadable file, unsupported format) and zero-length reports
/// all come back as `None`, never as an error. Callers treat an unknown
/// duration as "seeking disabled", not as a zero-length track.
pub fn probe(path: &Path) -> Option<Duration> {
    Probe::open(path)
        .and_then(|p| p.read())
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}
