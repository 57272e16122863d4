// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deep-health sampling (`spec.md` §4.8): which Streams the scheduler's
//! deep-health job probes this tick.

use relcore_core::Stream;

/// Cap on a single deep-health tick's fan-out, per `spec.md` §4.8.
pub const DEEP_SAMPLE_CAP: usize = 50;

/// Select Streams with missing or zero fps; if none qualify, rotate by
/// `updated_at` ascending instead, so every Stream eventually gets a
/// deep probe even when all report healthy fps.
pub fn select_deep_sample(streams: &[Stream], cap: usize) -> Vec<&Stream> {
    let mut missing_fps: Vec<&Stream> =
        streams.iter().filter(|s| s.metrics.fps.map_or(true, |fps| fps <= 0.0)).collect();
    if !missing_fps.is_empty() {
        missing_fps.truncate(cap);
        return missing_fps;
    }

    let mut rotated: Vec<&Stream> = streams.iter().collect();
    rotated.sort_by_key(|s| s.updated_at);
    rotated.truncate(cap);
    rotated
}

#[cfg(test)]
#[path = "deep_sample_tests.rs"]
mod deep_sample_tests;
