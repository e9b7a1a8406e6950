//! ResultSelector: pick the winning artifact from the completed trials.
//!
//! Selection is order-independent over the outcome set, so the worker
//! pool's nondeterministic completion order never changes the answer.
//! Policy:
//!   1. among outcomes within the target, the LARGEST size wins (closest to
//!      the target from below keeps the most quality),
//!   2. otherwise the smallest size overall (best effort),
//!   3. ties go to the earlier-generated, least lossy candidate.

use crate::errors::{GifSlimError, Result};
use crate::types::{CompressionRequest, GifMetadata, TrialOutcome};

pub fn select(
    outcomes: &[TrialOutcome],
    metadata: &GifMetadata,
    request: &CompressionRequest,
) -> Result<TrialOutcome> {
    let min_frames = request.min_frames(metadata.frame_count);

    let viable: Vec<&TrialOutcome> = outcomes
        .iter()
        .filter(|o| o.succeeded && o.frames_retained >= min_frames)
        .collect();

    if viable.is_empty() {
        return Err(GifSlimError::NoValidResults);
    }

    let within_target: Vec<&TrialOutcome> = viable
        .iter()
        .copied()
        .filter(|o| o.output_size_kb <= request.target_size_kb)
        .collect();

    let winner = if !within_target.is_empty() {
        within_target.into_iter().reduce(|best, candidate| {
            if candidate.output_size_kb > best.output_size_kb {
                candidate
            } else if candidate.output_size_kb == best.output_size_kb
                && candidate.candidate_index < best.candidate_index
            {
                candidate
            } else {
                best
            }
        })
    } else {
        viable.into_iter().reduce(|best, candidate| {
            if candidate.output_size_kb < best.output_size_kb {
                candidate
            } else if candidate.output_size_kb == best.output_size_kb
                && candidate.candidate_index < best.candidate_index
            {
                candidate
            } else {
                best
            }
        })
    };

    // reduce() on a non-empty collection always yields a value.
    winner
        .cloned()
        .ok_or(GifSlimError::NoValidResults)
}
