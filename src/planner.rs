//! TrialPlanner: enumerate the candidate parameter sets for one search.
//!
//! The list is fully materialized (the worker pool needs a bounded work
//! list), deterministic for identical inputs, and ordered least lossy first:
//! smallest stride, then larger palette / lower optimization before smaller
//! palette / higher optimization. The selector breaks ties by position in
//! this list, so the ordering doubles as the quality preference.

use crate::types::{CompressionRequest, GifMetadata, OptimizationLevel, ParameterSet};

/// Descending palette sizes tried per stride.
pub const COLOR_TABLE_SIZES: [usize; 4] = [256, 128, 64, 32];

/// Hard cap on the candidate list so permissive constraints cannot explode
/// the trial count. 60 = five full strides worth of combinations.
pub const MAX_CANDIDATES: usize = 60;

/// Baseline candidate: non-destructive frame set, full palette, heaviest
/// optimization. Always present so a lossless-frame attempt exists even when
/// every other candidate fails.
pub fn baseline() -> ParameterSet {
    ParameterSet {
        frame_stride: 1,
        color_table_size: COLOR_TABLE_SIZES[0],
        optimization_level: OptimizationLevel::High,
    }
}

/// Build the ordered candidate list for this request.
pub fn plan(metadata: &GifMetadata, request: &CompressionRequest) -> Vec<ParameterSet> {
    let frame_count = metadata.frame_count;
    let min_frames = request.min_frames(frame_count);

    let mut candidates = Vec::new();
    let mut stride = 1usize;
    'strides: while stride <= frame_count {
        let retained = frame_count.div_ceil(stride);
        if retained < min_frames {
            break;
        }
        for colors in COLOR_TABLE_SIZES {
            for level in OptimizationLevel::ALL {
                candidates.push(ParameterSet {
                    frame_stride: stride,
                    color_table_size: colors,
                    optimization_level: level,
                });
                if candidates.len() >= MAX_CANDIDATES {
                    break 'strides;
                }
            }
        }
        stride += 1;
    }

    // Degenerate containers (zero frames) produce no stride candidates;
    // still hand the backend one baseline attempt.
    if !candidates.contains(&baseline()) {
        candidates.insert(0, baseline());
        candidates.truncate(MAX_CANDIDATES);
    }

    candidates
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::PathBuf;

    proptest! {
        /// Every planned candidate honors the minimum-frame constraint for
        /// any realistic frame count and percent.
        #[test]
        fn prop_candidates_respect_min_frames(
            frames in 1usize..=2000,
            percent in 1u32..=100
        ) {
            let req = CompressionRequest::new(
                PathBuf::from("in.gif"),
                PathBuf::from("out.gif"),
                100.0,
                percent,
                0,
            ).unwrap();
            let meta = GifMetadata { size_kb: 1000.0, frame_count: frames };
            let min_frames = req.min_frames(frames);
            for c in plan(&meta, &req) {
                prop_assert!(c.expected_frames(frames) >= min_frames);
            }
        }

        /// The list is never empty, never exceeds the cap, and always
        /// carries the baseline candidate.
        #[test]
        fn prop_bounded_and_baselined(
            frames in 0usize..=5000,
            percent in 1u32..=100
        ) {
            let req = CompressionRequest::new(
                PathBuf::from("in.gif"),
                PathBuf::from("out.gif"),
                100.0,
                percent,
                0,
            ).unwrap();
            let meta = GifMetadata { size_kb: 1000.0, frame_count: frames };
            let candidates = plan(&meta, &req);
            prop_assert!(!candidates.is_empty());
            prop_assert!(candidates.len() <= MAX_CANDIDATES);
            prop_assert!(candidates.contains(&baseline()));
        }
    }
}
