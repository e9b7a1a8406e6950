//! TrialExecutor: run every candidate through the backend in parallel.
//!
//! Each trial is fully independent: private temp artifact, one backend
//! invocation, its own outcome. A failing trial is recorded and never aborts
//! its siblings; the search only dies in aggregate, and that decision
//! belongs to the selector and orchestrator.

use crate::backend::CompressionBackend;
use crate::inspect;
use crate::types::{GifMetadata, ParameterSet, TrialOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Removes the trial artifact on every exit path (including panics) unless
/// the trial completed and handed ownership to its outcome.
struct ArtifactGuard {
    path: PathBuf,
    keep: bool,
}

impl ArtifactGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    fn into_kept(mut self) -> PathBuf {
        self.keep = true;
        self.path.clone()
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        if !self.keep && self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                eprintln!("⚠️ [cleanup] Failed to remove trial artifact: {}", e);
            }
        }
    }
}

/// Run all candidates, up to `threads` at a time, writing artifacts into
/// `scratch_dir`. Outcomes come back in candidate order regardless of
/// completion order, so selection stays deterministic.
pub fn execute<B: CompressionBackend>(
    backend: &B,
    input: &Path,
    metadata: &GifMetadata,
    candidates: &[ParameterSet],
    threads: usize,
    scratch_dir: &Path,
) -> Vec<TrialOutcome> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let pool_size = threads.clamp(1, candidates.len());
    let pb = ProgressBar::new(candidates.len() as u64);
    pb.set_style(ProgressStyle::default_bar());

    let run_all = || -> Vec<TrialOutcome> {
        candidates
            .par_iter()
            .enumerate()
            .map(|(index, params)| {
                let outcome = run_trial(backend, input, metadata, index, params, scratch_dir);
                pb.inc(1);
                outcome
            })
            .collect()
    };

    let outcomes = match rayon::ThreadPoolBuilder::new()
        .num_threads(pool_size)
        .build()
        .or_else(|_| rayon::ThreadPoolBuilder::new().num_threads(2).build())
    {
        Ok(pool) => pool.install(run_all),
        // Degraded environment: still produce every outcome, just serially.
        Err(_) => candidates
            .iter()
            .enumerate()
            .map(|(index, params)| {
                let outcome = run_trial(backend, input, metadata, index, params, scratch_dir);
                pb.inc(1);
                outcome
            })
            .collect(),
    };

    pb.finish_and_clear();
    outcomes
}

fn run_trial<B: CompressionBackend>(
    backend: &B,
    input: &Path,
    metadata: &GifMetadata,
    index: usize,
    params: &ParameterSet,
    scratch_dir: &Path,
) -> TrialOutcome {
    // Unique per candidate index, so concurrent trials never collide.
    let guard = ArtifactGuard::new(scratch_dir.join(format!("trial_{:03}.gif", index)));

    if let Err(e) = backend.run_once(input, &guard.path, params, metadata.frame_count) {
        debug!(trial = index, params = %params.describe(), "trial failed: {}", e);
        return TrialOutcome::failed(index, *params, e.to_string());
    }

    // Re-inspect instead of trusting stride arithmetic: the backend may
    // deviate from the requested frame selection, and an unreadable artifact
    // must never win selection.
    let produced = match inspect::inspect(&guard.path) {
        Ok(meta) => meta,
        Err(e) => {
            debug!(trial = index, "artifact unreadable: {}", e);
            return TrialOutcome::failed(index, *params, format!("output unreadable: {}", e));
        }
    };

    debug!(
        trial = index,
        params = %params.describe(),
        size_kb = produced.size_kb,
        frames = produced.frame_count,
        "trial complete"
    );

    TrialOutcome {
        candidate_index: index,
        params: *params,
        output_size_kb: produced.size_kb,
        frames_retained: produced.frame_count,
        succeeded: true,
        failure: None,
        artifact_path: Some(guard.into_kept()),
    }
}
