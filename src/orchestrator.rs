//! SearchOrchestrator: the one place that sequences the whole search.
//!
//! Inspector -> planner -> worker pool -> selector, then promote the winning
//! artifact to the requested output path and let the scoped temp dir sweep
//! away everything else. Structural errors (missing input, not a GIF,
//! backend unavailable) surface here before a single trial runs.

use crate::backend::{CompressionBackend, GifsicleBackend};
use crate::errors::{GifSlimError, Result};
use crate::types::{CompressResult, CompressionRequest, TrialOutcome};
use crate::{executor, inspect, planner, selector};
use std::fs;
use std::path::Path;
use tracing::info;

/// Compress with the production gifsicle backend.
pub fn compress(request: &CompressionRequest) -> Result<CompressResult> {
    run(&GifsicleBackend::new(), request)
}

/// Run the full search against any backend.
pub fn run<B: CompressionBackend>(backend: &B, request: &CompressionRequest) -> Result<CompressResult> {
    if !request.input_path.exists() {
        return Err(GifSlimError::InputNotFound(
            request.input_path.display().to_string(),
        ));
    }

    let metadata = inspect::inspect(&request.input_path)?;
    info!(
        "📂 Input: {:.2} KB, {} frames, target {:.2} KB",
        metadata.size_kb, metadata.frame_count, request.target_size_kb
    );

    // Surfaced once, before any trial, instead of N per-trial launch errors.
    if !backend.is_available() {
        return Err(GifSlimError::BackendUnavailable);
    }

    // Already small enough: copy through untouched, no trial needed.
    if metadata.size_kb <= request.target_size_kb {
        promote(&request.input_path, &request.output_path, false)?;
        return Ok(CompressResult {
            success: true,
            original_size_kb: metadata.size_kb,
            compressed_size_kb: metadata.size_kb,
            output_path: request.output_path.display().to_string(),
            message: format!(
                "Already within target ({:.2} KB ≤ {:.2} KB), copied unchanged",
                metadata.size_kb, request.target_size_kb
            ),
        });
    }

    let candidates = planner::plan(&metadata, request);
    let threads = request.resolved_threads();
    info!(
        "🧪 Running {} trials on {} threads",
        candidates.len(),
        threads
    );

    // Every trial artifact lives in this scope; dropping it removes all
    // losing artifacts on success and everything on failure.
    let scratch = tempfile::Builder::new()
        .prefix("gifslim_trials_")
        .tempdir()
        .map_err(|e| GifSlimError::TempStorageFailed(e.to_string()))?;

    let outcomes = executor::execute(
        backend,
        &request.input_path,
        &metadata,
        &candidates,
        threads,
        scratch.path(),
    );

    let failed = outcomes.iter().filter(|o| !o.succeeded).count();
    if failed > 0 {
        info!("⚠️  {} of {} trials failed", failed, outcomes.len());
    }

    let winner = selector::select(&outcomes, &metadata, request)?;
    let artifact = winner
        .artifact_path
        .as_deref()
        .ok_or(GifSlimError::NoValidResults)?;

    promote(artifact, &request.output_path, true)?;

    let success = winner.output_size_kb <= request.target_size_kb;
    let message = build_message(&winner, metadata.size_kb, request.target_size_kb, success);
    info!("{}", message);

    Ok(CompressResult {
        success,
        original_size_kb: metadata.size_kb,
        compressed_size_kb: winner.output_size_kb,
        output_path: request.output_path.display().to_string(),
        message,
    })
}

/// Move the winning artifact into place. Rename when the filesystem allows
/// it, copy + delete across mount points. `consume` is false on the fast
/// path where the source is the caller's own input file.
fn promote(source: &Path, destination: &Path, consume: bool) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    if consume {
        if fs::rename(source, destination).is_ok() {
            return Ok(());
        }
        fs::copy(source, destination)?;
        fs::remove_file(source)?;
    } else {
        // fs::copy truncates the destination before reading, so copying a
        // file onto itself would empty it. Canonicalize to catch aliases of
        // the same inode; a destination that does not exist yet cannot alias.
        if let (Ok(src), Ok(dst)) = (source.canonicalize(), destination.canonicalize()) {
            if src == dst {
                return Ok(());
            }
        }
        fs::copy(source, destination)?;
    }
    Ok(())
}

fn build_message(
    winner: &TrialOutcome,
    original_kb: f64,
    target_kb: f64,
    success: bool,
) -> String {
    let reduction_pct = (1.0 - winner.output_size_kb / original_kb) * 100.0;
    if success {
        format!(
            "✅ Target met: {:.2} KB → {:.2} KB (-{:.1}%), {} frames kept ({})",
            original_kb,
            winner.output_size_kb,
            reduction_pct,
            winner.frames_retained,
            winner.params.describe()
        )
    } else {
        format!(
            "⚠️ Target missed: best effort {:.2} KB vs target {:.2} KB (-{:.1}% from original), {} frames kept ({})",
            winner.output_size_kb,
            target_kb,
            reduction_pct,
            winner.frames_retained,
            winner.params.describe()
        )
    }
}
