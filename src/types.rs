//! Core data model for the size-targeting search.
//!
//! Everything here is immutable once constructed. `CompressionRequest`
//! validates its constraints up front so the search engine never has to
//! re-check them mid-flight.

use crate::errors::{GifSlimError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Structural facts about a GIF, derived by inspection only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GifMetadata {
    /// File size in KB, straight from filesystem metadata.
    pub size_kb: f64,
    /// Number of image blocks in the container.
    pub frame_count: usize,
}

/// gifsicle optimization level, least to most aggressive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptimizationLevel {
    Low,
    Medium,
    High,
}

impl OptimizationLevel {
    pub const ALL: [OptimizationLevel; 3] = [
        OptimizationLevel::Low,
        OptimizationLevel::Medium,
        OptimizationLevel::High,
    ];

    /// The `-O` flag gifsicle expects.
    pub fn gifsicle_flag(&self) -> &'static str {
        match self {
            OptimizationLevel::Low => "-O1",
            OptimizationLevel::Medium => "-O2",
            OptimizationLevel::High => "-O3",
        }
    }
}

/// One point in the search space. One trial per instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSet {
    /// Keep every Nth frame, starting at frame 0. 1 = keep everything.
    pub frame_stride: usize,
    /// Color table size passed to gifsicle (`--colors`).
    pub color_table_size: usize,
    pub optimization_level: OptimizationLevel,
}

impl ParameterSet {
    /// Frames retained by this stride, by arithmetic: positions
    /// `0, stride, 2*stride, ...` below `frame_count`.
    pub fn expected_frames(&self, frame_count: usize) -> usize {
        if frame_count == 0 {
            return 0;
        }
        frame_count.div_ceil(self.frame_stride)
    }

    pub fn describe(&self) -> String {
        format!(
            "stride {}, {} colors, {}",
            self.frame_stride,
            self.color_table_size,
            self.optimization_level.gifsicle_flag()
        )
    }
}

/// Validated caller request. Invalid constraints are rejected here, never
/// deeper in the pipeline.
#[derive(Debug, Clone)]
pub struct CompressionRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub target_size_kb: f64,
    pub min_frame_percent: u32,
    pub threads: usize,
}

impl CompressionRequest {
    pub fn new(
        input_path: PathBuf,
        output_path: PathBuf,
        target_size_kb: f64,
        min_frame_percent: u32,
        threads: usize,
    ) -> Result<Self> {
        if !target_size_kb.is_finite() || target_size_kb <= 0.0 {
            return Err(GifSlimError::InvalidRequest(format!(
                "target size must be positive, got {} KB",
                target_size_kb
            )));
        }
        if !(1..=100).contains(&min_frame_percent) {
            return Err(GifSlimError::InvalidRequest(format!(
                "min frame percent must be in 1..=100, got {}",
                min_frame_percent
            )));
        }
        Ok(Self {
            input_path,
            output_path,
            target_size_kb,
            min_frame_percent,
            threads,
        })
    }

    /// Thread budget with 0 resolved to the physical core count.
    pub fn resolved_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get_physical().max(1)
        } else {
            self.threads
        }
    }

    /// Minimum surviving frames: ceil(frame_count * percent / 100), floor 1.
    pub fn min_frames(&self, frame_count: usize) -> usize {
        let scaled = frame_count * self.min_frame_percent as usize;
        (scaled.div_ceil(100)).max(1)
    }
}

/// What one trial produced. Owned by the worker pool until selection.
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    /// Position in the planner's candidate list; the selector breaks ties
    /// with it, so earlier (less lossy) candidates win.
    pub candidate_index: usize,
    pub params: ParameterSet,
    pub output_size_kb: f64,
    /// Re-inspected from the artifact, not trusted from stride arithmetic.
    pub frames_retained: usize,
    pub succeeded: bool,
    pub failure: Option<String>,
    /// Ephemeral path inside the orchestration's temp dir.
    pub artifact_path: Option<PathBuf>,
}

impl TrialOutcome {
    pub fn failed(candidate_index: usize, params: ParameterSet, reason: String) -> Self {
        Self {
            candidate_index,
            params,
            output_size_kb: f64::MAX,
            frames_retained: 0,
            succeeded: false,
            failure: Some(reason),
            artifact_path: None,
        }
    }
}

/// Terminal result handed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct CompressResult {
    pub success: bool,
    pub original_size_kb: f64,
    pub compressed_size_kb: f64,
    pub output_path: String,
    pub message: String,
}
