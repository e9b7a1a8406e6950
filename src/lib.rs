//! gifslim - Size-Targeting GIF Compression API
//!
//! Compresses an animated GIF toward a target file size by fanning out
//! parallel gifsicle trials over a space of frame strides, palette sizes and
//! optimization levels, then keeping the best artifact that honors the
//! minimum-frame constraint:
//! - within target: largest result below the target (most quality kept)
//! - target unreachable: smallest result overall, flagged as best effort
//!
//! ```rust,ignore
//! use gifslim::{compress, CompressionRequest};
//! use std::path::PathBuf;
//!
//! let request = CompressionRequest::new(
//!     PathBuf::from("big.gif"),
//!     PathBuf::from("small.gif"),
//!     500.0, // target KB
//!     10,    // keep at least 10% of frames
//!     0,     // threads: auto
//! )?;
//! let result = compress(&request)?;
//! println!("{}", result.message);
//! ```

pub mod backend;
pub mod errors;
pub mod executor;
pub mod inspect;
pub mod logging;
pub mod orchestrator;
pub mod planner;
pub mod selector;
pub mod types;

#[cfg(test)]
mod test_util;

pub use backend::{CompressionBackend, GifsicleBackend, DEFAULT_TRIAL_TIMEOUT};
pub use errors::{GifSlimError, Result};
pub use inspect::inspect;
pub use orchestrator::{compress, run};
pub use planner::{plan, MAX_CANDIDATES};
pub use selector::select;
pub use types::{
    CompressResult, CompressionRequest, GifMetadata, OptimizationLevel, ParameterSet,
    TrialOutcome,
};
