//! CompressionBackend: the external optimizer behind each trial.
//!
//! The backend is a black box: one synchronous invocation per trial, no
//! shared state. Production uses gifsicle; tests script their own
//! implementations of the trait.

use crate::errors::{GifSlimError, Result};
use crate::types::ParameterSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Default ceiling on a single backend invocation. A hung optimizer call
/// must not stall its worker forever.
pub const DEFAULT_TRIAL_TIMEOUT: Duration = Duration::from_secs(120);

pub trait CompressionBackend: Sync {
    /// Cheap capability probe, checked once before any trial runs.
    fn is_available(&self) -> bool;

    /// Compress `input` into `output` with the given parameters.
    /// `frame_count` is the input's total frame count, needed to expand the
    /// stride into an explicit frame selection.
    fn run_once(
        &self,
        input: &Path,
        output: &Path,
        params: &ParameterSet,
        frame_count: usize,
    ) -> Result<()>;
}

/// gifsicle invoked out of process.
pub struct GifsicleBackend {
    binary: PathBuf,
    timeout: Duration,
}

impl Default for GifsicleBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GifsicleBackend {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("gifsicle"),
            timeout: DEFAULT_TRIAL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg(test)]
    fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Argument list for one trial. Frame selection uses gifsicle's `#n`
    /// frame specs on an unoptimized stream; strip flags match what the
    /// optimizer can drop without visual impact.
    fn build_args(
        input: &Path,
        output: &Path,
        params: &ParameterSet,
        frame_count: usize,
    ) -> Vec<String> {
        let mut args = vec![
            "--no-warnings".to_string(),
            "--no-conserve-memory".to_string(),
            "--no-app-extensions".to_string(),
            "--no-comments".to_string(),
            "--no-names".to_string(),
            params.optimization_level.gifsicle_flag().to_string(),
            "--colors".to_string(),
            params.color_table_size.to_string(),
        ];
        if params.frame_stride > 1 {
            // Frame deletion on an optimized stream corrupts deltas.
            args.push("--unoptimize".to_string());
        }
        args.push(input.display().to_string());
        if params.frame_stride > 1 {
            for index in (0..frame_count).step_by(params.frame_stride) {
                args.push(format!("#{}", index));
            }
        }
        args.push("-o".to_string());
        args.push(output.display().to_string());
        args
    }
}

impl CompressionBackend for GifsicleBackend {
    fn is_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }

    fn run_once(
        &self,
        input: &Path,
        output: &Path,
        params: &ParameterSet,
        frame_count: usize,
    ) -> Result<()> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(Self::build_args(input, output, params, frame_count));
        run_with_timeout(cmd, self.timeout)
    }
}

/// Run a command to completion with a hard deadline. On timeout the child is
/// killed and the invocation reported failed, never retried.
pub(crate) fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<()> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            GifSlimError::BackendInvocationFailed(format!(
                "failed to launch {:?}: {}",
                cmd.get_program(),
                e
            ))
        })?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                if status.success() {
                    return Ok(());
                }
                let mut stderr = String::new();
                if let Some(mut pipe) = child.stderr.take() {
                    let _ = pipe.read_to_string(&mut stderr);
                }
                let reason = stderr
                    .lines()
                    .last()
                    .unwrap_or("no diagnostic output")
                    .to_string();
                return Err(GifSlimError::BackendInvocationFailed(format!(
                    "exit {}: {}",
                    status.code().map_or("signal".to_string(), |c| c.to_string()),
                    reason
                )));
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(GifSlimError::BackendInvocationFailed(format!(
                        "timed out after {:.0}s",
                        timeout.as_secs_f64()
                    )));
                }
                std::thread::sleep(Duration::from_millis(25));
            }
            Err(e) => {
                let _ = child.kill();
                return Err(GifSlimError::BackendInvocationFailed(format!(
                    "wait failed: {}",
                    e
                )));
            }
        }
    }
}
