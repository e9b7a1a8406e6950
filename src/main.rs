use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;

use gifslim::{inspect, run, CompressionRequest, GifsicleBackend};
use gifslim::backend::CompressionBackend;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gifslim")]
#[command(version, about = "Size-targeting GIF compressor - parallel trial search over gifsicle parameters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a GIF: file size and frame count, without decoding
    Info {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(short, long, default_value = "human")]
        output: OutputFormat,
    },

    /// Compress toward a target size
    #[command(name = "run")]
    Run {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path (default: <input>_slim.gif next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target size in KB
        #[arg(short, long, default_value_t = 500.0)]
        target_size: f64,

        /// Minimum percentage of original frames that must survive (1-100)
        #[arg(short, long, default_value_t = 10)]
        min_frame_percent: u32,

        /// Parallel trials (0 = physical core count)
        #[arg(long, default_value_t = 0)]
        threads: usize,

        /// Per-trial timeout in seconds
        #[arg(long, default_value_t = gifslim::DEFAULT_TRIAL_TIMEOUT.as_secs())]
        trial_timeout: u64,

        /// Emit the result record as JSON on stdout
        #[arg(long)]
        json: bool,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Check whether the gifsicle backend is installed
    Check,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match &cli.command {
        Commands::Run { verbose: true, .. } => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };
    let _log_guard = gifslim::logging::init_logging(
        "gifslim",
        gifslim::logging::LogConfig::default().with_level(level),
    )?;

    match cli.command {
        Commands::Info { input, output } => {
            let metadata = match inspect(&input) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            };
            match output {
                OutputFormat::Human => {
                    println!("\n📊 GIF Inspection Report");
                    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
                    println!("📁 File: {}", input.display());
                    println!("💾 Size: {:.2} KB", metadata.size_kb);
                    println!("🎞️  Frames: {}", metadata.frame_count);
                    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&metadata)?);
                }
            }
        }

        Commands::Run {
            input,
            output,
            target_size,
            min_frame_percent,
            threads,
            trial_timeout,
            json,
            verbose: _,
        } => {
            let output = output.unwrap_or_else(|| default_output_path(&input));

            let request = match CompressionRequest::new(
                input.clone(),
                output,
                target_size,
                min_frame_percent,
                threads,
            ) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            };

            info!("🎬 Size-Targeting Compression");
            info!("   🎯 Target: {:.1} KB", request.target_size_kb);
            info!(
                "   🎞️  Frame floor: {}% of original frames",
                request.min_frame_percent
            );
            if request.threads == 0 {
                info!("   🔧 Threads: auto ({})", request.resolved_threads());
            } else {
                info!("   🔧 Threads: {}", request.threads);
            }
            info!("");

            let backend =
                GifsicleBackend::new().with_timeout(Duration::from_secs(trial_timeout));
            match run(&backend, &request) {
                Ok(result) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&result)?);
                    } else {
                        info!("");
                        info!("📊 Compression Summary:");
                        info!("   Input:  {:.2} KB", result.original_size_kb);
                        info!("   Output: {} ({:.2} KB)", result.output_path, result.compressed_size_kb);
                        info!("   Result: {}", result.message);
                    }
                    if !result.success {
                        std::process::exit(2);
                    }
                }
                Err(e) => {
                    eprintln!("❌ Compression failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Check => {
            if GifsicleBackend::new().is_available() {
                println!("✅ gifsicle is installed and on PATH");
            } else {
                println!("❌ gifsicle not found - install it and make sure it is on PATH");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_slim.gif", stem))
}
