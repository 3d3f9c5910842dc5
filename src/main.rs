//! osu-rate Command Line Interface
//!
//! Rate-changes osu! beatmaps and their audio.

use clap::{Parser, Subcommand};
use log::info;
use osu_rate::processor::{self, ConvertOptions, FfmpegStretcher};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "osu-rate")]
#[command(about = "Speed up or slow down osu! beatmaps", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a rate-changed copy of a beatmap
    Convert {
        /// Input .osu file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Rate factor (e.g. 1.3 to speed up, 0.75 to slow down)
        #[arg(short, long)]
        rate: f64,

        /// Output .osu file (default: difficulty name with the rate appended)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Do not run ffmpeg on the audio file
        #[arg(long)]
        no_audio: bool,

        /// ffmpeg executable
        #[arg(long, value_name = "PATH", default_value = "ffmpeg")]
        ffmpeg: PathBuf,

        /// Keep an existing rate-changed audio file instead of replacing it
        #[arg(long)]
        keep_audio: bool,
    },

    /// Show a beatmap's difficulty settings and section sizes
    Probe {
        /// Input .osu file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn run(cli: Cli) -> osu_rate::OsuResult<()> {
    match cli.command {
        Commands::Convert {
            input,
            rate,
            output,
            no_audio,
            ffmpeg,
            keep_audio,
        } => {
            let mut options = ConvertOptions::new(rate)?.with_audio(!no_audio);
            if let Some(output) = output {
                options = options.with_output(output);
            }
            let stretcher = FfmpegStretcher::new()
                .with_program(ffmpeg)
                .with_overwrite(!keep_audio);

            let report = processor::convert_file(&input, &options, &stretcher)?;
            println!("Wrote {}", report.output.display());
            println!(
                "  {} hit objects, {} timing points, effective rate {}",
                report.hit_objects, report.timing_points, report.effective_rate
            );
            if report.audio_processed {
                println!("  Audio: {}", report.audio_job.destination);
            } else {
                println!(
                    "  Audio skipped; map expects {} ({}x of {})",
                    report.audio_job.destination, report.effective_rate, report.audio_job.source
                );
            }
        }
        Commands::Probe { input } => {
            let summary = processor::inspect_file(&input)?;
            print!("{}", summary);
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    info!("osu-rate {}", osu_rate::VERSION);

    run(cli)?;
    Ok(())
}
